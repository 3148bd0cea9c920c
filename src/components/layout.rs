// ABOUTME: Main layout component - header bar, active view, and the help popup on top

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::{FormScreenComponent, HelpComponent, HomeScreenComponent, TourOverlayComponent};
use crate::app::{form_screen::FormScreen, state::View, AppState};
use crate::models::FormModel;

const GOLD: Color = Color::Rgb(255, 215, 0);
const DARK_BG: Color = Color::Rgb(25, 25, 35);
const MUTED_GRAY: Color = Color::Rgb(120, 120, 140);

pub struct LayoutComponent {
    home_screen: HomeScreenComponent,
    form_screen: FormScreenComponent,
    tour_overlay: TourOverlayComponent,
    help: HelpComponent,
}

impl LayoutComponent {
    pub fn new() -> Self {
        Self {
            home_screen: HomeScreenComponent::new(),
            form_screen: FormScreenComponent::new(),
            tour_overlay: TourOverlayComponent::new(),
            help: HelpComponent::new(),
        }
    }

    pub fn render(&mut self, frame: &mut Frame, state: &mut AppState) {
        let main_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header bar
                Constraint::Min(0),    // Active view
            ])
            .split(frame.size());

        self.render_header(frame, main_layout[0], state);

        match state.current_view {
            View::HomeScreen => self.home_screen.render(frame, main_layout[1], state),
            View::Order => self.render_form(frame, main_layout[1], &state.order),
            View::Report => self.render_form(frame, main_layout[1], &state.report),
        }

        if state.help_visible {
            self.help.render(frame, frame.size());
        }
    }

    fn render_form<D: FormModel>(&self, frame: &mut Frame, area: Rect, screen: &FormScreen<D>) {
        self.form_screen.render(frame, area, screen);
        self.tour_overlay.render(frame, area, screen);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let view = match state.current_view {
            View::HomeScreen => "Home",
            View::Order => "Order",
            View::Report => "Visit report",
        };
        let header = Paragraph::new(Line::from(vec![
            Span::styled(" fieldvisit ", Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
            Span::styled(format!("│ {view} │ {}", state.config.role), Style::default().fg(MUTED_GRAY)),
        ]))
        .style(Style::default().bg(DARK_BG));
        frame.render_widget(header, area);
    }
}

impl Default for LayoutComponent {
    fn default() -> Self {
        Self::new()
    }
}
