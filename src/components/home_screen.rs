// ABOUTME: Home screen component with tile-based navigation to the order and visit report forms

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::app::state::{AppState, HomeTile};

// Color palette from TUI style guide
const CORNFLOWER_BLUE: Color = Color::Rgb(100, 149, 237);
const GOLD: Color = Color::Rgb(255, 215, 0);
const SELECTION_GREEN: Color = Color::Rgb(100, 200, 100);
const DARK_BG: Color = Color::Rgb(25, 25, 35);
const PANEL_BG: Color = Color::Rgb(30, 30, 40);
const LIST_HIGHLIGHT_BG: Color = Color::Rgb(40, 40, 60);
const SOFT_WHITE: Color = Color::Rgb(220, 220, 230);
const MUTED_GRAY: Color = Color::Rgb(120, 120, 140);

pub struct HomeScreenComponent;

impl HomeScreenComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        frame.render_widget(Block::default().style(Style::default().bg(DARK_BG)), area);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(0),    // Tiles
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        self.render_title(frame, layout[0], state);
        self.render_tiles(frame, layout[1], state);
        self.render_help_bar(frame, layout[2]);
    }

    fn render_title(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let title = Paragraph::new(Line::from(vec![
            Span::styled("Field visits", Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
            Span::styled(format!("  signed in as {}", state.config.role), Style::default().fg(MUTED_GRAY)),
        ]))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(CORNFLOWER_BLUE))
                .style(Style::default().bg(PANEL_BG)),
        );
        frame.render_widget(title, area);
    }

    fn render_tiles(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Top padding
                Constraint::Length(6), // Tiles
                Constraint::Min(0),
            ])
            .split(area);

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(8),
                Constraint::Percentage(40),
                Constraint::Percentage(4),
                Constraint::Percentage(40),
                Constraint::Percentage(8),
            ])
            .split(rows[1]);

        let selected = state.home_screen_state.selected();
        for (tile, col) in HomeTile::ALL.into_iter().zip([cols[1], cols[3]]) {
            self.render_tile(frame, col, tile, tile == selected);
        }
    }

    fn render_tile(&self, frame: &mut Frame, area: Rect, tile: HomeTile, is_selected: bool) {
        let border_color = if is_selected { SELECTION_GREEN } else { CORNFLOWER_BLUE };
        let bg_color = if is_selected { LIST_HIGHLIGHT_BG } else { PANEL_BG };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color))
            .style(Style::default().bg(bg_color));

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                tile.label(),
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(tile.description(), Style::default().fg(SOFT_WHITE))),
        ];
        frame.render_widget(
            Paragraph::new(text).alignment(Alignment::Center).block(block),
            area,
        );
    }

    fn render_help_bar(&self, frame: &mut Frame, area: Rect) {
        let help = Paragraph::new(Line::from(vec![
            Span::styled("←→", Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
            Span::styled(" choose  ", Style::default().fg(MUTED_GRAY)),
            Span::styled("Enter", Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
            Span::styled(" open  ", Style::default().fg(MUTED_GRAY)),
            Span::styled("t", Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
            Span::styled(" open with guided tour  ", Style::default().fg(MUTED_GRAY)),
            Span::styled("?", Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
            Span::styled(" help  ", Style::default().fg(MUTED_GRAY)),
            Span::styled("q", Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
            Span::styled(" quit", Style::default().fg(MUTED_GRAY)),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(help, area);
    }
}

impl Default for HomeScreenComponent {
    fn default() -> Self {
        Self::new()
    }
}
