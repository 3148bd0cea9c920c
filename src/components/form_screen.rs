// ABOUTME: Form screen component - renders rows into an offscreen content buffer and blits the scrolled slice
// Also reports the body frame and overlay root to the viewport every frame

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
    Frame,
};

use crate::app::form_screen::{FormScreen, LaidOutRow};
use crate::models::{FormModel, RowKind};
use crate::tour::{Point, ScrollViewport};

const CORNFLOWER_BLUE: Color = Color::Rgb(100, 149, 237);
const GOLD: Color = Color::Rgb(255, 215, 0);
const SELECTION_GREEN: Color = Color::Rgb(100, 200, 100);
const PANEL_BG: Color = Color::Rgb(30, 30, 40);
const LIST_HIGHLIGHT_BG: Color = Color::Rgb(40, 40, 60);
const SOFT_WHITE: Color = Color::Rgb(220, 220, 230);
const MUTED_GRAY: Color = Color::Rgb(120, 120, 140);
const ERROR_RED: Color = Color::Rgb(230, 100, 100);

pub struct FormScreenComponent;

impl FormScreenComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render<D: FormModel>(&self, frame: &mut Frame, area: Rect, screen: &FormScreen<D>) {
        let input_height = if screen.editing().is_some() { 3 } else { 0 };
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),            // Title
                Constraint::Min(0),               // Scroll body
                Constraint::Length(input_height), // Input bar while typing
                Constraint::Length(1),            // Status
            ])
            .split(area);

        screen.viewport().set_frame(
            layout[1].into(),
            Point::new(f32::from(area.x), f32::from(area.y)),
        );

        self.render_title(frame, layout[0], screen);
        self.render_body(frame, layout[1], screen);
        if input_height > 0 {
            self.render_input_bar(frame, layout[2], screen);
        }
        self.render_status(frame, layout[3], screen);
    }

    fn render_title<D: FormModel>(&self, frame: &mut Frame, area: Rect, screen: &FormScreen<D>) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(CORNFLOWER_BLUE))
            .style(Style::default().bg(PANEL_BG));
        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                screen.form().title(),
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  ({})", screen.role()), Style::default().fg(MUTED_GRAY)),
        ]))
        .block(block);
        frame.render_widget(title, area);
    }

    fn render_body<D: FormModel>(&self, frame: &mut Frame, area: Rect, screen: &FormScreen<D>) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let content_height = screen.rows().last().map_or(0, LaidOutRow::bottom);
        let mut content = Buffer::empty(Rect::new(0, 0, area.width, content_height));

        for (index, laid_out) in screen.rows().iter().enumerate() {
            let rect = Rect::new(0, laid_out.y, area.width, laid_out.row.height);
            let focused = index == screen.focus();
            let editing = screen.editing() == Some(laid_out.row.target);
            Self::render_row(&mut content, rect, laid_out, focused, editing, screen);
        }

        let offset = screen.viewport().offset().round().max(0.0) as u16;
        let buffer = frame.buffer_mut();
        for dy in 0..area.height {
            let source_y = offset.saturating_add(dy);
            if source_y >= content_height {
                break;
            }
            for dx in 0..area.width {
                *buffer.get_mut(area.x + dx, area.y + dy) = content.get(dx, source_y).clone();
            }
        }
    }

    fn render_row<D: FormModel>(
        buf: &mut Buffer,
        rect: Rect,
        laid_out: &LaidOutRow,
        focused: bool,
        editing: bool,
        screen: &FormScreen<D>,
    ) {
        let row = &laid_out.row;
        let highlight = if focused { LIST_HIGHLIGHT_BG } else { Color::Reset };

        if let RowKind::Header(id) = row.kind {
            let (marker, hint) = if screen.is_section_open(id) {
                ("▾ ", "")
            } else {
                ("▸ ", "  (Enter to expand)")
            };
            Paragraph::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(GOLD)),
                Span::styled(row.label, Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
                Span::styled(hint, Style::default().fg(MUTED_GRAY)),
            ]))
            .style(Style::default().bg(highlight))
            .render(rect, buf);
            return;
        }

        let border = if editing {
            GOLD
        } else if focused {
            SELECTION_GREEN
        } else {
            CORNFLOWER_BLUE
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border))
            .title(Span::styled(row.label, Style::default().fg(SOFT_WHITE)))
            .style(Style::default().bg(highlight));

        let mut value = row.value.clone();
        if editing {
            value.push('▏');
        }
        let style = match row.kind {
            RowKind::Button => Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
            RowKind::Text if row.value.is_empty() && !editing => Style::default().fg(MUTED_GRAY),
            _ => Style::default().fg(SOFT_WHITE),
        };
        let alignment = if row.kind == RowKind::Button {
            Alignment::Center
        } else {
            Alignment::Left
        };
        let text = if row.kind == RowKind::Text && value.is_empty() {
            "Press Enter to type".to_string()
        } else {
            value
        };

        Paragraph::new(text)
            .style(style)
            .alignment(alignment)
            .wrap(Wrap { trim: false })
            .block(block)
            .render(rect, buf);
    }

    fn render_input_bar<D: FormModel>(&self, frame: &mut Frame, area: Rect, screen: &FormScreen<D>) {
        let text = screen
            .editing()
            .and_then(|target| screen.rows().iter().find(|r| r.row.target == target))
            .map(|r| r.row.value.clone())
            .unwrap_or_default();
        let input = Paragraph::new(format!("{text}▏"))
            .style(Style::default().fg(SOFT_WHITE))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(GOLD))
                    .title(" Typing - Enter to finish "),
            );
        frame.render_widget(input, area);
    }

    fn render_status<D: FormModel>(&self, frame: &mut Frame, area: Rect, screen: &FormScreen<D>) {
        let line = match screen.status() {
            Some(status) if status == "Saved" => {
                Line::from(Span::styled(format!(" ✓ {status}"), Style::default().fg(SELECTION_GREEN)))
            }
            Some(status) => Line::from(Span::styled(format!(" ✗ {status}"), Style::default().fg(ERROR_RED))),
            None => Line::from(Span::styled(
                " ↑↓ move  Enter select  +/- adjust  Del clear  t tour  Esc back",
                Style::default().fg(MUTED_GRAY),
            )),
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}

impl Default for FormScreenComponent {
    fn default() -> Self {
        Self::new()
    }
}
