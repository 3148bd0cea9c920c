// ABOUTME: Help overlay component displaying keyboard shortcuts for forms and the guided tour

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem},
};

pub struct HelpComponent;

impl HelpComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup_area = self.centered_rect(60, 80, area);

        frame.render_widget(Clear, popup_area);

        let heading = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
        let help_items = vec![
            ListItem::new("Home:").style(heading),
            ListItem::new("  ←/→        Choose a form"),
            ListItem::new("  Enter      Open form"),
            ListItem::new("  t          Open form with the guided tour"),
            ListItem::new(""),
            ListItem::new("Forms:").style(heading),
            ListItem::new("  j/↓ k/↑    Move between fields"),
            ListItem::new("  Enter      Pick next value / expand section / save"),
            ListItem::new("  +/-        Adjust quantities"),
            ListItem::new("  Del        Clear field"),
            ListItem::new("  PgUp/PgDn  Scroll"),
            ListItem::new("  t          Start the guided tour"),
            ListItem::new("  Esc        Back to home"),
            ListItem::new(""),
            ListItem::new("Guided tour:").style(heading),
            ListItem::new("  Ctrl+N     Next step (finish on the last step)"),
            ListItem::new("  Ctrl+P     Previous step (undoes that step's input)"),
            ListItem::new("  Esc / q    Close tour and discard the form"),
            ListItem::new(""),
            ListItem::new("General:").style(heading),
            ListItem::new("  ?          Toggle this help"),
            ListItem::new("  Ctrl+C     Quit"),
        ];

        let help_list = List::new(help_items).block(
            Block::default()
                .title("Help - Press ? or Esc to close")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

        frame.render_widget(help_list, popup_area);
    }

    fn centered_rect(&self, percent_x: u16, percent_y: u16, r: Rect) -> Rect {
        let popup_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ])
            .split(r);

        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ])
            .split(popup_layout[1])[1]
    }
}

impl Default for HelpComponent {
    fn default() -> Self {
        Self::new()
    }
}
