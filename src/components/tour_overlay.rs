// ABOUTME: Guided tour overlay - dims everything but the spotlight hole and shows the step tooltip
// Untargeted or unmeasurable steps dim the whole area and center the tooltip

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::form_screen::FormScreen;
use crate::models::FormModel;
use crate::tour::{DimPanels, Step};

const GOLD: Color = Color::Rgb(255, 215, 0);
const CORNFLOWER_BLUE: Color = Color::Rgb(100, 149, 237);
const PANEL_BG: Color = Color::Rgb(30, 30, 40);
const SOFT_WHITE: Color = Color::Rgb(220, 220, 230);
const MUTED_GRAY: Color = Color::Rgb(120, 120, 140);
const ERROR_RED: Color = Color::Rgb(230, 100, 100);

const TOOLTIP_MAX_WIDTH: u16 = 52;

pub struct TourOverlayComponent;

impl TourOverlayComponent {
    pub fn new() -> Self {
        Self
    }

    /// `area` must be the region whose origin was reported as the overlay root
    pub fn render<D: FormModel>(&self, frame: &mut Frame, area: Rect, screen: &FormScreen<D>) {
        let tour = screen.tour();
        if !tour.is_open() {
            return;
        }
        let Some(step) = tour.current_step() else {
            return;
        };

        let hole = tour.highlight().and_then(|local| {
            local
                .translate(f32::from(area.x), f32::from(area.y))
                .to_cells(area)
        });

        let dim = Style::default().fg(MUTED_GRAY).add_modifier(Modifier::DIM);
        match hole {
            Some(hole) => {
                for panel in DimPanels::around(area, hole).as_array() {
                    frame.buffer_mut().set_style(panel, dim);
                }
                let border_type = if step.highlight_corner_radius > 0 {
                    BorderType::Rounded
                } else {
                    BorderType::Plain
                };
                frame.render_widget(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(border_type)
                        .border_style(Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
                    hole,
                );
            }
            None => frame.buffer_mut().set_style(area, dim),
        }

        let lines = Self::tooltip_lines(
            step,
            tour.current_index(),
            tour.steps().len(),
            tour.is_last(),
            tour.notice().map(ToString::to_string),
            hole.is_none() && screen.is_measuring(),
        );
        let tooltip = Self::tooltip_area(area, hole, &lines);
        frame.render_widget(Clear, tooltip);
        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(CORNFLOWER_BLUE))
                        .title(Span::styled(
                            format!(" {} ", step.title),
                            Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
                        ))
                        .style(Style::default().bg(PANEL_BG)),
                ),
            tooltip,
        );
    }

    fn tooltip_lines(
        step: &Step,
        index: usize,
        total: usize,
        is_last: bool,
        notice: Option<String>,
        locating: bool,
    ) -> Vec<Line<'static>> {
        let mut lines = vec![Line::from(Span::styled(step.body, Style::default().fg(SOFT_WHITE)))];
        if locating {
            lines.push(Line::from(Span::styled("Locating…", Style::default().fg(MUTED_GRAY))));
        }
        if let Some(notice) = notice {
            lines.push(Line::from(Span::styled(notice, Style::default().fg(ERROR_RED))));
        }
        let next = if is_last { "finish" } else { "next" };
        lines.push(Line::from(vec![
            Span::styled(format!("{}/{}", index + 1, total), Style::default().fg(GOLD)),
            Span::styled(
                format!("  ^N {next}  ^P back  Esc close"),
                Style::default().fg(MUTED_GRAY),
            ),
        ]));
        lines
    }

    /// Below the hole when it fits, else above, else pinned to the bottom; centered without a hole
    fn tooltip_area(area: Rect, hole: Option<Rect>, lines: &[Line<'_>]) -> Rect {
        let width = area.width.saturating_sub(4).min(TOOLTIP_MAX_WIDTH).max(1);
        let inner_width = usize::from(width.saturating_sub(2).max(1));
        let wrapped: usize = lines
            .iter()
            .map(|line| line.width().max(1).div_ceil(inner_width))
            .sum();
        let height = (wrapped as u16 + 2).min(area.height);
        let x = area.x + (area.width.saturating_sub(width)) / 2;

        let y = match hole {
            Some(hole) if hole.bottom() + height <= area.bottom() => hole.bottom(),
            Some(hole) if hole.y >= area.y + height => hole.y - height,
            Some(_) => area.bottom().saturating_sub(height),
            None => area.y + (area.height.saturating_sub(height)) / 2,
        };
        Rect::new(x, y, width, height)
    }
}

impl Default for TourOverlayComponent {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tour::StepKey;

    fn lines() -> Vec<Line<'static>> {
        let step = Step::new(StepKey::Intro, "Guided tour", "Short body");
        TourOverlayComponent::tooltip_lines(&step, 0, 5, false, None, false)
    }

    #[test]
    fn test_tooltip_goes_below_hole_when_room() {
        let area = Rect::new(0, 1, 80, 30);
        let hole = Rect::new(2, 4, 60, 5);
        let tooltip = TourOverlayComponent::tooltip_area(area, Some(hole), &lines());
        assert_eq!(tooltip.y, hole.bottom());
    }

    #[test]
    fn test_tooltip_goes_above_hole_near_bottom() {
        let area = Rect::new(0, 1, 80, 30);
        let hole = Rect::new(2, 24, 60, 6);
        let tooltip = TourOverlayComponent::tooltip_area(area, Some(hole), &lines());
        assert_eq!(tooltip.bottom(), hole.y);
    }

    #[test]
    fn test_tooltip_centered_without_hole() {
        let area = Rect::new(0, 0, 80, 24);
        let tooltip = TourOverlayComponent::tooltip_area(area, None, &lines());
        assert_eq!(tooltip.x, (80 - tooltip.width) / 2);
        assert!(tooltip.y > 0 && tooltip.bottom() < 24);
    }

    #[test]
    fn test_notice_and_counter_lines() {
        let step = Step::new(StepKey::Submit, "Save", "Save it");
        let lines = TourOverlayComponent::tooltip_lines(&step, 4, 5, true, Some("Action required".into()), true);
        assert_eq!(lines.len(), 4);
        let footer: String = lines[3].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(footer.starts_with("5/5"));
        assert!(footer.contains("finish"));
    }
}
