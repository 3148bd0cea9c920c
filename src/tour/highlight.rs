// ABOUTME: Highlight positioner - window measurements to overlay-local spotlight rectangles
// The spotlight is four dim panels around a transparent hole, no masking needed

use super::geometry::{Point, Rect};
use ratatui::layout::Rect as Cells;

/// Converts window measurements into overlay-local coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HighlightPositioner {
    /// Window position of the overlay's origin
    pub root_offset: Point,
    pub padding: f32,
}

impl HighlightPositioner {
    pub const fn new(root_offset: Point, padding: f32) -> Self {
        Self {
            root_offset,
            padding,
        }
    }

    /// Padded overlay-local rectangle for a measured node
    pub fn overlay_rect(&self, measured: Rect) -> Rect {
        let pad = self.padding;
        Rect::new(
            measured.x - self.root_offset.x - pad,
            measured.y - self.root_offset.y - pad,
            measured.width + 2.0 * pad,
            measured.height + 2.0 * pad,
        )
    }
}

/// Dimmed regions surrounding the hole
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimPanels {
    pub top: Cells,
    pub bottom: Cells,
    pub left: Cells,
    pub right: Cells,
}

impl DimPanels {
    /// Panels covering `area` minus `hole`; the hole is clipped to `area` first
    pub fn around(area: Cells, hole: Cells) -> Self {
        let hole = area.intersection(hole);
        let top_height = hole.y.saturating_sub(area.y);
        let bottom_y = hole.bottom();
        let left_width = hole.x.saturating_sub(area.x);
        let right_x = hole.right();

        Self {
            top: Cells::new(area.x, area.y, area.width, top_height),
            bottom: Cells::new(
                area.x,
                bottom_y,
                area.width,
                area.bottom().saturating_sub(bottom_y),
            ),
            left: Cells::new(area.x, hole.y, left_width, hole.height),
            right: Cells::new(right_x, hole.y, area.right().saturating_sub(right_x), hole.height),
        }
    }

    pub const fn as_array(&self) -> [Cells; 4] {
        [self.top, self.bottom, self.left, self.right]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_rect_subtracts_root_and_pads() {
        let positioner = HighlightPositioner::new(Point::new(2.0, 3.0), 1.0);
        let rect = positioner.overlay_rect(Rect::new(10.0, 10.0, 20.0, 2.0));
        assert_eq!(rect, Rect::new(7.0, 6.0, 22.0, 4.0));
    }

    #[test]
    fn test_panels_tile_area_around_hole() {
        let area = Cells::new(0, 0, 40, 20);
        let hole = Cells::new(5, 4, 10, 3);
        let panels = DimPanels::around(area, hole);

        assert_eq!(panels.top, Cells::new(0, 0, 40, 4));
        assert_eq!(panels.bottom, Cells::new(0, 7, 40, 13));
        assert_eq!(panels.left, Cells::new(0, 4, 5, 3));
        assert_eq!(panels.right, Cells::new(15, 4, 25, 3));

        let covered: u32 = panels.as_array().iter().map(|p| u32::from(p.area())).sum();
        assert_eq!(covered + u32::from(hole.area()), u32::from(area.area()));
    }

    #[test]
    fn test_panels_with_offset_area() {
        let area = Cells::new(2, 3, 20, 10);
        let panels = DimPanels::around(area, Cells::new(2, 3, 20, 2));
        assert_eq!(panels.top.height, 0);
        assert_eq!(panels.left.width, 0);
        assert_eq!(panels.right.width, 0);
        assert_eq!(panels.bottom, Cells::new(2, 5, 20, 8));
    }
}
