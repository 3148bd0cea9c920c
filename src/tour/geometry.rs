// ABOUTME: Layout-unit rectangles used for measurement and highlight math
// Coordinates are f32 and may be negative for nodes scrolled above the window

use serde::Serialize;

/// A position in window or overlay coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Zero or negative extent means the node has no layout yet
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Whether both origins lie within `tolerance` of each other
    pub fn is_near(&self, other: &Self, tolerance: f32) -> bool {
        (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.width - other.width).abs() <= tolerance
            && (self.height - other.height).abs() <= tolerance
    }

    #[must_use]
    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Snap to terminal cells, clipped to `bounds`; `None` when nothing is left
    pub fn to_cells(&self, bounds: ratatui::layout::Rect) -> Option<ratatui::layout::Rect> {
        let left = self.x.round().max(f32::from(bounds.x));
        let top = self.y.round().max(f32::from(bounds.y));
        let right = self.right().round().min(f32::from(bounds.right()));
        let bottom = self.bottom().round().min(f32::from(bounds.bottom()));
        if right <= left || bottom <= top {
            return None;
        }
        Some(ratatui::layout::Rect::new(
            left as u16,
            top as u16,
            (right - left) as u16,
            (bottom - top) as u16,
        ))
    }
}

impl From<ratatui::layout::Rect> for Rect {
    fn from(area: ratatui::layout::Rect) -> Self {
        Self::new(
            f32::from(area.x),
            f32::from(area.y),
            f32::from(area.width),
            f32::from(area.height),
        )
    }
}
