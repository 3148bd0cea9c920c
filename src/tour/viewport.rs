// ABOUTME: Capability trait for the scrollable container hosting tour targets

use super::geometry::Rect;
use futures_util::future::BoxFuture;

/// A scroll container the tour can drive
pub trait ScrollViewport: Send + Sync {
    /// On-screen frame in window coordinates; shrinks while an input bar is up
    fn frame(&self) -> Option<Rect>;

    /// Current scroll offset from the top of the content
    fn offset(&self) -> f32;

    /// Largest reachable offset
    fn max_offset(&self) -> f32;

    /// Request a scroll; animated scrolls complete later and signal `scroll_end`
    fn scroll_to(&self, offset: f32, animated: bool);

    /// Resolves when the current scroll settles; resolves at once when idle
    fn scroll_end(&self) -> BoxFuture<'_, ()>;
}
