// ABOUTME: Terminal-side scroll container, layout map and section toggles backing the tour's capability traits
// The render pass and the app tick write here; measurement tasks read from other threads

use crate::tour::{Collapsible, Measurable, Point, Rect, ScrollViewport, TourTarget};
use futures_util::future::BoxFuture;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
struct ScrollState {
    frame: Option<Rect>,
    root: Point,
    content_height: f32,
    offset: f32,
    target: f32,
    layout_changed: bool,
}

impl ScrollState {
    fn max_offset(&self) -> f32 {
        let visible = self.frame.map_or(0.0, |f| f.height);
        (self.content_height - visible).max(0.0)
    }

    fn clamp(&mut self) {
        let max = self.max_offset();
        self.offset = self.offset.clamp(0.0, max);
        self.target = self.target.clamp(0.0, max);
    }
}

/// Vertically scrolling form body; animated scrolls advance one step per tick
#[derive(Debug)]
pub struct FormViewport {
    state: Mutex<ScrollState>,
    settled: Notify,
    step: f32,
}

impl FormViewport {
    pub fn new(step: f32) -> Self {
        Self {
            state: Mutex::new(ScrollState::default()),
            settled: Notify::new(),
            step: step.max(0.1),
        }
    }

    /// Record where the body is drawn this frame; flags a layout change when it moved or resized
    pub fn set_frame(&self, frame: Rect, root: Point) {
        let mut state = lock(&self.state);
        if state.frame != Some(frame) || state.root != root {
            state.frame = Some(frame);
            state.root = root;
            state.layout_changed = true;
        }
        state.clamp();
    }

    pub fn set_content_height(&self, height: f32) {
        let mut state = lock(&self.state);
        state.content_height = height;
        state.clamp();
    }

    /// Overlay root to hand to the tour, once per layout change
    pub fn take_layout_change(&self) -> Option<Point> {
        let mut state = lock(&self.state);
        if state.layout_changed {
            state.layout_changed = false;
            Some(state.root)
        } else {
            None
        }
    }

    pub fn scroll_by(&self, delta: f32) {
        let offset = self.offset() + delta;
        self.scroll_to(offset, false);
    }

    pub fn is_animating(&self) -> bool {
        let state = lock(&self.state);
        (state.target - state.offset).abs() > f32::EPSILON
    }

    /// Advance an animated scroll by one step; returns whether it is still moving
    pub fn animate(&self) -> bool {
        let moving = {
            let mut state = lock(&self.state);
            let remaining = state.target - state.offset;
            if remaining.abs() <= self.step {
                state.offset = state.target;
                false
            } else {
                state.offset += self.step.copysign(remaining);
                true
            }
        };
        if !moving {
            self.settled.notify_waiters();
        }
        moving
    }

    /// Scroll just enough to show rows `top..bottom` of the content
    pub fn reveal(&self, top: f32, bottom: f32) {
        let (offset, height) = {
            let state = lock(&self.state);
            (state.offset, state.frame.map_or(0.0, |f| f.height))
        };
        if top < offset {
            self.scroll_to(top, false);
        } else if bottom > offset + height {
            self.scroll_to(bottom - height, false);
        }
    }
}

impl ScrollViewport for FormViewport {
    fn frame(&self) -> Option<Rect> {
        lock(&self.state).frame
    }

    fn offset(&self) -> f32 {
        lock(&self.state).offset
    }

    fn max_offset(&self) -> f32 {
        lock(&self.state).max_offset()
    }

    fn scroll_to(&self, offset: f32, animated: bool) {
        let settled = {
            let mut state = lock(&self.state);
            let clamped = offset.clamp(0.0, state.max_offset()).round();
            state.target = clamped;
            if !animated {
                state.offset = clamped;
            }
            (state.target - state.offset).abs() <= f32::EPSILON
        };
        if settled {
            self.settled.notify_waiters();
        }
    }

    fn scroll_end(&self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            loop {
                let notified = self.settled.notified();
                tokio::pin!(notified);
                notified.as_mut().enable();
                if !self.is_animating() {
                    return;
                }
                notified.await;
            }
        })
    }
}

/// Content-space rectangles of the rows laid out on the last pass
#[derive(Debug, Clone, Default)]
pub struct LayoutMap {
    rows: Arc<Mutex<HashMap<TourTarget, Rect>>>,
}

impl LayoutMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole map; targets absent from `rows` are unmounted
    pub fn replace(&self, rows: HashMap<TourTarget, Rect>) {
        *lock(&self.rows) = rows;
    }

    pub fn get(&self, target: TourTarget) -> Option<Rect> {
        lock(&self.rows).get(&target).copied()
    }
}

/// A form row as the tour sees it: content rect projected through the viewport
#[derive(Debug, Clone)]
pub struct LayoutNode {
    target: TourTarget,
    layout: LayoutMap,
    viewport: Arc<FormViewport>,
}

impl LayoutNode {
    pub fn new(target: TourTarget, layout: LayoutMap, viewport: Arc<FormViewport>) -> Self {
        Self {
            target,
            layout,
            viewport,
        }
    }
}

impl Measurable for LayoutNode {
    fn measure_bounding_box(&self) -> Option<Rect> {
        let content = self.layout.get(self.target)?;
        let frame = self.viewport.frame()?;
        let offset = self.viewport.offset();
        Some(content.translate(frame.x, frame.y - offset))
    }
}

/// Open/closed flag of a collapsible section
#[derive(Debug)]
pub struct SectionToggle {
    open: AtomicBool,
}

impl SectionToggle {
    pub fn new(open: bool) -> Self {
        Self {
            open: AtomicBool::new(open),
        }
    }

    pub fn toggle(&self) {
        self.open.fetch_xor(true, Ordering::SeqCst);
    }
}

impl Collapsible for SectionToggle {
    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    fn set_open(&self, open: bool) {
        self.open.store(open, Ordering::SeqCst);
    }
}
