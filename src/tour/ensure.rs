// ABOUTME: Visibility ensurer - scrolls a target into view and waits for a stable measurement
//
// Every scroll and measurement is awaited in sequence. Scroll waits race the
// viewport's scroll-end signal against a fixed timeout, and the whole pass
// checks a cancellation flag between suspension points.

use super::config::TourTimings;
use super::error::{TourError, TourResult};
use super::geometry::Rect;
use super::registry::Measurable;
use super::step::{ScrollIntent, TourTarget};
use super::viewport::ScrollViewport;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Cooperative cancellation shared between a step and its in-flight work
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn check(&self) -> TourResult<()> {
        if self.is_cancelled() {
            Err(TourError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Drives one viewport until a target is visible and measured
pub struct VisibilityEnsurer<'a> {
    viewport: &'a dyn ScrollViewport,
    timings: &'a TourTimings,
    cancel: &'a CancelFlag,
}

impl<'a> VisibilityEnsurer<'a> {
    pub const fn new(
        viewport: &'a dyn ScrollViewport,
        timings: &'a TourTimings,
        cancel: &'a CancelFlag,
    ) -> Self {
        Self {
            viewport,
            timings,
            cancel,
        }
    }

    /// Apply the scroll anchor, center the target, then return its settled
    /// window rectangle. Untargeted steps resolve to `Ok(None)`.
    pub async fn locate(
        &self,
        target: TourTarget,
        node: Option<&dyn Measurable>,
        intent: ScrollIntent,
    ) -> TourResult<Option<Rect>> {
        self.cancel.check()?;
        self.apply_anchor(intent).await?;

        if target.is_none() {
            return Ok(None);
        }
        let Some(node) = node else {
            debug!("Target {:?} is not registered", target);
            return Err(TourError::Unmeasurable {
                target,
                attempts: 0,
            });
        };

        self.center(target, node).await?;
        self.stabilize(target, node).await.map(Some)
    }

    async fn apply_anchor(&self, intent: ScrollIntent) -> TourResult<()> {
        let offset = match intent {
            ScrollIntent::TopOfForm => 0.0,
            ScrollIntent::ToBottom => self.viewport.max_offset(),
            ScrollIntent::IntoList => return Ok(()),
        };
        if (self.viewport.offset() - offset).abs() > f32::EPSILON {
            self.viewport.scroll_to(offset, true);
            self.wait_for_scroll().await;
        }
        self.cancel.check()
    }

    /// Scroll until the target sits near the vertical center of the frame
    async fn center(&self, target: TourTarget, node: &dyn Measurable) -> TourResult<()> {
        let mut misses = 0;

        for iteration in 0..self.timings.max_scroll_iterations {
            self.cancel.check()?;

            let Some(rect) = measure(node) else {
                misses += 1;
                debug!("No layout for {:?} (attempt {})", target, iteration + 1);
                tokio::time::sleep(self.timings.settle_interval).await;
                continue;
            };
            misses = 0;

            let Some(frame) = self.viewport.frame() else {
                break;
            };

            let relative = rect.y - frame.y;
            let ideal = ((frame.height - rect.height) / 2.0).max(self.timings.min_top_margin);
            let delta = relative - ideal;
            if delta.abs() <= self.timings.scroll_tolerance {
                break;
            }

            let current = self.viewport.offset();
            let desired = (current + delta).clamp(0.0, self.viewport.max_offset());
            if (desired - current).abs() <= self.timings.scroll_tolerance {
                // Already pinned against an edge of the content
                break;
            }

            debug!(
                "Scrolling {:?} from {:.1} to {:.1} (pass {})",
                target,
                current,
                desired,
                iteration + 1
            );
            self.viewport.scroll_to(desired, true);
            self.wait_for_scroll().await;
        }

        if misses >= self.timings.max_scroll_iterations {
            return Err(TourError::Unmeasurable {
                target,
                attempts: misses,
            });
        }
        Ok(())
    }

    /// Sample until consecutive measurements agree, to skip mid-animation frames
    async fn stabilize(&self, target: TourTarget, node: &dyn Measurable) -> TourResult<Rect> {
        let mut last: Option<Rect> = None;
        let mut run = 0;

        for _ in 0..self.timings.stability_attempts {
            self.cancel.check()?;
            tokio::time::sleep(self.timings.settle_interval).await;
            self.cancel.check()?;

            match measure(node) {
                Some(rect) => {
                    run = match last {
                        Some(prev) if prev.is_near(&rect, self.timings.stability_tolerance) => run + 1,
                        _ => 1,
                    };
                    last = Some(rect);
                    if run >= self.timings.required_stable_reads {
                        return Ok(rect);
                    }
                }
                None => {
                    run = 0;
                    last = None;
                }
            }
        }

        match last {
            Some(rect) => {
                warn!("Measurement of {:?} never settled, using last sample", target);
                Ok(rect)
            }
            None => Err(TourError::Unmeasurable {
                target,
                attempts: self.timings.stability_attempts,
            }),
        }
    }

    async fn wait_for_scroll(&self) {
        tokio::select! {
            () = self.viewport.scroll_end() => {}
            () = tokio::time::sleep(self.timings.scroll_timeout) => {
                debug!("Scroll end not signalled within {:?}", self.timings.scroll_timeout);
            }
        }
    }
}

fn measure(node: &dyn Measurable) -> Option<Rect> {
    node.measure_bounding_box().filter(|rect| !rect.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tour::registry::MockMeasurable;
    use futures_util::future::BoxFuture;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use tokio::time::{Duration, Instant};

    struct FakeScroller {
        offset: Mutex<f32>,
        frame: Rect,
        max: f32,
        signals_end: bool,
    }

    impl FakeScroller {
        fn new(signals_end: bool) -> Arc<Self> {
            Arc::new(Self {
                offset: Mutex::new(0.0),
                frame: Rect::new(0.0, 2.0, 80.0, 20.0),
                max: 200.0,
                signals_end,
            })
        }
    }

    impl ScrollViewport for FakeScroller {
        fn frame(&self) -> Option<Rect> {
            Some(self.frame)
        }

        fn offset(&self) -> f32 {
            *self.offset.lock().unwrap()
        }

        fn max_offset(&self) -> f32 {
            self.max
        }

        fn scroll_to(&self, offset: f32, _animated: bool) {
            *self.offset.lock().unwrap() = offset.clamp(0.0, self.max);
        }

        fn scroll_end(&self) -> BoxFuture<'_, ()> {
            if self.signals_end {
                Box::pin(async {})
            } else {
                Box::pin(futures_util::future::pending())
            }
        }
    }

    /// A row laid out at `content_y` inside the scroller's content
    struct Row {
        scroller: Arc<FakeScroller>,
        content_y: f32,
    }

    impl Measurable for Row {
        fn measure_bounding_box(&self) -> Option<Rect> {
            let frame = self.scroller.frame;
            Some(Rect::new(
                0.0,
                frame.y + self.content_y - self.scroller.offset(),
                40.0,
                3.0,
            ))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_scrolls_far_target_to_center() {
        let scroller = FakeScroller::new(true);
        let row = Row {
            scroller: scroller.clone(),
            content_y: 120.0,
        };
        let timings = TourTimings::default();
        let cancel = CancelFlag::new();
        let ensurer = VisibilityEnsurer::new(scroller.as_ref(), &timings, &cancel);

        let rect = ensurer
            .locate(TourTarget::QuantityField, Some(&row), ScrollIntent::IntoList)
            .await
            .unwrap()
            .unwrap();

        let ideal = (20.0 - 3.0) / 2.0;
        assert!((rect.y - (2.0 + ideal)).abs() <= timings.scroll_tolerance);
        assert!(scroller.offset() > 100.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_top_target_stays_pinned_without_extra_scrolls() {
        let scroller = FakeScroller::new(true);
        let row = Row {
            scroller: scroller.clone(),
            content_y: 1.0,
        };
        let timings = TourTimings::default();
        let cancel = CancelFlag::new();
        let ensurer = VisibilityEnsurer::new(scroller.as_ref(), &timings, &cancel);

        let rect = ensurer
            .locate(TourTarget::ClientType, Some(&row), ScrollIntent::TopOfForm)
            .await
            .unwrap();

        assert_eq!(rect, Some(Rect::new(0.0, 3.0, 40.0, 3.0)));
        assert!(scroller.offset().abs() < f32::EPSILON);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_scroll_end_falls_back_to_timeout() {
        let scroller = FakeScroller::new(false);
        let row = Row {
            scroller: scroller.clone(),
            content_y: 90.0,
        };
        let timings = TourTimings::default();
        let cancel = CancelFlag::new();
        let ensurer = VisibilityEnsurer::new(scroller.as_ref(), &timings, &cancel);

        let started = Instant::now();
        let rect = ensurer
            .locate(TourTarget::NoteField, Some(&row), ScrollIntent::IntoList)
            .await
            .unwrap();

        assert!(rect.is_some());
        assert!(started.elapsed() >= Duration::from_millis(900));
    }

    #[tokio::test(start_paused = true)]
    async fn test_null_measurements_give_up_after_three_attempts() {
        let scroller = FakeScroller::new(true);
        let mut node = MockMeasurable::new();
        node.expect_measure_bounding_box().times(3).returning(|| None);

        let timings = TourTimings::default();
        let cancel = CancelFlag::new();
        let ensurer = VisibilityEnsurer::new(scroller.as_ref(), &timings, &cancel);

        let result = ensurer
            .locate(TourTarget::StockChoice, Some(&node), ScrollIntent::IntoList)
            .await;

        assert_eq!(
            result,
            Err(TourError::Unmeasurable {
                target: TourTarget::StockChoice,
                attempts: 3
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_sized_node_is_a_miss() {
        let scroller = FakeScroller::new(true);
        let mut node = MockMeasurable::new();
        node.expect_measure_bounding_box()
            .returning(|| Some(Rect::new(5.0, 5.0, 0.0, 0.0)));

        let timings = TourTimings::default();
        let cancel = CancelFlag::new();
        let ensurer = VisibilityEnsurer::new(scroller.as_ref(), &timings, &cancel);

        let result = ensurer
            .locate(TourTarget::ProductPicker, Some(&node), ScrollIntent::IntoList)
            .await;
        assert!(matches!(result, Err(TourError::Unmeasurable { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_animation_to_settle() {
        let scroller = FakeScroller::new(true);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut node = MockMeasurable::new();
        // Drifts for the first few samples, then holds still
        node.expect_measure_bounding_box().returning(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst) as f32;
            Some(Rect::new(0.0, 10.0 + (5.0 - n).max(0.0) * 2.0, 30.0, 2.0))
        });

        let timings = TourTimings {
            scroll_tolerance: 100.0,
            ..TourTimings::default()
        };
        let cancel = CancelFlag::new();
        let ensurer = VisibilityEnsurer::new(scroller.as_ref(), &timings, &cancel);

        let rect = ensurer
            .locate(TourTarget::DoctorPicker, Some(&node), ScrollIntent::IntoList)
            .await
            .unwrap()
            .unwrap();

        assert!((rect.y - 10.0).abs() < f32::EPSILON);
        assert!(calls.load(Ordering::SeqCst) >= 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_pass_stops_early() {
        let scroller = FakeScroller::new(true);
        let mut node = MockMeasurable::new();
        node.expect_measure_bounding_box().never();

        let timings = TourTimings::default();
        let cancel = CancelFlag::new();
        cancel.cancel();
        let ensurer = VisibilityEnsurer::new(scroller.as_ref(), &timings, &cancel);

        let result = ensurer
            .locate(TourTarget::ClientPicker, Some(&node), ScrollIntent::IntoList)
            .await;
        assert_eq!(result, Err(TourError::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_untargeted_step_only_applies_anchor() {
        let scroller = FakeScroller::new(true);
        scroller.scroll_to(50.0, false);
        let timings = TourTimings::default();
        let cancel = CancelFlag::new();
        let ensurer = VisibilityEnsurer::new(scroller.as_ref(), &timings, &cancel);

        let result = ensurer.locate(TourTarget::None, None, ScrollIntent::TopOfForm).await;
        assert_eq!(result, Ok(None));
        assert!(scroller.offset().abs() < f32::EPSILON);
    }
}
