// ABOUTME: Binds a tour controller to live targets and a viewport, running measurements on tokio
// Results come back over a channel and are applied only if their generation is still current

use super::controller::TourController;
use super::domain::TourDomain;
use super::ensure::VisibilityEnsurer;
use super::error::TourResult;
use super::geometry::Rect;
use super::registry::TargetRegistry;
use super::viewport::ScrollViewport;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Finished measurement for one generation
#[derive(Debug)]
pub struct LocateOutcome {
    pub generation: u64,
    pub result: TourResult<Option<Rect>>,
}

pub struct TourSession<D> {
    controller: TourController<D>,
    registry: TargetRegistry,
    viewport: Arc<dyn ScrollViewport>,
    outcome_tx: mpsc::UnboundedSender<LocateOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<LocateOutcome>,
    in_flight: Option<JoinHandle<()>>,
}

impl<D: TourDomain> TourSession<D> {
    pub fn new(
        controller: TourController<D>,
        registry: TargetRegistry,
        viewport: Arc<dyn ScrollViewport>,
    ) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            controller,
            registry,
            viewport,
            outcome_tx,
            outcome_rx,
            in_flight: None,
        }
    }

    pub const fn controller(&self) -> &TourController<D> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut TourController<D> {
        &mut self.controller
    }

    pub const fn registry(&self) -> &TargetRegistry {
        &self.registry
    }

    /// Apply finished measurements and launch the next one; call from the host tick.
    /// Must run inside a tokio runtime.
    pub fn pump(&mut self) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.controller.apply_located(outcome.generation, outcome.result);
        }

        if !self.controller.is_open() {
            self.abort_in_flight();
            return;
        }

        let Some(request) = self.controller.take_locate_request() else {
            return;
        };
        self.abort_in_flight();

        let node = self.registry.resolve_expanded(request.target);
        let viewport = Arc::clone(&self.viewport);
        let timings = self.controller.timings().clone();
        let tx = self.outcome_tx.clone();
        debug!(
            "Locating {:?} for generation {}",
            request.target, request.generation
        );

        self.in_flight = Some(tokio::spawn(async move {
            let ensurer = VisibilityEnsurer::new(viewport.as_ref(), &timings, &request.cancel);
            let result = ensurer
                .locate(request.target, node.as_deref(), request.intent)
                .await;
            let _ = tx.send(LocateOutcome {
                generation: request.generation,
                result,
            });
        }));
    }

    /// Whether a measurement task is still running
    pub fn is_measuring(&self) -> bool {
        self.in_flight.as_ref().is_some_and(|h| !h.is_finished())
    }

    fn abort_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            if !handle.is_finished() {
                debug!("Aborting superseded measurement");
            }
            handle.abort();
        }
    }
}

impl<D> Drop for TourSession<D> {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}
