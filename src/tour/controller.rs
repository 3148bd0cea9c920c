// ABOUTME: Step progression controller - the guided tour state machine
//
// States are closed and active(index). Manual next is gated by required steps,
// prev rolls back the step being left, satisfied steps auto-advance after a
// debounce, and inapplicable steps are skipped. Each step entry bumps a
// generation so late highlight results for an abandoned step are dropped.

use super::catalog::clamp_index;
use super::config::TourTimings;
use super::domain::{HostNavigator, TourDomain};
use super::ensure::CancelFlag;
use super::error::{TourError, TourResult};
use super::geometry::{Point, Rect};
use super::highlight::HighlightPositioner;
use super::step::{ScrollIntent, Step, StepKey, TourTarget};
use crate::models::Role;
use std::marker::PhantomData;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Why the active step changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceReason {
    Manual,
    Auto,
    Skip,
    Back,
    /// The catalog was recomputed under the active step
    Reconciled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TourEvent {
    Started {
        first: StepKey,
    },
    StepChanged {
        from: StepKey,
        to: StepKey,
        reason: AdvanceReason,
    },
    Blocked(TourError),
    Finished,
    Closed,
}

/// Process-local tour state owned by the hosting screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TourState {
    pub is_open: bool,
    pub current_index: usize,
    /// Overlay-local spotlight; `None` while measuring or when unmeasurable
    pub highlight_rect: Option<Rect>,
}

/// Work order for the visibility ensurer
#[derive(Debug, Clone)]
pub struct LocateRequest {
    pub generation: u64,
    pub target: TourTarget,
    pub intent: ScrollIntent,
    pub cancel: CancelFlag,
}

#[derive(Debug, Clone, Copy)]
struct PendingAdvance {
    key: StepKey,
    due: Instant,
    reason: AdvanceReason,
}

pub struct TourController<D> {
    role: Role,
    timings: TourTimings,
    steps: Vec<Step>,
    state: TourState,
    positioner: HighlightPositioner,
    pending: Option<PendingAdvance>,
    last_satisfied: bool,
    generation: u64,
    cancel: CancelFlag,
    locate: Option<ScrollIntent>,
    notice: Option<TourError>,
    run_id: Option<Uuid>,
    _domain: PhantomData<fn(&D)>,
}

impl<D: TourDomain> TourController<D> {
    pub fn new(role: Role, timings: TourTimings, form: &D) -> Self {
        let positioner = HighlightPositioner::new(Point::default(), timings.highlight_padding);
        Self {
            role,
            steps: form.catalog(role),
            timings,
            state: TourState::default(),
            positioner,
            pending: None,
            last_satisfied: false,
            generation: 0,
            cancel: CancelFlag::new(),
            locate: None,
            notice: None,
            run_id: None,
            _domain: PhantomData,
        }
    }

    // === Queries ===

    pub const fn state(&self) -> &TourState {
        &self.state
    }

    pub const fn is_open(&self) -> bool {
        self.state.is_open
    }

    pub const fn current_index(&self) -> usize {
        self.state.current_index
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.steps.get(self.state.current_index)
    }

    pub fn current_key(&self) -> Option<StepKey> {
        self.current_step().map(|s| s.key)
    }

    pub const fn highlight(&self) -> Option<Rect> {
        self.state.highlight_rect
    }

    /// User-facing message from the last blocked action
    pub const fn notice(&self) -> Option<&TourError> {
        self.notice.as_ref()
    }

    pub fn is_last(&self) -> bool {
        self.state.current_index + 1 >= self.steps.len()
    }

    pub const fn role(&self) -> Role {
        self.role
    }

    pub const fn timings(&self) -> &TourTimings {
        &self.timings
    }

    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether an auto-advance or skip is waiting for its debounce
    pub const fn has_pending_advance(&self) -> bool {
        self.pending.is_some()
    }

    // === Transitions ===

    /// closed -> active(0), scrolled to the top of the form
    pub fn start(&mut self, form: &D, now: Instant) -> TourEvent {
        self.steps = form.catalog(self.role);
        self.state = TourState {
            is_open: true,
            current_index: 0,
            highlight_rect: None,
        };
        let run_id = Uuid::new_v4();
        self.run_id = Some(run_id);
        info!(run_id = %run_id, steps = self.steps.len(), "Guided tour started");

        self.enter_step(form, now, Some(ScrollIntent::TopOfForm));
        TourEvent::Started {
            first: self.current_key().unwrap_or(StepKey::Intro),
        }
    }

    /// active(i) -> active(i + 1), unless the current step is required and unsatisfied
    pub fn next(&mut self, form: &D, now: Instant) -> Option<TourEvent> {
        let step = self.active_step()?;
        if step.required && form.is_applicable(step.key) && !form.is_satisfied(step.key) {
            let blocked = TourError::ActionRequired {
                key: step.key,
                title: step.title,
            };
            debug!("Next blocked on {:?}", step.key);
            self.notice = Some(blocked.clone());
            return Some(TourEvent::Blocked(blocked));
        }
        self.advance(form, now, AdvanceReason::Manual)
    }

    /// active(i) -> active(i - 1), rolling back what step i populated
    pub fn prev(&mut self, form: &mut D, now: Instant) -> Option<TourEvent> {
        let leaving = self.active_step()?.key;
        let index = self.state.current_index;
        if index == 0 {
            return None;
        }

        // Land on the nearest earlier step that still applies
        let mut dest = index - 1;
        while dest > 0 && !form.is_applicable(self.steps[dest].key) {
            dest -= 1;
        }
        let dest_key = self.steps[dest].key;

        form.rollback(leaving);
        self.steps = form.catalog(self.role);
        self.state.current_index = self
            .steps
            .iter()
            .position(|s| s.key == dest_key)
            .unwrap_or_else(|| clamp_index(dest, self.steps.len()));

        self.enter_step(form, now, None);
        Some(TourEvent::StepChanged {
            from: leaving,
            to: self.current_key().unwrap_or(dest_key),
            reason: AdvanceReason::Back,
        })
    }

    /// Close at any index: reset staged form state and return the host to its entry point
    pub fn close(&mut self, form: &mut D, navigator: &mut dyn HostNavigator) -> Option<TourEvent> {
        if !self.state.is_open {
            return None;
        }
        info!(run_id = ?self.run_id, index = self.state.current_index, "Guided tour closed");
        self.teardown(form, navigator);
        Some(TourEvent::Closed)
    }

    /// Like `close`, reported as a completion when on the last step
    pub fn finish(&mut self, form: &mut D, navigator: &mut dyn HostNavigator) -> Option<TourEvent> {
        if !self.is_last() {
            return self.close(form, navigator);
        }
        if !self.state.is_open {
            return None;
        }
        info!(run_id = ?self.run_id, "Guided tour finished");
        self.teardown(form, navigator);
        Some(TourEvent::Finished)
    }

    /// React to a form change: reconcile the catalog and arm auto-advance on a
    /// false -> true flip of the active step's predicate
    pub fn observe(&mut self, form: &D, now: Instant) -> Option<TourEvent> {
        let reconciled = self.reconcile(form, now);
        if !self.state.is_open {
            return reconciled;
        }
        let step = self.current_step()?.clone();

        if !form.is_applicable(step.key) {
            if self.pending.is_none() {
                self.schedule(step.key, now + self.timings.auto_skip_delay, AdvanceReason::Skip);
            }
            return reconciled;
        }

        let satisfied = form.is_satisfied(step.key);
        if satisfied && !self.last_satisfied && step.auto_advances() {
            let delay = self.timings.advance_delay(step.settle);
            self.schedule(step.key, now + delay, AdvanceReason::Auto);
        } else if !satisfied {
            if let Some(p) = self.pending {
                if p.key == step.key && p.reason == AdvanceReason::Auto {
                    debug!("Auto-advance for {:?} withdrawn", step.key);
                    self.pending = None;
                }
            }
        }
        self.last_satisfied = satisfied;
        reconciled
    }

    /// Fire a due auto-advance or skip
    pub fn tick(&mut self, form: &D, now: Instant) -> Option<TourEvent> {
        if !self.state.is_open {
            return None;
        }
        let pending = self.pending?;
        if pending.due > now {
            return None;
        }
        self.pending = None;

        let step = self.current_step()?;
        if step.key != pending.key {
            return None;
        }
        let still_due = match pending.reason {
            AdvanceReason::Skip => !form.is_applicable(step.key),
            _ => form.is_satisfied(step.key),
        };
        if !still_due {
            return None;
        }
        self.advance(form, now, pending.reason)
    }

    // === Highlight bookkeeping ===

    /// Root offset moved (mount, resize, input bar); measurements are stale
    pub fn set_root_offset(&mut self, root: Point) {
        if self.positioner.root_offset != root {
            self.positioner.root_offset = root;
            self.relayout();
        }
    }

    /// Re-measure the active target after a layout-affecting event
    pub fn relayout(&mut self) {
        if self.state.is_open {
            self.begin_generation();
            let intent = self.current_step().map_or(ScrollIntent::IntoList, |s| s.scroll_intent);
            self.locate.get_or_insert(intent);
        }
    }

    /// Next measurement to run, if the active step needs one
    pub fn take_locate_request(&mut self) -> Option<LocateRequest> {
        if !self.state.is_open {
            self.locate = None;
            return None;
        }
        let intent = self.locate.take()?;
        let step = self.current_step()?;
        Some(LocateRequest {
            generation: self.generation,
            target: step.target,
            intent,
            cancel: self.cancel.clone(),
        })
    }

    /// Accept a measurement; stale generations are ignored
    pub fn apply_located(&mut self, generation: u64, result: TourResult<Option<Rect>>) -> bool {
        if !self.state.is_open || generation != self.generation {
            debug!("Dropping stale measurement for generation {}", generation);
            return false;
        }
        match result {
            Ok(rect) => {
                self.state.highlight_rect = rect.map(|r| self.positioner.overlay_rect(r));
            }
            Err(TourError::Cancelled) => return false,
            Err(err) => {
                warn!("{}; showing step without a spotlight", err);
                self.state.highlight_rect = None;
            }
        }
        true
    }

    // === Internals ===

    fn active_step(&self) -> Option<&Step> {
        if self.state.is_open {
            self.current_step()
        } else {
            None
        }
    }

    fn advance(&mut self, form: &D, now: Instant, reason: AdvanceReason) -> Option<TourEvent> {
        let from = self.active_step()?.key;
        if self.is_last() {
            return None;
        }
        self.state.current_index += 1;
        self.enter_step(form, now, None);
        let to = self.current_key()?;
        debug!("Tour step {:?} -> {:?} ({:?})", from, to, reason);
        Some(TourEvent::StepChanged { from, to, reason })
    }

    fn enter_step(&mut self, form: &D, now: Instant, intent: Option<ScrollIntent>) {
        self.notice = None;
        self.pending = None;
        self.state.highlight_rect = None;
        self.begin_generation();

        let Some(step) = self.current_step() else {
            return;
        };
        let key = step.key;
        let default_intent = step.scroll_intent;
        self.locate = Some(intent.unwrap_or(default_intent));
        self.last_satisfied = form.is_satisfied(key);

        if !form.is_applicable(key) {
            debug!("Step {:?} does not apply, skipping", key);
            self.schedule(key, now + self.timings.auto_skip_delay, AdvanceReason::Skip);
        }
    }

    /// Recompute the catalog; keep the active step when it survives, else clamp
    fn reconcile(&mut self, form: &D, now: Instant) -> Option<TourEvent> {
        let steps = form.catalog(self.role);
        if steps == self.steps {
            return None;
        }
        let previous = self.current_key();
        self.steps = steps;

        let index = previous
            .and_then(|key| self.steps.iter().position(|s| s.key == key))
            .unwrap_or_else(|| clamp_index(self.state.current_index, self.steps.len()));
        self.state.current_index = index;

        if !self.state.is_open {
            return None;
        }
        let current = self.current_key()?;
        match previous {
            Some(from) if from != current => {
                debug!("Catalog changed under {:?}, now on {:?}", from, current);
                self.enter_step(form, now, None);
                Some(TourEvent::StepChanged {
                    from,
                    to: current,
                    reason: AdvanceReason::Reconciled,
                })
            }
            _ => None,
        }
    }

    fn schedule(&mut self, key: StepKey, due: Instant, reason: AdvanceReason) {
        debug!("Scheduling {:?} for {:?}", reason, key);
        self.pending = Some(PendingAdvance { key, due, reason });
    }

    /// Supersede in-flight measurement work
    fn begin_generation(&mut self) {
        self.cancel.cancel();
        self.cancel = CancelFlag::new();
        self.generation += 1;
    }

    fn teardown(&mut self, form: &mut D, navigator: &mut dyn HostNavigator) {
        self.begin_generation();
        self.state = TourState::default();
        self.pending = None;
        self.notice = None;
        self.locate = None;
        self.last_satisfied = false;
        self.run_id = None;

        form.reset();
        self.steps = form.catalog(self.role);
        navigator.return_to_entry();
    }
}
