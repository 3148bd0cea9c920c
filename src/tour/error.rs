// ABOUTME: Error types for the guided tour
// None of these are fatal to the host screen; they degrade or block a step

use super::step::{StepKey, TourTarget};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TourError {
    /// Forward progress on an unsatisfied required step
    #[error("Action required: complete \"{title}\" to continue")]
    ActionRequired {
        key: StepKey,
        title: &'static str,
    },

    /// Target never produced a usable measurement
    #[error("Target {target:?} could not be measured after {attempts} attempts")]
    Unmeasurable {
        target: TourTarget,
        attempts: usize,
    },

    /// The step changed or the tour closed while work was in flight
    #[error("Superseded by a newer tour step")]
    Cancelled,
}

pub type TourResult<T> = Result<T, TourError>;
