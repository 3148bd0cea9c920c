// ABOUTME: Contracts between the tour controller and the host's form state and navigation

use super::step::{Step, StepKey};
use crate::models::Role;

/// Form state the tour reads to decide progression and writes to roll back
pub trait TourDomain {
    /// Steps that apply to the current role and form mode
    fn catalog(&self, role: Role) -> Vec<Step>;

    /// Pure predicate: has the step's action been completed?
    fn is_satisfied(&self, key: StepKey) -> bool;

    /// Pure predicate: does the step matter given earlier choices?
    fn is_applicable(&self, key: StepKey) -> bool {
        let _ = key;
        true
    }

    /// Clear the fields the step is responsible for populating
    fn rollback(&mut self, key: StepKey);

    /// Drop everything back to the pre-tour empty form
    fn reset(&mut self);
}

/// Host callback used when the tour closes
pub trait HostNavigator {
    fn return_to_entry(&mut self);
}

/// Reset function owned by one step
pub type Rollback<F> = fn(&mut F);

/// Apply the rollback registered for `key`; returns whether one existed
pub fn apply_rollback<F>(table: &[(StepKey, Rollback<F>)], key: StepKey, form: &mut F) -> bool {
    match table.iter().find(|(owner, _)| *owner == key) {
        Some((_, rollback)) => {
            rollback(form);
            true
        }
        None => false,
    }
}
