// ABOUTME: Capability traits for live UI regions and the target registry that resolves them
// The tour depends only on these traits, never on concrete view types

use super::geometry::Rect;
use super::step::TourTarget;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A renderable node whose on-screen bounding box can be queried
#[cfg_attr(test, mockall::automock)]
pub trait Measurable: Send + Sync {
    /// Bounding box in window coordinates, `None` when not mounted
    fn measure_bounding_box(&self) -> Option<Rect>;
}

/// A section that can hide its children
#[cfg_attr(test, mockall::automock)]
pub trait Collapsible: Send + Sync {
    fn is_open(&self) -> bool;
    fn set_open(&self, open: bool);
}

/// Maps logical targets to live nodes and the sections that own them
#[derive(Default, Clone)]
pub struct TargetRegistry {
    nodes: HashMap<TourTarget, Arc<dyn Measurable>>,
    owners: HashMap<TourTarget, Arc<dyn Collapsible>>,
}

impl fmt::Debug for TargetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetRegistry")
            .field("nodes", &self.nodes.keys().collect::<Vec<_>>())
            .field("owners", &self.owners.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, target: TourTarget, node: Arc<dyn Measurable>) {
        self.nodes.insert(target, node);
    }

    /// Declare that `section` must be open for `target` to have layout
    pub fn register_owner(&mut self, target: TourTarget, section: Arc<dyn Collapsible>) {
        self.owners.insert(target, section);
    }

    /// Open the section owning `target`; never closes an open section
    pub fn expand_owner(&self, target: TourTarget) {
        if let Some(section) = self.owners.get(&target) {
            if !section.is_open() {
                debug!("Expanding section owning {:?}", target);
                section.set_open(true);
            }
        }
    }

    /// Node for `target`, or `None` for untargeted or unregistered regions
    pub fn resolve(&self, target: TourTarget) -> Option<Arc<dyn Measurable>> {
        if target.is_none() {
            return None;
        }
        self.nodes.get(&target).cloned()
    }

    /// Force-expand the owning section, then resolve
    pub fn resolve_expanded(&self, target: TourTarget) -> Option<Arc<dyn Measurable>> {
        self.expand_owner(target);
        self.resolve(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_unknown_and_none_targets() {
        let mut registry = TargetRegistry::new();
        let mut node = MockMeasurable::new();
        node.expect_measure_bounding_box().returning(|| Some(Rect::new(0.0, 0.0, 4.0, 1.0)));
        registry.register(TourTarget::ClientType, Arc::new(node));

        assert!(registry.resolve(TourTarget::ClientType).is_some());
        assert!(registry.resolve(TourTarget::NoteField).is_none());
        assert!(registry.resolve(TourTarget::None).is_none());
    }

    #[test]
    fn test_expand_opens_closed_section_once() {
        let mut section = MockCollapsible::new();
        section.expect_is_open().times(1).return_const(false);
        section.expect_set_open().withf(|open| *open).times(1).return_const(());

        let mut registry = TargetRegistry::new();
        registry.register_owner(TourTarget::StockChoice, Arc::new(section));
        let _ = registry.resolve_expanded(TourTarget::StockChoice);
    }

    #[test]
    fn test_expand_leaves_open_section_alone() {
        let mut section = MockCollapsible::new();
        section.expect_is_open().return_const(true);
        section.expect_set_open().never();

        let mut registry = TargetRegistry::new();
        registry.register_owner(TourTarget::StockChoice, Arc::new(section));
        registry.expand_owner(TourTarget::StockChoice);
        registry.expand_owner(TourTarget::StockChoice);
    }
}
