// ABOUTME: Guided tour overlay - highlights form regions and walks the user through a script of steps
//
// Key components:
// - catalog: role/mode-dependent step lists
// - registry: logical targets to measurable nodes and owning sections
// - ensure: scrolls a target into view and waits for a stable measurement
// - highlight: window measurements to overlay-local spotlight rectangles
// - controller: the step progression state machine
// - session: runs measurements on tokio and feeds results back

pub mod catalog;
pub mod config;
pub mod controller;
pub mod domain;
pub mod ensure;
pub mod error;
pub mod geometry;
pub mod highlight;
pub mod registry;
pub mod session;
pub mod step;
pub mod viewport;

pub use catalog::{order_catalog, report_catalog, ReportMode};
pub use config::TourTimings;
pub use controller::{AdvanceReason, LocateRequest, TourController, TourEvent, TourState};
pub use domain::{HostNavigator, Rollback, TourDomain};
pub use ensure::{CancelFlag, VisibilityEnsurer};
pub use error::{TourError, TourResult};
pub use geometry::{Point, Rect};
pub use highlight::{DimPanels, HighlightPositioner};
pub use registry::{Collapsible, Measurable, TargetRegistry};
pub use session::{LocateOutcome, TourSession};
pub use step::{ScrollIntent, Settle, Step, StepKey, TourTarget};
pub use viewport::ScrollViewport;
