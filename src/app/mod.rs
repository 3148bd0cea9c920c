// ABOUTME: Main application structure and state management for the TUI

pub mod events;
pub mod form_screen;
pub mod state;
pub mod viewport;

pub use events::{AppEvent, EventHandler};
pub use form_screen::{FormScreen, LaidOutRow};
pub use state::{App, AppState, FormStatus, HomeTile, Navigator, View};
pub use viewport::{FormViewport, LayoutMap, LayoutNode, SectionToggle};
