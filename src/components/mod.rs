// ABOUTME: UI components for the TUI interface including forms, the tour overlay, and help

pub mod form_screen;
pub mod help;
pub mod home_screen;
pub mod layout;
pub mod tour_overlay;

pub use form_screen::FormScreenComponent;
pub use help::HelpComponent;
pub use home_screen::HomeScreenComponent;
pub use layout::LayoutComponent;
pub use tour_overlay::TourOverlayComponent;
