// ABOUTME: Application state - current view, home tiles, the two form screens and host navigation

use super::form_screen::FormScreen;
use crate::config::AppConfig;
use crate::models::{OrderForm, ReportForm};
use crate::tour::HostNavigator;
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    HomeScreen,
    Order,
    Report,
}

/// Home screen tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeTile {
    Order,
    Report,
}

impl HomeTile {
    pub const ALL: [HomeTile; 2] = [Self::Order, Self::Report];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Order => "Purchase order",
            Self::Report => "Visit report",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Order => "Take an order for a pharmacy or wholesaler",
            Self::Report => "Record a doctor or client visit",
        }
    }

    pub const fn view(self) -> View {
        match self {
            Self::Order => View::Order,
            Self::Report => View::Report,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HomeScreenState {
    pub selected_tile: usize,
}

impl HomeScreenState {
    pub fn selected(&self) -> HomeTile {
        HomeTile::ALL[self.selected_tile % HomeTile::ALL.len()]
    }

    pub fn select_next(&mut self) {
        self.selected_tile = (self.selected_tile + 1) % HomeTile::ALL.len();
    }

    pub fn select_prev(&mut self) {
        self.selected_tile = (self.selected_tile + HomeTile::ALL.len() - 1) % HomeTile::ALL.len();
    }
}

/// Where the tour sends the user when it closes; applied after event processing
#[derive(Debug, Default)]
pub struct Navigator {
    pending: Option<View>,
}

impl Navigator {
    pub fn take(&mut self) -> Option<View> {
        self.pending.take()
    }
}

impl HostNavigator for Navigator {
    fn return_to_entry(&mut self) {
        self.pending = Some(View::HomeScreen);
    }
}

/// What key routing needs to know about the visible form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormStatus {
    pub tour_open: bool,
    pub tour_on_last: bool,
    pub editing: bool,
}

impl FormStatus {
    fn of<D: crate::models::FormModel>(screen: &FormScreen<D>) -> Self {
        let tour = screen.tour();
        Self {
            tour_open: tour.is_open(),
            tour_on_last: tour.is_open() && tour.is_last(),
            editing: screen.editing().is_some(),
        }
    }
}

pub struct AppState {
    pub config: AppConfig,
    pub current_view: View,
    pub help_visible: bool,
    pub should_quit: bool,
    pub home_screen_state: HomeScreenState,
    pub order: FormScreen<OrderForm>,
    pub report: FormScreen<ReportForm>,
    pub navigator: Navigator,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let order = FormScreen::new(OrderForm::new(), config.role, &config);
        let report = FormScreen::new(ReportForm::new(), config.role, &config);
        Self {
            config,
            current_view: View::HomeScreen,
            help_visible: false,
            should_quit: false,
            home_screen_state: HomeScreenState::default(),
            order,
            report,
            navigator: Navigator::default(),
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn toggle_help(&mut self) {
        self.help_visible = !self.help_visible;
    }

    pub fn open_view(&mut self, view: View) {
        debug!("Switching to {:?}", view);
        if view != self.current_view {
            self.unmount_current();
        }
        self.current_view = view;
    }

    /// The form screen going away takes its tour with it
    fn unmount_current(&mut self) {
        match self.current_view {
            View::Order => self.order.close_tour(&mut self.navigator),
            View::Report => self.report.close_tour(&mut self.navigator),
            View::HomeScreen => {}
        }
        // Already navigating; the tour's own return request is moot
        self.navigator.take();
    }

    /// Open a form and start its guided tour right away
    pub fn open_with_tour(&mut self, view: View, now: Instant) {
        self.open_view(view);
        match view {
            View::Order => self.order.start_tour(now),
            View::Report => self.report.start_tour(now),
            View::HomeScreen => {}
        }
    }

    pub fn form_status(&self) -> Option<FormStatus> {
        match self.current_view {
            View::Order => Some(FormStatus::of(&self.order)),
            View::Report => Some(FormStatus::of(&self.report)),
            View::HomeScreen => None,
        }
    }

    /// Apply a navigation requested by a closing tour
    pub fn apply_navigation(&mut self) {
        if let Some(view) = self.navigator.take() {
            info!("Returning to {:?}", view);
            self.current_view = view;
        }
    }

    pub fn tick(&mut self, now: Instant) {
        match self.current_view {
            View::Order => self.order.tick(now),
            View::Report => self.report.tick(now),
            View::HomeScreen => {}
        }
        self.apply_navigation();
    }
}

pub struct App {
    pub state: AppState,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }

    pub fn tick(&mut self) {
        self.state.tick(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn test_home_tiles_wrap() {
        let mut home = HomeScreenState::default();
        assert_eq!(home.selected(), HomeTile::Order);
        home.select_prev();
        assert_eq!(home.selected(), HomeTile::Report);
        home.select_next();
        assert_eq!(home.selected(), HomeTile::Order);
    }

    #[test]
    fn test_navigator_returns_home_once() {
        let mut nav = Navigator::default();
        nav.return_to_entry();
        assert_eq!(nav.take(), Some(View::HomeScreen));
        assert_eq!(nav.take(), None);
    }

    #[test]
    fn test_open_with_tour_reports_status() {
        let mut state = AppState::new(AppConfig::default());
        assert_eq!(state.form_status(), None);

        state.open_with_tour(View::Report, Instant::now());
        assert_eq!(state.current_view, View::Report);
        let status = state.form_status().unwrap();
        assert!(status.tour_open);
        assert!(!status.tour_on_last);
        assert!(!status.editing);
    }

    #[test]
    fn test_leaving_a_form_closes_its_tour() {
        let mut state = AppState::new(AppConfig::default());
        state.open_with_tour(View::Order, Instant::now());
        state.order.tour_next(Instant::now());
        state.order.activate(Instant::now(), &mut state.navigator);
        assert!(state.order.form().client_type.is_some());

        state.open_view(View::HomeScreen);
        assert!(!state.order.tour().is_open());
        assert_eq!(state.order.form().client_type, None);
        assert_eq!(state.navigator.take(), None);
    }

    #[test]
    fn test_screens_use_configured_role() {
        let config = AppConfig {
            role: Role::Medical,
            ..AppConfig::default()
        };
        let state = AppState::new(config);
        assert_eq!(state.order.role(), Role::Medical);
        assert_eq!(state.report.role(), Role::Medical);
    }
}
