// ABOUTME: Event handling system for keyboard input and app actions

use crate::app::{
    form_screen::FormScreen,
    state::{AppState, View},
};
use crate::models::FormModel;
use crate::tour::HostNavigator;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;
use tracing::info;

/// Rows moved by PageUp/PageDown
const PAGE_ROWS: f32 = 8.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    ToggleHelp,
    // Home screen
    HomeNext,
    HomePrev,
    OpenSelected { with_tour: bool },
    BackHome,
    // Form editing
    FocusNext,
    FocusPrev,
    Activate,
    Increment,
    Decrement,
    ClearField,
    ScrollUp,
    ScrollDown,
    InputChar(char),
    InputBackspace,
    InputDone,
    // Guided tour
    StartTour,
    TourNext,
    TourPrev,
    TourClose,
    TourFinish,
}

pub struct EventHandler;

impl EventHandler {
    pub fn handle_key_event(key_event: KeyEvent, state: &mut AppState) -> Option<AppEvent> {
        if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c') {
            return Some(AppEvent::Quit);
        }

        if state.help_visible {
            return match key_event.code {
                KeyCode::Char('?') | KeyCode::Esc => Some(AppEvent::ToggleHelp),
                _ => None,
            };
        }

        match state.form_status() {
            None => Self::handle_home_keys(key_event),
            Some(status) if status.editing && status.tour_open => {
                Self::handle_tour_chords(key_event, status.tour_on_last).or_else(|| Self::handle_input_keys(key_event))
            }
            Some(status) if status.editing => Self::handle_input_keys(key_event),
            Some(status) if status.tour_open => {
                Self::handle_tour_keys(key_event, status.tour_on_last).or_else(|| Self::handle_form_keys(key_event))
            }
            Some(_) => Self::handle_form_keys(key_event),
        }
    }

    fn handle_home_keys(key_event: KeyEvent) -> Option<AppEvent> {
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(AppEvent::Quit),
            KeyCode::Char('?') => Some(AppEvent::ToggleHelp),
            KeyCode::Right | KeyCode::Down | KeyCode::Char('l') | KeyCode::Char('j') | KeyCode::Tab => {
                Some(AppEvent::HomeNext)
            }
            KeyCode::Left | KeyCode::Up | KeyCode::Char('h') | KeyCode::Char('k') | KeyCode::BackTab => {
                Some(AppEvent::HomePrev)
            }
            KeyCode::Enter => Some(AppEvent::OpenSelected { with_tour: false }),
            KeyCode::Char('t') => Some(AppEvent::OpenSelected { with_tour: true }),
            _ => None,
        }
    }

    /// Keys reserved by an open tour; anything else still edits the form
    fn handle_tour_keys(key_event: KeyEvent, on_last: bool) -> Option<AppEvent> {
        let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
        match key_event.code {
            KeyCode::Char('n') if ctrl => Some(if on_last {
                AppEvent::TourFinish
            } else {
                AppEvent::TourNext
            }),
            KeyCode::Char('p') if ctrl => Some(AppEvent::TourPrev),
            KeyCode::Esc | KeyCode::Char('q') => Some(AppEvent::TourClose),
            _ => None,
        }
    }

    /// Tour chords that stay live while a text field has the keyboard
    fn handle_tour_chords(key_event: KeyEvent, on_last: bool) -> Option<AppEvent> {
        if key_event.modifiers.contains(KeyModifiers::CONTROL) {
            Self::handle_tour_keys(key_event, on_last)
        } else {
            None
        }
    }

    fn handle_form_keys(key_event: KeyEvent) -> Option<AppEvent> {
        match key_event.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(AppEvent::BackHome),
            KeyCode::Char('?') => Some(AppEvent::ToggleHelp),
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => Some(AppEvent::FocusNext),
            KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => Some(AppEvent::FocusPrev),
            KeyCode::Enter | KeyCode::Char(' ') => Some(AppEvent::Activate),
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Right => Some(AppEvent::Increment),
            KeyCode::Char('-') | KeyCode::Left => Some(AppEvent::Decrement),
            KeyCode::Delete | KeyCode::Backspace => Some(AppEvent::ClearField),
            KeyCode::PageUp => Some(AppEvent::ScrollUp),
            KeyCode::PageDown => Some(AppEvent::ScrollDown),
            KeyCode::Char('t') => Some(AppEvent::StartTour),
            _ => None,
        }
    }

    fn handle_input_keys(key_event: KeyEvent) -> Option<AppEvent> {
        match key_event.code {
            KeyCode::Enter | KeyCode::Esc => Some(AppEvent::InputDone),
            KeyCode::Backspace => Some(AppEvent::InputBackspace),
            KeyCode::Char(_) if key_event.modifiers.contains(KeyModifiers::CONTROL) => None,
            KeyCode::Char(c) => Some(AppEvent::InputChar(c)),
            _ => None,
        }
    }

    pub fn process_event(event: AppEvent, state: &mut AppState) {
        let now = Instant::now();
        match event {
            AppEvent::Quit => state.quit(),
            AppEvent::ToggleHelp => state.toggle_help(),
            AppEvent::HomeNext => state.home_screen_state.select_next(),
            AppEvent::HomePrev => state.home_screen_state.select_prev(),
            AppEvent::OpenSelected { with_tour } => {
                let view = state.home_screen_state.selected().view();
                info!("Opening {:?} (tour: {})", view, with_tour);
                if with_tour {
                    state.open_with_tour(view, now);
                } else {
                    state.open_view(view);
                }
            }
            AppEvent::BackHome => state.open_view(View::HomeScreen),
            other => match state.current_view {
                View::Order => apply_form_event(&mut state.order, &mut state.navigator, other, now),
                View::Report => apply_form_event(&mut state.report, &mut state.navigator, other, now),
                View::HomeScreen => {}
            },
        }
        state.apply_navigation();
    }
}

fn apply_form_event<D: FormModel>(
    screen: &mut FormScreen<D>,
    nav: &mut dyn HostNavigator,
    event: AppEvent,
    now: Instant,
) {
    match event {
        AppEvent::FocusNext => screen.move_focus(1),
        AppEvent::FocusPrev => screen.move_focus(-1),
        AppEvent::Activate => screen.activate(now, nav),
        AppEvent::Increment => screen.adjust(1, now),
        AppEvent::Decrement => screen.adjust(-1, now),
        AppEvent::ClearField => screen.clear_focused(now),
        AppEvent::ScrollUp => screen.scroll(-PAGE_ROWS),
        AppEvent::ScrollDown => screen.scroll(PAGE_ROWS),
        AppEvent::InputChar(c) => screen.input_char(c, now),
        AppEvent::InputBackspace => screen.input_backspace(now),
        AppEvent::InputDone => screen.stop_editing(),
        AppEvent::StartTour => screen.start_tour(now),
        AppEvent::TourNext => screen.tour_next(now),
        AppEvent::TourPrev => screen.tour_prev(now),
        AppEvent::TourClose => screen.close_tour(nav),
        AppEvent::TourFinish => screen.finish_tour(nav),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::models::Role;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_tour_keys_only_while_open() {
        let mut state = AppState::new(AppConfig::default());
        state.open_view(View::Order);
        assert_eq!(EventHandler::handle_key_event(ctrl('n'), &mut state), None);
        assert_eq!(
            EventHandler::handle_key_event(key(KeyCode::Esc), &mut state),
            Some(AppEvent::BackHome)
        );

        state.order.start_tour(Instant::now());
        assert_eq!(
            EventHandler::handle_key_event(ctrl('n'), &mut state),
            Some(AppEvent::TourNext)
        );
        assert_eq!(
            EventHandler::handle_key_event(key(KeyCode::Esc), &mut state),
            Some(AppEvent::TourClose)
        );
        // Form keys still work under the overlay
        assert_eq!(
            EventHandler::handle_key_event(key(KeyCode::Enter), &mut state),
            Some(AppEvent::Activate)
        );
    }

    #[test]
    fn test_control_chords_never_type_into_text() {
        let mut state = AppState::new(AppConfig {
            role: Role::Medical,
            ..AppConfig::default()
        });
        state.open_view(View::Report);
        for _ in 0..3 {
            state.report.move_focus(1);
        }
        state.report.activate(Instant::now(), &mut state.navigator);
        assert!(state.report.editing().is_some());

        assert_eq!(EventHandler::handle_key_event(ctrl('n'), &mut state), None);
        assert_eq!(
            EventHandler::handle_key_event(key(KeyCode::Char('n')), &mut state),
            Some(AppEvent::InputChar('n'))
        );
    }

    #[test]
    fn test_help_swallows_keys() {
        let mut state = AppState::new(AppConfig::default());
        state.toggle_help();
        assert_eq!(EventHandler::handle_key_event(key(KeyCode::Char('q')), &mut state), None);
        assert_eq!(
            EventHandler::handle_key_event(key(KeyCode::Esc), &mut state),
            Some(AppEvent::ToggleHelp)
        );
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let mut state = AppState::new(AppConfig::default());
        state.open_with_tour(View::Report, Instant::now());
        let event = EventHandler::handle_key_event(ctrl('c'), &mut state);
        assert_eq!(event, Some(AppEvent::Quit));
    }
}
