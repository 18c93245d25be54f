//! Application state and input handling for the terminal views

use chrono::{DateTime, Local};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use odak_core::ThemeMode;
use tracing::error;

use focus::{AppLifecycle, Report, SessionStore, Timer, TimerEvent, TimerPhase, Transition};

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Timer,
    Reports,
}

impl View {
    pub fn toggle(self) -> Self {
        match self {
            View::Timer => View::Reports,
            View::Reports => View::Timer,
        }
    }
}

/// A one-line message under the timer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Warning(String),
}

/// What the main loop should do with an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Timer(TimerEvent),
    Refresh,
    ClearHistory,
}

/// Application state
pub struct App {
    pub view: View,
    pub theme: ThemeMode,
    pub presets: Vec<u32>,
    pub show_help: bool,
    pub confirm_clear: bool,
    pub notice: Option<Notice>,
    pub report: Report,
    pub refreshed_at: DateTime<Local>,
}

impl App {
    pub fn new(theme: ThemeMode, presets: Vec<u32>) -> Self {
        Self {
            view: View::default(),
            theme,
            presets,
            show_help: false,
            confirm_clear: false,
            notice: None,
            report: Report::build(&[], Local::now()),
            refreshed_at: Local::now(),
        }
    }

    /// Recompute the report from the store
    pub fn refresh(&mut self, store: &SessionStore) {
        self.report = Report::from_store(store);
        self.refreshed_at = Local::now();
    }

    pub fn clear_history(&mut self, store: &SessionStore) {
        match store.clear_all() {
            Ok(()) => self.notice = Some(Notice::Info("History cleared".to_string())),
            Err(e) => {
                error!("Failed to clear sessions: {}", e);
                self.notice = Some(Notice::Warning(format!("Could not clear history: {}", e)));
            }
        }
        self.refresh(store);
    }

    /// React to what the timer just did
    pub fn observe(&mut self, transition: &Transition, store: &SessionStore) {
        match transition {
            Transition::Rejected(advisory) => {
                self.notice = Some(Notice::Warning(advisory.message().to_string()));
            }
            Transition::Distracted => {
                self.notice = Some(Notice::Warning(
                    "Distraction! You left the terminal, so the timer paused.".to_string(),
                ));
            }
            Transition::Finished(_) => {
                self.notice = None;
                self.refresh(store);
            }
            Transition::Updated | Transition::Ignored => {}
        }
    }

    /// Map a terminal event to an action
    pub fn on_event(&mut self, event: Event, timer: &Timer) -> Action {
        match event {
            Event::FocusLost => Action::Timer(TimerEvent::Lifecycle(AppLifecycle::Background)),
            Event::FocusGained => Action::Timer(TimerEvent::Lifecycle(AppLifecycle::Active)),
            Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key(key, timer),
            _ => Action::None,
        }
    }

    fn on_key(&mut self, key: KeyEvent, timer: &Timer) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }

        // A finished session must be acknowledged before anything else
        if timer.phase() == TimerPhase::Completed {
            return match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => Action::Timer(TimerEvent::Acknowledge),
                KeyCode::Char('q') => Action::Quit,
                _ => Action::None,
            };
        }

        if self.confirm_clear {
            self.confirm_clear = false;
            return match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => Action::ClearHistory,
                _ => {
                    self.notice = Some(Notice::Info("Kept history".to_string()));
                    Action::None
                }
            };
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return Action::None;
        }

        self.notice = None;

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
            KeyCode::Tab | KeyCode::BackTab => {
                self.view = self.view.toggle();
                return Action::None;
            }
            KeyCode::Char('?') => {
                self.show_help = true;
                return Action::None;
            }
            KeyCode::Char('t') => {
                self.theme = self.theme.toggled();
                return Action::None;
            }
            _ => {}
        }

        match self.view {
            View::Timer => self.on_timer_key(key.code, timer),
            View::Reports => self.on_reports_key(key.code),
        }
    }

    fn on_timer_key(&mut self, code: KeyCode, timer: &Timer) -> Action {
        let event = match code {
            KeyCode::Char(' ') | KeyCode::Enter => {
                if timer.is_running() {
                    TimerEvent::Pause
                } else {
                    TimerEvent::Start
                }
            }
            KeyCode::Char('r') => TimerEvent::Reset,
            KeyCode::Char('f') => TimerEvent::FinishEarly,
            KeyCode::Char('c') | KeyCode::Right => TimerEvent::SelectCategory(timer.category().next()),
            KeyCode::Char('C') | KeyCode::Left => TimerEvent::SelectCategory(timer.category().prev()),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let Some(minutes) = c
                    .to_digit(10)
                    .and_then(|d| (d as usize).checked_sub(1))
                    .and_then(|i| self.presets.get(i))
                else {
                    return Action::None;
                };
                TimerEvent::SetDuration(*minutes)
            }
            _ => return Action::None,
        };
        Action::Timer(event)
    }

    fn on_reports_key(&mut self, code: KeyCode) -> Action {
        match code {
            KeyCode::Char('r') => Action::Refresh,
            KeyCode::Char('x') => {
                self.confirm_clear = true;
                Action::None
            }
            _ => Action::None,
        }
    }
}
