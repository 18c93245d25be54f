//! Countdown timer state machine
//!
//! Every input, from the once-a-second tick to the foreground/background
//! side channel, is a `TimerEvent` fed through `Timer::apply`. The timer never
//! touches storage; a `Transition::Finished` carries the summary the
//! controller persists.

use serde::Serialize;

use crate::category::Category;
use crate::session::SessionSummary;

/// Where the countdown is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    /// Full time on the clock, not running
    Idle,
    Running,
    /// Stopped partway, by the user or by a distraction
    Paused,
    /// Finalized; the summary waits for acknowledgement
    Completed,
}

impl TimerPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerPhase::Idle => "idle",
            TimerPhase::Running => "running",
            TimerPhase::Paused => "paused",
            TimerPhase::Completed => "completed",
        }
    }
}

/// Foreground state of the hosting app or terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AppLifecycle {
    Active,
    Inactive,
    Background,
}

/// Everything that can happen to a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Start,
    Pause,
    Reset,
    /// One second of wall-clock time passed
    Tick,
    /// New countdown length in minutes
    SetDuration(u32),
    SelectCategory(Category),
    FinishEarly,
    /// The user has seen the completion summary
    Acknowledge,
    Lifecycle(AppLifecycle),
}

/// Why an action was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    /// Start with nothing left on the clock
    ZeroTimeRemaining,
    /// Start while a finished session awaits acknowledgement
    SummaryPending,
}

impl Advisory {
    pub fn message(&self) -> &'static str {
        match self {
            Advisory::ZeroTimeRemaining => "Reset the timer before starting again.",
            Advisory::SummaryPending => "Acknowledge the finished session first.",
        }
    }
}

/// Result of applying one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Nothing visible changed
    Ignored,
    Updated,
    /// Refused; state unchanged
    Rejected(Advisory),
    /// The app left the foreground mid-session; counted and paused
    Distracted,
    /// The session ended, by running out or by finishing early
    Finished(SessionSummary),
}

/// What a view needs to render the timer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub phase: TimerPhase,
    pub remaining_seconds: u32,
    pub total_seconds: u32,
    pub is_running: bool,
    pub selected_category: Category,
    pub distraction_count: u32,
    /// Elapsed share of the countdown, 0.0 to 1.0
    pub progress_fraction: f64,
}

/// The countdown itself
#[derive(Debug, Clone)]
pub struct Timer {
    phase: TimerPhase,
    total_seconds: u32,
    remaining_seconds: u32,
    category: Category,
    distractions: u32,
    /// Last reported foreground state; distractions count edges, not callbacks
    lifecycle: AppLifecycle,
    summary: Option<SessionSummary>,
}

impl Timer {
    pub fn new(total_seconds: u32, category: Category) -> Self {
        Self {
            phase: TimerPhase::Idle,
            total_seconds,
            remaining_seconds: total_seconds,
            category,
            distractions: 0,
            lifecycle: AppLifecycle::Active,
            summary: None,
        }
    }

    pub fn with_minutes(minutes: u32, category: Category) -> Self {
        Self::new(odak_core::format::minutes_to_seconds(minutes), category)
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn total_seconds(&self) -> u32 {
        self.total_seconds
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn distraction_count(&self) -> u32 {
        self.distractions
    }

    /// Summary of the finished session, until acknowledged
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    pub fn progress_fraction(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        (self.total_seconds - self.remaining_seconds) as f64 / self.total_seconds as f64
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase,
            remaining_seconds: self.remaining_seconds,
            total_seconds: self.total_seconds,
            is_running: self.is_running(),
            selected_category: self.category,
            distraction_count: self.distractions,
            progress_fraction: self.progress_fraction(),
        }
    }

    /// Apply one event
    pub fn apply(&mut self, event: TimerEvent) -> Transition {
        match event {
            TimerEvent::Start => self.start(),
            TimerEvent::Pause => self.pause(),
            TimerEvent::Reset | TimerEvent::Acknowledge => self.reset(event),
            TimerEvent::Tick => self.tick(),
            TimerEvent::SetDuration(minutes) => self.set_duration(minutes),
            TimerEvent::SelectCategory(category) => self.select_category(category),
            TimerEvent::FinishEarly => self.finish_early(),
            TimerEvent::Lifecycle(next) => self.lifecycle_changed(next),
        }
    }

    fn start(&mut self) -> Transition {
        match self.phase {
            TimerPhase::Running => Transition::Ignored,
            TimerPhase::Completed => Transition::Rejected(Advisory::SummaryPending),
            TimerPhase::Idle | TimerPhase::Paused if self.remaining_seconds == 0 => {
                Transition::Rejected(Advisory::ZeroTimeRemaining)
            }
            TimerPhase::Idle | TimerPhase::Paused => {
                self.phase = TimerPhase::Running;
                Transition::Updated
            }
        }
    }

    fn pause(&mut self) -> Transition {
        if self.phase != TimerPhase::Running {
            return Transition::Ignored;
        }
        self.phase = TimerPhase::Paused;
        Transition::Updated
    }

    fn reset(&mut self, event: TimerEvent) -> Transition {
        if event == TimerEvent::Acknowledge && self.summary.is_none() {
            return Transition::Ignored;
        }
        self.phase = TimerPhase::Idle;
        self.remaining_seconds = self.total_seconds;
        self.distractions = 0;
        self.summary = None;
        Transition::Updated
    }

    fn tick(&mut self) -> Transition {
        if self.phase != TimerPhase::Running {
            return Transition::Ignored;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            return self.finalize();
        }
        Transition::Updated
    }

    fn set_duration(&mut self, minutes: u32) -> Transition {
        if matches!(self.phase, TimerPhase::Running | TimerPhase::Completed) {
            return Transition::Ignored;
        }
        let seconds = odak_core::format::minutes_to_seconds(minutes);
        self.total_seconds = seconds;
        self.remaining_seconds = seconds;
        self.phase = TimerPhase::Idle;
        Transition::Updated
    }

    fn select_category(&mut self, category: Category) -> Transition {
        if matches!(self.phase, TimerPhase::Running | TimerPhase::Completed) {
            return Transition::Ignored;
        }
        self.category = category;
        Transition::Updated
    }

    fn finish_early(&mut self) -> Transition {
        if self.phase != TimerPhase::Running || self.remaining_seconds >= self.total_seconds {
            return Transition::Ignored;
        }
        self.finalize()
    }

    fn lifecycle_changed(&mut self, next: AppLifecycle) -> Transition {
        let previous = std::mem::replace(&mut self.lifecycle, next);
        let left_foreground = previous == AppLifecycle::Active && next != AppLifecycle::Active;

        if left_foreground && self.phase == TimerPhase::Running {
            self.distractions += 1;
            self.phase = TimerPhase::Paused;
            return Transition::Distracted;
        }
        Transition::Ignored
    }

    fn finalize(&mut self) -> Transition {
        let summary = SessionSummary {
            category: self.category,
            duration_seconds: self.total_seconds - self.remaining_seconds,
            distraction_count: self.distractions,
            completed: self.remaining_seconds == 0,
        };
        self.phase = TimerPhase::Completed;
        self.summary = Some(summary);
        Transition::Finished(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(total: u32) -> Timer {
        let mut timer = Timer::new(total, Category::Coding);
        assert_eq!(timer.apply(TimerEvent::Start), Transition::Updated);
        timer
    }

    fn tick_n(timer: &mut Timer, n: u32) -> Vec<Transition> {
        (0..n).map(|_| timer.apply(TimerEvent::Tick)).collect()
    }

    #[test]
    fn test_new_timer_is_idle() {
        let timer = Timer::with_minutes(25, Category::Study);
        assert_eq!(timer.phase(), TimerPhase::Idle);
        assert_eq!(timer.remaining_seconds(), 1500);
        assert_eq!(timer.total_seconds(), 1500);
        assert_eq!(timer.progress_fraction(), 0.0);
        assert!(timer.summary().is_none());
    }

    #[test]
    fn test_full_countdown_finishes_once() {
        let mut timer = running(1500);
        let transitions = tick_n(&mut timer, 1500);

        let finished: Vec<_> = transitions
            .iter()
            .filter_map(|t| match t {
                Transition::Finished(summary) => Some(*summary),
                _ => None,
            })
            .collect();
        assert_eq!(finished.len(), 1);
        assert!(matches!(transitions.last(), Some(Transition::Finished(_))));

        let summary = finished[0];
        assert!(summary.completed);
        assert_eq!(summary.duration_seconds, 1500);
        assert_eq!(summary.category, Category::Coding);
        assert_eq!(timer.phase(), TimerPhase::Completed);
        assert_eq!(timer.remaining_seconds(), 0);

        // No extra tick is consumed after zero
        assert_eq!(timer.apply(TimerEvent::Tick), Transition::Ignored);
        assert_eq!(timer.remaining_seconds(), 0);
    }

    #[test]
    fn test_finish_early() {
        let mut timer = running(1500);
        tick_n(&mut timer, 300);

        match timer.apply(TimerEvent::FinishEarly) {
            Transition::Finished(summary) => {
                assert_eq!(summary.duration_seconds, 300);
                assert!(!summary.completed);
            }
            other => panic!("expected Finished, got {:?}", other),
        }
        assert_eq!(timer.phase(), TimerPhase::Completed);
        assert!(!timer.is_running());
    }

    #[test]
    fn test_finish_early_needs_progress_and_running() {
        let mut timer = running(1500);
        assert_eq!(timer.apply(TimerEvent::FinishEarly), Transition::Ignored);

        tick_n(&mut timer, 10);
        timer.apply(TimerEvent::Pause);
        assert_eq!(timer.apply(TimerEvent::FinishEarly), Transition::Ignored);
        assert_eq!(timer.phase(), TimerPhase::Paused);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut timer = running(60);
        tick_n(&mut timer, 5);
        assert_eq!(timer.apply(TimerEvent::Pause), Transition::Updated);
        assert_eq!(timer.phase(), TimerPhase::Paused);

        // Paused timers ignore ticks
        assert_eq!(timer.apply(TimerEvent::Tick), Transition::Ignored);
        assert_eq!(timer.remaining_seconds(), 55);

        assert_eq!(timer.apply(TimerEvent::Start), Transition::Updated);
        assert!(timer.is_running());
    }

    #[test]
    fn test_pause_when_not_running_is_noop() {
        let mut timer = Timer::new(60, Category::Study);
        assert_eq!(timer.apply(TimerEvent::Pause), Transition::Ignored);
        assert_eq!(timer.phase(), TimerPhase::Idle);
    }

    #[test]
    fn test_start_with_zero_remaining_is_rejected() {
        let mut timer = Timer::new(0, Category::Study);
        assert_eq!(
            timer.apply(TimerEvent::Start),
            Transition::Rejected(Advisory::ZeroTimeRemaining)
        );
        assert_eq!(timer.phase(), TimerPhase::Idle);
    }

    #[test]
    fn test_start_with_pending_summary_is_rejected() {
        let mut timer = running(2);
        tick_n(&mut timer, 2);
        assert_eq!(
            timer.apply(TimerEvent::Start),
            Transition::Rejected(Advisory::SummaryPending)
        );
    }

    #[test]
    fn test_acknowledge_resets() {
        let mut timer = running(3);
        timer.apply(TimerEvent::Lifecycle(AppLifecycle::Background));
        timer.apply(TimerEvent::Lifecycle(AppLifecycle::Active));
        timer.apply(TimerEvent::Start);
        tick_n(&mut timer, 3);
        assert_eq!(timer.phase(), TimerPhase::Completed);
        assert_eq!(timer.summary().map(|s| s.distraction_count), Some(1));

        assert_eq!(timer.apply(TimerEvent::Acknowledge), Transition::Updated);
        assert_eq!(timer.phase(), TimerPhase::Idle);
        assert_eq!(timer.remaining_seconds(), 3);
        assert_eq!(timer.distraction_count(), 0);
        assert!(timer.summary().is_none());

        // Nothing to acknowledge now
        assert_eq!(timer.apply(TimerEvent::Acknowledge), Transition::Ignored);
    }

    #[test]
    fn test_reset_from_any_phase() {
        let mut timer = running(100);
        tick_n(&mut timer, 40);
        timer.apply(TimerEvent::Lifecycle(AppLifecycle::Inactive));
        assert_eq!(timer.distraction_count(), 1);

        assert_eq!(timer.apply(TimerEvent::Reset), Transition::Updated);
        assert_eq!(timer.phase(), TimerPhase::Idle);
        assert_eq!(timer.remaining_seconds(), 100);
        assert_eq!(timer.distraction_count(), 0);
    }

    #[test]
    fn test_set_duration_only_when_stopped() {
        let mut timer = running(1500);
        assert_eq!(timer.apply(TimerEvent::SetDuration(45)), Transition::Ignored);
        assert_eq!(timer.total_seconds(), 1500);

        timer.apply(TimerEvent::Pause);
        assert_eq!(timer.apply(TimerEvent::SetDuration(45)), Transition::Updated);
        assert_eq!(timer.total_seconds(), 2700);
        assert_eq!(timer.remaining_seconds(), 2700);
        assert_eq!(timer.phase(), TimerPhase::Idle);
    }

    #[test]
    fn test_select_category_only_when_stopped() {
        let mut timer = Timer::new(60, Category::Study);
        assert_eq!(
            timer.apply(TimerEvent::SelectCategory(Category::Reading)),
            Transition::Updated
        );
        assert_eq!(timer.category(), Category::Reading);

        timer.apply(TimerEvent::Start);
        assert_eq!(
            timer.apply(TimerEvent::SelectCategory(Category::Other)),
            Transition::Ignored
        );
        assert_eq!(timer.category(), Category::Reading);
    }

    #[test]
    fn test_distraction_counts_edges_only() {
        let mut timer = running(1500);

        assert_eq!(
            timer.apply(TimerEvent::Lifecycle(AppLifecycle::Background)),
            Transition::Distracted
        );
        assert_eq!(timer.distraction_count(), 1);
        assert_eq!(timer.phase(), TimerPhase::Paused);

        // background -> background is not an edge
        assert_eq!(
            timer.apply(TimerEvent::Lifecycle(AppLifecycle::Background)),
            Transition::Ignored
        );
        assert_eq!(timer.distraction_count(), 1);
    }

    #[test]
    fn test_no_edge_while_already_away() {
        let mut timer = running(1500);
        timer.apply(TimerEvent::Lifecycle(AppLifecycle::Inactive));
        timer.apply(TimerEvent::Start);

        // inactive -> background while running is still not a new departure
        assert_eq!(
            timer.apply(TimerEvent::Lifecycle(AppLifecycle::Background)),
            Transition::Ignored
        );
        assert!(timer.is_running());
        assert_eq!(timer.distraction_count(), 1);
    }

    #[test]
    fn test_leaving_foreground_when_not_running() {
        let mut timer = Timer::new(60, Category::Study);
        assert_eq!(
            timer.apply(TimerEvent::Lifecycle(AppLifecycle::Background)),
            Transition::Ignored
        );
        assert_eq!(timer.distraction_count(), 0);
    }

    #[test]
    fn test_snapshot() {
        let mut timer = running(200);
        tick_n(&mut timer, 50);
        let snapshot = timer.snapshot();
        assert_eq!(snapshot.phase, TimerPhase::Running);
        assert_eq!(snapshot.remaining_seconds, 150);
        assert_eq!(snapshot.total_seconds, 200);
        assert!(snapshot.is_running);
        assert_eq!(snapshot.selected_category, Category::Coding);
        assert!((snapshot.progress_fraction - 0.25).abs() < f64::EPSILON);
    }
}
