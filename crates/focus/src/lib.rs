//! focus - Focus timer with distraction tracking
//!
//! "Protect the sacred space of deep work."
//!
//! Pick a category and a duration, run the countdown, and every finished
//! session lands in local history. Leaving the terminal mid-session counts
//! as a distraction and pauses the clock.
//!
//! - `timer`: the countdown state machine
//! - `controller`: drives a timer from ticks and input events
//! - `store`: append-only session history on a key-value backend
//! - `stats`: today, all-time, weekly and per-category reports

pub mod category;
pub mod controller;
pub mod error;
pub mod kv;
pub mod session;
pub mod stats;
pub mod store;
pub mod timer;

pub use category::Category;
pub use controller::{Step, TimerController};
pub use error::StoreError;
pub use session::{NewSession, SessionRecord, SessionSummary};
pub use stats::Report;
pub use store::SessionStore;
pub use timer::{AppLifecycle, Timer, TimerEvent, TimerPhase, Transition};
