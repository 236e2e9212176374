//! Session lifecycle core for the Cloud IDE editor extension.
//!
//! Keeps a time-boxed remote development session alive and honest: fetches
//! the granted window from the backend, reconciles it against the wall clock
//! on a timer, walks the user through single-flight renewal prompts, and
//! fans session events out to whatever editor surfaces subscribe.

// Declare modules
pub mod config;
pub mod error;
pub mod runner;
pub mod session;
pub mod startup;
pub mod ui;

pub use config::RunnerConfig;
pub use error::{Result, SessionError};
pub use runner::{RunnerApi, RunnerClient};
pub use session::{
    ExpiryScheduler, NoticeLevel, NotificationPolicy, RenewalCoordinator, RenewalOutcome,
    RenewalPrompt, SessionContext, SessionEvent, SessionEventBus, SessionStore, SessionWindow,
};
