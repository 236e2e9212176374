//! Session Lifecycle Module
//!
//! The core of the extension: the session window data model, its
//! process-wide store, the expiry scheduler, and the single-flight renewal
//! coordinator, tied together by a shared context and observed through a
//! broadcast event bus.

pub mod context;
pub mod events;
pub mod renewal;
pub mod scheduler;
pub mod store;
pub mod window;

pub use context::SessionContext;
pub use events::{NoticeLevel, SessionEvent, SessionEventBus};
pub use renewal::{RenewalCoordinator, RenewalKind, RenewalOutcome, RenewalPrompt};
pub use scheduler::ExpiryScheduler;
pub use store::SessionStore;
pub use window::{NotificationPolicy, SessionWindow};
