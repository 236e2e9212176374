//! Session Context
//!
//! The single owned object bundling what the session core shares: the
//! backend client, the session store, the notification policy, and the event
//! bus. Both reconciliation writes (fetch, extend) live here, which keeps the
//! store's single-writer discipline in one file.

use log::info;
use std::sync::Arc;
use std::time::Duration;

use crate::config::RunnerConfig;
use crate::error::Result;
use crate::runner::RunnerApi;

use super::events::{NoticeLevel, SessionEvent, SessionEventBus};
use super::store::SessionStore;
use super::window::{NotificationPolicy, SessionWindow};

pub struct SessionContext {
    client: Arc<dyn RunnerApi>,
    store: SessionStore,
    events: SessionEventBus,
    policy: NotificationPolicy,
    add_time_minutes: u32,
    hard_limit_grace: chrono::Duration,
    check_interval: Duration,
}

impl SessionContext {
    pub fn new(client: Arc<dyn RunnerApi>, config: &RunnerConfig) -> Self {
        Self {
            client,
            store: SessionStore::new(),
            events: SessionEventBus::default(),
            policy: NotificationPolicy {
                threshold_minutes: config.expiry_notification_minutes,
            },
            add_time_minutes: config.add_time_minutes,
            hard_limit_grace: config.hard_limit_grace(),
            check_interval: config.check_interval(),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn events(&self) -> &SessionEventBus {
        &self.events
    }

    pub fn policy(&self) -> NotificationPolicy {
        self.policy
    }

    pub fn client(&self) -> &Arc<dyn RunnerApi> {
        &self.client
    }

    /// Minutes requested per accepted renewal.
    pub fn add_time_minutes(&self) -> u32 {
        self.add_time_minutes
    }

    /// Grace window for the hard-limit comparison.
    pub fn hard_limit_grace(&self) -> chrono::Duration {
        self.hard_limit_grace
    }

    /// Expiry check cadence.
    pub fn check_interval(&self) -> Duration {
        self.check_interval
    }

    /// Fetch the remote truth and replace the stored window. On failure the
    /// store keeps whatever it had.
    pub async fn refresh(&self) -> Result<SessionWindow> {
        let window = self.client.fetch_session().await?;
        self.store.set(window);
        self.notify_time_changed();
        info!("Session window refreshed; ends {}", window.end);
        Ok(window)
    }

    /// Ask the backend for more time and store the recomputed window. The
    /// backend's answer replaces the local one wholesale; a local `end +
    /// minutes` guess is never written.
    pub async fn extend(&self, minutes: u32) -> Result<SessionWindow> {
        let window = self.client.extend_session(minutes).await?;
        self.store.set(window);
        self.notify_time_changed();
        self.events.emit(SessionEvent::Extended {
            window,
            added_minutes: minutes,
        });
        info!("Session extended by {} minutes; now ends {}", minutes, window.end);
        Ok(window)
    }

    /// Publish the latest window for countdown displays. A silent no-op
    /// until the first fetch succeeds.
    pub fn notify_time_changed(&self) {
        if let Some(window) = self.store.get() {
            self.events.emit(SessionEvent::TimeChanged {
                window,
                threshold_minutes: self.policy.threshold_minutes,
            });
        }
    }

    /// Publish a transient user-visible notice.
    pub fn notice(&self, level: NoticeLevel, message: impl Into<String>) {
        self.events.emit(SessionEvent::Notice {
            level,
            message: message.into(),
        });
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("window", &self.store.get())
            .field("policy", &self.policy)
            .field("add_time_minutes", &self.add_time_minutes)
            .finish()
    }
}
