//! Expiry Scheduler
//!
//! Recurring reconciliation timer for the session window. Two states: idle
//! (no timer) and active (ticking). Starting while active replaces the
//! previous timer instead of stacking a second one; stopping while idle is a
//! no-op. A tick never performs remote IO: it re-evaluates the already-known
//! window against the wall clock, hands low-time windows to the renewal
//! coordinator, and republishes the window for countdown displays.

use chrono::Utc;
use log::{debug, info};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::interval;

use super::context::SessionContext;
use super::renewal::RenewalCoordinator;

pub struct ExpiryScheduler {
    ctx: Arc<SessionContext>,
    coordinator: Arc<RenewalCoordinator>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl ExpiryScheduler {
    pub fn new(ctx: Arc<SessionContext>, coordinator: Arc<RenewalCoordinator>) -> Self {
        Self {
            ctx,
            coordinator,
            timer: Mutex::new(None),
        }
    }

    /// Whether a timer is currently registered.
    pub fn is_active(&self) -> bool {
        self.timer.lock().is_some()
    }

    /// Install the timer, replacing any previous one. The swap happens
    /// under a single lock, so racing starts can never leave two live
    /// timers. The first reconciliation pass runs immediately, the rest on
    /// the configured cadence.
    pub fn start(&self) {
        let mut timer = self.timer.lock();
        if let Some(previous) = timer.take() {
            previous.abort();
        }

        let ctx = Arc::clone(&self.ctx);
        let coordinator = Arc::clone(&self.coordinator);
        let check_interval = ctx.check_interval();

        *timer = Some(tokio::spawn(async move {
            let mut ticker = interval(check_interval);
            loop {
                ticker.tick().await;
                Self::reconcile(&ctx, &coordinator);
            }
        }));
        info!("Expiry check started ({}s interval)", check_interval.as_secs());
    }

    /// Cancel the timer. The only cancellation path; nothing else stops the
    /// loop.
    pub fn stop(&self) {
        if let Some(handle) = self.timer.lock().take() {
            handle.abort();
            info!("Expiry check stopped");
        }
    }

    /// One reconciliation pass. Firing the renewal prompt is spawned off so
    /// a tick never waits on the user; the coordinator's guard collapses the
    /// repeat triggers that arrive while a prompt is up.
    fn reconcile(ctx: &Arc<SessionContext>, coordinator: &Arc<RenewalCoordinator>) {
        if let Some(window) = ctx.store().get() {
            let now = Utc::now();
            if window.within_threshold(now, ctx.policy().threshold_minutes) {
                debug!(
                    "Session ends in {:.1} minutes; triggering renewal prompt",
                    window.minutes_remaining(now)
                );
                let coordinator = Arc::clone(coordinator);
                tokio::spawn(async move {
                    coordinator.trigger().await;
                });
            }
        }
        ctx.notify_time_changed();
    }
}
