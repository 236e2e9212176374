//! Renewal Coordinator
//!
//! Owns the renewal interaction end to end: classifying a low-time window,
//! prompting the user, racing the prompt against a timeout, and applying the
//! outcome. At most one prompt is ever in flight; extra triggers from timer
//! ticks or UI commands collapse into the active one. An absent user never
//! wedges renewal: the timeout abandons the prompt and the next trigger
//! starts fresh.

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, error, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::context::SessionContext;
use super::events::SessionEvent;
use super::window::SessionWindow;

/// How a renewal trigger was classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenewalKind {
    /// The granted window has outgrown the account's cap; no renewal offered
    HardLimitExceeded,
    /// Ordinary low-time warning with a single extend action
    SoftWarning,
}

/// Resolution of one renewal trigger
#[derive(Debug, Clone, PartialEq)]
pub enum RenewalOutcome {
    /// Another prompt was already on screen; this trigger collapsed into it
    AlreadyPrompting,
    /// Nothing in the store yet; nothing to renew
    NoSession,
    /// The shutdown notice was acknowledged
    HardLimitAcknowledged,
    /// The prompt expired with no user response
    TimedOut,
    /// The user dismissed the prompt without accepting
    Declined,
    /// The backend granted more time; the store holds the new window
    Extended(SessionWindow),
    /// The backend refused or was unreachable; the store is unchanged
    ExtendFailed(String),
}

/// Blocking prompt surface driven by the coordinator.
///
/// Implementations present a modal and resolve when the user responds. They
/// may block indefinitely; the coordinator bounds every wait.
#[async_trait]
pub trait RenewalPrompt: Send + Sync {
    /// Tell the user the session has hit its lifetime cap and the workspace
    /// will shut down soon. Resolves on acknowledgment.
    async fn acknowledge_shutdown(&self, window: SessionWindow);

    /// Offer the single affirmative action: extend by `add_minutes`.
    /// Resolves `true` on acceptance, `false` on dismissal.
    async fn offer_extension(&self, minutes_remaining: i64, add_minutes: u32) -> bool;
}

pub struct RenewalCoordinator {
    ctx: Arc<SessionContext>,
    prompt: Arc<dyn RenewalPrompt>,
    modal_active: AtomicBool,
}

impl RenewalCoordinator {
    pub fn new(ctx: Arc<SessionContext>, prompt: Arc<dyn RenewalPrompt>) -> Self {
        Self {
            ctx,
            prompt,
            modal_active: AtomicBool::new(false),
        }
    }

    /// Whether a prompt is currently on screen.
    pub fn modal_active(&self) -> bool {
        self.modal_active.load(Ordering::SeqCst)
    }

    /// Classify the window: hard cap reached, or an ordinary warning.
    pub fn classify(&self, window: &SessionWindow) -> RenewalKind {
        if window.exceeded_max_lifetime(self.ctx.hard_limit_grace()) {
            RenewalKind::HardLimitExceeded
        } else {
            RenewalKind::SoftWarning
        }
    }

    /// Run one renewal interaction.
    ///
    /// Fired by the scheduler when the window enters the warning threshold
    /// and by the UI `addTime` command; both funnel through the same guard,
    /// so a trigger while a prompt is up is a no-op.
    pub async fn trigger(&self) -> RenewalOutcome {
        if self.modal_active.swap(true, Ordering::SeqCst) {
            debug!("Renewal prompt already active; trigger dropped");
            return RenewalOutcome::AlreadyPrompting;
        }

        let Some(window) = self.ctx.store().get() else {
            self.modal_active.store(false, Ordering::SeqCst);
            debug!("No session window yet; nothing to renew");
            return RenewalOutcome::NoSession;
        };

        let timeout = self.ctx.policy().prompt_timeout();
        match self.classify(&window) {
            RenewalKind::HardLimitExceeded => {
                warn!("Session reached its maximum lifetime; showing shutdown notice");
                let acked =
                    tokio::time::timeout(timeout, self.prompt.acknowledge_shutdown(window)).await;
                self.modal_active.store(false, Ordering::SeqCst);
                match acked {
                    Ok(()) => RenewalOutcome::HardLimitAcknowledged,
                    Err(_) => {
                        debug!("Shutdown notice expired unacknowledged");
                        RenewalOutcome::TimedOut
                    }
                }
            }
            RenewalKind::SoftWarning => {
                let minutes = window.minutes_remaining_display(Utc::now());
                let add_minutes = self.ctx.add_time_minutes();
                let answer = tokio::time::timeout(
                    timeout,
                    self.prompt.offer_extension(minutes, add_minutes),
                )
                .await;

                match answer {
                    Err(_) => {
                        self.modal_active.store(false, Ordering::SeqCst);
                        debug!("Renewal prompt expired unanswered");
                        RenewalOutcome::TimedOut
                    }
                    Ok(false) => {
                        self.modal_active.store(false, Ordering::SeqCst);
                        debug!("Renewal declined");
                        RenewalOutcome::Declined
                    }
                    Ok(true) => {
                        // Release the guard before the network call; a slow
                        // or failed extend must not block the next attempt.
                        self.modal_active.store(false, Ordering::SeqCst);
                        match self.ctx.extend(add_minutes).await {
                            Ok(new_window) => RenewalOutcome::Extended(new_window),
                            Err(e) => {
                                error!("Error adding time to session: {}", e);
                                self.ctx.events().emit(SessionEvent::ExtendFailed {
                                    message: e.to_string(),
                                });
                                RenewalOutcome::ExtendFailed(e.to_string())
                            }
                        }
                    }
                }
            }
        }
    }
}
