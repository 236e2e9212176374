//! Session Events
//!
//! Event types and broadcast fan-out toward UI surfaces. Delivery is
//! fire-and-forget: a bus with no subscribers drops events, a slow subscriber
//! lags and catches up on the next tick. Nothing in the core ever waits on a
//! surface.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::window::SessionWindow;

/// Severity of a user-visible transient notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// Informational toast
    Info,
    /// Something the user should look at
    Warn,
    /// An operation failed
    Error,
}

/// Events published by the session core
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SessionEvent {
    /// Latest window for countdown displays. Emitted on every scheduler tick
    /// and after every store write.
    TimeChanged {
        window: SessionWindow,
        threshold_minutes: u32,
    },

    /// A renewal succeeded and the window moved forward
    Extended {
        window: SessionWindow,
        added_minutes: u32,
    },

    /// A renewal attempt failed; the stored window is unchanged
    ExtendFailed { message: String },

    /// Transient user-visible notification
    Notice { level: NoticeLevel, message: String },
}

/// Broadcast bus carrying session events to subscribed surfaces
#[derive(Debug, Clone)]
pub struct SessionEventBus {
    event_tx: broadcast::Sender<SessionEvent>,
}

impl SessionEventBus {
    /// Create a bus able to buffer `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (event_tx, _) = broadcast::channel(capacity);
        Self { event_tx }
    }

    /// Subscribe a new surface.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    /// Publish an event to whoever is listening right now.
    pub fn emit(&self, event: SessionEvent) {
        let _ = self.event_tx.send(event);
    }

    /// Number of live subscribers.
    pub fn receiver_count(&self) -> usize {
        self.event_tx.receiver_count()
    }
}

impl Default for SessionEventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;

    fn window() -> SessionWindow {
        SessionWindow::new(
            Utc.with_ymd_and_hms(2025, 5, 2, 8, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 5, 2, 16, 0, 0).unwrap(),
            28800,
        )
    }

    #[test]
    fn test_emit_without_subscribers_is_a_noop() {
        let bus = SessionEventBus::default();
        assert_eq!(bus.receiver_count(), 0);
        bus.emit(SessionEvent::Notice {
            level: NoticeLevel::Info,
            message: "nobody listening".to_string(),
        });
    }

    #[tokio::test]
    async fn test_subscriber_receives_events() {
        let bus = SessionEventBus::default();
        let mut rx = bus.subscribe();

        bus.emit(SessionEvent::TimeChanged {
            window: window(),
            threshold_minutes: 10,
        });

        match rx.recv().await.unwrap() {
            SessionEvent::TimeChanged {
                window: w,
                threshold_minutes,
            } => {
                assert_eq!(w, window());
                assert_eq!(threshold_minutes, 10);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_event_serialization_uses_camel_case_tags() {
        let json = serde_json::to_value(SessionEvent::ExtendFailed {
            message: "backend down".to_string(),
        })
        .unwrap();
        assert_eq!(json["type"], "extendFailed");

        let json = serde_json::to_value(SessionEvent::Notice {
            level: NoticeLevel::Warn,
            message: "heads up".to_string(),
        })
        .unwrap();
        assert_eq!(json["type"], "notice");
        assert_eq!(json["level"], "warn");
    }
}
