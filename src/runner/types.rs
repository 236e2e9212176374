//! Runner Wire Types
//!
//! Payload shapes for the monolith's runner endpoints. Field names are
//! snake_case on the wire, timestamps ISO-8601 UTC.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::SessionWindow;

/// Backend API version segment
pub const API_VERSION: &str = "v1";

/// Body of `GET /runners/{id}` and `PUT /runners/{id}/extend_session`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerSessionInfo {
    /// Session start granted by the backend
    pub session_start: DateTime<Utc>,
    /// Session end granted by the backend
    pub session_end: DateTime<Utc>,
    /// Owning user
    pub user_id: u64,
}

impl RunnerSessionInfo {
    /// Assemble the canonical window, attaching the configured hard cap.
    pub fn into_window(self, max_duration_secs: i64) -> SessionWindow {
        SessionWindow::new(self.session_start, self.session_end, max_duration_secs)
    }
}

/// Body of `PUT /runners/{id}/extend_session`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtendSessionRequest {
    pub runner_id: u64,
    pub extra_time_minutes: u32,
}

/// Body of `GET /runners/{id}/devserver`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevServerLink {
    /// Absolute URL fronting the requested port
    pub destination_url: String,
}
