//! Session State Store
//!
//! Process-wide holder of the current session window. Created empty,
//! populated by the first successful fetch, replaced wholesale after every
//! successful extend. Writes always replace the full window so readers never
//! observe a half-updated start/end pair.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;

use super::window::SessionWindow;

/// Shared store for the current session window.
///
/// Cloning hands out another handle to the same store. Only the
/// reconciliation paths write; everything else reads copies out.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    window: Arc<RwLock<Option<SessionWindow>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current window, if one has been fetched yet.
    pub fn get(&self) -> Option<SessionWindow> {
        *self.window.read()
    }

    /// Replace the stored window with a freshly fetched one.
    pub fn set(&self, window: SessionWindow) {
        *self.window.write() = Some(window);
    }

    /// Session end timestamp, for countdown surfaces.
    pub fn session_end(&self) -> Option<DateTime<Utc>> {
        self.get().map(|w| w.end)
    }
}
