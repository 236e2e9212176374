//! UI Message Protocol
//!
//! Command contract between the session core and its editor surfaces (side
//! panel, tree view, webview host). Every message is a JSON object tagged by
//! `command`; on the stdio bridge they travel newline-delimited. Surfaces
//! render and collect input, the core decides; nothing here carries state
//! beyond the message itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::session::NoticeLevel;

/// Messages a surface sends to the core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum UiRequest {
    /// Ask for the current session end time; answered with
    /// `updateSessionEndTime`
    GetSessionEndTime,

    /// Start the renewal interaction, same single-flight path the scheduler
    /// uses
    AddTime,

    /// Resolve and open the dev server fronting `port`
    OpenDevServer { port: u16 },

    /// Show the support contact notice
    ShowInfo,

    /// Answer to an outstanding `showModal`, echoing its `modalId`
    #[serde(rename_all = "camelCase")]
    ModalResponse { modal_id: u64, accepted: bool },
}

/// Which modal a surface should present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModalKind {
    /// Low-time warning with a single affirmative action
    SoftWarning,
    /// Lifetime-cap notice with acknowledgment only
    HardLimit,
    /// Informational notice with acknowledgment only
    Info,
}

/// Messages the core sends to surfaces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum UiUpdate {
    /// Latest session end for countdown displays
    #[serde(rename_all = "camelCase")]
    UpdateSessionEndTime {
        session_end_time: DateTime<Utc>,
        /// Minutes before expiry at which the warning fires
        expiry_notification_time: u32,
    },

    /// Present a modal; the surface answers with `modalResponse`
    #[serde(rename_all = "camelCase")]
    ShowModal {
        /// Identifies this modal; an answer echoes it back
        modal_id: u64,
        kind: ModalKind,
        message: String,
        /// Label of the affirmative action; absent on acknowledgment-only
        /// notices
        #[serde(skip_serializing_if = "Option::is_none")]
        action: Option<String>,
    },

    /// Transient notification toast
    ShowNotification { level: NoticeLevel, message: String },

    /// Open a URL in the external browser
    OpenExternal { url: String },

    /// Open a file in the editor
    #[serde(rename_all = "camelCase")]
    OpenFile {
        path: PathBuf,
        /// Render as markdown preview instead of raw text
        markdown_preview: bool,
    },
}
