//! UI Surface Module
//!
//! Message protocol and stdio bridge toward editor surfaces. The core never
//! renders anything itself; surfaces subscribe over newline-delimited JSON
//! and do the drawing.

pub mod bridge;
pub mod protocol;

pub use bridge::{BridgePrompt, UiBridge, CONTACT_INFO};
pub use protocol::{ModalKind, UiRequest, UiUpdate};
