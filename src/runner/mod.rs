//! Runner Backend Module
//!
//! Client for the monolith's runner endpoints: session info, session
//! extension, dev server resolution.

pub mod client;
pub mod types;

pub use client::{RunnerApi, RunnerClient};
pub use types::{DevServerLink, ExtendSessionRequest, RunnerSessionInfo};
