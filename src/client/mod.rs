//! Client session management
//!
//! Handles the control connection lifecycle: connect-time greeting,
//! command/reply exchanges, transfer parameters and shutdown.

pub mod session;

pub use session::{ControlSession, DEFAULT_BUFFER_SIZE, SessionOptions};
