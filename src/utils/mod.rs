//! Utility functions
//!
//! Provides logging and protocol echo utilities.

pub mod logging;

pub use logging::{ProtocolEcho, setup_logging};
