//! FTP Response handling
//!
//! Defines FTP reply codes and the reply value read from the control channel.

use std::fmt;

/// Standard FTP reply codes
pub const SERVICE_READY_LATER: u16 = 120;
pub const DATA_CONNECTION_ALREADY_OPEN: u16 = 125;
pub const FILE_STATUS_OK: u16 = 150;
pub const OK: u16 = 200;
pub const READY: u16 = 220;
pub const TRANSFER_COMPLETE: u16 = 226;
pub const ENTERING_PASSIVE_MODE: u16 = 227;
pub const LOGIN_SUCCESS: u16 = 230;
pub const FILE_ACTION_OK: u16 = 250;
pub const PATHNAME_CREATED: u16 = 257;
pub const PASSWORD_REQUIRED: u16 = 331;

/// One logical server reply: a three-digit code and its message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub code: u16,
    pub message: String,
}

impl Reply {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Reply {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.message)
    }
}
