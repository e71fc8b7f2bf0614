//! Error handlers
//!
//! Provides error reporting for the command-line front end.

use crate::error::types::{AuthError, ConnectError, DataChannelError, FtpError};
use log::error;

/// Reports an error to the log and to stderr.
pub fn handle_error(err: &FtpError) {
    match error_reply_code(err) {
        Some(code) => error!("FTP client error (server replied {code}): {err}"),
        None => error!("FTP client error: {err}"),
    }
    eprintln!("error: {err}");
}

/// Extracts the server reply code that caused the error, if the server sent one.
pub fn error_reply_code(err: &FtpError) -> Option<u16> {
    match err {
        FtpError::Connect(ConnectError::GreetingRejected { code, .. }) => Some(*code),
        FtpError::Auth(AuthError::Rejected { code, .. }) => Some(*code),
        FtpError::Command(e) => e.code(),
        FtpError::DataChannel(DataChannelError::PassiveRejected { code, .. }) => Some(*code),
        _ => None,
    }
}
