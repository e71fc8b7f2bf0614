//! Error types
//!
//! Defines domain-specific error types for each module of the FTP client.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

/// Reply reader errors (malformed or missing control channel replies)
#[derive(Debug, Error)]
pub enum ReplyError {
    #[error("read failed: {0}")]
    ReadFailed(io::Error),
    #[error("connection closed by server")]
    ConnectionClosed,
    #[error("invalid reply line: {0:?}")]
    LineTooShort(String),
    #[error("invalid reply code: {0:?}")]
    InvalidCode(String),
    #[error("reply line exceeds {0} bytes")]
    LineTooLong(usize),
}

/// Control connection establishment errors
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("connect to {addr} failed: {source}")]
    DialFailed { addr: String, source: io::Error },
    #[error("read greeting from {addr} failed: {source}")]
    GreetingFailed { addr: String, source: ReplyError },
    #[error("greeting rejected by {addr}: {code} {message}")]
    GreetingRejected {
        addr: String,
        code: u16,
        message: String,
    },
}

/// Login sequence errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("login failed: {code} {message}")]
    Rejected { code: u16, message: String },
}

/// Per-command reply classification errors
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("send {command} failed: {source}")]
    SendFailed { command: String, source: io::Error },
    #[error("{command}: {code} {message}")]
    UnexpectedReply {
        command: String,
        code: u16,
        message: String,
    },
}

impl CommandError {
    /// Reply code carried by an unexpected reply, if any
    pub fn code(&self) -> Option<u16> {
        match self {
            CommandError::UnexpectedReply { code, .. } => Some(*code),
            CommandError::SendFailed { .. } => None,
        }
    }
}

/// Passive mode negotiation errors
#[derive(Debug, Error)]
pub enum DataChannelError {
    #[error("PASV failed: {code} {message}")]
    PassiveRejected { code: u16, message: String },
    #[error("could not parse PASV endpoint: {0}")]
    MalformedEndpoint(String),
    #[error("connect data channel {addr} failed: {source}")]
    DialFailed { addr: SocketAddr, source: io::Error },
}

/// Byte-level data channel copy errors
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("{command} data transfer failed: {source}")]
    CopyFailed { command: String, source: io::Error },
}

/// Remote target URL errors
#[derive(Debug, Error)]
pub enum TargetError {
    #[error("parse url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("unsupported: {0} (expected ftp)")]
    UnsupportedScheme(String),
    #[error("missing host in URL")]
    MissingHost,
    #[error("invalid port: {0}")]
    InvalidPort(u16),
    #[error("invalid percent-encoding in {0}")]
    InvalidEncoding(&'static str),
}

/// General FTP client error that encompasses all error types
#[derive(Debug, Error)]
pub enum FtpError {
    #[error("connect error: {0}")]
    Connect(#[from] ConnectError),
    #[error("protocol error: {0}")]
    Protocol(#[from] ReplyError),
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),
    #[error("command error: {0}")]
    Command(#[from] CommandError),
    #[error("data channel error: {0}")]
    DataChannel(#[from] DataChannelError),
    #[error("transfer error: {0}")]
    Transfer(#[from] TransferError),
    #[error("target error: {0}")]
    Target(#[from] TargetError),
    #[error("local file {path}: {source}")]
    Local { path: String, source: io::Error },
    #[error("{0}")]
    Usage(String),
    #[error("operation timed out after {0:?}")]
    TimedOut(Duration),
}

pub type Result<T> = std::result::Result<T, FtpError>;
