pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod protocol;
pub mod storage;
pub mod target;
pub mod transfer;
pub mod utils;

pub use client::{ControlSession, SessionOptions};
pub use error::{FtpError, Result};
pub use target::RemoteTarget;
