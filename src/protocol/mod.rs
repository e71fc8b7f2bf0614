//! FTP Protocol implementation
//!
//! Handles FTP command rendering, reply parsing, and per-command reply
//! code classification.

pub mod commands;
pub mod parser;
pub mod responses;

pub use commands::{Command, ReplyStage};
pub use parser::{ReplyParser, parse_pasv_endpoint};
pub use responses::Reply;
