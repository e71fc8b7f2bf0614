//! Transfer module for the FTP client
//!
//! Handles passive data channel negotiation and the LIST, RETR and STOR
//! transfers that run over it.

pub mod data_channel;
pub mod operations;

pub use data_channel::DataChannel;
