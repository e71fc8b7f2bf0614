//! Remote storage management
//!
//! Handles single-reply mutations of the remote file system: deleting
//! files, creating and removing directories.

pub mod operations;
