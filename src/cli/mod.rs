//! Command-line interface
//!
//! Declares the `rax-ftp` arguments and runs the selected operation.

pub mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use runner::run;

const LONG_ABOUT: &str = "FTP client for listing, copying, moving, and deleting files and \
directories on remote FTP servers.

URL format: ftp://[USER[:PASSWORD]@]HOST[:PORT]/PATH
Default USER is 'anonymous' with no PASSWORD. Default PORT is 21.";

#[derive(Debug, Parser)]
#[command(name = "rax-ftp", version, long_about = LONG_ABOUT)]
#[command(about = "FTP client for listing, copying, moving, and deleting files and directories on remote FTP servers.")]
pub struct Cli {
    /// Print all messages to and from the FTP server
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to rax-ftp.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub operation: Operation,
}

#[derive(Debug, Subcommand)]
pub enum Operation {
    /// List a directory on the FTP server
    Ls { url: String },
    /// Create a directory on the FTP server
    Mkdir { url: String },
    /// Delete a file on the FTP server
    Rm { url: String },
    /// Delete a directory on the FTP server
    Rmdir { url: String },
    /// Copy a file between the local machine and the FTP server
    ///
    /// If ARG1 is a local file, then ARG2 must be a URL, and vice-versa.
    Cp {
        #[arg(value_name = "ARG1")]
        source: String,
        #[arg(value_name = "ARG2")]
        destination: String,
    },
    /// Move a file between the local machine and the FTP server
    ///
    /// The source is deleted once the copy has completed.
    Mv {
        #[arg(value_name = "ARG1")]
        source: String,
        #[arg(value_name = "ARG2")]
        destination: String,
    },
}
