//! Storage operations
//!
//! Management commands that complete with a single reply and use no data
//! channel.

use log::info;

use crate::client::ControlSession;
use crate::error::Result;
use crate::protocol::{Command, ReplyStage};

impl ControlSession {
    async fn manage(&mut self, command: Command) -> Result<()> {
        let reply = self.execute(&command, ReplyStage::Completion).await?;
        info!("{command}: {reply}");
        Ok(())
    }

    /// Deletes the remote file at `path` (`DELE`).
    pub async fn delete(&mut self, path: &str) -> Result<()> {
        self.manage(Command::DELE(path.to_string())).await
    }

    /// Creates the remote directory `path` (`MKD`).
    ///
    /// Servers confirm either with 257 and the created pathname or with a
    /// plain 250.
    pub async fn make_dir(&mut self, path: &str) -> Result<()> {
        self.manage(Command::MKD(path.to_string())).await
    }

    /// Removes the remote directory `path` (`RMD`).
    pub async fn remove_dir(&mut self, path: &str) -> Result<()> {
        self.manage(Command::RMD(path.to_string())).await
    }
}
