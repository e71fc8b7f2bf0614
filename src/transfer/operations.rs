//! Transfer operations
//!
//! Two-phase transfers over a passive data channel: a preliminary reply
//! authorizes the data exchange, a completion reply confirms it.

use log::{debug, info};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::client::ControlSession;
use crate::error::{Result, TransferError};
use crate::protocol::{Command, ReplyStage};
use crate::transfer::DataChannel;

fn copy_failed(command: &Command) -> impl Fn(std::io::Error) -> TransferError + '_ {
    move |source| TransferError::CopyFailed {
        command: command.verb().to_string(),
        source,
    }
}

impl ControlSession {
    /// Arms passive mode, sends `command` and waits for its preliminary reply.
    ///
    /// On a rejected command the data channel is dropped before returning.
    async fn begin_transfer(&mut self, command: &Command) -> Result<DataChannel> {
        let data = self.open_data_channel().await?;
        self.execute(command, ReplyStage::Preliminary).await?;
        debug!("{} transferring over {}", command.verb(), data.endpoint());
        Ok(data)
    }

    async fn finish_transfer(&mut self, command: &Command) -> Result<()> {
        self.expect(command, ReplyStage::Completion).await?;
        Ok(())
    }

    /// Lists `path` and returns the raw listing bytes.
    pub async fn list(&mut self, path: &str) -> Result<Vec<u8>> {
        let command = Command::LIST(path.to_string());
        let mut data = self.begin_transfer(&command).await?;

        let mut listing = Vec::new();
        data.stream_mut()
            .read_to_end(&mut listing)
            .await
            .map_err(copy_failed(&command))?;
        drop(data);

        self.finish_transfer(&command).await?;
        info!("Listed {path}: {} bytes", listing.len());
        Ok(listing)
    }

    /// Downloads `path` into `sink`, returning the number of bytes written.
    pub async fn retrieve<W>(&mut self, path: &str, sink: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let command = Command::RETR(path.to_string());
        let mut data = self.begin_transfer(&command).await?;

        let capacity = self.buffer_size();
        let copied = {
            let mut reader = BufReader::with_capacity(capacity, data.stream_mut());
            tokio::io::copy_buf(&mut reader, sink)
                .await
                .map_err(copy_failed(&command))?
        };
        sink.flush().await.map_err(copy_failed(&command))?;
        drop(data);

        self.finish_transfer(&command).await?;
        info!("Retrieved {path}: {copied} bytes");
        Ok(copied)
    }

    /// Uploads everything read from `source` to `path`, returning the
    /// number of bytes sent.
    ///
    /// The data channel is closed before the completion reply is read.
    pub async fn store<R>(&mut self, path: &str, source: &mut R) -> Result<u64>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let command = Command::STOR(path.to_string());
        let mut data = self.begin_transfer(&command).await?;

        let capacity = self.buffer_size();
        let mut reader = BufReader::with_capacity(capacity, source);
        let copied = tokio::io::copy_buf(&mut reader, data.stream_mut())
            .await
            .map_err(copy_failed(&command))?;
        data.close().await;

        self.finish_transfer(&command).await?;
        info!("Stored {path}: {copied} bytes");
        Ok(copied)
    }
}
