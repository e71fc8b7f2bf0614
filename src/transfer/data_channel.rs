//! Module `data_channel`
//!
//! Negotiates passive mode and opens the per-operation data connection
//! used by LIST, RETR and STOR.

use std::net::SocketAddr;

use log::{debug, info, warn};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::client::ControlSession;
use crate::error::{DataChannelError, Result};
use crate::protocol::{Command, ReplyStage, parse_pasv_endpoint};

/// A data connection owned by a single transfer operation.
///
/// The endpoint it was opened to is single-use: a new operation negotiates
/// a new one. Dropping the channel closes the connection.
#[derive(Debug)]
pub struct DataChannel {
    stream: TcpStream,
    endpoint: SocketAddr,
}

impl DataChannel {
    pub fn endpoint(&self) -> SocketAddr {
        self.endpoint
    }

    pub(crate) fn stream_mut(&mut self) -> &mut TcpStream {
        &mut self.stream
    }

    /// Closes the connection from the client side.
    ///
    /// For uploads this is how the server learns the file is complete.
    pub async fn close(mut self) {
        if let Err(e) = self.stream.shutdown().await {
            warn!("Failed to shut down data channel {}: {e}", self.endpoint);
        }
        debug!("Data channel {} closed", self.endpoint);
    }
}

impl ControlSession {
    /// Sends `PASV` and connects to the endpoint announced in the 227 reply.
    pub async fn open_data_channel(&mut self) -> Result<DataChannel> {
        let command = Command::PASV;
        let reply = self.exchange(&command).await?;
        if !command.accepts(ReplyStage::Completion, reply.code) {
            return Err(DataChannelError::PassiveRejected {
                code: reply.code,
                message: reply.message,
            }
            .into());
        }

        let endpoint = parse_pasv_endpoint(&reply.message)?;
        let stream = TcpStream::connect(endpoint)
            .await
            .map_err(|source| DataChannelError::DialFailed {
                addr: endpoint,
                source,
            })?;
        info!("Data channel opened to {endpoint}");

        Ok(DataChannel { stream, endpoint })
    }
}
