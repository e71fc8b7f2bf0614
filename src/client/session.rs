//! Control session
//!
//! Owns the control connection of one server conversation: dials the
//! server, reads the greeting, sends commands and reads their replies.

use log::{debug, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

use crate::error::{CommandError, ConnectError, ReplyError, Result};
use crate::protocol::parser::strip_line_ending;
use crate::protocol::{Command, Reply, ReplyParser, ReplyStage};
use crate::utils::ProtocolEcho;

pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Settings applied to a control session at connect time.
#[derive(Debug)]
pub struct SessionOptions {
    /// Capacity of the control reader and of data channel copy buffers,
    /// also the longest reply line accepted
    pub buffer_size: usize,
    pub echo: ProtocolEcho,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            echo: ProtocolEcho::disabled(),
        }
    }
}

/// One conversation with an FTP server over its control connection.
///
/// A session only exists once the server greeting has been read, so no
/// command can precede it. Commands are never pipelined: every command
/// waits for its reply before the next one is sent.
#[derive(Debug)]
pub struct ControlSession {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    echo: ProtocolEcho,
    buffer_size: usize,
    peer: String,
}

impl ControlSession {
    /// Dials `host:port` and reads the server greeting.
    pub async fn connect(host: &str, port: u16, options: SessionOptions) -> Result<Self> {
        let peer = if host.contains(':') {
            format!("[{host}]:{port}")
        } else {
            format!("{host}:{port}")
        };

        let stream = TcpStream::connect((host, port))
            .await
            .map_err(|source| ConnectError::DialFailed {
                addr: peer.clone(),
                source,
            })?;
        info!("Control connection established to {peer}");

        let (read_half, writer) = stream.into_split();
        let mut session = ControlSession {
            reader: BufReader::with_capacity(options.buffer_size, read_half),
            writer,
            echo: options.echo,
            buffer_size: options.buffer_size,
            peer,
        };

        // the session is dropped, closing the connection, on any greeting failure
        session.wait_greeting().await?;
        Ok(session)
    }

    async fn wait_greeting(&mut self) -> Result<()> {
        loop {
            let reply = self
                .read_reply()
                .await
                .map_err(|source| ConnectError::GreetingFailed {
                    addr: self.peer.clone(),
                    source,
                })?;

            match Command::GREETING.classify(reply.code) {
                Some(ReplyStage::Preliminary) => {
                    debug!("Server {} not ready yet: {}", self.peer, reply);
                    continue;
                }
                Some(_) => {
                    info!("Greeting from {}: {}", self.peer, reply);
                    return Ok(());
                }
                None => {
                    return Err(ConnectError::GreetingRejected {
                        addr: self.peer.clone(),
                        code: reply.code,
                        message: reply.message,
                    }
                    .into());
                }
            }
        }
    }

    /// Server address this session talks to.
    pub fn peer(&self) -> &str {
        &self.peer
    }

    pub(crate) fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Sends a single command line terminated by CRLF.
    pub async fn send(&mut self, command: &Command) -> std::result::Result<(), CommandError> {
        let line = command.to_string();
        self.echo.sent(&line).await;
        debug!("Sending to {}: {}", self.peer, command.masked());

        let send_failed = |source| CommandError::SendFailed {
            command: command.masked(),
            source,
        };
        self.writer
            .write_all(format!("{line}\r\n").as_bytes())
            .await
            .map_err(send_failed)?;
        self.writer.flush().await.map_err(send_failed)
    }

    /// Reads one line of at most `buffer_size` bytes, terminator included.
    async fn read_line(&mut self, buf: &mut Vec<u8>) -> std::result::Result<(), ReplyError> {
        buf.clear();
        let limit = self.buffer_size;
        let n = (&mut self.reader)
            .take(limit as u64)
            .read_until(b'\n', buf)
            .await
            .map_err(ReplyError::ReadFailed)?;
        if n == 0 {
            return Err(ReplyError::ConnectionClosed);
        }
        if n == limit && !buf.ends_with(b"\n") {
            return Err(ReplyError::LineTooLong(limit));
        }
        Ok(())
    }

    /// Reads one logical reply, consuming every line of a multi-line reply.
    pub async fn read_reply(&mut self) -> std::result::Result<Reply, ReplyError> {
        let mut parser = ReplyParser::default();
        let mut buf = Vec::with_capacity(128);

        loop {
            self.read_line(&mut buf).await?;
            let line = strip_line_ending(&buf);
            if self.echo.is_enabled() {
                self.echo.received(&String::from_utf8_lossy(line)).await;
            }

            if let Some(reply) = parser.feed_line(line)? {
                debug!("Received from {}: {}", self.peer, reply);
                return Ok(reply);
            }
        }
    }

    /// Sends a command and reads its reply, without classifying it.
    pub async fn exchange(&mut self, command: &Command) -> Result<Reply> {
        self.send(command).await?;
        Ok(self.read_reply().await?)
    }

    /// Checks a reply against the codes `command` accepts at `stage`.
    pub fn expect_reply(
        command: &Command,
        stage: ReplyStage,
        reply: Reply,
    ) -> std::result::Result<Reply, CommandError> {
        if command.accepts(stage, reply.code) {
            Ok(reply)
        } else {
            Err(CommandError::UnexpectedReply {
                command: command.masked(),
                code: reply.code,
                message: reply.message,
            })
        }
    }

    /// Reads the next reply for an already sent `command` and checks it.
    pub async fn expect(&mut self, command: &Command, stage: ReplyStage) -> Result<Reply> {
        let reply = self.read_reply().await?;
        Ok(Self::expect_reply(command, stage, reply)?)
    }

    /// Sends `command` and requires its reply to be accepted at `stage`.
    pub async fn execute(&mut self, command: &Command, stage: ReplyStage) -> Result<Reply> {
        self.send(command).await?;
        self.expect(command, stage).await
    }

    /// Fixes binary image type, stream mode and file structure.
    pub async fn set_transfer_mode(&mut self) -> Result<()> {
        for command in [Command::TYPE('I'), Command::MODE('S'), Command::STRU('F')] {
            self.execute(&command, ReplyStage::Completion).await?;
        }
        debug!("Transfer mode set for {}", self.peer);
        Ok(())
    }

    /// Ends the session: sends `QUIT` without waiting for its reply and
    /// closes the control connection.
    pub async fn quit(mut self) {
        if let Err(e) = self.send(&Command::QUIT).await {
            debug!("QUIT to {} not delivered: {e}", self.peer);
        }
        if let Err(e) = self.writer.shutdown().await {
            warn!("Failed to shut down control connection to {}: {e}", self.peer);
        }
        info!("Control connection to {} closed", self.peer);
    }
}
