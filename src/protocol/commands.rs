//! Module `commands`
//!
//! Defines the FTP commands issued by the client, their wire rendering,
//! and the table of reply codes each command accepts at each reply stage.

use std::fmt;

use crate::protocol::responses::*;

/// Represents an FTP command sent by the client.
///
/// `GREETING` is not sent on the wire; it names the server's connect-time
/// reply so the greeting is classified through the same table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    GREETING,
    USER(String), // Username for login
    PASS(String), // Password for login
    TYPE(char),   // Representation type, `I` for image
    MODE(char),   // Transfer mode, `S` for stream
    STRU(char),   // File structure, `F` for file
    PASV,         // Enter passive mode
    LIST(String), // Directory listing
    RETR(String), // Retrieve/download file
    STOR(String), // Store/upload file
    DELE(String), // Delete file
    MKD(String),  // Make directory
    RMD(String),  // Remove directory
    QUIT,
}

/// Stage of a command's conversation that a reply belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyStage {
    /// Positive preliminary reply, more replies follow (1yz)
    Preliminary,
    /// Positive intermediate reply, the server waits for another command (3yz)
    Intermediate,
    /// Terminal success reply
    Completion,
}

impl Command {
    /// Returns the bare command verb.
    pub fn verb(&self) -> &'static str {
        match self {
            Command::GREETING => "GREETING",
            Command::USER(_) => "USER",
            Command::PASS(_) => "PASS",
            Command::TYPE(_) => "TYPE",
            Command::MODE(_) => "MODE",
            Command::STRU(_) => "STRU",
            Command::PASV => "PASV",
            Command::LIST(_) => "LIST",
            Command::RETR(_) => "RETR",
            Command::STOR(_) => "STOR",
            Command::DELE(_) => "DELE",
            Command::MKD(_) => "MKD",
            Command::RMD(_) => "RMD",
            Command::QUIT => "QUIT",
        }
    }

    /// Reply codes accepted for this command at the given stage.
    ///
    /// An empty set means the stage does not exist for the command.
    /// `QUIT` has no accepted codes at all, its reply is never checked.
    pub fn accepted_codes(&self, stage: ReplyStage) -> &'static [u16] {
        use ReplyStage::*;

        match (self, stage) {
            (Command::GREETING, Preliminary) => &[SERVICE_READY_LATER],
            (Command::GREETING, Completion) => &[READY],
            (Command::USER(_), Intermediate) => &[PASSWORD_REQUIRED],
            (Command::USER(_), Completion) => &[LOGIN_SUCCESS],
            (Command::PASS(_), Completion) => &[LOGIN_SUCCESS],
            (Command::TYPE(_) | Command::MODE(_) | Command::STRU(_), Completion) => {
                &[OK, FILE_ACTION_OK]
            }
            (Command::PASV, Completion) => &[ENTERING_PASSIVE_MODE],
            (Command::LIST(_) | Command::RETR(_) | Command::STOR(_), Preliminary) => {
                &[FILE_STATUS_OK, DATA_CONNECTION_ALREADY_OPEN]
            }
            (Command::LIST(_) | Command::RETR(_) | Command::STOR(_), Completion) => {
                &[TRANSFER_COMPLETE, FILE_ACTION_OK]
            }
            (Command::DELE(_), Completion) => &[FILE_ACTION_OK],
            (Command::MKD(_), Completion) => &[PATHNAME_CREATED, FILE_ACTION_OK],
            (Command::RMD(_), Completion) => &[FILE_ACTION_OK],
            _ => &[],
        }
    }

    /// Whether `code` is accepted for this command at the given stage.
    pub fn accepts(&self, stage: ReplyStage, code: u16) -> bool {
        self.accepted_codes(stage).contains(&code)
    }

    /// Finds the stage a reply code belongs to, `None` when no stage accepts it.
    pub fn classify(&self, code: u16) -> Option<ReplyStage> {
        [
            ReplyStage::Preliminary,
            ReplyStage::Intermediate,
            ReplyStage::Completion,
        ]
        .into_iter()
        .find(|stage| self.accepts(*stage, code))
    }

    /// Renders the command for logs, with the password masked.
    pub fn masked(&self) -> String {
        match self {
            Command::PASS(_) => "PASS ****".to_string(),
            other => other.to_string(),
        }
    }
}

/// Renders the command line as sent on the wire, without the CRLF terminator.
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::USER(arg)
            | Command::PASS(arg)
            | Command::LIST(arg)
            | Command::RETR(arg)
            | Command::STOR(arg)
            | Command::DELE(arg)
            | Command::MKD(arg)
            | Command::RMD(arg) => write!(f, "{} {}", self.verb(), arg),
            Command::TYPE(c) | Command::MODE(c) | Command::STRU(c) => {
                write!(f, "{} {}", self.verb(), c)
            }
            Command::GREETING | Command::PASV | Command::QUIT => f.write_str(self.verb()),
        }
    }
}
