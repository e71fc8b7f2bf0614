//! Login sequence
//!
//! Implements the USER/PASS exchange as an explicit state machine.

use log::{debug, info};

use crate::client::ControlSession;
use crate::error::{AuthError, Result};
use crate::protocol::{Command, ReplyStage};

/// States of the login sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginState {
    Start,
    AwaitUserReply,
    NeedPassword,
    AwaitPassReply,
    Authenticated,
    Failed { code: u16, message: String },
}

impl LoginState {
    /// Whether the sequence has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoginState::Authenticated | LoginState::Failed { .. })
    }

    /// Transition taken on a reply to the command sent in this state.
    pub fn on_reply(&self, command: &Command, code: u16, message: &str) -> LoginState {
        let stage = command.classify(code);
        match (self, stage) {
            (LoginState::AwaitUserReply, Some(ReplyStage::Intermediate)) => {
                LoginState::NeedPassword
            }
            (
                LoginState::AwaitUserReply | LoginState::AwaitPassReply,
                Some(ReplyStage::Completion),
            ) => LoginState::Authenticated,
            _ => LoginState::Failed {
                code,
                message: message.to_string(),
            },
        }
    }
}

impl ControlSession {
    /// Authenticates with `USER` and, when the server asks for it, `PASS`.
    ///
    /// A 230 reply to `USER` completes the login without sending a password.
    pub async fn login(&mut self, user: &str, password: &str) -> Result<()> {
        let mut state = LoginState::Start;

        while !state.is_terminal() {
            state = match state {
                LoginState::Start => {
                    let command = Command::USER(user.to_string());
                    self.send(&command).await?;
                    let reply = self.read_reply().await?;
                    LoginState::AwaitUserReply.on_reply(&command, reply.code, &reply.message)
                }
                LoginState::NeedPassword => {
                    debug!("Password required for user {user}");
                    let command = Command::PASS(password.to_string());
                    self.send(&command).await?;
                    let reply = self.read_reply().await?;
                    LoginState::AwaitPassReply.on_reply(&command, reply.code, &reply.message)
                }
                other => other,
            };
        }

        match state {
            LoginState::Failed { code, message } => Err(AuthError::Rejected { code, message }.into()),
            _ => {
                info!("Logged in to {} as {user}", self.peer());
                Ok(())
            }
        }
    }
}
