//! FTP reply parsing
//!
//! Parses reply lines read from the control channel into [`Reply`] values,
//! and extracts the data endpoint announced by a passive mode reply.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use crate::error::{DataChannelError, ReplyError};
use crate::protocol::responses::Reply;

const MULTI_LINE_MARK: u8 = b'-';
const FINAL_LINE_MARK: u8 = b' ';

/// A single parsed reply line: code, the separator right after it, and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyLine {
    pub code: u16,
    pub separator: u8,
    pub message: String,
}

impl ReplyLine {
    /// A line opens a multi-line reply when its code is a positive reply
    /// (1yz to 3yz) and a hyphen follows the code.
    pub fn opens_multi_line(&self) -> bool {
        (100..400).contains(&self.code) && self.separator == MULTI_LINE_MARK
    }
}

/// Strips the trailing `\n` and an optional `\r` before it.
pub fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn message_after_code(line: &[u8]) -> String {
    line.get(4..)
        .map(|rest| String::from_utf8_lossy(rest).trim().to_string())
        .unwrap_or_default()
}

/// Parses one reply line (without its line ending).
pub fn parse_reply_line(line: &[u8]) -> Result<ReplyLine, ReplyError> {
    if line.len() < 4 {
        return Err(ReplyError::LineTooShort(
            String::from_utf8_lossy(line).to_string(),
        ));
    }

    let digits = &line[..3];
    if !digits.iter().all(u8::is_ascii_digit) {
        return Err(ReplyError::InvalidCode(
            String::from_utf8_lossy(digits).to_string(),
        ));
    }
    let code = digits
        .iter()
        .fold(0u16, |acc, d| acc * 10 + u16::from(d - b'0'));

    Ok(ReplyLine {
        code,
        separator: line[3],
        message: message_after_code(line),
    })
}

/// Whether `line` closes the multi-line reply opened with `code`.
///
/// The closing line repeats the code as text followed by a space.
pub fn is_final_line(line: &[u8], code: u16) -> bool {
    let code_text = code.to_string();
    line.len() >= 4
        && line.starts_with(code_text.as_bytes())
        && line[3] == FINAL_LINE_MARK
}

/// Reply parser states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyState {
    FirstLine,
    Continuation { code: u16 },
}

/// Two-state machine assembling one logical reply from control channel lines.
///
/// Continuation lines of a multi-line reply are consumed but not kept; the
/// message of a multi-line reply is the text of its closing line.
#[derive(Debug)]
pub struct ReplyParser {
    state: ReplyState,
}

impl Default for ReplyParser {
    fn default() -> Self {
        Self {
            state: ReplyState::FirstLine,
        }
    }
}

impl ReplyParser {
    pub fn state(&self) -> ReplyState {
        self.state
    }

    /// Feeds one line (without its line ending).
    ///
    /// Returns `Some(reply)` once the reply is complete, `None` while more
    /// lines are needed.
    pub fn feed_line(&mut self, line: &[u8]) -> Result<Option<Reply>, ReplyError> {
        match self.state {
            ReplyState::FirstLine => {
                let first = parse_reply_line(line)?;
                if first.opens_multi_line() {
                    self.state = ReplyState::Continuation { code: first.code };
                    Ok(None)
                } else {
                    Ok(Some(Reply::new(first.code, first.message)))
                }
            }
            ReplyState::Continuation { code } => {
                if is_final_line(line, code) {
                    self.state = ReplyState::FirstLine;
                    Ok(Some(Reply::new(code, message_after_code(line))))
                } else {
                    Ok(None)
                }
            }
        }
    }
}

fn parse_octet(group: &str) -> Result<u8, DataChannelError> {
    if group.is_empty() || !group.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DataChannelError::MalformedEndpoint(format!(
            "invalid number {group:?}"
        )));
    }
    group
        .parse::<u8>()
        .map_err(|_| DataChannelError::MalformedEndpoint(format!("{group} does not fit an octet")))
}

fn parse_endpoint_group(inner: &str) -> Result<SocketAddr, DataChannelError> {
    let groups: Vec<&str> = inner.split(',').collect();
    if groups.len() != 6 {
        return Err(DataChannelError::MalformedEndpoint(format!(
            "expected 6 numbers in ({inner})"
        )));
    }

    let mut octets = [0u8; 6];
    for (octet, group) in octets.iter_mut().zip(&groups) {
        *octet = parse_octet(group)?;
    }

    let ip = Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3]);
    let port = u16::from_be_bytes([octets[4], octets[5]]);
    Ok(SocketAddr::V4(SocketAddrV4::new(ip, port)))
}

/// Extracts the data endpoint from the message of a 227 reply.
///
/// The endpoint is the first parenthesized group of the form
/// `(h1,h2,h3,h4,p1,p2)`; other parenthesized text is skipped. The address
/// is `h1.h2.h3.h4` and the port `p1 * 256 + p2`.
pub fn parse_pasv_endpoint(message: &str) -> Result<SocketAddr, DataChannelError> {
    let mut last_error = None;
    let mut rest = message;

    while let Some(start) = rest.find('(') {
        let after = &rest[start + 1..];
        let Some(end) = after.find(')') else {
            break;
        };
        match parse_endpoint_group(&after[..end]) {
            Ok(addr) => return Ok(addr),
            Err(e) => last_error = Some(e),
        }
        rest = &after[end + 1..];
    }

    Err(last_error.unwrap_or_else(|| DataChannelError::MalformedEndpoint(message.to_string())))
}
