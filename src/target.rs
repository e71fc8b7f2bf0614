//! Remote targets
//!
//! Parses `ftp://[USER[:PASSWORD]@]HOST[:PORT]/PATH` URLs into the
//! connection and path information a session needs.

use std::fmt;

use percent_encoding::percent_decode_str;
use url::{Host, Url};

use crate::error::TargetError;

pub const DEFAULT_FTP_PORT: u16 = 21;
pub const DEFAULT_USER: &str = "anonymous";

/// Connection and path information parsed from an FTP URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTarget {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub path: String,
}

/// Whether `s` names a remote location rather than a local path.
pub fn is_ftp_url(s: &str) -> bool {
    s.starts_with("ftp://")
}

fn decode(raw: &str, what: &'static str) -> Result<String, TargetError> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|_| TargetError::InvalidEncoding(what))
}

impl RemoteTarget {
    /// Parses `raw`, logging in as the anonymous user when it names none.
    pub fn parse(raw: &str) -> Result<Self, TargetError> {
        Self::parse_with_user(raw, DEFAULT_USER)
    }

    /// Parses `raw`, using `default_user` with an empty password when the
    /// URL names no user. The port defaults to 21.
    pub fn parse_with_user(raw: &str, default_user: &str) -> Result<Self, TargetError> {
        let url = Url::parse(raw)?;
        if url.scheme() != "ftp" {
            return Err(TargetError::UnsupportedScheme(url.scheme().to_string()));
        }

        let host = match url.host() {
            Some(Host::Domain(d)) if !d.is_empty() => d.to_string(),
            Some(Host::Ipv4(ip)) => ip.to_string(),
            Some(Host::Ipv6(ip)) => ip.to_string(),
            _ => return Err(TargetError::MissingHost),
        };

        let port = match url.port() {
            Some(0) => return Err(TargetError::InvalidPort(0)),
            Some(port) => port,
            None => DEFAULT_FTP_PORT,
        };

        let (user, password) = if url.username().is_empty() {
            (default_user.to_string(), String::new())
        } else {
            let user = decode(url.username(), "username")?;
            let password = match url.password() {
                Some(p) => decode(p, "password")?,
                None => String::new(),
            };
            (user, password)
        };

        let mut path = decode(url.path(), "path")?;
        if !path.starts_with('/') {
            path.insert(0, '/');
        }

        Ok(RemoteTarget {
            host,
            port,
            user,
            password,
            path,
        })
    }
}

/// Short description of the target, without the password.
impl fmt::Display for RemoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "ftp://{}@[{}]:{}{}", self.user, self.host, self.port, self.path)
        } else {
            write!(f, "ftp://{}@{}:{}{}", self.user, self.host, self.port, self.path)
        }
    }
}
