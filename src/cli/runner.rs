//! Operation runner
//!
//! Opens a session per invocation, runs one operation against it and
//! always shuts the session down afterwards. Local files are opened here
//! and handed to the session as byte streams.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info};
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::cli::Operation;
use crate::client::{ControlSession, SessionOptions};
use crate::config::ClientConfig;
use crate::error::{FtpError, Result};
use crate::target::{RemoteTarget, is_ftp_url};
use crate::utils::ProtocolEcho;

/// Settings shared by every session opened for one invocation.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub verbose: bool,
    pub default_user: String,
    pub buffer_size: usize,
    pub timeout: Option<Duration>,
}

impl RunContext {
    /// Builds the context from configuration; `verbose` is the command-line flag.
    pub fn from_config(config: &ClientConfig, verbose: bool) -> Self {
        Self {
            verbose: verbose || config.verbose,
            default_user: config.default_user.clone(),
            buffer_size: config.buffer_size,
            timeout: config.operation_timeout(),
        }
    }

    fn target(&self, url: &str) -> Result<RemoteTarget> {
        let target = RemoteTarget::parse_with_user(url, &self.default_user)?;
        debug!("Resolved target {target}");
        Ok(target)
    }

    fn session_options(&self) -> SessionOptions {
        SessionOptions {
            buffer_size: self.buffer_size,
            echo: ProtocolEcho::verbose(self.verbose),
        }
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default(), false)
    }
}

/// Direction of a `cp`/`mv` transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Direction {
    Download { remote: String, local: PathBuf },
    Upload { local: PathBuf, remote: String },
}

/// Decides the transfer direction; exactly one argument must be an FTP URL.
pub fn direction(source: &str, destination: &str) -> Result<Direction> {
    match (is_ftp_url(source), is_ftp_url(destination)) {
        (true, false) => Ok(Direction::Download {
            remote: source.to_string(),
            local: PathBuf::from(destination),
        }),
        (false, true) => Ok(Direction::Upload {
            local: PathBuf::from(source),
            remote: destination.to_string(),
        }),
        _ => Err(FtpError::Usage(
            "one argument must be a local path and the other an ftp:// URL".into(),
        )),
    }
}

#[derive(Debug, Clone, Copy)]
enum Management {
    MakeDir,
    Delete,
    RemoveDir,
}

fn local_io(path: &Path) -> impl FnOnce(io::Error) -> FtpError + '_ {
    move |source| FtpError::Local {
        path: path.display().to_string(),
        source,
    }
}

async fn open_session(target: &RemoteTarget, ctx: &RunContext) -> Result<ControlSession> {
    ControlSession::connect(&target.host, target.port, ctx.session_options()).await
}

/// Shuts the session down whatever the outcome of the operation was.
async fn finish<T>(session: ControlSession, outcome: Result<T>) -> Result<T> {
    session.quit().await;
    outcome
}

/// Runs `operation`, writing listings to `out`.
pub async fn run<W>(operation: Operation, ctx: &RunContext, out: &mut W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    match ctx.timeout {
        Some(limit) => tokio::time::timeout(limit, dispatch(operation, ctx, out))
            .await
            .map_err(|_| FtpError::TimedOut(limit))?,
        None => dispatch(operation, ctx, out).await,
    }
}

async fn dispatch<W>(operation: Operation, ctx: &RunContext, out: &mut W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    match operation {
        Operation::Ls { url } => list(&url, ctx, out).await,
        Operation::Mkdir { url } => manage(&url, ctx, Management::MakeDir).await,
        Operation::Rm { url } => manage(&url, ctx, Management::Delete).await,
        Operation::Rmdir { url } => manage(&url, ctx, Management::RemoveDir).await,
        Operation::Cp {
            source,
            destination,
        } => copy(direction(&source, &destination)?, ctx, false).await,
        Operation::Mv {
            source,
            destination,
        } => copy(direction(&source, &destination)?, ctx, true).await,
    }
}

async fn list<W>(url: &str, ctx: &RunContext, out: &mut W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let target = ctx.target(url)?;
    let mut session = open_session(&target, ctx).await?;
    let outcome = async {
        session.login(&target.user, &target.password).await?;
        session.list(&target.path).await
    }
    .await;
    let listing = finish(session, outcome).await?;

    let stdout = Path::new("<stdout>");
    out.write_all(&listing).await.map_err(local_io(stdout))?;
    out.flush().await.map_err(local_io(stdout))
}

async fn manage(url: &str, ctx: &RunContext, action: Management) -> Result<()> {
    let target = ctx.target(url)?;
    let mut session = open_session(&target, ctx).await?;
    let outcome = async {
        session.login(&target.user, &target.password).await?;
        match action {
            Management::MakeDir => session.make_dir(&target.path).await,
            Management::Delete => session.delete(&target.path).await,
            Management::RemoveDir => session.remove_dir(&target.path).await,
        }
    }
    .await;
    finish(session, outcome).await
}

async fn copy(direction: Direction, ctx: &RunContext, remove_source: bool) -> Result<()> {
    match direction {
        Direction::Download { remote, local } => {
            download(&remote, &local, ctx, remove_source).await
        }
        Direction::Upload { local, remote } => upload(&local, &remote, ctx, remove_source).await,
    }
}

async fn download(remote: &str, local: &Path, ctx: &RunContext, remove_remote: bool) -> Result<()> {
    let target = ctx.target(remote)?;
    let mut session = open_session(&target, ctx).await?;
    let outcome = async {
        session.login(&target.user, &target.password).await?;
        session.set_transfer_mode().await?;
        let mut file = File::create(local).await.map_err(local_io(local))?;
        session.retrieve(&target.path, &mut file).await?;
        if remove_remote {
            session.delete(&target.path).await?;
        }
        Ok::<(), FtpError>(())
    }
    .await;
    finish(session, outcome).await?;

    info!("Downloaded {target} to {}", local.display());
    Ok(())
}

async fn upload(local: &Path, remote: &str, ctx: &RunContext, remove_local: bool) -> Result<()> {
    let target = ctx.target(remote)?;
    let mut file = File::open(local).await.map_err(local_io(local))?;
    let mut session = open_session(&target, ctx).await?;
    let outcome = async {
        session.login(&target.user, &target.password).await?;
        session.set_transfer_mode().await?;
        session.store(&target.path, &mut file).await
    }
    .await;
    finish(session, outcome).await?;
    drop(file);

    if remove_local {
        tokio::fs::remove_file(local).await.map_err(local_io(local))?;
    }
    info!("Uploaded {} to {target}", local.display());
    Ok(())
}
