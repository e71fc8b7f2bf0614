//! Scripted in-process FTP server for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

pub type Files = Arc<Mutex<HashMap<String, Vec<u8>>>>;

/// Replies the server sends; `None` fields use the server's built-in behavior.
#[derive(Clone)]
pub struct Behavior {
    pub greeting: Vec<String>,
    pub user_reply: String,
    pub pass_reply: String,
    pub type_reply: String,
    pub pasv_reply: Option<String>,
    pub mkd_reply: Option<String>,
    pub stor_completion: Option<String>,
    pub connections: usize,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            greeting: vec!["220 Welcome to RAX FTP Server".into()],
            user_reply: "331 Password required".into(),
            pass_reply: "230 Login successful".into(),
            type_reply: "200 Switching to Binary mode.".into(),
            pasv_reply: None,
            mkd_reply: None,
            stor_completion: None,
            connections: 1,
        }
    }
}

pub struct MockServer {
    pub addr: SocketAddr,
    files: Files,
    handle: JoinHandle<Vec<String>>,
}

impl MockServer {
    pub async fn start(behavior: Behavior) -> Self {
        Self::start_with_files(behavior, &[]).await
    }

    pub async fn start_with_files(behavior: Behavior, initial: &[(&str, &[u8])]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let files: Files = Arc::new(Mutex::new(
            initial
                .iter()
                .map(|(path, bytes)| (path.to_string(), bytes.to_vec()))
                .collect(),
        ));

        let handle = tokio::spawn(serve(listener, behavior, Arc::clone(&files)));
        MockServer {
            addr,
            files,
            handle,
        }
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn url(&self, path: &str) -> String {
        format!("ftp://127.0.0.1:{}{}", self.port(), path)
    }

    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(path).cloned()
    }

    /// Waits for the server to serve all its connections and returns every
    /// command line it received.
    pub async fn finish(self) -> Vec<String> {
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server did not finish")
            .expect("server task panicked")
    }
}

async fn reply(writer: &mut OwnedWriteHalf, line: &str) {
    let _ = writer.write_all(format!("{line}\r\n").as_bytes()).await;
    let _ = writer.flush().await;
}

async fn accept_data(listener: TcpListener) -> TcpStream {
    let (stream, _) = tokio::time::timeout(Duration::from_secs(5), listener.accept())
        .await
        .expect("client never opened the data channel")
        .unwrap();
    stream
}

async fn serve(listener: TcpListener, behavior: Behavior, files: Files) -> Vec<String> {
    let mut log = Vec::new();
    for _ in 0..behavior.connections {
        let Ok((stream, _)) = listener.accept().await else {
            break;
        };
        serve_connection(stream, &behavior, &files, &mut log).await;
    }
    log
}

async fn serve_connection(
    stream: TcpStream,
    behavior: &Behavior,
    files: &Files,
    log: &mut Vec<String>,
) {
    let (read_half, mut writer) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    for line in &behavior.greeting {
        reply(&mut writer, line).await;
    }

    let mut passive: Option<TcpListener> = None;
    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        let command = line.trim_end().to_string();
        log.push(command.clone());
        let (verb, arg) = match command.split_once(' ') {
            Some((verb, arg)) => (verb.to_string(), arg.to_string()),
            None => (command.clone(), String::new()),
        };

        match verb.as_str() {
            "USER" => reply(&mut writer, &behavior.user_reply).await,
            "PASS" => reply(&mut writer, &behavior.pass_reply).await,
            "TYPE" => reply(&mut writer, &behavior.type_reply).await,
            "MODE" | "STRU" => reply(&mut writer, "200 OK").await,
            "PASV" => {
                if let Some(r) = &behavior.pasv_reply {
                    reply(&mut writer, r).await;
                    continue;
                }
                let data_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
                let port = data_listener.local_addr().unwrap().port();
                let message = format!(
                    "227 Entering Passive Mode (127,0,0,1,{},{}).",
                    port >> 8,
                    port & 0xff
                );
                passive = Some(data_listener);
                reply(&mut writer, &message).await;
            }
            "LIST" => {
                let Some(data_listener) = passive.take() else {
                    reply(&mut writer, "425 Use PASV first.").await;
                    continue;
                };
                reply(&mut writer, "150 Here comes the directory listing.").await;
                let mut data = accept_data(data_listener).await;
                let mut names: Vec<String> = files.lock().unwrap().keys().cloned().collect();
                names.sort();
                let listing: String = names.iter().map(|n| format!("{n}\r\n")).collect();
                let _ = data.write_all(listing.as_bytes()).await;
                drop(data);
                reply(&mut writer, "226 Directory send OK.").await;
            }
            "RETR" => {
                let Some(data_listener) = passive.take() else {
                    reply(&mut writer, "425 Use PASV first.").await;
                    continue;
                };
                let content = files.lock().unwrap().get(&arg).cloned();
                match content {
                    None => reply(&mut writer, "550 Failed to open file.").await,
                    Some(bytes) => {
                        reply(&mut writer, "150 Opening BINARY mode data connection.").await;
                        let mut data = accept_data(data_listener).await;
                        let _ = data.write_all(&bytes).await;
                        let _ = data.shutdown().await;
                        drop(data);
                        reply(&mut writer, "226 Transfer complete.").await;
                    }
                }
            }
            "STOR" => {
                let Some(data_listener) = passive.take() else {
                    reply(&mut writer, "425 Use PASV first.").await;
                    continue;
                };
                reply(&mut writer, "150 Ok to send data.").await;
                let mut data = accept_data(data_listener).await;
                let mut received = Vec::new();
                // completes only once the client closes its side
                let _ = data.read_to_end(&mut received).await;
                files.lock().unwrap().insert(arg, received);
                let completion = behavior
                    .stor_completion
                    .clone()
                    .unwrap_or_else(|| "226 Transfer complete.".into());
                reply(&mut writer, &completion).await;
            }
            "DELE" => {
                let removed = files.lock().unwrap().remove(&arg).is_some();
                if removed {
                    reply(&mut writer, "250 Delete operation successful.").await;
                } else {
                    reply(&mut writer, "550 Delete operation failed.").await;
                }
            }
            "MKD" => {
                let r = behavior
                    .mkd_reply
                    .clone()
                    .unwrap_or_else(|| format!("257 \"{arg}\" created"));
                reply(&mut writer, &r).await;
            }
            "RMD" => reply(&mut writer, "250 Remove directory operation successful.").await,
            "QUIT" => {
                reply(&mut writer, "221 Goodbye.").await;
                break;
            }
            _ => reply(&mut writer, "502 Command not implemented.").await,
        }
    }
}
