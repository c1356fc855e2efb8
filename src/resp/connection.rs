//! # Connection
//!
//! Owns one transport session with the server. Requests are strictly
//! sequential: write a command, then read exactly one reply.
//!
//! The stream is boxed behind [`Transport`] so tests can swap the TCP
//! socket for an in-memory duplex or a scripted mock.

use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use super::command::Command;
use super::error::RespError;
use super::reply::{self, Reply};

/// Start and end sentinel of a SCAN iteration.
pub const SCAN_START: &str = "0";

/// Any byte stream the client can talk over.
pub trait Transport: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> Transport for T {}

/// Connection handle shared between the session and in-flight tasks.
pub type SharedConnection = Arc<Mutex<Connection>>;

pub struct Connection {
    stream: BufReader<Box<dyn Transport>>,
    peer: String,
}

impl Connection {
    /// Open a TCP connection to `address` (`host:port`).
    pub async fn connect(address: &str) -> Result<Self, RespError> {
        let stream = TcpStream::connect(address).await?;
        stream.set_nodelay(true)?;
        info!("Connected to {}", address);
        Ok(Self::from_stream(stream, address))
    }

    /// Wrap an already established stream.
    pub fn from_stream(stream: impl Transport + 'static, peer: impl Into<String>) -> Self {
        Self {
            stream: BufReader::new(Box::new(stream)),
            peer: peer.into(),
        }
    }

    pub fn into_shared(self) -> SharedConnection {
        Arc::new(Mutex::new(self))
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }

    pub async fn send(&mut self, command: &Command) -> Result<(), RespError> {
        self.stream.write_all(&command.encode()).await?;
        self.stream.flush().await?;
        Ok(())
    }

    pub async fn read_reply(&mut self) -> Result<Reply, RespError> {
        reply::decode(&mut self.stream).await
    }

    /// Send one command and wait for its reply.
    pub async fn request(&mut self, command: &Command) -> Result<Reply, RespError> {
        info!("Sending: {}", command);
        self.send(command).await?;
        let reply = self.read_reply().await?;
        debug!("Reply to {}: {:?}", command.name(), reply);
        Ok(reply)
    }

    /// Enumerate every key matching `pattern` with cursor-driven SCAN calls.
    ///
    /// Keys are accumulated client-side and returned as one array reply so
    /// the caller can treat the scan like any other command. If the server
    /// answers a page with an error reply, that reply is returned as is.
    pub async fn scan_keys(
        &mut self,
        pattern: &str,
        count: Option<u32>,
    ) -> Result<Reply, RespError> {
        let mut cursor = SCAN_START.to_string();
        let mut keys = Vec::new();
        let mut pages = 0usize;

        loop {
            let mut args = vec![cursor.clone(), "MATCH".to_string(), pattern.to_string()];
            if let Some(count) = count {
                args.push("COUNT".to_string());
                args.push(count.to_string());
            }

            let reply = self.request(&Command::new("SCAN", args)).await?;
            if let Reply::Error(msg) = &reply {
                warn!("SCAN of '{}' refused: {}", pattern, msg);
                return Ok(reply);
            }
            let (next, page) = split_scan_page(reply)?;
            keys.extend(page);
            cursor = next;
            pages += 1;

            if cursor == SCAN_START {
                break;
            }
        }

        info!("Scan of '{}' finished: {} keys in {} pages", pattern, keys.len(), pages);
        Ok(Reply::Array(Some(keys)))
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection").field("peer", &self.peer).finish()
    }
}

/// A SCAN page is `[cursor, [key, ...]]`. Keys stay as the bulk replies
/// the server sent.
fn split_scan_page(reply: Reply) -> Result<(String, Vec<Reply>), RespError> {
    let parts = match reply {
        Reply::Array(Some(parts)) if parts.len() == 2 => parts,
        other => {
            return Err(RespError::protocol(format!("malformed SCAN reply: {other:?}")));
        }
    };

    let mut parts = parts.into_iter();
    let cursor = parts
        .next()
        .and_then(Reply::into_scalar)
        .ok_or_else(|| RespError::protocol("SCAN cursor is not a string"))?;
    let keys = match parts.next() {
        Some(Reply::Array(Some(keys)))
            if keys
                .iter()
                .all(|key| matches!(key, Reply::Bulk(Some(_)) | Reply::Text(_))) =>
        {
            keys
        }
        _ => return Err(RespError::protocol("SCAN keys are not a string array")),
    };

    Ok((cursor, keys))
}
