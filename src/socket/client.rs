// src/socket/client.rs

//! Resilient unix-socket client.
//!
//! One client owns at most one live connection. Dialing retries with
//! [`ExponentialBackoff`] until the dial timeout elapses; a failed read
//! triggers exactly one fresh dial before the failure becomes terminal.
//!
//! Reading consumes bytes from the socket, so anything else connected to the
//! same listener competes for the same messages.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tracing::{debug, error, info, warn};

use super::SocketError;
use super::backoff::{DEFAULT_INITIAL_INTERVAL, ExponentialBackoff};

/// Size of the buffer used for each socket read.
pub const READ_BUFFER_SIZE: usize = 1024;

#[derive(Debug)]
pub struct SocketClient {
    path: PathBuf,
    dial_timeout: Duration,
    initial_backoff: Duration,
    conn: Option<UnixStream>,
}

impl SocketClient {
    /// Create a client without dialing. Use [`SocketClient::dial`] or
    /// [`SocketClient::connect`] to obtain a connection.
    pub fn new(path: impl Into<PathBuf>, dial_timeout: Duration) -> Self {
        Self {
            path: path.into(),
            dial_timeout,
            initial_backoff: DEFAULT_INITIAL_INTERVAL,
            conn: None,
        }
    }

    /// Override the first retry delay (1s by default).
    pub fn with_initial_backoff(mut self, initial: Duration) -> Self {
        self.initial_backoff = initial;
        self
    }

    /// Create a client and dial it straight away.
    pub async fn connect(
        path: impl Into<PathBuf>,
        dial_timeout: Duration,
    ) -> Result<Self, SocketError> {
        let mut client = Self::new(path, dial_timeout);
        client.dial().await?;
        Ok(client)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Replace the current connection (if any) with a freshly dialed one.
    pub async fn dial(&mut self) -> Result<(), SocketError> {
        self.close().await;

        let mut backoff =
            ExponentialBackoff::new(self.dial_timeout).with_initial(self.initial_backoff);

        loop {
            let attempt = tokio::time::timeout(self.dial_timeout, UnixStream::connect(&self.path));
            let reason = match attempt.await {
                Ok(Ok(stream)) => {
                    info!(socket = %self.path.display(), "connected to socket");
                    self.conn = Some(stream);
                    return Ok(());
                }
                Ok(Err(e)) => e.to_string(),
                Err(_) => format!("dial timed out after {:?}", self.dial_timeout),
            };

            warn!(
                socket = %self.path.display(),
                error = %reason,
                "failed to connect to socket; retrying"
            );

            match backoff.next_delay() {
                Some(delay) => tokio::time::sleep(delay).await,
                None => {
                    error!(
                        socket = %self.path.display(),
                        timeout = ?self.dial_timeout,
                        "timed out connecting to socket"
                    );
                    return Err(SocketError::ConnectTimeout {
                        path: self.path.display().to_string(),
                        timeout: self.dial_timeout,
                        reason,
                    });
                }
            }
        }
    }

    /// Write `text` in a single call. Errors are returned, never retried.
    pub async fn send(&mut self, text: &str) -> Result<(), SocketError> {
        let path = self.path.display().to_string();
        let conn = self
            .conn
            .as_mut()
            .ok_or_else(|| SocketError::NotConnected(path.clone()))?;

        conn.write_all(text.as_bytes())
            .await
            .map_err(|source| SocketError::Write { path, source })?;

        debug!(socket = %self.path.display(), bytes = text.len(), "sent to socket");
        Ok(())
    }

    /// Read until the received text contains `sentinel`.
    ///
    /// Returns the chunk holding the sentinel, prefixed by at most
    /// `sentinel.len() - 1` bytes of earlier data so a sentinel split across
    /// two reads is still found. At most [`max_retained`] bytes are buffered.
    ///
    /// Without a (non-empty) sentinel this only returns on failure. A read
    /// error or end-of-stream triggers one [`SocketClient::dial`]; if that
    /// dial fails the read error becomes terminal.
    pub async fn read_until(&mut self, sentinel: Option<&str>) -> Result<String, SocketError> {
        let sentinel = sentinel.filter(|s| !s.is_empty());
        let mut received: Vec<u8> = Vec::new();
        let mut buf = [0u8; READ_BUFFER_SIZE];

        loop {
            let read = match self.conn.as_mut() {
                Some(conn) => conn.read(&mut buf).await,
                None => Err(std::io::Error::new(
                    std::io::ErrorKind::NotConnected,
                    "no active connection",
                )),
            };

            let reason = match read {
                Ok(0) => "EOF".to_string(),
                Ok(n) => {
                    let chunk = &buf[..n];
                    info!(
                        socket = %self.path.display(),
                        received = %String::from_utf8_lossy(chunk),
                        "received from socket"
                    );

                    let Some(sentinel) = sentinel else {
                        continue;
                    };
                    received.extend_from_slice(chunk);
                    if contains_subslice(&received, sentinel.as_bytes()) {
                        info!(
                            socket = %self.path.display(),
                            exit_msg = sentinel,
                            "received exit message; closing client"
                        );
                        return Ok(String::from_utf8_lossy(&received).into_owned());
                    }
                    retain_tail(&mut received, sentinel.len().saturating_sub(1));
                    continue;
                }
                Err(e) => e.to_string(),
            };

            error!(
                socket = %self.path.display(),
                error = %reason,
                "socket read failed; retrying connection"
            );
            received.clear();

            if let Err(reconnect) = self.dial().await {
                return Err(SocketError::Read {
                    path: self.path.display().to_string(),
                    reason,
                    reconnect: Box::new(reconnect),
                });
            }
        }
    }

    /// Close the connection. Safe to call repeatedly or before any dial.
    pub async fn close(&mut self) {
        if let Some(mut conn) = self.conn.take() {
            if let Err(e) = conn.shutdown().await {
                debug!(socket = %self.path.display(), error = %e, "socket shutdown failed");
            }
        }
    }
}

/// Upper bound on the bytes [`SocketClient::read_until`] holds for `sentinel`.
pub fn max_retained(sentinel: &str) -> usize {
    READ_BUFFER_SIZE + sentinel.len().saturating_sub(1)
}

/// Drop everything but the last `keep` bytes.
fn retain_tail(buf: &mut Vec<u8>, keep: usize) {
    if buf.len() > keep {
        buf.drain(..buf.len() - keep);
    }
}

fn contains_subslice(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|w| w == needle)
}
