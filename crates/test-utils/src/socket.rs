#![allow(dead_code)]

//! Unix-socket listeners used as the far end of the socket channel.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixListener;
use tokio::task::JoinHandle;

/// A listener bound inside its own temp dir. Aborted and cleaned up on drop.
pub struct SocketFixture {
    path: PathBuf,
    received: Arc<Mutex<Vec<String>>>,
    accepted: Arc<Mutex<usize>>,
    handle: JoinHandle<()>,
    _dir: TempDir,
}

impl SocketFixture {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Everything the clients sent, one entry per connection.
    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }

    /// Number of accepted connections so far.
    pub fn accepted(&self) -> usize {
        *self.accepted.lock().unwrap()
    }

    /// Listener that writes `response` to every connection and then closes it.
    pub fn responder(response: &str) -> Self {
        let response = response.to_string();
        Self::spawn(move |_index, mut stream, _received| {
            let response = response.clone();
            async move {
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        })
    }

    /// Listener that records everything each client sends until it closes.
    pub fn recorder() -> Self {
        Self::spawn(|_index, mut stream, received| async move {
            let mut buf = Vec::new();
            let _ = stream.read_to_end(&mut buf).await;
            received
                .lock()
                .unwrap()
                .push(String::from_utf8_lossy(&buf).into_owned());
        })
    }

    /// Listener that hangs up on the first connection without sending
    /// anything, then answers later connections with `response`.
    pub fn drop_first_then_respond(response: &str) -> Self {
        let response = response.to_string();
        Self::spawn(move |index, mut stream, _received| {
            let response = response.clone();
            async move {
                if index > 0 {
                    let _ = stream.write_all(response.as_bytes()).await;
                }
                let _ = stream.shutdown().await;
            }
        })
    }

    /// Listener that accepts every connection and closes it straight away.
    pub fn hang_up() -> Self {
        Self::spawn(|_index, stream, _received| async move {
            drop(stream);
        })
    }

    /// Listener that writes `parts` to every connection one by one, pausing
    /// between writes so each part arrives in its own read.
    pub fn chunked(parts: &[&str]) -> Self {
        let parts: Vec<String> = parts.iter().map(|p| p.to_string()).collect();
        Self::spawn(move |_index, mut stream, _received| {
            let parts = parts.clone();
            async move {
                for part in parts {
                    if stream.write_all(part.as_bytes()).await.is_err() {
                        return;
                    }
                    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
                }
                let _ = stream.shutdown().await;
            }
        })
    }

    /// Listener that accepts a single connection, writes `text`, hangs up
    /// and then disappears (the socket file is removed).
    pub fn one_shot(text: &str) -> Self {
        let dir = tempfile::tempdir().expect("creating temp dir for socket");
        let path = dir.path().join("exectester.sock");
        let listener = UnixListener::bind(&path).expect("binding test unix socket");
        let accepted = Arc::new(Mutex::new(0));
        let text = text.to_string();

        let handle = {
            let accepted = Arc::clone(&accepted);
            let path = path.clone();
            tokio::spawn(async move {
                if let Ok((mut stream, _)) = listener.accept().await {
                    *accepted.lock().unwrap() += 1;
                    let _ = stream.write_all(text.as_bytes()).await;
                    let _ = stream.shutdown().await;
                }
                drop(listener);
                let _ = std::fs::remove_file(&path);
            })
        };

        Self {
            path,
            received: Arc::new(Mutex::new(Vec::new())),
            accepted,
            handle,
            _dir: dir,
        }
    }

    fn spawn<H, Fut>(handler: H) -> Self
    where
        H: Fn(usize, tokio::net::UnixStream, Arc<Mutex<Vec<String>>>) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let dir = tempfile::tempdir().expect("creating temp dir for socket");
        let path = dir.path().join("exectester.sock");
        let listener = UnixListener::bind(&path).expect("binding test unix socket");
        let received = Arc::new(Mutex::new(Vec::new()));
        let accepted = Arc::new(Mutex::new(0));

        let handle = {
            let received = Arc::clone(&received);
            let accepted = Arc::clone(&accepted);
            tokio::spawn(async move {
                let mut index = 0;
                while let Ok((stream, _)) = listener.accept().await {
                    *accepted.lock().unwrap() += 1;
                    tokio::spawn(handler(index, stream, Arc::clone(&received)));
                    index += 1;
                }
            })
        };

        Self {
            path,
            received,
            accepted,
            handle,
            _dir: dir,
        }
    }
}

impl Drop for SocketFixture {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
