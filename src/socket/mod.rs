// src/socket/mod.rs

//! Unix-socket channel plumbing.
//!
//! - [`client`] owns a single connection and implements dial-with-retry,
//!   send, and the read-until-sentinel loop.
//! - [`backoff`] is the exponential backoff used while dialing.
//!
//! The wire format is plain UTF-8 text; callers append the trailing newline.

use std::time::Duration;

use thiserror::Error;

pub mod backoff;
pub mod client;

pub use backoff::ExponentialBackoff;
pub use client::{READ_BUFFER_SIZE, SocketClient, max_retained};

/// Dial timeout used for every socket connection. Not user configurable.
pub const SOCKET_DIAL_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Error, Debug)]
pub enum SocketError {
    #[error("Reached timeout of '{timeout:?}' waiting for socket '{path}'. Error from socket: {reason}")]
    ConnectTimeout {
        path: String,
        timeout: Duration,
        reason: String,
    },

    #[error("socket '{0}' is not connected")]
    NotConnected(String),

    #[error("failed writing to socket '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("reading from socket '{path}' failed ({reason}) and reconnecting failed: {reconnect}")]
    Read {
        path: String,
        reason: String,
        reconnect: Box<SocketError>,
    },
}
