// src/stream/mod.rs

//! Per-channel repeat / interpolate / emit loops.
//!
//! One [`StreamRunner`] is spawned per active channel. Runners share the
//! schedule by value and own everything else (counter, clock, socket client),
//! so no state is shared between them.

use thiserror::Error;

use crate::socket::SocketError;
use crate::types::Channel;

pub mod runner;

pub use runner::{ChannelTarget, StreamRunner};

/// Why a runner stopped on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `repeat` iterations were produced.
    RepeatCount,
    /// The timeout elapsed (checked at iteration boundaries).
    Timeout,
}

/// Failure that ends a single runner early. Siblings are unaffected.
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error(transparent)]
    Socket(#[from] SocketError),

    #[error("failed writing {channel} output: {source}")]
    Sink {
        channel: Channel,
        #[source]
        source: std::io::Error,
    },
}

/// Final report of a runner, sent back to the dispatcher.
#[derive(Debug)]
pub struct RunnerReport {
    pub channel: Channel,
    /// Number of completed iterations.
    pub iterations: u64,
    pub outcome: Result<StopReason, RunnerError>,
}
