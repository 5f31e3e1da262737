// src/engine/mod.rs

//! Dispatch engine for exectester.
//!
//! This module ties together:
//! - one [`crate::stream::StreamRunner`] task per active channel
//! - the SIGINT / SIGTERM watch ([`signals`])
//! - the grace-period shutdown policy and the exit-code decision
//!   ([`dispatcher`])

use crate::stream::RunnerReport;

pub mod dispatcher;
pub mod signals;

pub use dispatcher::{dispatch, dispatch_with};
pub use signals::shutdown_signal;

/// How the dispatch race resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchEnd {
    /// Every runner finished before any signal.
    Completed,
    /// A signal arrived, then every runner finished within the grace period.
    CompletedDuringGrace,
    /// A signal arrived and the grace period elapsed with runners still going.
    GracePeriodExpired,
}

/// Result of [`dispatch`].
#[derive(Debug)]
pub struct DispatchOutcome {
    /// Code the process should exit with.
    pub exit_code: i32,
    pub end: DispatchEnd,
    /// Reports of the runners that finished (abandoned runners are absent).
    pub reports: Vec<RunnerReport>,
}
