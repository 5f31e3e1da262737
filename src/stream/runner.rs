// src/stream/runner.rs

//! The loop driving one output channel.

use std::sync::Arc;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{InterpolationSettings, Schedule, SocketParameters};
use crate::interpolate::interpolate;
use crate::sink::Sink;
use crate::socket::SocketClient;
use crate::stream::{RunnerError, RunnerReport, StopReason};
use crate::types::Channel;

/// Where a runner delivers each interpolated text.
#[derive(Debug, Clone)]
pub enum ChannelTarget {
    /// Plain console write (stdout or stderr).
    Console(Arc<dyn Sink>),
    /// Send and/or read over a unix socket. Text read back is written to
    /// `responses`.
    Socket {
        params: SocketParameters,
        responses: Arc<dyn Sink>,
    },
}

/// Per-runner iteration bookkeeping.
#[derive(Debug, Clone, Copy)]
struct IterationState {
    counter: u64,
    started: Instant,
}

impl IterationState {
    fn start() -> Self {
        Self {
            counter: 0,
            started: Instant::now(),
        }
    }
}

#[derive(Debug)]
pub struct StreamRunner {
    channel: Channel,
    template: String,
    schedule: Schedule,
    interpolation: InterpolationSettings,
    target: ChannelTarget,
    client: Option<SocketClient>,
}

impl StreamRunner {
    /// Runner for the stdout or stderr channel.
    pub fn console(
        channel: Channel,
        template: impl Into<String>,
        schedule: Schedule,
        interpolation: InterpolationSettings,
        sink: Arc<dyn Sink>,
    ) -> Self {
        Self {
            channel,
            template: template.into(),
            schedule,
            interpolation,
            target: ChannelTarget::Console(sink),
            client: None,
        }
    }

    /// Runner for the socket channel. The template is the socket send text
    /// (empty when only reading).
    pub fn socket(
        params: SocketParameters,
        schedule: Schedule,
        interpolation: InterpolationSettings,
        responses: Arc<dyn Sink>,
    ) -> Self {
        Self {
            channel: Channel::Socket,
            template: params.send_text.clone().unwrap_or_default(),
            schedule,
            interpolation,
            target: ChannelTarget::Socket { params, responses },
            client: None,
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Run until the repeat count or the timeout is reached, or a delivery
    /// error ends the loop. Any socket connection is closed before returning.
    ///
    /// If the surrounding task is aborted instead, dropping the runner closes
    /// the connection.
    pub async fn run(mut self) -> RunnerReport {
        info!(channel = %self.channel, "stream runner started");

        let mut state = IterationState::start();
        let outcome = self.run_inner(&mut state).await;
        self.close().await;

        match &outcome {
            Ok(reason) => info!(
                channel = %self.channel,
                iterations = state.counter,
                ?reason,
                "stream runner finished"
            ),
            Err(err) => warn!(
                channel = %self.channel,
                iterations = state.counter,
                error = %err,
                "stream runner stopped early"
            ),
        }

        RunnerReport {
            channel: self.channel,
            iterations: state.counter,
            outcome,
        }
    }

    async fn run_inner(&mut self, state: &mut IterationState) -> Result<StopReason, RunnerError> {
        let schedule = self.schedule;

        loop {
            let rendered = interpolate(
                &self.template,
                &self.interpolation.token,
                self.interpolation.mode,
                state.counter,
                &self.interpolation.seed,
            );
            if let Some(warning) = rendered.warning {
                warn!(channel = %self.channel, "{warning}");
            }

            deliver(self.channel, &self.target, &mut self.client, &rendered.text).await?;

            tokio::time::sleep(schedule.repeat_interval).await;
            state.counter += 1;

            if !schedule.timeout.is_zero() && state.started.elapsed() > schedule.timeout {
                info!(
                    channel = %self.channel,
                    timeout = ?schedule.timeout,
                    "timeout was reached"
                );
                return Ok(StopReason::Timeout);
            }

            if !schedule.repeat_forever && state.counter >= schedule.repeat_count {
                return Ok(StopReason::RepeatCount);
            }
        }
    }

    async fn close(&mut self) {
        if let Some(mut client) = self.client.take() {
            client.close().await;
            debug!(channel = %self.channel, "socket client closed");
        }
    }
}

/// Deliver one interpolated text to the channel target.
async fn deliver(
    channel: Channel,
    target: &ChannelTarget,
    client: &mut Option<SocketClient>,
    text: &str,
) -> Result<(), RunnerError> {
    match target {
        ChannelTarget::Console(sink) => sink
            .write(text)
            .map_err(|source| RunnerError::Sink { channel, source }),
        ChannelTarget::Socket { params, responses } => {
            let client = match client.take() {
                Some(existing) => client.insert(existing),
                None => {
                    let fresh = SocketClient::connect(&params.path, params.dial_timeout).await?;
                    client.insert(fresh)
                }
            };

            if params.send_text.is_some() {
                client.send(&format!("{text}\n")).await?;
            }

            if params.read {
                let response = client.read_until(params.exit_sentinel.as_deref()).await?;
                responses
                    .write(&response)
                    .map_err(|source| RunnerError::Sink { channel, source })?;
            }

            Ok(())
        }
    }
}
