// src/engine/dispatcher.rs

use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::config::RunParameters;
use crate::engine::signals::shutdown_signal;
use crate::engine::{DispatchEnd, DispatchOutcome};
use crate::errors::Result;
use crate::sink::{ConsoleSinks, Sink};
use crate::stream::{RunnerReport, StreamRunner};
use crate::types::Channel;

/// Run every active channel against the real console and the process
/// signals.
///
/// The returned outcome carries the exit code the process should use.
pub async fn dispatch(params: &RunParameters) -> Result<DispatchOutcome> {
    let sinks = ConsoleSinks::console(params.output_format);
    dispatch_with(params, sinks, shutdown_signal()).await
}

/// Like [`dispatch`], with injectable sinks and cancellation signal.
///
/// - Parameters are validated before anything runs.
/// - One runner task is spawned per active channel.
/// - If every runner finishes first, dispatch completes.
/// - If `shutdown` resolves first, runners keep producing output for up to
///   `sigterm_grace_period`; whatever is still running afterwards is
///   abandoned.
pub async fn dispatch_with<F>(
    params: &RunParameters,
    sinks: ConsoleSinks,
    shutdown: F,
) -> Result<DispatchOutcome>
where
    F: Future<Output = ()>,
{
    params.validate()?;

    let mut runners = JoinSet::new();
    for runner in build_runners(params, &sinks) {
        info!(channel = %runner.channel(), "launching stream runner");
        runners.spawn(runner.run());
    }

    let mut reports = Vec::new();
    let end = {
        let all_done = collect_reports(&mut runners, &mut reports);
        tokio::pin!(all_done);
        tokio::pin!(shutdown);

        tokio::select! {
            _ = &mut all_done => DispatchEnd::Completed,
            _ = &mut shutdown => {
                info!(
                    grace_period = ?params.sigterm_grace_period,
                    "Caught signal. Starting sigterm timer; output will continue while it is in effect"
                );
                match tokio::time::timeout(params.sigterm_grace_period, &mut all_done).await {
                    Ok(()) => DispatchEnd::CompletedDuringGrace,
                    Err(_) => {
                        info!("sigterm grace period elapsed; abandoning running streams");
                        DispatchEnd::GracePeriodExpired
                    }
                }
            }
        }
    };

    if !runners.is_empty() {
        debug!(remaining = runners.len(), "aborting unfinished stream runners");
        runners.abort_all();
    }

    let exit_code = params.exit_code.unwrap_or(0);
    info!(?end, exit_code, "dispatch finished");

    Ok(DispatchOutcome {
        exit_code,
        end,
        reports,
    })
}

/// One runner per channel with a non-empty template / socket config.
fn build_runners(params: &RunParameters, sinks: &ConsoleSinks) -> Vec<StreamRunner> {
    let mut runners = Vec::new();

    let console: [(Channel, &Option<String>, &Arc<dyn Sink>); 2] = [
        (Channel::Stdout, &params.stdout, &sinks.stdout),
        (Channel::Stderr, &params.stderr, &sinks.stderr),
    ];
    for (channel, template, sink) in console {
        if let Some(template) = template.as_deref().filter(|t| !t.is_empty()) {
            runners.push(StreamRunner::console(
                channel,
                template,
                params.schedule,
                params.interpolation.clone(),
                Arc::clone(sink),
            ));
        }
    }

    if let Some(socket) = &params.socket {
        runners.push(StreamRunner::socket(
            socket.clone(),
            params.schedule,
            params.interpolation.clone(),
            Arc::clone(&sinks.stdout),
        ));
    }

    runners
}

async fn collect_reports(runners: &mut JoinSet<RunnerReport>, reports: &mut Vec<RunnerReport>) {
    while let Some(joined) = runners.join_next().await {
        match joined {
            Ok(report) => {
                if let Err(err) = &report.outcome {
                    error!(channel = %report.channel, error = %err, "stream failed");
                }
                reports.push(report);
            }
            Err(e) if e.is_cancelled() => {
                warn!(error = %e, "stream runner task cancelled");
            }
            Err(e) => {
                error!(error = %e, "stream runner task panicked");
            }
        }
    }
}
