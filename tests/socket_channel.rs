// tests/socket_channel.rs

use std::error::Error;
use std::time::Duration;

use exectester::config::SocketParameters;
use exectester::engine::dispatch_with;
use exectester::socket::SocketError;
use exectester::stream::{RunnerError, StopReason};
use exectester::types::Channel;
use exectester_test_utils::builders::{CapturedConsole, RunParametersBuilder, socket_params};
use exectester_test_utils::socket::SocketFixture;
use exectester_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn socket_send_reuses_one_connection_across_iterations() -> TestResult {
    init_tracing();
    let fixture = SocketFixture::recorder();
    let console = CapturedConsole::new();
    let params = RunParametersBuilder::new()
        .socket(SocketParameters {
            send_text: Some("s__I__".to_string()),
            ..socket_params(fixture.path())
        })
        .repeat(3)
        .build();

    let outcome = with_timeout(dispatch_with(&params, console.sinks(), std::future::pending())).await?;

    let report = &outcome.reports[0];
    assert_eq!(report.channel, Channel::Socket);
    assert!(matches!(report.outcome, Ok(StopReason::RepeatCount)));

    with_timeout(async {
        while fixture.received().is_empty() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert_eq!(fixture.received(), vec!["s0\ns1\ns2\n".to_string()]);
    assert_eq!(fixture.accepted(), 1);
    Ok(())
}

#[tokio::test]
async fn socket_response_is_written_to_stdout() -> TestResult {
    init_tracing();
    let fixture = SocketFixture::responder("status ok DONE");
    let console = CapturedConsole::new();
    let params = RunParametersBuilder::new()
        .socket(SocketParameters {
            read: true,
            exit_sentinel: Some("DONE".to_string()),
            ..socket_params(fixture.path())
        })
        .build();

    let outcome = with_timeout(dispatch_with(&params, console.sinks(), std::future::pending())).await?;

    assert!(outcome.reports[0].outcome.is_ok());
    assert_eq!(console.stdout.lines(), vec!["status ok DONE"]);
    assert!(console.stderr.is_empty());
    Ok(())
}

#[tokio::test]
async fn unreachable_socket_does_not_stop_other_channels() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let console = CapturedConsole::new();
    let params = RunParametersBuilder::new()
        .stdout("o__I__")
        .repeat(2)
        .interval(Duration::from_millis(20))
        .socket(SocketParameters {
            send_text: Some("hello".to_string()),
            ..socket_params(&dir.path().join("missing.sock"))
        })
        .build();

    let outcome = with_timeout(dispatch_with(&params, console.sinks(), std::future::pending())).await?;

    assert_eq!(console.stdout.lines(), vec!["o0", "o1"]);
    assert_eq!(outcome.exit_code, 0);

    let socket_report = outcome
        .reports
        .iter()
        .find(|r| r.channel == Channel::Socket)
        .expect("socket runner report");
    assert_eq!(socket_report.iterations, 0);
    assert!(matches!(
        socket_report.outcome,
        Err(RunnerError::Socket(SocketError::ConnectTimeout { .. }))
    ));
    Ok(())
}

#[tokio::test]
async fn socket_write_error_stops_only_the_socket_channel() -> TestResult {
    init_tracing();
    let fixture = SocketFixture::hang_up();
    let console = CapturedConsole::new();
    let params = RunParametersBuilder::new()
        .stdout("o__I__")
        .repeat(5)
        .interval(Duration::from_millis(50))
        .socket(SocketParameters {
            send_text: Some("hello __I__".to_string()),
            ..socket_params(fixture.path())
        })
        .build();

    let outcome = with_timeout(dispatch_with(&params, console.sinks(), std::future::pending())).await?;

    assert_eq!(outcome.exit_code, 0);
    assert_eq!(console.stdout.lines(), vec!["o0", "o1", "o2", "o3", "o4"]);

    let stdout_report = outcome
        .reports
        .iter()
        .find(|r| r.channel == Channel::Stdout)
        .expect("stdout runner report");
    assert!(matches!(stdout_report.outcome, Ok(StopReason::RepeatCount)));

    let socket_report = outcome
        .reports
        .iter()
        .find(|r| r.channel == Channel::Socket)
        .expect("socket runner report");
    assert!(
        matches!(
            socket_report.outcome,
            Err(RunnerError::Socket(SocketError::Write { .. }))
        ),
        "got: {:?}",
        socket_report.outcome
    );
    assert!(socket_report.iterations < 5);
    // No redial after the write failure.
    assert_eq!(fixture.accepted(), 1);
    Ok(())
}
