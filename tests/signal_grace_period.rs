// tests/signal_grace_period.rs
//
// Sends a real SIGTERM to the test process, so it lives in its own test
// binary with a single test.

use std::error::Error;
use std::process::Command;
use std::time::{Duration, Instant};

use exectester::engine::{DispatchEnd, dispatch_with, shutdown_signal};
use exectester_test_utils::builders::{CapturedConsole, RunParametersBuilder};
use exectester_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn sigterm_starts_grace_period_and_keeps_exit_code() -> TestResult {
    init_tracing();
    let console = CapturedConsole::new();
    let params = RunParametersBuilder::new()
        .stdout("o__I__")
        .repeat_forever()
        .interval(Duration::from_millis(25))
        .grace_period(Duration::from_millis(250))
        .exit_code(42)
        .build();

    let pid = std::process::id().to_string();
    tokio::spawn(async move {
        // Give the dispatcher time to install its handlers.
        tokio::time::sleep(Duration::from_millis(300)).await;
        let _ = Command::new("kill").args(["-TERM", &pid]).status();
    });

    let started = Instant::now();
    let outcome = with_timeout(dispatch_with(&params, console.sinks(), shutdown_signal())).await?;
    let elapsed = started.elapsed();

    assert_eq!(outcome.end, DispatchEnd::GracePeriodExpired);
    assert_eq!(outcome.exit_code, 42);
    assert!(elapsed >= Duration::from_millis(500), "ended before grace: {elapsed:?}");
    assert!(
        elapsed < Duration::from_millis(300 + 250 + 500),
        "grace overran: {elapsed:?}"
    );
    assert_eq!(console.stdout.lines()[0], "o0");
    Ok(())
}
