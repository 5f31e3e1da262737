// tests/dispatch_validation.rs

use std::error::Error;

use exectester::config::SocketParameters;
use exectester::engine::{DispatchEnd, dispatch_with};
use exectester::errors::ExectesterError;
use exectester_test_utils::builders::{CapturedConsole, RunParametersBuilder};
use exectester_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn no_channel_and_no_exit_code_is_rejected_before_any_output() {
    init_tracing();
    let console = CapturedConsole::new();
    let params = RunParametersBuilder::new().build();

    let result = dispatch_with(&params, console.sinks(), std::future::pending()).await;

    match result {
        Err(ExectesterError::ParamSetValidation(msg)) => {
            assert!(msg.contains("stderr | stdout | socket | exitcode"));
        }
        Err(e) => panic!("Expected ParamSetValidation, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
    assert!(console.stdout.is_empty());
    assert!(console.stderr.is_empty());
}

#[tokio::test]
async fn socket_without_send_or_read_is_rejected() {
    init_tracing();
    let console = CapturedConsole::new();
    let params = RunParametersBuilder::new()
        .stdout("o")
        .socket(SocketParameters::new("/tmp/exectester-never-dialed.sock"))
        .build();

    let result = dispatch_with(&params, console.sinks(), std::future::pending()).await;

    match result {
        Err(ExectesterError::ParamSetValidation(msg)) => {
            assert!(msg.contains("socket_send and or read_socket"));
        }
        Err(e) => panic!("Expected ParamSetValidation, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
    // Validation happens before the stdout runner would have started.
    assert!(console.stdout.is_empty());
}

#[tokio::test]
async fn exit_code_alone_completes_with_that_code() -> TestResult {
    init_tracing();
    let console = CapturedConsole::new();
    let params = RunParametersBuilder::new().exit_code(123).build();

    let outcome = dispatch_with(&params, console.sinks(), std::future::pending()).await?;

    assert_eq!(outcome.exit_code, 123);
    assert_eq!(outcome.end, DispatchEnd::Completed);
    assert!(outcome.reports.is_empty());
    assert!(console.stdout.is_empty());
    Ok(())
}
