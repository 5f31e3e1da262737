// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Every run parameter can also come from an `ET_`-prefixed environment
//! variable or from the TOML config file; see [`crate::config`].

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::{RawParameters, parse_duration};
use crate::types::{InterpolationMode, OutputFormat};

const LONG_ABOUT: &str = "\
A simple cli tool to write output to stdout and or stderr and a unix socket,
and also set the exit code. It supports dynamically generating output
which can also be interpolated with other values in various ways.

Example Usage
-------------
Send to stdout and stderr:
$ et --stdout='sending to stdout' --stderr='sending to stderr'

Send to stdout and stderr 3 times:
$ et --stdout='sending to stdout' --stderr='sending to stderr' --repeat=3

Send to stdout and stderr 3 times and interpolate __I__ with int counter:
$ et --stdout='stdout counter: __I__' --stderr='stderr counter: __I__' --repeat=3

Send to stdout and stderr 3 times and interpolate __I__ with int counter and start counter at 5:
$ et --stdout='stdout counter: __I__' --stderr='stderr counter: __I__' --repeat=3 --interpolate_val=5

Send to stdout and stderr 3 times and interpolate __I__ with a string 'zzz':
$ et --stdout='stdout counter: __I__' --stderr='stderr counter: __I__' --repeat=3 --interpolator=string --interpolate_val=zzz

Send to stdout for 5 seconds:
$ et --stdout='stdout counter: __I__' --repeat_forever --timeout=5

Send to a unix socket, then wait for it to answer 'bye':
$ et --socket=/tmp/app.sock --socket_send='hello' --read_socket --socket_exit_msg=bye

Send to stdout and stderr and then exit with code '123':
$ et --stdout='sending to stdout' --stderr='sending to stderr' --exitcode=123
";

/// Command-line arguments for `et`.
///
/// Fields are optional so that unset flags fall through to the config file.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "et",
    version,
    about = "A tool to send arbitrary text to stdout, stderr or a unix socket",
    long_about = LONG_ABOUT
)]
pub struct CliArgs {
    /// Text to send to stdout.
    #[arg(long, short = 'o', env = "ET_STDOUT", value_name = "TEXT")]
    pub stdout: Option<String>,

    /// Text to send to stderr.
    #[arg(long, short = 'e', env = "ET_STDERR", value_name = "TEXT")]
    pub stderr: Option<String>,

    /// Path of the unix socket.
    #[arg(long, short = 'u', env = "ET_SOCKET", value_name = "PATH")]
    pub socket: Option<String>,

    /// Text to send to the unix socket.
    #[arg(long = "socket_send", short = 'w', env = "ET_SOCKET_SEND", value_name = "TEXT")]
    pub socket_send: Option<String>,

    /// Poll the unix socket for output.
    #[arg(long = "read_socket", short = 'q', env = "ET_READ_SOCKET")]
    pub read_socket: bool,

    /// Close the connection to the socket once it returns this text.
    #[arg(long = "socket_exit_msg", short = 'l', env = "ET_SOCKET_EXIT_MSG", value_name = "TEXT")]
    pub socket_exit_msg: Option<String>,

    /// Exit with this exit code.
    #[arg(
        long,
        short = 'c',
        env = "ET_EXITCODE",
        value_name = "CODE",
        allow_negative_numbers = true
    )]
    pub exitcode: Option<i32>,

    /// Number of times to repeat output [default: 1].
    #[arg(long, short = 'r', env = "ET_REPEAT", value_name = "N")]
    pub repeat: Option<u64>,

    /// Time to wait between repeated output, e.g. `1`, `1s`, `500ms` [default: 1s].
    #[arg(
        long = "repeat_interval",
        short = 'p',
        env = "ET_REPEAT_INTERVAL",
        value_name = "DURATION",
        value_parser = parse_duration
    )]
    pub repeat_interval: Option<Duration>,

    /// Run forever.
    #[arg(long = "repeat_forever", short = 'f', env = "ET_REPEAT_FOREVER")]
    pub repeat_forever: bool,

    /// Stop once this much time has passed. `0` means no timeout.
    #[arg(
        long,
        short = 't',
        env = "ET_TIMEOUT",
        value_name = "DURATION",
        value_parser = parse_duration
    )]
    pub timeout: Option<Duration>,

    /// After SIGTERM / SIGINT keep producing output for this long before exiting.
    #[arg(
        long = "sigterm_timeout",
        short = 'x',
        env = "ET_SIGTERM_TIMEOUT",
        value_name = "DURATION",
        value_parser = parse_duration
    )]
    pub sigterm_timeout: Option<Duration>,

    /// Substring key to interpolate [default: __I__].
    #[arg(long = "interpolate_key", short = 'k', env = "ET_INTERPOLATE_KEY", value_name = "KEY")]
    pub interpolate_key: Option<String>,

    /// The interpolator to use on the interpolate_key [default: int_counter].
    #[arg(long, short = 'i', env = "ET_INTERPOLATOR", value_enum)]
    pub interpolator: Option<InterpolationMode>,

    /// The value to replace interpolate_key with.
    #[arg(long = "interpolate_val", short = 'v', env = "ET_INTERPOLATE_VAL", value_name = "VALUE")]
    pub interpolate_val: Option<String>,

    /// Format of the output and of the logs [default: structured].
    #[arg(long = "output_format", short = 'z', env = "ET_OUTPUT_FORMAT", value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `ET_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Config file (default is $HOME/.exectester.toml).
    #[arg(long, env = "ET_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl CliArgs {
    /// The command-line/environment layer of the run parameters.
    pub fn raw_parameters(&self) -> RawParameters {
        RawParameters {
            stdout: self.stdout.clone(),
            stderr: self.stderr.clone(),
            socket: self.socket.clone(),
            socket_send: self.socket_send.clone(),
            read_socket: self.read_socket.then_some(true),
            socket_exit_msg: self.socket_exit_msg.clone(),
            exitcode: self.exitcode,
            repeat: self.repeat,
            repeat_interval: self.repeat_interval,
            repeat_forever: self.repeat_forever.then_some(true),
            timeout: self.timeout,
            sigterm_timeout: self.sigterm_timeout,
            interpolate_key: self.interpolate_key.clone(),
            interpolator: self.interpolator,
            interpolate_val: self.interpolate_val.clone(),
            output_format: self.output_format,
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_flags_use_underscores() {
        let args = CliArgs::try_parse_from([
            "et",
            "--stdout=o__I__o",
            "--repeat=3",
            "--repeat_interval=250ms",
            "--interpolator=string",
            "--interpolate_val=zzz",
            "--exitcode=123",
        ])
        .unwrap();

        assert_eq!(args.stdout.as_deref(), Some("o__I__o"));
        assert_eq!(args.repeat, Some(3));
        assert_eq!(args.repeat_interval, Some(Duration::from_millis(250)));
        assert_eq!(args.interpolator, Some(InterpolationMode::String));
        assert_eq!(args.exitcode, Some(123));
    }

    #[test]
    fn short_flags() {
        let args = CliArgs::try_parse_from([
            "et", "-o", "out", "-e", "err", "-f", "-t", "3", "-x", "2", "-z", "human_readable",
        ])
        .unwrap();

        assert_eq!(args.stderr.as_deref(), Some("err"));
        assert!(args.repeat_forever);
        assert_eq!(args.timeout, Some(Duration::from_secs(3)));
        assert_eq!(args.sigterm_timeout, Some(Duration::from_secs(2)));
        assert_eq!(args.output_format, Some(OutputFormat::HumanReadable));
    }

    #[test]
    fn invalid_interpolator_is_rejected() {
        let res = CliArgs::try_parse_from(["et", "--stdout=o", "--interpolator=counter"]);
        assert!(res.is_err());
    }

    #[test]
    fn unset_flags_stay_unset_in_raw_layer() {
        let args = CliArgs::try_parse_from(["et", "--stdout=o"]).unwrap();
        let raw = args.raw_parameters();
        assert_eq!(raw.stdout.as_deref(), Some("o"));
        assert_eq!(raw.read_socket, None);
        assert_eq!(raw.repeat_forever, None);
        assert_eq!(raw.exitcode, None);
    }
}
