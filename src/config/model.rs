// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::config::duration::parse_duration;
use crate::interpolate::DEFAULT_INTERPOLATION_TOKEN;
use crate::socket::SOCKET_DIAL_TIMEOUT;
use crate::types::{InterpolationMode, OutputFormat};

pub const DEFAULT_REPEAT: u64 = 1;
pub const DEFAULT_REPEAT_INTERVAL: Duration = Duration::from_secs(1);

/// Every parameter as it arrives from one configuration layer.
///
/// This is also the shape of the TOML config file, using the same key names
/// as the long CLI flags:
///
/// ```toml
/// stdout = "stdout counter: __I__"
/// repeat = 3
/// repeat_interval = "500ms"
/// interpolator = "int_counter"
/// interpolate_val = "5"
/// ```
///
/// `None` means "not set in this layer"; defaults are applied when the layers
/// are turned into [`RunParameters`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawParameters {
    #[serde(default)]
    pub stdout: Option<String>,
    #[serde(default)]
    pub stderr: Option<String>,
    #[serde(default)]
    pub socket: Option<String>,
    #[serde(default)]
    pub socket_send: Option<String>,
    #[serde(default)]
    pub read_socket: Option<bool>,
    #[serde(default)]
    pub socket_exit_msg: Option<String>,
    #[serde(default)]
    pub exitcode: Option<i32>,
    #[serde(default)]
    pub repeat: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_duration")]
    pub repeat_interval: Option<Duration>,
    #[serde(default)]
    pub repeat_forever: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_duration")]
    pub timeout: Option<Duration>,
    #[serde(default, deserialize_with = "deserialize_duration")]
    pub sigterm_timeout: Option<Duration>,
    #[serde(default)]
    pub interpolate_key: Option<String>,
    #[serde(default)]
    pub interpolator: Option<InterpolationMode>,
    #[serde(default)]
    pub interpolate_val: Option<String>,
    #[serde(default)]
    pub output_format: Option<OutputFormat>,
}

impl RawParameters {
    /// Fill every unset field of `self` from `lower`.
    pub fn layered_over(self, lower: RawParameters) -> RawParameters {
        RawParameters {
            stdout: self.stdout.or(lower.stdout),
            stderr: self.stderr.or(lower.stderr),
            socket: self.socket.or(lower.socket),
            socket_send: self.socket_send.or(lower.socket_send),
            read_socket: self.read_socket.or(lower.read_socket),
            socket_exit_msg: self.socket_exit_msg.or(lower.socket_exit_msg),
            exitcode: self.exitcode.or(lower.exitcode),
            repeat: self.repeat.or(lower.repeat),
            repeat_interval: self.repeat_interval.or(lower.repeat_interval),
            repeat_forever: self.repeat_forever.or(lower.repeat_forever),
            timeout: self.timeout.or(lower.timeout),
            sigterm_timeout: self.sigterm_timeout.or(lower.sigterm_timeout),
            interpolate_key: self.interpolate_key.or(lower.interpolate_key),
            interpolator: self.interpolator.or(lower.interpolator),
            interpolate_val: self.interpolate_val.or(lower.interpolate_val),
            output_format: self.output_format.or(lower.output_format),
        }
    }
}

/// Durations in the config file may be an integer (seconds) or a string
/// such as `"500ms"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum DurationValue {
    Seconds(u64),
    Text(String),
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<DurationValue>::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(DurationValue::Seconds(secs)) => Ok(Some(Duration::from_secs(secs))),
        Some(DurationValue::Text(s)) => parse_duration(&s)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Repeat / interval / timeout schedule shared (by value) by every runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub repeat_count: u64,
    pub repeat_forever: bool,
    pub repeat_interval: Duration,
    /// `Duration::ZERO` means unbounded.
    pub timeout: Duration,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            repeat_count: DEFAULT_REPEAT,
            repeat_forever: false,
            repeat_interval: DEFAULT_REPEAT_INTERVAL,
            timeout: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpolationSettings {
    pub token: String,
    pub mode: InterpolationMode,
    pub seed: String,
}

impl Default for InterpolationSettings {
    fn default() -> Self {
        Self {
            token: DEFAULT_INTERPOLATION_TOKEN.to_string(),
            mode: InterpolationMode::default(),
            seed: String::new(),
        }
    }
}

/// Socket channel configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketParameters {
    pub path: PathBuf,
    /// Template sent on every iteration (a newline is appended).
    pub send_text: Option<String>,
    /// Read until `exit_sentinel` after sending.
    pub read: bool,
    pub exit_sentinel: Option<String>,
    pub dial_timeout: Duration,
}

impl SocketParameters {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            send_text: None,
            read: false,
            exit_sentinel: None,
            dial_timeout: SOCKET_DIAL_TIMEOUT,
        }
    }
}

/// Immutable, validated parameters for one invocation.
///
/// Built once by the config layer (see [`crate::config::resolve`]) and
/// handed to [`crate::engine::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunParameters {
    /// Template for the stdout channel; `None` disables the channel.
    pub stdout: Option<String>,
    /// Template for the stderr channel; `None` disables the channel.
    pub stderr: Option<String>,
    pub socket: Option<SocketParameters>,
    pub schedule: Schedule,
    /// How long output continues after SIGINT / SIGTERM.
    pub sigterm_grace_period: Duration,
    pub interpolation: InterpolationSettings,
    /// Explicit exit code; `None` means exit 0 on normal completion.
    pub exit_code: Option<i32>,
    pub output_format: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upper_layer_wins() {
        let cli = RawParameters {
            stdout: Some("cli".into()),
            ..Default::default()
        };
        let file = RawParameters {
            stdout: Some("file".into()),
            stderr: Some("file-err".into()),
            repeat: Some(4),
            ..Default::default()
        };
        let merged = cli.layered_over(file);
        assert_eq!(merged.stdout.as_deref(), Some("cli"));
        assert_eq!(merged.stderr.as_deref(), Some("file-err"));
        assert_eq!(merged.repeat, Some(4));
    }

    #[test]
    fn durations_accept_int_or_string() {
        let raw: RawParameters = toml::from_str(
            r#"
timeout = 3
repeat_interval = "250ms"
"#,
        )
        .unwrap();
        assert_eq!(raw.timeout, Some(Duration::from_secs(3)));
        assert_eq!(raw.repeat_interval, Some(Duration::from_millis(250)));
        assert_eq!(raw.sigterm_timeout, None);
    }

    #[test]
    fn bad_duration_string_is_rejected() {
        let res: Result<RawParameters, _> = toml::from_str(r#"timeout = "soon""#);
        assert!(res.is_err());
    }
}
