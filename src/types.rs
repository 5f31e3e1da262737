// src/types.rs

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Deserialize;

/// One of the three fixed output destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Stdout,
    Stderr,
    Socket,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Stdout => "stdout",
            Channel::Stderr => "stderr",
            Channel::Socket => "socket",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the interpolation token is replaced on each iteration.
///
/// - `IntCounter` (default): `seed + counter` rendered as a decimal integer.
/// - `String`: the seed verbatim, the counter is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationMode {
    #[default]
    #[value(name = "int_counter")]
    IntCounter,
    #[value(name = "string")]
    String,
}

impl FromStr for InterpolationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "int_counter" => Ok(InterpolationMode::IntCounter),
            "string" => Ok(InterpolationMode::String),
            other => Err(format!(
                "invalid interpolator: {other} (expected \"int_counter\" or \"string\")"
            )),
        }
    }
}

/// Shape of both the channel output and the diagnostic logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One JSON object per line (`time`, `level`, `msg`).
    #[default]
    #[value(name = "structured")]
    Structured,
    /// Plain text lines.
    #[value(name = "human_readable")]
    HumanReadable,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "structured" => Ok(OutputFormat::Structured),
            "human_readable" => Ok(OutputFormat::HumanReadable),
            other => Err(format!(
                "invalid output_format: {other} (expected \"structured\" or \"human_readable\")"
            )),
        }
    }
}
