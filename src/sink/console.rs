// src/sink/console.rs

use std::io::{self, Write};

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use super::Sink;
use crate::types::OutputFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleStream {
    Stdout,
    Stderr,
}

/// Writes channel output to the real process stdout or stderr.
#[derive(Debug, Clone)]
pub struct ConsoleSink {
    stream: ConsoleStream,
    format: OutputFormat,
}

impl ConsoleSink {
    pub fn new(stream: ConsoleStream, format: OutputFormat) -> Self {
        Self { stream, format }
    }
}

impl Sink for ConsoleSink {
    fn write(&self, text: &str) -> io::Result<()> {
        let line = render_line(self.format, text);
        match self.stream {
            ConsoleStream::Stdout => {
                let mut out = io::stdout().lock();
                writeln!(out, "{line}")?;
                out.flush()
            }
            ConsoleStream::Stderr => {
                let mut err = io::stderr().lock();
                writeln!(err, "{line}")?;
                err.flush()
            }
        }
    }
}

/// Structured output record, one per line.
#[derive(Debug, Serialize)]
struct OutputRecord<'a> {
    time: String,
    level: &'static str,
    msg: &'a str,
}

/// Render one line of output (without the trailing newline).
pub fn render_line(format: OutputFormat, text: &str) -> String {
    match format {
        OutputFormat::HumanReadable => text.to_string(),
        OutputFormat::Structured => {
            let record = OutputRecord {
                time: Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true),
                level: "INFO",
                msg: text,
            };
            // Serializing a struct of strings cannot fail; fall back to raw text anyway.
            serde_json::to_string(&record).unwrap_or_else(|_| text.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_readable_is_verbatim() {
        assert_eq!(render_line(OutputFormat::HumanReadable, "hello"), "hello");
    }

    #[test]
    fn structured_line_carries_msg_and_level() {
        let line = render_line(OutputFormat::Structured, "say \"hi\"");
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["msg"], "say \"hi\"");
        assert_eq!(value["level"], "INFO");
        assert!(value["time"].as_str().is_some());
    }
}
