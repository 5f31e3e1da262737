#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use exectester::config::{RunParameters, SocketParameters};
use exectester::sink::{ConsoleSinks, MemorySink};
use exectester::types::InterpolationMode;

/// Builder for `RunParameters` to simplify test setup.
///
/// Starts from the defaults with a zero repeat interval so tests run fast.
pub struct RunParametersBuilder {
    params: RunParameters,
}

impl RunParametersBuilder {
    pub fn new() -> Self {
        let mut params = RunParameters::default();
        params.schedule.repeat_interval = Duration::ZERO;
        Self { params }
    }

    pub fn stdout(mut self, template: &str) -> Self {
        self.params.stdout = Some(template.to_string());
        self
    }

    pub fn stderr(mut self, template: &str) -> Self {
        self.params.stderr = Some(template.to_string());
        self
    }

    pub fn socket(mut self, socket: SocketParameters) -> Self {
        self.params.socket = Some(socket);
        self
    }

    pub fn repeat(mut self, count: u64) -> Self {
        self.params.schedule.repeat_count = count;
        self
    }

    pub fn repeat_forever(mut self) -> Self {
        self.params.schedule.repeat_forever = true;
        self
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.params.schedule.repeat_interval = interval;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.params.schedule.timeout = timeout;
        self
    }

    pub fn grace_period(mut self, grace: Duration) -> Self {
        self.params.sigterm_grace_period = grace;
        self
    }

    pub fn interpolation(mut self, mode: InterpolationMode, seed: &str) -> Self {
        self.params.interpolation.mode = mode;
        self.params.interpolation.seed = seed.to_string();
        self
    }

    pub fn token(mut self, token: &str) -> Self {
        self.params.interpolation.token = token.to_string();
        self
    }

    pub fn exit_code(mut self, code: i32) -> Self {
        self.params.exit_code = Some(code);
        self
    }

    pub fn build(self) -> RunParameters {
        self.params
    }
}

impl Default for RunParametersBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Socket channel parameters with a short dial timeout.
pub fn socket_params(path: &Path) -> SocketParameters {
    SocketParameters {
        dial_timeout: Duration::from_millis(500),
        ..SocketParameters::new(path)
    }
}

/// In-memory stdout / stderr sinks plus the `ConsoleSinks` wrapping them.
pub struct CapturedConsole {
    pub stdout: MemorySink,
    pub stderr: MemorySink,
}

impl CapturedConsole {
    pub fn new() -> Self {
        Self {
            stdout: MemorySink::new(),
            stderr: MemorySink::new(),
        }
    }

    pub fn sinks(&self) -> ConsoleSinks {
        ConsoleSinks::new(Arc::new(self.stdout.clone()), Arc::new(self.stderr.clone()))
    }
}

impl Default for CapturedConsole {
    fn default() -> Self {
        Self::new()
    }
}
