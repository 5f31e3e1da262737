// src/config/validate.rs

use std::path::PathBuf;

use crate::config::model::{
    DEFAULT_REPEAT, DEFAULT_REPEAT_INTERVAL, InterpolationSettings, RawParameters,
    RunParameters, Schedule, SocketParameters,
};
use crate::errors::{ExectesterError, Result};
use crate::interpolate::DEFAULT_INTERPOLATION_TOKEN;

impl TryFrom<RawParameters> for RunParameters {
    type Error = ExectesterError;

    fn try_from(raw: RawParameters) -> std::result::Result<Self, Self::Error> {
        let socket = non_empty(raw.socket).map(|path| SocketParameters {
            send_text: non_empty(raw.socket_send),
            read: raw.read_socket.unwrap_or(false),
            exit_sentinel: non_empty(raw.socket_exit_msg),
            ..SocketParameters::new(PathBuf::from(path))
        });

        let params = RunParameters {
            stdout: non_empty(raw.stdout),
            stderr: non_empty(raw.stderr),
            socket,
            schedule: Schedule {
                repeat_count: raw.repeat.unwrap_or(DEFAULT_REPEAT),
                repeat_forever: raw.repeat_forever.unwrap_or(false),
                repeat_interval: raw.repeat_interval.unwrap_or(DEFAULT_REPEAT_INTERVAL),
                timeout: raw.timeout.unwrap_or_default(),
            },
            sigterm_grace_period: raw.sigterm_timeout.unwrap_or_default(),
            interpolation: InterpolationSettings {
                token: raw
                    .interpolate_key
                    .unwrap_or_else(|| DEFAULT_INTERPOLATION_TOKEN.to_string()),
                mode: raw.interpolator.unwrap_or_default(),
                seed: raw.interpolate_val.unwrap_or_default(),
            },
            exit_code: raw.exitcode,
            output_format: raw.output_format.unwrap_or_default(),
        };

        params.validate()?;
        Ok(params)
    }
}

impl RunParameters {
    /// Check the parameter-set invariants. Called before any runner starts.
    pub fn validate(&self) -> Result<()> {
        ensure_has_output(self)?;
        validate_socket(self)?;
        validate_schedule(self)?;
        Ok(())
    }
}

fn ensure_has_output(params: &RunParameters) -> Result<()> {
    let has_console = is_set(&params.stdout) || is_set(&params.stderr);
    if !has_console && params.socket.is_none() && params.exit_code.is_none() {
        return Err(ExectesterError::ParamSetValidation(
            "you must specify at least stderr | stdout | socket | exitcode".to_string(),
        ));
    }
    Ok(())
}

fn validate_socket(params: &RunParameters) -> Result<()> {
    if let Some(socket) = &params.socket {
        if !is_set(&socket.send_text) && !socket.read {
            return Err(ExectesterError::ParamSetValidation(
                "if socket specified must also set socket_send and or read_socket".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_schedule(params: &RunParameters) -> Result<()> {
    if !params.schedule.repeat_forever && params.schedule.repeat_count == 0 {
        return Err(ExectesterError::ParamSetValidation(
            "repeat must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.is_empty())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
