// src/interpolate.rs

//! Token substitution applied to every template on every iteration.
//!
//! This is a pure function of its inputs; the iteration counter is owned by
//! the caller (see [`crate::stream`]).

use crate::types::InterpolationMode;

/// Token replaced when no `--interpolate_key` is given.
pub const DEFAULT_INTERPOLATION_TOKEN: &str = "__I__";

/// Result of a single interpolation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpolated {
    pub text: String,
    /// Recoverable problem the caller should log (e.g. a non-numeric seed).
    pub warning: Option<String>,
}

impl Interpolated {
    fn clean(text: String) -> Self {
        Self {
            text,
            warning: None,
        }
    }
}

/// Replace every occurrence of `token` in `template`.
///
/// - `IntCounter`: the token becomes `seed + counter`. An empty seed counts
///   as `0`. A seed that does not parse as an integer also counts as `0`, but
///   the call reports a warning.
/// - `String`: the token becomes `seed` verbatim.
///
/// Templates that do not contain the token (or an empty token) are returned
/// unchanged without a warning.
pub fn interpolate(
    template: &str,
    token: &str,
    mode: InterpolationMode,
    counter: u64,
    seed: &str,
) -> Interpolated {
    if token.is_empty() || !template.contains(token) {
        return Interpolated::clean(template.to_string());
    }

    match mode {
        InterpolationMode::IntCounter => {
            let (start, warning) = parse_seed(seed);
            let value = i128::from(start) + i128::from(counter);
            Interpolated {
                text: template.replace(token, &value.to_string()),
                warning,
            }
        }
        InterpolationMode::String => Interpolated::clean(template.replace(token, seed)),
    }
}

fn parse_seed(seed: &str) -> (i64, Option<String>) {
    let trimmed = seed.trim();
    if trimmed.is_empty() {
        return (0, None);
    }
    match trimmed.parse::<i64>() {
        Ok(v) => (v, None),
        Err(_) => (
            0,
            Some(format!(
                "'interpolate_val' of '{seed}' cannot be converted to a number! Defaulting to '0'"
            )),
        ),
    }
}
