// src/config/duration.rs

use std::time::Duration;

/// Parse a duration flag value.
///
/// A bare integer is taken as seconds (e.g. `--timeout=3`). Otherwise a
/// number followed by `ms`, `s`, `m` or `h` is accepted (e.g. `500ms`).
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let idx = match s.chars().position(|c| !c.is_ascii_digit()) {
        Some(idx) => idx,
        None => {
            let secs: u64 = s
                .parse()
                .map_err(|e| format!("invalid duration number '{}': {}", s, e))?;
            return Ok(Duration::from_secs(secs));
        }
    };

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    let secs_per_unit = match unit.as_str() {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        _ => {
            return Err(format!(
                "unsupported duration unit '{}'; expected ms, s, m, or h",
                unit
            ));
        }
    };

    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration too large: '{}'", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_integer_is_seconds() {
        assert_eq!(parse_duration("3"), Ok(Duration::from_secs(3)));
        assert_eq!(parse_duration("0"), Ok(Duration::ZERO));
    }

    #[test]
    fn suffixed_values() {
        assert_eq!(parse_duration("250ms"), Ok(Duration::from_millis(250)));
        assert_eq!(parse_duration("2s"), Ok(Duration::from_secs(2)));
        assert_eq!(parse_duration("1m"), Ok(Duration::from_secs(60)));
        assert_eq!(parse_duration(" 1H "), Ok(Duration::from_secs(3600)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("5d").is_err());
        assert!(parse_duration("-1").is_err());
        assert!(parse_duration("ms").is_err());
    }

    #[test]
    fn rejects_overflow() {
        let err = parse_duration("9999999999999999h").unwrap_err();
        assert!(err.contains("too large"), "{err}");
        assert!(parse_duration("999999999999999999m").is_err());
        assert!(parse_duration("99999999999999999999s").is_err());
        assert_eq!(
            parse_duration("5124095576030431h"),
            Ok(Duration::from_secs(5124095576030431 * 3600))
        );
    }
}
