//! Duration flag syntax.
//!
//! Parsing and formatting go through `humantime` (`30s`, `1h30m`, `1h 30m`,
//! `2days`). A few more command-line spellings are accepted on top: a bare
//! `0`, a leading `+`, `µs` for microseconds and a single fractional term
//! such as `1.5s` or `.5h`.

use std::time::Duration;

/// Parse a duration such as `300ms`, `1.5h` or `2h45m`.
///
/// Negative durations are rejected since [`Duration`] cannot hold them.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let text = input.strip_prefix('+').unwrap_or(input);
    if text.starts_with('-') {
        return Err(format!("negative duration {:?} is not supported", input));
    }
    if text == "0" {
        return Ok(Duration::ZERO);
    }

    let text = text.replace(['µ', 'μ'], "u");
    if text.contains('.') {
        return parse_fractional(&text).ok_or_else(|| format!("invalid duration {:?}", input));
    }
    humantime::parse_duration(&text).map_err(|err| format!("invalid duration {:?}: {}", input, err))
}

/// `<decimal><unit>`, e.g. `1.5s`. Compound forms must use whole numbers.
fn parse_fractional(text: &str) -> Option<Duration> {
    let split = text.find(|c: char| c.is_ascii_alphabetic())?;
    let (number, unit) = text.split_at(split);
    if !number.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        || !unit.bytes().all(|b| b.is_ascii_alphabetic())
    {
        return None;
    }
    let factor: f64 = number.parse().ok()?;
    let unit = humantime::parse_duration(&format!("1{}", unit)).ok()?;
    Duration::try_from_secs_f64(unit.as_secs_f64() * factor).ok()
}

/// Format a duration the way [`parse_duration`] reads it, e.g. `1h 2m 3s`.
pub fn format_duration(duration: Duration) -> String {
    humantime::format_duration(duration).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_units() {
        assert_eq!(parse_duration("30s").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("2h").unwrap(), Duration::from_secs(7_200));
        assert_eq!(parse_duration("15us").unwrap(), Duration::from_micros(15));
        assert_eq!(parse_duration("15µs").unwrap(), Duration::from_micros(15));
        assert_eq!(parse_duration("7ns").unwrap(), Duration::from_nanos(7));
    }

    #[test]
    fn test_parse_compound_and_fractional() {
        assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(5_400));
        assert_eq!(parse_duration("1h 30m").unwrap(), Duration::from_secs(5_400));
        assert_eq!(parse_duration("1.5s").unwrap(), Duration::from_millis(1_500));
        assert_eq!(parse_duration(".5m").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_duration("+1m1s").unwrap(), Duration::from_secs(61));
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("30").is_err());
        assert!(parse_duration("s").is_err());
        assert!(parse_duration("3x").is_err());
        assert!(parse_duration("-5s").is_err());
        assert!(parse_duration("1.s.").is_err());
        assert!(parse_duration("1.5s30m").is_err());
    }

    #[test]
    fn test_format() {
        assert_eq!(format_duration(Duration::ZERO), "0s");
        assert_eq!(format_duration(Duration::from_secs(30)), "30s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
    }

    #[test]
    fn test_format_reads_back() {
        for duration in [
            Duration::from_secs(3_723),
            Duration::from_millis(2_250),
            Duration::from_micros(1),
            Duration::from_secs(90_000),
        ] {
            assert_eq!(parse_duration(&format_duration(duration)).unwrap(), duration);
        }
    }
}
