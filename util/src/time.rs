//! General time utility functions

use chrono;

/// Number of nanoseconds in a second
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Convert a duration into a number of seconds, or `None` if overflow
pub fn duration_to_seconds(duration: chrono::Duration) -> Option<f64> {
    if let Some(ns) = duration.num_nanoseconds() {
        Some(ns as f64 / NANOS_PER_SECOND as f64)
    }
    else {
        None
    }
}

/// Get the period of a loop running at `frequency_hz`.
///
/// Non-positive or non-finite frequencies have no period and return `None`.
pub fn hz_to_period(frequency_hz: f64) -> Option<std::time::Duration> {
    if frequency_hz.is_finite() && frequency_hz > 0.0 {
        Some(std::time::Duration::from_secs_f64(1.0 / frequency_hz))
    }
    else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hz_to_period() {
        assert_eq!(hz_to_period(10.0), Some(std::time::Duration::from_millis(100)));
        assert_eq!(hz_to_period(2.0), Some(std::time::Duration::from_millis(500)));
        assert_eq!(hz_to_period(0.0), None);
        assert_eq!(hz_to_period(-1.0), None);
        assert_eq!(hz_to_period(f64::NAN), None);
    }

    #[test]
    fn test_duration_to_seconds() {
        let d = chrono::Duration::milliseconds(1500);
        assert_eq!(duration_to_seconds(d), Some(1.5));
    }
}
