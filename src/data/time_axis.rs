//! Tick labels for the time axis.
//!
//! Pick times are stored as `f64` milliseconds since the UNIX epoch (the
//! usual datetime-axis convention). [`TimeFormatter`] turns such a value into
//! a UTC label whose precision adapts to the visible range.

use chrono::{DateTime, Timelike, Utc};

// ─────────────────────────────────────────────────────────────────────────────
// TimeResolution
// ─────────────────────────────────────────────────────────────────────────────

/// Sub-second digits shown in a label, ordered coarsest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeResolution {
    /// `HH:MM:SS`
    Seconds,
    /// `HH:MM:SS.mmm`
    Milliseconds,
    /// `HH:MM:SS.mmmuuu`
    Microseconds,
}

// ─────────────────────────────────────────────────────────────────────────────
// TimeFormatter
// ─────────────────────────────────────────────────────────────────────────────

/// Adaptive UTC timestamp formatter.
///
/// * The date (`YYYY-MM-DD`) is shown only when the visible range crosses a
///   calendar day.
/// * Milliseconds appear below [`milliseconds_threshold`](Self::milliseconds_threshold)
///   seconds of visible span, microseconds below
///   [`microseconds_threshold`](Self::microseconds_threshold).
#[derive(Debug, Clone)]
pub struct TimeFormatter {
    /// Default: `600.0` (10 minutes).
    pub milliseconds_threshold: f64,
    /// Default: `1.0`.
    pub microseconds_threshold: f64,
}

impl Default for TimeFormatter {
    fn default() -> Self {
        Self {
            milliseconds_threshold: 600.0,
            microseconds_threshold: 1.0,
        }
    }
}

impl TimeFormatter {
    /// Format `value` given the visible axis range, all in epoch milliseconds.
    pub fn format(&self, value: f64, range: (f64, f64)) -> String {
        let (lo, hi) = if range.0 <= range.1 {
            (range.0 / 1_000.0, range.1 / 1_000.0)
        } else {
            (range.1 / 1_000.0, range.0 / 1_000.0)
        };

        let value_dt = millis_to_utc(value);
        let show_date = secs_to_utc(lo).date_naive() != secs_to_utc(hi).date_naive();

        let base = if show_date {
            value_dt.format("%Y-%m-%d %H:%M:%S").to_string()
        } else {
            value_dt.format("%H:%M:%S").to_string()
        };

        match self.determine_resolution(hi - lo) {
            TimeResolution::Seconds => base,
            TimeResolution::Milliseconds => {
                format!("{}.{:03}", base, value_dt.nanosecond() / 1_000_000)
            }
            TimeResolution::Microseconds => {
                format!("{}.{:06}", base, value_dt.nanosecond() / 1_000)
            }
        }
    }

    pub fn determine_resolution(&self, span_secs: f64) -> TimeResolution {
        if span_secs < self.microseconds_threshold {
            TimeResolution::Microseconds
        } else if span_secs < self.milliseconds_threshold {
            TimeResolution::Milliseconds
        } else {
            TimeResolution::Seconds
        }
    }
}

/// Convert seconds since the epoch to a UTC datetime; non-finite or
/// out-of-range values fall back to the epoch.
pub(crate) fn secs_to_utc(secs: f64) -> DateTime<Utc> {
    if !secs.is_finite() {
        return DateTime::<Utc>::UNIX_EPOCH;
    }
    let s = secs.floor() as i64;
    let ns = (((secs - s as f64) * 1e9).round() as u32).min(999_999_999);
    DateTime::from_timestamp(s, ns).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Convert milliseconds since the epoch to a UTC datetime, exact to the
/// microsecond.
pub(crate) fn millis_to_utc(ms: f64) -> DateTime<Utc> {
    if !ms.is_finite() {
        return DateTime::<Utc>::UNIX_EPOCH;
    }
    DateTime::from_timestamp_micros((ms * 1_000.0).round() as i64)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2021-11-13T01:41:00Z
    const T0_MS: f64 = 1_636_767_660_000.0;

    #[test]
    fn hides_date_within_a_day() {
        let tf = TimeFormatter::default();
        let out = tf.format(T0_MS, (T0_MS - 3_600_000.0, T0_MS + 3_600_000.0));
        assert_eq!(out, "01:41:00");
    }

    #[test]
    fn shows_date_across_midnight() {
        let tf = TimeFormatter::default();
        let out = tf.format(T0_MS, (T0_MS - 2.0 * 3_600_000.0, T0_MS + 3_600_000.0));
        assert_eq!(out, "2021-11-13 01:41:00");
    }

    #[test]
    fn milliseconds_for_short_spans() {
        let tf = TimeFormatter::default();
        let out = tf.format(T0_MS + 250.0, (T0_MS, T0_MS + 10_000.0));
        assert_eq!(out, "01:41:00.250");
    }

    #[test]
    fn resolution_thresholds() {
        let tf = TimeFormatter::default();
        assert_eq!(tf.determine_resolution(3_600.0), TimeResolution::Seconds);
        assert_eq!(tf.determine_resolution(10.0), TimeResolution::Milliseconds);
        assert_eq!(tf.determine_resolution(0.5), TimeResolution::Microseconds);
    }

    #[test]
    fn non_finite_falls_back_to_epoch() {
        use chrono::Datelike;
        assert_eq!(millis_to_utc(f64::NAN).year(), 1970);
        assert_eq!(millis_to_utc(T0_MS).year(), 2021);
    }
}
