//! DAS records: a 2-D block of samples over time (rows) and distance
//! (columns) with their coordinates.
//!
//! Time coordinates are `f64` milliseconds since the UNIX epoch, the same
//! unit the pick table uses, so picks land directly on the record. Both
//! coordinates must be increasing.

use std::ops::Range;

use ndarray::{s, Array2};

use crate::data::export::{format_pick_time, parse_pick_time};
use crate::error::{PickError, Result};

// ─────────────────────────────────────────────────────────────────────────────
// RecordWindow
// ─────────────────────────────────────────────────────────────────────────────

/// Time and distance bounds of the part of a record to show, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordWindow {
    pub start_time: f64,
    pub end_time: f64,
    pub start_distance: f64,
    pub end_distance: f64,
}

impl Default for RecordWindow {
    /// 2021-11-13 01:41:00 to 01:41:10 UTC, 20 km to 120 km.
    fn default() -> Self {
        Self {
            start_time: 1_636_767_660_000.0,
            end_time: 1_636_767_670_000.0,
            start_distance: 20_000.0,
            end_distance: 120_000.0,
        }
    }
}

impl RecordWindow {
    /// Parse the four selection fields. Times take any layout
    /// [`parse_pick_time`] accepts; distances may use `_` digit separators.
    pub fn parse(
        start_time: &str,
        end_time: &str,
        start_distance: &str,
        end_distance: &str,
    ) -> Result<Self> {
        Ok(Self {
            start_time: parse_pick_time(start_time)?,
            end_time: parse_pick_time(end_time)?,
            start_distance: parse_number("start distance", start_distance)?,
            end_distance: parse_number("end distance", end_distance)?,
        })
    }

    pub(crate) fn empty_error(&self) -> PickError {
        PickError::EmptyWindow {
            start_time: format_pick_time(self.start_time),
            end_time: format_pick_time(self.end_time),
            start_distance: self.start_distance,
            end_distance: self.end_distance,
        }
    }
}

/// Parse a float text field, ignoring surrounding blanks and `_` separators.
pub fn parse_number(field: &'static str, s: &str) -> Result<f64> {
    let cleaned: String = s.trim().chars().filter(|c| *c != '_').collect();
    cleaned.parse::<f64>().map_err(|_| PickError::InvalidNumber {
        field,
        value: s.to_string(),
    })
}

/// Indices of `coord` (increasing) that fall inside `[lo, hi]`.
pub fn index_range(coord: &[f64], lo: f64, hi: f64) -> Range<usize> {
    let start = coord.partition_point(|&c| c < lo);
    let end = coord.partition_point(|&c| c <= hi);
    start..end.max(start)
}

// ─────────────────────────────────────────────────────────────────────────────
// Record
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    time: Vec<f64>,
    distance: Vec<f64>,
    /// `values[[t, d]]`
    values: Array2<f64>,
}

impl Record {
    pub fn new(time: Vec<f64>, distance: Vec<f64>, values: Array2<f64>) -> Result<Self> {
        let (rows, cols) = values.dim();
        if rows != time.len() || cols != distance.len() {
            return Err(PickError::RecordShape {
                rows,
                cols,
                time: time.len(),
                distance: distance.len(),
            });
        }
        Ok(Self {
            time,
            distance,
            values,
        })
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn distance(&self) -> &[f64] {
        &self.distance
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// `(time samples, distance samples)`
    pub fn dim(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// The samples inside `window`. Errors if none are.
    pub fn window(&self, window: &RecordWindow) -> Result<Record> {
        let t = index_range(&self.time, window.start_time, window.end_time);
        let d = index_range(&self.distance, window.start_distance, window.end_distance);
        if t.is_empty() || d.is_empty() {
            return Err(window.empty_error());
        }
        Ok(Record {
            time: self.time[t.clone()].to_vec(),
            distance: self.distance[d.clone()].to_vec(),
            values: self.values.slice(s![t, d]).to_owned(),
        })
    }

    /// Area covered by the samples, `([xmin, ymin], [xmax, ymax])` with
    /// distance on x and time on y. Each sample is a cell centred on its
    /// coordinate, so the area reaches half a sampling interval past the
    /// first and last coordinate.
    pub fn extent(&self) -> ([f64; 2], [f64; 2]) {
        let (x0, x1) = cell_span(&self.distance);
        let (y0, y1) = cell_span(&self.time);
        ([x0, y0], [x1, y1])
    }
}

fn cell_span(coord: &[f64]) -> (f64, f64) {
    let (Some(&first), Some(&last)) = (coord.first(), coord.last()) else {
        return (0.0, 0.0);
    };
    let step = if coord.len() > 1 {
        (last - first) / (coord.len() - 1) as f64
    } else {
        1.0
    };
    (first - step / 2.0, last + step / 2.0)
}

// ─────────────────────────────────────────────────────────────────────────────
// Sources
// ─────────────────────────────────────────────────────────────────────────────

/// Somewhere windows of a record can be loaded from.
pub trait RecordSource {
    /// Short human-readable description (file name, variable).
    fn describe(&self) -> String;
    /// Load the samples inside `window`.
    fn load(&self, window: &RecordWindow) -> Result<Record>;
}

/// A record already held in memory.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    record: Record,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, record: Record) -> Self {
        Self {
            name: name.into(),
            record,
        }
    }
}

impl RecordSource for MemorySource {
    fn describe(&self) -> String {
        let (nt, nd) = self.record.dim();
        format!("{} ({nt}x{nd})", self.name)
    }

    fn load(&self, window: &RecordWindow) -> Result<Record> {
        self.record.window(window)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TimeUnits
// ─────────────────────────────────────────────────────────────────────────────

/// CF-style time units (`"<unit> since <reference>"`) converted to epoch ms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeUnits {
    pub ms_per_unit: f64,
    /// Reference instant in milliseconds since the UNIX epoch.
    pub epoch_ms: f64,
}

impl Default for TimeUnits {
    /// Plain epoch milliseconds.
    fn default() -> Self {
        Self {
            ms_per_unit: 1.0,
            epoch_ms: 0.0,
        }
    }
}

impl TimeUnits {
    pub fn parse(units: &str) -> Result<Self> {
        let err = || PickError::TimeUnits {
            units: units.to_string(),
        };
        let (unit, reference) = units.trim().split_once(" since ").ok_or_else(err)?;
        let ms_per_unit = match unit.trim().to_ascii_lowercase().as_str() {
            "days" | "day" | "d" => 86_400_000.0,
            "hours" | "hour" | "hr" | "h" => 3_600_000.0,
            "minutes" | "minute" | "min" => 60_000.0,
            "seconds" | "second" | "sec" | "s" => 1_000.0,
            "milliseconds" | "millisecond" | "msec" | "ms" => 1.0,
            "microseconds" | "microsecond" | "us" => 1e-3,
            "nanoseconds" | "nanosecond" | "ns" => 1e-6,
            _ => return Err(err()),
        };

        let reference = reference.trim().trim_end_matches("UTC").trim_end_matches('Z').trim();
        let epoch_ms = match parse_pick_time(reference) {
            Ok(ms) => ms,
            // date only
            Err(_) => chrono::NaiveDate::parse_from_str(reference, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc().timestamp_millis() as f64)
                .ok_or_else(err)?,
        };
        Ok(Self {
            ms_per_unit,
            epoch_ms,
        })
    }

    pub fn to_millis(&self, value: f64) -> f64 {
        self.epoch_ms + value * self.ms_per_unit
    }
}
