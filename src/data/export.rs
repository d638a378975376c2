//! Saving and loading picks.
//!
//! Pick files are CSV with the columns `time,distance,phase`, sorted by time.
//! The status column is never written: everything on disk is settled, and
//! loaded rows come back as [`Status::Inactive`].

use std::io::{Read, Write};
use std::path::Path;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::data::picks::{PickColumns, PickRow, PickTable, Status};
use crate::data::time_axis::millis_to_utc;
use crate::error::{PickError, Result};

/// Layout of `time` cells written by [`write_picks_csv`].
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

#[derive(Debug, Serialize, Deserialize)]
struct PickRecord {
    time: String,
    distance: f64,
    phase: String,
}

/// Format a millisecond timestamp as a UTC time cell.
pub fn format_pick_time(ms: f64) -> String {
    millis_to_utc(ms).format(TIME_FORMAT).to_string()
}

/// Parse a time cell back into milliseconds since the epoch.
///
/// Accepts the [`TIME_FORMAT`] layout (with or without fraction), the same
/// with a `T` separator, RFC 3339, and bare millisecond numbers.
pub fn parse_pick_time(s: &str) -> Result<f64> {
    let s = s.trim();
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.and_utc().timestamp_micros() as f64 / 1_000.0);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.timestamp_micros() as f64 / 1_000.0);
    }
    s.parse::<f64>().map_err(|_| PickError::TimeParse {
        value: s.to_string(),
    })
}

/// Write the table as CSV, sorted by time. Ties keep table order.
pub fn write_picks_csv<W: Write>(writer: W, table: &PickTable) -> Result<()> {
    let mut rows: Vec<_> = table.rows().collect();
    rows.sort_by(|a, b| a.time.total_cmp(&b.time));

    let mut w = csv::Writer::from_writer(writer);
    for r in rows {
        w.serialize(PickRecord {
            time: format_pick_time(r.time),
            distance: r.distance,
            phase: r.phase.to_string(),
        })?;
    }
    w.flush().map_err(|e| PickError::Csv(e.into()))?;
    Ok(())
}

/// Read CSV picks. Extra columns (such as `status`) are ignored.
pub fn read_picks_csv<R: Read>(reader: R) -> Result<PickColumns> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut cols = PickColumns::default();
    for rec in rdr.deserialize::<PickRecord>() {
        let rec = rec?;
        let time = parse_pick_time(&rec.time)?;
        cols.push(PickRow::new(rec.distance, time, rec.phase, Status::Inactive));
    }
    Ok(cols)
}

pub fn save_picks_csv<P: AsRef<Path>>(path: P, table: &PickTable) -> Result<()> {
    let path = path.as_ref();
    let f = std::fs::File::create(path).map_err(|e| PickError::io(path, e))?;
    write_picks_csv(std::io::BufWriter::new(f), table)?;
    log::info!("Saved {} picks to {}", table.len(), path.display());
    Ok(())
}

pub fn load_picks_csv<P: AsRef<Path>>(path: P) -> Result<PickColumns> {
    let path = path.as_ref();
    let f = std::fs::File::open(path).map_err(|e| PickError::io(path, e))?;
    let cols = read_picks_csv(std::io::BufReader::new(f))?;
    log::info!("Loaded {} picks from {}", cols.len(), path.display());
    Ok(cols)
}

/// Load a CSV file into `table`, replacing its contents, and notify.
/// Returns the number of rows loaded. The table is untouched on error.
pub fn load_picks_into<P: AsRef<Path>>(path: P, table: &mut PickTable) -> Result<usize> {
    let cols = load_picks_csv(path)?;
    let n = cols.len();
    table.replace(cols)?;
    table.emit_change();
    Ok(n)
}

/// Write the table as Parquet with columns `time` (ms), `distance`, `phase`.
#[cfg(feature = "parquet")]
pub fn save_picks_parquet<P: AsRef<Path>>(path: P, table: &PickTable) -> Result<()> {
    use std::sync::Arc;

    use arrow_array::{Float64Array, RecordBatch, StringArray};
    use arrow_schema::{DataType, Field, Schema};
    use parquet::arrow::arrow_writer::ArrowWriter;
    use parquet::file::properties::WriterProperties;

    let mut rows: Vec<_> = table.rows().collect();
    rows.sort_by(|a, b| a.time.total_cmp(&b.time));

    let schema = Arc::new(Schema::new(vec![
        Field::new("time", DataType::Float64, false),
        Field::new("distance", DataType::Float64, false),
        Field::new("phase", DataType::Utf8, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.time))) as _,
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.distance))) as _,
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.phase))) as _,
        ],
    )?;

    let path = path.as_ref();
    let file = std::fs::File::create(path).map_err(|e| PickError::io(path, e))?;
    let props = WriterProperties::builder().build();
    let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
    writer.write(&batch)?;
    writer.close()?;
    log::info!("Saved {} picks to {}", table.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_cell_round_trips_to_the_microsecond() {
        let ms = 1_636_767_660_123.456;
        let cell = format_pick_time(ms);
        assert_eq!(cell, "2021-11-13 01:41:00.123456");
        assert!((parse_pick_time(&cell).unwrap() - ms).abs() < 1e-3);
    }

    #[test]
    fn parse_accepts_other_layouts() {
        let expected = 1_636_767_660_000.0;
        assert_eq!(parse_pick_time("2021-11-13 01:41:00").unwrap(), expected);
        assert_eq!(parse_pick_time("2021-11-13T01:41:00").unwrap(), expected);
        assert_eq!(parse_pick_time("2021-11-13T02:41:00+01:00").unwrap(), expected);
        assert_eq!(parse_pick_time("1636767660000").unwrap(), expected);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(
            parse_pick_time("yesterday"),
            Err(PickError::TimeParse { .. })
        ));
    }
}
