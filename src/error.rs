//! Error types for pick files, records and picker configuration.
//!
//! Gesture callbacks never fail; only the surrounding file, record and
//! configuration plumbing reports errors through [`PickError`].

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for xpick operations.
pub type Result<T> = std::result::Result<T, PickError>;

/// Errors that can occur while loading, saving or configuring picks.
#[derive(Debug, Error)]
pub enum PickError {
    /// Failed to open or create a pick file.
    #[error("Failed to access pick file: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV content or a CSV write failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A time cell could not be interpreted as a timestamp.
    #[error("Cannot parse pick time: {value:?}")]
    TimeParse { value: String },

    /// Parallel columns handed to the table do not have equal length.
    #[error(
        "Column length mismatch: distance={distance}, time={time}, phase={phase}, status={status}"
    )]
    ColumnMismatch {
        distance: usize,
        time: usize,
        phase: usize,
        status: usize,
    },

    /// A phase group needs at least one label.
    #[error("No phase labels configured")]
    NoPhases,

    /// A colour string is not of the form `#RRGGBB`.
    #[error("Invalid color: {value:?} (expected #RRGGBB)")]
    InvalidColor { value: String },

    /// A text field does not hold a number.
    #[error("Invalid {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    /// Record coordinates and values disagree in shape.
    #[error("Record shape mismatch: values are {rows}x{cols}, coordinates are time={time}, distance={distance}")]
    RecordShape {
        rows: usize,
        cols: usize,
        time: usize,
        distance: usize,
    },

    /// The requested window holds no samples.
    #[error("No samples in window: time {start_time}..{end_time}, distance {start_distance}..{end_distance}")]
    EmptyWindow {
        start_time: String,
        end_time: String,
        start_distance: f64,
        end_distance: f64,
    },

    /// Colour normalisation parameters out of range.
    #[error("Invalid colormap: linear threshold {linthresh} and value limit {vlim} must be positive")]
    InvalidNorm { linthresh: f64, vlim: f64 },

    /// CF `units` attribute of the time coordinate not understood.
    #[error("Unsupported time units: {units:?}")]
    TimeUnits { units: String },

    /// No record is attached to the picker.
    #[error("No record loaded")]
    NoRecord,

    /// A record file was given but netCDF support is not compiled in.
    #[error("netCDF support not compiled in (enable the `netcdf` feature)")]
    NetcdfDisabled,

    /// Failed to read a netCDF record.
    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    NetCdf(String),

    /// Parquet export failure.
    #[cfg(feature = "parquet")]
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Arrow batch construction failure.
    #[cfg(feature = "parquet")]
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow_schema::ArrowError),
}

impl PickError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PickError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(feature = "netcdf")]
impl From<netcdf::Error> for PickError {
    fn from(err: netcdf::Error) -> Self {
        Self::NetCdf(err.to_string())
    }
}
