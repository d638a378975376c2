//! netCDF record reader.
//!
//! A record file holds a 2-D data variable with dimensions `time` and
//! `distance` (either order) and a 1-D coordinate variable for each
//! dimension. The `time` coordinate is converted to epoch milliseconds with
//! its CF `units` attribute; without one it is taken as epoch milliseconds
//! already. CF `scale_factor`/`add_offset` on the data variable are applied.

use std::path::Path;

use crate::data::record::RecordSource;
use crate::error::Result;

#[cfg(feature = "netcdf")]
pub use self::netcdf_source::NetcdfSource;

/// Open `path` as a record source reading `variable`.
#[cfg(feature = "netcdf")]
pub fn open_record_source(path: &Path, variable: &str) -> Result<Box<dyn RecordSource>> {
    let source = NetcdfSource::open(path, variable)?;
    log::info!("Opened record {}", source.describe());
    Ok(Box::new(source))
}

/// Open `path` as a record source reading `variable`.
#[cfg(not(feature = "netcdf"))]
pub fn open_record_source(path: &Path, variable: &str) -> Result<Box<dyn RecordSource>> {
    log::warn!(
        "Cannot open {} ({variable}): built without netCDF support",
        path.display()
    );
    Err(crate::error::PickError::NetcdfDisabled)
}

#[cfg(feature = "netcdf")]
mod netcdf_source {
    use std::path::{Path, PathBuf};

    use ndarray::Array2;
    use netcdf::types::{FloatType, IntType, NcVariableType};
    use netcdf::AttributeValue;

    use crate::data::record::{index_range, Record, RecordSource, RecordWindow, TimeUnits};
    use crate::error::{PickError, Result};

    const TIME_DIM: &str = "time";
    const DISTANCE_DIM: &str = "distance";

    /// Reads windows of one 2-D variable of a netCDF file.
    ///
    /// Coordinates are read once on open; every [`load`](RecordSource::load)
    /// reads only the samples inside the window.
    #[derive(Debug)]
    pub struct NetcdfSource {
        path: PathBuf,
        variable: String,
        time_first: bool,
        time: Vec<f64>,
        distance: Vec<f64>,
    }

    impl NetcdfSource {
        pub fn open(path: &Path, variable: &str) -> Result<Self> {
            let file = netcdf::open(path)?;
            let var = file.variable(variable).ok_or_else(|| {
                PickError::NetCdf(format!("Variable '{variable}' not found"))
            })?;

            let dims: Vec<String> = var
                .dimensions()
                .iter()
                .map(|d| d.name().to_string())
                .collect();
            let names: Vec<&str> = dims.iter().map(String::as_str).collect();
            let time_first = match names.as_slice() {
                [TIME_DIM, DISTANCE_DIM] => true,
                [DISTANCE_DIM, TIME_DIM] => false,
                _ => {
                    return Err(PickError::NetCdf(format!(
                        "Variable '{variable}' has dimensions {dims:?}, expected (time, distance)"
                    )))
                }
            };

            let time_var = coordinate(&file, TIME_DIM)?;
            let units = match attribute(&time_var, "units") {
                Some(AttributeValue::Str(u)) => TimeUnits::parse(&u)?,
                _ => TimeUnits::default(),
            };
            let time = read_f64(&time_var, ..)?
                .into_iter()
                .map(|v| units.to_millis(v))
                .collect();
            let distance = read_f64(&coordinate(&file, DISTANCE_DIM)?, ..)?;

            Ok(Self {
                path: path.to_path_buf(),
                variable: variable.to_string(),
                time_first,
                time,
                distance,
            })
        }
    }

    impl RecordSource for NetcdfSource {
        fn describe(&self) -> String {
            format!(
                "{} [{}] ({}x{})",
                self.path.display(),
                self.variable,
                self.time.len(),
                self.distance.len()
            )
        }

        fn load(&self, window: &RecordWindow) -> Result<Record> {
            let t = index_range(&self.time, window.start_time, window.end_time);
            let d = index_range(&self.distance, window.start_distance, window.end_distance);
            if t.is_empty() || d.is_empty() {
                return Err(window.empty_error());
            }

            let file = netcdf::open(&self.path)?;
            let var = file.variable(&self.variable).ok_or_else(|| {
                PickError::NetCdf(format!("Variable '{}' not found", self.variable))
            })?;
            let extents = if self.time_first {
                (t.clone(), d.clone())
            } else {
                (d.clone(), t.clone())
            };
            let raw = read_f64(&var, extents)?;

            let shape = if self.time_first {
                (t.len(), d.len())
            } else {
                (d.len(), t.len())
            };
            let block = Array2::from_shape_vec(shape, raw)
                .map_err(|e| PickError::NetCdf(format!("Invalid shape/data size: {e}")))?;
            let mut values = if self.time_first {
                block
            } else {
                block.reversed_axes()
            };

            let scale = attribute_f64(&var, "scale_factor").unwrap_or(1.0);
            let offset = attribute_f64(&var, "add_offset").unwrap_or(0.0);
            if scale != 1.0 || offset != 0.0 {
                values.mapv_inplace(|v| v * scale + offset);
            }

            log::info!(
                "Loaded {}x{} samples from {}",
                t.len(),
                d.len(),
                self.path.display()
            );
            Record::new(self.time[t].to_vec(), self.distance[d].to_vec(), values)
        }
    }

    fn coordinate<'f>(file: &'f netcdf::File, name: &str) -> Result<netcdf::Variable<'f>> {
        file.variable(name)
            .ok_or_else(|| PickError::NetCdf(format!("Coordinate variable '{name}' not found")))
    }

    fn attribute(var: &netcdf::Variable<'_>, name: &str) -> Option<AttributeValue> {
        var.attributes()
            .find(|a| a.name() == name)
            .and_then(|a| a.value().ok())
    }

    fn attribute_f64(var: &netcdf::Variable<'_>, name: &str) -> Option<f64> {
        match attribute(var, name)? {
            AttributeValue::Double(v) => Some(v),
            AttributeValue::Float(v) => Some(v as f64),
            AttributeValue::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Read `extents` of a numeric variable as `f64`, whatever its storage type.
    fn read_f64<E>(var: &netcdf::Variable<'_>, extents: E) -> Result<Vec<f64>>
    where
        E: TryInto<netcdf::Extents>,
        E::Error: Into<netcdf::Error>,
    {
        fn widen<T: Into<f64>>(v: Vec<T>) -> Vec<f64> {
            v.into_iter().map(Into::into).collect()
        }

        let values = match var.vartype() {
            NcVariableType::Float(FloatType::F64) => var.get_values::<f64, _>(extents)?,
            NcVariableType::Float(FloatType::F32) => widen(var.get_values::<f32, _>(extents)?),
            NcVariableType::Int(IntType::I64) => var
                .get_values::<i64, _>(extents)?
                .into_iter()
                .map(|v| v as f64)
                .collect(),
            NcVariableType::Int(IntType::U64) => var
                .get_values::<u64, _>(extents)?
                .into_iter()
                .map(|v| v as f64)
                .collect(),
            NcVariableType::Int(IntType::I32) => widen(var.get_values::<i32, _>(extents)?),
            NcVariableType::Int(IntType::I16) => widen(var.get_values::<i16, _>(extents)?),
            NcVariableType::Int(IntType::I8) => widen(var.get_values::<i8, _>(extents)?),
            NcVariableType::Int(IntType::U32) => widen(var.get_values::<u32, _>(extents)?),
            NcVariableType::Int(IntType::U16) => widen(var.get_values::<u16, _>(extents)?),
            NcVariableType::Int(IntType::U8) => widen(var.get_values::<u8, _>(extents)?),
            other => {
                return Err(PickError::NetCdf(format!(
                    "Unsupported variable type: {other:?}"
                )))
            }
        };
        Ok(values)
    }
}
