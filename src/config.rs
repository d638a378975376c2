//! Configuration for the picker window.

use std::path::PathBuf;

use egui::Color32;

use crate::data::colormap::ColormapSettings;
use crate::data::phase::PhaseGroup;
use crate::data::record::RecordWindow;
use crate::error::{PickError, Result};

/// Top-level configuration for the picker application.
///
/// | Field            | Purpose |
/// |------------------|---------|
/// | `width`/`height` | Initial window size in pixels |
/// | `phases`         | Labels of the phase toggle group, in order |
/// | `colors`         | Colours cycled over the phases; empty = default palette |
/// | `marker_size`    | Initial pick marker radius |
/// | `picks_path`     | CSV to preload and to use as the default save path |
/// | `record_path`    | netCDF record to show under the picks |
/// | `variable`       | Data variable of the record file |
/// | `window`         | Initial Selection fields (time and distance bounds) |
/// | `colormap`       | Initial Colormap fields and sample gain |
#[derive(Clone)]
pub struct PickerConfig {
    /// Native window title.
    pub title: String,
    pub width: f32,
    pub height: f32,
    pub phases: Vec<String>,
    pub colors: Vec<Color32>,
    pub marker_size: f32,
    pub picks_path: Option<PathBuf>,
    pub record_path: Option<PathBuf>,
    pub variable: String,
    pub window: RecordWindow,
    pub colormap: ColormapSettings,
    /// Optional eframe native-window options.
    pub native_options: Option<eframe::NativeOptions>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            title: "xpick".to_string(),
            width: 1080.0,
            height: 720.0,
            phases: vec!["P".to_string(), "S".to_string()],
            colors: Vec::new(),
            marker_size: 3.0,
            picks_path: None,
            record_path: None,
            variable: "data".to_string(),
            window: RecordWindow::default(),
            colormap: ColormapSettings::default(),
            native_options: None,
        }
    }
}

impl PickerConfig {
    /// Phase toggle group described by `phases` and `colors`.
    pub fn phase_group(&self) -> Result<PhaseGroup> {
        PhaseGroup::new(self.phases.clone(), &self.colors)
    }
}

/// Split a comma separated phase list (`"P,S"`), dropping empty entries.
pub fn parse_phases(s: &str) -> Result<Vec<String>> {
    let phases: Vec<String> = s
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();
    if phases.is_empty() {
        return Err(PickError::NoPhases);
    }
    Ok(phases)
}

/// Parse a comma separated list of `#RRGGBB` colours. An empty string yields
/// an empty list (use the default palette).
pub fn parse_colors(s: &str) -> Result<Vec<Color32>> {
    s.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|c| {
            if c.len() != 7 {
                return Err(PickError::InvalidColor {
                    value: c.to_string(),
                });
            }
            Color32::from_hex(c).map_err(|_| PickError::InvalidColor {
                value: c.to_string(),
            })
        })
        .collect()
}
