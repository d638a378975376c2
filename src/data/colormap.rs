//! Turning record samples into an image: symmetric-log normalisation and the
//! two palettes the record view offers.

use egui::{Color32, ColorImage};

use crate::data::record::Record;
use crate::error::{PickError, Result};

/// Largest image side handed to the GPU; longer axes are thinned by striding.
pub const MAX_IMAGE_SIDE: usize = 4096;

// ─────────────────────────────────────────────────────────────────────────────
// Palette
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Palette {
    #[default]
    Viridis,
    /// Blue-white-red diverging.
    Seismic,
}

const VIRIDIS: [(f64, [f64; 3]); 5] = [
    (0.00, [68.0, 1.0, 84.0]),
    (0.25, [59.0, 82.0, 139.0]),
    (0.50, [33.0, 145.0, 140.0]),
    (0.75, [94.0, 201.0, 98.0]),
    (1.00, [253.0, 231.0, 37.0]),
];

const SEISMIC: [(f64, [f64; 3]); 3] = [
    (0.0, [33.0, 81.0, 217.0]),
    (0.5, [235.0, 235.0, 235.0]),
    (1.0, [201.0, 38.0, 38.0]),
];

impl Palette {
    pub const ALL: [Palette; 2] = [Palette::Viridis, Palette::Seismic];

    pub fn label(self) -> &'static str {
        match self {
            Palette::Viridis => "viridis",
            Palette::Seismic => "seismic",
        }
    }

    /// Colour of a normalised value; values outside `[0, 1]` saturate and
    /// NaN is transparent.
    pub fn color(self, t: f64) -> Color32 {
        if t.is_nan() {
            return Color32::TRANSPARENT;
        }
        let t = t.clamp(0.0, 1.0);
        match self {
            Palette::Viridis => interpolate(&VIRIDIS, t),
            Palette::Seismic => interpolate(&SEISMIC, t),
        }
    }
}

/// Piecewise linear interpolation between colour stops.
fn interpolate(stops: &[(f64, [f64; 3])], t: f64) -> Color32 {
    let i = stops
        .windows(2)
        .position(|w| t <= w[1].0)
        .unwrap_or(stops.len().saturating_sub(2));
    let (t0, c0) = stops[i];
    let (t1, c1) = stops[(i + 1).min(stops.len() - 1)];
    let f = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
    let ch = |k: usize| (c0[k] + f * (c1[k] - c0[k])).round() as u8;
    Color32::from_rgb(ch(0), ch(1), ch(2))
}

// ─────────────────────────────────────────────────────────────────────────────
// SymLogNorm
// ─────────────────────────────────────────────────────────────────────────────

/// Symmetric logarithmic normalisation onto `[0, 1]`: linear within
/// `±linthresh`, base-10 logarithmic outside, `-vlim -> 0`, `vlim -> 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymLogNorm {
    linthresh: f64,
    vlim: f64,
}

impl SymLogNorm {
    /// Width of the linear band in decades.
    const LINSCALE: f64 = 1.0;

    pub fn new(linthresh: f64, vlim: f64) -> Result<Self> {
        if !(linthresh > 0.0 && vlim > 0.0 && linthresh.is_finite() && vlim.is_finite()) {
            return Err(PickError::InvalidNorm { linthresh, vlim });
        }
        Ok(Self { linthresh, vlim })
    }

    fn transform(&self, x: f64) -> f64 {
        let scale = Self::LINSCALE / (1.0 - 1.0 / 10.0);
        let ax = x.abs();
        if ax <= self.linthresh {
            x * scale
        } else {
            x.signum() * self.linthresh * (scale + (ax / self.linthresh).log10())
        }
    }

    /// Unclipped normalised value; NaN stays NaN.
    pub fn normalize(&self, x: f64) -> f64 {
        let lo = self.transform(-self.vlim);
        let hi = self.transform(self.vlim);
        (self.transform(x) - lo) / (hi - lo)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────────────────────────────────────

/// How samples are turned into colours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColormapSettings {
    pub palette: Palette,
    pub linthresh: f64,
    pub vlim: f64,
    /// Factor applied to raw samples before normalisation.
    pub gain: f64,
}

impl Default for ColormapSettings {
    fn default() -> Self {
        Self {
            palette: Palette::Viridis,
            linthresh: 1e-8,
            vlim: 1e-5,
            gain: 1.08e-7,
        }
    }
}

/// A rendered record window and the plot area it covers.
#[derive(Clone)]
pub struct RecordImage {
    /// Row 0 is the latest time, column 0 the smallest distance.
    pub image: ColorImage,
    /// `([xmin, ymin], [xmax, ymax])`, see [`Record::extent`].
    pub extent: ([f64; 2], [f64; 2]),
}

impl RecordImage {
    pub fn center(&self) -> [f64; 2] {
        let (min, max) = self.extent;
        [(min[0] + max[0]) / 2.0, (min[1] + max[1]) / 2.0]
    }

    pub fn size(&self) -> [f64; 2] {
        let (min, max) = self.extent;
        [max[0] - min[0], max[1] - min[1]]
    }
}

/// Colour every sample of `record`. Axes longer than [`MAX_IMAGE_SIDE`] keep
/// every n-th sample.
pub fn render_record(record: &Record, settings: &ColormapSettings) -> Result<RecordImage> {
    let norm = SymLogNorm::new(settings.linthresh, settings.vlim)?;
    let values = record.values();
    let (nt, nd) = record.dim();
    if nt == 0 || nd == 0 {
        return Err(PickError::NoRecord);
    }
    let step_t = nt.div_ceil(MAX_IMAGE_SIDE).max(1);
    let step_d = nd.div_ceil(MAX_IMAGE_SIDE).max(1);
    let height = nt.div_ceil(step_t);
    let width = nd.div_ceil(step_d);

    let mut rgba = Vec::with_capacity(width * height * 4);
    for row in 0..height {
        let t = (height - 1 - row) * step_t;
        for col in 0..width {
            let v = values[[t, col * step_d]] * settings.gain;
            let c = settings.palette.color(norm.normalize(v));
            rgba.extend_from_slice(&[c.r(), c.g(), c.b(), c.a()]);
        }
    }

    Ok(RecordImage {
        image: ColorImage::from_rgba_unmultiplied([width, height], &rgba),
        extent: record.extent(),
    })
}
