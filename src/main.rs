//! # xpick
//!
//! Interactive phase picker for distance/time records.
//!
//! ```bash
//! xpick --phases "Pp,Ps,Ss" --picks picks.csv \
//!     --record das.nc --start-time "2021-11-13 01:41:00" --end-time "2021-11-13 01:41:10"
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use xpick::data::export::parse_pick_time;
use xpick::data::record::parse_number;
use xpick::{parse_colors, parse_phases, run_picker, PickerConfig, RecordWindow};

/// xpick - pick phases on distance/time plots
#[derive(Parser)]
#[command(name = "xpick")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Width of the plot in pixels
    #[arg(long, default_value = "1080")]
    width: u32,

    /// Height of the plot in pixels
    #[arg(long, default_value = "720")]
    height: u32,

    /// List of phases to pick, e.g. 'P,S'
    #[arg(long, default_value = "P,S")]
    phases: String,

    /// List of phase colors, e.g. '#7F0DFF,#FF00FF' (empty = default palette)
    #[arg(long, default_value = "")]
    colors: String,

    /// Pick file to preload and save to
    #[arg(long, value_name = "FILE")]
    picks: Option<PathBuf>,

    /// netCDF record to pick on (needs the `netcdf` feature)
    #[arg(long, value_name = "FILE")]
    record: Option<PathBuf>,

    /// Data variable inside the record file
    #[arg(long, default_value = "data")]
    variable: String,

    /// Start of the time window, e.g. '2021-11-13 01:41:00'
    #[arg(long)]
    start_time: Option<String>,

    /// End of the time window
    #[arg(long)]
    end_time: Option<String>,

    /// Start of the distance window, e.g. '20_000.0'
    #[arg(long)]
    start_distance: Option<String>,

    /// End of the distance window
    #[arg(long)]
    end_distance: Option<String>,

    /// Factor applied to record samples before colouring
    #[arg(long)]
    gain: Option<f64>,
}

/// Selection window from the CLI, falling back to the default per field.
fn window_from_cli(cli: &Cli) -> Result<RecordWindow> {
    let mut window = RecordWindow::default();
    if let Some(s) = &cli.start_time {
        window.start_time = parse_pick_time(s).context("Invalid --start-time")?;
    }
    if let Some(s) = &cli.end_time {
        window.end_time = parse_pick_time(s).context("Invalid --end-time")?;
    }
    if let Some(s) = &cli.start_distance {
        window.start_distance =
            parse_number("start distance", s).context("Invalid --start-distance")?;
    }
    if let Some(s) = &cli.end_distance {
        window.end_distance = parse_number("end distance", s).context("Invalid --end-distance")?;
    }
    Ok(window)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let defaults = PickerConfig::default();
    let mut colormap = defaults.colormap;
    if let Some(gain) = cli.gain {
        colormap.gain = gain;
    }
    let cfg = PickerConfig {
        width: cli.width as f32,
        height: cli.height as f32,
        phases: parse_phases(&cli.phases).context("Invalid --phases")?,
        colors: parse_colors(&cli.colors).context("Invalid --colors")?,
        window: window_from_cli(&cli)?,
        colormap,
        picks_path: cli.picks,
        record_path: cli.record,
        variable: cli.variable,
        ..defaults
    };
    info!("Starting picker with phases {:?}", cfg.phases);

    run_picker(cfg).map_err(|e| anyhow::anyhow!("Picker window failed: {e}"))
}
