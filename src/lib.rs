//! xpick crate root: re-exports and module wiring.
//!
//! An interactive phase picker for distance/time data built on egui/eframe.
//! Dragging on the plot records picks for the selected phase; releasing the
//! drag erases older picks of that phase under the new distance span.
//!
//! - `data`: the shared pick table, phase group, pick files, time labels and
//!   the DAS record shown under the picks (windowing, netCDF reading, colours)
//! - `gesture`: plot frame abstraction, gesture tools and their dispatcher
//! - `picker`: the drag-to-pick tool
//! - `select`: box selection for deleting picks
//! - `panels` / `app`: the egui host and the [`run_picker`] entry point

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod gesture;
pub mod panels;
pub mod picker;
pub mod select;

pub use app::{run_picker, PickerApp};
pub use config::{parse_colors, parse_phases, PickerConfig};
pub use data::colormap::{render_record, ColormapSettings, Palette, RecordImage, SymLogNorm};
pub use data::phase::{PhaseGroup, SharedPhaseGroup};
pub use data::picks::{
    PickColumns, PickRow, PickRowRef, PickTable, PicksChanged, SharedPickTable, Status,
};
pub use data::reader::open_record_source;
pub use data::record::{MemorySource, Record, RecordSource, RecordWindow, TimeUnits};
pub use error::{PickError, Result};
pub use gesture::{
    ButtonDrag, DragButton, DragEvent, EguiPlotFrame, GestureDispatcher, GestureTool, LinearFrame,
    PlotFrame, PointerDrag,
};
pub use panels::{RecordAction, RecordPanel};
pub use picker::{DragState, PickerTool};
pub use select::{BoxSelection, SelectTool, SharedSelection};
