pub mod picks_ui;
pub mod plot_ui;
pub mod record_ui;

pub use picks_ui::PicksPanel;
pub use plot_ui::PlotPanel;
pub use record_ui::{RecordAction, RecordPanel};
