pub mod colormap;
pub mod export;
pub mod phase;
pub mod picks;
pub mod reader;
pub mod record;
pub mod time_axis;
