//! Application module for xpick.
//!
//! | Sub-module       | Responsibility |
//! | ---------------- | -------------- |
//! | [`picker_app`]   | [`PickerApp`]: shared pick state, gesture tools, panels |
//! | [`run`]          | [`run_picker()`] entry point and icon loading |

mod picker_app;
mod run;

pub use picker_app::PickerApp;
pub use run::run_picker;
