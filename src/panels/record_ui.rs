use egui::Ui;
use egui_phosphor::regular::{ARROWS_OUT, CHECK};

use crate::data::colormap::{ColormapSettings, Palette};
use crate::data::export::format_pick_time;
use crate::data::record::{parse_number, RecordWindow};
use crate::error::Result;

/// What the record controls asked for this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordAction {
    /// Reload the record for the edited window and colormap.
    Apply,
    /// Reset the view to the record (or the picks without one).
    Home,
    /// Recolour the loaded window; only the palette changed.
    Recolor,
}

/// Side panel section with the record window and colormap fields.
///
/// Fields are kept as text and only parsed on apply, so a half-typed value
/// never reaches the loader.
pub struct RecordPanel {
    pub start_time: String,
    pub end_time: String,
    pub start_distance: String,
    pub end_distance: String,
    pub linthresh: String,
    pub vlim: String,
    pub palette: Palette,
}

impl Default for RecordPanel {
    fn default() -> Self {
        Self::new(&RecordWindow::default(), &ColormapSettings::default())
    }
}

impl RecordPanel {
    pub fn new(window: &RecordWindow, colormap: &ColormapSettings) -> Self {
        Self {
            start_time: format_pick_time(window.start_time),
            end_time: format_pick_time(window.end_time),
            start_distance: window.start_distance.to_string(),
            end_distance: window.end_distance.to_string(),
            linthresh: colormap.linthresh.to_string(),
            vlim: colormap.vlim.to_string(),
            palette: colormap.palette,
        }
    }

    pub fn window(&self) -> Result<RecordWindow> {
        RecordWindow::parse(
            &self.start_time,
            &self.end_time,
            &self.start_distance,
            &self.end_distance,
        )
    }

    /// Colormap from the fields; `gain` is not editable here.
    pub fn colormap(&self, gain: f64) -> Result<ColormapSettings> {
        Ok(ColormapSettings {
            palette: self.palette,
            linthresh: parse_number("linear threshold", &self.linthresh)?,
            vlim: parse_number("value limit", &self.vlim)?,
            gain,
        })
    }

    pub fn render(&mut self, ui: &mut Ui, source: Option<&str>) -> Option<RecordAction> {
        let mut action = None;

        ui.heading("Selection");
        ui.add_space(4.0);
        match source {
            Some(desc) => ui.small(desc),
            None => ui.small("No record loaded"),
        };

        ui.columns(2, |cols| {
            cols[0].label("Time");
            text_field(&mut cols[0], "start", &mut self.start_time);
            text_field(&mut cols[0], "end", &mut self.end_time);
            cols[1].label("Space");
            text_field(&mut cols[1], "start", &mut self.start_distance);
            text_field(&mut cols[1], "end", &mut self.end_distance);
        });

        ui.horizontal(|ui| {
            if ui
                .add_enabled(source.is_some(), egui::Button::new(format!("{CHECK} apply")))
                .clicked()
            {
                action = Some(RecordAction::Apply);
            }
            if ui
                .button(format!("{ARROWS_OUT} home"))
                .on_hover_text("Reset view to the record")
                .clicked()
            {
                action = Some(RecordAction::Home);
            }
        });

        ui.separator();
        ui.heading("Colormap");
        ui.add_space(4.0);
        egui::Grid::new("xpick_colormap").num_columns(2).show(ui, |ui| {
            ui.label("linthresh");
            ui.add(egui::TextEdit::singleline(&mut self.linthresh).desired_width(120.0));
            ui.end_row();
            ui.label("vlim");
            ui.add(egui::TextEdit::singleline(&mut self.vlim).desired_width(120.0));
            ui.end_row();
        });

        ui.horizontal(|ui| {
            for p in Palette::ALL {
                if ui.selectable_value(&mut self.palette, p, p.label()).changed() {
                    action = Some(RecordAction::Recolor);
                }
            }
            if ui
                .add_enabled(source.is_some(), egui::Button::new(format!("{CHECK} apply")))
                .clicked()
            {
                action = Some(RecordAction::Apply);
            }
        });

        action
    }
}

fn text_field(ui: &mut Ui, label: &str, value: &mut String) {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.add(egui::TextEdit::singleline(value).desired_width(f32::INFINITY));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PickError;

    #[test]
    fn default_fields_parse_back() {
        let panel = RecordPanel::default();
        assert_eq!(panel.start_time, "2021-11-13 01:41:00.000000");
        assert_eq!(panel.window().unwrap(), RecordWindow::default());
        let cm = panel.colormap(2.0).unwrap();
        assert_eq!(cm.linthresh, 1e-8);
        assert_eq!(cm.vlim, 1e-5);
        assert_eq!(cm.gain, 2.0);
    }

    #[test]
    fn bad_fields_are_reported() {
        let mut panel = RecordPanel::default();
        panel.end_distance = "120 km".into();
        assert!(matches!(
            panel.window(),
            Err(PickError::InvalidNumber {
                field: "end distance",
                ..
            })
        ));
        panel.vlim = String::new();
        assert!(panel.colormap(1.0).is_err());
    }
}
