use std::path::PathBuf;

use egui::{Color32, RichText, Ui};
use egui_phosphor::regular::{ERASER, FLOPPY_DISK, FOLDER_OPEN, TRASH};

use crate::data::export::{load_picks_into, save_picks_csv};
use crate::data::phase::SharedPhaseGroup;
use crate::data::picks::SharedPickTable;
use crate::error::Result;
use crate::select::SharedSelection;

/// Side panel: phase toggle group, marker size and pick file management.
pub struct PicksPanel {
    pub marker_size: f32,
    pub path: String,
    status: Option<(String, bool)>,
}

impl Default for PicksPanel {
    fn default() -> Self {
        Self {
            marker_size: 3.0,
            path: String::new(),
            status: None,
        }
    }
}

impl PicksPanel {
    pub fn new(marker_size: f32, path: Option<PathBuf>) -> Self {
        Self {
            marker_size,
            path: path.map(|p| p.display().to_string()).unwrap_or_default(),
            ..Self::default()
        }
    }

    pub fn set_status(&mut self, msg: impl Into<String>, is_error: bool) {
        self.status = Some((msg.into(), is_error));
    }

    pub fn render(
        &mut self,
        ui: &mut Ui,
        picks: &SharedPickTable,
        phases: &SharedPhaseGroup,
        selection: &SharedSelection,
    ) {
        ui.heading("Picks");
        ui.add_space(4.0);

        ui.label("Phase");
        ui.horizontal_wrapped(|ui| {
            let mut group = phases.borrow_mut();
            let mut active = group.active();
            for (i, label) in group.labels().iter().enumerate() {
                let text = RichText::new(label).color(group.color_at(i)).strong();
                ui.selectable_value(&mut active, i, text);
            }
            group.set_active(active);
        });

        ui.add(
            egui::Slider::new(&mut self.marker_size, 1.0..=50.0)
                .step_by(1.0)
                .text("Marker Size"),
        );

        ui.separator();
        ui.horizontal(|ui| {
            ui.label("Path");
            ui.add(egui::TextEdit::singleline(&mut self.path).desired_width(220.0));
            if ui
                .button(FOLDER_OPEN)
                .on_hover_text("Choose pick file")
                .clicked()
            {
                if let Some(p) = rfd::FileDialog::new()
                    .add_filter("CSV", &["csv"])
                    .pick_file()
                {
                    self.path = p.display().to_string();
                }
            }
        });

        ui.horizontal(|ui| {
            if ui.button(format!("{FLOPPY_DISK} save")).clicked() {
                self.save(picks);
            }
            if ui.button(format!("{FOLDER_OPEN} load")).clicked() {
                self.load(picks, selection);
            }
            let n_selected = selection.borrow().selected().len();
            if ui
                .add_enabled(n_selected > 0, egui::Button::new(format!("{TRASH} delete")))
                .clicked()
            {
                let removed = selection
                    .borrow_mut()
                    .delete_selected(&mut picks.borrow_mut());
                self.set_status(format!("Deleted {removed} picks"), false);
            }
            if ui.button(format!("{ERASER} reset")).clicked() {
                let mut table = picks.borrow_mut();
                table.clear();
                table.emit_change();
                selection.borrow_mut().clear();
                log::info!("Picks reset");
                self.set_status("Picks reset", false);
            }
        });

        #[cfg(feature = "parquet")]
        self.render_parquet_export(ui, picks);

        ui.separator();
        let n = picks.borrow().len();
        ui.label(format!(
            "{n} picks, {} selected",
            selection.borrow().selected().len()
        ));
        ui.small("Drag: pick  ·  Right-drag: select");

        if let Some((msg, is_error)) = &self.status {
            let color = if *is_error {
                Color32::LIGHT_RED
            } else {
                ui.visuals().weak_text_color()
            };
            ui.colored_label(color, msg);
        }
    }

    #[cfg(feature = "parquet")]
    fn render_parquet_export(&mut self, ui: &mut Ui, picks: &SharedPickTable) {
        if ui.button("Export Parquet…").clicked() {
            if let Some(p) = rfd::FileDialog::new()
                .set_file_name("picks.parquet")
                .add_filter("Parquet", &["parquet"])
                .save_file()
            {
                let res = crate::data::export::save_picks_parquet(&p, &picks.borrow());
                self.report(res.map(|_| format!("Exported to {}", p.display())));
            }
        }
    }

    fn save(&mut self, picks: &SharedPickTable) {
        let Some(path) = self.target_path(true) else {
            return;
        };
        let res = save_picks_csv(&path, &picks.borrow());
        self.report(res.map(|_| format!("Saved to {}", path.display())));
    }

    fn load(&mut self, picks: &SharedPickTable, selection: &SharedSelection) {
        let Some(path) = self.target_path(false) else {
            return;
        };
        let res = load_picks_into(&path, &mut picks.borrow_mut());
        if res.is_ok() {
            selection.borrow_mut().clear();
        }
        self.report(res.map(|n| format!("Loaded {n} picks")));
    }

    /// Path from the text field, or from a file dialog when it is empty.
    fn target_path(&mut self, saving: bool) -> Option<PathBuf> {
        if !self.path.trim().is_empty() {
            return Some(PathBuf::from(self.path.trim()));
        }
        let dlg = rfd::FileDialog::new().add_filter("CSV", &["csv"]);
        let picked = if saving {
            dlg.set_file_name("picks.csv").save_file()
        } else {
            dlg.pick_file()
        };
        if let Some(p) = &picked {
            self.path = p.display().to_string();
        }
        picked
    }

    fn report(&mut self, res: Result<String>) {
        match res {
            Ok(msg) => self.set_status(msg, false),
            Err(e) => {
                log::error!("{e}");
                self.set_status(e.to_string(), true);
            }
        }
    }
}
