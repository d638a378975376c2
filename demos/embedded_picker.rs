//! Example: Embedding the picker into your own egui application
//!
//! What it demonstrates
//! - Owning the pick table and phase group in the host app and handing them to `PickerApp`.
//! - Observing edits through a second subscription on the same table.
//! - Seeding settled picks from code before the user starts dragging.
//! - Showing an in-memory record under the picks through `MemorySource`.
//!
//! How to run
//! ```bash
//! cargo run --example embedded_picker
//! ```
//! Drag with the left button to pick, with the right button to box-select.

use std::sync::mpsc::Receiver;

use eframe::{egui, NativeOptions};
use ndarray::Array2;
use xpick::data::export::format_pick_time;
use xpick::{
    MemorySource, PhaseGroup, PickRow, PickTable, PickerApp, PicksChanged, Record, Status,
};

struct DemoApp {
    picker: PickerApp,
    changes: Receiver<PicksChanged>,
    edits: usize,
    last: Option<PicksChanged>,
}

impl DemoApp {
    fn new() -> xpick::Result<Self> {
        let mut table = PickTable::new();
        let t0 = chrono::Utc::now().timestamp_millis() as f64;
        // a straight moveout line for phase "P"
        for i in 0..20 {
            let d = i as f64 * 50.0;
            table.append(PickRow::new(d, t0 + d * 0.4, "P", Status::Inactive));
        }
        let changes = table.subscribe();
        let picks = table.into_shared();
        let phases = PhaseGroup::new(vec!["P".into(), "S".into(), "Ps".into()], &[])?.into_shared();

        let mut picker = PickerApp::with_handles(picks, phases);
        let record = synthetic_record(t0)?;
        let (first, last) = (record.time()[0], record.time()[record.time().len() - 1]);
        {
            let fields = picker.record_controls_mut();
            fields.start_time = format_pick_time(first);
            fields.end_time = format_pick_time(last);
            fields.start_distance = "0".into();
            fields.end_distance = "1_000".into();
        }
        picker.set_source(Box::new(MemorySource::new("synthetic", record)));
        picker.apply_selection()?;

        Ok(Self {
            picker,
            changes,
            edits: 0,
            last: None,
        })
    }
}

/// Two Ricker arrivals with different moveouts over 0-1000 m, sampled every
/// 4 ms and 10 m.
fn synthetic_record(t0: f64) -> xpick::Result<Record> {
    let time: Vec<f64> = (0..400).map(|i| t0 - 200.0 + i as f64 * 4.0).collect();
    let distance: Vec<f64> = (0..=100).map(|i| i as f64 * 10.0).collect();
    let ricker = |dt: f64| {
        let a = (dt / 25.0).powi(2);
        (1.0 - 2.0 * a) * (-a).exp()
    };
    let values = Array2::from_shape_fn((time.len(), distance.len()), |(i, j)| {
        let (t, d) = (time[i], distance[j]);
        50.0 * ricker(t - (t0 + d * 0.4)) + 20.0 * ricker(t - (t0 + 150.0 + d * 0.7))
    });
    Record::new(time, distance, values)
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for change in self.changes.try_iter() {
            self.edits += 1;
            self.last = Some(change);
        }

        egui::TopBottomPanel::bottom("demo_status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("Edits observed: {}", self.edits));
                if let Some(last) = self.last {
                    ui.separator();
                    ui.label(format!("revision {} with {} picks", last.revision, last.rows));
                }
                ui.separator();
                let phases = self.picker.phases();
                ui.label(format!("Picking {}", phases.borrow().active_label()));
            });
        });

        self.picker.show(ctx);
    }
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let app = DemoApp::new().map_err(|e| eframe::Error::AppCreation(Box::new(e)))?;
    eframe::run_native(
        "xpick embedded demo",
        NativeOptions::default(),
        Box::new(|_cc| Ok(Box::new(app))),
    )
}
