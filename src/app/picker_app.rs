//! The picker application: shared pick state, the record being picked on,
//! registered gesture tools and the panels that render them.

use std::sync::mpsc::Receiver;

use eframe::egui;

use crate::config::PickerConfig;
use crate::data::colormap::{render_record, ColormapSettings};
use crate::data::export::load_picks_into;
use crate::data::phase::SharedPhaseGroup;
use crate::data::picks::{PickTable, PicksChanged, SharedPickTable};
use crate::data::reader::open_record_source;
use crate::data::record::{Record, RecordSource};
use crate::error::{PickError, Result};
use crate::gesture::{DragButton, GestureDispatcher};
use crate::panels::{PicksPanel, PlotPanel, RecordAction, RecordPanel};
use crate::picker::PickerTool;
use crate::select::{BoxSelection, SelectTool, SharedSelection};

pub struct PickerApp {
    picks: SharedPickTable,
    phases: SharedPhaseGroup,
    selection: SharedSelection,
    dispatcher: GestureDispatcher,
    changes: Receiver<PicksChanged>,
    plot: PlotPanel,
    controls: PicksPanel,
    record_controls: RecordPanel,
    source: Option<Box<dyn RecordSource>>,
    record: Option<Record>,
    colormap: ColormapSettings,
}

impl PickerApp {
    /// Build the app around host-owned handles.
    ///
    /// The picker is registered on the primary button and box selection on
    /// the secondary button.
    pub fn with_handles(picks: SharedPickTable, phases: SharedPhaseGroup) -> Self {
        let selection = BoxSelection::new().into_shared();
        let changes = picks.borrow_mut().subscribe();

        let mut dispatcher = GestureDispatcher::new();
        dispatcher.register(
            DragButton::Primary,
            Box::new(PickerTool::new(picks.clone(), phases.clone())),
        );
        dispatcher.register(
            DragButton::Secondary,
            Box::new(SelectTool::new(picks.clone(), selection.clone())),
        );

        let mut plot = PlotPanel::default();
        plot.refresh(&picks.borrow(), &phases.borrow());

        Self {
            picks,
            phases,
            selection,
            dispatcher,
            changes,
            plot,
            controls: PicksPanel::default(),
            record_controls: RecordPanel::default(),
            source: None,
            record: None,
            colormap: ColormapSettings::default(),
        }
    }

    /// Build the app from configuration, preloading `picks_path` if it exists
    /// and showing the configured window of `record_path`.
    pub fn from_config(cfg: &PickerConfig) -> Result<Self> {
        let phases = cfg.phase_group()?.into_shared();
        let picks = PickTable::new().into_shared();
        let mut app = Self::with_handles(picks, phases);
        app.controls = PicksPanel::new(cfg.marker_size, cfg.picks_path.clone());
        app.record_controls = RecordPanel::new(&cfg.window, &cfg.colormap);
        app.colormap = cfg.colormap;

        if let Some(path) = &cfg.record_path {
            let shown = open_record_source(path, &cfg.variable).and_then(|source| {
                app.set_source(source);
                app.apply_selection()
            });
            if let Err(e) = shown {
                log::warn!("Could not show record {}: {e}", path.display());
                app.controls.set_status(e.to_string(), true);
            }
        }

        if let Some(path) = cfg.picks_path.as_ref().filter(|p| p.exists()) {
            match load_picks_into(path, &mut app.picks.borrow_mut()) {
                Ok(n) => app.controls.set_status(format!("Loaded {n} picks"), false),
                Err(e) => {
                    log::warn!("Could not preload picks: {e}");
                    app.controls.set_status(e.to_string(), true);
                }
            }
        }
        Ok(app)
    }

    pub fn picks(&self) -> SharedPickTable {
        self.picks.clone()
    }

    pub fn phases(&self) -> SharedPhaseGroup {
        self.phases.clone()
    }

    /// The currently shown record window, if any.
    pub fn record(&self) -> Option<&Record> {
        self.record.as_ref()
    }

    /// Attach the record to pick on. Nothing is loaded until
    /// [`apply_selection`](Self::apply_selection).
    pub fn set_source(&mut self, source: Box<dyn RecordSource>) {
        self.source = Some(source);
        self.record = None;
        self.plot.set_image(None);
    }

    /// Edit the Selection and Colormap fields from code.
    pub fn record_controls_mut(&mut self) -> &mut RecordPanel {
        &mut self.record_controls
    }

    /// Load the window in the Selection fields, colour it and reset the view
    /// to it. On error the previous image stays.
    pub fn apply_selection(&mut self) -> Result<()> {
        let source = self.source.as_ref().ok_or(PickError::NoRecord)?;
        let window = self.record_controls.window()?;
        let colormap = self.record_controls.colormap(self.colormap.gain)?;
        let record = source.load(&window)?;
        let image = render_record(&record, &colormap)?;
        let (nt, nd) = record.dim();
        log::info!("Showing {nt}x{nd} samples of {}", source.describe());

        self.colormap = colormap;
        self.record = Some(record);
        self.plot.set_image(Some(image));
        self.plot.request_fit();
        Ok(())
    }

    /// Recolour the loaded window with the colormap fields, keeping the view.
    pub fn recolor(&mut self) -> Result<()> {
        let record = self.record.as_ref().ok_or(PickError::NoRecord)?;
        let colormap = self.record_controls.colormap(self.colormap.gain)?;
        let image = render_record(record, &colormap)?;
        self.colormap = colormap;
        self.plot.set_image(Some(image));
        Ok(())
    }

    fn handle_record_action(&mut self, action: RecordAction) {
        let res = match action {
            RecordAction::Apply => self.apply_selection(),
            // palette picked before any record: used on the first apply
            RecordAction::Recolor if self.record.is_none() => Ok(()),
            RecordAction::Recolor => self.recolor(),
            RecordAction::Home => {
                self.plot.request_fit();
                Ok(())
            }
        };
        if let Err(e) = res {
            log::error!("{e}");
            self.controls.set_status(e.to_string(), true);
        }
    }

    /// Render the controls (right side panel) and the plot (central panel).
    ///
    /// Embedding apps add their own top/bottom panels before calling this.
    pub fn show(&mut self, ctx: &egui::Context) {
        self.drain_changes(ctx);

        let source = self.source.as_ref().map(|s| s.describe());
        let mut action = None;
        egui::SidePanel::right("xpick_controls")
            .resizable(false)
            .min_width(330.0)
            .show(ctx, |ui| {
                action = self.record_controls.render(ui, source.as_deref());
                ui.separator();
                self.controls
                    .render(ui, &self.picks, &self.phases, &self.selection);
            });
        if let Some(action) = action {
            self.handle_record_action(action);
        }
        self.drain_changes(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            self.plot.render(
                ui,
                &mut self.dispatcher,
                &self.picks,
                &self.selection,
                self.controls.marker_size,
            );
        });
        self.drain_changes(ctx);
    }

    /// Apply pending change notifications: rebuild the plot cache, drop a
    /// stale selection and schedule a repaint.
    fn drain_changes(&mut self, ctx: &egui::Context) {
        let Some(latest) = self.changes.try_iter().last() else {
            return;
        };
        self.plot
            .refresh(&self.picks.borrow(), &self.phases.borrow());
        self.selection
            .borrow_mut()
            .invalidate_if_stale(latest.revision);
        ctx.request_repaint();
    }
}

impl eframe::App for PickerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show(ctx);
    }
}
