//! The picker: a drag gesture that records `(distance, time)` picks for the
//! selected phase.
//!
//! While the button is held, every pointer move inside the plot appends one
//! active pick. On release the drag's distance span erases earlier settled
//! picks of the same phase, and every remaining pick is settled.

use crate::data::phase::SharedPhaseGroup;
use crate::data::picks::{PickRow, SharedPickTable, Status};
use crate::gesture::{DragEvent, GestureTool, PlotFrame};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
}

/// Drag-to-pick gesture handler.
///
/// The table and phase group are live handles owned by the host; the tool
/// borrows them only for the duration of a callback.
pub struct PickerTool {
    source: SharedPickTable,
    phase: SharedPhaseGroup,
    state: DragState,
}

impl PickerTool {
    pub fn new(source: SharedPickTable, phase: SharedPhaseGroup) -> Self {
        Self {
            source,
            phase,
            state: DragState::Idle,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    fn active_label(&self) -> String {
        self.phase.borrow().active_label().to_owned()
    }
}

impl GestureTool for PickerTool {
    fn name(&self) -> &'static str {
        "Picker Tool"
    }

    fn on_drag_start(&mut self, _frame: &dyn PlotFrame, event: &DragEvent) {
        log::debug!(
            "picker: drag start at ({}, {}) with {} picks",
            event.sx,
            event.sy,
            self.source.borrow().len()
        );
        self.state = DragState::Dragging;
    }

    fn on_drag_move(&mut self, frame: &dyn PlotFrame, event: &DragEvent) {
        if self.state != DragState::Dragging {
            return;
        }
        if !frame.contains(event.sx, event.sy) {
            return;
        }
        let x = frame.invert_x(event.sx);
        let y = frame.invert_y(event.sy);
        let phase = self.active_label();

        let mut source = self.source.borrow_mut();
        source.append(PickRow::new(x, y, phase, Status::Active));
        source.emit_change();
    }

    fn on_drag_end(&mut self, _frame: &dyn PlotFrame, _event: &DragEvent) {
        self.state = DragState::Idle;
        let phase = self.active_label();

        let mut source = self.source.borrow_mut();
        let before = source.len();
        let settled = source.settled_after_drag(&phase);
        let after = settled.len();
        if let Err(e) = source.replace(settled) {
            // settled_after_drag always yields equal columns
            log::error!("picker: rebuilt table rejected: {e}");
            return;
        }
        source.emit_change();
        log::debug!("picker: drag end, {before} -> {after} picks for phase {phase}");
    }
}
