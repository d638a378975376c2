//! Box selection of picks, used to delete picks in bulk.

use std::cell::RefCell;
use std::rc::Rc;

use crate::data::picks::{PickTable, SharedPickTable};
use crate::gesture::{DragEvent, GestureTool, PlotFrame};

pub type SharedSelection = Rc<RefCell<BoxSelection>>;

/// Rectangle being dragged (data space) and the indices it selected.
#[derive(Debug, Clone, Default)]
pub struct BoxSelection {
    anchor: Option<[f64; 2]>,
    corner: Option<[f64; 2]>,
    selected: Vec<usize>,
    /// Table revision the indices refer to.
    revision: u64,
}

impl BoxSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_shared(self) -> SharedSelection {
        Rc::new(RefCell::new(self))
    }

    /// `(min, max)` corners of the rectangle while a drag is in progress.
    pub fn rect(&self) -> Option<([f64; 2], [f64; 2])> {
        let (a, c) = (self.anchor?, self.corner?);
        Some((
            [a[0].min(c[0]), a[1].min(c[1])],
            [a[0].max(c[0]), a[1].max(c[1])],
        ))
    }

    pub fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    pub fn begin(&mut self, point: [f64; 2]) {
        self.anchor = Some(point);
        self.corner = Some(point);
        self.selected.clear();
    }

    pub fn extend_to(&mut self, point: [f64; 2]) {
        if self.anchor.is_some() {
            self.corner = Some(point);
        }
    }

    /// Finish the drag: select every row inside the rectangle (bounds inclusive).
    pub fn finish(&mut self, table: &PickTable) {
        if let Some((min, max)) = self.rect() {
            self.selected = table
                .rows()
                .filter(|r| {
                    min[0] <= r.distance
                        && r.distance <= max[0]
                        && min[1] <= r.time
                        && r.time <= max[1]
                })
                .map(|r| r.index)
                .collect();
            self.revision = table.revision();
        }
        self.anchor = None;
        self.corner = None;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Drop the selection if the table changed after it was made. A
    /// notification at or before the selection's own revision keeps it.
    /// Returns `true` if it was dropped.
    pub fn invalidate_if_stale(&mut self, revision: u64) -> bool {
        if !self.selected.is_empty() && revision > self.revision {
            self.selected.clear();
            return true;
        }
        false
    }

    /// Remove the selected rows from `table`, notify, and clear the selection.
    pub fn delete_selected(&mut self, table: &mut PickTable) -> usize {
        if self.selected.is_empty() || table.revision() != self.revision {
            self.selected.clear();
            return 0;
        }
        let removed = table.remove_indices(&self.selected);
        table.emit_change();
        self.clear();
        removed
    }
}

/// Gesture tool that drives a [`BoxSelection`].
pub struct SelectTool {
    source: SharedPickTable,
    selection: SharedSelection,
}

impl SelectTool {
    pub fn new(source: SharedPickTable, selection: SharedSelection) -> Self {
        Self { source, selection }
    }
}

impl GestureTool for SelectTool {
    fn name(&self) -> &'static str {
        "Box Select"
    }

    fn on_drag_start(&mut self, frame: &dyn PlotFrame, event: &DragEvent) {
        if !frame.contains(event.sx, event.sy) {
            return;
        }
        let p = [frame.invert_x(event.sx), frame.invert_y(event.sy)];
        self.selection.borrow_mut().begin(p);
    }

    fn on_drag_move(&mut self, frame: &dyn PlotFrame, event: &DragEvent) {
        let p = [frame.invert_x(event.sx), frame.invert_y(event.sy)];
        self.selection.borrow_mut().extend_to(p);
    }

    fn on_drag_end(&mut self, _frame: &dyn PlotFrame, _event: &DragEvent) {
        let mut sel = self.selection.borrow_mut();
        sel.finish(&self.source.borrow());
        if !sel.selected().is_empty() {
            log::debug!("select: {} picks selected", sel.selected().len());
        }
    }
}
