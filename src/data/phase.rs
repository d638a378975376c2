//! Phase toggle group: the ordered phase labels, which one is active, and
//! the colour each phase is drawn with.

use std::cell::RefCell;
use std::rc::Rc;

use egui::Color32;

use crate::error::{PickError, Result};

/// Shared, single-threaded handle to a [`PhaseGroup`].
pub type SharedPhaseGroup = Rc<RefCell<PhaseGroup>>;

/// Colours cycled over the phase labels when none are configured.
pub const DEFAULT_PHASE_COLORS: [Color32; 3] = [
    Color32::from_rgb(0x7F, 0x0D, 0xFF),
    Color32::from_rgb(0xBF, 0x0D, 0xFF),
    Color32::from_rgb(0xFF, 0x00, 0xFF),
];

#[derive(Debug, Clone, PartialEq)]
pub struct PhaseGroup {
    labels: Vec<String>,
    colors: Vec<Color32>,
    active: usize,
}

impl PhaseGroup {
    /// Build a group with the first label active.
    ///
    /// `colors` is cycled over the labels; an empty list falls back to
    /// [`DEFAULT_PHASE_COLORS`].
    pub fn new(labels: Vec<String>, colors: &[Color32]) -> Result<Self> {
        if labels.is_empty() {
            return Err(PickError::NoPhases);
        }
        let palette: &[Color32] = if colors.is_empty() {
            &DEFAULT_PHASE_COLORS
        } else {
            colors
        };
        let colors = (0..labels.len())
            .map(|i| palette[i % palette.len()])
            .collect();
        Ok(Self {
            labels,
            colors,
            active: 0,
        })
    }

    pub fn into_shared(self) -> SharedPhaseGroup {
        Rc::new(RefCell::new(self))
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn active(&self) -> usize {
        self.active
    }

    /// Select the label at `index`; out-of-range indices are clamped.
    pub fn set_active(&mut self, index: usize) {
        self.active = index.min(self.labels.len() - 1);
    }

    /// Label of the selected phase.
    pub fn active_label(&self) -> &str {
        &self.labels[self.active]
    }

    /// Colour for `label`, or grey for labels outside the group (e.g. loaded
    /// from a file written with different phases).
    pub fn color_for(&self, label: &str) -> Color32 {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|i| self.colors[i])
            .unwrap_or(Color32::GRAY)
    }

    pub fn color_at(&self, index: usize) -> Color32 {
        self.colors[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(ls: &[&str]) -> Vec<String> {
        ls.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_labels_are_rejected() {
        assert!(matches!(
            PhaseGroup::new(Vec::new(), &[]),
            Err(PickError::NoPhases)
        ));
    }

    #[test]
    fn default_palette_cycles() {
        let g = PhaseGroup::new(labels(&["Pp", "Ps", "Ss", "X"]), &[]).unwrap();
        assert_eq!(g.color_at(0), DEFAULT_PHASE_COLORS[0]);
        assert_eq!(g.color_at(2), DEFAULT_PHASE_COLORS[2]);
        assert_eq!(g.color_at(3), DEFAULT_PHASE_COLORS[0]);
    }

    #[test]
    fn active_label_follows_index() {
        let mut g = PhaseGroup::new(labels(&["P", "S"]), &[Color32::RED]).unwrap();
        assert_eq!(g.active_label(), "P");
        g.set_active(1);
        assert_eq!(g.active_label(), "S");
        g.set_active(9);
        assert_eq!(g.active(), 1);
        assert_eq!(g.color_for("S"), Color32::RED);
        assert_eq!(g.color_for("unknown"), Color32::GRAY);
    }
}
