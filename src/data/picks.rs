//! The shared pick table: four parallel columns (`distance`, `time`, `phase`,
//! `status`) and a change signal observers subscribe to.
//!
//! The columns are private so every mutation keeps them the same length.
//! Mutations do not notify on their own: a writer finishes its edit and then
//! calls [`PickTable::emit_change`], so observers only ever see a consistent
//! table.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use std::sync::mpsc::{Receiver, Sender};

use crate::error::{PickError, Result};

/// Shared, single-threaded handle to a [`PickTable`].
pub type SharedPickTable = Rc<RefCell<PickTable>>;

// ─────────────────────────────────────────────────────────────────────────────
// Status
// ─────────────────────────────────────────────────────────────────────────────

/// Whether a pick belongs to the drag in progress or is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Provisional: recorded by the drag currently in progress.
    Active,
    /// Settled: kept from an earlier drag or loaded from a file.
    Inactive,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Inactive => "inactive",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "active" => Ok(Status::Active),
            "inactive" => Ok(Status::Inactive),
            other => Err(format!("unknown pick status: {other}")),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rows and columns
// ─────────────────────────────────────────────────────────────────────────────

/// One owned pick.
#[derive(Debug, Clone, PartialEq)]
pub struct PickRow {
    pub distance: f64,
    pub time: f64,
    pub phase: String,
    pub status: Status,
}

impl PickRow {
    pub fn new(distance: f64, time: f64, phase: impl Into<String>, status: Status) -> Self {
        Self {
            distance,
            time,
            phase: phase.into(),
            status,
        }
    }
}

/// Borrowed view of the row at one index of a [`PickTable`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickRowRef<'a> {
    pub index: usize,
    pub distance: f64,
    pub time: f64,
    pub phase: &'a str,
    pub status: Status,
}

impl PickRowRef<'_> {
    pub fn to_owned_row(&self) -> PickRow {
        PickRow::new(self.distance, self.time, self.phase, self.status)
    }
}

/// A full set of parallel columns, used to rebuild a table in one assignment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PickColumns {
    pub distance: Vec<f64>,
    pub time: Vec<f64>,
    pub phase: Vec<String>,
    pub status: Vec<Status>,
}

impl PickColumns {
    pub fn push(&mut self, row: PickRow) {
        self.distance.push(row.distance);
        self.time.push(row.time);
        self.phase.push(row.phase);
        self.status.push(row.status);
    }

    /// Number of rows; only meaningful when [`check`](Self::check) passes.
    pub fn len(&self) -> usize {
        self.status.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ensure all four columns have the same length.
    pub fn check(&self) -> Result<()> {
        let n = self.distance.len();
        if self.time.len() == n && self.phase.len() == n && self.status.len() == n {
            Ok(())
        } else {
            Err(PickError::ColumnMismatch {
                distance: self.distance.len(),
                time: self.time.len(),
                phase: self.phase.len(),
                status: self.status.len(),
            })
        }
    }
}

impl FromIterator<PickRow> for PickColumns {
    fn from_iter<I: IntoIterator<Item = PickRow>>(iter: I) -> Self {
        let mut cols = PickColumns::default();
        for row in iter {
            cols.push(row);
        }
        cols
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Change signal
// ─────────────────────────────────────────────────────────────────────────────

/// Notification sent to subscribers after every completed edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PicksChanged {
    /// Monotonic revision of the table after the edit.
    pub revision: u64,
    /// Row count after the edit.
    pub rows: usize,
}

// ─────────────────────────────────────────────────────────────────────────────
// PickTable
// ─────────────────────────────────────────────────────────────────────────────

/// Reactive table of picks.
#[derive(Debug, Default)]
pub struct PickTable {
    columns: PickColumns,
    revision: u64,
    subscribers: Vec<Sender<PicksChanged>>,
}

impl PickTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from existing columns, rejecting unequal lengths.
    pub fn from_columns(columns: PickColumns) -> Result<Self> {
        columns.check()?;
        Ok(Self {
            columns,
            ..Self::default()
        })
    }

    /// Wrap the table in a shared handle for tools and views.
    pub fn into_shared(self) -> SharedPickTable {
        Rc::new(RefCell::new(self))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &PickColumns {
        &self.columns
    }

    pub fn distance(&self) -> &[f64] {
        &self.columns.distance
    }

    pub fn time(&self) -> &[f64] {
        &self.columns.time
    }

    pub fn phase(&self) -> &[String] {
        &self.columns.phase
    }

    pub fn status(&self) -> &[Status] {
        &self.columns.status
    }

    pub fn row(&self, index: usize) -> Option<PickRowRef<'_>> {
        if index >= self.len() {
            return None;
        }
        Some(PickRowRef {
            index,
            distance: self.columns.distance[index],
            time: self.columns.time[index],
            phase: &self.columns.phase[index],
            status: self.columns.status[index],
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = PickRowRef<'_>> + '_ {
        (0..self.len()).filter_map(move |i| self.row(i))
    }

    /// Append one row to all four columns. Does not notify.
    pub fn append(&mut self, row: PickRow) {
        self.columns.push(row);
    }

    /// Swap in a complete new set of columns. Does not notify.
    pub fn replace(&mut self, columns: PickColumns) -> Result<()> {
        columns.check()?;
        self.columns = columns;
        Ok(())
    }

    /// Drop every row whose index is listed. Returns the number removed.
    pub fn remove_indices(&mut self, indices: &[usize]) -> usize {
        if indices.is_empty() {
            return 0;
        }
        let mut doomed = vec![false; self.len()];
        for &i in indices {
            if let Some(flag) = doomed.get_mut(i) {
                *flag = true;
            }
        }
        let kept: PickColumns = self
            .rows()
            .filter(|r| !doomed[r.index])
            .map(|r| r.to_owned_row())
            .collect();
        let removed = self.len() - kept.len();
        self.columns = kept;
        removed
    }

    /// Remove all rows. Does not notify.
    pub fn clear(&mut self) {
        self.columns = PickColumns::default();
    }

    /// Minimum and maximum `distance` over the active rows.
    ///
    /// With no active rows this is `(+inf, -inf)`, a range that admits nothing.
    pub fn active_range(&self) -> (f64, f64) {
        self.rows()
            .filter(|r| r.status == Status::Active)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
                (lo.min(r.distance), hi.max(r.distance))
            })
    }

    /// Columns as they should look once the current drag is released.
    ///
    /// Settled rows of `phase` inside [`active_range`](Self::active_range) are
    /// dropped; every other row is kept in order and marked inactive.
    pub fn settled_after_drag(&self, phase: &str) -> PickColumns {
        let (xmin, xmax) = self.active_range();
        self.rows()
            .filter(|r| {
                !(xmin <= r.distance
                    && r.distance <= xmax
                    && r.phase == phase
                    && r.status == Status::Inactive)
            })
            .map(|r| PickRow::new(r.distance, r.time, r.phase, Status::Inactive))
            .collect()
    }

    /// Data-space bounds `([xmin, ymin], [xmax, ymax])` of all rows.
    pub fn bounds(&self) -> Option<([f64; 2], [f64; 2])> {
        if self.is_empty() {
            return None;
        }
        let mut min = [f64::INFINITY; 2];
        let mut max = [f64::NEG_INFINITY; 2];
        for r in self.rows() {
            min[0] = min[0].min(r.distance);
            min[1] = min[1].min(r.time);
            max[0] = max[0].max(r.distance);
            max[1] = max[1].max(r.time);
        }
        Some((min, max))
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&mut self) -> Receiver<PicksChanged> {
        let (tx, rx) = std::sync::mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Current revision; bumped by every [`emit_change`](Self::emit_change).
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Notify subscribers that an edit is complete.
    pub fn emit_change(&mut self) {
        self.revision += 1;
        let msg = PicksChanged {
            revision: self.revision,
            rows: self.len(),
        };
        // Dropped receivers are pruned.
        self.subscribers.retain(|tx| tx.send(msg).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[(f64, f64, &str, Status)]) -> PickTable {
        let cols = rows
            .iter()
            .map(|&(d, t, p, s)| PickRow::new(d, t, p, s))
            .collect();
        PickTable::from_columns(cols).unwrap()
    }

    #[test]
    fn status_string_forms() {
        assert_eq!(Status::Active.to_string(), "active");
        assert_eq!("inactive".parse::<Status>(), Ok(Status::Inactive));
        assert!("busy".parse::<Status>().is_err());
    }

    #[test]
    fn active_range_is_vacuous_without_active_rows() {
        let t = table(&[(1.0, 0.0, "P", Status::Inactive)]);
        let (lo, hi) = t.active_range();
        assert_eq!(lo, f64::INFINITY);
        assert_eq!(hi, f64::NEG_INFINITY);
    }

    #[test]
    fn active_range_spans_active_rows_only() {
        let t = table(&[
            (10.0, 0.0, "P", Status::Inactive),
            (2.0, 0.0, "P", Status::Active),
            (-1.0, 0.0, "S", Status::Active),
        ]);
        assert_eq!(t.active_range(), (-1.0, 2.0));
    }

    #[test]
    fn settled_keeps_range_bounds_inclusive() {
        let t = table(&[
            (1.0, 0.0, "P", Status::Inactive),
            (3.0, 0.0, "P", Status::Inactive),
            (1.0, 5.0, "P", Status::Active),
            (3.0, 6.0, "P", Status::Active),
        ]);
        let out = t.settled_after_drag("P");
        assert_eq!(out.distance, vec![1.0, 3.0]);
        assert_eq!(out.time, vec![5.0, 6.0]);
        assert!(out.status.iter().all(|s| *s == Status::Inactive));
    }

    #[test]
    fn replace_rejects_unequal_columns() {
        let mut t = PickTable::new();
        let cols = PickColumns {
            distance: vec![1.0],
            time: vec![],
            phase: vec!["P".into()],
            status: vec![Status::Inactive],
        };
        assert!(matches!(
            t.replace(cols),
            Err(PickError::ColumnMismatch { time: 0, .. })
        ));
        assert!(t.is_empty());
    }

    #[test]
    fn remove_indices_ignores_out_of_range() {
        let mut t = table(&[
            (1.0, 0.0, "P", Status::Inactive),
            (2.0, 0.0, "P", Status::Inactive),
            (3.0, 0.0, "P", Status::Inactive),
        ]);
        assert_eq!(t.remove_indices(&[0, 2, 7]), 2);
        assert_eq!(t.distance(), &[2.0]);
        assert!(t.columns().check().is_ok());
    }

    #[test]
    fn emit_change_bumps_revision_and_prunes_dropped_receivers() {
        let mut t = PickTable::new();
        let rx1 = t.subscribe();
        let rx2 = t.subscribe();
        drop(rx1);
        t.append(PickRow::new(1.0, 2.0, "P", Status::Active));
        t.emit_change();
        assert_eq!(rx2.try_recv().unwrap(), PicksChanged { revision: 1, rows: 1 });
        assert_eq!(t.subscribers.len(), 1);
    }

    #[test]
    fn bounds_cover_all_rows() {
        let t = table(&[
            (1.0, 40.0, "P", Status::Inactive),
            (-2.0, 10.0, "S", Status::Inactive),
        ]);
        assert_eq!(t.bounds(), Some(([-2.0, 10.0], [1.0, 40.0])));
        assert_eq!(PickTable::new().bounds(), None);
    }
}
