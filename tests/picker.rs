use xpick::{
    DragEvent, DragState, GestureTool, LinearFrame, PhaseGroup, PickRow, PickTable, PickerTool,
    SharedPhaseGroup, SharedPickTable, Status,
};

// 1 px == 1 data unit; power-of-two extents keep the inversion exact.
fn frame() -> LinearFrame {
    LinearFrame::new(0.0, 0.0, 128.0, 128.0, (0.0, 128.0), (0.0, 128.0))
}

fn setup(rows: &[(f64, f64, &str, Status)]) -> (PickerTool, SharedPickTable, SharedPhaseGroup) {
    let mut table = PickTable::new();
    for &(d, t, p, s) in rows {
        table.append(PickRow::new(d, t, p, s));
    }
    let table = table.into_shared();
    let phases = PhaseGroup::new(vec!["P".into(), "S".into()], &[])
        .unwrap()
        .into_shared();
    let tool = PickerTool::new(table.clone(), phases.clone());
    (tool, table, phases)
}

fn at(frame: &LinearFrame, x: f64, y: f64) -> DragEvent {
    let (sx, sy) = frame.project(x, y);
    DragEvent::new(sx, sy)
}

fn drag(tool: &mut PickerTool, frame: &LinearFrame, points: &[(f64, f64)]) {
    let start = points.first().copied().unwrap_or((0.0, 0.0));
    tool.on_drag_start(frame, &at(frame, start.0, start.1));
    for &(x, y) in points {
        tool.on_drag_move(frame, &at(frame, x, y));
    }
    let end = points.last().copied().unwrap_or(start);
    tool.on_drag_end(frame, &at(frame, end.0, end.1));
}

fn rows(table: &SharedPickTable) -> Vec<(f64, f64, String, Status)> {
    table
        .borrow()
        .rows()
        .map(|r| (r.distance, r.time, r.phase.to_string(), r.status))
        .collect()
}

#[test]
fn moves_append_active_rows_in_order() {
    let (mut tool, table, _) = setup(&[]);
    let f = frame();
    tool.on_drag_start(&f, &at(&f, 1.0, 10.0));
    for (x, y) in [(1.0, 10.0), (2.0, 20.0), (3.0, 30.0)] {
        tool.on_drag_move(&f, &at(&f, x, y));
    }
    assert_eq!(tool.state(), DragState::Dragging);
    assert_eq!(
        rows(&table),
        vec![
            (1.0, 10.0, "P".to_string(), Status::Active),
            (2.0, 20.0, "P".to_string(), Status::Active),
            (3.0, 30.0, "P".to_string(), Status::Active),
        ]
    );

    tool.on_drag_end(&f, &at(&f, 3.0, 30.0));
    assert_eq!(tool.state(), DragState::Idle);
    assert!(table
        .borrow()
        .status()
        .iter()
        .all(|s| *s == Status::Inactive));
    assert_eq!(table.borrow().len(), 3);
}

#[test]
fn release_erases_overlapping_settled_picks() {
    let (mut tool, table, _) = setup(&[
        (0.5, 5.0, "P", Status::Inactive),
        (2.5, 5.0, "P", Status::Inactive),
        (5.0, 5.0, "P", Status::Inactive),
    ]);
    let f = frame();
    drag(&mut tool, &f, &[(1.0, 40.0), (3.0, 40.0)]);

    let got: Vec<f64> = rows(&table).iter().map(|r| r.0).collect();
    assert_eq!(got, vec![0.5, 5.0, 1.0, 3.0]);
}

#[test]
fn range_bounds_are_inclusive() {
    let (mut tool, table, _) = setup(&[
        (1.0, 5.0, "P", Status::Inactive),
        (3.0, 5.0, "P", Status::Inactive),
    ]);
    let f = frame();
    drag(&mut tool, &f, &[(1.0, 40.0), (3.0, 40.0)]);
    let got: Vec<(f64, f64)> = rows(&table).iter().map(|r| (r.0, r.1)).collect();
    assert_eq!(got, vec![(1.0, 40.0), (3.0, 40.0)]);
}

#[test]
fn other_phases_survive_a_drag() {
    let (mut tool, table, phases) = setup(&[
        (2.0, 5.0, "S", Status::Inactive),
        (2.0, 6.0, "P", Status::Inactive),
    ]);
    phases.borrow_mut().set_active(0);
    let f = frame();
    drag(&mut tool, &f, &[(1.0, 40.0), (3.0, 40.0)]);

    let got = rows(&table);
    assert_eq!(got.len(), 3);
    assert_eq!(got[0], (2.0, 5.0, "S".to_string(), Status::Inactive));
    assert!(got[1..].iter().all(|r| r.2 == "P" && r.1 == 40.0));
}

#[test]
fn drag_picks_up_the_selected_phase() {
    let (mut tool, table, phases) = setup(&[]);
    phases.borrow_mut().set_active(1);
    let f = frame();
    drag(&mut tool, &f, &[(4.0, 8.0)]);
    assert_eq!(rows(&table), vec![(4.0, 8.0, "S".into(), Status::Inactive)]);
}

#[test]
fn moves_outside_the_viewport_are_ignored() {
    let (mut tool, table, _) = setup(&[]);
    let changes = table.borrow_mut().subscribe();
    let f = frame();
    tool.on_drag_start(&f, &DragEvent::new(10.0, 10.0));
    tool.on_drag_move(&f, &DragEvent::new(-5.0, 10.0));
    tool.on_drag_move(&f, &DragEvent::new(10.0, 200.0));
    assert!(table.borrow().is_empty());
    assert!(changes.try_recv().is_err());
}

#[test]
fn moves_without_a_drag_are_ignored() {
    let (mut tool, table, _) = setup(&[]);
    let f = frame();
    tool.on_drag_move(&f, &at(&f, 1.0, 1.0));
    assert!(table.borrow().is_empty());
}

#[test]
fn second_release_is_idempotent() {
    let (mut tool, table, _) = setup(&[(2.0, 5.0, "P", Status::Inactive)]);
    let f = frame();
    drag(&mut tool, &f, &[(1.0, 40.0), (3.0, 40.0)]);
    let once = rows(&table);
    tool.on_drag_end(&f, &at(&f, 3.0, 40.0));
    assert_eq!(rows(&table), once);
}

#[test]
fn release_without_moves_keeps_settled_rows() {
    let (mut tool, table, _) = setup(&[
        (1.0, 5.0, "P", Status::Inactive),
        (2.0, 5.0, "P", Status::Inactive),
    ]);
    let f = frame();
    tool.on_drag_start(&f, &at(&f, 1.5, 5.0));
    tool.on_drag_end(&f, &at(&f, 1.5, 5.0));
    assert_eq!(table.borrow().len(), 2);
}

#[test]
fn every_edit_notifies_observers() {
    let (mut tool, table, _) = setup(&[]);
    let changes = table.borrow_mut().subscribe();
    let f = frame();
    drag(&mut tool, &f, &[(1.0, 1.0), (2.0, 2.0)]);
    let seen: Vec<_> = changes.try_iter().collect();
    // two appends and the release
    assert_eq!(seen.len(), 3);
    assert_eq!(seen.last().map(|c| c.rows), Some(2));
    assert!(seen.windows(2).all(|w| w[0].revision < w[1].revision));
}

#[test]
fn columns_stay_equal_length() {
    let (mut tool, table, _) = setup(&[(9.0, 1.0, "S", Status::Inactive)]);
    let f = frame();
    drag(&mut tool, &f, &[(1.0, 1.0), (2.0, 2.0), (9.0, 3.0)]);
    drag(&mut tool, &f, &[(0.0, 4.0), (10.0, 4.0)]);
    let t = table.borrow();
    let n = t.len();
    assert_eq!(t.distance().len(), n);
    assert_eq!(t.time().len(), n);
    assert_eq!(t.phase().len(), n);
    assert_eq!(t.status().len(), n);
    assert!(t.columns().check().is_ok());
}
