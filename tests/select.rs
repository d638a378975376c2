use xpick::{
    BoxSelection, DragEvent, GestureTool, LinearFrame, PickRow, PickTable, SelectTool, Status,
};

fn table() -> PickTable {
    let mut t = PickTable::new();
    for (d, time) in [(1.0, 1.0), (2.0, 2.0), (3.0, 3.0), (8.0, 8.0)] {
        t.append(PickRow::new(d, time, "P", Status::Inactive));
    }
    t
}

#[test]
fn box_drag_selects_and_deletes() {
    let picks = table().into_shared();
    let selection = BoxSelection::new().into_shared();
    let mut tool = SelectTool::new(picks.clone(), selection.clone());
    let f = LinearFrame::new(0.0, 0.0, 128.0, 128.0, (0.0, 128.0), (0.0, 128.0));

    let (sx0, sy0) = f.project(1.5, 1.5);
    let (sx1, sy1) = f.project(3.0, 3.0);
    tool.on_drag_start(&f, &DragEvent::new(sx0, sy0));
    tool.on_drag_move(&f, &DragEvent::new(sx1, sy1));
    assert!(selection.borrow().is_dragging());
    tool.on_drag_end(&f, &DragEvent::new(sx1, sy1));

    assert!(!selection.borrow().is_dragging());
    assert_eq!(selection.borrow().selected(), &[1, 2]);

    let removed = selection
        .borrow_mut()
        .delete_selected(&mut picks.borrow_mut());
    assert_eq!(removed, 2);
    assert_eq!(picks.borrow().distance(), &[1.0, 8.0]);
    assert!(selection.borrow().selected().is_empty());
}

#[test]
fn stale_selection_is_invalidated() {
    let mut picks = table();
    let mut sel = BoxSelection::new();
    sel.begin([0.0, 0.0]);
    sel.extend_to([2.0, 2.0]);
    sel.finish(&picks);
    assert!(!sel.invalidate_if_stale(picks.revision()));

    picks.emit_change();
    assert!(sel.invalidate_if_stale(picks.revision()));
    assert!(sel.selected().is_empty());
}

#[test]
fn notification_drained_after_finish_keeps_selection() {
    let mut picks = table();
    let changes = picks.subscribe();
    picks.append(PickRow::new(2.5, 2.5, "P", Status::Inactive));
    picks.emit_change();

    // the box is finished before the host drains the append's notification
    let mut sel = BoxSelection::new();
    sel.begin([0.0, 0.0]);
    sel.extend_to([2.5, 2.5]);
    sel.finish(&picks);
    assert_eq!(sel.selected(), &[0, 1, 4]);

    let pending = changes.try_iter().last().map(|c| c.revision);
    assert_eq!(pending, Some(picks.revision()));
    assert!(!sel.invalidate_if_stale(picks.revision()));
    assert_eq!(sel.delete_selected(&mut picks), 3);
    assert_eq!(picks.distance(), &[3.0, 8.0]);
}
