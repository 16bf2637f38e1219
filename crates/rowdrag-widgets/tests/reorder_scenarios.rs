//! End-to-end reorder sessions against the in-memory table.

use std::cell::RefCell;
use std::rc::Rc;

use rowdrag_core::display_link::FrameClock;
use rowdrag_core::geometry::{Point, Size};
use rowdrag_core::gesture::{LongPressEvent, PointerEvent};
use rowdrag_widgets::reorder::{
    GestureOutcome, RejectReason, ReorderConfig, ReorderController, ReorderSource, ReorderState,
    RowAnimation, RowIndex, RowSource, TableHost, VecSource,
};
use rowdrag_widgets::table::{TableUpdate, TableView};
use web_time::{Duration, Instant};

const ROW_H: f32 = 44.0;

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Stage(RowIndex),
    Move(RowIndex, RowIndex),
    Finalize(String, RowIndex),
}

/// Multi-section source that records every contract call.
#[derive(Debug, Default)]
struct RecordingSource {
    sections: Vec<Vec<Option<String>>>,
    pinned: Vec<RowIndex>,
    calls: Vec<Call>,
}

impl RecordingSource {
    fn new(sections: &[&[&str]]) -> Self {
        Self {
            sections: sections
                .iter()
                .map(|rows| rows.iter().map(|s| Some((*s).to_owned())).collect())
                .collect(),
            ..Self::default()
        }
    }

    fn pin(mut self, index: RowIndex) -> Self {
        self.pinned.push(index);
        self
    }

    fn section(&self, section: usize) -> Vec<&str> {
        self.sections[section]
            .iter()
            .map(|slot| slot.as_deref().unwrap_or("_"))
            .collect()
    }

    fn blanks(&self) -> Vec<RowIndex> {
        let mut out = Vec::new();
        for (s, rows) in self.sections.iter().enumerate() {
            for (r, slot) in rows.iter().enumerate() {
                if slot.is_none() {
                    out.push(RowIndex::new(s, r));
                }
            }
        }
        out
    }
}

impl RowSource for RecordingSource {
    fn section_count(&self) -> usize {
        self.sections.len()
    }

    fn row_count(&self, section: usize) -> usize {
        self.sections.get(section).map_or(0, Vec::len)
    }

    fn is_movable(&self, index: RowIndex) -> bool {
        !self.pinned.contains(&index)
    }
}

impl ReorderSource for RecordingSource {
    type Payload = String;

    fn stage_and_blank(&mut self, index: RowIndex) -> String {
        self.calls.push(Call::Stage(index));
        self.sections[index.section][index.row]
            .take()
            .expect("staged row is populated")
    }

    fn move_row(&mut self, from: RowIndex, to: RowIndex) {
        self.calls.push(Call::Move(from, to));
        let slot = self.sections[from.section].remove(from.row);
        self.sections[to.section].insert(to.row, slot);
    }

    fn finalize(&mut self, payload: String, index: RowIndex) {
        self.calls.push(Call::Finalize(payload.clone(), index));
        self.sections[index.section][index.row] = Some(payload);
    }
}

fn table(rows: usize) -> TableView {
    TableView::new(Size::new(320.0, 600.0)).with_section(rows, ROW_H)
}

fn at_row(row: usize) -> Point {
    Point::new(100.0, row as f32 * ROW_H + ROW_H / 2.0)
}

fn instant_drop() -> ReorderConfig {
    ReorderConfig {
        drop_duration_ms: 0,
        ..ReorderConfig::default()
    }
}

fn recording(items: &[&str]) -> ReorderController<TableView, RecordingSource> {
    ReorderController::with_config(
        table(items.len()),
        RecordingSource::new(&[items]),
        instant_drop(),
    )
}

// ── Basic sessions ──────────────────────────────────────────────────────

#[test]
fn drop_in_place_is_stage_then_finalize() {
    let mut c = recording(&["A", "B", "C", "D"]);
    c.handle_gesture(LongPressEvent::began(at_row(1)));
    // Jitter inside the origin row never moves the blank.
    let out = c.handle_gesture(LongPressEvent::changed(Point::new(100.0, 60.0)));
    assert!(matches!(out, GestureOutcome::Updated { moved: None, .. }));
    let out = c.handle_gesture(LongPressEvent::ended(Point::new(100.0, 60.0)));
    assert_eq!(out, GestureOutcome::Dropped { index: RowIndex::row(1) });

    let (_, source) = c.into_parts();
    assert_eq!(
        source.calls,
        vec![
            Call::Stage(RowIndex::row(1)),
            Call::Finalize("B".into(), RowIndex::row(1)),
        ]
    );
    assert_eq!(source.section(0), vec!["A", "B", "C", "D"]);
}

#[test]
fn drag_down_two_rows() {
    let mut c = recording(&["A", "B", "C", "D"]);
    c.handle_gesture(LongPressEvent::began(at_row(0)));
    c.handle_gesture(LongPressEvent::changed(at_row(1)));
    assert_eq!(c.source().section(0), vec!["B", "_", "C", "D"]);
    c.handle_gesture(LongPressEvent::changed(at_row(2)));
    let out = c.handle_gesture(LongPressEvent::ended(at_row(2)));
    assert_eq!(out, GestureOutcome::Dropped { index: RowIndex::row(2) });

    let (_, source) = c.into_parts();
    assert_eq!(
        source.calls,
        vec![
            Call::Stage(RowIndex::row(0)),
            Call::Move(RowIndex::row(0), RowIndex::row(1)),
            Call::Move(RowIndex::row(1), RowIndex::row(2)),
            Call::Finalize("A".into(), RowIndex::row(2)),
        ]
    );
    assert_eq!(source.section(0), vec!["B", "C", "A", "D"]);
}

#[test]
fn drag_up_skips_rows_in_one_step() {
    let mut c = recording(&["A", "B", "C", "D"]);
    c.handle_gesture(LongPressEvent::began(at_row(3)));
    let out = c.handle_gesture(LongPressEvent::changed(at_row(0)));
    assert!(matches!(
        out,
        GestureOutcome::Updated {
            moved: Some((from, to)),
            ..
        } if from == RowIndex::row(3) && to == RowIndex::row(0)
    ));
    c.handle_gesture(LongPressEvent::ended(at_row(0)));
    assert_eq!(c.source().section(0), vec!["D", "A", "B", "C"]);
}

#[test]
fn blank_tracks_hover_throughout() {
    let mut c = recording(&["A", "B", "C", "D", "E"]);
    c.handle_gesture(LongPressEvent::began(at_row(2)));
    for row in [3, 4, 1, 0, 2] {
        c.handle_gesture(LongPressEvent::changed(at_row(row)));
        assert_eq!(c.hover_index(), Some(RowIndex::row(row)));
        assert_eq!(c.source().blanks(), vec![RowIndex::row(row)]);
        assert_eq!(c.source().row_count(0), 5);
    }
}

// ── Gates ───────────────────────────────────────────────────────────────

#[test]
fn empty_list_rejects_without_contract_calls() {
    let no_rows: &[&str] = &[];
    let mut c = ReorderController::new(table(0), RecordingSource::new(&[no_rows]));
    let out = c.handle_gesture(LongPressEvent::began(at_row(0)));
    assert_eq!(out, GestureOutcome::Rejected(RejectReason::EmptyList));
    assert_eq!(c.recognizer().disable_count(), 1);
    assert!(c.recognizer().is_enabled());
    assert_eq!(c.state(), ReorderState::Idle);
    assert!(!c.is_scroll_tick_active());
    assert!(c.source().calls.is_empty());
    assert!(c.host().updates().is_empty());
}

#[test]
fn pinned_row_cannot_be_picked_up() {
    let source = RecordingSource::new(&[&["A", "B", "C"]]).pin(RowIndex::row(1));
    let mut c = ReorderController::new(table(3), source);
    let out = c.handle_gesture(LongPressEvent::began(at_row(1)));
    assert_eq!(out, GestureOutcome::Rejected(RejectReason::NotMovable));
    assert!(c.source().calls.is_empty());

    // Other rows still work, and the pinned row can be dragged past.
    assert_eq!(
        c.handle_gesture(LongPressEvent::began(at_row(0))),
        GestureOutcome::Began { origin: RowIndex::row(0) }
    );
    c.handle_gesture(LongPressEvent::changed(at_row(2)));
    assert_eq!(c.hover_index(), Some(RowIndex::row(2)));
}

#[test]
fn vec_source_predicate_gates_pickup() {
    let source = VecSource::new(["", "Paris"]).with_movable(|s: &&str| !s.is_empty());
    let mut c = ReorderController::new(table(2), source);
    let out = c.handle_gesture(LongPressEvent::began(at_row(0)));
    assert_eq!(out, GestureOutcome::Rejected(RejectReason::NotMovable));
    assert!(c.host().updates().is_empty(), "no snapshot taken");
}

#[test]
fn disabled_controller_ignores_raw_input() {
    let mut c = recording(&["A", "B"]);
    assert_eq!(c.set_can_reorder(false), None);
    let t = Instant::now();
    assert_eq!(c.handle_pointer(PointerEvent::Down(at_row(0)), t), None);
    let frame = c.on_frame(t + Duration::from_secs(1), Duration::from_millis(16));
    assert_eq!(frame.gesture, None);
    assert_eq!(c.state(), ReorderState::Idle);
}

#[test]
fn disabled_controller_refuses_external_gestures() {
    let mut c = recording(&["A", "B", "C"]);
    assert_eq!(c.set_can_reorder(false), None);

    let out = c.handle_gesture(LongPressEvent::began(at_row(0)));
    assert_eq!(out, GestureOutcome::Rejected(RejectReason::Disabled));
    let out = c.handle_gesture(LongPressEvent::changed(at_row(2)));
    assert_eq!(out, GestureOutcome::Ignored);
    let out = c.handle_gesture(LongPressEvent::ended(at_row(2)));
    assert_eq!(out, GestureOutcome::Ignored);

    assert_eq!(c.state(), ReorderState::Idle);
    assert!(!c.is_scroll_tick_active());
    assert!(c.source().calls.is_empty());
    assert_eq!(c.source().section(0), vec!["A", "B", "C"]);
    assert!(c.host().updates().is_empty());
    // Only the set_can_reorder(false) itself touched the recognizer.
    assert_eq!(c.recognizer().disable_count(), 1);
    assert!(!c.recognizer().is_enabled());
}

#[test]
fn busy_rejection_keeps_the_live_long_press() {
    let mut c = recording(&["A", "B", "C"]);
    let t = Instant::now();
    c.handle_pointer(PointerEvent::Down(at_row(0)), t);
    let t = t + Duration::from_millis(600);
    let frame = c.on_frame(t, Duration::from_millis(16));
    assert_eq!(
        frame.gesture,
        Some(GestureOutcome::Began { origin: RowIndex::row(0) })
    );

    // A second source of gestures reports a press on another row.
    let out = c.handle_gesture(LongPressEvent::began(at_row(1)));
    assert_eq!(out, GestureOutcome::Rejected(RejectReason::Busy));
    assert!(c.recognizer().is_recognized());
    assert!(c.is_scroll_tick_active());

    let out = c.handle_pointer(PointerEvent::Move(at_row(2)), t);
    assert!(matches!(
        out,
        Some(GestureOutcome::Updated { hover, .. }) if hover == RowIndex::row(2)
    ));
    let out = c.handle_pointer(PointerEvent::Up(at_row(2)), t);
    assert_eq!(out, Some(GestureOutcome::Dropped { index: RowIndex::row(2) }));

    assert_eq!(c.state(), ReorderState::Idle);
    assert!(!c.is_scroll_tick_active());
    assert!(c.source().blanks().is_empty());
    assert_eq!(c.source().section(0), vec!["B", "C", "A"]);
    assert_eq!(
        c.source().calls,
        vec![
            Call::Stage(RowIndex::row(0)),
            Call::Move(RowIndex::row(0), RowIndex::row(2)),
            Call::Finalize("A".to_owned(), RowIndex::row(2)),
        ]
    );
}

// ── Sections ────────────────────────────────────────────────────────────

#[test]
fn targets_stay_inside_origin_section() {
    let host = TableView::new(Size::new(320.0, 600.0))
        .with_section(2, ROW_H)
        .with_section(2, ROW_H);
    let source = RecordingSource::new(&[&["A", "B"], &["X", "Y"]]);
    let mut c = ReorderController::with_config(host, source, instant_drop());

    c.handle_gesture(LongPressEvent::began(at_row(0)));
    let out = c.handle_gesture(LongPressEvent::changed(at_row(2)));
    assert!(matches!(out, GestureOutcome::Updated { moved: None, .. }));
    c.handle_gesture(LongPressEvent::changed(at_row(1)));
    c.handle_gesture(LongPressEvent::changed(at_row(3)));
    c.handle_gesture(LongPressEvent::ended(at_row(3)));

    let (_, source) = c.into_parts();
    assert!(source.calls.iter().all(|call| match call {
        Call::Stage(i) | Call::Finalize(_, i) => i.section == 0,
        Call::Move(a, b) => a.section == 0 && b.section == 0,
    }));
    assert_eq!(source.section(1), vec!["X", "Y"]);
    assert_eq!(source.row_count(0), 2);
}

// ── Variable heights ────────────────────────────────────────────────────

#[test]
fn tall_target_needs_deeper_touch() {
    let host = TableView::new(Size::new(320.0, 600.0)).with_row_heights([44.0, 88.0, 44.0]);
    let source = RecordingSource::new(&[&["short", "tall", "short2"]]);
    let mut c = ReorderController::new(host, source);

    c.handle_gesture(LongPressEvent::began(Point::new(100.0, 22.0)));
    // 6pt into an 88pt row while holding a 44pt row: below the 44pt threshold.
    let out = c.handle_gesture(LongPressEvent::changed(Point::new(100.0, 50.0)));
    assert!(matches!(out, GestureOutcome::Updated { moved: None, .. }));
    assert_eq!(c.hover_index(), Some(RowIndex::row(0)));

    let out = c.handle_gesture(LongPressEvent::changed(Point::new(100.0, 100.0)));
    assert!(matches!(out, GestureOutcome::Updated { moved: Some(_), .. }));
    assert_eq!(c.hover_index(), Some(RowIndex::row(1)));
    // The blank keeps the dragged row's height.
    assert_eq!(c.host().row_height(RowIndex::row(0)), Some(88.0));
    assert_eq!(c.host().row_height(RowIndex::row(1)), Some(44.0));
}

#[test]
fn threshold_does_not_oscillate() {
    let host = TableView::new(Size::new(320.0, 600.0)).with_row_heights([44.0, 88.0]);
    let source = RecordingSource::new(&[&["short", "tall"]]);
    let mut c = ReorderController::new(host, source);
    c.handle_gesture(LongPressEvent::began(Point::new(100.0, 22.0)));
    for y in [46.0, 60.0, 80.0, 88.0, 70.0, 50.0] {
        c.handle_gesture(LongPressEvent::changed(Point::new(100.0, y)));
    }
    let moves = c
        .source()
        .calls
        .iter()
        .filter(|call| matches!(call, Call::Move(..)))
        .count();
    assert_eq!(moves, 0);
}

// ── Auto-scroll ─────────────────────────────────────────────────────────

fn long_list(n: usize) -> VecSource<String> {
    VecSource::new((0..n).map(|i| format!("row {i}")))
}

#[test]
fn bottom_edge_scrolls_and_retargets() {
    let mut c = ReorderController::new(table(30), long_list(30));
    let mut clock = FrameClock::new(Instant::now(), 60);

    c.handle_gesture(LongPressEvent::began(at_row(10)));
    let out = c.handle_gesture(LongPressEvent::changed(Point::new(100.0, 590.0)));
    let GestureOutcome::Updated {
        hover, scroll_rate, ..
    } = out
    else {
        panic!("expected update, got {out:?}");
    };
    assert_eq!(hover, RowIndex::row(13));
    assert!((scroll_rate - 0.9).abs() < 1e-4);

    let mut moved = None;
    for _ in 0..10 {
        let (now, dt) = clock.advance();
        let frame = c.on_frame(now, dt);
        assert!(frame.scrolled_to.is_some());
        if frame.moved.is_some() {
            moved = frame.moved;
            break;
        }
    }
    assert_eq!(moved, Some((RowIndex::row(13), RowIndex::row(14))));
    assert!(c.host().content_offset().y > 20.0);
    assert_eq!(c.source().blank_row(), Some(14));
}

#[test]
fn scrolling_stops_at_content_end() {
    let mut c = ReorderController::new(table(15), long_list(15));
    let mut clock = FrameClock::new(Instant::now(), 60);
    c.handle_gesture(LongPressEvent::began(at_row(5)));
    c.handle_gesture(LongPressEvent::changed(Point::new(100.0, 599.0)));
    for _ in 0..200 {
        let (now, dt) = clock.advance();
        c.on_frame(now, dt);
    }
    // 15 * 44 = 660 content, 600 viewport.
    assert_eq!(c.host().content_offset().y, 60.0);
    assert_eq!(c.hover_index(), Some(RowIndex::row(14)));
}

#[test]
fn pinned_to_top_never_sets_offset() {
    let mut c = ReorderController::new(table(30), long_list(30));
    let mut clock = FrameClock::new(Instant::now(), 60);
    c.handle_gesture(LongPressEvent::began(at_row(1)));
    c.handle_gesture(LongPressEvent::changed(Point::new(100.0, 10.0)));
    assert!(c.scroll_rate() < 0.0);
    for _ in 0..20 {
        let (now, dt) = clock.advance();
        assert_eq!(c.on_frame(now, dt).scrolled_to, None);
    }
    assert!(
        !c.host()
            .updates()
            .iter()
            .any(|u| matches!(u, TableUpdate::Offset { .. }))
    );
}

#[test]
fn drop_stops_the_scroll_tick() {
    let mut c = ReorderController::new(table(30), long_list(30));
    let mut clock = FrameClock::new(Instant::now(), 60);
    c.handle_gesture(LongPressEvent::began(at_row(10)));
    c.handle_gesture(LongPressEvent::changed(Point::new(100.0, 590.0)));
    let (now, dt) = clock.advance();
    c.on_frame(now, dt);
    c.handle_gesture(LongPressEvent::ended(Point::new(100.0, 590.0)));
    assert_eq!(c.scroll_rate(), 0.0);
    assert!(!c.is_scroll_tick_active());

    let offset = c.host().content_offset().y;
    for _ in 0..40 {
        let (now, dt) = clock.advance();
        let frame = c.on_frame(now, dt);
        assert_eq!(frame.scrolled_to, None);
    }
    assert_eq!(c.host().content_offset().y, offset);
    assert_eq!(c.state(), ReorderState::Idle);
}

// ── Raw pointer input ───────────────────────────────────────────────────

#[test]
fn long_press_drag_and_release() {
    let moves = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&moves);
    let source = VecSource::new(["A", "B", "C"])
        .on_move(move |item: &&str, row| log.borrow_mut().push((item.to_string(), row)));
    let mut c = ReorderController::new(table(3), source);
    let mut clock = FrameClock::new(Instant::now(), 60);

    assert_eq!(c.handle_pointer(PointerEvent::Down(at_row(0)), clock.now()), None);
    let (now, dt) = clock.advance();
    assert_eq!(c.on_frame(now, dt).gesture, None, "held too briefly");

    clock.advance_by(Duration::from_millis(500));
    let frame = c.on_frame(clock.now(), clock.interval());
    assert_eq!(
        frame.gesture,
        Some(GestureOutcome::Began { origin: RowIndex::row(0) })
    );

    let out = c.handle_pointer(PointerEvent::Move(at_row(2)), clock.now());
    assert!(matches!(
        out,
        Some(GestureOutcome::Updated { hover, .. }) if hover == RowIndex::row(2)
    ));
    let out = c.handle_pointer(PointerEvent::Up(at_row(2)), clock.now());
    assert_eq!(out, Some(GestureOutcome::Dropping { target: RowIndex::row(2) }));

    let mut dropped = None;
    for _ in 0..40 {
        let (now, dt) = clock.advance();
        if let Some(index) = c.on_frame(now, dt).dropped {
            dropped = Some(index);
            break;
        }
    }
    assert_eq!(dropped, Some(RowIndex::row(2)));
    assert_eq!(c.source().to_vec(), vec!["B", "C", "A"]);
    assert_eq!(*moves.borrow(), vec![("A".to_string(), 2)]);
    // The proxy is gone with the session.
    assert!(c.proxy().is_none());
}

#[test]
fn focus_loss_restores_origin() {
    let moves = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&moves);
    let source = VecSource::new(["A", "B", "C"])
        .on_move(move |item: &&str, row| log.borrow_mut().push((item.to_string(), row)));
    let mut c = ReorderController::new(table(3), source);
    let t = Instant::now();

    c.handle_pointer(PointerEvent::Down(at_row(0)), t);
    let t = t + Duration::from_millis(600);
    c.on_frame(t, Duration::from_millis(16));
    c.handle_pointer(PointerEvent::Move(at_row(2)), t);
    assert_eq!(c.source().blank_row(), Some(2));

    let out = c.handle_pointer(PointerEvent::FocusLost, t);
    assert_eq!(out, Some(GestureOutcome::Cancelled { restored: RowIndex::row(0) }));
    assert_eq!(c.source().to_vec(), vec!["A", "B", "C"]);
    assert_eq!(*moves.borrow(), vec![("A".to_string(), 0)]);
    assert!(!c.is_scroll_tick_active());
}

#[test]
fn pickup_snapshots_and_clears_highlight() {
    let mut c = recording(&["A", "B"]);
    c.handle_gesture(LongPressEvent::began(at_row(1)));
    let updates = c.host().updates();
    assert_eq!(updates[0], TableUpdate::ClearHighlight(RowIndex::row(1)));
    assert_eq!(updates[1], TableUpdate::Snapshot(RowIndex::row(1)));
    let proxy = c.proxy().expect("proxy while dragging");
    assert_eq!(proxy.snapshot.index, RowIndex::row(1));
    assert_eq!(proxy.opacity, 1.0);
}

// ── Host updates ────────────────────────────────────────────────────────

fn rows(range: std::ops::RangeInclusive<usize>) -> Vec<RowIndex> {
    range.map(RowIndex::row).collect()
}

#[test]
fn session_issues_batched_structural_updates() {
    let mut c = ReorderController::with_config(table(30), long_list(30), instant_drop());
    let mut clock = FrameClock::new(Instant::now(), 60);

    // Pickup: highlight cleared, snapshot taken, origin row swapped for the
    // blank without animation.
    c.handle_gesture(LongPressEvent::began(at_row(10)));
    assert_eq!(
        c.host_mut().take_updates(),
        vec![
            TableUpdate::ClearHighlight(RowIndex::row(10)),
            TableUpdate::Snapshot(RowIndex::row(10)),
            TableUpdate::Delete(vec![RowIndex::row(10)], RowAnimation::None),
            TableUpdate::Insert(vec![RowIndex::row(10)], RowAnimation::None),
            TableUpdate::Commit,
        ]
    );

    // Hover move: one animated delete/insert pair, one commit.
    c.handle_gesture(LongPressEvent::changed(Point::new(100.0, 590.0)));
    assert_eq!(c.hover_index(), Some(RowIndex::row(13)));
    assert_eq!(
        c.host_mut().take_updates(),
        vec![
            TableUpdate::Delete(vec![RowIndex::row(10)], RowAnimation::Automatic),
            TableUpdate::Insert(vec![RowIndex::row(13)], RowAnimation::Automatic),
            TableUpdate::Commit,
        ]
    );

    // Scroll tick: a single animated offset change, touch stays on row 13.
    let (now, dt) = clock.advance();
    let frame = c.on_frame(now, dt);
    assert_eq!(frame.moved, None);
    let updates = c.host_mut().take_updates();
    let [TableUpdate::Offset { y, animated }] = updates.as_slice() else {
        panic!("expected one offset update, got {updates:?}");
    };
    assert!(*animated);
    assert!((*y - 9.0).abs() < 1e-3, "offset = {y}");

    // Drop: the hover row is refreshed in place, then every other visible
    // row is reloaded. At offset 9 rows 0 through 13 are on screen.
    let out = c.handle_gesture(LongPressEvent::ended(Point::new(100.0, 590.0)));
    assert_eq!(out, GestureOutcome::Dropped { index: RowIndex::row(13) });
    assert_eq!(
        c.host_mut().take_updates(),
        vec![
            TableUpdate::Delete(vec![RowIndex::row(13)], RowAnimation::None),
            TableUpdate::Insert(vec![RowIndex::row(13)], RowAnimation::None),
            TableUpdate::Reload(rows(0..=12), RowAnimation::None),
            TableUpdate::Commit,
        ]
    );
    assert_eq!(c.source().get(13).map(String::as_str), Some("row 10"));
}
