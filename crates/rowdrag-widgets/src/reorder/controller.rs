#![forbid(unsafe_code)]

//! The reorder state machine.
//!
//! ```text
//!          Began (gates pass)            Ended
//!  Idle ───────────────────▶ Dragging ─────────▶ Settling ──(animation done)──▶ Idle
//!   ▲  ╲ Began (gate fails)     │                                               │
//!   │   ╲──▶ rejected           │ Cancelled: blank returned to origin           │
//!   └───────────────────────────┴───────────────────────────────────────────────┘
//! ```
//!
//! Gesture events arrive through [`ReorderController::handle_gesture`] (or
//! raw pointer input through [`ReorderController::handle_pointer`]); display
//! refreshes arrive through [`ReorderController::on_frame`].

#[cfg(feature = "tracing")]
use tracing::{debug, debug_span, trace};
use web_time::{Duration, Instant};

use rowdrag_core::animation::Tween;
use rowdrag_core::display_link::DisplayLink;
use rowdrag_core::geometry::{Point, Rect};
use rowdrag_core::gesture::{GesturePhase, LongPressEvent, LongPressRecognizer, PointerEvent};

use super::RowIndex;
use super::config::ReorderConfig;
use super::host::{RowAnimation, TableHost};
use super::scroll::{ScrollMetrics, clamp_proxy_center, next_scroll_offset, scroll_rate};
use super::session::{DragProxy, DragSession, Settle};
use super::source::ReorderSource;

/// Why a gesture did not start a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// Reordering is switched off with
    /// [`set_can_reorder`](ReorderController::set_can_reorder).
    Disabled,
    /// No rows in any section.
    EmptyList,
    /// The press did not land on a row.
    NoRow,
    /// The source refused to let the row move.
    NotMovable,
    /// A drag or drop animation is already in progress.
    Busy,
}

/// What a gesture event did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    /// Nothing to do (e.g. `Changed` or `Ended` without a session).
    Ignored,
    /// The gesture was refused. Unless the refusal is `Busy` or `Disabled`,
    /// the recognizer is reset.
    Rejected(RejectReason),
    /// A session started at `origin`.
    Began { origin: RowIndex },
    /// The touch moved. `moved` reports a hover retarget, if one happened.
    Updated {
        hover: RowIndex,
        moved: Option<(RowIndex, RowIndex)>,
        scroll_rate: f32,
    },
    /// The drop animation started toward `target`.
    Dropping { target: RowIndex },
    /// The item was finalized at `index` and the session cleared.
    Dropped { index: RowIndex },
    /// The session was rolled back; the item is back at `restored`.
    Cancelled { restored: RowIndex },
}

/// What one display frame did.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameOutcome {
    /// Result of a long press recognized on this frame.
    pub gesture: Option<GestureOutcome>,
    /// New vertical content offset, if the scroll tick moved it.
    pub scrolled_to: Option<f32>,
    /// Hover retarget caused by scrolling.
    pub moved: Option<(RowIndex, RowIndex)>,
    /// Row the item was finalized at, if the drop animation completed.
    pub dropped: Option<RowIndex>,
}

/// Coarse controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderState {
    Idle,
    Dragging,
    Settling,
}

/// Drives long-press reordering of the rows of a [`TableHost`] backed by a
/// [`ReorderSource`].
///
/// The `S: ReorderSource` bound is the whole capability check: a source that
/// cannot stage, move, and finalize does not compose.
pub struct ReorderController<H: TableHost, S: ReorderSource> {
    host: H,
    source: S,
    config: ReorderConfig,
    recognizer: LongPressRecognizer,
    can_reorder: bool,
    session: Option<DragSession<S::Payload, H::Snapshot>>,
    scroll_link: Option<DisplayLink>,
}

impl<H: TableHost, S: ReorderSource> std::fmt::Debug for ReorderController<H, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReorderController")
            .field("state", &self.state())
            .field("can_reorder", &self.can_reorder)
            .field("hover", &self.hover_index())
            .field("scroll_link", &self.scroll_link.as_ref().map(DisplayLink::id))
            .finish_non_exhaustive()
    }
}

impl<H: TableHost, S: ReorderSource> ReorderController<H, S> {
    /// Create a controller with the default configuration.
    #[must_use]
    pub fn new(host: H, source: S) -> Self {
        Self::with_config(host, source, ReorderConfig::default())
    }

    /// Create a controller with `config`.
    ///
    /// `config` is expected to pass [`ReorderConfig::validate`]; load it
    /// through [`ReorderConfig::validated`] when it comes from outside.
    #[must_use]
    pub fn with_config(host: H, source: S, config: ReorderConfig) -> Self {
        debug_assert!(
            config.validate().is_empty(),
            "invalid ReorderConfig: {:?}",
            config.validate()
        );
        let recognizer = LongPressRecognizer::new(config.gesture_config());
        Self {
            host,
            source,
            config,
            recognizer,
            can_reorder: true,
            session: None,
            scroll_link: None,
        }
    }

    // -- accessors ----------------------------------------------------------

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host access, e.g. to resize or scroll it from outside a drag.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable source access. Mutating the list while a session is active
    /// breaks the single-blank invariant; only do this when idle.
    pub fn source_mut(&mut self) -> &mut S {
        debug_assert!(self.session.is_none(), "source mutated during a drag");
        &mut self.source
    }

    #[must_use]
    pub fn config(&self) -> &ReorderConfig {
        &self.config
    }

    /// Swap the configuration. Press timing applies to the next press; an
    /// active session keeps scrolling and settling with the new values.
    pub fn set_config(&mut self, config: ReorderConfig) {
        debug_assert!(
            config.validate().is_empty(),
            "invalid ReorderConfig: {:?}",
            config.validate()
        );
        self.recognizer.set_config(config.gesture_config());
        self.config = config;
    }

    #[must_use]
    pub fn recognizer(&self) -> &LongPressRecognizer {
        &self.recognizer
    }

    #[must_use]
    pub fn session(&self) -> Option<&DragSession<S::Payload, H::Snapshot>> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn proxy(&self) -> Option<&DragProxy<H::Snapshot>> {
        self.session.as_ref().map(DragSession::proxy)
    }

    #[must_use]
    pub fn hover_index(&self) -> Option<RowIndex> {
        self.session.as_ref().map(DragSession::hover)
    }

    /// Current scroll rate; zero when idle or settling.
    #[must_use]
    pub fn scroll_rate(&self) -> f32 {
        self.session.as_ref().map_or(0.0, DragSession::scroll_rate)
    }

    #[must_use]
    pub fn state(&self) -> ReorderState {
        match &self.session {
            None => ReorderState::Idle,
            Some(s) if s.is_settling() => ReorderState::Settling,
            Some(_) => ReorderState::Dragging,
        }
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.state() == ReorderState::Dragging
    }

    /// Whether the per-frame scroll tick is registered.
    #[must_use]
    pub fn is_scroll_tick_active(&self) -> bool {
        self.scroll_link.as_ref().is_some_and(DisplayLink::is_running)
    }

    #[must_use]
    pub fn can_reorder(&self) -> bool {
        self.can_reorder
    }

    /// Enable or disable reordering. Disabling mid-drag cancels the drag.
    pub fn set_can_reorder(&mut self, can_reorder: bool) -> Option<GestureOutcome> {
        self.can_reorder = can_reorder;
        let interrupted = self.recognizer.set_enabled(can_reorder);
        match interrupted {
            Some(event) => Some(self.handle_gesture(event)),
            // Disabled while no long press was live, but a session driven
            // by external gesture events may still be open.
            None if !can_reorder && self.is_dragging() => Some(self.cancel()),
            None => None,
        }
    }

    /// Give back the host and source. An in-flight session is rolled back
    /// first so the source never escapes with a blank in it.
    #[must_use]
    pub fn into_parts(mut self) -> (H, S) {
        match self.state() {
            ReorderState::Dragging => {
                let _ = self.cancel();
            }
            ReorderState::Settling => {
                let _ = self.finish_drop();
            }
            ReorderState::Idle => {}
        }
        (self.host, self.source)
    }

    // -- input --------------------------------------------------------------

    /// Feed raw pointer input through the owned long-press recognizer.
    ///
    /// `Began` is produced by [`on_frame`](Self::on_frame) once the press has
    /// been held long enough.
    pub fn handle_pointer(&mut self, event: PointerEvent, now: Instant) -> Option<GestureOutcome> {
        let gesture = self.recognizer.process(event, now)?;
        Some(self.handle_gesture(gesture))
    }

    /// Handle a phase-tagged gesture event.
    pub fn handle_gesture(&mut self, event: LongPressEvent) -> GestureOutcome {
        match event.phase {
            GesturePhase::Began => self.begin(event.location),
            GesturePhase::Changed => self.update(event.location),
            GesturePhase::Ended => self.end(),
            GesturePhase::Cancelled => self.cancel(),
        }
    }

    /// Display refresh: long-press recognition, the scroll tick, and the drop
    /// animation.
    pub fn on_frame(&mut self, now: Instant, dt: Duration) -> FrameOutcome {
        let mut outcome = FrameOutcome::default();

        if let Some(event) = self.recognizer.check_long_press(now) {
            outcome.gesture = Some(self.handle_gesture(event));
        }

        debug_assert!(
            self.scroll_link.is_none() || self.is_dragging(),
            "scroll tick outlived its drag session"
        );
        let ticked = self
            .scroll_link
            .as_mut()
            .and_then(|link| link.fire(dt))
            .is_some();
        if ticked {
            let (scrolled_to, moved) = self.scroll_tick();
            outcome.scrolled_to = scrolled_to;
            outcome.moved = moved;
        }

        if self.state() == ReorderState::Settling {
            let landed = match self.session.as_mut() {
                Some(session) => {
                    let target = self.host.rect_for_row(session.hover);
                    session.advance_settle(dt, target)
                }
                None => false,
            };
            if landed {
                outcome.dropped = self.finish_drop();
            }
        }

        outcome
    }

    // -- transitions --------------------------------------------------------

    fn begin(&mut self, location: Point) -> GestureOutcome {
        if !self.can_reorder {
            return self.reject(RejectReason::Disabled);
        }
        if self.session.is_some() {
            return self.reject(RejectReason::Busy);
        }
        if self.source.total_rows() == 0 {
            return self.reject(RejectReason::EmptyList);
        }
        let Some(index) = self.host.row_at_point(location) else {
            return self.reject(RejectReason::NoRow);
        };
        if !self.source.is_movable(index) {
            return self.reject(RejectReason::NotMovable);
        }

        let row_rect = self.host.rect_for_row(index);
        self.host.clear_highlight(index);
        let snapshot = self.host.snapshot_row(index);

        self.host.begin_updates();
        self.host.delete_rows(&[index], RowAnimation::None);
        self.host.insert_rows(&[index], RowAnimation::None);
        let payload = self.source.stage_and_blank(index);
        self.host.end_updates();

        let mut proxy = DragProxy {
            snapshot,
            frame: row_rect,
            opacity: self.config.proxy_opacity,
        };
        proxy.center_on_y(location.y);

        let offset = self.host.content_offset();
        let touch = location.offset(-offset.x, -offset.y);
        self.session = Some(DragSession::new(
            index,
            payload,
            proxy,
            touch,
            row_rect.height,
        ));
        self.scroll_link = Some(DisplayLink::start());

        #[cfg(feature = "tracing")]
        debug!(
            origin = %index,
            y = location.y,
            row_height = row_rect.height,
            "reorder session began"
        );
        GestureOutcome::Began { origin: index }
    }

    fn update(&mut self, location: Point) -> GestureOutcome {
        let Self {
            host,
            source,
            config,
            session,
            ..
        } = self;
        let Some(session) = session.as_mut().filter(|s| !s.is_settling()) else {
            return GestureOutcome::Ignored;
        };

        let offset = host.content_offset();
        session.touch_in_viewport = location.offset(-offset.x, -offset.y);

        let content_height = host.content_size().height;
        session.proxy.center_on_y(clamp_proxy_center(
            location.y,
            content_height,
            config.overscroll_margin,
        ));

        let moved = retarget(host, source, session);

        let metrics = ScrollMetrics::from_host(&*host);
        session.scroll_rate = scroll_rate(location.y, &metrics, config);

        GestureOutcome::Updated {
            hover: session.hover,
            moved,
            scroll_rate: session.scroll_rate,
        }
    }

    fn end(&mut self) -> GestureOutcome {
        if !self.is_dragging() {
            return GestureOutcome::Ignored;
        }
        self.stop_scroll_tick();

        let duration = self.config.drop_duration();
        let Some(session) = self.session.as_mut() else {
            return GestureOutcome::Ignored;
        };
        session.scroll_rate = 0.0;
        let target = session.hover;
        session.settle = Some(Settle {
            from: session.proxy.frame,
            tween: Tween::new(duration),
        });

        #[cfg(feature = "tracing")]
        debug!(to = %target, origin = %session.origin(), "reorder drop started");

        if duration.is_zero() {
            return match self.finish_drop() {
                Some(index) => GestureOutcome::Dropped { index },
                None => GestureOutcome::Ignored,
            };
        }
        GestureOutcome::Dropping { target }
    }

    /// Roll an interrupted drag back to its origin.
    fn cancel(&mut self) -> GestureOutcome {
        if !self.is_dragging() {
            return GestureOutcome::Ignored;
        }
        self.stop_scroll_tick();
        let Some(session) = self.session.take() else {
            return GestureOutcome::Ignored;
        };
        let origin = session.origin();
        let hover = session.hover;

        self.host.begin_updates();
        if hover != origin {
            self.host.delete_rows(&[hover], RowAnimation::None);
            self.host.insert_rows(&[origin], RowAnimation::None);
            self.source.move_row(hover, origin);
        }
        self.host.end_updates();
        self.settle_rows(session.payload, origin);

        #[cfg(feature = "tracing")]
        debug!(origin = %origin, abandoned_hover = %hover, "reorder session cancelled");
        GestureOutcome::Cancelled { restored: origin }
    }

    /// Complete the drop: finalize at the hover row and clear the session.
    fn finish_drop(&mut self) -> Option<RowIndex> {
        let session = self.session.take()?;
        let index = session.hover;
        #[cfg(feature = "tracing")]
        let _span = debug_span!(
            "reorder.drop",
            origin = %session.origin(),
            index = %index,
            row_height = session.row_height()
        )
        .entered();
        self.settle_rows(session.payload, index);
        #[cfg(feature = "tracing")]
        debug!("reorder drop finalized");
        Some(index)
    }

    /// Put `payload` into the blank at `index` and refresh the other
    /// visible rows.
    fn settle_rows(&mut self, payload: S::Payload, index: RowIndex) {
        self.host.begin_updates();
        self.host.delete_rows(&[index], RowAnimation::None);
        self.host.insert_rows(&[index], RowAnimation::None);
        self.source.finalize(payload, index);
        let stale: Vec<RowIndex> = self
            .host
            .visible_rows()
            .into_iter()
            .filter(|row| *row != index)
            .collect();
        self.host.reload_rows(&stale, RowAnimation::None);
        self.host.end_updates();
    }

    fn scroll_tick(&mut self) -> (Option<f32>, Option<(RowIndex, RowIndex)>) {
        let Self {
            host,
            source,
            config,
            session,
            ..
        } = self;
        let Some(session) = session.as_mut() else {
            return (None, None);
        };

        let metrics = ScrollMetrics::from_host(&*host);
        let new_y = next_scroll_offset(&metrics, session.scroll_rate, config.scroll_step);
        let scrolled_to = if new_y == metrics.offset.y {
            None
        } else {
            host.set_content_offset(Point::new(metrics.offset.x, new_y), true);
            #[cfg(feature = "tracing")]
            trace!(rate = session.scroll_rate, offset = new_y, "reorder scroll tick");
            Some(new_y)
        };

        let location = session.touch_location(host.content_offset());
        let content_height = host.content_size().height;
        session.proxy.center_on_y(clamp_proxy_center(
            location.y,
            content_height,
            config.overscroll_margin,
        ));

        let moved = retarget(host, source, session);
        (scrolled_to, moved)
    }

    fn stop_scroll_tick(&mut self) {
        if let Some(mut link) = self.scroll_link.take() {
            link.invalidate();
        }
    }

    /// Refuse a gesture. A press that fails a row gate bounces the
    /// recognizer; `Busy` and `Disabled` leave it untouched, since its live
    /// long press may be the one driving the session.
    fn reject(&mut self, reason: RejectReason) -> GestureOutcome {
        if !matches!(reason, RejectReason::Busy | RejectReason::Disabled) {
            let _ = self.recognizer.set_enabled(false);
            let _ = self.recognizer.set_enabled(self.can_reorder);
        }
        #[cfg(feature = "tracing")]
        debug!(?reason, "reorder gesture rejected");
        GestureOutcome::Rejected(reason)
    }
}

/// Move the hover index to whatever row is under the touch, if the source
/// agrees and the touch is far enough into that row.
///
/// With uniform row heights the threshold is zero, so any crossing moves the
/// blank. With mixed heights the touch must travel past the height
/// difference, which stops the blank from oscillating between a tall and a
/// short row.
fn retarget<H: TableHost, S: ReorderSource>(
    host: &mut H,
    source: &mut S,
    session: &mut DragSession<S::Payload, H::Snapshot>,
) -> Option<(RowIndex, RowIndex)> {
    let location = session.touch_location(host.content_offset());
    let proposed = host.row_at_point(location);
    let target = source.customize_target(session.origin(), proposed)?;
    if target == session.hover {
        return None;
    }

    let target_rect: Rect = host.rect_for_row(target);
    let hover_rect = host.rect_for_row(session.hover);
    let depth = location.y - target_rect.y;
    if depth <= target_rect.height - hover_rect.height {
        return None;
    }

    let from = session.hover;
    host.begin_updates();
    host.delete_rows(&[from], RowAnimation::Automatic);
    host.insert_rows(&[target], RowAnimation::Automatic);
    source.move_row(from, target);
    session.hover = target;
    host.end_updates();

    #[cfg(feature = "tracing")]
    debug!(from = %from, to = %target, "reorder hover moved");
    Some((from, target))
}
