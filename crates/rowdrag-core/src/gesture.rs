#![forbid(unsafe_code)]

//! Long-press gesture recognition: turns raw pointer input into phase-tagged
//! gesture events.
//!
//! [`LongPressRecognizer`] is a stateful processor fed with [`PointerEvent`]s.
//! A press that stays within the allowable movement for the configured
//! threshold becomes a recognized long press; from then on every pointer move
//! is reported as [`GesturePhase::Changed`] until release.
//!
//! # State Machine
//!
//! ```text
//!  Idle ──down──▶ Possible ──threshold──▶ Recognized ──up──▶ Idle (Ended)
//!                    │                        │
//!                    └─ slop / up / blur ─▶ Idle   └─ blur / disable ─▶ Idle (Cancelled)
//! ```
//!
//! # Invariants
//!
//! 1. Every recognized gesture is well-formed: `Began` → zero or more
//!    `Changed` → exactly one of `Ended` or `Cancelled`.
//! 2. A disabled recognizer emits nothing and ignores pointer-down.
//! 3. Disabling a recognized gesture emits `Cancelled` at the last location.
//!
//! # Failure Modes
//!
//! - If `check_long_press` is never called, a press is never recognized;
//!   callers must poll it from their frame tick.
//! - A pointer stream that stops without an up event leaves the recognizer
//!   in `Recognized`; feed [`PointerEvent::FocusLost`] to terminate it.

use web_time::{Duration, Instant};

use crate::geometry::Point;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Thresholds for long-press recognition.
#[derive(Debug, Clone)]
pub struct GestureConfig {
    /// Duration a press must be held before it is recognized (default: 500ms).
    pub long_press_threshold: Duration,
    /// Maximum distance (points) the pointer may travel before recognition
    /// without failing the press (default: 10).
    pub allowable_movement: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            long_press_threshold: Duration::from_millis(500),
            allowable_movement: 10.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Phase of a continuous gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
    /// The gesture was interrupted (focus loss, recognizer disabled).
    Cancelled,
}

/// A phase-tagged long-press event carrying the pointer location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LongPressEvent {
    pub phase: GesturePhase,
    pub location: Point,
}

impl LongPressEvent {
    #[must_use]
    pub const fn new(phase: GesturePhase, location: Point) -> Self {
        Self { phase, location }
    }

    #[must_use]
    pub const fn began(location: Point) -> Self {
        Self::new(GesturePhase::Began, location)
    }

    #[must_use]
    pub const fn changed(location: Point) -> Self {
        Self::new(GesturePhase::Changed, location)
    }

    #[must_use]
    pub const fn ended(location: Point) -> Self {
        Self::new(GesturePhase::Ended, location)
    }

    #[must_use]
    pub const fn cancelled(location: Point) -> Self {
        Self::new(GesturePhase::Cancelled, location)
    }
}

/// Raw pointer input, in the same coordinate space the events are reported in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up(Point),
    /// The window lost focus or the system interrupted input.
    FocusLost,
}

// ---------------------------------------------------------------------------
// LongPressRecognizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
enum PressState {
    Idle,
    Possible {
        start: Point,
        last: Point,
        down_at: Instant,
    },
    Recognized {
        last: Point,
    },
}

/// Stateful long-press recognizer.
///
/// Call [`process`](LongPressRecognizer::process) for each pointer event and
/// [`check_long_press`](LongPressRecognizer::check_long_press) on every frame.
#[derive(Debug)]
pub struct LongPressRecognizer {
    config: GestureConfig,
    enabled: bool,
    state: PressState,
    disable_count: u64,
}

impl LongPressRecognizer {
    /// Create an enabled recognizer with the given configuration.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            enabled: true,
            state: PressState::Idle,
            disable_count: 0,
        }
    }

    /// Process a pointer event, returning the gesture event it produced, if any.
    pub fn process(&mut self, event: PointerEvent, now: Instant) -> Option<LongPressEvent> {
        if !self.enabled {
            return None;
        }

        match (event, self.state) {
            (PointerEvent::Down(pos), prev) => {
                self.state = PressState::Possible {
                    start: pos,
                    last: pos,
                    down_at: now,
                };
                // A second press without a release terminates the first.
                match prev {
                    PressState::Recognized { last } => Some(LongPressEvent::cancelled(last)),
                    _ => None,
                }
            }
            (PointerEvent::Move(pos), PressState::Possible { start, down_at, .. }) => {
                if pos.distance(start) > self.config.allowable_movement {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(x = pos.x, y = pos.y, "long press failed: moved past slop");
                    self.state = PressState::Idle;
                } else {
                    self.state = PressState::Possible {
                        start,
                        last: pos,
                        down_at,
                    };
                }
                None
            }
            (PointerEvent::Move(pos), PressState::Recognized { .. }) => {
                self.state = PressState::Recognized { last: pos };
                Some(LongPressEvent::changed(pos))
            }
            (PointerEvent::Up(pos), PressState::Recognized { .. }) => {
                self.state = PressState::Idle;
                Some(LongPressEvent::ended(pos))
            }
            (PointerEvent::FocusLost, PressState::Recognized { last }) => {
                self.state = PressState::Idle;
                Some(LongPressEvent::cancelled(last))
            }
            (PointerEvent::Up(_) | PointerEvent::FocusLost, _) => {
                self.state = PressState::Idle;
                None
            }
            (PointerEvent::Move(_), PressState::Idle) => None,
        }
    }

    /// Check for long-press recognition. Call periodically (e.g., each frame).
    ///
    /// Returns a `Began` event once the press has been held for the threshold.
    pub fn check_long_press(&mut self, now: Instant) -> Option<LongPressEvent> {
        if !self.enabled {
            return None;
        }
        if let PressState::Possible { last, down_at, .. } = self.state
            && now.duration_since(down_at) >= self.config.long_press_threshold
        {
            self.state = PressState::Recognized { last };
            return Some(LongPressEvent::began(last));
        }
        None
    }

    /// Enable or disable the recognizer.
    ///
    /// Disabling drops any pending press. If a gesture was recognized, the
    /// returned `Cancelled` event terminates it.
    pub fn set_enabled(&mut self, enabled: bool) -> Option<LongPressEvent> {
        if self.enabled == enabled {
            return None;
        }
        self.enabled = enabled;
        if enabled {
            return None;
        }
        self.disable_count += 1;
        let prev = std::mem::replace(&mut self.state, PressState::Idle);
        match prev {
            PressState::Recognized { last } => Some(LongPressEvent::cancelled(last)),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether a long press is currently recognized (between `Began` and its
    /// terminal phase).
    #[inline]
    #[must_use]
    pub fn is_recognized(&self) -> bool {
        matches!(self.state, PressState::Recognized { .. })
    }

    /// The most recent pointer location of an in-flight press, if any.
    #[must_use]
    pub fn location(&self) -> Option<Point> {
        match self.state {
            PressState::Idle => None,
            PressState::Possible { last, .. } | PressState::Recognized { last } => Some(last),
        }
    }

    /// How many times the recognizer has been disabled.
    #[inline]
    #[must_use]
    pub fn disable_count(&self) -> u64 {
        self.disable_count
    }

    /// Reset to idle without emitting anything.
    pub fn reset(&mut self) {
        self.state = PressState::Idle;
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }
}

impl Default for LongPressRecognizer {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}
