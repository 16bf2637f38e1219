#![forbid(unsafe_code)]

//! Display-refresh driven callbacks.
//!
//! A [`DisplayLink`] is a cancellable repeating tick. The owner registers it
//! when per-frame work begins, calls [`DisplayLink::fire`] from its frame
//! handler, and [`invalidate`](DisplayLink::invalidate)s it before tearing
//! down whatever state the tick reads. An invalidated link never fires again.
//!
//! [`FrameClock`] produces a deterministic sequence of frame timestamps at a
//! fixed rate, for headless drivers and tests.
//!
//! # Invariants
//!
//! 1. `fire` returns `None` once the link is invalidated, forever.
//! 2. Frame indices are strictly increasing from 0 while running.
//! 3. `invalidate` is idempotent.

use std::sync::atomic::{AtomicU64, Ordering};

use web_time::{Duration, Instant};

static NEXT_LINK_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a display link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(u64);

impl LinkId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Lifecycle of a display link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Running,
    Paused,
    /// Terminal; the link will never fire again.
    Invalidated,
}

/// A single delivered frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkFrame {
    /// Zero-based count of frames delivered by this link.
    pub index: u64,
    /// Time since the previous frame.
    pub dt: Duration,
    /// Total time since the link started.
    pub elapsed: Duration,
}

/// A cancellable per-frame tick.
#[derive(Debug)]
pub struct DisplayLink {
    id: LinkId,
    state: LinkState,
    frames: u64,
    elapsed: Duration,
}

impl DisplayLink {
    /// Register a new running link.
    #[must_use]
    pub fn start() -> Self {
        let id = LinkId(NEXT_LINK_ID.fetch_add(1, Ordering::Relaxed));
        #[cfg(feature = "tracing")]
        tracing::trace!(link = id.0, "display link started");
        Self {
            id,
            state: LinkState::Running,
            frames: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Deliver a display refresh. Returns the frame if the link is running.
    pub fn fire(&mut self, dt: Duration) -> Option<LinkFrame> {
        if self.state != LinkState::Running {
            return None;
        }
        self.elapsed = self.elapsed.saturating_add(dt);
        let frame = LinkFrame {
            index: self.frames,
            dt,
            elapsed: self.elapsed,
        };
        self.frames += 1;
        Some(frame)
    }

    /// Stop delivering frames until [`resume`](Self::resume).
    pub fn pause(&mut self) {
        if self.state == LinkState::Running {
            self.state = LinkState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == LinkState::Paused {
            self.state = LinkState::Running;
        }
    }

    /// Permanently stop the link.
    pub fn invalidate(&mut self) {
        if self.state != LinkState::Invalidated {
            #[cfg(feature = "tracing")]
            tracing::trace!(link = self.id.0, frames = self.frames, "display link invalidated");
            self.state = LinkState::Invalidated;
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> LinkId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> LinkState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == LinkState::Running
    }

    #[inline]
    #[must_use]
    pub fn is_invalidated(&self) -> bool {
        self.state == LinkState::Invalidated
    }

    /// Frames delivered so far.
    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

// ---------------------------------------------------------------------------
// FrameClock
// ---------------------------------------------------------------------------

/// Fixed-rate frame timestamp generator.
#[derive(Debug, Clone)]
pub struct FrameClock {
    now: Instant,
    interval: Duration,
}

impl FrameClock {
    /// Clock starting at `start`, ticking `fps` times per second.
    ///
    /// `fps` of zero is treated as one.
    #[must_use]
    pub fn new(start: Instant, fps: u32) -> Self {
        let fps = fps.max(1);
        Self {
            now: start,
            interval: Duration::from_secs(1) / fps,
        }
    }

    /// 60 Hz clock starting now.
    #[must_use]
    pub fn sixty_hz() -> Self {
        Self::new(Instant::now(), 60)
    }

    /// Current timestamp.
    #[inline]
    #[must_use]
    pub fn now(&self) -> Instant {
        self.now
    }

    #[inline]
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Advance one frame, returning the new timestamp and the frame delta.
    pub fn advance(&mut self) -> (Instant, Duration) {
        self.now += self.interval;
        (self.now, self.interval)
    }

    /// Advance by an arbitrary amount of wall time (e.g. a held press).
    pub fn advance_by(&mut self, dt: Duration) -> Instant {
        self.now += dt;
        self.now
    }
}
