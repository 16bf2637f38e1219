#![forbid(unsafe_code)]

//! Scripted pointer sessions over the city list.
//!
//! Each [`Scenario`] is a fixed sequence of [`Step`]s replayed against a
//! [`ReorderController`] on a 60 Hz [`FrameClock`]. Pointer coordinates are
//! content coordinates; the table is scrolled to the top when a script starts.

use std::cell::RefCell;
use std::rc::Rc;

use clap::ValueEnum;
use rowdrag_core::display_link::FrameClock;
use rowdrag_core::geometry::{Point, Size};
use rowdrag_core::gesture::PointerEvent;
use rowdrag_widgets::reorder::{
    GestureOutcome, RejectReason, ReorderConfig, ReorderController, ReorderState, TableHost,
    VecSource,
};
use rowdrag_widgets::table::TableView;
use tracing::{debug, info};
use web_time::{Duration, Instant};

use crate::error::{DemoError, Result};

pub const CITIES: [&str; 11] = [
    "Fryazino",
    "Mocsow",
    "New York",
    "Canberra",
    "Baku",
    "Minsk",
    "Paris",
    "Riga",
    "San Francisco",
    "Monaco",
    "London",
];

pub const ROW_HEIGHT: f32 = 44.0;
pub const VIEWPORT: Size = Size::new(320.0, 240.0);

const HOLD: Duration = Duration::from_millis(600);
const MAX_SETTLE_FRAMES: u32 = 240;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Pick up the first city and drop it three rows down.
    Drag,
    /// Hold a city in the bottom edge zone until the list scrolls to the end.
    AutoScroll,
    /// Lose focus mid-drag; the city returns to where it started.
    Cancel,
    /// Press a spacer row that refuses to move, then drag a real city.
    Pinned,
}

impl Scenario {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Drag => "drag",
            Self::AutoScroll => "auto-scroll",
            Self::Cancel => "cancel",
            Self::Pinned => "pinned",
        }
    }

    fn items(self) -> Vec<String> {
        let cities = CITIES.iter().map(|c| (*c).to_owned());
        match self {
            Self::Pinned => std::iter::once(String::new()).chain(cities).collect(),
            _ => cities.collect(),
        }
    }

    fn steps(self) -> Vec<Step> {
        use Step::{FocusLost, Frames, Hold, MoveTo, Press, Release};
        match self {
            Self::Drag => vec![
                Press(row_center(0)),
                Hold(HOLD),
                MoveTo(row_center(1)),
                MoveTo(row_center(2)),
                MoveTo(row_center(3)),
                Release(row_center(3)),
            ],
            Self::AutoScroll => {
                let edge = Point::new(100.0, VIEWPORT.height - 10.0);
                vec![
                    Press(row_center(1)),
                    Hold(HOLD),
                    MoveTo(edge),
                    Frames(60),
                    Release(edge),
                ]
            }
            Self::Cancel => vec![
                Press(row_center(2)),
                Hold(HOLD),
                MoveTo(row_center(4)),
                FocusLost,
            ],
            Self::Pinned => vec![
                Press(row_center(0)),
                Hold(HOLD),
                Release(row_center(0)),
                Press(row_center(1)),
                Hold(HOLD),
                MoveTo(row_center(2)),
                Release(row_center(2)),
            ],
        }
    }
}

/// One scripted input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Press(Point),
    /// Let wall time pass, then render one frame.
    Hold(Duration),
    MoveTo(Point),
    Release(Point),
    FocusLost,
    Frames(u32),
}

/// What a scenario did to the list.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub scenario: Scenario,
    pub items: Vec<String>,
    /// `(item, row)` for every finalize, in order.
    pub moves: Vec<(String, usize)>,
    pub rejections: Vec<RejectReason>,
    pub final_offset: f32,
}

#[must_use]
pub fn row_center(row: usize) -> Point {
    Point::new(100.0, row as f32 * ROW_HEIGHT + ROW_HEIGHT / 2.0)
}

/// Replay `scenario` with `config` and wait for any drop animation to land.
pub fn run(scenario: Scenario, config: &ReorderConfig) -> Result<Report> {
    let moves = Rc::new(RefCell::new(Vec::new()));
    let observer = Rc::clone(&moves);
    let source = VecSource::new(scenario.items())
        .with_movable(|city: &String| !city.is_empty())
        .on_move(move |city: &String, index| {
            info!("Item {city} moved to {index}");
            observer.borrow_mut().push((city.clone(), index));
        });
    let host = TableView::for_source(VIEWPORT, &source, ROW_HEIGHT);
    let mut controller = ReorderController::with_config(host, source, config.clone());
    let mut clock = FrameClock::new(Instant::now(), 60);
    let mut rejections = Vec::new();

    info!(scenario = scenario.name(), "running scenario");
    for step in scenario.steps() {
        for outcome in apply(&mut controller, &mut clock, step) {
            debug!(?step, ?outcome, "step");
            if let GestureOutcome::Rejected(reason) = outcome {
                rejections.push(reason);
            }
        }
    }

    let mut frames = 0;
    while controller.state() != ReorderState::Idle {
        if frames == MAX_SETTLE_FRAMES {
            return Err(DemoError::Unsettled {
                scenario: scenario.name(),
                frames,
            });
        }
        let (now, dt) = clock.advance();
        controller.on_frame(now, dt);
        frames += 1;
    }

    let (host, source) = controller.into_parts();
    let moves = moves.borrow().clone();
    Ok(Report {
        scenario,
        items: source.into_items(),
        moves,
        rejections,
        final_offset: host.content_offset().y,
    })
}

type DemoController = ReorderController<TableView, VecSource<String>>;

fn apply(
    controller: &mut DemoController,
    clock: &mut FrameClock,
    step: Step,
) -> Vec<GestureOutcome> {
    match step {
        Step::Press(at) => pointer(controller, PointerEvent::Down(at), clock.now()),
        Step::MoveTo(at) => pointer(controller, PointerEvent::Move(at), clock.now()),
        Step::Release(at) => pointer(controller, PointerEvent::Up(at), clock.now()),
        Step::FocusLost => pointer(controller, PointerEvent::FocusLost, clock.now()),
        Step::Hold(duration) => {
            let now = clock.advance_by(duration);
            controller
                .on_frame(now, clock.interval())
                .gesture
                .into_iter()
                .collect()
        }
        Step::Frames(count) => (0..count)
            .filter_map(|_| {
                let (now, dt) = clock.advance();
                controller.on_frame(now, dt).gesture
            })
            .collect(),
    }
}

fn pointer(
    controller: &mut DemoController,
    event: PointerEvent,
    now: Instant,
) -> Vec<GestureOutcome> {
    controller.handle_pointer(event, now).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_default(scenario: Scenario) -> Report {
        run(scenario, &ReorderConfig::default()).expect("scenario settles")
    }

    #[test]
    fn drag_moves_first_city_down() {
        let report = run_default(Scenario::Drag);
        assert_eq!(report.moves, vec![("Fryazino".to_string(), 3)]);
        assert_eq!(
            &report.items[..5],
            &["Mocsow", "New York", "Canberra", "Fryazino", "Baku"]
        );
        assert_eq!(report.final_offset, 0.0);
    }

    #[test]
    fn auto_scroll_carries_city_to_the_end() {
        let report = run_default(Scenario::AutoScroll);
        // 11 rows of 44 in a 240-tall viewport.
        assert_eq!(report.final_offset, 244.0);
        assert_eq!(report.moves, vec![("Mocsow".to_string(), 10)]);
        assert_eq!(report.items.last().map(String::as_str), Some("Mocsow"));
    }

    #[test]
    fn cancel_restores_order() {
        let report = run_default(Scenario::Cancel);
        assert_eq!(report.moves, vec![("New York".to_string(), 2)]);
        assert_eq!(report.items, CITIES.to_vec());
    }

    #[test]
    fn spacer_row_is_rejected() {
        let report = run_default(Scenario::Pinned);
        assert_eq!(report.rejections, vec![RejectReason::NotMovable]);
        assert_eq!(report.moves, vec![("Fryazino".to_string(), 2)]);
        assert_eq!(&report.items[..3], &["", "Mocsow", "Fryazino"]);
    }

    #[test]
    fn instant_drop_needs_no_frames() {
        let config = ReorderConfig {
            drop_duration_ms: 0,
            ..ReorderConfig::default()
        };
        let report = run(Scenario::Drag, &config).expect("scenario settles");
        assert_eq!(report.moves.len(), 1);
    }
}
