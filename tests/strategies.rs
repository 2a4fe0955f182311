//! Dispatch-strategy equivalence tests.
//!
//! The match-based and jump-table strategies are two implementations of
//! one contract: for the same body and the same step sequence they must
//! produce identical statuses, identical payload states, and identical
//! resume keys. These tests drive both side by side.

use restep::{Body, BuildError, Entry, Handler, JumpDispatch, Machine, Point, StepEvent};

// =============================================================================
// Body Under Test
// =============================================================================

// Sparse ids on purpose: the jump table must resolve them through its
// hash path while the match body compares them directly.
const WARMUP: Point = Point::new(10);
const WORK: Point = Point::new(20);
const DRAIN: Point = Point::new(30);

/// Three-phase pipeline with a bounded work loop in the middle.
#[derive(Debug, Clone)]
struct Pipeline {
    budget: u32,
    produced: Vec<u32>,
}

impl Pipeline {
    fn new(budget: u32) -> Self {
        Self {
            budget,
            produced: Vec::new(),
        }
    }

    fn enter(&mut self) -> StepEvent {
        self.produced.push(0);
        StepEvent::Suspend(WARMUP)
    }

    fn work(&mut self) -> StepEvent {
        if self.budget == 0 {
            return StepEvent::Suspend(DRAIN);
        }
        self.budget -= 1;
        self.produced.push(self.budget);
        StepEvent::Suspend(WORK)
    }

    fn drain(&mut self) -> StepEvent {
        self.produced.push(u32::MAX);
        StepEvent::Finish
    }
}

impl Body for Pipeline {
    fn points() -> &'static [Point] {
        &[WARMUP, WORK, DRAIN]
    }

    fn advance(&mut self, entry: Entry) -> StepEvent {
        match entry {
            Entry::Start => self.enter(),
            Entry::Resume(WARMUP) | Entry::Resume(WORK) => self.work(),
            Entry::Resume(DRAIN) => self.drain(),
            Entry::Resume(point) => unreachable!("undeclared point {point}"),
        }
    }
}

fn jump_table() -> JumpDispatch<Pipeline> {
    JumpDispatch::new(
        Pipeline::enter as Handler<Pipeline>,
        &[
            (WARMUP, Pipeline::work as Handler<Pipeline>),
            (WORK, Pipeline::work),
            (DRAIN, Pipeline::drain),
        ],
    )
    .unwrap()
}

// =============================================================================
// P6: Strategy Equivalence
// =============================================================================

#[test]
fn both_strategies_observe_identical_runs() {
    let mut by_match = Machine::new(Pipeline::new(5)).unwrap();
    let mut by_jump = Machine::with_dispatch(Pipeline::new(5), jump_table()).unwrap();

    loop {
        let a = by_match.step();
        let b = by_jump.step();
        assert_eq!(a, b);
        assert_eq!(by_match.raw_key(), by_jump.raw_key());
        assert_eq!(by_match.body().produced, by_jump.body().produced);
        if a.is_done() {
            break;
        }
    }
}

fn count<D: restep::Dispatch<Pipeline>>(mut machine: Machine<Pipeline, D>) -> u32 {
    let mut steps = 0;
    while !machine.step().is_done() {
        steps += 1;
    }
    steps
}

#[test]
fn both_strategies_terminate_at_the_same_step() {
    for budget in [0, 1, 2, 7] {
        let by_match = count(Machine::new(Pipeline::new(budget)).unwrap());
        let by_jump = count(Machine::with_dispatch(Pipeline::new(budget), jump_table()).unwrap());
        assert_eq!(by_match, by_jump, "budget {budget}");
    }
}

#[test]
fn strategies_park_at_identical_raw_keys_mid_run() {
    // Drive both machines to the same suspension and compare the packed
    // keys a caller would persist, then let both run out.
    let mut by_match = Machine::new(Pipeline::new(3)).unwrap();
    by_match.step();
    by_match.step();

    let mut by_jump =
        Machine::with_dispatch(Pipeline::new(3), jump_table()).unwrap();
    by_jump.step();
    by_jump.step();
    assert_eq!(by_match.raw_key(), by_jump.raw_key());

    loop {
        let a = by_match.step();
        let b = by_jump.step();
        assert_eq!(a, b);
        if a.is_done() {
            break;
        }
    }
    assert_eq!(by_match.body().produced, by_jump.body().produced);
}

// =============================================================================
// P7: Construction-Time Rejection
// =============================================================================

#[test]
fn jump_table_must_cover_every_declared_point() {
    let result = JumpDispatch::<Pipeline>::new(
        Pipeline::enter as Handler<Pipeline>,
        &[
            (WARMUP, Pipeline::work as Handler<Pipeline>),
            (WORK, Pipeline::work),
        ],
    );
    assert_eq!(
        result.unwrap_err(),
        BuildError::HandlerCount {
            expected: 3,
            found: 2
        }
    );
}

#[test]
fn jump_table_arms_must_match_declaration_order() {
    let result = JumpDispatch::<Pipeline>::new(
        Pipeline::enter as Handler<Pipeline>,
        &[
            (WARMUP, Pipeline::work as Handler<Pipeline>),
            (DRAIN, Pipeline::drain),
            (WORK, Pipeline::work),
        ],
    );
    assert_eq!(
        result.unwrap_err(),
        BuildError::HandlerPoint {
            slot: 1,
            expected: WORK.id(),
            found: DRAIN.id(),
        }
    );
}
