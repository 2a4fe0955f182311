//! The caller-owned generator instance and the step engine.
//!
//! A [`Machine`] is the persistent record for one generator instance: the
//! packed resume key plus the author's payload struct. The caller owns it
//! for its whole lifetime; the engine allocates nothing, frees nothing,
//! and mutates exactly one field on the caller's behalf: the key.
//!
//! # One step
//!
//! ```text
//! step():
//!   decode key ──► Initial          ──► enter body at Start
//!              ──► Active(p), known ──► enter body after p
//!              ──► Done             ──► return, no body code (no-op)
//!              ──► anything else    ──► corrupted-state fault (panic)
//!   run body until it reports an event:
//!     Suspend(p) ──► key = Active(p), return control
//!     Finish     ──► key = Done, return control (one-directional)
//! ```
//!
//! Scheduling is strictly single-threaded, cooperative, synchronous:
//! `step` takes `&mut self`, so sequential use by one owner is enforced by
//! the borrow checker, and the key is a plain field with no internal
//! synchronization. Distinct machines are fully independent.

use crate::dispatch::{Body, Dispatch, Entry, MatchDispatch, StepEvent};
use crate::error::BuildResult;
use crate::point::{Point, PointTable};
use crate::state::{ResumeKey, State};
use std::fmt;

// ============================================================================
// Step Status
// ============================================================================

/// The observable outcome of one step.
///
/// Carries the same information as [`Machine::state`] after the step;
/// produced values travel through payload fields, not through this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepStatus {
    /// The body parked at the given suspension point.
    Suspended(Point),
    /// The instance is terminal (either it finished this step, or it was
    /// already terminal and the step was a no-op).
    Done,
}

impl StepStatus {
    /// Returns true if the instance is terminal.
    #[inline(always)]
    pub const fn is_done(self) -> bool {
        matches!(self, Self::Done)
    }
}

// ============================================================================
// Machine
// ============================================================================

/// A generator instance: resume key + payload, stepped by its owner.
///
/// `D` selects the dispatch strategy; the default [`MatchDispatch`] needs
/// no setup. See [`JumpDispatch`](crate::JumpDispatch) for the
/// direct-address alternative.
///
/// Cloning a machine mid-flight clones its continuation along with the
/// payload; running both copies is well-defined but rarely what you want.
#[derive(Clone)]
pub struct Machine<B: Body, D: Dispatch<B> = MatchDispatch> {
    /// The entire continuation. Only `step` writes it.
    key: ResumeKey,
    /// Declared suspension points, validated at construction.
    table: PointTable,
    dispatch: D,
    body: B,
}

impl<B: Body> Machine<B, MatchDispatch> {
    /// Creates a fresh instance around a caller-initialized payload.
    ///
    /// The resume key starts at initial; the body's point declaration is
    /// checked here (duplicate or out-of-order ids fail).
    pub fn new(body: B) -> BuildResult<Self> {
        Self::with_dispatch(body, MatchDispatch)
    }

    /// Rehydrates an instance from a persisted raw key.
    ///
    /// The key is not validated here; bits the body never emitted fault at
    /// the next [`step`](Machine::step), before any body code runs.
    pub fn with_raw_key(body: B, raw: u32) -> BuildResult<Self> {
        let mut machine = Self::new(body)?;
        machine.key = ResumeKey::from_raw(raw);
        Ok(machine)
    }
}

impl<B: Body, D: Dispatch<B>> Machine<B, D> {
    /// Creates a fresh instance with an explicit dispatch strategy.
    pub fn with_dispatch(body: B, dispatch: D) -> BuildResult<Self> {
        Ok(Self {
            key: ResumeKey::initial(),
            table: PointTable::from_points(B::points())?,
            dispatch,
            body,
        })
    }

    /// Runs one step: from the current resume key to the next suspension
    /// or to termination.
    ///
    /// Stepping a terminal instance is a defined no-op that touches
    /// neither the key nor the payload.
    ///
    /// # Panics
    ///
    /// Panics if the resume key does not correspond to a reachable
    /// continuation of this body (it was mutated or persisted
    /// incompatibly), or if the body suspends at a point it never
    /// declared. Continuing from an undefined location would be unsound,
    /// so neither case is recoverable.
    pub fn step(&mut self) -> StepStatus {
        let entry = match self.key.decode() {
            Some(State::Initial) => Entry::Start,
            Some(State::Active(point)) => {
                if !self.table.contains(point) {
                    corrupted_key(self.key.raw());
                }
                Entry::Resume(point)
            }
            Some(State::Done) => return StepStatus::Done,
            None => corrupted_key(self.key.raw()),
        };

        match self.dispatch.run(&mut self.body, entry) {
            StepEvent::Suspend(point) => {
                if !self.table.contains(point) {
                    undeclared_suspend(point);
                }
                self.key = ResumeKey::active(point);
                StepStatus::Suspended(point)
            }
            StepEvent::Finish => {
                self.key = ResumeKey::done();
                StepStatus::Done
            }
        }
    }

    /// Reports whether the instance is initial, active (and where), or
    /// terminal, without running any body code.
    ///
    /// # Panics
    ///
    /// Panics on a structurally corrupt key, same as [`step`](Machine::step).
    pub fn state(&self) -> State {
        match self.key.decode() {
            Some(state) => state,
            None => corrupted_key(self.key.raw()),
        }
    }

    /// Returns true if the instance is terminal.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.key == ResumeKey::done()
    }

    /// The packed resume key, e.g. for persisting the instance.
    #[inline]
    pub fn raw_key(&self) -> u32 {
        self.key.raw()
    }

    /// The declared suspension points of this body.
    #[inline]
    pub fn points(&self) -> &PointTable {
        &self.table
    }

    /// Read access to the payload fields.
    #[inline]
    pub fn body(&self) -> &B {
        &self.body
    }

    /// Write access to the payload fields, e.g. to feed inputs between
    /// steps. The resume key is not reachable through here.
    #[inline]
    pub fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }

    /// Consumes the machine, abandoning the continuation and returning the
    /// payload. No cleanup runs; this is how cancellation looks.
    #[inline]
    pub fn into_body(self) -> B {
        self.body
    }
}

impl<B: Body + fmt::Debug, D: Dispatch<B>> fmt::Debug for Machine<B, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("key", &self.key)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Faults
// ============================================================================

/// The record does not correspond to a reachable continuation of this
/// body. Executing anyway would run undefined code, so this is fatal.
#[cold]
#[inline(never)]
fn corrupted_key(raw: u32) -> ! {
    panic!("corrupted resume key {raw:#010x}: not a reachable continuation of this body");
}

/// The body reported a suspension point missing from its own declaration.
#[cold]
#[inline(never)]
fn undeclared_suspend(point: Point) -> ! {
    panic!("body suspended at undeclared point {point}");
}

// ============================================================================
// Tests
// ============================================================================
