//! The author-facing body contract and resume dispatch strategies.
//!
//! A generator body is written as a match over its entry point: each arm
//! runs sequential code against the payload fields and ends by reporting
//! where execution parked. The engine owns the resume key; the body only
//! ever sees a decoded [`Entry`] and returns a [`StepEvent`].
//!
//! # Two dispatch strategies, one contract
//!
//! - [`MatchDispatch`] hands the entry to the body's own exhaustive match.
//!   A dense match lowers to a branch table; this is the zero-setup default.
//! - [`JumpDispatch`] resolves the entry to a per-point function pointer
//!   built once per body type, the moral equivalent of storing a code
//!   address at each suspension point.
//!
//! Both must produce bit-identical external behavior: same suspension
//! sequence, same payload mutations, same termination point. The choice is
//! invisible to callers.

use crate::error::{BuildError, BuildResult};
use crate::point::{Point, PointTable};

// ============================================================================
// Entry / Step Event
// ============================================================================

/// Where a step enters the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entry {
    /// First step of a fresh instance: the start of the body.
    Start,
    /// Resuming immediately after the given suspension point.
    Resume(Point),
}

/// What the body reports at the end of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepEvent {
    /// Park here; the next step resumes immediately after `Point`.
    ///
    /// The point must be one the body declared in [`Body::points`].
    Suspend(Point),
    /// Terminal. Nothing after this in the same step runs, and no later
    /// step ever re-enters the body.
    Finish,
}

// ============================================================================
// Body
// ============================================================================

/// A generator body: a named sequential computation with suspension points.
///
/// The implementing type *is* the persistent record: every value that must
/// survive a suspension lives in its fields. Step-scoped temporaries are
/// ordinary locals inside [`advance`](Body::advance); anything assigned
/// before a suspend and read after one must be a field.
///
/// One impl per type; the compiler enforces the define-once rule.
///
/// # Example
///
/// ```
/// use restep::{Body, Entry, Point, StepEvent};
///
/// const EMIT: Point = Point::new(0);
///
/// /// Yields `n`, `n - 1`, ..., `1`, then finishes.
/// struct Countdown {
///     n: u32,
/// }
///
/// impl Body for Countdown {
///     fn points() -> &'static [Point] {
///         &[EMIT]
///     }
///
///     fn advance(&mut self, entry: Entry) -> StepEvent {
///         match entry {
///             Entry::Start | Entry::Resume(EMIT) => {
///                 if self.n == 0 {
///                     return StepEvent::Finish;
///                 }
///                 self.n -= 1;
///                 StepEvent::Suspend(EMIT)
///             }
///             Entry::Resume(_) => unreachable!("undeclared point"),
///         }
///     }
/// }
/// ```
pub trait Body {
    /// The suspension points of this body, in strictly increasing id order,
    /// the order they appear in the body's control flow.
    ///
    /// Checked at machine construction; see
    /// [`BuildError`](crate::BuildError).
    fn points() -> &'static [Point];

    /// Runs body code from `entry` until the next suspend or finish.
    ///
    /// The engine guarantees `entry` is either `Start` or `Resume(p)` for a
    /// declared point `p`, and that it never calls this again after the
    /// body reports [`StepEvent::Finish`].
    fn advance(&mut self, entry: Entry) -> StepEvent;
}

// ============================================================================
// Dispatch Strategies
// ============================================================================

/// A resume-dispatch strategy: how a decoded entry reaches body code.
///
/// Strategies are interchangeable per [`Machine`](crate::Machine); external
/// behavior must not depend on the choice.
pub trait Dispatch<B: Body> {
    /// Routes one step's entry into the body and returns its event.
    fn run(&self, body: &mut B, entry: Entry) -> StepEvent;
}

/// Ordinal dispatch: defer to the body's own exhaustive match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchDispatch;

impl<B: Body> Dispatch<B> for MatchDispatch {
    #[inline(always)]
    fn run(&self, body: &mut B, entry: Entry) -> StepEvent {
        body.advance(entry)
    }
}

/// One arm of a [`JumpDispatch`] table.
pub type Handler<B> = fn(&mut B) -> StepEvent;

/// Direct-address dispatch: a per-point function-pointer table.
///
/// Built once per body type and shared by cloning. Resolution is a slot
/// lookup (direct index for dense ids) followed by an indirect call, with no
/// multi-way branch in the body.
pub struct JumpDispatch<B> {
    /// Handler for [`Entry::Start`].
    start: Handler<B>,
    /// Handlers in declaration order, one per suspension point.
    handlers: Vec<Handler<B>>,
    /// Point → slot resolution, mirroring the body's declaration.
    slots: PointTable,
}

impl<B: Body> JumpDispatch<B> {
    /// Builds a jump table from a start handler and per-point arms.
    ///
    /// The arms must bind every point the body declares, in the same
    /// order; any disagreement between table and body is rejected here
    /// rather than misdispatching later.
    pub fn new(start: Handler<B>, arms: &[(Point, Handler<B>)]) -> BuildResult<Self> {
        let declared = B::points();
        if arms.len() != declared.len() {
            return Err(BuildError::HandlerCount {
                expected: declared.len(),
                found: arms.len(),
            });
        }
        for (slot, (&(point, _), &expected)) in arms.iter().zip(declared).enumerate() {
            if point != expected {
                return Err(BuildError::HandlerPoint {
                    slot,
                    expected: expected.id(),
                    found: point.id(),
                });
            }
        }
        Ok(Self {
            start,
            handlers: arms.iter().map(|&(_, handler)| handler).collect(),
            slots: PointTable::from_points(declared)?,
        })
    }
}

impl<B: Body> Dispatch<B> for JumpDispatch<B> {
    #[inline]
    fn run(&self, body: &mut B, entry: Entry) -> StepEvent {
        match entry {
            Entry::Start => (self.start)(body),
            Entry::Resume(point) => match self.slots.slot_of(point) {
                Some(slot) => (self.handlers[slot])(body),
                // The engine validates the point against the same
                // declaration before dispatching.
                None => unreachable!("dispatched undeclared point {point}"),
            },
        }
    }
}

impl<B> Clone for JumpDispatch<B> {
    fn clone(&self) -> Self {
        Self {
            start: self.start,
            handlers: self.handlers.clone(),
            slots: self.slots.clone(),
        }
    }
}

impl<B> std::fmt::Debug for JumpDispatch<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JumpDispatch")
            .field("points", &self.slots)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
