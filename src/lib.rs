//! Stackless resumable generators.
//!
//! This crate provides the runtime core for computations that suspend at a
//! point, return control to their caller, and later resume exactly where
//! they left off, with no dedicated execution stack per instance. The
//! entire continuation of a suspended generator is a single packed integer,
//! the *resume key*; everything else that must survive a suspension lives
//! in a caller-owned payload struct.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                     Machine<B, D>                         │
//! ├───────────────────────────────────────────────────────────┤
//! │  ResumeKey (u32)   │ tag + suspension point, the whole    │
//! │                    │ continuation                         │
//! │  PointTable        │ declared points, dense or sparse     │
//! │  D: Dispatch<B>    │ MatchDispatch | JumpDispatch         │
//! │  B: Body           │ the author's payload + advance()     │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! One `step()` decodes the key, enters the body at the matching location,
//! runs until the body suspends or finishes, and writes the key back.
//! Stepping a finished machine is a no-op; a key the body never emitted is
//! a fatal contract violation.
//!
//! # Example
//!
//! ```
//! use restep::{Body, Entry, Machine, Point, StepEvent};
//!
//! const EMIT: Point = Point::new(0);
//!
//! /// Counts 0, 1, 2, ... through the `i` field, one step at a time.
//! struct Counter {
//!     i: u64,
//! }
//!
//! impl Body for Counter {
//!     fn points() -> &'static [Point] {
//!         &[EMIT]
//!     }
//!
//!     fn advance(&mut self, entry: Entry) -> StepEvent {
//!         match entry {
//!             // for i = 0; ; i += 1 { suspend }
//!             Entry::Start => StepEvent::Suspend(EMIT),
//!             Entry::Resume(_) => {
//!                 self.i += 1;
//!                 StepEvent::Suspend(EMIT)
//!             }
//!         }
//!     }
//! }
//!
//! let mut counter = Machine::new(Counter { i: 0 })?;
//! counter.step();
//! assert_eq!(counter.body().i, 0);
//! counter.step();
//! assert_eq!(counter.body().i, 1);
//! counter.step();
//! assert_eq!(counter.body().i, 2);
//! # Ok::<(), restep::BuildError>(())
//! ```
//!
//! # Discipline
//!
//! - All data that crosses a suspension lives in the `Body` struct; locals
//!   inside `advance` are step-scoped temporaries only.
//! - One logical owner steps a machine; `&mut self` makes anything else a
//!   compile error rather than a data race.
//! - Yielded values have no separate channel: assign an observable payload
//!   field before suspending and let the caller read it.

pub mod dispatch;
pub mod error;
pub mod machine;
pub mod point;
pub mod state;

pub use dispatch::{Body, Dispatch, Entry, Handler, JumpDispatch, MatchDispatch, StepEvent};
pub use error::{BuildError, BuildResult};
pub use machine::{Machine, StepStatus};
pub use point::{Point, PointTable, PointTableBuilder, INLINE_POINTS};
pub use state::{ResumeKey, State};
