//! Resume-key encoding and lifecycle state.
//!
//! The resume key is the *entire* continuation of a suspended generator: no
//! saved stack, no saved registers. It packs the lifecycle tag and the
//! suspension-point id into a single u32 so a step can check state and pick
//! its dispatch target from one load.
//!
//! # Encoding
//!
//! ```text
//! Bits 0-1:  Tag (Initial=0, Active=1, Done=2; 3 is never written)
//! Bits 2-31: Suspension point id (meaningful only when Active)
//! ```
//!
//! A raw value of `0` is exactly the initial key, so a zeroed record is a
//! fresh instance. `Done` always clears the point bits, so the terminal key
//! is a single distinguished value. Every other bit pattern fails to decode
//! and is treated as corruption by the engine.

use crate::point::Point;
use std::fmt;

/// Number of bits used by the lifecycle tag.
const TAG_BITS: u32 = 2;

/// Mask extracting the lifecycle tag.
const TAG_MASK: u32 = (1 << TAG_BITS) - 1;

const TAG_INITIAL: u32 = 0;
const TAG_ACTIVE: u32 = 1;
const TAG_DONE: u32 = 2;

// ============================================================================
// Lifecycle State
// ============================================================================

/// The decoded lifecycle state of a generator instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Never started; the next step enters the body at its start.
    Initial,
    /// Parked immediately after the given suspension point.
    Active(Point),
    /// Finished; every further step is a no-op.
    Done,
}

impl State {
    /// Returns true if a step would execute body code from this state.
    #[inline(always)]
    pub const fn is_runnable(self) -> bool {
        matches!(self, Self::Initial | Self::Active(_))
    }

    /// Returns true if the generator has terminated.
    #[inline(always)]
    pub const fn is_done(self) -> bool {
        matches!(self, Self::Done)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initial => f.write_str("initial"),
            Self::Active(point) => write!(f, "active({})", point.id()),
            Self::Done => f.write_str("done"),
        }
    }
}

// ============================================================================
// Resume Key
// ============================================================================

/// Packed resume key: lifecycle tag + suspension point id in one u32.
///
/// The engine is the only writer under normal operation. The raw value is
/// exposed for persistence (`raw`/`from_raw`); a record rehydrated with bits
/// the owning body never emitted faults at the next step.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResumeKey {
    bits: u32,
}

impl ResumeKey {
    /// The initial key. Raw value zero.
    #[inline(always)]
    pub const fn initial() -> Self {
        Self { bits: TAG_INITIAL }
    }

    /// An active key parked after `point`.
    #[inline(always)]
    pub const fn active(point: Point) -> Self {
        debug_assert!(point.id() <= Point::MAX_ID);
        Self {
            bits: (point.id() << TAG_BITS) | TAG_ACTIVE,
        }
    }

    /// The terminal key.
    #[inline(always)]
    pub const fn done() -> Self {
        Self { bits: TAG_DONE }
    }

    /// Decodes the key, or `None` if the bits do not form a valid key.
    ///
    /// Validity here is purely structural; whether an `Active` point id was
    /// actually declared by a body is checked against that body's point
    /// table at dispatch time.
    #[inline]
    pub const fn decode(self) -> Option<State> {
        let tag = self.bits & TAG_MASK;
        let point = self.bits >> TAG_BITS;
        if tag == TAG_ACTIVE {
            return Some(State::Active(Point::new(point)));
        }
        if point != 0 {
            // Initial and Done carry no point bits.
            return None;
        }
        match tag {
            TAG_INITIAL => Some(State::Initial),
            TAG_DONE => Some(State::Done),
            _ => None,
        }
    }

    /// Returns the packed bits, e.g. for persisting an instance.
    #[inline(always)]
    pub const fn raw(self) -> u32 {
        self.bits
    }

    /// Reconstructs a key from packed bits.
    ///
    /// No validation happens here; invalid bits surface as a corrupted-state
    /// fault when the engine next reads the key.
    #[inline(always)]
    pub const fn from_raw(bits: u32) -> Self {
        Self { bits }
    }
}

impl Default for ResumeKey {
    #[inline]
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Debug for ResumeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.decode() {
            Some(state) => write!(f, "ResumeKey({state})"),
            None => write!(f, "ResumeKey(corrupt: {:#010x})", self.bits),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
