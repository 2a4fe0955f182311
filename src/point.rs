//! Suspension points and the per-body point table.
//!
//! Every suspension point in a generator body is identified by a small
//! integer id, unique within that body. The body declares its points up
//! front; the table built from that declaration is what makes resume
//! dispatch unambiguous and lets the engine reject keys the body never
//! emitted.
//!
//! Ids must be declared in strictly increasing order, mirroring the order
//! the suspensions appear in the body's control flow. The check runs at
//! construction time, so a table that builds at all is internally
//! consistent.
//!
//! # Dense vs sparse
//!
//! Tables whose ids are exactly `0..n` resolve a point to its slot by
//! direct index. Anything else falls back to a prebuilt `FxHashMap`
//! lookup. Small tables (≤8 points, the common case) stay inline with no
//! heap allocation.

use crate::error::{BuildError, BuildResult};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::fmt;

/// Inline table capacity before spilling to heap.
pub const INLINE_POINTS: usize = 8;

// ============================================================================
// Point
// ============================================================================

/// A suspension-point identifier, unique within one generator body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point(u32);

impl Point {
    /// Largest representable id (30 bits; the resume key reserves two).
    pub const MAX_ID: u32 = (1 << 30) - 1;

    /// Creates a point with the given id.
    ///
    /// Range is enforced when the id enters a table, not here, so points
    /// can be built in const contexts.
    #[inline(always)]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    #[inline(always)]
    pub const fn id(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// Point Table
// ============================================================================

/// The registered suspension points of one generator body.
///
/// Built once per body type and consulted on every step: an active resume
/// key is only honored if its point is in here.
#[derive(Debug, Clone)]
pub struct PointTable {
    /// Ids in declaration order, strictly increasing.
    ids: SmallVec<[u32; INLINE_POINTS]>,
    /// Id → slot map, present only when ids are not exactly `0..n`.
    sparse: Option<FxHashMap<u32, u32>>,
}

impl PointTable {
    /// Builds a table from a declaration slice.
    pub fn from_points(points: &[Point]) -> BuildResult<Self> {
        let mut builder = PointTableBuilder::with_capacity(points.len());
        for &point in points {
            builder.add(point)?;
        }
        Ok(builder.build())
    }

    /// Returns the slot of `point` in declaration order, if registered.
    #[inline]
    pub fn slot_of(&self, point: Point) -> Option<usize> {
        let id = point.id();
        match &self.sparse {
            Some(map) => map.get(&id).map(|&slot| slot as usize),
            // Dense: ids are exactly 0..n, the id is its own slot.
            None => ((id as usize) < self.ids.len()).then_some(id as usize),
        }
    }

    /// Returns true if `point` is registered.
    #[inline(always)]
    pub fn contains(&self, point: Point) -> bool {
        self.slot_of(point).is_some()
    }

    /// Returns the point at `slot`, if any.
    #[inline]
    pub fn get(&self, slot: usize) -> Option<Point> {
        self.ids.get(slot).map(|&id| Point::new(id))
    }

    /// Returns the number of registered points.
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if the body declares no suspension points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns true if ids are contiguous from zero (direct-index lookup).
    #[inline]
    pub fn is_dense(&self) -> bool {
        self.sparse.is_none()
    }

    /// Iterates the points in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.ids.iter().map(|&id| Point::new(id))
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Incremental [`PointTable`] construction with contract checks.
#[derive(Debug, Default)]
pub struct PointTableBuilder {
    ids: SmallVec<[u32; INLINE_POINTS]>,
}

impl PointTableBuilder {
    /// Creates an empty builder.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder sized for `capacity` points.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: SmallVec::with_capacity(capacity),
        }
    }

    /// Registers the next suspension point.
    ///
    /// Returns the point's slot. Fails if the id is out of range, repeats
    /// the previous id, or is not strictly greater than it.
    pub fn add(&mut self, point: Point) -> BuildResult<usize> {
        let id = point.id();
        if id > Point::MAX_ID {
            return Err(BuildError::PointOutOfRange(id));
        }
        if let Some(&prev) = self.ids.last() {
            if id == prev {
                return Err(BuildError::DuplicatePoint(id));
            }
            if id < prev {
                return Err(BuildError::UnorderedPoint { prev, found: id });
            }
        }
        self.ids.push(id);
        Ok(self.ids.len() - 1)
    }

    /// Returns the number of points registered so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if nothing has been registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Finalizes the table, choosing dense or sparse lookup.
    pub fn build(self) -> PointTable {
        let dense = self
            .ids
            .iter()
            .enumerate()
            .all(|(slot, &id)| id as usize == slot);
        let sparse = if dense {
            None
        } else {
            let mut map =
                FxHashMap::with_capacity_and_hasher(self.ids.len(), Default::default());
            for (slot, &id) in self.ids.iter().enumerate() {
                map.insert(id, slot as u32);
            }
            Some(map)
        };
        PointTable {
            ids: self.ids,
            sparse,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
