//! 1D intervals — spatial projections and temporal durations.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Frame identifier. Frames are discrete and totally ordered.
pub type FrameId = i64;

/// A closed 1D interval over the reals, `lo <= hi`.
///
/// Represents either one axis of a bounding box or a continuous
/// duration. A degenerate interval (`lo == hi`) is legal; an undefined
/// (NaN) endpoint is a hard error at construction and at every use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lo: f64,
    pub hi: f64,
}

impl Interval {
    /// Build an interval, rejecting NaN endpoints and inverted bounds.
    pub fn new(lo: f64, hi: f64) -> Result<Self> {
        if lo.is_nan() || hi.is_nan() || lo > hi {
            return Err(Error::InvalidInterval { lo, hi });
        }
        Ok(Self { lo, hi })
    }

    /// Re-check the NaN invariant. Fields are public, so boundary code
    /// validates again before classifying.
    pub fn validate(&self) -> Result<()> {
        if self.lo.is_nan() || self.hi.is_nan() {
            return Err(Error::InvalidInterval { lo: self.lo, hi: self.hi });
        }
        Ok(())
    }

    pub fn is_degenerate(&self) -> bool {
        self.lo == self.hi
    }
}

/// An inclusive span of frames `[start, end]`.
///
/// The temporal analogue of [`Interval`], but discrete: two spans
/// separated by exactly one frame are considered to meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FrameSpan {
    pub start: FrameId,
    pub end: FrameId,
}

impl FrameSpan {
    pub fn new(start: FrameId, end: FrameId) -> Self {
        Self { start, end }
    }

    /// Number of frames covered, inclusive of both endpoints.
    pub fn len(&self) -> i64 {
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    pub fn contains(&self, frame: FrameId) -> bool {
        self.start <= frame && frame <= self.end
    }
}

impl std::fmt::Display for FrameSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
