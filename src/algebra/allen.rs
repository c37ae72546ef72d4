//! Allen interval algebra classifier.
//!
//! Two variants share the vocabulary but not the arithmetic:
//!
//! - [`classify`] works on continuous intervals (box axes). Touching
//!   endpoints meet; the decision order below is load-bearing because
//!   several relations are mutually exclusive only by short-circuit.
//! - [`classify_frames`] works on inclusive integer frame spans, where
//!   spans separated by exactly one frame meet. It is total: chord
//!   derivation enumerates durations exhaustively and needs a defined
//!   answer for every pair.

use crate::model::{AllenRelation, FrameSpan, Interval};
use crate::Result;

/// Classify two continuous 1D intervals into one Allen relation.
///
/// Checks, in order, the seven relations where `i1` does not start
/// after `i2`; any remaining pair is the inverse of its swap.
///
/// Errors if either interval carries a NaN endpoint.
pub fn classify(i1: Interval, i2: Interval) -> Result<AllenRelation> {
    i1.validate()?;
    i2.validate()?;

    let (a1, b1) = (i1.lo, i1.hi);
    let (a2, b2) = (i2.lo, i2.hi);

    if b1 < a2 {
        return Ok(AllenRelation::Before);
    }
    if b1 == a2 {
        return Ok(AllenRelation::Meets);
    }
    if a1 < a2 && a2 < b1 && b1 < b2 {
        return Ok(AllenRelation::Overlaps);
    }
    if a1 == a2 && b1 < b2 {
        return Ok(AllenRelation::Starts);
    }
    if a2 < a1 && a1 < b2 && a2 < b1 && b1 < b2 {
        return Ok(AllenRelation::During);
    }
    if a2 < a1 && a1 < b2 && b1 == b2 {
        return Ok(AllenRelation::Finishes);
    }
    if a1 == a2 && b1 == b2 {
        return Ok(AllenRelation::Equals);
    }

    // The seven checks above cover every relation in which i1 does not
    // start strictly after i2, so the swapped call cannot recurse twice.
    Ok(classify(i2, i1)?.inverse())
}

/// Classify two inclusive frame spans into one Allen relation.
///
/// Frame counts are discrete: spans separated by exactly one frame
/// (`d2.start - 1 == d1.end`) meet rather than merely precede. Total
/// over all well-formed spans.
pub fn classify_frames(d1: FrameSpan, d2: FrameSpan) -> AllenRelation {
    let (s1, e1) = (d1.start, d1.end);
    let (s2, e2) = (d2.start, d2.end);

    if s2 - 1 == e1 {
        AllenRelation::Meets
    } else if s1 - 1 == e2 {
        AllenRelation::MetBy
    } else if s1 == s2 && e1 == e2 {
        AllenRelation::Equals
    } else if s2 > e1 {
        AllenRelation::Before
    } else if s1 > e2 {
        AllenRelation::After
    } else if e1 >= s2 && e1 < e2 && s1 < s2 {
        AllenRelation::Overlaps
    } else if e2 >= s1 && e2 < e1 && s2 < s1 {
        AllenRelation::OverlappedBy
    } else if s1 > s2 && e1 < e2 {
        AllenRelation::During
    } else if s1 < s2 && e1 > e2 {
        AllenRelation::Contains
    } else if s1 == s2 && e1 < e2 {
        AllenRelation::Starts
    } else if s1 == s2 && e1 > e2 {
        AllenRelation::StartedBy
    } else if e1 == e2 && s2 < s1 {
        AllenRelation::Finishes
    } else {
        // Remaining case: e1 == e2 and s1 < s2.
        AllenRelation::FinishedBy
    }
}
