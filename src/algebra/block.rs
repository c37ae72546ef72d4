//! Block algebra composer — Allen's algebra per axis over 3D boxes.

use serde::{Deserialize, Serialize};

use super::allen::classify;
use crate::model::{BlockRelation, Interval, MinimalExtents, ObjectState};
use crate::{Error, Result};

/// Axis-aligned 3D box, one interval per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox3d {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl BoundingBox3d {
    /// Derive a box from an entity's pose: center ± size/2 per axis,
    /// with the configured minimal size standing in for missing extents.
    pub fn from_state(state: &ObjectState, minima: MinimalExtents) -> Result<Self> {
        let xsize = state.xsize.unwrap_or(minima.x);
        let ysize = state.ysize.unwrap_or(minima.y);
        let zsize = state.zsize.unwrap_or(minima.z);

        Ok(Self {
            x: Interval::new(state.x - xsize / 2.0, state.x + xsize / 2.0)?,
            y: Interval::new(state.y - ysize / 2.0, state.y + ysize / 2.0)?,
            z: Interval::new(state.z - zsize / 2.0, state.z + zsize / 2.0)?,
        })
    }

    pub fn axes(&self) -> [Interval; 3] {
        [self.x, self.y, self.z]
    }
}

/// Compose the block algebra relation between two entity poses.
///
/// Classifies each axis independently and joins the three labels in
/// x, y, z order. Errors propagate from box derivation (NaN center or
/// extent) and from the per-axis classifier.
pub fn compose(a: &ObjectState, b: &ObjectState, minima: MinimalExtents) -> Result<BlockRelation> {
    let bb1 = BoundingBox3d::from_state(a, minima)?;
    let bb2 = BoundingBox3d::from_state(b, minima)?;
    compose_boxes(&bb1.axes(), &bb2.axes())
}

/// Compose a block relation from raw per-axis intervals.
///
/// The slices must both be exactly 3-dimensional; anything else is a
/// malformed bounding box, reported before any axis is classified.
pub fn compose_boxes(bb1: &[Interval], bb2: &[Interval]) -> Result<BlockRelation> {
    if bb1.len() != 3 || bb2.len() != 3 {
        return Err(Error::MalformedBoundingBox(format!(
            "expected 3 axes per box, got {} and {}",
            bb1.len(),
            bb2.len()
        )));
    }
    Ok(BlockRelation::new(
        classify(bb1[0], bb2[0])?,
        classify(bb1[1], bb2[1])?,
        classify(bb1[2], bb2[2])?,
    ))
}
