//! Per-frame entity pose, as handed over by the upstream tracker.

use serde::{Deserialize, Serialize};

/// Position and optional extent of one tracked entity at one frame.
///
/// `None` extents mean the tracker reports a point on that axis — a
/// distinct condition from a zero-sized box. The block algebra composer
/// substitutes a configurable minimal size for missing extents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectState {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub xsize: Option<f64>,
    pub ysize: Option<f64>,
    pub zsize: Option<f64>,
}

impl ObjectState {
    /// A point entity: position only, no extents.
    pub fn point(name: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self { name: name.into(), x, y, z, xsize: None, ysize: None, zsize: None }
    }

    /// A boxed entity with extents on all three axes.
    pub fn boxed(
        name: impl Into<String>,
        x: f64,
        y: f64,
        z: f64,
        xsize: f64,
        ysize: f64,
        zsize: f64,
    ) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            z,
            xsize: Some(xsize),
            ysize: Some(ysize),
            zsize: Some(zsize),
        }
    }
}

/// Fallback axis sizes used when an entity reports no extent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MinimalExtents {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl MinimalExtents {
    pub fn uniform(size: f64) -> Self {
        Self { x: size, y: size, z: size }
    }
}
