//! Frame-indexed relation streams — the input contract of the core.

use std::collections::BTreeMap;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::{FrameId, ObjectPair, QsrValue, RelationKind};

/// Relation values observed for the pairs active at one frame.
pub type FrameQsrs = HashMap<ObjectPair, BTreeMap<RelationKind, QsrValue>>;

/// A per-frame stream of qualitative relations between object pairs.
///
/// Frames are keyed in a `BTreeMap`, so iteration is always in
/// increasing frame order. Not every pair must appear at every frame;
/// the compressor treats each pair's observed frames independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QsrTrace {
    trace: BTreeMap<FrameId, FrameQsrs>,
}

impl QsrTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one relation value at one frame. Overwrites any previous
    /// value for the same (frame, pair, kind) slot.
    pub fn add_qsr(
        &mut self,
        frame: FrameId,
        objects: ObjectPair,
        kind: RelationKind,
        value: QsrValue,
    ) {
        self.trace
            .entry(frame)
            .or_default()
            .entry(objects)
            .or_default()
            .insert(kind, value);
    }

    /// All frame identifiers, ascending.
    pub fn sorted_frames(&self) -> Vec<FrameId> {
        self.trace.keys().copied().collect()
    }

    pub fn frame(&self, frame: FrameId) -> Option<&FrameQsrs> {
        self.trace.get(&frame)
    }

    pub fn is_empty(&self) -> bool {
        self.trace.is_empty()
    }

    /// Number of frames with at least one observation.
    pub fn len(&self) -> usize {
        self.trace.len()
    }

    /// Iterate every observation as `(frame, pair, kind, value)`,
    /// frames ascending.
    pub fn iter(&self) -> impl Iterator<Item = (FrameId, &ObjectPair, RelationKind, &QsrValue)> {
        self.trace.iter().flat_map(|(frame, qsrs)| {
            qsrs.iter().flat_map(move |(objects, rels)| {
                rels.iter().map(move |(kind, value)| (*frame, objects, *kind, value))
            })
        })
    }
}
