//! Episodes and chords — the compressed temporal building blocks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::{FrameSpan, QsrValue, RelationKind};
use crate::{Error, Result};

// ============================================================================
// Object pairs
// ============================================================================

/// Ordered pair of tracked entity identifiers.
///
/// Order matters: relations are directional, `rel(A, B)` is the inverse
/// of `rel(B, A)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectPair {
    pub first: String,
    pub second: String,
}

impl ObjectPair {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self { first: first.into(), second: second.into() }
    }

    /// Both entity names, in pair order.
    pub fn names(&self) -> [&str; 2] {
        [&self.first, &self.second]
    }
}

impl std::fmt::Display for ObjectPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.first, self.second)
    }
}

impl std::str::FromStr for ObjectPair {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(',') {
            Some((a, b)) if !a.is_empty() && !b.is_empty() && !b.contains(',') => {
                Ok(ObjectPair::new(a, b))
            }
            _ => Err(Error::TraceShape(format!(
                "object pair key must be exactly two comma-separated names, got {s:?}"
            ))),
        }
    }
}

// ============================================================================
// Episodes
// ============================================================================

/// Identifier assigned to an episode within one enumeration round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EpisodeId(pub u64);

impl std::fmt::Display for EpisodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A maximal run of frames over which an object pair's relation values
/// are constant.
///
/// Invariants: the relation mapping is constant across `span`; episodes
/// for one pair are contiguous, non-overlapping, and jointly cover
/// every observed frame for that pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub objects: ObjectPair,
    /// Relation values, keyed by kind. Deterministic iteration order.
    pub relations: BTreeMap<RelationKind, QsrValue>,
    pub span: FrameSpan,
}

impl Episode {
    pub fn new(
        objects: ObjectPair,
        relations: BTreeMap<RelationKind, QsrValue>,
        span: FrameSpan,
    ) -> Self {
        Self { objects, relations, span }
    }

    /// True if any relation value is the reserved ignore marker.
    pub fn is_ignored(&self) -> bool {
        self.relations.values().any(QsrValue::is_ignore)
    }

    /// Combined relation label, e.g. `"ba:<,m,= rcc3:dc"`.
    pub fn relation_label(&self) -> String {
        let parts: Vec<String> = self
            .relations
            .iter()
            .map(|(kind, value)| format!("{kind}:{value}"))
            .collect();
        parts.join(" ")
    }
}

impl std::fmt::Display for Episode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.objects, self.relation_label(), self.span)
    }
}

// ============================================================================
// Chords
// ============================================================================

/// Sorted set of episode ids active over one chord.
pub type ActiveSet = SmallVec<[EpisodeId; 8]>;

/// A maximal sub-interval of a pooled timeline over which the set of
/// active episodes is constant.
///
/// Chords produced from one episode pool partition the scanned frame
/// range: consecutive, non-overlapping, gap-free.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chord {
    pub span: FrameSpan,
    /// Active episode ids, sorted ascending.
    pub active: ActiveSet,
}

impl Chord {
    pub fn new(span: FrameSpan, mut active: ActiveSet) -> Self {
        active.sort_unstable();
        Self { span, active }
    }

    pub fn is_active(&self, id: EpisodeId) -> bool {
        self.active.binary_search(&id).is_ok()
    }
}
