//! Relation vocabularies — Allen's interval algebra, the block algebra
//! built on top of it, and the closed set of relation kinds.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ============================================================================
// Allen interval algebra
// ============================================================================

/// One of the 13 Allen interval relations.
///
/// The vocabulary is closed: every pair of valid intervals maps to
/// exactly one variant, and `inverse()` is a total involution —
/// `classify(b, a) == classify(a, b).inverse()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AllenRelation {
    /// `<` — strictly before.
    Before,
    /// `>` — strictly after.
    After,
    /// `m` — meets (end touches start).
    Meets,
    /// `mi` — met by.
    MetBy,
    /// `o` — overlaps.
    Overlaps,
    /// `oi` — overlapped by.
    OverlappedBy,
    /// `s` — starts.
    Starts,
    /// `si` — started by.
    StartedBy,
    /// `d` — during.
    During,
    /// `di` — contains.
    Contains,
    /// `f` — finishes.
    Finishes,
    /// `fi` — finished by.
    FinishedBy,
    /// `=` — equals.
    Equals,
}

impl AllenRelation {
    /// All 13 relations, in symbol-table order.
    pub const ALL: [AllenRelation; 13] = [
        AllenRelation::Before,
        AllenRelation::After,
        AllenRelation::Meets,
        AllenRelation::MetBy,
        AllenRelation::Overlaps,
        AllenRelation::OverlappedBy,
        AllenRelation::Starts,
        AllenRelation::StartedBy,
        AllenRelation::During,
        AllenRelation::Contains,
        AllenRelation::Finishes,
        AllenRelation::FinishedBy,
        AllenRelation::Equals,
    ];

    /// Canonical short symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            AllenRelation::Before => "<",
            AllenRelation::After => ">",
            AllenRelation::Meets => "m",
            AllenRelation::MetBy => "mi",
            AllenRelation::Overlaps => "o",
            AllenRelation::OverlappedBy => "oi",
            AllenRelation::Starts => "s",
            AllenRelation::StartedBy => "si",
            AllenRelation::During => "d",
            AllenRelation::Contains => "di",
            AllenRelation::Finishes => "f",
            AllenRelation::FinishedBy => "fi",
            AllenRelation::Equals => "=",
        }
    }

    /// The inverse relation: `rel(A, B).inverse() == rel(B, A)`.
    pub fn inverse(&self) -> AllenRelation {
        match self {
            AllenRelation::Before => AllenRelation::After,
            AllenRelation::After => AllenRelation::Before,
            AllenRelation::Meets => AllenRelation::MetBy,
            AllenRelation::MetBy => AllenRelation::Meets,
            AllenRelation::Overlaps => AllenRelation::OverlappedBy,
            AllenRelation::OverlappedBy => AllenRelation::Overlaps,
            AllenRelation::Starts => AllenRelation::StartedBy,
            AllenRelation::StartedBy => AllenRelation::Starts,
            AllenRelation::During => AllenRelation::Contains,
            AllenRelation::Contains => AllenRelation::During,
            AllenRelation::Finishes => AllenRelation::FinishedBy,
            AllenRelation::FinishedBy => AllenRelation::Finishes,
            AllenRelation::Equals => AllenRelation::Equals,
        }
    }
}

impl std::fmt::Display for AllenRelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl std::str::FromStr for AllenRelation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AllenRelation::ALL
            .iter()
            .find(|r| r.symbol() == s)
            .copied()
            .ok_or_else(|| Error::UnknownRelation(s.to_owned()))
    }
}

// ============================================================================
// Block algebra
// ============================================================================

/// Separator joining the per-axis symbols of a composite block label.
pub const BLOCK_SEPARATOR: char = ',';

/// Block algebra relation between two axis-aligned 3D boxes:
/// one Allen relation per axis, in fixed x, y, z order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockRelation {
    pub x: AllenRelation,
    pub y: AllenRelation,
    pub z: AllenRelation,
}

impl BlockRelation {
    pub fn new(x: AllenRelation, y: AllenRelation, z: AllenRelation) -> Self {
        Self { x, y, z }
    }

    /// Component-wise inverse.
    pub fn inverse(&self) -> BlockRelation {
        BlockRelation {
            x: self.x.inverse(),
            y: self.y.inverse(),
            z: self.z.inverse(),
        }
    }
}

impl std::fmt::Display for BlockRelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}",
            self.x,
            self.y,
            self.z,
            sep = BLOCK_SEPARATOR
        )
    }
}

impl std::str::FromStr for BlockRelation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(BLOCK_SEPARATOR).collect();
        if parts.len() != 3 {
            return Err(Error::UnknownRelation(s.to_owned()));
        }
        Ok(BlockRelation {
            x: parts[0].parse()?,
            y: parts[1].parse()?,
            z: parts[2].parse()?,
        })
    }
}

// ============================================================================
// Relation kinds
// ============================================================================

/// The closed set of qualitative relation kinds a trace may carry.
///
/// Kinds are a tagged enum rather than string keys: adding a kind is a
/// compiler-checked extension, and every consumer matches exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RelationKind {
    /// Block algebra over axis-aligned 3D boxes.
    BlockAlgebra,
    /// Region connection calculus (3 relations).
    Rcc3,
    /// Qualitative trajectory calculus.
    Qtc,
    /// Qualitative argument distance.
    ArgDistance,
    /// Moving-or-stationary.
    MovingOrStationary,
}

impl RelationKind {
    pub fn name(&self) -> &'static str {
        match self {
            RelationKind::BlockAlgebra => "ba",
            RelationKind::Rcc3 => "rcc3",
            RelationKind::Qtc => "qtcbs",
            RelationKind::ArgDistance => "argd",
            RelationKind::MovingOrStationary => "mos",
        }
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Relation values
// ============================================================================

/// A relation label as observed at one frame.
///
/// `Ignore` is the reserved marker: any episode whose relation mapping
/// contains it is dropped by the compressor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QsrValue {
    /// A free-form symbolic label (e.g. `"sur"`, `"con"`, `"dis"`).
    Label(String),
    /// A composite block algebra label.
    Block(BlockRelation),
    /// Reserved: discard any episode carrying this value.
    Ignore,
}

impl QsrValue {
    pub fn label(s: impl Into<String>) -> Self {
        QsrValue::Label(s.into())
    }

    pub fn is_ignore(&self) -> bool {
        matches!(self, QsrValue::Ignore)
    }
}

impl std::fmt::Display for QsrValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QsrValue::Label(s) => f.write_str(s),
            QsrValue::Block(b) => write!(f, "{b}"),
            QsrValue::Ignore => f.write_str("Ignore"),
        }
    }
}
