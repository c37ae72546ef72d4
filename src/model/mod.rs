//! # Core Data Model
//!
//! Value-like DTOs that cross every boundary: algebra ↔ filter ↔
//! compressor ↔ graphlet mining ↔ export.
//!
//! Design rule: this module is pure data — no I/O, no state, no
//! algorithms. Everything here is immutable once constructed.

pub mod episode;
pub mod interval;
pub mod object_state;
pub mod relation;
pub mod trace;

pub use episode::{ActiveSet, Chord, Episode, EpisodeId, ObjectPair};
pub use interval::{FrameId, FrameSpan, Interval};
pub use object_state::{MinimalExtents, ObjectState};
pub use relation::{AllenRelation, BlockRelation, QsrValue, RelationKind, BLOCK_SEPARATOR};
pub use trace::{FrameQsrs, QsrTrace};
