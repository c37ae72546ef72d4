//! # qstag — Qualitative Spatio-Temporal Activity Graphs
//!
//! Turns a per-frame stream of qualitative spatial relations between
//! tracked entity pairs into a compact structural summary of the
//! activity: temporally compressed episodes, bounded groupings of
//! co-occurring episodes (graphlets), and canonical fingerprints that
//! recognise structurally identical groupings regardless of labeling
//! order.
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: every stage takes an immutable snapshot and
//!    returns a new value — no shared state, no I/O, no retries
//! 2. **Closed vocabularies**: relation labels and kinds are enums,
//!    so extensions are compiler-checked rather than string conventions
//! 3. **Explicit configuration**: filter windows, episode thresholds
//!    and enumeration bounds are passed per call
//!
//! ## Pipeline
//!
//! ```text
//! relation trace → (filter) smoothing → (episodes) compression
//!     → (chords) decomposition → (graphlets) enumeration
//!     → (hash) canonical fingerprint → dedup
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qstag::{ObjectPair, QsrTrace, Qstag, QsrValue, RelationKind};
//!
//! # fn example() -> qstag::Result<()> {
//! let pair = ObjectPair::new("mug", "hand");
//! let mut trace = QsrTrace::new();
//! for frame in 1..=3 {
//!     trace.add_qsr(frame, pair.clone(), RelationKind::Rcc3, QsrValue::label("touching"));
//! }
//! for frame in 4..=6 {
//!     trace.add_qsr(frame, pair.clone(), RelationKind::Rcc3, QsrValue::label("overlapping"));
//! }
//!
//! let output = Qstag::default().process(&trace)?;
//! assert_eq!(output.episodes.len(), 2);
//! assert!(!output.graphlets.is_empty());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod algebra;
pub mod chords;
pub mod episodes;
pub mod export;
pub mod filter;
pub mod graphlets;
pub mod hash;
pub mod model;

// ============================================================================
// Re-exports
// ============================================================================

pub use algebra::{classify, classify_frames, compose, compose_boxes, BoundingBox3d};
pub use chords::decompose;
pub use episodes::{compress, CompressOptions};
pub use export::{dedup_graphlets, ActivityGraph};
pub use filter::{median_filter, smooth_trace};
pub use graphlets::{enumerate_graphlets, Graphlet, GraphletBounds};
pub use hash::LabeledGraph;
pub use model::{
    AllenRelation, BlockRelation, Chord, Episode, EpisodeId, FrameId, FrameSpan, Interval,
    MinimalExtents, ObjectPair, ObjectState, QsrTrace, QsrValue, RelationKind,
};

// ============================================================================
// Top-level pipeline handle
// ============================================================================

use serde::{Deserialize, Serialize};

/// Options for one end-to-end run. All stages are configured here and
/// passed down explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QstagOptions {
    /// Median-filter window applied before compression; `None` skips
    /// smoothing entirely.
    pub filter_window: Option<usize>,
    pub compress: CompressOptions,
    pub bounds: GraphletBounds,
}

/// The primary entry point: holds a configuration and runs the full
/// trace → episodes → graphlets pipeline.
#[derive(Debug, Clone, Default)]
pub struct Qstag {
    options: QstagOptions,
}

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QstagOutput {
    /// Compressed episodes, sorted by object pair and start frame.
    pub episodes: Vec<Episode>,
    /// Enumerated graphlets, already structurally deduplicated.
    pub graphlets: Vec<Graphlet>,
}

impl QstagOutput {
    /// Canonical hash per graphlet, in graphlet order.
    pub fn graphlet_hashes(&self) -> Vec<u64> {
        self.graphlets
            .iter()
            .map(|g| ActivityGraph::from_graphlet(g).canonical_hash())
            .collect()
    }
}

impl Qstag {
    pub fn new(options: QstagOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &QstagOptions {
        &self.options
    }

    /// Run the pipeline on one trace.
    ///
    /// Phases: optional median smoothing, episode compression,
    /// graphlet enumeration, structural deduplication. The input trace
    /// is never mutated.
    pub fn process(&self, trace: &QsrTrace) -> Result<QstagOutput> {
        // Phase 1: smooth
        let smoothed;
        let trace = match self.options.filter_window {
            Some(window) => {
                smoothed = filter::smooth_trace(trace, window)?;
                &smoothed
            }
            None => trace,
        };

        // Phase 2: compress
        let episodes = episodes::compress(trace, &self.options.compress);

        // Phase 3: enumerate + dedup
        let graphlets = if episodes.is_empty() {
            Vec::new()
        } else {
            let raw = graphlets::enumerate_graphlets(&episodes, &self.options.bounds)?;
            export::dedup_graphlets(raw)
        };

        Ok(QstagOutput { episodes, graphlets })
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid interval endpoint: ({lo}, {hi})")]
    InvalidInterval { lo: f64, hi: f64 },

    #[error("malformed bounding box: {0}")]
    MalformedBoundingBox(String),

    #[error("cannot decompose an empty episode set into chords")]
    EmptyDecomposition,

    #[error("median filter window must be an odd integer >= 3, got {0}")]
    InvalidWindow(usize),

    #[error("malformed relation stream: {0}")]
    TraceShape(String),

    #[error("unknown relation symbol: {0:?}")]
    UnknownRelation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
