//! Temporal chord decomposition.
//!
//! Given a pool of episodes (possibly spanning several object pairs),
//! a chord is a maximal sub-interval of the combined timeline over
//! which exactly the same set of episodes is active. The chords of a
//! pool partition the union of its spans: consecutive, non-overlapping,
//! gap-free.

use std::collections::BTreeMap;

use tracing::debug;

use crate::model::{ActiveSet, Chord, EpisodeId, FrameId, FrameSpan};
use crate::{Error, Result};

/// Decompose a pooled episode timeline into chords.
///
/// Walks every frame in the union of the given spans, tracking which
/// episode ids are active (`start <= frame <= end`), and closes a
/// chord whenever the active set changes. The final chord is closed
/// unconditionally at the end of the scan.
///
/// An empty pool has no timeline to decompose and is an error; callers
/// with possibly-empty pools must branch before calling.
pub fn decompose(episodes: &[(FrameSpan, EpisodeId)]) -> Result<Vec<Chord>> {
    if episodes.is_empty() {
        return Err(Error::EmptyDecomposition);
    }

    // Active episode ids per frame, frames kept sorted by the map.
    let mut frame_state: BTreeMap<FrameId, ActiveSet> = BTreeMap::new();
    for (span, id) in episodes {
        for frame in span.start..=span.end {
            frame_state.entry(frame).or_default().push(*id);
        }
    }
    for state in frame_state.values_mut() {
        state.sort_unstable();
    }

    let mut chords = Vec::new();
    let mut iter = frame_state.iter();
    // Non-empty input guarantees at least one frame.
    let (&first_frame, first_state) = iter.next().ok_or(Error::EmptyDecomposition)?;
    let mut start = first_frame;
    let mut end = first_frame;
    let mut state = first_state;

    for (&frame, active) in iter {
        if active == state {
            end = frame;
        } else {
            chords.push(Chord::new(FrameSpan::new(start, end), state.clone()));
            start = frame;
            end = frame;
            state = active;
        }
    }
    chords.push(Chord::new(FrameSpan::new(start, end), state.clone()));

    debug!(chords = chords.len(), episodes = episodes.len(), "decomposed timeline");
    Ok(chords)
}
