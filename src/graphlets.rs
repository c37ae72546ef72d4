//! Graphlet enumeration — bounded groupings of co-occurring episodes.
//!
//! A graphlet is a small set of episodes that were simultaneously
//! active over some stretch of the timeline. Enumeration selects
//! combinations of object-pair rows, decomposes each selection's pooled
//! episodes into chords, and collects the episode sets active across
//! every contiguous run of chords. Equal sets collapse to one candidate
//! no matter how many runs produced them.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chords::decompose;
use crate::model::{Episode, EpisodeId, FrameSpan, ObjectPair};
use crate::Result;

/// Bounds on the enumeration. The row range is generic, but the
/// default pins `min_rows == max_rows == 1`: one object pair per
/// enumeration round, matching the reference configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphletBounds {
    pub min_rows: usize,
    pub max_rows: usize,
    /// Candidates with more episodes than this are discarded.
    pub max_episodes: usize,
}

impl Default for GraphletBounds {
    fn default() -> Self {
        Self { min_rows: 1, max_rows: 1, max_episodes: 2 }
    }
}

/// An ordered list of episodes selected as one structural unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graphlet {
    pub episodes: Vec<Episode>,
}

impl Graphlet {
    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }
}

/// Enumerate all bounded-size graphlets of an episode list.
///
/// Episodes are identified by their index in `episodes` for the
/// duration of the call; the returned graphlets carry full records.
/// The result is deterministic: candidates are keyed by their exact
/// deduplicated episode-id set, and every internal collection iterates
/// in sorted order.
pub fn enumerate_graphlets(episodes: &[Episode], bounds: &GraphletBounds) -> Result<Vec<Graphlet>> {
    // Group episode spans by the object pair they belong to ("rows").
    let mut rows: BTreeMap<&ObjectPair, Vec<(FrameSpan, EpisodeId)>> = BTreeMap::new();
    for (index, ep) in episodes.iter().enumerate() {
        rows.entry(&ep.objects)
            .or_default()
            .push((ep.span, EpisodeId(index as u64)));
    }
    let row_keys: Vec<&ObjectPair> = rows.keys().copied().collect();

    let mut candidates: BTreeSet<BTreeSet<EpisodeId>> = BTreeSet::new();
    for r in bounds.min_rows..=bounds.max_rows.min(row_keys.len()) {
        if r == 0 {
            continue;
        }
        for combination in combinations(row_keys.len(), r) {
            let mut pool: Vec<(FrameSpan, EpisodeId)> = Vec::new();
            for &row_index in &combination {
                pool.extend_from_slice(&rows[row_keys[row_index]]);
            }
            // Rows are never empty, but an empty pool yields zero
            // chords rather than a decomposition error.
            if pool.is_empty() {
                continue;
            }

            let chords = decompose(&pool)?;
            // Every contiguous run of chords, length 1 up to all of
            // them. Runs off the tail truncate, which only re-produces
            // smaller sets the shorter lengths already generated.
            for k in 1..=chords.len() {
                for l in 0..chords.len() {
                    let run = &chords[l..(l + k).min(chords.len())];
                    let active: BTreeSet<EpisodeId> =
                        run.iter().flat_map(|c| c.active.iter().copied()).collect();
                    candidates.insert(active);
                }
            }
        }
    }

    // Map id sets back to full episode records and apply the size cap.
    let mut graphlets = Vec::new();
    for candidate in candidates {
        if candidate.len() > bounds.max_episodes {
            continue;
        }
        let selected: Vec<Episode> = candidate
            .iter()
            .map(|id| episodes[id.0 as usize].clone())
            .collect();
        graphlets.push(Graphlet { episodes: selected });
    }

    debug!(
        graphlets = graphlets.len(),
        episodes = episodes.len(),
        rows = row_keys.len(),
        "enumerated graphlets"
    );
    Ok(graphlets)
}

/// All r-element combinations of `0..n`, in lexicographic order.
fn combinations(n: usize, r: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    if r == 0 || r > n {
        return out;
    }
    let mut current = Vec::with_capacity(r);
    fn recurse(n: usize, r: usize, start: usize, current: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if current.len() == r {
            out.push(current.clone());
            return;
        }
        for i in start..n {
            current.push(i);
            recurse(n, r, i + 1, current, out);
            current.pop();
        }
    }
    recurse(n, r, 0, &mut current, &mut out);
    out
}
