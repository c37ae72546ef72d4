//! Episode compression — run-length encoding of relation streams.
//!
//! An episode is a maximal run of frames over which one object pair's
//! relation values hold constant. The compressor scans the trace in
//! frame order, one stream per object pair (or per pair and kind when
//! splitting), closes a run whenever the value changes or the optional
//! run-length threshold trips, and finally drops every episode that
//! carries the reserved ignore marker.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{Episode, FrameId, FrameSpan, ObjectPair, QsrTrace, QsrValue, RelationKind};

/// Compression options. Passed explicitly per call; there is no
/// ambient configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressOptions {
    /// Maximum consecutive frames before an episode is force-closed
    /// even if the value is unchanged. `0` means unbounded.
    pub frames_per_ep: usize,
    /// Compress each relation kind into its own episode stream instead
    /// of bundling all kinds active on a pair into one stream.
    pub split_qsrs: bool,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self { frames_per_ep: 0, split_qsrs: false }
    }
}

/// One stream's identity: the pair, plus the kind when splitting.
type StreamKey = (ObjectPair, Option<RelationKind>);

/// Relation values observed at one frame of one stream.
type StreamFrame = (FrameId, BTreeMap<RelationKind, QsrValue>);

/// Compress a frame-indexed relation trace into episodes.
///
/// An empty trace yields an empty list; a pair observed at a single
/// frame yields one degenerate episode with `start == end`. A trace
/// mixing QTC with other kinds has its first frame dropped before
/// compression. Output is sorted by object pair, then start frame.
pub fn compress(trace: &QsrTrace, options: &CompressOptions) -> Vec<Episode> {
    let mut streams: BTreeMap<StreamKey, Vec<StreamFrame>> = BTreeMap::new();
    let dropped_frame = qtc_leading_frame(trace);

    // Regroup the frame-major trace into per-stream frame sequences.
    // QsrTrace::iter is frame-ascending, so each stream is too.
    for (frame, objects, kind, value) in trace.iter() {
        if Some(frame) == dropped_frame {
            continue;
        }
        if options.split_qsrs {
            let key = (objects.clone(), Some(kind));
            let mut single = BTreeMap::new();
            single.insert(kind, value.clone());
            streams.entry(key).or_default().push((frame, single));
        } else {
            let key = (objects.clone(), None);
            let stream = streams.entry(key).or_default();
            match stream.last_mut() {
                Some((last_frame, rels)) if *last_frame == frame => {
                    rels.insert(kind, value.clone());
                }
                _ => {
                    let mut rels = BTreeMap::new();
                    rels.insert(kind, value.clone());
                    stream.push((frame, rels));
                }
            }
        }
    }

    let mut episodes = Vec::new();
    for ((objects, _), frames) in &streams {
        compress_stream(objects, frames, options.frames_per_ep, &mut episodes);
    }

    // Drop any episode whose relation mapping carries the ignore marker.
    let before = episodes.len();
    episodes.retain(|ep| !ep.is_ignored());
    debug!(
        episodes = episodes.len(),
        ignored = before - episodes.len(),
        "compressed trace"
    );

    episodes.sort_by(|a, b| (&a.objects, a.span).cmp(&(&b.objects, b.span)));
    episodes
}

/// QTC relations hold between consecutive frames, so a trace mixing a
/// QTC stream with other kinds carries no meaningful QTC value at its
/// first frame; that frame is dropped entirely. A pure QTC trace keeps
/// every frame.
fn qtc_leading_frame(trace: &QsrTrace) -> Option<FrameId> {
    let mut kinds: BTreeSet<RelationKind> = BTreeSet::new();
    for (_, _, kind, _) in trace.iter() {
        kinds.insert(kind);
    }
    if kinds.contains(&RelationKind::Qtc) && kinds.len() > 1 {
        trace.sorted_frames().first().copied()
    } else {
        None
    }
}

/// Run-length encode one stream of per-frame relation mappings.
fn compress_stream(
    objects: &ObjectPair,
    frames: &[StreamFrame],
    frames_per_ep: usize,
    out: &mut Vec<Episode>,
) {
    let Some((first_frame, first_rel)) = frames.first() else {
        return;
    };

    let mut epi_start = *first_frame;
    let mut epi_end = *first_frame;
    let mut epi_rel = first_rel;
    let mut run = 0usize;

    for (frame, rel) in frames {
        let extend = rel == epi_rel && (frames_per_ep == 0 || run <= frames_per_ep);
        if extend {
            epi_end = *frame;
            run += 1;
        } else {
            out.push(Episode::new(
                objects.clone(),
                epi_rel.clone(),
                FrameSpan::new(epi_start, epi_end),
            ));
            epi_start = *frame;
            epi_end = *frame;
            epi_rel = rel;
            run = 0;
        }
    }
    out.push(Episode::new(
        objects.clone(),
        epi_rel.clone(),
        FrameSpan::new(epi_start, epi_end),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn trace_of(labels: &[(FrameId, &str)]) -> (QsrTrace, ObjectPair) {
        let pair = ObjectPair::new("A", "B");
        let mut trace = QsrTrace::new();
        for (frame, label) in labels {
            trace.add_qsr(*frame, pair.clone(), RelationKind::Rcc3, QsrValue::label(*label));
        }
        (trace, pair)
    }

    #[test]
    fn test_empty_trace_yields_no_episodes() {
        let episodes = compress(&QsrTrace::new(), &CompressOptions::default());
        assert!(episodes.is_empty());
    }

    #[test]
    fn test_run_length_encoding() {
        let (trace, pair) = trace_of(&[
            (1, "touching"),
            (2, "touching"),
            (3, "touching"),
            (4, "overlapping"),
            (5, "overlapping"),
            (6, "overlapping"),
            (7, "touching"),
        ]);
        let episodes = compress(&trace, &CompressOptions::default());

        assert_eq!(episodes.len(), 3);
        assert_eq!(episodes[0].objects, pair);
        assert_eq!(episodes[0].span, FrameSpan::new(1, 3));
        assert_eq!(episodes[0].relations[&RelationKind::Rcc3], QsrValue::label("touching"));
        assert_eq!(episodes[1].span, FrameSpan::new(4, 6));
        assert_eq!(episodes[2].span, FrameSpan::new(7, 7));
    }

    #[test]
    fn test_single_frame_degenerate_episode() {
        let (trace, _) = trace_of(&[(9, "dc")]);
        let episodes = compress(&trace, &CompressOptions::default());
        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].span, FrameSpan::new(9, 9));
    }

    #[test]
    fn test_episode_coverage_and_contiguity() {
        let (trace, _) = trace_of(&[
            (1, "a"), (2, "a"), (3, "b"), (4, "b"), (5, "a"), (6, "c"),
        ]);
        let episodes = compress(&trace, &CompressOptions::default());

        // Consecutive episodes tile the observed frames exactly.
        let mut expected_start = 1;
        for ep in &episodes {
            assert_eq!(ep.span.start, expected_start);
            assert!(ep.span.end >= ep.span.start);
            expected_start = ep.span.end + 1;
        }
        assert_eq!(expected_start, 7);
    }

    #[test]
    fn test_frames_per_ep_force_closes() {
        let (trace, _) = trace_of(&[
            (1, "a"), (2, "a"), (3, "a"), (4, "a"), (5, "a"), (6, "a"),
        ]);
        let options = CompressOptions { frames_per_ep: 2, split_qsrs: false };
        let episodes = compress(&trace, &options);

        assert!(episodes.len() > 1, "long run must be force-closed");
        // Every emitted span respects the bound, and they still tile.
        let mut expected_start = 1;
        for ep in &episodes {
            assert!(ep.span.len() <= 4);
            assert_eq!(ep.span.start, expected_start);
            expected_start = ep.span.end + 1;
        }
        assert_eq!(expected_start, 7);
    }

    #[test]
    fn test_ignore_marker_discards_episode() {
        let pair = ObjectPair::new("A", "B");
        let mut trace = QsrTrace::new();
        trace.add_qsr(1, pair.clone(), RelationKind::Rcc3, QsrValue::label("dc"));
        trace.add_qsr(2, pair.clone(), RelationKind::Rcc3, QsrValue::Ignore);
        trace.add_qsr(3, pair.clone(), RelationKind::Rcc3, QsrValue::label("dc"));

        let episodes = compress(&trace, &CompressOptions::default());
        assert_eq!(episodes.len(), 2);
        assert!(episodes.iter().all(|ep| !ep.is_ignored()));
    }

    #[test]
    fn test_bundled_kinds_share_one_stream() {
        let pair = ObjectPair::new("A", "B");
        let mut trace = QsrTrace::new();
        for frame in 1..=4 {
            trace.add_qsr(frame, pair.clone(), RelationKind::Rcc3, QsrValue::label("dc"));
            let qtc = if frame <= 2 { "-" } else { "+" };
            trace.add_qsr(frame, pair.clone(), RelationKind::Qtc, QsrValue::label(qtc));
        }

        // Frame 1 is dropped (qtc mixed with rcc3); the qtc flip at
        // frame 3 splits the combined stream.
        let bundled = compress(&trace, &CompressOptions::default());
        assert_eq!(bundled.len(), 2);
        assert_eq!(bundled[0].span, FrameSpan::new(2, 2));
        assert_eq!(bundled[1].span, FrameSpan::new(3, 4));
        assert_eq!(bundled[0].relations.len(), 2);

        // Split: rcc3 stays one episode, qtc splits in two.
        let options = CompressOptions { split_qsrs: true, ..Default::default() };
        let split = compress(&trace, &options);
        assert_eq!(split.len(), 3);
        assert!(split.iter().all(|ep| ep.relations.len() == 1));
    }

    #[test]
    fn test_qtc_mixed_with_other_kinds_drops_first_frame() {
        let pair = ObjectPair::new("A", "B");
        let mut trace = QsrTrace::new();
        for frame in 1..=4 {
            trace.add_qsr(frame, pair.clone(), RelationKind::Rcc3, QsrValue::label("dc"));
            trace.add_qsr(frame, pair.clone(), RelationKind::Qtc, QsrValue::label("-"));
        }

        let episodes = compress(&trace, &CompressOptions::default());
        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].span, FrameSpan::new(2, 4));
    }

    #[test]
    fn test_pure_qtc_trace_keeps_first_frame() {
        let pair = ObjectPair::new("A", "B");
        let mut trace = QsrTrace::new();
        for frame in 1..=4 {
            trace.add_qsr(frame, pair.clone(), RelationKind::Qtc, QsrValue::label("-"));
        }

        let episodes = compress(&trace, &CompressOptions::default());
        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].span, FrameSpan::new(1, 4));
    }
}
