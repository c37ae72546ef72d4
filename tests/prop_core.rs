//! Property-based tests for the algebraic guarantees of the core.

use proptest::prelude::*;

use qstag::{
    classify, classify_frames, decompose, median_filter, AllenRelation, EpisodeId, FrameSpan,
    Interval, LabeledGraph, QsrValue,
};

// Non-degenerate intervals: a degenerate interval compared against
// itself legitimately meets (its endpoints touch), so the involution
// and reflexivity properties quantify over positive-length intervals.
fn interval() -> impl Strategy<Value = Interval> {
    (-100.0f64..100.0, 0.01f64..50.0)
        .prop_map(|(lo, len)| Interval::new(lo, lo + len).unwrap())
}

fn frame_span() -> impl Strategy<Value = FrameSpan> {
    (0i64..60, 0i64..25).prop_map(|(start, len)| FrameSpan::new(start, start + len))
}

proptest! {
    // ========================================================================
    // Interval algebra
    // ========================================================================

    #[test]
    fn prop_classify_involution(i1 in interval(), i2 in interval()) {
        let forward = classify(i1, i2).unwrap();
        let backward = classify(i2, i1).unwrap();
        prop_assert_eq!(backward, forward.inverse());
    }

    #[test]
    fn prop_classify_reflexive(i in interval()) {
        prop_assert_eq!(classify(i, i).unwrap(), AllenRelation::Equals);
    }

    #[test]
    fn prop_classify_frames_total_and_involutive(d1 in frame_span(), d2 in frame_span()) {
        // Total by construction; involutive like the continuous variant.
        let forward = classify_frames(d1, d2);
        prop_assert_eq!(classify_frames(d2, d1), forward.inverse());
    }

    // ========================================================================
    // Median filter
    // ========================================================================

    #[test]
    fn prop_filter_idempotent_on_uniform_input(
        len in 1usize..40,
        window in (1usize..5).prop_map(|k| 2 * k + 1),
    ) {
        let data = vec![QsrValue::label("dc"); len];
        prop_assert_eq!(median_filter(&data, window).unwrap(), data);
    }

    #[test]
    fn prop_filter_preserves_length_and_vocabulary(
        raw in proptest::collection::vec(0u8..3, 1..50),
    ) {
        let labels = ["a", "b", "c"];
        let data: Vec<QsrValue> =
            raw.iter().map(|&i| QsrValue::label(labels[i as usize])).collect();
        let out = median_filter(&data, 3).unwrap();

        prop_assert_eq!(out.len(), data.len());
        // The filter only ever emits labels present in its input.
        for value in &out {
            prop_assert!(data.contains(value));
        }
    }

    // ========================================================================
    // Chord decomposition
    // ========================================================================

    #[test]
    fn prop_chords_partition_scanned_frames(
        spans in proptest::collection::vec(frame_span(), 1..6),
    ) {
        let episodes: Vec<(FrameSpan, EpisodeId)> = spans
            .iter()
            .enumerate()
            .map(|(i, &span)| (span, EpisodeId(i as u64)))
            .collect();
        let chords = decompose(&episodes).unwrap();

        // Chords are ordered, non-overlapping, and their frames are
        // exactly the union of the episode spans.
        let mut chord_frames = std::collections::BTreeSet::new();
        let mut previous_end = None;
        for chord in &chords {
            prop_assert!(chord.span.start <= chord.span.end);
            if let Some(end) = previous_end {
                prop_assert!(chord.span.start > end);
            }
            previous_end = Some(chord.span.end);
            chord_frames.extend(chord.span.start..=chord.span.end);
        }

        let mut episode_frames = std::collections::BTreeSet::new();
        for (span, _) in &episodes {
            episode_frames.extend(span.start..=span.end);
        }
        prop_assert_eq!(&chord_frames, &episode_frames);

        // Within each chord the active set is exact; across adjacent
        // chords it changes (or a frame gap separates them).
        for chord in &chords {
            for frame in chord.span.start..=chord.span.end {
                let expected: Vec<EpisodeId> = episodes
                    .iter()
                    .filter(|(span, _)| span.contains(frame))
                    .map(|(_, id)| *id)
                    .collect();
                prop_assert_eq!(chord.active.as_slice(), expected.as_slice());
            }
        }
        for pair in chords.windows(2) {
            let adjacent = pair[1].span.start == pair[0].span.end + 1;
            prop_assert!(!adjacent || pair[0].active != pair[1].active);
        }
    }

    // ========================================================================
    // Canonical hash
    // ========================================================================

    #[test]
    fn prop_hash_invariant_under_relabeling(
        labels in proptest::collection::vec(0u8..4, 2..7),
        edge_picks in proptest::collection::vec((0usize..6, 0usize..6), 0..10),
        rotation in 0usize..6,
    ) {
        let names = ["t", "s", "o", "x"];
        let n = labels.len();
        let rotation = rotation % n;

        // Original graph, nodes inserted 0..n.
        let mut g1 = LabeledGraph::new();
        for &l in &labels {
            g1.add_node(names[l as usize]);
        }
        let edges: Vec<(usize, usize)> = edge_picks
            .iter()
            .map(|&(a, b)| (a % n, b % n))
            .collect();
        for &(a, b) in &edges {
            g1.add_edge(a, b);
        }

        // Same graph, node ids rotated: node i becomes (i + rotation) % n.
        let mut g2 = LabeledGraph::new();
        for i in 0..n {
            let original = (i + n - rotation) % n;
            g2.add_node(names[labels[original] as usize]);
        }
        for &(a, b) in &edges {
            g2.add_edge((a + rotation) % n, (b + rotation) % n);
        }

        prop_assert_eq!(g1.canonical_hash(), g2.canonical_hash());
        prop_assert_eq!(g1.canonical_form(), g2.canonical_form());
    }
}
