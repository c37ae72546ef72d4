//! Majority-vote median filter for noisy relation streams.
//!
//! Single-frame flickers in a qualitative relation stream are almost
//! always tracker noise; smoothing them out before episode compression
//! keeps the episode list from fragmenting. Two deliberately distinct
//! tie-break policies apply (they come from different code paths in the
//! reference behavior and are preserved as such):
//!
//! - input shorter than the window, tied majority → every output
//!   element becomes the FIRST raw input element;
//! - a tied window mid-stream → the output retains the PREVIOUS
//!   output element.

use std::collections::BTreeMap;

use tracing::debug;

use crate::model::{FrameId, ObjectPair, QsrTrace, QsrValue, RelationKind};
use crate::{Error, Result};

/// Smooth one label stream with a sliding majority window.
///
/// `window` must be odd and at least 3. The output has the same length
/// and index semantics as the input. Positions too close to the start
/// are padded by repeating the first element; each window's majority
/// label wins, with the tie-break policies described at module level.
/// Windows slide over the partially smoothed stream, so an early fix
/// propagates forward.
pub fn median_filter<T: Clone + Ord>(data: &[T], window: usize) -> Result<Vec<T>> {
    if window < 3 || window % 2 == 0 {
        return Err(Error::InvalidWindow(window));
    }
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let mut data = data.to_vec();

    if data.len() < window {
        // Whole-sequence majority; tied → first raw element.
        let fill = match unique_majority(&data) {
            Some(value) => value,
            None => data[0].clone(),
        };
        for slot in data.iter_mut() {
            *slot = fill.clone();
        }
        return Ok(data);
    }

    let tail = (window - 1) / 2;
    for i in 0..data.len() {
        let majority = if i < tail {
            // Incomplete leading window: pad with the first element.
            let mut padded: Vec<T> = vec![data[0].clone(); tail];
            padded.extend_from_slice(&data[i..i + tail + 1]);
            unique_majority(&padded)
        } else {
            let upper = (i + tail + 1).min(data.len());
            unique_majority(&data[i - tail..upper])
        };
        data[i] = match majority {
            Some(value) => value,
            // Tied window: retain the previous output element. The
            // leading windows hold a strict first-element majority, so
            // i > 0 here.
            None => data[i - 1].clone(),
        };
    }
    Ok(data)
}

/// The label with the strictly highest frequency, or `None` when more
/// than one label attains the maximum. Counting is order-independent.
fn unique_majority<T: Clone + Ord>(data: &[T]) -> Option<T> {
    let mut counts: BTreeMap<&T, usize> = BTreeMap::new();
    for item in data {
        *counts.entry(item).or_insert(0) += 1;
    }
    let max = counts.values().copied().max()?;
    let mut at_max = counts.iter().filter(|&(_, &c)| c == max);
    let (value, _) = at_max.next()?;
    if at_max.next().is_some() {
        return None;
    }
    Some((*value).clone())
}

/// Smooth an entire trace, one (object pair, relation kind) stream at
/// a time, and return a new trace. The input is left untouched.
///
/// Each stream keeps a parallel list of its frame identifiers so the
/// filtered labels land back on exactly the frames they came from.
pub fn smooth_trace(trace: &QsrTrace, window: usize) -> Result<QsrTrace> {
    type StreamKey = (ObjectPair, RelationKind);
    let mut streams: BTreeMap<StreamKey, (Vec<FrameId>, Vec<QsrValue>)> = BTreeMap::new();

    // QsrTrace::iter is frame-ascending, so streams stay in frame order.
    for (frame, objects, kind, value) in trace.iter() {
        let (frames, labels) = streams.entry((objects.clone(), kind)).or_default();
        frames.push(frame);
        labels.push(value.clone());
    }
    debug!(streams = streams.len(), window, "smoothing trace");

    let mut smoothed = QsrTrace::new();
    for ((objects, kind), (frames, labels)) in streams {
        let filtered = median_filter(&labels, window)?;
        for (frame, value) in frames.into_iter().zip(filtered) {
            smoothed.add_qsr(frame, objects.clone(), kind, value);
        }
    }
    Ok(smoothed)
}
