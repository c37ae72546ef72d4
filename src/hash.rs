//! Canonical graph fingerprinting.
//!
//! Deduplicating graphlets needs a structural key that does not depend
//! on node ids or insertion order. The fingerprint below hashes, per
//! node, the sorted multiset of (shortest-path distance, reachable
//! node label) pairs, then hashes the sorted multiset of edge
//! fingerprints. Two graphs isomorphic via a label-preserving,
//! distance-preserving relabeling hash identically.
//!
//! This is a fingerprint, not a certificate: collisions between
//! non-isomorphic graphs are possible and acceptable for dedup. Callers
//! needing exact identity pair the hash with an equality check on the
//! canonical serialization (see `export::dedup_graphlets`).

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Sentinel standing in for a missing node or edge label, so that
/// unlabeled elements still fingerprint deterministically.
const MISSING_LABEL: &str = "None";

/// A small directed graph with string-labeled nodes and optionally
/// labeled edges. Node handles are plain indices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledGraph {
    labels: Vec<Option<String>>,
    edges: Vec<(usize, usize, Option<String>)>,
    adjacency: Vec<Vec<usize>>,
}

impl LabeledGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, label: impl Into<String>) -> usize {
        self.labels.push(Some(label.into()));
        self.adjacency.push(Vec::new());
        self.labels.len() - 1
    }

    pub fn add_unlabeled_node(&mut self) -> usize {
        self.labels.push(None);
        self.adjacency.push(Vec::new());
        self.labels.len() - 1
    }

    pub fn add_edge(&mut self, source: usize, target: usize) {
        self.add_edge_labeled(source, target, None);
    }

    pub fn add_edge_labeled(&mut self, source: usize, target: usize, label: Option<String>) {
        self.adjacency[source].push(target);
        self.edges.push((source, target, label));
    }

    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node_label(&self, node: usize) -> Option<&str> {
        self.labels.get(node).and_then(|l| l.as_deref())
    }

    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, Option<&str>)> {
        self.edges.iter().map(|(s, t, l)| (*s, *t, l.as_deref()))
    }

    /// Canonical hash over node labels only; edge labels ignored.
    pub fn canonical_hash(&self) -> u64 {
        self.hash_impl(false)
    }

    /// Canonical hash that additionally distinguishes edge labels.
    pub fn canonical_hash_labeled_edges(&self) -> u64 {
        self.hash_impl(true)
    }

    /// Canonical serialization of the graph: the sorted edge
    /// fingerprint list the hash is computed from. Equal strings mean
    /// equal graphs under the fingerprint's notion of identity.
    pub fn canonical_form(&self) -> String {
        self.edge_fingerprints(true).join(":")
    }

    fn hash_impl(&self, use_edge_labels: bool) -> u64 {
        fnv1a(self.edge_fingerprints(use_edge_labels).join(":").as_bytes())
    }

    fn edge_fingerprints(&self, use_edge_labels: bool) -> Vec<String> {
        let node_fp: Vec<u64> = (0..self.node_count())
            .map(|node| self.node_fingerprint(node))
            .collect();

        let mut fingerprints: Vec<String> = self
            .edges
            .iter()
            .map(|(source, target, label)| {
                if use_edge_labels {
                    format!(
                        "({},{},{})",
                        node_fp[*source],
                        node_fp[*target],
                        label.as_deref().unwrap_or(MISSING_LABEL)
                    )
                } else {
                    format!("({},{})", node_fp[*source], node_fp[*target])
                }
            })
            .collect();
        fingerprints.sort_unstable();
        fingerprints
    }

    /// Per-node fingerprint: the sorted multiset of (distance,
    /// reachable-node-label) pairs over everything the node reaches,
    /// itself included at distance 1.
    fn node_fingerprint(&self, node: usize) -> u64 {
        let distances = self.bfs_distances(node);
        let mut pairs: Vec<(usize, &str)> = distances
            .iter()
            .enumerate()
            .filter_map(|(target, dist)| {
                dist.map(|d| (d + 1, self.node_label(target).unwrap_or(MISSING_LABEL)))
            })
            .collect();
        pairs.sort_unstable();

        let serialized: Vec<String> =
            pairs.iter().map(|(d, label)| format!("({d},{label})")).collect();
        fnv1a(serialized.join(":").as_bytes())
    }

    /// Directed BFS hop counts from `node`; `None` for unreachable.
    fn bfs_distances(&self, node: usize) -> Vec<Option<usize>> {
        let mut distances = vec![None; self.node_count()];
        distances[node] = Some(0);
        let mut queue = VecDeque::from([node]);
        while let Some(current) = queue.pop_front() {
            let next = distances[current].map(|d| d + 1);
            for &neighbour in &self.adjacency[current] {
                if distances[neighbour].is_none() {
                    distances[neighbour] = next;
                    queue.push_back(neighbour);
                }
            }
        }
        distances
    }
}

/// FNV-1a, 64-bit. Stable across processes and runs, unlike the
/// standard library's keyed SipHash.
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for &byte in bytes {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Path graph a -> b -> c with the given labels.
    fn path(labels: [&str; 3]) -> LabeledGraph {
        let mut g = LabeledGraph::new();
        let nodes: Vec<usize> = labels.iter().map(|l| g.add_node(*l)).collect();
        g.add_edge(nodes[0], nodes[1]);
        g.add_edge(nodes[1], nodes[2]);
        g
    }

    #[test]
    fn test_hash_invariant_to_insertion_order() {
        let g1 = path(["t", "s", "o"]);

        // Same structure, nodes inserted in reverse order.
        let mut g2 = LabeledGraph::new();
        let c = g2.add_node("o");
        let b = g2.add_node("s");
        let a = g2.add_node("t");
        g2.add_edge(b, c);
        g2.add_edge(a, b);

        assert_eq!(g1.canonical_hash(), g2.canonical_hash());
        assert_eq!(g1.canonical_form(), g2.canonical_form());
    }

    #[test]
    fn test_hash_sensitive_to_labels() {
        assert_ne!(
            path(["t", "s", "o"]).canonical_hash(),
            path(["t", "s", "x"]).canonical_hash()
        );
    }

    #[test]
    fn test_hash_sensitive_to_structure() {
        let chain = path(["t", "s", "o"]);

        // Fan: t -> s, t -> o.
        let mut fan = LabeledGraph::new();
        let a = fan.add_node("t");
        let b = fan.add_node("s");
        let c = fan.add_node("o");
        fan.add_edge(a, b);
        fan.add_edge(a, c);

        assert_ne!(chain.canonical_hash(), fan.canonical_hash());
    }

    #[test]
    fn test_edge_labels_distinguish_when_requested() {
        let mut g1 = path(["t", "s", "o"]);
        let mut g2 = path(["t", "s", "o"]);
        g1.add_edge_labeled(0, 2, Some("near".into()));
        g2.add_edge_labeled(0, 2, Some("far".into()));

        assert_eq!(g1.canonical_hash(), g2.canonical_hash());
        assert_ne!(
            g1.canonical_hash_labeled_edges(),
            g2.canonical_hash_labeled_edges()
        );
    }

    #[test]
    fn test_unlabeled_nodes_use_sentinel() {
        let mut g1 = LabeledGraph::new();
        g1.add_unlabeled_node();
        let mut g2 = LabeledGraph::new();
        g2.add_unlabeled_node();
        assert_eq!(g1.canonical_hash(), g2.canonical_hash());
    }

    #[test]
    fn test_isolated_nodes_fingerprint_deterministically() {
        let mut g1 = LabeledGraph::new();
        g1.add_node("a");
        g1.add_node("b");
        let mut g2 = LabeledGraph::new();
        g2.add_node("b");
        g2.add_node("a");
        assert_eq!(g1.canonical_hash(), g2.canonical_hash());
    }
}
