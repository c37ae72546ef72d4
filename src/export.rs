//! Activity graph export — the shape handed to rendering collaborators.
//!
//! A graphlet (or any episode list) unfolds into a directed tri-partite
//! graph: temporal nodes (Allen relations between episode spans),
//! spatial nodes (one per episode, labelled with its relation values)
//! and object nodes (one per distinct entity). Two edge classes connect
//! them: temporal → spatial and spatial → object.
//!
//! The dot rendering writes three ranked subgraphs so the layers line
//! up left to right; pipe the output through `dot -Tpng`.

use std::io::Write;

use serde::Serialize;
use tracing::debug;

use crate::algebra::classify_frames;
use crate::graphlets::Graphlet;
use crate::hash::LabeledGraph;
use crate::model::Episode;
use crate::Result;

/// The tri-partite activity graph built from a set of episodes.
#[derive(Debug, Clone)]
pub struct ActivityGraph {
    graph: LabeledGraph,
    temporal_nodes: Vec<usize>,
    spatial_nodes: Vec<usize>,
    object_nodes: Vec<usize>,
    temporal_spatial_edges: Vec<(usize, usize)>,
    spatial_object_edges: Vec<(usize, usize)>,
}

impl ActivityGraph {
    /// Build the activity graph of an episode list.
    ///
    /// One spatial node per episode; one object node per distinct
    /// entity; one temporal node per ordered episode pair, labelled
    /// with the frame-count Allen relation between their spans.
    pub fn from_episodes(episodes: &[Episode]) -> Self {
        let mut graph = LabeledGraph::new();
        let mut object_nodes = Vec::new();
        let mut object_index: Vec<(String, usize)> = Vec::new();

        // Spatial layer: one node per episode, wired to its entities.
        // Object nodes are created the moment a name is first wired, in
        // first-seen order, so every lookup here is total.
        let mut spatial_nodes = Vec::new();
        let mut spatial_object_edges = Vec::new();
        for ep in episodes {
            let spatial = graph.add_node(ep.relation_label());
            spatial_nodes.push(spatial);
            for name in ep.objects.names() {
                let object = match object_index.iter().find(|(n, _)| n == name) {
                    Some((_, node)) => *node,
                    None => {
                        let node = graph.add_node(name);
                        object_index.push((name.to_owned(), node));
                        object_nodes.push(node);
                        node
                    }
                };
                graph.add_edge(spatial, object);
                spatial_object_edges.push((spatial, object));
            }
        }

        // Temporal layer: one node per ordered episode pair.
        let mut temporal_nodes = Vec::new();
        let mut temporal_spatial_edges = Vec::new();
        for i in 0..episodes.len() {
            for j in (i + 1)..episodes.len() {
                let relation = classify_frames(episodes[i].span, episodes[j].span);
                let temporal = graph.add_node(relation.symbol());
                temporal_nodes.push(temporal);
                for spatial in [spatial_nodes[i], spatial_nodes[j]] {
                    graph.add_edge(temporal, spatial);
                    temporal_spatial_edges.push((temporal, spatial));
                }
            }
        }

        Self {
            graph,
            temporal_nodes,
            spatial_nodes,
            object_nodes,
            temporal_spatial_edges,
            spatial_object_edges,
        }
    }

    pub fn from_graphlet(graphlet: &Graphlet) -> Self {
        Self::from_episodes(&graphlet.episodes)
    }

    /// Order-invariant structural fingerprint; see [`crate::hash`].
    pub fn canonical_hash(&self) -> u64 {
        self.graph.canonical_hash()
    }

    /// Canonical serialization backing the hash, for exact comparison.
    pub fn canonical_form(&self) -> String {
        self.graph.canonical_form()
    }

    pub fn graph(&self) -> &LabeledGraph {
        &self.graph
    }

    /// Write the graph as a dot file with three ranked subgraphs.
    pub fn to_dot(&self, writer: &mut dyn Write) -> Result<()> {
        writeln!(writer, "digraph activity_graph {{")?;
        writeln!(writer, "    node [fontsize = \"16\", shape = \"box\", style=\"filled\"];")?;
        writeln!(writer, "    ranksep=5;")?;

        writeln!(writer, "    subgraph _temporal {{")?;
        writeln!(writer, "    rank=\"source\";")?;
        for &node in &self.temporal_nodes {
            writeln!(
                writer,
                "    {} [fillcolor=\"white\", label=\"{}\", shape=ellipse];",
                node,
                self.label_of(node)
            )?;
        }
        writeln!(writer, "    }}")?;

        writeln!(writer, "    subgraph _spatial {{")?;
        writeln!(writer, "    rank=\"same\";")?;
        for &node in &self.spatial_nodes {
            writeln!(
                writer,
                "    {} [fillcolor=\"lightblue\", label=\"{}\"];",
                node,
                self.label_of(node)
            )?;
        }
        writeln!(writer, "    }}")?;

        writeln!(writer, "    subgraph _object {{")?;
        writeln!(writer, "    rank=\"sink\";")?;
        for &node in &self.object_nodes {
            writeln!(
                writer,
                "    {} [fillcolor=\"tan1\", label=\"{}\"];",
                node,
                self.label_of(node)
            )?;
        }
        writeln!(writer, "    }}")?;

        for (source, target) in self
            .temporal_spatial_edges
            .iter()
            .chain(self.spatial_object_edges.iter())
        {
            writeln!(writer, "    {source} -> {target} [arrowhead = \"normal\"];")?;
        }
        writeln!(writer, "}}")?;
        Ok(())
    }

    /// JSON export for reporting collaborators.
    pub fn to_json(&self) -> Result<String> {
        #[derive(Serialize)]
        struct NodeExport<'a> {
            id: usize,
            class: &'static str,
            label: &'a str,
        }
        #[derive(Serialize)]
        struct EdgeExport {
            class: &'static str,
            source: usize,
            target: usize,
        }
        #[derive(Serialize)]
        struct GraphExport<'a> {
            nodes: Vec<NodeExport<'a>>,
            edges: Vec<EdgeExport>,
            canonical_hash: u64,
        }

        let class_of = |node: usize| -> &'static str {
            if self.temporal_nodes.contains(&node) {
                "temporal"
            } else if self.spatial_nodes.contains(&node) {
                "spatial"
            } else {
                "object"
            }
        };

        let nodes = (0..self.graph.node_count())
            .map(|id| NodeExport { id, class: class_of(id), label: self.label_of(id) })
            .collect();
        let edges = self
            .temporal_spatial_edges
            .iter()
            .map(|&(source, target)| EdgeExport { class: "temporal_spatial", source, target })
            .chain(self.spatial_object_edges.iter().map(|&(source, target)| EdgeExport {
                class: "spatial_object",
                source,
                target,
            }))
            .collect();

        let export = GraphExport { nodes, edges, canonical_hash: self.canonical_hash() };
        Ok(serde_json::to_string_pretty(&export)?)
    }

    fn label_of(&self, node: usize) -> &str {
        self.graph.node_label(node).unwrap_or("")
    }
}

/// Drop graphlets whose activity graphs are structurally identical.
///
/// The canonical hash keys the grouping; the canonical serialization is
/// compared before two graphlets are merged, so a hash collision between
/// non-isomorphic graphs never collapses distinct structures.
pub fn dedup_graphlets(graphlets: Vec<Graphlet>) -> Vec<Graphlet> {
    let mut seen: hashbrown::HashMap<u64, Vec<String>> = hashbrown::HashMap::new();
    let before = graphlets.len();

    let deduped: Vec<Graphlet> = graphlets
        .into_iter()
        .filter(|graphlet| {
            let graph = ActivityGraph::from_graphlet(graphlet);
            let form = graph.canonical_form();
            let forms = seen.entry(graph.canonical_hash()).or_default();
            if forms.iter().any(|known| *known == form) {
                return false;
            }
            forms.push(form);
            true
        })
        .collect();

    debug!(before, after = deduped.len(), "deduplicated graphlets");
    deduped
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::model::{FrameSpan, ObjectPair, QsrValue, RelationKind};

    fn episode(a: &str, b: &str, label: &str, start: i64, end: i64) -> Episode {
        let mut relations = BTreeMap::new();
        relations.insert(RelationKind::Rcc3, QsrValue::label(label));
        Episode::new(ObjectPair::new(a, b), relations, FrameSpan::new(start, end))
    }

    #[test]
    fn test_layer_counts() {
        let eps = vec![
            episode("mug", "hand", "sur", 1, 3),
            episode("mug", "hand", "con", 4, 6),
        ];
        let graph = ActivityGraph::from_episodes(&eps);

        // 2 objects, 2 spatial, 1 temporal (one episode pair).
        assert_eq!(graph.object_nodes.len(), 2);
        assert_eq!(graph.spatial_nodes.len(), 2);
        assert_eq!(graph.temporal_nodes.len(), 1);
        // Each spatial node reaches both objects; the temporal node
        // reaches both spatial nodes.
        assert_eq!(graph.spatial_object_edges.len(), 4);
        assert_eq!(graph.temporal_spatial_edges.len(), 2);
    }

    #[test]
    fn test_entities_shared_across_episodes_reuse_object_nodes() {
        let eps = vec![
            episode("mug", "hand", "sur", 1, 3),
            episode("mug", "hand", "con", 4, 6),
        ];
        let graph = ActivityGraph::from_episodes(&eps);

        // Both spatial nodes wire to the same two object nodes, and
        // every edge target really is an object node.
        let targets: std::collections::BTreeSet<usize> =
            graph.spatial_object_edges.iter().map(|&(_, object)| object).collect();
        assert_eq!(targets.len(), 2);
        for target in targets {
            assert!(graph.object_nodes.contains(&target));
        }
    }

    #[test]
    fn test_temporal_label_is_allen_symbol() {
        let eps = vec![
            episode("mug", "hand", "sur", 1, 3),
            episode("mug", "hand", "con", 4, 6),
        ];
        let graph = ActivityGraph::from_episodes(&eps);
        let temporal = graph.temporal_nodes[0];
        // Adjacent frame spans meet.
        assert_eq!(graph.label_of(temporal), "m");
    }

    #[test]
    fn test_hash_ignores_entity_ordering_with_same_structure() {
        let g1 = ActivityGraph::from_episodes(&[episode("mug", "hand", "sur", 1, 3)]);
        let g2 = ActivityGraph::from_episodes(&[episode("hand", "mug", "sur", 1, 3)]);
        // Same labels, same wiring, different insertion order.
        assert_eq!(g1.canonical_hash(), g2.canonical_hash());
    }

    #[test]
    fn test_dedup_collapses_identical_structures() {
        let a = Graphlet { episodes: vec![episode("mug", "hand", "sur", 1, 3)] };
        let b = Graphlet { episodes: vec![episode("mug", "hand", "sur", 10, 30)] };
        let c = Graphlet { episodes: vec![episode("mug", "hand", "con", 1, 3)] };

        // a and b differ only in absolute frames: same structure.
        let deduped = dedup_graphlets(vec![a, b, c]);
        assert_eq!(deduped.len(), 2);
    }

    #[test]
    fn test_dot_output_shape() {
        let eps = vec![
            episode("mug", "hand", "sur", 1, 3),
            episode("mug", "hand", "con", 4, 6),
        ];
        let graph = ActivityGraph::from_episodes(&eps);
        let mut out = Vec::new();
        graph.to_dot(&mut out).unwrap();
        let dot = String::from_utf8(out).unwrap();

        assert!(dot.starts_with("digraph activity_graph {"));
        assert!(dot.contains("rank=\"source\""));
        assert!(dot.contains("rank=\"sink\""));
        assert!(dot.contains("label=\"mug\""));
        assert!(dot.contains("->"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn test_json_export_shape() {
        let graph = ActivityGraph::from_episodes(&[episode("mug", "hand", "sur", 1, 3)]);
        let json = graph.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["nodes"].as_array().unwrap().len(), 3);
        assert_eq!(value["edges"].as_array().unwrap().len(), 2);
        assert!(value["canonical_hash"].is_u64());
    }
}
