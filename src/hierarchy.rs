//! Validation of raw chart records and derivation of the support hierarchy.

use crate::error::HierarchyError;
use crate::ir::{
    Belief, Edge, EdgeKind, Graph, Node, NodeKind, Notation, RawEdge, RawNode, Source, Strength,
};
use crate::parser::parse_records;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Support tree derived from a graph. Children are the sources of support
/// edges pointing at a node, in edge order and without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hierarchy {
    pub root: String,
    pub children: BTreeMap<String, Vec<String>>,
}

impl Hierarchy {
    pub fn children_of(&self, id: &str) -> &[String] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Nodes reachable from the root through support edges, in visit order.
    pub fn descendants(&self) -> Vec<String> {
        let mut order = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![self.root.clone()];
        while let Some(id) = stack.pop() {
            if !seen.insert(id.clone()) {
                continue;
            }
            for child in self.children_of(&id).iter().rev() {
                stack.push(child.clone());
            }
            order.push(id);
        }
        order
    }
}

/// A validated graph together with its support hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chart {
    pub graph: Graph,
    pub hierarchy: Hierarchy,
}

impl Chart {
    pub fn from_text(input: &str, notation: Notation) -> Result<Self, HierarchyError> {
        let raw = parse_records(input);
        build_hierarchy(&raw.nodes, &raw.edges, notation)
    }
}

/// Filters raw records into a valid graph and builds the support hierarchy.
///
/// Invalid nodes (empty id, unknown or disallowed type, repeated id) and edges
/// (unknown type, dangling endpoint) are dropped rather than reported. The
/// root is the first conclusion, falling back to the first surviving node.
pub fn build_hierarchy(
    nodes: &[RawNode],
    edges: &[RawEdge],
    notation: Notation,
) -> Result<Chart, HierarchyError> {
    let mut graph = Graph::new();
    let mut known: HashSet<String> = HashSet::new();

    for raw in nodes {
        let id = raw.id.trim();
        if id.is_empty() {
            debug!("dropping node with empty id");
            continue;
        }
        let Some(kind) = NodeKind::from_token(&raw.kind).filter(|kind| notation.accepts_node(*kind))
        else {
            debug!(id, kind = raw.kind.as_str(), "dropping node with unsupported type");
            continue;
        };
        if !known.insert(id.to_string()) {
            debug!(id, "dropping duplicate node id");
            continue;
        }
        graph.nodes.push(Node {
            id: id.to_string(),
            label: raw.label.trim().to_string(),
            kind,
            source: raw.source.as_deref().and_then(Source::from_token),
            belief: raw.belief.as_deref().and_then(Belief::from_token),
        });
    }

    for raw in edges {
        let Some(kind) = EdgeKind::from_token(&raw.kind).filter(|kind| notation.accepts_edge(*kind))
        else {
            debug!(from = raw.from.as_str(), to = raw.to.as_str(), kind = raw.kind.as_str(), "dropping edge with unsupported type");
            continue;
        };
        let from = raw.from.trim();
        let to = raw.to.trim();
        if !known.contains(from) || !known.contains(to) {
            debug!(from, to, "dropping edge with unknown endpoint");
            continue;
        }
        graph.edges.push(Edge {
            from: from.to_string(),
            to: to.to_string(),
            kind,
            strength: raw.strength.as_deref().and_then(Strength::from_token),
        });
    }

    let root = graph
        .nodes
        .iter()
        .find(|node| node.kind == NodeKind::Conclusion)
        .or_else(|| graph.nodes.first())
        .map(|node| node.id.clone())
        .ok_or(HierarchyError::Empty)?;

    let mut children: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for edge in graph.edges_of_kind(EdgeKind::Support) {
        let list = children.entry(edge.to.clone()).or_default();
        if !list.contains(&edge.from) {
            list.push(edge.from.clone());
        }
    }

    let hierarchy = Hierarchy { root, children };
    if let Some(node) = find_support_cycle(&graph, &hierarchy) {
        return Err(HierarchyError::CycleDetected { node });
    }

    debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        root = hierarchy.root.as_str(),
        "built support hierarchy"
    );
    Ok(Chart { graph, hierarchy })
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Open,
    Done,
}

/// Iterative depth-first search over every support edge; returns a node that
/// sits on a cycle, if any.
fn find_support_cycle(graph: &Graph, hierarchy: &Hierarchy) -> Option<String> {
    let mut marks: HashMap<&str, Mark> = HashMap::new();
    for start in &graph.nodes {
        if marks.contains_key(start.id.as_str()) {
            continue;
        }
        let mut stack: Vec<(&str, usize)> = vec![(start.id.as_str(), 0)];
        marks.insert(start.id.as_str(), Mark::Open);
        while let Some((id, next)) = stack.last().copied() {
            let children = hierarchy.children_of(id);
            if let Some(child) = children.get(next) {
                if let Some(frame) = stack.last_mut() {
                    frame.1 += 1;
                }
                match marks.get(child.as_str()) {
                    Some(Mark::Open) => return Some(child.clone()),
                    Some(Mark::Done) => {}
                    None => {
                        marks.insert(child.as_str(), Mark::Open);
                        stack.push((child.as_str(), 0));
                    }
                }
            } else {
                marks.insert(id, Mark::Done);
                stack.pop();
            }
        }
    }
    None
}
