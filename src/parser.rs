use crate::ir::{Graph, RawChart, RawEdge, RawNode};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static EDGE_ENDPOINTS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<from>\S(?:.*?\S)?)\s*->\s*(?P<to>\S(?:.*?\S)?)$").unwrap());
static ATTRIBUTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<key>[A-Za-z_][\w-]*)\s*:\s*(?P<value>.*?)\s*$").unwrap());

const NODES_MARKER: &str = "Nodes:";
const EDGES_MARKER: &str = "Edges:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Nodes,
    Edges,
}

/// Reads the chart notation into raw records.
///
/// Parsing is lenient: lines outside a section, comment lines and lines that
/// do not split into the required fields are skipped without error. Type names
/// and attribute values are kept verbatim; `build_hierarchy` validates them.
pub fn parse_records(input: &str) -> RawChart {
    let mut chart = RawChart::default();
    let mut section = Section::Preamble;

    for (line_no, raw_line) in input.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line == NODES_MARKER {
            section = Section::Nodes;
            continue;
        }
        if line == EDGES_MARKER {
            section = Section::Edges;
            continue;
        }

        let parsed = match section {
            Section::Preamble => false,
            Section::Nodes => parse_node_line(line)
                .map(|node| chart.nodes.push(node))
                .is_some(),
            Section::Edges => parse_edge_line(line)
                .map(|edge| chart.edges.push(edge))
                .is_some(),
        };
        if !parsed {
            debug!(line = line_no + 1, text = line, "skipping unparsable line");
        }
    }

    chart
}

fn split_fields(line: &str) -> Vec<&str> {
    line.split('|').map(str::trim).collect()
}

fn parse_attribute(field: &str) -> Option<(String, &str)> {
    let caps = ATTRIBUTE_RE.captures(field)?;
    let key = caps.name("key")?.as_str().to_ascii_lowercase();
    let value = caps.name("value")?.as_str();
    Some((key, value))
}

fn parse_node_line(line: &str) -> Option<RawNode> {
    let fields = split_fields(line);
    if fields.len() < 3 {
        return None;
    }
    let mut node = RawNode {
        id: fields[0].to_string(),
        label: fields[1].to_string(),
        kind: fields[2].to_string(),
        source: None,
        belief: None,
    };
    for field in &fields[3..] {
        match parse_attribute(field) {
            Some((key, value)) if key == "source" => node.source = Some(value.to_string()),
            Some((key, value)) if key == "belief" => node.belief = Some(value.to_string()),
            _ => {}
        }
    }
    Some(node)
}

fn parse_edge_line(line: &str) -> Option<RawEdge> {
    let fields = split_fields(line);
    if fields.len() < 2 {
        return None;
    }
    let caps = EDGE_ENDPOINTS_RE.captures(fields[0])?;
    let mut edge = RawEdge {
        from: caps.name("from")?.as_str().to_string(),
        to: caps.name("to")?.as_str().to_string(),
        kind: fields[1].to_string(),
        strength: None,
    };
    for field in &fields[2..] {
        if let Some((key, value)) = parse_attribute(field)
            && key == "strength"
        {
            edge.strength = Some(value.to_string());
        }
    }
    Some(edge)
}

/// Writes a validated graph back out in the chart notation.
pub fn serialize_graph(graph: &Graph) -> String {
    let mut out = String::from(NODES_MARKER);
    out.push('\n');
    for node in &graph.nodes {
        out.push_str(&format!(
            "{} | {} | {}",
            node.id,
            node.label.replace('|', "/"),
            node.kind.as_str()
        ));
        if let Some(source) = node.source {
            out.push_str(&format!(" | source: {}", source.symbol()));
        }
        if let Some(belief) = node.belief {
            out.push_str(&format!(" | belief: {}", belief.symbol()));
        }
        out.push('\n');
    }
    out.push_str(EDGES_MARKER);
    out.push('\n');
    for edge in &graph.edges {
        out.push_str(&format!("{} -> {} | {}", edge.from, edge.to, edge.kind.as_str()));
        if let Some(strength) = edge.strength {
            out.push_str(&format!(" | strength: {}", strength.as_str()));
        }
        out.push('\n');
    }
    out
}
