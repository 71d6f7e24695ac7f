use crate::hierarchy::Chart;
use crate::layout::Layout;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub root: String,
    pub width: f32,
    pub height: f32,
    pub inner_width: f32,
    pub inner_height: f32,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub kind: String,
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub children: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub from: String,
    pub to: String,
    pub kind: String,
    pub strength: Option<String>,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout, chart: &Chart) -> Self {
        let nodes = chart
            .graph
            .nodes
            .iter()
            .map(|node| {
                let point = layout.position(&node.id);
                NodeDump {
                    id: node.id.clone(),
                    kind: node.kind.as_str().to_string(),
                    label: node.label.clone(),
                    x: point.x,
                    y: point.y,
                    children: chart.hierarchy.children_of(&node.id).to_vec(),
                }
            })
            .collect();

        let edges = chart
            .graph
            .edges
            .iter()
            .map(|edge| EdgeDump {
                from: edge.from.clone(),
                to: edge.to.clone(),
                kind: edge.kind.as_str().to_string(),
                strength: edge.strength.map(|s| s.as_str().to_string()),
            })
            .collect();

        LayoutDump {
            root: chart.hierarchy.root.clone(),
            width: layout.width,
            height: layout.height,
            inner_width: layout.inner_width,
            inner_height: layout.inner_height,
            nodes,
            edges,
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout, chart: &Chart) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout, chart);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::Notation;
    use crate::layout::compute_layout;

    #[test]
    fn dump_lists_positions_and_children() {
        let chart = Chart::from_text(
            "Nodes:\nC | claim | conclusion\nE | fact | evidence\nEdges:\nE -> C | support | strength: weak\n",
            Notation::Combined,
        )
        .unwrap();
        let layout = compute_layout(&chart, 800.0, 600.0, &LayoutConfig::default());
        let dump = LayoutDump::from_layout(&layout, &chart);
        assert_eq!(dump.root, "C");
        assert_eq!(dump.nodes.len(), 2);
        assert_eq!(dump.nodes[0].children, vec!["E".to_string()]);
        assert_eq!(dump.edges[0].strength.as_deref(), Some("weak"));

        let json = serde_json::to_value(&dump).unwrap();
        assert_eq!(json["nodes"][1]["kind"], "evidence");
        assert_eq!(json["nodes"][0]["y"], 0.0);
    }
}
