use crate::config::{Config, LayoutConfig};
use crate::error::HierarchyError;
use crate::hierarchy::Chart;
use crate::ir::{Belief, EdgeKind, NodeKind, Notation, Source, Strength};
use crate::layout::text::measure_label;
use crate::layout::{Layout, Point, TextBlock, compute_layout};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    Square,
    Circle,
    DoubleCircle,
    Diamond,
    Triangle,
}

impl NodeShape {
    pub fn for_kind(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Evidence => NodeShape::Square,
            NodeKind::Inference => NodeShape::Circle,
            NodeKind::Conclusion => NodeShape::DoubleCircle,
            NodeKind::Explanation => NodeShape::Diamond,
            NodeKind::Refutation => NodeShape::Triangle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeStroke {
    /// Solid line ending in an arrow.
    Solid,
    Dashed,
    /// Solid line ending in a cross marker.
    Cross,
}

impl EdgeStroke {
    pub fn for_kind(kind: EdgeKind) -> Self {
        match kind {
            EdgeKind::Support => EdgeStroke::Solid,
            EdgeKind::Contradict | EdgeKind::Explain => EdgeStroke::Dashed,
            EdgeKind::Refute => EdgeStroke::Cross,
        }
    }
}

pub fn stroke_width(strength: Option<Strength>) -> f32 {
    match strength {
        Some(Strength::Strong) => 2.6,
        Some(Strength::Weak) => 0.8,
        None => 1.4,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphKind {
    Source(Source),
    Belief(Belief),
}

/// One drawing instruction, in absolute chart coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Edge {
        from: String,
        to: String,
        kind: EdgeKind,
        points: Vec<(f32, f32)>,
        stroke: EdgeStroke,
        width: f32,
    },
    Shape {
        id: String,
        kind: NodeKind,
        shape: NodeShape,
        x: f32,
        y: f32,
        radius: f32,
    },
    Label {
        id: String,
        x: f32,
        y: f32,
        text: TextBlock,
    },
    Caption {
        id: String,
        x: f32,
        y: f32,
        text: String,
    },
    Glyph {
        id: String,
        kind: GlyphKind,
        x: f32,
        y: f32,
        text: String,
    },
    NoData {
        x: f32,
        y: f32,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommands {
    pub width: f32,
    pub height: f32,
    pub commands: Vec<DrawCommand>,
}

impl DrawCommands {
    pub fn no_data(width: f32, height: f32, message: &str) -> Self {
        Self {
            width,
            height,
            commands: vec![DrawCommand::NoData {
                x: width / 2.0,
                y: height / 2.0,
                message: message.to_string(),
            }],
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self.commands.as_slice(), [DrawCommand::NoData { .. }])
    }
}

/// Turns a laid-out chart into drawing instructions: edges first so shapes
/// paint over them, then shape, label, caption and glyphs per node.
pub fn render(chart: &Chart, layout: &Layout, theme: &Theme, config: &LayoutConfig) -> DrawCommands {
    let radius = config.node_radius.max(1.0);
    let mut commands = Vec::with_capacity(chart.graph.edges.len() + chart.graph.nodes.len() * 4);

    for edge in &chart.graph.edges {
        let start = layout.absolute(&edge.from);
        let end = layout.absolute(&edge.to);
        commands.push(DrawCommand::Edge {
            from: edge.from.clone(),
            to: edge.to.clone(),
            kind: edge.kind,
            points: trimmed_segment(start, end, radius),
            stroke: EdgeStroke::for_kind(edge.kind),
            width: stroke_width(edge.strength),
        });
    }

    for node in &chart.graph.nodes {
        let center = layout.absolute(&node.id);
        commands.push(DrawCommand::Shape {
            id: node.id.clone(),
            kind: node.kind,
            shape: NodeShape::for_kind(node.kind),
            x: center.x,
            y: center.y,
            radius,
        });
        commands.push(DrawCommand::Caption {
            id: node.id.clone(),
            x: center.x,
            y: center.y,
            text: node.id.clone(),
        });
        commands.push(DrawCommand::Label {
            id: node.id.clone(),
            x: center.x,
            y: center.y + radius + theme.font_size,
            text: measure_label(&node.label, theme, config),
        });
        if let Some(source) = node.source {
            commands.push(DrawCommand::Glyph {
                id: node.id.clone(),
                kind: GlyphKind::Source(source),
                x: center.x - radius,
                y: center.y - radius,
                text: source.symbol().to_string(),
            });
        }
        if let Some(belief) = node.belief {
            commands.push(DrawCommand::Glyph {
                id: node.id.clone(),
                kind: GlyphKind::Belief(belief),
                x: center.x + radius,
                y: center.y - radius,
                text: belief.symbol().to_string(),
            });
        }
    }

    DrawCommands {
        width: layout.width,
        height: layout.height,
        commands,
    }
}

/// Segment between two node centres, shortened so it starts and ends on the
/// node outlines. Coincident centres yield the bare points.
fn trimmed_segment(start: Point, end: Point, radius: f32) -> Vec<(f32, f32)> {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length = (dx * dx + dy * dy).sqrt();
    if length <= radius * 2.0 {
        return vec![(start.x, start.y), (end.x, end.y)];
    }
    let ux = dx / length;
    let uy = dy / length;
    vec![
        (start.x + ux * radius, start.y + uy * radius),
        (end.x - ux * radius, end.y - uy * radius),
    ]
}

/// Output of a full pipeline run.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    /// `None` when nothing survived validation.
    pub chart: Option<Chart>,
    pub layout: Option<Layout>,
    pub commands: DrawCommands,
}

/// Runs the whole pipeline on notation text. Charts with nothing valid in
/// them come back as the no-data state; support cycles are errors.
pub fn render_text(
    input: &str,
    notation: Notation,
    config: &Config,
) -> std::result::Result<RenderOutput, HierarchyError> {
    let width = config.render.width;
    let height = config.render.height;
    match Chart::from_text(input, notation) {
        Ok(chart) => {
            let layout = compute_layout(&chart, width, height, &config.layout);
            let commands = render(&chart, &layout, &config.theme, &config.layout);
            Ok(RenderOutput {
                chart: Some(chart),
                layout: Some(layout),
                commands,
            })
        }
        Err(HierarchyError::Empty) => {
            tracing::info!("no valid nodes, rendering empty state");
            Ok(RenderOutput {
                chart: None,
                layout: None,
                commands: DrawCommands::no_data(width, height, &config.render.no_data_message),
            })
        }
        Err(err) => Err(err),
    }
}

pub fn render_svg(commands: &DrawCommands, theme: &Theme) -> String {
    let mut svg = String::new();
    let width = commands.width.max(1.0);
    let height = commands.height.max(1.0);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    svg.push_str("<defs>");
    svg.push_str(&format!(
        "<marker id=\"arrow\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"7\" markerHeight=\"7\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{}\"/></marker>",
        theme.line_color
    ));
    svg.push_str(&format!(
        "<marker id=\"cross\" viewBox=\"0 0 10 10\" refX=\"5\" refY=\"5\" markerWidth=\"9\" markerHeight=\"9\" orient=\"auto\"><path d=\"M 1 1 L 9 9 M 9 1 L 1 9\" stroke=\"{}\" stroke-width=\"1.6\" fill=\"none\"/></marker>",
        theme.refute_color
    ));
    svg.push_str("</defs>");

    for command in &commands.commands {
        match command {
            DrawCommand::Edge {
                kind,
                points,
                stroke,
                width,
                ..
            } => {
                let color = match kind {
                    EdgeKind::Contradict => theme.contradict_color.as_str(),
                    EdgeKind::Refute => theme.refute_color.as_str(),
                    EdgeKind::Support | EdgeKind::Explain => theme.line_color.as_str(),
                };
                let decoration = match stroke {
                    EdgeStroke::Solid => "marker-end=\"url(#arrow)\"",
                    EdgeStroke::Dashed => "stroke-dasharray=\"6 4\"",
                    EdgeStroke::Cross => "marker-end=\"url(#cross)\"",
                };
                svg.push_str(&format!(
                    "<path class=\"edge edge-{}\" d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{:.2}\" {} />",
                    kind.as_str(),
                    points_to_path(points),
                    color,
                    width,
                    decoration
                ));
            }
            DrawCommand::Shape {
                kind,
                shape,
                x,
                y,
                radius,
                ..
            } => {
                svg.push_str(&shape_svg(*kind, *shape, *x, *y, *radius, theme));
            }
            DrawCommand::Label { x, y, text, .. } => {
                svg.push_str(&text_block_svg(*x, *y, text, theme));
            }
            DrawCommand::Caption { x, y, text, .. } => {
                svg.push_str(&format!(
                    "<text class=\"caption\" x=\"{x:.2}\" y=\"{y:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
                    escape_xml(&theme.font_family),
                    theme.caption_font_size,
                    theme.caption_color,
                    escape_xml(text)
                ));
            }
            DrawCommand::Glyph { x, y, text, .. } => {
                svg.push_str(&format!(
                    "<text class=\"glyph\" x=\"{x:.2}\" y=\"{y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" font-weight=\"bold\" fill=\"{}\">{}</text>",
                    escape_xml(&theme.font_family),
                    theme.font_size,
                    theme.text_color,
                    escape_xml(text)
                ));
            }
            DrawCommand::NoData { x, y, message } => {
                svg.push_str(&format!(
                    "<text class=\"no-data\" x=\"{x:.2}\" y=\"{y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
                    escape_xml(&theme.font_family),
                    theme.font_size * 1.5,
                    theme.caption_color,
                    escape_xml(message)
                ));
            }
        }
    }

    svg.push_str("</svg>");
    svg
}

fn node_fill(kind: NodeKind, theme: &Theme) -> &str {
    match kind {
        NodeKind::Conclusion => theme.conclusion_fill.as_str(),
        NodeKind::Explanation => theme.explanation_fill.as_str(),
        NodeKind::Refutation => theme.refutation_fill.as_str(),
        NodeKind::Evidence | NodeKind::Inference => theme.node_fill.as_str(),
    }
}

fn shape_svg(kind: NodeKind, shape: NodeShape, x: f32, y: f32, r: f32, theme: &Theme) -> String {
    let fill = node_fill(kind, theme);
    let stroke = &theme.node_stroke;
    match shape {
        NodeShape::Square => format!(
            "<rect class=\"node node-{}\" x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{fill}\" stroke=\"{stroke}\" stroke-width=\"1.4\"/>",
            kind.as_str(),
            x - r,
            y - r,
            r * 2.0,
            r * 2.0
        ),
        NodeShape::Circle => format!(
            "<circle class=\"node node-{}\" cx=\"{x:.2}\" cy=\"{y:.2}\" r=\"{r:.2}\" fill=\"{fill}\" stroke=\"{stroke}\" stroke-width=\"1.4\"/>",
            kind.as_str()
        ),
        NodeShape::DoubleCircle => {
            let inner = (r - 4.0).max(1.0);
            format!(
                "<g class=\"node node-{}\"><circle cx=\"{x:.2}\" cy=\"{y:.2}\" r=\"{r:.2}\" fill=\"{fill}\" stroke=\"{stroke}\" stroke-width=\"1.4\"/><circle cx=\"{x:.2}\" cy=\"{y:.2}\" r=\"{inner:.2}\" fill=\"none\" stroke=\"{stroke}\" stroke-width=\"1.0\"/></g>",
                kind.as_str()
            )
        }
        NodeShape::Diamond => format!(
            "<polygon class=\"node node-{}\" points=\"{:.2},{:.2} {:.2},{:.2} {:.2},{:.2} {:.2},{:.2}\" fill=\"{fill}\" stroke=\"{stroke}\" stroke-width=\"1.4\"/>",
            kind.as_str(),
            x,
            y - r,
            x + r,
            y,
            x,
            y + r,
            x - r,
            y
        ),
        NodeShape::Triangle => format!(
            "<polygon class=\"node node-{}\" points=\"{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}\" fill=\"{fill}\" stroke=\"{stroke}\" stroke-width=\"1.4\"/>",
            kind.as_str(),
            x,
            y - r,
            x + r,
            y + r * 0.8,
            x - r,
            y + r * 0.8
        ),
    }
}

fn points_to_path(points: &[(f32, f32)]) -> String {
    if points.is_empty() {
        return String::new();
    }
    let mut d = String::new();
    d.push_str(&format!("M {:.2} {:.2}", points[0].0, points[0].1));
    for point in points.iter().skip(1) {
        d.push_str(&format!(" L {:.2} {:.2}", point.0, point.1));
    }
    d
}

fn text_block_svg(x: f32, y: f32, label: &TextBlock, theme: &Theme) -> String {
    let line_height = if label.lines.is_empty() {
        theme.font_size
    } else {
        label.height / label.lines.len() as f32
    };
    let mut text = String::new();
    text.push_str(&format!(
        "<text class=\"label\" x=\"{x:.2}\" y=\"{y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">",
        escape_xml(&theme.font_family),
        theme.font_size,
        theme.text_color
    ));
    for (idx, line) in label.lines.iter().enumerate() {
        let dy = if idx == 0 { 0.0 } else { line_height };
        text.push_str(&format!(
            "<tspan x=\"{x:.2}\" dy=\"{dy:.2}\">{}</tspan>",
            escape_xml(line)
        ));
    }
    text.push_str("</text>");
    text
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &crate::config::RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.default_size = usvg::Size::from_wh(render_cfg.width.max(1.0), render_cfg.height.max(1.0))
        .ok_or_else(|| anyhow::anyhow!("Invalid render size"))?;
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;
    if let Some(color) = parse_hex_color(&render_cfg.background) {
        pixmap.fill(color);
    }

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

/// `#RRGGBB` only; anything else leaves the pixmap transparent.
#[cfg(feature = "png")]
fn parse_hex_color(value: &str) -> Option<resvg::tiny_skia::Color> {
    let hex = value.trim().strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    Some(resvg::tiny_skia::Color::from_rgba8(
        channel(0..2)?,
        channel(2..4)?,
        channel(4..6)?,
        255,
    ))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    const CASE: &str = r#"
Nodes:
C1 | Accused is guilty | conclusion | belief: ++
I1 | Accused was at the scene | inference
E1 | Neighbour saw him | evidence | source: *
E2 | Court notices sunset time | evidence | source: q
E3 | Alibi witness | evidence
X1 | It was his brother | explanation
R1 | Brother was abroad | refutation
Edges:
I1 -> C1 | support | strength: strong
E1 -> I1 | support
E2 -> I1 | support | strength: weak
E3 -> I1 | contradict
X1 -> I1 | explain
R1 -> X1 | refute
"#;

    fn commands() -> DrawCommands {
        render_text(CASE, Notation::Combined, &Config::default())
            .unwrap()
            .commands
    }

    #[test]
    fn emits_one_edge_per_valid_edge_and_one_shape_per_node() {
        let commands = commands();
        let edges = commands
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Edge { .. }))
            .count();
        let shapes = commands
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Shape { .. }))
            .count();
        assert_eq!(edges, 6);
        assert_eq!(shapes, 7);
    }

    #[test]
    fn edges_are_styled_by_kind_and_strength() {
        let commands = commands();
        for command in &commands.commands {
            if let DrawCommand::Edge {
                from,
                kind,
                stroke,
                width,
                ..
            } = command
            {
                assert_eq!(*stroke, EdgeStroke::for_kind(*kind));
                match from.as_str() {
                    "I1" => assert_eq!(*width, 2.6),
                    "E2" => assert_eq!(*width, 0.8),
                    _ => assert_eq!(*width, 1.4),
                }
            }
        }
        assert_eq!(EdgeStroke::for_kind(EdgeKind::Support), EdgeStroke::Solid);
        assert_eq!(EdgeStroke::for_kind(EdgeKind::Contradict), EdgeStroke::Dashed);
        assert_eq!(EdgeStroke::for_kind(EdgeKind::Explain), EdgeStroke::Dashed);
        assert_eq!(EdgeStroke::for_kind(EdgeKind::Refute), EdgeStroke::Cross);
    }

    #[test]
    fn every_node_kind_has_its_own_shape() {
        let kinds = [
            NodeKind::Evidence,
            NodeKind::Inference,
            NodeKind::Conclusion,
            NodeKind::Explanation,
            NodeKind::Refutation,
        ];
        let shapes: Vec<NodeShape> = kinds.iter().map(|k| NodeShape::for_kind(*k)).collect();
        for (i, a) in shapes.iter().enumerate() {
            for b in &shapes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn glyphs_follow_provenance_and_belief() {
        let commands = commands();
        let glyphs: Vec<(&str, &str)> = commands
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Glyph { id, text, .. } => Some((id.as_str(), text.as_str())),
                _ => None,
            })
            .collect();
        assert_eq!(glyphs, vec![("C1", "++"), ("E1", "*"), ("E2", "q")]);
    }

    #[test]
    fn empty_chart_renders_no_data() {
        let output =
            render_text("Nodes:\nEdges:\n", Notation::Combined, &Config::default()).unwrap();
        assert!(output.chart.is_none());
        assert!(output.layout.is_none());
        let commands = output.commands;
        assert!(commands.is_no_data());
        let svg = render_svg(&commands, &Theme::classic());
        assert!(svg.contains("No data to display"));
        assert!(!svg.contains("class=\"node"));
    }

    #[test]
    fn cyclic_support_is_an_error() {
        let input = "Nodes:\nA | a | inference\nB | b | inference\nEdges:\nA -> B | support\nB -> A | support\n";
        let result = render_text(input, Notation::Combined, &Config::default());
        assert!(matches!(result, Err(HierarchyError::CycleDetected { .. })));
    }

    #[test]
    fn svg_is_rebuilt_from_scratch_each_time() {
        let theme = Theme::classic();
        let first = render_svg(&commands(), &theme);
        let second = render_svg(&commands(), &theme);
        assert_eq!(first, second);
        assert_eq!(first.matches("<svg").count(), 1);
        assert!(first.contains("Accused"));
        assert!(first.contains("url(#cross)"));
        assert!(first.contains("stroke-dasharray"));
    }

    #[test]
    fn labels_are_escaped() {
        let input = "Nodes:\nC | Smith & <Jones> | conclusion\n";
        let output = render_text(input, Notation::Combined, &Config::default()).unwrap();
        let svg = render_svg(&output.commands, &Theme::classic());
        assert!(svg.contains("Smith &amp; &lt;Jones&gt;"));
    }

    #[cfg(feature = "png")]
    #[test]
    fn png_background_accepts_six_digit_hex() {
        assert!(parse_hex_color("#FDFBF4").is_some());
        assert!(parse_hex_color("white").is_none());
        assert!(parse_hex_color("#FFF").is_none());
    }

    #[test]
    fn segment_is_trimmed_to_outlines() {
        let points = trimmed_segment(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 10.0);
        assert_eq!(points, vec![(10.0, 0.0), (90.0, 0.0)]);
        let close = trimmed_segment(Point::new(0.0, 0.0), Point::new(5.0, 0.0), 10.0);
        assert_eq!(close, vec![(0.0, 0.0), (5.0, 0.0)]);
    }
}
