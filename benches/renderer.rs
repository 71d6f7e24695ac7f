use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use wigmore_renderer::config::Config;
use wigmore_renderer::hierarchy::{Chart, build_hierarchy};
use wigmore_renderer::ir::Notation;
use wigmore_renderer::layout::compute_layout;
use wigmore_renderer::parser::parse_records;
use wigmore_renderer::render::{render, render_svg};
use std::hint::black_box;

/// Builds a chart with a support tree of the given fan-out and depth, plus an
/// explanation and a refutation hung off every inference.
fn branching_chart_source(fanout: usize, depth: usize) -> String {
    let mut nodes = String::from("Nodes:\nC0 | Ultimate claim | conclusion\n");
    let mut edges = String::from("Edges:\n");
    let mut frontier = vec!["C0".to_string()];
    let mut next_id = 0usize;
    for level in 0..depth {
        let mut next = Vec::new();
        for parent in &frontier {
            for _ in 0..fanout {
                next_id += 1;
                let id = format!("N{next_id}");
                let kind = if level + 1 == depth { "evidence" } else { "inference" };
                nodes.push_str(&format!("{id} | Proposition {next_id} | {kind} | belief: +\n"));
                edges.push_str(&format!("{id} -> {parent} | support | strength: strong\n"));
                if kind == "inference" {
                    nodes.push_str(&format!("X{next_id} | Innocent account {next_id} | explanation\n"));
                    nodes.push_str(&format!("R{next_id} | Rebuttal {next_id} | refutation\n"));
                    edges.push_str(&format!("X{next_id} -> {id} | explain\n"));
                    edges.push_str(&format!("R{next_id} -> {id} | refute | strength: weak\n"));
                }
                next.push(id);
            }
        }
        frontier = next;
    }
    nodes.push_str(&edges);
    nodes
}

fn fixture(name: &str) -> &'static str {
    match name {
        "simple" => include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/benches/fixtures/simple.wig")),
        "extended" => include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/benches/fixtures/extended.wig"
        )),
        _ => panic!("unknown fixture {name}"),
    }
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for name in ["simple", "extended"] {
        group.bench_with_input(BenchmarkId::from_parameter(name), fixture(name), |b, input| {
            b.iter(|| {
                let raw = parse_records(black_box(input));
                let chart = build_hierarchy(&raw.nodes, &raw.edges, Notation::Combined);
                black_box(chart.is_ok());
            });
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let config = Config::default();
    let mut inputs: Vec<(String, String)> = ["simple", "extended"]
        .iter()
        .map(|name| (name.to_string(), fixture(name).to_string()))
        .collect();
    for (fanout, depth) in [(3usize, 3usize), (4, 4), (6, 3)] {
        inputs.push((
            format!("branching_{fanout}x{depth}"),
            branching_chart_source(fanout, depth),
        ));
    }
    for (name, input) in &inputs {
        let chart = Chart::from_text(input, Notation::Combined).expect("chart failed");
        group.bench_with_input(BenchmarkId::from_parameter(name), &chart, |b, chart| {
            b.iter(|| {
                let layout = compute_layout(
                    black_box(chart),
                    config.render.width,
                    config.render.height,
                    &config.layout,
                );
                black_box(layout.positions.len());
            });
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let config = Config::default();
    for (name, input) in [
        ("extended".to_string(), fixture("extended").to_string()),
        ("branching_4x4".to_string(), branching_chart_source(4, 4)),
    ] {
        let chart = Chart::from_text(&input, Notation::Combined).expect("chart failed");
        let layout = compute_layout(
            &chart,
            config.render.width,
            config.render.height,
            &config.layout,
        );
        group.bench_with_input(BenchmarkId::from_parameter(&name), &layout, |b, layout| {
            b.iter(|| {
                let commands = render(black_box(&chart), layout, &config.theme, &config.layout);
                let svg = render_svg(&commands, &config.theme);
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_layout, bench_render);
criterion_main!(benches);
