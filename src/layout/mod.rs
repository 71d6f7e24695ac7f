mod lateral;
pub(crate) mod text;
mod tree;
pub(crate) mod types;
pub use lateral::place_lateral_nodes;
pub use tree::layout_tree;
pub use types::*;

use crate::config::LayoutConfig;
use crate::hierarchy::{Chart, Hierarchy};
use crate::ir::{EdgeKind, Graph};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use tracing::debug;

/// Lays out a validated chart inside a `width` x `height` canvas.
///
/// The tree pass positions the support hierarchy and the lateral pass adds
/// explanations, refutations and anything left over. Positions are relative
/// to the top-left corner of the area inside the margins.
pub fn compute_layout(chart: &Chart, width: f32, height: f32, config: &LayoutConfig) -> Layout {
    let margin = Margin {
        top: config.margin_top,
        right: config.margin_right,
        bottom: config.margin_bottom,
        left: config.margin_left,
    };
    let inner_width = (width - margin.left - margin.right).max(0.0);
    let inner_height = (height - margin.top - margin.bottom).max(0.0);

    let base = layout_tree(&chart.hierarchy, inner_width, inner_height, config);
    let positions = place_lateral_nodes(
        &base,
        &chart.graph,
        &chart.hierarchy,
        inner_width,
        inner_height,
        config,
    );
    debug!(
        tree = base.len(),
        total = positions.len(),
        "layout complete"
    );

    Layout {
        positions,
        width: width.max(0.0),
        height: height.max(0.0),
        inner_width,
        inner_height,
        margin,
    }
}
