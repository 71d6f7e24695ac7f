use super::*;

#[derive(Debug)]
struct TreeNode {
    id: String,
    parent: Option<usize>,
    children: Vec<usize>,
    depth: usize,
}

/// One row of a subtree outline, relative to the subtree root.
#[derive(Debug, Clone, Copy)]
struct ContourRow {
    left: f32,
    left_node: usize,
    right: f32,
    right_node: usize,
}

/// Contour row of the siblings merged so far, tagged with the sibling
/// positions that own each side.
#[derive(Debug, Clone, Copy)]
struct MergedRow {
    row: ContourRow,
    left_owner: usize,
    right_owner: usize,
}

/// Sibling at `to` was pushed `excess` further right to clear the subtree at
/// `from`. The siblings strictly between take a proportional share of it so
/// they stay evenly spaced.
fn spread_shift(
    merged: &mut [MergedRow],
    offsets: &mut [f32],
    children: &[usize],
    from: usize,
    to: usize,
    excess: f32,
) {
    let span = (to - from) as f32;
    for between in (from + 1)..to {
        let delta = excess * (between - from) as f32 / span;
        offsets[children[between]] += delta;
        for merged_row in merged.iter_mut() {
            if merged_row.left_owner == between {
                merged_row.row.left += delta;
            }
            if merged_row.right_owner == between {
                merged_row.row.right += delta;
            }
        }
    }
}

/// Flattens the hierarchy breadth-first. A node reachable from two parents
/// is kept under the first one reached.
fn collect_tree(hierarchy: &Hierarchy) -> Vec<TreeNode> {
    let mut nodes = vec![TreeNode {
        id: hierarchy.root.clone(),
        parent: None,
        children: Vec::new(),
        depth: 0,
    }];
    let mut seen: HashSet<&str> = HashSet::from([hierarchy.root.as_str()]);
    let mut queue = VecDeque::from([0usize]);

    while let Some(idx) = queue.pop_front() {
        let depth = nodes[idx].depth;
        let child_ids = hierarchy.children_of(&nodes[idx].id);
        for child_id in child_ids {
            if !seen.insert(child_id.as_str()) {
                continue;
            }
            let child_idx = nodes.len();
            nodes.push(TreeNode {
                id: child_id.clone(),
                parent: Some(idx),
                children: Vec::new(),
                depth: depth + 1,
            });
            nodes[idx].children.push(child_idx);
            queue.push_back(child_idx);
        }
    }

    nodes
}

fn separation(nodes: &[TreeNode], a: usize, b: usize, config: &LayoutConfig) -> f32 {
    if nodes[a].parent.is_some() && nodes[a].parent == nodes[b].parent {
        config.sibling_separation
    } else {
        config.cousin_separation
    }
}

/// Tidy tree layout of the support hierarchy.
///
/// Subtrees are packed left to right by comparing facing contours. When a
/// subtree has to clear a sibling further left than its neighbour, the
/// siblings in between are spread evenly. Each parent is centred over its
/// outermost children. The result is scaled into `width` x `height` with the
/// root at `y = 0` and the deepest level at `y = height`.
pub fn layout_tree(
    hierarchy: &Hierarchy,
    width: f32,
    height: f32,
    config: &LayoutConfig,
) -> PositionMap {
    let nodes = collect_tree(hierarchy);
    let count = nodes.len();

    // Offsets of each node relative to its parent, filled bottom-up. Node
    // indices are in breadth-first order, so reverse order visits children
    // before their parents.
    let mut offsets = vec![0.0f32; count];
    let mut contours: Vec<Vec<ContourRow>> = vec![Vec::new(); count];

    for idx in (0..count).rev() {
        let children = nodes[idx].children.clone();
        let own_row = ContourRow {
            left: 0.0,
            left_node: idx,
            right: 0.0,
            right_node: idx,
        };
        if children.is_empty() {
            contours[idx] = vec![own_row];
            continue;
        }

        let mut merged: Vec<MergedRow> = std::mem::take(&mut contours[children[0]])
            .into_iter()
            .map(|row| MergedRow {
                row,
                left_owner: 0,
                right_owner: 0,
            })
            .collect();
        offsets[children[0]] = 0.0;

        for (pos, &child) in children.iter().enumerate().skip(1) {
            let outline = std::mem::take(&mut contours[child]);
            let mut shift = f32::NEG_INFINITY;
            for (level, next) in outline.iter().enumerate() {
                let Some(facing) = merged.get(level).copied() else {
                    break;
                };
                let gap = separation(&nodes, facing.row.right_node, next.left_node, config);
                let needed = facing.row.right + gap - next.left;
                if needed <= shift {
                    continue;
                }
                if shift.is_finite() && facing.right_owner + 1 < pos {
                    spread_shift(
                        &mut merged,
                        &mut offsets,
                        &children,
                        facing.right_owner,
                        pos,
                        needed - shift,
                    );
                }
                shift = needed;
            }
            offsets[child] = shift;

            for (level, next) in outline.into_iter().enumerate() {
                let shifted = ContourRow {
                    left: next.left + shift,
                    left_node: next.left_node,
                    right: next.right + shift,
                    right_node: next.right_node,
                };
                match merged.get_mut(level) {
                    Some(row) => {
                        row.row.right = shifted.right;
                        row.row.right_node = shifted.right_node;
                        row.right_owner = pos;
                    }
                    None => merged.push(MergedRow {
                        row: shifted,
                        left_owner: pos,
                        right_owner: pos,
                    }),
                }
            }
        }

        let first = offsets[children[0]];
        let last = offsets[children[children.len() - 1]];
        let mid = (first + last) / 2.0;
        for &child in &children {
            offsets[child] -= mid;
        }

        let mut outline = Vec::with_capacity(merged.len() + 1);
        outline.push(own_row);
        outline.extend(merged.into_iter().map(|merged_row| ContourRow {
            left: merged_row.row.left - mid,
            right: merged_row.row.right - mid,
            ..merged_row.row
        }));
        contours[idx] = outline;
    }

    // Parents precede children in breadth-first order.
    let mut xs = vec![0.0f32; count];
    for idx in 1..count {
        if let Some(parent) = nodes[idx].parent {
            xs[idx] = xs[parent] + offsets[idx];
        }
    }

    let mut left = 0usize;
    let mut right = 0usize;
    let mut max_depth = 0usize;
    for idx in 0..count {
        if xs[idx] < xs[left] {
            left = idx;
        }
        if xs[idx] > xs[right] {
            right = idx;
        }
        max_depth = max_depth.max(nodes[idx].depth);
    }

    let pad = if left == right {
        1.0
    } else {
        separation(&nodes, left, right, config) / 2.0
    };
    let tx = pad - xs[left];
    let span = xs[right] + pad + tx;
    let kx = if span > 0.0 { width.max(0.0) / span } else { 0.0 };
    let ky = height.max(0.0) / max_depth.max(1) as f32;

    let mut positions = PositionMap::new();
    for (idx, node) in nodes.iter().enumerate() {
        positions.insert(
            node.id.clone(),
            Point::new((xs[idx] + tx) * kx, node.depth as f32 * ky),
        );
    }
    debug!(nodes = count, depth = max_depth, "tree pass placed nodes");
    positions
}
