use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl Side {
    fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

struct LateralPlacer<'a> {
    config: &'a LayoutConfig,
    positions: PositionMap,
    levels: BTreeSet<i64>,
}

impl<'a> LateralPlacer<'a> {
    fn new(base: &PositionMap, config: &'a LayoutConfig) -> Self {
        let mut placer = Self {
            config,
            positions: PositionMap::new(),
            levels: BTreeSet::new(),
        };
        for (id, point) in base {
            placer.place(id, *point);
        }
        placer
    }

    fn level_of(&self, y: f32) -> i64 {
        let unit = if self.config.level_unit > 0.0 {
            self.config.level_unit
        } else {
            1.0
        };
        (y / unit).round() as i64
    }

    fn is_placed(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    fn position(&self, id: &str) -> Point {
        self.positions.get(id).copied().unwrap_or(Point::ORIGIN)
    }

    fn place(&mut self, id: &str, point: Point) {
        self.levels.insert(self.level_of(point.y));
        self.positions.insert(id.to_string(), point);
    }

    fn crowds_point(&self, slot: Point) -> bool {
        let tolerance = self.config.point_tolerance;
        self.positions.values().any(|p| p.near(slot, tolerance))
    }

    fn crowds_band(&self, slot: Point) -> bool {
        let level = self.level_of(slot.y);
        if !self.levels.contains(&level) {
            return false;
        }
        self.positions.values().any(|p| {
            self.level_of(p.y) == level && (p.x - slot.x).abs() < self.config.band_tolerance
        })
    }

    /// Walks a candidate slot down (point clash) or outward (band clash) until
    /// it is free or the nudge budget runs out.
    fn free_slot(&self, mut slot: Point, side: Side) -> Point {
        for _ in 0..self.config.max_nudges {
            if self.crowds_point(slot) {
                slot.y += self.config.nudge;
            } else if self.crowds_band(slot) {
                slot.x += side.sign() * self.config.nudge;
            } else {
                break;
            }
        }
        slot
    }

    /// Places the support descendants of a lateral node diagonally below it,
    /// on the node's side. Uses a work-list so shared or cyclic child links
    /// cannot loop.
    fn place_descendants(&mut self, root: &str, side: Side, hierarchy: &Hierarchy) {
        let mut queue = VecDeque::from([root.to_string()]);
        let mut visited: HashSet<String> = HashSet::from([root.to_string()]);
        while let Some(parent) = queue.pop_front() {
            let origin = self.position(&parent);
            for (k, child) in hierarchy.children_of(&parent).iter().enumerate() {
                if !visited.insert(child.clone()) || self.is_placed(child) {
                    continue;
                }
                let dx = side.sign()
                    * (self.config.descendant_offset_x + k as f32 * self.config.descendant_spread);
                let candidate = Point::new(origin.x + dx, origin.y + self.config.descendant_offset_y);
                let slot = self.free_slot(candidate, side);
                self.place(child, slot);
                queue.push_back(child.clone());
            }
        }
    }
}

/// Where a lateral edge sits among the edges of its kind aimed at the same
/// target.
#[derive(Debug, Clone, Copy)]
struct Slot {
    index: usize,
    count: usize,
}

/// Assigns slots to explain and refute edges in input order. Only the first
/// edge naming a source that the tree pass left unplaced gets one, so repeated
/// edges and already placed sources do not widen a group.
fn lateral_slots(graph: &Graph, placed: &PositionMap) -> Vec<Option<Slot>> {
    let mut claimed: HashSet<&str> = placed.keys().map(String::as_str).collect();
    let mut groups: HashMap<(EdgeKind, &str), Vec<usize>> = HashMap::new();
    for (idx, edge) in graph.edges.iter().enumerate() {
        if !matches!(edge.kind, EdgeKind::Explain | EdgeKind::Refute) {
            continue;
        }
        if claimed.insert(edge.from.as_str()) {
            groups
                .entry((edge.kind, edge.to.as_str()))
                .or_default()
                .push(idx);
        }
    }

    let mut slots = vec![None; graph.edges.len()];
    for members in groups.values() {
        for (index, &idx) in members.iter().enumerate() {
            slots[idx] = Some(Slot {
                index,
                count: members.len(),
            });
        }
    }
    slots
}

/// Positions the nodes the tree pass never reaches and resolves overlaps.
///
/// Explain and refute edges are taken in input order, so a target placed by
/// an earlier edge is already in position. Explanations go to the left of what
/// they explain, staggered around its y. Refutations go to the right of their
/// target, one slot further out per refutation, and are nudged off occupied
/// spots. Support children of either follow diagonally below. Anything still
/// unplaced sits at the origin. A single pairwise sweep then pushes close
/// pairs apart and every coordinate is clamped to the drawing area. The first
/// edge that reaches a node decides where it goes.
pub fn place_lateral_nodes(
    base: &PositionMap,
    graph: &Graph,
    hierarchy: &Hierarchy,
    width: f32,
    height: f32,
    config: &LayoutConfig,
) -> PositionMap {
    let mut placer = LateralPlacer::new(base, config);
    let slots = lateral_slots(graph, base);

    for (edge, slot) in graph.edges.iter().zip(slots) {
        let Some(slot) = slot else {
            continue;
        };
        if placer.is_placed(&edge.from) {
            continue;
        }
        let target = placer.position(&edge.to);
        match edge.kind {
            EdgeKind::Explain => {
                let spread =
                    (slot.index as f32 - (slot.count as f32 - 1.0) / 2.0) * config.explain_stagger;
                placer.place(
                    &edge.from,
                    Point::new(target.x - config.explain_offset, target.y + spread),
                );
                placer.place_descendants(&edge.from, Side::Left, hierarchy);
            }
            EdgeKind::Refute => {
                let candidate = Point::new(
                    target.x + config.refute_offset + slot.index as f32 * config.refute_spacing,
                    target.y,
                );
                let free = placer.free_slot(candidate, Side::Right);
                placer.place(&edge.from, free);
                placer.place_descendants(&edge.from, Side::Right, hierarchy);
            }
            EdgeKind::Support | EdgeKind::Contradict => {}
        }
    }

    let mut order: Vec<&str> = Vec::with_capacity(graph.nodes.len());
    for node in &graph.nodes {
        if !placer.is_placed(&node.id) {
            debug!(id = node.id.as_str(), "node unreachable from layout, using origin");
            placer.place(&node.id, Point::ORIGIN);
        }
        order.push(node.id.as_str());
    }

    let mut points: Vec<Point> = order.iter().map(|id| placer.position(id)).collect();
    spread_close_pairs(&mut points, config);

    let max_x = width.max(0.0);
    let max_y = height.max(0.0);
    let mut positions = PositionMap::new();
    for (id, point) in order.into_iter().zip(points) {
        positions.insert(
            id.to_string(),
            Point::new(point.x.clamp(0.0, max_x), point.y.clamp(0.0, max_y)),
        );
    }
    positions
}

/// One sweep over all pairs: the later node of a close pair moves down and
/// right until that pair is clear. Earlier pairs are not revisited.
fn spread_close_pairs(points: &mut [Point], config: &LayoutConfig) {
    let mut moved = 0usize;
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            let anchor = points[i];
            let mut steps = 0;
            while points[j].near(anchor, config.global_tolerance) && steps < config.max_nudges {
                points[j].x += config.nudge;
                points[j].y += config.nudge;
                steps += 1;
            }
            if steps > 0 {
                moved += 1;
            }
        }
    }
    if moved > 0 {
        debug!(moved, "global pass separated close pairs");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Notation;

    fn chart(input: &str) -> Chart {
        Chart::from_text(input, Notation::Combined).unwrap()
    }

    fn place(chart: &Chart, width: f32, height: f32, config: &LayoutConfig) -> PositionMap {
        let base = layout_tree(&chart.hierarchy, width, height, config);
        place_lateral_nodes(&base, &chart.graph, &chart.hierarchy, width, height, config)
    }

    #[test]
    fn refutations_fan_out_to_the_right() {
        let chart = chart(
            "Nodes:\nC | claim | conclusion\nR1 | first | refutation\nR2 | second | refutation\nEdges:\nR1 -> C | refute\nR2 -> C | refute\n",
        );
        let positions = place(&chart, 640.0, 400.0, &LayoutConfig::default());
        let c = positions["C"];
        let r1 = positions["R1"];
        let r2 = positions["R2"];
        assert_eq!(c, Point::new(320.0, 0.0));
        assert_eq!(r1, Point::new(470.0, 0.0));
        assert_eq!(r2, Point::new(590.0, 0.0));
    }

    #[test]
    fn refutation_slot_moves_off_crowded_band() {
        let chart = chart(
            "Nodes:\nC | claim | conclusion\nR1 | first | refutation\nR2 | second | refutation\nEdges:\nR1 -> C | refute\nR2 -> C | refute\n",
        );
        let config = LayoutConfig {
            refute_spacing: 40.0,
            ..LayoutConfig::default()
        };
        let positions = place(&chart, 800.0, 400.0, &config);
        let r1 = positions["R1"];
        let r2 = positions["R2"];
        assert_eq!(r1.y, r2.y);
        assert!(r2.x - r1.x >= config.band_tolerance);
    }

    #[test]
    fn refutation_slot_moves_off_occupied_point() {
        let chart = chart(
            "Nodes:\nC | claim | conclusion\nR1 | first | refutation\nR2 | second | refutation\nEdges:\nR1 -> C | refute\nR2 -> C | refute\n",
        );
        let config = LayoutConfig {
            refute_spacing: 0.0,
            ..LayoutConfig::default()
        };
        let positions = place(&chart, 800.0, 400.0, &config);
        let r1 = positions["R1"];
        let r2 = positions["R2"];
        assert_ne!(r1, r2);
        assert!(r2.y > r1.y);
        assert!(!r1.near(r2, config.global_tolerance));
    }

    #[test]
    fn explanations_are_staggered_around_target() {
        let chart = chart(
            "Nodes:\nC | claim | conclusion\nI | step | inference\nE | fact | evidence\nX1 | alt one | explanation\nX2 | alt two | explanation\nEdges:\nI -> C | support\nE -> I | support\nX1 -> I | explain\nX2 -> I | explain\n",
        );
        let positions = place(&chart, 640.0, 400.0, &LayoutConfig::default());
        let target = positions["I"];
        assert_eq!(target, Point::new(320.0, 200.0));
        assert_eq!(positions["X1"], Point::new(170.0, 170.0));
        assert_eq!(positions["X2"], Point::new(170.0, 230.0));
    }

    #[test]
    fn single_explanation_sits_level_with_target() {
        let chart = chart(
            "Nodes:\nC | claim | conclusion\nI | step | inference\nX | alt | explanation\nEdges:\nI -> C | support\nX -> I | explain\n",
        );
        let positions = place(&chart, 640.0, 400.0, &LayoutConfig::default());
        assert_eq!(positions["X"].y, positions["I"].y);
        assert!(positions["X"].x < positions["I"].x);
    }

    #[test]
    fn explanation_follows_a_refutation_placed_earlier() {
        let chart = chart(
            "Nodes:\nC | claim | conclusion\nR | rebuttal | refutation\nX | alt | explanation\nEdges:\nR -> C | refute\nX -> R | explain\n",
        );
        let config = LayoutConfig {
            refute_offset: 300.0,
            ..LayoutConfig::default()
        };
        let positions = place(&chart, 800.0, 500.0, &config);
        assert_eq!(positions["C"], Point::new(400.0, 0.0));
        assert_eq!(positions["R"], Point::new(700.0, 0.0));
        assert_eq!(positions["X"], Point::new(550.0, 0.0));
    }

    #[test]
    fn repeated_explain_edge_keeps_explanation_level() {
        let chart = chart(
            "Nodes:\nC | claim | conclusion\nI | step | inference\nX | alt | explanation\nEdges:\nI -> C | support\nX -> I | explain\nX -> I | explain\n",
        );
        let positions = place(&chart, 640.0, 400.0, &LayoutConfig::default());
        assert_eq!(positions["I"], Point::new(320.0, 400.0));
        assert_eq!(positions["X"], Point::new(170.0, 400.0));
    }

    #[test]
    fn placed_sources_take_no_slot() {
        let chart = chart(
            "Nodes:\nC | claim | conclusion\nI | step | inference\nX | alt | explanation\nEdges:\nI -> C | support\nI -> C | explain\nX -> C | explain\n",
        );
        let positions = place(&chart, 640.0, 400.0, &LayoutConfig::default());
        assert_eq!(positions["C"], Point::new(320.0, 0.0));
        assert_eq!(positions["I"], Point::new(320.0, 400.0));
        assert_eq!(positions["X"], Point::new(170.0, 0.0));
    }

    #[test]
    fn refutation_children_step_down_and_right() {
        let chart = chart(
            "Nodes:\nC | claim | conclusion\nR | rebuttal | refutation\nS | backing | evidence\nT | more backing | evidence\nEdges:\nR -> C | refute\nS -> R | support\nT -> S | support\n",
        );
        let config = LayoutConfig::default();
        let positions = place(&chart, 900.0, 600.0, &config);
        let r = positions["R"];
        let s = positions["S"];
        let t = positions["T"];
        assert_eq!(s, Point::new(r.x + config.descendant_offset_x, r.y + config.descendant_offset_y));
        assert_eq!(t, Point::new(s.x + config.descendant_offset_x, s.y + config.descendant_offset_y));
    }

    #[test]
    fn explanation_children_step_down_and_left() {
        let chart = chart(
            "Nodes:\nC | claim | conclusion\nX | alt | explanation\nS | backing | evidence\nEdges:\nX -> C | explain\nS -> X | support\n",
        );
        let config = LayoutConfig::default();
        let positions = place(&chart, 900.0, 600.0, &config);
        let x = positions["X"];
        let s = positions["S"];
        assert!(s.x < x.x);
        assert!(s.y > x.y);
    }

    #[test]
    fn unreachable_nodes_fall_back_to_origin_and_get_separated() {
        let chart = chart(
            "Nodes:\nC | claim | conclusion\nO1 | loose | evidence\nO2 | loose too | evidence\nEdges:\n",
        );
        let positions = place(&chart, 640.0, 400.0, &LayoutConfig::default());
        assert_eq!(positions["O1"], Point::ORIGIN);
        assert_eq!(positions["O2"], Point::new(60.0, 60.0));
    }

    #[test]
    fn coordinates_are_clamped() {
        let chart = chart(
            "Nodes:\nC | claim | conclusion\nX | alt | explanation\nR | rebuttal | refutation\nEdges:\nX -> C | explain\nR -> C | refute\n",
        );
        let config = LayoutConfig {
            explain_offset: 1000.0,
            refute_offset: 1000.0,
            ..LayoutConfig::default()
        };
        let positions = place(&chart, 640.0, 400.0, &config);
        assert_eq!(positions["X"].x, 0.0);
        assert_eq!(positions["R"].x, 640.0);
        for point in positions.values() {
            assert!((0.0..=640.0).contains(&point.x));
            assert!((0.0..=400.0).contains(&point.y));
        }
    }

    #[test]
    fn every_node_gets_a_position() {
        let chart = chart(
            "Nodes:\nC | claim | conclusion\nI | step | inference\nE | fact | evidence\nX | alt | explanation\nR | rebuttal | refutation\nZ | orphan | evidence\nEdges:\nI -> C | support\nE -> I | support\nX -> I | explain\nR -> X | refute\n",
        );
        let positions = place(&chart, 640.0, 400.0, &LayoutConfig::default());
        for node in &chart.graph.nodes {
            assert!(positions.contains_key(&node.id), "missing {}", node.id);
        }
        assert_eq!(positions.len(), chart.graph.nodes.len());
    }
}
