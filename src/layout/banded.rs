use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use super::types::{GenerationBand, Layout, Position};
use super::{NODE_WIDTH, members_by_unit, place_members};
use crate::config::LayoutConfig;
use crate::group::{DerivedKind, GroupedGraph};

struct Placement<'a> {
    children: &'a HashMap<&'a str, Vec<&'a str>>,
    widths: &'a HashMap<&'a str, f32>,
    unit_generation: &'a HashMap<&'a str, i32>,
    gen_rows: &'a HashMap<i32, usize>,
    base_width: f32,
    node_sep: f32,
    rank_sep: f32,
}

pub(super) fn compute_banded_layout(graph: &GroupedGraph, config: &LayoutConfig) -> Layout {
    let base_width = NODE_WIDTH.max(config.couple_gap);

    // Unit-level child adjacency and in-degrees; only parent-child edges
    // between known units carry layout weight.
    let unit_ids: HashSet<&str> = graph.units.iter().map(|unit| unit.id.as_str()).collect();
    let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut indegree: HashMap<&str, usize> = HashMap::new();
    for edge in &graph.edges {
        if edge.kind != DerivedKind::ParentChild {
            continue;
        }
        if !unit_ids.contains(edge.source.as_str()) || !unit_ids.contains(edge.target.as_str()) {
            continue;
        }
        children
            .entry(edge.source.as_str())
            .or_default()
            .push(edge.target.as_str());
        *indegree.entry(edge.target.as_str()).or_insert(0) += 1;
    }

    let mut roots: Vec<&str> = graph
        .units
        .iter()
        .map(|unit| unit.id.as_str())
        .filter(|id| indegree.get(id).copied().unwrap_or(0) == 0)
        .collect();
    roots.sort_unstable();

    // Bottom-up subtree widths, roots first. Measuring the remaining units
    // afterwards covers cyclic components that no root reaches.
    let mut widths: HashMap<&str, f32> = HashMap::new();
    for root in &roots {
        measure(
            root,
            &children,
            base_width,
            config.node_sep,
            &mut widths,
            &mut HashSet::new(),
        );
    }
    let mut all_ids: Vec<&str> = graph.units.iter().map(|unit| unit.id.as_str()).collect();
    all_ids.sort_unstable();
    for id in &all_ids {
        measure(
            id,
            &children,
            base_width,
            config.node_sep,
            &mut widths,
            &mut HashSet::new(),
        );
    }

    // Distinct generations, ascending, mapped to zero-based rows so gaps in
    // the numbering do not stretch the diagram.
    let generations: BTreeSet<i32> = graph.units.iter().map(|unit| unit.generation).collect();
    let gen_rows: HashMap<i32, usize> = generations
        .iter()
        .enumerate()
        .map(|(row, generation)| (*generation, row))
        .collect();
    let unit_generation: HashMap<&str, i32> = graph
        .units
        .iter()
        .map(|unit| (unit.id.as_str(), unit.generation))
        .collect();

    let ctx = Placement {
        children: &children,
        widths: &widths,
        unit_generation: &unit_generation,
        gen_rows: &gen_rows,
        base_width,
        node_sep: config.node_sep,
        rank_sep: config.rank_sep,
    };

    let mut positions: BTreeMap<String, Position> = BTreeMap::new();
    let mut placed: HashSet<&str> = HashSet::new();
    let mut cursor = 0.0_f32;

    for root in &roots {
        let width = widths.get(root).copied().unwrap_or(base_width);
        assign(&ctx, root, cursor, &mut positions, &mut placed);
        cursor += width + config.node_sep * 2.0;
    }

    // Units in cyclic components are never reached from a root; lay them
    // out as extra roots, in id order, so every unit still gets exactly one
    // position.
    for id in &all_ids {
        if placed.contains(id) {
            continue;
        }
        let width = widths.get(id).copied().unwrap_or(base_width);
        assign(&ctx, id, cursor, &mut positions, &mut placed);
        cursor += width + config.node_sep * 2.0;
    }

    // Members go around their unit's anchor.
    for (unit_id, member_ids) in members_by_unit(graph) {
        let Some(anchor) = positions.get(unit_id).copied() else {
            continue;
        };
        place_members(&member_ids, anchor, config.couple_gap, &mut positions);
    }

    let bands: Vec<GenerationBand> = generations
        .iter()
        .enumerate()
        .map(|(row, generation)| GenerationBand {
            generation: *generation,
            row,
            y: row as f32 * config.rank_sep,
        })
        .collect();

    finish(positions, bands, config)
}

fn measure<'a>(
    id: &'a str,
    children: &HashMap<&'a str, Vec<&'a str>>,
    base_width: f32,
    node_sep: f32,
    widths: &mut HashMap<&'a str, f32>,
    in_progress: &mut HashSet<&'a str>,
) -> f32 {
    if let Some(width) = widths.get(id) {
        return *width;
    }
    if !in_progress.insert(id) {
        // Back edge of a cycle; give the repeated unit a leaf-sized slot.
        return base_width;
    }
    let width = match children.get(id) {
        Some(kids) if !kids.is_empty() => {
            let mut total = (kids.len() - 1) as f32 * node_sep;
            for kid in kids {
                total += measure(kid, children, base_width, node_sep, widths, in_progress);
            }
            base_width.max(total)
        }
        _ => base_width,
    };
    in_progress.remove(id);
    widths.insert(id, width);
    width
}

fn assign<'a>(
    ctx: &Placement<'a>,
    id: &'a str,
    left: f32,
    positions: &mut BTreeMap<String, Position>,
    placed: &mut HashSet<&'a str>,
) {
    // First traversal to reach a unit wins; multi-parent children keep the
    // position assigned under their lexicographically first-placed parent.
    if !placed.insert(id) {
        return;
    }
    let width = ctx.widths.get(id).copied().unwrap_or(ctx.base_width);
    let generation = ctx.unit_generation.get(id).copied().unwrap_or(0);
    let row = ctx.gen_rows.get(&generation).copied().unwrap_or(0);
    positions.insert(
        id.to_string(),
        Position {
            x: left + width / 2.0,
            y: row as f32 * ctx.rank_sep,
        },
    );

    let Some(kids) = ctx.children.get(id) else {
        return;
    };
    let kid_widths: Vec<f32> = kids
        .iter()
        .map(|kid| ctx.widths.get(kid).copied().unwrap_or(ctx.base_width))
        .collect();
    let total: f32 =
        kid_widths.iter().sum::<f32>() + kids.len().saturating_sub(1) as f32 * ctx.node_sep;
    let mut child_left = left + (width - total) / 2.0;
    for (kid, kid_width) in kids.iter().zip(&kid_widths) {
        assign(ctx, kid, child_left, positions, placed);
        child_left += kid_width + ctx.node_sep;
    }
}

fn finish(
    mut positions: BTreeMap<String, Position>,
    mut bands: Vec<GenerationBand>,
    config: &LayoutConfig,
) -> Layout {
    if positions.is_empty() {
        return Layout {
            positions,
            bands,
            width: 0.0,
            height: 0.0,
        };
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for pos in positions.values() {
        min_x = min_x.min(pos.x);
        min_y = min_y.min(pos.y);
        max_x = max_x.max(pos.x);
        max_y = max_y.max(pos.y);
    }

    if config.fit {
        let dx = config.padding - min_x;
        let dy = config.padding - min_y;
        if dx != 0.0 || dy != 0.0 {
            for pos in positions.values_mut() {
                pos.x += dx;
                pos.y += dy;
            }
            for band in &mut bands {
                band.y += dy;
            }
        }
    }

    Layout {
        positions,
        bands,
        width: (max_x - min_x) + config.padding * 2.0,
        height: (max_y - min_y) + config.padding * 2.0,
    }
}
