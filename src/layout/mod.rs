mod banded;
mod reconcile;
pub(crate) mod types;

pub use reconcile::reconcile_members;
pub use types::*;

use std::collections::{BTreeMap, HashMap};

use crate::config::LayoutConfig;
use crate::group::{GroupedGraph, Member, person_order};

/// Nominal on-canvas width of a family unit. Subtree measurement never
/// reports a narrower span than this.
pub const NODE_WIDTH: f32 = 160.0;

/// Computes positions for every family unit and every member person in the
/// grouped graph. One bottom-up width pass and one top-down placement pass;
/// no iterative refinement.
pub fn compute_layout(graph: &GroupedGraph, config: &LayoutConfig) -> Layout {
    banded::compute_banded_layout(graph, config)
}

/// Member ids per unit, sorted by gender weight then id. Both the initial
/// layout and the post-drag reconciler place members in this order.
pub(crate) fn members_by_unit(graph: &GroupedGraph) -> HashMap<&str, Vec<&str>> {
    let mut grouped: HashMap<&str, Vec<&Member>> = HashMap::new();
    for member in &graph.members {
        grouped.entry(member.unit.as_str()).or_default().push(member);
    }
    grouped
        .into_iter()
        .map(|(unit, mut members)| {
            members.sort_by(|a, b| person_order(&a.person, &b.person));
            let ids = members
                .into_iter()
                .map(|member| member.person.id.as_str())
                .collect();
            (unit, ids)
        })
        .collect()
}

/// Places a unit's members around an anchor: a single member sits exactly
/// on the anchor, a couple sits at `anchor.x ± gap/2`, all at the anchor's
/// y.
pub(crate) fn place_members(
    member_ids: &[&str],
    anchor: Position,
    gap: f32,
    positions: &mut BTreeMap<String, Position>,
) {
    if member_ids.is_empty() {
        return;
    }
    if member_ids.len() == 1 {
        positions.insert(member_ids[0].to_string(), anchor);
        return;
    }
    let start_x = anchor.x - (member_ids.len() - 1) as f32 * gap / 2.0;
    for (idx, id) in member_ids.iter().enumerate() {
        positions.insert(
            id.to_string(),
            Position {
                x: start_x + idx as f32 * gap,
                y: anchor.y,
            },
        );
    }
}
