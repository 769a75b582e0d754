use std::collections::BTreeMap;

use super::types::Position;
use super::{NODE_WIDTH, members_by_unit, place_members};
use crate::group::GroupedGraph;

/// Re-centers every family unit's members around the unit's current
/// position. Called after a drag has moved a unit anchor; only the anchor,
/// the couple gap and the deterministic member order matter, so repeated
/// calls never drift. Units without a current position are skipped.
pub fn reconcile_members(
    graph: &GroupedGraph,
    positions: &mut BTreeMap<String, Position>,
    couple_gap: f32,
) {
    let gap = if couple_gap > 0.0 { couple_gap } else { NODE_WIDTH };
    let members = members_by_unit(graph);
    for unit in &graph.units {
        let Some(anchor) = positions.get(unit.id.as_str()).copied() else {
            continue;
        };
        let Some(member_ids) = members.get(unit.id.as_str()) else {
            continue;
        };
        place_members(member_ids, anchor, gap, positions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::group::group;
    use crate::ir::{Gender, Person, TreeDocument};
    use crate::layout::compute_layout;

    fn couple_doc() -> TreeDocument {
        let mut husband = Person {
            id: "p1".to_string(),
            gender: Gender::Male,
            spouse: Some("p2".to_string()),
            generation: Some(0),
            ..Person::default()
        };
        husband.name = "father".to_string();
        let wife = Person {
            id: "p2".to_string(),
            gender: Gender::Female,
            spouse: Some("p1".to_string()),
            generation: Some(0),
            ..Person::default()
        };
        TreeDocument {
            nodes: vec![husband, wife],
            edges: vec![],
        }
    }

    #[test]
    fn recenters_members_after_a_unit_moved() {
        let grouped = group(&couple_doc());
        let layout = compute_layout(&grouped, &LayoutConfig::default());
        let mut positions = layout.positions;

        // Simulate a drag of the whole unit.
        let anchor = positions.get_mut("couple_p1_p2").unwrap();
        anchor.x += 300.0;
        anchor.y += 75.0;
        let moved = *anchor;

        reconcile_members(&grouped, &mut positions, 20.0);

        assert_eq!(positions["p1"].x, moved.x - 10.0);
        assert_eq!(positions["p2"].x, moved.x + 10.0);
        assert_eq!(positions["p1"].y, moved.y);
        assert_eq!(positions["p2"].y, moved.y);
    }

    #[test]
    fn reconcile_is_idempotent() {
        let grouped = group(&couple_doc());
        let layout = compute_layout(&grouped, &LayoutConfig::default());
        let mut positions = layout.positions;

        reconcile_members(&grouped, &mut positions, 20.0);
        let first = positions.clone();
        reconcile_members(&grouped, &mut positions, 20.0);
        assert_eq!(first, positions);
    }

    #[test]
    fn member_order_ignores_prior_member_positions() {
        let grouped = group(&couple_doc());
        let layout = compute_layout(&grouped, &LayoutConfig::default());
        let mut positions = layout.positions;

        // Scramble the members; the male ends up left again regardless.
        positions.insert("p1".to_string(), Position { x: 9999.0, y: -5.0 });
        positions.insert("p2".to_string(), Position { x: -9999.0, y: 5.0 });
        reconcile_members(&grouped, &mut positions, 20.0);

        let anchor = positions["couple_p1_p2"];
        assert_eq!(positions["p1"].x, anchor.x - 10.0);
        assert_eq!(positions["p2"].x, anchor.x + 10.0);
    }

    #[test]
    fn zero_gap_falls_back_to_node_width() {
        let grouped = group(&couple_doc());
        let layout = compute_layout(&grouped, &LayoutConfig::default());
        let mut positions = layout.positions;

        reconcile_members(&grouped, &mut positions, 0.0);
        let anchor = positions["couple_p1_p2"];
        assert_eq!(positions["p1"].x, anchor.x - NODE_WIDTH / 2.0);
        assert_eq!(positions["p2"].x, anchor.x + NODE_WIDTH / 2.0);
    }

    #[test]
    fn single_member_snaps_to_the_anchor() {
        let grouped = group(&TreeDocument {
            nodes: vec![Person {
                id: "solo".to_string(),
                ..Person::default()
            }],
            edges: vec![],
        });
        let layout = compute_layout(&grouped, &LayoutConfig::default());
        let mut positions = layout.positions;

        let anchor = positions.get_mut("single_solo").unwrap();
        anchor.x = 123.0;
        anchor.y = 456.0;
        reconcile_members(&grouped, &mut positions, 20.0);
        assert_eq!(positions["solo"], Position { x: 123.0, y: 456.0 });
    }

    #[test]
    fn units_missing_from_the_map_are_skipped() {
        let grouped = group(&couple_doc());
        let mut positions = BTreeMap::new();
        reconcile_members(&grouped, &mut positions, 20.0);
        assert!(positions.is_empty());
    }
}
