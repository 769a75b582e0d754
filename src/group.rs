use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ir::{Person, TreeDocument};

/// Fallback for persons without an explicit generation: a `genNN` substring
/// in the identifier, e.g. `p4_gen2`.
static GEN_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)gen(\d+)").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivedKind {
    ParentChild,
    Sibling,
    Spouse,
}

impl DerivedKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ParentChild => "parent-child",
            Self::Sibling => "sibling",
            Self::Spouse => "spouse",
        }
    }
}

/// An edge derived by grouping. Parent-child and sibling edges connect
/// family units; spouse edges connect the two persons inside a couple unit
/// and carry no layout weight.
#[derive(Debug, Clone)]
pub struct DerivedEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub kind: DerivedKind,
}

/// A compound node holding either a couple (two members) or a single
/// person. Members are ordered by gender weight, then id.
#[derive(Debug, Clone)]
pub struct FamilyUnit {
    pub id: String,
    pub generation: i32,
    pub members: Vec<String>,
    pub is_couple: bool,
}

/// A person reparented under its family unit, with the generation the unit
/// resolved for it.
#[derive(Debug, Clone)]
pub struct Member {
    pub person: Person,
    pub unit: String,
    pub generation: i32,
}

#[derive(Debug, Clone, Default)]
pub struct GroupedGraph {
    /// Family units in creation order (input order of their first member).
    pub units: Vec<FamilyUnit>,
    pub members: Vec<Member>,
    /// Parent-child edges first, then sibling edges, then spouse edges.
    pub edges: Vec<DerivedEdge>,
    pub person_to_unit: HashMap<String, String>,
}

impl GroupedGraph {
    pub fn unit(&self, id: &str) -> Option<&FamilyUnit> {
        self.units.iter().find(|unit| unit.id == id)
    }
}

/// Groups flat person/edge data into family units and derives unit-level
/// relationship edges. Never fails: malformed records degrade (missing ids
/// are skipped, unresolvable generations default to 0, duplicate and
/// intra-unit edges are dropped).
pub fn group(doc: &TreeDocument) -> GroupedGraph {
    let mut persons: HashMap<&str, &Person> = HashMap::new();
    for person in &doc.nodes {
        if !person.id.is_empty() {
            persons.insert(person.id.as_str(), person);
        }
    }

    let mut grouped = GroupedGraph::default();
    let mut processed: HashSet<&str> = HashSet::new();
    let mut spouse_edges: Vec<DerivedEdge> = Vec::new();

    // 1) Build couple/single units in input order. A spouse reference only
    // pairs up when it resolves to a different, not yet processed person;
    // the pair is discovered from whichever side comes first.
    for person in &doc.nodes {
        if person.id.is_empty() || processed.contains(person.id.as_str()) {
            continue;
        }

        let partner = person
            .spouse
            .as_deref()
            .filter(|spouse_id| !processed.contains(*spouse_id))
            .and_then(|spouse_id| persons.get(spouse_id).copied())
            .filter(|other| other.id != person.id);

        if let Some(partner) = partner {
            let unit_id = person
                .couple_id
                .clone()
                .or_else(|| partner.couple_id.clone())
                .unwrap_or_else(|| format!("couple_{}_{}", person.id, partner.id));
            let generation = infer_generation(&[person, partner]);

            let mut pair = [person, partner];
            pair.sort_by(|a, b| person_order(a, b));

            for member in pair {
                grouped.members.push(Member {
                    person: member.clone(),
                    unit: unit_id.clone(),
                    generation,
                });
                grouped
                    .person_to_unit
                    .insert(member.id.clone(), unit_id.clone());
            }

            // Cosmetic only; the layout never follows spouse edges.
            spouse_edges.push(DerivedEdge {
                id: format!("spouse_{}_{}", pair[0].id, pair[1].id),
                source: pair[0].id.clone(),
                target: pair[1].id.clone(),
                kind: DerivedKind::Spouse,
            });

            grouped.units.push(FamilyUnit {
                id: unit_id,
                generation,
                members: pair.iter().map(|member| member.id.clone()).collect(),
                is_couple: true,
            });
            processed.insert(person.id.as_str());
            processed.insert(partner.id.as_str());
        } else {
            let unit_id = format!("single_{}", person.id);
            let generation = infer_generation(&[person]);

            grouped.members.push(Member {
                person: person.clone(),
                unit: unit_id.clone(),
                generation,
            });
            grouped
                .person_to_unit
                .insert(person.id.clone(), unit_id.clone());
            grouped.units.push(FamilyUnit {
                id: unit_id,
                generation,
                members: vec![person.id.clone()],
                is_couple: false,
            });
            processed.insert(person.id.as_str());
        }
    }

    // 2) Collapse person-level edges to unit-level parent-child edges,
    // deduplicated by ordered pair, first occurrence wins.
    let mut edge_keys: HashSet<String> = HashSet::new();
    let mut parent_children: HashMap<String, Vec<String>> = HashMap::new();
    let mut parent_order: Vec<String> = Vec::new();

    for edge in &doc.edges {
        let Some(source_unit) = grouped.person_to_unit.get(&edge.source) else {
            continue;
        };
        let Some(target_unit) = grouped.person_to_unit.get(&edge.target) else {
            continue;
        };
        if source_unit == target_unit {
            continue;
        }
        if !edge_keys.insert(format!("{source_unit}->{target_unit}")) {
            continue;
        }

        grouped.edges.push(DerivedEdge {
            id: format!("edge_{source_unit}_{target_unit}"),
            source: source_unit.clone(),
            target: target_unit.clone(),
            kind: DerivedKind::ParentChild,
        });

        let children = parent_children.entry(source_unit.clone()).or_default();
        if children.is_empty() {
            parent_order.push(source_unit.clone());
        }
        children.push(target_unit.clone());
    }

    // 3) Sibling edges: chain consecutive children of a common parent unit
    // in sorted order, not a full clique.
    for parent in &parent_order {
        let Some(children) = parent_children.get(parent) else {
            continue;
        };
        let mut unique = children.clone();
        unique.sort();
        unique.dedup();
        if unique.len() < 2 {
            continue;
        }
        for pair in unique.windows(2) {
            let key = format!("sib_{}_{}", pair[0], pair[1]);
            if !edge_keys.insert(key.clone()) {
                continue;
            }
            grouped.edges.push(DerivedEdge {
                id: key,
                source: pair[0].clone(),
                target: pair[1].clone(),
                kind: DerivedKind::Sibling,
            });
        }
    }

    grouped.edges.extend(spouse_edges);
    grouped
}

/// Orders persons by gender weight (male, female, unknown), then id.
pub(crate) fn person_order(a: &Person, b: &Person) -> Ordering {
    a.gender
        .weight()
        .cmp(&b.gender.weight())
        .then_with(|| a.id.cmp(&b.id))
}

fn infer_generation(persons: &[&Person]) -> i32 {
    persons
        .iter()
        .filter_map(|person| read_generation(person))
        .min()
        .unwrap_or(0)
}

fn read_generation(person: &Person) -> Option<i32> {
    if let Some(generation) = person.generation {
        return Some(generation);
    }
    GEN_ID_RE
        .captures(&person.id)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}
