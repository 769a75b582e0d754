use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;

use crate::group::GroupedGraph;
use crate::ir::Gender;
use crate::layout::{GenerationBand, Layout, Position};

/// Serializable snapshot of a grouped graph with its computed positions.
/// This is what the rendering collaborator consumes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub width: f32,
    pub height: f32,
    pub units: Vec<UnitDump>,
    pub members: Vec<MemberDump>,
    pub edges: Vec<EdgeDump>,
    pub bands: Vec<GenerationBand>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitDump {
    pub id: String,
    pub generation: i32,
    pub is_couple: bool,
    pub members: Vec<String>,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDump {
    pub id: String,
    pub name: String,
    pub gender: Gender,
    pub unit: String,
    pub generation: i32,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDump {
    pub id: String,
    pub source: String,
    pub target: String,
    pub relation: String,
}

impl LayoutDump {
    pub fn from_layout(graph: &GroupedGraph, layout: &Layout) -> Self {
        let position = |id: &str| -> Position {
            layout.positions.get(id).copied().unwrap_or_default()
        };

        let units = graph
            .units
            .iter()
            .map(|unit| {
                let pos = position(&unit.id);
                UnitDump {
                    id: unit.id.clone(),
                    generation: unit.generation,
                    is_couple: unit.is_couple,
                    members: unit.members.clone(),
                    x: pos.x,
                    y: pos.y,
                }
            })
            .collect();

        let members = graph
            .members
            .iter()
            .map(|member| {
                let pos = position(&member.person.id);
                MemberDump {
                    id: member.person.id.clone(),
                    name: member.person.name.clone(),
                    gender: member.person.gender,
                    unit: member.unit.clone(),
                    generation: member.generation,
                    x: pos.x,
                    y: pos.y,
                }
            })
            .collect();

        let edges = graph
            .edges
            .iter()
            .map(|edge| EdgeDump {
                id: edge.id.clone(),
                source: edge.source.clone(),
                target: edge.target.clone(),
                relation: edge.kind.as_str().to_string(),
            })
            .collect();

        LayoutDump {
            width: layout.width,
            height: layout.height,
            units,
            members,
            edges,
            bands: layout.bands.clone(),
        }
    }

    pub fn write_json(&self, path: &Path) -> anyhow::Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}
