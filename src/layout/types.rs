use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// One horizontal generation row. `row` is the zero-based band index; gaps
/// in the generation numbering collapse, so generations {0, 2, 5} occupy
/// rows {0, 1, 2}.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationBand {
    pub generation: i32,
    pub row: usize,
    pub y: f32,
}

/// The computed layout: one position per family-unit id and per member
/// person id, plus the generation bands the collaborator needs for row
/// labels and the padded extent of the drawing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Layout {
    pub positions: BTreeMap<String, Position>,
    pub bands: Vec<GenerationBand>,
    pub width: f32,
    pub height: f32,
}
