use std::path::Path;

use serde::{Deserialize, Serialize};

/// Spacing knobs for the banded layout. Field defaults apply per field, so
/// partial config files only override what they name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Minimum horizontal gap between sibling subtrees in the same row.
    pub node_sep: f32,
    /// Vertical gap between successive generation rows.
    pub rank_sep: f32,
    /// Horizontal offset between the two members of a couple.
    pub couple_gap: f32,
    /// Margin kept around the tree when fitting.
    pub padding: f32,
    /// Translate the finished layout so its bounding box starts at the
    /// padded origin.
    pub fit: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_sep: 50.0,
            rank_sep: 200.0,
            couple_gap: 20.0,
            padding: 40.0,
            fit: true,
        }
    }
}

/// Loads a layout config file (JSON with JSON5 tolerance) over the
/// defaults. `None` yields the defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<LayoutConfig> {
    let Some(path) = path else {
        return Ok(LayoutConfig::default());
    };
    let contents = std::fs::read_to_string(path)?;
    let config = json5::from_str(&contents)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_library_profile() {
        let config = LayoutConfig::default();
        assert_eq!(config.node_sep, 50.0);
        assert_eq!(config.rank_sep, 200.0);
        assert_eq!(config.couple_gap, 20.0);
        assert_eq!(config.padding, 40.0);
        assert!(config.fit);
    }

    #[test]
    fn partial_config_overrides_only_named_fields() {
        let config: LayoutConfig = json5::from_str("{ coupleGap: 110, rankSep: 130 }").unwrap();
        assert_eq!(config.couple_gap, 110.0);
        assert_eq!(config.rank_sep, 130.0);
        assert_eq!(config.node_sep, 50.0);
        assert!(config.fit);
    }
}
