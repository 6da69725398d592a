//! Takeoff configuration: fallback constants, sanity bounds and load factors.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How element positions are composed from the placement tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementStrategy {
    /// Walk and compose the full parent chain. Always correct.
    #[default]
    Hierarchical,
    /// Read local translations directly when every placement in the model is
    /// parented to the root; falls back to `Hierarchical` otherwise.
    RootedFastPath,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TakeoffConfig {
    /// Longest placement chain followed before it is treated as cyclic.
    pub max_placement_depth: usize,
    pub placement_strategy: PlacementStrategy,
    /// Area (m²) credited to a wall with no usable area quantity.
    pub default_wall_area: f64,
    /// Volume-tagged wall quantities below this value are read as mislabeled
    /// areas. Disabled when unset.
    pub volume_as_area_ceiling: Option<f64>,
    /// Length (m) credited to an MEP segment with no usable length.
    pub default_run_length: f64,
    /// Wall surcharge per square metre of wall (kN/m²).
    pub wall_unit_weight: f64,
}

impl Default for TakeoffConfig {
    fn default() -> Self {
        Self {
            max_placement_depth: 64,
            placement_strategy: PlacementStrategy::Hierarchical,
            default_wall_area: 9.0,
            volume_as_area_ceiling: None,
            default_run_length: 3.0,
            wall_unit_weight: 2.5,
        }
    }
}

impl TakeoffConfig {
    /// Loads a JSON config file. Missing fields keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let content = std::fs::read_to_string(path_ref).map_err(|source| ConfigError::FileRead {
            path: path_ref.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Invalid {
            path: path_ref.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: TakeoffConfig =
            serde_json::from_str(r#"{"volume_as_area_ceiling": 15.0, "placement_strategy": "rooted_fast_path"}"#)
                .unwrap();
        assert_eq!(config.volume_as_area_ceiling, Some(15.0));
        assert_eq!(config.placement_strategy, PlacementStrategy::RootedFastPath);
        assert_eq!(config.max_placement_depth, 64);
        assert_eq!(config.default_wall_area, 9.0);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = serde_json::from_str::<TakeoffConfig>(r#"{"wall_area_default": 4.0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = TakeoffConfig::from_file("/nonexistent/takeoff.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/takeoff.json"));
    }
}
