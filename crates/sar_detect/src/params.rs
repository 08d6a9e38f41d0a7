use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{DetectError, Result};

/// Maximum number of detections kept per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Caps {
    pub vessels: usize,
    pub tanks: usize,
    pub piers: usize,
}

impl Default for Caps {
    fn default() -> Self {
        Self {
            vessels: 40,
            tanks: 24,
            piers: 6,
        }
    }
}

/// Fixed constants of the tile and band heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Heuristics {
    /// A dark tile needs strictly more than this fraction of bright pixels
    pub vessel_min_bright_ratio: f32,
    /// Tank tiles need a mean strictly above this
    pub tank_min_mean: f32,
    pub tank_min_bright_ratio: f32,
    /// Tank radius is `max(min_tank_radius, tank_radius_factor * min(gx, gy))`
    pub tank_radius_factor: f32,
    pub min_tank_radius: f32,
    /// Pier pixels count as bright above `thr_bright - pier_bright_offset`
    pub pier_bright_offset: u8,
    pub pier_min_bright_ratio: f32,
    pub pier_min_mean: f32,
    pub min_band_height: u32,
    /// Horizontal margin left on each side of a pier rectangle
    pub pier_margin: u32,
    /// Half height of a pier rectangle around the band centre
    pub pier_half_height: u32,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            vessel_min_bright_ratio: 0.01,
            tank_min_mean: 90.0,
            tank_min_bright_ratio: 0.03,
            tank_radius_factor: 0.35,
            min_tank_radius: 3.0,
            pier_bright_offset: 10,
            pier_min_bright_ratio: 0.08,
            pier_min_mean: 70.0,
            min_band_height: 6,
            pier_margin: 12,
            pier_half_height: 2,
        }
    }
}

/// Parameters of the secondary dark / moving vessel draws.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TaggingParams {
    /// Dark share is `dark_base_ratio + dark_ratio_spread * r`, `r ~ U[0, 1)`
    pub dark_base_ratio: f32,
    pub dark_ratio_spread: f32,
    pub moving_cap: usize,
}

impl Default for TaggingParams {
    fn default() -> Self {
        Self {
            dark_base_ratio: 0.18,
            dark_ratio_spread: 0.12,
            moving_cap: 4,
        }
    }
}

/// Input parameters for one detection run. Never mutated while a run is in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DetectionParams {
    /// Tiles per axis
    #[schemars(range(min = 1))]
    pub grid: u32,
    pub thr_bright: u8,
    pub thr_water: u8,
    pub seed: u64,
    pub caps: Caps,
    pub heuristics: Heuristics,
    pub tagging: TaggingParams,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            grid: 24,
            thr_bright: 210,
            thr_water: 40,
            seed: 7,
            caps: Caps::default(),
            heuristics: Heuristics::default(),
            tagging: TaggingParams::default(),
        }
    }
}

impl DetectionParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_caps(mut self, caps: Caps) -> Self {
        self.caps = caps;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid == 0 {
            return Err(DetectError::InvalidParams("grid must be at least 1".to_string()));
        }
        let t = &self.tagging;
        if t.dark_base_ratio < 0.0
            || t.dark_ratio_spread < 0.0
            || t.dark_base_ratio + t.dark_ratio_spread > 1.0
        {
            return Err(DetectError::InvalidParams(format!(
                "dark ratio range [{}, {}] must lie within [0, 1]",
                t.dark_base_ratio,
                t.dark_base_ratio + t.dark_ratio_spread
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(DetectionParams::default().validate().is_ok());
    }

    #[test]
    fn test_zero_grid_rejected() {
        let params = DetectionParams { grid: 0, ..Default::default() };
        assert!(matches!(params.validate(), Err(DetectError::InvalidParams(_))));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let params: DetectionParams =
            serde_json::from_str(r#"{"grid": 12, "caps": {"vessels": 3}}"#).unwrap();
        assert_eq!(params.grid, 12);
        assert_eq!(params.caps.vessels, 3);
        assert_eq!(params.caps.piers, Caps::default().piers);
        assert_eq!(params.thr_bright, 210);
    }
}
