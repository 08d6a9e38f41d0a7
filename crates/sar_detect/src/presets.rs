use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};

use crate::params::{Caps, DetectionParams, Heuristics};

/// Named threshold sets, one tuning per scene type.
#[derive(
    Debug, Clone, Copy,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
    PartialEq, Eq, Default
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DetectionPreset {
    /// General container / bulk harbour scene
    #[default]
    Harbor,
    /// Tank farm next to a tanker berth
    OilTerminal,
    /// Open anchorage with few structures
    Anchorage,
}

impl DetectionPreset {
    pub fn names() -> &'static [&'static str] {
        <Self as VariantNames>::VARIANTS
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Harbor => "Balanced vessel / tank / pier thresholds for a mixed harbour",
            Self::OilTerminal => "Finer grid and looser tank test for dense tank farms",
            Self::Anchorage => "Coarse grid tuned for ships on open water, few piers",
        }
    }

    pub fn params(&self) -> DetectionParams {
        match self {
            Self::Harbor => DetectionParams::default(),
            Self::OilTerminal => DetectionParams {
                grid: 32,
                thr_bright: 200,
                thr_water: 45,
                caps: Caps {
                    vessels: 30,
                    tanks: 48,
                    piers: 8,
                },
                heuristics: Heuristics {
                    tank_min_mean: 85.0,
                    tank_min_bright_ratio: 0.025,
                    pier_bright_offset: 15,
                    pier_min_bright_ratio: 0.06,
                    ..Heuristics::default()
                },
                ..DetectionParams::default()
            },
            Self::Anchorage => DetectionParams {
                grid: 20,
                thr_bright: 220,
                thr_water: 50,
                caps: Caps {
                    vessels: 60,
                    tanks: 8,
                    piers: 3,
                },
                heuristics: Heuristics {
                    pier_min_bright_ratio: 0.12,
                    pier_min_mean: 80.0,
                    ..Heuristics::default()
                },
                ..DetectionParams::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_presets_parse_from_names() {
        for name in DetectionPreset::names() {
            let preset = DetectionPreset::from_str(name).expect("preset name should parse");
            assert_eq!(preset.to_string(), *name);
        }
        assert_eq!(
            DetectionPreset::from_str("oil_terminal").unwrap(),
            DetectionPreset::OilTerminal
        );
    }

    #[test]
    fn test_presets_are_distinct_and_valid() {
        let all: Vec<_> = DetectionPreset::iter().map(|p| p.params()).collect();
        for params in &all {
            assert!(params.validate().is_ok());
        }
        assert_ne!(all[0], all[1]);
        assert_ne!(all[1], all[2]);
    }
}
