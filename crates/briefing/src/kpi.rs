use sar_detect::DetectionReport;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Demo values shown instead of the computed KPIs when the lock is on.
/// Only the KPI bar changes; overlay markers always reflect the detections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FixedKpiValues {
    pub vessels: u32,
    pub moving: u32,
    pub dark_pct: Option<f32>,
    pub tanks: Option<u32>,
    pub pier_occupancy_pct: Option<f32>,
}

impl Default for FixedKpiValues {
    fn default() -> Self {
        Self {
            vessels: 27,
            moving: 4,
            dark_pct: None,
            tanks: None,
            pier_occupancy_pct: None,
        }
    }
}

/// Values rendered in the KPI bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSnapshot {
    pub vessels: u32,
    pub moving: u32,
    pub dark_pct: f32,
    pub tanks: u32,
    pub pier_occupancy_pct: f32,
    /// Display-only constant, never derived from the classifier
    pub confidence_pct: f32,
    pub locked: bool,
}

/// A single KPI column: value over label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KpiChip {
    pub value: String,
    pub label: String,
}

impl KpiChip {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

impl KpiSnapshot {
    /// KPIs computed from the detection report
    pub fn from_report(report: &DetectionReport, pier_proximity: f32, confidence_pct: f32) -> Self {
        Self {
            vessels: report.detections.vessels.len() as u32,
            moving: report.tags.moving.len() as u32,
            dark_pct: report.dark_share_pct(),
            tanks: report.detections.tanks.len() as u32,
            pier_occupancy_pct: report.pier_occupancy_pct(pier_proximity),
            confidence_pct,
            locked: false,
        }
    }

    /// Replace computed values with the fixed demo values when an override is set
    pub fn with_override(self, fixed: Option<&FixedKpiValues>) -> Self {
        let Some(fixed) = fixed else {
            return self;
        };
        Self {
            vessels: fixed.vessels,
            moving: fixed.moving,
            dark_pct: fixed.dark_pct.unwrap_or(self.dark_pct),
            tanks: fixed.tanks.unwrap_or(self.tanks),
            pier_occupancy_pct: fixed.pier_occupancy_pct.unwrap_or(self.pier_occupancy_pct),
            confidence_pct: self.confidence_pct,
            locked: true,
        }
    }

    pub fn chips(&self) -> Vec<KpiChip> {
        vec![
            KpiChip::new(self.vessels.to_string(), "Vessels detected"),
            KpiChip::new(format!("{:.0}%", self.dark_pct), "Dark (no AIS)"),
            KpiChip::new(self.moving.to_string(), "Moving"),
            KpiChip::new(self.tanks.to_string(), "Storage tanks"),
            KpiChip::new(format!("{:.0}%", self.pier_occupancy_pct), "Pier occupancy"),
            KpiChip::new(format!("{:.0}%", self.confidence_pct), "Confidence"),
        ]
    }
}
