//! Situational report: short findings derived from the period indicators
//! and from the detection run.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::{kpi::KpiSnapshot, series::PeriodKpis};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Alert,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub text: String,
}

impl Finding {
    fn info(text: impl Into<String>) -> Self {
        Self { severity: Severity::Info, text: text.into() }
    }

    fn alert(text: impl Into<String>) -> Self {
        Self { severity: Severity::Alert, text: text.into() }
    }
}

/// Levels above which a finding is raised as an alert.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AlertThresholds {
    /// No-AIS share, percent
    pub dark_share_pct: f64,
    /// Average anchorage waiting time, hours
    pub wait_hours: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            dark_share_pct: 15.0,
            wait_hours: 36.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SituationReport {
    pub findings: Vec<Finding>,
}

impl SituationReport {
    /// Findings over the synthetic port indicators
    pub fn from_period(kpis: &PeriodKpis, thresholds: &AlertThresholds) -> Self {
        let mut findings = vec![
            Finding::info(format!(
                "Storage volume peaked at {:.2} M bbl on {}.",
                kpis.oil_peak,
                kpis.oil_peak_date.format("%d %b %Y")
            )),
            Finding::info(format!(
                "Anchorage waiting time averages {:.1} h; {} fog/storm day(s) in the period.",
                kpis.wait_avg, kpis.rough_weather_days
            )),
            Finding::info(format!(
                "Non-reporting AIS share across the period: {:.1}%.",
                kpis.dark_share_pct
            )),
            Finding::info(format!(
                "Forecast suggests {} activity over the next 15 days.",
                kpis.forecast_trend
            )),
        ];

        if kpis.dark_share_pct > thresholds.dark_share_pct {
            findings.push(Finding::alert(format!(
                "No-AIS share {:.1}% exceeds the {:.0}% alert level.",
                kpis.dark_share_pct, thresholds.dark_share_pct
            )));
        }
        if kpis.wait_avg > thresholds.wait_hours {
            findings.push(Finding::alert(format!(
                "Average waiting time {:.1} h exceeds the {:.0} h alert level.",
                kpis.wait_avg, thresholds.wait_hours
            )));
        }
        findings.push(Finding::info(format!(
            "Recommendation: monitor weather windows and AIS gaps; \
             alert when No-AIS > {:.0}% and waiting time > {:.0} h.",
            thresholds.dark_share_pct, thresholds.wait_hours
        )));

        Self { findings }
    }

    /// Findings for the overlay panel, based on the values shown in the KPI bar
    pub fn from_snapshot(kpi: &KpiSnapshot, thresholds: &AlertThresholds) -> Self {
        let mut findings = Vec::new();
        if kpi.vessels == 0 {
            findings.push(Finding::info("No vessel candidates in the scene."));
        } else {
            findings.push(Finding::info(format!(
                "{} vessel(s) detected, {} under way.",
                kpi.vessels, kpi.moving
            )));
        }
        let dark = format!("{:.0}% of vessels not reporting AIS.", kpi.dark_pct);
        if f64::from(kpi.dark_pct) > thresholds.dark_share_pct {
            findings.push(Finding::alert(dark));
        } else {
            findings.push(Finding::info(dark));
        }
        findings.push(Finding::info(format!(
            "{} storage tank(s); pier occupancy {:.0}%.",
            kpi.tanks, kpi.pier_occupancy_pct
        )));
        if kpi.locked {
            findings.push(Finding::info("KPI values locked to demo figures."));
        }
        Self { findings }
    }

    pub fn has_alerts(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Alert)
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.findings.iter().map(|f| f.text.as_str())
    }
}
