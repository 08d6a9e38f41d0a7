//! Seeded synthetic port indicators for the chart blocks.
//!
//! None of these values come from the detector; they are mock time series
//! with a fixed shape so every briefing renders the same story for a seed.

use chrono::{Duration, NaiveDate};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

use crate::kpi::KpiChip;

pub const DEFAULT_DAYS: usize = 16;
pub const FORECAST_DAYS: usize = 15;

/// Last acquisition date of the mock period
pub fn default_end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 7).unwrap_or_default()
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter, IntoStaticStr,
)]
pub enum Weather {
    Clear,
    Fog,
    Storm,
    Rain,
}

impl Weather {
    const WEIGHTED: [(Weather, f64); 4] = [
        (Weather::Clear, 0.45),
        (Weather::Fog, 0.25),
        (Weather::Storm, 0.20),
        (Weather::Rain, 0.10),
    ];

    fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut r: f64 = rng.r#gen();
        for (weather, p) in Self::WEIGHTED {
            if r < p {
                return weather;
            }
            r -= p;
        }
        Weather::Rain
    }

    pub fn is_rough(&self) -> bool {
        matches!(self, Weather::Fog | Weather::Storm)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter, IntoStaticStr,
)]
pub enum PortActivity {
    Increase,
    Decrease,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionDay {
    pub date: NaiveDate,
    pub weather: Weather,
    pub activity: PortActivity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortSeries {
    pub dates: Vec<NaiveDate>,
    /// Million barrels in storage
    pub oil_volume: Vec<f64>,
    /// Average anchorage waiting time, hours
    pub wait_hours: Vec<f64>,
    pub ships_total: Vec<u32>,
    /// Ships not reporting AIS
    pub ships_dark: Vec<u32>,
    pub forecast_dates: Vec<NaiveDate>,
    pub forecast_volume: Vec<f64>,
    pub schedule: Vec<AcquisitionDay>,
}

/// Period summary shown in KPI chips and the situational report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodKpis {
    pub oil_peak: f64,
    pub oil_peak_date: NaiveDate,
    pub wait_avg: f64,
    pub ships_latest: u32,
    pub dark_latest: u32,
    pub dark_share_pct: f64,
    pub last_acquisition: NaiveDate,
    pub forecast_trend: Trend,
    pub rough_weather_days: usize,
}

impl PeriodKpis {
    /// The six period chips of the dashboard KPI bar
    pub fn chips(&self) -> Vec<KpiChip> {
        vec![
            KpiChip::new(format!("{:.2} M bbl", self.oil_peak), "Peak oil storage (period)"),
            KpiChip::new(format!("{:.1} h", self.wait_avg), "Avg waiting time"),
            KpiChip::new(self.ships_latest.to_string(), "Ships in anchorage"),
            KpiChip::new(self.dark_latest.to_string(), "Ships w/o AIS (today)"),
            KpiChip::new(format!("{:.1}%", self.dark_share_pct), "No-AIS share (period)"),
            KpiChip::new(
                self.last_acquisition.format("%d %b %Y").to_string(),
                "Last acquisition date",
            ),
        ]
    }
}

fn linspace(start: f64, end: f64, n: usize) -> impl Iterator<Item = f64> {
    let step = if n > 1 { (end - start) / (n - 1) as f64 } else { 0.0 };
    (0..n).map(move |i| start + step * i as f64)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let f = 10f64.powi(decimals);
    (value * f).round() / f
}

impl PortSeries {
    /// Mock period with the default shape ending on the default date
    pub fn seeded(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::generate(default_end_date(), DEFAULT_DAYS, &mut rng)
    }

    /// Generate `days` daily values ending on `end`, plus a 15 day forecast
    pub fn generate<R: Rng + ?Sized>(end: NaiveDate, days: usize, rng: &mut R) -> Self {
        let days = days.max(1);
        let dates: Vec<NaiveDate> = (0..days)
            .map(|i| end - Duration::days((days - 1 - i) as i64))
            .collect();

        let schedule = dates
            .iter()
            .map(|&date| AcquisitionDay {
                date,
                weather: Weather::draw(rng),
                activity: if rng.gen_bool(0.5) {
                    PortActivity::Increase
                } else {
                    PortActivity::Decrease
                },
            })
            .collect();

        let oil_volume = linspace(0.0, 3.0, days)
            .map(|t| round_to(18.0 + t.sin() * 5.0 + rng.gen_range(-1.0..1.0), 2))
            .collect();
        let wait_hours = (0..days).map(|_| round_to(rng.gen_range(10.0..42.0), 1)).collect();
        let ships_total = (0..days)
            .map(|_| (15 + rng.gen_range(-6i32..8)).max(6) as u32)
            .collect();
        let ships_dark = (0..days)
            .map(|_| (0..3).filter(|_| rng.gen_bool(0.35)).count() as u32)
            .collect();

        let forecast_dates = (1..=FORECAST_DAYS as i64).map(|d| end + Duration::days(d)).collect();
        let forecast_volume = linspace(1.2, 2.8, FORECAST_DAYS)
            .map(|t| round_to(18.0 + t.sin() * 4.0 + rng.gen_range(-1.0..1.0), 2))
            .collect();

        Self {
            dates,
            oil_volume,
            wait_hours,
            ships_total,
            ships_dark,
            forecast_dates,
            forecast_volume,
            schedule,
        }
    }

    pub fn kpis(&self) -> PeriodKpis {
        let (peak_idx, oil_peak) = self
            .oil_volume
            .iter()
            .copied()
            .enumerate()
            .fold((0, f64::MIN), |best, (i, v)| if v > best.1 { (i, v) } else { best });

        let wait_sum: f64 = self.wait_hours.iter().sum();
        let wait_avg = round_to(wait_sum / self.wait_hours.len().max(1) as f64, 1);
        let total: u32 = self.ships_total.iter().sum();
        let dark: u32 = self.ships_dark.iter().sum();
        let dark_share_pct = if total == 0 {
            0.0
        } else {
            round_to(dark as f64 * 100.0 / total as f64, 1)
        };

        let mut sorted = self.forecast_volume.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let median = match sorted.len() {
            0 => 0.0,
            n if n % 2 == 1 => sorted[n / 2],
            n => (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0,
        };
        let forecast_trend = match self.forecast_volume.last() {
            Some(&last) if last < median => Trend::Decreasing,
            _ => Trend::Increasing,
        };

        let last_acquisition = self.dates.last().copied().unwrap_or_else(default_end_date);
        PeriodKpis {
            oil_peak,
            oil_peak_date: self.dates.get(peak_idx).copied().unwrap_or(last_acquisition),
            wait_avg,
            ships_latest: self.ships_total.last().copied().unwrap_or(0),
            dark_latest: self.ships_dark.last().copied().unwrap_or(0),
            dark_share_pct,
            last_acquisition,
            forecast_trend,
            rough_weather_days: self.schedule.iter().filter(|d| d.weather.is_rough()).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shapes_and_ranges() {
        let s = PortSeries::seeded(7);
        assert_eq!(s.dates.len(), DEFAULT_DAYS);
        assert_eq!(*s.dates.last().unwrap(), default_end_date());
        assert_eq!(s.dates[0], NaiveDate::from_ymd_opt(2024, 8, 23).unwrap());
        assert_eq!(s.forecast_dates.len(), FORECAST_DAYS);
        assert_eq!(s.forecast_dates[0], NaiveDate::from_ymd_opt(2024, 9, 8).unwrap());

        assert!(s.oil_volume.iter().all(|v| (12.0..=24.0).contains(v)));
        assert!(s.wait_hours.iter().all(|v| (10.0..=42.0).contains(v)));
        assert!(s.ships_total.iter().all(|&v| (9..=22).contains(&v)));
        assert!(s.ships_dark.iter().all(|&v| v <= 3));
        assert_eq!(s.schedule.len(), DEFAULT_DAYS);
    }

    #[test]
    fn test_seed_reproduces_series() {
        assert_eq!(PortSeries::seeded(3), PortSeries::seeded(3));
        assert_ne!(PortSeries::seeded(3).oil_volume, PortSeries::seeded(4).oil_volume);
    }

    #[test]
    fn test_kpis() {
        let mut s = PortSeries::seeded(1);
        s.oil_volume = vec![1.0, 5.0, 3.0];
        s.dates.truncate(3);
        s.wait_hours = vec![10.0, 20.0];
        s.ships_total = vec![10, 10];
        s.ships_dark = vec![1, 2];
        s.forecast_volume = vec![3.0, 1.0, 2.0];

        let k = s.kpis();
        assert_eq!(k.oil_peak, 5.0);
        assert_eq!(k.oil_peak_date, s.dates[1]);
        assert_eq!(k.wait_avg, 15.0);
        assert_eq!(k.dark_share_pct, 15.0);
        assert_eq!(k.ships_latest, 10);
        assert_eq!(k.dark_latest, 2);
        assert_eq!(k.forecast_trend, Trend::Increasing);

        let chips = k.chips();
        assert_eq!(chips.len(), 6);
        assert_eq!(chips[0].value, "5.00 M bbl");
        assert_eq!(chips[1].value, "15.0 h");
        assert_eq!(chips[4].value, "15.0%");
        assert_eq!(chips[5].value, "25 Aug 2024");

        s.forecast_volume = vec![3.0, 2.0, 1.0];
        assert_eq!(s.kpis().forecast_trend, Trend::Decreasing);
    }

    #[test]
    fn test_linspace_endpoints() {
        let v: Vec<f64> = linspace(0.0, 3.0, 4).collect();
        assert_eq!(v, vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(linspace(1.0, 2.0, 1).collect::<Vec<_>>(), vec![1.0]);
    }
}
