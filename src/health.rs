//! Dashboard and health-metric data.
//!
//! No wearable integration exists yet, so the dashboard shows fixed
//! figures and the health-metrics view a synthetic 30-day series.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Current heart rate shown on the dashboard and metrics pages
pub const CURRENT_HEART_RATE: u32 = 72;

/// Days in the synthetic monthly series
pub const SERIES_DAYS: usize = 30;

/// One summary card on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: &'static str,
    pub trend: &'static str,
    pub trend_up: bool,
    pub color: &'static str,
}

pub const DASHBOARD_STATS: [StatCard; 4] = [
    StatCard {
        label: "Heart Rate",
        value: "72 BPM",
        trend: "+2%",
        trend_up: true,
        color: "#ff3d3d",
    },
    StatCard {
        label: "Steps Today",
        value: "8,450",
        trend: "+12%",
        trend_up: true,
        color: "#0077cc",
    },
    StatCard {
        label: "Sleep Quality",
        value: "7.5h",
        trend: "-5%",
        trend_up: false,
        color: "#ffb800",
    },
    StatCard {
        label: "Risk Score",
        value: "78/100",
        trend: "+8%",
        trend_up: true,
        color: "#00d68f",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayActivity {
    pub day: &'static str,
    pub steps: u32,
    pub heart_rate: u32,
}

pub const WEEKLY_ACTIVITY: [DayActivity; 7] = [
    DayActivity { day: "Mon", steps: 8200, heart_rate: 70 },
    DayActivity { day: "Tue", steps: 9100, heart_rate: 72 },
    DayActivity { day: "Wed", steps: 7500, heart_rate: 69 },
    DayActivity { day: "Thu", steps: 8900, heart_rate: 73 },
    DayActivity { day: "Fri", steps: 10200, heart_rate: 75 },
    DayActivity { day: "Sat", steps: 11500, heart_rate: 78 },
    DayActivity { day: "Sun", steps: 6800, heart_rate: 68 },
];

/// One slice of the risk distribution donut
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskSlice {
    pub name: &'static str,
    pub value: u32,
    pub color: &'static str,
}

pub const RISK_DISTRIBUTION: [RiskSlice; 4] = [
    RiskSlice { name: "Cardiovascular", value: 35, color: "#ff3d3d" },
    RiskSlice { name: "Diabetes", value: 28, color: "#ffb800" },
    RiskSlice { name: "Cancer", value: 15, color: "#0077cc" },
    RiskSlice { name: "Low Risk", value: 22, color: "#00d68f" },
];

/// Chromosomes flagged on the dashboard panel (1-based)
pub const FLAGGED_CHROMOSOMES: [u8; 4] = [3, 8, 14, 20];

/// Donut slice sweep angles in degrees, in order
pub fn risk_slice_angles() -> Vec<(RiskSlice, f64)> {
    let total: u32 = RISK_DISTRIBUTION.iter().map(|s| s.value).sum();
    RISK_DISTRIBUTION
        .iter()
        .map(|s| (*s, s.value as f64 / total as f64 * 360.0))
        .collect()
}

// ============================================
// Health metrics
// ============================================

/// One day of the synthetic series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyMetrics {
    /// 1-based day number
    pub day: u32,
    pub steps: u32,
    pub heart_rate: u32,
    /// Hours
    pub sleep: f64,
    pub calories: u32,
}

/// Generate the 30-day series.
///
/// Ranges (half-open): steps `[7000, 12000)`, heart rate `[68, 83)`,
/// sleep `[6, 9)`, calories `[1800, 2400)`.
pub fn monthly_series(seed: u64) -> Vec<DailyMetrics> {
    let mut rng = SmallRng::seed_from_u64(seed);

    (1..=SERIES_DAYS as u32)
        .map(|day| DailyMetrics {
            day,
            steps: rng.gen_range(7000..12000),
            heart_rate: rng.gen_range(68..83),
            sleep: rng.gen_range(6.0..9.0),
            calories: rng.gen_range(1800..2400),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    HeartRate,
    Steps,
    Sleep,
    Calories,
}

impl MetricKind {
    pub const ALL: [MetricKind; 4] = [
        MetricKind::HeartRate,
        MetricKind::Steps,
        MetricKind::Sleep,
        MetricKind::Calories,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::HeartRate => "Avg Heart Rate",
            MetricKind::Steps => "Daily Steps",
            MetricKind::Sleep => "Sleep Quality",
            MetricKind::Calories => "Calories Burned",
        }
    }

    /// Headline value on the metric card
    pub fn headline(&self) -> &'static str {
        match self {
            MetricKind::HeartRate => "72 BPM",
            MetricKind::Steps => "8,450",
            MetricKind::Sleep => "7.5h",
            MetricKind::Calories => "2,100",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            MetricKind::HeartRate => "#ff3d3d",
            MetricKind::Steps => "#0077cc",
            MetricKind::Sleep => "#ffb800",
            MetricKind::Calories => "#00d68f",
        }
    }

    pub fn value(&self, day: &DailyMetrics) -> f64 {
        match self {
            MetricKind::HeartRate => day.heart_rate as f64,
            MetricKind::Steps => day.steps as f64,
            MetricKind::Sleep => day.sleep,
            MetricKind::Calories => day.calories as f64,
        }
    }

    /// Sparkline values for this metric
    pub fn series(&self, days: &[DailyMetrics]) -> Vec<f64> {
        days.iter().map(|d| self.value(d)).collect()
    }
}

/// `8450` -> `"8,450"`
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_ranges() {
        let days = monthly_series(7);
        assert_eq!(days.len(), 30);
        assert_eq!(days[0].day, 1);
        assert_eq!(days[29].day, 30);

        for d in &days {
            assert!((7000..12000).contains(&d.steps));
            assert!((68..83).contains(&d.heart_rate));
            assert!(d.sleep >= 6.0 && d.sleep < 9.0);
            assert!((1800..2400).contains(&d.calories));
        }
    }

    #[test]
    fn test_series_is_seeded() {
        assert_eq!(monthly_series(42), monthly_series(42));
        assert_ne!(monthly_series(1), monthly_series(2));
    }

    #[test]
    fn test_metric_series() {
        let days = monthly_series(3);
        let steps = MetricKind::Steps.series(&days);
        assert_eq!(steps.len(), 30);
        assert_eq!(steps[4], days[4].steps as f64);
        assert_eq!(MetricKind::Calories.headline(), "2,100");
    }

    #[test]
    fn test_fixtures() {
        assert_eq!(DASHBOARD_STATS[1].value, format_thousands(8450));
        assert!(!DASHBOARD_STATS[2].trend_up);
        assert_eq!(RISK_DISTRIBUTION.iter().map(|s| s.value).sum::<u32>(), 100);
        assert_eq!(WEEKLY_ACTIVITY[5].steps, 11500);
    }

    #[test]
    fn test_slice_angles_cover_circle() {
        let total: f64 = risk_slice_angles().iter().map(|(_, a)| a).sum();
        assert!((total - 360.0).abs() < 1e-9);
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }
}
