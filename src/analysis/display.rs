//! Per-risk display values for the results view.

use std::fmt;

use super::{AnalysisResult, Risk};
use crate::routing::Route;

/// Severity tier derived from a risk probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Low,
    Moderate,
    High,
}

impl Severity {
    /// `> 0.6` is High, `> 0.3` is Moderate, anything else Low
    pub fn from_probability(probability: f64) -> Self {
        if probability > 0.6 {
            Severity::High
        } else if probability > 0.3 {
            Severity::Moderate
        } else {
            Severity::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Moderate => "Moderate",
            Severity::High => "High",
        }
    }

    /// Display color (hex)
    pub fn color(&self) -> &'static str {
        match self {
            Severity::Low => "#00d68f",
            Severity::Moderate => "#ffb800",
            Severity::High => "#ff3d3d",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Risk", self.label())
    }
}

/// Probability as a whole-number percentage, e.g. `0.45` -> `"45%"`.
/// Halves round up.
pub fn percent_label(probability: f64) -> String {
    format!("{}%", (probability * 100.0).round() as i64)
}

/// Everything the risk list needs to render one entry
#[derive(Debug, Clone, PartialEq)]
pub struct RiskView {
    pub name: String,
    pub reason: String,
    pub probability: f64,
    pub severity: Severity,
    pub percent: String,
    /// Progress bar fill, 0..=100
    pub bar_width: f64,
}

impl RiskView {
    pub fn from_risk(risk: &Risk) -> Self {
        Self {
            name: risk.risk_name.clone(),
            reason: risk.reason.clone(),
            probability: risk.probability,
            severity: Severity::from_probability(risk.probability),
            percent: percent_label(risk.probability),
            bar_width: risk.probability * 100.0,
        }
    }

    pub fn color(&self) -> &'static str {
        self.severity.color()
    }
}

/// One bar of the risk distribution chart
#[derive(Debug, Clone, PartialEq)]
pub struct RiskBar {
    pub name: String,
    pub score: f64,
    pub color: &'static str,
}

/// File information card
#[derive(Debug, Clone, PartialEq)]
pub struct FileInfo {
    pub file_name: String,
    pub format: String,
    pub processed_at: String,
    pub status: &'static str,
}

impl AnalysisResult {
    pub fn risk_views(&self) -> Vec<RiskView> {
        self.identified_risks.iter().map(RiskView::from_risk).collect()
    }

    pub fn risk_bars(&self) -> Vec<RiskBar> {
        self.identified_risks
            .iter()
            .map(|r| RiskBar {
                name: r.risk_name.clone(),
                score: r.probability * 100.0,
                color: Severity::from_probability(r.probability).color(),
            })
            .collect()
    }

    pub fn file_info(&self) -> FileInfo {
        FileInfo {
            file_name: self.file_processed.clone(),
            format: self.genomic_summary.file_type.clone(),
            processed_at: format_processed_at(&self.genomic_summary.processed_at),
            status: "Complete",
        }
    }
}

/// Render the backend timestamp readably; unparseable values pass through as-is.
fn format_processed_at(raw: &str) -> String {
    const DISPLAY: &str = "%b %d, %Y %H:%M:%S";

    let raw = raw.trim();
    if raw.is_empty() {
        return "—".to_string();
    }

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return dt.format(DISPLAY).to_string();
    }

    // Python's isoformat() without an offset
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format(DISPLAY).to_string();
    }

    raw.to_string()
}

/// What the results view does when it loads
#[derive(Debug, Clone, PartialEq)]
pub enum ResultsEntry {
    Render(AnalysisResult),
    Redirect(Route),
}

/// Decide the results view from the contents of the result slot.
///
/// An empty slot, or one that no longer decodes, sends the user back to upload.
pub fn open_results(stored: Option<&str>) -> ResultsEntry {
    let Some(text) = stored else {
        tracing::debug!("No stored analysis, redirecting to upload");
        return ResultsEntry::Redirect(Route::Upload);
    };

    match AnalysisResult::from_json(text) {
        Ok(result) => ResultsEntry::Render(result),
        Err(e) => {
            tracing::warn!("Stored analysis is unreadable: {}", e);
            ResultsEntry::Redirect(Route::Upload)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with(probabilities: &[f64]) -> AnalysisResult {
        AnalysisResult {
            file_processed: "genome.vcf".to_string(),
            genomic_summary: Default::default(),
            identified_risks: probabilities
                .iter()
                .enumerate()
                .map(|(i, p)| Risk::new(format!("Risk {}", i), *p, "reason"))
                .collect(),
        }
    }

    #[test]
    fn test_tiers_and_percentages() {
        let views = result_with(&[0.75, 0.45, 0.1]).risk_views();

        let tiers: Vec<_> = views.iter().map(|v| v.severity).collect();
        assert_eq!(tiers, vec![Severity::High, Severity::Moderate, Severity::Low]);

        let percents: Vec<_> = views.iter().map(|v| v.percent.as_str()).collect();
        assert_eq!(percents, vec!["75%", "45%", "10%"]);
    }

    #[test]
    fn test_percent_halves_round_up() {
        assert_eq!(percent_label(0.125), "13%");
        assert_eq!(percent_label(0.625), "63%");
        assert_eq!(percent_label(0.0), "0%");
        assert_eq!(percent_label(1.0), "100%");
    }

    #[test]
    fn test_tier_boundaries_are_exclusive() {
        assert_eq!(Severity::from_probability(0.6), Severity::Moderate);
        assert_eq!(Severity::from_probability(0.3), Severity::Low);
        assert_eq!(Severity::from_probability(0.61), Severity::High);
        assert_eq!(Severity::from_probability(0.0), Severity::Low);
        assert_eq!(Severity::from_probability(1.0), Severity::High);
    }

    #[test]
    fn test_colors_follow_tier() {
        let views = result_with(&[0.9, 0.5, 0.2]).risk_views();
        assert_eq!(views[0].color(), "#ff3d3d");
        assert_eq!(views[1].color(), "#ffb800");
        assert_eq!(views[2].color(), "#00d68f");
        assert_eq!(Severity::High.to_string(), "High Risk");
    }

    #[test]
    fn test_risk_bars() {
        let bars = result_with(&[0.75, 0.1]).risk_bars();
        assert_eq!(bars.len(), 2);
        assert!((bars[0].score - 75.0).abs() < 1e-9);
        assert_eq!(bars[1].color, "#00d68f");
    }

    #[test]
    fn test_file_info() {
        let mut result = result_with(&[]);
        result.genomic_summary.file_type = "VCF".to_string();
        result.genomic_summary.processed_at = "2024-03-01T10:15:00.123456".to_string();

        let info = result.file_info();
        assert_eq!(info.file_name, "genome.vcf");
        assert_eq!(info.format, "VCF");
        assert_eq!(info.processed_at, "Mar 01, 2024 10:15:00");
        assert_eq!(info.status, "Complete");
    }

    #[test]
    fn test_processed_at_fallbacks() {
        assert_eq!(format_processed_at(""), "—");
        assert_eq!(format_processed_at("yesterday"), "yesterday");
        assert_eq!(format_processed_at("2024-03-01T10:15:00Z"), "Mar 01, 2024 10:15:00");
    }

    #[test]
    fn test_open_results_without_slot_redirects() {
        assert_eq!(open_results(None), ResultsEntry::Redirect(Route::Upload));
        assert_eq!(open_results(Some("{not json")), ResultsEntry::Redirect(Route::Upload));
    }

    #[test]
    fn test_open_results_renders_stored() {
        let stored = result_with(&[0.5]).to_json().unwrap();
        match open_results(Some(&stored)) {
            ResultsEntry::Render(result) => assert_eq!(result.identified_risks.len(), 1),
            other => panic!("expected render, got {:?}", other),
        }
    }
}
