//! Analysis Results
//!
//! Types returned by the analysis API (`/predict_risk`,
//! `/personalized_prevention`) and the values the results view derives
//! from them.
//!
//! ## Flow
//!
//! 1. The upload pipeline stores the latest [`AnalysisResult`] in a single
//!    client-side slot ([`RESULT_SLOT_KEY`])
//! 2. [`open_results`] reads that slot; no result means a redirect to `/upload`
//! 3. Each [`Risk`] becomes a [`RiskView`] with tier, color and percentage
//! 4. Selecting a risk goes through [`PlanSelector`], which only accepts the
//!    plan for the most recent selection

mod display;
mod plan;

#[cfg(feature = "native")]
mod controller;

pub use display::{open_results, percent_label, FileInfo, ResultsEntry, RiskBar, RiskView, Severity};
pub use plan::{PlanRequest, PlanSelector, PlanState};

#[cfg(feature = "native")]
pub use controller::PlanController;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Storage key of the single result slot (browser `localStorage`)
pub const RESULT_SLOT_KEY: &str = "genomicResult";

/// Shown when an upload fails without a server-supplied message
pub const UPLOAD_FALLBACK_ERROR: &str = "Upload failed. Please try again.";

/// Only this many recommended medications are displayed per plan
pub const MAX_DISPLAYED_MEDS: usize = 3;

/// Output of `/predict_risk` for one uploaded file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub file_processed: String,
    #[serde(default)]
    pub genomic_summary: GenomicSummary,
    #[serde(default)]
    pub identified_risks: Vec<Risk>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenomicSummary {
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub processed_at: String,
}

/// One disease/condition entry in an analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Risk {
    pub risk_name: String,
    /// Always within `[0, 1]`
    #[serde(deserialize_with = "deserialize_probability")]
    pub probability: f64,
    #[serde(default)]
    pub reason: String,
}

impl AnalysisResult {
    /// Decode a stored or received analysis
    pub fn from_json(text: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize for the result slot
    pub fn to_json(&self) -> Result<String, DecodeError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Find a risk by name (case-insensitive)
    pub fn find_risk(&self, name: &str) -> Option<&Risk> {
        self.identified_risks
            .iter()
            .find(|r| r.risk_name.eq_ignore_ascii_case(name.trim()))
    }
}

impl Risk {
    pub fn new(name: impl Into<String>, probability: f64, reason: impl Into<String>) -> Self {
        Self {
            risk_name: name.into(),
            probability,
            reason: reason.into(),
        }
    }

    /// Request body for this risk's prevention plan
    pub fn prevention_request(&self) -> PreventionRequest {
        PreventionRequest {
            disease: self.risk_name.clone(),
            risk_score: self.probability,
        }
    }
}

/// The backend has sent probabilities both as numbers and as numeric strings.
fn deserialize_probability<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    let value = match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => n,
        NumberOrString::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid probability: {:?}", s)))?,
    };

    if !(0.0..=1.0).contains(&value) {
        return Err(serde::de::Error::custom(format!(
            "probability {} outside [0, 1]",
            value
        )));
    }

    Ok(value)
}

// ============================================
// Prevention plans
// ============================================

/// Body of `POST /personalized_prevention`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreventionRequest {
    pub disease: String,
    pub risk_score: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreventionResponse {
    pub personalized_plan: PreventionPlan,
}

/// Lifestyle and medication guidance for one selected risk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreventionPlan {
    #[serde(default)]
    pub lifestyle_plan: LifestylePlan,
    #[serde(default)]
    pub medication_and_monitoring: MedicationPlan,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LifestylePlan {
    #[serde(default)]
    pub exercise: String,
    #[serde(default)]
    pub sleep: String,
    #[serde(default)]
    pub stress_management: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MedicationPlan {
    #[serde(default)]
    pub monitoring_schedule: String,
    #[serde(default)]
    pub recommended_meds: Vec<String>,
}

impl PreventionPlan {
    /// Medications shown in the plan panel
    pub fn displayed_meds(&self) -> &[String] {
        let meds = &self.medication_and_monitoring.recommended_meds;
        &meds[..meds.len().min(MAX_DISPLAYED_MEDS)]
    }
}

/// Error body of the analysis API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Extract the `error` message from a response body, if there is one
    pub fn message_from(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.trim().is_empty())
    }
}

/// Failure to decode an analysis or plan
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Invalid analysis data: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "file_processed": "sample.vcf",
        "genomic_summary": {"file_type": "VCF", "processed_at": "2024-03-01T10:15:00Z"},
        "identified_risks": [
            {"risk_name": "Type 2 Diabetes", "probability": 0.75, "reason": "TCF7L2 variant"},
            {"risk_name": "Hypertension", "probability": "0.45", "reason": "AGT variant"},
            {"risk_name": "Asthma", "probability": 0.1, "reason": "No strong markers"}
        ]
    }"#;

    #[test]
    fn test_decode_sample() {
        let result = AnalysisResult::from_json(SAMPLE).unwrap();
        assert_eq!(result.file_processed, "sample.vcf");
        assert_eq!(result.genomic_summary.file_type, "VCF");
        assert_eq!(result.identified_risks.len(), 3);
        assert_eq!(result.identified_risks[1].probability, 0.45);
    }

    #[test]
    fn test_missing_risks_is_empty() {
        let result = AnalysisResult::from_json(r#"{"file_processed": "x.csv"}"#).unwrap();
        assert!(result.identified_risks.is_empty());
        assert_eq!(result.genomic_summary, GenomicSummary::default());
    }

    #[test]
    fn test_probability_out_of_range_rejected() {
        let text = r#"{"identified_risks": [{"risk_name": "X", "probability": 1.4}]}"#;
        assert!(AnalysisResult::from_json(text).is_err());

        let text = r#"{"identified_risks": [{"risk_name": "X", "probability": "high"}]}"#;
        assert!(AnalysisResult::from_json(text).is_err());
    }

    #[test]
    fn test_find_risk_ignores_case() {
        let result = AnalysisResult::from_json(SAMPLE).unwrap();
        let risk = result.find_risk("hypertension").unwrap();
        assert_eq!(risk.risk_name, "Hypertension");
        assert!(result.find_risk("Gout").is_none());
    }

    #[test]
    fn test_prevention_request_body() {
        let risk = Risk::new("Hypertension", 0.45, "");
        let body = serde_json::to_value(risk.prevention_request()).unwrap();
        assert_eq!(body["disease"], "Hypertension");
        assert_eq!(body["risk_score"], 0.45);
    }

    #[test]
    fn test_displayed_meds_capped() {
        let text = r#"{"personalized_plan": {
            "lifestyle_plan": {"exercise": "30 min walk", "sleep": "8h", "stress_management": "Yoga"},
            "medication_and_monitoring": {
                "monitoring_schedule": "HbA1c every 6 months",
                "recommended_meds": ["Metformin", "Statin", "Aspirin", "Vitamin D"]
            }
        }}"#;
        let response: PreventionResponse = serde_json::from_str(text).unwrap();
        let plan = response.personalized_plan;
        assert_eq!(plan.displayed_meds(), &["Metformin", "Statin", "Aspirin"]);
        assert_eq!(plan.lifestyle_plan.sleep, "8h");
    }

    #[test]
    fn test_partial_plan_decodes() {
        let plan: PreventionPlan = serde_json::from_str(r#"{"lifestyle_plan": {"exercise": "Swim"}}"#).unwrap();
        assert_eq!(plan.lifestyle_plan.exercise, "Swim");
        assert!(plan.displayed_meds().is_empty());
    }

    #[test]
    fn test_error_body_message() {
        assert_eq!(
            ErrorBody::message_from(r#"{"error": "Unsupported file type"}"#).as_deref(),
            Some("Unsupported file type")
        );
        assert_eq!(ErrorBody::message_from("<html>502</html>"), None);
        assert_eq!(ErrorBody::message_from(r#"{"error": ""}"#), None);
    }
}
