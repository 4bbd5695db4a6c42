use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of analyzing a single prompt.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct AnalysisResult {
    pub success: bool,
    /// The analyzed prompt, echoed back by the service.
    #[serde(default)]
    pub prompt: String,
    pub is_safe: bool,
    /// The prompt with every finding masked out.
    #[serde(default)]
    pub redacted_prompt: String,
    #[serde(default)]
    pub findings_count: usize,
    #[serde(default)]
    pub findings: Vec<Finding>,
    #[serde(default)]
    pub summary: AnalysisSummary,
    #[serde(default)]
    pub metadata: ProcessingMetadata,
}

impl AnalysisResult {
    pub fn has_findings(&self) -> bool {
        !self.findings.is_empty()
    }
}

/// One issue detected in a prompt.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct Finding {
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    pub risk_score: f64,
    /// The offending substring.
    pub text: String,
    #[serde(default)]
    pub suggestion: String,
    /// Offset of the substring in the original prompt.
    pub start: usize,
    pub end: usize,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct AnalysisSummary {
    #[serde(default)]
    pub risk_level: String,
    #[serde(default)]
    pub highest_risk_score: f64,
    #[serde(default)]
    pub categories: Vec<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct ProcessingMetadata {
    #[serde(default)]
    pub processing_time_ms: u64,
    pub model_version: Option<String>,
    pub request_id: Option<String>,
}

/// Service health report.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct HealthStatus {
    pub status: String,
    /// Dependency name to availability.
    #[serde(default)]
    pub dependencies: BTreeMap<String, bool>,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}
