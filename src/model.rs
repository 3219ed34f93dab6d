use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageSpec {
    pub name: String,
    pub version: String,
}

/// One `[candidate, score]` entry from the scorer's result table, kept in
/// the scorer's own wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityPair(pub String, pub f64);

impl SimilarityPair {
    pub fn candidate(&self) -> &str {
        &self.0
    }

    pub fn score(&self) -> f64 {
        self.1
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedMatch {
    pub candidate: String,
    pub score: f64,
    pub is_self_match: bool,
    pub is_suspicious: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub package: String,
    pub score: String,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub severity: AlertSeverity,
    pub title: String,
    pub subject: String,
    pub context: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PackageSection {
    pub package: String,
    pub version: String,
    pub matches: Vec<SimilarityPair>,
    pub rows: Vec<ReportRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PackageFailure {
    pub package: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanCounts {
    pub package_count: usize,
    pub scored_package_count: usize,
    pub failed_package_count: usize,
    pub alert_count: usize,
    pub row_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanRunReport {
    pub report_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub finished_at: String,
    pub scorer_command: String,
    pub threshold: f64,
    pub direction: String,
    pub self_match_epsilon: f64,
    pub manifest_path: Option<String>,
    pub manifest_sha256: Option<String>,
    pub counts: ScanCounts,
    pub alerts: Vec<Alert>,
    pub sections: Vec<PackageSection>,
    pub failures: Vec<PackageFailure>,
}
