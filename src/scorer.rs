use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::Command;

use tracing::info;

use crate::error::ScanError;
use crate::model::{PackageSpec, SimilarityPair};

const UPDATE_FLAG: &str = "--update";

pub trait Scorer {
    fn refresh_corpus(&self) -> Result<(), ScanError>;
    fn score(&self, package: &PackageSpec) -> Result<Vec<SimilarityPair>, ScanError>;
}

/// Drives the external scorer executable. Each call overwrites the shared
/// result artifact, so invocations must stay sequential: the caller reads
/// one result before issuing the next.
pub struct ProcessScorer {
    command: String,
    result_path: PathBuf,
}

impl ProcessScorer {
    pub fn new(command: impl Into<String>, result_path: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            result_path: result_path.into(),
        }
    }

    fn invoke(&self, argument: &str) -> Result<(), ScanError> {
        let output = Command::new(&self.command)
            .arg(argument)
            .output()
            .map_err(|source| self.spawn_error(source))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScanError::ScorerExecutionFailed {
                command: self.command.clone(),
                reason: format!("{}: {}", output.status, stderr.trim()),
            });
        }

        Ok(())
    }

    fn spawn_error(&self, source: io::Error) -> ScanError {
        if source.kind() == io::ErrorKind::NotFound {
            ScanError::ScorerUnavailable {
                command: self.command.clone(),
            }
        } else {
            ScanError::ScorerExecutionFailed {
                command: self.command.clone(),
                reason: source.to_string(),
            }
        }
    }

    fn read_result_table(&self) -> Result<BTreeMap<String, Vec<SimilarityPair>>, ScanError> {
        let raw = fs::read(&self.result_path).map_err(|source| ScanError::MalformedScoreResult {
            path: self.result_path.clone(),
            reason: source.to_string(),
        })?;

        serde_json::from_slice(&raw).map_err(|source| ScanError::MalformedScoreResult {
            path: self.result_path.clone(),
            reason: source.to_string(),
        })
    }
}

impl Scorer for ProcessScorer {
    fn refresh_corpus(&self) -> Result<(), ScanError> {
        info!(command = %self.command, "refreshing scorer corpus");
        self.invoke(UPDATE_FLAG)
    }

    fn score(&self, package: &PackageSpec) -> Result<Vec<SimilarityPair>, ScanError> {
        info!(command = %self.command, package = %package.name, "scoring package");
        self.invoke(&package.name)?;

        let mut table = self.read_result_table()?;
        table
            .remove(&package.name)
            .ok_or_else(|| ScanError::MissingScoreResult {
                package: package.name.clone(),
                path: self.result_path.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &str) -> PackageSpec {
        PackageSpec {
            name: name.to_string(),
            version: String::new(),
        }
    }

    #[test]
    fn score_returns_parsed_pairs_for_the_requested_package() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result_path = dir.path().join("typosquatting_results.json");
        fs::write(
            &result_path,
            r#"{"foo":[["foo",1.0],["f0o",0.95]],"bar":[["bar",1.0]]}"#,
        )
        .expect("write result file");

        let scorer = ProcessScorer::new("true", &result_path);
        let pairs = scorer.score(&spec("foo")).expect("score succeeds");

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].candidate(), "foo");
        assert_eq!(pairs[1].candidate(), "f0o");
        assert_eq!(pairs[1].score(), 0.95);
    }

    #[test]
    fn missing_package_key_is_a_hard_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result_path = dir.path().join("typosquatting_results.json");
        fs::write(&result_path, r#"{"other":[["other",1.0]]}"#).expect("write result file");

        let scorer = ProcessScorer::new("true", &result_path);
        let error = scorer.score(&spec("foo")).expect_err("missing key fails");

        assert!(matches!(
            error,
            ScanError::MissingScoreResult { ref package, .. } if package == "foo"
        ));
    }

    #[test]
    fn invalid_result_json_is_reported_as_malformed() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result_path = dir.path().join("typosquatting_results.json");
        fs::write(&result_path, "not json at all").expect("write result file");

        let scorer = ProcessScorer::new("true", &result_path);
        let error = scorer.score(&spec("foo")).expect_err("malformed result fails");

        assert!(matches!(error, ScanError::MalformedScoreResult { .. }));
    }

    #[test]
    fn absent_result_file_is_reported_as_malformed() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result_path = dir.path().join("never_written.json");

        let scorer = ProcessScorer::new("true", &result_path);
        let error = scorer.score(&spec("foo")).expect_err("absent file fails");

        assert!(matches!(error, ScanError::MalformedScoreResult { .. }));
    }

    #[test]
    fn unknown_executable_is_reported_as_unavailable() {
        let scorer = ProcessScorer::new(
            "typoscan-test-no-such-scorer-binary",
            "typosquatting_results.json",
        );

        let error = scorer.refresh_corpus().expect_err("spawn fails");

        assert!(matches!(error, ScanError::ScorerUnavailable { .. }));
    }

    #[test]
    fn nonzero_exit_is_reported_as_execution_failure() {
        let scorer = ProcessScorer::new("false", "typosquatting_results.json");

        let error = scorer.refresh_corpus().expect_err("nonzero exit fails");

        assert!(matches!(error, ScanError::ScorerExecutionFailed { .. }));
    }
}
