use std::fs;

use anyhow::{Result, bail};
use chrono::Utc;
use tracing::{info, warn};

use crate::classify::{DetectionConfig, classify};
use crate::cli::CheckArgs;
use crate::error::ScanError;
use crate::manifest::parse_manifest;
use crate::model::{
    Alert, PackageFailure, PackageSection, PackageSpec, ScanCounts, ScanRunReport,
};
use crate::report::{JsonReportSink, ReportSink, TextReportSink, build_report};
use crate::scorer::{ProcessScorer, Scorer};
use crate::util::{now_utc_string, sha256_file, utc_compact_string, write_json_pretty};

const REPORT_VERSION: u32 = 1;

pub fn run(args: CheckArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("scan-{}", utc_compact_string(started_ts));

    let (packages, manifest_path, manifest_sha256) = resolve_packages(&args)?;

    info!(run_id = %run_id, package_count = packages.len(), "starting typosquat check");

    if packages.is_empty() {
        warn!("no package entries found in input, nothing to score");
        return Ok(());
    }

    if args.dry_run {
        for package in &packages {
            info!(package = %package.name, version = %package.version, "would score");
        }
        return Ok(());
    }

    let config = DetectionConfig {
        threshold: args.threshold,
        direction: args.direction,
        self_match_epsilon: args.self_match_epsilon,
    };

    let scorer = ProcessScorer::new(args.scorer_command.clone(), args.result_path.clone());

    if args.skip_refresh {
        info!("skipping corpus refresh, scoring against the existing corpus");
    } else {
        scorer.refresh_corpus()?;
    }

    let mut sink: Box<dyn ReportSink> = if args.json {
        Box::new(JsonReportSink::stdout())
    } else {
        Box::new(TextReportSink::stdout())
    };

    let outcome = scan_packages(&scorer, sink.as_mut(), &packages, &config)?;

    let finished_at = now_utc_string();
    let status = if outcome.failures.is_empty() {
        "completed"
    } else {
        "completed-with-failures"
    };

    let report = ScanRunReport {
        report_version: REPORT_VERSION,
        run_id,
        status: status.to_string(),
        started_at,
        finished_at,
        scorer_command: args.scorer_command.clone(),
        threshold: config.threshold,
        direction: config.direction.as_str().to_string(),
        self_match_epsilon: config.self_match_epsilon,
        manifest_path,
        manifest_sha256,
        counts: ScanCounts {
            package_count: packages.len(),
            scored_package_count: outcome.sections.len(),
            failed_package_count: outcome.failures.len(),
            alert_count: outcome.alerts.len(),
            row_count: outcome.row_count,
        },
        alerts: outcome.alerts,
        sections: outcome.sections,
        failures: outcome.failures,
    };

    sink.finish(&report)?;

    if let Some(report_path) = &args.report_path {
        write_json_pretty(report_path, &report)?;
        info!(path = %report_path.display(), "wrote scan report");
    }

    if !report.failures.is_empty() {
        bail!(
            "{} of {} packages failed scoring",
            report.failures.len(),
            packages.len()
        );
    }

    info!(
        alert_count = report.counts.alert_count,
        row_count = report.counts.row_count,
        "typosquat check completed"
    );

    Ok(())
}

fn resolve_packages(args: &CheckArgs) -> Result<(Vec<PackageSpec>, Option<String>, Option<String>)> {
    if let Some(manifest_path) = &args.manifest_path {
        let text =
            fs::read_to_string(manifest_path).map_err(|source| ScanError::ManifestUnreadable {
                path: manifest_path.clone(),
                source,
            })?;
        let packages = parse_manifest(&text)?;
        let sha256 = sha256_file(manifest_path)?;

        info!(
            path = %manifest_path.display(),
            package_count = packages.len(),
            "parsed dependency manifest"
        );

        return Ok((
            packages,
            Some(manifest_path.display().to_string()),
            Some(sha256),
        ));
    }

    if let Some(package) = &args.package {
        let packages = vec![PackageSpec {
            name: package.clone(),
            version: String::new(),
        }];
        return Ok((packages, None, None));
    }

    bail!("either a package name or --manifest-path is required");
}

struct ScanOutcome {
    sections: Vec<PackageSection>,
    alerts: Vec<Alert>,
    failures: Vec<PackageFailure>,
    row_count: usize,
}

fn scan_packages(
    scorer: &dyn Scorer,
    sink: &mut dyn ReportSink,
    packages: &[PackageSpec],
    config: &DetectionConfig,
) -> Result<ScanOutcome> {
    let mut outcome = ScanOutcome {
        sections: Vec::new(),
        alerts: Vec::new(),
        failures: Vec::new(),
        row_count: 0,
    };

    for package in packages {
        let pairs = match scorer.score(package) {
            Ok(pairs) => pairs,
            // a missing executable cannot recover for later packages
            Err(error @ ScanError::ScorerUnavailable { .. }) => return Err(error.into()),
            Err(error) => {
                let failure = PackageFailure {
                    package: package.name.clone(),
                    error: error.to_string(),
                };
                sink.failure(&failure)?;
                outcome.failures.push(failure);
                continue;
            }
        };

        let matches = classify(&pairs, config);
        let (alerts, rows) = build_report(&package.name, &matches);

        for alert in &alerts {
            sink.alert(alert)?;
        }

        let section = PackageSection {
            package: package.name.clone(),
            version: package.version.clone(),
            matches: pairs,
            rows,
        };
        sink.section(&section)?;

        outcome.row_count += section.rows.len();
        outcome.alerts.extend(alerts);
        outcome.sections.push(section);
    }

    Ok(outcome)
}
