use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::warn;

use crate::model::{
    Alert, AlertSeverity, ClassifiedMatch, PackageFailure, PackageSection, ReportRow,
    ScanRunReport,
};

pub const SUSPICIOUS_ALERT_TITLE: &str = "Found Suspicious Package";

pub fn build_report(package: &str, matches: &[ClassifiedMatch]) -> (Vec<Alert>, Vec<ReportRow>) {
    let alerts = matches
        .iter()
        .filter(|candidate| candidate.is_suspicious)
        .map(|candidate| Alert {
            severity: AlertSeverity::Warning,
            title: SUSPICIOUS_ALERT_TITLE.to_string(),
            subject: candidate.candidate.clone(),
            context: package.to_string(),
        })
        .collect();

    let mut retained: Vec<&ClassifiedMatch> = matches
        .iter()
        .filter(|candidate| !candidate.is_self_match)
        .collect();
    // stable sort: ties keep the classifier's input order
    retained.sort_by(|a, b| b.score.total_cmp(&a.score));

    let rows = retained
        .iter()
        .map(|candidate| ReportRow {
            package: candidate.candidate.clone(),
            score: format!("{:.2}", candidate.score),
        })
        .collect();

    (alerts, rows)
}

pub trait ReportSink {
    fn alert(&mut self, alert: &Alert) -> Result<()>;
    fn section(&mut self, section: &PackageSection) -> Result<()>;
    fn failure(&mut self, failure: &PackageFailure) -> Result<()>;
    fn finish(&mut self, report: &ScanRunReport) -> Result<()>;
}

fn warn_alert(alert: &Alert) {
    warn!(
        subject = %alert.subject,
        context = %alert.context,
        title = %alert.title,
        "suspicious package name detected"
    );
}

fn warn_failure(failure: &PackageFailure) {
    warn!(
        package = %failure.package,
        error = %failure.error,
        "package scoring failed"
    );
}

pub struct TextReportSink<W: Write> {
    output: W,
}

impl TextReportSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TextReportSink<W> {
    pub fn new(output: W) -> Self {
        Self { output }
    }
}

impl<W: Write> ReportSink for TextReportSink<W> {
    fn alert(&mut self, alert: &Alert) -> Result<()> {
        warn_alert(alert);
        Ok(())
    }

    fn section(&mut self, section: &PackageSection) -> Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "Typosquatting Detection: {}", section.package)?;

        if section.rows.is_empty() {
            writeln!(self.output, "  no candidate names to report")?;
            return Ok(());
        }

        let name_width = section
            .rows
            .iter()
            .map(|row| row.package.len())
            .max()
            .unwrap_or(0)
            .max("Package".len());

        writeln!(self.output, "  {:<name_width$}  {}", "Package", "Result")?;
        for row in &section.rows {
            writeln!(self.output, "  {:<name_width$}  {}", row.package, row.score)?;
        }

        Ok(())
    }

    fn failure(&mut self, failure: &PackageFailure) -> Result<()> {
        warn_failure(failure);
        Ok(())
    }

    fn finish(&mut self, report: &ScanRunReport) -> Result<()> {
        writeln!(self.output)?;
        writeln!(
            self.output,
            "Packages scored: {} of {} ({} failed), alerts: {}",
            report.counts.scored_package_count,
            report.counts.package_count,
            report.counts.failed_package_count,
            report.counts.alert_count
        )?;
        self.output.flush()?;
        Ok(())
    }
}

pub struct JsonReportSink<W: Write> {
    output: W,
}

impl JsonReportSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonReportSink<W> {
    pub fn new(output: W) -> Self {
        Self { output }
    }
}

impl<W: Write> ReportSink for JsonReportSink<W> {
    fn alert(&mut self, alert: &Alert) -> Result<()> {
        warn_alert(alert);
        Ok(())
    }

    fn section(&mut self, _section: &PackageSection) -> Result<()> {
        // sections are carried by the final report document
        Ok(())
    }

    fn failure(&mut self, failure: &PackageFailure) -> Result<()> {
        warn_failure(failure);
        Ok(())
    }

    fn finish(&mut self, report: &ScanRunReport) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.output, report)
            .context("failed to serialize scan report")?;
        writeln!(self.output)?;
        self.output.flush()?;
        Ok(())
    }
}
