// Report rendering for finished audits

use citeloop_scanner::{Report, TargetSpecification};
use colored::Colorize;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("Unknown report format: {}", other)),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Text => f.write_str("text"),
            ReportFormat::Json => f.write_str("json"),
        }
    }
}

pub fn generate_report(
    report: &Report,
    target: &TargetSpecification,
    format: ReportFormat,
) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(report, target)),
        ReportFormat::Json => generate_json_report(report, target),
    }
}

/// Plain-text summary: the five tallies first, then per-source counts.
pub fn generate_text_report(report: &Report, target: &TargetSpecification) -> String {
    let mut out = String::new();
    out.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    out.push_str(&format!(
        "{} {} (MAX_GEN {})\n\n",
        "Audit of".bold(),
        target.origin(),
        target.max_generation()
    ));

    out.push_str(&format!("Number of loops: {}\n", report.loops));
    out.push_str(&format!("Number of branches: {}\n", report.branches));
    out.push_str(&format!(
        "Number of independent sources: {}\n",
        report.distinct_sources
    ));
    out.push_str(&format!("Number of faulty links: {}\n", report.faulty_refs));
    out.push_str(&format!(
        "Number of miscellaneous links: {}\n",
        report.misc_refs
    ));
    out.push_str(&format!("Pages opened: {}\n", report.pages_expanded));

    if !report.sources.is_empty() {
        out.push_str("\n## Sources\n");
        let mut sources: Vec<(&String, &usize)> = report.sources.iter().collect();
        sources.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (source, count) in sources {
            out.push_str(&format!("  {:>4}  {}\n", count, source));
        }
    }

    out.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    out
}

pub fn generate_json_report(
    report: &Report,
    target: &TargetSpecification,
) -> Result<String, serde_json::Error> {
    let value = serde_json::json!({
        "audit": {
            "target": target.origin().as_str(),
            "max_generation": target.max_generation(),
            "generated_at": chrono::Utc::now().to_rfc3339(),
        },
        "report": report,
    });
    serde_json::to_string_pretty(&value)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
