//! Validate an NDJSON content export against the document rules

use anyhow::{bail, Result};
use serde_json::Value;
use std::path::Path;

use crate::client::MemorySource;
use crate::schema::{has_errors, validate_document, Issue};

/// Findings for one document
#[derive(Debug)]
pub struct Report {
    pub id: String,
    pub doc_type: String,
    pub issues: Vec<Issue>,
}

/// Check every document with a known type
///
/// Documents of unknown types (assets, system documents) are skipped.
/// Only documents with at least one issue are reported.
pub fn check_all(docs: &[Value]) -> Vec<Report> {
    docs.iter()
        .filter_map(|doc| {
            let issues = validate_document(doc)?;
            if issues.is_empty() {
                return None;
            }
            let field = |key: &str| {
                doc.get(key)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            };
            Some(Report {
                id: field("_id"),
                doc_type: field("_type"),
                issues,
            })
        })
        .collect()
}

pub fn run(export: &Path) -> Result<()> {
    let source = MemorySource::from_ndjson(export)?;
    let reports = check_all(source.documents());

    let mut failed = 0;
    for report in &reports {
        println!("{} ({}):", report.id, report.doc_type);
        for issue in &report.issues {
            println!("  {}", issue);
        }
        if has_errors(&report.issues) {
            failed += 1;
        }
    }

    println!(
        "Checked {} documents, {} with issues, {} failing",
        source.documents().len(),
        reports.len(),
        failed
    );
    if failed > 0 {
        bail!("{} documents failed validation", failed);
    }
    Ok(())
}
