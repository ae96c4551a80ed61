//! JSON export of the analysis history.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisRecord;
use crate::error::{AnalyzerError, Result};

#[derive(Serialize)]
struct ReportDocument<'a> {
    analysis_time: DateTime<Utc>,
    total_analyses: usize,
    history: &'a [AnalysisRecord],
}

/// An exported report read back from disk.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExportedReport {
    pub analysis_time: DateTime<Utc>,
    pub total_analyses: usize,
    pub history: Vec<AnalysisRecord>,
}

/// Writes `records` to `path` as pretty-printed JSON, replacing any
/// existing file. Write failures are returned as [`AnalyzerError::Io`].
pub fn export_history(records: &[AnalysisRecord], path: &Path) -> Result<()> {
    let document = ReportDocument {
        analysis_time: Utc::now(),
        total_analyses: records.len(),
        history: records,
    };
    let json = serde_json::to_vec_pretty(&document)?;
    std::fs::write(path, json).map_err(|source| AnalyzerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!(
        "exported {} analysis record(s) to {}",
        records.len(),
        path.display()
    );
    Ok(())
}

pub fn load_report(path: &Path) -> Result<ExportedReport> {
    let raw = std::fs::read(path).map_err(|source| AnalyzerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_slice(&raw)?)
}
