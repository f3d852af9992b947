// 📥 Ingest - parse one report file, optionally load it, then route it

use crate::config::Config;
use crate::db::{self, InsertSummary};
use crate::layouts::ReportType;
use crate::parser::{detect_report, get_parser, Disposition, ParsedReport};
use crate::routing::FileRouter;
use crate::source::SourceFile;
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Result of ingesting one file
#[derive(Debug)]
pub struct IngestOutcome {
    pub parsed: ParsedReport,
    /// Rows loaded, when a database was given
    pub loaded: Option<InsertSummary>,
    /// New location, for report types whose files are moved after parsing
    pub routed_to: Option<PathBuf>,
}

/// Report types whose files leave the inbox after parsing
pub fn routes_files(report: ReportType) -> bool {
    matches!(report, ReportType::CostReport)
}

/// Read, decode and parse one file; `report` overrides name-based detection
pub fn parse_file(path: &Path, report: Option<ReportType>, config: &Config) -> Result<ParsedReport> {
    let report = match report {
        Some(r) => r,
        None => detect_report(path)?,
    };

    let source = SourceFile::open(path)?;
    let parser = get_parser(report);
    let parsed = parser
        .parse(&source, config)
        .with_context(|| format!("Failed to parse {:?} as {}", path, report))?;

    match &parsed.disposition {
        Disposition::Accepted => tracing::info!(
            file = %source.file_name,
            report = %report,
            parser_version = parser.version(),
            rows = parsed.table.row_count(),
            skipped = parsed.skipped.len(),
            duplicates = parsed.duplicates,
            "parsed"
        ),
        Disposition::Rejected(reason) => tracing::warn!(
            file = %source.file_name,
            report = %report,
            reason = %reason,
            "rejected"
        ),
    }

    Ok(parsed)
}

/// Parse, load into `conn` when given, then route the file if its type asks for it
pub fn ingest_file(
    path: &Path,
    report: Option<ReportType>,
    config: &Config,
    conn: Option<&Connection>,
) -> Result<IngestOutcome> {
    let parsed = parse_file(path, report, config)?;

    let loaded = match conn {
        Some(conn) => {
            let source_file = path.display().to_string();
            Some(db::import_report(conn, &source_file, &parsed)?)
        }
        None => None,
    };

    let routed_to = if routes_files(parsed.report) {
        let router = FileRouter::from_config(config);
        Some(router.route(path, &parsed.disposition)?)
    } else {
        None
    };

    Ok(IngestOutcome {
        parsed,
        loaded,
        routed_to,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_routes_only_cost_reports() {
        assert!(routes_files(ReportType::CostReport));
        assert!(!routes_files(ReportType::Mb51));
    }

    #[test]
    fn test_parse_file_with_explicit_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("whatever.txt");
        fs::write(
            &path,
            "|Plnt|Seg|WorkCtr|Desc|TCC|Lvl|Lower|Cat|Capa|Del|Lock|Ctrl|Sub|\n\
             |8101|S20|SCT00001|Line 1|T1|1|2|0001|1|||PP01||\n",
        )
        .unwrap();

        assert!(parse_file(&path, None, &Config::default()).is_err());

        let parsed = parse_file(&path, Some(ReportType::WorkCenter), &Config::default()).unwrap();
        assert_eq!(parsed.table.row_count(), 1);
        assert_eq!(parsed.report, ReportType::WorkCenter);
    }
}
