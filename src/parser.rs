// 🏗️ Parser Framework - one parser per report family
// Layout-driven engine shared by every ERP export, plus the gated cost report

use crate::config::Config;
use crate::error::{ParseError, ParseResult};
use crate::extract::{delivery_tokens, ColumnAccumulator, SkippedLine};
use crate::layout::{Extraction, MonthlyUnpivot, ReportLayout};
use crate::layouts::ReportType;
use crate::metadata::FileMetadata;
use crate::normalize::{next_n_months, parse_month_year};
use crate::source::SourceFile;
use crate::table::{Column, NormalizedTable, Value};
use anyhow::{bail, Result};
use chrono::{Duration, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// CORE TYPES
// ============================================================================

/// What should happen to the source file after parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Disposition {
    Accepted,
    Rejected(String),
}

impl Disposition {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Disposition::Accepted)
    }
}

/// ParsedReport - Output of parser.parse()
#[derive(Debug, Clone)]
pub struct ParsedReport {
    pub report: ReportType,
    pub table: NormalizedTable,
    /// Lines that did not yield a row
    pub skipped: Vec<SkippedLine>,
    /// Rows removed as exact duplicates
    pub duplicates: usize,
    pub disposition: Disposition,
}

impl ParsedReport {
    fn rejected(report: ReportType, reason: impl Into<String>) -> Self {
        ParsedReport {
            report,
            table: NormalizedTable::new(),
            skipped: Vec::new(),
            duplicates: 0,
            disposition: Disposition::Rejected(reason.into()),
        }
    }
}

// ============================================================================
// PARSER TRAIT
// ============================================================================

/// ReportParser - turns one decoded source file into a Normalized Table
///
/// Line-level problems end up in `ParsedReport::skipped`; only file-level
/// problems (strict coercion, missing header) are errors.
pub trait ReportParser: Send + Sync {
    fn parse(&self, source: &SourceFile, config: &Config) -> ParseResult<ParsedReport>;

    /// Report type this parser handles
    fn report_type(&self) -> ReportType;

    /// Parser version (for provenance tracking)
    fn version(&self) -> &str {
        "1.0.0"
    }
}

// ============================================================================
// FACTORY FUNCTIONS
// ============================================================================

/// Detect report type from the file name
///
/// # Strategy:
/// 1. Numeric job prefix (`03_...` → MB51)
/// 2. Any full report code appearing in the name, longest first
///
/// # Examples:
/// ```text
/// detect_report("03_MB51_20240301.txt") → ReportType::Mb51
/// detect_report("export_15_MB51_SPECIFIED_MVT.txt") → ReportType::Mb51SpecifiedMvt
/// ```
pub fn detect_report(file_path: &Path) -> Result<ReportType> {
    let name = file_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_uppercase();

    if let Some((prefix, _)) = name.split_once('_') {
        if prefix.len() == 2 && prefix.chars().all(|c| c.is_ascii_digit()) {
            if let Some(report) = ReportType::from_code(prefix) {
                return Ok(report);
            }
        }
    }

    let mut candidates: Vec<ReportType> = ReportType::ALL.to_vec();
    candidates.sort_by_key(|r| std::cmp::Reverse(r.code().len()));
    if let Some(report) = candidates.into_iter().find(|r| name.contains(r.code())) {
        return Ok(report);
    }

    bail!("Unknown report type: {:?}", file_path)
}

/// Get parser instance for a report type
pub fn get_parser(report: ReportType) -> Box<dyn ReportParser> {
    match report {
        ReportType::CostReport => Box::new(CostReportParser::new()),
        other => Box::new(LayoutParser::new(other)),
    }
}

// ============================================================================
// LAYOUT PARSER
// ============================================================================

/// Generic parser: everything is described by the report's layout
pub struct LayoutParser {
    report: ReportType,
}

impl LayoutParser {
    pub fn new(report: ReportType) -> Self {
        LayoutParser { report }
    }
}

impl ReportParser for LayoutParser {
    fn parse(&self, source: &SourceFile, config: &Config) -> ParseResult<ParsedReport> {
        let layout = self.report.layout();
        let metadata = FileMetadata::for_style(layout.metadata, source, &config.routing_plant);
        run_layout(self.report, layout, source, &metadata)
    }

    fn report_type(&self) -> ReportType {
        self.report
    }
}

/// The generic algorithm: extract → prefix metadata → dedup → filter →
/// drop first row → reshape → column rules → late filters → late rules →
/// derived columns
pub fn run_layout(
    report: ReportType,
    layout: &ReportLayout,
    source: &SourceFile,
    metadata: &FileMetadata,
) -> ParseResult<ParsedReport> {
    // header problems are file-level, check before touching rows
    let labels = match &layout.unpivot {
        Some(unpivot) => Some(month_labels(source, unpivot)?),
        None => None,
    };

    let mut acc = ColumnAccumulator::new(layout.fields);
    collect_rows(layout, source, &mut acc);

    let rows = acc.row_count();
    let (fields, skipped) = acc.finish();

    let mut columns = metadata.broadcast(rows);
    columns.extend(
        in_output_order(fields, layout.column_order)
            .into_iter()
            .map(|(name, values)| Column::new(name, values.into_iter().map(Value::Text).collect())),
    );
    let mut table = NormalizedTable::from_columns(columns);

    let duplicates = table.dedup_rows();

    for filter in layout.filters {
        filter.apply(&mut table)?;
    }

    if layout.drop_first_row {
        table.drop_first_row();
    }

    if let (Some(unpivot), Some(labels)) = (&layout.unpivot, labels) {
        table = unpivot_months(&table, unpivot, &labels)?;
    }

    for (column, rule) in layout.rules {
        rule.apply(&mut table, column)?;
    }

    for filter in layout.late_filters {
        filter.apply(&mut table)?;
    }

    for (column, rule) in layout.late_rules {
        rule.apply(&mut table, column)?;
    }

    for derivation in layout.derived {
        derivation.apply(&mut table)?;
    }

    tracing::debug!(
        report = %report,
        rows = table.row_count(),
        skipped = skipped.len(),
        duplicates,
        "layout applied"
    );

    Ok(ParsedReport {
        report,
        table,
        skipped,
        duplicates,
        disposition: Disposition::Accepted,
    })
}

fn collect_rows(layout: &ReportLayout, source: &SourceFile, acc: &mut ColumnAccumulator) {
    for (index, line) in source.lines.iter().enumerate() {
        match layout.extraction {
            Extraction::Pipes(slice) => {
                acc.push_line(index, line, &slice);
            }
            Extraction::PipesWithMinCount { slice, min_pipes } => {
                if line.matches('|').count() >= min_pipes {
                    acc.push_line(index, line, &slice);
                }
            }
            Extraction::DeliveryTokens => match delivery_tokens(line) {
                Ok(Some(values)) => acc.push_row(values),
                Ok(None) => {}
                Err(reason) => acc.skip(index, line, reason),
            },
        }
    }
}

/// Reorder extracted (name, values) pairs when the layout asks for it
fn in_output_order(
    mut fields: Vec<(String, Vec<String>)>,
    order: Option<&[&str]>,
) -> Vec<(String, Vec<String>)> {
    if let Some(order) = order {
        fields.sort_by_key(|(name, _)| order.iter().position(|o| *o == name.as_str()).unwrap_or(usize::MAX));
    }
    fields
}

// ============================================================================
// MONTHLY DEMAND RESHAPE
// ============================================================================

/// Month labels starting at the `MM/YYYY` stamp in the header
pub fn month_labels(source: &SourceFile, unpivot: &MonthlyUnpivot) -> ParseResult<Vec<String>> {
    let header_error = |message: &str| ParseError::Header {
        line: unpivot.header_line,
        message: message.to_string(),
    };

    let line = source
        .line(unpivot.header_line)
        .ok_or_else(|| header_error("header line missing"))?;
    let piece = line
        .split('|')
        .nth(unpivot.header_piece)
        .ok_or_else(|| header_error("start month column missing"))?;

    let count = piece.chars().count();
    let stamp: String = piece
        .chars()
        .skip(count.saturating_sub(unpivot.tail_chars))
        .collect();
    let start = parse_month_year(&stamp)
        .ok_or_else(|| header_error(&format!("invalid start month {:?}", stamp.trim())))?;

    Ok(next_n_months(start, unpivot.month_fields.len()))
}

fn unpivot_months(
    table: &NormalizedTable,
    unpivot: &MonthlyUnpivot,
    labels: &[String],
) -> ParseResult<NormalizedTable> {
    let mut renamed = table.clone();
    for (field, label) in unpivot.month_fields.iter().zip(labels) {
        let column = renamed
            .column_mut(field)
            .ok_or_else(|| ParseError::UnknownColumn(field.to_string()))?;
        column.name = label.clone();
    }
    Ok(renamed.melt(labels, unpivot.var_name, unpivot.value_name))
}

// ============================================================================
// COST REPORT PARSER
// ============================================================================

const PROFIT_CENTER_PATTERN: &str = r":\s*([A-Za-z0-9-]+)";
const TITLE_LINE: usize = 1;
const PROFIT_CENTER_LINE: usize = 4;
const SEGMENT_PROFIT_CENTER_LINE: usize = 6;

/// Header facts of an accepted cost report
#[derive(Debug, Clone, PartialEq)]
pub struct CostReportHeader {
    /// Day the report covers (title date minus one day)
    pub report_day: NaiveDate,
    pub profit_center: Option<String>,
}

/// Plant cost report: only accepted when title and profit centres check out
pub struct CostReportParser;

impl CostReportParser {
    pub fn new() -> Self {
        CostReportParser
    }

    /// Check the gating conditions; `Err` carries the rejection reason
    pub fn read_header(&self, source: &SourceFile, config: &Config) -> Result<CostReportHeader, String> {
        let line_or_reason = |index: usize| {
            source
                .line(index)
                .ok_or_else(|| format!("file too short: line {} missing", index))
        };

        let title = line_or_reason(TITLE_LINE)?;
        let profit_line = line_or_reason(PROFIT_CENTER_LINE)?;
        let segment_line = line_or_reason(SEGMENT_PROFIT_CENTER_LINE)?;

        if !title.contains(&config.cost_report.title) {
            return Err(format!("title {:?} not found", config.cost_report.title));
        }

        let pattern = Regex::new(PROFIT_CENTER_PATTERN).map_err(|e| e.to_string())?;
        let capture = |line: &str, index: usize| {
            pattern
                .captures(line)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
                .ok_or_else(|| format!("no profit centre code on line {}", index))
        };
        let profit_code = capture(profit_line, PROFIT_CENTER_LINE)?;
        let segment_code = capture(segment_line, SEGMENT_PROFIT_CENTER_LINE)?;
        if profit_code != segment_code {
            return Err(format!(
                "profit centre {} does not match segment profit centre {}",
                profit_code, segment_code
            ));
        }

        let title_date = title
            .split(' ')
            .filter_map(|token| NaiveDate::parse_from_str(token.trim(), "%d.%m.%Y").ok())
            .last()
            .ok_or_else(|| "no report date on title line".to_string())?;

        let profit_center = profit_line
            .split(' ')
            .filter(|token| config.cost_report.profit_centers.iter().any(|pc| pc == token))
            .last()
            .map(str::to_string);

        Ok(CostReportHeader {
            report_day: title_date - Duration::days(1),
            profit_center,
        })
    }
}

impl Default for CostReportParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportParser for CostReportParser {
    fn parse(&self, source: &SourceFile, config: &Config) -> ParseResult<ParsedReport> {
        let header = match self.read_header(source, config) {
            Ok(header) => header,
            Err(reason) => return Ok(ParsedReport::rejected(ReportType::CostReport, reason)),
        };

        let metadata = FileMetadata::cost_report(source, header.report_day, header.profit_center.as_deref());
        run_layout(ReportType::CostReport, ReportType::CostReport.layout(), source, &metadata)
    }

    fn report_type(&self) -> ReportType {
        ReportType::CostReport
    }
}
