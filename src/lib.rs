// VP Ingest - Core Library
// Report layouts, parsers and the SQLite loader, shared by the CLI and tests

pub mod classify;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod ingest;
pub mod layout;
pub mod layouts;
pub mod metadata;
pub mod normalize;
pub mod parser;
pub mod routing;
pub mod source;
pub mod table;

// Re-export commonly used types
pub use config::{Config, CostReportConfig};
pub use db::{
    ImportEvent, InsertSummary,
    setup_database, ensure_report_table, insert_table, insert_event,
    import_report, get_import_events, verify_count, table_name,
};
pub use error::{ParseError, ParseResult};
pub use extract::{ColumnAccumulator, FieldSlice, SkippedLine, SliceEnd};
pub use ingest::{IngestOutcome, ingest_file, parse_file};
pub use layout::{Coercion, Derivation, Extraction, MetadataStyle, ReportLayout, RowFilter, Rule};
pub use layouts::ReportType;
pub use metadata::FileMetadata;
pub use parser::{
    CostReportParser, Disposition, LayoutParser, ParsedReport, ReportParser,
    detect_report, get_parser,
};
pub use routing::FileRouter;
pub use source::SourceFile;
pub use table::{Column, NormalizedTable, Value};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
