// 🗂️ File Metadata - per-file columns broadcast onto every row

use crate::layout::MetadataStyle;
use crate::source::SourceFile;
use crate::table::{Column, Value};
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// FileMetadata - ordered (name, value) pairs stamped onto every row
#[derive(Debug, Clone, PartialEq)]
pub struct FileMetadata {
    fields: Vec<(String, Value)>,
}

impl FileMetadata {
    /// Metadata for every style except `CostReport`, which needs the title date
    pub fn for_style(style: MetadataStyle, source: &SourceFile, routing_plant: &str) -> Self {
        let modified = source.last_modified_time;
        match style {
            MetadataStyle::Standard | MetadataStyle::CostReport => {
                Self::stamped(source, modified.date())
            }
            MetadataStyle::Warehouse { line, chars } => {
                let warehouse = source.line(line).map(|l| tail(l.trim(), chars)).unwrap_or_default();
                Self::stamped(source, modified.date()).with("warehouse_number", Value::text(warehouse))
            }
            MetadataStyle::PreviousDay => Self::base(source)
                .with("year_month_day", Value::Date(previous_day(modified))),
            MetadataStyle::Routing => Self::base(source)
                .with(
                    "routing_export_date",
                    Value::text(modified.format("%Y%m%d").to_string()),
                )
                .with("routing_reversion", Value::Date(modified.date()))
                .with("plant", Value::text(routing_plant)),
        }
    }

    /// Cost report metadata: reporting day and profit centre come from the header
    pub fn cost_report(source: &SourceFile, report_day: NaiveDate, profit_center: Option<&str>) -> Self {
        let profit_center = profit_center.map(Value::text).unwrap_or(Value::Missing);
        Self::stamped(source, report_day).with("profit_center", profit_center)
    }

    fn base(source: &SourceFile) -> Self {
        FileMetadata { fields: Vec::new() }
            .with("file_name", Value::text(&source.file_name))
            .with("creation_time", Value::DateTime(source.creation_time))
            .with("last_modified_time", Value::DateTime(source.last_modified_time))
    }

    /// Base columns + `year_month` / `year_month_day` text for `day`
    fn stamped(source: &SourceFile, day: NaiveDate) -> Self {
        Self::base(source)
            .with("year_month", Value::text(day.format("%Y%m").to_string()))
            .with("year_month_day", Value::text(day.format("%Y-%m-%d").to_string()))
    }

    fn with(mut self, name: &str, value: Value) -> Self {
        self.fields.push((name.to_string(), value));
        self
    }

    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// One column per field, each repeated `rows` times
    pub fn broadcast(&self, rows: usize) -> Vec<Column> {
        self.fields
            .iter()
            .map(|(name, value)| Column::new(name.clone(), vec![value.clone(); rows]))
            .collect()
    }
}

fn tail(text: &str, chars: usize) -> String {
    let count = text.chars().count();
    text.chars().skip(count.saturating_sub(chars)).collect()
}

/// Date part of a timestamp, shifted back one day
pub fn previous_day(time: NaiveDateTime) -> NaiveDate {
    time.date() - Duration::days(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap()
    }

    fn source(text: &str) -> SourceFile {
        SourceFile::from_text("03_MB51_20240301", text, at(2024, 2, 29), at(2024, 3, 1))
    }

    #[test]
    fn test_standard_columns() {
        let meta = FileMetadata::for_style(MetadataStyle::Standard, &source(""), "8101");
        assert_eq!(
            meta.names(),
            vec!["file_name", "creation_time", "last_modified_time", "year_month", "year_month_day"]
        );
        assert_eq!(meta.get("year_month"), Some(&Value::text("202403")));
        assert_eq!(meta.get("year_month_day"), Some(&Value::text("2024-03-01")));
    }

    #[test]
    fn test_warehouse_number_from_header() {
        let src = source("title\n\nWarehouse number   812\n|a|");
        let meta = FileMetadata::for_style(MetadataStyle::Warehouse { line: 2, chars: 3 }, &src, "8101");
        assert_eq!(meta.get("warehouse_number"), Some(&Value::text("812")));

        let short = FileMetadata::for_style(MetadataStyle::Warehouse { line: 2, chars: 3 }, &source("x"), "8101");
        assert_eq!(short.get("warehouse_number"), Some(&Value::text("")));
    }

    #[test]
    fn test_previous_day_crosses_month() {
        let meta = FileMetadata::for_style(MetadataStyle::PreviousDay, &source(""), "8101");
        assert_eq!(meta.get("year_month"), None);
        assert_eq!(
            meta.get("year_month_day"),
            Some(&Value::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()))
        );
    }

    #[test]
    fn test_routing_columns() {
        let meta = FileMetadata::for_style(MetadataStyle::Routing, &source(""), "8101");
        assert_eq!(meta.get("routing_export_date"), Some(&Value::text("20240301")));
        assert_eq!(meta.get("plant"), Some(&Value::text("8101")));
    }

    #[test]
    fn test_broadcast_repeats_values() {
        let meta = FileMetadata::for_style(MetadataStyle::Standard, &source(""), "8101");
        let columns = meta.broadcast(3);
        assert_eq!(columns.len(), 5);
        assert!(columns.iter().all(|c| c.values.len() == 3));
    }
}
