// 📐 Report Layouts - declarative description of one ERP export format
// A layout says WHERE the fields are and WHAT cleanup each column gets;
// the parser engine in parser.rs does the rest.

use crate::classify::{self, AssignmentFields, Labels};
use crate::error::{ParseError, ParseResult};
use crate::extract::FieldSlice;
use crate::normalize::{normalize_number, parse_date, parse_number};
use crate::table::{Column, NormalizedTable, Value};

// ============================================================================
// LAYOUT DESCRIPTOR
// ============================================================================

/// How data lines are turned into field values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// Positional pipe slicing on every line
    Pipes(FieldSlice),
    /// Positional pipe slicing, only on lines with at least `min_pipes` pipes
    PipesWithMinCount { slice: FieldSlice, min_pipes: usize },
    /// Whitespace tokens with optional-column recovery (delivery monitor)
    DeliveryTokens,
}

/// Which file-level columns prefix every row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataStyle {
    /// file_name, creation_time, last_modified_time, year_month, year_month_day
    Standard,
    /// Standard + `warehouse_number` taken from the tail of a header line
    Warehouse { line: usize, chars: usize },
    /// file_name, creation_time, last_modified_time, year_month_day (day before modification)
    PreviousDay,
    /// file_name, creation_time, last_modified_time, routing_export_date, routing_reversion, plant
    Routing,
    /// Standard set + profit_center, dated from the report title
    CostReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Unparseable → missing
    Lenient,
    /// Unparseable → error for the whole file
    Strict,
}

/// Per-column cleanup, applied in declared order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule {
    /// Numeric normalizer, result stays text
    Normalize,
    /// Drop thousands separators only, result stays text
    StripCommas,
    ToNumber(Coercion),
    ToDate(&'static str, Coercion),
    Uppercase,
    /// Remove the last character then trim (free text that swallowed a pipe)
    DropLastChar,
    /// Left-pad with zeros to a fixed width
    ZeroPad(usize),
    /// Remove every occurrence of a character, then trim
    RemoveChar(char),
    /// Keep only the last space-separated token
    LastWord,
    /// Cells equal to the placeholder become missing
    PlaceholderToMissing(&'static str),
}

/// Row filters; `filters` run after deduplication, before the first row is
/// dropped, `late_filters` run on cleaned values between the two rule phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowFilter {
    /// Drop rows whose key equals one of the sentinel values
    KeyEquals {
        field: &'static str,
        sentinels: &'static [&'static str],
    },
    /// Drop rows whose key is shorter than `len` characters
    KeyMinLength { field: &'static str, len: usize },
    /// Drop rows whose cell is empty
    NonEmpty { field: &'static str },
}

/// Columns computed from other columns, appended after rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Derivation {
    /// `PR_type` from material / order / cost centre / WBS element
    ProcurementType { target: &'static str },
    LengthCategory {
        target: &'static str,
        source: &'static str,
        len: usize,
        labels: Labels,
    },
    PrefixCategory {
        target: &'static str,
        source: &'static str,
        prefix: &'static str,
        labels: Labels,
    },
    BothFlagged {
        target: &'static str,
        first: &'static str,
        second: &'static str,
        labels: Labels,
    },
    Concat {
        target: &'static str,
        sources: &'static [&'static str],
    },
    /// `target` takes the values of `source`, in place when it already exists
    CopyColumn {
        target: &'static str,
        source: &'static str,
    },
}

/// Wide-to-long reshape of forward-looking month columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyUnpivot {
    /// Line index holding the start month
    pub header_line: usize,
    /// Pipe piece on that line holding the start month
    pub header_piece: usize,
    /// The `MM/YYYY` stamp is this many trailing characters of the piece
    pub tail_chars: usize,
    /// Field names of the month columns, in order
    pub month_fields: &'static [&'static str],
    pub var_name: &'static str,
    pub value_name: &'static str,
}

/// ReportLayout - static description of one report type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportLayout {
    pub fields: &'static [&'static str],
    pub extraction: Extraction,
    /// Output order of the fields when it differs from piece order
    pub column_order: Option<&'static [&'static str]>,
    pub metadata: MetadataStyle,
    pub filters: &'static [RowFilter],
    pub drop_first_row: bool,
    pub unpivot: Option<MonthlyUnpivot>,
    pub rules: &'static [(&'static str, Rule)],
    pub late_filters: &'static [RowFilter],
    /// Rules that only see rows surviving `late_filters`
    pub late_rules: &'static [(&'static str, Rule)],
    pub derived: &'static [Derivation],
}

impl ReportLayout {
    /// Plain pipe layout: standard metadata, drop-first, nothing else
    pub const fn pipes(fields: &'static [&'static str], slice: FieldSlice) -> Self {
        ReportLayout {
            fields,
            extraction: Extraction::Pipes(slice),
            column_order: None,
            metadata: MetadataStyle::Standard,
            filters: &[],
            drop_first_row: true,
            unpivot: None,
            rules: &[],
            late_filters: &[],
            late_rules: &[],
            derived: &[],
        }
    }

    pub const fn metadata(mut self, metadata: MetadataStyle) -> Self {
        self.metadata = metadata;
        self
    }

    pub const fn extraction(mut self, extraction: Extraction) -> Self {
        self.extraction = extraction;
        self
    }

    pub const fn column_order(mut self, order: &'static [&'static str]) -> Self {
        self.column_order = Some(order);
        self
    }

    pub const fn filters(mut self, filters: &'static [RowFilter]) -> Self {
        self.filters = filters;
        self
    }

    pub const fn keep_first_row(mut self) -> Self {
        self.drop_first_row = false;
        self
    }

    pub const fn unpivot(mut self, unpivot: MonthlyUnpivot) -> Self {
        self.unpivot = Some(unpivot);
        self
    }

    pub const fn rules(mut self, rules: &'static [(&'static str, Rule)]) -> Self {
        self.rules = rules;
        self
    }

    /// Filter cleaned rows, then run `rules` on the survivors
    pub const fn then(mut self, filters: &'static [RowFilter], rules: &'static [(&'static str, Rule)]) -> Self {
        self.late_filters = filters;
        self.late_rules = rules;
        self
    }

    pub const fn derived(mut self, derived: &'static [Derivation]) -> Self {
        self.derived = derived;
        self
    }
}

// ============================================================================
// APPLYING FILTERS / RULES / DERIVATIONS
// ============================================================================

impl RowFilter {
    pub fn apply(&self, table: &mut NormalizedTable) -> ParseResult<()> {
        match *self {
            RowFilter::KeyEquals { field, sentinels } => {
                let keys = text_values(table, field)?;
                table.retain_rows(|i| !sentinels.contains(&keys[i].as_str()));
            }
            RowFilter::KeyMinLength { field, len } => {
                let keys = text_values(table, field)?;
                table.retain_rows(|i| keys[i].chars().count() >= len);
            }
            RowFilter::NonEmpty { field } => {
                let values = text_values(table, field)?;
                table.retain_rows(|i| !values[i].is_empty());
            }
        }
        Ok(())
    }
}

impl Rule {
    pub fn apply(&self, table: &mut NormalizedTable, column: &str) -> ParseResult<()> {
        let col = table
            .column_mut(column)
            .ok_or_else(|| ParseError::UnknownColumn(column.to_string()))?;

        for (row, cell) in col.values.iter_mut().enumerate() {
            let Value::Text(text) = cell else {
                continue;
            };
            *cell = self.convert(text, column, row)?;
        }
        Ok(())
    }

    fn convert(&self, text: &str, column: &str, row: usize) -> ParseResult<Value> {
        let value = match *self {
            Rule::Normalize => Value::text(normalize_number(text)),
            Rule::StripCommas => Value::text(text.replace(',', "")),
            Rule::ToNumber(coercion) => match parse_number(text) {
                Ok(Some(n)) => Value::Number(n),
                Ok(None) => Value::Missing,
                Err(_) if coercion == Coercion::Lenient => Value::Missing,
                Err(_) => {
                    return Err(ParseError::Numeric {
                        column: column.to_string(),
                        row,
                        value: text.to_string(),
                    })
                }
            },
            Rule::ToDate(format, coercion) => match parse_date(text, format) {
                Ok(Some(d)) => Value::Date(d),
                Ok(None) => Value::Missing,
                Err(_) if coercion == Coercion::Lenient => Value::Missing,
                Err(_) => {
                    return Err(ParseError::Date {
                        column: column.to_string(),
                        row,
                        value: text.to_string(),
                        format: format.to_string(),
                    })
                }
            },
            Rule::Uppercase => Value::text(text.to_uppercase()),
            Rule::DropLastChar => {
                let mut chars = text.chars();
                chars.next_back();
                Value::text(chars.as_str().trim())
            }
            Rule::ZeroPad(width) => {
                let len = text.chars().count();
                let pad = "0".repeat(width.saturating_sub(len));
                Value::text(format!("{}{}", pad, text))
            }
            Rule::RemoveChar(c) => Value::text(text.replace(c, "").trim()),
            Rule::LastWord => Value::text(text.split(' ').last().unwrap_or("").trim()),
            Rule::PlaceholderToMissing(token) if text == token => Value::Missing,
            Rule::PlaceholderToMissing(_) => Value::text(text),
        };
        Ok(value)
    }
}

impl Derivation {
    /// Column this derivation writes
    pub fn target(&self) -> &'static str {
        match *self {
            Derivation::ProcurementType { target }
            | Derivation::LengthCategory { target, .. }
            | Derivation::PrefixCategory { target, .. }
            | Derivation::BothFlagged { target, .. }
            | Derivation::Concat { target, .. }
            | Derivation::CopyColumn { target, .. } => target,
        }
    }

    pub fn apply(&self, table: &mut NormalizedTable) -> ParseResult<()> {
        let rows = table.row_count();
        let (target, values): (&str, Vec<Value>) = match *self {
            Derivation::ProcurementType { target } => {
                let material = text_values(table, "material_number")?;
                let order = text_values(table, "order")?;
                let cost_center = text_values(table, "cost_center")?;
                let wbs = text_values(table, "WBS_element")?;
                let values = (0..rows)
                    .map(|i| {
                        let fields = AssignmentFields {
                            material_number: &material[i],
                            order: &order[i],
                            cost_center: &cost_center[i],
                            wbs_element: &wbs[i],
                        };
                        classify::procurement_type(&fields)
                            .map(Value::Integer)
                            .unwrap_or(Value::Missing)
                    })
                    .collect();
                (target, values)
            }
            Derivation::LengthCategory {
                target,
                source,
                len,
                labels,
            } => {
                let src = text_values(table, source)?;
                let values = src
                    .iter()
                    .map(|s| Value::text(classify::by_length(s, len, labels)))
                    .collect();
                (target, values)
            }
            Derivation::PrefixCategory {
                target,
                source,
                prefix,
                labels,
            } => {
                let src = text_values(table, source)?;
                let values = src
                    .iter()
                    .map(|s| Value::text(classify::by_prefix(s, prefix, labels)))
                    .collect();
                (target, values)
            }
            Derivation::BothFlagged {
                target,
                first,
                second,
                labels,
            } => {
                let a = text_values(table, first)?;
                let b = text_values(table, second)?;
                let values = (0..rows)
                    .map(|i| Value::text(classify::both_flagged(&a[i], &b[i], labels)))
                    .collect();
                (target, values)
            }
            Derivation::Concat { target, sources } => {
                let parts = sources
                    .iter()
                    .map(|s| text_values(table, s))
                    .collect::<ParseResult<Vec<_>>>()?;
                let values = (0..rows)
                    .map(|i| Value::text(parts.iter().map(|p| p[i].as_str()).collect::<String>()))
                    .collect();
                (target, values)
            }
            Derivation::CopyColumn { target, source } => {
                let col = table
                    .column(source)
                    .ok_or_else(|| ParseError::UnknownColumn(source.to_string()))?;
                (target, col.values.clone())
            }
        };

        table.set_column(Column::new(target, values));
        Ok(())
    }
}

/// Cells of a column rendered as text (missing → empty)
fn text_values(table: &NormalizedTable, column: &str) -> ParseResult<Vec<String>> {
    let col = table
        .column(column)
        .ok_or_else(|| ParseError::UnknownColumn(column.to_string()))?;
    Ok(col.values.iter().map(|v| v.to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn table(name: &str, values: &[&str]) -> NormalizedTable {
        NormalizedTable::from_columns(vec![Column::new(
            name,
            values.iter().map(|v| Value::text(*v)).collect(),
        )])
    }

    #[test]
    fn test_normalize_then_number() {
        let mut t = table("qty", &["1,234-", "", "5"]);
        Rule::Normalize.apply(&mut t, "qty").unwrap();
        Rule::ToNumber(Coercion::Strict).apply(&mut t, "qty").unwrap();

        assert_eq!(t.get(0, "qty"), Some(&Value::Number(-1234.0)));
        assert_eq!(t.get(1, "qty"), Some(&Value::Missing));
        assert_eq!(t.get(2, "qty"), Some(&Value::Number(5.0)));
    }

    #[test]
    fn test_strict_number_fails_lenient_does_not() {
        let mut strict = table("qty", &["1", "abc"]);
        let err = Rule::ToNumber(Coercion::Strict).apply(&mut strict, "qty").unwrap_err();
        assert!(matches!(err, ParseError::Numeric { row: 1, .. }));

        let mut lenient = table("qty", &["1", "abc"]);
        Rule::ToNumber(Coercion::Lenient).apply(&mut lenient, "qty").unwrap();
        assert_eq!(lenient.get(1, "qty"), Some(&Value::Missing));
    }

    #[test]
    fn test_dates() {
        let mut t = table("d", &["2024.02.29", "bad", ""]);
        Rule::ToDate("%Y.%m.%d", Coercion::Lenient).apply(&mut t, "d").unwrap();
        assert_eq!(t.get(0, "d"), Some(&Value::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())));
        assert_eq!(t.get(1, "d"), Some(&Value::Missing));
        assert_eq!(t.get(2, "d"), Some(&Value::Missing));

        let mut strict = table("d", &["bad"]);
        assert!(Rule::ToDate("%Y.%m.%d", Coercion::Strict).apply(&mut strict, "d").is_err());
    }

    #[test]
    fn test_text_rules() {
        let mut t = table("c", &["short text |", "12", "mfg ltd"]);
        Rule::DropLastChar.apply(&mut t, "c").unwrap();
        assert_eq!(t.get(0, "c"), Some(&Value::text("short text")));

        let mut pad = table("item", &["10", "00010", ""]);
        Rule::ZeroPad(5).apply(&mut pad, "item").unwrap();
        assert_eq!(pad.get(0, "item"), Some(&Value::text("00010")));
        assert_eq!(pad.get(1, "item"), Some(&Value::text("00010")));
        assert_eq!(pad.get(2, "item"), Some(&Value::text("00000")));

        let mut star = table("cat", &["** Material **", "*"]);
        Rule::RemoveChar('*').apply(&mut star, "cat").unwrap();
        assert_eq!(star.get(0, "cat"), Some(&Value::text("Material")));
        RowFilter::NonEmpty { field: "cat" }.apply(&mut star).unwrap();
        assert_eq!(star.row_count(), 1);

        let mut word = table("client", &["Client 100", "200"]);
        Rule::LastWord.apply(&mut word, "client").unwrap();
        assert_eq!(word.get(0, "client"), Some(&Value::text("100")));
        assert_eq!(word.get(1, "client"), Some(&Value::text("200")));
    }

    #[test]
    fn test_rule_on_unknown_column() {
        let mut t = table("a", &["1"]);
        assert!(matches!(
            Rule::Uppercase.apply(&mut t, "b"),
            Err(ParseError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_filters() {
        let mut t = table("key", &["*", "", "123456789", "1234"]);
        RowFilter::KeyEquals { field: "key", sentinels: &["*", ""] }.apply(&mut t).unwrap();
        assert_eq!(t.row_count(), 2);
        RowFilter::KeyMinLength { field: "key", len: 9 }.apply(&mut t).unwrap();
        assert_eq!(t.row_count(), 1);
    }

    #[test]
    fn test_concat_derivation() {
        let mut t = NormalizedTable::from_columns(vec![
            Column::new("a", vec![Value::text("81"), Value::text("82")]),
            Column::new("b", vec![Value::text("01"), Value::Missing]),
        ]);
        Derivation::Concat { target: "ab", sources: &["a", "b"] }.apply(&mut t).unwrap();
        assert_eq!(t.get(0, "ab"), Some(&Value::text("8101")));
        assert_eq!(t.get(1, "ab"), Some(&Value::text("82")));
    }

    #[test]
    fn test_copy_derivation_overwrites_in_place() {
        let mut t = NormalizedTable::from_columns(vec![
            Column::new("qty", vec![Value::Number(3.0), Value::Missing]),
            Column::new("value", vec![Value::Number(99.0), Value::Number(7.0)]),
            Column::new("unit", vec![Value::text("PC"), Value::text("KG")]),
        ]);
        Derivation::CopyColumn { target: "value", source: "qty" }.apply(&mut t).unwrap();

        assert_eq!(t.column_names(), ["qty", "value", "unit"]);
        assert_eq!(t.get(0, "value"), Some(&Value::Number(3.0)));
        assert_eq!(t.get(1, "value"), Some(&Value::Missing));

        Derivation::CopyColumn { target: "unit_copy", source: "unit" }.apply(&mut t).unwrap();
        assert_eq!(t.column_names().last(), Some(&"unit_copy"));
    }
}
