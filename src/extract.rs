// ✂️ Record Extractor - pipe-delimited line → positional fields
// Best-effort: short lines are reported and skipped, never half-appended

use serde::{Deserialize, Serialize};

// ============================================================================
// FIELD SLICES
// ============================================================================

/// Where a slice ends, Python-style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SliceEnd {
    /// Absolute piece index (exclusive)
    At(usize),
    /// Counted back from the last piece (`FromEnd(1)` drops the last piece)
    FromEnd(usize),
}

/// FieldSlice - which pipe-separated pieces of a line hold the fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSlice {
    pub start: usize,
    pub end: SliceEnd,
    /// Split at most this many times; the last piece keeps the remainder
    pub max_split: Option<usize>,
}

impl FieldSlice {
    pub const fn range(start: usize, end: usize) -> Self {
        FieldSlice {
            start,
            end: SliceEnd::At(end),
            max_split: None,
        }
    }

    pub const fn until_last(start: usize) -> Self {
        FieldSlice {
            start,
            end: SliceEnd::FromEnd(1),
            max_split: None,
        }
    }

    pub const fn with_max_split(mut self, max_split: usize) -> Self {
        self.max_split = Some(max_split);
        self
    }

    /// Split `line` and return the trimmed pieces inside the slice
    pub fn pieces<'a>(&self, line: &'a str) -> Vec<&'a str> {
        let pieces: Vec<&str> = match self.max_split {
            Some(n) => line.splitn(n + 1, '|').collect(),
            None => line.split('|').collect(),
        };
        let end = match self.end {
            SliceEnd::At(end) => end.min(pieces.len()),
            SliceEnd::FromEnd(back) => pieces.len().saturating_sub(back),
        };
        if self.start >= end {
            return Vec::new();
        }
        pieces[self.start..end].iter().map(|p| p.trim()).collect()
    }
}

// ============================================================================
// DIAGNOSTICS
// ============================================================================

/// SkippedLine - a source line that did not yield a row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedLine {
    /// 0-based line index in the source file
    pub line_index: usize,
    pub content: String,
    pub reason: String,
}

impl std::fmt::Display for SkippedLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} : {} ({})", self.line_index, self.content, self.reason)
    }
}

// ============================================================================
// EXTRACTION
// ============================================================================

/// Slice one line into exactly `field_count` values
pub fn extract_fields(line: &str, slice: &FieldSlice, field_count: usize) -> Result<Vec<String>, String> {
    let pieces = slice.pieces(line);
    if pieces.len() < field_count {
        return Err(format!(
            "expected {} fields, found {}",
            field_count,
            pieces.len()
        ));
    }
    Ok(pieces[..field_count].iter().map(|p| p.to_string()).collect())
}

/// ColumnAccumulator - per-field value sequences built while scanning a file
#[derive(Debug, Clone)]
pub struct ColumnAccumulator {
    names: Vec<String>,
    columns: Vec<Vec<String>>,
    skipped: Vec<SkippedLine>,
}

impl ColumnAccumulator {
    pub fn new<S: AsRef<str>>(names: &[S]) -> Self {
        ColumnAccumulator {
            names: names.iter().map(|n| n.as_ref().to_string()).collect(),
            columns: vec![Vec::new(); names.len()],
            skipped: Vec::new(),
        }
    }

    pub fn field_count(&self) -> usize {
        self.names.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    /// Append one complete row; `values` must have `field_count()` entries
    pub fn push_row(&mut self, values: Vec<String>) {
        debug_assert_eq!(values.len(), self.names.len());
        for (column, value) in self.columns.iter_mut().zip(values) {
            column.push(value);
        }
    }

    /// Try one line; on failure record a diagnostic and leave columns untouched
    pub fn push_line(&mut self, line_index: usize, line: &str, slice: &FieldSlice) -> bool {
        match extract_fields(line, slice, self.names.len()) {
            Ok(values) => {
                self.push_row(values);
                true
            }
            Err(reason) => {
                self.skip(line_index, line, reason);
                false
            }
        }
    }

    pub fn skip(&mut self, line_index: usize, line: &str, reason: impl Into<String>) {
        let skipped = SkippedLine {
            line_index,
            content: line.to_string(),
            reason: reason.into(),
        };
        tracing::debug!(line = skipped.line_index, reason = %skipped.reason, "skipped line");
        self.skipped.push(skipped);
    }

    /// Consume into (name, values) pairs plus the skipped-line diagnostics
    pub fn finish(self) -> (Vec<(String, Vec<String>)>, Vec<SkippedLine>) {
        (self.names.into_iter().zip(self.columns).collect(), self.skipped)
    }
}

// ============================================================================
// DELIVERY MONITOR TOKENS
// ============================================================================

/// Placeholder for optional columns the delivery monitor leaves blank
pub const DELIVERY_PLACEHOLDER: &str = "aa";

const DELIVERY_FIXED_FIELDS: usize = 7;

fn digit_leading(token: &str) -> bool {
    token.chars().next().map_or(false, |c| c.is_ascii_digit())
}

/// Tokenize one delivery monitor line
///
/// `Ok(None)` for lines that are not delivery rows at all, `Err` for delivery
/// rows that are too short. The result always has 8 values: 7 fixed tokens
/// and the free-text ship-to party name.
pub fn delivery_tokens(line: &str) -> Result<Option<Vec<String>>, String> {
    let mut chars = line.chars();
    chars.next();
    let mut tokens: Vec<&str> = chars
        .as_str()
        .split(' ')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .skip(1)
        .collect();

    match tokens.first() {
        Some(first) if digit_leading(first) => {}
        _ => return Ok(None),
    }

    if tokens.len() > 1 && !digit_leading(tokens[1]) {
        tokens.insert(1, DELIVERY_PLACEHOLDER);
    }
    if tokens.len() < DELIVERY_FIXED_FIELDS {
        return Err(format!(
            "expected at least {} tokens, found {}",
            DELIVERY_FIXED_FIELDS,
            tokens.len()
        ));
    }
    if !digit_leading(tokens[6]) {
        tokens.insert(6, DELIVERY_PLACEHOLDER);
    }

    let name = tokens[DELIVERY_FIXED_FIELDS..].join(" ");
    let name = match name.strip_suffix('|') {
        Some(stripped) => stripped.trim().to_string(),
        None => name,
    };

    let mut values: Vec<String> = tokens[..DELIVERY_FIXED_FIELDS]
        .iter()
        .map(|t| t.to_string())
        .collect();
    values.push(name);
    Ok(Some(values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pieces_range() {
        let slice = FieldSlice::range(1, 4);
        assert_eq!(slice.pieces("| a | b |c  | d |"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_pieces_until_last() {
        let slice = FieldSlice::until_last(1);
        assert_eq!(slice.pieces("|x|y|z|"), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_pieces_max_split_keeps_remainder() {
        let slice = FieldSlice::range(1, 3).with_max_split(2);
        assert_eq!(slice.pieces("|a|free text | with pipe |"), vec!["a", "free text | with pipe |"]);
    }

    #[test]
    fn test_extract_short_line_fails() {
        let slice = FieldSlice::range(1, 4);
        assert!(extract_fields("| only | two |", &slice, 3).is_err());
        assert!(extract_fields("no pipes at all", &slice, 3).is_err());
    }

    #[test]
    fn test_skip_leaves_columns_equal_length() {
        let slice = FieldSlice::range(1, 4);
        let mut acc = ColumnAccumulator::new(&["a", "b", "c"]);

        assert!(acc.push_line(0, "|1|2|3|", &slice));
        assert!(!acc.push_line(1, "|4|5", &slice));
        assert!(acc.push_line(2, "|6|7|8|", &slice));

        let (columns, skipped) = acc.finish();
        assert!(columns.iter().all(|(_, v)| v.len() == 2));
        assert_eq!(columns[1].1, vec!["2", "7"]);
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].line_index, 1);
        assert_eq!(skipped[0].content, "|4|5");
    }

    #[test]
    fn test_delivery_tokens_full_line() {
        let line = "| 8101 80012345 100234567 WANGL 2024.03.01 10:15:00 600123 1000456 Shanghai Auto Parts |";
        let values = delivery_tokens(line).unwrap().unwrap();
        assert_eq!(
            values,
            vec![
                "80012345", "100234567", "WANGL", "2024.03.01", "10:15:00", "600123", "1000456",
                "Shanghai Auto Parts"
            ]
        );
    }

    #[test]
    fn test_delivery_tokens_placeholders() {
        // no material number, no shipment
        let line = "| 8101 80012345 WANGL 2024.03.01 10:15:00 600123 ACME Ltd |";
        let values = delivery_tokens(line).unwrap().unwrap();
        assert_eq!(values[1], DELIVERY_PLACEHOLDER);
        assert_eq!(values[2], "WANGL");
        assert_eq!(values[6], DELIVERY_PLACEHOLDER);
        assert_eq!(values[7], "ACME Ltd");
    }

    #[test]
    fn test_delivery_tokens_non_data_and_short() {
        assert_eq!(delivery_tokens("| Plant Delivery Material").unwrap(), None);
        assert_eq!(delivery_tokens("").unwrap(), None);
        assert!(delivery_tokens("| 8101 80012345 100234567 WANGL").is_err());
    }
}
