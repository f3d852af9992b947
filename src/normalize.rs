// 🔢 Value Normalization - ERP number strings, dates, month labels
// Pure helpers shared by every report layout

use chrono::{Datelike, NaiveDate};

// ============================================================================
// NUMERIC NORMALIZER
// ============================================================================

/// Normalize an ERP number string so it parses as a signed decimal
///
/// - surrounding whitespace is trimmed
/// - thousands separators (`,`) are removed
/// - a trailing minus sign moves to the front (`"1,234-"` → `"-1234"`)
///
/// Anything else passes through untouched; the caller's coercion decides
/// whether that is an error.
pub fn normalize_number(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }

    let cleaned = trimmed.replace(',', "");
    match cleaned.strip_suffix('-') {
        Some(digits) => format!("-{}", digits),
        None => cleaned,
    }
}

/// Parse an already-normalized number. Empty input is `Ok(None)`;
/// `nan`, `inf` and `infinity` parse like any float.
pub fn parse_number(text: &str) -> Result<Option<f64>, std::num::ParseFloatError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<f64>().map(Some)
}

// ============================================================================
// DATES
// ============================================================================

/// Parse a date with a chrono format string. Empty input is `Ok(None)`.
pub fn parse_date(text: &str, format: &str) -> Result<Option<NaiveDate>, chrono::ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(text, format).map(Some)
}

/// Parse a `MM/YYYY` month stamp into the first day of that month
pub fn parse_month_year(text: &str) -> Option<NaiveDate> {
    let (month, year) = text.trim().split_once('/')?;
    let month: u32 = month.trim().parse().ok()?;
    let year: i32 = year.trim().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

// ============================================================================
// MONTH-SEQUENCE GENERATOR
// ============================================================================

/// First-of-month labels (`YYYY-MM-DD`) for `count` months starting at
/// `start`'s month
pub fn next_n_months(start: NaiveDate, count: usize) -> Vec<String> {
    let base = start.year() * 12 + start.month0() as i32;

    (0..count as i32)
        .filter_map(|offset| {
            let index = base + offset;
            NaiveDate::from_ymd_opt(index.div_euclid(12), index.rem_euclid(12) as u32 + 1, 1)
        })
        .map(|date| date.format("%Y-%m-%d").to_string())
        .collect()
}

/// Same as [`next_n_months`], seeded from today's date
pub fn next_n_months_from_today(count: usize) -> Vec<String> {
    next_n_months(chrono::Local::now().date_naive(), count)
}
