use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rusqlite::Connection;
use tempfile::TempDir;
use vp_ingest::{
    get_import_events, ingest_file, parse_file, setup_database, verify_count, Config, Disposition,
    ParseError, ReportType, Value,
};

const MB51_TEXT: &str = "\
Material Document List
|Material  |Description |Plnt|Name|SLoc|MvtDesc|MvT|Supplier|PO|MatDoc|Batch|Pstng Date|Quantity|Amount LC|User|Header|Reference|
|*         |            |    |    |    |       |   |        |  |      |     |          |        |         |    |      |         |
|100123456 |轴承        |8101|TC  |0001|GR     |101|V1      |45|49001 |B1   |2024.02.28|1,200-  |3.5      |ab  |h     |r        |
|100123457 |Ring        |8101|TC  |0001|GI     |261|        |  |49002 |     |2024.02.29|5       |1.0      |cd  |      |         |
|100123458 |Seal        |8101|TC  |0001|GI     |261|        |  |49003 |     |2024.03.01|7       |2.0      |cd  |      |         |
|100123457 |Ring        |8101|TC  |0001|GI     |261|        |  |49002 |     |2024.02.29|5       |1.0      |cd  |      |         |
";

fn write_gbk(dir: &Path, name: &str, text: &str) -> PathBuf {
    let (bytes, _, had_errors) = encoding_rs::GBK.encode(text);
    assert!(!had_errors);
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

fn config_in(dir: &TempDir) -> Config {
    Config {
        processed_dir: dir.path().join("Done"),
        rejected_dir: dir.path().join("Garbage"),
        ..Config::default()
    }
}

fn cost_report_text(title: &str, segment_code: &str) -> String {
    format!(
        "\
header
{title} 01.03.2024
x
x
Profit Center: 8101-S20 8101-S20
x
Segment Profit Center: {segment_code}
|Category|Plan|Actual|Dev|Dev%|PlanYTD|ActYTD|YTDDev|YTDDev%|
|** Material **|1,000|1,200-|200|20|3,000|3,100|100|3|
|Labour|500|450|50-|10|1,500|1,400|100-|7|
"
    )
}

#[test]
fn parses_gbk_report_detected_from_file_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_gbk(dir.path(), "03_MB51_20240301.txt", MB51_TEXT);

    let parsed = parse_file(&path, None, &Config::default()).unwrap();
    let table = &parsed.table;

    assert_eq!(parsed.report, ReportType::Mb51);
    assert!(parsed.disposition.is_accepted());
    assert_eq!(table.row_count(), 3);
    assert_eq!(parsed.duplicates, 1);
    assert_eq!(table.get(0, "material_desc"), Some(&Value::text("轴承")));
    assert_eq!(table.get(0, "file_name"), Some(&Value::text("03_MB51_20240301")));
    assert!(matches!(table.get(2, "last_modified_time"), Some(Value::DateTime(_))));
    assert_eq!(
        table.get(2, "posting_date"),
        Some(&Value::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()))
    );

    // every row carries the same metadata
    let stamp = table.get(0, "year_month").cloned();
    assert!((0..table.row_count()).all(|i| table.get(i, "year_month").cloned() == stamp));

    println!("✅ GBK report parse test PASSED");
}

#[test]
fn undecodable_file_is_encoding_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("03_MB51.txt");
    fs::write(&path, [b'|', 0x81, 0x20, b'|', b'\n']).unwrap();

    let err = parse_file(&path, None, &Config::default()).unwrap_err();
    let parse_err = err.downcast_ref::<ParseError>().expect("typed parse error");
    assert!(matches!(parse_err, ParseError::Encoding { .. }));
}

#[test]
fn writes_csv_with_rendered_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_gbk(dir.path(), "03_MB51.txt", MB51_TEXT);
    let parsed = parse_file(&path, None, &Config::default()).unwrap();

    let mut out = Vec::new();
    parsed.table.write_csv(&mut out).unwrap();
    let csv = String::from_utf8(out).unwrap();
    let mut lines = csv.lines();

    assert!(lines.next().unwrap().starts_with("file_name,creation_time,last_modified_time"));
    assert!(csv.contains("2024-02-28"));
    assert!(csv.contains("-1200"));
    assert_eq!(csv.lines().count(), 4);
}

#[test]
fn import_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_gbk(dir.path(), "03_MB51.txt", MB51_TEXT);
    let config = config_in(&dir);

    let conn = Connection::open_in_memory().unwrap();
    setup_database(&conn).unwrap();

    let first = ingest_file(&path, None, &config, Some(&conn)).unwrap();
    let loaded = first.loaded.unwrap();
    assert_eq!(loaded.inserted, 3);
    assert!(first.routed_to.is_none());
    assert!(path.exists());

    let second = ingest_file(&path, None, &config, Some(&conn)).unwrap();
    let loaded = second.loaded.unwrap();
    assert_eq!(loaded.inserted, 0);
    assert_eq!(loaded.duplicates, 3);

    assert_eq!(verify_count(&conn, ReportType::Mb51).unwrap(), 3);
    let events = get_import_events(&conn).unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].rows_inserted, 0);
    assert_eq!(events[1].rows_inserted, 3);

    println!("✅ Idempotent import test PASSED");
}

#[test]
fn accepted_cost_report_is_loaded_and_moved_to_processed() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_gbk(
        dir.path(),
        "23_Y_ED1_27000648.txt",
        &cost_report_text("Plant Cost Report", "8101-S20"),
    );
    let config = config_in(&dir);
    let conn = Connection::open_in_memory().unwrap();
    setup_database(&conn).unwrap();

    let outcome = ingest_file(&path, None, &config, Some(&conn)).unwrap();

    assert!(outcome.parsed.disposition.is_accepted());
    assert_eq!(outcome.loaded.unwrap().inserted, 2);
    assert_eq!(outcome.routed_to, Some(config.processed_dir.join("23_Y_ED1_27000648.txt")));
    assert!(!path.exists());
    assert_eq!(
        outcome.parsed.table.get(1, "actual_cost_in_CNY"),
        Some(&Value::Number(450.0))
    );
}

#[test]
fn rejected_cost_report_is_moved_to_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_gbk(
        dir.path(),
        "23_Y_ED1_27000648.txt",
        &cost_report_text("Weekly Summary", "8101-S20"),
    );
    let config = config_in(&dir);
    let conn = Connection::open_in_memory().unwrap();
    setup_database(&conn).unwrap();

    let outcome = ingest_file(&path, None, &config, Some(&conn)).unwrap();

    assert!(matches!(outcome.parsed.disposition, Disposition::Rejected(_)));
    assert!(outcome.parsed.table.is_empty());
    assert_eq!(outcome.loaded.unwrap().inserted, 0);
    let moved = outcome.routed_to.unwrap();
    assert_eq!(moved, config.rejected_dir.join("23_Y_ED1_27000648.txt"));
    assert!(moved.exists());
    assert!(!path.exists());

    let events = get_import_events(&conn).unwrap();
    assert_eq!(events.len(), 1);
    assert!(events[0].disposition.starts_with("rejected"));
}

#[test]
fn delivery_monitor_file_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_gbk(
        dir.path(),
        "39_DN_MONITOR_ZLSVN.txt",
        "\
| Plant Delivery Material Created
| 8101 80012345 100234567 WANGL 2024.03.01 10:15:00 600123 1000456 上海汽车配件 |
| 8101 80012346 WANGL 2024.03.02 11:00:00 600124 ACME Ltd |
",
    );

    let parsed = parse_file(&path, None, &Config::default()).unwrap();
    assert_eq!(parsed.table.row_count(), 2);
    assert_eq!(
        parsed.table.get(0, "ship_to_party_name"),
        Some(&Value::text("上海汽车配件"))
    );
    assert_eq!(parsed.table.get(1, "shipment"), Some(&Value::Missing));
}

#[test]
fn monthly_demand_file_end_to_end() {
    fn row(material: &str) -> String {
        let mut pieces = vec!["MC1", "G1", "Bearing", material, "10", "A", "1,000", "0", "5"];
        let months: Vec<String> = (1..=13).map(|i| format!("{},0", i)).collect();
        pieces.extend(months.iter().map(String::as_str));
        while pieces.len() < 60 {
            pieces.push("");
        }
        format!("|{}|", pieces.join("|"))
    }

    let mut header = vec![""; 10];
    header.push("Start 02/2024");
    let text = format!(
        "title\n\n{}\n{}\n{}\n{}\n",
        header.join("|"),
        row("header"),
        row("100123456"),
        row("100123457")
    );

    let dir = tempfile::tempdir().unwrap();
    let path = write_gbk(dir.path(), "08_ZPCP13.txt", &text);
    let parsed = parse_file(&path, None, &Config::default()).unwrap();
    let table = &parsed.table;

    assert_eq!(table.row_count(), 26);
    // month-major: both materials for February first
    assert_eq!(table.get(0, "date"), Some(&Value::text("2024-02-01")));
    assert_eq!(table.get(1, "date"), Some(&Value::text("2024-02-01")));
    assert_eq!(table.get(2, "date"), Some(&Value::text("2024-03-01")));
    assert_eq!(table.get(25, "date"), Some(&Value::text("2025-02-01")));
    assert_eq!(table.get(25, "quantity"), Some(&Value::text("130")));
    assert_eq!(table.column_names().last(), Some(&"quantity"));
}

#[test]
fn explicit_report_overrides_detection() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_gbk(dir.path(), "export.txt", MB51_TEXT);

    assert!(parse_file(&path, None, &Config::default()).is_err());
    let report = ReportType::from_code("03").unwrap();
    let parsed = parse_file(&path, Some(report), &Config::default()).unwrap();
    assert_eq!(parsed.table.row_count(), 3);
}
