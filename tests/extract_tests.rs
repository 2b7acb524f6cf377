use logsalvage::extract::{extract, extract_with_diagnostics, ExtractError, ExtractionOutcome, Record};
use logsalvage::table::{format_table, TableError};
use serde_json::json;

const MIXED_LINE: &str =
    r#"2026-01-28 10:00:00 parsed_response - [[{"status":"Rejected","id":1},{"status":"Approved","id":2}]]"#;

fn record(value: serde_json::Value) -> Record {
    value.as_object().cloned().unwrap()
}

#[test]
fn test_empty_sequence_gives_no_records() {
    let records = extract(Vec::<String>::new(), None);
    assert!(records.is_empty());
}

#[test]
fn test_line_without_separator_is_skipped() {
    let records = extract(["just some text without a payload"], Some("Rejected"));
    assert!(records.is_empty());
}

#[test]
fn test_filter_keeps_only_rejected() {
    let records = extract([MIXED_LINE], Some("Rejected"));
    assert_eq!(records, vec![record(json!({"status": "Rejected", "id": 1}))]);
}

#[test]
fn test_no_filter_keeps_everything() {
    let records = extract([MIXED_LINE], None);
    assert_eq!(
        records,
        vec![
            record(json!({"status": "Rejected", "id": 1})),
            record(json!({"status": "Approved", "id": 2})),
        ]
    );
}

#[test]
fn test_arrow_syntax_matches_quoted_json() {
    let arrow = extract(["prefix - [[{status => Rejected, id => 9}]]"], None);
    let quoted = extract([r#"prefix - [[{"status":"Rejected","id":9}]]"#], None);
    assert_eq!(arrow, quoted);
    assert_eq!(arrow, vec![record(json!({"status": "Rejected", "id": 9}))]);
}

#[test]
fn test_arrow_syntax_with_quoted_values() {
    let records = extract(
        [r#"parsed_response - [[{"invoice"=>"INV-7", "status"=>"Rejected", "amount"=>120.5}]]"#],
        Some("Rejected"),
    );
    assert_eq!(
        records,
        vec![record(json!({"invoice": "INV-7", "status": "Rejected", "amount": 120.5}))]
    );
}

#[test]
fn test_bad_lines_do_not_stop_later_lines() {
    let lines = vec![
        "garbage".to_string(),
        "prefix - [[{broken".to_string(),
        String::new(),
        MIXED_LINE.to_string(),
    ];

    let extraction = extract_with_diagnostics(&lines, Some("Rejected"));

    assert_eq!(extraction.records.len(), 1);
    assert_eq!(extraction.lines_seen, 4);
    assert_eq!(extraction.empty_lines, 1);
    assert_eq!(extraction.failures.len(), 2);
    assert_eq!(extraction.failures[0].line_number, 1);
    assert!(matches!(
        extraction.failures[0].error,
        ExtractError::SeparatorMissing { .. }
    ));
    assert_eq!(extraction.failures[1].line_number, 2);
    assert!(matches!(
        extraction.failures[1].error,
        ExtractError::MalformedPayload { .. }
    ));
}

#[test]
fn test_empty_result_causes_are_distinguished() {
    let none = extract_with_diagnostics(Vec::<&str>::new(), Some("Rejected"));
    assert_eq!(none.outcome(), ExtractionOutcome::NoEvents);

    let filtered = extract_with_diagnostics(
        [r#"p - [[{"status":"Approved","id":3}]]"#],
        Some("Rejected"),
    );
    assert_eq!(filtered.outcome(), ExtractionOutcome::NoMatches);
    assert!(filtered.failures.is_empty());

    let failed = extract_with_diagnostics(["no separator"], Some("Rejected"));
    assert_eq!(failed.outcome(), ExtractionOutcome::NoMatches);
    assert_eq!(failed.failures.len(), 1);
}

#[test]
fn test_batches_from_several_lines_are_concatenated() {
    let lines = [
        r#"a - [[{"status":"Rejected","id":1}]]"#,
        r#"b - [[{"status":"Rejected","id":1},{"status":"Rejected","id":2}]]"#,
    ];
    let ids: Vec<i64> = extract(lines, Some("Rejected"))
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 1, 2]);
}

#[test]
fn test_table_contains_every_value_in_column_order() {
    let lines = [
        r#"p - [[{"invoice":"INV-1","status":"Rejected","amount":10},{"invoice":"INV-2","status":"Rejected","amount":20.5}]]"#,
        r#"p - [[{"invoice":"INV-3","status":"Rejected","amount":7}]]"#,
    ];
    let records = extract(lines, Some("Rejected"));
    let table = format_table(&records).unwrap();
    let rows: Vec<&str> = table.lines().skip(2).collect();

    assert_eq!(rows.len(), records.len());
    for (row, record) in rows.iter().zip(&records) {
        let mut position = 0;
        for value in record.values() {
            let rendered = logsalvage::table::render_cell(value);
            let found = row[position..]
                .find(&rendered)
                .unwrap_or_else(|| panic!("'{}' not found in order in '{}'", rendered, row));
            position += found + rendered.len();
        }
    }
}

#[test]
fn test_format_two_by_two() {
    let records = vec![record(json!({"a": 1, "b": 2})), record(json!({"a": 3, "b": 4}))];
    let table = format_table(&records).unwrap();
    let lines: Vec<&str> = table.split('\n').collect();
    assert_eq!(lines, vec!["a | b", "-----", "1 | 2", "3 | 4"]);
}

#[test]
fn test_format_empty() {
    assert_eq!(format_table(&[]).unwrap(), "No data available.");
}

#[test]
fn test_format_missing_key_is_an_error() {
    let records = extract(
        [r#"p - [[{"status":"Rejected","id":1},{"status":"Rejected"}]]"#],
        Some("Rejected"),
    );
    assert!(matches!(
        format_table(&records),
        Err(TableError::MissingKey { row: 1, ref key }) if key == "id"
    ));
}
