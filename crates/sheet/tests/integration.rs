use tabview_sheet::{
    parse, serialize, CellValue, ExportError, ExportFormat, FileFormat, ParseError, Record, Sheet,
    Upload, DEFAULT_MAX_UPLOAD_BYTES,
};
use tempfile::tempdir;

fn people() -> Sheet {
    Sheet::from_data(
        "People",
        vec![
            vec!["ID", "Name", "Address"],
            vec!["1", "row1", "Calle Mayor 1"],
            vec!["2", "row2", "Gran Via 22"],
            vec!["3", "row3", ""],
        ],
    )
}

fn as_strings(record: &Record, headers: &[String]) -> Vec<String> {
    headers.iter().map(|h| record.get(h).as_str()).collect()
}

// ===== Parsing =====

#[test]
fn test_parse_csv_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("contacts.csv");
    std::fs::write(&path, "ID,Name\n1,Ana\n2,Luis\n3,Marta\n").unwrap();

    let upload = Upload::from_path(&path, DEFAULT_MAX_UPLOAD_BYTES).unwrap();
    assert_eq!(upload.name(), "contacts.csv");

    let book = parse(&upload, DEFAULT_MAX_UPLOAD_BYTES).unwrap();
    assert_eq!(book.sheet_count(), 1);
    assert_eq!(book.current_sheet().name(), "contacts");
    assert_eq!(book.current_sheet().row_count(), 3);
}

#[test]
fn test_parse_header_only_csv() {
    let upload = Upload::new("empty_rows.csv", b"ID,Value\n".to_vec());
    let book = parse(&upload, DEFAULT_MAX_UPLOAD_BYTES).unwrap();

    let sheet = book.current_sheet();
    assert_eq!(sheet.headers(), ["ID", "Value"]);
    assert_eq!(sheet.row_count(), 0);
}

#[test]
fn test_parse_enforces_size_limit() {
    let upload = Upload::new("big.csv", b"ID\n1\n2\n3\n".to_vec());
    let err = parse(&upload, 4).unwrap_err();
    assert!(matches!(err, ParseError::TooLarge { limit: 4, .. }));
}

#[test]
fn test_from_path_checks_size_before_reading() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("big.csv");
    std::fs::write(&path, "ID\n1\n2\n3\n").unwrap();

    let err = Upload::from_path(&path, 4).unwrap_err();
    assert!(matches!(err, ParseError::TooLarge { size: 9, limit: 4 }));

    let missing = Upload::from_path(dir.path().join("missing.csv"), 4).unwrap_err();
    assert!(matches!(missing, ParseError::Io(_)));
}

#[test]
fn test_parse_rejects_unknown_type() {
    let upload = Upload::new("notes.txt", b"hello".to_vec());
    let err = parse(&upload, DEFAULT_MAX_UPLOAD_BYTES).unwrap_err();
    assert!(matches!(err, ParseError::UnsupportedFormat { .. }));
}

// ===== Export round trips =====

#[test]
fn test_csv_export_roundtrip() {
    let sheet = people();
    let rows: Vec<&Record> = sheet.rows().iter().collect();

    let export = serialize(sheet.headers(), &rows, ExportFormat::Csv).unwrap();
    let reparsed = parse(
        &Upload::new(export.file_name.clone(), export.bytes),
        DEFAULT_MAX_UPLOAD_BYTES,
    )
    .unwrap();

    let back = reparsed.current_sheet();
    assert_eq!(back.headers(), sheet.headers());
    assert_eq!(back.row_count(), sheet.row_count());
    for (original, restored) in sheet.rows().iter().zip(back.rows()) {
        assert_eq!(
            as_strings(original, sheet.headers()),
            as_strings(restored, sheet.headers())
        );
    }
}

#[test]
fn test_xlsx_export_roundtrip_through_disk() {
    let dir = tempdir().unwrap();
    let sheet = people();
    let rows: Vec<&Record> = sheet.rows().iter().collect();

    let export = serialize(sheet.headers(), &rows, ExportFormat::Xlsx).unwrap();
    let path = dir.path().join(&export.file_name);
    std::fs::write(&path, &export.bytes).unwrap();

    let upload = Upload::from_path(&path, DEFAULT_MAX_UPLOAD_BYTES).unwrap();
    let book = parse(&upload, DEFAULT_MAX_UPLOAD_BYTES).unwrap();
    assert_eq!(book.format(), FileFormat::Xlsx);
    assert_eq!(book.sheet_names(), vec!["Filtered Data"]);

    let back = book.current_sheet();
    assert_eq!(back.row_count(), 3);
    for (original, restored) in sheet.rows().iter().zip(back.rows()) {
        assert_eq!(
            as_strings(original, sheet.headers()),
            as_strings(restored, sheet.headers())
        );
    }
}

#[test]
fn test_xlsx_numbers_survive_as_numbers() {
    let headers = vec!["Qty".to_string()];
    let row: Record = [("Qty", CellValue::Int(12))].into_iter().collect();

    let export = serialize(&headers, &[&row], ExportFormat::Xlsx).unwrap();
    let book = parse(
        &Upload::new("out.xlsx", export.bytes),
        DEFAULT_MAX_UPLOAD_BYTES,
    )
    .unwrap();

    let value = book.current_sheet().row(0).unwrap().get("Qty");
    assert_eq!(value.as_float(), Some(12.0));
    assert_eq!(value.as_str(), "12");
}

#[test]
fn test_export_nothing() {
    let sheet = Sheet::from_data("B", vec![vec!["ID", "Value"]]);
    let err = serialize(sheet.headers(), &[], ExportFormat::Xlsx).unwrap_err();
    assert!(matches!(err, ExportError::NothingToExport));
}
