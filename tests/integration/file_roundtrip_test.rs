//! Integration tests for encoding to and decoding from files on disk

use csv_helper::{CodecConfig, CsvHelperError, Decoder, Encoder, LineReader, LineTerminator, Row};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use tempfile::tempdir;

/// Helper: build a row map from key/value pairs
fn record(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Helper: decode every row of a file into maps
fn read_file(
    path: &std::path::Path,
    config: &CodecConfig,
) -> Result<(Row, Vec<BTreeMap<String, String>>), CsvHelperError> {
    let file = File::open(path).map_err(CsvHelperError::Read)?;
    let mut decoder = Decoder::with_config(LineReader::new(BufReader::new(file)), config)?;
    let mut rows = Vec::new();

    loop {
        let mut row: BTreeMap<String, String> = BTreeMap::new();
        match decoder.decode(&mut row) {
            Ok(()) => rows.push(row),
            Err(e) if e.is_end_of_input() => break,
            Err(e) => return Err(e),
        }
    }

    Ok((decoder.header().clone(), rows))
}

#[test]
fn test_file_round_trip() {
    let temp_dir = tempdir().unwrap();
    let file_path = temp_dir.path().join("people.csv");

    let records = vec![
        record(&[("id", "1"), ("note", "plain")]),
        record(&[("id", "2"), ("note", "has, comma")]),
        record(&[("id", "3"), ("note", "has \"quotes\"")]),
        record(&[("id", "4"), ("note", "multi\nline")]),
        record(&[("id", "5"), ("note", "")]),
    ];

    {
        let file = File::create(&file_path).unwrap();
        let mut sink = BufWriter::new(file);
        let mut encoder = Encoder::new(&mut sink, Row::from(["id", "note"])).unwrap();
        for r in &records {
            encoder.encode(&mut r.clone()).unwrap();
        }
        encoder.flush().unwrap();
        drop(encoder);
        sink.flush().unwrap();
    }

    let (header, rows) = read_file(&file_path, &CodecConfig::default()).unwrap();
    assert_eq!(header, Row::from(["id", "note"]));
    assert_eq!(rows, records);
}

#[test]
fn test_crlf_file_round_trip() {
    let temp_dir = tempdir().unwrap();
    let file_path = temp_dir.path().join("crlf.csv");
    let config = CodecConfig::default().terminator(LineTerminator::CrLf);

    {
        let file = File::create(&file_path).unwrap();
        let mut encoder = Encoder::with_config(file, Row::from(["k", "v"]), &config).unwrap();
        encoder.encode(&mut record(&[("k", "a"), ("v", "b")])).unwrap();
        encoder.into_inner().unwrap();
    }

    let content = std::fs::read(&file_path).unwrap();
    assert_eq!(content, b"k,v\r\na,b\r\n");

    let (_, rows) = read_file(&file_path, &config).unwrap();
    assert_eq!(rows, vec![record(&[("k", "a"), ("v", "b")])]);
}

#[test]
fn test_empty_file_has_no_header() {
    let temp_dir = tempdir().unwrap();
    let file_path = temp_dir.path().join("empty.csv");
    File::create(&file_path).unwrap();

    let result = read_file(&file_path, &CodecConfig::default());
    assert!(matches!(result, Err(CsvHelperError::EndOfInput)));
}

#[test]
fn test_field_size_limit_from_json_config() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("codec.json");
    std::fs::write(&config_path, r#"{ "field_size_limit": 5 }"#).unwrap();
    let config = CodecConfig::from_json_file(&config_path).unwrap();

    let file_path = temp_dir.path().join("data.csv");
    std::fs::write(&file_path, "name\nshort\nmuch too long\n").unwrap();

    let err = read_file(&file_path, &config).unwrap_err();
    assert!(matches!(
        err,
        CsvHelperError::FieldTooLarge {
            line: 3,
            field: 0,
            limit: 5,
            actual: 13
        }
    ));
}
