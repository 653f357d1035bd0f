//! Property-based tests for row parsing and serialization
//!
//! Covers the round-trip guarantee between `Row::to_bytes` and `Row::parse`
//! and the shape of what the serializer emits.

use csv_helper::{LineReader, LineSource, LineTerminator, Row};
use proptest::prelude::*;

/// Strategy for generating plain fields with no special characters
fn plain_field_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 _.-]{0,20}".prop_map(|s| s)
}

/// Strategy for generating fields containing CSV special characters
fn special_field_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        // Fields with commas
        "[a-zA-Z0-9]{0,10},[a-zA-Z0-9]{0,10}".prop_map(|s| s),
        // Fields with double quotes
        "[a-zA-Z0-9]{0,10}\"[a-zA-Z0-9]{0,10}\"[a-zA-Z0-9]{0,10}".prop_map(|s| s),
        // Fields with newlines
        "[a-zA-Z0-9]{0,10}\n[a-zA-Z0-9]{0,10}".prop_map(|s| s),
        // Fields with carriage returns
        "[a-zA-Z0-9]{0,10}\r\n[a-zA-Z0-9]{0,10}".prop_map(|s| s),
        // Leading and trailing whitespace
        " [a-zA-Z0-9]{0,10} ".prop_map(|s| s),
        Just(String::new()),
        Just("\"".to_string()),
        Just("\"\"".to_string()),
        Just(",".to_string()),
        Just("Hello 世界 🌍".to_string()),
    ]
}

/// Strategy for generating any printable field
fn any_field_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        plain_field_strategy(),
        special_field_strategy(),
        "\\PC{0,16}".prop_map(|s| s),
    ]
}

/// Strategy for generating non-empty rows
fn row_strategy() -> impl Strategy<Value = Row> {
    prop::collection::vec(any_field_strategy(), 1..8).prop_map(Row::from)
}

fn terminator_strategy() -> impl Strategy<Value = LineTerminator> {
    prop_oneof![Just(LineTerminator::Lf), Just(LineTerminator::CrLf)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Parsing a serialized row yields the same row.
    #[test]
    fn property_row_round_trip(row in row_strategy(), terminator in terminator_strategy()) {
        let bytes = row.to_bytes_with(terminator).unwrap();
        let parsed = Row::parse(&bytes).unwrap();
        prop_assert_eq!(parsed, row);
    }

    // Rows of plain fields are written verbatim, joined by commas.
    #[test]
    fn property_plain_fields_not_quoted(
        fields in prop::collection::vec("[a-zA-Z0-9_.-]{1,12}", 1..6)
    ) {
        let row = Row::from(fields.clone());
        let bytes = row.to_bytes_with(LineTerminator::Lf).unwrap();
        let expected = format!("{}\n", fields.join(","));
        prop_assert_eq!(String::from_utf8(bytes).unwrap(), expected);
    }

    // The serialized form always ends with exactly one terminator.
    #[test]
    fn property_single_trailing_terminator(row in row_strategy()) {
        let bytes = row.to_bytes_with(LineTerminator::Lf).unwrap();
        prop_assert!(bytes.ends_with(b"\n"));
        prop_assert_eq!(Row::parse(&bytes[..bytes.len() - 1]).unwrap(), row);
    }

    // A sequence of serialized rows reads back one record per row.
    #[test]
    fn property_line_reader_recovers_records(
        rows in prop::collection::vec(row_strategy(), 1..10)
    ) {
        let mut data = Vec::new();
        for row in &rows {
            data.extend(row.to_bytes().unwrap());
        }

        let mut reader = LineReader::new(data.as_slice());
        for row in &rows {
            let line = reader.next_line().unwrap().unwrap();
            prop_assert_eq!(&Row::parse(&line).unwrap(), row);
        }
        prop_assert!(reader.next_line().is_none());
    }
}
