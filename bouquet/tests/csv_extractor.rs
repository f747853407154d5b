use pretty_assertions::assert_eq;

use bouquet::error::BouquetError;
use bouquet::processing::extractors::csv::CsvExtractor;

mod common;

#[test]
fn test_csv_columns_are_right_aligned() {
    let csv_content = b"Name,Age,City\nAlice,30,New York\nBob,25,Los Angeles";
    let text = CsvExtractor::extract(csv_content).unwrap();

    assert_eq!(
        text,
        " Name  Age         City\nAlice   30     New York\n  Bob   25  Los Angeles"
    );
}

#[test]
fn test_csv_auto_delimiter_semicolon() {
    let csv_content = b"Name;Age\nAlice;30";
    let text = CsvExtractor::extract(csv_content).unwrap();

    assert_eq!(text, " Name  Age\nAlice   30");
}

#[test]
fn test_csv_auto_delimiter_tab() {
    let csv_content = b"Name\tAge\nAlice\t30";
    let text = CsvExtractor::extract(csv_content).unwrap();

    assert_eq!(text, " Name  Age\nAlice   30");
}

#[test]
fn test_csv_whitespace_only_is_parse_error() {
    let result = CsvExtractor::extract(b"  \n\n ");

    assert!(matches!(result, Err(BouquetError::Parse(_))));
}

#[test]
fn test_csv_headers_only() {
    let text = CsvExtractor::extract(b"Name,Age,City\n").unwrap();

    assert_eq!(text, "Name  Age  City");
}

#[test]
fn test_csv_ragged_rows_still_render() {
    let csv_content = b"Name,Age,City\nAlice,30\nBob,25,Los Angeles,Extra";
    let text = CsvExtractor::extract(csv_content).unwrap();

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[2].ends_with("Extra"));
}

#[test]
fn test_csv_bom_stripping() {
    let mut csv_content = vec![0xEF, 0xBB, 0xBF];
    csv_content.extend_from_slice(b"Name,Age\nAlice,30");

    let text = CsvExtractor::extract(&csv_content).unwrap();

    assert!(!text.contains('\u{FEFF}'));
    assert_eq!(text, " Name  Age\nAlice   30");
}

#[test]
fn test_csv_with_quoted_fields() {
    let csv_content =
        b"Name,Note\nAlice,\"Vegan, no nuts\"\nBob,\"Wants \"\"Shout\"\" played\"";
    let text = CsvExtractor::extract(csv_content).unwrap();

    assert!(text.contains("Vegan, no nuts"));
    assert!(text.contains("Wants \"Shout\" played"));
}

#[test]
fn test_csv_schedule_fixture() {
    let text = CsvExtractor::extract(common::sample_csv()).unwrap();

    assert_eq!(
        text,
        "  Time          Event  Location\n\
         3:30pm  Guests arrive    Garden\n\
         4:00pm       Ceremony    Garden\n\
         6:00pm         Dinner  Ballroom"
    );
}
