use super::strip_bom;
use crate::error::{BouquetError, Result};

const COLUMN_GAP: &str = "  ";

/// Renders CSV files as an aligned plain-text table
pub struct CsvExtractor;

impl CsvExtractor {
    pub fn extract(bytes: &[u8]) -> Result<String> {
        let bytes = strip_bom(bytes);

        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(BouquetError::Parse("CSV has no content".to_string()));
        }

        let delimiter = detect_delimiter(bytes);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let mut rows: Vec<Vec<String>> = Vec::new();
        for result in reader.records() {
            let record = result
                .map_err(|e| BouquetError::Parse(format!("Failed to read CSV record: {e}")))?;
            rows.push(record.iter().map(|f| f.trim().to_string()).collect());
        }

        if rows.is_empty() {
            return Err(BouquetError::Parse("CSV has no rows".to_string()));
        }

        Ok(render_aligned(&rows))
    }
}

/// Pick whichever of `,` `;` `\t` yields the most consistent multi-column split
fn detect_delimiter(bytes: &[u8]) -> u8 {
    let candidates = [b',', b';', b'\t'];
    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delimiter in &candidates {
        let score = evaluate_delimiter(bytes, delimiter);
        if score > best_score {
            best_score = score;
            best_delimiter = delimiter;
        }
    }

    best_delimiter
}

fn evaluate_delimiter(bytes: &[u8], delimiter: u8) -> usize {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let column_counts: Vec<usize> = reader
        .records()
        .take(6)
        .filter_map(|r| r.ok())
        .map(|r| r.len())
        .collect();

    let Some(&first_count) = column_counts.first() else {
        return 0;
    };

    let consistent = column_counts.iter().all(|&c| c == first_count);
    let has_multiple_columns = first_count > 1;

    if consistent && has_multiple_columns {
        first_count * 10
    } else if has_multiple_columns {
        first_count
    } else {
        0
    }
}

/// Right-align every column to its widest cell; short rows are padded.
fn render_aligned(rows: &[Vec<String>]) -> String {
    let column_count = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    let mut widths = vec![0usize; column_count];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    rows.iter()
        .map(|row| {
            widths
                .iter()
                .enumerate()
                .map(|(i, &width)| {
                    let cell = row.get(i).map(String::as_str).unwrap_or("");
                    format!("{cell:>width$}")
                })
                .collect::<Vec<_>>()
                .join(COLUMN_GAP)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_detect_delimiter_comma() {
        let csv = b"Name,Age,City\nAlice,30,NYC";
        assert_eq!(detect_delimiter(csv), b',');
    }

    #[test]
    fn test_detect_delimiter_semicolon() {
        let csv = b"Name;Age;City\nAlice;30;NYC";
        assert_eq!(detect_delimiter(csv), b';');
    }

    #[test]
    fn test_detect_delimiter_tab() {
        let csv = b"Name\tAge\tCity\nAlice\t30\tNYC";
        assert_eq!(detect_delimiter(csv), b'\t');
    }

    #[test]
    fn test_aligned_table() {
        let csv = b"Vendor,Cost\nFlorist,1200\nDJ,800\n";
        let text = CsvExtractor::extract(csv).unwrap();
        assert_eq!(text, " Vendor  Cost\nFlorist  1200\n     DJ   800");
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let csv = b"Guest,Table,Meal\nAna,4\nBo,2,Vegan\n";
        let text = CsvExtractor::extract(csv).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Guest  Table   Meal");
        assert_eq!(lines[1], "  Ana      4       ");
        assert_eq!(lines[2], "   Bo      2  Vegan");
    }

    #[test]
    fn test_bom_only_is_parse_error() {
        let err = CsvExtractor::extract(&[0xEF, 0xBB, 0xBF]).unwrap_err();
        assert!(matches!(err, BouquetError::Parse(_)));
    }
}
