//! CSV reader for raw dataset text
//!
//! Handles the subset of RFC 4180 that real exports use: comma separators,
//! double-quoted fields with `""` escapes, embedded newlines inside quotes,
//! and LF / CRLF line endings. The first record is the header.

use crate::error::{AuditError, Result};

/// One data row with the line it started on (1-indexed)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub line: usize,
    pub fields: Vec<String>,
}

/// Parsed CSV: header names plus string-valued rows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    /// Index of a header by exact name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Parse CSV text into a [`RawTable`]
///
/// Blank lines are skipped. Every data row must have as many fields as the
/// header.
///
/// # Example
/// ```
/// use fairaudit::dataset::csv::parse_csv;
///
/// let table = parse_csv("race,score\n\"Doe, J\",3\n").unwrap();
/// assert_eq!(table.headers, vec!["race", "score"]);
/// assert_eq!(table.rows[0].fields[0], "Doe, J");
/// ```
pub fn parse_csv(text: &str) -> Result<RawTable> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let records = split_records(text)?;

    let mut iter = records.into_iter();
    let Some(header) = iter.next() else {
        return Err(AuditError::Parse {
            line: 1,
            message: "no header row".to_string(),
        });
    };

    let headers: Vec<String> = header
        .fields
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for row in iter {
        if row.fields.len() != headers.len() {
            return Err(AuditError::Parse {
                line: row.line,
                message: format!(
                    "expected {} fields, got {}",
                    headers.len(),
                    row.fields.len()
                ),
            });
        }
        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}

/// Tokenize text into records, tracking the starting line of each
fn split_records(text: &str) -> Result<Vec<RawRow>> {
    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut has_content = false;
    let mut line = 1usize;
    let mut record_line = 1usize;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push('\n');
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => {
                in_quotes = true;
                has_content = true;
            }
            ',' => {
                fields.push(std::mem::take(&mut field));
                has_content = true;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\r' | '\n' => {
                if has_content {
                    fields.push(std::mem::take(&mut field));
                    records.push(RawRow {
                        line: record_line,
                        fields: std::mem::take(&mut fields),
                    });
                }
                has_content = false;
                line += 1;
                record_line = line;
            }
            _ => {
                field.push(c);
                has_content = true;
            }
        }
    }

    if in_quotes {
        return Err(AuditError::Parse {
            line: record_line,
            message: "unterminated quoted field".to_string(),
        });
    }

    if has_content {
        fields.push(field);
        records.push(RawRow {
            line: record_line,
            fields,
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_table() {
        let table = parse_csv("a,b,c\n1,2,3\n4,5,6\n").unwrap();
        assert_eq!(table.headers, vec!["a", "b", "c"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].fields, vec!["4", "5", "6"]);
        assert_eq!(table.rows[1].line, 3);
    }

    #[test]
    fn test_quoted_comma_and_escaped_quote() {
        let table = parse_csv("name,note\n\"Smith, A\",\"said \"\"hi\"\"\"\n").unwrap();
        assert_eq!(table.rows[0].fields[0], "Smith, A");
        assert_eq!(table.rows[0].fields[1], "said \"hi\"");
    }

    #[test]
    fn test_crlf_line_endings() {
        let table = parse_csv("a,b\r\n1,2\r\n3,4").unwrap();
        assert_eq!(table.headers, vec!["a", "b"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].fields, vec!["3", "4"]);
    }

    #[test]
    fn test_embedded_newline_tracks_lines() {
        let table = parse_csv("a,b\n\"x\ny\",1\n2,3\n").unwrap();
        assert_eq!(table.rows[0].fields[0], "x\ny");
        assert_eq!(table.rows[0].line, 2);
        assert_eq!(table.rows[1].line, 4);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let table = parse_csv("a,b\n\n1,2\n\n").unwrap();
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_empty_fields_preserved() {
        let table = parse_csv("a,b,c\n,,\n").unwrap();
        assert_eq!(table.rows[0].fields, vec!["", "", ""]);
    }

    #[test]
    fn test_field_count_mismatch() {
        let err = parse_csv("a,b\n1,2\n3\n").unwrap_err();
        match err {
            AuditError::Parse { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("expected 2 fields, got 1"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unterminated_quote() {
        assert!(matches!(
            parse_csv("a,b\n\"open,1\n"),
            Err(AuditError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn test_empty_input_has_no_header() {
        assert!(matches!(parse_csv(""), Err(AuditError::Parse { .. })));
    }

    #[test]
    fn test_bom_and_header_whitespace() {
        let table = parse_csv("\u{feff} race , score\nA,1\n").unwrap();
        assert_eq!(table.headers, vec!["race", "score"]);
        assert_eq!(table.column_index("score"), Some(1));
        assert_eq!(table.column_index("missing"), None);
    }
}
