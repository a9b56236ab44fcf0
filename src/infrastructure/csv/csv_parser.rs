// ============================================================
// CSV PARSER
// ============================================================
// Split decoded text into header + data records, tolerating bad rows

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};

use crate::domain::csv::Dialect;
use crate::domain::error::{AppError, Result};

/// Header and data records of one file
#[derive(Debug, Clone)]
pub struct CsvRecords {
    pub headers: StringRecord,

    /// Non-blank data records, in file order
    pub records: Vec<StringRecord>,

    /// Records the reader could not decode at all
    pub unreadable: usize,
}

impl CsvRecords {
    /// Non-blank data lines seen after the header
    pub fn data_lines(&self) -> usize {
        self.records.len() + self.unreadable
    }
}

/// CSV reader/writer bound to one delimiter
pub struct CsvParser {
    /// Delimiter character (default: comma)
    delimiter: u8,

    /// Whether to trim whitespace from values
    trim: bool,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: true,
        }
    }
}

impl CsvParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser using the delimiter of `dialect`
    pub fn for_dialect(dialect: Dialect) -> Self {
        Self::default().with_delimiter(dialect.delimiter())
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether to trim whitespace
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Read header and data records.
    ///
    /// Fails with `MalformedInput` when there is no header line or no
    /// non-blank data line after it.
    pub fn read_records(&self, content: &str) -> Result<CsvRecords> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(if self.trim { Trim::All } else { Trim::None })
            .flexible(true) // Allow rows with different lengths
            .has_headers(true)
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| AppError::MalformedInput(format!("Failed to read CSV header: {}", e)))?
            .clone();

        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(AppError::MalformedInput("CSV has no header line".to_string()));
        }

        let mut records = Vec::new();
        let mut unreadable = 0;

        for (index, result) in reader.records().enumerate() {
            match result {
                Ok(record) => {
                    if record.iter().all(|field| field.trim().is_empty()) {
                        continue;
                    }
                    records.push(record);
                }
                Err(e) => {
                    tracing::debug!("Skipping unreadable CSV row {}: {}", index + 1, e);
                    unreadable += 1;
                }
            }
        }

        if records.is_empty() && unreadable == 0 {
            return Err(AppError::MalformedInput(
                "CSV has no data rows after the header".to_string(),
            ));
        }

        Ok(CsvRecords {
            headers,
            records,
            unreadable,
        })
    }

    /// Write header and rows as `\n`-terminated CSV text
    pub fn write_rows<I, R>(&self, header: &[&str], rows: I) -> Result<String>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator,
        R::Item: AsRef<[u8]>,
    {
        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record(header)?;
        for row in rows {
            writer.write_record(row)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::Internal(format!("Failed to flush CSV writer: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::Internal(format!("CSV writer produced invalid UTF-8: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_simple_csv() {
        let content = "name,value,baseline\nAlice,30,40\n\nBob,25,50\n";
        let parsed = CsvParser::new().read_records(content).unwrap();

        assert_eq!(parsed.headers.len(), 3);
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[1].get(0), Some("Bob"));
        assert_eq!(parsed.data_lines(), 2);
    }

    #[test]
    fn test_blank_and_whitespace_lines_ignored() {
        let content = "a;b\n   \n;\nx;y\r\n";
        let parsed = CsvParser::for_dialect(Dialect::LeveledOutline)
            .read_records(content)
            .unwrap();

        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].get(1), Some("y"));
    }

    #[test]
    fn test_quoted_field_keeps_commas() {
        let content = "name,value\n\"Forno, linha 2\",\"45,5\"\n";
        let parsed = CsvParser::new().read_records(content).unwrap();

        assert_eq!(parsed.records[0].get(0), Some("Forno, linha 2"));
        assert_eq!(parsed.records[0].get(1), Some("45,5"));
    }

    #[test]
    fn test_header_only_is_malformed() {
        let err = CsvParser::new().read_records("name,value\n\n").unwrap_err();
        assert!(matches!(err, AppError::MalformedInput(_)));
    }

    #[test]
    fn test_empty_is_malformed() {
        let err = CsvParser::new().read_records("\n\n").unwrap_err();
        assert!(matches!(err, AppError::MalformedInput(_)));
    }

    #[test]
    fn test_write_rows_quotes_when_needed() {
        let text = CsvParser::new()
            .write_rows(&["name", "value"], vec![vec!["Forno, 2", "45,5"], vec!["Secagem", "10"]])
            .unwrap();

        assert_eq!(text, "name,value\n\"Forno, 2\",\"45,5\"\nSecagem,10\n");
    }
}
