// ============================================================
// LEVELED OUTLINE CODEC
// ============================================================
// `Nome;Nível;Dashboard;Real;LB` rows <-> outline rows

use csv::StringRecord;

use super::number::{format_percentage, parse_percentage};
use super::CsvParser;
use crate::domain::csv::{
    DecimalSeparator, Dialect, MapperConfig, OutlineRow, ParseOutcome, SkipTally, OUTLINE_HEADER,
};
use crate::domain::error::Result;

/// Dashboard value written for unflagged rows
const DASHBOARD_OFF: &str = "N";

/// Column positions resolved from the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OutlineColumns {
    name: usize,
    level: usize,
    dashboard: usize,
    progress: usize,
    baseline: usize,
}

impl OutlineColumns {
    /// Match header names, falling back to the canonical column order
    fn resolve(headers: &StringRecord) -> Self {
        Self {
            name: find_column(headers, |h| h == "nome" || h == "name", 0),
            // also matches the mis-decoded "N�vel_da_estrutura_de_t�picos"
            level: find_column(
                headers,
                |h| h.contains("vel_da_estrutura") || h == "nivel" || h == "nível" || h == "level",
                1,
            ),
            dashboard: find_column(headers, |h| h == "dashboard", 2),
            progress: find_column(headers, |h| h == "porcentagem_prev_real" || h == "progress", 3),
            baseline: find_column(headers, |h| h == "porcentagem_prev_lb" || h == "baseline", 4),
        }
    }
}

fn find_column(headers: &StringRecord, matches: impl Fn(&str) -> bool, fallback: usize) -> usize {
    headers
        .iter()
        .position(|header| matches(&header.trim().to_lowercase()))
        .unwrap_or(fallback)
}

/// Codec for the leveled outline dialect
pub struct OutlineCodec<'a> {
    config: &'a MapperConfig,
}

impl<'a> OutlineCodec<'a> {
    pub fn new(config: &'a MapperConfig) -> Self {
        Self { config }
    }

    /// Parse outline CSV text into rows, in file order
    pub fn parse(&self, content: &str) -> Result<ParseOutcome<OutlineRow>> {
        let records = CsvParser::for_dialect(Dialect::LeveledOutline).read_records(content)?;
        let columns = OutlineColumns::resolve(&records.headers);

        let mut skipped = SkipTally {
            rows: records.unreadable,
            ..Default::default()
        };
        let mut rows = Vec::with_capacity(records.records.len());

        for (index, record) in records.records.iter().enumerate() {
            match self.parse_record(record, columns) {
                Some(row) => rows.push(row),
                None => {
                    tracing::debug!("Skipping outline row {}: {:?}", index + 1, record);
                    skipped.rows += 1;
                }
            }
        }

        Ok(ParseOutcome {
            items: rows,
            skipped,
            data_lines: records.data_lines(),
        })
    }

    fn parse_record(&self, record: &StringRecord, columns: OutlineColumns) -> Option<OutlineRow> {
        let field = |index: usize| record.get(index).unwrap_or("").trim();

        let name = field(columns.name);
        if name.is_empty() {
            return None;
        }

        let level = field(columns.level).parse::<u32>().ok().filter(|level| *level > 0)?;

        Some(OutlineRow {
            level,
            name: name.to_string(),
            dashboard: self.config.is_dashboard_flag(field(columns.dashboard)),
            progress: self.percentage(field(columns.progress)),
            baseline: self.percentage(field(columns.baseline)),
        })
    }

    /// Serialize rows, canonical header first
    pub fn write(&self, rows: &[OutlineRow], decimal: DecimalSeparator) -> Result<String> {
        let records = rows.iter().map(|row| {
            [
                row.name.clone(),
                row.level.to_string(),
                if row.dashboard {
                    self.config.dashboard_marker.trim().to_string()
                } else {
                    DASHBOARD_OFF.to_string()
                },
                format_percentage(row.progress, decimal),
                format_percentage(row.baseline, decimal),
            ]
        });

        CsvParser::for_dialect(Dialect::LeveledOutline).write_rows(&OUTLINE_HEADER, records)
    }

    fn percentage(&self, raw: &str) -> f64 {
        parse_percentage(raw, self.config.parse_decimal, self.config.out_of_range)
    }
}
