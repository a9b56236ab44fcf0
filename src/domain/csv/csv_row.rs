// ============================================================
// CSV ROW TYPES
// ============================================================
// Parsed rows and the tally of fragments dropped while parsing

use serde::{Deserialize, Serialize};

use super::{Activity, Dialect};

/// One node of the leveled outline dialect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineRow {
    /// Hierarchy level (1 = project, 2 = work front, 3 = activity, 4 = sub-activity)
    pub level: u32,

    pub name: String,

    /// Whether the row is flagged `S` for the dashboard
    pub dashboard: bool,

    /// `Porcentagem_Prev_Real`
    pub progress: f64,

    /// `Porcentagem_Prev_LB`
    pub baseline: f64,
}

impl OutlineRow {
    pub fn new(level: u32, name: impl Into<String>, dashboard: bool, progress: f64, baseline: f64) -> Self {
        Self {
            level,
            name: name.into(),
            dashboard,
            progress,
            baseline,
        }
    }
}

/// Count of fragments dropped by best-effort parsing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipTally {
    /// Whole data rows dropped (empty name, too few fields, bad level)
    pub rows: usize,

    /// Sub-activity entries dropped (missing name or values)
    pub sub_entries: usize,

    /// Names emptied by the name filter
    pub filtered_names: usize,

    /// Outline sub-activity rows without an enclosing activity
    pub orphan_rows: usize,
}

impl SkipTally {
    pub fn total(&self) -> usize {
        self.rows + self.sub_entries + self.filtered_names + self.orphan_rows
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn merge(&mut self, other: SkipTally) {
        self.rows += other.rows;
        self.sub_entries += other.sub_entries;
        self.filtered_names += other.filtered_names;
        self.orphan_rows += other.orphan_rows;
    }
}

/// Items parsed from one file plus what was dropped on the way
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOutcome<T> {
    pub items: Vec<T>,
    pub skipped: SkipTally,

    /// Non-blank data lines seen after the header
    pub data_lines: usize,
}

impl<T> ParseOutcome<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Result of parsing a file in whichever dialect it was written in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dialect", rename_all = "snake_case")]
pub enum ParsedCsv {
    FlatWithSubActivities(ParseOutcome<Activity>),
    LeveledOutline(ParseOutcome<OutlineRow>),
}

impl ParsedCsv {
    pub fn dialect(&self) -> Dialect {
        match self {
            ParsedCsv::FlatWithSubActivities(_) => Dialect::FlatWithSubActivities,
            ParsedCsv::LeveledOutline(_) => Dialect::LeveledOutline,
        }
    }

    pub fn skipped(&self) -> SkipTally {
        match self {
            ParsedCsv::FlatWithSubActivities(outcome) => outcome.skipped,
            ParsedCsv::LeveledOutline(outcome) => outcome.skipped,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ParsedCsv::FlatWithSubActivities(outcome) => outcome.len(),
            ParsedCsv::LeveledOutline(outcome) => outcome.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
