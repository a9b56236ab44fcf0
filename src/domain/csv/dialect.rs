// ============================================================
// CSV DIALECTS
// ============================================================
// The two column layouts accepted on import and produced on export

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Header written for the flat dialect
pub const FLAT_HEADER: [&str; 4] = ["name", "value", "baseline", "sub_activities"];

/// Header written for the leveled outline dialect
pub const OUTLINE_HEADER: [&str; 5] = [
    "Nome",
    "Nível_da_estrutura_de_tópicos",
    "Dashboard",
    "Porcentagem_Prev_Real",
    "Porcentagem_Prev_LB",
];

/// Column layout of a CSV file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// `name,progress,baseline,subName:real|planned; ...`
    /// One activity per row, sub-activities inline in the trailing fields
    FlatWithSubActivities,

    /// `Nome;Nível;Dashboard;Real;LB`
    /// One outline node per row with an explicit hierarchy level
    LeveledOutline,
}

impl Dialect {
    /// Field delimiter used by this dialect
    pub fn delimiter(&self) -> u8 {
        match self {
            Dialect::FlatWithSubActivities => b',',
            Dialect::LeveledOutline => b';',
        }
    }

    /// Fixed header line (without terminator) written on export
    pub fn header_line(&self) -> String {
        let delimiter = char::from(self.delimiter()).to_string();
        match self {
            Dialect::FlatWithSubActivities => FLAT_HEADER.join(&delimiter),
            Dialect::LeveledOutline => OUTLINE_HEADER.join(&delimiter),
        }
    }

    /// Detect the dialect from the header line.
    ///
    /// More `;` than `,` means the leveled outline; ties go to the flat dialect.
    pub fn detect(content: &str) -> Dialect {
        let header = content
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("");

        let semicolons = header.matches(';').count();
        let commas = header.matches(',').count();

        if semicolons > commas {
            Dialect::LeveledOutline
        } else {
            Dialect::FlatWithSubActivities
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::FlatWithSubActivities => write!(f, "flat"),
            Dialect::LeveledOutline => write!(f, "outline"),
        }
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" | "flat_with_sub_activities" => Ok(Dialect::FlatWithSubActivities),
            "outline" | "leveled_outline" => Ok(Dialect::LeveledOutline),
            other => Err(format!("unknown dialect '{}'", other)),
        }
    }
}

/// Decimal separator used for numeric fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecimalSeparator {
    /// `45.5`
    #[default]
    Dot,
    /// `45,5`
    Comma,
}
