// ============================================================
// MAPPER CONFIGURATION
// ============================================================
// Knobs for decoding, number handling, and outline assembly

use serde::{Deserialize, Serialize};

use super::DecimalSeparator;

/// Marker activity that opens a new schedule block in outline files
pub const DEFAULT_BLOCK_MARKER: &str = "Pátio de Alimentação";

/// How raw bytes are turned into text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingPolicy {
    /// Reject anything that is not valid UTF-8 (BOMs honoured)
    Utf8Only,

    /// Fall back to Windows-1252 (a Latin-1 superset) for invalid UTF-8
    #[default]
    Utf8WithLatin1Fallback,
}

/// What happens to a percentage outside 0..=100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutOfRangePolicy {
    /// Coerce to 0, same as an unparseable value
    #[default]
    Zero,

    /// Clamp into 0..=100
    Clamp,
}

/// Configuration for CSV import/export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    pub encoding: EncodingPolicy,

    /// Decimal separator accepted when parsing (Comma also accepts dots)
    pub parse_decimal: DecimalSeparator,

    /// Decimal separator written by flat exports (default: dot)
    pub flat_export_decimal: DecimalSeparator,

    /// Decimal separator written by outline exports (default: comma)
    pub outline_export_decimal: DecimalSeparator,

    pub out_of_range: OutOfRangePolicy,

    /// Run the name filter over outline-derived names (default: true)
    pub clean_outline_names: bool,

    /// Run the name filter over flat names (default: false)
    pub clean_flat_names: bool,

    /// Keep outline activities that collected no sub-activities (default: false)
    pub keep_empty_activities: bool,

    /// Split outline activities into shutdown/maintenance/startup blocks (default: true)
    pub split_blocks: bool,

    /// Activity name that opens a new block
    pub block_marker: String,

    /// Dashboard column value that flags a row
    pub dashboard_marker: String,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            encoding: EncodingPolicy::default(),
            parse_decimal: DecimalSeparator::Comma,
            flat_export_decimal: DecimalSeparator::Dot,
            outline_export_decimal: DecimalSeparator::Comma,
            out_of_range: OutOfRangePolicy::default(),
            clean_outline_names: true,
            clean_flat_names: false,
            keep_empty_activities: false,
            split_blocks: true,
            block_marker: DEFAULT_BLOCK_MARKER.to_string(),
            dashboard_marker: "S".to_string(),
        }
    }
}

impl MapperConfig {
    /// Config that leaves names and values exactly as written
    pub fn verbatim() -> Self {
        Self {
            clean_outline_names: false,
            clean_flat_names: false,
            keep_empty_activities: true,
            split_blocks: false,
            ..Default::default()
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.block_marker.trim().is_empty() {
            return Err("block_marker must not be empty".to_string());
        }
        if self.dashboard_marker.trim().is_empty() {
            return Err("dashboard_marker must not be empty".to_string());
        }
        if self.dashboard_marker.contains([';', ',', '\n']) {
            return Err("dashboard_marker must not contain delimiters".to_string());
        }
        Ok(())
    }

    /// Whether a Dashboard column value flags the row
    pub fn is_dashboard_flag(&self, value: &str) -> bool {
        value.trim().eq_ignore_ascii_case(self.dashboard_marker.trim())
    }
}
