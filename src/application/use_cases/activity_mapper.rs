// ============================================================
// ACTIVITY MAPPER USE CASE
// ============================================================
// Orchestrate decoding, dialect selection, parsing, and export

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::block_splitter::assign_blocks;
use super::outline_assembler::{activities_to_outline, OutlineAssembler};
use crate::domain::csv::{
    Activity, ActivityType, Dialect, MapperConfig, OutlineRow, ParseOutcome, ParsedCsv, SkipTally,
};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::csv::{decode_text, FlatActivityCodec, OutlineCodec};

/// Caller choices for one import
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOptions {
    /// `None` detects the dialect from the header line
    #[serde(default)]
    pub dialect: Option<Dialect>,

    /// Type given to every activity of a flat file
    #[serde(default)]
    pub activity_type: ActivityType,

    /// Project name used when neither the caller nor an outline title supplies one
    #[serde(default)]
    pub fallback_name: Option<String>,
}

impl ImportOptions {
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    pub fn with_activity_type(mut self, activity_type: ActivityType) -> Self {
        self.activity_type = activity_type;
        self
    }

    pub fn with_fallback_name(mut self, name: impl Into<String>) -> Self {
        self.fallback_name = Some(name.into());
        self
    }
}

/// Activities produced from one file, whatever its dialect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappedActivities {
    pub dialect: Dialect,

    /// Outline title (level 1 row), outline files only
    pub title: Option<String>,

    pub activities: Vec<Activity>,
    pub skipped: SkipTally,
}

/// CSV import/export entry point
pub struct ActivityMapper {
    config: MapperConfig,
}

impl ActivityMapper {
    pub fn new(config: MapperConfig) -> Self {
        Self { config }
    }

    /// Create with default configuration
    pub fn default_config() -> Self {
        Self::new(MapperConfig::default())
    }

    /// Decode uploaded bytes into text
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        Ok(decode_text(bytes, self.config.encoding)?.text)
    }

    /// Parse text in the given dialect, or the detected one when `None`
    pub fn parse(
        &self,
        content: &str,
        dialect: Option<Dialect>,
        activity_type: ActivityType,
    ) -> Result<ParsedCsv> {
        self.validate_config()?;

        let dialect = dialect.unwrap_or_else(|| Dialect::detect(content));
        let parsed = match dialect {
            Dialect::FlatWithSubActivities => {
                ParsedCsv::FlatWithSubActivities(self.parse_flat(content, activity_type)?)
            }
            Dialect::LeveledOutline => ParsedCsv::LeveledOutline(self.parse_outline(content)?),
        };

        tracing::info!(
            "Parsed {} CSV: {} item(s), {} fragment(s) skipped",
            dialect,
            parsed.len(),
            parsed.skipped().total()
        );
        Ok(parsed)
    }

    /// Parse the flat dialect
    pub fn parse_flat(&self, content: &str, activity_type: ActivityType) -> Result<ParseOutcome<Activity>> {
        FlatActivityCodec::new(&self.config).parse(content, activity_type)
    }

    /// Parse the leveled outline dialect into raw rows
    pub fn parse_outline(&self, content: &str) -> Result<ParseOutcome<OutlineRow>> {
        OutlineCodec::new(&self.config).parse(content)
    }

    /// Turn a parse result into activities.
    ///
    /// Flat files map one-to-one. Outline rows are assembled and, when
    /// enabled, split into shutdown/maintenance/startup blocks.
    pub fn into_activities(&self, parsed: ParsedCsv) -> MappedActivities {
        match parsed {
            ParsedCsv::FlatWithSubActivities(outcome) => MappedActivities {
                dialect: Dialect::FlatWithSubActivities,
                title: None,
                activities: outcome.items,
                skipped: outcome.skipped,
            },
            ParsedCsv::LeveledOutline(outcome) => {
                let assembly = OutlineAssembler::new(&self.config).assemble(&outcome.items);
                let mut activities = assembly.activities;
                if self.config.split_blocks {
                    assign_blocks(&mut activities, &self.config.block_marker);
                }

                let mut skipped = outcome.skipped;
                skipped.merge(assembly.skipped);

                MappedActivities {
                    dialect: Dialect::LeveledOutline,
                    title: assembly.title,
                    activities,
                    skipped,
                }
            }
        }
    }

    /// Decode, parse and map uploaded bytes
    pub fn map_bytes(&self, bytes: &[u8], options: &ImportOptions) -> Result<MappedActivities> {
        let content = self.decode(bytes)?;
        let parsed = self.parse(&content, options.dialect, options.activity_type)?;
        let mapped = self.into_activities(parsed);

        if !mapped.skipped.is_empty() {
            tracing::warn!(
                "CSV import dropped {} fragment(s): {:?}",
                mapped.skipped.total(),
                mapped.skipped
            );
        }
        Ok(mapped)
    }

    /// Export activities in `dialect` using the configured decimal separator
    pub fn export(&self, activities: &[Activity], dialect: Dialect, title: Option<&str>) -> Result<String> {
        match dialect {
            Dialect::FlatWithSubActivities => self.export_flat(activities),
            Dialect::LeveledOutline => self.export_outline(&activities_to_outline(title, activities)),
        }
    }

    /// Flat dialect export
    pub fn export_flat(&self, activities: &[Activity]) -> Result<String> {
        FlatActivityCodec::new(&self.config).write(activities, self.config.flat_export_decimal)
    }

    /// One flat file per activity type present, in type order
    pub fn export_flat_by_type(&self, activities: &[Activity]) -> Result<BTreeMap<ActivityType, String>> {
        let mut files = BTreeMap::new();

        for activity_type in ActivityType::ALL {
            let block: Vec<Activity> = activities
                .iter()
                .filter(|a| a.activity_type == activity_type)
                .cloned()
                .collect();
            if !block.is_empty() {
                files.insert(activity_type, self.export_flat(&block)?);
            }
        }

        Ok(files)
    }

    /// Leveled outline export
    pub fn export_outline(&self, rows: &[OutlineRow]) -> Result<String> {
        OutlineCodec::new(&self.config).write(rows, self.config.outline_export_decimal)
    }

    fn validate_config(&self) -> Result<()> {
        self.config
            .validate()
            .map_err(|e| AppError::ValidationError(format!("Invalid mapper config: {}", e)))
    }
}

impl Default for ActivityMapper {
    fn default() -> Self {
        Self::default_config()
    }
}
