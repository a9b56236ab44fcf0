// ============================================================
// ACTIVITY TYPES
// ============================================================
// Nested activity / sub-activity structures carried by a project

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Block an activity belongs to in the shutdown/maintenance/startup schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum ActivityType {
    /// Shutdown procedure
    #[serde(rename = "parada")]
    Shutdown,

    /// Maintenance window
    #[serde(rename = "manutencao")]
    Maintenance,

    /// Startup procedure
    #[serde(rename = "partida")]
    Startup,

    /// Not assigned to a block
    #[default]
    #[serde(rename = "geral")]
    General,
}

impl ActivityType {
    pub const ALL: [ActivityType; 4] = [
        ActivityType::Shutdown,
        ActivityType::Maintenance,
        ActivityType::Startup,
        ActivityType::General,
    ];

    /// Stored document value
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Shutdown => "parada",
            ActivityType::Maintenance => "manutencao",
            ActivityType::Startup => "partida",
            ActivityType::General => "geral",
        }
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "parada" | "shutdown" => Ok(ActivityType::Shutdown),
            "manutencao" | "manutenção" | "maintenance" => Ok(ActivityType::Maintenance),
            "partida" | "startup" => Ok(ActivityType::Startup),
            "geral" | "general" => Ok(ActivityType::General),
            other => Err(format!("unknown activity type '{}'", other)),
        }
    }
}

/// Leaf-level task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubActivity {
    pub name: String,

    /// Actual completion percentage (0-100)
    pub progress: f64,

    /// Planned completion percentage (0-100)
    pub baseline: f64,
}

impl SubActivity {
    pub fn new(name: impl Into<String>, progress: f64, baseline: f64) -> Self {
        Self {
            name: name.into(),
            progress,
            baseline,
        }
    }
}

/// Top-level task with ordered sub-activities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub name: String,

    /// Actual completion percentage (0-100)
    pub progress: f64,

    /// Planned completion percentage (0-100)
    pub baseline: f64,

    #[serde(rename = "type", default)]
    pub activity_type: ActivityType,

    #[serde(default)]
    pub sub_activities: Vec<SubActivity>,
}

impl Activity {
    pub fn new(name: impl Into<String>, progress: f64, baseline: f64) -> Self {
        Self {
            name: name.into(),
            progress,
            baseline,
            activity_type: ActivityType::default(),
            sub_activities: Vec::new(),
        }
    }

    pub fn with_type(mut self, activity_type: ActivityType) -> Self {
        self.activity_type = activity_type;
        self
    }

    pub fn with_sub_activities(mut self, sub_activities: Vec<SubActivity>) -> Self {
        self.sub_activities = sub_activities;
        self
    }

    pub fn is_completed(&self) -> bool {
        self.progress >= 100.0
    }
}
