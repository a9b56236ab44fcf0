use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::csv::{Activity, ActivityType, Dialect, SkipTally};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Draft,
    Active,
    Completed,
}

impl ProjectStatus {
    pub fn from_average_progress(average: f64) -> Self {
        if average >= 100.0 {
            ProjectStatus::Completed
        } else if average > 0.0 {
            ProjectStatus::Active
        } else {
            ProjectStatus::Draft
        }
    }
}

/// Where the current activity list came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    pub csv_file_name: String,
    pub upload_date: DateTime<Utc>,
    pub total_activities: usize,
    pub total_sub_activities: usize,
    pub dialect: Dialect,
    #[serde(default)]
    pub skipped_fragments: SkipTally,
}

impl ProjectMetadata {
    pub fn describe(
        csv_file_name: impl Into<String>,
        upload_date: DateTime<Utc>,
        activities: &[Activity],
        dialect: Dialect,
        skipped_fragments: SkipTally,
    ) -> Self {
        Self {
            csv_file_name: csv_file_name.into(),
            upload_date,
            total_activities: activities.len(),
            total_sub_activities: count_sub_activities(activities),
            dialect,
            skipped_fragments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub activities: Vec<Activity>,
    pub metadata: ProjectMetadata,
}

impl Project {
    pub fn statistics(&self) -> ProjectStatistics {
        ProjectStatistics::from_activities(&self.activities)
    }

    pub fn status(&self) -> ProjectStatus {
        ProjectStatus::from_average_progress(self.statistics().average_progress)
    }
}

/// Figures for one schedule block
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockStatistics {
    pub total: usize,
    pub completed: usize,

    /// Mean activity progress in the block, rounded to 2 decimals
    pub average_progress: f64,
}

impl BlockStatistics {
    fn from_block(activities: &[&Activity]) -> Self {
        let average_progress = if activities.is_empty() {
            0.0
        } else {
            let total: f64 = activities.iter().map(|a| a.progress).sum();
            round_2(total / activities.len() as f64)
        };

        Self {
            total: activities.len(),
            completed: activities.iter().filter(|a| a.is_completed()).count(),
            average_progress,
        }
    }
}

/// Aggregate figures shown on the project dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStatistics {
    pub total_activities: usize,
    pub total_sub_activities: usize,
    pub completed_activities: usize,

    /// Block averages weighted by block size, rounded to 2 decimals
    pub average_progress: f64,

    /// Only blocks that hold at least one activity
    pub per_type: BTreeMap<ActivityType, BlockStatistics>,
}

impl ProjectStatistics {
    pub fn from_activities(activities: &[Activity]) -> Self {
        let mut blocks: BTreeMap<ActivityType, Vec<&Activity>> = BTreeMap::new();
        for activity in activities {
            blocks.entry(activity.activity_type).or_default().push(activity);
        }

        let per_type: BTreeMap<ActivityType, BlockStatistics> = blocks
            .iter()
            .map(|(activity_type, block)| (*activity_type, BlockStatistics::from_block(block)))
            .collect();

        let weighted: f64 = per_type
            .values()
            .map(|block| block.average_progress * block.total as f64)
            .sum();
        let average_progress = if activities.is_empty() {
            0.0
        } else {
            round_2(weighted / activities.len() as f64)
        };

        Self {
            total_activities: activities.len(),
            total_sub_activities: count_sub_activities(activities),
            completed_activities: per_type.values().map(|block| block.completed).sum(),
            average_progress,
            per_type,
        }
    }
}

pub fn count_sub_activities(activities: &[Activity]) -> usize {
    activities.iter().map(|a| a.sub_activities.len()).sum()
}

fn round_2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
