use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::activity_mapper::{ActivityMapper, ImportOptions, MappedActivities};
use crate::domain::csv::Dialect;
use crate::domain::error::{AppError, Result};
use crate::domain::project::{Project, ProjectMetadata};
use crate::infrastructure::repository::{NewProject, ProjectRepository};

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// CSV file ready to be sent as a download
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedCsv {
    pub file_name: String,
    pub content_type: String,
    pub content: String,
}

/// Import/export of project activities through CSV files
pub struct ProjectCsvUseCase {
    repository: Arc<dyn ProjectRepository>,
    mapper: ActivityMapper,
}

impl ProjectCsvUseCase {
    pub fn new(repository: Arc<dyn ProjectRepository>, mapper: ActivityMapper) -> Self {
        Self { repository, mapper }
    }

    /// Create a project from an uploaded CSV file
    pub async fn import_new(
        &self,
        name: &str,
        file_name: &str,
        bytes: &[u8],
        options: &ImportOptions,
    ) -> Result<Project> {
        let mapped = self.mapper.map_bytes(bytes, options)?;

        let name = match name.trim() {
            "" => mapped
                .title
                .clone()
                .or_else(|| options.fallback_name.clone())
                .filter(|name| !name.trim().is_empty())
                .ok_or_else(|| AppError::ValidationError("Project name is required.".to_string()))?,
            name => name.to_string(),
        };

        let metadata = describe(file_name, &mapped);
        let project = self
            .repository
            .create(NewProject {
                name,
                activities: mapped.activities,
                metadata,
            })
            .await?;

        tracing::info!(
            "Imported project {} ({}) from {}: {} activities, {} sub-activities",
            project.id,
            project.name,
            file_name,
            project.metadata.total_activities,
            project.metadata.total_sub_activities
        );
        Ok(project)
    }

    /// Replace every activity of an existing project with the file's content
    pub async fn replace_activities(
        &self,
        project_id: &str,
        file_name: &str,
        bytes: &[u8],
        options: &ImportOptions,
    ) -> Result<Project> {
        // fail before parsing when the target does not exist
        self.repository.get(project_id).await?;

        let mapped = self.mapper.map_bytes(bytes, options)?;
        let metadata = describe(file_name, &mapped);
        let project = self
            .repository
            .replace_activities(project_id, mapped.activities, metadata)
            .await?;

        tracing::info!(
            "Replaced activities of project {} from {}: {} activities",
            project.id,
            file_name,
            project.metadata.total_activities
        );
        Ok(project)
    }

    /// Render a project's activities as a CSV download
    pub async fn export(&self, project_id: &str, dialect: Dialect) -> Result<ExportedCsv> {
        let project = self.repository.get(project_id).await?;
        let content = self
            .mapper
            .export(&project.activities, dialect, Some(&project.name))?;

        Ok(ExportedCsv {
            file_name: export_file_name(&project.name, dialect),
            content_type: CSV_CONTENT_TYPE.to_string(),
            content,
        })
    }
}

fn describe(file_name: &str, mapped: &MappedActivities) -> ProjectMetadata {
    ProjectMetadata::describe(
        file_name,
        Utc::now(),
        &mapped.activities,
        mapped.dialect,
        mapped.skipped,
    )
}

/// `Parada EPU 2025` -> `parada-epu-2025-flat.csv`
fn export_file_name(project_name: &str, dialect: Dialect) -> String {
    let slug = project_name
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    let slug = if slug.is_empty() { "project".to_string() } else { slug };
    format!("{}-{}.csv", slug, dialect)
}
