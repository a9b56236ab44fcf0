use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{NewProject, ProjectRepository};
use crate::domain::csv::Activity;
use crate::domain::error::{AppError, Result};
use crate::domain::project::{Project, ProjectMetadata};

/// Process-local project store, in creation order
#[derive(Default)]
pub struct InMemoryProjectRepository {
    projects: RwLock<Vec<Project>>,
}

impl InMemoryProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn create(&self, project: NewProject) -> Result<Project> {
        let project = Project {
            id: Uuid::new_v4().to_string(),
            name: project.name,
            activities: project.activities,
            metadata: project.metadata,
        };

        self.projects.write().await.push(project.clone());
        Ok(project)
    }

    async fn get(&self, id: &str) -> Result<Project> {
        self.projects
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Project {} not found", id)))
    }

    async fn replace_activities(
        &self,
        id: &str,
        activities: Vec<Activity>,
        metadata: ProjectMetadata,
    ) -> Result<Project> {
        let mut projects = self.projects.write().await;
        let project = projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Project {} not found", id)))?;

        project.activities = activities;
        project.metadata = metadata;
        Ok(project.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::csv::{Dialect, SkipTally};
    use chrono::Utc;

    fn new_project(name: &str, activities: Vec<Activity>) -> NewProject {
        let metadata = ProjectMetadata::describe(
            "a.csv",
            Utc::now(),
            &activities,
            Dialect::FlatWithSubActivities,
            SkipTally::default(),
        );
        NewProject {
            name: name.to_string(),
            activities,
            metadata,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryProjectRepository::new();
        let created = repo
            .create(new_project("EPU", vec![Activity::new("Forno", 1.0, 2.0)]))
            .await
            .unwrap();

        assert!(!created.id.is_empty());
        let fetched = repo.get(&created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_replace_activities_is_wholesale() {
        let repo = InMemoryProjectRepository::new();
        let created = repo
            .create(new_project(
                "EPU",
                vec![Activity::new("Forno", 1.0, 2.0), Activity::new("Secagem", 3.0, 4.0)],
            ))
            .await
            .unwrap();

        let replacement = new_project("ignored", vec![Activity::new("Mistura", 5.0, 6.0)]);
        let updated = repo
            .replace_activities(&created.id, replacement.activities, replacement.metadata)
            .await
            .unwrap();

        assert_eq!(updated.name, "EPU");
        assert_eq!(updated.activities.len(), 1);
        assert_eq!(updated.activities[0].name, "Mistura");
        assert_eq!(updated.metadata.total_activities, 1);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let repo = InMemoryProjectRepository::new();
        assert!(matches!(repo.get("missing").await, Err(AppError::NotFound(_))));

        let replacement = new_project("x", Vec::new());
        let result = repo
            .replace_activities("missing", replacement.activities, replacement.metadata)
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
