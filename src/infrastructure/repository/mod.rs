pub mod memory;

use crate::domain::csv::Activity;
use crate::domain::error::Result;
use crate::domain::project::{Project, ProjectMetadata};
use async_trait::async_trait;

pub use memory::InMemoryProjectRepository;

/// Project fields supplied by the caller; the repository assigns the id
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub name: String,
    pub activities: Vec<Activity>,
    pub metadata: ProjectMetadata,
}

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create(&self, project: NewProject) -> Result<Project>;

    /// `NotFound` when no project has `id`
    async fn get(&self, id: &str) -> Result<Project>;

    /// Replace the whole activity list and its metadata
    async fn replace_activities(
        &self,
        id: &str,
        activities: Vec<Activity>,
        metadata: ProjectMetadata,
    ) -> Result<Project>;
}
