pub mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use crate::application::{ActivityMapper, ImportOptions, MappedActivities, ProjectCsvUseCase};
pub use crate::domain::csv::{
    Activity, ActivityType, DecimalSeparator, Dialect, MapperConfig, OutlineRow, ParsedCsv,
    SkipTally, SubActivity,
};
pub use crate::domain::error::{AppError, Result};
pub use crate::domain::project::{
    BlockStatistics, Project, ProjectMetadata, ProjectStatistics, ProjectStatus,
};
pub use crate::infrastructure::config::ConfigService;
pub use crate::infrastructure::repository::{InMemoryProjectRepository, ProjectRepository};
