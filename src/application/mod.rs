pub mod use_cases;

pub use use_cases::activity_mapper::{ActivityMapper, ImportOptions, MappedActivities};
pub use use_cases::block_splitter::assign_blocks;
pub use use_cases::outline_assembler::{activities_to_outline, OutlineAssembler, OutlineAssembly};
pub use use_cases::project_csv::{ExportedCsv, ProjectCsvUseCase, CSV_CONTENT_TYPE};
