// ============================================================
// COMMAND LINE INTERFACE
// ============================================================
// `epu-csv parse` and `epu-csv export`

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::{ActivityMapper, ImportOptions, ProjectCsvUseCase};
use crate::domain::csv::{Activity, ActivityType, Dialect, MapperConfig};
use crate::domain::error::{AppError, Result};
use crate::domain::project::{Project, ProjectStatistics, ProjectStatus};
use crate::infrastructure::config::{ConfigService, DEFAULT_CONFIG_FILE};
use crate::infrastructure::repository::InMemoryProjectRepository;

/// Import and export EPU schedule CSV files
#[derive(Parser, Debug)]
#[command(name = "epu-csv")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Mapper settings file
    #[arg(long, global = true, env = "EPU_CSV_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a CSV file and print the project as JSON
    Parse(ParseArgs),

    /// Print project JSON (or an activity list) as CSV
    Export(ExportArgs),
}

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// CSV file to import
    pub file: PathBuf,

    #[arg(long, value_enum, default_value_t = DialectArg::Auto)]
    pub dialect: DialectArg,

    /// Type given to flat file activities (parada, manutencao, partida, geral)
    #[arg(long = "type", default_value = "geral")]
    pub activity_type: ActivityType,

    /// Project name; defaults to the outline title or the file stem
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// JSON file holding a project or an array of activities
    pub file: PathBuf,

    #[arg(long, value_enum, default_value_t = DialectArg::Flat)]
    pub dialect: DialectArg,

    /// Write one flat file per activity type into DIR instead of printing
    #[arg(long, value_name = "DIR")]
    pub by_type: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DialectArg {
    /// Detect from the header line
    Auto,
    Flat,
    Outline,
}

impl DialectArg {
    pub fn dialect(self) -> Option<Dialect> {
        match self {
            DialectArg::Auto => None,
            DialectArg::Flat => Some(Dialect::FlatWithSubActivities),
            DialectArg::Outline => Some(Dialect::LeveledOutline),
        }
    }
}

/// What `parse` prints
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseReport<'a> {
    #[serde(flatten)]
    pub project: &'a Project,
    pub statistics: ProjectStatistics,
    pub status: ProjectStatus,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExportSource {
    Project(Project),
    Activities(Vec<Activity>),
}

impl Cli {
    /// Run the selected command and return what goes to stdout
    pub async fn execute(&self) -> Result<String> {
        let config = ConfigService::with_path(&self.config).load()?;
        tracing::debug!("Mapper config: {:?}", config);

        match &self.command {
            Command::Parse(args) => parse(args, config).await,
            Command::Export(args) => export(args, config),
        }
    }
}

async fn parse(args: &ParseArgs, config: MapperConfig) -> Result<String> {
    let bytes = std::fs::read(&args.file)?;
    let file_name = file_name(&args.file);

    let mut options = ImportOptions::default()
        .with_activity_type(args.activity_type)
        .with_fallback_name(file_stem(&args.file));
    if let Some(dialect) = args.dialect.dialect() {
        options = options.with_dialect(dialect);
    }

    let use_case = ProjectCsvUseCase::new(
        Arc::new(InMemoryProjectRepository::new()),
        ActivityMapper::new(config),
    );
    let name = args.name.clone().unwrap_or_default();
    let project = use_case.import_new(&name, &file_name, &bytes, &options).await?;

    let report = ParseReport {
        statistics: project.statistics(),
        status: project.status(),
        project: &project,
    };
    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    Ok(json)
}

fn export(args: &ExportArgs, config: MapperConfig) -> Result<String> {
    let content = std::fs::read_to_string(&args.file)?;
    let (title, activities) = match serde_json::from_str::<ExportSource>(&content)? {
        ExportSource::Project(project) => (Some(project.name), project.activities),
        ExportSource::Activities(activities) => (None, activities),
    };

    let dialect = args.dialect.dialect().ok_or_else(|| {
        AppError::ValidationError("Export needs an explicit dialect (flat or outline).".to_string())
    })?;
    let mapper = ActivityMapper::new(config);

    match &args.by_type {
        Some(dir) => export_by_type(&mapper, &activities, dialect, dir),
        None => mapper.export(&activities, dialect, title.as_deref()),
    }
}

/// Write `<type>.csv` per block present; returns the written paths, one per line
fn export_by_type(
    mapper: &ActivityMapper,
    activities: &[Activity],
    dialect: Dialect,
    dir: &Path,
) -> Result<String> {
    if dialect != Dialect::FlatWithSubActivities {
        return Err(AppError::ValidationError(
            "--by-type writes the flat dialect only.".to_string(),
        ));
    }

    std::fs::create_dir_all(dir)?;
    let mut written = String::new();
    for (activity_type, content) in mapper.export_flat_by_type(activities)? {
        let path = dir.join(format!("{}.csv", activity_type));
        std::fs::write(&path, content)?;
        tracing::info!("Wrote {} activities to {}", activity_type, path.display());
        written.push_str(&format!("{}\n", path.display()));
    }
    Ok(written)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.trim().is_empty())
        .unwrap_or_else(|| "project".to_string())
}
