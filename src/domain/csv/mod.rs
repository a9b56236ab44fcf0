// ============================================================
// CSV DOMAIN LAYER
// ============================================================
// Core types and value objects for CSV import/export
// No I/O, no async

mod activity;
mod csv_row;
mod dialect;
mod mapper_config;

pub use activity::{Activity, ActivityType, SubActivity};
pub use csv_row::{OutlineRow, ParseOutcome, ParsedCsv, SkipTally};
pub use dialect::{DecimalSeparator, Dialect, FLAT_HEADER, OUTLINE_HEADER};
pub use mapper_config::{EncodingPolicy, MapperConfig, OutOfRangePolicy, DEFAULT_BLOCK_MARKER};
