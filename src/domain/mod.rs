pub mod error;
pub mod project;

// CSV import/export module
pub mod csv;
