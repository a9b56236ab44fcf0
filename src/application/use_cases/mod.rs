pub mod activity_mapper;
pub mod block_splitter;
pub mod outline_assembler;
pub mod project_csv;
