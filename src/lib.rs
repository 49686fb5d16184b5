//! Squad-export ingestion: normalize semi-structured HTML/CSV squad stat
//! dumps into typed tables and merge them into one wide per-player table.

pub mod basic;
pub mod clean;
pub mod error;
pub mod html_tables;
pub mod ingest;
pub mod merge;
pub mod parse;
pub mod persist;
pub mod table;

pub use error::PipelineError;
pub use table::{Cell, Column, Table};
