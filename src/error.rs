use thiserror::Error;

/// Failures the pipeline raises eagerly. Everything softer (unparseable
/// cells, secondary tables without a join key, join misses) is handled in
/// place and never surfaces here.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The raw document could not be read at all.
    #[error("failed to read document '{name}': {reason}")]
    DocumentRead { name: String, reason: String },

    /// The document parsed but contained zero tables.
    #[error("document '{name}' contains no tables")]
    EmptyDocument { name: String },

    /// The merge base lacks the join key.
    #[error("base table '{table}' is missing identity column '{column}'")]
    MissingIdentityColumn { table: String, column: String },

    /// Merge invoked with nothing to merge.
    #[error("no input tables provided")]
    NoInputTables,
}
