use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to open the sales database at {}: {source}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: duckdb::Error,
    },

    #[error("The sales database has no '{0}' table.")]
    MissingTable(&'static str),

    #[error("A query against the sales database failed: {0}")]
    QueryError(#[from] duckdb::Error),

    #[error("Failed to close the database connection: {0}")]
    CloseError(String),
}
