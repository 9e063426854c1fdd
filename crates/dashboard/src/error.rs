use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    InvalidRegion(#[from] core_types::CoreError),

    #[error("The sales database is unavailable: {0}")]
    StoreUnavailable(#[from] database::DbError),
}
