use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A region label outside the five recognised options.
    #[error("Invalid region '{0}': expected one of Global, North America, Europe, Japan, Other")]
    InvalidRegion(String),
}
