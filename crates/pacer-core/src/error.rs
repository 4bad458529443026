//! Errors surfaced by the few fallible conveniences of the core.

use thiserror::Error;

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum PacerError {
    /// Segmentation produced no units.
    #[error("no readable text supplied")]
    EmptyText,

    #[error("unknown cadence profile `{0}` (expected `normal` or `strong`)")]
    UnknownCadenceProfile(String),
}

pub type PacerResult<T> = Result<T, PacerError>;
