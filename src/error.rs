use thiserror::Error;

use crate::slope::SlopeKind;

/// Configuration errors raised while building slopes or rule tables.
///
/// None of these are fatal: the public conversion entry points log them and
/// carry on treating the affected tile as non-sloped.
#[derive(Debug, Error)]
pub enum SlopeError {
    #[error("unknown slope type '{0}'")]
    UnknownSlopeType(String),
    #[error("slope type {0:?} has no definition")]
    UndefinedSlope(SlopeKind),
    #[error("unknown tileset mapping type '{0}'")]
    UnknownMapping(String),
    #[error("unknown overlap direction '{0}'")]
    UnknownDirection(String),
    #[error("undefined vertex map location '{0}'")]
    UnknownVertexLocation(String),
    #[error("invalid slope mapping: {0}")]
    InvalidMapping(#[from] serde_json::Error),
}
