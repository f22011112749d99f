//! Error type shared by generation, configuration and the demo binary.

use thiserror::Error;

/// Everything that can go wrong while building or loading a city.
///
/// Movement never produces an error: leaving the city bounds is reported
/// through [`crate::player::MoveOutcome::free`].
#[derive(Debug, Error)]
pub enum CityError {
    /// A constructor or generator received parameters it cannot work with
    /// (inverted ranges, non-positive dimensions, empty lists).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A rejection loop ran out of attempts, e.g. every treasure candidate
    /// lies on the outer ring of a degenerate grid.
    #[error("generation invariant violated: {0}")]
    GenerationInvariantViolation(String),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CityError>;

impl CityError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
