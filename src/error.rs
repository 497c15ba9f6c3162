//! Error types for sodyn.

use thiserror::Error;

/// Error type for filter construction and stepping.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum Error {
    #[error("Invalid frequency: {0}. Must be finite and greater than zero")]
    InvalidFrequency(f32),

    #[error("Invalid delta time: {0}. Must be finite and greater than zero")]
    InvalidDeltaTime(f32),
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
