use thiserror::Error;

/// Errors the session surfaces to its host. Everything else (engine, autoplay,
/// persistence) is contained inside the session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlayerError {
    #[error("playlist is empty; at least one track must be configured")]
    EmptyPlaylist,

    #[error("track index {index} is out of range for a playlist of {len}")]
    TrackOutOfRange { index: usize, len: usize },
}

pub type PlayerResult<T> = Result<T, PlayerError>;
