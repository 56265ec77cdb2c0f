pub mod app;
pub mod audio;
pub mod config;
pub mod consent;
pub mod error;
pub mod library;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod playlist;
pub mod resume;
pub mod session;
pub mod ui;

pub use error::{PlayerError, PlayerResult};
pub use session::{PlaybackSession, SessionSettings, SessionSlot};
