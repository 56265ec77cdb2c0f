use crate::error::{PlayerError, PlayerResult};
use crate::model::Track;

/// Fixed, ordered track list plus the current position in it.
#[derive(Debug, Clone)]
pub struct PlaylistCursor {
    tracks: Vec<Track>,
    index: usize,
}

impl PlaylistCursor {
    pub fn new(tracks: Vec<Track>) -> PlayerResult<Self> {
        if tracks.is_empty() {
            return Err(PlayerError::EmptyPlaylist);
        }
        Ok(Self { tracks, index: 0 })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn current(&self) -> &Track {
        &self.tracks[self.index]
    }

    pub fn next(&mut self) -> &Track {
        self.index = (self.index + 1) % self.tracks.len();
        self.current()
    }

    pub fn previous(&mut self) -> &Track {
        let len = self.tracks.len();
        self.index = (self.index + len - 1) % len;
        self.current()
    }

    pub fn select(&mut self, index: usize) -> PlayerResult<&Track> {
        if index >= self.tracks.len() {
            return Err(PlayerError::TrackOutOfRange {
                index,
                len: self.tracks.len(),
            });
        }
        self.index = index;
        Ok(self.current())
    }
}
