use serde::{Deserialize, Serialize};

pub const DEFAULT_VOLUME: f32 = 0.7;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Track {
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub cover_image: String,
    pub source: String,
}

impl Track {
    pub fn new(title: &str, artist: &str, cover_image: &str, source: &str) -> Self {
        Self {
            title: title.to_string(),
            artist: artist.to_string(),
            cover_image: cover_image.to_string(),
            source: source.to_string(),
        }
    }
}

/// The studio's bundled background track, used when no playlist is configured.
pub fn default_tracks() -> Vec<Track> {
    vec![Track::new(
        "Rockking around here",
        "Alex Grohl",
        "music/albumCover/AlexGrohl.jpeg",
        "music/electronic-rock-king-around-here.mp3",
    )]
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub current_track_index: usize,
    pub elapsed: f64,
    pub duration: Option<f64>,
    pub is_playing: bool,
    pub volume: f32,
    pub is_muted: bool,
}

impl PlaybackState {
    pub fn new(current_track_index: usize, volume: f32) -> Self {
        Self {
            current_track_index,
            elapsed: 0.0,
            duration: None,
            is_playing: false,
            volume: volume.clamp(0.0, 1.0),
            is_muted: false,
        }
    }

    pub fn set_elapsed(&mut self, seconds: f64) {
        let seconds = if seconds.is_finite() { seconds } else { 0.0 };
        self.elapsed = match self.duration {
            Some(duration) => seconds.clamp(0.0, duration),
            None => seconds.max(0.0),
        };
    }

    pub fn set_duration(&mut self, seconds: Option<f64>) {
        self.duration = seconds.filter(|value| value.is_finite() && *value > 0.0);
        let elapsed = self.elapsed;
        self.set_elapsed(elapsed);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsentState {
    #[default]
    Unset,
    Granted,
    Denied,
}

impl ConsentState {
    pub fn from_stored(value: &str) -> Option<Self> {
        match value.trim() {
            "true" => Some(Self::Granted),
            "false" => Some(Self::Denied),
            _ => None,
        }
    }

    pub fn stored_value(self) -> Option<&'static str> {
        match self {
            Self::Unset => None,
            Self::Granted => Some("true"),
            Self::Denied => Some("false"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    pub shown: bool,
    pub user_dismissed: bool,
}

impl Default for Visibility {
    fn default() -> Self {
        Self {
            shown: true,
            user_dismissed: false,
        }
    }
}

/// Everything the presentational widget needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerView {
    pub track: Track,
    pub track_index: usize,
    pub track_count: usize,
    pub current_time: f64,
    pub duration: Option<f64>,
    pub is_playing: bool,
    pub volume: f32,
    pub is_muted: bool,
    pub visible: bool,
    pub dismissed: bool,
    pub prompt_visible: bool,
    pub reopen_visible: bool,
    pub load_error: Option<String>,
}
