use crate::model::Track;
use lofty::prelude::*;
use std::ffi::OsStr;
use std::path::Path;
use walkdir::WalkDir;

const AUDIO_EXTENSIONS: &[&str] = &["mp3", "flac", "wav", "ogg", "m4a", "aac", "opus"];
const COVER_FILES: &[&str] = &["cover.jpg", "cover.jpeg", "cover.png", "folder.jpg", "folder.png"];
const UNKNOWN_ARTIST: &str = "Unknown artist";

#[derive(Default)]
struct TrackMetadata {
    title: Option<String>,
    artist: Option<String>,
}

pub fn scan_folder(root: &Path) -> Vec<Track> {
    let mut found = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !entry.file_type().is_file() || !is_audio(path) {
            continue;
        }
        found.push(path.to_path_buf());
    }

    found.sort();
    found.iter().map(|path| track_for(path)).collect()
}

fn track_for(path: &Path) -> Track {
    let metadata = metadata_for(path);
    let title = metadata.title.unwrap_or_else(|| {
        path.file_stem()
            .and_then(OsStr::to_str)
            .unwrap_or("unknown")
            .to_string()
    });

    Track {
        title,
        artist: metadata
            .artist
            .unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
        cover_image: cover_for(path).unwrap_or_default(),
        source: path.to_string_lossy().to_string(),
    }
}

fn metadata_for(path: &Path) -> TrackMetadata {
    let Ok(tagged) = lofty::read_from_path(path) else {
        return TrackMetadata::default();
    };
    let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
        return TrackMetadata::default();
    };

    TrackMetadata {
        title: tag.title().and_then(|value| clean_metadata_value(&value)),
        artist: tag.artist().and_then(|value| clean_metadata_value(&value)),
    }
}

fn cover_for(path: &Path) -> Option<String> {
    let dir = path.parent()?;
    COVER_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
        .map(|candidate| candidate.to_string_lossy().to_string())
}

fn clean_metadata_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn is_audio(path: &Path) -> bool {
    let ext = path.extension().and_then(OsStr::to_str).unwrap_or_default();
    AUDIO_EXTENSIONS
        .iter()
        .any(|supported| ext.eq_ignore_ascii_case(supported))
}
