//! Best-effort durable mirror of the minimal session state.
//!
//! The store is never the source of truth for playing/paused: a fresh
//! activation always starts paused and waits for an explicit play.

use anyhow::{Context, Result};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::model::ConsentState;

pub const KEY_POSITION: &str = "audioPosition";
pub const KEY_CONSENT: &str = "audioConsent";
pub const KEY_PLAYER_CLOSED: &str = "playerClosed";
pub const KEY_TRACK_INDEX: &str = "currentTrackIndex";

pub const DEFAULT_POSITION_SAVE_INTERVAL: Duration = Duration::from_secs(5);

/// Per-profile string key/value store.
pub trait SessionStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: &[(&str, &str)]) -> Self {
        let store = Self::new();
        {
            let mut map = store.entries.borrow_mut();
            for (key, value) in entries {
                map.insert((*key).to_string(), (*value).to_string());
            }
        }
        store
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.value(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// A JSON object on disk, rewritten on every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    pub fn open(path: &Path) -> Result<Self> {
        let entries = if path.exists() {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read session file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse session file {}", path.display()))?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }
}

impl SessionStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.write()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.write()?;
        }
        Ok(())
    }
}

/// State recovered at first activation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionSnapshot {
    pub consent: ConsentState,
    pub player_closed: bool,
    pub track_index: usize,
    pub position: Option<f64>,
}

pub struct PersistenceShim {
    store: Box<dyn SessionStore>,
    position_interval: Duration,
    last_position_write: Option<Instant>,
    saved_position: Option<(usize, f64)>,
    degraded: bool,
}

impl PersistenceShim {
    pub fn new(store: Box<dyn SessionStore>, position_interval: Duration) -> Self {
        Self {
            store,
            position_interval,
            last_position_write: None,
            saved_position: None,
            degraded: false,
        }
    }

    /// True once a store failure pushed the session into memory-only mode.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn rehydrate(&mut self, track_count: usize) -> SessionSnapshot {
        let mut snapshot = SessionSnapshot::default();
        if self.degraded {
            return snapshot;
        }

        if let Some(value) = self.read(KEY_CONSENT) {
            snapshot.consent = ConsentState::from_stored(&value).unwrap_or_default();
        }
        snapshot.player_closed = self
            .read(KEY_PLAYER_CLOSED)
            .is_some_and(|value| value.trim() == "true");

        let stored_index = self
            .read(KEY_TRACK_INDEX)
            .and_then(|value| value.trim().parse::<usize>().ok());
        let index_valid = stored_index.is_none_or(|index| index < track_count);
        snapshot.track_index = stored_index.filter(|_| index_valid).unwrap_or(0);

        if index_valid {
            snapshot.position = self
                .read(KEY_POSITION)
                .and_then(|value| value.trim().parse::<f64>().ok())
                .filter(|seconds| seconds.is_finite() && *seconds >= 0.0);
        } else {
            log::info!("stored track index is out of range, starting from the first track");
        }

        self.saved_position = snapshot
            .position
            .map(|seconds| (snapshot.track_index, seconds));
        snapshot
    }

    /// The persisted position, if it belongs to exactly this track.
    pub fn saved_position_for(&self, track_index: usize) -> Option<f64> {
        self.saved_position
            .filter(|(index, _)| *index == track_index)
            .map(|(_, seconds)| seconds)
    }

    pub fn save_consent(&mut self, consent: ConsentState) {
        match consent.stored_value() {
            Some(value) => self.write(KEY_CONSENT, value),
            None => self.erase(KEY_CONSENT),
        }
    }

    pub fn save_dismissed(&mut self, dismissed: bool) {
        if dismissed {
            self.write(KEY_PLAYER_CLOSED, "true");
        } else {
            self.erase(KEY_PLAYER_CLOSED);
        }
    }

    /// Records a track change; the position restarts with the new track.
    pub fn save_track_index(&mut self, track_index: usize) {
        self.write(KEY_TRACK_INDEX, &track_index.to_string());
        self.saved_position = Some((track_index, 0.0));
        self.write(KEY_POSITION, "0");
        self.last_position_write = None;
    }

    /// Throttled position mirror used for periodic progress updates.
    pub fn save_position(&mut self, now: Instant, track_index: usize, seconds: f64) {
        let due = self.last_position_write.is_none_or(|last| {
            now.saturating_duration_since(last) >= self.position_interval
        });
        if !due {
            return;
        }
        self.last_position_write = Some(now);
        self.store_position(track_index, seconds);
    }

    /// Unthrottled position write for explicit seeks, pauses and shutdown.
    pub fn flush_position(&mut self, track_index: usize, seconds: f64) {
        self.store_position(track_index, seconds);
    }

    fn store_position(&mut self, track_index: usize, seconds: f64) {
        self.saved_position = Some((track_index, seconds));
        self.write(KEY_POSITION, &format!("{seconds:.3}"));
    }

    fn read(&mut self, key: &str) -> Option<String> {
        if self.degraded {
            return None;
        }
        match self.store.get(key) {
            Ok(value) => value,
            Err(err) => {
                self.degrade(&err);
                None
            }
        }
    }

    fn write(&mut self, key: &str, value: &str) {
        if self.degraded {
            return;
        }
        if let Err(err) = self.store.set(key, value) {
            self.degrade(&err);
        }
    }

    fn erase(&mut self, key: &str) {
        if self.degraded {
            return;
        }
        if let Err(err) = self.store.remove(key) {
            self.degrade(&err);
        }
    }

    fn degrade(&mut self, err: &anyhow::Error) {
        log::warn!("session store unavailable, continuing in memory: {err:#}");
        self.degraded = true;
    }
}
