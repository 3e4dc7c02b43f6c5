//! Notification seam.
//!
//! The scheduling core never touches audio itself -- it hands fired cues to
//! a [`NotificationSink`]. Playback is fire-and-forget: a sink failure is
//! logged by the caller and never aborts a tick or a run.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::config::SoundsConfig;
use crate::error::NotificationError;

/// Sound id used for the main track played across a whole run.
pub const MAIN_TRACK_ID: &str = "main";

/// The notification surface the countdown drives.
/// Implementations are best-effort -- callers log failures and carry on.
pub trait NotificationSink: Send + Sync {
    /// Play the one-shot sound for a fired cue.
    fn play_cue(&self, cue_id: &str) -> Result<(), NotificationError>;

    /// Start the background track for the run.
    fn play_main_track(&self) -> Result<(), NotificationError> {
        Ok(()) // default no-op
    }

    /// Stop the background track.
    fn stop_main_track(&self) -> Result<(), NotificationError> {
        Ok(()) // default no-op
    }

    /// Surface an externally triggered message to the user.
    fn deliver_message(&self, _message: &str) -> Result<(), NotificationError> {
        Ok(()) // default no-op
    }
}

/// A resolved, playable sound for one cue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueSound {
    pub cue_id: String,
    pub path: PathBuf,
}

/// Lazily resolves cue ids to sound sources.
///
/// Owned by the sink implementation, not by the scheduling core. Resolution
/// happens once per cue id and is cached for the life of the registry.
pub struct AudioRegistry {
    dir: PathBuf,
    map: HashMap<String, String>,
    cache: Mutex<HashMap<String, Arc<CueSound>>>,
}

impl AudioRegistry {
    pub fn new(dir: PathBuf, map: HashMap<String, String>) -> Self {
        Self {
            dir,
            map,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Build a registry from the `[sounds]` config section.
    pub fn from_config(sounds: &SoundsConfig) -> Self {
        Self::new(sounds.resolved_dir(), sounds.map.clone())
    }

    /// Resolve the sound for a cue id, creating and caching the handle on
    /// first use. Unmapped ids fall back to `<dir>/<cue_id>.mp3`.
    pub fn get_or_create(&self, cue_id: &str) -> Arc<CueSound> {
        let mut cache = self.cache.lock().unwrap();
        if let Some(sound) = cache.get(cue_id) {
            return Arc::clone(sound);
        }
        let file = self
            .map
            .get(cue_id)
            .cloned()
            .unwrap_or_else(|| format!("{cue_id}.mp3"));
        let sound = Arc::new(CueSound {
            cue_id: cue_id.to_string(),
            path: self.dir.join(file),
        });
        cache.insert(cue_id.to_string(), Arc::clone(&sound));
        sound
    }
}

/// Sink that logs what it would play instead of producing audio.
///
/// The shipped default for the CLI; real audio backends live behind the same
/// trait in their own front ends.
pub struct LoggingSink {
    registry: AudioRegistry,
}

impl LoggingSink {
    pub fn new(registry: AudioRegistry) -> Self {
        Self { registry }
    }
}

impl NotificationSink for LoggingSink {
    fn play_cue(&self, cue_id: &str) -> Result<(), NotificationError> {
        let sound = self.registry.get_or_create(cue_id);
        log::info!("cue '{}' -> {}", cue_id, sound.path.display());
        Ok(())
    }

    fn play_main_track(&self) -> Result<(), NotificationError> {
        let sound = self.registry.get_or_create(MAIN_TRACK_ID);
        log::info!("main track -> {}", sound.path.display());
        Ok(())
    }

    fn stop_main_track(&self) -> Result<(), NotificationError> {
        log::info!("main track stopped");
        Ok(())
    }

    fn deliver_message(&self, message: &str) -> Result<(), NotificationError> {
        log::info!("external message: {message}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_resolves_mapped_file() {
        let map = HashMap::from([("blackout".to_string(), "lights_out.wav".to_string())]);
        let registry = AudioRegistry::new(PathBuf::from("/sounds"), map);
        let sound = registry.get_or_create("blackout");
        assert_eq!(sound.path, PathBuf::from("/sounds/lights_out.wav"));
    }

    #[test]
    fn registry_falls_back_to_id_named_file() {
        let registry = AudioRegistry::new(PathBuf::from("/sounds"), HashMap::new());
        let sound = registry.get_or_create("5min");
        assert_eq!(sound.path, PathBuf::from("/sounds/5min.mp3"));
    }

    #[test]
    fn registry_caches_handles() {
        let registry = AudioRegistry::new(PathBuf::from("/sounds"), HashMap::new());
        let first = registry.get_or_create("gameover");
        let second = registry.get_or_create("gameover");
        assert!(Arc::ptr_eq(&first, &second));
    }
}
