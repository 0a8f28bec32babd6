//! Navigation sounds played through `paplay`

use couchdeck_core::services::InputFeedback;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, warn};

const EXTENSIONS: [&str; 5] = ["oga", "ogg", "wav", "mp3", "flac"];

/// Sound theme names tried for each cue, in priority order
fn candidates(cue: &str) -> Vec<&str> {
    match cue {
        "move" => vec!["audio-volume-change", "button-pressed", "message"],
        "activate" => vec!["complete", "completion-success", "service-login"],
        other => vec![other],
    }
}

/// Directories searched for sound theme files, user sounds first.
fn sound_search_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Some(home) = std::env::var_os("HOME") {
        let home = PathBuf::from(home);
        dirs.push(home.join(".config/couchdeck/sounds"));
        dirs.push(home.join(".local/share/sounds"));
    }

    dirs.push(PathBuf::from("/usr/share/sounds/ocean/stereo"));
    dirs.push(PathBuf::from("/usr/share/sounds/freedesktop/stereo"));

    if let Ok(xdg_dirs) = std::env::var("XDG_DATA_DIRS") {
        for dir in xdg_dirs.split(':') {
            let base = PathBuf::from(dir).join("sounds");
            dirs.push(base.join("ocean/stereo"));
            dirs.push(base.join("freedesktop/stereo"));
        }
    }

    dirs
}

/// Resolve a cue name or an absolute path to a sound file.
fn resolve_sound_in(cue: &str, search_dirs: &[PathBuf]) -> Option<PathBuf> {
    if cue.starts_with('/') {
        let path = PathBuf::from(cue);
        return path.exists().then_some(path);
    }

    for dir in search_dirs {
        for name in candidates(cue) {
            for ext in EXTENSIONS {
                let path = dir.join(format!("{name}.{ext}"));
                if path.exists() {
                    return Some(path);
                }
            }
        }
    }
    None
}

fn play(path: &Path) {
    if let Err(e) = Command::new("paplay")
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        warn!("Failed to play sound {}: {e}", path.display());
    }
}

/// Plays a short cue on focus moves and a confirmation on activation.
/// Cues with no sound file installed stay silent.
#[derive(Debug, Default)]
pub struct SoundFeedback {
    move_sound: Option<PathBuf>,
    activate_sound: Option<PathBuf>,
}

impl SoundFeedback {
    pub fn detect() -> Self {
        let dirs = sound_search_dirs();
        let feedback = Self {
            move_sound: resolve_sound_in("move", &dirs),
            activate_sound: resolve_sound_in("activate", &dirs),
        };
        debug!(
            "Sounds: move={:?} activate={:?}",
            feedback.move_sound, feedback.activate_sound
        );
        feedback
    }

    #[must_use]
    pub fn is_silent(&self) -> bool {
        self.move_sound.is_none() && self.activate_sound.is_none()
    }
}

impl InputFeedback for SoundFeedback {
    fn on_focus_moved(&self) {
        if let Some(path) = &self.move_sound {
            play(path);
        }
    }

    fn on_item_activated(&self) {
        if let Some(path) = &self.activate_sound {
            play(path);
        }
    }
}
