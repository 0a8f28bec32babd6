//! Launching apps and the long-press favorite toggle

use crate::catalog::Catalog;
use crate::compositor::Compositor;
use couchdeck_core::services::Activator;
use couchdeck_core::{ActivationModifiers, AppEntry, Error, Result};
use std::process::{Command, Stdio};
use std::rc::Rc;
use tracing::{debug, info};

/// Split a desktop-entry style `Exec` line into program and arguments,
/// dropping `%f`-style field codes.
#[must_use]
pub fn parse_exec(exec: &str) -> Option<(String, Vec<String>)> {
    let mut parts = exec
        .split_whitespace()
        .filter(|part| !is_field_code(part))
        .map(ToString::to_string);
    let program = parts.next()?;
    Some((program, parts.collect()))
}

fn is_field_code(part: &str) -> bool {
    part.len() == 2 && part.starts_with('%')
}

fn spawn_silent(program: &str, args: &[String]) -> std::io::Result<()> {
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
}

/// Focuses a running app's window, otherwise spawns its `exec` line.
pub struct ProcessLauncher {
    compositor: Rc<Compositor>,
    catalog: Rc<Catalog>,
}

impl ProcessLauncher {
    pub fn new(compositor: Rc<Compositor>, catalog: Rc<Catalog>) -> Self {
        Self {
            compositor,
            catalog,
        }
    }
}

impl Activator for ProcessLauncher {
    fn activate(&self, entry: &AppEntry, modifiers: ActivationModifiers) -> Result<()> {
        if entry.is_running() && !modifiers.new_window && self.compositor.focus_app(&entry.id) {
            info!("Focused running app {}", entry.id);
            return Ok(());
        }

        let exec = entry
            .exec
            .as_deref()
            .ok_or_else(|| Error::Activation(format!("{} has no command", entry.display_name)))?;
        let (program, args) = parse_exec(exec)
            .ok_or_else(|| Error::Activation(format!("{} has an empty command", entry.display_name)))?;

        debug!("Spawning {program} {args:?}");
        spawn_silent(&program, &args)
            .map_err(|e| Error::Activation(format!("{program}: {e}")))?;
        info!("Launched {}", entry.id);
        Ok(())
    }

    fn open_context_menu(&self, entry: &AppEntry) -> Result<()> {
        self.catalog.toggle_favorite(&entry.id).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exec_drops_field_codes() {
        let (program, args) = parse_exec("firefox --new-window %u").unwrap();
        assert_eq!(program, "firefox");
        assert_eq!(args, vec!["--new-window".to_string()]);
    }

    #[test]
    fn test_parse_exec_empty() {
        assert!(parse_exec("   ").is_none());
        assert!(parse_exec("%F").is_none());
    }

    #[test]
    fn test_missing_exec_is_activation_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let catalog = Rc::new(Catalog::load(&dir.path().join("apps.json")).unwrap());
        let launcher = ProcessLauncher::new(Rc::new(Compositor::detect()), catalog);

        let result = launcher.activate(&AppEntry::new("x", "X"), ActivationModifiers::default());
        assert!(matches!(result, Err(Error::Activation(message)) if message.contains("no command")));
    }

    #[test]
    fn test_unknown_program_is_activation_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let catalog = Rc::new(Catalog::load(&dir.path().join("apps.json")).unwrap());
        let launcher = ProcessLauncher::new(Rc::new(Compositor::detect()), catalog);

        let entry = AppEntry::new("x", "X").with_exec("/nonexistent/couchdeck-test-binary");
        assert!(matches!(
            launcher.activate(&entry, ActivationModifiers::default()),
            Err(Error::Activation(_))
        ));
    }

    #[test]
    fn test_context_menu_toggles_favorite() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("apps.json");
        std::fs::write(&path, r#"{"apps": [{"id": "kodi", "displayName": "Kodi"}]}"#).unwrap();
        let catalog = Rc::new(Catalog::load(&path).unwrap());
        let launcher = ProcessLauncher::new(Rc::new(Compositor::detect()), Rc::clone(&catalog));

        launcher.open_context_menu(&AppEntry::new("kodi", "Kodi")).unwrap();
        assert_eq!(
            couchdeck_core::services::AppInventory::favorite_ids(catalog.as_ref()),
            vec!["kodi".to_string()]
        );
    }
}
