//! File-backed app inventory.
//!
//! `apps.json` lists the installed apps and the favorite ids in favorite
//! order. Running state comes from the compositor and is pushed in by the
//! host's poll loop.

use couchdeck_core::services::AppInventory;
use couchdeck_core::{AppEntry, Error, Result};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogFile {
    #[serde(default)]
    pub apps: Vec<AppEntry>,

    #[serde(default)]
    pub favorites: Vec<String>,
}

pub struct Catalog {
    path: PathBuf,
    data: RefCell<CatalogFile>,
    /// Catalog ids with open windows
    running: RefCell<HashSet<String>>,
}

impl Catalog {
    /// Load the catalog. A missing file yields an empty catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let catalog = Self {
            path: path.to_path_buf(),
            data: RefCell::new(CatalogFile::default()),
            running: RefCell::new(HashSet::new()),
        };
        catalog.refresh()?;
        Ok(catalog)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed. The previous
    /// contents are kept in that case.
    pub fn refresh(&self) -> Result<()> {
        if !self.path.exists() {
            warn!("App catalog not found at {:?}", self.path);
            *self.data.borrow_mut() = CatalogFile::default();
            return Ok(());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let file: CatalogFile = serde_json::from_str(&content)?;
        info!(
            "Loaded {} apps ({} favorites) from {:?}",
            file.apps.len(),
            file.favorites.len(),
            self.path
        );
        *self.data.borrow_mut() = file;
        Ok(())
    }

    /// Replace the running set with the catalog apps whose id matches one of
    /// `app_ids` case-insensitively. Returns whether the set changed.
    pub fn set_running(&self, app_ids: &HashSet<String>) -> bool {
        let matched: HashSet<String> = self
            .data
            .borrow()
            .apps
            .iter()
            .filter(|app| app_ids.contains(&app.id.to_lowercase()))
            .map(|app| app.id.clone())
            .collect();

        let mut running = self.running.borrow_mut();
        if *running == matched {
            return false;
        }
        debug!("Running apps changed: {} -> {}", running.len(), matched.len());
        *running = matched;
        true
    }

    #[must_use]
    pub fn running_count(&self) -> usize {
        self.running.borrow().len()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.data.borrow().apps.iter().any(|app| app.id == id)
    }

    /// Add or remove `id` from the favorites and write the file back.
    /// Returns the new favorite state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownApp`] if `id` is not in the catalog, or an
    /// I/O error if the file cannot be written.
    pub fn toggle_favorite(&self, id: &str) -> Result<bool> {
        if !self.contains(id) {
            return Err(Error::UnknownApp(id.to_string()));
        }

        let now_favorite = {
            let mut data = self.data.borrow_mut();
            if let Some(pos) = data.favorites.iter().position(|f| f == id) {
                data.favorites.remove(pos);
                false
            } else {
                data.favorites.push(id.to_string());
                true
            }
        };

        self.save()?;
        info!("Favorite {id}: {now_favorite}");
        Ok(now_favorite)
    }

    fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&*self.data.borrow())?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl AppInventory for Catalog {
    fn all_apps(&self) -> Vec<AppEntry> {
        self.data.borrow().apps.clone()
    }

    fn favorite_ids(&self) -> Vec<String> {
        self.data.borrow().favorites.clone()
    }

    fn running_ids(&self) -> HashSet<String> {
        self.running.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"{
        "apps": [
            {"id": "kodi", "displayName": "Kodi", "exec": "kodi"},
            {"id": "Steam", "displayName": "Steam", "exec": "steam -bigpicture"},
            {"id": "firefox", "displayName": "Firefox", "exec": "firefox %u"}
        ],
        "favorites": ["firefox"]
    }"#;

    fn sample(dir: &TempDir) -> Catalog {
        let path = dir.path().join("apps.json");
        std::fs::write(&path, SAMPLE).unwrap();
        Catalog::load(&path).unwrap()
    }

    #[test]
    fn test_missing_catalog_is_empty() {
        let dir = TempDir::new().unwrap();
        let catalog = Catalog::load(&dir.path().join("apps.json")).unwrap();
        assert!(catalog.all_apps().is_empty());
        assert!(catalog.favorite_ids().is_empty());
    }

    #[test]
    fn test_load_reads_apps_and_favorites() {
        let dir = TempDir::new().unwrap();
        let catalog = sample(&dir);
        assert_eq!(catalog.all_apps().len(), 3);
        assert_eq!(catalog.favorite_ids(), vec!["firefox".to_string()]);
    }

    #[test]
    fn test_invalid_catalog_keeps_previous_contents() {
        let dir = TempDir::new().unwrap();
        let catalog = sample(&dir);
        std::fs::write(catalog.path(), "{ broken").unwrap();

        assert!(catalog.refresh().is_err());
        assert_eq!(catalog.all_apps().len(), 3);
    }

    #[test]
    fn test_running_match_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        let catalog = sample(&dir);

        let seen: HashSet<String> = ["steam", "unrelated"].iter().map(ToString::to_string).collect();
        assert!(catalog.set_running(&seen));
        assert_eq!(catalog.running_ids(), HashSet::from(["Steam".to_string()]));
        assert_eq!(catalog.running_count(), 1);

        assert!(!catalog.set_running(&seen));
    }

    #[test]
    fn test_toggle_favorite_persists() {
        let dir = TempDir::new().unwrap();
        let catalog = sample(&dir);

        assert!(catalog.toggle_favorite("kodi").unwrap());
        assert!(!catalog.toggle_favorite("firefox").unwrap());

        let reloaded = Catalog::load(catalog.path()).unwrap();
        assert_eq!(reloaded.favorite_ids(), vec!["kodi".to_string()]);
    }

    #[test]
    fn test_toggle_unknown_favorite_fails() {
        let dir = TempDir::new().unwrap();
        let catalog = sample(&dir);
        assert!(matches!(
            catalog.toggle_favorite("ghost"),
            Err(Error::UnknownApp(_))
        ));
    }
}
