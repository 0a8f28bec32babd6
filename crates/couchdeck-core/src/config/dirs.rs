use directories::ProjectDirs;
use std::path::PathBuf;

/// Application directories following the XDG base directory layout
#[derive(Debug, Clone)]
pub struct Directories {
    /// Config directory (~/.config/couchdeck)
    pub config: PathBuf,

    /// Data directory (~/.local/share/couchdeck)
    pub data: PathBuf,

    /// Cache directory (~/.cache/couchdeck), also holds log files
    pub cache: PathBuf,

    /// Config file path
    pub config_file: PathBuf,

    /// App catalog consumed by the file-backed inventory
    pub catalog_file: PathBuf,
}

impl Directories {
    /// Create a new `Directories` instance with standard XDG paths.
    ///
    /// # Panics
    ///
    /// Panics if the system's project directories cannot be determined.
    #[must_use]
    pub fn new() -> Self {
        let project = ProjectDirs::from("", "", "couchdeck")
            .expect("Failed to determine project directories");

        let config = project.config_dir().to_path_buf();
        let data = project.data_dir().to_path_buf();
        let cache = project.cache_dir().to_path_buf();

        Self {
            config_file: config.join("config.json"),
            catalog_file: config.join("apps.json"),
            config,
            data,
            cache,
        }
    }

    #[must_use]
    pub fn with_base(base: PathBuf) -> Self {
        Self {
            config_file: base.join("config.json"),
            catalog_file: base.join("apps.json"),
            config: base.clone(),
            data: base.clone(),
            cache: base,
        }
    }

    /// Ensure all directories exist.
    ///
    /// # Errors
    ///
    /// Returns an error if any directory cannot be created.
    pub fn ensure_exists(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.config)?;
        std::fs::create_dir_all(&self.data)?;
        std::fs::create_dir_all(&self.cache)?;
        Ok(())
    }
}

impl Default for Directories {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_base_sets_all_paths() {
        let base = PathBuf::from("/tmp/test-couchdeck");
        let dirs = Directories::with_base(base.clone());

        assert_eq!(dirs.config, base);
        assert_eq!(dirs.data, base);
        assert_eq!(dirs.cache, base);
        assert_eq!(dirs.config_file, base.join("config.json"));
        assert_eq!(dirs.catalog_file, base.join("apps.json"));
    }

    #[test]
    fn test_ensure_exists_creates_directories() {
        let temp_dir = tempfile::tempdir().unwrap();
        let base = temp_dir.path().join("couchdeck-test-subdir");
        let dirs = Directories::with_base(base.clone());

        assert!(!base.exists());

        dirs.ensure_exists().unwrap();

        assert!(dirs.config.exists());
        assert!(dirs.data.exists());
        assert!(dirs.cache.exists());
    }

    #[test]
    fn test_ensure_exists_idempotent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dirs = Directories::with_base(temp_dir.path().to_path_buf());

        dirs.ensure_exists().unwrap();
        dirs.ensure_exists().unwrap();

        assert!(dirs.config.exists());
    }
}
