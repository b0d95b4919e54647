use crate::{CatalogError, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// File name of the catalog settings file
pub const SETTINGS_FILE_NAME: &str = "catalog.yml";

/// Directory name of the template store
pub const TEMPLATES_DIR_NAME: &str = "templates";

/// Path management for catalog configuration files
#[derive(Debug, Clone)]
pub struct CatalogPaths {
    /// Configuration directory
    pub config_dir: PathBuf,
    /// Settings file (`catalog.yml`)
    pub settings_file: PathBuf,
    /// Template store root
    pub templates_dir: PathBuf,
}

impl CatalogPaths {
    /// Create new paths instance using standard directories
    pub fn new() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "meme-catalog").ok_or_else(|| {
            CatalogError::Path("Failed to determine project directories".to_string())
        })?;

        Ok(Self::rooted_at(dirs.config_dir().to_path_buf()))
    }

    /// Create paths for a specific project directory
    pub fn for_project(project_root: &Path) -> Self {
        Self::rooted_at(project_root.to_path_buf())
    }

    fn rooted_at(config_dir: PathBuf) -> Self {
        Self {
            settings_file: config_dir.join(SETTINGS_FILE_NAME),
            templates_dir: config_dir.join(TEMPLATES_DIR_NAME),
            config_dir,
        }
    }
}

/// Check if a path segment is safe to use as a template id
pub fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_paths_creation() {
        let paths = CatalogPaths::new();
        assert!(paths.is_ok());

        let paths = paths.unwrap();
        assert!(paths.config_dir.ends_with("meme-catalog"));
        assert!(paths.settings_file.ends_with("catalog.yml"));
    }

    #[test]
    fn test_for_project() {
        let root = Path::new("/srv/memes");
        let paths = CatalogPaths::for_project(root);

        assert_eq!(paths.config_dir, root);
        assert_eq!(paths.settings_file, root.join("catalog.yml"));
        assert_eq!(paths.templates_dir, root.join("templates"));
    }

    #[test]
    fn test_is_safe_segment() {
        assert!(is_safe_segment("fry"));
        assert!(is_safe_segment("_custom"));
        assert!(!is_safe_segment(""));
        assert!(!is_safe_segment(".."));
        assert!(!is_safe_segment("a/b"));
    }
}
