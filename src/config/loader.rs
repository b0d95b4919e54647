use super::types::Settings;
use crate::io::paths::CatalogPaths;
use crate::{CatalogError, Result};
use std::path::Path;
use tracing::{debug, info, warn};

/// Loader for catalog settings files
pub struct SettingsLoader {
    /// Resolve relative `templates_dir` against the settings file's directory
    resolve_relative: bool,
}

impl SettingsLoader {
    /// Create new settings loader
    pub fn new() -> Self {
        Self {
            resolve_relative: true,
        }
    }

    /// Keep `templates_dir` exactly as written in the file
    pub fn without_path_resolution(mut self) -> Self {
        self.resolve_relative = false;
        self
    }

    /// Load settings from a YAML file
    pub fn load_settings_file<P: AsRef<Path>>(&self, path: P) -> Result<Settings> {
        let path = path.as_ref();

        let contents = std::fs::read_to_string(path).map_err(|e| {
            CatalogError::Config(format!(
                "Failed to read settings file {}: {}",
                path.display(),
                e
            ))
        })?;

        let mut settings: Settings = serde_yaml_ng::from_str(&contents).map_err(|e| {
            CatalogError::Config(format!(
                "Failed to parse settings file {}: {}",
                path.display(),
                e
            ))
        })?;

        if self.resolve_relative && settings.templates_dir.is_relative() {
            if let Some(parent) = path.parent() {
                settings.templates_dir = parent.join(&settings.templates_dir);
            }
        }

        self.validate_settings(&settings)?;
        debug!("Loaded settings from {}", path.display());

        Ok(settings)
    }

    /// Load the project settings file, then the user one, then defaults
    pub fn discover<P: AsRef<Path>>(&self, project_root: P) -> Result<Settings> {
        let project_root = project_root.as_ref();

        let project_file = CatalogPaths::for_project(project_root).settings_file;
        if project_file.exists() {
            info!("Using project settings at {}", project_file.display());
            return self.load_settings_file(project_file);
        }

        match CatalogPaths::new() {
            Ok(paths) if paths.settings_file.exists() => {
                info!("Using user settings at {}", paths.settings_file.display());
                return self.load_settings_file(&paths.settings_file);
            }
            Ok(_) => {}
            Err(e) => warn!("Could not determine user config directory: {}", e),
        }

        debug!("No settings file found, using defaults");
        Ok(Settings {
            templates_dir: CatalogPaths::for_project(project_root).templates_dir,
            ..Settings::default()
        })
    }

    /// Validate extension settings and test image fixtures
    pub fn validate_settings(&self, settings: &Settings) -> Result<()> {
        self.validate_extension(&settings.default_static_extension, "default_static_extension")?;
        self.validate_extension(
            &settings.default_animated_extension,
            "default_animated_extension",
        )?;

        if settings.animated_extensions.is_empty() {
            return Err(CatalogError::Config(
                "animated_extensions must list at least one extension".to_string(),
            ));
        }
        for extension in &settings.animated_extensions {
            self.validate_extension(extension, "animated_extensions")?;
        }

        if !settings.is_animated_extension(&settings.default_animated_extension) {
            return Err(CatalogError::Config(format!(
                "default_animated_extension '{}' is not one of the animated_extensions {:?}",
                settings.default_animated_extension, settings.animated_extensions
            )));
        }

        if settings.is_animated_extension(&settings.default_static_extension) {
            return Err(CatalogError::Config(format!(
                "default_static_extension '{}' is listed as animated",
                settings.default_static_extension
            )));
        }

        for (index, image) in settings.test_images.iter().enumerate() {
            if image.id.trim().is_empty() {
                return Err(CatalogError::Config(format!(
                    "Test image at index {} has empty id",
                    index
                )));
            }
            self.validate_extension(&image.extension, &format!("test_images[{}]", index))?;
        }

        if let Some(base_url) = &settings.base_url {
            if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
                return Err(CatalogError::Config(format!(
                    "base_url must start with http:// or https:// (got: {})",
                    base_url
                )));
            }
        }

        Ok(())
    }

    fn validate_extension(&self, extension: &str, field: &str) -> Result<()> {
        if extension.is_empty() {
            return Err(CatalogError::Config(format!("{} has an empty extension", field)));
        }
        if extension.starts_with('.') || !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CatalogError::Config(format!(
                "{} has invalid extension '{}'. Expected letters and digits without a dot",
                field, extension
            )));
        }
        Ok(())
    }
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}
