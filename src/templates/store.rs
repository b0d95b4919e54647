use super::types::{Template, TemplateConfig, ANIMATED_STYLE, CUSTOM_TEMPLATE_ID};
use crate::io::paths::is_safe_segment;
use crate::{CatalogError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Name of the per-template configuration file
pub const TEMPLATE_CONFIG_FILE: &str = "config.yml";

/// File stem of a template's background image
const DEFAULT_IMAGE_STEM: &str = "default";

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Source of catalog records
pub trait TemplateStore: Send + Sync {
    /// Every template the store knows about, valid or not
    fn list_templates(&self) -> Result<Vec<Template>>;
}

/// Fetch valid, non-custom templates in natural order
pub fn load_templates(store: &dyn TemplateStore) -> Result<Vec<Template>> {
    let mut templates: Vec<Template> = store
        .list_templates()?
        .into_iter()
        .filter(|template| template.valid && template.id != CUSTOM_TEMPLATE_ID)
        .collect();

    templates.sort();
    debug!("Loaded {} valid templates", templates.len());

    Ok(templates)
}

/// Template store backed by a directory of `<id>/config.yml` folders
#[derive(Debug, Clone)]
pub struct FileTemplateStore {
    root: PathBuf,
    animated_extensions: Vec<String>,
}

impl FileTemplateStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            animated_extensions: vec!["gif".to_string(), "webp".to_string()],
        }
    }

    /// Background extensions that mark a template as animated
    pub fn with_animated_extensions(mut self, extensions: &[String]) -> Self {
        self.animated_extensions = extensions.to_vec();
        self
    }

    /// Load a single template directory
    fn load_template(&self, dir: &Path, id: &str) -> Result<Template> {
        let config_path = dir.join(TEMPLATE_CONFIG_FILE);

        let config = if config_path.exists() {
            let contents = fs::read_to_string(&config_path)?;
            serde_yaml_ng::from_str::<TemplateConfig>(&contents).map_err(|e| {
                CatalogError::TemplateParse {
                    id: id.to_string(),
                    message: e.to_string(),
                }
            })?
        } else {
            debug!("Template '{}' has no {}", id, TEMPLATE_CONFIG_FILE);
            TemplateConfig::default()
        };

        let mut default_image: Option<String> = None;
        let mut styles = config.styles.clone();

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }

            let (Some(stem), Some(extension)) = (
                path.file_stem().and_then(|s| s.to_str()),
                path.extension().and_then(|s| s.to_str()),
            ) else {
                continue;
            };

            let extension = extension.to_ascii_lowercase();
            if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
                continue;
            }

            if stem == DEFAULT_IMAGE_STEM {
                default_image = Some(extension);
            } else {
                styles.push(stem.to_string());
            }
        }

        if let Some(extension) = &default_image {
            if self
                .animated_extensions
                .iter()
                .any(|animated| animated.eq_ignore_ascii_case(extension))
            {
                styles.push(ANIMATED_STYLE.to_string());
            }
        }

        styles.sort();
        styles.dedup();

        let valid = default_image.is_some() && !config.name.trim().is_empty() && !id.starts_with('_');
        if !valid {
            debug!("Template '{}' is not valid (missing name or default image)", id);
        }

        let lines = config.text.len().max(config.example.len());

        Ok(Template {
            id: id.to_string(),
            name: config.name,
            source: config.source,
            keywords: config.keywords,
            example: config.example,
            lines,
            overlays: config.overlay.len(),
            styles,
            valid,
        })
    }
}

impl TemplateStore for FileTemplateStore {
    fn list_templates(&self) -> Result<Vec<Template>> {
        if !self.root.is_dir() {
            return Err(CatalogError::Store(format!(
                "Template directory does not exist: {}",
                self.root.display()
            )));
        }

        info!("Scanning templates in: {}", self.root.display());

        let mut templates = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }

            let file_name = entry.file_name();
            let Some(id) = file_name.to_str().filter(|id| is_safe_segment(id)) else {
                warn!("Skipping template directory with unusable name: {:?}", file_name);
                continue;
            };

            if id == CUSTOM_TEMPLATE_ID {
                continue;
            }

            templates.push(self.load_template(&entry.path(), id)?);
        }

        info!("Scan complete: found {} templates", templates.len());
        Ok(templates)
    }
}
