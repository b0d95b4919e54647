use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("No template files found under {}", .0.display())]
    EmptyTemplateDirectory(PathBuf),

    #[error("Template '{id}' could not be parsed: {message}")]
    TemplateParse { id: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Routing error: {0}")]
    Routing(String),

    #[error("Template store error: {0}")]
    Store(String),

    #[error("Path error: {0}")]
    Path(String),

    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
