pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod io;
pub mod logging;
pub mod request;
pub mod templates;
pub mod text;

pub use cache::{Clock, SystemClock, TemplateCache};
pub use catalog::Catalog;
pub use config::{Settings, SettingsLoader, TestImage};
pub use error::{CatalogError, Result};
pub use request::{QueryRequest, RequestContext, Router};
pub use templates::{FileTemplateStore, Template, TemplateStore, TemplateView};
