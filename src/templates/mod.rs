pub mod store;
pub mod types;

pub use store::{load_templates, FileTemplateStore, TemplateStore};
pub use types::{ExampleView, Template, TemplateConfig, TemplateView, ANIMATED_STYLE};
