use crate::request::{RequestContext, IMAGE_DETAIL_BLANK, IMAGE_DETAIL_TEXT, TEMPLATE_DETAIL};
use crate::text;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Style tag marking templates that support animated output
pub const ANIMATED_STYLE: &str = "animated";

/// Reserved template id for user-supplied backgrounds
pub const CUSTOM_TEMPLATE_ID: &str = "_custom";

/// A meme template in the catalog
///
/// Templates are identified by `id`: equality and ordering only look at it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub source: Option<String>,
    pub keywords: Vec<String>,
    /// Sample text drawn on the example image
    pub example: Vec<String>,
    /// Number of text lines the template lays out
    pub lines: usize,
    /// Number of overlay slots
    pub overlays: usize,
    pub styles: Vec<String>,
    pub valid: bool,
}

impl Template {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            source: None,
            keywords: Vec::new(),
            example: Vec::new(),
            lines: 2,
            overlays: 0,
            styles: Vec::new(),
            valid: true,
        }
    }

    pub fn with_styles(mut self, styles: &[&str]) -> Self {
        self.styles = styles.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords = keywords.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_example(mut self, example: &[&str]) -> Self {
        self.example = example.iter().map(|s| s.to_string()).collect();
        self.lines = self.lines.max(self.example.len());
        self
    }

    pub fn invalid(mut self) -> Self {
        self.valid = false;
        self
    }

    pub fn is_animated(&self) -> bool {
        self.styles.iter().any(|style| style == ANIMATED_STYLE)
    }

    /// Case-insensitive substring search over id, name, example text, and keywords
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }

        if self.id.to_lowercase().contains(&query) || self.name.to_lowercase().contains(&query) {
            return true;
        }

        let example = self
            .example
            .iter()
            .map(|line| line.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");
        if example.contains(&query) {
            return true;
        }

        self.keywords
            .iter()
            .any(|keyword| keyword.to_lowercase().contains(&query))
    }

    /// URL of the example image rendered with `extension`
    pub fn build_example_url(&self, request: &dyn RequestContext, extension: &str) -> Result<String> {
        let text_filepath = format!("{}.{}", text::encode(self.example.as_slice()), extension);
        request.url_for(
            IMAGE_DETAIL_TEXT,
            &[("template_id", self.id.as_str()), ("text_filepath", text_filepath.as_str())],
        )
    }

    /// URL of this template's detail endpoint
    pub fn build_self_url(&self, request: &dyn RequestContext) -> Result<String> {
        request.url_for(TEMPLATE_DETAIL, &[("id", self.id.as_str())])
    }

    /// URL of the background image without text
    pub fn build_blank_url(&self, request: &dyn RequestContext, extension: &str) -> Result<String> {
        request.url_for(
            IMAGE_DETAIL_BLANK,
            &[("template_id", self.id.as_str()), ("extension", extension)],
        )
    }

    /// JSON-safe projection with URLs built for `request`
    pub fn jsonify(&self, request: &dyn RequestContext, extension: &str) -> Result<TemplateView> {
        Ok(TemplateView {
            id: self.id.clone(),
            name: self.name.clone(),
            lines: self.lines,
            overlays: self.overlays,
            styles: self.styles.clone(),
            blank: self.build_blank_url(request, extension)?,
            example: ExampleView {
                text: self.example.clone(),
                url: self.build_example_url(request, extension)?,
            },
            source: self.source.clone(),
            keywords: self.keywords.clone(),
            self_url: self.build_self_url(request)?,
        })
    }
}

impl PartialEq for Template {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Template {}

impl PartialOrd for Template {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Template {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

/// Template as returned to API clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplateView {
    pub id: String,
    pub name: String,
    pub lines: usize,
    pub overlays: usize,
    pub styles: Vec<String>,
    pub blank: String,
    pub example: ExampleView,
    pub source: Option<String>,
    pub keywords: Vec<String>,
    #[serde(rename = "_self")]
    pub self_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExampleView {
    pub text: Vec<String>,
    pub url: String,
}

/// On-disk `config.yml` of a template directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub keywords: Vec<String>,
    pub example: Vec<String>,
    /// Per-line layout; only the count matters to the catalog
    pub text: Vec<serde_yaml_ng::Value>,
    pub overlay: Vec<serde_yaml_ng::Value>,
    /// Extra style tags beyond those derived from image files
    pub styles: Vec<String>,
}
