//! Reverse routing for named endpoints
//!
//! Routes are path patterns with `{param}` placeholders. Building a URL
//! substitutes percent-encoded parameter values; parameters that no
//! placeholder consumes are appended as a query string.

use crate::{CatalogError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Endpoint rendering an image with text
pub const IMAGE_DETAIL_TEXT: &str = "Images.detail_text";
/// Endpoint rendering a template background without text
pub const IMAGE_DETAIL_BLANK: &str = "Images.detail_blank";
/// Endpoint describing a single template
pub const TEMPLATE_DETAIL: &str = "Templates.detail";

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern"));

#[derive(Debug, Clone)]
struct Route {
    pattern: String,
    params: Vec<String>,
}

/// Named route table
#[derive(Debug, Clone)]
pub struct Router {
    routes: HashMap<String, Route>,
    base_url: Option<String>,
}

impl Router {
    /// Create an empty router
    pub fn empty() -> Self {
        Self {
            routes: HashMap::new(),
            base_url: None,
        }
    }

    /// Create a router with the image and template endpoints
    pub fn new() -> Self {
        Self::empty()
            .route(IMAGE_DETAIL_TEXT, "/images/{template_id}/{text_filepath}")
            .route(IMAGE_DETAIL_BLANK, "/images/{template_id}.{extension}")
            .route(TEMPLATE_DETAIL, "/templates/{id}")
    }

    /// Register (or replace) a named route
    pub fn route(mut self, name: &str, pattern: &str) -> Self {
        let params = PLACEHOLDER
            .captures_iter(pattern)
            .map(|caps| caps[1].to_string())
            .collect();

        self.routes.insert(
            name.to_string(),
            Route {
                pattern: pattern.to_string(),
                params,
            },
        );
        self
    }

    /// Prefix every generated URL with an absolute base
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = Some(base_url.trim_end_matches('/').to_string());
        self
    }

    /// Build the URL of a named endpoint
    pub fn url_for(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<String> {
        let route = self
            .routes
            .get(endpoint)
            .ok_or_else(|| CatalogError::Routing(format!("Unknown endpoint '{}'", endpoint)))?;

        let lookup: HashMap<&str, &str> = params.iter().copied().collect();

        if let Some(missing) = route
            .params
            .iter()
            .find(|name| !lookup.contains_key(name.as_str()))
        {
            return Err(CatalogError::Routing(format!(
                "Endpoint '{}' requires parameter '{}'",
                endpoint, missing
            )));
        }

        let path = PLACEHOLDER.replace_all(&route.pattern, |caps: &regex::Captures| {
            lookup
                .get(&caps[1])
                .map(|value| encode_path(value))
                .unwrap_or_default()
        });

        let mut url = match &self.base_url {
            Some(base) => format!("{}{}", base, path),
            None => path.into_owned(),
        };

        let extra: Vec<String> = params
            .iter()
            .filter(|(name, _)| !route.params.iter().any(|p| p == name))
            .map(|(name, value)| {
                format!("{}={}", urlencoding::encode(name), urlencoding::encode(value))
            })
            .collect();
        if !extra.is_empty() {
            url.push('?');
            url.push_str(&extra.join("&"));
        }

        Ok(url)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// Percent-encode a value, keeping `/` as a path separator
fn encode_path(value: &str) -> String {
    value
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
