use super::{RequestContext, Router};
use crate::Result;
use std::collections::HashMap;
use std::sync::Arc;

/// Request adapter over a raw query string and a shared route table
#[derive(Debug, Clone)]
pub struct QueryRequest {
    router: Arc<Router>,
    args: HashMap<String, String>,
}

impl QueryRequest {
    pub fn new(router: Arc<Router>) -> Self {
        Self {
            router,
            args: HashMap::new(),
        }
    }

    /// Parse `a=1&b=two` style query strings; later duplicates win
    pub fn from_query_string(router: Arc<Router>, query: &str) -> Self {
        let mut request = Self::new(router);

        for pair in query.trim_start_matches('?').split('&') {
            if pair.is_empty() {
                continue;
            }
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            request.args.insert(decode_component(name), decode_component(value));
        }

        request
    }

    pub fn with_arg(mut self, name: &str, value: &str) -> Self {
        self.args.insert(name.to_string(), value.to_string());
        self
    }

    pub fn arg(&self, name: &str) -> Option<&str> {
        self.args.get(name).map(String::as_str)
    }
}

impl RequestContext for QueryRequest {
    fn flag(&self, name: &str) -> Option<bool> {
        self.arg(name).and_then(parse_flag)
    }

    fn url_for(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<String> {
        self.router.url_for(endpoint, params)
    }
}

/// Interpret a query-string switch value
///
/// A bare switch (`?animated` or `?animated=`) counts as set. Unrecognized
/// values yield `None` so callers fall back to their default.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "true" | "yes" | "y" | "1" | "on" => Some(true),
        "false" | "no" | "n" | "0" | "off" => Some(false),
        _ => None,
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}
