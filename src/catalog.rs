//! Catalog queries served to request handlers
//!
//! `Catalog` ties the template cache to the image settings. Every operation
//! reads the cached catalog, filters it, and projects the survivors into
//! URLs or JSON views built for the incoming request.

use crate::cache::TemplateCache;
use crate::config::Settings;
use crate::request::{RequestContext, Router, IMAGE_DETAIL_TEXT};
use crate::templates::{FileTemplateStore, Template, TemplateStore, TemplateView};
use crate::text;
use crate::Result;
use std::sync::Arc;
use tracing::debug;

/// Query-string switch selecting animated output
pub const ANIMATED_FLAG: &str = "animated";

pub struct Catalog {
    cache: TemplateCache,
    settings: Settings,
}

impl Catalog {
    pub fn new(cache: TemplateCache, settings: Settings) -> Self {
        Self { cache, settings }
    }

    /// Catalog over the file store named by `settings.templates_dir`
    pub fn from_settings(settings: Settings) -> Self {
        let store = FileTemplateStore::new(&settings.templates_dir)
            .with_animated_extensions(&settings.animated_extensions);
        Self::with_store(store, settings)
    }

    /// Catalog over any store, honoring `settings.auto_reload`
    pub fn with_store(store: impl TemplateStore + 'static, settings: Settings) -> Self {
        let mut cache = TemplateCache::new(store);
        if settings.auto_reload {
            cache = cache.with_freshness_check(&settings.templates_dir);
        }
        Self::new(cache, settings)
    }

    pub fn cache(&self) -> &TemplateCache {
        &self.cache
    }

    /// Route table for building request adapters, prefixed with `base_url`
    pub fn router(&self) -> Router {
        match &self.settings.base_url {
            Some(base_url) => Router::new().with_base_url(base_url),
            None => Router::new(),
        }
    }

    /// Cached templates; `force_reload` bypasses the cache
    pub fn templates(&self, force_reload: bool) -> Result<Arc<Vec<Template>>> {
        self.cache.get_cached_templates(force_reload)
    }

    /// JSON views of templates matching `query` and the animation filter
    pub fn valid_templates(
        &self,
        request: &dyn RequestContext,
        query: &str,
        animated: Option<bool>,
    ) -> Result<Vec<TemplateView>> {
        let templates = self.cache.get_cached_templates(false)?;

        let views = filter_by_query(&templates, query)
            .filter(|template| match animated {
                Some(true) => template.is_animated(),
                Some(false) => !template.is_animated(),
                None => true,
            })
            .map(|template| template.jsonify(request, &self.settings.default_static_extension))
            .collect::<Result<Vec<_>>>()?;

        debug!("Listing {} templates for query {:?}", views.len(), query);
        Ok(views)
    }

    /// `(example_url, self_url)` pairs for templates matching `query`
    ///
    /// An explicit `animated` argument is only a preference for the image
    /// extension. Without one, the request's `animated` switch is used and
    /// also drops templates that cannot honor it.
    pub fn example_images(
        &self,
        request: &dyn RequestContext,
        query: &str,
        animated: Option<bool>,
    ) -> Result<Vec<(String, String)>> {
        let templates = self.cache.get_cached_templates(false)?;

        let (animated, exact) = match animated {
            Some(value) => (Some(value), false),
            None => (request.flag(ANIMATED_FLAG), true),
        };

        let mut images = Vec::new();
        for template in filter_by_query(&templates, query) {
            if exact {
                match animated {
                    Some(true) if !template.is_animated() => continue,
                    Some(false) if template.is_animated() => continue,
                    _ => {}
                }
            }

            let extension = self.example_extension(template, animated);
            let example = template.build_example_url(request, extension)?;
            let self_url = template.build_self_url(request)?;
            images.push((example, self_url));
        }

        debug!("Built {} example images (animated: {:?}, exact: {})", images.len(), animated, exact);
        Ok(images)
    }

    /// Detail URLs for the configured test images
    pub fn test_images(&self, request: &dyn RequestContext) -> Result<Vec<String>> {
        let animated = request.flag(ANIMATED_FLAG) == Some(true);

        self.settings
            .test_images
            .iter()
            .filter(|image| !animated || self.settings.is_animated_extension(&image.extension))
            .map(|image| {
                let text_filepath = format!("{}.{}", text::encode(image.lines.as_slice()), image.extension);
                request.url_for(
                    IMAGE_DETAIL_TEXT,
                    &[("template_id", image.id.as_str()), ("text_filepath", text_filepath.as_str())],
                )
            })
            .collect()
    }

    fn example_extension(&self, template: &Template, animated: Option<bool>) -> &str {
        match animated {
            Some(true) => &self.settings.default_animated_extension,
            Some(false) => &self.settings.default_static_extension,
            None if template.is_animated() => &self.settings.default_animated_extension,
            None => &self.settings.default_static_extension,
        }
    }
}

fn filter_by_query<'a>(
    templates: &'a [Template],
    query: &'a str,
) -> impl Iterator<Item = &'a Template> + 'a {
    templates
        .iter()
        .filter(move |template| query.is_empty() || template.matches(query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::QueryRequest;
    use pretty_assertions::assert_eq;

    struct StaticStore(Vec<Template>);

    impl TemplateStore for StaticStore {
        fn list_templates(&self) -> Result<Vec<Template>> {
            Ok(self.0.clone())
        }
    }

    fn catalog() -> Catalog {
        Catalog::with_store(
            StaticStore(vec![
                Template::new("party", "Party Parrot")
                    .with_styles(&["animated"])
                    .with_example(&["party"]),
                Template::new("fry", "Futurama Fry").with_example(&["not sure", "if cat"]),
            ]),
            Settings::default(),
        )
    }

    fn request(query: &str) -> QueryRequest {
        QueryRequest::from_query_string(Arc::new(Router::new()), query)
    }

    #[test]
    fn test_example_extension_rules() {
        let catalog = catalog();
        let animated = Template::new("a", "A").with_styles(&["animated"]);
        let still = Template::new("s", "S");

        assert_eq!(catalog.example_extension(&animated, None), "gif");
        assert_eq!(catalog.example_extension(&still, None), "png");
        assert_eq!(catalog.example_extension(&still, Some(true)), "gif");
        assert_eq!(catalog.example_extension(&animated, Some(false)), "png");
    }

    #[test]
    fn test_templates_sorted_from_store() {
        let templates = catalog().templates(false).unwrap();
        let ids: Vec<&str> = templates.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["fry", "party"]);
    }

    #[test]
    fn test_explicit_preference_keeps_all_templates() {
        let images = catalog()
            .example_images(&request(""), "", Some(false))
            .unwrap();

        assert_eq!(
            images,
            vec![
                ("/images/fry/not_sure/if_cat.png".to_string(), "/templates/fry".to_string()),
                ("/images/party/party.png".to_string(), "/templates/party".to_string()),
            ]
        );
    }

    #[test]
    fn test_request_flag_is_exact() {
        let images = catalog()
            .example_images(&request("animated=false"), "", None)
            .unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].1, "/templates/fry");

        let images = catalog()
            .example_images(&request("animated=true"), "", None)
            .unwrap();
        assert_eq!(images, vec![("/images/party/party.gif".to_string(), "/templates/party".to_string())]);
    }
}
