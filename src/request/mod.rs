//! Request-facing collaborators: flag parsing and reverse routing
//!
//! Catalog operations only need two things from an incoming request: boolean
//! query switches and URLs for named endpoints. `RequestContext` captures that
//! surface so handlers from any web framework can adapt to it.

pub mod query;
pub mod router;

pub use query::{parse_flag, QueryRequest};
pub use router::{Router, IMAGE_DETAIL_BLANK, IMAGE_DETAIL_TEXT, TEMPLATE_DETAIL};

use crate::Result;

pub trait RequestContext {
    /// Boolean query switch, `None` when absent or unrecognized
    fn flag(&self, name: &str) -> Option<bool>;

    /// Absolute or relative URL of a named endpoint
    fn url_for(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<String>;
}
