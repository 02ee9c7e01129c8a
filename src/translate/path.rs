//! Upstream path templates.

use url::Url;

use crate::translate::query::{translate_query, ListQuery};

/// The six upstream path variants. They differ only in which segments are
/// interpolated; everything else about a request is shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamPath {
    Categories,
    Companies,
    Products,
    CompanyCategoryProducts { company: String, category: String },
    CompanyProducts { company: String },
    CategoryProducts { category: String },
}

impl UpstreamPath {
    /// Path segments in order, not yet percent-encoded.
    pub fn segments(&self) -> Vec<&str> {
        match self {
            UpstreamPath::Categories => vec!["categories"],
            UpstreamPath::Companies => vec!["companies"],
            UpstreamPath::Products => vec!["products"],
            UpstreamPath::CompanyCategoryProducts { company, category } => {
                vec!["companies", company, "categories", category, "products"]
            }
            UpstreamPath::CompanyProducts { company } => {
                vec!["companies", company, "products"]
            }
            UpstreamPath::CategoryProducts { category } => {
                vec!["categories", category, "products"]
            }
        }
    }

    /// Stable label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            UpstreamPath::Categories => "categories",
            UpstreamPath::Companies => "companies",
            UpstreamPath::Products => "products",
            UpstreamPath::CompanyCategoryProducts { .. } => "company_category_products",
            UpstreamPath::CompanyProducts { .. } => "company_products",
            UpstreamPath::CategoryProducts { .. } => "category_products",
        }
    }
}

/// Build the single outbound URL for an inbound request.
///
/// Appends nothing when no filter parameter qualifies; the result never
/// ends in a bare `?`.
pub fn build_upstream_url(base: &Url, path: &UpstreamPath, query: &ListQuery) -> Url {
    let mut url = base.clone();
    {
        // base URLs are validated as http(s) with a host, so this is infallible
        let mut segments = url.path_segments_mut().expect("base URL cannot be a base");
        segments.pop_if_empty();
        for segment in path.segments() {
            segments.push(segment);
        }
    }

    let params = translate_query(query);
    if params.is_empty() {
        url.set_query(None);
    } else {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (key, value) in params {
            pairs.append_pair(key, value);
        }
    }
    url
}
