//! The client-side view: three collections, filter state, local sort.
//!
//! # Design Decisions
//! - The initial load joins all three fetches; one failure fails the whole
//!   load and leaves the view untouched (the proxy endpoints are cheap and
//!   a partial view renders misleadingly)
//! - Every filter application carries a monotonic token; a response whose
//!   token is no longer current is discarded, so a slow old fetch can
//!   never overwrite a newer one
//! - Sorting happens locally with the comparator shared with the proxy;
//!   no sort selected keeps the order the proxy returned

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use catalog_proxy::catalog::sort::sort_records;
use catalog_proxy::catalog::{Category, Company, Product, SortOrder};

use crate::client::{CatalogClient, SdkError};

/// Highest price the range control permits.
pub const PRICE_CEILING: u64 = 10_000;

/// Immutable filter selection. Category and company are selected by id and
/// resolved to name segments at URL-build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub category: Option<String>,
    pub company: Option<String>,
    pub price_range: (u64, u64),
    pub availability: Option<String>,
    pub sort: Option<SortOrder>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            category: None,
            company: None,
            price_range: (0, 1_000),
            availability: None,
            sort: None,
        }
    }
}

/// Whether the initial load has completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
}

/// Build the proxy path-and-query for a filter selection.
///
/// A selected id with no matching record contributes no segment. Price
/// bounds are always sent; availability only when set and non-empty.
pub fn filter_url(
    filter: &FilterState,
    categories: &[Category],
    companies: &[Company],
) -> String {
    let mut path = String::new();
    if let Some(id) = &filter.company {
        if let Some(company) = companies.iter().find(|c| &c.id == id) {
            path.push_str("/companies/");
            path.push_str(&company.name);
        }
    }
    if let Some(id) = &filter.category {
        if let Some(category) = categories.iter().find(|c| &c.id == id) {
            path.push_str("/categories/");
            path.push_str(&category.name);
        }
    }
    path.push_str("/products");

    let mut params = vec![
        format!("minPrice={}", filter.price_range.0),
        format!("maxPrice={}", filter.price_range.1),
    ];
    if let Some(availability) = &filter.availability {
        if !availability.is_empty() {
            params.push(format!("availability={}", availability));
        }
    }

    format!("{}?{}", path, params.join("&"))
}

#[derive(Default)]
struct View {
    categories: Vec<Category>,
    companies: Vec<Company>,
    products: Vec<Product>,
    ready: bool,
}

struct Inner {
    view: RwLock<View>,
    generation: AtomicU64,
}

/// Maintains a consistent local view of categories, companies and the
/// currently filtered product list.
///
/// Cheap to clone; clones share the same view, so overlapping filter
/// applications from different tasks contend on one token sequence.
#[derive(Clone)]
pub struct Aggregator {
    client: Arc<CatalogClient>,
    inner: Arc<Inner>,
}

impl Aggregator {
    pub fn new(proxy_url: &str) -> Self {
        Self {
            client: Arc::new(CatalogClient::new(proxy_url)),
            inner: Arc::new(Inner {
                view: RwLock::new(View::default()),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Concurrently fetch categories, companies and unfiltered products.
    ///
    /// All-or-nothing: if any fetch fails the error is returned and the
    /// view stays in its previous state.
    pub async fn load(&self) -> Result<(), SdkError> {
        let (categories, companies, products) = tokio::try_join!(
            self.client.categories(),
            self.client.companies(),
            self.client.products(),
        )?;

        let mut view = self.inner.view.write().expect("view lock poisoned");
        view.categories = categories;
        view.companies = companies;
        view.products = products;
        view.ready = true;
        Ok(())
    }

    /// Apply a filter selection: one fetch, then a local sort.
    ///
    /// Returns `Ok(true)` if the result was installed, `Ok(false)` if it
    /// was discarded because a newer application started in the meantime.
    pub async fn apply_filters(&self, filter: &FilterState) -> Result<bool, SdkError> {
        let token = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let url = {
            let view = self.inner.view.read().expect("view lock poisoned");
            filter_url(filter, &view.categories, &view.companies)
        };

        let mut products = self.client.products_at(&url).await?;
        if let Some(order) = filter.sort {
            sort_records(&mut products, order);
        }

        if self.inner.generation.load(Ordering::SeqCst) != token {
            return Ok(false);
        }

        let mut view = self.inner.view.write().expect("view lock poisoned");
        view.products = products;
        Ok(true)
    }

    pub fn load_state(&self) -> LoadState {
        let view = self.inner.view.read().expect("view lock poisoned");
        if view.ready {
            LoadState::Ready
        } else {
            LoadState::Loading
        }
    }

    pub fn categories(&self) -> Vec<Category> {
        self.inner.view.read().expect("view lock poisoned").categories.clone()
    }

    pub fn companies(&self) -> Vec<Company> {
        self.inner.view.read().expect("view lock poisoned").companies.clone()
    }

    /// The currently filtered, sorted product list.
    pub fn products(&self) -> Vec<Product> {
        self.inner.view.read().expect("view lock poisoned").products.clone()
    }
}
