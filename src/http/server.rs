//! HTTP server setup and request handling.
//!
//! # Responsibilities
//! - Create the Axum router with the six list routes and liveness
//! - Wire up middleware (tracing, CORS, timeout, request ID)
//! - Translate inbound queries and forward one GET per request upstream
//! - Post-process responses (sort, truncate) via the shared comparator
//! - Collapse every upstream failure to the fixed error payload
//! - Observability (metrics, request IDs)

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use url::Url;

use crate::catalog::sort::{sort_records, SortOrder};
use crate::config::ProxyConfig;
use crate::http::error::{ProxyError, ProxyResult};
use crate::http::request::{self, RequestIdLayer};
use crate::observability::metrics;
use crate::translate::{build_upstream_url, ListQuery, UpstreamPath};

/// Upstream settings consulted per request.
///
/// Swapped atomically on config reload; in-flight requests keep the
/// snapshot they started with. Only the base URL is hot-swappable; client
/// timeouts require a restart.
#[derive(Debug)]
pub struct UpstreamSettings {
    pub base_url: Url,
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: reqwest::Client,
    pub settings: Arc<ArcSwap<UpstreamSettings>>,
}

/// Error building the server out of a validated config.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid upstream base URL: {0}")]
    UpstreamUrl(#[from] url::ParseError),

    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),
}

/// HTTP server for the catalog proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
    settings: Arc<ArcSwap<UpstreamSettings>>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        let base_url = Url::parse(&config.upstream.base_url)?;
        let settings = Arc::new(ArcSwap::from_pointee(UpstreamSettings { base_url }));

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.upstream.connect_secs))
            .build()?;

        let state = AppState {
            client,
            settings: settings.clone(),
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            settings,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(liveness))
            .route("/categories", get(list_categories))
            .route("/companies", get(list_companies))
            .route("/products", get(list_products))
            .route(
                "/companies/{company}/categories/{category}/products",
                get(company_category_products),
            )
            .route("/companies/{company}/products", get(company_products))
            .route("/categories/{category}/products", get(category_products))
            // unknown paths and wrong methods both get the fixed 404
            .fallback(route_not_found)
            .method_not_allowed_fallback(route_not_found)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Validated config updates arriving on `config_updates` swap the
    /// upstream settings atomically. The server drains when `shutdown`
    /// fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<ProxyConfig>,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let settings = self.settings.clone();
        tokio::spawn(async move {
            while let Some(update) = config_updates.recv().await {
                apply_config_update(&settings, update);
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.changed().await;
                tracing::info!("shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

fn apply_config_update(settings: &Arc<ArcSwap<UpstreamSettings>>, update: ProxyConfig) {
    match Url::parse(&update.upstream.base_url) {
        Ok(base_url) => {
            tracing::info!(upstream = %base_url, "upstream settings updated");
            settings.store(Arc::new(UpstreamSettings { base_url }));
        }
        Err(e) => {
            // the watcher validates before sending, so this only guards
            // hand-constructed updates
            tracing::error!(error = %e, "config update carried an unparseable upstream URL");
        }
    }
}

/// Liveness probe.
async fn liveness() -> &'static str {
    "Server is running"
}

/// Catch-all for unknown paths and non-GET methods on known paths.
async fn route_not_found(method: Method, headers: HeaderMap) -> Response {
    let start = Instant::now();
    tracing::debug!(
        request_id = %request::request_id(&headers),
        method = %method,
        "no route matched"
    );
    metrics::record_request(method.as_str(), StatusCode::NOT_FOUND.as_u16(), "none", start);
    (StatusCode::NOT_FOUND, "Route not found").into_response()
}

async fn list_categories(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Response {
    proxy_list(&state, UpstreamPath::Categories, query, &headers).await
}

async fn list_companies(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Response {
    proxy_list(&state, UpstreamPath::Companies, query, &headers).await
}

async fn list_products(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Response {
    proxy_list(&state, UpstreamPath::Products, query, &headers).await
}

async fn company_category_products(
    State(state): State<AppState>,
    Path((company, category)): Path<(String, String)>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Response {
    proxy_list(
        &state,
        UpstreamPath::CompanyCategoryProducts { company, category },
        query,
        &headers,
    )
    .await
}

async fn company_products(
    State(state): State<AppState>,
    Path(company): Path<String>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Response {
    proxy_list(&state, UpstreamPath::CompanyProducts { company }, query, &headers).await
}

async fn category_products(
    State(state): State<AppState>,
    Path(category): Path<String>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Response {
    proxy_list(&state, UpstreamPath::CategoryProducts { category }, query, &headers).await
}

/// The pipeline every list route shares: validate, translate, forward,
/// sort, truncate.
async fn proxy_list(
    state: &AppState,
    path: UpstreamPath,
    query: ListQuery,
    headers: &HeaderMap,
) -> Response {
    let start = Instant::now();
    let request_id = request::request_id(headers);
    let route = path.label();

    match fetch_and_respond(state, &path, &query).await {
        Ok(records) => {
            tracing::debug!(
                request_id = %request_id,
                route = %route,
                records = records.len(),
                "list served"
            );
            metrics::record_request("GET", StatusCode::OK.as_u16(), route, start);
            Json(records).into_response()
        }
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                route = %route,
                error = %e,
                "list request failed"
            );
            metrics::record_request("GET", e.status().as_u16(), route, start);
            e.into_response()
        }
    }
}

async fn fetch_and_respond(
    state: &AppState,
    path: &UpstreamPath,
    query: &ListQuery,
) -> ProxyResult<Vec<Value>> {
    // reject bad parameters before spending an upstream round-trip;
    // empty strings mean "not selected" and are skipped
    let sort = query
        .sort_order
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::parse::<SortOrder>)
        .transpose()
        .map_err(|e| ProxyError::InvalidSortOrder(e.0))?;
    let top = query
        .top
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<usize>().map_err(|_| ProxyError::InvalidTop(s.to_string())))
        .transpose()?;

    let base_url = state.settings.load().base_url.clone();
    let url = build_upstream_url(&base_url, path, query);
    tracing::debug!(url = %url, "forwarding upstream");

    let response = state.client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ProxyError::UpstreamStatus(status.as_u16()));
    }

    let mut records: Vec<Value> = response.json().await?;

    if let Some(order) = sort {
        sort_records(&mut records, order);
    }
    if let Some(limit) = top {
        records.truncate(limit);
    }

    Ok(records)
}
