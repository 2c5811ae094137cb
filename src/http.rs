//! HTTP surface: the search endpoint, a health check and the search page.

use crate::errors::LeadsError;
use crate::filter::FilterOptions;
use crate::search::LeadSearch;
use crate::store::LeadStore;
use axum::Json;
use axum::Router;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

const INDEX_HTML: &str = include_str!("../assets/index.html");

/// State shared by all handlers.
pub struct AppState<S> {
    pub search: Arc<LeadSearch<S>>,
}

// derive(Clone) would require S: Clone
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self { search: Arc::clone(&self.search) }
    }
}

impl<S: LeadStore> AppState<S> {
    pub fn new(search: LeadSearch<S>) -> Self {
        Self { search: Arc::new(search) }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// JSON-encoded [`FilterOptions`].
    pub filters: Option<String>,
    /// `array` selects the bare results array.
    pub shape: Option<String>,
}

pub fn router<S: LeadStore>(state: AppState<S>) -> Router {
    Router::new()
        .route("/api/search", get(search::<S>).fallback(method_not_allowed))
        .route("/healthz", get(healthz::<S>))
        .route("/", get(index))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn search<S: LeadStore>(
    State(st): State<AppState<S>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params.map_err(|e| LeadsError::InvalidFilters(e.body_text()))?;
    let opts = FilterOptions::from_query(params.filters.as_deref())?;
    let rs = st.search.run(&opts).await?;
    if params.shape.as_deref() == Some("array") {
        return Ok(Json(rs.results).into_response());
    }
    Ok(Json(rs).into_response())
}

async fn method_not_allowed() -> ApiError {
    ApiError(LeadsError::MethodNotAllowed)
}

async fn healthz<S: LeadStore>(State(st): State<AppState<S>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "features": crate::COMPILED_FEATURES,
        "profile": crate::BUILD_PROFILE,
        "store": st.search.store().describe(),
    }))
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Maps [`LeadsError`] to a JSON error body; internal details are logged, not returned.
#[derive(Debug)]
pub struct ApiError(pub LeadsError);

impl From<LeadsError> for ApiError {
    fn from(e: LeadsError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            LeadsError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, self.0.to_string()),
            e if e.is_client_error() => (StatusCode::BAD_REQUEST, e.to_string()),
            e => {
                log::error!("search failed: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Binds `addr` and serves until the process is stopped.
///
/// # Errors
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve<S: LeadStore>(addr: &str, search: LeadSearch<S>) -> Result<(), LeadsError> {
    let describe = search.store().describe();
    let app = router(AppState::new(search));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("listening on http://{} ({describe})", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
