use crate::core::{OutputFormat, Pipeline, Roster};
use crate::EtlEngine;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Shared cache for one hour, then serve stale while refetching.
pub const CACHE_CONTROL: &str = "s-maxage=3600, stale-while-revalidate";

pub struct AppState<P: Pipeline> {
    pub engine: EtlEngine<P>,
    pub roster: Roster,
}

impl<P: Pipeline> AppState<P> {
    pub fn new(engine: EtlEngine<P>, roster: Roster) -> Self {
        Self { engine, roster }
    }
}

#[derive(Debug, Deserialize)]
pub struct ContributionsQuery {
    pub format: Option<String>,
}

/// `/api/v1/:username` ignores its segment; both routes answer for the whole roster.
pub fn router<P: Pipeline + 'static>(state: Arc<AppState<P>>) -> Router {
    Router::new()
        .route("/api/v1/contributions", get(contributions::<P>))
        .route("/api/v1/:username", get(contributions::<P>))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn contributions<P: Pipeline + 'static>(
    State(state): State<Arc<AppState<P>>>,
    Query(query): Query<ContributionsQuery>,
) -> Response {
    let format = OutputFormat::from_param(query.format.as_deref());

    match state.engine.run(&state.roster, format).await {
        Ok(results) => ([(header::CACHE_CONTROL, CACHE_CONTROL)], Json(results)).into_response(),
        Err(e) => {
            tracing::error!(
                "❌ Roster fetch failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.user_friendly_message() })),
            )
                .into_response()
        }
    }
}
