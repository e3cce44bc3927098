use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use boatcrumbs_core::{
    range::DateRange, summary::TrackSummary, AnnotatedFix, PipelineMode, TrackError,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PositionsQuery {
    pub from_date: String,
    pub to_date: String,
    #[serde(default)]
    pub mode: PipelineMode,
}

#[derive(Debug, Serialize)]
pub struct PositionsResponse {
    pub positions: Vec<AnnotatedFix>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/positions", get(positions))
        .route("/summary", get(summary))
        .with_state(state)
}

pub async fn positions(
    State(state): State<AppState>,
    query: Result<Query<PositionsQuery>, QueryRejection>,
) -> Result<Json<PositionsResponse>, ApiError> {
    let Query(query) = query?;
    let positions = load_track(&state, &query, query.mode).await?;
    Ok(Json(PositionsResponse { positions }))
}

pub async fn summary(
    State(state): State<AppState>,
    query: Result<Query<PositionsQuery>, QueryRejection>,
) -> Result<Json<TrackSummary>, ApiError> {
    let Query(query) = query?;
    let fixes = load_track(&state, &query, PipelineMode::Coalesce).await?;
    Ok(Json(TrackSummary::build(&fixes, state.pipeline.config())))
}

async fn load_track(
    state: &AppState,
    query: &PositionsQuery,
    mode: PipelineMode,
) -> Result<Vec<AnnotatedFix>, ApiError> {
    let range = DateRange::from_calendar_days(&query.from_date, &query.to_date)
        .map_err(TrackError::from)?;

    let raw = state.source.fetch(&range).await.map_err(ApiError::Source)?;
    Ok(state.pipeline.run(mode, raw)?)
}

#[derive(Debug)]
pub enum ApiError {
    BadQuery(QueryRejection),
    Track(TrackError),
    Source(anyhow::Error),
}

impl From<QueryRejection> for ApiError {
    fn from(err: QueryRejection) -> Self {
        ApiError::BadQuery(err)
    }
}

impl From<TrackError> for ApiError {
    fn from(err: TrackError) -> Self {
        ApiError::Track(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadQuery(err) => {
                warn!("rejected query string: {err}");
                (err.status(), err.body_text())
            }
            ApiError::Track(TrackError::DateRange(err)) => {
                warn!("rejected date range: {err}");
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            ApiError::Track(err) => {
                error!("track processing failed: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            ApiError::Source(err) => {
                error!("fix source failed: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "failed to load fixes".to_string(),
                )
            }
        };
        (status, Json(serde_json::json!({ "detail": message }))).into_response()
    }
}
