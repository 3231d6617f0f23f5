use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    error::{AppError, AppResult},
    models::{ContentSummary, ContentType, PopularItem, RecommendationItem, UserId, UserStats},
    services::{
        popular::popular_content, recommendations::get_recommendations, search::search_content,
        stats::compute_stats, RecommendationQuery,
    },
};

use super::AppState;

const DEFAULT_LIST_LIMIT: usize = 10;

// Request/Response types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    /// Integer or integer string
    #[serde(default)]
    pub user_id: Option<Value>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub category_filter: Option<String>,
    #[serde(default)]
    pub num_recommendations: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub recommendations: Vec<RecommendationItem>,
    pub user_id: UserId,
    pub content_type: Option<ContentType>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub model_loaded: bool,
    pub supported_content_types: Vec<ContentType>,
    pub loaded_content_types: Vec<ContentType>,
    pub total_content_items: usize,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub user_id: UserId,
    pub stats: UserStats,
}

#[derive(Debug, Serialize)]
pub struct ContentTypesResponse {
    pub content_types: Map<String, Value>,
    pub loaded_content_types: Vec<ContentType>,
    pub description: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default, rename = "type")]
    pub content_type: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub content_type_filter: Option<ContentType>,
    pub results: Vec<ContentSummary>,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct PopularParams {
    #[serde(default, rename = "type")]
    pub content_type: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct PopularResponse {
    pub content_type_filter: Option<ContentType>,
    pub popular_content: Vec<PopularItem>,
    pub count: usize,
}

// Validation

fn parse_user_id(raw: Option<&Value>) -> AppResult<UserId> {
    let invalid = || AppError::InvalidInput("userId must be a valid integer".to_string());

    match raw {
        None | Some(Value::Null) => Err(AppError::InvalidInput("userId is required".to_string())),
        Some(Value::Number(n)) => n.as_i64().ok_or_else(invalid),
        Some(Value::String(s)) => s.trim().parse().map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

/// Absent or blank means "all content types"
fn parse_content_type(raw: Option<&str>) -> AppResult<Option<ContentType>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => Ok(Some(s.parse()?)),
        None => Ok(None),
    }
}

fn parse_limit(raw: Option<i64>, default: usize, max: usize) -> AppResult<usize> {
    let Some(n) = raw else {
        return Ok(default);
    };

    match usize::try_from(n) {
        Ok(n) if (1..=max).contains(&n) => Ok(n),
        _ => Err(AppError::InvalidInput(format!(
            "numRecommendations must be between 1 and {}",
            max
        ))),
    }
}

// Handlers

/// Health check endpoint
///
/// Reports load status without triggering a load.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let engine = state.loaded_engine();

    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339(),
        model_loaded: engine.is_some(),
        supported_content_types: ContentType::ALL.to_vec(),
        loaded_content_types: engine
            .as_ref()
            .map(|e| e.catalog().content_types())
            .unwrap_or_default(),
        total_content_items: engine.as_ref().map(|e| e.catalog().len()).unwrap_or(0),
    })
}

/// Personalized recommendations for a user
pub async fn recommend(
    State(state): State<AppState>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> AppResult<Json<RecommendResponse>> {
    let Json(request) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    let user_id = parse_user_id(request.user_id.as_ref())?;
    let content_type = parse_content_type(request.content_type.as_deref())?;
    let limit = parse_limit(
        request.num_recommendations,
        state.config.default_num_recommendations,
        state.config.max_num_recommendations,
    )?;

    let engine = state.engine().await?;

    let query = RecommendationQuery {
        user_id,
        content_type,
        category_filter: request
            .category_filter
            .filter(|c| !c.trim().is_empty()),
        limit,
    };
    let mut rng = state.request_rng()?;
    let recommendations =
        tokio::task::spawn_blocking(move || get_recommendations(&engine, &query, &mut rng))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(RecommendResponse {
        count: recommendations.len(),
        recommendations,
        user_id,
        content_type,
    }))
}

/// Rating statistics for a user
pub async fn user_stats(
    State(state): State<AppState>,
    path: Result<Path<UserId>, PathRejection>,
) -> AppResult<Json<StatsResponse>> {
    let Path(user_id) = path
        .map_err(|_| AppError::InvalidInput("user_id must be a valid integer".to_string()))?;

    let engine = state.engine().await?;
    let stats = compute_stats(engine.catalog(), engine.ratings(), user_id);

    Ok(Json(StatsResponse { user_id, stats }))
}

/// Supported content types and their labels
pub async fn content_types(State(state): State<AppState>) -> Json<ContentTypesResponse> {
    let content_types = ContentType::ALL
        .iter()
        .map(|t| (t.key().to_string(), Value::from(t.label())))
        .collect();

    Json(ContentTypesResponse {
        content_types,
        loaded_content_types: state
            .loaded_engine()
            .map(|e| e.catalog().content_types())
            .unwrap_or_default(),
        description: "Supported content types for recommendations",
    })
}

/// Title search
pub async fn search(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> AppResult<Json<SearchResponse>> {
    let Query(params) = params.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    let query = params.q.unwrap_or_default().trim().to_lowercase();
    if query.is_empty() {
        return Err(AppError::InvalidInput(
            "Query parameter 'q' is required".to_string(),
        ));
    }
    let content_type = parse_content_type(params.content_type.as_deref())?;
    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT);

    let engine = state.engine().await?;
    let results = search_content(engine.catalog(), &query, content_type, limit);

    Ok(Json(SearchResponse {
        query,
        content_type_filter: content_type,
        count: results.len(),
        results,
    }))
}

/// Highest rated content
pub async fn popular(
    State(state): State<AppState>,
    params: Result<Query<PopularParams>, QueryRejection>,
) -> AppResult<Json<PopularResponse>> {
    let Query(params) = params.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    let content_type = parse_content_type(params.content_type.as_deref())?;
    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT);

    let engine = state.engine().await?;
    let popular_content = popular_content(
        engine.catalog(),
        engine.ratings(),
        content_type,
        limit,
        engine.settings().popular_min_ratings,
    );

    Ok(Json(PopularResponse {
        content_type_filter: content_type,
        count: popular_content.len(),
        popular_content,
    }))
}
