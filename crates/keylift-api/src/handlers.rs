use crate::guides::{Guide, OPTIMIZATION_GUIDES};
use crate::{ApiError, ApiResult, AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use keylift_core::{AnalysisRequest, AnalysisResult};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

#[derive(Deserialize)]
pub struct AnalyzeRequestDto {
    pub business_type: String,
    pub location: String,
    /// Accepts either a list of terms or one comma-separated string, since
    /// the frontend historically sent both shapes.
    #[serde(default, deserialize_with = "specialty_terms")]
    pub specialty: Vec<String>,
    #[serde(default)]
    pub current_daily_visitors: u64,
    #[serde(default = "default_target_visitors")]
    pub target_daily_visitors: u64,
}

fn default_target_visitors() -> u64 {
    100
}

fn specialty_terms<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let terms = match value {
        Value::String(s) => s.split(',').map(str::trim).map(String::from).collect(),
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| item.as_str().map(str::trim).map(String::from))
            .collect(),
        Value::Null => Vec::new(),
        _ => return Err(serde::de::Error::custom("specialty must be a string or a list")),
    };
    Ok(terms
        .into_iter()
        .filter(|s: &String| !s.is_empty())
        .collect())
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub llm: &'static str,
    pub keyword_stats: &'static str,
    pub local_search: &'static str,
}

#[derive(Serialize)]
pub struct BusinessTypesResponse {
    pub business_types: Vec<String>,
}

#[derive(Serialize)]
pub struct GuidesResponse {
    pub guides: Vec<Guide>,
}

pub async fn root() -> Json<Value> {
    Json(json!({
        "service": "Keylift keyword strategy API",
        "version": option_env!("CARGO_PKG_VERSION").unwrap_or("0.0.0"),
        "endpoints": {
            "analyze": "/api/analyze",
            "business_types": "/api/business-types",
            "guides": "/api/guides",
            "health": "/health"
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    fn flag(configured: bool) -> &'static str {
        if configured {
            "configured"
        } else {
            "not_configured"
        }
    }

    let settings = &state.settings;
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: option_env!("CARGO_PKG_VERSION").unwrap_or("0.0.0").to_string(),
        llm: flag(
            settings.llm.enabled
                && (settings.llm.api_key.is_some() || std::env::var("OPENAI_API_KEY").is_ok()),
        ),
        keyword_stats: flag(
            settings.search_ads.api_key.is_some() && settings.search_ads.secret_key.is_some(),
        ),
        local_search: flag(
            settings.listing_search.client_id.is_some()
                && settings.listing_search.client_secret.is_some(),
        ),
    })
}

pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequestDto>,
) -> ApiResult<Json<AnalysisResult>> {
    let request = AnalysisRequest {
        business_type: request.business_type,
        location: request.location,
        specialty: request.specialty,
        current_daily_visitors: request.current_daily_visitors,
        target_daily_visitors: request.target_daily_visitors,
    };

    let result = state.engine.analyze(&request).await.map_err(ApiError::Keylift)?;
    Ok(Json(result))
}

pub async fn business_types(State(state): State<AppState>) -> Json<BusinessTypesResponse> {
    Json(BusinessTypesResponse {
        business_types: state.engine.store().list(),
    })
}

pub async fn list_guides() -> Json<GuidesResponse> {
    Json(GuidesResponse {
        guides: OPTIMIZATION_GUIDES.values().cloned().collect(),
    })
}

pub async fn guide_by_section(Path(section): Path<String>) -> ApiResult<Json<Guide>> {
    OPTIMIZATION_GUIDES
        .get(section.as_str())
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("guide '{}' not found", section)))
}
