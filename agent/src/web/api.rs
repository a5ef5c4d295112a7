//! REST API handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use content_flow::{FlowRequest, MergedItem};
use serde::{Deserialize, Serialize};

use super::state::AppState;

/// Generate content request body
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub user_query: Option<String>,
    #[serde(default)]
    pub tenant: Option<String>,
}

/// Successful response
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub data: Vec<MergedItem>,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub delivery: Vec<String>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            message: message.into(),
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn missing_query() -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new(
            "user_query is required",
            "Please provide a user_query in the request body",
        )),
    )
}

/// Run the content generation flow for one query
pub async fn generate_content(
    State(state): State<AppState>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            tracing::warn!("Rejected request body: {}", rejection.body_text());
            return Err(missing_query());
        }
    };

    let user_query = match req.user_query {
        Some(q) if !q.trim().is_empty() => q,
        _ => return Err(missing_query()),
    };

    let mut request = FlowRequest::new(user_query);
    if let Some(tenant) = req.tenant {
        request = request.with_tenant(tenant);
    }

    // Each run gets its own task so a panic surfaces as a 500
    let flow = state.flow.clone();
    let result = tokio::spawn(async move { flow.kickoff(request).await }).await;

    let flow_state = match result {
        Ok(flow_state) => flow_state,
        Err(e) => {
            tracing::error!("Error generating content: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(
                    e.to_string(),
                    "An error occurred while generating content",
                )),
            ));
        }
    };

    let data = flow_state.combined_results().to_vec();
    let message = if data.is_empty() {
        "No content was generated"
    } else {
        "Content generated successfully"
    };

    Ok(Json(GenerateResponse {
        success: true,
        data,
        message: message.to_string(),
        delivery: flow_state.whatsapp_send_output,
    }))
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub delivery_configured: bool,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model: state.model.clone(),
        delivery_configured: state.flow.delivery_enabled(),
    })
}
