//! Quotation API handlers
//!
//! Handles endpoints related to quotation editing sessions:
//! - Open a quotation and read it back
//! - Add, edit and remove lines
//! - Edit quotation defaults
//! - Read the status summary
//! - Submit the finished document

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use common::model::quotation::{
    DefaultField, LineField, PricedLine, QuotationDefaults, QuotationDocument,
};
use common::model::summary::QuotationSummary;
use quotation_service::QuotationForm;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::AppState;
use crate::api::response::{ApiListResponse, ApiResponse};

/// Open quotation request
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct OpenQuotationRequest {
    /// Quotation defaults; the configured ones apply when omitted
    pub defaults: Option<QuotationDefaults>,
}

/// Line field edit
#[derive(Debug, Deserialize, ToSchema)]
pub struct LineFieldUpdate {
    /// Field to edit
    pub field: LineField,
    /// New value as typed: a string, number, boolean or null
    #[schema(value_type = Object)]
    #[serde(default)]
    pub value: Value,
}

/// Quotation default edit
#[derive(Debug, Deserialize, ToSchema)]
pub struct DefaultFieldUpdate {
    /// Default to edit
    pub field: DefaultField,
    /// New value as typed: a string, number, boolean or null
    #[schema(value_type = Object)]
    #[serde(default)]
    pub value: Value,
}

/// Current state of an editing session
#[derive(Debug, Serialize)]
pub struct QuotationView {
    pub id: Uuid,
    pub defaults: QuotationDefaults,
    pub lines: Vec<PricedLine>,
    pub summary: QuotationSummary,
    pub can_add_line: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&QuotationForm> for QuotationView {
    fn from(form: &QuotationForm) -> Self {
        Self {
            id: form.id(),
            defaults: form.defaults().clone(),
            lines: form.lines().to_vec(),
            summary: form.summary().clone(),
            can_add_line: form.can_add_line(),
            created_at: form.created_at(),
            updated_at: form.updated_at(),
        }
    }
}

/// Raw form input for a JSON value. Null becomes empty input.
pub fn raw_input(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        other => other.to_string(),
    }
}

/// Open a new quotation
#[utoipa::path(
    post,
    path = "/api/v1/quotations",
    request_body = OpenQuotationRequest,
    responses(
        (status = 200, description = "Quotation opened"),
        (status = 400, description = "Too many open quotations"),
        (status = 500, description = "Internal server error")
    ),
    tag = "quotation"
)]
pub async fn open_quotation(
    State(state): State<Arc<AppState>>,
    Json(request): Json<OpenQuotationRequest>,
) -> Result<ApiResponse<QuotationView>, ApiError> {
    let form = state.quotation_service.open_quotation(request.defaults).await?;
    Ok(ApiResponse::new(QuotationView::from(&form)))
}

/// Get a quotation by ID
#[utoipa::path(
    get,
    path = "/api/v1/quotations/{id}",
    params(
        ("id" = Uuid, Path, description = "Quotation ID")
    ),
    responses(
        (status = 200, description = "Quotation retrieved successfully"),
        (status = 404, description = "Quotation not found")
    ),
    tag = "quotation"
)]
pub async fn get_quotation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<QuotationView>, ApiError> {
    let form = state.quotation_service.get_quotation(id).await?
        .ok_or_else(|| ApiError::NotFound(format!("Quotation not found: {}", id)))?;
    Ok(ApiResponse::new(QuotationView::from(&form)))
}

/// Edit a quotation default
#[utoipa::path(
    patch,
    path = "/api/v1/quotations/{id}/defaults",
    params(
        ("id" = Uuid, Path, description = "Quotation ID")
    ),
    request_body = DefaultFieldUpdate,
    responses(
        (status = 200, description = "Default updated and lines repriced"),
        (status = 404, description = "Quotation not found")
    ),
    tag = "quotation"
)]
pub async fn update_default(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<DefaultFieldUpdate>,
) -> Result<ApiResponse<QuotationView>, ApiError> {
    let raw = raw_input(&request.value);
    let form = state.quotation_service.update_default(id, request.field, &raw).await?;
    Ok(ApiResponse::new(QuotationView::from(&form)))
}

/// List the lines of a quotation
#[utoipa::path(
    get,
    path = "/api/v1/quotations/{id}/lines",
    params(
        ("id" = Uuid, Path, description = "Quotation ID")
    ),
    responses(
        (status = 200, description = "Lines with their derived rates"),
        (status = 404, description = "Quotation not found")
    ),
    tag = "quotation"
)]
pub async fn get_lines(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<ApiListResponse<PricedLine>, ApiError> {
    let form = state.quotation_service.get_quotation(id).await?
        .ok_or_else(|| ApiError::NotFound(format!("Quotation not found: {}", id)))?;
    Ok(ApiListResponse::new(form.lines().to_vec()))
}

/// Add a blank line
#[utoipa::path(
    post,
    path = "/api/v1/quotations/{id}/lines",
    params(
        ("id" = Uuid, Path, description = "Quotation ID")
    ),
    responses(
        (status = 200, description = "Line added"),
        (status = 404, description = "Quotation not found")
    ),
    tag = "quotation"
)]
pub async fn add_line(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<QuotationView>, ApiError> {
    let form = state.quotation_service.add_line(id).await?;
    Ok(ApiResponse::new(QuotationView::from(&form)))
}

/// Edit one line field
#[utoipa::path(
    patch,
    path = "/api/v1/quotations/{id}/lines/{index}",
    params(
        ("id" = Uuid, Path, description = "Quotation ID"),
        ("index" = usize, Path, description = "Zero-based line position")
    ),
    request_body = LineFieldUpdate,
    responses(
        (status = 200, description = "Line updated and repriced"),
        (status = 404, description = "Quotation or line not found")
    ),
    tag = "quotation"
)]
pub async fn update_line(
    State(state): State<Arc<AppState>>,
    Path((id, index)): Path<(Uuid, usize)>,
    Json(request): Json<LineFieldUpdate>,
) -> Result<ApiResponse<QuotationView>, ApiError> {
    let raw = raw_input(&request.value);
    let form = state.quotation_service
        .update_line(id, index, request.field, &raw)
        .await?;
    Ok(ApiResponse::new(QuotationView::from(&form)))
}

/// Remove one line
#[utoipa::path(
    delete,
    path = "/api/v1/quotations/{id}/lines/{index}",
    params(
        ("id" = Uuid, Path, description = "Quotation ID"),
        ("index" = usize, Path, description = "Zero-based line position")
    ),
    responses(
        (status = 200, description = "Line removed"),
        (status = 404, description = "Quotation or line not found")
    ),
    tag = "quotation"
)]
pub async fn remove_line(
    State(state): State<Arc<AppState>>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<ApiResponse<QuotationView>, ApiError> {
    let form = state.quotation_service.remove_line(id, index).await?;
    Ok(ApiResponse::new(QuotationView::from(&form)))
}

/// Get the status summary
#[utoipa::path(
    get,
    path = "/api/v1/quotations/{id}/summary",
    params(
        ("id" = Uuid, Path, description = "Quotation ID")
    ),
    responses(
        (status = 200, description = "Summary per status bucket"),
        (status = 404, description = "Quotation not found")
    ),
    tag = "quotation"
)]
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<QuotationSummary>, ApiError> {
    let summary = state.quotation_service.summary(id).await?;
    Ok(ApiResponse::new(summary))
}

/// Submit the quotation and close the editing session
#[utoipa::path(
    post,
    path = "/api/v1/quotations/{id}/submit",
    params(
        ("id" = Uuid, Path, description = "Quotation ID")
    ),
    responses(
        (status = 200, description = "Finished quotation document"),
        (status = 404, description = "Quotation not found")
    ),
    tag = "quotation"
)]
pub async fn submit_quotation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<QuotationDocument>, ApiError> {
    let document = state.quotation_service.submit_quotation(id).await?;
    Ok(ApiResponse::new(document))
}
