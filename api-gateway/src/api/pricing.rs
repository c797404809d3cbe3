//! Pricing API handlers
//!
//! Stateless line pricing for callers that keep their own line state.

use std::sync::Arc;

use axum::{extract::State, Json};
use common::model::quotation::{LineOutcome, QuotationDefaults, QuotationLine};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::AppState;
use crate::api::response::ApiResponse;

/// Price line request
#[derive(Debug, Deserialize, ToSchema)]
pub struct PriceLineRequest {
    /// Line inputs
    pub line: QuotationLine,
    /// Quotation defaults; the configured ones apply when omitted
    #[serde(default)]
    pub defaults: Option<QuotationDefaults>,
}

/// Price a single line
#[utoipa::path(
    post,
    path = "/api/v1/pricing/line",
    request_body = PriceLineRequest,
    responses(
        (status = 200, description = "Derived rates, or the reason the line cannot be priced"),
        (status = 400, description = "Bad request")
    ),
    tag = "pricing"
)]
pub async fn price_line(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PriceLineRequest>,
) -> Result<ApiResponse<LineOutcome>, ApiError> {
    let outcome = state
        .quotation_service
        .price_line(&request.line, request.defaults.as_ref());
    Ok(ApiResponse::new(outcome))
}
