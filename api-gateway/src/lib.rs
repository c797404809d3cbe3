// api-gateway/src/lib.rs
pub mod api;
pub mod error;
pub mod config;

use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};
use quotation_service::QuotationService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{
    pricing::price_line,
    quotation::{
        add_line, get_lines, get_quotation, get_summary, open_quotation, remove_line,
        submit_quotation, update_default, update_line,
    },
};

/// App state shared across handlers
pub struct AppState {
    /// Quotation editing sessions and line pricing
    pub quotation_service: Arc<QuotationService>,
}

/// API documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Quotation routes
        api::quotation::open_quotation,
        api::quotation::get_quotation,
        api::quotation::update_default,
        api::quotation::get_lines,
        api::quotation::add_line,
        api::quotation::update_line,
        api::quotation::remove_line,
        api::quotation::get_summary,
        api::quotation::submit_quotation,
        // Pricing routes
        api::pricing::price_line,
    ),
    components(
        schemas(
            // Quotation API
            api::quotation::OpenQuotationRequest,
            api::quotation::LineFieldUpdate,
            api::quotation::DefaultFieldUpdate,
            common::model::quotation::QuotationDefaults,
            common::model::quotation::QuotationLine,
            common::model::quotation::LineStatus,
            common::model::quotation::LineField,
            common::model::quotation::DefaultField,
            common::model::quotation::LinePricing,
            common::model::quotation::LineIssue,
            common::model::quotation::StatusBucket,
            common::model::summary::BucketSummary,

            // Pricing API
            api::pricing::PriceLineRequest,

            // Response models
            api::response::ResponseMetadata
        )
    ),
    tags(
        (name = "quotation", description = "Quotation editing endpoints"),
        (name = "pricing", description = "Stateless line pricing")
    ),
    info(
        title = "Freight Console Quotation API",
        version = "1.0.0",
        description = "API for editing freight quotations and computing their line rates and status summaries"
    )
)]
pub struct ApiDoc;

/// Liveness probe
pub async fn health_check() -> &'static str {
    "OK"
}

/// Build the application router
pub fn router(state: Arc<AppState>, log_level: Level) -> Router {
    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Set up API routes
    let api_routes = Router::new()
        // Quotation routes
        .route("/quotations", post(open_quotation))
        .route("/quotations/:id", get(get_quotation))
        .route("/quotations/:id/defaults", patch(update_default))
        .route("/quotations/:id/lines", get(get_lines).post(add_line))
        .route("/quotations/:id/lines/:index", patch(update_line).delete(remove_line))
        .route("/quotations/:id/summary", get(get_summary))
        .route("/quotations/:id/submit", post(submit_quotation))

        // Pricing routes
        .route("/pricing/line", post(price_line));

    // Set up Swagger UI
    let swagger_ui = SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi());

    // Combine all routes
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes)
        .merge(swagger_ui)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(log_level))
                .on_request(DefaultOnRequest::new().level(log_level))
                .on_response(DefaultOnResponse::new().level(log_level)),
        )
        .with_state(state)
}
