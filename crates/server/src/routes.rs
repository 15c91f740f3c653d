pub mod auth;
pub mod honor;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;
use auth::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Prometheus text exposition.
pub async fn metrics() -> impl IntoResponse {
    match service::observability::encode_metrics() {
        Ok(body) => (StatusCode::OK, [(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "metrics encode failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Build the full application router: public routes, authenticated honor
/// routes and the admin-only subset.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // 管理员接口
    let admin = Router::new()
        .route("/api/honor/getHonorList", post(honor::get_honor_list))
        .route("/api/honor/honorDelete", post(honor::honor_delete))
        .route("/api/honor/getHonorInfo", post(honor::get_honor_info))
        .route("/api/honor/honorEditSave", post(honor::honor_edit_save))
        .route("/api/honor/importHonorData", post(honor::import_honor_data))
        .route("/api/honor/getHonorListExcl", post(honor::get_honor_list_excl))
        .route("/api/honor/getHonorPageList", post(honor::get_honor_page_list))
        .route("/api/honor/getHonorPageListByStudent", post(honor::get_honor_page_list_by_student))
        .route_layer(middleware::from_fn(auth::require_admin));

    // 登录用户即可访问
    let authenticated = Router::new()
        .route("/api/honor/getHonorListByStudentId", post(honor::get_honor_list_by_student_id));

    let api = admin
        .merge(authenticated)
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer_token_state))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes));

    public
        .merge(api)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
