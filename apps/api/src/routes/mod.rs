pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post, put},
    Router,
};

use crate::enhance::handlers::handle_enhance;
use crate::export::handlers::handle_export;
use crate::render::handlers as render;
use crate::state::AppState;
use crate::store::handlers as cv;

/// Rasters captured at 2x for a long CV run to several megabytes.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Document
        .route("/api/v1/cv", get(cv::handle_get_cv))
        .route(
            "/api/v1/cv/personal-info",
            patch(cv::handle_update_personal_info),
        )
        .route(
            "/api/v1/cv/personal-info/photo",
            put(cv::handle_set_photo).delete(cv::handle_clear_photo),
        )
        .route("/api/v1/cv/experiences", post(cv::handle_add_experience))
        .route(
            "/api/v1/cv/experiences/:id",
            patch(cv::handle_update_experience).delete(cv::handle_remove_experience),
        )
        .route("/api/v1/cv/education", post(cv::handle_add_education))
        .route(
            "/api/v1/cv/education/:id",
            patch(cv::handle_update_education).delete(cv::handle_remove_education),
        )
        .route("/api/v1/cv/skills", post(cv::handle_add_skill))
        .route(
            "/api/v1/cv/skills/:id",
            patch(cv::handle_update_skill).delete(cv::handle_remove_skill),
        )
        .route("/api/v1/cv/projects", post(cv::handle_add_project))
        .route(
            "/api/v1/cv/projects/:id",
            patch(cv::handle_update_project).delete(cv::handle_remove_project),
        )
        .route("/api/v1/cv/template", put(cv::handle_set_template))
        .route("/api/v1/cv/reset", post(cv::handle_reset))
        .route("/api/v1/cv/sample", post(cv::handle_load_sample))
        // Rendering
        .route("/api/v1/cv/render", get(render::handle_render))
        .route("/api/v1/cv/preview", get(render::handle_preview))
        .route("/api/v1/templates", get(render::handle_list_templates))
        // Enhancement and export
        .route("/api/v1/enhance", post(handle_enhance))
        .route("/api/v1/export", post(handle_export))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
