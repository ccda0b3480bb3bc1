use axum::{extract::State, response::Html, Json};

use crate::render::{RenderOutput, TemplateInfo};
use crate::state::AppState;

/// GET /api/v1/cv/render
pub async fn handle_render(State(state): State<AppState>) -> Json<RenderOutput> {
    let store = state.store.lock().await;
    Json(state.templates.render(store.document()))
}

/// GET /api/v1/cv/preview
pub async fn handle_preview(State(state): State<AppState>) -> Html<String> {
    let store = state.store.lock().await;
    Html(state.templates.render(store.document()).html)
}

/// GET /api/v1/templates
pub async fn handle_list_templates(State(state): State<AppState>) -> Json<Vec<TemplateInfo>> {
    Json(state.templates.available_templates())
}
