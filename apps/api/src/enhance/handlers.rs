use axum::{extract::State, Json};
use serde::Deserialize;

use crate::enhance::EditorEnhancement;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EnhanceRequest {
    pub text: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub context: String,
}

/// POST /api/v1/enhance
/// Always 200: a failed enhancement is reported in the body with the
/// original text, never as an HTTP error.
pub async fn handle_enhance(
    State(state): State<AppState>,
    Json(req): Json<EnhanceRequest>,
) -> Json<EditorEnhancement> {
    let result = state
        .enhancer
        .enhance_for_editor(&req.text, &req.role, &req.context)
        .await;
    Json(result)
}
