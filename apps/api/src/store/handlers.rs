use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::cv::{
    CvDocument, EducationPatch, ExperiencePatch, PersonalInfoPatch, ProjectPatch, SkillPatch,
};
use crate::state::AppState;
use crate::store::{DocumentStore, Notification};

#[derive(Serialize)]
pub struct CvResponse {
    pub cv: CvDocument,
    pub notifications: Vec<Notification>,
}

#[derive(Serialize)]
pub struct CreatedResponse {
    pub id: String,
    #[serde(flatten)]
    pub body: CvResponse,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetTemplateRequest {
    pub template_id: String,
}

/// Snapshot of the document plus whatever the last mutation queued.
fn respond(store: &mut DocumentStore) -> Json<CvResponse> {
    Json(CvResponse {
        cv: store.document().clone(),
        notifications: store.take_notifications(),
    })
}

fn created(store: &mut DocumentStore, id: String) -> (StatusCode, Json<CreatedResponse>) {
    let Json(body) = respond(store);
    (StatusCode::CREATED, Json(CreatedResponse { id, body }))
}

/// GET /api/v1/cv
pub async fn handle_get_cv(State(state): State<AppState>) -> Json<CvResponse> {
    let mut store = state.store.lock().await;
    respond(&mut store)
}

/// PATCH /api/v1/cv/personal-info
pub async fn handle_update_personal_info(
    State(state): State<AppState>,
    Json(patch): Json<PersonalInfoPatch>,
) -> Json<CvResponse> {
    let mut store = state.store.lock().await;
    store.update_personal_info(patch).await;
    respond(&mut store)
}

/// PUT /api/v1/cv/personal-info/photo
/// Multipart with a single `photo` file field.
pub async fn handle_set_photo(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<CvResponse>, AppError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        if field.name() != Some("photo") {
            continue;
        }
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.to_string()))?;
        upload = Some((bytes, content_type));
    }
    let (bytes, content_type) =
        upload.ok_or_else(|| AppError::Validation("missing 'photo' field".to_string()))?;

    let mut store = state.store.lock().await;
    store.set_profile_photo(&bytes, &content_type).await?;
    Ok(respond(&mut store))
}

/// DELETE /api/v1/cv/personal-info/photo
pub async fn handle_clear_photo(State(state): State<AppState>) -> Json<CvResponse> {
    let mut store = state.store.lock().await;
    store.clear_profile_photo().await;
    respond(&mut store)
}

// ────────────────────────────────────────────────────────────────────────────
// Experiences
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/cv/experiences
pub async fn handle_add_experience(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreatedResponse>) {
    let mut store = state.store.lock().await;
    let id = store.add_experience().await;
    created(&mut store, id)
}

/// PATCH /api/v1/cv/experiences/:id
pub async fn handle_update_experience(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ExperiencePatch>,
) -> Json<CvResponse> {
    let mut store = state.store.lock().await;
    store.update_experience(&id, patch).await;
    respond(&mut store)
}

/// DELETE /api/v1/cv/experiences/:id
pub async fn handle_remove_experience(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<CvResponse> {
    let mut store = state.store.lock().await;
    store.remove_experience(&id).await;
    respond(&mut store)
}

// ────────────────────────────────────────────────────────────────────────────
// Education
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/cv/education
pub async fn handle_add_education(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreatedResponse>) {
    let mut store = state.store.lock().await;
    let id = store.add_education().await;
    created(&mut store, id)
}

/// PATCH /api/v1/cv/education/:id
pub async fn handle_update_education(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<EducationPatch>,
) -> Json<CvResponse> {
    let mut store = state.store.lock().await;
    store.update_education(&id, patch).await;
    respond(&mut store)
}

/// DELETE /api/v1/cv/education/:id
pub async fn handle_remove_education(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<CvResponse> {
    let mut store = state.store.lock().await;
    store.remove_education(&id).await;
    respond(&mut store)
}

// ────────────────────────────────────────────────────────────────────────────
// Skills
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/cv/skills
pub async fn handle_add_skill(State(state): State<AppState>) -> (StatusCode, Json<CreatedResponse>) {
    let mut store = state.store.lock().await;
    let id = store.add_skill().await;
    created(&mut store, id)
}

/// PATCH /api/v1/cv/skills/:id
pub async fn handle_update_skill(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<SkillPatch>,
) -> Json<CvResponse> {
    let mut store = state.store.lock().await;
    store.update_skill(&id, patch).await;
    respond(&mut store)
}

/// DELETE /api/v1/cv/skills/:id
pub async fn handle_remove_skill(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<CvResponse> {
    let mut store = state.store.lock().await;
    store.remove_skill(&id).await;
    respond(&mut store)
}

// ────────────────────────────────────────────────────────────────────────────
// Projects
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/cv/projects
pub async fn handle_add_project(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreatedResponse>) {
    let mut store = state.store.lock().await;
    let id = store.add_project().await;
    created(&mut store, id)
}

/// PATCH /api/v1/cv/projects/:id
pub async fn handle_update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ProjectPatch>,
) -> Json<CvResponse> {
    let mut store = state.store.lock().await;
    store.update_project(&id, patch).await;
    respond(&mut store)
}

/// DELETE /api/v1/cv/projects/:id
pub async fn handle_remove_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<CvResponse> {
    let mut store = state.store.lock().await;
    store.remove_project(&id).await;
    respond(&mut store)
}

// ────────────────────────────────────────────────────────────────────────────
// Whole-document operations
// ────────────────────────────────────────────────────────────────────────────

/// PUT /api/v1/cv/template
/// The id is stored as given; rendering falls back for unknown ids.
pub async fn handle_set_template(
    State(state): State<AppState>,
    Json(req): Json<SetTemplateRequest>,
) -> Json<CvResponse> {
    let mut store = state.store.lock().await;
    store.set_template(&req.template_id).await;
    respond(&mut store)
}

/// POST /api/v1/cv/reset
pub async fn handle_reset(State(state): State<AppState>) -> Json<CvResponse> {
    let mut store = state.store.lock().await;
    store.reset_cv().await;
    respond(&mut store)
}

/// POST /api/v1/cv/sample
pub async fn handle_load_sample(State(state): State<AppState>) -> Json<CvResponse> {
    let mut store = state.store.lock().await;
    store.load_sample_data().await;
    respond(&mut store)
}
