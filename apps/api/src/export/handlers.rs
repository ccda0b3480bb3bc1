use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;

use crate::errors::AppError;
use crate::export::UploadedRaster;
use crate::state::AppState;

pub const DEFAULT_FILE_NAME: &str = "my-cv";

/// Keeps file names safe for a Content-Disposition header.
fn sanitize_file_name(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .trim_end_matches(".pdf")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ' ' | '.'))
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        DEFAULT_FILE_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

#[derive(Default)]
struct ExportForm {
    raster: Option<Bytes>,
    element_id: Option<String>,
    file_name: Option<String>,
}

async fn read_form(mut multipart: Multipart) -> Result<ExportForm, AppError> {
    let mut form = ExportForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "raster" => {
                form.raster = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::Validation(e.to_string()))?,
                );
            }
            "element_id" => {
                form.element_id = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::Validation(e.to_string()))?,
                );
            }
            "file_name" => {
                form.file_name = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::Validation(e.to_string()))?,
                );
            }
            _ => {}
        }
    }
    Ok(form)
}

/// POST /api/v1/export
/// Multipart fields: `raster` (PNG/JPEG of the rendered CV, required),
/// `element_id` (defaults to the template root), `file_name` (without `.pdf`).
pub async fn handle_export(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let form = read_form(multipart).await?;
    let raster = form
        .raster
        .ok_or_else(|| AppError::Validation("missing 'raster' field".to_string()))?;

    let rendered = {
        let store = state.store.lock().await;
        state.templates.render(store.document()).cv
    };
    let element_id = form
        .element_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| rendered.element_id.clone());
    let file_name = sanitize_file_name(form.file_name.as_deref().unwrap_or(DEFAULT_FILE_NAME));

    let mut outcome = state
        .exporter
        .export(&UploadedRaster::new(raster), &rendered, &element_id, &file_name)
        .await;

    match outcome.pdf.take() {
        Some(pdf) if outcome.success => Ok((
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", outcome.file_name),
                ),
            ],
            pdf,
        )
            .into_response()),
        _ => Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(outcome)).into_response()),
    }
}
