//! Export adapter: turns the rendered CV into a downloadable PDF.
//!
//! Rasterization is a collaborator behind [`Rasterizer`]: the browser shell
//! captures the rendered subtree at [`RASTER_SCALE`] and uploads it, and
//! [`UploadedRaster`] hands that image to the adapter. Everything after the
//! raster (pagination, JPEG, PDF container) happens here on a blocking
//! thread. Failures never propagate: the caller gets an [`ExportOutcome`]
//! with `success: false` and a notification.

use async_trait::async_trait;
use bytes::Bytes;
use image::DynamicImage;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::export::pagination::{PageGeometry, A4};
use crate::render::RenderedCv;
use crate::store::Notification;

pub mod handlers;
pub mod pagination;
pub mod pdf;

/// Device-pixel ratio the raster is captured at.
pub const RASTER_SCALE: f32 = 2.0;

const MISSING_ELEMENT_MESSAGE: &str = "Could not find CV element to export";
const EXPORT_FAILED_MESSAGE: &str = "Failed to export CV to PDF. Please try again.";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("raster has no pixels")]
    EmptyRaster,

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("export task failed: {0}")]
    Task(String),
}

/// Produces a raster of one element of the rendered CV.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn rasterize(
        &self,
        cv: &RenderedCv,
        element_id: &str,
        scale: f32,
    ) -> Result<DynamicImage, ExportError>;
}

/// A raster the browser already captured; decoding happens on use.
pub struct UploadedRaster {
    bytes: Bytes,
}

impl UploadedRaster {
    pub fn new(bytes: Bytes) -> Self {
        Self { bytes }
    }
}

#[async_trait]
impl Rasterizer for UploadedRaster {
    async fn rasterize(
        &self,
        _cv: &RenderedCv,
        element_id: &str,
        _scale: f32,
    ) -> Result<DynamicImage, ExportError> {
        let image = image::load_from_memory(&self.bytes)?;
        info!(
            "Decoded uploaded raster of '{element_id}': {}x{}",
            image.width(),
            image.height()
        );
        Ok(image)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOutcome {
    pub success: bool,
    pub file_name: String,
    pub page_count: usize,
    #[serde(skip)]
    pub pdf: Option<Vec<u8>>,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Clone, Copy)]
pub struct ExportAdapter {
    scale: f32,
    page: PageGeometry,
}

impl Default for ExportAdapter {
    fn default() -> Self {
        Self {
            scale: RASTER_SCALE,
            page: A4,
        }
    }
}

impl ExportAdapter {
    pub async fn export(
        &self,
        rasterizer: &dyn Rasterizer,
        cv: &RenderedCv,
        element_id: &str,
        file_name: &str,
    ) -> ExportOutcome {
        let file_name = format!("{file_name}.pdf");

        if !cv.contains_element(element_id) {
            return ExportOutcome {
                success: false,
                file_name,
                page_count: 0,
                pdf: None,
                notifications: vec![Notification::destructive("Error", MISSING_ELEMENT_MESSAGE)],
            };
        }

        let mut notifications = vec![Notification::info(
            "Generating PDF",
            "Please wait while we create your CV...",
        )];

        match self.produce(rasterizer, cv, element_id).await {
            Ok(file) => {
                info!(
                    "Exported {file_name}: {} pages, {} bytes",
                    file.page_count,
                    file.bytes.len()
                );
                notifications.push(Notification::info("Success", "CV exported successfully to PDF"));
                ExportOutcome {
                    success: true,
                    file_name,
                    page_count: file.page_count,
                    pdf: Some(file.bytes),
                    notifications,
                }
            }
            Err(e) => {
                error!("Error exporting CV to PDF: {e}");
                notifications.push(Notification::destructive("Error", EXPORT_FAILED_MESSAGE));
                ExportOutcome {
                    success: false,
                    file_name,
                    page_count: 0,
                    pdf: None,
                    notifications,
                }
            }
        }
    }

    async fn produce(
        &self,
        rasterizer: &dyn Rasterizer,
        cv: &RenderedCv,
        element_id: &str,
    ) -> Result<pdf::PdfFile, ExportError> {
        let image = rasterizer.rasterize(cv, element_id, self.scale).await?;
        let page = self.page;
        // Encoding a full-quality JPEG of a 2x raster is CPU-bound.
        tokio::task::spawn_blocking(move || pdf::render_pdf(&image, page))
            .await
            .map_err(|e| ExportError::Task(e.to_string()))?
    }
}
