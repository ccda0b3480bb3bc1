// Splits one tall raster across fixed-size pages.
//
// The whole image is placed on every page, shifted up by one page height per
// page. Nothing is cropped, so content straddling a page boundary can appear
// cut or repeated; that matches what users already get from the browser.

use serde::Serialize;

use crate::export::ExportError;

/// Page box in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width_mm: f64,
    pub height_mm: f64,
}

/// ISO A4 portrait.
pub const A4: PageGeometry = PageGeometry {
    width_mm: 210.0,
    height_mm: 297.0,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pagination {
    /// Placed image size in millimetres; width always fills the page.
    pub image_width_mm: f64,
    pub image_height_mm: f64,
    /// Vertical offset of the image's top edge on each page, in millimetres.
    /// The first page is always 0; later pages are negative.
    pub page_offsets_mm: Vec<f64>,
}

impl Pagination {
    pub fn page_count(&self) -> usize {
        self.page_offsets_mm.len()
    }
}

/// Lays a `raster_width` × `raster_height` pixel image out on `page`.
pub fn paginate(
    raster_width: u32,
    raster_height: u32,
    page: PageGeometry,
) -> Result<Pagination, ExportError> {
    if raster_width == 0 || raster_height == 0 {
        return Err(ExportError::EmptyRaster);
    }

    let image_width = page.width_mm;
    let image_height = f64::from(raster_height) * image_width / f64::from(raster_width);

    let mut offsets = vec![0.0];
    let mut height_left = image_height - page.height_mm;
    while height_left > 0.0 {
        offsets.push(height_left - image_height);
        height_left -= page.height_mm;
    }

    Ok(Pagination {
        image_width_mm: image_width,
        image_height_mm: image_height,
        page_offsets_mm: offsets,
    })
}
