//! Raster → PDF.
//!
//! The raster is flattened onto white, JPEG-encoded once at full quality and
//! stored as a single image XObject. Every page draws that same object at
//! its own vertical offset (see [`paginate`]).

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgb, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use crate::export::pagination::{paginate, PageGeometry, Pagination};
use crate::export::ExportError;

const JPEG_QUALITY: u8 = 100;
const POINTS_PER_MM: f64 = 72.0 / 25.4;
const IMAGE_NAME: &str = "Im0";

/// Composites any alpha over a white background.
pub fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = u16::from(a);
        let blend = |c: u8| ((u16::from(c) * alpha + 255 * (255 - alpha)) / 255) as u8;
        out.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
    }
    out
}

pub fn encode_jpeg(rgb: &RgbImage) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY).encode_image(rgb)?;
    Ok(buf)
}

/// A finished PDF and how many pages it has.
#[derive(Debug)]
pub struct PdfFile {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// Runs the whole pipeline. CPU-bound; call from `spawn_blocking`.
pub fn render_pdf(image: &DynamicImage, page: PageGeometry) -> Result<PdfFile, ExportError> {
    let layout = paginate(image.width(), image.height(), page)?;
    let rgb = flatten_onto_white(image);
    let jpeg = encode_jpeg(&rgb)?;
    let bytes = build_pdf(&jpeg, rgb.width(), rgb.height(), &layout, page)?;
    Ok(PdfFile {
        bytes,
        page_count: layout.page_count(),
    })
}

fn real(value: f64) -> Object {
    Object::Real(value as _)
}

fn page_contents(layout: &Pagination, page: PageGeometry, offset_mm: f64) -> Content {
    let width = layout.image_width_mm * POINTS_PER_MM;
    let height = layout.image_height_mm * POINTS_PER_MM;
    // PDF space grows upwards from the bottom-left corner.
    let bottom = (page.height_mm - (offset_mm + layout.image_height_mm)) * POINTS_PER_MM;

    Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    real(width),
                    real(0.0),
                    real(0.0),
                    real(height),
                    real(0.0),
                    real(bottom),
                ],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ],
    }
}

fn build_pdf(
    jpeg: &[u8],
    pixel_width: u32,
    pixel_height: u32,
    layout: &Pagination,
    page: PageGeometry,
) -> Result<Vec<u8>, ExportError> {
    let pdf_err = |e: lopdf::Error| ExportError::Pdf(e.to_string());

    let mut doc = Document::with_version("1.5");
    let pages_id: ObjectId = doc.new_object_id();

    let image = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(pixel_width),
            "Height" => i64::from(pixel_height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8_i64,
            "Filter" => "DCTDecode",
        },
        jpeg.to_vec(),
    )
    .with_compression(false);
    let image_id = doc.add_object(image);

    let resources_id = doc.add_object(dictionary! {
        "XObject" => dictionary! { IMAGE_NAME => image_id },
    });

    let media_box: Vec<Object> = vec![
        real(0.0),
        real(0.0),
        real(page.width_mm * POINTS_PER_MM),
        real(page.height_mm * POINTS_PER_MM),
    ];

    let mut kids: Vec<Object> = Vec::with_capacity(layout.page_count());
    for &offset in &layout.page_offsets_mm {
        let content = page_contents(layout, page, offset);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().map_err(pdf_err)?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => media_box.clone(),
        });
        kids.push(page_id.into());
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Count" => kids.len() as i64,
        "Kids" => kids,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    Ok(buf)
}
