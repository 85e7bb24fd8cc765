//! Reprocesado de imágenes para incrustar en el documento.
//!
//! Cada binario se reescala a un ancho máximo (manteniendo proporción) y se
//! re-codifica: con canal alfa sale PNG (sin pérdida, conserva la
//! transparencia), sin alfa sale JPEG calidad 90. El par tamaño/calidad es
//! un compromiso deliberado, no un requisito de corrección.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageEncoder};

use crate::error::RenderError;

/// Codificación final del binario reprocesado.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageEncoding {
    Png,
    Jpeg,
}

impl ImageEncoding {
    /// Extensión de archivo para la parte de medios del documento.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageEncoding::Png => "png",
            ImageEncoding::Jpeg => "jpeg",
        }
    }

    /// Content type de la parte.
    pub fn content_type(&self) -> &'static str {
        match self {
            ImageEncoding::Png => "image/png",
            ImageEncoding::Jpeg => "image/jpeg",
        }
    }
}

/// Imagen lista para incrustar: bytes codificados más sus dimensiones.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub data: Vec<u8>,
    pub encoding: ImageEncoding,
    pub width: u32,
    pub height: u32,
}

/// Reescala a `max_width` si hace falta y re-codifica según presencia de
/// canal alfa.
pub fn reprocess_image(data: &[u8], max_width: u32) -> Result<ProcessedImage, RenderError> {
    let im = image::load_from_memory(data).map_err(|e| RenderError::Image(e.to_string()))?;

    let im = if im.width() > max_width {
        let ratio = max_width as f64 / im.width() as f64;
        let new_h = ((im.height() as f64 * ratio) as u32).max(1);
        im.resize_exact(max_width, new_h, FilterType::Lanczos3)
    } else {
        im
    };

    let (width, height) = im.dimensions();
    let has_alpha = im.color().has_alpha();

    let mut out = Vec::new();
    let encoding = if has_alpha {
        let rgba = im.to_rgba8();
        PngEncoder::new(&mut out).write_image(rgba.as_raw(), width, height, image::ExtendedColorType::Rgba8)
                                 .map_err(|e| RenderError::Image(e.to_string()))?;
        ImageEncoding::Png
    } else {
        let rgb = im.to_rgb8();
        JpegEncoder::new_with_quality(&mut out, 90).write_image(rgb.as_raw(),
                                                                width,
                                                                height,
                                                                image::ExtendedColorType::Rgb8)
                                                   .map_err(|e| RenderError::Image(e.to_string()))?;
        ImageEncoding::Jpeg
    };

    Ok(ProcessedImage { data: out,
                        encoding,
                        width,
                        height })
}

/// Codifica un `DynamicImage` ya construido (lo usa el gráfico).
pub(crate) fn encode_png(im: &DynamicImage) -> Result<Vec<u8>, RenderError> {
    let rgb = im.to_rgb8();
    let mut out = Vec::new();
    PngEncoder::new(&mut out).write_image(rgb.as_raw(), im.width(), im.height(), image::ExtendedColorType::Rgb8)
                             .map_err(|e| RenderError::Image(e.to_string()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    fn png_bytes_rgba(w: u32, h: u32) -> Vec<u8> {
        let im = RgbaImage::from_pixel(w, h, Rgba([10, 20, 30, 128]));
        let mut out = Vec::new();
        PngEncoder::new(&mut out).write_image(im.as_raw(), w, h, image::ExtendedColorType::Rgba8)
                                 .expect("png test");
        out
    }

    fn png_bytes_rgb(w: u32, h: u32) -> Vec<u8> {
        let im = RgbImage::from_pixel(w, h, Rgb([10, 20, 30]));
        let mut out = Vec::new();
        PngEncoder::new(&mut out).write_image(im.as_raw(), w, h, image::ExtendedColorType::Rgb8)
                                 .expect("png test");
        out
    }

    #[test]
    fn alpha_input_stays_png() {
        let procesada = reprocess_image(&png_bytes_rgba(40, 20), 500).expect("reprocesado");
        assert_eq!(procesada.encoding, ImageEncoding::Png);
        assert_eq!((procesada.width, procesada.height), (40, 20));
        // sigue siendo decodificable y con alfa
        let reabierta = image::load_from_memory(&procesada.data).expect("decodifica");
        assert!(reabierta.color().has_alpha());
    }

    #[test]
    fn opaque_input_becomes_jpeg() {
        let procesada = reprocess_image(&png_bytes_rgb(40, 20), 500).expect("reprocesado");
        assert_eq!(procesada.encoding, ImageEncoding::Jpeg);
        assert!(image::load_from_memory(&procesada.data).is_ok());
    }

    #[test]
    fn wide_image_is_downscaled_keeping_ratio() {
        let procesada = reprocess_image(&png_bytes_rgb(1000, 400), 500).expect("reprocesado");
        assert_eq!(procesada.width, 500);
        assert_eq!(procesada.height, 200);
    }

    #[test]
    fn narrow_image_is_left_alone() {
        let procesada = reprocess_image(&png_bytes_rgb(100, 400), 500).expect("reprocesado");
        assert_eq!((procesada.width, procesada.height), (100, 400));
    }

    #[test]
    fn garbage_input_is_an_error() {
        assert!(reprocess_image(b"no soy una imagen", 500).is_err());
    }
}
