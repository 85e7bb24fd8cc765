//! Gráfico de cumplimiento.
//!
//! Dona de dos segmentos (cumplido vs. pendiente) con el porcentaje
//! centrado, rasterizada a PNG. El valor de entrada se recorta a [0, 100]
//! antes de usarse: fuera de rango no es error. Cada llamada escribe un
//! archivo nuevo `{base}_{pct}.png`; no hay capa de cache.
//!
//! El rótulo central se dibuja con una fuente de mapa de bits propia
//! (dígitos y `%`): el corpus no trae rasterizador de texto y la etiqueta
//! sólo necesita ese alfabeto.

use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, Rgb, RgbImage};

use crate::error::RenderError;
use crate::imagen::encode_png;

/// Paleta y geometría del gráfico.
#[derive(Debug, Clone)]
pub struct ChartOptions {
    /// Ancho físico al incrustar en el documento (mm).
    pub width_mm: f64,
    /// Segmento cumplido.
    pub color_cumplimiento: [u8; 3],
    /// Segmento pendiente.
    pub color_pendiente: [u8; 3],
    /// Fondo (blanco para compatibilidad DOCX).
    pub background: [u8; 3],
    /// Lado del lienzo en píxeles.
    pub size_px: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        // Paleta del branding original: verde-azulado sobre azul profundo.
        Self { width_mm: 80.0,
               color_cumplimiento: [0x2c, 0x53, 0x64],
               color_pendiente: [0x20, 0x3a, 0x43],
               background: [0xff, 0xff, 0xff],
               size_px: 480 }
    }
}

/// Renderiza la dona y devuelve la ruta del PNG escrito en `out_dir`.
pub fn render_compliance_chart(porcentaje: f64,
                               nombre_base: &str,
                               out_dir: &Path,
                               opts: &ChartOptions)
                               -> Result<PathBuf, RenderError> {
    let pct = porcentaje.clamp(0.0, 100.0);

    let size = opts.size_px.max(64);
    let centro = size as f64 / 2.0;
    let outer = centro * 0.95;
    let inner = outer * 0.52; // círculo central del look "donut"
    let filled_sweep = std::f64::consts::TAU * pct / 100.0;

    let mut img = RgbImage::from_pixel(size, size, Rgb(opts.background));
    for y in 0..size {
        for x in 0..size {
            let dx = x as f64 + 0.5 - centro;
            let dy = y as f64 + 0.5 - centro;
            let r = (dx * dx + dy * dy).sqrt();
            if r < inner || r > outer {
                continue;
            }
            // Ángulo desde las 12 en punto, horario.
            let mut theta = dx.atan2(-dy);
            if theta < 0.0 {
                theta += std::f64::consts::TAU;
            }
            let color = if theta <= filled_sweep {
                opts.color_cumplimiento
            } else {
                opts.color_pendiente
            };
            img.put_pixel(x, y, Rgb(color));
        }
    }

    let etiqueta = format!("{:.0}%", pct);
    draw_centered_label(&mut img, &etiqueta, opts.color_cumplimiento);

    fs::create_dir_all(out_dir)?;
    let file_path = out_dir.join(format!("{}_{}.png", nombre_base, pct as u32));
    let png = encode_png(&DynamicImage::ImageRgb8(img))?;
    fs::write(&file_path, png).map_err(|e| RenderError::Chart(format!("no se pudo escribir {}: {}",
                                                                      file_path.display(), e)))?;
    Ok(file_path)
}

// ---------------------------------------------------------------
// Fuente de mapa de bits 5x7 para la etiqueta central.
// ---------------------------------------------------------------

const GLYPH_W: u32 = 5;
const GLYPH_H: u32 = 7;

fn glyph(c: char) -> Option<[u8; 7]> {
    let g = match c {
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        '%' => [0b11001, 0b11010, 0b00010, 0b00100, 0b01000, 0b01011, 0b10011],
        _ => return None,
    };
    Some(g)
}

fn draw_centered_label(img: &mut RgbImage, text: &str, color: [u8; 3]) {
    let scale = (img.width() / 80).max(2); // ~6 para el lienzo por defecto
    let spacing = scale;
    let glyphs: Vec<[u8; 7]> = text.chars().filter_map(glyph).collect();
    if glyphs.is_empty() {
        return;
    }
    let total_w = glyphs.len() as u32 * GLYPH_W * scale + (glyphs.len() as u32 - 1) * spacing;
    let total_h = GLYPH_H * scale;
    let mut x0 = img.width().saturating_sub(total_w) / 2;
    let y0 = img.height().saturating_sub(total_h) / 2;

    for g in glyphs {
        for (row, bits) in g.iter().enumerate() {
            for col in 0..GLYPH_W {
                if bits & (1 << (GLYPH_W - 1 - col)) == 0 {
                    continue;
                }
                for sy in 0..scale {
                    for sx in 0..scale {
                        let px = x0 + col * scale + sx;
                        let py = y0 + row as u32 * scale + sy;
                        if px < img.width() && py < img.height() {
                            img.put_pixel(px, py, Rgb(color));
                        }
                    }
                }
            }
        }
        x0 += GLYPH_W * scale + spacing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abrir(path: &Path) -> image::DynamicImage {
        image::load_from_memory(&fs::read(path).expect("archivo del gráfico")).expect("png válido")
    }

    #[test]
    fn out_of_range_high_clamps_to_100() {
        let dir = tempfile::tempdir().expect("tempdir");
        let opts = ChartOptions::default();
        let path = render_compliance_chart(150.0, "cumplimiento_t", dir.path(), &opts).expect("render");
        assert!(path.file_name().unwrap().to_string_lossy().ends_with("_100.png"));

        // Todo el anillo queda en el color de cumplimiento: muestreamos un
        // punto a la izquierda del centro (mitad "pendiente" de una dona
        // parcial).
        let img = abrir(&path).to_rgb8();
        let size = opts.size_px;
        let px = img.get_pixel(size / 2 - (size as f64 * 0.35) as u32, size / 2);
        assert_eq!(px.0, opts.color_cumplimiento);
    }

    #[test]
    fn out_of_range_low_clamps_to_0() {
        let dir = tempfile::tempdir().expect("tempdir");
        let opts = ChartOptions::default();
        let path = render_compliance_chart(-5.0, "cumplimiento_t", dir.path(), &opts).expect("render");
        assert!(path.file_name().unwrap().to_string_lossy().ends_with("_0.png"));

        let img = abrir(&path).to_rgb8();
        let size = opts.size_px;
        let px = img.get_pixel(size / 2 - (size as f64 * 0.35) as u32, size / 2);
        assert_eq!(px.0, opts.color_pendiente);
    }

    #[test]
    fn file_name_truncates_percentage() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path =
            render_compliance_chart(72.9, "cumplimiento_REP-1", dir.path(), &ChartOptions::default()).expect("render");
        assert_eq!(path.file_name().unwrap().to_string_lossy(), "cumplimiento_REP-1_72.png");
    }

    #[test]
    fn half_filled_ring_splits_colors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let opts = ChartOptions::default();
        let path = render_compliance_chart(50.0, "cumplimiento_t", dir.path(), &opts).expect("render");
        let img = abrir(&path).to_rgb8();
        let size = opts.size_px;
        let ring = (size as f64 * 0.35) as u32;
        // 50%: derecha cumplida, izquierda pendiente.
        assert_eq!(img.get_pixel(size / 2 + ring, size / 2).0, opts.color_cumplimiento);
        assert_eq!(img.get_pixel(size / 2 - ring, size / 2).0, opts.color_pendiente);
    }
}
