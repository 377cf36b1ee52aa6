//! Heatmap mock en PNG escala de grises.

use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageFormat, ImageReader, Luma};
use rand::Rng;

/// Grilla usada cuando la imagen de entrada no se puede decodificar.
pub const FALLBACK_SIDE: u32 = 10;
/// Lado máximo del heatmap.
pub const MAX_SIDE: u32 = 256;

/// Dimensiones del heatmap a partir de los bytes de la imagen de entrada.
/// Sólo lee la cabecera; no decodifica los píxeles.
pub fn dimensions_for(source: &[u8]) -> (u32, u32) {
    let dims = ImageReader::new(Cursor::new(source)).with_guessed_format()
                                                    .ok()
                                                    .and_then(|r| r.into_dimensions().ok());
    let Some((w, h)) = dims else {
        return (FALLBACK_SIDE, FALLBACK_SIDE);
    };
    let (w, h) = (w.max(1), h.max(1));
    let longest = w.max(h);
    if longest <= MAX_SIDE {
        return (w, h);
    }
    let scale = MAX_SIDE as f64 / longest as f64;
    (((w as f64 * scale).round() as u32).max(1), ((h as f64 * scale).round() as u32).max(1))
}

/// Renderiza un hotspot gaussiano con ruido y lo codifica como PNG.
pub fn render<R: Rng>(rng: &mut R, width: u32, height: u32) -> Result<Vec<u8>, image::ImageError> {
    let cx = rng.random_range(0.0..width as f64);
    let cy = rng.random_range(0.0..height as f64);
    let sigma = (width.max(height) as f64 * rng.random_range(0.15..0.35)).max(1.0);
    let noise: Vec<f64> = (0..width * height).map(|_| rng.random_range(0.0..0.15)).collect();

    let img = GrayImage::from_fn(width, height, |x, y| {
        let d2 = (x as f64 - cx).powi(2) + (y as f64 - cy).powi(2);
        let heat = (-d2 / (2.0 * sigma * sigma)).exp() + noise[(y * width + x) as usize];
        Luma([(heat.min(1.0) * 255.0).round() as u8])
    });
    let mut buf = Vec::new();
    DynamicImage::ImageLuma8(img).write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn undecodable_input_uses_fallback_grid() {
        assert_eq!(dimensions_for(b"not an image"), (FALLBACK_SIDE, FALLBACK_SIDE));
    }

    #[test]
    fn large_inputs_are_capped() {
        let mut rng = StdRng::seed_from_u64(7);
        let png = render(&mut rng, 40, 20).unwrap();
        assert_eq!(dimensions_for(&png), (40, 20));

        let big = render(&mut rng, 512, 128).unwrap();
        assert_eq!(dimensions_for(&big), (256, 64));
    }

    #[test]
    fn render_is_png() {
        let mut rng = StdRng::seed_from_u64(1);
        let png = render(&mut rng, FALLBACK_SIDE, FALLBACK_SIDE).unwrap();
        assert_eq!(&png[..4], b"\x89PNG");
    }
}
