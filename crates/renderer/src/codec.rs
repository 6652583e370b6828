use std::path::Path;

use image::imageops::flip_vertical_in_place;
use image::{ColorType, ImageFormat};

use crate::error::{Result, ViewerError};

/// Decoded RGBA8 pixels, bottom row first.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Decodes `path` into RGBA8, flipped so the first row is the bottom of the
/// picture. Pixel-unit texture coordinates then put `(0, 0)` at the
/// lower-left corner of the quad.
pub fn decode(path: &Path) -> Result<DecodedImage> {
    let image = image::open(path).map_err(|source| ViewerError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })?;
    let mut rgba = image.to_rgba8();
    flip_vertical_in_place(&mut rgba);
    let (width, height) = rgba.dimensions();
    Ok(DecodedImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

/// Writes tightly packed 8-bit pixel data to a PNG.
///
/// `components` selects grey (1), grey+alpha (2), RGB (3) or RGBA (4).
pub fn save_png(path: &Path, width: u32, height: u32, components: u8, data: &[u8]) -> Result<()> {
    let color = match components {
        1 => ColorType::L8,
        2 => ColorType::La8,
        3 => ColorType::Rgb8,
        4 => ColorType::Rgba8,
        other => return Err(ViewerError::UnsupportedComponents(other)),
    };
    let expected = width as usize * height as usize * components as usize;
    if data.len() != expected {
        return Err(ViewerError::InvalidPixelBuffer {
            width,
            height,
            components,
            actual: data.len(),
        });
    }

    image::save_buffer_with_format(path, data, width, height, color, ImageFormat::Png).map_err(
        |source| ViewerError::ImageSave {
            path: path.to_path_buf(),
            source,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_decode_flips_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stripes.png");
        // Top row red, bottom row blue.
        let data = [255, 0, 0, 255, 0, 0, 0, 0, 255, 0, 0, 255];
        save_png(&path, 2, 2, 3, &data).expect("save png");

        let decoded = decode(&path).expect("decode png");
        assert_eq!((decoded.width, decoded.height), (2, 2));
        assert_eq!(decoded.pixels.len(), 16);
        assert_eq!(&decoded.pixels[0..4], &[0, 0, 255, 255]);
        assert_eq!(&decoded.pixels[8..12], &[255, 0, 0, 255]);
    }

    #[test]
    fn save_rejects_mismatched_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let err = save_png(&dir.path().join("bad.png"), 4, 4, 3, &[0; 10]).unwrap_err();
        assert!(matches!(err, ViewerError::InvalidPixelBuffer { actual: 10, .. }));
    }

    #[test]
    fn save_rejects_unknown_component_count() {
        let dir = tempfile::tempdir().unwrap();
        let err = save_png(&dir.path().join("bad.png"), 1, 1, 5, &[0; 5]).unwrap_err();
        assert!(matches!(err, ViewerError::UnsupportedComponents(5)));
    }

    #[test]
    fn decode_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = decode(&dir.path().join("missing.png")).unwrap_err();
        assert!(matches!(err, ViewerError::ImageDecode { .. }));
    }

    #[test]
    fn save_reports_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("out.png");
        let err = save_png(&path, 1, 1, 1, &[0]).unwrap_err();
        assert!(matches!(err, ViewerError::ImageSave { .. }));
    }
}
