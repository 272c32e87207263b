use color_eyre::eyre::{Result, eyre};
use common_types::ImageSize;
use fast_image_resize::{FilterType, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, ImageFormat};
use rayon::prelude::*;
use std::io::Cursor;
use tracing::warn;

/// One encoded rendition.
#[derive(Debug, Clone)]
pub struct Derivative {
    pub size: ImageSize,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

/// Fits `(width, height)` inside `envelope` keeping the aspect ratio, never upscaling.
#[must_use]
pub fn target_dimensions(width: u32, height: u32, envelope: (u32, u32)) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }
    let (max_w, max_h) = envelope;
    let scale = (f64::from(max_w) / f64::from(width))
        .min(f64::from(max_h) / f64::from(height))
        .min(1.0);

    let scaled = |v: u32| ((f64::from(v) * scale).round() as u32).clamp(1, v);
    (scaled(width), scaled(height))
}

/// Decodes `bytes` and builds every derivative size, encoded in `format`.
///
/// A size that fails to resize or encode is logged and left out, the caller serves
/// the original for it. Only an undecodable source is an error.
pub fn generate_derivatives(bytes: &[u8], format: ImageFormat) -> Result<Vec<Derivative>> {
    let source = image::load_from_memory_with_format(bytes, format)?;
    let source = normalize(source, format);

    let derivatives = ImageSize::DERIVATIVES
        .par_iter()
        .filter_map(|&size| match build_derivative(&source, size, format) {
            Ok(derivative) => Some(derivative),
            Err(e) => {
                warn!("Could not build {size} derivative: {e}");
                None
            }
        })
        .collect();

    Ok(derivatives)
}

/// Reduces the decoded image to 8-bit RGB or RGBA, keeping alpha only where the
/// output format stores it.
fn normalize(image: DynamicImage, format: ImageFormat) -> DynamicImage {
    let keep_alpha = image.color().has_alpha() && format != ImageFormat::Jpeg;
    if keep_alpha {
        DynamicImage::ImageRgba8(image.into_rgba8())
    } else {
        DynamicImage::ImageRgb8(image.into_rgb8())
    }
}

fn build_derivative(
    source: &DynamicImage,
    size: ImageSize,
    format: ImageFormat,
) -> Result<Derivative> {
    let envelope = size
        .envelope()
        .ok_or_else(|| eyre!("{size} has no envelope"))?;
    let (orig_w, orig_h) = (source.width(), source.height());
    let (target_w, target_h) = target_dimensions(orig_w, orig_h, envelope);

    let resized = if (target_w, target_h) == (orig_w, orig_h) {
        source.clone()
    } else {
        let mut dst = DynamicImage::new(target_w, target_h, source.color());
        let options = ResizeOptions::new()
            .resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3));
        Resizer::new().resize(source, &mut dst, &options)?;
        dst
    };

    let mut bytes = Vec::new();
    resized.write_to(&mut Cursor::new(&mut bytes), format)?;

    Ok(Derivative {
        size,
        width: target_w,
        height: target_h,
        bytes,
    })
}
