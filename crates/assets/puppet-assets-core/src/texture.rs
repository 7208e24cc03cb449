//! Texture decoding and size capping.

use image::imageops::FilterType;
use image::{GenericImageView, RgbaImage};
use log::debug;
use puppet_api_core::TextureImage;

use crate::error::LoadError;

/// Decode an encoded image (png/jpeg/webp) into RGBA8.
pub fn decode_texture(path: &str, bytes: &[u8]) -> Result<TextureImage, LoadError> {
    let img = image::load_from_memory(bytes).map_err(|e| LoadError::DecodeFailure {
        path: path.to_string(),
        reason: e.to_string(),
    })?;
    let (width, height) = img.dimensions();
    Ok(TextureImage {
        width,
        height,
        rgba: img.to_rgba8().into_raw(),
    })
}

/// Downscale so neither side exceeds `max_size`, keeping the aspect ratio.
/// Images already within bounds are returned as a plain copy.
pub fn fit_within(texture: &TextureImage, max_size: u32) -> TextureImage {
    let longest = texture.width.max(texture.height);
    if max_size == 0 || longest <= max_size {
        return texture.clone();
    }
    let ratio = max_size as f64 / longest as f64;
    let w = ((texture.width as f64 * ratio).round() as u32).max(1);
    let h = ((texture.height as f64 * ratio).round() as u32).max(1);
    let Some(src) = RgbaImage::from_raw(texture.width, texture.height, texture.rgba.clone()) else {
        return texture.clone();
    };
    debug!(
        "capping texture {}x{} -> {}x{}",
        texture.width, texture.height, w, h
    );
    let out = image::imageops::resize(&src, w, h, FilterType::Triangle);
    TextureImage {
        width: w,
        height: h,
        rgba: out.into_raw(),
    }
}
