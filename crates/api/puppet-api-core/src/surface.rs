//! Render surface contract and the pixel containers it exchanges.

use serde::{Deserialize, Serialize};

use crate::engine::{EngineError, ModelHandle};

/// Decoded RGBA8 texture, row-major, top row first.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureImage {
    pub fn byte_len(&self) -> usize {
        self.rgba.len()
    }
}

/// Captured frame, RGBA8, row-major, top row first.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgba: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4 + 3;
        self.rgba.get(i).copied().unwrap_or(0)
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        if let Some(px) = self.rgba.get_mut(i..i + 4) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Copy out a sub-rectangle, clipped to the buffer.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> PixelBuffer {
        let x0 = x.min(self.width);
        let y0 = y.min(self.height);
        let w = width.min(self.width - x0);
        let h = height.min(self.height - y0);
        let mut out = PixelBuffer::new(w, h);
        for row in 0..h {
            let src = ((y0 + row) as usize * self.width as usize + x0 as usize) * 4;
            let dst = row as usize * w as usize * 4;
            let len = w as usize * 4;
            out.rgba[dst..dst + len].copy_from_slice(&self.rgba[src..src + len]);
        }
        out
    }
}

/// Device-pixel rectangle a draw is submitted to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

pub trait RenderSurface {
    /// Drawable size in device pixels.
    fn size(&self) -> (u32, u32);

    fn resize(&mut self, width: u32, height: u32);

    fn max_texture_size(&self) -> u32 {
        4096
    }

    fn upload_texture(
        &mut self,
        index: usize,
        image: &TextureImage,
        premultiplied_alpha: bool,
    ) -> Result<(), EngineError>;

    fn release_textures(&mut self);

    /// Clear the target before a frame is drawn.
    fn prepare(&mut self) {}

    /// `mvp` is column-major 4x4.
    fn submit_draw(&mut self, handle: ModelHandle, viewport: Viewport, mvp: &[f32; 16]);

    fn context_lost(&self) -> bool;

    /// Read back the last drawn frame at `resolution_scale` times the surface size.
    fn capture_frame(&mut self, resolution_scale: f32) -> Option<PixelBuffer>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_is_clipped() {
        let mut buf = PixelBuffer::new(4, 4);
        buf.set_pixel(3, 3, [1, 2, 3, 255]);
        let c = buf.crop(2, 2, 10, 10);
        assert_eq!((c.width, c.height), (2, 2));
        assert_eq!(c.alpha(1, 1), 255);
        assert_eq!(c.alpha(0, 0), 0);
    }
}
