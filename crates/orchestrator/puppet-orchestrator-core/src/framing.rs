//! Silhouette measurement on a captured frame.

use puppet_api_core::PixelBuffer;
use serde::{Deserialize, Serialize};

/// Vertical extent of the visible character in a captured frame, in rows
/// from the top.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterPosition {
    pub top: u32,
    pub bottom: u32,
    pub frame_height: u32,
}

impl CharacterPosition {
    pub fn height(&self) -> u32 {
        self.bottom - self.top + 1
    }
}

/// First and last rows holding any non-transparent pixel.
pub fn opaque_rows(frame: &PixelBuffer) -> Option<CharacterPosition> {
    let row_has_content = |y: u32| (0..frame.width).any(|x| frame.alpha(x, y) > 0);
    let top = (0..frame.height).find(|y| row_has_content(*y))?;
    let bottom = (top..frame.height).rev().find(|y| row_has_content(*y))?;
    Some(CharacterPosition {
        top,
        bottom,
        frame_height: frame.height,
    })
}

/// Vertical pan that leaves a quarter of the free space above the
/// character. `scale` is the zoom the frame was captured under.
pub fn framing_offset(frame: &PixelBuffer, scale: f32) -> Option<f32> {
    let pos = opaque_rows(frame)?;
    let free = pos.frame_height.saturating_sub(pos.height()) as f32;
    let margin = free / 4.0;
    Some((pos.top as f32 - margin) * scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(height: u32, first: u32, last: u32) -> PixelBuffer {
        let mut buf = PixelBuffer::new(4, height);
        for y in first..=last {
            buf.set_pixel(1, y, [0, 0, 0, 128]);
        }
        buf
    }

    #[test]
    fn finds_the_opaque_band() {
        let pos = opaque_rows(&band(100, 30, 79)).expect("content");
        assert_eq!((pos.top, pos.bottom, pos.height()), (30, 79, 50));
        assert!(opaque_rows(&PixelBuffer::new(4, 4)).is_none());
    }

    #[test]
    fn offset_moves_the_top_to_the_margin() {
        // 50 free rows: margin 12.5, top at 30.
        assert_eq!(framing_offset(&band(100, 30, 79), 1.0), Some(17.5));
        assert_eq!(framing_offset(&band(100, 30, 79), 2.0), Some(35.0));
        assert_eq!(framing_offset(&band(100, 0, 99), 1.0), Some(0.0));
    }
}
