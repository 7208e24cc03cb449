use puppet_api_core::{EngineError, ModelHandle, PixelBuffer, RenderSurface, TextureImage, Viewport};

#[derive(Clone, Debug, PartialEq)]
pub struct DrawCall {
    pub handle: ModelHandle,
    pub viewport: Viewport,
    pub mvp: [f32; 16],
}

/// Surface double. `capture` is handed back by every capture request.
#[derive(Debug)]
pub struct MockSurface {
    pub width: u32,
    pub height: u32,
    pub max_texture: u32,
    pub uploaded: Vec<(usize, u32, u32)>,
    pub released_textures: usize,
    pub draws: Vec<DrawCall>,
    pub prepares: usize,
    pub lost: bool,
    pub fail_uploads: bool,
    pub capture: Option<PixelBuffer>,
    pub capture_scales: Vec<f32>,
}

impl MockSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            max_texture: 4096,
            uploaded: Vec::new(),
            released_textures: 0,
            draws: Vec::new(),
            prepares: 0,
            lost: false,
            fail_uploads: false,
            capture: None,
            capture_scales: Vec::new(),
        }
    }

    /// Frame with rows `first..=last` fully opaque and everything else clear.
    pub fn band(width: u32, height: u32, first: u32, last: u32) -> PixelBuffer {
        let mut buf = PixelBuffer::new(width, height);
        for y in first..=last.min(height.saturating_sub(1)) {
            for x in 0..width {
                buf.set_pixel(x, y, [255, 255, 255, 255]);
            }
        }
        buf
    }

    pub fn last_draw(&self) -> Option<&DrawCall> {
        self.draws.last()
    }
}

impl RenderSurface for MockSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn max_texture_size(&self) -> u32 {
        self.max_texture
    }

    fn upload_texture(
        &mut self,
        index: usize,
        image: &TextureImage,
        _premultiplied_alpha: bool,
    ) -> Result<(), EngineError> {
        if self.fail_uploads {
            return Err(EngineError::Surface {
                reason: "upload refused".into(),
            });
        }
        self.uploaded.push((index, image.width, image.height));
        Ok(())
    }

    fn release_textures(&mut self) {
        self.released_textures += 1;
        self.uploaded.clear();
    }

    fn prepare(&mut self) {
        self.prepares += 1;
    }

    fn submit_draw(&mut self, handle: ModelHandle, viewport: Viewport, mvp: &[f32; 16]) {
        self.draws.push(DrawCall {
            handle,
            viewport,
            mvp: *mvp,
        });
    }

    fn context_lost(&self) -> bool {
        self.lost
    }

    fn capture_frame(&mut self, resolution_scale: f32) -> Option<PixelBuffer> {
        self.capture_scales.push(resolution_scale);
        self.capture.clone()
    }
}
