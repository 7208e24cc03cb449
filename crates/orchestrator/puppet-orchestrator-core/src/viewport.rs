//! Device/logical coordinate mapping, model placement and projection.
//!
//! Logical space has height 2 and width `2 * aspect`, origin at the canvas
//! centre, y up. Model units are centred on the canvas origin as well.

use indexmap::IndexMap;
use nalgebra::{Matrix3, Point2, Vector2};
use puppet_api_core::CanvasInfo;

use crate::camera::CameraState;

#[derive(Clone, Debug)]
pub struct ViewTransform {
    width: u32,
    height: u32,
    device_to_screen: Matrix3<f32>,
}

impl ViewTransform {
    pub fn new(width: u32, height: u32) -> Self {
        let mut vp = Self {
            width: 1,
            height: 1,
            device_to_screen: Matrix3::identity(),
        };
        vp.resize(width, height);
        vp
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
        let s = self.pixels_to_logical();
        let (w, h) = (self.width as f32, self.height as f32);
        self.device_to_screen = Matrix3::new_nonuniform_scaling(&Vector2::new(s, -s))
            * Matrix3::new_translation(&Vector2::new(-w / 2.0, -h / 2.0));
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Logical units per device pixel.
    pub fn pixels_to_logical(&self) -> f32 {
        2.0 / self.height as f32
    }

    /// `(left, right, bottom, top)` of the logical view.
    pub fn logical_bounds(&self) -> (f32, f32, f32, f32) {
        let a = self.aspect();
        (-a, a, -1.0, 1.0)
    }

    pub fn device_to_screen(&self, px: f32, py: f32) -> (f32, f32) {
        let p = self.device_to_screen.transform_point(&Point2::new(px, py));
        (p.x, p.y)
    }

    /// Camera transform from logical (view) space to screen space.
    pub fn view_matrix(&self, camera: &CameraState) -> Matrix3<f32> {
        let ppl = self.pixels_to_logical();
        Matrix3::new_translation(&Vector2::new(camera.x * ppl, camera.y * ppl))
            * Matrix3::new_scaling(camera.scale)
    }

    pub fn screen_to_view(&self, camera: &CameraState, sx: f32, sy: f32) -> Option<(f32, f32)> {
        let inv = self.view_matrix(camera).try_inverse()?;
        let p = inv.transform_point(&Point2::new(sx, sy));
        Some((p.x, p.y))
    }

    pub fn device_to_view(&self, camera: &CameraState, px: f32, py: f32) -> Option<(f32, f32)> {
        let (sx, sy) = self.device_to_screen(px, py);
        self.screen_to_view(camera, sx, sy)
    }

    /// Screen space to clip space.
    pub fn projection(&self) -> Matrix3<f32> {
        Matrix3::new_nonuniform_scaling(&Vector2::new(1.0 / self.aspect(), 1.0))
    }

    /// Surface size honouring `keep_aspect` against the model canvas.
    pub fn fitted_size(&self, canvas: &CanvasInfo, keep_aspect: bool) -> (u32, u32) {
        if !keep_aspect || canvas.width <= 0.0 || canvas.height <= 0.0 {
            return (self.width, self.height);
        }
        let model_aspect = canvas.width / canvas.height;
        if self.aspect() > model_aspect {
            let w = (self.height as f32 * model_aspect).round().max(1.0) as u32;
            (w, self.height)
        } else {
            let h = (self.width as f32 / model_aspect).round().max(1.0) as u32;
            (self.width, h)
        }
    }
}

/// Placement of the model inside logical space.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelMatrix {
    width: f32,
    height: f32,
    sx: f32,
    sy: f32,
    tx: f32,
    ty: f32,
}

impl ModelMatrix {
    /// Fit the canvas to logical height 2.
    pub fn new(canvas: CanvasInfo) -> Self {
        let mut m = Self {
            width: canvas.width.max(f32::EPSILON),
            height: canvas.height.max(f32::EPSILON),
            sx: 1.0,
            sy: 1.0,
            tx: 0.0,
            ty: 0.0,
        };
        m.set_height(2.0);
        m
    }

    pub fn canvas_width(&self) -> f32 {
        self.width
    }

    pub fn set_width(&mut self, w: f32) {
        let s = w / self.width;
        self.sx = s;
        self.sy = s;
    }

    pub fn set_height(&mut self, h: f32) {
        let s = h / self.height;
        self.sx = s;
        self.sy = s;
    }

    pub fn set_center(&mut self, x: f32, y: f32) {
        self.tx = x;
        self.ty = y;
    }

    pub fn set_top(&mut self, y: f32) {
        self.ty = y - self.height * self.sy / 2.0;
    }

    pub fn set_bottom(&mut self, y: f32) {
        self.ty = y + self.height * self.sy / 2.0;
    }

    pub fn set_left(&mut self, x: f32) {
        self.tx = x + self.width * self.sx / 2.0;
    }

    pub fn set_right(&mut self, x: f32) {
        self.tx = x - self.width * self.sx / 2.0;
    }

    /// Apply settings layout hints. Keys are lower-case without underscores.
    pub fn apply_layout(&mut self, layout: &IndexMap<String, f32>) {
        if let Some(w) = layout.get("width") {
            self.set_width(*w);
        }
        if let Some(h) = layout.get("height") {
            self.set_height(*h);
        }
        for (key, value) in layout {
            match key.as_str() {
                "x" | "left" => self.set_left(*value),
                "y" | "top" => self.set_top(*value),
                "centerx" => self.tx = *value,
                "centery" => self.ty = *value,
                "bottom" => self.set_bottom(*value),
                "right" => self.set_right(*value),
                _ => {}
            }
        }
    }

    pub fn matrix(&self) -> Matrix3<f32> {
        Matrix3::new(self.sx, 0.0, self.tx, 0.0, self.sy, self.ty, 0.0, 0.0, 1.0)
    }

    /// View space to model space.
    pub fn invert_point(&self, x: f32, y: f32) -> (f32, f32) {
        let sx = if self.sx == 0.0 { 1.0 } else { self.sx };
        let sy = if self.sy == 0.0 { 1.0 } else { self.sy };
        ((x - self.tx) / sx, (y - self.ty) / sy)
    }
}

/// Embed a 2D affine matrix into a column-major 4x4.
pub fn to_mvp(m: &Matrix3<f32>) -> [f32; 16] {
    [
        m[(0, 0)], m[(1, 0)], 0.0, 0.0,
        m[(0, 1)], m[(1, 1)], 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        m[(0, 2)], m[(1, 2)], 0.0, 1.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn device_centre_maps_to_origin() {
        let vp = ViewTransform::new(800, 600);
        let (x, y) = vp.device_to_screen(400.0, 300.0);
        assert_relative_eq!(x, 0.0);
        assert_relative_eq!(y, 0.0);
        let (_, top) = vp.device_to_screen(400.0, 0.0);
        assert_relative_eq!(top, 1.0);
        let (right, _) = vp.device_to_screen(800.0, 300.0);
        assert_relative_eq!(right, vp.aspect(), epsilon = 1e-6);
    }

    #[test]
    fn keep_aspect_fits_canvas() {
        let vp = ViewTransform::new(800, 400);
        let canvas = CanvasInfo { width: 1.0, height: 1.0 };
        assert_eq!(vp.fitted_size(&canvas, true), (400, 400));
        assert_eq!(vp.fitted_size(&canvas, false), (800, 400));
    }

    #[test]
    fn layout_places_model() {
        let mut m = ModelMatrix::new(CanvasInfo { width: 4.0, height: 4.0 });
        assert_eq!(m.invert_point(1.0, 1.0), (2.0, 2.0));
        let mut layout = IndexMap::new();
        layout.insert("centerx".to_string(), 0.5);
        layout.insert("top".to_string(), 1.0);
        m.apply_layout(&layout);
        // Height 2 after fitting, so the top edge at 1.0 puts the centre at 0.
        assert_eq!(m.invert_point(0.5, 0.0), (0.0, 0.0));
    }

    #[test]
    fn mvp_embeds_translation_in_last_column() {
        let m = Matrix3::new_translation(&Vector2::new(0.25, -0.5));
        let mvp = to_mvp(&m);
        assert_eq!(mvp[12], 0.25);
        assert_eq!(mvp[13], -0.5);
        assert_eq!(mvp[0], 1.0);
        assert_eq!(mvp[15], 1.0);
    }
}
