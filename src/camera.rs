use glam::Vec2;

use crate::geometry::Rect;

/// Combined view-projection matrix as uploaded to the GPU.
///
/// Layout (column-major, matching WGSL `mat4x4<f32>`):
/// ```text
/// col0: [sx,  0,   0,  0]
/// col1: [0,   sy,  0,  0]
/// col2: [0,   0,   1,  0]
/// col3: [tx,  ty,  0,  1]
/// ```
/// where `sx = 2/w`, `sy = -2/h`, `tx = -sx*cx`, `ty = -sy*cy`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    /// Maps pixel coords [0..w] × [0..h] directly to clip space.
    /// Used for the screen layer so UI stays fixed.
    pub fn screen(width: f32, height: f32) -> Self {
        Self::centered(Vec2::new(width * 0.5, height * 0.5), Vec2::new(width, height))
    }

    /// Maps the rectangle `center ± size/2` (y down) onto clip space.
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        let sx = 2.0 / size.x.max(1.0);
        let sy = -2.0 / size.y.max(1.0);
        let tx = -sx * center.x;
        let ty = -sy * center.y;
        Self {
            view_proj: [
                [sx,  0.0, 0.0, 0.0], // col0
                [0.0, sy,  0.0, 0.0], // col1
                [0.0, 0.0, 1.0, 0.0], // col2
                [tx,  ty,  0.0, 1.0], // col3
            ],
        }
    }
}

/// World-space window shown by the map layer: a `size` sized rectangle
/// centred on `center`. There is no zoom; one world pixel is one screen pixel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct View {
    pub center: Vec2,
    pub size: Vec2,
}

impl View {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    /// A view whose top-left corner sits at the world origin.
    pub fn from_screen(size: Vec2) -> Self {
        Self::new(size * 0.5, size)
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.center - self.size * 0.5, self.size)
    }

    #[inline]
    pub fn left(&self) -> f32 { self.center.x - self.size.x * 0.5 }
    #[inline]
    pub fn right(&self) -> f32 { self.center.x + self.size.x * 0.5 }
    #[inline]
    pub fn top(&self) -> f32 { self.center.y - self.size.y * 0.5 }
    #[inline]
    pub fn bottom(&self) -> f32 { self.center.y + self.size.y * 0.5 }

    pub fn translate(&mut self, d: Vec2) {
        self.center += d;
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.center - self.size * 0.5
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.center + self.size * 0.5
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform::centered(self.center, self.size)
    }
}
