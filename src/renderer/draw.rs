//! CPU-side draw list.
//!
//! Screens record textured triangles here every frame; the GPU renderer only
//! ever sees the finished list. Keeping this free of wgpu devices means every
//! draw path can be tested without a window.

use glam::Vec2;

use crate::camera::View;
use crate::engine::Color;
use crate::geometry::Rect;
use crate::renderer::text::{Font, generate_text_mesh};
use crate::resources::{FontId, TextureId};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2,  // position
        1 => Float32x2,  // uv
        2 => Float32x4,  // color
    ];

    pub fn new(position: Vec2, uv: Vec2, color: Color) -> Self {
        Self { position: position.to_array(), uv: uv.to_array(), color: color.0 }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Which GPU texture a batch samples from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TextureKey {
    Texture(TextureId),
    Font(FontId),
    /// 1×1 white texture; the vertex color is the fill.
    Solid,
}

/// `World` batches are transformed by the list's world view, `Screen`
/// batches are drawn in fixed layout pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Layer {
    World,
    Screen,
}

#[derive(Clone, Debug)]
pub struct Batch {
    pub layer: Layer,
    pub key: TextureKey,
    pub vertices: Vec<Vertex>,
}

#[derive(Clone, Debug)]
pub struct DrawList {
    batches: Vec<Batch>,
    world_view: View,
    screen_size: Vec2,
}

impl DrawList {
    pub fn new(screen_size: Vec2) -> Self {
        Self {
            batches: Vec::new(),
            world_view: View::from_screen(screen_size),
            screen_size,
        }
    }

    /// Drop last frame's batches. The world view resets to the screen.
    pub fn begin(&mut self, screen_size: Vec2) {
        self.batches.clear();
        self.screen_size = screen_size;
        self.world_view = View::from_screen(screen_size);
    }

    pub fn set_world_view(&mut self, view: View) {
        self.world_view = view;
    }

    pub fn world_view(&self) -> View {
        self.world_view
    }

    pub fn screen_size(&self) -> Vec2 {
        self.screen_size
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.batches.iter().map(|b| b.vertices.len()).sum()
    }

    /// Append raw triangles (three vertices each). Merges into the last
    /// batch when it has the same layer and texture.
    pub fn push_triangles(&mut self, layer: Layer, key: TextureKey, vertices: &[Vertex]) {
        if vertices.is_empty() {
            return;
        }
        match self.batches.last_mut() {
            Some(last) if last.layer == layer && last.key == key => {
                last.vertices.extend_from_slice(vertices);
            }
            _ => self.batches.push(Batch { layer, key, vertices: vertices.to_vec() }),
        }
    }

    /// Four corners in clockwise order with matching texture coordinates.
    pub fn push_quad(
        &mut self,
        layer: Layer,
        key: TextureKey,
        corners: [Vec2; 4],
        uvs: [Vec2; 4],
        color: Color,
    ) {
        let v = |i: usize| Vertex::new(corners[i], uvs[i], color);
        self.push_triangles(layer, key, &[v(0), v(1), v(2), v(0), v(2), v(3)]);
    }

    /// Axis-aligned sprite; `uv` is in normalised texture space.
    pub fn push_sprite(&mut self, layer: Layer, key: TextureKey, rect: Rect, uv: Rect, color: Color) {
        self.push_quad(layer, key, corners(rect), corners(uv), color);
    }

    pub fn push_rect(&mut self, layer: Layer, rect: Rect, color: Color) {
        self.push_sprite(layer, TextureKey::Solid, rect, Rect::new(0.0, 0.0, 1.0, 1.0), color);
    }

    pub fn push_text(
        &mut self,
        layer: Layer,
        font_id: FontId,
        font: &Font,
        text: &str,
        position: Vec2,
        char_size: f32,
        color: Color,
    ) {
        let (glyphs, indices) = generate_text_mesh(text, font, position, char_size);
        let vertices: Vec<Vertex> = indices
            .iter()
            .filter_map(|&i| glyphs.get(i as usize))
            .map(|g| Vertex::new(g.position, g.tex_coords, color))
            .collect();
        self.push_triangles(layer, TextureKey::Font(font_id), &vertices);
    }
}

/// Pixel sub-rectangle of a texture to normalised UV space.
pub fn uv_rect(texture_rect: Rect, texture_size: Vec2) -> Rect {
    if texture_size.x <= 0.0 || texture_size.y <= 0.0 {
        return Rect::ZERO;
    }
    Rect::new(
        texture_rect.x / texture_size.x,
        texture_rect.y / texture_size.y,
        texture_rect.w / texture_size.x,
        texture_rect.h / texture_size.y,
    )
}

/// Clockwise from top-left.
fn corners(r: Rect) -> [Vec2; 4] {
    [
        Vec2::new(r.x, r.y),
        Vec2::new(r.right(), r.y),
        Vec2::new(r.right(), r.bottom()),
        Vec2::new(r.x, r.bottom()),
    ]
}
