// =============================================================================
// ANIMATION.RS: Frame animation over sprites and free quads
//
// An `Animation` is a list of texture sub-rectangles shown for a fixed time
// each. An `Animator` pushes the current frame into whatever it animates.
// =============================================================================

use glam::Vec2;

use crate::engine::Color;
use crate::geometry::Rect;
use crate::renderer::draw::{DrawList, Layer, TextureKey, uv_rect};
use crate::resources::{Resources, TextureId};

/// Something that shows a sub-rectangle of a texture.
#[derive(Clone, Debug, PartialEq)]
pub enum Renderable {
    /// Axis-aligned sprite.
    Sprite {
        texture: TextureId,
        position: Vec2,
        size: Vec2,
        texture_rect: Rect,
        color: Color,
    },
    /// Four free vertices, clockwise from the top. The texture rect is mapped
    /// onto them as a diamond (top, right, bottom, left edge midpoints).
    Quad {
        texture: TextureId,
        corners: [Vec2; 4],
        texture_rect: Rect,
        color: Color,
    },
}

impl Renderable {
    pub fn texture_rect(&self) -> Rect {
        match self {
            Renderable::Sprite { texture_rect, .. } | Renderable::Quad { texture_rect, .. } => *texture_rect,
        }
    }

    pub fn set_texture_rect(&mut self, rect: Rect) {
        match self {
            Renderable::Sprite { texture_rect, .. } | Renderable::Quad { texture_rect, .. } => *texture_rect = rect,
        }
    }

    pub fn texture(&self) -> TextureId {
        match self {
            Renderable::Sprite { texture, .. } | Renderable::Quad { texture, .. } => *texture,
        }
    }

    pub fn draw(&self, res: &Resources, list: &mut DrawList, layer: Layer) {
        let Ok(tex) = res.texture(self.texture()) else {
            log::error!("cannot draw {}: texture not loaded", self.texture());
            return;
        };
        let key = TextureKey::Texture(self.texture());
        let uv = uv_rect(self.texture_rect(), tex.size());

        match self {
            Renderable::Sprite { position, size, color, .. } => {
                list.push_sprite(layer, key, Rect::from_pos_size(*position, *size), uv, *color);
            }
            Renderable::Quad { corners, color, .. } => {
                list.push_quad(layer, key, *corners, diamond_uvs(uv), *color);
            }
        }
    }
}

/// Edge midpoints of `uv` in top, right, bottom, left order.
pub fn diamond_uvs(uv: Rect) -> [Vec2; 4] {
    let c = uv.center();
    [
        Vec2::new(c.x, uv.y),
        Vec2::new(uv.right(), c.y),
        Vec2::new(c.x, uv.bottom()),
        Vec2::new(uv.x, c.y),
    ]
}

// ── Animation ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    frames: Vec<Rect>,
    frame_time: f32,
    elapsed: f32,
    current: usize,
    looping: bool,
    finished: bool,
}

impl Animation {
    pub fn new(frames: Vec<Rect>, frame_time: f32, looping: bool) -> Self {
        Self {
            frames,
            frame_time: frame_time.max(f32::EPSILON),
            elapsed: 0.0,
            current: 0,
            looping,
            finished: false,
        }
    }

    /// `count` frames of `frame_size` laid out left to right from the
    /// texture origin.
    pub fn strip(frame_size: Vec2, count: u32, frame_time: f32, looping: bool) -> Self {
        let frames = (0..count)
            .map(|i| Rect::new(i as f32 * frame_size.x, 0.0, frame_size.x, frame_size.y))
            .collect();
        Self::new(frames, frame_time, looping)
    }

    pub fn current_frame(&self) -> Option<Rect> {
        self.frames.get(self.current).copied()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.current = 0;
        self.finished = false;
    }

    /// Advance by `dt` seconds, skipping as many frames as `dt` covers.
    /// Returns the new frame when it changed.
    pub fn tick(&mut self, dt: f32) -> Option<Rect> {
        if self.frames.len() < 2 || self.finished {
            return None;
        }

        self.elapsed += dt;
        let before = self.current;
        while self.elapsed >= self.frame_time {
            self.elapsed -= self.frame_time;
            if self.current + 1 < self.frames.len() {
                self.current += 1;
            } else if self.looping {
                self.current = 0;
            } else {
                self.finished = true;
                self.elapsed = 0.0;
                break;
            }
        }

        (self.current != before).then(|| self.frames[self.current])
    }
}

// ── Animator ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Animator {
    pub target: Renderable,
    pub animation: Animation,
}

impl Animator {
    /// Shows the first frame immediately.
    pub fn new(mut target: Renderable, animation: Animation) -> Self {
        if let Some(first) = animation.current_frame() {
            target.set_texture_rect(first);
        }
        Self { target, animation }
    }

    pub fn tick(&mut self, dt: f32) {
        if let Some(rect) = self.animation.tick(dt) {
            self.target.set_texture_rect(rect);
        }
    }

    pub fn draw(&self, res: &Resources, list: &mut DrawList, layer: Layer) {
        self.target.draw(res, list, layer);
    }
}
