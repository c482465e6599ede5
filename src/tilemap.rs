// =============================================================================
// TILEMAP.RS: Isometric terrain grid for the map editor
//
// Tiles are 128×64 diamonds in a 2:1 projection. Each frame the map pans
// when the pointer is pinned to a screen edge, highlights the tile under
// the pointer and paints it while the left button is held.
// =============================================================================

use glam::Vec2;

use crate::animation::diamond_uvs;
use crate::camera::View;
use crate::engine::Color;
use crate::geometry::{Rect, diamond_contains};
use crate::renderer::draw::{DrawList, Layer, TextureKey};
use crate::resources::TextureId;

pub const TILE_WIDTH: f32 = 128.0;
pub const TILE_HEIGHT: f32 = 64.0;
pub const TILE_SIZE: Vec2 = Vec2::new(TILE_WIDTH, TILE_HEIGHT);

/// Top vertex of tile `(x, y)` for a map whose tile (0, 0) is anchored at
/// `origin`.
pub fn tile_anchor(x: usize, y: usize, origin: Vec2) -> Vec2 {
    let (x, y) = (x as f32, y as f32);
    Vec2::new(
        TILE_WIDTH / 2.0 * x - TILE_HEIGHT * y + origin.x,
        (TILE_WIDTH / 2.0 * x + TILE_HEIGHT * y) / 2.0 + origin.y,
    )
}

/// Diamond corners clockwise from the top.
pub fn tile_corners(anchor: Vec2) -> [Vec2; 4] {
    [
        anchor,
        anchor + Vec2::new(TILE_WIDTH / 2.0, TILE_HEIGHT / 2.0),
        anchor + Vec2::new(0.0, TILE_HEIGHT),
        anchor + Vec2::new(-TILE_WIDTH / 2.0, TILE_HEIGHT / 2.0),
    ]
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    pub texture: TextureId,
    pub corners: [Vec2; 4],
    pub tint: Color,
    pub in_view: bool,
}

impl Tile {
    fn new(texture: TextureId, anchor: Vec2) -> Self {
        Self { texture, corners: tile_corners(anchor), tint: Color::WHITE, in_view: false }
    }

    pub fn center(&self) -> Vec2 {
        self.corners[0] + Vec2::new(0.0, TILE_HEIGHT / 2.0)
    }

    pub fn bounds(&self) -> Rect {
        Rect::bounding(&self.corners)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        diamond_contains(self.center(), TILE_SIZE, p)
    }
}

pub struct TileMap {
    size: usize,
    /// Row-major: index `y * size + x`.
    tiles: Vec<Tile>,
    paint: TextureId,
    view: View,
    bounds: Rect,
    /// Pan speed in pixels per second.
    scroll_speed: f32,
    hovered: Option<(usize, usize)>,
}

impl TileMap {
    pub fn new(size: usize, origin: Vec2, fill: TextureId, view: View, scroll_speed: f32) -> Self {
        let tiles: Vec<Tile> = (0..size)
            .flat_map(|y| (0..size).map(move |x| (x, y)))
            .map(|(x, y)| Tile::new(fill, tile_anchor(x, y, origin)))
            .collect();
        let corners: Vec<Vec2> = tiles.iter().flat_map(|t| t.corners).collect();
        let bounds = Rect::bounding(&corners);
        log::debug!("tile map {size}x{size}, world bounds {bounds:?}");

        let mut map = Self {
            size,
            tiles,
            paint: fill,
            view,
            bounds,
            scroll_speed,
            hovered: None,
        };
        map.refresh_in_view();
        map
    }

    pub fn size(&self) -> usize { self.size }
    pub fn view(&self) -> View { self.view }
    pub fn bounds(&self) -> Rect { self.bounds }
    pub fn paint_texture(&self) -> TextureId { self.paint }
    pub fn hovered(&self) -> Option<(usize, usize)> { self.hovered }

    pub fn set_view(&mut self, view: View) {
        self.view = view;
        self.refresh_in_view();
    }

    pub fn set_paint_texture(&mut self, texture: TextureId) {
        log::debug!("paint texture set to {texture}");
        self.paint = texture;
    }

    pub fn tile(&self, x: usize, y: usize) -> Option<&Tile> {
        if x >= self.size || y >= self.size {
            return None;
        }
        self.tiles.get(y * self.size + x)
    }

    pub fn tiles(&self) -> impl Iterator<Item = ((usize, usize), &Tile)> {
        let size = self.size.max(1);
        self.tiles.iter().enumerate().map(move |(i, t)| ((i % size, i / size), t))
    }

    /// Tile whose diamond contains world point `p`.
    pub fn tile_at(&self, p: Vec2) -> Option<(usize, usize)> {
        self.tiles().find(|(_, t)| t.contains(p)).map(|(xy, _)| xy)
    }

    /// One frame of interaction. `mouse` is in screen pixels; painting only
    /// happens when `paint_allowed` (the pointer is not over UI).
    pub fn update(&mut self, mouse: Vec2, left_held: bool, paint_allowed: bool, screen: Vec2, dt: f32) {
        self.pan(mouse, screen, dt);

        let world = self.view.screen_to_world(mouse);
        let view_rect = self.view.rect();
        let paint = self.paint;
        let size = self.size.max(1);
        self.hovered = None;

        for (i, tile) in self.tiles.iter_mut().enumerate() {
            tile.in_view = tile.bounds().intersects(&view_rect);
            if tile.contains(world) {
                tile.tint = Color::TILE_HOVER;
                self.hovered = Some((i % size, i / size));
                if left_held && paint_allowed {
                    tile.texture = paint;
                }
            } else {
                tile.tint = Color::WHITE;
            }
        }
    }

    /// Move the view while the pointer touches a screen edge and the view
    /// has not reached the map bound on that side.
    pub fn pan(&mut self, mouse: Vec2, screen: Vec2, dt: f32) {
        let step = self.scroll_speed * dt;
        let mut d = Vec2::ZERO;

        if mouse.x <= 0.0 && self.view.left() > self.bounds.x {
            d.x -= step;
        } else if mouse.x >= screen.x - 1.0 && self.view.right() < self.bounds.right() {
            d.x += step;
        }
        if mouse.y <= 0.0 && self.view.top() > self.bounds.y {
            d.y -= step;
        } else if mouse.y >= screen.y - 1.0 && self.view.bottom() < self.bounds.bottom() {
            d.y += step;
        }

        if d != Vec2::ZERO {
            self.view.translate(d);
        }
    }

    fn refresh_in_view(&mut self) {
        let view_rect = self.view.rect();
        for tile in &mut self.tiles {
            tile.in_view = tile.bounds().intersects(&view_rect);
        }
    }

    /// Sets the list's world view and emits every tile in view.
    pub fn draw(&self, list: &mut DrawList) {
        list.set_world_view(self.view);
        let uvs = diamond_uvs(Rect::new(0.0, 0.0, 1.0, 1.0));
        for tile in self.tiles.iter().filter(|t| t.in_view) {
            list.push_quad(Layer::World, TextureKey::Texture(tile.texture), tile.corners, uvs, tile.tint);
        }
    }
}
