use glam::Vec2;
use isorts::camera::View;
use isorts::engine::Color;
use isorts::geometry::Rect;
use isorts::renderer::draw::*;
use isorts::renderer::text::Font;
use isorts::resources::{FontId, TextureId};

const SCREEN: Vec2 = Vec2::new(800.0, 600.0);

fn diamond() -> [Vec2; 4] {
    [Vec2::new(0.0, 0.0), Vec2::new(64.0, 32.0), Vec2::new(0.0, 64.0), Vec2::new(-64.0, 32.0)]
}

// ── Quads and batching ────────────────────────────────────────────────────

#[test]
fn quad_is_two_triangles_sharing_first_corner() {
    let mut list = DrawList::new(SCREEN);
    list.push_quad(Layer::World, TextureKey::Texture(TextureId::Grass), diamond(), diamond(), Color::WHITE);
    assert_eq!(list.vertex_count(), 6);

    let v = &list.batches()[0].vertices;
    let pos: Vec<[f32; 2]> = v.iter().map(|v| v.position).collect();
    assert_eq!(pos, [[0.0, 0.0], [64.0, 32.0], [0.0, 64.0], [0.0, 0.0], [0.0, 64.0], [-64.0, 32.0]]);
}

#[test]
fn same_texture_and_layer_merge_into_one_batch() {
    let mut list = DrawList::new(SCREEN);
    let key = TextureKey::Texture(TextureId::Grass);
    list.push_quad(Layer::World, key, diamond(), diamond(), Color::WHITE);
    list.push_quad(Layer::World, key, diamond(), diamond(), Color::WHITE);
    assert_eq!(list.batches().len(), 1);
    assert_eq!(list.vertex_count(), 12);
}

#[test]
fn texture_or_layer_change_starts_new_batch() {
    let mut list = DrawList::new(SCREEN);
    let grass = TextureKey::Texture(TextureId::Grass);
    list.push_quad(Layer::World, grass, diamond(), diamond(), Color::WHITE);
    list.push_quad(Layer::World, TextureKey::Texture(TextureId::Water), diamond(), diamond(), Color::WHITE);
    list.push_quad(Layer::Screen, TextureKey::Texture(TextureId::Water), diamond(), diamond(), Color::WHITE);
    // Returning to an earlier key does not reorder: it gets its own batch.
    list.push_quad(Layer::World, grass, diamond(), diamond(), Color::WHITE);
    assert_eq!(list.batches().len(), 4);
}

#[test]
fn empty_triangle_list_adds_no_batch() {
    let mut list = DrawList::new(SCREEN);
    list.push_triangles(Layer::Screen, TextureKey::Solid, &[]);
    assert!(list.is_empty());
}

#[test]
fn rect_uses_solid_texture_and_fill_color() {
    let mut list = DrawList::new(SCREEN);
    let red = Color::rgb8(255, 0, 0);
    list.push_rect(Layer::Screen, Rect::new(10.0, 20.0, 30.0, 40.0), red);

    let batch = &list.batches()[0];
    assert_eq!(batch.key, TextureKey::Solid);
    assert!(batch.vertices.iter().all(|v| v.color == red.0));
    assert_eq!(batch.vertices[2].position, [40.0, 60.0]);
}

#[test]
fn sprite_maps_uv_corners() {
    let mut list = DrawList::new(SCREEN);
    let uv = Rect::new(0.25, 0.0, 0.25, 1.0);
    list.push_sprite(Layer::Screen, TextureKey::Texture(TextureId::Banner), Rect::new(0.0, 0.0, 8.0, 8.0), uv, Color::WHITE);
    let v = &list.batches()[0].vertices;
    assert_eq!(v[0].uv, [0.25, 0.0]);
    assert_eq!(v[2].uv, [0.5, 1.0]);
}

// ── Text ──────────────────────────────────────────────────────────────────

#[test]
fn text_is_six_vertices_per_glyph_in_font_batch() {
    let font = Font::monospace_grid(8, 16);
    let mut list = DrawList::new(SCREEN);
    list.push_text(Layer::Screen, FontId::Main, &font, "Hi!", Vec2::ZERO, 16.0, Color::WHITE);

    assert_eq!(list.batches().len(), 1);
    assert_eq!(list.batches()[0].key, TextureKey::Font(FontId::Main));
    assert_eq!(list.vertex_count(), 18);
}

#[test]
fn text_with_no_known_glyphs_draws_nothing() {
    let font = Font::monospace_grid(8, 16);
    let mut list = DrawList::new(SCREEN);
    list.push_text(Layer::Screen, FontId::Main, &font, "\n\n", Vec2::ZERO, 16.0, Color::WHITE);
    assert!(list.is_empty());
}

// ── Frame lifecycle ───────────────────────────────────────────────────────

#[test]
fn begin_clears_batches_and_resets_world_view() {
    let mut list = DrawList::new(SCREEN);
    list.set_world_view(View::new(Vec2::new(1000.0, 1000.0), SCREEN));
    list.push_rect(Layer::Screen, Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE);

    list.begin(Vec2::new(1024.0, 768.0));
    assert!(list.is_empty());
    assert_eq!(list.screen_size(), Vec2::new(1024.0, 768.0));
    assert_eq!(list.world_view(), View::from_screen(Vec2::new(1024.0, 768.0)));
}

// ── uv_rect ───────────────────────────────────────────────────────────────

#[test]
fn uv_rect_normalises_pixels() {
    let uv = uv_rect(Rect::new(128.0, 0.0, 128.0, 32.0), Vec2::new(512.0, 32.0));
    assert_eq!(uv, Rect::new(0.25, 0.0, 0.25, 1.0));
}

#[test]
fn uv_rect_of_empty_texture_is_zero() {
    assert_eq!(uv_rect(Rect::new(0.0, 0.0, 4.0, 4.0), Vec2::ZERO), Rect::ZERO);
}
