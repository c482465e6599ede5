use std::collections::HashMap;

use glam::Vec2;
use isorts::renderer::text::*;

// ── helpers ───────────────────────────────────────────────────────────────────

/// Two glyphs on a 256×128 atlas, 20 px line height.
///
/// 'H': atlas (0, 0) 12×18, offset (1, 1), advance 14
/// 'i': atlas (16, 0) 4×18, offset (2, 1), advance 6
fn sample_font() -> Font {
    Font::from_json(SAMPLE).unwrap()
}

const SAMPLE: &str = r#"{
    "line_height": 20,
    "texture_width": 256,
    "texture_height": 128,
    "glyphs": [
        { "id": 72,  "x": 0,  "y": 0, "width": 12, "height": 18,
          "x_offset": 1, "y_offset": 1, "x_advance": 14 },
        { "id": 105, "x": 16, "y": 0, "width": 4,  "height": 18,
          "x_offset": 2, "y_offset": 1, "x_advance": 6 }
    ]
}"#;

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

// ── Font descriptors ──────────────────────────────────────────────────────────

#[test]
fn descriptor_metadata_is_read() {
    let font = sample_font();
    assert_eq!(font.line_height, 20);
    assert_eq!((font.texture_width, font.texture_height), (256, 128));
    assert_eq!(font.glyphs.len(), 2);
}

#[test]
fn descriptor_glyph_fields_are_read() {
    let font = sample_font();
    let i = &font.glyphs[&'i'];
    assert_eq!(i.id, 'i');
    assert_eq!((i.x, i.y, i.width, i.height), (16, 0, 4, 18));
    assert_eq!((i.x_offset, i.y_offset, i.x_advance), (2, 1, 6));
}

#[test]
fn malformed_descriptor_is_an_error() {
    assert!(Font::from_json("{").is_err());
    assert!(Font::from_json(r#"{ "line_height": 20 }"#).is_err());
}

#[test]
fn surrogate_code_points_are_dropped() {
    let json = r#"{
        "line_height": 16, "texture_width": 64, "texture_height": 64,
        "glyphs": [
            { "id": 56000, "x": 0, "y": 0, "width": 8, "height": 16,
              "x_offset": 0, "y_offset": 0, "x_advance": 8 }
        ]
    }"#;
    assert!(Font::from_json(json).unwrap().glyphs.is_empty());
}

#[test]
fn monospace_grid_covers_printable_ascii() {
    let font = Font::monospace_grid(8, 16);
    assert_eq!(font.glyphs.len(), 95);
    assert!(font.glyphs.contains_key(&' '));
    assert!(font.glyphs.contains_key(&'~'));
    assert_eq!(font.glyphs[&'A'].x_advance, 8);
    assert_eq!((font.texture_width, font.texture_height), (128, 96));
}

// ── generate_text_mesh ────────────────────────────────────────────────────────

#[test]
fn mesh_has_four_vertices_and_six_indices_per_glyph() {
    let font = sample_font();
    let (v, i) = generate_text_mesh("HiH", &font, Vec2::ZERO, 20.0);
    assert_eq!(v.len(), 12);
    assert_eq!(i.len(), 18);
    assert_eq!(&i[12..], &[8, 9, 10, 9, 11, 10]);
}

#[test]
fn mesh_places_quad_from_offset_and_start() {
    let font = sample_font();
    let (v, _) = generate_text_mesh("H", &font, Vec2::new(10.0, 5.0), 20.0);
    assert_eq!(v[0].position, Vec2::new(11.0, 6.0));
    assert_eq!(v[3].position, Vec2::new(23.0, 24.0));
}

#[test]
fn mesh_advances_cursor_between_glyphs() {
    let font = sample_font();
    let (v, _) = generate_text_mesh("Hi", &font, Vec2::ZERO, 20.0);
    // 'H' advances 14, then 'i' is offset 2 more.
    assert!(close(v[4].position.x, 16.0));
}

#[test]
fn mesh_uvs_are_normalised() {
    let font = sample_font();
    let (v, _) = generate_text_mesh("i", &font, Vec2::ZERO, 40.0);
    assert!(close(v[0].tex_coords.x, 16.0 / 256.0));
    assert!(close(v[3].tex_coords.x, 20.0 / 256.0));
    assert!(close(v[3].tex_coords.y, 18.0 / 128.0));
}

#[test]
fn mesh_scales_geometry_by_char_size() {
    let font = sample_font();
    let (v, _) = generate_text_mesh("H", &font, Vec2::ZERO, 40.0);
    assert!(close(v[1].position.x - v[0].position.x, 24.0));
    assert!(close(v[2].position.y - v[0].position.y, 36.0));
}

#[test]
fn mesh_newline_returns_to_start_column() {
    let font = sample_font();
    let (v, _) = generate_text_mesh("H\nH", &font, Vec2::new(3.0, 0.0), 20.0);
    assert_eq!(v.len(), 8);
    assert_eq!(v[4].position, Vec2::new(4.0, 21.0));
}

#[test]
fn mesh_skips_unknown_characters() {
    let font = sample_font();
    let (v, _) = generate_text_mesh("?H?", &font, Vec2::ZERO, 20.0);
    assert_eq!(v.len(), 4);
}

#[test]
fn mesh_with_zero_line_height_is_empty() {
    let font = Font { glyphs: HashMap::new(), line_height: 0, texture_width: 1, texture_height: 1 };
    let (v, i) = generate_text_mesh("H", &font, Vec2::ZERO, 20.0);
    assert!(v.is_empty() && i.is_empty());
}

// ── measure_text ──────────────────────────────────────────────────────────────

#[test]
fn measure_sums_advances_times_line_height() {
    let font = sample_font();
    assert_eq!(measure_text("Hi", &font, 20.0), Vec2::new(20.0, 20.0));
    assert_eq!(measure_text("Hi", &font, 40.0), Vec2::new(40.0, 40.0));
}

#[test]
fn measure_uses_widest_line() {
    let font = sample_font();
    assert_eq!(measure_text("i\nHH\ni", &font, 20.0), Vec2::new(28.0, 60.0));
}

#[test]
fn measure_empty_text_is_zero() {
    let font = sample_font();
    assert_eq!(measure_text("", &font, 20.0), Vec2::ZERO);
}
