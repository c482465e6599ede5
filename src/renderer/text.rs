use std::collections::HashMap;

use glam::Vec2;
use serde::Deserialize;

// ── GlyphVertex ───────────────────────────────────────────────────────────────

/// A single vertex produced by [`generate_text_mesh`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphVertex {
    /// Screen-space position in pixels.
    pub position: Vec2,
    /// Normalised atlas texture coordinates in `[0, 1]`.
    pub tex_coords: Vec2,
}

// ── generate_text_mesh ────────────────────────────────────────────────────────

/// Convert `text` into a flat vertex + index buffer.
///
/// # Layout
/// Each renderable character produces **4 vertices** and **6 indices**
/// (two triangles, Y-axis pointing down):
///
/// ```text
/// 0──1
/// │ /│
/// 2──3
/// triangles: (0,1,2) and (1,3,2)
/// ```
///
/// `char_size` is the desired line height in pixels; glyph metrics are scaled
/// uniformly by `char_size / font.line_height`.
///
/// - `'\n'` resets the X cursor and advances Y by one scaled line height.
/// - Characters absent from `font.glyphs` are skipped.
/// - Returns empty buffers when `font.line_height` is zero.
pub fn generate_text_mesh(
    text: &str,
    font: &Font,
    start_pos: Vec2,
    char_size: f32,
) -> (Vec<GlyphVertex>, Vec<u32>) {
    if font.line_height == 0 {
        return (Vec::new(), Vec::new());
    }

    let scale = char_size / font.line_height as f32;
    let tw = font.texture_width as f32;
    let th = font.texture_height as f32;

    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let mut cursor = start_pos;

    for ch in text.chars() {
        if ch == '\n' {
            cursor.x = start_pos.x;
            cursor.y += font.line_height as f32 * scale;
            continue;
        }

        let Some(glyph) = font.glyphs.get(&ch) else {
            continue;
        };

        let tl = cursor + Vec2::new(glyph.x_offset as f32, glyph.y_offset as f32) * scale;
        let size = Vec2::new(glyph.width as f32, glyph.height as f32) * scale;

        let uv0 = Vec2::new(glyph.x as f32 / tw, glyph.y as f32 / th);
        let uv1 = Vec2::new(
            (glyph.x + glyph.width) as f32 / tw,
            (glyph.y + glyph.height) as f32 / th,
        );

        let base = vertices.len() as u32;
        vertices.push(GlyphVertex { position: tl, tex_coords: uv0 });
        vertices.push(GlyphVertex { position: tl + Vec2::new(size.x, 0.0), tex_coords: Vec2::new(uv1.x, uv0.y) });
        vertices.push(GlyphVertex { position: tl + Vec2::new(0.0, size.y), tex_coords: Vec2::new(uv0.x, uv1.y) });
        vertices.push(GlyphVertex { position: tl + size, tex_coords: uv1 });
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 1, base + 3, base + 2]);

        cursor.x += glyph.x_advance as f32 * scale;
    }

    (vertices, indices)
}

/// Layout extent of `text` at `char_size`: the widest line's summed advance
/// by the number of lines times the scaled line height.
///
/// Per-glyph offsets are ignored; the width is exactly what the cursor walks
/// in [`generate_text_mesh`].
pub fn measure_text(text: &str, font: &Font, char_size: f32) -> Vec2 {
    if font.line_height == 0 || text.is_empty() {
        return Vec2::ZERO;
    }
    let scale = char_size / font.line_height as f32;

    let mut widest = 0.0_f32;
    let mut lines = 0;
    for line in text.split('\n') {
        lines += 1;
        let width: u32 = line
            .chars()
            .filter_map(|ch| font.glyphs.get(&ch))
            .map(|g| g.x_advance)
            .sum();
        widest = widest.max(width as f32 * scale);
    }

    Vec2::new(widest, lines as f32 * font.line_height as f32 * scale)
}

// ── Glyph ────────────────────────────────────────────────────────────────────

/// Metrics for a single character in the bitmap font atlas.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub id: char,
    /// Top-left pixel of the glyph region in the atlas.
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Offset applied when rendering (may be negative).
    pub x_offset: i32,
    pub y_offset: i32,
    /// How far to advance the cursor after drawing this glyph.
    pub x_advance: u32,
}

// ── Font ─────────────────────────────────────────────────────────────────────

/// A bitmap font: glyph metrics plus the size of the backing atlas.
/// The atlas pixels themselves live in `resources::FontAsset`.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub glyphs: HashMap<char, Glyph>,
    /// Vertical distance between successive baselines in pixels.
    pub line_height: u32,
    pub texture_width: u32,
    pub texture_height: u32,
}

impl Font {
    /// Deserialise a `Font` from a JSON descriptor.
    ///
    /// ```json
    /// { "line_height": 24, "texture_width": 512, "texture_height": 512,
    ///   "glyphs": [ { "id": 65, "x": 0, "y": 0, "width": 14, "height": 20,
    ///                 "x_offset": 1, "y_offset": 2, "x_advance": 16 } ] }
    /// ```
    ///
    /// Code points that are not Unicode scalar values are dropped.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: RawFont = serde_json::from_str(json)?;

        let glyphs = raw
            .glyphs
            .into_iter()
            .filter_map(|g| {
                char::from_u32(g.id).map(|ch| {
                    (ch, Glyph {
                        id: ch,
                        x: g.x,
                        y: g.y,
                        width: g.width,
                        height: g.height,
                        x_offset: g.x_offset,
                        y_offset: g.y_offset,
                        x_advance: g.x_advance,
                    })
                })
            })
            .collect();

        Ok(Self {
            glyphs,
            line_height: raw.line_height,
            texture_width: raw.texture_width,
            texture_height: raw.texture_height,
        })
    }

    /// Fixed-pitch font covering printable ASCII laid out on a 16-column grid
    /// of `cell_w × cell_h` cells. Used for generated placeholder atlases.
    pub fn monospace_grid(cell_w: u32, cell_h: u32) -> Self {
        const COLS: u32 = 16;
        let glyphs = (0x20u32..0x7f)
            .filter_map(char::from_u32)
            .enumerate()
            .map(|(i, ch)| {
                let i = i as u32;
                (ch, Glyph {
                    id: ch,
                    x: (i % COLS) * cell_w,
                    y: (i / COLS) * cell_h,
                    width: cell_w,
                    height: cell_h,
                    x_offset: 0,
                    y_offset: 0,
                    x_advance: cell_w,
                })
            })
            .collect();

        Self {
            glyphs,
            line_height: cell_h,
            texture_width: COLS * cell_w,
            texture_height: 6 * cell_h,
        }
    }
}

// ── Raw (JSON-facing) types ───────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawGlyph {
    /// Unicode code point (e.g. 65 for 'A').
    id: u32,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    x_offset: i32,
    y_offset: i32,
    x_advance: u32,
}

#[derive(Deserialize)]
struct RawFont {
    line_height: u32,
    texture_width: u32,
    texture_height: u32,
    glyphs: Vec<RawGlyph>,
}
