//! Resource service: decoded textures and bitmap fonts keyed by closed enums.
//!
//! Assets are looked up by file stem inside the asset directory
//! (`grass.png`, `menu_button.png`, `main.png` + `main.json`, ...). Anything
//! that is not found on disk is replaced by a generated placeholder so the
//! shell stays usable without an art pack.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use glam::Vec2;
use image::{Rgba, RgbaImage};

use crate::error::ResourceError;
use crate::renderer::text::Font;

/// Number of horizontal state slices in a multi-state texture
/// (normal, hover, down, selected).
pub const STATE_SLICES: u32 = 4;

// ── TextureId ─────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextureId {
    MenuButton,
    Button,
    Logo,
    Banner,
    TileBoxPanel,
    ScrollArea,
    ScrollBar,
    ScrollArrowUp,
    ScrollArrowDown,
    Cursor,
    Grass,
    Dirt,
    Sand,
    Water,
    Stone,
    Snow,
    Swamp,
    Forest,
    Road,
    Lava,
}

impl TextureId {
    pub const ALL: [TextureId; 20] = [
        TextureId::MenuButton,
        TextureId::Button,
        TextureId::Logo,
        TextureId::Banner,
        TextureId::TileBoxPanel,
        TextureId::ScrollArea,
        TextureId::ScrollBar,
        TextureId::ScrollArrowUp,
        TextureId::ScrollArrowDown,
        TextureId::Cursor,
        TextureId::Grass,
        TextureId::Dirt,
        TextureId::Sand,
        TextureId::Water,
        TextureId::Stone,
        TextureId::Snow,
        TextureId::Swamp,
        TextureId::Forest,
        TextureId::Road,
        TextureId::Lava,
    ];

    /// Terrain textures offered by the map editor palette, in palette order.
    pub const TERRAIN: [TextureId; 10] = [
        TextureId::Grass,
        TextureId::Dirt,
        TextureId::Sand,
        TextureId::Water,
        TextureId::Stone,
        TextureId::Snow,
        TextureId::Swamp,
        TextureId::Forest,
        TextureId::Road,
        TextureId::Lava,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TextureId::MenuButton => "menu_button",
            TextureId::Button => "button",
            TextureId::Logo => "logo",
            TextureId::Banner => "banner",
            TextureId::TileBoxPanel => "tile_box_panel",
            TextureId::ScrollArea => "scroll_area",
            TextureId::ScrollBar => "scroll_bar",
            TextureId::ScrollArrowUp => "scroll_arrow_up",
            TextureId::ScrollArrowDown => "scroll_arrow_down",
            TextureId::Cursor => "cursor",
            TextureId::Grass => "grass",
            TextureId::Dirt => "dirt",
            TextureId::Sand => "sand",
            TextureId::Water => "water",
            TextureId::Stone => "stone",
            TextureId::Snow => "snow",
            TextureId::Swamp => "swamp",
            TextureId::Forest => "forest",
            TextureId::Road => "road",
            TextureId::Lava => "lava",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }

    pub fn is_terrain(self) -> bool {
        Self::TERRAIN.contains(&self)
    }

    /// Horizontal slices in the image: state slices for multi-state UI
    /// textures, animation frames for strips, 1 otherwise.
    pub fn slices(self) -> u32 {
        match self {
            TextureId::MenuButton
            | TextureId::ScrollArea
            | TextureId::ScrollBar
            | TextureId::ScrollArrowUp
            | TextureId::ScrollArrowDown => STATE_SLICES,
            TextureId::Banner | TextureId::Cursor => 4,
            _ => 1,
        }
    }

    /// Pixel size of the generated placeholder.
    fn placeholder_size(self) -> (u32, u32) {
        match self {
            TextureId::MenuButton => (240 * STATE_SLICES, 50),
            TextureId::Button => (64, 32),
            TextureId::Logo => (256, 128),
            TextureId::Banner => (128 * 4, 32),
            TextureId::TileBoxPanel => (64, 64),
            TextureId::ScrollArea
            | TextureId::ScrollBar
            | TextureId::ScrollArrowUp
            | TextureId::ScrollArrowDown => (20 * STATE_SLICES, 20),
            TextureId::Cursor => (128 * 4, 64),
            _ => (128, 64),
        }
    }

    fn placeholder_color(self) -> [u8; 4] {
        match self {
            TextureId::MenuButton => [0x3a, 0x4a, 0x6a, 0xff],
            TextureId::Button => [0xd0, 0xd0, 0xd0, 0xff],
            TextureId::Logo => [0x8a, 0x5a, 0x2a, 0xff],
            TextureId::Banner => [0xb0, 0x20, 0x20, 0xff],
            TextureId::TileBoxPanel => [0x20, 0x24, 0x2c, 0xe0],
            TextureId::ScrollArea => [0x30, 0x30, 0x30, 0xff],
            TextureId::ScrollBar => [0x90, 0x90, 0x90, 0xff],
            TextureId::ScrollArrowUp | TextureId::ScrollArrowDown => [0x60, 0x60, 0x70, 0xff],
            TextureId::Cursor => [0xff, 0xff, 0x60, 0x90],
            TextureId::Grass => [0x3c, 0x8c, 0x2c, 0xff],
            TextureId::Dirt => [0x7a, 0x52, 0x30, 0xff],
            TextureId::Sand => [0xd8, 0xc0, 0x78, 0xff],
            TextureId::Water => [0x2c, 0x5c, 0xb0, 0xff],
            TextureId::Stone => [0x80, 0x80, 0x84, 0xff],
            TextureId::Snow => [0xee, 0xf2, 0xf8, 0xff],
            TextureId::Swamp => [0x4a, 0x5a, 0x30, 0xff],
            TextureId::Forest => [0x1c, 0x4c, 0x1c, 0xff],
            TextureId::Road => [0xa0, 0x90, 0x70, 0xff],
            TextureId::Lava => [0xe0, 0x50, 0x10, 0xff],
        }
    }
}

impl fmt::Display for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── FontId ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontId {
    Main,
    Title,
}

impl FontId {
    pub const ALL: [FontId; 2] = [FontId::Main, FontId::Title];

    pub fn name(self) -> &'static str {
        match self {
            FontId::Main => "main",
            FontId::Title => "title",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }
}

impl fmt::Display for FontId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Assets ────────────────────────────────────────────────────────────────────

/// A decoded RGBA texture.
#[derive(Debug, Clone)]
pub struct Texture {
    image: RgbaImage,
}

impl Texture {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn size(&self) -> Vec2 {
        let (w, h) = self.image.dimensions();
        Vec2::new(w as f32, h as f32)
    }
}

/// Font metrics plus the atlas the glyph rectangles refer to.
#[derive(Debug, Clone)]
pub struct FontAsset {
    pub font: Font,
    pub image: RgbaImage,
}

// ── Resources ─────────────────────────────────────────────────────────────────

/// Process-wide store of loaded assets. Read-only once the game loop starts;
/// screens share it through an `Rc`.
#[derive(Debug, Default)]
pub struct Resources {
    textures: HashMap<TextureId, Texture>,
    fonts: HashMap<FontId, FontAsset>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every texture and font replaced by generated stand-ins.
    pub fn placeholder() -> Self {
        let mut res = Self::new();
        res.fill_missing();
        res
    }

    /// Load every recognised asset below `dir`, then generate placeholders
    /// for whatever is still missing. A missing directory is not an error;
    /// a file that exists but cannot be decoded is.
    pub fn load_dir(dir: &Path) -> Result<Self, ResourceError> {
        let mut res = Self::new();

        if dir.is_dir() {
            for entry in walkdir::WalkDir::new(dir)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
            {
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) != Some("png") {
                    continue;
                }
                let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };

                if let Some(id) = TextureId::from_name(stem) {
                    res.load_texture(id, path)?;
                } else if let Some(id) = FontId::from_name(stem) {
                    res.load_font(id, path, &path.with_extension("json"))?;
                } else {
                    log::debug!("ignoring unrecognised asset {}", path.display());
                }
            }
        } else {
            log::warn!("asset directory {} not found", dir.display());
        }

        res.fill_missing();
        Ok(res)
    }

    pub fn load_texture(&mut self, id: TextureId, path: &Path) -> Result<(), ResourceError> {
        let image = decode_png(path)?;
        log::info!("loaded texture {id} ({}x{}) from {}", image.width(), image.height(), path.display());
        self.insert_texture(id, image);
        Ok(())
    }

    pub fn load_font(&mut self, id: FontId, png: &Path, json: &Path) -> Result<(), ResourceError> {
        let image = decode_png(png)?;
        let raw = fs::read_to_string(json).map_err(|e| ResourceError::Io {
            path: json.to_path_buf(),
            message: e.to_string(),
        })?;
        let font = Font::from_json(&raw).map_err(|e| ResourceError::Font {
            path: json.to_path_buf(),
            message: e.to_string(),
        })?;
        log::info!("loaded font {id} ({} glyphs) from {}", font.glyphs.len(), png.display());
        self.fonts.insert(id, FontAsset { font, image });
        Ok(())
    }

    pub fn insert_texture(&mut self, id: TextureId, image: RgbaImage) {
        self.textures.insert(id, Texture::new(image));
    }

    pub fn texture(&self, id: TextureId) -> Result<&Texture, ResourceError> {
        self.textures
            .get(&id)
            .ok_or_else(|| ResourceError::MissingTexture(id.to_string()))
    }

    pub fn font(&self, id: FontId) -> Result<&FontAsset, ResourceError> {
        self.fonts
            .get(&id)
            .ok_or_else(|| ResourceError::MissingFont(id.to_string()))
    }

    pub fn textures(&self) -> impl Iterator<Item = (TextureId, &Texture)> {
        self.textures.iter().map(|(id, t)| (*id, t))
    }

    pub fn fonts(&self) -> impl Iterator<Item = (FontId, &FontAsset)> {
        self.fonts.iter().map(|(id, f)| (*id, f))
    }

    fn fill_missing(&mut self) {
        for id in TextureId::ALL {
            if !self.textures.contains_key(&id) {
                log::warn!("texture {id} not found, using placeholder");
                self.insert_texture(id, placeholder_texture(id));
            }
        }
        for id in FontId::ALL {
            if !self.fonts.contains_key(&id) {
                log::warn!("font {id} not found, using placeholder");
                self.fonts.insert(id, placeholder_font());
            }
        }
    }
}

fn decode_png(path: &Path) -> Result<RgbaImage, ResourceError> {
    let bytes = fs::read(path).map_err(|e| ResourceError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    image::load_from_memory(&bytes)
        .map(|img| img.to_rgba8())
        .map_err(|e| ResourceError::Image {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

// ── Placeholders ──────────────────────────────────────────────────────────────

fn shade(c: [u8; 4], factor: f32) -> Rgba<u8> {
    let s = |v: u8| (v as f32 * factor).min(255.0) as u8;
    Rgba([s(c[0]), s(c[1]), s(c[2]), c[3]])
}

/// Bordered slices for UI textures (each state slice a little brighter),
/// filled diamonds for terrain and the cursor.
fn placeholder_texture(id: TextureId) -> RgbaImage {
    let (w, h) = id.placeholder_size();
    let base = id.placeholder_color();
    let slice_w = w / id.slices();

    if id.is_terrain() || id == TextureId::Cursor {
        let half = Vec2::new(slice_w as f32 * 0.5, h as f32 * 0.5);
        return RgbaImage::from_fn(w, h, |x, y| {
            let local = Vec2::new((x % slice_w) as f32 + 0.5, y as f32 + 0.5);
            let d = (local.x - half.x).abs() / half.x + (local.y - half.y).abs() / half.y;
            let frame = (x / slice_w) as f32;
            if d < 1.0 {
                // Darker rim so neighbouring tiles read as a grid.
                let rim = if d > 0.92 { 0.7 } else { 1.0 };
                shade(base, rim * (1.0 + 0.08 * frame))
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
    }

    RgbaImage::from_fn(w, h, |x, y| {
        let lx = x % slice_w;
        let state = x / slice_w;
        let on_border = lx == 0 || lx == slice_w - 1 || y == 0 || y == h - 1;
        if on_border {
            shade(base, 0.5)
        } else {
            shade(base, 1.0 + 0.25 * state as f32)
        }
    })
}

/// Block glyphs on an 8×16 grid: every printable character renders as an
/// outlined cell, which is enough to lay out and read captions' extents.
fn placeholder_font() -> FontAsset {
    let (cell_w, cell_h) = (8, 16);
    let font = Font::monospace_grid(cell_w, cell_h);
    let image = RgbaImage::from_fn(font.texture_width, font.texture_height, |x, y| {
        let (lx, ly) = (x % cell_w, y % cell_h);
        let index = (y / cell_h) * 16 + x / cell_w;
        // Space stays empty.
        if index == 0 {
            return Rgba([0, 0, 0, 0]);
        }
        let inside = (1..cell_w - 1).contains(&lx) && (3..cell_h - 2).contains(&ly);
        let edge = lx == 1 || lx == cell_w - 2 || ly == 3 || ly == cell_h - 3;
        if inside && edge {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    });
    FontAsset { font, image }
}
