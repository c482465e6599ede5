//! Component value types: Caption, Background, ScrollBar and Group.
//!
//! These are plain data with local invariants (texture slices, scrollbar
//! geometry). Lookup, validation and event dispatch live in [`super::Ui`].

use glam::Vec2;

use crate::engine::Color;
use crate::geometry::Rect;
use crate::renderer::draw::{DrawList, Layer, TextureKey, uv_rect};
use crate::renderer::text::{Font, measure_text};
use crate::resources::{FontId, Resources, STATE_SLICES, TextureId};

use super::registry::{BackgroundKey, ScrollBarKey};

pub const DEFAULT_CHAR_SIZE: u32 = 30;
pub const MIN_CHAR_SIZE: u32 = 10;
pub const MAX_CHAR_SIZE: u32 = 72;

/// Width of every scrollbar part.
pub const SCROLL_WIDTH: f32 = 20.0;
/// Height of the two arrow buttons.
pub const ARROW_HEIGHT: f32 = 20.0;

const BAR_SCALE_MIN: f32 = 0.1;
const BAR_SCALE_MAX: f32 = 1.0;
const STEP_EPSILON: f32 = 1e-3;

// ── Events ───────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    MousePressed,
    MouseReleased,
    ScrollDraggedUp,
    ScrollDraggedDown,
    TileBoxItemSelected,
}

/// Delivered to callbacks and returned from dispatch.
#[derive(Clone, Debug, PartialEq)]
pub struct Signal {
    /// ID of the component the event belongs to.
    pub source: String,
    pub kind: EventKind,
    /// Pointer position when the event fired.
    pub position: Vec2,
}

// ── Flags ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Flags {
    pub enabled: bool,
    pub visible: bool,
    pub selected: bool,
    pub selectable: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Self { enabled: true, visible: true, selected: false, selectable: false }
    }
}

impl Flags {
    /// Visible and enabled: eligible for pointer interaction.
    pub fn interactive(&self) -> bool {
        self.visible && self.enabled
    }
}

// ── Caption ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Caption {
    pub text: String,
    pub font: FontId,
    pub char_size: u32,
    pub color: Color,
    /// Where `origin` lands on screen.
    pub position: Vec2,
    /// Local anchor, measured from the text's top-left.
    pub origin: Vec2,
    pub flags: Flags,
    size: Vec2,
}

impl Caption {
    /// A `char_size` outside 10–72 falls back to the default.
    pub fn new(text: &str, font: FontId, char_size: u32, metrics: &Font) -> Self {
        let char_size = if Self::valid_char_size(char_size) {
            char_size
        } else {
            log::warn!("character size {char_size} out of range, using {DEFAULT_CHAR_SIZE}");
            DEFAULT_CHAR_SIZE
        };
        let mut caption = Self {
            text: text.to_owned(),
            font,
            char_size,
            color: Color::WHITE,
            position: Vec2::ZERO,
            origin: Vec2::ZERO,
            flags: Flags::default(),
            size: Vec2::ZERO,
        };
        caption.remeasure(metrics);
        caption
    }

    pub fn valid_char_size(size: u32) -> bool {
        (MIN_CHAR_SIZE..=MAX_CHAR_SIZE).contains(&size)
    }

    /// Refresh the cached extent after text, font or size changed.
    pub fn remeasure(&mut self, metrics: &Font) {
        self.size = measure_text(&self.text, metrics, self.char_size as f32);
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.position - self.origin, self.size)
    }

    pub fn draw(&self, res: &Resources, list: &mut DrawList) {
        let Ok(asset) = res.font(self.font) else { return };
        list.push_text(
            Layer::Screen,
            self.font,
            &asset.font,
            &self.text,
            self.position - self.origin,
            self.char_size as f32,
            self.color,
        );
    }
}

// ── Background ───────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BackgroundState {
    Normal,
    Hover,
    Down,
    Selected,
}

impl BackgroundState {
    pub const ALL: [BackgroundState; 4] = [
        BackgroundState::Normal,
        BackgroundState::Hover,
        BackgroundState::Down,
        BackgroundState::Selected,
    ];

    /// Horizontal slice of a multi-state texture.
    pub fn index(self) -> u32 {
        match self {
            BackgroundState::Normal => 0,
            BackgroundState::Hover => 1,
            BackgroundState::Down => 2,
            BackgroundState::Selected => 3,
        }
    }
}

/// Pixel rect of `state`'s slice in a texture of `texture_size`.
fn state_slice(state: BackgroundState, texture_size: Vec2) -> Rect {
    let w = texture_size.x / STATE_SLICES as f32;
    Rect::new(state.index() as f32 * w, 0.0, w, texture_size.y)
}

#[derive(Clone, Debug, PartialEq)]
pub struct Background {
    pub texture: TextureId,
    pub position: Vec2,
    /// Drawn size; starts out as `tile_size`.
    pub size: Vec2,
    pub tint: Color,
    pub flags: Flags,
    tile_size: Vec2,
    state: BackgroundState,
    multi_tex: bool,
    texture_rect: Rect,
}

impl Background {
    /// In multi-texture mode the texture holds one slice per state and a
    /// tile is a quarter of its width.
    pub fn new(texture: TextureId, texture_size: Vec2, multi_tex: bool) -> Self {
        let mut bg = Self {
            texture,
            position: Vec2::ZERO,
            size: Vec2::ZERO,
            tint: Color::WHITE,
            flags: Flags::default(),
            tile_size: Vec2::ZERO,
            state: BackgroundState::Normal,
            multi_tex,
            texture_rect: Rect::ZERO,
        };
        bg.set_texture(texture, texture_size);
        bg.size = bg.tile_size;
        bg
    }

    pub fn state(&self) -> BackgroundState { self.state }
    pub fn multi_tex(&self) -> bool { self.multi_tex }
    pub fn tile_size(&self) -> Vec2 { self.tile_size }
    pub fn texture_rect(&self) -> Rect { self.texture_rect }

    /// Swap the texture; the drawn size is kept.
    pub fn set_texture(&mut self, texture: TextureId, texture_size: Vec2) {
        self.texture = texture;
        self.tile_size = if self.multi_tex {
            Vec2::new(texture_size.x / STATE_SLICES as f32, texture_size.y)
        } else {
            texture_size
        };
        self.texture_rect = Rect::from_pos_size(
            Vec2::new(self.state.index() as f32 * self.tile_size.x, 0.0),
            self.tile_size,
        );
    }

    /// Ignored outside multi-texture mode. Returns whether the state applied.
    pub fn set_state(&mut self, state: BackgroundState) -> bool {
        if !self.multi_tex {
            return false;
        }
        self.state = state;
        self.texture_rect.x = state.index() as f32 * self.tile_size.x;
        true
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.position, self.size)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        self.bounds().contains(p)
    }

    pub fn draw(&self, res: &Resources, list: &mut DrawList) {
        let Ok(tex) = res.texture(self.texture) else { return };
        let uv = uv_rect(self.texture_rect, tex.size());
        list.push_sprite(Layer::Screen, TextureKey::Texture(self.texture), self.bounds(), uv, self.tint);
    }
}

// ── ScrollBar ────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScrollPart {
    Area,
    Bar,
    ArrowUp,
    ArrowDown,
}

impl ScrollPart {
    /// Back-to-front draw order.
    pub const ALL: [ScrollPart; 4] = [
        ScrollPart::Area,
        ScrollPart::ArrowUp,
        ScrollPart::ArrowDown,
        ScrollPart::Bar,
    ];

    pub fn texture(self) -> TextureId {
        match self {
            ScrollPart::Area => TextureId::ScrollArea,
            ScrollPart::Bar => TextureId::ScrollBar,
            ScrollPart::ArrowUp => TextureId::ScrollArrowUp,
            ScrollPart::ArrowDown => TextureId::ScrollArrowDown,
        }
    }

    fn slot(self) -> usize {
        match self {
            ScrollPart::Area => 0,
            ScrollPart::Bar => 1,
            ScrollPart::ArrowUp => 2,
            ScrollPart::ArrowDown => 3,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

impl ScrollDirection {
    pub fn sign(self) -> f32 {
        match self {
            ScrollDirection::Up => -1.0,
            ScrollDirection::Down => 1.0,
        }
    }

    pub fn event(self) -> EventKind {
        match self {
            ScrollDirection::Up => EventKind::ScrollDraggedUp,
            ScrollDirection::Down => EventKind::ScrollDraggedDown,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Part {
    rect: Rect,
    state: BackgroundState,
}

/// Vertical scrollbar: a track between two arrow buttons and a bar that
/// moves in whole steps of `delta_y` pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollBar {
    pub flags: Flags,
    parts: [Part; 4],
    position: Vec2,
    scroll_height: f32,
    scroll_amount: f32,
    rows: usize,
    limit: usize,
    bar_scale: f32,
    delta_y: f32,
    step: usize,
}

impl ScrollBar {
    /// `scroll_height` is the full height including both arrows;
    /// `scroll_amount` is the content height of one row.
    pub fn new(position: Vec2, scroll_height: f32, scroll_amount: f32) -> Self {
        let part = Part { rect: Rect::ZERO, state: BackgroundState::Normal };
        let mut sb = Self {
            flags: Flags::default(),
            parts: [part; 4],
            position,
            scroll_height,
            scroll_amount,
            rows: 0,
            limit: 0,
            bar_scale: BAR_SCALE_MAX,
            delta_y: 0.0,
            step: 0,
        };
        sb.set_row_count(0);
        sb
    }

    pub fn position(&self) -> Vec2 { self.position }
    pub fn scroll_height(&self) -> f32 { self.scroll_height }
    pub fn scroll_amount(&self) -> f32 { self.scroll_amount }
    pub fn rows(&self) -> usize { self.rows }
    pub fn bar_scale(&self) -> f32 { self.bar_scale }
    pub fn delta_y(&self) -> f32 { self.delta_y }
    /// Steps taken from the top.
    pub fn step(&self) -> usize { self.step }
    /// Rows the track spans: the smallest count whose content exceeds it.
    pub fn visible_rows(&self) -> usize { self.limit }

    pub fn track_height(&self) -> f32 {
        self.scroll_height - 2.0 * ARROW_HEIGHT
    }

    pub fn part_rect(&self, part: ScrollPart) -> Rect {
        self.parts[part.slot()].rect
    }

    pub fn part_state(&self, part: ScrollPart) -> BackgroundState {
        self.parts[part.slot()].state
    }

    pub fn set_part_state(&mut self, part: ScrollPart, state: BackgroundState) {
        self.parts[part.slot()].state = state;
    }

    /// Set `state` on every part whose rect contains `p`; the area counts
    /// as well as the arrow or bar above it.
    pub fn set_parts_under(&mut self, p: Vec2, state: BackgroundState) {
        for part in &mut self.parts {
            if part.rect.contains(p) {
                part.state = state;
            }
        }
    }

    /// Topmost part under `p`: arrows and bar sit above the area.
    pub fn part_at(&self, p: Vec2) -> Option<ScrollPart> {
        [ScrollPart::Bar, ScrollPart::ArrowUp, ScrollPart::ArrowDown, ScrollPart::Area]
            .into_iter()
            .find(|part| self.part_rect(*part).contains(p))
    }

    pub fn bounds(&self) -> Rect {
        self.part_rect(ScrollPart::Area)
    }

    /// Moves every part and keeps the current step.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.layout();
    }

    /// Resize the bar for `rows` rows of content and reset to the top.
    ///
    /// `scale = clamp(H / (A·N), 0.1, 1)`, the bar is `scale` of the track,
    /// and `limit` is the smallest row count whose content is taller than
    /// the track. The bar then moves `(track − bar) / (N − limit)` per step.
    pub fn set_row_count(&mut self, rows: usize) {
        let track = self.track_height();
        let a = self.scroll_amount;
        self.rows = rows;
        self.step = 0;

        if a <= 0.0 || track <= 0.0 {
            self.limit = 0;
            self.bar_scale = BAR_SCALE_MAX;
            self.delta_y = 0.0;
            self.layout();
            return;
        }

        let content = a * rows as f32;
        self.bar_scale = if content > 0.0 {
            (self.scroll_height / content).clamp(BAR_SCALE_MIN, BAR_SCALE_MAX)
        } else {
            BAR_SCALE_MAX
        };

        let mut limit = 0usize;
        let mut accumulated = 0.0;
        while accumulated <= track {
            accumulated += a;
            limit += 1;
        }
        self.limit = limit;

        let bar = track * self.bar_scale;
        self.delta_y = if rows != limit {
            (track - bar) / (rows as f32 - limit as f32)
        } else {
            0.0
        };
        self.layout();
    }

    pub fn bar_height(&self) -> f32 {
        self.track_height() * self.bar_scale
    }

    /// Move the bar one step if it stays between the arrows.
    pub fn try_step(&mut self, direction: ScrollDirection) -> bool {
        if self.delta_y <= 0.0 {
            return false;
        }
        if direction == ScrollDirection::Up && self.step == 0 {
            return false;
        }

        let bar = self.part_rect(ScrollPart::Bar);
        let new_top = bar.y + direction.sign() * self.delta_y;
        let ceiling = self.part_rect(ScrollPart::ArrowUp).bottom();
        let floor = self.part_rect(ScrollPart::ArrowDown).y;
        if new_top < ceiling - STEP_EPSILON || new_top + bar.h > floor + STEP_EPSILON {
            return false;
        }

        match direction {
            ScrollDirection::Up => self.step -= 1,
            ScrollDirection::Down => self.step += 1,
        }
        self.layout();
        true
    }

    fn layout(&mut self) {
        let (x, y, h) = (self.position.x, self.position.y, self.scroll_height);
        self.parts[ScrollPart::Area.slot()].rect = Rect::new(x, y, SCROLL_WIDTH, h);
        self.parts[ScrollPart::ArrowUp.slot()].rect = Rect::new(x, y, SCROLL_WIDTH, ARROW_HEIGHT);
        self.parts[ScrollPart::ArrowDown.slot()].rect =
            Rect::new(x, y + h - ARROW_HEIGHT, SCROLL_WIDTH, ARROW_HEIGHT);
        self.parts[ScrollPart::Bar.slot()].rect = Rect::new(
            x,
            y + ARROW_HEIGHT + self.step as f32 * self.delta_y,
            SCROLL_WIDTH,
            self.bar_height(),
        );
    }

    pub fn draw(&self, res: &Resources, list: &mut DrawList) {
        for part in ScrollPart::ALL {
            let texture = part.texture();
            let Ok(tex) = res.texture(texture) else { continue };
            let uv = uv_rect(state_slice(self.part_state(part), tex.size()), tex.size());
            list.push_sprite(
                Layer::Screen,
                TextureKey::Texture(texture),
                self.part_rect(part),
                uv,
                Color::WHITE,
            );
        }
    }
}

// ── Group ────────────────────────────────────────────────────────────────────

/// Grid placement of a group's members, optionally scrolled by a scrollbar.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridLayout {
    pub origin: Vec2,
    pub cell: Vec2,
    pub columns: usize,
    pub visible_rows: usize,
    pub first_row: usize,
    pub scrollbar: Option<ScrollBarKey>,
}

impl GridLayout {
    pub fn new(origin: Vec2, cell: Vec2, columns: usize, visible_rows: usize) -> Self {
        Self {
            origin,
            cell,
            columns: columns.max(1),
            visible_rows,
            first_row: 0,
            scrollbar: None,
        }
    }

    /// Screen position of member `index` and whether its row is shown.
    pub fn place(&self, index: usize) -> (Vec2, bool) {
        let row = index / self.columns;
        let col = index % self.columns;
        let shown = row >= self.first_row && row < self.first_row + self.visible_rows;
        let visual_row = row as f32 - self.first_row as f32;
        (self.origin + Vec2::new(col as f32 * self.cell.x, visual_row * self.cell.y), shown)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Group {
    pub members: Vec<BackgroundKey>,
    pub selected: Option<BackgroundKey>,
    /// Emitted for the group when a member gets selected.
    pub selection_event: Option<EventKind>,
    pub grid: Option<GridLayout>,
    pub flags: Flags,
}

impl Group {
    pub fn contains(&self, key: BackgroundKey) -> bool {
        self.members.contains(&key)
    }
}
