// ── Widgets ───────────────────────────────────────────────────────────────────
//
// Widgets are named compositions of components that share one ID across
// registries. Nothing links the parts at runtime, so every call that moves
// a widget re-derives the positions of its dependent parts.

use glam::Vec2;

use crate::error::UiError;
use crate::resources::{FontId, TextureId};

use super::components::{EventKind, GridLayout};
use super::Ui;

/// Background growth around a button's caption.
pub const BUTTON_PADDING: Vec2 = Vec2::new(20.0, 15.0);
/// Caption offset from a button's top-left corner.
pub const BUTTON_CAPTION_OFFSET: Vec2 = Vec2::new(10.0, 5.0);
pub const BUTTON_CHAR_SIZE: u32 = 20;
pub const MENU_CHAR_SIZE: u32 = 24;
/// Gap between a picture and its caption.
pub const PICTURE_CAPTION_GAP: f32 = 5.0;

// ── Label ─────────────────────────────────────────────────────────────────────

/// A bare caption.
pub struct Label;

impl Label {
    pub fn create(ui: &mut Ui, id: &str, text: &str, font: FontId, char_size: u32) -> Result<(), UiError> {
        ui.create_caption(id, text, font, char_size).map(|_| ())
    }

    pub fn set_position(ui: &mut Ui, id: &str, position: Vec2) -> Result<(), UiError> {
        ui.set_caption_position(id, position)
    }

    pub fn set_text(ui: &mut Ui, id: &str, text: &str) -> Result<(), UiError> {
        ui.set_caption_text(id, text)
    }

    pub fn set_visibility(ui: &mut Ui, id: &str, visible: bool) -> Result<(), UiError> {
        ui.set_caption_visibility(id, visible)
    }

    pub fn destroy(ui: &mut Ui, id: &str) -> Result<(), UiError> {
        ui.destroy_caption(id)
    }
}

// ── Button ────────────────────────────────────────────────────────────────────

/// Single-texture background sized around its caption.
pub struct Button;

impl Button {
    /// Creates the caption first; if the background then fails the caption
    /// is removed again, so either both parts exist or neither does.
    pub fn create(ui: &mut Ui, id: &str, text: &str) -> Result<(), UiError> {
        ui.create_caption(id, text, FontId::Main, BUTTON_CHAR_SIZE)?;
        let size = ui.caption_size(id)? + BUTTON_PADDING;

        let built = ui
            .create_background(id, TextureId::Button, false)
            .and_then(|_| ui.set_background_size(id, size))
            .and_then(|_| Self::set_position(ui, id, Vec2::ZERO));
        if built.is_err() {
            let _ = ui.destroy_caption(id);
        }
        built
    }

    pub fn set_position(ui: &mut Ui, id: &str, position: Vec2) -> Result<(), UiError> {
        ui.set_background_position(id, position)?;
        ui.set_caption_position(id, position + BUTTON_CAPTION_OFFSET)
    }

    pub fn position(ui: &Ui, id: &str) -> Result<Vec2, UiError> {
        ui.background_position(id)
    }

    pub fn size(ui: &Ui, id: &str) -> Result<Vec2, UiError> {
        ui.background_size(id)
    }

    /// Replaces the caption and refits the background.
    pub fn set_text(ui: &mut Ui, id: &str, text: &str) -> Result<(), UiError> {
        ui.set_caption_text(id, text)?;
        let size = ui.caption_size(id)? + BUTTON_PADDING;
        ui.set_background_size(id, size)
    }

    pub fn set_visibility(ui: &mut Ui, id: &str, visible: bool) -> Result<(), UiError> {
        ui.set_background_visibility(id, visible)?;
        ui.set_caption_visibility(id, visible)
    }

    pub fn destroy(ui: &mut Ui, id: &str) -> Result<(), UiError> {
        let caption = ui.destroy_caption(id);
        let background = ui.destroy_background(id);
        caption.and(background)
    }
}

// ── MenuButton ────────────────────────────────────────────────────────────────

/// Fixed-size multi-state button with a centred caption.
pub struct MenuButton;

impl MenuButton {
    pub fn create(ui: &mut Ui, id: &str, text: &str) -> Result<(), UiError> {
        ui.create_caption(id, text, FontId::Main, MENU_CHAR_SIZE)?;
        let origin = ui.caption_size(id)? * 0.5;

        let built = ui
            .set_caption_origin(id, origin)
            .and_then(|_| ui.create_background(id, TextureId::MenuButton, true))
            .and_then(|_| Self::set_position(ui, id, Vec2::ZERO));
        if built.is_err() {
            let _ = ui.destroy_caption(id);
        }
        built
    }

    pub fn set_position(ui: &mut Ui, id: &str, position: Vec2) -> Result<(), UiError> {
        ui.set_background_position(id, position)?;
        let center = ui.background(id)?.bounds().center();
        ui.set_caption_position(id, center)
    }

    pub fn size(ui: &Ui, id: &str) -> Result<Vec2, UiError> {
        ui.background_size(id)
    }

    pub fn set_visibility(ui: &mut Ui, id: &str, visible: bool) -> Result<(), UiError> {
        ui.set_background_visibility(id, visible)?;
        ui.set_caption_visibility(id, visible)
    }

    pub fn destroy(ui: &mut Ui, id: &str) -> Result<(), UiError> {
        let caption = ui.destroy_caption(id);
        let background = ui.destroy_background(id);
        caption.and(background)
    }
}

// ── PictureFrame ──────────────────────────────────────────────────────────────

/// A picture at its natural size with a caption centred underneath.
pub struct PictureFrame;

impl PictureFrame {
    pub fn create(ui: &mut Ui, id: &str, picture: TextureId, text: &str) -> Result<(), UiError> {
        ui.create_caption(id, text, FontId::Main, BUTTON_CHAR_SIZE)?;
        let caption_w = ui.caption_size(id)?.x;

        let built = ui
            .set_caption_origin(id, Vec2::new(caption_w * 0.5, 0.0))
            .and_then(|_| ui.create_background(id, picture, false))
            .and_then(|_| Self::set_position(ui, id, Vec2::ZERO));
        if built.is_err() {
            let _ = ui.destroy_caption(id);
        }
        built
    }

    pub fn set_position(ui: &mut Ui, id: &str, position: Vec2) -> Result<(), UiError> {
        ui.set_background_position(id, position)?;
        let frame = ui.background(id)?.bounds();
        ui.set_caption_position(id, Vec2::new(frame.center().x, frame.bottom() + PICTURE_CAPTION_GAP))
    }

    pub fn set_picture(ui: &mut Ui, id: &str, picture: TextureId) -> Result<(), UiError> {
        ui.set_background_texture(id, picture)?;
        let size = ui.background(id)?.tile_size();
        ui.set_background_size(id, size)?;
        let position = ui.background_position(id)?;
        Self::set_position(ui, id, position)
    }

    pub fn destroy(ui: &mut Ui, id: &str) -> Result<(), UiError> {
        let caption = ui.destroy_caption(id);
        let background = ui.destroy_background(id);
        caption.and(background)
    }
}

// ── TileBox ───────────────────────────────────────────────────────────────────

pub const TILE_BOX_COLUMNS: usize = 2;
pub const TILE_BOX_THUMB: Vec2 = Vec2::new(64.0, 32.0);
pub const TILE_BOX_CELL: Vec2 = Vec2::new(72.0, 40.0);
pub const TILE_BOX_PADDING: f32 = 8.0;
/// Rows shown at once. The panel height is chosen so the scrollbar's track
/// spans exactly this many rows.
pub const TILE_BOX_ROWS: usize = 3;

/// Scrollable palette of terrain thumbnails.
///
/// Parts: a panel background and a group under `id`, a scrollbar at
/// `"{id}/scroll"`, and one selectable thumbnail per texture at `"{id}/{i}"`.
/// Pressing a thumbnail selects it and emits `TileBoxItemSelected` for `id`.
pub struct TileBox;

impl TileBox {
    pub fn scrollbar_id(id: &str) -> String {
        format!("{id}/scroll")
    }

    pub fn item_id(id: &str, index: usize) -> String {
        format!("{id}/{index}")
    }

    pub fn panel_size() -> Vec2 {
        Vec2::new(
            TILE_BOX_COLUMNS as f32 * TILE_BOX_CELL.x + 2.0 * TILE_BOX_PADDING,
            TILE_BOX_ROWS as f32 * TILE_BOX_CELL.y + 2.0 * TILE_BOX_PADDING,
        )
    }

    /// Panel plus scrollbar.
    pub fn size() -> Vec2 {
        Self::panel_size() + Vec2::new(super::components::SCROLL_WIDTH, 0.0)
    }

    pub fn create(ui: &mut Ui, id: &str, position: Vec2, textures: &[TextureId]) -> Result<(), UiError> {
        let panel = Self::panel_size();
        ui.create_background(id, TextureId::TileBoxPanel, false)?;
        ui.set_background_size(id, panel)?;
        ui.set_background_position(id, position)?;

        let scroll_id = Self::scrollbar_id(id);
        ui.create_scrollbar(&scroll_id, position + Vec2::new(panel.x, 0.0), panel.y, TILE_BOX_CELL.y)?;
        let rows = textures.len().div_ceil(TILE_BOX_COLUMNS);
        ui.set_row_count(&scroll_id, rows)?;
        let visible_rows = ui.scrollbar(&scroll_id)?.visible_rows();

        ui.create_group(id)?;
        ui.set_group_selection_event(id, Some(EventKind::TileBoxItemSelected))?;

        for (i, texture) in textures.iter().enumerate() {
            let item = Self::item_id(id, i);
            ui.create_background(&item, *texture, false)?;
            ui.set_background_size(&item, TILE_BOX_THUMB)?;
            ui.set_background_selectable(&item, true)?;
            ui.add_to_group(id, &item)?;
        }

        let inset = Vec2::splat(TILE_BOX_PADDING) + (TILE_BOX_CELL - TILE_BOX_THUMB) * 0.5;
        let grid = GridLayout::new(position + inset, TILE_BOX_CELL, TILE_BOX_COLUMNS, visible_rows);
        ui.set_group_grid(id, grid, Some(&scroll_id))?;

        if !textures.is_empty() {
            ui.select_in_group(id, &Self::item_id(id, 0))?;
        }
        Ok(())
    }

    /// Texture of the selected thumbnail.
    pub fn selected_texture(ui: &Ui, id: &str) -> Result<Option<TextureId>, UiError> {
        match ui.group_selected(id)? {
            Some(item) => Ok(Some(ui.background(item)?.texture)),
            None => Ok(None),
        }
    }

    pub fn set_visibility(ui: &mut Ui, id: &str, visible: bool) -> Result<(), UiError> {
        ui.set_background_visibility(id, visible)?;
        ui.set_scrollbar_visibility(&Self::scrollbar_id(id), visible)?;
        ui.set_group_visibility(id, visible)
    }

    pub fn destroy(ui: &mut Ui, id: &str) -> Result<(), UiError> {
        let members: Vec<String> = ui
            .group(id)?
            .members
            .iter()
            .filter_map(|k| ui.backgrounds.id_of(*k).map(str::to_owned))
            .collect();
        // Every part is attempted; the first failure is reported.
        let items = members
            .iter()
            .map(|item| ui.destroy_background(item))
            .fold(Ok(()), Result::and);
        let group = ui.destroy_group(id);
        let scrollbar = ui.destroy_scrollbar(&Self::scrollbar_id(id));
        let panel = ui.destroy_background(id);
        items.and(group).and(scrollbar).and(panel)
    }
}
