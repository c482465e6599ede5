use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use crate::animation::{Animation, Animator, Renderable};
use crate::camera::View;
use crate::engine::{Color, Engine};
use crate::error::UiError;
use crate::geometry::Rect;
use crate::input::{InputEvent, KeyCode, MouseButton};
use crate::renderer::draw::{DrawList, Layer};
use crate::resources::{FontId, TextureId};
use crate::state::{GameState, StateAction};
use crate::tilemap::{TILE_HEIGHT, TILE_SIZE, TileMap, tile_corners};
use crate::ui::widgets::{Button, Label, TileBox};
use crate::ui::{EventKind, Ui};

pub const PALETTE_ID: &str = "terrain";
pub const BACK_BUTTON_ID: &str = "back";
pub const TERRAIN_LABEL_ID: &str = "terrain/label";

const MARGIN: f32 = 10.0;
const LABEL_SIZE: u32 = 16;
const CURSOR_FRAMES: u32 = 4;
const CURSOR_FRAME_TIME: f32 = 0.12;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum EditorCommand {
    Back,
    TerrainSelected,
}

pub struct MapEditor {
    ui: Ui,
    map: TileMap,
    cursor: Animator,
    commands: Rc<RefCell<Vec<EditorCommand>>>,
    frozen: bool,
}

impl MapEditor {
    pub fn new(engine: &Engine) -> Result<Self, UiError> {
        let screen = engine.screen_size();
        let mut ui = Ui::new(Rc::clone(&engine.resources));
        let commands = Rc::new(RefCell::new(Vec::new()));

        // Tile (0, 0) starts at the top centre of the screen.
        let view = View::new(Vec2::new(0.0, screen.y * 0.5 - TILE_HEIGHT * 0.5), screen);
        let mut map = TileMap::new(
            engine.config.map_size,
            Vec2::ZERO,
            TextureId::Grass,
            view,
            engine.config.scroll_speed,
        );

        let palette_pos = Vec2::new(screen.x - TileBox::size().x - MARGIN, MARGIN);
        TileBox::create(&mut ui, PALETTE_ID, palette_pos, &TextureId::TERRAIN)?;
        let queue = Rc::clone(&commands);
        ui.set_group_callback(
            PALETTE_ID,
            EventKind::TileBoxItemSelected,
            Box::new(move |_| queue.borrow_mut().push(EditorCommand::TerrainSelected)),
        )?;

        Label::create(&mut ui, TERRAIN_LABEL_ID, "", FontId::Main, LABEL_SIZE)?;
        Label::set_position(
            &mut ui,
            TERRAIN_LABEL_ID,
            palette_pos + Vec2::new(0.0, TileBox::size().y + MARGIN),
        )?;

        Button::create(&mut ui, BACK_BUTTON_ID, "Back")?;
        Button::set_position(&mut ui, BACK_BUTTON_ID, Vec2::splat(MARGIN))?;
        let queue = Rc::clone(&commands);
        ui.set_background_callback(
            BACK_BUTTON_ID,
            EventKind::MouseReleased,
            Box::new(move |_| queue.borrow_mut().push(EditorCommand::Back)),
        )?;

        let cursor = Animator::new(
            Renderable::Quad {
                texture: TextureId::Cursor,
                corners: tile_corners(Vec2::ZERO),
                texture_rect: Rect::ZERO,
                color: Color::WHITE,
            },
            Animation::strip(TILE_SIZE, CURSOR_FRAMES, CURSOR_FRAME_TIME, true),
        );

        if let Some(texture) = TileBox::selected_texture(&ui, PALETTE_ID)? {
            map.set_paint_texture(texture);
        }
        let mut editor = Self { ui, map, cursor, commands, frozen: false };
        editor.sync_terrain_label()?;
        Ok(editor)
    }

    pub fn ui(&self) -> &Ui {
        &self.ui
    }

    pub fn map(&self) -> &TileMap {
        &self.map
    }

    fn sync_terrain_label(&mut self) -> Result<(), UiError> {
        let text = format!("Terrain: {}", self.map.paint_texture());
        Label::set_text(&mut self.ui, TERRAIN_LABEL_ID, &text)
    }

    fn on_terrain_selected(&mut self) {
        match TileBox::selected_texture(&self.ui, PALETTE_ID) {
            Ok(Some(texture)) => {
                self.map.set_paint_texture(texture);
                if let Err(e) = self.sync_terrain_label() {
                    log::error!("terrain label not updated: {e}");
                }
            }
            Ok(None) => {}
            Err(e) => log::error!("palette selection unavailable: {e}"),
        }
    }

    fn take_commands(&mut self) -> Vec<EditorCommand> {
        std::mem::take(&mut *self.commands.borrow_mut())
    }
}

impl GameState for MapEditor {
    fn name(&self) -> &'static str {
        "map editor"
    }

    fn on_exit(&mut self, _engine: &mut Engine) {
        log::info!("leaving map editor");
    }

    fn handle_input(&mut self, _engine: &mut Engine, event: &InputEvent) -> StateAction {
        if self.frozen {
            return StateAction::None;
        }
        if *event == InputEvent::KeyPressed(KeyCode::Escape) {
            return StateAction::Pop;
        }
        self.ui.handle_event(event);
        StateAction::None
    }

    fn update(&mut self, engine: &mut Engine, dt: f32) -> StateAction {
        let mouse = engine.mouse_pos();
        let held = engine.is_mouse_held(MouseButton::Left);

        self.ui.update(mouse, held);
        let over_ui = self.ui.is_over(mouse);
        self.map.update(mouse, held, !over_ui, engine.screen_size(), dt);

        if let Some(tile) = self.map.hovered().and_then(|(x, y)| self.map.tile(x, y)) {
            if let Renderable::Quad { corners, .. } = &mut self.cursor.target {
                *corners = tile.corners;
            }
        }
        self.cursor.tick(dt);

        for command in self.take_commands() {
            match command {
                EditorCommand::Back => return StateAction::Pop,
                EditorCommand::TerrainSelected => self.on_terrain_selected(),
            }
        }
        StateAction::None
    }

    fn draw(&mut self, engine: &Engine, list: &mut DrawList) {
        self.map.draw(list);
        if self.map.hovered().is_some() {
            self.cursor.draw(&engine.resources, list, Layer::World);
        }
        self.ui.draw(list);
    }

    fn freeze(&mut self, frozen: bool) {
        self.frozen = frozen;
    }
}
