use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use crate::animation::{Animation, Animator, Renderable};
use crate::engine::{Color, Engine};
use crate::error::UiError;
use crate::geometry::Rect;
use crate::input::{InputEvent, KeyCode, MouseButton};
use crate::renderer::draw::{DrawList, Layer};
use crate::resources::{FontId, TextureId};
use crate::state::{GameState, StateAction};
use crate::ui::widgets::{Label, MenuButton, PictureFrame};
use crate::ui::{EventKind, Ui};

use super::MapEditor;

pub const TITLE_ID: &str = "title";
pub const LOGO_ID: &str = "logo";
pub const EDITOR_BUTTON_ID: &str = "menu/editor";
pub const QUIT_BUTTON_ID: &str = "menu/quit";

const TITLE_SIZE: u32 = 48;
const BANNER_FRAME: Vec2 = Vec2::new(128.0, 32.0);
const BANNER_FRAMES: u32 = 4;
const BANNER_FRAME_TIME: f32 = 0.15;
const BUTTON_GAP: f32 = 20.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MenuCommand {
    OpenEditor,
    Quit,
}

pub struct MainMenu {
    ui: Ui,
    banner: Animator,
    /// Filled by button callbacks, drained by `update`.
    commands: Rc<RefCell<Vec<MenuCommand>>>,
    frozen: bool,
}

impl MainMenu {
    pub fn new(engine: &Engine) -> Result<Self, UiError> {
        let screen = engine.screen_size();
        let center_x = screen.x * 0.5;
        let mut ui = Ui::new(Rc::clone(&engine.resources));

        let banner = Animator::new(
            Renderable::Sprite {
                texture: TextureId::Banner,
                position: Vec2::new(center_x - BANNER_FRAME.x * 0.5, 20.0),
                size: BANNER_FRAME,
                texture_rect: Rect::ZERO,
                color: Color::WHITE,
            },
            Animation::strip(BANNER_FRAME, BANNER_FRAMES, BANNER_FRAME_TIME, true),
        );

        Label::create(&mut ui, TITLE_ID, &engine.config.window.title, FontId::Title, TITLE_SIZE)?;
        let title_size = ui.caption_size(TITLE_ID)?;
        ui.set_caption_origin(TITLE_ID, title_size * 0.5)?;
        Label::set_position(&mut ui, TITLE_ID, Vec2::new(center_x, 90.0))?;

        PictureFrame::create(&mut ui, LOGO_ID, TextureId::Logo, "Isometric map editor")?;
        let logo_w = ui.background_size(LOGO_ID)?.x;
        PictureFrame::set_position(&mut ui, LOGO_ID, Vec2::new(center_x - logo_w * 0.5, 140.0))?;

        let commands = Rc::new(RefCell::new(Vec::new()));
        let mut y = 330.0;
        for (id, text, command) in [
            (EDITOR_BUTTON_ID, "Map Editor", MenuCommand::OpenEditor),
            (QUIT_BUTTON_ID, "Quit", MenuCommand::Quit),
        ] {
            MenuButton::create(&mut ui, id, text)?;
            let size = MenuButton::size(&ui, id)?;
            MenuButton::set_position(&mut ui, id, Vec2::new(center_x - size.x * 0.5, y))?;
            y += size.y + BUTTON_GAP;

            let queue = Rc::clone(&commands);
            ui.set_background_callback(
                id,
                EventKind::MouseReleased,
                Box::new(move |_| queue.borrow_mut().push(command)),
            )?;
        }

        Ok(Self { ui, banner, commands, frozen: false })
    }

    pub fn ui(&self) -> &Ui {
        &self.ui
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    fn take_commands(&mut self) -> Vec<MenuCommand> {
        std::mem::take(&mut *self.commands.borrow_mut())
    }
}

impl GameState for MainMenu {
    fn name(&self) -> &'static str {
        "main menu"
    }

    fn handle_input(&mut self, _engine: &mut Engine, event: &InputEvent) -> StateAction {
        if self.frozen {
            return StateAction::None;
        }
        if *event == InputEvent::KeyPressed(KeyCode::Escape) {
            return StateAction::Quit;
        }
        self.ui.handle_event(event);
        StateAction::None
    }

    fn update(&mut self, engine: &mut Engine, dt: f32) -> StateAction {
        self.ui.update(engine.mouse_pos(), engine.is_mouse_held(MouseButton::Left));
        self.banner.tick(dt);

        for command in self.take_commands() {
            match command {
                MenuCommand::OpenEditor => match MapEditor::new(engine) {
                    Ok(editor) => return StateAction::Push(Box::new(editor)),
                    Err(e) => log::error!("cannot open map editor: {e}"),
                },
                MenuCommand::Quit => return StateAction::Quit,
            }
        }
        StateAction::None
    }

    fn draw(&mut self, engine: &Engine, list: &mut DrawList) {
        self.ui.draw(list);
        self.banner.draw(&engine.resources, list, Layer::Screen);
    }

    fn freeze(&mut self, frozen: bool) {
        self.frozen = frozen;
    }
}
