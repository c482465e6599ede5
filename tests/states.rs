use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use isorts::engine::Engine;
use isorts::input::{InputEvent, KeyCode, MouseButton};
use isorts::renderer::draw::DrawList;
use isorts::resources::TextureId;
use isorts::state::{GameState, StateAction, StateStack};
use isorts::states::main_menu::{EDITOR_BUTTON_ID, QUIT_BUTTON_ID};
use isorts::states::map_editor::{BACK_BUTTON_ID, PALETTE_ID, TERRAIN_LABEL_ID};
use isorts::states::{MainMenu, MapEditor};
use isorts::ui::widgets::TileBox;

type Log = Rc<RefCell<Vec<String>>>;

/// Records every lifecycle hook and replays a queued action from `update`.
struct Recorder {
    name: &'static str,
    log: Log,
    next: Option<StateAction>,
}

impl Recorder {
    fn boxed(name: &'static str, log: &Log) -> Box<Self> {
        Box::new(Self { name, log: Rc::clone(log), next: None })
    }
}

impl GameState for Recorder {
    fn name(&self) -> &'static str {
        self.name
    }
    fn on_enter(&mut self, _: &mut Engine) {
        self.log.borrow_mut().push(format!("enter {}", self.name));
    }
    fn on_exit(&mut self, _: &mut Engine) {
        self.log.borrow_mut().push(format!("exit {}", self.name));
    }
    fn handle_input(&mut self, _: &mut Engine, _: &InputEvent) -> StateAction {
        self.log.borrow_mut().push(format!("input {}", self.name));
        StateAction::None
    }
    fn update(&mut self, _: &mut Engine, _: f32) -> StateAction {
        self.next.take().unwrap_or(StateAction::None)
    }
    fn draw(&mut self, _: &Engine, _: &mut DrawList) {
        self.log.borrow_mut().push(format!("draw {}", self.name));
    }
    fn freeze(&mut self, frozen: bool) {
        self.log.borrow_mut().push(format!("freeze {} {frozen}", self.name));
    }
}

fn entries(log: &Log) -> Vec<String> {
    std::mem::take(&mut *log.borrow_mut())
}

fn press(p: Vec2) -> InputEvent {
    InputEvent::MouseButtonPressed { button: MouseButton::Left, position: p }
}

fn release(p: Vec2) -> InputEvent {
    InputEvent::MouseButtonReleased { button: MouseButton::Left, position: p }
}

fn click(stack: &mut StateStack, engine: &mut Engine, p: Vec2) {
    stack.handle_input(engine, &press(p));
    stack.handle_input(engine, &release(p));
}

// ── StateStack ────────────────────────────────────────────────────────────────

#[test]
fn new_stack_enters_initial_state() {
    let log = Log::default();
    let mut engine = Engine::headless();
    let stack = StateStack::new(Recorder::boxed("a", &log), &mut engine);
    assert_eq!(stack.len(), 1);
    assert_eq!(stack.top(), Some("a"));
    assert_eq!(entries(&log), ["enter a"]);
}

#[test]
fn push_freezes_below_and_pop_thaws() {
    let log = Log::default();
    let mut engine = Engine::headless();
    let mut stack = StateStack::new(Recorder::boxed("a", &log), &mut engine);
    entries(&log);

    stack.apply(StateAction::Push(Recorder::boxed("b", &log)), &mut engine);
    assert_eq!(stack.top(), Some("b"));
    assert_eq!(entries(&log), ["freeze a true", "enter b"]);

    stack.apply(StateAction::Pop, &mut engine);
    assert_eq!(stack.top(), Some("a"));
    assert_eq!(entries(&log), ["exit b", "freeze a false"]);
    assert!(!engine.quit_requested());
}

#[test]
fn only_top_state_sees_input_and_draws() {
    let log = Log::default();
    let mut engine = Engine::headless();
    let mut stack = StateStack::new(Recorder::boxed("a", &log), &mut engine);
    stack.apply(StateAction::Push(Recorder::boxed("b", &log)), &mut engine);
    entries(&log);

    stack.handle_input(&mut engine, &InputEvent::KeyPressed(KeyCode::Space));
    stack.draw(&engine, &mut DrawList::new(engine.screen_size()));
    assert_eq!(entries(&log), ["input b", "draw b"]);
}

#[test]
fn popping_last_state_requests_quit() {
    let log = Log::default();
    let mut engine = Engine::headless();
    let mut stack = StateStack::new(Recorder::boxed("a", &log), &mut engine);
    stack.apply(StateAction::Pop, &mut engine);
    assert!(stack.is_empty());
    assert!(engine.quit_requested());

    // Nothing left to drive.
    stack.update(&mut engine, 0.016);
    assert_eq!(stack.top(), None);
}

#[test]
fn switch_replaces_top() {
    let log = Log::default();
    let mut engine = Engine::headless();
    let mut stack = StateStack::new(Recorder::boxed("a", &log), &mut engine);
    entries(&log);

    stack.apply(StateAction::Switch(Recorder::boxed("b", &log)), &mut engine);
    assert_eq!(stack.len(), 1);
    assert_eq!(stack.top(), Some("b"));
    assert_eq!(entries(&log), ["exit a", "enter b"]);
}

#[test]
fn update_applies_returned_action() {
    let log = Log::default();
    let mut engine = Engine::headless();
    let mut first = Recorder::boxed("a", &log);
    first.next = Some(StateAction::Quit);
    let mut stack = StateStack::new(first, &mut engine);

    stack.update(&mut engine, 0.016);
    assert!(engine.quit_requested());
    assert_eq!(stack.len(), 1);
}

// ── Main menu ─────────────────────────────────────────────────────────────────

/// Menu on an empty stack, plus the centres of its two buttons.
fn menu_stack(engine: &mut Engine) -> (StateStack, Vec2, Vec2) {
    let menu = MainMenu::new(engine).unwrap();
    let editor = menu.ui().background(EDITOR_BUTTON_ID).unwrap().bounds().center();
    let quit = menu.ui().background(QUIT_BUTTON_ID).unwrap().bounds().center();
    (StateStack::new(Box::new(menu), engine), editor, quit)
}

#[test]
fn menu_buttons_are_stacked_and_centred() {
    let mut engine = Engine::headless();
    let (_, editor, quit) = menu_stack(&mut engine);
    assert_eq!(editor.x, engine.screen_size().x * 0.5);
    assert_eq!(quit.x, editor.x);
    assert!(quit.y > editor.y);
}

#[test]
fn editor_button_pushes_map_editor() {
    let mut engine = Engine::headless();
    let (mut stack, editor, _) = menu_stack(&mut engine);

    click(&mut stack, &mut engine, editor);
    assert_eq!(stack.top(), Some("main menu"));
    stack.update(&mut engine, 0.016);
    assert_eq!(stack.top(), Some("map editor"));
    assert_eq!(stack.len(), 2);
}

#[test]
fn escape_walks_back_out() {
    let mut engine = Engine::headless();
    let (mut stack, editor, _) = menu_stack(&mut engine);
    click(&mut stack, &mut engine, editor);
    stack.update(&mut engine, 0.016);

    let escape = InputEvent::KeyPressed(KeyCode::Escape);
    stack.handle_input(&mut engine, &escape);
    assert_eq!(stack.top(), Some("main menu"));
    assert!(!engine.quit_requested());

    stack.handle_input(&mut engine, &escape);
    assert!(engine.quit_requested());
}

#[test]
fn quit_button_requests_quit() {
    let mut engine = Engine::headless();
    let (mut stack, _, quit) = menu_stack(&mut engine);
    click(&mut stack, &mut engine, quit);
    stack.update(&mut engine, 0.016);
    assert!(engine.quit_requested());
}

#[test]
fn press_without_release_does_nothing() {
    let mut engine = Engine::headless();
    let (mut stack, editor, _) = menu_stack(&mut engine);
    stack.handle_input(&mut engine, &press(editor));
    stack.update(&mut engine, 0.016);
    assert_eq!(stack.len(), 1);
}

#[test]
fn frozen_menu_ignores_input() {
    let mut engine = Engine::headless();
    let mut menu = MainMenu::new(&engine).unwrap();
    menu.freeze(true);
    assert!(menu.is_frozen());
    let action = menu.handle_input(&mut engine, &InputEvent::KeyPressed(KeyCode::Escape));
    assert!(matches!(action, StateAction::None));

    menu.freeze(false);
    let action = menu.handle_input(&mut engine, &InputEvent::KeyPressed(KeyCode::Escape));
    assert!(matches!(action, StateAction::Quit));
}

#[test]
fn menu_draws_widgets_and_banner() {
    let mut engine = Engine::headless();
    let (mut stack, _, _) = menu_stack(&mut engine);
    let mut list = DrawList::new(engine.screen_size());
    stack.draw(&engine, &mut list);
    assert!(!list.is_empty());
}

// ── Map editor ────────────────────────────────────────────────────────────────

fn editor_stack(engine: &mut Engine) -> (StateStack, Vec2, Vec2) {
    let editor = MapEditor::new(engine).unwrap();
    let dirt = editor.ui().background(&TileBox::item_id(PALETTE_ID, 1)).unwrap().bounds().center();
    let back = editor.ui().background(BACK_BUTTON_ID).unwrap().bounds().center();
    (StateStack::new(Box::new(editor), engine), dirt, back)
}

#[test]
fn editor_starts_painting_first_terrain() {
    let engine = Engine::headless();
    let editor = MapEditor::new(&engine).unwrap();
    assert_eq!(editor.map().paint_texture(), TextureId::Grass);
    assert_eq!(editor.map().size(), engine.config.map_size);
    assert_eq!(editor.ui().caption_text(TERRAIN_LABEL_ID).unwrap(), "Terrain: grass");
}

#[test]
fn palette_pick_changes_paint_texture() {
    let mut engine = Engine::headless();
    let mut editor = MapEditor::new(&engine).unwrap();
    let dirt = editor.ui().background(&TileBox::item_id(PALETTE_ID, 1)).unwrap().bounds().center();

    editor.handle_input(&mut engine, &press(dirt));
    editor.update(&mut engine, 0.016);
    assert_eq!(editor.map().paint_texture(), TextureId::Dirt);
    assert_eq!(editor.ui().caption_text(TERRAIN_LABEL_ID).unwrap(), "Terrain: dirt");
}

#[test]
fn back_button_pops_editor() {
    let mut engine = Engine::headless();
    let (mut stack, _, back) = editor_stack(&mut engine);
    click(&mut stack, &mut engine, back);
    stack.update(&mut engine, 0.016);
    // The editor was the only state, so popping it ends the game.
    assert!(stack.is_empty());
    assert!(engine.quit_requested());
}

#[test]
fn palette_press_through_stack_keeps_editor_on_top() {
    let mut engine = Engine::headless();
    let (mut stack, dirt, _) = editor_stack(&mut engine);
    click(&mut stack, &mut engine, dirt);
    stack.update(&mut engine, 0.016);
    assert_eq!(stack.top(), Some("map editor"));
}
