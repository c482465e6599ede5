use crate::engine::Engine;
use crate::input::InputEvent;
use crate::renderer::draw::DrawList;

pub enum StateAction {
    None,
    Push(Box<dyn GameState>),
    Pop,
    Switch(Box<dyn GameState>),
    Quit,
}

/// One screen of the game. Only the top of the stack gets input and
/// updates; states below it are frozen.
pub trait GameState {
    fn name(&self) -> &'static str;
    fn on_enter(&mut self, _engine: &mut Engine) {}
    fn on_exit(&mut self, _engine: &mut Engine) {}
    fn handle_input(&mut self, engine: &mut Engine, event: &InputEvent) -> StateAction;
    fn update(&mut self, engine: &mut Engine, dt: f32) -> StateAction;
    fn draw(&mut self, engine: &Engine, list: &mut DrawList);
    /// Called with `true` when another state is pushed on top, and with
    /// `false` when this state becomes the top again.
    fn freeze(&mut self, _frozen: bool) {}
}

pub struct StateStack {
    states: Vec<Box<dyn GameState>>,
}

impl StateStack {
    pub fn new(mut initial: Box<dyn GameState>, engine: &mut Engine) -> Self {
        log::debug!("entering state {}", initial.name());
        initial.on_enter(engine);
        Self { states: vec![initial] }
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Name of the active state.
    pub fn top(&self) -> Option<&'static str> {
        self.states.last().map(|s| s.name())
    }

    pub fn handle_input(&mut self, engine: &mut Engine, event: &InputEvent) {
        let Some(top) = self.states.last_mut() else { return };
        let action = top.handle_input(engine, event);
        self.apply(action, engine);
    }

    pub fn update(&mut self, engine: &mut Engine, dt: f32) {
        let Some(top) = self.states.last_mut() else { return };
        let action = top.update(engine, dt);
        self.apply(action, engine);
    }

    /// Only the active state draws; every screen is opaque.
    pub fn draw(&mut self, engine: &Engine, list: &mut DrawList) {
        if let Some(top) = self.states.last_mut() {
            top.draw(engine, list);
        }
    }

    pub fn apply(&mut self, action: StateAction, engine: &mut Engine) {
        match action {
            StateAction::None => {}
            StateAction::Push(mut s) => {
                if let Some(top) = self.states.last_mut() {
                    top.freeze(true);
                }
                log::debug!("pushing state {}", s.name());
                s.on_enter(engine);
                self.states.push(s);
            }
            StateAction::Pop => {
                if let Some(mut top) = self.states.pop() {
                    log::debug!("popping state {}", top.name());
                    top.on_exit(engine);
                }
                match self.states.last_mut() {
                    Some(exposed) => exposed.freeze(false),
                    None => engine.request_quit(),
                }
            }
            StateAction::Switch(mut s) => {
                if let Some(mut top) = self.states.pop() {
                    log::debug!("switching state {} -> {}", top.name(), s.name());
                    top.on_exit(engine);
                }
                s.on_enter(engine);
                self.states.push(s);
            }
            StateAction::Quit => {
                log::debug!("quit requested");
                engine.request_quit();
            }
        }
    }
}
