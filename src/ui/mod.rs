// =============================================================================
// UI: Retained components, pointer dispatch and draw
//
// One `Ui` per screen. It owns the four component registries, turns pointer
// events into state changes and callbacks, and draws everything in a fixed
// order: backgrounds, then scrollbars, then captions.
// =============================================================================

pub mod components;
pub mod registry;
pub mod widgets;

use std::rc::Rc;

use glam::Vec2;

use crate::engine::Color;
use crate::error::UiError;
use crate::input::{InputEvent, MouseButton};
use crate::renderer::draw::DrawList;
use crate::renderer::text::Font;
use crate::resources::{FontId, Resources, TextureId};

pub use components::{
    Background, BackgroundState, Caption, EventKind, Flags, GridLayout, Group, ScrollBar,
    ScrollDirection, ScrollPart, Signal,
};
pub use registry::{BackgroundKey, Callback, CaptionKey, GroupKey, Registry, ScrollBarKey};

use registry::fail;

/// Latched while the left button holds a scrollbar's bar.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Drag {
    scrollbar: ScrollBarKey,
    /// Pointer y the next step is measured from.
    start: f32,
    /// Bar top when `start` was recorded.
    pos: f32,
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Target {
    Background(BackgroundKey),
    ScrollBar(ScrollBarKey),
    Group(GroupKey),
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Fired {
    target: Target,
    kind: EventKind,
}

pub struct Ui {
    resources: Rc<Resources>,
    pub captions: Registry<CaptionKey, Caption>,
    pub backgrounds: Registry<BackgroundKey, Background>,
    pub scrollbars: Registry<ScrollBarKey, ScrollBar>,
    pub groups: Registry<GroupKey, Group>,
    mouse_down: bool,
    drag: Option<Drag>,
}

impl Ui {
    pub fn new(resources: Rc<Resources>) -> Self {
        Self {
            resources,
            captions: Registry::new("Caption"),
            backgrounds: Registry::new("Background"),
            scrollbars: Registry::new("ScrollBar"),
            groups: Registry::new("Group"),
            mouse_down: false,
            drag: None,
        }
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn is_mouse_down(&self) -> bool {
        self.mouse_down
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// `(pointer y, bar top)` the next drag step is measured from.
    pub fn drag_anchor(&self) -> Option<(f32, f32)> {
        self.drag.map(|d| (d.start, d.pos))
    }

    fn font_metrics(&self, font: FontId) -> Result<&Font, UiError> {
        self.resources.font(font).map(|f| &f.font).map_err(|e| fail(e.into()))
    }

    fn texture_size(&self, texture: TextureId) -> Result<Vec2, UiError> {
        self.resources.texture(texture).map(|t| t.size()).map_err(|e| fail(e.into()))
    }

    // ── Captions ─────────────────────────────────────────────────────────────

    pub fn create_caption(&mut self, id: &str, text: &str, font: FontId, char_size: u32) -> Result<CaptionKey, UiError> {
        let caption = Caption::new(text, font, char_size, self.font_metrics(font)?);
        self.captions.insert(id, caption)
    }

    pub fn destroy_caption(&mut self, id: &str) -> Result<(), UiError> {
        self.captions.remove(id).map(|_| ())
    }

    pub fn caption(&self, id: &str) -> Result<&Caption, UiError> {
        self.captions.get(id)
    }

    pub fn set_caption_text(&mut self, id: &str, text: &str) -> Result<(), UiError> {
        let font = self.captions.get(id)?.font;
        let metrics = self.resources.font(font).map_err(|e| fail(e.into()))?;
        let caption = self.captions.get_mut(id)?;
        caption.text = text.to_owned();
        caption.remeasure(&metrics.font);
        Ok(())
    }

    pub fn set_caption_font(&mut self, id: &str, font: FontId) -> Result<(), UiError> {
        let metrics = self.resources.font(font).map_err(|e| fail(e.into()))?;
        let caption = self.captions.get_mut(id)?;
        caption.font = font;
        caption.remeasure(&metrics.font);
        Ok(())
    }

    /// Sizes outside 10–72 are rejected and leave the caption untouched.
    pub fn set_caption_char_size(&mut self, id: &str, size: u32) -> Result<(), UiError> {
        let font = self.captions.get(id)?.font;
        if !Caption::valid_char_size(size) {
            return Err(fail(UiError::OutOfRange {
                kind: self.captions.kind(),
                id: id.to_owned(),
                what: "character size",
                value: size.to_string(),
                range: "10..=72",
            }));
        }
        let metrics = self.resources.font(font).map_err(|e| fail(e.into()))?;
        let caption = self.captions.get_mut(id)?;
        caption.char_size = size;
        caption.remeasure(&metrics.font);
        Ok(())
    }

    pub fn set_caption_position(&mut self, id: &str, position: Vec2) -> Result<(), UiError> {
        self.captions.get_mut(id)?.position = position;
        Ok(())
    }

    pub fn set_caption_origin(&mut self, id: &str, origin: Vec2) -> Result<(), UiError> {
        self.captions.get_mut(id)?.origin = origin;
        Ok(())
    }

    pub fn set_caption_color(&mut self, id: &str, color: Color) -> Result<(), UiError> {
        self.captions.get_mut(id)?.color = color;
        Ok(())
    }

    pub fn set_caption_visibility(&mut self, id: &str, visible: bool) -> Result<(), UiError> {
        self.captions.get_mut(id)?.flags.visible = visible;
        Ok(())
    }

    pub fn caption_text(&self, id: &str) -> Result<&str, UiError> {
        Ok(self.captions.get(id)?.text.as_str())
    }

    pub fn caption_position(&self, id: &str) -> Result<Vec2, UiError> {
        Ok(self.captions.get(id)?.position)
    }

    pub fn caption_size(&self, id: &str) -> Result<Vec2, UiError> {
        Ok(self.captions.get(id)?.size())
    }

    // ── Backgrounds ──────────────────────────────────────────────────────────

    pub fn create_background(&mut self, id: &str, texture: TextureId, multi_tex: bool) -> Result<BackgroundKey, UiError> {
        let size = self.texture_size(texture)?;
        self.backgrounds.insert(id, Background::new(texture, size, multi_tex))
    }

    /// Also drops the background from any group that lists it.
    pub fn destroy_background(&mut self, id: &str) -> Result<(), UiError> {
        let key = self.backgrounds.key(id)?;
        self.backgrounds.remove(id)?;
        for group_key in self.groups.keys() {
            if let Some(group) = self.groups.get_by_key_mut(group_key) {
                group.members.retain(|k| *k != key);
                if group.selected == Some(key) {
                    group.selected = None;
                }
            }
        }
        Ok(())
    }

    pub fn background(&self, id: &str) -> Result<&Background, UiError> {
        self.backgrounds.get(id)
    }

    pub fn set_background_position(&mut self, id: &str, position: Vec2) -> Result<(), UiError> {
        self.backgrounds.get_mut(id)?.position = position;
        Ok(())
    }

    pub fn set_background_size(&mut self, id: &str, size: Vec2) -> Result<(), UiError> {
        self.backgrounds.get_mut(id)?.size = size;
        Ok(())
    }

    pub fn set_background_texture(&mut self, id: &str, texture: TextureId) -> Result<(), UiError> {
        let size = self.texture_size(texture)?;
        self.backgrounds.get_mut(id)?.set_texture(texture, size);
        Ok(())
    }

    /// No-op (but `Ok`) on single-texture backgrounds.
    pub fn set_background_state(&mut self, id: &str, state: BackgroundState) -> Result<(), UiError> {
        if !self.backgrounds.get_mut(id)?.set_state(state) {
            log::debug!("background '{id}' is single-texture, state {state:?} ignored");
        }
        Ok(())
    }

    pub fn set_background_tint(&mut self, id: &str, tint: Color) -> Result<(), UiError> {
        self.backgrounds.get_mut(id)?.tint = tint;
        Ok(())
    }

    pub fn set_background_visibility(&mut self, id: &str, visible: bool) -> Result<(), UiError> {
        self.backgrounds.get_mut(id)?.flags.visible = visible;
        Ok(())
    }

    pub fn set_background_enabled(&mut self, id: &str, enabled: bool) -> Result<(), UiError> {
        self.backgrounds.get_mut(id)?.flags.enabled = enabled;
        Ok(())
    }

    pub fn set_background_selectable(&mut self, id: &str, selectable: bool) -> Result<(), UiError> {
        self.backgrounds.get_mut(id)?.flags.selectable = selectable;
        Ok(())
    }

    pub fn set_background_callback(&mut self, id: &str, event: EventKind, callback: Callback) -> Result<(), UiError> {
        self.backgrounds.set_callback(id, event, callback)
    }

    pub fn background_position(&self, id: &str) -> Result<Vec2, UiError> {
        Ok(self.backgrounds.get(id)?.position)
    }

    pub fn background_size(&self, id: &str) -> Result<Vec2, UiError> {
        Ok(self.backgrounds.get(id)?.size)
    }

    pub fn background_state(&self, id: &str) -> Result<BackgroundState, UiError> {
        Ok(self.backgrounds.get(id)?.state())
    }

    // ── ScrollBars ───────────────────────────────────────────────────────────

    pub fn create_scrollbar(
        &mut self,
        id: &str,
        position: Vec2,
        scroll_height: f32,
        scroll_amount: f32,
    ) -> Result<ScrollBarKey, UiError> {
        self.scrollbars.insert(id, ScrollBar::new(position, scroll_height, scroll_amount))
    }

    /// Unlinks any group grid scrolled by it.
    pub fn destroy_scrollbar(&mut self, id: &str) -> Result<(), UiError> {
        let key = self.scrollbars.key(id)?;
        self.scrollbars.remove(id)?;
        if self.drag.is_some_and(|d| d.scrollbar == key) {
            self.drag = None;
        }
        for group_key in self.groups.keys() {
            if let Some(grid) = self.groups.get_by_key_mut(group_key).and_then(|g| g.grid.as_mut()) {
                if grid.scrollbar == Some(key) {
                    grid.scrollbar = None;
                }
            }
        }
        Ok(())
    }

    pub fn scrollbar(&self, id: &str) -> Result<&ScrollBar, UiError> {
        self.scrollbars.get(id)
    }

    pub fn set_scrollbar_position(&mut self, id: &str, position: Vec2) -> Result<(), UiError> {
        self.scrollbars.get_mut(id)?.set_position(position);
        Ok(())
    }

    /// Resets the bar to the top; linked grids scroll back with it.
    pub fn set_row_count(&mut self, id: &str, rows: usize) -> Result<(), UiError> {
        let key = self.scrollbars.key(id)?;
        self.scrollbars.get_mut(id)?.set_row_count(rows);
        self.sync_grids(key);
        Ok(())
    }

    pub fn set_scrollbar_visibility(&mut self, id: &str, visible: bool) -> Result<(), UiError> {
        self.scrollbars.get_mut(id)?.flags.visible = visible;
        Ok(())
    }

    pub fn set_scrollbar_enabled(&mut self, id: &str, enabled: bool) -> Result<(), UiError> {
        self.scrollbars.get_mut(id)?.flags.enabled = enabled;
        Ok(())
    }

    pub fn set_scrollbar_callback(&mut self, id: &str, event: EventKind, callback: Callback) -> Result<(), UiError> {
        self.scrollbars.set_callback(id, event, callback)
    }

    // ── Groups ───────────────────────────────────────────────────────────────

    pub fn create_group(&mut self, id: &str) -> Result<GroupKey, UiError> {
        self.groups.insert(id, Group::default())
    }

    /// The selected member, if any, returns to NORMAL.
    pub fn destroy_group(&mut self, id: &str) -> Result<(), UiError> {
        let group = self.groups.remove(id)?;
        if let Some(bg) = group.selected.and_then(|k| self.backgrounds.get_by_key_mut(k)) {
            bg.flags.selected = false;
            bg.set_state(BackgroundState::Normal);
            bg.tint = Color::WHITE;
        }
        Ok(())
    }

    pub fn group(&self, id: &str) -> Result<&Group, UiError> {
        self.groups.get(id)
    }

    /// Members keep insertion order; adding twice is a duplicate.
    pub fn add_to_group(&mut self, group_id: &str, background_id: &str) -> Result<(), UiError> {
        let member = self.backgrounds.key(background_id)?;
        let group = self.groups.get_mut(group_id)?;
        if group.contains(member) {
            return Err(fail(UiError::Duplicate { kind: "Group member", id: background_id.to_owned() }));
        }
        group.members.push(member);
        self.relayout(group_id)
    }

    pub fn set_group_selection_event(&mut self, id: &str, event: Option<EventKind>) -> Result<(), UiError> {
        self.groups.get_mut(id)?.selection_event = event;
        Ok(())
    }

    /// Lay members out on `grid`, scrolled by `scrollbar_id` when given.
    pub fn set_group_grid(&mut self, id: &str, mut grid: GridLayout, scrollbar_id: Option<&str>) -> Result<(), UiError> {
        grid.scrollbar = scrollbar_id.map(|s| self.scrollbars.key(s)).transpose()?;
        if let Some(sb) = grid.scrollbar.and_then(|k| self.scrollbars.get_by_key(k)) {
            grid.first_row = sb.step();
        }
        self.groups.get_mut(id)?.grid = Some(grid);
        self.relayout(id)
    }

    pub fn set_group_visibility(&mut self, id: &str, visible: bool) -> Result<(), UiError> {
        self.groups.get_mut(id)?.flags.visible = visible;
        self.relayout(id)
    }

    pub fn set_group_callback(&mut self, id: &str, event: EventKind, callback: Callback) -> Result<(), UiError> {
        self.groups.set_callback(id, event, callback)
    }

    /// Select `background_id` within the group. Emits nothing; dispatch does.
    pub fn select_in_group(&mut self, group_id: &str, background_id: &str) -> Result<(), UiError> {
        let group_key = self.groups.key(group_id)?;
        let member = self.backgrounds.key(background_id)?;
        if !self.groups.get(group_id)?.contains(member) {
            return Err(fail(UiError::NotFound { kind: "Group member", id: background_id.to_owned() }));
        }
        self.select_member(group_key, member);
        Ok(())
    }

    pub fn group_selected(&self, id: &str) -> Result<Option<&str>, UiError> {
        let group = self.groups.get(id)?;
        Ok(group.selected.and_then(|k| self.backgrounds.id_of(k)))
    }

    fn select_member(&mut self, group_key: GroupKey, member: BackgroundKey) {
        let Some(group) = self.groups.get_by_key_mut(group_key) else { return };
        let previous = group.selected.replace(member);

        if let Some(prev) = previous.filter(|p| *p != member) {
            if let Some(bg) = self.backgrounds.get_by_key_mut(prev) {
                bg.flags.selected = false;
                bg.set_state(BackgroundState::Normal);
                bg.tint = Color::WHITE;
            }
        }
        if let Some(bg) = self.backgrounds.get_by_key_mut(member) {
            bg.flags.selected = true;
            if !bg.set_state(BackgroundState::Selected) {
                bg.tint = Color::SELECTED_TINT;
            }
        }
    }

    fn relayout(&mut self, id: &str) -> Result<(), UiError> {
        let key = self.groups.key(id)?;
        self.relayout_key(key);
        Ok(())
    }

    /// Reposition members of a gridded group and hide rows outside its window.
    fn relayout_key(&mut self, key: GroupKey) {
        let Some(group) = self.groups.get_by_key(key) else { return };
        let Some(grid) = group.grid else { return };
        let group_visible = group.flags.visible;
        let members = group.members.clone();

        for (i, member) in members.into_iter().enumerate() {
            let (position, shown) = grid.place(i);
            if let Some(bg) = self.backgrounds.get_by_key_mut(member) {
                bg.position = position;
                bg.flags.visible = shown && group_visible;
            }
        }
    }

    /// Scroll every grid linked to `scrollbar` to its current step.
    fn sync_grids(&mut self, scrollbar: ScrollBarKey) {
        let Some(step) = self.scrollbars.get_by_key(scrollbar).map(|s| s.step()) else { return };
        let linked: Vec<GroupKey> = self
            .groups
            .iter()
            .filter(|(_, _, g)| g.grid.is_some_and(|grid| grid.scrollbar == Some(scrollbar)))
            .map(|(k, _, _)| k)
            .collect();

        for key in linked {
            if let Some(grid) = self.groups.get_by_key_mut(key).and_then(|g| g.grid.as_mut()) {
                grid.first_row = step;
            }
            self.relayout_key(key);
        }
    }

    /// True when any visible background or scrollbar covers `p`, or while a
    /// scrollbar bar is being dragged.
    pub fn is_over(&self, p: Vec2) -> bool {
        self.drag.is_some()
            || self.backgrounds.iter().any(|(_, _, bg)| bg.flags.visible && bg.contains(p))
            || self.scrollbars.iter().any(|(_, _, sb)| sb.flags.visible && sb.bounds().contains(p))
    }

    // ── Dispatch ─────────────────────────────────────────────────────────────

    /// Feed one platform event. Returns every event fired, in order, after
    /// invoking the callbacks bound to them.
    pub fn handle_event(&mut self, event: &InputEvent) -> Vec<Signal> {
        let (fired, position) = match *event {
            InputEvent::MouseButtonPressed { button: MouseButton::Left, position } => (self.on_press(position), position),
            InputEvent::MouseMoved { position } => {
                self.on_move(position);
                return Vec::new();
            }
            InputEvent::MouseButtonReleased { button: MouseButton::Left, position } => (self.on_release(position), position),
            _ => return Vec::new(),
        };
        let fired = self.react(fired);
        self.emit(fired, position)
    }

    /// Per-frame drag polling. `left_held` is the physical button state.
    pub fn update(&mut self, mouse: Vec2, left_held: bool) -> Vec<Signal> {
        if !left_held {
            self.mouse_down = false;
            self.drag = None;
            return Vec::new();
        }
        let Some(mut drag) = self.drag else { return Vec::new() };
        let Some(sb) = self.scrollbars.get_by_key_mut(drag.scrollbar) else {
            self.drag = None;
            return Vec::new();
        };

        sb.set_part_state(ScrollPart::Bar, BackgroundState::Down);
        let delta = sb.delta_y();
        let dy = mouse.y - drag.start;
        if delta <= 0.0 || dy.abs() <= delta {
            return Vec::new();
        }

        let direction = if dy < 0.0 { ScrollDirection::Up } else { ScrollDirection::Down };
        if !sb.try_step(direction) {
            return Vec::new();
        }
        drag.start += direction.sign() * delta;
        drag.pos += direction.sign() * delta;
        self.drag = Some(drag);

        let fired = self.react(vec![Fired { target: Target::ScrollBar(drag.scrollbar), kind: direction.event() }]);
        self.emit(fired, mouse)
    }

    fn on_press(&mut self, p: Vec2) -> Vec<Fired> {
        let mut fired = Vec::new();
        self.mouse_down = true;

        for key in self.backgrounds.keys() {
            let Some(bg) = self.backgrounds.get_by_key_mut(key) else { continue };
            if !bg.flags.interactive() || !bg.contains(p) {
                continue;
            }
            if !bg.flags.selected {
                bg.set_state(BackgroundState::Down);
            }
            fired.push(Fired { target: Target::Background(key), kind: EventKind::MousePressed });
        }

        for key in self.scrollbars.keys() {
            let Some(sb) = self.scrollbars.get_by_key_mut(key) else { continue };
            if !sb.flags.interactive() {
                continue;
            }
            let Some(part) = sb.part_at(p) else { continue };
            sb.set_parts_under(p, BackgroundState::Down);

            let direction = match part {
                ScrollPart::Bar => {
                    let top = sb.part_rect(ScrollPart::Bar).y;
                    self.drag = Some(Drag { scrollbar: key, start: p.y, pos: top });
                    None
                }
                ScrollPart::ArrowUp => Some(ScrollDirection::Up),
                ScrollPart::ArrowDown => Some(ScrollDirection::Down),
                ScrollPart::Area => None,
            };
            if let Some(direction) = direction {
                if sb.try_step(direction) {
                    fired.push(Fired { target: Target::ScrollBar(key), kind: direction.event() });
                }
            }
        }
        fired
    }

    fn on_move(&mut self, p: Vec2) {
        if self.drag.is_none() {
            for key in self.backgrounds.keys() {
                let Some(bg) = self.backgrounds.get_by_key_mut(key) else { continue };
                if bg.flags.selected {
                    continue;
                }
                let over = bg.contains(p);
                if bg.multi_tex() {
                    bg.set_state(if over { BackgroundState::Hover } else { BackgroundState::Normal });
                } else {
                    bg.tint = if over { Color::HOVER_TINT } else { Color::WHITE };
                }
            }
        }

        for key in self.scrollbars.keys() {
            let Some(sb) = self.scrollbars.get_by_key_mut(key) else { continue };
            for part in ScrollPart::ALL {
                let over = sb.part_rect(part).contains(p);
                sb.set_part_state(part, if over { BackgroundState::Hover } else { BackgroundState::Normal });
            }
        }
    }

    fn on_release(&mut self, p: Vec2) -> Vec<Fired> {
        self.mouse_down = false;
        self.drag = None;
        let mut fired = Vec::new();

        for key in self.backgrounds.keys() {
            let Some(bg) = self.backgrounds.get_by_key_mut(key) else { continue };
            if !bg.flags.interactive() || !bg.contains(p) {
                continue;
            }
            if !bg.flags.selected {
                bg.set_state(BackgroundState::Hover);
            }
            fired.push(Fired { target: Target::Background(key), kind: EventKind::MouseReleased });
        }

        for key in self.scrollbars.keys() {
            let Some(sb) = self.scrollbars.get_by_key_mut(key) else { continue };
            sb.set_parts_under(p, BackgroundState::Hover);
        }
        fired
    }

    /// Internal reactions: group selection on press, grid scrolling on steps.
    /// Group events are appended after the event that caused them.
    fn react(&mut self, fired: Vec<Fired>) -> Vec<Fired> {
        let mut out = Vec::with_capacity(fired.len());
        for f in fired {
            out.push(f);
            match (f.target, f.kind) {
                (Target::Background(member), EventKind::MousePressed) => {
                    let selectable = self.backgrounds.get_by_key(member).is_some_and(|b| b.flags.selectable);
                    if !selectable {
                        continue;
                    }
                    let owners: Vec<GroupKey> = self
                        .groups
                        .iter()
                        .filter(|(_, _, g)| g.contains(member))
                        .map(|(k, _, _)| k)
                        .collect();
                    for group_key in owners {
                        self.select_member(group_key, member);
                        let event = self.groups.get_by_key(group_key).and_then(|g| g.selection_event);
                        if let Some(kind) = event {
                            out.push(Fired { target: Target::Group(group_key), kind });
                        }
                    }
                }
                (Target::ScrollBar(key), EventKind::ScrollDraggedUp | EventKind::ScrollDraggedDown) => {
                    self.sync_grids(key);
                }
                _ => {}
            }
        }
        out
    }

    fn emit(&mut self, fired: Vec<Fired>, position: Vec2) -> Vec<Signal> {
        let mut signals = Vec::with_capacity(fired.len());
        for f in fired {
            let source = match f.target {
                Target::Background(k) => self.backgrounds.id_of(k),
                Target::ScrollBar(k) => self.scrollbars.id_of(k),
                Target::Group(k) => self.groups.id_of(k),
            };
            let Some(source) = source.map(str::to_owned) else { continue };
            let signal = Signal { source, kind: f.kind, position };
            match f.target {
                Target::Background(k) => self.backgrounds.invoke(k, &signal),
                Target::ScrollBar(k) => self.scrollbars.invoke(k, &signal),
                Target::Group(k) => self.groups.invoke(k, &signal),
            };
            signals.push(signal);
        }
        signals
    }

    // ── Draw ─────────────────────────────────────────────────────────────────

    pub fn draw(&self, list: &mut DrawList) {
        let res = &*self.resources;
        for (_, _, bg) in self.backgrounds.iter().filter(|(_, _, b)| b.flags.visible) {
            bg.draw(res, list);
        }
        for (_, _, sb) in self.scrollbars.iter().filter(|(_, _, s)| s.flags.visible) {
            sb.draw(res, list);
        }
        for (_, _, caption) in self.captions.iter().filter(|(_, _, c)| c.flags.visible) {
            caption.draw(res, list);
        }
    }
}
