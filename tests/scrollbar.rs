use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;
use isorts::input::{InputEvent, MouseButton};
use isorts::resources::Resources;
use isorts::ui::{BackgroundState, EventKind, ScrollBar, ScrollDirection, ScrollPart, Ui};

fn ui() -> Ui {
    Ui::new(Rc::new(Resources::placeholder()))
}

fn press(p: Vec2) -> InputEvent {
    InputEvent::MouseButtonPressed { button: MouseButton::Left, position: p }
}

fn release(p: Vec2) -> InputEvent {
    InputEvent::MouseButtonReleased { button: MouseButton::Left, position: p }
}

/// 200 px tall, 10 px rows, 25 rows: track 160, limit 17, bar 128, step 4.
fn sample() -> ScrollBar {
    let mut sb = ScrollBar::new(Vec2::ZERO, 200.0, 10.0);
    sb.set_row_count(25);
    sb
}

// ── Geometry ──────────────────────────────────────────────────────────────────

#[test]
fn row_count_derives_scale_limit_and_delta() {
    let sb = sample();
    assert_eq!(sb.track_height(), 160.0);
    assert_eq!(sb.visible_rows(), 17);
    assert!((sb.bar_scale() - 0.8).abs() < 1e-6);
    assert!((sb.bar_height() - 128.0).abs() < 1e-4);
    assert!((sb.delta_y() - 4.0).abs() < 1e-4);
    assert_eq!(sb.step(), 0);
}

#[test]
fn parts_are_stacked_vertically() {
    let sb = sample();
    assert_eq!(sb.part_rect(ScrollPart::ArrowUp).y, 0.0);
    assert_eq!(sb.part_rect(ScrollPart::ArrowDown).y, 180.0);
    assert_eq!(sb.part_rect(ScrollPart::Bar).y, 20.0);
    assert_eq!(sb.part_rect(ScrollPart::Area).h, 200.0);
}

#[test]
fn bar_scale_clamps_to_tenth() {
    let mut sb = ScrollBar::new(Vec2::ZERO, 200.0, 10.0);
    sb.set_row_count(1000);
    assert!((sb.bar_scale() - 0.1).abs() < 1e-6);
}

#[test]
fn short_content_cannot_scroll() {
    let mut sb = ScrollBar::new(Vec2::ZERO, 200.0, 10.0);
    sb.set_row_count(10);
    assert_eq!(sb.bar_scale(), 1.0);
    assert!(sb.delta_y() <= 0.0);
    assert!(!sb.try_step(ScrollDirection::Down));

    sb.set_row_count(17);
    assert_eq!(sb.delta_y(), 0.0);
    assert!(!sb.try_step(ScrollDirection::Down));
}

#[test]
fn zero_row_height_disables_scrolling() {
    let mut sb = ScrollBar::new(Vec2::ZERO, 200.0, 0.0);
    sb.set_row_count(25);
    assert_eq!(sb.delta_y(), 0.0);
    assert!(!sb.try_step(ScrollDirection::Down));
}

// ── Stepping ──────────────────────────────────────────────────────────────────

#[test]
fn steps_stop_at_the_down_arrow() {
    let mut sb = sample();
    for i in 1..=8 {
        assert!(sb.try_step(ScrollDirection::Down), "step {i} should fit");
    }
    assert_eq!(sb.step(), 8);
    let bar = sb.part_rect(ScrollPart::Bar);
    assert!((bar.bottom() - 180.0).abs() < 1e-3);

    assert!(!sb.try_step(ScrollDirection::Down));
    assert_eq!(sb.step(), 8);
}

#[test]
fn up_at_top_is_refused() {
    let mut sb = sample();
    assert!(!sb.try_step(ScrollDirection::Up));
    assert!(sb.try_step(ScrollDirection::Down));
    assert!(sb.try_step(ScrollDirection::Up));
    assert_eq!(sb.step(), 0);
    assert_eq!(sb.part_rect(ScrollPart::Bar).y, 20.0);
}

#[test]
fn new_row_count_resets_to_top() {
    let mut sb = sample();
    sb.try_step(ScrollDirection::Down);
    sb.try_step(ScrollDirection::Down);
    sb.set_row_count(30);
    assert_eq!(sb.step(), 0);
    assert_eq!(sb.part_rect(ScrollPart::Bar).y, 20.0);
}

#[test]
fn moving_keeps_current_step() {
    let mut sb = sample();
    sb.try_step(ScrollDirection::Down);
    sb.set_position(Vec2::new(50.0, 100.0));
    assert_eq!(sb.step(), 1);
    assert!((sb.part_rect(ScrollPart::Bar).y - 124.0).abs() < 1e-4);
}

// ── Through the UI ────────────────────────────────────────────────────────────

fn ui_with_bar() -> Ui {
    let mut ui = ui();
    ui.create_scrollbar("s", Vec2::ZERO, 200.0, 10.0).unwrap();
    ui.set_row_count("s", 25).unwrap();
    ui
}

#[test]
fn arrow_down_press_steps_and_signals() {
    let mut ui = ui_with_bar();
    let fired = Rc::new(Cell::new(0));
    let f = Rc::clone(&fired);
    ui.set_scrollbar_callback("s", EventKind::ScrollDraggedDown, Box::new(move |_| f.set(f.get() + 1)))
        .unwrap();

    let arrow = Vec2::new(10.0, 190.0);
    let signals = ui.handle_event(&press(arrow));
    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].kind, EventKind::ScrollDraggedDown);
    assert_eq!(signals[0].source, "s");
    assert_eq!(ui.scrollbar("s").unwrap().step(), 1);
    assert_eq!(ui.scrollbar("s").unwrap().part_state(ScrollPart::ArrowDown), BackgroundState::Down);

    ui.handle_event(&release(arrow));
    assert_eq!(ui.scrollbar("s").unwrap().part_state(ScrollPart::ArrowDown), BackgroundState::Hover);
    assert_eq!(fired.get(), 1);
}

#[test]
fn area_under_bar_follows_hover_and_press() {
    let mut ui = ui_with_bar();
    let on_bar = Vec2::new(10.0, 30.0);
    let state = |ui: &Ui, part| ui.scrollbar("s").unwrap().part_state(part);

    ui.handle_event(&InputEvent::MouseMoved { position: on_bar });
    assert_eq!(state(&ui, ScrollPart::Bar), BackgroundState::Hover);
    assert_eq!(state(&ui, ScrollPart::Area), BackgroundState::Hover);
    assert_eq!(state(&ui, ScrollPart::ArrowUp), BackgroundState::Normal);

    ui.handle_event(&press(on_bar));
    assert_eq!(state(&ui, ScrollPart::Bar), BackgroundState::Down);
    assert_eq!(state(&ui, ScrollPart::Area), BackgroundState::Down);

    ui.handle_event(&release(on_bar));
    assert_eq!(state(&ui, ScrollPart::Area), BackgroundState::Hover);

    ui.handle_event(&InputEvent::MouseMoved { position: Vec2::new(100.0, 30.0) });
    assert_eq!(state(&ui, ScrollPart::Area), BackgroundState::Normal);
}

#[test]
fn pointer_over_scrollbar_or_dragging_counts_as_over_ui() {
    let mut ui = ui_with_bar();
    assert!(ui.is_over(Vec2::new(10.0, 190.0)));
    assert!(!ui.is_over(Vec2::new(100.0, 190.0)));

    // The pointer may leave the bar mid-drag.
    ui.handle_event(&press(Vec2::new(10.0, 30.0)));
    assert!(ui.is_over(Vec2::new(400.0, 400.0)));
    ui.handle_event(&release(Vec2::new(400.0, 400.0)));
    assert!(!ui.is_over(Vec2::new(400.0, 400.0)));

    ui.set_scrollbar_visibility("s", false).unwrap();
    assert!(!ui.is_over(Vec2::new(10.0, 190.0)));
}

#[test]
fn repeated_arrow_presses_clamp() {
    let mut ui = ui_with_bar();
    let arrow = Vec2::new(10.0, 190.0);
    let mut steps = 0;
    for _ in 0..12 {
        steps += ui.handle_event(&press(arrow)).len();
        ui.handle_event(&release(arrow));
    }
    assert_eq!(steps, 8);
    assert_eq!(ui.scrollbar("s").unwrap().step(), 8);
}

#[test]
fn arrow_up_at_top_fires_nothing() {
    let mut ui = ui_with_bar();
    assert!(ui.handle_event(&press(Vec2::new(10.0, 10.0))).is_empty());
    assert_eq!(ui.scrollbar("s").unwrap().step(), 0);
}

#[test]
fn dragging_bar_ratchets_in_whole_steps() {
    let mut ui = ui_with_bar();
    ui.handle_event(&press(Vec2::new(10.0, 30.0)));
    assert!(ui.is_dragging());
    assert_eq!(ui.drag_anchor(), Some((30.0, 20.0)));

    // Movement must exceed one step before anything happens.
    assert!(ui.update(Vec2::new(10.0, 34.0), true).is_empty());

    let signals = ui.update(Vec2::new(10.0, 35.0), true);
    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].kind, EventKind::ScrollDraggedDown);
    assert_eq!(ui.drag_anchor(), Some((34.0, 24.0)));

    assert!(ui.update(Vec2::new(10.0, 38.0), true).is_empty());
    assert_eq!(ui.update(Vec2::new(10.0, 39.0), true).len(), 1);
    assert_eq!(ui.scrollbar("s").unwrap().step(), 2);

    let signals = ui.update(Vec2::new(10.0, 20.0), true);
    assert_eq!(signals[0].kind, EventKind::ScrollDraggedUp);
    assert_eq!(ui.scrollbar("s").unwrap().step(), 1);
}

#[test]
fn releasing_ends_the_drag() {
    let mut ui = ui_with_bar();
    ui.handle_event(&press(Vec2::new(10.0, 30.0)));
    assert!(ui.update(Vec2::new(10.0, 80.0), false).is_empty());
    assert!(!ui.is_dragging());
    assert_eq!(ui.scrollbar("s").unwrap().step(), 0);
}

#[test]
fn destroying_scrollbar_drops_active_drag() {
    let mut ui = ui_with_bar();
    ui.handle_event(&press(Vec2::new(10.0, 30.0)));
    ui.destroy_scrollbar("s").unwrap();
    assert!(!ui.is_dragging());
    assert!(ui.update(Vec2::new(10.0, 80.0), true).is_empty());
}

#[test]
fn disabled_scrollbar_ignores_presses() {
    let mut ui = ui_with_bar();
    ui.set_scrollbar_enabled("s", false).unwrap();
    assert!(ui.handle_event(&press(Vec2::new(10.0, 190.0))).is_empty());
    assert!(!ui.is_dragging());
    assert_eq!(ui.scrollbar("s").unwrap().step(), 0);
}

#[test]
fn moved_scrollbar_hit_tests_at_new_place() {
    let mut ui = ui_with_bar();
    ui.set_scrollbar_position("s", Vec2::new(300.0, 0.0)).unwrap();
    assert!(ui.handle_event(&press(Vec2::new(10.0, 190.0))).is_empty());
    assert_eq!(ui.handle_event(&press(Vec2::new(310.0, 190.0))).len(), 1);
}
