pub mod config;

pub use config::{WindowConfig, WindowMode};

use winit::dpi::PhysicalSize;
use winit::window::{Fullscreen, Window, WindowAttributes};

/// Build the attributes the main window is created with.
pub fn window_attributes(config: &WindowConfig) -> WindowAttributes {
    Window::default_attributes()
        .with_title(config.title.clone())
        .with_inner_size(PhysicalSize::new(config.width, config.height))
        .with_resizable(false)
}

/// Apply `config.mode` to an already created window.
///
/// # Fullscreen
/// Picks the current monitor's video mode whose area is closest to
/// `width × height`. Falls back to borderless when no monitor handle or
/// video mode is available.
///
/// # Borderless
/// Borderless fullscreen on the monitor the window is on. The UI keeps its
/// configured layout size; the surface simply gets larger.
pub fn apply_window_mode(window: &Window, config: &WindowConfig) {
    match config.mode {
        WindowMode::Windowed => {
            window.set_fullscreen(None);
            window.set_decorations(true);
        }

        WindowMode::Fullscreen => {
            let fullscreen = match window.current_monitor() {
                Some(monitor) => {
                    let target_area = config.width as u64 * config.height as u64;
                    let best = monitor.video_modes().min_by_key(|vm| {
                        let s = vm.size();
                        (s.width as u64 * s.height as u64).abs_diff(target_area)
                    });
                    match best {
                        Some(vm) => Fullscreen::Exclusive(vm),
                        None => Fullscreen::Borderless(Some(monitor)),
                    }
                }
                None => Fullscreen::Borderless(None),
            };
            window.set_fullscreen(Some(fullscreen));
        }

        WindowMode::Borderless => {
            window.set_fullscreen(Some(Fullscreen::Borderless(None)));
        }
    }
    log::debug!("window mode set to {:?}", config.mode);
}
