use serde::Deserialize;

// ── WindowMode ────────────────────────────────────────────────────────────────

/// Controls how the OS window is presented.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowMode {
    /// Standard decorated window at the configured resolution.
    #[default]
    Windowed,
    /// Exclusive hardware fullscreen at the configured resolution.
    Fullscreen,
    /// Borderless window sized to match the monitor's native resolution.
    Borderless,
}

// ── WindowConfig ──────────────────────────────────────────────────────────────

/// Window section of the game configuration.
///
/// The UI is laid out in window pixels, so `width × height` is also the size
/// of the screen-space layer and the initial size of the map camera view.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub mode: WindowMode,
}

impl Default for WindowConfig {
    /// 1280 × 720, windowed.
    fn default() -> Self {
        Self {
            title: "isorts".to_string(),
            width: 1280,
            height: 720,
            mode: WindowMode::Windowed,
        }
    }
}

impl WindowConfig {
    /// Returns `0.0` when `height` is zero.
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            return 0.0;
        }
        self.width as f32 / self.height as f32
    }
}
