//! Isometric RTS shell: a retained-mode UI toolkit, a game-state stack and
//! a tile-map editor on top of winit and wgpu.

pub mod animation;
pub mod camera;
pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod input;
pub mod renderer;
pub mod resources;
pub mod state;
pub mod states;
pub mod tilemap;
pub mod ui;
pub mod window;
