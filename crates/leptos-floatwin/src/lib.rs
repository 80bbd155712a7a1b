//! Leptos Floating Window
//!
//! A draggable, resizable, aspect-locked floating window for page overlays.
//! Geometry (position, size, orientation) survives across sessions through a
//! pluggable storage adapter and is reconciled against the viewport whenever
//! it changes.

pub mod debounce;
pub mod geometry;
pub mod manager;
pub mod storage;
mod window;

mod tests;

pub use debounce::Debounce;
pub use geometry::{
    aspect_factor, clamp_position, clamp_size, clamp_to_viewport, height_for, width_for,
    Orientation, Position, Size, Viewport, MIN_HEIGHT, MIN_WIDTH,
};
pub use manager::{GeometryManager, GeometryOptions, InteractionState, DEFAULT_WIDTH};
pub use storage::{ChromeStorage, GeometryStorage, MemoryStorage, StorageError};
pub use window::{current_viewport, FloatWinCommand, FloatWinHandle, FloatingWindow};
