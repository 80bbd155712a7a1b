//! Floating Window Geometry
//!
//! Pure position/size math for the floating window: the aspect-ratio lock
//! and the viewport clamping passes. No I/O; callers pass the viewport in.

use serde::{Deserialize, Serialize};

/// Minimum floating window width in pixels
pub const MIN_WIDTH: f64 = 320.0;
/// Minimum floating window height in pixels
pub const MIN_HEIGHT: f64 = 180.0;

/// Pixel offset of the window from the viewport's top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Default for Position {
    /// Initial placement for a window with no saved position
    fn default() -> Self {
        Self { x: 50.0, y: 50.0 }
    }
}

/// Pixel dimensions of the window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Aspect-ratio lock applied to the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Landscape, height = width * 9/16
    #[default]
    Horizontal,
    /// Portrait, height = width * 16/9
    Vertical,
}

impl Orientation {
    pub fn is_vertical(self) -> bool {
        self == Self::Vertical
    }

    pub fn from_vertical(vertical: bool) -> Self {
        if vertical {
            Self::Vertical
        } else {
            Self::Horizontal
        }
    }
}

/// Viewport dimensions, read fresh for every pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Height/width factor for the locked aspect ratio
pub fn aspect_factor(orientation: Orientation) -> f64 {
    match orientation {
        Orientation::Horizontal => 9.0 / 16.0,
        Orientation::Vertical => 16.0 / 9.0,
    }
}

/// Height matching `width` under the orientation's aspect lock
pub fn height_for(width: f64, orientation: Orientation) -> f64 {
    width * aspect_factor(orientation)
}

/// Width matching `height` under the orientation's aspect lock
pub fn width_for(height: f64, orientation: Orientation) -> f64 {
    height / aspect_factor(orientation)
}

/// Shrink an oversized window to fit the viewport. Width is clamped first,
/// then height; each clamp re-derives the other axis through the aspect
/// lock so the binding constraint wins without oscillation.
pub fn clamp_size(size: Size, orientation: Orientation, viewport: Viewport) -> Size {
    let mut size = size;
    if size.width > viewport.width {
        size.width = viewport.width;
        size.height = height_for(size.width, orientation);
    }
    if size.height > viewport.height {
        size.height = viewport.height;
        size.width = width_for(size.height, orientation);
    }
    size
}

/// Keep the window's edges inside the viewport. The top-left edge wins when
/// the window is larger than the viewport.
pub fn clamp_position(position: Position, size: Size, viewport: Viewport) -> Position {
    let mut position = position;
    if position.x + size.width > viewport.width {
        position.x = (viewport.width - size.width).max(0.0);
    }
    if position.x < 0.0 {
        position.x = 0.0;
    }
    if position.y + size.height > viewport.height {
        position.y = (viewport.height - size.height).max(0.0);
    }
    if position.y < 0.0 {
        position.y = 0.0;
    }
    position
}

/// Full clamp pass: size first, position after, never the reverse, since
/// shrinking can free previously-violated position constraints.
pub fn clamp_to_viewport(
    position: Position,
    size: Size,
    orientation: Orientation,
    viewport: Viewport,
) -> (Position, Size) {
    let size = clamp_size(size, orientation, viewport);
    (clamp_position(position, size, viewport), size)
}
