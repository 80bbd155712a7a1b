//! Floating Window Geometry Manager
//!
//! Owns the floating window's position/size/orientation state: initializes
//! from saved geometry, applies drag and resize gestures, locks the aspect
//! ratio on orientation changes, reconciles against the live viewport and
//! writes the result back to storage.

use std::collections::HashMap;
use std::rc::Rc;

use leptos::logging::warn;
use serde_json::Value;

use crate::geometry::{
    aspect_factor, clamp_position, clamp_size, clamp_to_viewport, height_for, width_for,
    Orientation, Position, Size, Viewport, MIN_HEIGHT, MIN_WIDTH,
};
use crate::storage::{size_key, vertical_key, GeometryStorage};

/// Width used when no saved geometry exists
pub const DEFAULT_WIDTH: f64 = 640.0;

/// Height may drift from the aspect lock by this much before a viewport
/// reconciliation pass re-derives it.
const HEIGHT_DRIFT_TOLERANCE: f64 = 1.0;

/// Gesture currently driving the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging,
    Resizing,
}

/// Configuration for one floating window's geometry
#[derive(Debug, Clone)]
pub struct GeometryOptions {
    /// Base storage key; distinct window kinds use distinct keys and never
    /// contend for the same record.
    pub storage_key: String,
    pub default_width: f64,
    pub default_vertical: bool,
}

impl GeometryOptions {
    pub fn new(storage_key: impl Into<String>) -> Self {
        Self {
            storage_key: storage_key.into(),
            default_width: DEFAULT_WIDTH,
            default_vertical: false,
        }
    }
}

/// Geometry state machine for one floating window.
///
/// All mutation is synchronous; the only async operations are the initial
/// storage read and the fire-and-forget [`persist`](Self::persist) writes.
/// Operations that should end in a write return `true` so the caller can
/// schedule one.
pub struct GeometryManager<S> {
    storage: Rc<S>,
    storage_key: String,
    default_width: f64,
    position: Position,
    size: Size,
    orientation: Orientation,
    interaction: InteractionState,
    /// Set once the user has explicitly sized the window (resize gesture or
    /// accepted absolute-size request). Until then, reconciliation keeps
    /// re-deriving the height from the width.
    manually_resized: bool,
    drag_start: Option<Position>,
    resize_start: Option<Size>,
}

impl<S> Clone for GeometryManager<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Rc::clone(&self.storage),
            storage_key: self.storage_key.clone(),
            ..*self
        }
    }
}

impl<S: GeometryStorage> GeometryManager<S> {
    /// State for a window with no saved geometry, usable synchronously.
    pub fn with_defaults(storage: Rc<S>, options: &GeometryOptions) -> Self {
        let orientation = Orientation::from_vertical(options.default_vertical);
        Self {
            storage,
            storage_key: options.storage_key.clone(),
            default_width: options.default_width,
            position: Position::default(),
            size: Size {
                width: options.default_width,
                height: height_for(options.default_width, orientation),
            },
            orientation,
            interaction: InteractionState::Idle,
            manually_resized: false,
            drag_start: None,
            resize_start: None,
        }
    }

    /// Load saved geometry, falling back silently to defaults when storage
    /// is unavailable or a value is malformed. Each field is validated on
    /// its own; a bad size does not invalidate a good position.
    pub async fn initialize(storage: Rc<S>, options: &GeometryOptions) -> Self {
        let mut manager = Self::with_defaults(storage, options);
        let keys = vec![
            manager.storage_key.clone(),
            size_key(&manager.storage_key),
            vertical_key(&manager.storage_key),
        ];
        let values = match manager.storage.get(&keys).await {
            Ok(values) => values,
            Err(err) => {
                warn!("floating window geometry not restored: {err}");
                return manager;
            }
        };

        // Orientation first: the saved width only determines the height
        // once the aspect lock is known.
        if let Some(vertical) = values.get(&keys[2]).and_then(Value::as_bool) {
            manager.orientation = Orientation::from_vertical(vertical);
        }
        if let Some(position) = values
            .get(&keys[0])
            .cloned()
            .and_then(|value| serde_json::from_value::<Position>(value).ok())
        {
            manager.position = position;
        }
        match values
            .get(&keys[1])
            .cloned()
            .and_then(|value| serde_json::from_value::<Size>(value).ok())
        {
            Some(saved) => {
                manager.manually_resized = (saved.width - manager.default_width).abs() > f64::EPSILON;
                manager.size = Size {
                    width: saved.width,
                    height: height_for(saved.width, manager.orientation),
                };
            }
            None => {
                manager.size = Size {
                    width: manager.default_width,
                    height: height_for(manager.default_width, manager.orientation),
                };
            }
        }
        manager
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn interaction(&self) -> InteractionState {
        self.interaction
    }

    // ========================
    // Drag gesture
    // ========================

    pub fn begin_drag(&mut self) {
        if self.interaction == InteractionState::Idle {
            self.interaction = InteractionState::Dragging;
            self.drag_start = Some(self.position);
        }
    }

    /// Live drag update. The position follows the pointer unclamped so the
    /// gesture stays responsive; clamping waits for [`end_drag`](Self::end_drag).
    pub fn apply_drag(&mut self, delta_x: f64, delta_y: f64) {
        if self.interaction != InteractionState::Dragging {
            return;
        }
        if let Some(start) = self.drag_start {
            self.position = Position {
                x: start.x + delta_x,
                y: start.y + delta_y,
            };
        }
    }

    /// Ends the gesture, clamps the window back on-screen and reports that
    /// the result should be saved.
    pub fn end_drag(&mut self, viewport: Viewport) -> bool {
        if self.interaction != InteractionState::Dragging {
            return false;
        }
        self.interaction = InteractionState::Idle;
        self.drag_start = None;
        self.position = clamp_position(self.position, self.size, viewport);
        true
    }

    // ========================
    // Resize gesture
    // ========================

    pub fn begin_resize(&mut self) {
        if self.interaction == InteractionState::Idle {
            self.interaction = InteractionState::Resizing;
            self.resize_start = Some(self.size);
        }
    }

    /// Live resize update, fired on every pointer move. Both axes are driven
    /// by one scalar delta, the larger of the horizontal movement and the
    /// orientation-scaled vertical movement, so a diagonal pull scales the
    /// window consistently whichever axis moves fastest.
    pub fn apply_resize(&mut self, delta_x: f64, delta_y: f64, viewport: Viewport) {
        if self.interaction != InteractionState::Resizing {
            return;
        }
        let Some(start) = self.resize_start else {
            return;
        };
        let delta = delta_x.max(delta_y / aspect_factor(self.orientation));
        let width = (start.width + delta).max(MIN_WIDTH);
        self.size = clamp_size(
            Size {
                width,
                height: height_for(width, self.orientation),
            },
            self.orientation,
            viewport,
        );
    }

    /// Ends the gesture; the window now counts as explicitly sized.
    pub fn end_resize(&mut self) -> bool {
        if self.interaction != InteractionState::Resizing {
            return false;
        }
        self.interaction = InteractionState::Idle;
        self.resize_start = None;
        self.manually_resized = true;
        true
    }

    // ========================
    // External requests
    // ========================

    /// Switch the aspect lock and re-derive the height from the current
    /// width. Returns `true` when the orientation actually changed; the
    /// caller saves immediately, no debounce.
    pub fn set_orientation(&mut self, orientation: Orientation, viewport: Viewport) -> bool {
        if self.orientation == orientation {
            return false;
        }
        self.orientation = orientation;
        self.size.height = height_for(self.size.width, orientation);
        let (position, size) = clamp_to_viewport(self.position, self.size, orientation, viewport);
        self.position = position;
        self.size = size;
        true
    }

    /// Absolute size request, e.g. "fill the viewport" for theater mode. An
    /// explicit height skips the aspect derivation; the clamp re-locks the
    /// aspect only on an axis that actually binds. Returns `true` when the
    /// size changed, so unchanged requests cause no redundant write.
    pub fn set_absolute_size(
        &mut self,
        width: f64,
        height: Option<f64>,
        orientation_override: Option<Orientation>,
        viewport: Viewport,
    ) -> bool {
        let orientation = orientation_override.unwrap_or(self.orientation);
        let mut width = width.max(MIN_WIDTH);
        let mut height = match height {
            Some(height) => height.max(MIN_HEIGHT),
            None => height_for(width, orientation),
        };
        if width > viewport.width {
            width = viewport.width;
            height = height_for(width, orientation);
        }
        if height > viewport.height {
            height = viewport.height;
            width = width_for(height, orientation);
        }
        let size = Size { width, height };
        if size == self.size {
            return false;
        }
        self.size = size;
        self.manually_resized = true;
        true
    }

    // ========================
    // Viewport reconciliation
    // ========================

    /// Clamp-and-adjust pass against the live viewport, run (debounced) on
    /// viewport resize. Re-derives the height when it has drifted from the
    /// aspect lock or the window was never explicitly sized, then clamps
    /// size and position. Idempotent; returns `true` when anything moved.
    pub fn reconcile(&mut self, viewport: Viewport) -> bool {
        if self.interaction != InteractionState::Idle {
            return false;
        }
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return false;
        }
        let before = (self.position, self.size);

        let derived = height_for(self.size.width, self.orientation);
        if (self.size.height - derived).abs() > HEIGHT_DRIFT_TOLERANCE || !self.manually_resized {
            self.size.height = derived;
        }
        let (position, size) =
            clamp_to_viewport(self.position, self.size, self.orientation, viewport);
        self.position = position;
        self.size = size;

        (self.position, self.size) != before
    }

    // ========================
    // Persistence
    // ========================

    /// The full snapshot written on every save
    pub fn record(&self) -> HashMap<String, Value> {
        HashMap::from([
            (
                self.storage_key.clone(),
                serde_json::to_value(self.position).unwrap_or_default(),
            ),
            (
                size_key(&self.storage_key),
                serde_json::to_value(self.size).unwrap_or_default(),
            ),
            (
                vertical_key(&self.storage_key),
                Value::Bool(self.orientation.is_vertical()),
            ),
        ])
    }

    /// Write the current state. Failures are logged and swallowed; the
    /// in-memory geometry stays authoritative for the session.
    pub async fn persist(&self) {
        if let Err(err) = self.storage.set(self.record()).await {
            warn!("floating window geometry not saved: {err}");
        }
    }
}
