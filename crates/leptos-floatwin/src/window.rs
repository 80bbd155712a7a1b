//! Floating Window Component
//!
//! Draggable, resizable, aspect-locked floating window. Gestures are driven
//! by global document pointer listeners so a release anywhere, even outside
//! the window, terminates them. Geometry is persisted per storage key and
//! reconciled against the viewport on (debounced) window resizes.

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::debounce::Debounce;
use crate::geometry::{Orientation, Viewport};
use crate::manager::{GeometryManager, GeometryOptions, InteractionState, DEFAULT_WIDTH};
use crate::storage::ChromeStorage;

/// Quiescence window for viewport-resize reconciliation
const RESIZE_DEBOUNCE_MS: u32 = 100;

/// Geometry change requested from outside the gesture surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FloatWinCommand {
    /// Absolute size request (theater mode and friends). An omitted height
    /// is derived from the width through the aspect lock.
    RequestResize {
        width: f64,
        height: Option<f64>,
        orientation: Option<Orientation>,
    },
    /// Aspect-lock change
    RequestOrientation(Orientation),
}

/// Imperative entry point handed to the hosting shell. Commands are
/// enumerable and drained by the window; there is no open-ended mutable
/// access to its state.
#[derive(Clone, Copy)]
pub struct FloatWinHandle {
    command: RwSignal<Option<FloatWinCommand>>,
    orientation: RwSignal<Orientation>,
}

impl FloatWinHandle {
    pub fn new() -> Self {
        Self {
            command: RwSignal::new(None),
            orientation: RwSignal::new(Orientation::Horizontal),
        }
    }

    /// Request an absolute size, e.g. `request_resize(vw, Some(vh), None)`
    /// to fill the viewport.
    pub fn request_resize(&self, width: f64, height: Option<f64>, orientation: Option<Orientation>) {
        self.command.set(Some(FloatWinCommand::RequestResize {
            width,
            height,
            orientation,
        }));
    }

    pub fn request_orientation(&self, orientation: Orientation) {
        self.command
            .set(Some(FloatWinCommand::RequestOrientation(orientation)));
    }

    /// The window's current aspect lock
    pub fn orientation(&self) -> Orientation {
        self.orientation.get_untracked()
    }

    pub fn is_vertical(&self) -> bool {
        self.orientation().is_vertical()
    }

    fn take_command(&self) -> Option<FloatWinCommand> {
        let command = self.command.get();
        if command.is_some() {
            self.command.set(None);
        }
        command
    }
}

impl Default for FloatWinHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Viewport dimensions as the overlay sees them, read fresh per call
pub fn current_viewport() -> Viewport {
    let Some(window) = web_sys::window() else {
        return Viewport {
            width: 0.0,
            height: 0.0,
        };
    };
    let document_size = window
        .document()
        .and_then(|document| document.document_element())
        .map(|root| (root.client_width() as f64, root.client_height() as f64));
    match document_size {
        Some((width, height)) if width > 0.0 => Viewport { width, height },
        _ => Viewport {
            width: window
                .inner_width()
                .ok()
                .and_then(|value| value.as_f64())
                .unwrap_or(0.0),
            height: window
                .inner_height()
                .ok()
                .and_then(|value| value.as_f64())
                .unwrap_or(0.0),
        },
    }
}

fn persist_snapshot(geom: RwSignal<GeometryManager<ChromeStorage>, LocalStorage>) {
    let Some(manager) = geom.try_get_untracked() else {
        return;
    };
    spawn_local(async move {
        manager.persist().await;
    });
}

/// Floating window around arbitrary content.
///
/// Renders a top drag strip and a bottom-right resize grip; everything else
/// comes from `children`. Child pointer events are suppressed while a resize
/// gesture is live so the grip keeps the pointer.
#[component]
pub fn FloatingWindow(
    /// Key under which this window kind's geometry is persisted
    #[prop(into)]
    storage_key: String,
    /// Width used when no saved geometry exists
    #[prop(default = DEFAULT_WIDTH)]
    default_width: f64,
    /// Start with the portrait aspect lock
    #[prop(default = false)]
    default_vertical: bool,
    /// Render the resize grip and accept resize gestures
    #[prop(default = true)]
    resizable: bool,
    /// Grip visibility; the shell can fade it with its own chrome
    #[prop(into, default = Signal::derive(|| true))]
    show_resize_handle: Signal<bool>,
    /// Notified with the new flag whenever the orientation lock changes
    #[prop(into, optional)]
    on_vertical_change: Option<Callback<bool>>,
    /// Command handle for external geometry requests
    #[prop(into, optional)]
    handle: Option<FloatWinHandle>,
    children: Children,
) -> impl IntoView {
    let storage = Rc::new(ChromeStorage::new());
    let options = GeometryOptions {
        storage_key,
        default_width,
        default_vertical,
    };
    let geom = RwSignal::new_local(GeometryManager::with_defaults(Rc::clone(&storage), &options));
    // Pointer location at gesture start, in client coordinates
    let pointer_origin = RwSignal::new(None::<(f64, f64)>);

    // Defaults are usable immediately; saved geometry replaces them once the
    // storage read answers, followed by one reconciliation pass.
    spawn_local(async move {
        let loaded = GeometryManager::initialize(storage, &options).await;
        if geom.try_set(loaded).is_some() {
            return;
        }
        let changed = geom.try_update(|manager| manager.reconcile(current_viewport()));
        if changed == Some(true) {
            persist_snapshot(geom);
        }
    });

    // Propagate orientation changes to the handle and the shell.
    Effect::new(move |prev: Option<Orientation>| {
        let orientation = geom.with(|manager| manager.orientation());
        if prev != Some(orientation) {
            if let Some(handle) = handle {
                handle.orientation.set(orientation);
            }
            if let Some(callback) = on_vertical_change {
                callback.run(orientation.is_vertical());
            }
        }
        orientation
    });

    // Drain external commands.
    if let Some(handle) = handle {
        Effect::new(move |_| {
            let Some(command) = handle.take_command() else {
                return;
            };
            let viewport = current_viewport();
            let changed = geom.try_update(|manager| match command {
                FloatWinCommand::RequestResize {
                    width,
                    height,
                    orientation,
                } => manager.set_absolute_size(width, height, orientation, viewport),
                FloatWinCommand::RequestOrientation(orientation) => {
                    manager.set_orientation(orientation, viewport)
                }
            });
            if changed == Some(true) {
                persist_snapshot(geom);
            }
        });
    }

    // Live gesture updates and termination are document-global: a pointer
    // released outside the window must still end the gesture.
    let on_pointermove = Closure::<dyn FnMut(web_sys::PointerEvent)>::new(
        move |event: web_sys::PointerEvent| {
            let Some((start_x, start_y)) = pointer_origin.try_get_untracked().flatten() else {
                return;
            };
            let delta_x = event.client_x() as f64 - start_x;
            let delta_y = event.client_y() as f64 - start_y;
            match geom.try_with(|manager| manager.interaction()) {
                Some(InteractionState::Dragging) => {
                    geom.update(|manager| manager.apply_drag(delta_x, delta_y));
                }
                Some(InteractionState::Resizing) => {
                    let viewport = current_viewport();
                    geom.update(|manager| manager.apply_resize(delta_x, delta_y, viewport));
                }
                _ => {}
            }
        },
    );
    let on_pointerup = Closure::<dyn FnMut(web_sys::PointerEvent)>::new(
        move |_event: web_sys::PointerEvent| {
            if pointer_origin.try_get_untracked().flatten().is_none() {
                return;
            }
            let _ = pointer_origin.try_set(None);
            let viewport = current_viewport();
            let finished = geom.try_update(|manager| match manager.interaction() {
                InteractionState::Dragging => manager.end_drag(viewport),
                InteractionState::Resizing => manager.end_resize(),
                InteractionState::Idle => false,
            });
            if finished == Some(true) {
                persist_snapshot(geom);
            }
        },
    );
    if let Some(document) = web_sys::window().and_then(|window| window.document()) {
        let _ = document
            .add_event_listener_with_callback("pointermove", on_pointermove.as_ref().unchecked_ref());
        let _ = document
            .add_event_listener_with_callback("pointerup", on_pointerup.as_ref().unchecked_ref());
        let _ = document.add_event_listener_with_callback(
            "pointercancel",
            on_pointerup.as_ref().unchecked_ref(),
        );
    }
    on_pointermove.forget();
    on_pointerup.forget();

    // Viewport resizes reconcile through the trailing debounce, so a burst
    // of resize events runs a single pass.
    let debounce = Debounce::new(RESIZE_DEBOUNCE_MS);
    let on_resize = Closure::<dyn FnMut()>::new(move || {
        debounce.call(move || {
            let changed = geom.try_update(|manager| manager.reconcile(current_viewport()));
            if changed == Some(true) {
                persist_snapshot(geom);
            }
        });
    });
    if let Some(window) = web_sys::window() {
        let _ =
            window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref());
    }
    on_resize.forget();

    // The window outlives this component only in storage.
    on_cleanup(move || persist_snapshot(geom));

    // A second pointer landing mid-gesture must not move the origin.
    let gesture_idle =
        move || geom.with_untracked(|manager| manager.interaction()) == InteractionState::Idle;
    let on_drag_pointerdown = move |event: web_sys::PointerEvent| {
        if event.button() != 0 || !gesture_idle() {
            return;
        }
        event.prevent_default();
        pointer_origin.set(Some((event.client_x() as f64, event.client_y() as f64)));
        geom.update(|manager| manager.begin_drag());
    };
    let on_resize_pointerdown = move |event: web_sys::PointerEvent| {
        if event.button() != 0 || !gesture_idle() {
            return;
        }
        event.prevent_default();
        event.stop_propagation();
        pointer_origin.set(Some((event.client_x() as f64, event.client_y() as f64)));
        geom.update(|manager| manager.begin_resize());
    };

    let frame_style = move || {
        geom.with(|manager| {
            format!(
                "position: fixed; left: {}px; top: {}px; width: {}px; height: {}px; \
                 z-index: 2147483647; pointer-events: auto; user-select: none; cursor: {};",
                manager.position().x,
                manager.position().y,
                manager.size().width,
                manager.size().height,
                if manager.interaction() == InteractionState::Resizing {
                    "se-resize"
                } else {
                    "auto"
                },
            )
        })
    };
    let content_style = move || {
        let resizing =
            geom.with(|manager| manager.interaction() == InteractionState::Resizing);
        format!(
            "position: absolute; inset: 0; pointer-events: {};",
            if resizing { "none" } else { "auto" }
        )
    };
    let grip_style = move || {
        format!(
            "position: absolute; right: 0; bottom: 0; width: 20px; height: 20px; \
             cursor: se-resize; color: #fff; z-index: 3; opacity: {}; \
             transition: opacity 0.3s ease-in-out;",
            if show_resize_handle.get() { 1 } else { 0 }
        )
    };

    view! {
        <div class="floatwin" style=frame_style>
            <div class="floatwin-content" style=content_style>{children()}</div>
            <div
                class="floatwin-drag-handle"
                on:pointerdown=on_drag_pointerdown
                style="position: absolute; top: 0; left: 0; right: 0; height: 28px; \
                       cursor: move; z-index: 2;"
            ></div>
            <Show when=move || resizable>
                <div
                    class="floatwin-resize-handle"
                    on:pointerdown=on_resize_pointerdown
                    style=grip_style
                >
                    <svg
                        width="20"
                        height="20"
                        viewBox="0 0 20 20"
                        style="position: absolute; right: 0; bottom: 0; pointer-events: none;"
                    >
                        <path
                            d="M 5,15 L 15,5 M 10,15 L 15,10 M 15,15 L 15,15"
                            stroke="currentColor"
                            stroke-width="1.5"
                            fill="none"
                            opacity="0.5"
                        />
                    </svg>
                </div>
            </Show>
        </div>
    }
}
