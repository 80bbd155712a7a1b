//! Floating Video Shell
//!
//! Hosts a page video element inside the floating window: the element is
//! moved into the window's container and put back in its original slot on
//! close. Only geometry controls are rendered here; playback controls are
//! the host page's business.

use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use leptos_floatwin::{current_viewport, FloatWinHandle, FloatingWindow, Orientation};

use crate::components::media_slot::MediaSlot;

#[component]
pub fn FloatingVideo(
    video: StoredValue<web_sys::HtmlVideoElement, LocalStorage>,
    /// Key under which this window's geometry persists
    storage_key: &'static str,
    on_close: Callback<()>,
) -> impl IntoView {
    let handle = FloatWinHandle::new();
    let (is_vertical, set_is_vertical) = signal(false);
    let container = NodeRef::<leptos::html::Div>::new();
    let slot: StoredValue<Option<MediaSlot>, LocalStorage> = StoredValue::new_local(None);

    // Move the video into the floating container, remembering where it
    // came from.
    Effect::new(move |_| {
        let Some(target) = container.get() else {
            return;
        };
        if slot.with_value(Option::is_some) {
            return;
        }
        video.with_value(|video| {
            let Some(taken) = MediaSlot::take(video) else {
                return;
            };
            slot.set_value(Some(taken));
            let style = web_sys::HtmlElement::style(video);
            let _ = style.set_property("width", "100%");
            let _ = style.set_property("height", "100%");
            let _ = style.set_property("object-fit", "contain");
            let _ = target.append_child(video);
        });
    });

    on_cleanup(move || {
        let (Some(video), Some(Some(slot))) = (video.try_get_value(), slot.try_get_value())
        else {
            return;
        };
        let style = web_sys::HtmlElement::style(&video);
        let _ = style.remove_property("width");
        let _ = style.remove_property("height");
        let _ = style.remove_property("object-fit");
        slot.restore(&video);
    });

    // Portrait streams flip the window's aspect lock once their dimensions
    // are known.
    Effect::new(move |_| {
        video.with_value(|video| {
            let flag_portrait = move |video: &web_sys::HtmlVideoElement| {
                if video.video_height() > video.video_width() {
                    handle.request_orientation(Orientation::Vertical);
                }
            };
            // HAVE_METADATA and up already knows the dimensions.
            if video.ready_state() >= 1 {
                flag_portrait(video);
                return;
            }
            let probe = video.clone();
            let on_metadata = Closure::<dyn FnMut()>::new(move || flag_portrait(&probe));
            let _ = video.add_event_listener_with_callback(
                "loadedmetadata",
                on_metadata.as_ref().unchecked_ref(),
            );
            on_metadata.forget();
        });
    });

    let toggle_orientation = move |_| {
        let vertical = !is_vertical.get_untracked();
        handle.request_orientation(Orientation::from_vertical(vertical));
    };
    let theater_mode = move |_| {
        let viewport = current_viewport();
        handle.request_resize(
            viewport.width,
            Some(viewport.height),
            Some(Orientation::from_vertical(is_vertical.get_untracked())),
        );
    };
    let close = move |_| on_close.run(());

    view! {
        <FloatingWindow
            storage_key=storage_key
            on_vertical_change=Callback::new(move |vertical| set_is_vertical.set(vertical))
            handle=handle
        >
            <div
                node_ref=container
                class="floating-video-container"
                style="position: absolute; inset: 0; background: #000; overflow: hidden;"
            ></div>
            <div
                class="floating-video-controls"
                style="position: absolute; top: 4px; right: 6px; display: flex; gap: 4px; z-index: 3;"
            >
                <button
                    title=move || if is_vertical.get() { "Landscape" } else { "Portrait" }
                    on:click=toggle_orientation
                >
                    "⇄"
                </button>
                <button title="Theater mode" on:click=theater_mode>
                    "⛶"
                </button>
                <button title="Close" on:click=close>
                    "✕"
                </button>
            </div>
        </FloatingWindow>
    }
}
