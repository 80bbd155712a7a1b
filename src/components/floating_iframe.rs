//! Floating Iframe Shell
//!
//! Hosts a video-hosting iframe inside the floating window. Iframes keep the
//! landscape aspect lock; their contents never report dimensions across the
//! origin boundary.

use leptos::prelude::*;

use leptos_floatwin::{current_viewport, FloatWinHandle, FloatingWindow};

use crate::components::media_slot::MediaSlot;

#[component]
pub fn FloatingIframe(
    iframe: StoredValue<web_sys::HtmlIFrameElement, LocalStorage>,
    /// Key under which this window's geometry persists
    storage_key: &'static str,
    on_close: Callback<()>,
) -> impl IntoView {
    let handle = FloatWinHandle::new();
    let container = NodeRef::<leptos::html::Div>::new();
    let slot: StoredValue<Option<MediaSlot>, LocalStorage> = StoredValue::new_local(None);

    Effect::new(move |_| {
        let Some(target) = container.get() else {
            return;
        };
        if slot.with_value(Option::is_some) {
            return;
        }
        iframe.with_value(|iframe| {
            let Some(taken) = MediaSlot::take(iframe) else {
                return;
            };
            slot.set_value(Some(taken));
            let style = web_sys::HtmlElement::style(iframe);
            let _ = style.set_property("width", "100%");
            let _ = style.set_property("height", "100%");
            let _ = style.set_property("border", "none");
            let _ = target.append_child(iframe);
        });
    });

    on_cleanup(move || {
        let (Some(iframe), Some(Some(slot))) = (iframe.try_get_value(), slot.try_get_value())
        else {
            return;
        };
        let style = web_sys::HtmlElement::style(&iframe);
        let _ = style.remove_property("width");
        let _ = style.remove_property("height");
        let _ = style.remove_property("border");
        slot.restore(&iframe);
    });

    let theater_mode = move |_| {
        let viewport = current_viewport();
        handle.request_resize(viewport.width, Some(viewport.height), None);
    };
    let close = move |_| on_close.run(());

    view! {
        <FloatingWindow storage_key=storage_key handle=handle>
            <div
                node_ref=container
                class="floating-iframe-container"
                style="position: absolute; inset: 0; background: #000; overflow: hidden;"
            ></div>
            <div
                class="floating-iframe-controls"
                style="position: absolute; top: 4px; right: 6px; display: flex; gap: 4px; z-index: 3;"
            >
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
