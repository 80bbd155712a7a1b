//! Floating Player Entry Point

mod app;
mod components;
mod models;

use app::App;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

use models::MediaHandle;

fn main() {
    console_error_panic_hook::set_once();
    let Some(media) = locate_media() else {
        leptos::logging::warn!("floating player: no media element on this page");
        return;
    };
    mount_to_body(move || view! { <App media=media/> });
}

/// Minimal stand-in for the host-page media selector: the first video on
/// the page, else the first iframe.
fn locate_media() -> Option<MediaHandle> {
    let document = web_sys::window()?.document()?;
    if let Some(element) = document.query_selector("video").ok().flatten() {
        if let Ok(video) = element.dyn_into::<web_sys::HtmlVideoElement>() {
            return Some(MediaHandle::Video(video));
        }
    }
    document
        .query_selector("iframe")
        .ok()
        .flatten()
        .and_then(|element| element.dyn_into::<web_sys::HtmlIFrameElement>().ok())
        .map(MediaHandle::Iframe)
}
