//! Floating Player App
//!
//! Overlay root: a full-viewport, pointer-transparent layer that dispatches
//! the selected media handle to its floating shell. Closing the window
//! restores the page and tears the shell down.

use leptos::either::Either;
use leptos::prelude::*;

use crate::components::{FloatingIframe, FloatingVideo};
use crate::models::MediaHandle;

#[derive(Clone, Copy)]
enum MountedMedia {
    Video(StoredValue<web_sys::HtmlVideoElement, LocalStorage>),
    Iframe(StoredValue<web_sys::HtmlIFrameElement, LocalStorage>),
}

#[component]
pub fn App(media: MediaHandle) -> impl IntoView {
    let storage_key = media.storage_key();
    let mounted = match media {
        MediaHandle::Video(video) => MountedMedia::Video(StoredValue::new_local(video)),
        MediaHandle::Iframe(iframe) => MountedMedia::Iframe(StoredValue::new_local(iframe)),
    };
    let (active, set_active) = signal(true);
    let on_close = Callback::new(move |_: ()| set_active.set(false));

    view! {
        <div
            class="float-player-overlay"
            style="position: fixed; inset: 0; z-index: 2147483647; pointer-events: none;"
        >
            <Show when=move || active.get()>
                {move || match mounted {
                    MountedMedia::Video(video) => {
                        Either::Left(
                            view! { <FloatingVideo video=video storage_key=storage_key on_close=on_close/> },
                        )
                    }
                    MountedMedia::Iframe(iframe) => {
                        Either::Right(
                            view! { <FloatingIframe iframe=iframe storage_key=storage_key on_close=on_close/> },
                        )
                    }
                }}
            </Show>
        </div>
    }
}
