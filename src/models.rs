//! Overlay Models
//!
//! The media element handed to the floating window, carried as data.

use web_sys::{HtmlIFrameElement, HtmlVideoElement};

/// Media element detached into the floating window. Produced once by the
/// host-page selector; downstream code dispatches on the variant instead of
/// re-probing the element's type.
#[derive(Debug, Clone)]
pub enum MediaHandle {
    Video(HtmlVideoElement),
    Iframe(HtmlIFrameElement),
}

impl MediaHandle {
    /// Storage key for this window kind. Distinct kinds persist under
    /// distinct keys and never contend for the same record.
    pub fn storage_key(&self) -> &'static str {
        match self {
            Self::Video(_) => "floating-video-position",
            Self::Iframe(_) => "floating-iframe-position",
        }
    }
}
