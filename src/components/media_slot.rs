//! Original DOM Slot
//!
//! Remembers where a detached element came from so closing the floating
//! window puts it back where it was.

use web_sys::{Element, Node};

/// An element's place in the host page
#[derive(Debug, Clone)]
pub struct MediaSlot {
    parent: Element,
    next_sibling: Option<Node>,
}

impl MediaSlot {
    /// Capture the element's current slot; `None` when it is detached.
    pub fn take(element: &Element) -> Option<Self> {
        Some(Self {
            parent: element.parent_element()?,
            next_sibling: element.next_sibling(),
        })
    }

    /// Reinsert the element, before its old neighbor when it still exists.
    pub fn restore(&self, element: &Element) {
        match &self.next_sibling {
            Some(sibling) => {
                let _ = self.parent.insert_before(element, Some(sibling));
            }
            None => {
                let _ = self.parent.append_child(element);
            }
        }
    }
}
