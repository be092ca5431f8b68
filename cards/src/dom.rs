use wasm_bindgen::JsValue;
use web_sys::Element;

use crate::card::{Action, CardController};
use crate::hit::HitZone;
use crate::input::{Key, PointerEvent};

/// Attribute holding a hit-zone role (`"action"` or `"resize"`).
pub const ROLE_ATTR: &str = "data-role";

/// Attribute holding a resize handle's compass direction.
pub const DIR_ATTR: &str = "data-dir";

/// Read the hit zone from the element a pointer-down landed on.
#[must_use]
pub fn zone_of(target: &Element) -> HitZone {
    HitZone::from_role(target.get_attribute(ROLE_ATTR).as_deref(), target.get_attribute(DIR_ATTR).as_deref())
}

/// Result of feeding one DOM event through a [`DomCard`].
#[derive(Debug)]
pub struct Dispatch {
    /// Actions left for the host after pointer capture was applied.
    pub actions: Vec<Action>,
    /// Set when the browser refused to capture or release the pointer.
    pub capture_error: Option<JsValue>,
}

/// A card controller bound to its DOM element.
///
/// Pointer capture is applied here; every other action goes back to the host.
pub struct DomCard {
    element: Element,
    pub core: CardController,
}

impl DomCard {
    #[must_use]
    pub fn new(element: Element, core: CardController) -> Self {
        Self { element, core }
    }

    #[must_use]
    pub fn element(&self) -> &Element {
        &self.element
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, target: &Element, event: PointerEvent) -> Dispatch {
        let actions = self.core.on_pointer_down(zone_of(target), event);
        self.apply_capture(actions)
    }

    pub fn on_pointer_move(&mut self, event: PointerEvent) -> Dispatch {
        let actions = self.core.on_pointer_move(event);
        self.apply_capture(actions)
    }

    pub fn on_pointer_up(&mut self, event: PointerEvent) -> Dispatch {
        let actions = self.core.on_pointer_up(event);
        self.apply_capture(actions)
    }

    pub fn on_pointer_cancel(&mut self, event: PointerEvent) -> Dispatch {
        let actions = self.core.on_pointer_cancel(event);
        self.apply_capture(actions)
    }

    pub fn on_key_down(&mut self, key: &Key) -> Dispatch {
        let actions = self.core.on_key_down(key);
        self.apply_capture(actions)
    }

    fn apply_capture(&self, actions: Vec<Action>) -> Dispatch {
        let mut rest = Vec::with_capacity(actions.len());
        let mut capture_error = None;
        for action in actions {
            let result = match action {
                Action::CapturePointer(pointer_id) => self.element.set_pointer_capture(pointer_id),
                Action::ReleasePointer(pointer_id) if self.element.has_pointer_capture(pointer_id) => {
                    self.element.release_pointer_capture(pointer_id)
                }
                Action::ReleasePointer(_) => Ok(()),
                other => {
                    rest.push(other);
                    Ok(())
                }
            };
            if let Err(err) = result {
                if capture_error.is_none() {
                    capture_error = Some(err);
                }
            }
        }
        Dispatch { actions: rest, capture_error }
    }
}
