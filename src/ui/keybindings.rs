// Keyboard handling for the open lightbox
// The controller is attached to the window only while the lightbox is open,
// so grid navigation and text entry are untouched otherwise.

use gtk4::gdk::Key;
use gtk4::prelude::*;
use gtk4::{glib, EventControllerKey, PropagationPhase, Widget};
use std::cell::RefCell;
use std::rc::Rc;

use crate::gallery::LightboxKey;

/// Callback invoked with a mapped key; returns whether it was consumed.
pub type LightboxKeyCallback = Box<dyn Fn(LightboxKey) -> bool>;

/// Maps a GDK key to a lightbox action.
pub fn map_key(key: Key) -> Option<LightboxKey> {
    match key {
        Key::Escape | Key::q => Some(LightboxKey::Cancel),
        Key::Left | Key::KP_Left | Key::h => Some(LightboxKey::Previous),
        Key::Right | Key::KP_Right | Key::l => Some(LightboxKey::Next),
        _ => None,
    }
}

pub struct LightboxKeys {
    controller: EventControllerKey,
    attached_to: RefCell<Option<Widget>>,
    on_key: Rc<RefCell<Option<LightboxKeyCallback>>>,
}

impl LightboxKeys {
    pub fn new() -> Self {
        let controller = EventControllerKey::new();
        controller.set_propagation_phase(PropagationPhase::Capture);

        let on_key: Rc<RefCell<Option<LightboxKeyCallback>>> = Rc::new(RefCell::new(None));
        let on_key_clone = on_key.clone();

        controller.connect_key_pressed(move |_controller, keyval, _keycode, _state| {
            let handled = map_key(keyval)
                .zip(on_key_clone.borrow().as_ref())
                .is_some_and(|(key, callback)| callback(key));
            if handled {
                glib::Propagation::Stop
            } else {
                glib::Propagation::Proceed
            }
        });

        Self {
            controller,
            attached_to: RefCell::new(None),
            on_key,
        }
    }

    pub fn connect_key<F>(&self, callback: F)
    where
        F: Fn(LightboxKey) -> bool + 'static,
    {
        *self.on_key.borrow_mut() = Some(Box::new(callback));
    }

    /// Starts listening on `widget`. Attaching twice is a no-op.
    pub fn attach(&self, widget: &impl IsA<Widget>) {
        let mut attached = self.attached_to.borrow_mut();
        if attached.is_some() {
            return;
        }
        widget.add_controller(self.controller.clone());
        *attached = Some(widget.clone().upcast());
        tracing::debug!("Lightbox keys attached");
    }

    pub fn detach(&self) {
        if let Some(widget) = self.attached_to.borrow_mut().take() {
            widget.remove_controller(&self.controller);
            tracing::debug!("Lightbox keys detached");
        }
    }
}

impl Drop for LightboxKeys {
    fn drop(&mut self) {
        self.detach();
    }
}
