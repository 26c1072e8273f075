// Lightbox overlay for the gallery
// Full-window backdrop with the selected photo, its caption, a position
// counter and prev/next/close controls. Drags on the image are forwarded
// to the gallery for swipe handling; clicks on the bare backdrop close the
// viewer unless they ended a drag.

use gdk4::Texture;
use gtk4::prelude::*;
use gtk4::subclass::prelude::*;
use gtk4::{
    glib, Align, Box as GtkBox, Button, ContentFit, GestureClick, GestureDrag, Label,
    Orientation, Overlay, PickFlags, Picture, Widget,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::gallery::CloseReason;
use crate::models::Photo;

mod imp {
    use super::*;

    #[derive(Default)]
    pub struct LightboxViewInner {
        pub root: RefCell<Option<Overlay>>,
        pub backdrop: RefCell<Option<GtkBox>>,
        pub picture: RefCell<Option<Picture>>,
        pub placeholder: RefCell<Option<Label>>,
        pub title_label: RefCell<Option<Label>>,
        pub category_label: RefCell<Option<Label>>,
        pub description_label: RefCell<Option<Label>>,
        pub position_label: RefCell<Option<Label>>,
        pub dimensions_label: RefCell<Option<Label>>,
        pub on_close: RefCell<Option<Rc<dyn Fn(CloseReason)>>>,
        pub on_next: RefCell<Option<Rc<dyn Fn()>>>,
        pub on_prev: RefCell<Option<Rc<dyn Fn()>>>,
        pub on_drag_begin: RefCell<Option<Rc<dyn Fn(f64, f64)>>>,
        pub on_drag_update: RefCell<Option<Rc<dyn Fn(f64, f64) -> bool>>>,
        pub on_drag_end: RefCell<Option<Rc<dyn Fn(f64, f64)>>>,
        pub dragged: Cell<bool>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for LightboxViewInner {
        const NAME: &'static str = "TelosLightboxView";
        type Type = super::LightboxView;
        type ParentType = glib::Object;
    }

    impl ObjectImpl for LightboxViewInner {}
}

glib::wrapper! {
    pub struct LightboxView(ObjectSubclass<imp::LightboxViewInner>);
}

impl LightboxView {
    pub fn new() -> Self {
        let obj: Self = glib::Object::builder().build();
        obj.setup_widgets();
        obj
    }

    fn setup_widgets(&self) {
        let imp = self.imp();

        let backdrop = GtkBox::new(Orientation::Vertical, 0);
        backdrop.add_css_class("lightbox-backdrop");
        backdrop.set_hexpand(true);
        backdrop.set_vexpand(true);

        let picture = Picture::new();
        picture.set_can_shrink(true);
        picture.set_content_fit(ContentFit::Contain);
        picture.set_vexpand(true);
        picture.add_css_class("lightbox-image");

        let placeholder = Label::new(None);
        placeholder.add_css_class("placeholder");
        placeholder.set_visible(false);

        let image_overlay = Overlay::new();
        image_overlay.set_child(Some(&picture));
        image_overlay.add_overlay(&placeholder);
        image_overlay.set_vexpand(true);

        let title_label = Label::new(None);
        title_label.set_halign(Align::Start);
        title_label.add_css_class("lightbox-title");

        let category_label = Label::new(None);
        category_label.set_halign(Align::Start);
        category_label.add_css_class("tile-category");

        let description_label = Label::new(None);
        description_label.set_halign(Align::Start);
        description_label.set_xalign(0.0);
        description_label.set_wrap(true);
        description_label.set_max_width_chars(60);
        description_label.add_css_class("lightbox-description");

        let position_label = Label::new(None);
        position_label.set_valign(Align::Start);
        position_label.add_css_class("lightbox-position");

        let dimensions_label = Label::new(None);
        dimensions_label.set_valign(Align::Start);
        dimensions_label.add_css_class("muted");

        let text = GtkBox::new(Orientation::Vertical, 6);
        text.set_hexpand(true);
        text.append(&title_label);
        text.append(&category_label);
        text.append(&description_label);

        let meta = GtkBox::new(Orientation::Vertical, 4);
        meta.append(&position_label);
        meta.append(&dimensions_label);

        let info = GtkBox::new(Orientation::Horizontal, 16);
        info.add_css_class("lightbox-info");
        info.append(&text);
        info.append(&meta);

        let prev_btn = Button::with_label("‹");
        prev_btn.set_tooltip_text(Some("Previous (Left)"));
        prev_btn.add_css_class("lightbox-nav");
        prev_btn.set_valign(Align::Center);

        let next_btn = Button::with_label("›");
        next_btn.set_tooltip_text(Some("Next (Right)"));
        next_btn.add_css_class("lightbox-nav");
        next_btn.set_valign(Align::Center);

        let stage = GtkBox::new(Orientation::Horizontal, 12);
        stage.set_vexpand(true);
        stage.append(&prev_btn);
        stage.append(&image_overlay);
        stage.append(&next_btn);
        image_overlay.set_hexpand(true);

        let content = GtkBox::new(Orientation::Vertical, 16);
        content.add_css_class("lightbox-content");
        content.set_margin_top(64);
        content.set_margin_bottom(32);
        content.set_margin_start(48);
        content.set_margin_end(48);
        content.append(&stage);
        content.append(&info);

        let close_btn = Button::with_label("Close");
        close_btn.set_tooltip_text(Some("Close (Esc)"));
        close_btn.add_css_class("lightbox-close");
        close_btn.set_halign(Align::End);
        close_btn.set_valign(Align::Start);
        close_btn.set_margin_top(16);
        close_btn.set_margin_end(16);

        let root = Overlay::new();
        root.set_child(Some(&backdrop));
        root.add_overlay(&content);
        root.add_overlay(&close_btn);
        root.add_css_class("lightbox");
        root.set_visible(false);

        let viewer_weak = self.downgrade();
        close_btn.connect_clicked(move |_| {
            if let Some(viewer) = viewer_weak.upgrade() {
                viewer.emit_close(CloseReason::Button);
            }
        });

        let viewer_weak = self.downgrade();
        prev_btn.connect_clicked(move |_| {
            if let Some(viewer) = viewer_weak.upgrade() {
                if let Some(cb) = viewer.imp().on_prev.borrow().clone() {
                    cb();
                }
            }
        });

        let viewer_weak = self.downgrade();
        next_btn.connect_clicked(move |_| {
            if let Some(viewer) = viewer_weak.upgrade() {
                if let Some(cb) = viewer.imp().on_next.borrow().clone() {
                    cb();
                }
            }
        });

        // Only presses on empty backdrop space close; the content box covers
        // the image and controls.
        let backdrop_click = GestureClick::new();
        backdrop_click.set_button(1);
        let viewer_weak = self.downgrade();
        backdrop_click.connect_pressed(move |_, _n, _x, _y| {
            if let Some(viewer) = viewer_weak.upgrade() {
                viewer.imp().dragged.set(false);
            }
        });
        let viewer_weak = self.downgrade();
        backdrop_click.connect_released(move |gesture, _n, x, y| {
            let Some(viewer) = viewer_weak.upgrade() else {
                return;
            };
            // The release of a swipe is not a click
            if viewer.imp().dragged.replace(false) {
                return;
            }
            let Some(widget) = gesture.widget() else {
                return;
            };
            if viewer.is_backdrop_at(&widget, x, y) {
                viewer.emit_close(CloseReason::Backdrop);
            }
        });
        root.add_controller(backdrop_click);

        let drag = GestureDrag::new();
        drag.set_button(1);
        let viewer_weak = self.downgrade();
        drag.connect_drag_begin(move |_, x, y| {
            if let Some(viewer) = viewer_weak.upgrade() {
                viewer.imp().dragged.set(false);
                if let Some(cb) = viewer.imp().on_drag_begin.borrow().clone() {
                    cb(x, y);
                }
            }
        });
        let viewer_weak = self.downgrade();
        drag.connect_drag_update(move |gesture, offset_x, offset_y| {
            let Some(viewer) = viewer_weak.upgrade() else {
                return;
            };
            let Some((start_x, start_y)) = gesture.start_point() else {
                return;
            };
            let Some(cb) = viewer.imp().on_drag_update.borrow().clone() else {
                return;
            };
            if cb(start_x + offset_x, start_y + offset_y) && !viewer.imp().dragged.get() {
                viewer.imp().dragged.set(true);
                gesture.set_state(gtk4::EventSequenceState::Claimed);
            }
        });
        let viewer_weak = self.downgrade();
        drag.connect_drag_end(move |gesture, offset_x, offset_y| {
            let Some(viewer) = viewer_weak.upgrade() else {
                return;
            };
            let (start_x, start_y) = gesture.start_point().unwrap_or((0.0, 0.0));
            if let Some(cb) = viewer.imp().on_drag_end.borrow().clone() {
                cb(start_x + offset_x, start_y + offset_y);
            }
        });
        image_overlay.add_controller(drag);

        *imp.root.borrow_mut() = Some(root);
        *imp.backdrop.borrow_mut() = Some(backdrop);
        *imp.picture.borrow_mut() = Some(picture);
        *imp.placeholder.borrow_mut() = Some(placeholder);
        *imp.title_label.borrow_mut() = Some(title_label);
        *imp.category_label.borrow_mut() = Some(category_label);
        *imp.description_label.borrow_mut() = Some(description_label);
        *imp.position_label.borrow_mut() = Some(position_label);
        *imp.dimensions_label.borrow_mut() = Some(dimensions_label);
    }

    fn is_backdrop_at(&self, widget: &Widget, x: f64, y: f64) -> bool {
        let picked = widget.pick(x, y, PickFlags::DEFAULT);
        let backdrop = self.imp().backdrop.borrow();
        match (picked, backdrop.as_ref()) {
            (Some(picked), Some(backdrop)) => picked == *backdrop.upcast_ref::<Widget>(),
            _ => false,
        }
    }

    fn emit_close(&self, reason: CloseReason) {
        if let Some(cb) = self.imp().on_close.borrow().clone() {
            cb(reason);
        }
    }

    /// Get the root widget
    pub fn widget(&self) -> Widget {
        self.imp()
            .root
            .borrow()
            .as_ref()
            .map(|w| w.clone().upcast())
            .unwrap_or_else(|| GtkBox::new(Orientation::Vertical, 0).upcast())
    }

    pub fn connect_close<F: Fn(CloseReason) + 'static>(&self, callback: F) {
        *self.imp().on_close.borrow_mut() = Some(Rc::new(callback));
    }

    pub fn connect_next<F: Fn() + 'static>(&self, callback: F) {
        *self.imp().on_next.borrow_mut() = Some(Rc::new(callback));
    }

    pub fn connect_prev<F: Fn() + 'static>(&self, callback: F) {
        *self.imp().on_prev.borrow_mut() = Some(Rc::new(callback));
    }

    pub fn connect_drag_begin<F: Fn(f64, f64) + 'static>(&self, callback: F) {
        *self.imp().on_drag_begin.borrow_mut() = Some(Rc::new(callback));
    }

    /// `callback` returns true once the pointer has left the tap slop.
    pub fn connect_drag_update<F: Fn(f64, f64) -> bool + 'static>(&self, callback: F) {
        *self.imp().on_drag_update.borrow_mut() = Some(Rc::new(callback));
    }

    pub fn connect_drag_end<F: Fn(f64, f64) + 'static>(&self, callback: F) {
        *self.imp().on_drag_end.borrow_mut() = Some(Rc::new(callback));
    }

    /// Shows `photo` with its "n / total" counter.
    pub fn show_photo(&self, photo: &Photo, position: &str, texture: Option<&Texture>) {
        let imp = self.imp();
        if let Some(label) = imp.title_label.borrow().as_ref() {
            label.set_label(&photo.title);
        }
        if let Some(label) = imp.category_label.borrow().as_ref() {
            label.set_label(&photo.category.to_uppercase());
        }
        if let Some(label) = imp.description_label.borrow().as_ref() {
            label.set_label(&photo.description);
            label.set_visible(!photo.description.is_empty());
        }
        if let Some(label) = imp.position_label.borrow().as_ref() {
            label.set_label(position);
        }
        if let Some(label) = imp.dimensions_label.borrow().as_ref() {
            label.set_label(&photo.dimensions_label());
        }
        self.set_texture(texture);
        if let Some(root) = imp.root.borrow().as_ref() {
            root.set_visible(true);
        }
    }

    pub fn set_texture(&self, texture: Option<&Texture>) {
        let imp = self.imp();
        if let Some(picture) = imp.picture.borrow().as_ref() {
            picture.set_paintable(texture);
        }
        if let Some(placeholder) = imp.placeholder.borrow().as_ref() {
            placeholder.set_label("Loading");
            placeholder.set_visible(texture.is_none());
        }
    }

    /// The current photo could not be decoded.
    pub fn set_missing(&self) {
        if let Some(placeholder) = self.imp().placeholder.borrow().as_ref() {
            placeholder.set_label("Image unavailable");
            placeholder.set_visible(true);
        }
    }

    pub fn hide(&self) {
        if let Some(root) = self.imp().root.borrow().as_ref() {
            root.set_visible(false);
        }
        self.set_texture(None);
    }
}

impl Default for LightboxView {
    fn default() -> Self {
        Self::new()
    }
}
