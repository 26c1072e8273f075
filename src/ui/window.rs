// Main window for the Telos portfolio
// Header with brand and category filters, the photo grid, and the lightbox
// overlay on top. All gallery state lives in GalleryView; this module only
// forwards input to it and re-renders from it.

use gdk4::{Display, MemoryFormat, MemoryTexture, Texture};
use gtk4::prelude::*;
use gtk4::{
    glib, Align, Application, ApplicationWindow, Box as GtkBox, Button, CssProvider, Label,
    Orientation, Overlay, Settings, STYLE_PROVIDER_PRIORITY_APPLICATION,
};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::grid::{GridScrollSurface, PhotoGrid};
use super::keybindings::LightboxKeys;
use super::lightbox::LightboxView;
use crate::config::AppConfig;
use crate::gallery::{CategoryFilter, GalleryView};
use crate::models::Catalog;
use crate::previews::{Preview, PreviewCache, PreviewQueue, PreviewRequest, PreviewResult};

/// Gallery styling - monochrome, editorial, square corners
const STYLE_CSS: &str = r#"
* {
    border-radius: 0;
    box-shadow: none;
    background-image: none;
}

window {
    background-color: #0b0b0b;
    color: #ececec;
}

button {
    background-color: transparent;
    border: none;
    color: #8a8a8a;
}

button:hover {
    color: #ececec;
}

.brand {
    font-family: serif;
    font-size: 28px;
    letter-spacing: 2px;
}

.tagline, .tile-category, .count-label {
    font-size: 10px;
    letter-spacing: 3px;
    color: #8a8a8a;
}

.filter-button.active {
    color: #ececec;
    border-bottom: 1px solid #ececec;
}

.tile-frame {
    background-color: #161616;
}

.view-project {
    font-family: serif;
    font-style: italic;
    font-size: 26px;
    color: white;
    opacity: 0;
}

.tile-frame:hover .view-project {
    opacity: 1;
}

.tile-caption {
    margin-top: 24px;
    padding-bottom: 12px;
    border-bottom: 1px solid rgba(236, 236, 236, 0.15);
}

.tile-title, .lightbox-title {
    font-family: serif;
    font-size: 30px;
}

.tile-ordinal, .lightbox-position {
    font-family: serif;
    font-style: italic;
    font-size: 12px;
    color: #8a8a8a;
}

.tile-description, .lightbox-description {
    margin-top: 12px;
    font-size: 13px;
    color: #8a8a8a;
}

.placeholder {
    color: #555555;
    font-size: 11px;
    letter-spacing: 2px;
}

.lightbox-backdrop {
    background-color: rgba(5, 5, 5, 0.96);
}

.lightbox-nav {
    font-size: 40px;
    min-width: 48px;
}

.muted {
    color: #6a6a6a;
    font-size: 11px;
}
"#;

/// Load and apply the stylesheet
fn load_css() {
    let provider = CssProvider::new();
    provider.load_from_string(STYLE_CSS);

    if let Some(display) = Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}

fn texture_from_preview(preview: &Preview) -> Option<Texture> {
    if preview.width == 0 || preview.height == 0 {
        return None;
    }
    if preview.pixels.len() < preview.memory_bytes() {
        tracing::warn!(
            "Skipping texture: data too small ({} bytes for {}x{})",
            preview.pixels.len(),
            preview.width,
            preview.height
        );
        return None;
    }
    let bytes = glib::Bytes::from(&preview.pixels[..]);
    let texture = MemoryTexture::new(
        preview.width as i32,
        preview.height as i32,
        MemoryFormat::R8g8b8a8,
        &bytes,
        preview.stride(),
    );
    Some(texture.upcast())
}

/// Main window for the portfolio gallery
pub struct MainWindow {
    window: ApplicationWindow,
    gallery: RefCell<GalleryView<GridScrollSurface>>,
    grid: Rc<PhotoGrid>,
    lightbox: LightboxView,
    keys: LightboxKeys,
    filter_bar: GtkBox,
    filter_buttons: RefCell<Vec<(CategoryFilter, Button)>>,
    count_label: Label,
    previews: Option<PreviewQueue>,
    max_edge: u32,
    textures: RefCell<HashMap<PathBuf, Texture>>,
    missing: RefCell<HashSet<PathBuf>>,
}

impl MainWindow {
    pub fn new(app: &Application, catalog: Catalog, config: &AppConfig) -> Rc<Self> {
        load_css();
        if let Some(settings) = Settings::default() {
            settings.set_gtk_application_prefer_dark_theme(true);
        }

        let window = ApplicationWindow::builder()
            .application(app)
            .title(if catalog.tagline.is_empty() {
                catalog.title.clone()
            } else {
                format!("{} - {}", catalog.title, catalog.tagline)
            })
            .default_width(1280)
            .default_height(860)
            .build();

        // Header: brand on the left, filters and count on the right
        let brand = Label::new(Some(&catalog.title));
        brand.add_css_class("brand");
        brand.set_halign(Align::Start);

        let tagline = Label::new(Some(&catalog.tagline.to_uppercase()));
        tagline.add_css_class("tagline");
        tagline.set_halign(Align::Start);

        let brand_box = GtkBox::new(Orientation::Vertical, 2);
        brand_box.set_hexpand(true);
        brand_box.append(&brand);
        brand_box.append(&tagline);

        let filter_bar = GtkBox::new(Orientation::Horizontal, 4);
        filter_bar.add_css_class("filter-bar");
        filter_bar.set_valign(Align::Center);

        let count_label = Label::new(None);
        count_label.add_css_class("count-label");
        count_label.set_valign(Align::Center);
        count_label.set_margin_start(16);

        let header = GtkBox::new(Orientation::Horizontal, 12);
        header.add_css_class("header");
        header.set_margin_start(24);
        header.set_margin_end(24);
        header.set_margin_top(16);
        header.set_margin_bottom(24);
        header.append(&brand_box);
        header.append(&filter_bar);
        header.append(&count_label);

        let grid = PhotoGrid::new(config.layout());

        let page = GtkBox::new(Orientation::Vertical, 0);
        page.append(&header);
        page.append(grid.widget());

        let lightbox = LightboxView::new();
        let root = Overlay::new();
        root.set_child(Some(&page));
        root.add_overlay(&lightbox.widget());
        window.set_child(Some(&root));

        let previews =
            match PreviewQueue::new(config.previews.workers, PreviewCache::new(config.previews.cache_mb)) {
                Ok(queue) => Some(queue),
                Err(err) => {
                    tracing::warn!(error = ?err, "Failed to start preview workers");
                    None
                }
            };

        let gallery = GalleryView::new(catalog, config.gallery_options(), grid.scroll_surface());

        let main_window = Rc::new(Self {
            window,
            gallery: RefCell::new(gallery),
            grid,
            lightbox,
            keys: LightboxKeys::new(),
            filter_bar,
            filter_buttons: RefCell::new(Vec::new()),
            count_label,
            previews,
            max_edge: config.previews.max_edge,
            textures: RefCell::new(HashMap::new()),
            missing: RefCell::new(HashSet::new()),
        });

        main_window.build_filter_buttons();
        main_window.setup_callbacks();
        main_window.setup_preview_results();
        main_window.refresh_grid();

        main_window
    }

    pub fn present(&self) {
        self.window.present();
    }

    fn build_filter_buttons(self: &Rc<Self>) {
        let categories = self.gallery.borrow().categories().to_vec();
        let mut buttons = self.filter_buttons.borrow_mut();
        for filter in categories {
            let button = Button::with_label(&filter.label().to_uppercase());
            button.add_css_class("filter-button");
            self.filter_bar.append(&button);

            let window_weak = Rc::downgrade(self);
            let selected = filter.clone();
            button.connect_clicked(move |_| {
                if let Some(window) = window_weak.upgrade() {
                    window.select_filter(selected.clone());
                }
            });
            buttons.push((filter, button));
        }
    }

    fn setup_callbacks(self: &Rc<Self>) {
        let window_weak = Rc::downgrade(self);
        self.grid.connect_tile_activated(move |position| {
            if let Some(window) = window_weak.upgrade() {
                let opened = window.gallery.borrow_mut().activate(position);
                if opened {
                    window.sync_lightbox();
                }
            }
        });

        let window_weak = Rc::downgrade(self);
        self.lightbox.connect_close(move |reason| {
            if let Some(window) = window_weak.upgrade() {
                window.gallery.borrow_mut().close(reason);
                window.sync_lightbox();
            }
        });

        let window_weak = Rc::downgrade(self);
        self.lightbox.connect_next(move || {
            if let Some(window) = window_weak.upgrade() {
                window.gallery.borrow_mut().next();
                window.sync_lightbox();
            }
        });

        let window_weak = Rc::downgrade(self);
        self.lightbox.connect_prev(move || {
            if let Some(window) = window_weak.upgrade() {
                window.gallery.borrow_mut().prev();
                window.sync_lightbox();
            }
        });

        let window_weak = Rc::downgrade(self);
        self.lightbox.connect_drag_begin(move |x, y| {
            if let Some(window) = window_weak.upgrade() {
                window.gallery.borrow_mut().begin_drag(x, y);
            }
        });

        let window_weak = Rc::downgrade(self);
        self.lightbox.connect_drag_update(move |x, y| {
            window_weak
                .upgrade()
                .is_some_and(|window| window.gallery.borrow_mut().update_drag(x, y))
        });

        let window_weak = Rc::downgrade(self);
        self.lightbox.connect_drag_end(move |x, y| {
            if let Some(window) = window_weak.upgrade() {
                let moved = window.gallery.borrow_mut().end_drag(x, y);
                if moved.is_some() {
                    window.sync_lightbox();
                }
            }
        });

        let window_weak = Rc::downgrade(self);
        self.keys.connect_key(move |key| {
            let Some(window) = window_weak.upgrade() else {
                return false;
            };
            let handled = window.gallery.borrow_mut().handle_key(key);
            if handled {
                window.sync_lightbox();
            }
            handled
        });

        // Closing the window unmounts the gallery, which releases the scroll
        // lock and detaches the lightbox keys.
        let window_weak = Rc::downgrade(self);
        self.window.connect_close_request(move |_| {
            if let Some(window) = window_weak.upgrade() {
                window.gallery.borrow_mut().unmount();
                window.sync_lightbox();
            }
            glib::Propagation::Proceed
        });
    }

    fn setup_preview_results(self: &Rc<Self>) {
        let Some(queue) = self.previews.as_ref() else {
            return;
        };
        let receiver = queue.results();
        let window_weak = Rc::downgrade(self);
        glib::spawn_future_local(async move {
            while let Ok(result) = receiver.recv().await {
                if let Some(window) = window_weak.upgrade() {
                    window.handle_preview_result(result);
                } else {
                    break;
                }
            }
        });
    }

    fn select_filter(&self, filter: CategoryFilter) {
        let changed = self.gallery.borrow_mut().select_filter(filter);
        match changed {
            Ok(true) => {
                self.refresh_grid();
                self.sync_lightbox();
            }
            Ok(false) => {}
            Err(err) => tracing::warn!(error = %err, "Filter rejected"),
        }
    }

    /// Rebuilds tiles, the counter and the filter highlight from the gallery.
    fn refresh_grid(&self) {
        let gallery = self.gallery.borrow();
        let photos = gallery.displayed();
        self.grid.set_photos(&photos, gallery.is_detailed());
        self.count_label.set_label(&gallery.count_label().to_uppercase());

        for (filter, button) in self.filter_buttons.borrow().iter() {
            if filter == gallery.filter() {
                button.add_css_class("active");
            } else {
                button.remove_css_class("active");
            }
        }

        let textures = self.textures.borrow();
        let missing = self.missing.borrow();
        for photo in &photos {
            if let Some(texture) = textures.get(&photo.src) {
                self.grid.set_texture(&photo.src, texture);
            } else if missing.contains(&photo.src) {
                self.grid.set_missing(&photo.src);
            } else {
                self.request_preview(&photo.src);
            }
        }
    }

    /// Shows or hides the lightbox to match the gallery state.
    fn sync_lightbox(&self) {
        let gallery = self.gallery.borrow();
        match (gallery.open_photo(), gallery.position_label()) {
            (Some(photo), Some(position)) => {
                let textures = self.textures.borrow();
                let texture = textures.get(&photo.src);
                self.lightbox.show_photo(photo, &position, texture);
                if texture.is_none() && self.missing.borrow().contains(&photo.src) {
                    self.lightbox.set_missing();
                }
                self.keys.attach(&self.window);
            }
            _ => {
                self.lightbox.hide();
                self.keys.detach();
            }
        }
    }

    fn request_preview(&self, src: &Path) {
        if let Some(queue) = self.previews.as_ref() {
            queue.request(PreviewRequest::new(src, self.max_edge));
        }
    }

    fn handle_preview_result(&self, result: PreviewResult) {
        let src = result.key.path;
        let texture = result.preview.as_deref().and_then(texture_from_preview);

        let open_src = self
            .gallery
            .borrow()
            .open_photo()
            .map(|photo| photo.src.clone());
        let is_open = open_src.as_deref() == Some(src.as_path());

        match texture {
            Some(texture) => {
                self.grid.set_texture(&src, &texture);
                if is_open {
                    self.lightbox.set_texture(Some(&texture));
                }
                self.textures.borrow_mut().insert(src, texture);
            }
            None => {
                tracing::warn!(path = ?src, error = ?result.error, "Showing placeholder");
                self.grid.set_missing(&src);
                if is_open {
                    self.lightbox.set_missing();
                }
                self.missing.borrow_mut().insert(src);
            }
        }
    }
}
