// Photo grid for the gallery page
// Tiles are placed absolutely in a Fixed according to SpanGridLayout and
// re-placed whenever the viewport width changes.

use gdk4::Texture;
use gtk4::prelude::*;
use gtk4::{
    Align, Box as GtkBox, ContentFit, Fixed, GestureClick, Label, Orientation, Overlay, Picture,
    PolicyType, ScrolledWindow,
};
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::gallery::{ordinal_label, ScrollSurface};
use crate::layout::SpanGridLayout;
use crate::models::Photo;

/// Space under each image for title, category and ordinal.
const CAPTION_HEIGHT: f32 = 96.0;
/// Extra space for the description in detailed mode.
const DETAIL_HEIGHT: f32 = 72.0;
/// Horizontal padding around the grid.
const GRID_MARGIN: i32 = 24;

/// Callback type for tile activation (position in the displayed list)
pub type TileActivatedCallback = Box<dyn Fn(usize)>;

/// Scrolling of the grid page, switched off while the lightbox is open.
#[derive(Clone)]
pub struct GridScrollSurface(ScrolledWindow);

impl ScrollSurface for GridScrollSurface {
    fn set_scroll_locked(&self, locked: bool) {
        let policy = if locked {
            PolicyType::External
        } else {
            PolicyType::Automatic
        };
        self.0.set_vscrollbar_policy(policy);
        self.0.set_can_target(!locked);
    }
}

struct Tile {
    root: GtkBox,
    picture: Picture,
    placeholder: Label,
    src: PathBuf,
}

pub struct PhotoGrid {
    scrolled: ScrolledWindow,
    fixed: Fixed,
    layout: SpanGridLayout,
    tiles: RefCell<Vec<Tile>>,
    photos: RefCell<Vec<Photo>>,
    detailed: Cell<bool>,
    last_width: Cell<i32>,
    on_activated: Rc<RefCell<Option<TileActivatedCallback>>>,
}

impl PhotoGrid {
    pub fn new(layout: SpanGridLayout) -> Rc<Self> {
        let fixed = Fixed::new();
        fixed.add_css_class("photo-grid");
        fixed.set_margin_start(GRID_MARGIN);
        fixed.set_margin_end(GRID_MARGIN);

        let scrolled = ScrolledWindow::builder()
            .hscrollbar_policy(PolicyType::Never)
            .vscrollbar_policy(PolicyType::Automatic)
            .vexpand(true)
            .hexpand(true)
            .child(&fixed)
            .build();

        let grid = Rc::new(Self {
            scrolled,
            fixed,
            layout,
            tiles: RefCell::new(Vec::new()),
            photos: RefCell::new(Vec::new()),
            detailed: Cell::new(false),
            last_width: Cell::new(0),
            on_activated: Rc::new(RefCell::new(None)),
        });

        // The horizontal page size tracks the viewport width.
        let grid_weak = Rc::downgrade(&grid);
        grid.scrolled
            .hadjustment()
            .connect_page_size_notify(move |adjustment| {
                if let Some(grid) = grid_weak.upgrade() {
                    let width = adjustment.page_size() as i32 - 2 * GRID_MARGIN;
                    if width > 0 && width != grid.last_width.get() {
                        grid.last_width.set(width);
                        grid.relayout();
                    }
                }
            });

        grid
    }

    pub fn widget(&self) -> &ScrolledWindow {
        &self.scrolled
    }

    pub fn scroll_surface(&self) -> GridScrollSurface {
        GridScrollSurface(self.scrolled.clone())
    }

    pub fn connect_tile_activated<F>(&self, callback: F)
    where
        F: Fn(usize) + 'static,
    {
        *self.on_activated.borrow_mut() = Some(Box::new(callback));
    }

    /// Replaces all tiles with the displayed photos.
    pub fn set_photos(&self, photos: &[&Photo], detailed: bool) {
        for tile in self.tiles.borrow_mut().drain(..) {
            self.fixed.remove(&tile.root);
        }

        let tiles: Vec<Tile> = photos
            .iter()
            .enumerate()
            .map(|(position, photo)| self.create_tile(position, photo, detailed))
            .collect();
        for tile in &tiles {
            self.fixed.put(&tile.root, 0.0, 0.0);
        }

        *self.tiles.borrow_mut() = tiles;
        *self.photos.borrow_mut() = photos.iter().map(|p| (*p).clone()).collect();
        self.detailed.set(detailed);
        self.scrolled.vadjustment().set_value(0.0);
        self.relayout();
    }

    /// Shows a decoded preview on every tile for `src`.
    pub fn set_texture(&self, src: &Path, texture: &Texture) {
        for tile in self.tiles.borrow().iter().filter(|t| t.src == src) {
            tile.picture.set_paintable(Some(texture));
            tile.placeholder.set_visible(false);
        }
    }

    /// Marks tiles for `src` as unavailable.
    pub fn set_missing(&self, src: &Path) {
        for tile in self.tiles.borrow().iter().filter(|t| t.src == src) {
            tile.placeholder.set_label("Image unavailable");
            tile.placeholder.set_visible(true);
        }
    }

    fn relayout(&self) {
        let width = self.last_width.get();
        if width <= 0 {
            return;
        }
        let photos = self.photos.borrow();
        let refs: Vec<&Photo> = photos.iter().collect();
        let rows = self.layout.compute(&refs, width as f32);

        let mut caption = CAPTION_HEIGHT;
        if self.detailed.get() {
            caption += DETAIL_HEIGHT;
        }

        let tiles = self.tiles.borrow();
        let mut y = 0.0f32;
        for row in &rows {
            for item in &row.items {
                if let Some(tile) = tiles.get(item.position) {
                    tile.root
                        .set_size_request(item.width as i32, (item.height + caption) as i32);
                    tile.picture.set_size_request(item.width as i32, item.height as i32);
                    self.fixed.move_(&tile.root, item.x as f64, y as f64);
                }
            }
            y += row.height_px + caption + self.layout.gap;
        }
        self.fixed.set_size_request(width, y.max(0.0) as i32);
        tracing::debug!(width, rows = rows.len(), "Grid laid out");
    }

    fn create_tile(&self, position: usize, photo: &Photo, detailed: bool) -> Tile {
        let picture = Picture::new();
        picture.set_can_shrink(true);
        picture.set_content_fit(ContentFit::Cover);
        picture.add_css_class("tile-image");

        let placeholder = Label::new(None);
        placeholder.add_css_class("placeholder");
        placeholder.set_halign(Align::Center);
        placeholder.set_valign(Align::Center);
        placeholder.set_visible(false);

        let hover = Label::new(Some("View Project"));
        hover.add_css_class("view-project");
        hover.set_halign(Align::Center);
        hover.set_valign(Align::Center);

        let overlay = Overlay::new();
        overlay.set_child(Some(&picture));
        overlay.add_overlay(&placeholder);
        overlay.add_overlay(&hover);
        overlay.add_css_class("tile-frame");

        let title = Label::new(Some(&photo.title));
        title.set_halign(Align::Start);
        title.add_css_class("tile-title");

        let category = Label::new(Some(&photo.category.to_uppercase()));
        category.set_halign(Align::Start);
        category.add_css_class("tile-category");

        let text = GtkBox::new(Orientation::Vertical, 4);
        text.set_hexpand(true);
        text.append(&title);
        text.append(&category);

        let ordinal = Label::new(Some(&ordinal_label(position)));
        ordinal.set_valign(Align::End);
        ordinal.add_css_class("tile-ordinal");

        let caption = GtkBox::new(Orientation::Horizontal, 8);
        caption.add_css_class("tile-caption");
        caption.append(&text);
        caption.append(&ordinal);

        let root = GtkBox::new(Orientation::Vertical, 0);
        root.add_css_class("tile");
        root.append(&overlay);
        root.append(&caption);

        if detailed {
            let description = Label::new(Some(&photo.description));
            description.set_wrap(true);
            description.set_xalign(0.0);
            description.set_max_width_chars(48);
            description.add_css_class("tile-description");
            root.append(&description);
        }

        let on_activated = self.on_activated.clone();
        let click = GestureClick::new();
        click.set_button(1);
        click.connect_released(move |_, _n, _x, _y| {
            if let Some(ref callback) = *on_activated.borrow() {
                callback(position);
            }
        });
        overlay.add_controller(click);

        Tile {
            root,
            picture,
            placeholder,
            src: photo.src.clone(),
        }
    }
}
