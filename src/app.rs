use std::path::Path;

use anyhow::{Context, Result};
use gtk4::prelude::*;
use gtk4::{gio, Application};
use tracing::{error, info, warn};

use telos::config::AppConfig;
use telos::models::Catalog;
use telos::ui::MainWindow;

const APP_ID: &str = "io.telos.Portfolio";

pub struct TelosApp {
    app: Application,
}

impl TelosApp {
    pub fn new() -> Self {
        let app = Application::builder()
            .application_id(APP_ID)
            .flags(gio::ApplicationFlags::HANDLES_OPEN)
            .build();

        app.connect_activate(Self::on_activate);
        app.connect_open(Self::on_open);

        Self { app }
    }

    pub fn run(&self) -> i32 {
        self.app.run().into()
    }

    fn on_activate(app: &Application) {
        Self::show(app, None);
    }

    fn on_open(app: &Application, files: &[gio::File], _hint: &str) {
        let path = files.first().and_then(|f| f.path());
        Self::show(app, path.as_deref());
    }

    fn show(app: &Application, catalog_path: Option<&Path>) {
        let config = load_config();
        let catalog = match load_catalog(catalog_path) {
            Ok(catalog) => catalog,
            Err(err) => {
                error!(error = ?err, "Failed to load catalog");
                app.quit();
                return;
            }
        };

        let window = MainWindow::new(app, catalog, &config);
        window.present();
        // Keep the window alive by storing it on the Application.
        unsafe {
            app.set_data("main-window", window);
        }
    }
}

impl Default for TelosApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Loads the user config, falling back to defaults when it is unusable.
fn load_config() -> AppConfig {
    match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            warn!(error = %err, "Invalid config, using defaults");
            AppConfig::default()
        }
    }
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    let catalog = match path {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("Failed to load catalog: {:?}", path))?,
        None => Catalog::builtin().context("Failed to load built-in catalog")?,
    };
    info!(title = %catalog.title, photos = catalog.len(), "Gallery ready");

    let mismatches = catalog.verify_dimensions();
    if !mismatches.is_empty() {
        warn!(count = mismatches.len(), "Catalog dimensions disagree with image files");
    }
    Ok(catalog)
}
