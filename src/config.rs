//! User configuration loaded from `config.toml`.
//!
//! Every key is optional; a missing file yields the defaults. The file lives
//! in the platform config directory unless `TELOS_CONFIG` points elsewhere.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::gallery::{GalleryOptions, DEFAULT_SWIPE_THRESHOLD_PX};
use crate::layout::SpanGridLayout;

const CONFIG_FILE: &str = "config.toml";

/// Largest accepted preview cache, in megabytes.
pub const MAX_CACHE_MB: usize = 4096;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "TELOS_CONFIG";

/// Environment variable holding log filter directives.
pub const LOG_ENV: &str = "TELOS_LOG";

/// Filter used when neither `TELOS_LOG` nor `RUST_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "telos=info";

/// Chooses log filter directives: `TELOS_LOG` first, then `RUST_LOG`, then
/// [`DEFAULT_LOG_FILTER`]. Blank values count as unset.
pub fn log_filter_directives(telos_log: Option<String>, rust_log: Option<String>) -> String {
    [telos_log, rust_log]
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub gallery: GallerySection,
    pub lightbox: LightboxSection,
    pub previews: PreviewSection,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GallerySection {
    pub columns: u32,
    pub detailed: bool,
    pub limit: Option<usize>,
    pub row_height: f32,
    pub gap: f32,
    pub compact_breakpoint: f32,
}

impl Default for GallerySection {
    fn default() -> Self {
        let layout = SpanGridLayout::default();
        Self {
            columns: layout.columns,
            detailed: false,
            limit: None,
            row_height: layout.row_height,
            gap: layout.gap,
            compact_breakpoint: layout.compact_breakpoint,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LightboxSection {
    pub swipe_threshold_px: f64,
}

impl Default for LightboxSection {
    fn default() -> Self {
        Self {
            swipe_threshold_px: DEFAULT_SWIPE_THRESHOLD_PX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewSection {
    pub workers: usize,
    pub cache_mb: usize,
    /// Longest edge of decoded previews in pixels
    pub max_edge: u32,
}

impl Default for PreviewSection {
    fn default() -> Self {
        Self {
            workers: 2,
            cache_mb: 256,
            max_edge: 1600,
        }
    }
}

impl AppConfig {
    /// Loads the config from `TELOS_CONFIG` or the platform config directory.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_from_path(&path),
            None => {
                debug!("No config directory available, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        ProjectDirs::from("", "", "telos").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Loads from `path`; a missing file yields the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(?path, "Config file not found, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config = Self::from_toml_str(&content)?;
        info!(?path, "Loaded config");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.gallery;
        if g.columns == 0 {
            return Err(invalid("gallery.columns", "must be at least 1"));
        }
        if g.limit == Some(0) {
            return Err(invalid("gallery.limit", "must be at least 1 when set"));
        }
        if !(g.row_height.is_finite() && g.row_height > 0.0) {
            return Err(invalid("gallery.row_height", "must be positive"));
        }
        if !(g.gap.is_finite() && g.gap >= 0.0) {
            return Err(invalid("gallery.gap", "must not be negative"));
        }
        if !(g.compact_breakpoint.is_finite() && g.compact_breakpoint >= 0.0) {
            return Err(invalid("gallery.compact_breakpoint", "must not be negative"));
        }
        let threshold = self.lightbox.swipe_threshold_px;
        if !(threshold.is_finite() && threshold > 0.0) {
            return Err(invalid("lightbox.swipe_threshold_px", "must be positive"));
        }
        if self.previews.workers == 0 {
            return Err(invalid("previews.workers", "must be at least 1"));
        }
        if !(1..=MAX_CACHE_MB).contains(&self.previews.cache_mb) {
            return Err(ConfigError::Invalid {
                key: "previews.cache_mb",
                reason: format!("must be between 1 and {}", MAX_CACHE_MB),
            });
        }
        if self.previews.max_edge < 16 {
            return Err(invalid("previews.max_edge", "must be at least 16"));
        }
        Ok(())
    }

    pub fn layout(&self) -> SpanGridLayout {
        SpanGridLayout {
            columns: self.gallery.columns,
            gap: self.gallery.gap,
            row_height: self.gallery.row_height,
            compact_breakpoint: self.gallery.compact_breakpoint,
        }
    }

    pub fn gallery_options(&self) -> GalleryOptions {
        GalleryOptions {
            detailed: self.gallery.detailed,
            limit: self.gallery.limit,
            swipe_threshold_px: Some(self.lightbox.swipe_threshold_px),
        }
    }
}

fn invalid(key: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_log_filter_precedence() {
        let some = |s: &str| Some(s.to_string());
        assert_eq!(log_filter_directives(None, None), "telos=info");
        assert_eq!(log_filter_directives(some("telos=warn"), None), "telos=warn");
        assert_eq!(log_filter_directives(None, some("debug")), "debug");
        assert_eq!(
            log_filter_directives(some("telos=trace"), some("error")),
            "telos=trace"
        );
        assert_eq!(log_filter_directives(some("  "), some("warn")), "warn");
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.gallery.columns, 3);
        assert!(!config.gallery.detailed);
        assert_eq!(config.gallery.limit, None);
        assert_eq!(config.lightbox.swipe_threshold_px, 50.0);
        assert_eq!(config.previews.workers, 2);
        assert_eq!(config.previews.cache_mb, 256);
        assert_eq!(config.previews.max_edge, 1600);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [gallery]
            detailed = true
            limit = 4

            [lightbox]
            swipe_threshold_px = 80.0
            "#,
        )
        .unwrap();
        assert!(config.gallery.detailed);
        assert_eq!(config.gallery.limit, Some(4));
        assert_eq!(config.gallery.columns, 3);
        assert_eq!(config.previews, PreviewSection::default());

        let options = config.gallery_options();
        assert_eq!(options.limit, Some(4));
        assert_eq!(options.swipe_threshold_px, Some(80.0));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load_from_path(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[gallery]\ncolumns = 2\ngap = 8.0\n").unwrap();

        let config = AppConfig::load_from_path(&path).unwrap();
        let layout = config.layout();
        assert_eq!(layout.columns, 2);
        assert_eq!(layout.gap, 8.0);
        assert_eq!(layout.row_height, 420.0);
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let err = AppConfig::from_toml_str("gallery = = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_unknown_key_is_error() {
        let err = AppConfig::from_toml_str("[gallery]\ncolumnz = 2\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        for (content, key) in [
            ("[gallery]\ncolumns = 0", "gallery.columns"),
            ("[gallery]\nlimit = 0", "gallery.limit"),
            ("[lightbox]\nswipe_threshold_px = -1.0", "lightbox.swipe_threshold_px"),
            ("[previews]\nworkers = 0", "previews.workers"),
            ("[previews]\ncache_mb = 0", "previews.cache_mb"),
            ("[previews]\ncache_mb = 18000000000000", "previews.cache_mb"),
        ] {
            match AppConfig::from_toml_str(content) {
                Err(ConfigError::Invalid { key: got, .. }) => assert_eq!(got, key),
                other => panic!("expected invalid {key}, got {other:?}"),
            }
        }
    }
}
