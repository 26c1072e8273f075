//! Photo catalog loading and validation.
//!
//! The catalog is the only data input of the gallery. It is a TOML file with
//! an optional header and one `[[photos]]` table per photo:
//!
//! ```toml
//! title = "Telos"
//! tagline = "Archival Portfolio"
//!
//! [[photos]]
//! id = 1
//! src = "minimal-architecture.png"
//! title = "Stillness"
//! category = "Architecture"
//! span = 2
//! description = "A study on the interplay between concrete forms and morning shadows."
//! width = 1600
//! height = 1000
//! ```
//!
//! Records are validated up front so that rendering never sees a malformed
//! photo: missing fields, empty strings, zero dimensions, duplicate ids and
//! out-of-range spans are all rejected here.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::CatalogError;
use crate::models::{LayoutSpan, Photo, PhotoId, MAX_SPAN};

const BUILTIN_CATALOG: &str = include_str!("../../assets/catalog.toml");

/// Environment variable pointing at an installed asset directory.
pub const DATA_DIR_ENV: &str = "TELOS_DATA_DIR";

/// Subdirectory of an asset directory holding the shipped photos.
const PHOTOS_DIR: &str = "photos";

/// Relative aspect-ratio difference tolerated before a photo is reported.
const ASPECT_TOLERANCE: f32 = 0.01;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default = "default_title")]
    title: String,
    #[serde(default)]
    tagline: String,
    #[serde(default)]
    photos: Vec<PhotoRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PhotoRecord {
    id: PhotoId,
    src: PathBuf,
    title: String,
    category: String,
    #[serde(default = "default_span")]
    span: u8,
    #[serde(default)]
    description: String,
    width: u32,
    height: u32,
}

fn default_title() -> String {
    "Telos".to_string()
}

fn default_span() -> u8 {
    1
}

/// Declared dimensions that disagree with the image on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionMismatch {
    pub id: PhotoId,
    pub declared: (u32, u32),
    pub actual: (u32, u32),
}

/// Validated, immutable photo list plus brand header.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub title: String,
    pub tagline: String,
    photos: Vec<Photo>,
}

impl Catalog {
    /// Loads a catalog file; `src` paths resolve against its directory.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let catalog = Self::from_toml_str(&content, base_dir)?;
        info!(
            "Loaded catalog {:?} with {} photos",
            path,
            catalog.photos.len()
        );
        Ok(catalog)
    }

    /// The catalog shipped with the application.
    ///
    /// Its photos are looked up at run time, see [`asset_dir_candidates`].
    /// Without any installed assets the photos render as placeholders.
    pub fn builtin() -> Result<Self, CatalogError> {
        let candidates = asset_dir_candidates();
        let base_dir = match resolve_asset_dir(candidates.iter().cloned()) {
            Some(dir) => dir,
            None => {
                warn!(?candidates, "No installed photo assets found");
                candidates
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| PathBuf::from("assets"))
            }
        };
        debug!(?base_dir, "Resolved built-in asset directory");
        Self::from_toml_str(BUILTIN_CATALOG, &base_dir)
    }

    pub fn from_toml_str(content: &str, base_dir: &Path) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(content)?;
        let photos = file
            .photos
            .into_iter()
            .map(|record| record.into_photo(base_dir))
            .collect::<Result<Vec<_>, _>>()?;

        let mut catalog = Self::from_photos(photos)?;
        catalog.title = file.title;
        catalog.tagline = file.tagline;
        Ok(catalog)
    }

    /// Builds a catalog from already-typed photos, checking id uniqueness
    /// and dimensions.
    pub fn from_photos(photos: Vec<Photo>) -> Result<Self, CatalogError> {
        if photos.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::with_capacity(photos.len());
        for photo in &photos {
            if !seen.insert(photo.id) {
                return Err(CatalogError::DuplicateId(photo.id));
            }
            if photo.width == 0 || photo.height == 0 {
                return Err(CatalogError::InvalidDimensions {
                    id: photo.id,
                    width: photo.width,
                    height: photo.height,
                });
            }
        }

        debug!(count = photos.len(), "Catalog validated");
        Ok(Self {
            title: default_title(),
            tagline: String::new(),
            photos,
        })
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn get(&self, id: PhotoId) -> Option<&Photo> {
        self.photos.iter().find(|photo| photo.id == id)
    }

    /// Compares declared dimensions against image headers on disk.
    ///
    /// Unreadable files are skipped (they render as placeholders); only
    /// readable images whose aspect ratio disagrees are returned.
    pub fn verify_dimensions(&self) -> Vec<DimensionMismatch> {
        let mut mismatches = Vec::new();
        for photo in &self.photos {
            let actual = match crate::image_loader::read_dimensions(&photo.src) {
                Ok(dims) => dims,
                Err(err) => {
                    warn!(id = %photo.id, error = ?err, "Photo source not readable");
                    continue;
                }
            };
            if actual.0 == 0 || actual.1 == 0 {
                continue;
            }
            let actual_ratio = actual.0 as f32 / actual.1 as f32;
            let drift = (actual_ratio - photo.aspect_ratio()).abs() / actual_ratio;
            if drift > ASPECT_TOLERANCE {
                warn!(
                    id = %photo.id,
                    declared_w = photo.width,
                    declared_h = photo.height,
                    actual_w = actual.0,
                    actual_h = actual.1,
                    "Declared dimensions disagree with image"
                );
                mismatches.push(DimensionMismatch {
                    id: photo.id,
                    declared: (photo.width, photo.height),
                    actual,
                });
            }
        }
        mismatches
    }
}

/// Directories searched for the built-in photos, in order: `TELOS_DATA_DIR`,
/// the platform data directory, `assets` and `../share/telos` next to the
/// executable, then the source tree for development builds.
pub fn asset_dir_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        candidates.push(PathBuf::from(dir));
    }
    if let Some(dirs) = ProjectDirs::from("", "", "telos") {
        candidates.push(dirs.data_dir().to_path_buf());
    }
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(exe_dir.join("assets"));
        candidates.push(exe_dir.join("../share/telos"));
    }
    candidates.push(PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/assets")));
    candidates
}

/// First candidate that contains a `photos` directory.
pub fn resolve_asset_dir<I>(candidates: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    candidates
        .into_iter()
        .find(|dir| dir.join(PHOTOS_DIR).is_dir())
}

impl PhotoRecord {
    fn into_photo(self, base_dir: &Path) -> Result<Photo, CatalogError> {
        let id = self.id;
        let required = [
            ("title", &self.title),
            ("category", &self.category),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(CatalogError::EmptyField { id, field });
            }
        }
        if self.src.as_os_str().is_empty() {
            return Err(CatalogError::EmptyField { id, field: "src" });
        }
        let span = LayoutSpan::new(self.span).ok_or(CatalogError::InvalidSpan {
            id,
            span: self.span,
            max: MAX_SPAN,
        })?;

        let src = if self.src.is_absolute() {
            self.src
        } else {
            base_dir.join(self.src)
        };

        Ok(Photo {
            id,
            src,
            title: self.title.trim().to_string(),
            category: self.category.trim().to_string(),
            span,
            description: self.description.trim().to_string(),
            width: self.width,
            height: self.height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::tempdir;

    const TWO_PHOTOS: &str = r#"
        title = "Studio"

        [[photos]]
        id = 1
        src = "a.png"
        title = "Stillness"
        category = "Architecture"
        span = 2
        description = "Concrete and shadow."
        width = 40
        height = 20

        [[photos]]
        id = 2
        src = "/abs/b.png"
        title = "The Reach"
        category = "Nature"
        width = 30
        height = 30
    "#;

    #[test]
    fn test_parse_resolves_paths_and_defaults() {
        let catalog = Catalog::from_toml_str(TWO_PHOTOS, Path::new("/site")).unwrap();
        assert_eq!(catalog.title, "Studio");
        assert_eq!(catalog.len(), 2);

        let first = &catalog.photos()[0];
        assert_eq!(first.src, PathBuf::from("/site/a.png"));
        assert_eq!(first.span.columns(), 2);

        let second = catalog.get(PhotoId(2)).unwrap();
        assert_eq!(second.src, PathBuf::from("/abs/b.png"));
        assert_eq!(second.span, LayoutSpan::SINGLE);
        assert!(second.description.is_empty());
    }

    #[test]
    fn test_missing_required_field_rejected() {
        let toml = r#"
            [[photos]]
            id = 1
            src = "a.png"
            category = "Nature"
            width = 10
            height = 10
        "#;
        let err = Catalog::from_toml_str(toml, Path::new(".")).unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let toml = r#"
            [[photos]]
            id = 1
            src = "a.png"
            title = "A"
            category = "Nature"
            width = 10
            height = 10
            colour = "red"
        "#;
        assert!(Catalog::from_toml_str(toml, Path::new(".")).is_err());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let toml = r#"
            [[photos]]
            id = 7
            src = "a.png"
            title = "A"
            category = "X"
            width = 10
            height = 10

            [[photos]]
            id = 7
            src = "b.png"
            title = "B"
            category = "Y"
            width = 10
            height = 10
        "#;
        let err = Catalog::from_toml_str(toml, Path::new(".")).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(PhotoId(7))));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let toml = r#"
            [[photos]]
            id = 1
            src = "a.png"
            title = "A"
            category = "X"
            width = 0
            height = 10
        "#;
        let err = Catalog::from_toml_str(toml, Path::new(".")).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidDimensions { .. }));
    }

    #[test]
    fn test_blank_title_and_bad_span_rejected() {
        let blank = r#"
            [[photos]]
            id = 1
            src = "a.png"
            title = "   "
            category = "X"
            width = 10
            height = 10
        "#;
        assert!(matches!(
            Catalog::from_toml_str(blank, Path::new(".")).unwrap_err(),
            CatalogError::EmptyField { field: "title", .. }
        ));

        let wide = r#"
            [[photos]]
            id = 1
            src = "a.png"
            title = "A"
            category = "X"
            span = 4
            width = 10
            height = 10
        "#;
        assert!(matches!(
            Catalog::from_toml_str(wide, Path::new(".")).unwrap_err(),
            CatalogError::InvalidSpan { span: 4, .. }
        ));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let err = Catalog::from_toml_str("title = \"Empty\"", Path::new(".")).unwrap_err();
        assert!(matches!(err, CatalogError::Empty));
    }

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.title, "Telos");
        assert!(catalog.len() >= 5);
    }

    #[test]
    fn test_builtin_photos_ship_with_matching_dimensions() {
        let catalog = Catalog::builtin().unwrap();
        for photo in catalog.photos() {
            assert!(photo.src.is_file(), "missing {:?}", photo.src);
        }
        assert!(catalog.verify_dimensions().is_empty());
    }

    #[test]
    fn test_asset_dir_resolution_skips_dirs_without_photos() {
        let empty = tempdir().unwrap();
        let installed = tempdir().unwrap();
        std::fs::create_dir(installed.path().join("photos")).unwrap();

        let found = resolve_asset_dir([
            empty.path().join("missing"),
            empty.path().to_path_buf(),
            installed.path().to_path_buf(),
        ]);
        assert_eq!(found.as_deref(), Some(installed.path()));
        assert_eq!(resolve_asset_dir([empty.path().to_path_buf()]), None);
    }

    #[test]
    fn test_asset_dir_candidates_end_with_source_tree() {
        let candidates = asset_dir_candidates();
        let last = candidates.last().unwrap();
        assert!(last.ends_with("assets"));
        assert!(candidates.len() >= 2);
    }

    #[test]
    fn test_load_from_disk_and_verify_dimensions() {
        let dir = tempdir().unwrap();
        RgbImage::from_pixel(40, 20, Rgb([0, 0, 0]))
            .save(dir.path().join("a.png"))
            .unwrap();
        // b.png does not exist and must be skipped, not reported
        let path = dir.path().join("catalog.toml");
        std::fs::write(&path, TWO_PHOTOS.replace("/abs/b.png", "b.png")).unwrap();

        let catalog = Catalog::load(&path).unwrap();
        assert!(catalog.verify_dimensions().is_empty());

        // Declare 40x40 for a 40x20 image
        let skewed = TWO_PHOTOS
            .replace("/abs/b.png", "b.png")
            .replacen("height = 20", "height = 40", 1);
        std::fs::write(&path, skewed).unwrap();
        let catalog = Catalog::load(&path).unwrap();
        let mismatches = catalog.verify_dimensions();
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].id, PhotoId(1));
        assert_eq!(mismatches[0].actual, (40, 20));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Catalog::load(Path::new("/nonexistent/catalog.toml")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
