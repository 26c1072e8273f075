//! Category filtering of the catalog into the displayed list.

use std::fmt;

use crate::models::Photo;

/// Label of the catch-all filter.
pub const ALL_LABEL: &str = "All";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_LABEL,
            Self::Category(name) => name,
        }
    }

    pub fn matches(&self, photo: &Photo) -> bool {
        match self {
            Self::All => true,
            Self::Category(name) => photo.category == *name,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `All` followed by each distinct category in first-appearance order.
pub fn derive_categories(photos: &[Photo]) -> Vec<CategoryFilter> {
    let mut categories = vec![CategoryFilter::All];
    for photo in photos {
        let known = categories
            .iter()
            .any(|c| matches!(c, CategoryFilter::Category(name) if *name == photo.category));
        if !known {
            categories.push(CategoryFilter::Category(photo.category.clone()));
        }
    }
    categories
}

/// Catalog indices of the photos shown for `filter`, in catalog order,
/// truncated to `limit`.
pub fn displayed_indices(
    photos: &[Photo],
    filter: &CategoryFilter,
    limit: Option<usize>,
) -> Vec<usize> {
    photos
        .iter()
        .enumerate()
        .filter(|(_, photo)| filter.matches(photo))
        .map(|(index, _)| index)
        .take(limit.unwrap_or(usize::MAX))
        .collect()
}

/// "1 Image", "0 Images", "12 Images"
pub fn count_label(count: usize) -> String {
    if count == 1 {
        "1 Image".to_string()
    } else {
        format!("{} Images", count)
    }
}

/// Two-digit 1-based ordinal shown on grid tiles ("01", "02", ..., "10").
pub fn ordinal_label(position: usize) -> String {
    format!("{:02}", position + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LayoutSpan, PhotoId};
    use std::path::PathBuf;

    fn photo(id: u32, category: &str) -> Photo {
        Photo {
            id: PhotoId(id),
            src: PathBuf::from(format!("{}.jpg", id)),
            title: format!("Photo {}", id),
            category: category.into(),
            span: LayoutSpan::SINGLE,
            description: String::new(),
            width: 100,
            height: 100,
        }
    }

    fn sample() -> Vec<Photo> {
        vec![
            photo(1, "Architecture"),
            photo(2, "Nature"),
            photo(3, "Portrait"),
            photo(4, "Nature"),
            photo(5, "Architecture"),
        ]
    }

    #[test]
    fn test_categories_all_first_then_first_appearance() {
        let labels: Vec<String> = derive_categories(&sample())
            .iter()
            .map(|c| c.label().to_string())
            .collect();
        assert_eq!(labels, ["All", "Architecture", "Nature", "Portrait"]);
    }

    #[test]
    fn test_every_category_filters_exactly() {
        let photos = sample();
        for filter in derive_categories(&photos) {
            let shown = displayed_indices(&photos, &filter, None);
            match &filter {
                CategoryFilter::All => {
                    assert_eq!(shown, (0..photos.len()).collect::<Vec<_>>());
                }
                CategoryFilter::Category(name) => {
                    assert!(!shown.is_empty());
                    assert!(shown.iter().all(|&i| photos[i].category == *name));
                    let expected = photos.iter().filter(|p| p.category == *name).count();
                    assert_eq!(shown.len(), expected);
                }
            }
        }
    }

    #[test]
    fn test_filter_preserves_order() {
        let photos = sample();
        let shown = displayed_indices(
            &photos,
            &CategoryFilter::Category("Nature".into()),
            None,
        );
        assert_eq!(shown, vec![1, 3]);
    }

    #[test]
    fn test_limit_applies_after_filter() {
        let photos = sample();
        assert_eq!(displayed_indices(&photos, &CategoryFilter::All, Some(2)), vec![0, 1]);
        assert_eq!(
            displayed_indices(
                &photos,
                &CategoryFilter::Category("Architecture".into()),
                Some(1)
            ),
            vec![0]
        );
        assert!(displayed_indices(&photos, &CategoryFilter::All, Some(0)).is_empty());
    }

    #[test]
    fn test_unknown_category_matches_nothing() {
        let photos = sample();
        let shown = displayed_indices(&photos, &CategoryFilter::Category("Space".into()), None);
        assert!(shown.is_empty());
    }

    #[test]
    fn test_count_label_pluralization() {
        assert_eq!(count_label(0), "0 Images");
        assert_eq!(count_label(1), "1 Image");
        assert_eq!(count_label(2), "2 Images");
    }

    #[test]
    fn test_ordinal_label() {
        assert_eq!(ordinal_label(0), "01");
        assert_eq!(ordinal_label(9), "10");
    }
}
