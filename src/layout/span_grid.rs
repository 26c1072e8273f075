use crate::models::{Photo, RowItem, RowModel};

/// Aspect ratio of tiles in the single-column (compact) layout.
const COMPACT_ASPECT: f32 = 16.0 / 10.0;

/// Column grid where each photo covers `span` columns.
///
/// Items flow left-to-right in displayed order and wrap when the next tile
/// does not fit in the remaining columns. Below `compact_breakpoint` the grid
/// collapses to a single column of 16:10 tiles.
#[derive(Debug, Clone)]
pub struct SpanGridLayout {
    /// Column count in the wide layout (default: 3)
    pub columns: u32,
    /// Gap between columns and rows in pixels (default: 24)
    pub gap: f32,
    /// Row height in the wide layout in pixels (default: 420)
    pub row_height: f32,
    /// Viewport width under which the compact layout is used (default: 768)
    pub compact_breakpoint: f32,
}

impl Default for SpanGridLayout {
    fn default() -> Self {
        Self {
            columns: 3,
            gap: 24.0,
            row_height: 420.0,
            compact_breakpoint: 768.0,
        }
    }
}

impl SpanGridLayout {
    pub fn is_compact(&self, viewport_width: f32) -> bool {
        viewport_width < self.compact_breakpoint || self.columns <= 1
    }

    fn column_width(&self, viewport_width: f32, columns: u32) -> f32 {
        let gaps = self.gap * columns.saturating_sub(1) as f32;
        ((viewport_width - gaps) / columns as f32).max(1.0)
    }

    fn span_width(&self, column_width: f32, span: u32) -> f32 {
        column_width * span as f32 + self.gap * span.saturating_sub(1) as f32
    }

    /// Lays out the displayed photos for a viewport width.
    ///
    /// Returns one `RowModel` per visual row; `RowItem::position` indexes
    /// into `photos`.
    pub fn compute(&self, photos: &[&Photo], viewport_width: f32) -> Vec<RowModel> {
        if photos.is_empty() || !viewport_width.is_finite() || viewport_width <= 0.0 {
            return Vec::new();
        }

        if self.is_compact(viewport_width) {
            let height = (viewport_width / COMPACT_ASPECT).max(1.0);
            return photos
                .iter()
                .enumerate()
                .map(|(position, _)| {
                    RowModel::new(
                        position as u32,
                        height,
                        vec![RowItem {
                            position,
                            x: 0.0,
                            width: viewport_width,
                            height,
                            span: 1,
                        }],
                    )
                })
                .collect();
        }

        let columns = self.columns.max(1);
        let column_width = self.column_width(viewport_width, columns);
        let row_height = self.row_height.max(1.0);

        let mut rows = Vec::new();
        let mut row_index = 0u32;
        let mut pending: Vec<RowItem> = Vec::new();
        let mut used = 0u32;

        for (position, photo) in photos.iter().enumerate() {
            let span = photo.span.clamped(columns);
            if used + span > columns && !pending.is_empty() {
                rows.push(RowModel::new(
                    row_index,
                    row_height,
                    std::mem::take(&mut pending),
                ));
                row_index += 1;
                used = 0;
            }

            let x = used as f32 * (column_width + self.gap);
            pending.push(RowItem {
                position,
                x,
                width: self.span_width(column_width, span),
                height: row_height,
                span,
            });
            used += span;
        }

        if !pending.is_empty() {
            rows.push(RowModel::new(row_index, row_height, pending));
        }

        rows
    }

    /// Total height of all rows including row gaps.
    pub fn total_height(&self, rows: &[RowModel]) -> f32 {
        if rows.is_empty() {
            return 0.0;
        }
        let heights: f32 = rows.iter().map(|r| r.height_px).sum();
        heights + rows.len().saturating_sub(1) as f32 * self.gap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LayoutSpan, PhotoId};
    use std::path::PathBuf;

    fn make_photo(id: u32, span: u8) -> Photo {
        Photo {
            id: PhotoId(id),
            src: PathBuf::from(format!("{}.jpg", id)),
            title: format!("Photo {}", id),
            category: "X".into(),
            span: LayoutSpan::new(span).unwrap(),
            description: String::new(),
            width: 1600,
            height: 1000,
        }
    }

    fn refs(photos: &[Photo]) -> Vec<&Photo> {
        photos.iter().collect()
    }

    #[test]
    fn test_empty_items() {
        let layout = SpanGridLayout::default();
        assert!(layout.compute(&[], 1200.0).is_empty());
    }

    #[test]
    fn test_zero_width() {
        let layout = SpanGridLayout::default();
        let photos = vec![make_photo(1, 1)];
        assert!(layout.compute(&refs(&photos), 0.0).is_empty());
    }

    #[test]
    fn test_spans_pack_rows() {
        // 2+1 | 1+2 | 3, the shape of the shipped catalog
        let layout = SpanGridLayout::default();
        let photos = vec![
            make_photo(1, 2),
            make_photo(2, 1),
            make_photo(3, 1),
            make_photo(4, 2),
            make_photo(5, 3),
        ];
        let rows = layout.compute(&refs(&photos), 1248.0);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].items.len(), 2);
        assert_eq!(rows[1].items.len(), 2);
        assert_eq!(rows[2].items.len(), 1);
        for row in &rows {
            assert_eq!(row.used_columns(), 3);
        }

        // (1248 - 2*24) / 3 = 400 per column
        let first = &rows[0].items[0];
        assert!((first.width - 824.0).abs() < 0.01);
        let second = &rows[0].items[1];
        assert!((second.x - 848.0).abs() < 0.01);
        assert!((second.width - 400.0).abs() < 0.01);
        let full = &rows[2].items[0];
        assert!((full.width - 1248.0).abs() < 0.01);
    }

    #[test]
    fn test_wrap_when_span_does_not_fit() {
        let layout = SpanGridLayout::default();
        let photos = vec![make_photo(1, 1), make_photo(2, 1), make_photo(3, 2)];
        let rows = layout.compute(&refs(&photos), 1248.0);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].used_columns(), 2);
        assert_eq!(rows[1].items[0].position, 2);
    }

    #[test]
    fn test_positions_preserve_order() {
        let layout = SpanGridLayout::default();
        let photos: Vec<Photo> = (0..7).map(|i| make_photo(i, 1 + (i % 3) as u8)).collect();
        let rows = layout.compute(&refs(&photos), 1600.0);
        let positions: Vec<usize> = rows
            .iter()
            .flat_map(|r| r.items.iter().map(|i| i.position))
            .collect();
        assert_eq!(positions, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn test_span_clamped_to_columns() {
        let layout = SpanGridLayout {
            columns: 2,
            ..SpanGridLayout::default()
        };
        let photos = vec![make_photo(1, 3)];
        let rows = layout.compute(&refs(&photos), 1000.0);
        assert_eq!(rows[0].items[0].span, 2);
        assert!((rows[0].items[0].width - 1000.0).abs() < 0.01);
    }

    #[test]
    fn test_compact_single_column() {
        let layout = SpanGridLayout::default();
        let photos = vec![make_photo(1, 2), make_photo(2, 3)];
        let rows = layout.compute(&refs(&photos), 480.0);
        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert_eq!(row.items.len(), 1);
            assert!((row.items[0].width - 480.0).abs() < 0.01);
            assert!((row.height_px - 300.0).abs() < 0.01);
        }
    }

    #[test]
    fn test_total_height() {
        let layout = SpanGridLayout::default();
        let photos = vec![make_photo(1, 3), make_photo(2, 3)];
        let rows = layout.compute(&refs(&photos), 1248.0);
        assert!((layout.total_height(&rows) - (420.0 * 2.0 + 24.0)).abs() < 0.01);
    }
}
