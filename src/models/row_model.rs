/// One tile placed in a grid row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowItem {
    /// Position in the displayed list
    pub position: usize,
    pub x: f32,
    pub width: f32,
    pub height: f32,
    /// Grid columns covered by this tile
    pub span: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowModel {
    pub row_index: u32,
    pub height_px: f32,
    pub items: Vec<RowItem>,
}

impl RowModel {
    pub fn new(row_index: u32, height_px: f32, items: Vec<RowItem>) -> Self {
        Self {
            row_index,
            height_px,
            items,
        }
    }

    /// Columns taken by the tiles of this row.
    pub fn used_columns(&self) -> u32 {
        self.items.iter().map(|item| item.span).sum()
    }
}
