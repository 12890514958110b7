//! Grid placement for laying out many meshes side by side

use crate::geometry::Vec3;
use serde::Deserialize;

pub const DEFAULT_SPACING: f32 = 2.0;
pub const DEFAULT_COLUMNS: usize = 15;

/// Rows of `columns` items along +X, rows stepping along -Z
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridLayout {
    pub spacing: f32,
    pub columns: usize,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            spacing: DEFAULT_SPACING,
            columns: DEFAULT_COLUMNS,
        }
    }
}

impl GridLayout {
    pub fn new(spacing: f32, columns: usize) -> Self {
        Self { spacing, columns }
    }

    /// Translation of the `index`-th item
    pub fn position(&self, index: usize) -> Vec3 {
        let columns = self.columns.max(1);
        let column = (index % columns) as f32;
        let row = (index / columns) as f32;
        [column * self.spacing, 0.0, 0.0 - row * self.spacing]
    }

    /// Endless iterator of translations, in placement order
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        (0..).map(move |index| self.position(index))
    }
}
