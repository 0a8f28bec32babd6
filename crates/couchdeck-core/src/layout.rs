//! Grid geometry: column count, cell size, spacing and padding.
//!
//! Geometry is derived from the viewport size in two passes. The first pass
//! fits as many natural-size cells as possible; if that leaves fewer than the
//! configured minimum columns or rows, cells are shrunk uniformly (never
//! below the minimum item width) and fitted again. Whatever space is left is
//! then handed out either as extra spacing or as exterior padding.
//!
//! Every function here is pure, so recomputing with the same inputs always
//! yields the same geometry.

use crate::config::LayoutConfig;
use couchdeck_types::CellBox;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Absorbs float error when the shrink pass sizes cells to fit exactly.
const FIT_EPSILON: f64 = 1e-9;

/// Where leftover horizontal space goes after cells are fitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PadMode {
    /// Grow spacing evenly between and around cells
    #[default]
    Spacing,
    /// Keep spacing, center the grid with exterior padding
    Padding,
}

/// Inputs to [`compute_layout`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    pub available_width: f64,
    pub available_height: f64,
    pub min_columns: usize,
    pub min_rows: usize,
    pub max_columns: Option<usize>,
    pub item_width: f64,
    pub item_height: f64,
    pub min_item_width: f64,
    pub spacing: f64,
    pub padding: f64,
    pub pad_mode: PadMode,
}

impl LayoutParams {
    #[must_use]
    pub fn from_config(config: &LayoutConfig, available_width: f64, available_height: f64) -> Self {
        Self {
            available_width,
            available_height,
            min_columns: config.min_columns,
            min_rows: config.min_rows,
            max_columns: config.max_columns,
            item_width: config.icon_width,
            item_height: config.icon_height,
            min_item_width: config.min_icon_width,
            spacing: config.spacing,
            padding: config.padding,
            pad_mode: config.pad_mode,
        }
    }

    #[must_use]
    pub fn with_size(mut self, available_width: f64, available_height: f64) -> Self {
        self.available_width = available_width;
        self.available_height = available_height;
        self
    }
}

/// Derived grid geometry; recomputed on every viewport change
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridGeometry {
    pub columns: usize,
    /// Rows that fit in the viewport at once (the grid scrolls beyond this)
    pub rows: usize,
    pub cell_width: f64,
    pub cell_height: f64,
    pub spacing: f64,
    pub top_padding: f64,
    pub bottom_padding: f64,
    pub left_padding: f64,
    pub right_padding: f64,
}

impl GridGeometry {
    /// A geometry with no columns places nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns == 0
    }

    /// Total horizontal extent, including padding.
    #[must_use]
    pub fn used_width(&self) -> f64 {
        if self.columns == 0 {
            return 0.0;
        }
        axis_extent(self.columns, self.cell_width, self.spacing)
            + self.left_padding
            + self.right_padding
    }
}

/// How many cells of `cell` size fit in `available` after padding.
// Result is floored and non-negative before the cast
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn fit(available: f64, padding: f64, cell: f64, spacing: f64) -> usize {
    let inner = available - 2.0 * padding;
    if cell <= 0.0 || inner + FIT_EPSILON < cell {
        return 0;
    }
    ((inner + spacing) / (cell + spacing) + FIT_EPSILON).floor() as usize
}

// Cell counts are small; precision loss is irrelevant
#[allow(clippy::cast_precision_loss)]
fn axis_extent(count: usize, cell: f64, spacing: f64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    count as f64 * cell + (count - 1) as f64 * spacing
}

/// Largest uniform scale (at most 1.0) that satisfies both minima, floored
/// at the minimum item width.
#[allow(clippy::cast_precision_loss)]
fn shrink_scale(params: &LayoutParams, min_columns: usize, spacing: f64, padding: f64) -> f64 {
    let mut scale: f64 = 1.0;

    if min_columns > 0 {
        let needed = (params.available_width
            - 2.0 * padding
            - (min_columns - 1) as f64 * spacing)
            / min_columns as f64;
        scale = scale.min(needed / params.item_width);
    }

    if params.min_rows > 0 {
        let needed = (params.available_height
            - 2.0 * padding
            - (params.min_rows - 1) as f64 * spacing)
            / params.min_rows as f64;
        scale = scale.min(needed / params.item_height);
    }

    let floor = (params.min_item_width / params.item_width).clamp(0.0, 1.0);
    scale.max(floor)
}

/// Compute grid geometry for the given viewport and constraints.
///
/// A non-positive (or NaN) viewport yields the zero geometry: no columns,
/// nothing placed.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute_layout(params: &LayoutParams) -> GridGeometry {
    let width = params.available_width;
    let height = params.available_height;

    if !(width > 0.0 && height > 0.0 && params.item_width > 0.0 && params.item_height > 0.0) {
        debug!("Empty layout for viewport {width}x{height}");
        return GridGeometry::default();
    }

    let spacing = params.spacing.max(0.0);
    let padding = params.padding.max(0.0);
    let ceiling = params.max_columns.unwrap_or(usize::MAX).max(1);
    let min_columns = params.min_columns.min(ceiling);

    let mut cell_width = params.item_width;
    let mut cell_height = params.item_height;
    let mut columns = fit(width, padding, cell_width, spacing).min(ceiling);
    let mut rows = fit(height, padding, cell_height, spacing);

    if columns < min_columns || rows < params.min_rows {
        let scale = shrink_scale(params, min_columns, spacing, padding);
        cell_width = params.item_width * scale;
        cell_height = params.item_height * scale;
        columns = fit(width, padding, cell_width, spacing).min(ceiling);
        rows = fit(height, padding, cell_height, spacing);
    }

    if columns == 0 {
        debug!("Viewport {width}x{height} cannot hold a single cell");
        return GridGeometry {
            cell_width,
            cell_height,
            spacing,
            ..GridGeometry::default()
        };
    }

    let (spacing, vertical_padding) = match params.pad_mode {
        PadMode::Spacing => {
            let free_x = (width - 2.0 * padding - axis_extent(columns, cell_width, spacing)).max(0.0);
            let free_y = (height - 2.0 * padding - axis_extent(rows, cell_height, spacing)).max(0.0);
            let extra_x = free_x / (columns + 1) as f64;
            let extra = if rows == 0 {
                0.0
            } else {
                extra_x.min(free_y / (rows + 1) as f64)
            };
            (spacing + extra, padding + extra)
        }
        PadMode::Padding => (spacing, padding),
    };

    let used = axis_extent(columns, cell_width, spacing);
    let left_padding = (width - used) / 2.0;
    let right_padding = width - used - left_padding;

    GridGeometry {
        columns,
        rows,
        cell_width,
        cell_height,
        spacing,
        top_padding: vertical_padding,
        bottom_padding: vertical_padding,
        left_padding,
        right_padding,
    }
}

/// Layout box for the cell at `index`, or `None` when nothing can be placed.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn place(geometry: &GridGeometry, index: usize) -> Option<CellBox> {
    if geometry.columns == 0 {
        return None;
    }
    let row = index / geometry.columns;
    let column = index % geometry.columns;
    let x1 = geometry.left_padding + column as f64 * (geometry.cell_width + geometry.spacing);
    let y1 = geometry.top_padding + row as f64 * (geometry.cell_height + geometry.spacing);
    Some(CellBox::new(
        x1,
        y1,
        x1 + geometry.cell_width,
        y1 + geometry.cell_height,
    ))
}

/// Rows needed to show `count` cells.
#[must_use]
pub fn total_rows(geometry: &GridGeometry, count: usize) -> usize {
    if geometry.columns == 0 {
        return 0;
    }
    count.div_ceil(geometry.columns)
}

/// Full scrollable height for `count` cells, including padding.
#[must_use]
pub fn content_height(geometry: &GridGeometry, count: usize) -> f64 {
    let rows = total_rows(geometry, count);
    if rows == 0 {
        return 0.0;
    }
    axis_extent(rows, geometry.cell_height, geometry.spacing)
        + geometry.top_padding
        + geometry.bottom_padding
}
