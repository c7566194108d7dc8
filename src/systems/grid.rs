//! Spritesheet grid calculation.
//!
//! Cell size is resolved as `cell_size`, then `cell_width`/`cell_height`,
//! then the sprite's own dimensions. Columns and rows are the image size
//! divided by the cell size (rounded down) unless given explicitly, in which
//! case the explicit value wins outright. A grid holds at most
//! [`MAX_GRID_CELLS`] cells.

use crate::components::spritesheet::{CellBackground, SpriteSheet};
use crate::error::{Result, SpriteError};
use crate::resources::imageloader::ImageSize;

/// Upper bound on `columns * rows` for one sheet.
pub const MAX_GRID_CELLS: usize = 1 << 16;

/// How to slice an image into a spritesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetOptions {
    /// Sheet id, unique per sprite.
    pub id: String,
    /// Image location handed to the [`ImageLoader`](crate::resources::imageloader::ImageLoader).
    pub url: String,
    /// Square cell size; overrides `cell_width` and `cell_height`.
    pub cell_size: Option<u32>,
    /// Cell width in pixels. Defaults to the sprite width.
    pub cell_width: Option<u32>,
    /// Cell height in pixels. Defaults to the sprite height.
    pub cell_height: Option<u32>,
    /// Explicit column count instead of `image_width / cell_width`.
    pub columns: Option<u32>,
    /// Explicit row count instead of `image_height / cell_height`.
    pub rows: Option<u32>,
}

impl SheetOptions {
    /// Options that slice `url` into cells the size of the sprite.
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            cell_size: None,
            cell_width: None,
            cell_height: None,
            columns: None,
            rows: None,
        }
    }

    /// Use square cells of `size` pixels.
    pub fn with_cell_size(mut self, size: u32) -> Self {
        self.cell_size = Some(size);
        self
    }

    /// Use cells of `width` x `height` pixels.
    pub fn with_cell_dimensions(mut self, width: u32, height: u32) -> Self {
        self.cell_width = Some(width);
        self.cell_height = Some(height);
        self
    }

    /// Fix the grid to `columns` x `rows` regardless of the image size.
    pub fn with_grid(mut self, columns: u32, rows: u32) -> Self {
        self.columns = Some(columns);
        self.rows = Some(rows);
        self
    }
}

/// Resolved layout of a spritesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub columns: u32,
    pub rows: u32,
    pub cell_width: u32,
    pub cell_height: u32,
}

impl Grid {
    /// Number of frames the grid provides.
    pub fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }
}

/// Compute the grid for `image`, falling back to `default_cell`
/// (width, height) when no cell size is given.
pub fn compute_grid(
    image: ImageSize,
    options: &SheetOptions,
    default_cell: (u32, u32),
) -> Result<Grid> {
    let cell_width = options
        .cell_size
        .or(options.cell_width)
        .unwrap_or(default_cell.0);
    let cell_height = options
        .cell_size
        .or(options.cell_height)
        .unwrap_or(default_cell.1);
    if cell_width == 0 || cell_height == 0 {
        return Err(SpriteError::InvalidCellSize {
            width: cell_width,
            height: cell_height,
        });
    }

    let columns = options.columns.unwrap_or(image.width / cell_width);
    let rows = options.rows.unwrap_or(image.height / cell_height);
    if columns == 0 || rows == 0 {
        return Err(SpriteError::EmptyGrid { columns, rows });
    }
    let cells = (columns as usize).checked_mul(rows as usize);
    if cells.is_none_or(|cells| cells > MAX_GRID_CELLS) {
        return Err(SpriteError::GridTooLarge { columns, rows });
    }

    Ok(Grid {
        columns,
        rows,
        cell_width,
        cell_height,
    })
}

/// Row-major cell descriptors; frame 0 is the top-left cell.
pub fn build_cells(url: &str, grid: &Grid) -> Vec<CellBackground> {
    let mut cells = Vec::with_capacity(grid.cell_count());
    for row in 0..grid.rows {
        for col in 0..grid.columns {
            cells.push(CellBackground {
                url: url.to_string(),
                offset_x: -(i64::from(col) * i64::from(grid.cell_width)),
                offset_y: -(i64::from(row) * i64::from(grid.cell_height)),
            });
        }
    }
    cells
}

pub fn build_sheet(
    image: ImageSize,
    options: &SheetOptions,
    default_cell: (u32, u32),
) -> Result<SpriteSheet> {
    let grid = compute_grid(image, options, default_cell)?;
    Ok(SpriteSheet {
        id: options.id.clone(),
        url: options.url.clone(),
        columns: grid.columns,
        rows: grid.rows,
        width: grid.cell_width,
        height: grid.cell_height,
        cells: build_cells(&options.url, &grid),
    })
}
