//! Grid and plane geometry shared by every Bastion crate.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Location of a single grid cell measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Chebyshev distance between two cells.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.column
            .abs_diff(other.column)
            .max(self.row.abs_diff(other.row))
    }

    /// Returns the cell offset by the provided deltas, if it stays non-negative.
    #[must_use]
    pub fn offset(self, columns: u32, rows: u32) -> Option<CellCoord> {
        Some(CellCoord::new(
            self.column.checked_add(columns)?,
            self.row.checked_add(rows)?,
        ))
    }

    /// World-space position of the cell's centre.
    #[must_use]
    pub fn center(self, cell_length: f32) -> Vec2 {
        Vec2::new(
            (self.column as f32 + 0.5) * cell_length,
            (self.row as f32 + 0.5) * cell_length,
        )
    }

    /// Cell containing the provided world-space point.
    ///
    /// Points left of or above the grid origin have no containing cell.
    #[must_use]
    pub fn containing(point: Vec2, cell_length: f32) -> Option<CellCoord> {
        if cell_length <= 0.0 || point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let column = (point.x / cell_length).floor();
        let row = (point.y / cell_length).floor();
        if column > u32::MAX as f32 || row > u32::MAX as f32 {
            return None;
        }
        Some(CellCoord::new(column as u32, row as u32))
    }
}

/// Axis-aligned rectangle expressed in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    origin: CellCoord,
    size: CellRectSize,
}

impl CellRect {
    /// Constructs a rectangle from an origin cell and size.
    #[must_use]
    pub const fn from_origin_and_size(origin: CellCoord, size: CellRectSize) -> Self {
        Self { origin, size }
    }

    /// Upper-left cell that anchors the rectangle.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Dimensions of the rectangle measured in whole cells.
    #[must_use]
    pub const fn size(&self) -> CellRectSize {
        self.size
    }

    /// Reports whether the provided cell lies inside the rectangle.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        let column = cell.column();
        let row = cell.row();
        column >= self.origin.column()
            && row >= self.origin.row()
            && u64::from(column) < u64::from(self.origin.column()) + u64::from(self.size.width())
            && u64::from(row) < u64::from(self.origin.row()) + u64::from(self.size.height())
    }

    /// Iterates over every cell covered by the rectangle in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let origin = self.origin;
        let width = self.size.width();
        (0..self.size.height()).flat_map(move |row| {
            (0..width).filter_map(move |column| origin.offset(column, row))
        })
    }

    /// World-space centre of the rectangle.
    #[must_use]
    pub fn center(&self, cell_length: f32) -> Vec2 {
        Vec2::new(
            (self.origin.column() as f32 + self.size.width() as f32 / 2.0) * cell_length,
            (self.origin.row() as f32 + self.size.height() as f32 / 2.0) * cell_length,
        )
    }
}

/// Size of a [`CellRect`] measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRectSize {
    width: u32,
    height: u32,
}

impl CellRectSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Creates a square size whose edges span `edge` cells.
    #[must_use]
    pub const fn square(edge: u32) -> Self {
        Self::new(edge, edge)
    }

    /// Width of the rectangle in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the rectangle in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Unit vector pointing from `from` toward `to`, or zero when they coincide.
#[must_use]
pub fn heading(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Moves `from` toward `to` by at most `step` world units.
#[must_use]
pub fn step_toward(from: Vec2, to: Vec2, step: f32) -> Vec2 {
    let distance = from.distance(to);
    if distance <= step {
        to
    } else {
        from + heading(from, to) * step
    }
}
