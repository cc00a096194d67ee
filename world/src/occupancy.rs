//! Dense grid recording what covers each cell.

use bastion_core::{CellCoord, CellRect, Occupant};

#[derive(Clone, Debug)]
pub(crate) struct OccupancyGrid {
    columns: u32,
    rows: u32,
    cells: Vec<Occupant>,
}

impl OccupancyGrid {
    pub(crate) fn new(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![Occupant::Empty; capacity],
        }
    }

    /// Occupant of the cell; cells outside the grid read as empty.
    pub(crate) fn occupant(&self, cell: CellCoord) -> Occupant {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(Occupant::Empty)
    }

    pub(crate) fn contains(&self, cell: CellCoord) -> bool {
        self.index(cell).is_some()
    }

    pub(crate) fn is_region_free(&self, region: CellRect) -> bool {
        region
            .cells()
            .all(|cell| self.occupant(cell) == Occupant::Empty)
    }

    pub(crate) fn fill(&mut self, region: CellRect, occupant: Occupant) {
        for cell in region.cells() {
            if let Some(index) = self.index(cell) {
                if let Some(slot) = self.cells.get_mut(index) {
                    *slot = occupant;
                }
            }
        }
    }

    pub(crate) fn clear(&mut self, region: CellRect) {
        self.fill(region, Occupant::Empty);
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use bastion_core::{CellRectSize, TrapId};

    use super::*;

    #[test]
    fn fill_and_clear_regions() {
        let mut grid = OccupancyGrid::new(4, 3);
        let region = CellRect::from_origin_and_size(CellCoord::new(1, 1), CellRectSize::square(2));
        grid.fill(region, Occupant::Trap(TrapId::default()));

        assert!(!grid.is_region_free(region));
        assert_eq!(grid.occupant(CellCoord::new(0, 0)), Occupant::Empty);
        grid.clear(region);
        assert!(grid.is_region_free(region));
    }

    #[test]
    fn cells_outside_grid_are_not_contained() {
        let grid = OccupancyGrid::new(4, 3);
        assert!(grid.contains(CellCoord::new(3, 2)));
        assert!(!grid.contains(CellCoord::new(4, 0)));
        assert_eq!(grid.occupant(CellCoord::new(9, 9)), Occupant::Empty);
    }
}
