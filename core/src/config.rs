//! Tunable session parameters.

use serde::{Deserialize, Serialize};

use crate::{CellCoord, CellRect, CellRectSize};

/// Parameters fixed for the lifetime of a session.
///
/// Every field has a default, so partial TOML documents deserialize into a
/// complete configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Seed for every random choice the simulation makes.
    pub seed: u64,
    /// Number of grid columns.
    pub columns: u32,
    /// Number of grid rows.
    pub rows: u32,
    /// Edge length of one cell in world units.
    pub cell_length: f32,
    /// Upper-left cell of the base.
    pub base_origin: CellCoord,
    /// Edge length of the square base in cells.
    pub base_size: u32,
    /// Gold available when a session begins.
    pub starting_gold: u32,
    /// Health of the base when a session begins.
    pub base_max_health: u32,
    /// Unscaled ticks a timed build phase lasts.
    pub build_timer_ticks: u32,
    /// Round whose clearance wins the game.
    pub final_round: u32,
    /// Round from which tier-two upgrades are sold.
    pub tier_two_round: u32,
    /// Round from which tier-three upgrades are sold.
    pub tier_three_round: u32,
    /// Chebyshev distance from the base inside which structures may be placed.
    pub build_radius: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            columns: 18,
            rows: 14,
            cell_length: 40.0,
            base_origin: CellCoord::new(8, 6),
            base_size: 2,
            starting_gold: 150,
            base_max_health: 100,
            build_timer_ticks: 3000,
            final_round: 30,
            tier_two_round: 14,
            tier_three_round: 21,
            build_radius: 4,
        }
    }
}

impl SimulationConfig {
    /// Cells covered by the base.
    #[must_use]
    pub const fn base_region(&self) -> CellRect {
        CellRect::from_origin_and_size(self.base_origin, CellRectSize::square(self.base_size))
    }

    /// Cells covered by the whole grid.
    #[must_use]
    pub const fn grid_region(&self) -> CellRect {
        CellRect::from_origin_and_size(
            CellCoord::new(0, 0),
            CellRectSize::new(self.columns, self.rows),
        )
    }

    /// Width of the grid in world units.
    #[must_use]
    pub fn world_width(&self) -> f32 {
        self.columns as f32 * self.cell_length
    }

    /// Height of the grid in world units.
    #[must_use]
    pub fn world_height(&self) -> f32 {
        self.rows as f32 * self.cell_length
    }
}
