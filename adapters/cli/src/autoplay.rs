//! Scripted player used to drive headless sessions.

use bastion_core::{BuildKind, CellCoord, GameMode, GameState, StructureKind, TrapKind};
use bastion_simulation::Simulation;
use bastion_world::query;
use tracing::debug;

/// Kinds the script tries to buy, most wanted first.
const SHOPPING_LIST: [BuildKind; 6] = [
    BuildKind::Structure(StructureKind::Mine),
    BuildKind::Structure(StructureKind::Barracks),
    BuildKind::Structure(StructureKind::Mage),
    BuildKind::Structure(StructureKind::Archer),
    BuildKind::Structure(StructureKind::Turret),
    BuildKind::Trap(TrapKind::Blast),
];

/// Upper bound on purchases in a single build phase.
const MAX_PURCHASES: usize = 12;

/// Spends gold during build phases and readies up in relaxed mode.
#[derive(Debug)]
pub(crate) struct Autoplayer {
    mode: GameMode,
    planned_round: Option<u32>,
}

impl Autoplayer {
    pub(crate) const fn new(mode: GameMode) -> Self {
        Self {
            mode,
            planned_round: None,
        }
    }

    /// Acts once per build phase; idle otherwise.
    pub(crate) fn play(&mut self, simulation: &mut Simulation) {
        let world = simulation.world();
        if query::game_state(world) != GameState::Building {
            return;
        }
        let round = query::round(world);
        if self.planned_round == Some(round) {
            return;
        }
        self.planned_round = Some(round);

        let mut purchases = 0;
        while purchases < MAX_PURCHASES && buy_one(simulation) {
            purchases += 1;
        }
        while upgrade_one(simulation) {}
        debug!(round, purchases, "build phase planned");

        if self.mode == GameMode::Relaxed {
            simulation.ready_for_combat();
        }
    }
}

/// Buys the first affordable kind on the list at the free cell nearest the base.
fn buy_one(simulation: &mut Simulation) -> bool {
    let world = simulation.world();
    let gold = query::gold(world);
    let choice = SHOPPING_LIST
        .into_iter()
        .filter(|kind| query::is_unlocked(world, *kind) && kind.cost() <= gold)
        .filter(|kind| {
            *kind != BuildKind::Structure(StructureKind::Mine)
                || query::mine_count(world) < query::mine_cap(world)
        })
        .find_map(|kind| nearest_free_cell(simulation, kind).map(|cell| (kind, cell)));

    let Some((kind, cell)) = choice else {
        return false;
    };
    simulation.select_structure_type(kind);
    simulation.place_at(cell);
    true
}

/// Upgrades the first structure whose next tier is affordable.
fn upgrade_one(simulation: &mut Simulation) -> bool {
    let world = simulation.world();
    let gold = query::gold(world);
    let target = query::structure_view(world)
        .iter()
        .map(|structure| structure.region.origin())
        .find(|cell| {
            query::upgrade_quote(world, *cell).is_ok_and(|quote| quote.cost <= gold)
        });

    let Some(cell) = target else {
        return false;
    };
    let before = gold;
    simulation.upgrade_at(cell);
    query::gold(simulation.world()) < before
}

fn nearest_free_cell(simulation: &Simulation, kind: BuildKind) -> Option<CellCoord> {
    let world = simulation.world();
    let config = query::config(world);
    let hub = config.base_origin;
    config
        .grid_region()
        .cells()
        .filter(|cell| query::can_place(world, kind, *cell).is_ok())
        .min_by_key(|cell| (cell.chebyshev_distance(hub), cell.row(), cell.column()))
}
