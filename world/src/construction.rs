//! Placement, demolition and upgrades.

use bastion_core::{
    refund, BuildKind, CellCoord, CellRect, CellRectSize, Event, GameState, Occupant,
    PlacementError, RemovalError, StructureId, StructureKind, Tier, UpgradeError,
};
use tracing::debug;

use crate::{
    entities::{Structure, Trap},
    World,
};

/// Price and outcome of the next upgrade of a structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpgradeQuote {
    /// Structure being upgraded.
    pub structure: StructureId,
    /// Tier the structure would reach.
    pub tier: Tier,
    /// Gold the upgrade costs.
    pub cost: u32,
}

impl World {
    pub(crate) fn footprint(&self, kind: BuildKind, origin: CellCoord) -> CellRect {
        CellRect::from_origin_and_size(origin, CellRectSize::square(kind.footprint()))
    }

    /// Every footprint cell must lie within the build radius of some base cell.
    pub(crate) fn within_build_range(&self, region: CellRect) -> bool {
        let radius = self.config.build_radius;
        region.cells().all(|cell| {
            self.base
                .region
                .cells()
                .any(|base_cell| cell.chebyshev_distance(base_cell) <= radius)
        })
    }

    pub(crate) fn count_structures(&self, kind: StructureKind) -> u32 {
        let count = self
            .structures
            .values()
            .filter(|structure| structure.kind == kind)
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    pub(crate) fn validate_placement(
        &self,
        kind: BuildKind,
        origin: CellCoord,
    ) -> Result<CellRect, PlacementError> {
        if self.state != GameState::Building {
            return Err(PlacementError::WrongPhase);
        }
        let unlock_round = kind.unlock_round();
        if self.round < unlock_round {
            return Err(PlacementError::Locked { unlock_round });
        }

        let edge = kind.footprint().saturating_sub(1);
        let far_corner = origin
            .offset(edge, edge)
            .ok_or(PlacementError::OutOfBounds)?;
        if !self.occupancy.contains(origin) || !self.occupancy.contains(far_corner) {
            return Err(PlacementError::OutOfBounds);
        }

        let region = self.footprint(kind, origin);
        if !self.occupancy.is_region_free(region) {
            return Err(PlacementError::Occupied);
        }
        if !kind.is_trap() && !self.within_build_range(region) {
            return Err(PlacementError::OutOfRange);
        }
        if kind == BuildKind::Structure(StructureKind::Mine) {
            let cap = bastion_core::mine_cap(self.round);
            if self.count_structures(StructureKind::Mine) >= cap {
                return Err(PlacementError::MineCapReached { cap });
            }
        }
        let cost = kind.cost();
        if self.gold < cost {
            return Err(PlacementError::InsufficientGold {
                cost,
                available: self.gold,
            });
        }
        Ok(region)
    }

    pub(crate) fn place(
        &mut self,
        kind: BuildKind,
        origin: CellCoord,
        out_events: &mut Vec<Event>,
    ) {
        let region = match self.validate_placement(kind, origin) {
            Ok(region) => region,
            Err(error) => {
                self.reject(error, out_events);
                return;
            }
        };

        self.gold -= kind.cost();
        match kind {
            BuildKind::Structure(kind) => {
                let structure = self.structures.insert(Structure::build(
                    kind,
                    region,
                    self.config.cell_length,
                ));
                self.occupancy.fill(region, Occupant::Structure(structure));
                debug!(?kind, ?origin, gold = self.gold, "structure placed");
                out_events.push(Event::StructurePlaced {
                    structure,
                    kind,
                    region,
                });
            }
            BuildKind::Trap(kind) => {
                let trap = self.traps.insert(Trap {
                    kind,
                    cell: origin,
                    center: origin.center(self.config.cell_length),
                });
                self.occupancy.fill(region, Occupant::Trap(trap));
                debug!(?kind, ?origin, gold = self.gold, "trap armed");
                out_events.push(Event::TrapPlaced {
                    trap,
                    kind,
                    cell: origin,
                });
            }
        }
    }

    pub(crate) fn remove(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        if self.state != GameState::Building {
            self.reject(RemovalError::WrongPhase, out_events);
            return;
        }

        match self.occupancy.occupant(cell) {
            Occupant::Structure(id) => {
                let Some(structure) = self.structures.remove(id) else {
                    self.reject(RemovalError::Nothing, out_events);
                    return;
                };
                self.occupancy.clear(structure.region);
                if structure.kind == StructureKind::Barracks {
                    self.knights.retain(|_, knight| knight.barracks != id);
                }
                let refund = refund(structure.kind.definition().cost);
                self.gold = self.gold.saturating_add(refund);
                debug!(kind = ?structure.kind, refund, "structure demolished");
                out_events.push(Event::StructureRemoved {
                    structure: id,
                    refund,
                });
            }
            Occupant::Trap(id) => {
                let Some(trap) = self.traps.remove(id) else {
                    self.reject(RemovalError::Nothing, out_events);
                    return;
                };
                let region = self.footprint(BuildKind::Trap(trap.kind), trap.cell);
                self.occupancy.clear(region);
                let refund = refund(trap.kind.definition().cost);
                self.gold = self.gold.saturating_add(refund);
                debug!(kind = ?trap.kind, refund, "trap disarmed");
                out_events.push(Event::TrapRemoved { trap: id, refund });
            }
            Occupant::Base | Occupant::Empty => self.reject(RemovalError::Nothing, out_events),
        }
    }

    pub(crate) fn quote_upgrade(&self, cell: CellCoord) -> Result<UpgradeQuote, UpgradeError> {
        if self.state != GameState::Building {
            return Err(UpgradeError::WrongPhase);
        }
        let Occupant::Structure(id) = self.occupancy.occupant(cell) else {
            return Err(UpgradeError::MissingStructure);
        };
        let structure = self
            .structures
            .get(id)
            .ok_or(UpgradeError::MissingStructure)?;
        let definition = structure.kind.definition();
        if !definition.is_upgradable() {
            return Err(UpgradeError::NotUpgradable);
        }
        let tier = structure.tier.next().ok_or(UpgradeError::MaxTier)?;
        let overrides = definition
            .overrides(tier)
            .ok_or(UpgradeError::MaxTier)?;
        let unlock_round = match tier {
            Tier::Three => self.config.tier_three_round,
            Tier::One | Tier::Two => self.config.tier_two_round,
        };
        if self.round < unlock_round {
            return Err(UpgradeError::TierLocked { unlock_round });
        }
        if self.gold < overrides.cost {
            return Err(UpgradeError::InsufficientGold {
                cost: overrides.cost,
                available: self.gold,
            });
        }
        Ok(UpgradeQuote {
            structure: id,
            tier,
            cost: overrides.cost,
        })
    }

    pub(crate) fn upgrade(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        let quote = match self.quote_upgrade(cell) {
            Ok(quote) => quote,
            Err(error) => {
                self.reject(error, out_events);
                return;
            }
        };
        let Some(structure) = self.structures.get_mut(quote.structure) else {
            return;
        };
        structure.tier = quote.tier;
        structure.stats = structure.kind.definition().stats_at(quote.tier);
        self.gold -= quote.cost;
        debug!(
            kind = ?structure.kind,
            tier = quote.tier.level(),
            cost = quote.cost,
            "structure upgraded"
        );
        out_events.push(Event::StructureUpgraded {
            structure: quote.structure,
            tier: quote.tier,
            cost: quote.cost,
        });
    }
}

#[cfg(test)]
mod tests {
    use bastion_core::{GameMode, SimulationConfig, TrapKind};

    use super::*;

    fn building_world() -> World {
        let mut world = World::new(SimulationConfig::default());
        let mut events = Vec::new();
        crate::apply(
            &mut world,
            bastion_core::Command::StartGame {
                mode: GameMode::Relaxed,
            },
            &mut events,
        );
        world
    }

    #[test]
    fn build_range_is_measured_from_any_base_cell() {
        let world = building_world();
        let archer = BuildKind::Structure(StructureKind::Archer);
        assert!(world.within_build_range(world.footprint(archer, CellCoord::new(4, 2))));
        assert!(world.within_build_range(world.footprint(archer, CellCoord::new(13, 11))));
        assert!(!world.within_build_range(world.footprint(archer, CellCoord::new(3, 6))));
        assert!(!world.within_build_range(world.footprint(archer, CellCoord::new(14, 6))));
    }

    #[test]
    fn traps_ignore_build_range() {
        let world = building_world();
        let blast = BuildKind::Trap(TrapKind::Blast);
        assert!(world.validate_placement(blast, CellCoord::new(0, 0)).is_ok());
    }

    #[test]
    fn lock_is_checked_before_bounds() {
        let world = building_world();
        let mage = BuildKind::Structure(StructureKind::Mage);
        assert_eq!(
            world.validate_placement(mage, CellCoord::new(17, 5)),
            Err(PlacementError::Locked { unlock_round: 6 })
        );
        let archer = BuildKind::Structure(StructureKind::Archer);
        assert_eq!(
            world.validate_placement(archer, CellCoord::new(18, 5)),
            Err(PlacementError::OutOfBounds)
        );
    }
}
