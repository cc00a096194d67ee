//! Reasons the world gives for refusing a player command.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::GameState;

/// Why a placement was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum PlacementError {
    /// Construction only happens between rounds.
    #[error("construction is only possible during the build phase")]
    WrongPhase,
    /// The kind is not available yet.
    #[error("unlocks at round {unlock_round}")]
    Locked {
        /// Round from which the kind may be built.
        unlock_round: u32,
    },
    /// Part of the footprint lies outside the grid.
    #[error("footprint leaves the grid")]
    OutOfBounds,
    /// Part of the footprint is taken by the base, a structure or a trap.
    #[error("footprint overlaps something already built")]
    Occupied,
    /// Part of the footprint is too far from the base.
    #[error("footprint lies outside the build radius")]
    OutOfRange,
    /// Every mine allowed this round is already standing.
    #[error("mine limit of {cap} reached")]
    MineCapReached {
        /// Mines allowed during the current round.
        cap: u32,
    },
    /// The treasury cannot cover the cost.
    #[error("costs {cost} gold but only {available} is available")]
    InsufficientGold {
        /// Gold required.
        cost: u32,
        /// Gold held.
        available: u32,
    },
}

/// Why an upgrade was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum UpgradeError {
    /// Upgrades only happen between rounds.
    #[error("upgrades are only possible during the build phase")]
    WrongPhase,
    /// No structure covers the clicked cell.
    #[error("no structure at the selected cell")]
    MissingStructure,
    /// The structure kind has no tiers.
    #[error("this structure cannot be upgraded")]
    NotUpgradable,
    /// The structure already reached its last tier.
    #[error("already at the highest tier")]
    MaxTier,
    /// The next tier is not sold yet.
    #[error("the next tier unlocks at round {unlock_round}")]
    TierLocked {
        /// Round from which the tier is sold.
        unlock_round: u32,
    },
    /// The treasury cannot cover the cost.
    #[error("costs {cost} gold but only {available} is available")]
    InsufficientGold {
        /// Gold required.
        cost: u32,
        /// Gold held.
        available: u32,
    },
}

/// Why a demolition was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum RemovalError {
    /// Demolition only happens between rounds.
    #[error("demolition is only possible during the build phase")]
    WrongPhase,
    /// Nothing removable covers the clicked cell.
    #[error("nothing to demolish at the selected cell")]
    Nothing,
}

/// Why a phase transition was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum PhaseError {
    /// The command is not valid in the current phase.
    #[error("expected the {expected:?} phase but the game is in {actual:?}")]
    Unexpected {
        /// Phase the command requires.
        expected: GameState,
        /// Phase the game is in.
        actual: GameState,
    },
    /// Speed changes only apply while a session is running.
    #[error("time scale cannot change while the game is in {actual:?}")]
    NotRunning {
        /// Phase the game is in.
        actual: GameState,
    },
}

/// Any refusal reported through [`crate::Event::CommandRejected`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum Rejection {
    /// A placement was refused.
    #[error(transparent)]
    Placement(#[from] PlacementError),
    /// An upgrade was refused.
    #[error(transparent)]
    Upgrade(#[from] UpgradeError),
    /// A demolition was refused.
    #[error(transparent)]
    Removal(#[from] RemovalError),
    /// A phase transition was refused.
    #[error(transparent)]
    Phase(#[from] PhaseError),
}
