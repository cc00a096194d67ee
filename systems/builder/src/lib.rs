#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure build-menu system that turns player input (menu selection, delete
//! and upgrade toggles, grid clicks) into placement, removal and upgrade
//! commands.

use bastion_core::{BuildKind, CellCoord, Command, Event, GameState};

/// Configuration parameters required to construct the builder.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    tier_two_round: u32,
}

impl Config {
    /// Creates a configuration where upgrading opens at `tier_two_round`.
    #[must_use]
    pub const fn new(tier_two_round: u32) -> Self {
        Self { tier_two_round }
    }
}

/// What a click on the grid currently does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BuilderMode {
    /// Builds the selected kind.
    #[default]
    Place,
    /// Demolishes whatever covers the cell.
    Delete,
    /// Upgrades the structure covering the cell.
    Upgrade,
}

/// Input distilled from the player's interaction with the build menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuilderAction {
    /// Picks a kind from the build menu.
    Select(BuildKind),
    /// Turns delete mode on or off.
    DeleteMode(bool),
    /// Turns upgrade mode on or off.
    UpgradeMode(bool),
    /// Clicks a grid cell.
    Click(CellCoord),
}

/// Build-menu system that tracks selection and mode across frames.
#[derive(Debug, Clone)]
pub struct Builder {
    tier_two_round: u32,
    state: GameState,
    round: u32,
    selection: Option<BuildKind>,
    mode: BuilderMode,
}

impl Builder {
    /// Creates a new builder for a session still in the intro.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self {
            tier_two_round: config.tier_two_round,
            state: GameState::Intro,
            round: 1,
            selection: None,
            mode: BuilderMode::Place,
        }
    }

    /// Kind picked from the menu, if any.
    #[must_use]
    pub const fn selection(&self) -> Option<BuildKind> {
        self.selection
    }

    /// Active click mode.
    #[must_use]
    pub const fn mode(&self) -> BuilderMode {
        self.mode
    }

    /// Reports whether upgrade mode may be switched on this round.
    #[must_use]
    pub const fn can_upgrade(&self) -> bool {
        self.round >= self.tier_two_round
    }

    /// Consumes world events and the player's action to emit build commands.
    ///
    /// Events are folded in first so the action sees the current phase and
    /// round. Clicks only produce commands while the build phase is open.
    pub fn handle(
        &mut self,
        events: &[Event],
        action: Option<BuilderAction>,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            self.observe(event);
        }

        let Some(action) = action else {
            return;
        };
        match action {
            BuilderAction::Select(kind) => {
                self.selection = Some(kind);
                self.mode = BuilderMode::Place;
            }
            BuilderAction::DeleteMode(enabled) => {
                if enabled {
                    self.selection = None;
                    self.mode = BuilderMode::Delete;
                } else if self.mode == BuilderMode::Delete {
                    self.mode = BuilderMode::Place;
                }
            }
            BuilderAction::UpgradeMode(enabled) => {
                if enabled {
                    if self.can_upgrade() {
                        self.selection = None;
                        self.mode = BuilderMode::Upgrade;
                    }
                } else if self.mode == BuilderMode::Upgrade {
                    self.mode = BuilderMode::Place;
                }
            }
            BuilderAction::Click(cell) => {
                if self.state != GameState::Building {
                    return;
                }
                match self.mode {
                    BuilderMode::Place => {
                        if let Some(kind) = self.selection {
                            out.push(Command::Place { kind, origin: cell });
                        }
                    }
                    BuilderMode::Delete => out.push(Command::Remove { cell }),
                    BuilderMode::Upgrade => out.push(Command::Upgrade { cell }),
                }
            }
        }
    }

    fn observe(&mut self, event: &Event) {
        match event {
            Event::StateChanged { to, .. } => self.state = *to,
            Event::BuildPhaseStarted { round } | Event::RoundStarted { round, .. } => {
                self.round = *round;
            }
            Event::Reset => {
                self.state = GameState::Intro;
                self.round = 1;
                self.selection = None;
                self.mode = BuilderMode::Place;
            }
            #[cfg(feature = "cheats")]
            Event::CheatApplied { round, .. } => {
                self.round = *round;
                if !self.can_upgrade() && self.mode == BuilderMode::Upgrade {
                    self.mode = BuilderMode::Place;
                }
            }
            _ => {}
        }
    }
}
