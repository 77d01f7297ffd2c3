#![no_std]

//! Game core for a 9×9 island-drawing tile puzzle.
//!
//! Players fill the board with tiles during choice turns and, at the end of
//! each round, draw one closed border loop along the vertex lattice. Loops
//! nest into sea, islands and lakes; [`classify_regions`] derives that
//! terrain and [`compute_score`] evaluates every tile against it.

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use border::*;
pub use choice::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use regions::*;
pub use scoring::*;
pub use tile::*;
pub use types::*;

mod border;
mod choice;
mod engine;
mod error;
mod generator;
mod grid;
mod regions;
mod scoring;
mod tile;
mod types;

/// Every lattice edge on the board.
pub const MAX_SEGMENTS: CellCount = 2 * mult(LATTICE_SIZE, BOARD_SIZE);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    pub rounds: u8,
    pub choices_per_round: u8,
    pub segment_budget: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(rounds: u8, choices_per_round: u8, segment_budget: CellCount) -> Self {
        Self {
            rounds,
            choices_per_round,
            segment_budget,
        }
    }

    /// Clamps so that every choice turn fits on the board and a loop can always be afforded.
    pub fn new(rounds: u8, choices_per_round: u8, segment_budget: CellCount) -> Self {
        let max_cells = u8::try_from(TOTAL_CELLS).unwrap_or(u8::MAX);
        let rounds = rounds.clamp(1, max_cells);
        let choices_per_round = choices_per_round.clamp(1, max_cells / rounds);
        let segment_budget = segment_budget.clamp(MIN_LOOP_SEGMENTS as CellCount, MAX_SEGMENTS);
        Self::new_unchecked(rounds, choices_per_round, segment_budget)
    }

    /// Choice and border turns over the whole game.
    pub const fn total_turns(&self) -> u16 {
        self.rounds as u16 * (self.choices_per_round as u16 + 1)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(3, 9, DEFAULT_SEGMENT_BUDGET)
    }
}
