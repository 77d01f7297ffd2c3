use rand::prelude::*;

use super::*;

/// Draws limit before a choice is offered even though its chunk is full.
const MAX_ATTEMPTS: usize = 32;

/// Uniformly random tile kind, chunk kind and chunk number, preferring chunks that still have room.
#[derive(Clone, Debug)]
pub struct RandomChoiceGenerator {
    rng: SmallRng,
}

impl RandomChoiceGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    fn draw(&mut self) -> Choice {
        Choice {
            kind: TileKind::ALL[self.rng.random_range(0..TileKind::ALL.len())],
            chunk: ChunkKind::ALL[self.rng.random_range(0..ChunkKind::ALL.len())],
            position: self.rng.random_range(1..=BOARD_SIZE),
        }
    }

    fn draw_with_room(&mut self, grid: &Grid) -> Choice {
        let mut choice = self.draw();
        for _ in 1..MAX_ATTEMPTS {
            if choice.has_room(grid) {
                return choice;
            }
            choice = self.draw();
        }

        if !choice.has_room(grid) {
            log::warn!(
                "No chunk with room found after {} draws, offering a full one",
                MAX_ATTEMPTS
            );
        }
        choice
    }
}

impl ChoiceGenerator for RandomChoiceGenerator {
    fn generate(&mut self, grid: &Grid) -> [Choice; CHOICES_PER_TURN] {
        core::array::from_fn(|_| self.draw_with_room(grid))
    }
}
