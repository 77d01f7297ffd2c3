use crate::*;
pub use random::*;

mod random;

/// Number of choices offered on each choice turn.
pub const CHOICES_PER_TURN: usize = 2;

pub trait ChoiceGenerator {
    fn generate(&mut self, grid: &Grid) -> [Choice; CHOICES_PER_TURN];
}
