use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Where the game stands; rounds and turns are 1-based.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Choice { round: u8, turn: u8 },
    Border { round: u8 },
    GameOver,
}

impl Phase {
    pub const fn first() -> Self {
        Self::Choice { round: 1, turn: 1 }
    }

    pub const fn is_choice(self) -> bool {
        matches!(self, Self::Choice { .. })
    }

    pub const fn is_border(self) -> bool {
        matches!(self, Self::Border { .. })
    }

    pub const fn is_over(self) -> bool {
        matches!(self, Self::GameOver)
    }

    pub const fn round(self) -> Option<u8> {
        match self {
            Self::Choice { round, .. } | Self::Border { round } => Some(round),
            Self::GameOver => None,
        }
    }

    /// The phase following this one once its turn is completed.
    pub const fn advance(self, config: &GameConfig) -> Self {
        match self {
            Self::Choice { round, turn } if turn < config.choices_per_round => Self::Choice {
                round,
                turn: turn + 1,
            },
            Self::Choice { round, .. } => Self::Border { round },
            Self::Border { round } if round < config.rounds => Self::Choice {
                round: round + 1,
                turn: 1,
            },
            Self::Border { .. } | Self::GameOver => Self::GameOver,
        }
    }

    /// 1-based position in the whole turn sequence, border turns included.
    pub const fn turn_number(self, config: &GameConfig) -> u16 {
        let per_round = config.choices_per_round as u16 + 1;
        match self {
            Self::Choice { round, turn } => (round as u16).saturating_sub(1) * per_round + turn as u16,
            Self::Border { round } => round as u16 * per_round,
            Self::GameOver => config.total_turns() + 1,
        }
    }

    /// Whether the round and turn lie within `config`.
    pub const fn fits(self, config: &GameConfig) -> bool {
        match self {
            Self::Choice { round, turn } => {
                round >= 1 && round <= config.rounds && turn >= 1 && turn <= config.choices_per_round
            }
            Self::Border { round } => round >= 1 && round <= config.rounds,
            Self::GameOver => true,
        }
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::first()
    }
}

/// The pair of choices shown on a choice turn.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub chosen: Choice,
    pub discarded: Choice,
}

/// A completed turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnRecord {
    /// `offer` is set when the tile came from [`GameEngine::place_choice`].
    Placed {
        kind: TileKind,
        cells: Vec<Coord2>,
        offer: Option<Offer>,
    },
    Bordered { vertices: Vec<Vertex> },
    SkippedBorder,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEngine {
    config: GameConfig,
    grid: Grid,
    borders: BorderGraph,
    phase: Phase,
    history: Vec<TurnRecord>,
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl GameEngine {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            grid: Grid::new(),
            borders: BorderGraph::new(config.segment_budget),
            phase: Phase::first(),
            history: Vec::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_over()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn borders(&self) -> &BorderGraph {
        &self.borders
    }

    pub fn history(&self) -> &[TurnRecord] {
        &self.history
    }

    pub fn turn_number(&self) -> u16 {
        self.phase.turn_number(&self.config)
    }

    /// Places `kind` over a chunk shape and ends the choice turn.
    pub fn place(&mut self, shape: &ChunkShape, anchor: Coord2, kind: TileKind) -> Result<()> {
        self.place_recorded(shape, anchor, kind, None)
    }

    /// Places a single tile of the chosen kind at `coords` inside its chunk,
    /// recording both offered choices.
    pub fn place_choice(&mut self, chosen: &Choice, discarded: &Choice, coords: Coord2) -> Result<()> {
        self.check_choice_turn()?;
        let coords = validate_coords(coords)?;
        if !chosen.contains(coords) {
            return Err(GameError::OutsideChunk);
        }

        let offer = Offer {
            chosen: *chosen,
            discarded: *discarded,
        };
        self.place_recorded(&ChunkShape::single(), coords, chosen.kind, Some(offer))
    }

    fn place_recorded(
        &mut self,
        shape: &ChunkShape,
        anchor: Coord2,
        kind: TileKind,
        offer: Option<Offer>,
    ) -> Result<()> {
        self.check_choice_turn()?;
        let cells = shape.cells_at(anchor)?;
        self.grid.place(shape, anchor, kind)?;

        self.history.push(TurnRecord::Placed {
            kind,
            cells: cells.into_vec(),
            offer,
        });
        self.advance();
        Ok(())
    }

    pub fn start_path(&mut self, vertex: Vertex) -> Result<()> {
        self.check_border_turn()?;
        self.borders.start_path(vertex)
    }

    /// Extends the open path; a closed loop ends the border turn.
    pub fn extend_path(&mut self, vertex: Vertex) -> Result<PathStep> {
        self.check_border_turn()?;
        let step = self.borders.extend_path(vertex)?;

        if step.is_closed() {
            let vertices = self.borders.loops().last().cloned().unwrap_or_default();
            self.history.push(TurnRecord::Bordered { vertices });
            self.advance();
        }
        Ok(step)
    }

    pub fn cancel_path(&mut self) -> Result<Option<Vec<Vertex>>> {
        self.check_border_turn()?;
        Ok(self.borders.cancel_path())
    }

    pub fn rewind_to(&mut self, vertex: Vertex) -> Result<()> {
        self.check_border_turn()?;
        self.borders.rewind_to(vertex)
    }

    /// Ends the border turn without drawing, discarding any open path.
    pub fn skip_border(&mut self) -> Result<()> {
        self.check_border_turn()?;
        if let Some(path) = self.borders.cancel_path() {
            log::debug!("Discarded open path of {} vertices", path.len());
        }
        self.history.push(TurnRecord::SkippedBorder);
        self.advance();
        Ok(())
    }

    pub fn regions(&self) -> RegionMap {
        classify_regions(&self.borders)
    }

    /// Score of the board as it stands, for previews.
    pub fn score(&self) -> ScoreBreakdown {
        compute_score(&self.grid, &self.regions())
    }

    pub fn final_score(&self) -> Result<ScoreBreakdown> {
        if self.is_finished() {
            Ok(self.score())
        } else {
            Err(GameError::GameNotOver)
        }
    }

    /// Checks state that arrived through deserialization before it is played on.
    pub fn validate(&self) -> Result<()> {
        let config = self.config;
        if config != GameConfig::new(config.rounds, config.choices_per_round, config.segment_budget) {
            log::warn!("Config {:?} is out of range", config);
            return Err(GameError::InvalidState);
        }
        if !self.phase.fits(&config) {
            log::warn!("Phase {:?} does not fit {:?}", self.phase, config);
            return Err(GameError::InvalidState);
        }
        if self.borders.budget() != config.segment_budget {
            log::warn!("Border budget {} differs from config", self.borders.budget());
            return Err(GameError::InvalidState);
        }
        if self.borders.is_drawing() && !self.phase.is_border() {
            log::warn!("Open path outside a border turn");
            return Err(GameError::InvalidState);
        }

        self.grid.validate()?;
        self.borders.validate()
    }

    fn advance(&mut self) {
        let next = self.phase.advance(&self.config);
        log::debug!("Phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }

    fn check_choice_turn(&self) -> Result<()> {
        match self.phase {
            Phase::Choice { .. } => Ok(()),
            Phase::Border { .. } => Err(GameError::WrongPhase),
            Phase::GameOver => Err(GameError::GameOver),
        }
    }

    fn check_border_turn(&self) -> Result<()> {
        match self.phase {
            Phase::Border { .. } => Ok(()),
            Phase::Choice { .. } => Err(GameError::WrongPhase),
            Phase::GameOver => Err(GameError::GameOver),
        }
    }
}
