use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Coordinates are outside the board")]
    OutOfBounds,
    #[error("Cell is already occupied")]
    OccupiedCell,
    #[error("Chunk shape covers no cells")]
    EmptyShape,
    #[error("A border path is already being drawn")]
    PathAlreadyOpen,
    #[error("No border path is being drawn")]
    NoOpenPath,
    #[error("Vertex is not next to the end of the path")]
    NotAdjacent,
    #[error("Border segment is already drawn")]
    SegmentTaken,
    #[error("Border path would cross itself")]
    PathCrossesItself,
    #[error("Border path would cross a committed loop")]
    CrossesLoop,
    #[error("Vertex is not on the current path")]
    NotOnPath,
    #[error("Closing this loop would exceed the border budget")]
    LoopBudgetExceeded,
    #[error("Action is not allowed in the current phase")]
    WrongPhase,
    #[error("Cell lies outside the chosen chunk")]
    OutsideChunk,
    #[error("Game already ended, no new moves are accepted")]
    GameOver,
    #[error("Game has not ended yet")]
    GameNotOver,
    #[error("Game state is inconsistent")]
    InvalidState,
}

pub type Result<T> = core::result::Result<T, GameError>;
