//! Save-file format for tiny-islands games.
//!
//! A save holds the whole [`GameEngine`], so tiles, committed loops, any
//! half-drawn path and the current phase all survive a reload and produce
//! identical terrain and scores.

use std::io::{Read, Write};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tiny_islands_core::{CellCount, GameEngine, GameError, Phase, Points};

pub const SAVE_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Malformed save data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Could not access save data: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported save version {found}")]
    UnsupportedVersion { found: u32 },
    #[error("Save holds an impossible game: {0}")]
    InvalidGame(#[from] GameError),
}

pub type Result<T> = std::result::Result<T, ProtocolError>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveState {
    pub version: u32,
    pub game_id: String,
    pub created_at: DateTime<Utc>,
    pub engine: GameEngine,
}

#[derive(Deserialize)]
struct VersionHeader {
    version: u32,
}

impl SaveState {
    pub fn new(engine: GameEngine) -> Self {
        let created_at = Utc::now();
        Self::with_id(game_id_for(created_at), created_at, engine)
    }

    pub fn with_id(game_id: impl Into<String>, created_at: DateTime<Utc>, engine: GameEngine) -> Self {
        Self {
            version: SAVE_VERSION,
            game_id: game_id.into(),
            created_at,
            engine,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(data: &str) -> Result<Self> {
        let header: VersionHeader = serde_json::from_str(data)?;
        if header.version != SAVE_VERSION {
            log::warn!("Refusing save with version {}", header.version);
            return Err(ProtocolError::UnsupportedVersion {
                found: header.version,
            });
        }
        let state: Self = serde_json::from_str(data)?;
        state.engine.validate()?;
        Ok(state)
    }

    pub fn write_to(&self, mut writer: impl Write) -> Result<()> {
        writer.write_all(self.to_json()?.as_bytes())?;
        writer.flush()?;
        log::debug!("Saved game {} at turn {}", self.game_id, self.engine.turn_number());
        Ok(())
    }

    pub fn read_from(mut reader: impl Read) -> Result<Self> {
        let mut data = String::new();
        reader.read_to_string(&mut data)?;
        let state = Self::from_json(&data)?;
        log::debug!("Loaded game {} at turn {}", state.game_id, state.engine.turn_number());
        Ok(state)
    }

    pub fn summary(&self) -> GameSummary {
        let engine = &self.engine;
        let borders = engine.borders();

        GameSummary {
            game_id: self.game_id.clone(),
            phase: engine.phase(),
            round: engine.phase().round(),
            turn_number: engine.turn_number(),
            total_turns: engine.config().total_turns(),
            turns_played: engine.history().len(),
            tiles_placed: engine.grid().tile_count(),
            segments_drawn: borders.segment_count(),
            segments_remaining: borders.remaining_budget(),
            island_count: engine.regions().island_count(),
            points: engine.score().total,
            game_ended: engine.is_finished(),
        }
    }
}

/// Identifier derived from the creation time, e.g. `game_20240131_235959`.
pub fn game_id_for(created_at: DateTime<Utc>) -> String {
    created_at.format("game_%Y%m%d_%H%M%S").to_string()
}

/// Status line data for a saved game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    pub game_id: String,
    pub phase: Phase,
    pub round: Option<u8>,
    pub turn_number: u16,
    pub total_turns: u16,
    pub turns_played: usize,
    pub tiles_placed: CellCount,
    pub segments_drawn: CellCount,
    pub segments_remaining: CellCount,
    pub island_count: usize,
    /// Preview score; final only once `game_ended` is set.
    pub points: Points,
    pub game_ended: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::{Value, json};
    use tiny_islands_core::{ChunkKind, ChunkShape, Choice, Offer, TileKind, TurnRecord};

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap()
    }

    /// First round played out, one loop half drawn.
    fn mid_border_turn() -> GameEngine {
        let mut engine = GameEngine::default();
        let kinds = [TileKind::House, TileKind::Church, TileKind::Ship];
        for (turn, kind) in (0..9u8).zip(kinds.iter().copied().cycle()) {
            engine
                .place(&ChunkShape::single(), (turn / 3 + 1, turn % 3 + 1), kind)
                .unwrap();
        }
        engine.start_path((1, 1)).unwrap();
        for vertex in [(1, 2), (1, 3), (1, 4), (2, 4)] {
            engine.extend_path(vertex).unwrap();
        }
        engine
    }

    #[test]
    fn mid_turn_save_round_trips() {
        let save = SaveState::with_id("game_test", timestamp(), mid_border_turn());

        let mut buffer = Vec::new();
        save.write_to(&mut buffer).unwrap();
        let loaded = SaveState::read_from(buffer.as_slice()).unwrap();

        assert_eq!(loaded, save);
        assert_eq!(loaded.engine.phase(), Phase::Border { round: 1 });
        assert_eq!(
            loaded.engine.borders().path(),
            Some(&[(1, 1), (1, 2), (1, 3), (1, 4), (2, 4)][..])
        );
        assert_eq!(loaded.engine.score(), save.engine.score());
    }

    #[test]
    fn reloaded_game_can_finish_its_loop() {
        let save = SaveState::with_id("game_test", timestamp(), mid_border_turn());
        let mut loaded = SaveState::from_json(&save.to_json().unwrap()).unwrap();

        for vertex in [(3, 4), (4, 4), (4, 3), (4, 2), (4, 1), (3, 1), (2, 1)] {
            loaded.engine.extend_path(vertex).unwrap();
        }
        let step = loaded.engine.extend_path((1, 1)).unwrap();

        assert!(step.is_closed());
        assert_eq!(loaded.engine.phase(), Phase::Choice { round: 2, turn: 1 });
        assert!(loaded.engine.regions().is_land((2, 2)));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let mut save = SaveState::with_id("game_test", timestamp(), GameEngine::default());
        save.version = SAVE_VERSION + 1;

        let result = SaveState::from_json(&save.to_json().unwrap());

        assert!(matches!(
            result,
            Err(ProtocolError::UnsupportedVersion { found }) if found == SAVE_VERSION + 1
        ));
    }

    #[test]
    fn offered_choices_survive_the_round_trip() {
        let mut engine = GameEngine::default();
        let chosen = Choice::new(TileKind::Beach, ChunkKind::Row, 4).unwrap();
        let discarded = Choice::new(TileKind::Forest, ChunkKind::Column, 7).unwrap();
        engine.place_choice(&chosen, &discarded, (3, 8)).unwrap();
        let save = SaveState::with_id("game_test", timestamp(), engine);

        let loaded = SaveState::from_json(&save.to_json().unwrap()).unwrap();

        assert_eq!(
            loaded.engine.history(),
            &[TurnRecord::Placed {
                kind: TileKind::Beach,
                cells: vec![(3, 8)],
                offer: Some(Offer { chosen, discarded }),
            }]
        );
    }

    fn tampered(edit: impl FnOnce(&mut Value)) -> Result<SaveState> {
        let save = SaveState::with_id("game_test", timestamp(), mid_border_turn());
        let mut value = serde_json::to_value(&save).unwrap();
        edit(&mut value["engine"]);
        SaveState::from_json(&value.to_string())
    }

    #[test]
    fn impossible_games_are_rejected_on_load() {
        let edits: [fn(&mut Value); 4] = [
            |engine| engine["borders"]["path"] = json!([]),
            |engine| engine["grid"]["cells"] = json!({"v": 1, "dim": [2, 2], "data": [null, null, null, null]}),
            |engine| engine["phase"] = json!({"Choice": {"round": 0, "turn": 1}}),
            |engine| engine["borders"]["loops"] = json!([[[2, 2], [2, 3], [2, 5]]]),
        ];

        for edit in edits {
            assert!(matches!(
                tampered(edit),
                Err(ProtocolError::InvalidGame(GameError::InvalidState))
            ));
        }
        assert!(tampered(|_| ()).is_ok());
    }

    #[test]
    fn garbage_is_a_json_error() {
        assert!(matches!(
            SaveState::from_json("{\"version\": 1"),
            Err(ProtocolError::Json(_))
        ));
    }

    #[test]
    fn summary_reports_progress() {
        let save = SaveState::with_id(game_id_for(timestamp()), timestamp(), mid_border_turn());

        let summary = save.summary();

        assert_eq!(summary.game_id, "game_20240131_235959");
        assert_eq!(summary.round, Some(1));
        assert_eq!(summary.turn_number, 10);
        assert_eq!(summary.total_turns, 30);
        assert_eq!(summary.turns_played, 9);
        assert_eq!(summary.tiles_placed, 9);
        assert_eq!(summary.segments_drawn, 0);
        assert_eq!(summary.segments_remaining, 24);
        assert_eq!(summary.island_count, 0);
        assert!(!summary.game_ended);
    }
}
