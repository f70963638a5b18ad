use alloc::collections::VecDeque;
use serde::{Deserialize, Serialize};

use crate::*;

pub const DEFAULT_FLOOD_BATCH: usize = 1000;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Queue entries a flood fill consumes before handing control back to the host.
    pub flood_batch_size: usize,
    /// Move the mine away when the first reveal of a game lands on one.
    pub first_click_safety: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            flood_batch_size: DEFAULT_FLOOD_BATCH,
            first_click_safety: true,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Playing,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::Playing
    }
}

impl From<GameOutcome> for GameState {
    fn from(outcome: GameOutcome) -> Self {
        match outcome {
            GameOutcome::Won => Self::Won,
            GameOutcome::Lost => Self::Lost,
        }
    }
}

/// Breadth-first reveal that has not drained its queue yet.
#[derive(Clone, Debug, Default)]
struct FloodFill {
    queue: VecDeque<Coord2>,
}

impl FloodFill {
    fn seeded(start: Coord2) -> Self {
        Self {
            queue: VecDeque::from([start]),
        }
    }
}

/// Gameplay state machine driving a [`Board`].
///
/// Flood fills are time sliced: [`RevealEngine::open_tile`] runs the first batch and, when
/// tiles remain queued, returns [`RevealOutcome::Pending`]. The host then calls
/// [`RevealEngine::resume`] once per scheduler tick until the fill completes. While a fill is
/// pending no other move is accepted.
#[derive(Clone, Debug)]
pub struct RevealEngine<O = (), G = ReservoirGenerator> {
    board: Board,
    generator: G,
    observer: O,
    config: EngineConfig,
    state: GameState,
    first_reveal_done: bool,
    pending: Option<FloodFill>,
    triggered_mine: Option<Coord2>,
}

impl<O: GameObserver, G: MinefieldGenerator> RevealEngine<O, G> {
    pub fn new(board: Board, generator: G, observer: O) -> Self {
        Self::with_config(board, generator, observer, EngineConfig::default())
    }

    pub fn with_config(board: Board, generator: G, observer: O, config: EngineConfig) -> Self {
        let first_reveal_done = !config.first_click_safety || board.opened_tiles() > 0;
        Self {
            board,
            generator,
            observer,
            config,
            state: GameState::default(),
            first_reveal_done,
            pending: None,
            triggered_mine: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn into_board(self) -> Board {
        self.board
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn has_pending_fill(&self) -> bool {
        self.pending.is_some()
    }

    /// The mine that ended the game, if it was lost.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn open_tile(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.board.validate_coords(coords)?;
        self.check_playing()?;
        self.check_idle()?;

        let mut value = self.board.get_value(coords);
        if !tile::is_hidden(value) || tile::is_flag(value) {
            return Ok(RevealOutcome::NoChange);
        }

        if !self.first_reveal_done {
            self.first_reveal_done = true;
            if tile::is_mine(value) {
                self.generator.reposition_mine(self.board.matrix_mut(), coords);
                value = self.board.get_value(coords);
            }
        }

        Ok(if value == tile::HIDDEN_BLANK {
            self.pending = Some(FloodFill::seeded(coords));
            self.resume_fill()
        } else {
            self.reveal_single(coords)
        })
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.board.validate_coords(coords)?;
        self.check_playing()?;
        self.check_idle()?;

        let outcome = self.board.toggle_flag(coords, &mut self.observer)?;
        if outcome.has_update() {
            self.observer.on_visible_change();
        }
        Ok(outcome)
    }

    /// Runs the next batch of a pending flood fill.
    pub fn resume(&mut self) -> Result<RevealOutcome> {
        self.check_playing()?;
        Ok(self.resume_fill())
    }

    /// Drains a pending flood fill without yielding.
    pub fn finish_pending(&mut self) -> Result<RevealOutcome> {
        let mut outcome = RevealOutcome::NoChange;
        while self.pending.is_some() {
            outcome = self.resume()?;
        }
        Ok(outcome)
    }

    fn reveal_single(&mut self, coords: Coord2) -> RevealOutcome {
        let value = self.board.uncover(coords);

        if tile::is_mine(value) {
            self.triggered_mine = Some(coords);
            self.end_game(GameOutcome::Lost);
            return RevealOutcome::HitMine;
        }

        if self.board.record_opened() == self.board.safe_tiles() {
            self.end_game(GameOutcome::Won);
            RevealOutcome::Won
        } else {
            self.observer.on_visible_change();
            RevealOutcome::Revealed
        }
    }

    fn resume_fill(&mut self) -> RevealOutcome {
        let Some(mut fill) = self.pending.take() else {
            return RevealOutcome::NoChange;
        };

        if self.run_batch(&mut fill) {
            self.end_game(GameOutcome::Won);
            return RevealOutcome::Won;
        }

        self.observer.on_visible_change();
        if fill.queue.is_empty() {
            RevealOutcome::Revealed
        } else {
            log::debug!("Flood fill yielding with {} tiles queued", fill.queue.len());
            self.pending = Some(fill);
            RevealOutcome::Pending
        }
    }

    /// Consumes up to one batch of the queue. Returns `true` once every safe tile is open.
    fn run_batch(&mut self, fill: &mut FloodFill) -> bool {
        let bounds = self.board.size();

        for _ in 0..self.config.flood_batch_size.max(1) {
            let Some(coords) = fill.queue.pop_front() else {
                break;
            };

            // two blanks can queue the same neighbour
            let value = self.board.get_value(coords);
            if !tile::is_hidden(value) || tile::is_flag(value) {
                continue;
            }

            let value = self.board.uncover(coords);
            if self.board.record_opened() == self.board.safe_tiles() {
                return true;
            }
            if value != 0 {
                continue;
            }

            for next in iter_orthogonal(coords, bounds) {
                let next_value = self.board.get_value(next);
                if tile::is_hidden(next_value)
                    && !tile::is_flag(next_value)
                    && !tile::is_mine(next_value)
                {
                    fill.queue.push_back(next);
                }
            }
        }

        false
    }

    fn end_game(&mut self, outcome: GameOutcome) {
        if self.state.is_finished() {
            return;
        }

        self.state = outcome.into();
        self.pending = None;
        self.board.uncover_mines();
        self.observer.on_visible_change();
        self.observer.on_game_over(outcome);
    }

    fn check_playing(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }

    fn check_idle(&self) -> Result<()> {
        if self.pending.is_some() {
            Err(GameError::FillInProgress)
        } else {
            Ok(())
        }
    }
}
