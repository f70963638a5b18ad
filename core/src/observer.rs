use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Won,
    Lost,
}

/// Hooks through which renderers and UI code follow a game.
///
/// Every method defaults to doing nothing, and `()` is the observer that ignores everything.
pub trait GameObserver {
    /// Tile values changed and any cached view of the board is stale.
    fn on_visible_change(&mut self) {}

    /// Called exactly once, on the transition into a terminal state.
    fn on_game_over(&mut self, _outcome: GameOutcome) {}

    /// A flag was placed or removed.
    fn on_mines_remaining(&mut self, _remaining: isize) {}
}

impl GameObserver for () {}
