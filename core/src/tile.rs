//! Single-byte tile encoding.
//!
//! A tile value stacks two additive layers on top of a base value: the base is
//! an adjacency count (`0..=8`) or [`MINE`], [`FLAG_OFFSET`] marks a flag and
//! [`HIDDEN_OFFSET`] marks a tile that has not been revealed. The legal values
//! therefore fall into four disjoint bands:
//!
//! | band | values |
//! |---|---|
//! | visible | `0..=10` |
//! | visible, flagged | `50..=60` |
//! | hidden | `100..=110` |
//! | hidden, flagged | `150..=160` |

use serde::{Deserialize, Serialize};

pub const MINE: u8 = 10;
pub const FLAG_OFFSET: u8 = 50;
pub const HIDDEN_OFFSET: u8 = 100;

/// A hidden, unflagged tile without adjacent mines.
pub const HIDDEN_BLANK: u8 = HIDDEN_OFFSET;

/// A hidden, unflagged mine.
pub const HIDDEN_MINE: u8 = MINE + HIDDEN_OFFSET;

/// Strips the hidden and flag layers, leaving the count or [`MINE`].
pub const fn base(value: u8) -> u8 {
    value % HIDDEN_OFFSET % FLAG_OFFSET
}

pub const fn is_mine(value: u8) -> bool {
    base(value) == MINE
}

pub const fn is_hidden(value: u8) -> bool {
    value >= HIDDEN_OFFSET
}

pub const fn is_flag(value: u8) -> bool {
    value % HIDDEN_OFFSET >= FLAG_OFFSET
}

/// Adjacent mine count, or `None` for a mine.
pub const fn count(value: u8) -> Option<u8> {
    match base(value) {
        MINE => None,
        n => Some(n),
    }
}

/// Flips the flag layer. Visible unflagged tiles cannot carry a flag and yield `None`.
pub const fn toggle_flag(value: u8) -> Option<u8> {
    if is_flag(value) {
        Some(value - FLAG_OFFSET)
    } else if is_hidden(value) {
        Some(value + FLAG_OFFSET)
    } else {
        None
    }
}

/// Removes the hidden layer, leaving the flag layer untouched.
pub const fn reveal(value: u8) -> u8 {
    if is_hidden(value) {
        value - HIDDEN_OFFSET
    } else {
        value
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileContent {
    Count(u8),
    Mine,
}

/// Decoded view of a tile value, for collaborators that prefer not to do arithmetic on bytes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub hidden: bool,
    pub flagged: bool,
    pub content: TileContent,
}

impl Tile {
    pub const fn decode(value: u8) -> Self {
        Self {
            hidden: is_hidden(value),
            flagged: is_flag(value),
            content: match count(value) {
                Some(n) => TileContent::Count(n),
                None => TileContent::Mine,
            },
        }
    }

    pub const fn encode(self) -> u8 {
        let mut value = match self.content {
            TileContent::Count(n) => n,
            TileContent::Mine => MINE,
        };
        if self.flagged {
            value += FLAG_OFFSET;
        }
        if self.hidden {
            value += HIDDEN_OFFSET;
        }
        value
    }

    /// Whether the player may act on this tile by revealing it.
    pub const fn is_revealable(self) -> bool {
        self.hidden && !self.flagged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_are_disjoint() {
        for value in 0..=MINE {
            assert!(!is_hidden(value) && !is_flag(value));
            assert!(!is_hidden(value + FLAG_OFFSET) && is_flag(value + FLAG_OFFSET));
            assert!(is_hidden(value + HIDDEN_OFFSET) && !is_flag(value + HIDDEN_OFFSET));
            let both = value + HIDDEN_OFFSET + FLAG_OFFSET;
            assert!(is_hidden(both) && is_flag(both));
            assert_eq!(base(both), value);
        }
    }

    #[test]
    fn documented_examples() {
        assert_eq!(Tile::decode(100), Tile {
            hidden: true,
            flagged: false,
            content: TileContent::Count(0),
        });
        assert_eq!(Tile::decode(110).content, TileContent::Mine);
        assert_eq!(Tile::decode(153), Tile {
            hidden: true,
            flagged: true,
            content: TileContent::Count(3),
        });
    }

    #[test]
    fn toggle_flag_is_an_involution_on_hidden_tiles() {
        for value in HIDDEN_OFFSET..=HIDDEN_MINE {
            let flagged = toggle_flag(value).unwrap();
            assert_eq!(flagged, value + FLAG_OFFSET);
            assert_eq!(toggle_flag(flagged), Some(value));
        }
    }

    #[test]
    fn toggle_flag_ignores_visible_tiles() {
        assert_eq!(toggle_flag(0), None);
        assert_eq!(toggle_flag(MINE), None);
        assert_eq!(toggle_flag(53), Some(3));
    }

    #[test]
    fn reveal_keeps_flag_layer() {
        assert_eq!(reveal(HIDDEN_MINE), MINE);
        assert_eq!(reveal(160), 60);
        assert_eq!(reveal(4), 4);
    }

    #[test]
    fn encode_inverts_decode() {
        for value in [0, 8, 10, 50, 58, 60, 100, 103, 110, 150, 157, 160] {
            assert_eq!(Tile::decode(value).encode(), value);
        }
    }
}
