use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Tiles per rendering chunk along each axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkLayout {
    pub chunk_width: Coord,
    pub chunk_height: Coord,
}

impl ChunkLayout {
    pub fn new(chunk_width: Coord, chunk_height: Coord) -> Self {
        Self {
            chunk_width: chunk_width.max(1),
            chunk_height: chunk_height.max(1),
        }
    }

    /// Sizes chunks so a `view` pixel viewport of `tile` pixel tiles spans at most two chunks
    /// per axis.
    pub fn for_view(view: (u32, u32), tile: (u32, u32)) -> Self {
        Self::new(view.0 / tile.0.max(1) + 1, view.1 / tile.1.max(1) + 1)
    }

    /// Chunk that contains the tile at `coords`.
    pub fn chunk_of(&self, (x, y): Coord2) -> Coord2 {
        (x / self.chunk_width, y / self.chunk_height)
    }

    pub fn chunk_region(&self, (cx, cy): Coord2) -> Region {
        Region::new(
            cx.saturating_mul(self.chunk_width),
            cy.saturating_mul(self.chunk_height),
            self.chunk_width,
            self.chunk_height,
        )
    }
}

/// Live game grid: the encoded tiles plus mine and progress bookkeeping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    config: GameConfig,
    matrix: ByteMatrix,
    mines_remaining: isize,
    opened_tiles: CellCount,
    generated: bool,
}

impl Board {
    /// Creates an empty board of `size` = `(columns, rows)`.
    ///
    /// It holds no mines until [`Board::generate`].
    pub fn new(size: Coord2) -> Result<Self> {
        let config = GameConfig::new(size, 0)?;
        Ok(Self {
            config,
            matrix: ByteMatrix::new(size.1 as usize, size.0 as usize),
            mines_remaining: 0,
            opened_tiles: 0,
            generated: false,
        })
    }

    pub fn generate(
        &mut self,
        mines: CellCount,
        generator: &mut impl MinefieldGenerator,
        progress: &mut dyn ProgressSink,
    ) -> Result<()> {
        if self.generated {
            return Err(GameError::AlreadyGenerated);
        }
        let config = GameConfig::new(self.config.size, mines)?;

        self.matrix = generator.generate(config, progress);
        self.config = config;
        self.mines_remaining = mines as isize;
        self.generated = true;
        Ok(())
    }

    /// Wraps a freshly generated matrix, such as the result of a background generation.
    pub fn from_generated(config: GameConfig, data: Vec<u8>) -> Result<Self> {
        let config = GameConfig::new(config.size, config.mines)?;
        let matrix = ByteMatrix::from_raw(config.rows() as usize, config.cols() as usize, data)?;
        Ok(Self {
            config,
            matrix,
            mines_remaining: config.mines as isize,
            opened_tiles: 0,
            generated: true,
        })
    }

    /// Restores a board exported with [`Board::as_raw`], recounting flags and opened tiles.
    pub fn from_raw(config: GameConfig, data: Vec<u8>) -> Result<Self> {
        let mut board = Self::from_generated(config, data)?;

        let mut flags = 0;
        let mut opened = 0;
        for &value in board.matrix.as_raw() {
            if tile::is_flag(value) {
                flags += 1;
            }
            if !tile::is_hidden(value) && !tile::is_mine(value) {
                opened += 1;
            }
        }
        board.mines_remaining = config.mines as isize - flags;
        board.opened_tiles = opened;
        Ok(board)
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    pub fn is_generated(&self) -> bool {
        self.generated
    }

    pub fn mines_total(&self) -> CellCount {
        self.config.mines
    }

    /// Mines minus flags placed; negative when the player over-flags.
    pub fn mines_remaining(&self) -> isize {
        self.mines_remaining
    }

    pub fn opened_tiles(&self) -> CellCount {
        self.opened_tiles
    }

    pub fn safe_tiles(&self) -> CellCount {
        self.config.safe_tiles()
    }

    pub fn in_bounds(&self, (x, y): Coord2) -> bool {
        x < self.config.cols() && y < self.config.rows()
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.in_bounds(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn get_value(&self, coords: Coord2) -> u8 {
        debug_assert!(self.in_bounds(coords), "{coords:?} out of bounds");
        self.matrix.tile(coords)
    }

    pub fn is_hidden(&self, coords: Coord2) -> bool {
        tile::is_hidden(self.get_value(coords))
    }

    pub fn is_flag(&self, coords: Coord2) -> bool {
        tile::is_flag(self.get_value(coords))
    }

    pub fn tile(&self, coords: Coord2) -> Tile {
        Tile::decode(self.get_value(coords))
    }

    pub fn toggle_flag<O: GameObserver + ?Sized>(
        &mut self,
        coords: Coord2,
        observer: &mut O,
    ) -> Result<MarkOutcome> {
        let coords = self.validate_coords(coords)?;
        let value = self.matrix.tile(coords);

        let Some(toggled) = tile::toggle_flag(value) else {
            return Ok(MarkOutcome::NoChange);
        };
        self.matrix.set_tile(coords, toggled);
        if tile::is_flag(toggled) {
            self.mines_remaining -= 1;
        } else {
            self.mines_remaining += 1;
        }

        observer.on_mines_remaining(self.mines_remaining);
        Ok(MarkOutcome::Changed)
    }

    /// Copies the tiles of `region` that lie on the board, indexed `[row, col]`.
    pub fn chunk_window(&self, region: Region) -> Array2<u8> {
        self.matrix.window(region)
    }

    pub fn chunk(&self, layout: ChunkLayout, chunk: Coord2) -> Array2<u8> {
        self.chunk_window(layout.chunk_region(chunk))
    }

    pub fn matrix(&self) -> &ByteMatrix {
        &self.matrix
    }

    pub fn as_raw(&self) -> &[u8] {
        self.matrix.as_raw()
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.matrix.into_raw()
    }

    pub(crate) fn matrix_mut(&mut self) -> &mut ByteMatrix {
        &mut self.matrix
    }

    /// Removes the hidden layer at `coords` and returns the revealed value.
    pub(crate) fn uncover(&mut self, coords: Coord2) -> u8 {
        let value = tile::reveal(self.matrix.tile(coords));
        self.matrix.set_tile(coords, value);
        value
    }

    pub(crate) fn record_opened(&mut self) -> CellCount {
        self.opened_tiles += 1;
        self.opened_tiles
    }

    /// Uncovers every mine, leaving all other tiles alone.
    pub(crate) fn uncover_mines(&mut self) {
        for value in self.matrix_mut().as_raw_mut() {
            if tile::is_mine(*value) {
                *value = tile::reveal(*value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[derive(Default)]
    struct Remaining(Vec<isize>);

    impl GameObserver for Remaining {
        fn on_mines_remaining(&mut self, remaining: isize) {
            self.0.push(remaining);
        }
    }

    fn sample_board() -> Board {
        let data = vec![
            100, 101, 110, 101, //
            100, 101, 101, 101, //
            100, 100, 100, 100, //
            100, 100, 100, 100,
        ];
        Board::from_generated(GameConfig::new((4, 4), 1).unwrap(), data).unwrap()
    }

    #[test]
    fn queries_decode_tiles() {
        let board = sample_board();

        assert_eq!(board.get_value((2, 0)), tile::HIDDEN_MINE);
        assert!(board.is_hidden((0, 0)));
        assert!(!board.is_flag((0, 0)));
        assert_eq!(board.tile((1, 0)).content, TileContent::Count(1));
        assert!(board.in_bounds((3, 3)));
        assert!(!board.in_bounds((4, 0)));
        assert_eq!(board.validate_coords((0, 4)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn flag_toggle_tracks_mines_remaining() {
        let mut board = sample_board();
        let mut observer = Remaining::default();

        for _ in 0..4 {
            assert_eq!(
                board.toggle_flag((1, 1), &mut observer),
                Ok(MarkOutcome::Changed)
            );
        }

        assert_eq!(board.mines_remaining(), 1);
        assert_eq!(observer.0, [0, 1, 0, 1]);
        assert_eq!(board.get_value((1, 1)), 101);
    }

    #[test]
    fn over_flagging_goes_negative() {
        let mut board = sample_board();
        board.toggle_flag((0, 0), &mut ()).unwrap();
        board.toggle_flag((0, 1), &mut ()).unwrap();

        assert_eq!(board.mines_remaining(), -1);
        assert_eq!(board.get_value((0, 0)), 150);
    }

    #[test]
    fn flag_on_visible_tile_is_ignored() {
        let mut board = sample_board();
        board.uncover((0, 0));
        let mut observer = Remaining::default();

        let outcome = board.toggle_flag((0, 0), &mut observer).unwrap();

        assert_eq!(outcome, MarkOutcome::NoChange);
        assert_eq!(board.get_value((0, 0)), 0);
        assert!(observer.0.is_empty());
    }

    #[test]
    fn generate_only_once() {
        let mut board = Board::new((5, 4)).unwrap();
        let mut generator = ReservoirGenerator::new(11);

        board.generate(6, &mut generator, &mut NoProgress).unwrap();
        assert_eq!(board.mines_total(), 6);
        assert_eq!(board.mines_remaining(), 6);
        assert_eq!(board.safe_tiles(), 14);

        assert_eq!(
            board.generate(6, &mut generator, &mut NoProgress),
            Err(GameError::AlreadyGenerated)
        );
    }

    #[test]
    fn from_raw_recounts_progress() {
        let data = vec![
            0, 1, 160, //
            0, 1, 101, //
            100, 150, 100,
        ];
        let board = Board::from_raw(GameConfig::new((3, 3), 1).unwrap(), data).unwrap();

        assert_eq!(board.opened_tiles(), 4);
        assert_eq!(board.mines_remaining(), -1);
        assert_eq!(board.as_raw()[2], 160);
    }

    #[test]
    fn from_raw_rejects_wrong_length() {
        let config = GameConfig::new((3, 3), 1).unwrap();
        assert!(matches!(
            Board::from_raw(config, vec![100; 8]),
            Err(GameError::InvalidBufferLength { expected: 9, actual: 8 })
        ));
    }

    #[test]
    fn chunks_cover_the_board() {
        let board = sample_board();
        let layout = ChunkLayout::for_view((25, 15), (10, 10));
        assert_eq!(layout, ChunkLayout::new(3, 2));

        assert_eq!(layout.chunk_of((3, 3)), (1, 1));
        let first = board.chunk(layout, (0, 0));
        assert_eq!(first.dim(), (2, 3));
        assert_eq!(first[(0, 2)], tile::HIDDEN_MINE);

        let last = board.chunk(layout, (1, 1));
        assert_eq!(last.dim(), (2, 1));
        assert!(last.iter().all(|&v| v == tile::HIDDEN_BLANK));
    }
}
