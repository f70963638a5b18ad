use alloc::vec::Vec;
use rand::prelude::*;
use rand::rngs::SmallRng;

use super::*;

/// Random draws made when looking for a free cell to receive a relocated mine.
pub const RELOCATION_TRIES: usize = 10;

/// Uniform generator: a single reservoir-sampling pass picks the mine cells, a second
/// pass stamps every other cell with its adjacency count.
#[derive(Clone, Debug)]
pub struct ReservoirGenerator {
    rng: SmallRng,
}

impl ReservoirGenerator {
    pub fn new(seed: u64) -> Self {
        Self::from_rng(SmallRng::seed_from_u64(seed))
    }

    pub fn from_rng(rng: SmallRng) -> Self {
        Self { rng }
    }

    /// Chooses `mines` distinct linear indices out of `total` in one pass.
    fn sample_mines(&mut self, total: CellCount, mines: CellCount) -> Vec<CellCount> {
        let mut reservoir = Vec::with_capacity(mines.min(total));
        for i in 0..total {
            if i < mines {
                reservoir.push(i);
            } else {
                let j = self.rng.random_range(0..=i);
                if j < mines {
                    reservoir[j] = i;
                }
            }
        }
        reservoir
    }

    fn find_mine_place(&mut self, matrix: &ByteMatrix) -> Coord2 {
        let (cols, rows) = matrix.bounds();
        let mut candidate = (self.rng.random_range(0..cols), self.rng.random_range(0..rows));

        let mut tries = 0;
        while tile::is_mine(matrix.tile(candidate)) && tries < RELOCATION_TRIES {
            candidate = (self.rng.random_range(0..cols), self.rng.random_range(0..rows));
            tries += 1;
        }

        candidate
    }
}

impl MinefieldGenerator for ReservoirGenerator {
    fn generate(&mut self, config: GameConfig, progress: &mut dyn ProgressSink) -> ByteMatrix {
        let (cols, rows) = config.size;
        let (cols, rows) = (cols as usize, rows as usize);
        let total = config.total_tiles();
        let mut matrix = ByteMatrix::new(rows, cols);

        for index in self.sample_mines(total, config.mines) {
            matrix.set(index / cols, index % cols, tile::MINE);
        }

        // counts are written in place, so mine checks must look through the hidden layer
        let budget = total + config.mines;
        let mut done = 0;
        let mut throttle = ProgressThrottle::new(progress);
        for y in 0..config.size.1 {
            for x in 0..config.size.0 {
                let value = if matrix.tile((x, y)) == tile::MINE {
                    tile::HIDDEN_MINE
                } else {
                    matrix.adjacent_mines((x, y)) + tile::HIDDEN_OFFSET
                };
                matrix.set_tile((x, y), value);
            }
            done += cols;
            throttle.update(done, budget);
        }

        matrix
    }

    fn reposition_mine(&mut self, matrix: &mut ByteMatrix, coords: Coord2) -> Coord2 {
        let bounds = matrix.bounds();
        let target = self.find_mine_place(matrix);
        if tile::is_mine(matrix.tile(target)) {
            log::warn!(
                "No free cell found after {} tries, mine at {:?} stays in place",
                RELOCATION_TRIES,
                coords
            );
            return coords;
        }

        let count = matrix.adjacent_mines(coords);
        matrix.set_tile(coords, count + tile::HIDDEN_OFFSET);
        // a flag on the destination stays, the mines-remaining counter already accounts for it
        let mine = if tile::is_flag(matrix.tile(target)) {
            tile::HIDDEN_MINE + tile::FLAG_OFFSET
        } else {
            tile::HIDDEN_MINE
        };
        matrix.set_tile(target, mine);

        for pos in iter_neighbors(coords, bounds) {
            let value = matrix.tile(pos);
            if !tile::is_mine(value) {
                matrix.set_tile(pos, value - 1);
            }
        }
        for pos in iter_neighbors(target, bounds) {
            let value = matrix.tile(pos);
            if !tile::is_mine(value) {
                matrix.set_tile(pos, value + 1);
            }
        }

        log::debug!("Relocated mine from {:?} to {:?}", coords, target);
        target
    }
}
