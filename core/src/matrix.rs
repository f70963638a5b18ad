use alloc::vec;
use alloc::vec::Vec;
use ndarray::{Array2, ArrayView2, s};
use serde::{Deserialize, Serialize};

use crate::*;

/// Dense row-major grid of tile bytes backed by a single buffer.
///
/// Cell access is unchecked beyond the slice bounds check: callers validate
/// coordinates before reaching this layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteMatrix {
    rows: usize,
    cols: usize,
    data: Vec<u8>,
}

impl ByteMatrix {
    /// Allocates a zeroed `rows x cols` matrix.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0; rows * cols],
        }
    }

    /// Wraps a previously exported buffer, which must hold exactly `rows * cols` bytes.
    pub fn from_raw(rows: usize, cols: usize, data: Vec<u8>) -> Result<Self> {
        let expected = rows * cols;
        if data.len() != expected {
            return Err(GameError::InvalidBufferLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.data[row * self.cols + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        self.data[row * self.cols + col] = value;
    }

    /// Grid size as `(columns, rows)`.
    pub fn bounds(&self) -> Coord2 {
        (to_coord(self.cols), to_coord(self.rows))
    }

    /// Reads the tile at `(x, y)`.
    #[inline]
    pub fn tile(&self, (x, y): Coord2) -> u8 {
        self.get(y as usize, x as usize)
    }

    #[inline]
    pub fn set_tile(&mut self, (x, y): Coord2, value: u8) {
        self.set(y as usize, x as usize, value);
    }

    /// Number of mines among the eight tiles surrounding `coords`, whatever their layers.
    pub fn adjacent_mines(&self, coords: Coord2) -> u8 {
        iter_neighbors(coords, self.bounds())
            .filter(|&pos| tile::is_mine(self.tile(pos)))
            .count() as u8
    }

    pub fn row(&self, row: usize) -> &[u8] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [u8] {
        let start = row * self.cols;
        &mut self.data[start..start + self.cols]
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    pub fn view(&self) -> ArrayView2<'_, u8> {
        ArrayView2::from_shape((self.rows, self.cols), &self.data)
            .expect("buffer length always matches rows * cols")
    }

    /// Copies the part of `region` that lies inside the matrix, indexed `[row, col]`.
    pub fn window(&self, region: Region) -> Array2<u8> {
        let (xs, ys) = region.clamp_to(self.bounds());
        self.view()
            .slice(s![
                ys.start as usize..ys.end as usize,
                xs.start as usize..xs.end as usize
            ])
            .to_owned()
    }
}

fn to_coord(len: usize) -> Coord {
    Coord::try_from(len).unwrap_or(Coord::MAX)
}
