use crate::*;
pub use reservoir::*;

mod reservoir;

/// Minimum whole-percent increase between two forwarded progress reports.
pub const PROGRESS_STEP: u32 = 2;

pub trait MinefieldGenerator {
    /// Builds a fully hidden board holding exactly `config.mines` mines and correct counts.
    fn generate(&mut self, config: GameConfig, progress: &mut dyn ProgressSink) -> ByteMatrix;

    /// Moves the mine at `coords` elsewhere, patching counts around both cells.
    /// A flag on the destination is kept. Returns where the mine went, which is
    /// `coords` itself when no free cell was found.
    fn reposition_mine(&mut self, matrix: &mut ByteMatrix, coords: Coord2) -> Coord2;
}

/// Receiver of generation progress, in percent of the total work.
pub trait ProgressSink {
    fn report(&mut self, percent: f32);
}

/// Discards progress reports.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _percent: f32) {}
}

/// Adapts a closure into a [`ProgressSink`].
pub struct ProgressFn<F>(pub F);

impl<F: FnMut(f32)> ProgressSink for ProgressFn<F> {
    fn report(&mut self, percent: f32) {
        (self.0)(percent)
    }
}

/// Forwards progress to a sink only once it has grown by more than [`PROGRESS_STEP`] points.
pub struct ProgressThrottle<'a> {
    sink: &'a mut dyn ProgressSink,
    last_reported: u32,
}

impl<'a> ProgressThrottle<'a> {
    pub fn new(sink: &'a mut dyn ProgressSink) -> Self {
        Self {
            sink,
            last_reported: 0,
        }
    }

    pub fn update(&mut self, done: CellCount, total: CellCount) {
        if total == 0 {
            return;
        }
        let percent = done as f32 / total as f32 * 100.0;
        let whole = percent as u32;
        if whole.saturating_sub(self.last_reported) > PROGRESS_STEP {
            self.last_reported = whole;
            self.sink.report(percent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn throttle_skips_small_steps() {
        let mut seen = Vec::new();
        let mut sink = ProgressFn(|p: f32| seen.push(p as u32));
        {
            let mut throttle = ProgressThrottle::new(&mut sink);
            for done in 0..=100 {
                throttle.update(done, 100);
            }
        }
        assert_eq!(seen.first(), Some(&3));
        assert!(seen.windows(2).all(|w| w[1] - w[0] > PROGRESS_STEP));
        assert!(seen.len() < 34);
    }

    #[test]
    fn throttle_ignores_empty_budget() {
        let mut calls = 0;
        let mut sink = ProgressFn(|_: f32| calls += 1);
        ProgressThrottle::new(&mut sink).update(0, 0);
        assert_eq!(calls, 0);
    }
}
