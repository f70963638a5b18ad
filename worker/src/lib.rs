//! Background board generation.
//!
//! Large boards take a noticeable time to generate, so generation runs on its own thread and
//! reports back through [`GeneratorMessage`]s. There is no cancel message: dropping the
//! [`GenerationHandle`] discards the run, and the thread finishes on its own.

use std::pin::Pin;
use std::task::{Context, Poll};
use std::thread::{self, JoinHandle};

use anyhow::{Context as _, anyhow};
use futures_channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures_util::{Stream, StreamExt};
use sweepfield_core::{Board, GameConfig, MinefieldGenerator, ProgressSink, ReservoirGenerator};
use sweepfield_protocol::{GenerateRequest, GeneratorMessage};
use web_time::Instant;

/// Forwards throttled generator progress into the message channel.
struct ChannelProgress<'a> {
    sender: &'a UnboundedSender<GeneratorMessage>,
}

impl ProgressSink for ChannelProgress<'_> {
    fn report(&mut self, percent: f32) {
        // a closed channel means nobody is listening anymore
        let _ = self.sender.unbounded_send(GeneratorMessage::Percent(percent));
    }
}

pub fn request_config(request: GenerateRequest) -> anyhow::Result<GameConfig> {
    GameConfig::new((request.cols, request.rows), request.mines)
        .with_context(|| format!("invalid generation request {request:?}"))
}

/// Generates a board on the current thread, sending progress and the result to `sender`.
pub fn run_generation(config: GameConfig, seed: u64, sender: &UnboundedSender<GeneratorMessage>) {
    let started = Instant::now();
    let mut progress = ChannelProgress { sender };
    let matrix = ReservoirGenerator::new(seed).generate(config, &mut progress);
    log::debug!(
        "Generated {}x{} board with {} mines in {:?}",
        config.cols(),
        config.rows(),
        config.mines,
        started.elapsed()
    );

    if sender
        .unbounded_send(GeneratorMessage::Result(matrix.into_raw()))
        .is_err()
    {
        log::debug!("Generation result discarded, receiver was dropped");
    }
}

/// Starts generating the board described by `request` on a new thread.
pub fn spawn_generation(request: GenerateRequest, seed: u64) -> anyhow::Result<GenerationHandle> {
    let config = request_config(request)?;
    let (sender, receiver) = mpsc::unbounded();

    let thread = thread::Builder::new()
        .name("board-generator".into())
        .spawn(move || run_generation(config, seed, &sender))
        .context("failed to spawn generator thread")?;

    Ok(GenerationHandle {
        config,
        receiver,
        thread,
    })
}

/// Receiving end of a background generation, readable as a [`Stream`] of messages.
#[derive(Debug)]
pub struct GenerationHandle {
    config: GameConfig,
    receiver: UnboundedReceiver<GeneratorMessage>,
    thread: JoinHandle<()>,
}

impl GenerationHandle {
    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn into_parts(self) -> (UnboundedReceiver<GeneratorMessage>, JoinHandle<()>) {
        (self.receiver, self.thread)
    }

    /// Waits for the generator thread to exit.
    pub fn join(self) -> anyhow::Result<()> {
        self.thread
            .join()
            .map_err(|_| anyhow!("generator thread panicked"))
    }

    /// Waits for the result, passing each progress update to `on_progress`.
    pub async fn into_board(mut self, mut on_progress: impl FnMut(f32)) -> anyhow::Result<Board> {
        while let Some(message) = self.next().await {
            match message {
                GeneratorMessage::Percent(percent) => on_progress(percent),
                GeneratorMessage::Result(data) => {
                    return Board::from_generated(self.config, data)
                        .context("generator produced a malformed board");
                }
            }
        }
        Err(anyhow!("generator stopped before producing a board"))
    }
}

impl Stream for GenerationHandle {
    type Item = GeneratorMessage;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().receiver.poll_next_unpin(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::task::noop_waker_ref;
    use std::future::Future;
    use std::pin::pin;
    use sweepfield_core::{NoProgress, tile};

    fn block_on<F: Future>(future: F) -> F::Output {
        let mut future = pin!(future);
        let mut cx = Context::from_waker(noop_waker_ref());
        loop {
            if let Poll::Ready(output) = future.as_mut().poll(&mut cx) {
                return output;
            }
            thread::yield_now();
        }
    }

    #[test]
    fn streams_progress_then_result() {
        let request = GenerateRequest::new(200, 150, 3_000);
        let handle = spawn_generation(request, 17).unwrap();

        let messages: Vec<_> = block_on(handle.collect());

        let (last, progress) = messages.split_last().unwrap();
        let GeneratorMessage::Result(data) = last else {
            panic!("last message should be the result, got {last:?}");
        };
        assert_eq!(data.len(), 200 * 150);
        assert_eq!(data.iter().filter(|&&v| tile::is_mine(v)).count(), 3_000);

        assert!(!progress.is_empty());
        let percents: Vec<f32> = progress
            .iter()
            .map(|message| match message {
                GeneratorMessage::Percent(percent) => *percent,
                other => panic!("unexpected message {other:?}"),
            })
            .collect();
        assert!(percents.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn result_matches_inline_generation() {
        let request = GenerateRequest::new(12, 20, 40);
        let config = request_config(request).unwrap();
        let expected = ReservoirGenerator::new(3)
            .generate(config, &mut NoProgress)
            .into_raw();

        let handle = spawn_generation(request, 3).unwrap();
        let board = block_on(handle.into_board(|_| {})).unwrap();

        assert_eq!(board.as_raw(), &expected[..]);
        assert_eq!(board.mines_total(), 40);
        assert_eq!(board.mines_remaining(), 40);
        assert_eq!(board.size(), (20, 12));
    }

    #[test]
    fn into_board_reports_progress() {
        let handle = spawn_generation(GenerateRequest::new(300, 300, 9_000), 1).unwrap();
        let mut updates = 0;

        let board = block_on(handle.into_board(|_| updates += 1)).unwrap();

        assert!(board.is_generated());
        assert!(updates > 0);
    }

    #[test]
    fn invalid_request_is_rejected() {
        assert!(spawn_generation(GenerateRequest::new(2, 2, 5), 0).is_err());
        assert!(spawn_generation(GenerateRequest::new(0, 4, 0), 0).is_err());
    }

    #[test]
    fn dropped_receiver_discards_run() {
        let handle = spawn_generation(GenerateRequest::new(100, 100, 500), 9).unwrap();
        let (receiver, thread) = handle.into_parts();
        drop(receiver);

        assert!(thread.join().is_ok());
    }
}
