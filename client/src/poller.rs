//! Polling lifecycle controller
//!
//! Owns the fetch/retry/refresh lifecycle around a [`ReadingSource`]: one
//! immediate attempt on start, a repeating timer armed by the first success,
//! manual retry and pull-to-refresh outside the cadence, and guaranteed
//! timer release when the handle goes away.
//!
//! Attempts may overlap. Every attempt carries a sequence number and a
//! completion is discarded if a newer attempt has already been applied, so
//! a slow stale response never overwrites a fresher reading.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use shared::{LoadState, SoilReading};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use crate::error::ClientResult;

/// Period between automatic refreshes once polling is armed.
pub const DEFAULT_POLL_PERIOD: Duration = Duration::from_secs(30);

/// Message surfaced for any failed attempt, regardless of the error kind.
pub const FETCH_ERROR_MESSAGE: &str =
    "Failed to load soil data. Please check your connection and try again.";

/// Anything that can produce a soil reading on demand.
pub trait ReadingSource: Send + Sync + 'static {
    fn fetch_reading(&self) -> impl Future<Output = ClientResult<SoilReading>> + Send;
}

/// Builder for the polling lifecycle.
pub struct Poller<S> {
    source: S,
    period: Duration,
}

impl<S: ReadingSource> Poller<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            period: DEFAULT_POLL_PERIOD,
        }
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Start the lifecycle: state begins at [`LoadState::Loading`] and one
    /// fetch attempt is issued immediately.
    pub fn start(self) -> PollerHandle {
        let (state_tx, state_rx) = watch::channel(LoadState::Loading);
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(Arc::new(self.source), self.period, state_tx, cmd_rx));

        PollerHandle {
            state: state_rx,
            commands: cmd_tx,
            task,
        }
    }
}

/// Handle to a running poller.
///
/// Dropping the handle ends the control loop and releases the repeating
/// timer. A fetch still in flight at that point runs to completion but has
/// nowhere to report, so its result is discarded.
pub struct PollerHandle {
    state: watch::Receiver<LoadState>,
    commands: mpsc::UnboundedSender<Command>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Subscribe to state transitions.
    pub fn state(&self) -> watch::Receiver<LoadState> {
        self.state.clone()
    }

    /// Snapshot of the current state.
    pub fn current(&self) -> LoadState {
        self.state.borrow().clone()
    }

    /// Fire-and-forget manual retry: one fetch attempt outside the timer
    /// cadence. Safe to call at any time, including while another attempt
    /// is outstanding.
    pub fn retry(&self) {
        let _ = self.commands.send(Command::Refresh { ack: None });
    }

    /// Pull-to-refresh: one fetch attempt, resolving once its outcome has
    /// been applied (or discarded as stale). Returns whether the fetch
    /// succeeded; `false` if the poller has already stopped.
    pub async fn refresh(&self) -> bool {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self
            .commands
            .send(Command::Refresh { ack: Some(ack_tx) })
            .is_err()
        {
            return false;
        }
        ack_rx.await.unwrap_or(false)
    }

    /// Stop polling. Equivalent to dropping the handle, but waits until the
    /// control loop has wound down.
    pub async fn stop(self) {
        let PollerHandle {
            state,
            commands,
            task,
        } = self;
        drop(state);
        drop(commands);
        let _ = task.await;
    }
}

enum Command {
    Refresh { ack: Option<oneshot::Sender<bool>> },
}

struct Completion {
    seq: u64,
    result: ClientResult<SoilReading>,
    ack: Option<oneshot::Sender<bool>>,
}

/// Control loop. Sole owner of the timer handle and the state sender; fetch
/// attempts run as spawned tasks and report back over `done`.
async fn run<S: ReadingSource>(
    source: Arc<S>,
    period: Duration,
    state: watch::Sender<LoadState>,
    mut commands: mpsc::UnboundedReceiver<Command>,
) {
    let (done_tx, mut done_rx) = mpsc::unbounded_channel();
    let mut timer: Option<Interval> = None;
    let mut next_seq: u64 = 0;
    let mut last_applied: Option<u64> = None;

    spawn_attempt(&source, &done_tx, &mut next_seq, None);

    loop {
        tokio::select! {
            _ = next_tick(&mut timer) => {
                spawn_attempt(&source, &done_tx, &mut next_seq, None);
            }
            cmd = commands.recv() => {
                match cmd {
                    Some(Command::Refresh { ack }) => {
                        spawn_attempt(&source, &done_tx, &mut next_seq, ack);
                    }
                    // Every handle is gone: release the timer and stop.
                    None => break,
                }
            }
            Some(done) = done_rx.recv() => {
                apply(&state, &mut timer, period, &mut last_applied, done);
            }
        }
    }

    tracing::debug!("polling stopped");
}

/// Wait for the next automatic refresh, or forever while no timer is armed.
async fn next_tick(timer: &mut Option<Interval>) -> Instant {
    match timer {
        Some(interval) => interval.tick().await,
        None => std::future::pending().await,
    }
}

fn spawn_attempt<S: ReadingSource>(
    source: &Arc<S>,
    done: &mpsc::UnboundedSender<Completion>,
    next_seq: &mut u64,
    ack: Option<oneshot::Sender<bool>>,
) {
    let seq = *next_seq;
    *next_seq += 1;

    let source = Arc::clone(source);
    let done = done.clone();
    tokio::spawn(async move {
        let result = source.fetch_reading().await;
        // The loop may have stopped already; the result is then discarded.
        let _ = done.send(Completion { seq, result, ack });
    });
}

/// Apply one settled attempt to the observable state.
///
/// Completions arrive in settle order, not issue order; anything older than
/// the newest applied attempt must not overwrite it.
fn apply(
    state: &watch::Sender<LoadState>,
    timer: &mut Option<Interval>,
    period: Duration,
    last_applied: &mut Option<u64>,
    completion: Completion,
) {
    let Completion { seq, result, ack } = completion;
    let succeeded = result.is_ok();

    let fresh = last_applied.map_or(true, |applied| seq > applied);
    if fresh {
        *last_applied = Some(seq);
        match result {
            Ok(reading) => {
                state.send_replace(LoadState::Ready {
                    reading,
                    fetched_at: Utc::now(),
                });
                if timer.is_none() {
                    let mut interval = time::interval_at(Instant::now() + period, period);
                    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                    *timer = Some(interval);
                    tracing::debug!(period_secs = period.as_secs(), "polling timer armed");
                }
            }
            Err(error) => {
                // Surfaced state is generic; the kind is kept in the logs.
                tracing::warn!(%error, "soil data fetch failed");
                state.send_replace(LoadState::Error {
                    message: FETCH_ERROR_MESSAGE.to_string(),
                });
            }
        }
    } else {
        tracing::debug!(seq, "discarding stale fetch completion");
    }

    if let Some(ack) = ack {
        let _ = ack.send(succeeded);
    }
}
