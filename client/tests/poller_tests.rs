//! Tests for the polling lifecycle controller
//!
//! All timer behavior runs on a paused clock so the 30-second cadence can
//! be crossed deterministically.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rust_decimal::Decimal;
use shared::{LoadState, SoilReading};
use tokio::time;

use soil_monitor_client::error::{ClientError, ClientResult};
use soil_monitor_client::poller::{Poller, ReadingSource, FETCH_ERROR_MESSAGE};

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn reading(carbon: &str) -> SoilReading {
    SoilReading {
        carbon_content: dec(carbon),
        ph: dec("6.5"),
        electrical_conductivity: dec("120.25"),
        phosphorus: dec("12.5"),
        nitrogen: dec("30"),
        potassium: dec("88.75"),
        elevation: dec("1250.5"),
    }
}

struct Step {
    delay: Duration,
    result: ClientResult<SoilReading>,
}

fn ok(carbon: &str) -> Step {
    Step {
        delay: Duration::ZERO,
        result: Ok(reading(carbon)),
    }
}

fn err() -> Step {
    Step {
        delay: Duration::ZERO,
        result: Err(ClientError::Parse("scripted failure".into())),
    }
}

fn slow_ok(carbon: &str, delay: Duration) -> Step {
    Step {
        delay,
        result: Ok(reading(carbon)),
    }
}

/// Scripted source: each fetch pops the next step, optionally sleeping
/// before settling. An exhausted script fails the attempt.
struct ScriptedSource {
    steps: Mutex<VecDeque<Step>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Orphan-rule workaround: `ReadingSource` cannot be implemented for
/// `Arc<ScriptedSource>` outside the crate that defines the trait.
struct SourceHandle(Arc<ScriptedSource>);

impl ReadingSource for SourceHandle {
    async fn fetch_reading(&self) -> ClientResult<SoilReading> {
        self.0.calls.fetch_add(1, Ordering::SeqCst);
        let step = self.0.steps.lock().unwrap().pop_front();
        match step {
            Some(step) => {
                if !step.delay.is_zero() {
                    time::sleep(step.delay).await;
                }
                step.result
            }
            None => Err(ClientError::Parse("script exhausted".into())),
        }
    }
}

fn error_state() -> LoadState {
    LoadState::Error {
        message: FETCH_ERROR_MESSAGE.to_string(),
    }
}

fn carbon_of(state: &LoadState) -> Decimal {
    state.reading().expect("expected a ready state").carbon_content
}

#[tokio::test(start_paused = true)]
async fn failed_start_leaves_timer_unarmed_until_a_manual_retry_succeeds() {
    let source = ScriptedSource::new(vec![err(), ok("3.142"), ok("3.200")]);
    let handle = Poller::new(SourceHandle(Arc::clone(&source))).start();

    // The initial attempt has not settled yet.
    assert_eq!(handle.current(), LoadState::Loading);

    let mut state = handle.state();
    state.changed().await.unwrap();
    assert_eq!(handle.current(), error_state());

    // No timer was armed by the failed first attempt.
    time::sleep(Duration::from_secs(31)).await;
    assert_eq!(source.calls(), 1);

    handle.retry();
    state.changed().await.unwrap();
    assert_eq!(carbon_of(&handle.current()), dec("3.142"));
    assert_eq!(source.calls(), 2);

    // The successful retry armed the repeating timer.
    time::sleep(Duration::from_secs(31)).await;
    assert_eq!(source.calls(), 3);
    assert_eq!(carbon_of(&handle.current()), dec("3.200"));
}

#[tokio::test(start_paused = true)]
async fn successful_start_arms_a_thirty_second_cadence() {
    let source = ScriptedSource::new(vec![ok("3.142"), ok("3.200")]);
    let handle = Poller::new(SourceHandle(Arc::clone(&source))).start();

    assert_eq!(handle.current(), LoadState::Loading);

    let mut state = handle.state();
    state.changed().await.unwrap();
    assert_eq!(carbon_of(&handle.current()), dec("3.142"));
    assert_eq!(source.calls(), 1);

    // Just short of the period: no second fetch yet.
    time::sleep(Duration::from_secs(29)).await;
    assert_eq!(source.calls(), 1);

    // Crossing the boundary triggers exactly one more.
    time::sleep(Duration::from_secs(2)).await;
    assert_eq!(source.calls(), 2);
    assert_eq!(carbon_of(&handle.current()), dec("3.200"));
}

#[tokio::test(start_paused = true)]
async fn repeated_manual_refreshes_arm_exactly_one_timer() {
    let source = ScriptedSource::new(vec![err(), ok("1.0"), ok("2.0"), ok("3.0"), ok("4.0")]);
    let handle = Poller::new(SourceHandle(Arc::clone(&source))).start();

    let mut state = handle.state();
    state.changed().await.unwrap();
    assert_eq!(handle.current(), error_state());

    handle.retry();
    state.changed().await.unwrap();
    assert_eq!(carbon_of(&handle.current()), dec("1.0"));

    // A second manual refresh while already armed must not add a timer.
    assert!(handle.refresh().await);
    assert_eq!(carbon_of(&handle.current()), dec("2.0"));
    assert_eq!(source.calls(), 3);

    // One period, one tick.
    time::sleep(Duration::from_secs(31)).await;
    assert_eq!(source.calls(), 4);
    time::sleep(Duration::from_secs(30)).await;
    assert_eq!(source.calls(), 5);
}

#[tokio::test(start_paused = true)]
async fn failure_does_not_disarm_an_already_armed_timer() {
    let source = ScriptedSource::new(vec![ok("3.142"), err(), ok("3.300")]);
    let handle = Poller::new(SourceHandle(Arc::clone(&source))).start();

    let mut state = handle.state();
    state.changed().await.unwrap();
    assert!(handle.current().is_ready());

    // Pull-to-refresh fails and reports it.
    assert!(!handle.refresh().await);
    assert_eq!(handle.current(), error_state());

    // The timer armed by the first success keeps polling.
    time::sleep(Duration::from_secs(31)).await;
    assert_eq!(source.calls(), 3);
    assert_eq!(carbon_of(&handle.current()), dec("3.300"));
}

#[tokio::test(start_paused = true)]
async fn stop_prevents_any_further_fetch() {
    let source = ScriptedSource::new(vec![ok("3.142"), ok("9.999")]);
    let handle = Poller::new(SourceHandle(Arc::clone(&source))).start();

    let mut state = handle.state();
    state.changed().await.unwrap();
    assert_eq!(source.calls(), 1);

    handle.stop().await;

    // Even well past the period boundary, nothing fires.
    time::sleep(Duration::from_secs(61)).await;
    assert_eq!(source.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_handle_stops_polling() {
    let source = ScriptedSource::new(vec![ok("3.142"), ok("9.999")]);
    let handle = Poller::new(SourceHandle(Arc::clone(&source))).start();

    let mut state = handle.state();
    state.changed().await.unwrap();
    assert_eq!(source.calls(), 1);

    drop(handle);

    // Let the control loop observe the closed channel, then cross the
    // period boundary.
    time::sleep(Duration::from_secs(61)).await;
    assert_eq!(source.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn a_stale_slow_completion_never_overwrites_a_newer_reading() {
    // Long period keeps the timer out of the picture.
    let source = ScriptedSource::new(vec![
        slow_ok("1.000", Duration::from_secs(50)),
        ok("2.000"),
    ]);
    let handle = Poller::new(SourceHandle(Arc::clone(&source)))
        .with_period(Duration::from_secs(300))
        .start();

    // The initial attempt is still sleeping; refresh overtakes it.
    assert!(handle.refresh().await);
    assert_eq!(carbon_of(&handle.current()), dec("2.000"));
    assert_eq!(source.calls(), 2);

    // The slow first attempt settles now and must be discarded.
    time::sleep(Duration::from_secs(60)).await;
    assert_eq!(carbon_of(&handle.current()), dec("2.000"));
    assert_eq!(source.calls(), 2);
}
