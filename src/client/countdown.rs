//! Auto-close countdown
//!
//! [`Countdown`] is the bare state machine; [`CountdownTimer`] drives it
//! once per second on the runtime and runs the close action.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::debug;

/// Seconds before the share dialog closes itself.
pub const AUTO_CLOSE_SECONDS: u32 = 5;

const TICK: Duration = Duration::from_secs(1);

// == Countdown ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Still counting, this many seconds left
    Running(u32),
    /// Paused, nothing happened
    Paused,
    /// Reached zero on this tick: close now
    Close,
    /// Already closed
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    paused: bool,
    fired: bool,
}

impl Countdown {
    pub fn new(seconds: u32) -> Self {
        Self {
            remaining: seconds,
            paused: false,
            fired: false,
        }
    }

    /// A countdown that starts out paused.
    pub fn paused(seconds: u32) -> Self {
        Self {
            paused: true,
            ..Self::new(seconds)
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Flips between paused and running; returns whether it is now paused.
    pub fn toggle(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Advances one second. `Close` is returned exactly once.
    pub fn tick(&mut self) -> Tick {
        if self.fired {
            return Tick::Done;
        }
        if self.paused {
            return Tick::Paused;
        }
        if self.remaining <= 1 {
            self.remaining = 0;
            self.fired = true;
            return Tick::Close;
        }
        self.remaining -= 1;
        Tick::Running(self.remaining)
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(AUTO_CLOSE_SECONDS)
    }
}

// == Timer ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Pause,
    Resume,
    Toggle,
}

/// A running countdown. Dropping it cancels the timer.
#[derive(Debug)]
pub struct CountdownTimer {
    control: mpsc::UnboundedSender<Control>,
    remaining: watch::Receiver<u32>,
    handle: JoinHandle<()>,
}

impl CountdownTimer {
    /// Starts driving `countdown`; `on_close` runs once when it reaches zero.
    ///
    /// Must be called within a tokio runtime.
    pub fn start<F>(countdown: Countdown, on_close: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let (control, mut commands) = mpsc::unbounded_channel();
        let (remaining_tx, remaining) = watch::channel(countdown.remaining());

        let handle = tokio::spawn(async move {
            let mut countdown = countdown;
            let mut on_close = Some(on_close);
            let mut ticker = (!countdown.is_paused()).then(second_ticker);

            loop {
                tokio::select! {
                    _ = next_tick(&mut ticker) => match countdown.tick() {
                        Tick::Running(left) => {
                            let _ = remaining_tx.send(left);
                        }
                        Tick::Close => {
                            let _ = remaining_tx.send(0);
                            debug!("countdown finished");
                            if let Some(close) = on_close.take() {
                                close();
                            }
                            break;
                        }
                        Tick::Paused | Tick::Done => {}
                    },
                    command = commands.recv() => {
                        let Some(command) = command else { break };
                        let was_paused = countdown.is_paused();
                        match command {
                            Control::Pause => countdown.pause(),
                            Control::Resume => countdown.resume(),
                            Control::Toggle => {
                                countdown.toggle();
                            }
                        }
                        // Resuming starts a fresh one-second period.
                        ticker = match (was_paused, countdown.is_paused()) {
                            (_, true) => None,
                            (true, false) => Some(second_ticker()),
                            (false, false) => ticker,
                        };
                    }
                }
            }
        });

        Self {
            control,
            remaining,
            handle,
        }
    }

    pub fn pause(&self) {
        let _ = self.control.send(Control::Pause);
    }

    pub fn resume(&self) {
        let _ = self.control.send(Control::Resume);
    }

    pub fn toggle(&self) {
        let _ = self.control.send(Control::Toggle);
    }

    /// Seconds left as of the last tick.
    pub fn remaining(&self) -> u32 {
        *self.remaining.borrow()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn second_ticker() -> Interval {
    let mut ticker = interval_at(Instant::now() + TICK, TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::time::sleep;

    #[test]
    fn test_closes_after_five_ticks() {
        let mut countdown = Countdown::new(5);
        for left in [4, 3, 2, 1] {
            assert_eq!(countdown.tick(), Tick::Running(left));
        }
        assert_eq!(countdown.tick(), Tick::Close);
        assert_eq!(countdown.tick(), Tick::Done);
    }

    #[test]
    fn test_never_closes_while_paused() {
        let mut countdown = Countdown::new(1);
        countdown.pause();
        for _ in 0..10 {
            assert_eq!(countdown.tick(), Tick::Paused);
        }
        assert!(!countdown.has_fired());
        countdown.resume();
        assert_eq!(countdown.tick(), Tick::Close);
    }

    #[test]
    fn test_pause_after_two_ticks_then_resume() {
        let mut countdown = Countdown::new(5);
        countdown.tick();
        countdown.tick();
        countdown.pause();
        assert_eq!(countdown.tick(), Tick::Paused);
        countdown.resume();

        // 5 - 2 = 3 more ticks from resume.
        assert_eq!(countdown.tick(), Tick::Running(2));
        assert_eq!(countdown.tick(), Tick::Running(1));
        assert_eq!(countdown.tick(), Tick::Close);
    }

    #[test]
    fn test_toggle() {
        let mut countdown = Countdown::default();
        assert!(countdown.toggle());
        assert!(!countdown.toggle());
        assert_eq!(countdown.remaining(), AUTO_CLOSE_SECONDS);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_pause_and_resume() {
        let closed = Arc::new(AtomicBool::new(false));
        let flag = closed.clone();
        let timer = CountdownTimer::start(Countdown::new(5), move || {
            flag.store(true, Ordering::SeqCst);
        });

        sleep(Duration::from_millis(2500)).await;
        assert_eq!(timer.remaining(), 3);

        timer.pause();
        sleep(Duration::from_secs(10)).await;
        assert!(!closed.load(Ordering::SeqCst));
        assert_eq!(timer.remaining(), 3);

        timer.resume();
        sleep(Duration::from_millis(2500)).await;
        assert!(!closed.load(Ordering::SeqCst));

        sleep(Duration::from_secs(1)).await;
        assert!(closed.load(Ordering::SeqCst));
        assert_eq!(timer.remaining(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_timer_cancels_close() {
        let closed = Arc::new(AtomicBool::new(false));
        let flag = closed.clone();
        let timer = CountdownTimer::start(Countdown::new(2), move || {
            flag.store(true, Ordering::SeqCst);
        });

        drop(timer);
        sleep(Duration::from_secs(5)).await;
        assert!(!closed.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_paused_timer_starts_on_resume() {
        let closed = Arc::new(AtomicBool::new(false));
        let flag = closed.clone();
        let timer = CountdownTimer::start(Countdown::paused(1), move || {
            flag.store(true, Ordering::SeqCst);
        });

        sleep(Duration::from_secs(3)).await;
        assert!(!closed.load(Ordering::SeqCst));

        timer.toggle();
        sleep(Duration::from_millis(1500)).await;
        assert!(closed.load(Ordering::SeqCst));
    }
}
