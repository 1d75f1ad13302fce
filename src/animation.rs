// Fixed-cadence update thread.
//
// Every tick samples the pointer, fades the trail by the real elapsed time
// and advances the ripples (see `Overlay::tick`). The wait between ticks
// doubles as the stop signal: `LoopHandle::stop` wakes the thread, which
// exits before running another tick.

use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::error::Error;
use crate::overlay::Overlay;
use crate::types::Point;

pub const DEFAULT_TICK: Duration = Duration::from_millis(20);

/// Ticks between debug stat lines (about one second at the default rate).
const STATS_EVERY: u64 = 50;

/// Pull-based pointer position, polled once per tick.
pub trait PositionSource: Send + 'static {
    /// `None` when the pointer position is unknown (e.g. outside the window).
    fn position(&self) -> Option<Point>;
}

impl<F> PositionSource for F
where
    F: Fn() -> Option<Point> + Send + 'static,
{
    fn position(&self) -> Option<Point> {
        self()
    }
}

/// Position cell written by the host's event loop, read by the animation thread.
#[derive(Debug, Clone, Default)]
pub struct SharedPointer {
    inner: Arc<Mutex<Option<Point>>>,
}

impl SharedPointer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, pos: Option<Point>) {
        *self.inner.lock() = pos;
    }

    pub fn get(&self) -> Option<Point> {
        *self.inner.lock()
    }
}

impl PositionSource for SharedPointer {
    fn position(&self) -> Option<Point> {
        self.get()
    }
}

pub struct AnimationLoop<P: PositionSource> {
    overlay: Arc<Overlay>,
    source: P,
    interval: Duration,
    last_tick: Instant,
    ticks: u64,
}

impl<P: PositionSource> AnimationLoop<P> {
    pub fn new(overlay: Arc<Overlay>, source: P) -> Self {
        Self {
            overlay,
            source,
            interval: DEFAULT_TICK,
            last_tick: Instant::now(),
            ticks: 0,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run one tick with an explicit elapsed time. Used by the thread and by
    /// callers that drive the animation themselves.
    pub fn tick_with_elapsed(&mut self, elapsed_ms: u64) {
        self.overlay.tick(self.source.position(), elapsed_ms);
        self.ticks += 1;
    }

    /// Run one tick, measuring elapsed time since the previous one.
    pub fn tick(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick);
        self.last_tick = now;
        self.tick_with_elapsed(elapsed.as_millis() as u64);
    }

    /// Start ticking on a named background thread until stopped.
    pub fn spawn(mut self) -> crate::Result<LoopHandle> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let thread = thread::Builder::new()
            .name("overlay-animation".into())
            .spawn(move || {
                info!("Animation loop started ({} ms ticks)", self.interval.as_millis());
                self.last_tick = Instant::now();
                let mut window_start = Instant::now();
                loop {
                    match stop_rx.recv_timeout(self.interval) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                    self.tick();

                    if self.ticks % STATS_EVERY == 0 {
                        let secs = window_start.elapsed().as_secs_f32();
                        debug!("Ticks/s: {:.1}", STATS_EVERY as f32 / secs.max(f32::EPSILON));
                        window_start = Instant::now();
                    }
                }
                info!("Animation loop stopped after {} ticks", self.ticks);
                self.ticks
            })
            .map_err(|e| Error::LoopSpawn(e.to_string()))?;

        Ok(LoopHandle {
            stop_tx: Some(stop_tx),
            thread: Some(thread),
        })
    }
}

/// Owner's handle on a running loop. Dropping it also stops and joins.
pub struct LoopHandle {
    stop_tx: Option<mpsc::Sender<()>>,
    thread: Option<JoinHandle<u64>>,
}

impl LoopHandle {
    /// Signal the thread, wait for it and return how many ticks it ran.
    pub fn stop(mut self) -> crate::Result<u64> {
        self.shutdown()
    }

    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    fn shutdown(&mut self) -> crate::Result<u64> {
        if let Some(tx) = self.stop_tx.take() {
            // The thread may already be gone; a closed channel is fine.
            let _ = tx.send(());
        }
        match self.thread.take() {
            Some(thread) => thread
                .join()
                .map_err(|_| Error::LoopSpawn("animation thread panicked".into())),
            None => Ok(0),
        }
    }
}

impl Drop for LoopHandle {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            warn!("{e}");
        }
    }
}
