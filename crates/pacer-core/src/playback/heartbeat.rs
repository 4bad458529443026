use std::{
    io,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use log::{debug, warn};
use parking_lot::Mutex;

use super::{Clock, MonotonicClock, ReaderEngine};

/// Engine shared between a heartbeat thread and its host. Every operation
/// and every tick runs under the one lock.
pub type SharedEngine<C = MonotonicClock> = Arc<Mutex<ReaderEngine<C>>>;

/// Background thread calling [`ReaderEngine::tick`] at a fixed period.
///
/// Ticks are no-ops while the engine's heartbeat is stopped, so the thread
/// can stay up across pause/play cycles. Dropping the handle stops it.
#[derive(Debug)]
pub struct Heartbeat {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Heartbeat {
    pub fn spawn<C>(engine: SharedEngine<C>, interval: Duration) -> io::Result<Self>
    where
        C: Clock + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("pacer-heartbeat".into())
            .spawn(move || {
                debug!("heartbeat: thread up (interval_ms={})", interval.as_millis());
                while !thread_stop.load(Ordering::Acquire) {
                    engine.lock().tick();
                    thread::sleep(interval);
                }
                debug!("heartbeat: thread down");
            })?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// Spawns with the engine's configured heartbeat interval.
    pub fn spawn_default<C>(engine: SharedEngine<C>) -> io::Result<Self>
    where
        C: Clock + Send + 'static,
    {
        let interval = Duration::from_millis(engine.lock().heartbeat_interval_ms());
        Self::spawn(engine, interval)
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            warn!("heartbeat: thread panicked");
        }
    }
}

impl Drop for Heartbeat {
    fn drop(&mut self) {
        self.shutdown();
    }
}
