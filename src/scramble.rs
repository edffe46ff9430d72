//! Background thread that feeds random moves to the engine while the
//! scramble flag is on. It parks while the flag is off and is woken by
//! [`Scrambler::set_enabled`] or on shutdown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, info};

use crate::engine::Engine;

pub struct Scrambler {
    engine: Arc<Engine>,
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Scrambler {
    /// Start the worker. A `seed` makes the move sequence reproducible.
    pub fn spawn(engine: Arc<Engine>, seed: Option<u64>) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let handle = {
            let engine = Arc::clone(&engine);
            let shutdown = Arc::clone(&shutdown);
            thread::Builder::new()
                .name("scrambler".into())
                .spawn(move || run(&engine, &shutdown, seed))
        };
        let handle = match handle {
            Ok(handle) => Some(handle),
            Err(err) => {
                error!(%err, "could not start the scrambler thread");
                None
            }
        };
        Self {
            engine,
            shutdown,
            handle,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.engine.is_scrambling()
    }

    pub fn set_enabled(&self, on: bool) {
        self.engine.set_scrambling(on);
        if on {
            self.wake();
        }
    }

    pub fn toggle(&self) -> bool {
        let on = !self.is_enabled();
        self.set_enabled(on);
        on
    }

    fn wake(&self) {
        if let Some(handle) = &self.handle {
            handle.thread().unpark();
        }
    }
}

impl Drop for Scrambler {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        self.wake();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run(engine: &Engine, shutdown: &AtomicBool, seed: Option<u64>) {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let config = engine.config().clone();

    if !config.scramble_start_delay.is_zero() {
        thread::park_timeout(config.scramble_start_delay);
    }

    let mut was_running = false;
    while !shutdown.load(Ordering::SeqCst) {
        if !engine.is_scrambling() {
            if was_running {
                info!(moves = engine.history_len(), "scramble stopped");
                was_running = false;
            }
            thread::park();
            continue;
        }
        if !was_running {
            info!(moves = engine.history_len(), "scramble started");
            was_running = true;
        }

        if let Some(Err(err)) = engine.scramble_step(&mut rng) {
            debug!(%err, "random move dropped");
        }
        if !config.scramble_delay.is_zero() {
            thread::sleep(config.scramble_delay);
        }
    }
}
