//! Process-wide pause gate (§4.8): `pause()`, `resume()`, `isPaused()` backed
//! by an atomic boolean, safe under concurrent reads/writes from the
//! scheduler tick and an admin control surface at once.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Default)]
pub struct PauseGate {
    paused: AtomicBool,
}

impl PauseGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }
}
