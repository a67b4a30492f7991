//! Cooperative pause/cancel signal shared by every solver thread.
//!
//! Threads that participate in a solve `register` themselves, call
//! `hesitate` at observable points, and `unregister` on the way out.
//! An external controller can `toggle` (pause/resume) or `stop` (cancel)
//! the run; `stop` blocks until every registered thread has drained.

use parking_lot::{Condvar, Mutex};
use thiserror::Error;

/// Raised from [`Coordinator::hesitate`] once the run has been cancelled.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("solve cancelled")]
pub struct Killed;

#[derive(Default)]
struct Inner {
    registered: usize,
    paused: bool,
    killed: bool,
}

/// Pause/cancel monitor. One instance is shared by the solve entry point and
/// all of its worker threads.
#[derive(Default)]
pub struct Coordinator {
    inner: Mutex<Inner>,
    cond: Condvar,
}

impl Coordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Announce that the calling thread participates in the current solve.
    pub fn register(&self) {
        self.inner.lock().registered += 1;
    }

    /// Announce that the calling thread has left the solve.
    pub fn unregister(&self) {
        let mut inner = self.inner.lock();
        inner.registered = inner.registered.saturating_sub(1);
        self.cond.notify_all();
    }

    /// Pause point. Blocks while the run is paused and returns [`Killed`]
    /// once the run has been cancelled.
    pub fn hesitate(&self) -> Result<(), Killed> {
        let mut inner = self.inner.lock();
        while inner.paused && !inner.killed {
            self.cond.wait(&mut inner);
        }
        if inner.killed { Err(Killed) } else { Ok(()) }
    }

    /// Non-blocking cancellation check; never waits on a pause.
    pub fn check_cancelled(&self) -> Result<(), Killed> {
        if self.inner.lock().killed {
            Err(Killed)
        } else {
            Ok(())
        }
    }

    /// Flip between paused and running, waking any hesitating threads.
    pub fn toggle(&self) {
        let mut inner = self.inner.lock();
        inner.paused = !inner.paused;
        self.cond.notify_all();
    }

    /// Cancel the run and wait for every registered thread to unwind.
    /// The kill flag clears once the last participant has unregistered,
    /// leaving the coordinator ready for a fresh solve.
    pub fn stop(&self) {
        let mut inner = self.inner.lock();
        inner.killed = true;
        inner.paused = false;
        self.cond.notify_all();
        while inner.registered > 0 {
            self.cond.wait(&mut inner);
        }
        inner.killed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn hesitate_passes_when_running() {
        let coord = Coordinator::new();
        assert_eq!(coord.hesitate(), Ok(()));
    }

    #[test]
    fn stop_unblocks_paused_threads() {
        let coord = Arc::new(Coordinator::new());
        coord.toggle();

        let worker = {
            let coord = Arc::clone(&coord);
            thread::spawn(move || {
                coord.register();
                let outcome = coord.hesitate();
                coord.unregister();
                outcome
            })
        };

        thread::sleep(Duration::from_millis(20));
        coord.stop();
        assert_eq!(worker.join().unwrap(), Err(Killed));
    }

    #[test]
    fn check_cancelled_never_blocks_on_pause() {
        let coord = Coordinator::new();
        coord.toggle();
        assert_eq!(coord.check_cancelled(), Ok(()));
        coord.toggle();
    }

    #[test]
    fn toggle_resumes_a_paused_thread() {
        let coord = Arc::new(Coordinator::new());
        coord.toggle();

        let worker = {
            let coord = Arc::clone(&coord);
            thread::spawn(move || coord.hesitate())
        };

        thread::sleep(Duration::from_millis(20));
        coord.toggle();
        assert_eq!(worker.join().unwrap(), Ok(()));
    }
}
