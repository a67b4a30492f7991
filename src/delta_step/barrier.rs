//! Cyclic rendezvous barrier that can be broken.
//!
//! The phase protocol parks every participant here between phases. If one
//! participant unwinds (cancellation, invariant failure), it breaks the
//! barrier so the remaining waiters return with an error instead of
//! blocking forever. Once broken, a barrier stays broken for the rest of
//! the solve.

use parking_lot::{Condvar, Mutex};
use thiserror::Error;

/// Returned from [`PhaseBarrier::wait`] after a participant departed.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("phase barrier broken by a departing participant")]
pub struct BarrierBroken;

struct State {
    arrived: usize,
    generation: u64,
    broken: bool,
}

pub struct PhaseBarrier {
    state: Mutex<State>,
    cond: Condvar,
    arity: usize,
}

impl PhaseBarrier {
    /// A barrier that releases once `arity` threads have arrived.
    pub fn new(arity: usize) -> Self {
        assert!(arity > 0);
        PhaseBarrier {
            state: Mutex::new(State { arrived: 0, generation: 0, broken: false }),
            cond: Condvar::new(),
            arity,
        }
    }

    /// Block until all participants arrive or the barrier breaks.
    pub fn wait(&self) -> Result<(), BarrierBroken> {
        let mut state = self.state.lock();
        if state.broken {
            return Err(BarrierBroken);
        }
        state.arrived += 1;
        if state.arrived == self.arity {
            state.arrived = 0;
            state.generation += 1;
            self.cond.notify_all();
            return Ok(());
        }
        let generation = state.generation;
        while state.generation == generation && !state.broken {
            self.cond.wait(&mut state);
        }
        if state.broken { Err(BarrierBroken) } else { Ok(()) }
    }

    /// Mark the barrier broken and release every waiter with an error.
    pub fn break_barrier(&self) {
        let mut state = self.state.lock();
        state.broken = true;
        self.cond.notify_all();
    }
}
