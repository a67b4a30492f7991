//! Error types surfaced by the solvers.

use thiserror::Error;

use crate::coordination::Killed;
use crate::delta_step::barrier::BarrierBroken;

/// A failure that aborts the current solve.
///
/// Nothing here is retried internally; every variant propagates to the solver
/// entry point and is reported to the caller.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SolveError {
    /// The run was cancelled through the coordination signal.
    #[error("solve cancelled")]
    Killed,

    /// A peer abandoned the phase barrier before arriving, so the current
    /// solve cannot make progress.
    #[error("a solver thread abandoned the phase barrier")]
    BarrierBroken,

    /// A bucket or distance invariant was violated. Debug builds assert
    /// before this is ever constructed.
    #[error("solver invariant violated: {0}")]
    InvariantViolation(String),
}

impl From<Killed> for SolveError {
    fn from(_: Killed) -> Self {
        SolveError::Killed
    }
}

impl From<BarrierBroken> for SolveError {
    fn from(_: BarrierBroken) -> Self {
        SolveError::BarrierBroken
    }
}
