//! Relaxation requests routed between workers.

use crate::graph::{Dist, EdgeId, VertexId};

/// A single intended relaxation, addressed to the worker that owns the
/// target vertex. Created once, consumed once at commit.
#[derive(Clone, Debug)]
pub struct Relaxation {
    /// Edge the improvement travels over; becomes the predecessor on commit.
    pub edge: EdgeId,
    /// Vertex whose distance would improve.
    pub target: VertexId,
    /// Proposed tentative distance for the target.
    pub proposed: Dist,
    /// Worker owning the target (`target % num_workers`).
    pub worker: usize,
    /// Destination cell row, `(proposed / delta) % num_buckets`.
    pub bucket: usize,
}

impl Relaxation {
    pub fn new(
        edge: EdgeId,
        target: VertexId,
        proposed: Dist,
        worker: usize,
        delta: Dist,
        num_buckets: usize,
    ) -> Self {
        Relaxation {
            edge,
            target,
            proposed,
            worker,
            bucket: ((proposed / delta) % num_buckets as u64) as usize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_row_wraps_modulo_bucket_count() {
        let m = Relaxation::new(0, 3, 25, 1, 4, 5);
        // 25 / 4 = virtual bucket 6, row 6 % 5 = 1.
        assert_eq!(m.bucket, 1);
        assert_eq!(m.worker, 1);
    }
}
