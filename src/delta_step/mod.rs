//! Parallel delta-stepping solver.
//!
//! Vertices are partitioned across `W` workers by `id % W`. The solve
//! proceeds in global phases orchestrated by the calling thread (the
//! coordinator) through one cyclic barrier of arity `W + 1`:
//!
//! 1. The coordinator picks the lowest nonempty bucket and releases the
//!    workers into it.
//! 2. Light edges relax in rounds until the bucket stops refilling. Each
//!    round, workers collect relaxation requests (cross-worker requests
//!    travel through per-worker inboxes), drain their inboxes, and submit
//!    the combined batch; the coordinator alone applies the batches to the
//!    distances, predecessors, shadow array, and buckets.
//! 3. Heavy edges deferred during the sweep relax in a single pass, with
//!    the same collect/drain/commit rhythm.
//!
//! Workers read only the immutable topology and the shadow distances from
//! the previous commit, so the barrier is the only ordering the shared
//! arrays need.

pub mod barrier;
mod buckets;
mod message;
mod worker;

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::thread;

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::debug;

use crate::coordination::Coordinator;
use crate::error::SolveError;
use crate::graph::{Dist, Edge, EdgeHooks, EdgeId, Graph, Vertex, VertexId, INFINITY, MAX_COORD};

use barrier::PhaseBarrier;
use buckets::BucketArray;
use message::Relaxation;
use worker::Worker;

/// Published bucket index meaning "no bucket left, terminate".
pub(crate) const NO_BUCKET: i64 = -1;

/// Control words the coordinator publishes between barrier trips. The
/// barrier itself establishes the ordering, so plain relaxed accesses are
/// enough.
pub(crate) struct SharedState {
    /// Cell row of the bucket being drained, or [`NO_BUCKET`].
    pub next_bucket: AtomicI64,
    /// Whether the current bucket survived the last light round.
    pub bucket_empty: AtomicBool,
}

/// Run delta stepping over `graph` with `num_workers` worker threads.
///
/// `degree` is the generator's target mean degree; it sizes the bucket
/// width `delta` and the bucket count, which wrap modulo the count. The
/// distances land in `graph.dist`; unreachable vertices keep an infinite
/// distance. Select/unselect hooks fire from this thread at each commit.
pub fn solve(
    graph: &mut Graph,
    num_workers: usize,
    degree: usize,
    coordinator: &Coordinator,
    hooks: Option<&mut dyn EdgeHooks>,
) -> Result<(), SolveError> {
    assert!(num_workers > 0, "delta stepping needs at least one worker");
    assert!(degree > 0, "bucket width is derived from a positive degree");

    graph.reset_state();
    let n = graph.num_vertices();
    if n == 0 {
        return Ok(());
    }

    // Rounding delta up and adding a spare bucket keeps every reachable
    // relaxation inside the live window: weights stay below 2 * MAX_COORD,
    // which is at most (num_buckets - 1) * delta.
    let delta = MAX_COORD.div_ceil(degree as u64);
    let num_buckets = 2 * degree + 1;

    let tentative: Vec<AtomicU64> = (0..n)
        .map(|i| AtomicU64::new(if i == 0 { 0 } else { INFINITY }))
        .collect();
    let mut buckets = BucketArray::new(num_buckets, num_workers, n);
    buckets.insert(0, 0, 0);

    let barrier = PhaseBarrier::new(num_workers + 1);
    let shared = SharedState {
        next_bucket: AtomicI64::new(0),
        bucket_empty: AtomicBool::new(false),
    };

    let (inbox_txs, inbox_rxs): (Vec<_>, Vec<_>) = (0..num_workers).map(|_| unbounded()).unzip();
    let (assign_txs, assign_rxs): (Vec<_>, Vec<_>) = (0..num_workers).map(|_| unbounded()).unzip();
    let (result_txs, result_rxs): (Vec<_>, Vec<_>) = (0..num_workers).map(|_| unbounded()).unzip();

    let Graph { vertices, edges, dist, pred, selected } = &mut *graph;
    let vertices: &[Vertex] = vertices;
    let edges: &[Edge] = edges;
    let dist: &mut [Dist] = dist;
    let pred: &mut [Option<EdgeId>] = pred;
    let selected: &mut [bool] = selected;

    coordinator.register();
    let result = thread::scope(|s| {
        let mut handles = Vec::with_capacity(num_workers);
        for (id, (inbox, (assignments, results))) in inbox_rxs
            .into_iter()
            .zip(assign_rxs.into_iter().zip(result_txs))
            .enumerate()
        {
            let worker = Worker {
                id,
                num_workers,
                delta,
                num_buckets,
                vertices,
                edges,
                tentative: &tentative,
                shared: &shared,
                barrier: &barrier,
                coordinator,
                inbox,
                peers: inbox_txs.clone(),
                assignments,
                results,
            };
            handles.push(s.spawn(move || worker.run()));
        }
        drop(inbox_txs);

        let mut commit = CommitLoop {
            num_workers,
            delta,
            num_buckets,
            vertices,
            edges,
            dist,
            pred,
            selected,
            tentative: &tentative,
            buckets,
            virtual_bucket: 0,
            shared: &shared,
            barrier: &barrier,
            coordinator,
            assign_txs,
            result_rxs,
            hooks,
        };
        let loop_result = commit.run();
        if loop_result.is_err() {
            barrier.break_barrier();
        }
        // Disconnect the assignment channels so a worker parked on recv
        // unblocks even when it never reaches the broken barrier.
        drop(commit);

        let mut killed = matches!(loop_result, Err(SolveError::Killed));
        let mut worker_error = None;
        for handle in handles {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(SolveError::Killed)) => killed = true,
                Ok(Err(e)) => {
                    worker_error.get_or_insert(e);
                }
                Err(_) => {
                    worker_error.get_or_insert(SolveError::BarrierBroken);
                }
            }
        }
        if killed {
            Err(SolveError::Killed)
        } else if let Err(e) = loop_result {
            Err(e)
        } else if let Some(e) = worker_error {
            Err(e)
        } else {
            Ok(())
        }
    });
    coordinator.unregister();
    result
}

/// Coordinator-side state: the buckets, the committed vertex state, and the
/// channels that move cell snapshots down and delta batches up.
struct CommitLoop<'a, 'h> {
    num_workers: usize,
    delta: Dist,
    num_buckets: usize,
    vertices: &'a [Vertex],
    edges: &'a [Edge],
    dist: &'a mut [Dist],
    pred: &'a mut [Option<EdgeId>],
    selected: &'a mut [bool],
    tentative: &'a [AtomicU64],
    buckets: BucketArray,
    /// Monotone scan cursor in unwrapped bucket space.
    virtual_bucket: u64,
    shared: &'a SharedState,
    barrier: &'a PhaseBarrier,
    coordinator: &'a Coordinator,
    assign_txs: Vec<Sender<Vec<VertexId>>>,
    result_rxs: Vec<Receiver<Vec<Relaxation>>>,
    hooks: Option<&'h mut dyn EdgeHooks>,
}

impl CommitLoop<'_, '_> {
    fn run(&mut self) -> Result<(), SolveError> {
        loop {
            self.coordinator.hesitate()?;
            let Some(vb) = self.buckets.next_nonempty_from(self.virtual_bucket) else {
                debug!("no buckets left, releasing workers to exit");
                self.shared.next_bucket.store(NO_BUCKET, Ordering::Relaxed);
                self.barrier.wait()?;
                return Ok(());
            };
            self.virtual_bucket = vb;
            let cell = (vb % self.num_buckets as u64) as usize;
            self.shared.next_bucket.store(cell as i64, Ordering::Relaxed);
            debug!(bucket = vb, cell, "draining bucket");
            self.barrier.wait()?; // release workers into the bucket

            // Light sweep. Relaxations may land back in this bucket, so the
            // rounds repeat until a commit leaves it empty.
            loop {
                self.coordinator.hesitate()?;
                for t in 0..self.num_workers {
                    let snapshot = self.buckets.cell(cell, t).to_vec();
                    self.assign_txs[t]
                        .send(snapshot)
                        .map_err(|_| SolveError::BarrierBroken)?;
                }
                self.barrier.wait()?; // workers collected relaxations
                self.barrier.wait()?; // inboxes drained, batches submitted
                for t in 0..self.num_workers {
                    let batch = self.result_rxs[t]
                        .recv()
                        .map_err(|_| SolveError::BarrierBroken)?;
                    // Everything the worker just processed leaves the cell;
                    // accepted updates may immediately re-enter it.
                    self.buckets.clear_cell(cell, t);
                    self.commit(batch)?;
                }
                let empty = self.buckets.row_is_empty(cell);
                self.shared.bucket_empty.store(empty, Ordering::Relaxed);
                self.barrier.wait()?; // commit visible, workers re-check
                if empty {
                    break;
                }
            }

            // Heavy pass: one collect/drain/commit cycle, no removals,
            // since heavy relaxations always land in a later bucket.
            self.barrier.wait()?; // heavy relaxations collected
            self.barrier.wait()?; // inboxes drained, batches submitted
            for t in 0..self.num_workers {
                let batch = self.result_rxs[t]
                    .recv()
                    .map_err(|_| SolveError::BarrierBroken)?;
                self.commit(batch)?;
            }
            self.barrier.wait()?; // release workers toward the next bucket
        }
    }

    /// Apply one worker's batch: accept every request that still improves
    /// the shadow distance, update the committed state, fire the hooks, and
    /// move the target into its new bucket.
    fn commit(&mut self, batch: Vec<Relaxation>) -> Result<(), SolveError> {
        self.coordinator.check_cancelled()?;
        for m in batch {
            let current = self.tentative[m.target].load(Ordering::Relaxed);
            if m.proposed >= current {
                continue; // superseded within this phase
            }
            let virtual_target = m.proposed / self.delta;
            let window_end = self.virtual_bucket + self.num_buckets as u64;
            debug_assert!(
                virtual_target >= self.virtual_bucket && virtual_target < window_end,
                "relaxation jumped outside the live bucket window"
            );
            if virtual_target < self.virtual_bucket || virtual_target >= window_end {
                return Err(SolveError::InvariantViolation(format!(
                    "vertex {} relaxed to {} outside buckets [{}, {})",
                    m.target, m.proposed, self.virtual_bucket, window_end
                )));
            }

            self.dist[m.target] = m.proposed;
            self.tentative[m.target].store(m.proposed, Ordering::Relaxed);
            if let Some(old) = self.pred[m.target].replace(m.edge) {
                self.unselect_edge(old);
            }
            self.select_edge(m.edge, m.proposed);
            self.buckets.insert(m.target, m.bucket, m.worker);
        }
        Ok(())
    }

    fn select_edge(&mut self, e: EdgeId, dist: Dist) {
        self.selected[e] = true;
        if let Some(h) = self.hooks.as_mut() {
            let edge = &self.edges[e];
            let a = &self.vertices[edge.v1];
            let b = &self.vertices[edge.v2];
            h.edge_selected(a.x, a.y, b.x, b.y, dist);
        }
    }

    fn unselect_edge(&mut self, e: EdgeId) {
        self.selected[e] = false;
        if let Some(h) = self.hooks.as_mut() {
            let edge = &self.edges[e];
            let a = &self.vertices[edge.v1];
            let b = &self.vertices[edge.v2];
            h.edge_unselected(a.x, a.y, b.x, b.y);
        }
    }
}
