//! Per-thread relaxation logic for the parallel solver.
//!
//! A worker never touches the bucket structure or the vertex state. Each
//! light round it receives a snapshot of its cell from the coordinator,
//! classifies the incident edges, and turns improving light edges into
//! relaxation requests: requests for its own vertices accumulate locally,
//! requests for other workers go through their inboxes. Heavy edges are
//! remembered per source vertex and replayed once the bucket has drained.

use std::collections::HashMap;
use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::{Receiver, Sender};
use tracing::trace;

use crate::coordination::Coordinator;
use crate::error::SolveError;
use crate::graph::{Dist, Edge, EdgeId, Vertex, VertexId};

use super::barrier::PhaseBarrier;
use super::message::Relaxation;
use super::{SharedState, NO_BUCKET};

/// Heavy edges deferred for the current bucket, keyed by source vertex.
/// Re-recording a vertex replaces its list, so a vertex that re-enters the
/// bucket within one sweep is never relaxed twice from stale entries.
#[derive(Default)]
struct HeavyEdges {
    by_source: HashMap<VertexId, Vec<EdgeId>>,
    order: Vec<VertexId>,
}

impl HeavyEdges {
    fn record(&mut self, v: VertexId, edges: Vec<EdgeId>) {
        if self.by_source.insert(v, edges).is_none() {
            self.order.push(v);
        }
    }

    fn iter(&self) -> impl Iterator<Item = (VertexId, &Vec<EdgeId>)> {
        self.order.iter().map(|&v| (v, &self.by_source[&v]))
    }

    fn clear(&mut self) {
        self.by_source.clear();
        self.order.clear();
    }
}

/// Breaks the phase barrier unless disarmed, so a worker that unwinds for
/// any reason releases its peers instead of stranding them.
struct BreakOnDrop<'a> {
    barrier: &'a PhaseBarrier,
    armed: bool,
}

impl Drop for BreakOnDrop<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.barrier.break_barrier();
        }
    }
}

pub(super) struct Worker<'a> {
    pub id: usize,
    pub num_workers: usize,
    pub delta: Dist,
    pub num_buckets: usize,
    pub vertices: &'a [Vertex],
    pub edges: &'a [Edge],
    /// Shadow of the tentative distances as of the last commit.
    pub tentative: &'a [AtomicU64],
    pub shared: &'a SharedState,
    pub barrier: &'a PhaseBarrier,
    pub coordinator: &'a Coordinator,
    /// Requests other workers routed to this one.
    pub inbox: Receiver<Relaxation>,
    /// Inbox senders for every worker, indexed by worker id.
    pub peers: Vec<Sender<Relaxation>>,
    /// Cell snapshots handed down by the coordinator, one per light round.
    pub assignments: Receiver<Vec<VertexId>>,
    /// Collected deltas handed up to the coordinator, one batch per phase.
    pub results: Sender<Vec<Relaxation>>,
}

impl Worker<'_> {
    pub(super) fn run(mut self) -> Result<(), SolveError> {
        self.coordinator.register();
        let mut guard = BreakOnDrop { barrier: self.barrier, armed: true };
        let result = self.phase_loop();
        if result.is_ok() {
            guard.armed = false;
        }
        drop(guard);
        self.coordinator.unregister();
        result
    }

    fn phase_loop(&mut self) -> Result<(), SolveError> {
        let mut local_updates: Vec<Relaxation> = Vec::new();
        let mut heavy = HeavyEdges::default();
        loop {
            self.barrier.wait()?; // released once the next bucket is published
            if self.shared.next_bucket.load(Ordering::Relaxed) == NO_BUCKET {
                trace!(worker = self.id, "no buckets left, exiting");
                return Ok(());
            }

            // Light sweep: the bucket may refill from its own relaxations,
            // so this loops until the coordinator reports it empty.
            loop {
                self.coordinator.hesitate()?;
                let assigned = self
                    .assignments
                    .recv()
                    .map_err(|_| SolveError::BarrierBroken)?;
                trace!(worker = self.id, vertices = assigned.len(), "light round");
                for &v in &assigned {
                    let dv = self.tentative[v].load(Ordering::Relaxed);
                    let mut heavy_edges = Vec::new();
                    for &e in &self.vertices[v].edges {
                        if self.edges[e].weight <= self.delta {
                            self.relax(e, v, dv, &mut local_updates)?;
                        } else {
                            heavy_edges.push(e);
                        }
                    }
                    heavy.record(v, heavy_edges);
                }
                self.barrier.wait()?; // relaxations collected
                while let Ok(m) = self.inbox.try_recv() {
                    local_updates.push(m);
                }
                self.results
                    .send(mem::take(&mut local_updates))
                    .map_err(|_| SolveError::BarrierBroken)?;
                self.barrier.wait()?; // inboxes drained, deltas submitted
                self.barrier.wait()?; // commit applied
                if self.shared.bucket_empty.load(Ordering::Relaxed) {
                    break;
                }
            }

            // Heavy pass: replay the deferred edges once. These never
            // re-enter the drained bucket, so a single round suffices.
            self.coordinator.hesitate()?;
            for (v, edges) in heavy.iter() {
                let dv = self.tentative[v].load(Ordering::Relaxed);
                for &e in edges {
                    self.relax(e, v, dv, &mut local_updates)?;
                }
            }
            self.barrier.wait()?; // heavy relaxations collected
            while let Ok(m) = self.inbox.try_recv() {
                local_updates.push(m);
            }
            self.results
                .send(mem::take(&mut local_updates))
                .map_err(|_| SolveError::BarrierBroken)?;
            self.barrier.wait()?; // drained, submitted
            self.barrier.wait()?; // heavy commit applied
            heavy.clear();
        }
    }

    /// Turn one edge into a relaxation request if it improves the target's
    /// shadow distance, routing it to the owner of the target vertex.
    fn relax(
        &self,
        e: EdgeId,
        v: VertexId,
        dv: Dist,
        local_updates: &mut Vec<Relaxation>,
    ) -> Result<(), SolveError> {
        let o = self.edges[e].other(v);
        let alt = dv.saturating_add(self.edges[e].weight);
        if alt < self.tentative[o].load(Ordering::Relaxed) {
            let dest = o % self.num_workers;
            let m = Relaxation::new(e, o, alt, dest, self.delta, self.num_buckets);
            if dest == self.id {
                local_updates.push(m);
            } else {
                self.peers[dest]
                    .send(m)
                    .map_err(|_| SolveError::BarrierBroken)?;
            }
        }
        Ok(())
    }
}
