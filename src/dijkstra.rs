//! Reference single-source shortest-path solver.
//!
//! Classic priority-queue search from vertex 0. The heap has no decrease-key
//! operation; improving a vertex simply reinserts it with the smaller
//! snapshot distance, and stale entries are skipped on extraction by
//! comparing their snapshot against the vertex's current distance.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tracing::debug;

use crate::coordination::Coordinator;
use crate::error::SolveError;
use crate::graph::{Dist, EdgeHooks, Graph, VertexId};

/// Compute shortest-path distances from vertex 0 into `graph.dist`.
///
/// Unreachable vertices keep an infinite distance. The select hook fires for
/// each settled vertex's predecessor edge, from this thread.
pub fn solve(
    graph: &mut Graph,
    coordinator: &Coordinator,
    mut hooks: Option<&mut dyn EdgeHooks>,
) -> Result<(), SolveError> {
    graph.reset_state();
    let n = graph.num_vertices();
    if n == 0 {
        return Ok(());
    }

    coordinator.register();
    let result = run(graph, coordinator, &mut hooks);
    coordinator.unregister();
    result
}

fn run(
    graph: &mut Graph,
    coordinator: &Coordinator,
    hooks: &mut Option<&mut dyn EdgeHooks>,
) -> Result<(), SolveError> {
    // Entries are (snapshot distance, vertex); Reverse turns the max-heap
    // into a min-heap.
    let mut heap: BinaryHeap<Reverse<(Dist, VertexId)>> = BinaryHeap::new();
    heap.push(Reverse((0, 0)));

    while let Some(Reverse((snapshot, v))) = heap.pop() {
        coordinator.hesitate()?;
        if snapshot != graph.dist[v] {
            // Left-over entry from a decrease-key reinsertion.
            continue;
        }
        if let Some(pred) = graph.pred[v] {
            graph.select(pred, graph.dist[v], hooks);
        }
        for i in 0..graph.vertices[v].edges.len() {
            let e = graph.vertices[v].edges[i];
            let o = graph.edges[e].other(v);
            let alt = graph.dist[v] + graph.edges[e].weight;
            if alt < graph.dist[o] {
                graph.dist[o] = alt;
                graph.pred[o] = Some(e);
                heap.push(Reverse((alt, o)));
            }
        }
    }

    debug!(
        distance = graph.dist[graph.num_vertices() - 1],
        "reference solver settled the last vertex"
    );
    Ok(())
}
