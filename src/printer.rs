//! Terminal result surface: distances, elapsed time, and the
//! print-events animation hooks.

use std::time::Duration;

use crate::graph::{Dist, EdgeHooks, Graph, INFINITY};

/// Print every vertex's distance to the source and return the vector.
pub fn print_distances(graph: &Graph) -> Vec<Dist> {
    for (i, &d) in graph.dist.iter().enumerate() {
        if d == INFINITY {
            println!("vertex {i} distance to source: infinity");
        } else {
            println!("vertex {i} distance to source: {d}");
        }
    }
    graph.dist.clone()
}

pub fn print_elapsed(elapsed: Duration) {
    println!("elapsed time: {:.3} seconds", elapsed.as_secs_f64());
}

/// Animation mode 1: one stdout line per select/unselect event.
#[derive(Default)]
pub struct PrintEvents;

impl EdgeHooks for PrintEvents {
    fn edge_selected(&mut self, x1: u64, y1: u64, x2: u64, y2: u64, dist: Dist) {
        println!("selected   {x1:>12} {y1:>12} {x2:>12} {y2:>12} {dist:>12}");
    }

    fn edge_unselected(&mut self, x1: u64, y1: u64, x2: u64, y2: u64) {
        println!("unselected {x1:>12} {y1:>12} {x2:>12} {y2:>12}");
    }
}
