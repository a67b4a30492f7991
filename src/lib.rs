//! Single-source shortest paths over generated geometric graphs.
//!
//! Two solvers compute, for every vertex, the minimum-weight path distance
//! from vertex 0 of a weighted undirected graph:
//!
//! - [`dijkstra::solve`], a sequential priority-queue search used as the
//!   correctness reference, and
//! - [`delta_step::solve`], a bucket-based parallel solver driven by a pool
//!   of worker threads synchronized through a cyclic barrier.
//!
//! Graphs come from the deterministic [`generator`]: the same
//! `(n, seed, degree, geom)` tuple always rebuilds the same graph, and both
//! solvers produce the same distance vector on it. A shared
//! [`Coordinator`] lets a controlling thread pause, resume, or cancel a
//! solve in flight.

pub mod coordination;
pub mod delta_step;
pub mod dijkstra;
pub mod error;
pub mod generator;
pub mod graph;
pub mod options;
pub mod printer;

pub use coordination::{Coordinator, Killed};
pub use error::SolveError;
pub use generator::{generate, GraphParams};
pub use graph::{Dist, Edge, EdgeHooks, EdgeId, Graph, Vertex, VertexId, INFINITY, MAX_COORD};
