//! Deterministic geometric graph construction.
//!
//! Works by scattering vertices uniformly over the coordinate plane and
//! wiring each one to a random quarter of its geometric neighbourhood. The
//! plane is tiled into a `k x k` checkerboard so that the 3x3 block of
//! squares around a vertex holds roughly `4 * degree` candidates.
//!
//! Every random draw comes from a single seeded `StdRng` in a fixed order,
//! so a `(n, seed, degree, geom)` tuple always reproduces the same graph:
//! first the rejection-sampled coordinates of vertices `0..n`, then, per
//! vertex in id order and per checkerboard square in row-major order, one
//! admission draw per candidate that passes the hash tie-break and one
//! weight draw per admitted edge.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::graph::{Graph, Vertex, MAX_COORD};

/// Everything the generator needs to rebuild a graph from scratch.
#[derive(Clone, Copy, Debug)]
pub struct GraphParams {
    pub num_vertices: usize,
    pub seed: u64,
    /// Desired average vertex degree near the middle of the graph.
    pub degree: usize,
    /// Degree of geometric realism in `[0, 1]`: 0 means fully random edge
    /// weights, 1 means pure euclidean distance.
    pub geom: f64,
}

impl GraphParams {
    /// Advance to the next seed and return it. Rebuilding with the returned
    /// seed yields a fresh graph, which is how "randomize" behaves.
    pub fn randomize(&mut self) -> u64 {
        self.seed += 1;
        self.seed
    }
}

/// Euclidean distance between two vertices, truncated to an integer.
fn euclidean_distance(a: &Vertex, b: &Vertex) -> u64 {
    let dx = a.x as f64 - b.x as f64;
    let dy = a.y as f64 - b.y as f64;
    (dx * dx + dy * dy).sqrt() as u64
}

/// Neighbourhood bounds along one axis: the 3 squares around `b`, shifted
/// inward at the borders so the window always spans 3 squares when `k >= 3`.
fn axis_bounds(b: usize, k: usize) -> (usize, usize) {
    if b == 0 {
        (0, 2)
    } else if b == k - 1 {
        (k - 3, k - 1)
    } else {
        (b - 1, b + 1)
    }
}

/// Build a reproducible undirected weighted graph.
pub fn generate(params: &GraphParams) -> Graph {
    let n = params.num_vertices;
    let degree = params.degree;

    // Checkerboard: each vertex chooses neighbours from a 3x3 block of
    // squares, so size the grid to put about 4 * degree vertices per block.
    let k = (((n as f64 / degree as f64).sqrt() * 3.0 / 2.0) as usize).max(1);
    let sw = MAX_COORD.div_ceil(k as u64); // square width

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut board: Vec<Vec<Vec<usize>>> = vec![vec![Vec::new(); k]; k];
    let mut occupied: HashSet<(u64, u64)> = HashSet::with_capacity(n);

    let mut coords = Vec::with_capacity(n);
    for id in 0..n {
        let (x, y) = loop {
            let x = rng.gen_range(0..MAX_COORD);
            let y = rng.gen_range(0..MAX_COORD);
            if occupied.insert((x, y)) {
                break (x, y);
            }
        };
        coords.push((x, y));
        board[(x / sw) as usize][(y / sw) as usize].push(id);
    }
    let mut graph = Graph::with_coords(coords);

    for v in 0..n {
        let xb = (graph.vertices[v].x / sw) as usize;
        let yb = (graph.vertices[v].y / sw) as usize;
        let (xl, xh, yl, yh) = if k < 3 {
            (0, k - 1, 0, k - 1)
        } else {
            let (xl, xh) = axis_bounds(xb, k);
            let (yl, yh) = axis_bounds(yb, k);
            (xl, xh, yl, yh)
        };
        let hash_v = graph.vertices[v].coord_hash();
        for i in xl..=xh {
            for j in yl..=yh {
                for idx in 0..board[i][j].len() {
                    let u = board[i][j][idx];
                    // The hash tie-break generates each edge from exactly one
                    // endpoint, which also rules out self loops.
                    if hash_v < graph.vertices[u].coord_hash() && rng.gen::<u32>() % 4 == 0 {
                        let dist = euclidean_distance(&graph.vertices[u], &graph.vertices[v]);
                        let rand_weight = rng.gen_range(0..2 * MAX_COORD);
                        let weight = (params.geom * dist as f64
                            + (1.0 - params.geom) * rand_weight as f64)
                            as u64;
                        graph.add_edge(u, v, weight.max(1));
                    }
                }
            }
        }
    }

    graph
}
