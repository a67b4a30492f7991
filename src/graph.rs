//! Arena graph model: vertices and edges addressed by integer ids.
//!
//! The topology (coordinates, adjacency lists, edge weights) is immutable
//! once built. The mutable solve state lives in parallel arrays so that a
//! parallel solver can share the topology across threads while a single
//! commit thread owns the distances, predecessors, and selection flags.

pub type VertexId = usize;
pub type EdgeId = usize;

/// Path distances and edge weights.
pub type Dist = u64;

/// Distance of a vertex that no path has reached yet.
pub const INFINITY: Dist = Dist::MAX;

/// All x and y coordinates lie in `[0, MAX_COORD)`.
pub const MAX_COORD: u64 = 1024 * 1024 * 256;

/// A point on the surface together with its incident edges.
#[derive(Clone, Debug)]
pub struct Vertex {
    pub x: u64,
    pub y: u64,
    /// Ids of the incident edges, in creation order.
    pub edges: Vec<EdgeId>,
}

impl Vertex {
    /// Coordinate hash, also the tie-break key used during generation.
    /// Two vertices compare equal exactly when their coordinates do.
    pub fn coord_hash(&self) -> u64 {
        self.x ^ self.y
    }
}

/// An undirected weighted edge. Endpoint order carries no meaning.
#[derive(Clone, Debug)]
pub struct Edge {
    pub v1: VertexId,
    pub v2: VertexId,
    pub weight: Dist,
}

impl Edge {
    /// The endpoint opposite `v`.
    pub fn other(&self, v: VertexId) -> VertexId {
        if v == self.v1 { self.v2 } else { self.v1 }
    }
}

/// Callbacks fired when a solver commits or retracts a predecessor edge.
///
/// Both are invoked synchronously from the commit thread, never from a
/// worker, so implementations observe only fully-committed state.
pub trait EdgeHooks {
    fn edge_selected(&mut self, x1: u64, y1: u64, x2: u64, y2: u64, dist: Dist);
    fn edge_unselected(&mut self, x1: u64, y1: u64, x2: u64, y2: u64);
}

/// The SSSP world. Vertex 0 is the source.
pub struct Graph {
    pub vertices: Vec<Vertex>,
    pub edges: Vec<Edge>,
    /// Tentative (and, after a solve, final) distance from the source.
    pub dist: Vec<Dist>,
    /// Edge over which each vertex was last improved.
    pub pred: Vec<Option<EdgeId>>,
    /// Per-edge flag driven by the select/unselect hooks.
    pub selected: Vec<bool>,
}

impl Graph {
    /// Build a graph with the given vertex coordinates and no edges.
    pub fn with_coords(coords: Vec<(u64, u64)>) -> Self {
        let n = coords.len();
        let vertices = coords
            .into_iter()
            .map(|(x, y)| Vertex { x, y, edges: Vec::new() })
            .collect();
        let mut graph = Graph {
            vertices,
            edges: Vec::new(),
            dist: vec![INFINITY; n],
            pred: vec![None; n],
            selected: Vec::new(),
        };
        graph.reset_state();
        graph
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Add an undirected edge, recording it in both adjacency lists.
    pub fn add_edge(&mut self, a: VertexId, b: VertexId, weight: Dist) -> EdgeId {
        debug_assert!(a != b, "self loops are not representable");
        debug_assert!(weight > 0, "edge weights are strictly positive");
        let id = self.edges.len();
        self.edges.push(Edge { v1: a, v2: b, weight });
        self.selected.push(false);
        self.vertices[a].edges.push(id);
        self.vertices[b].edges.push(id);
        id
    }

    /// Restore the pre-solve state: every distance infinite except the
    /// source, no predecessors, no selected edges.
    pub fn reset_state(&mut self) {
        self.dist.clear();
        self.dist.resize(self.vertices.len(), INFINITY);
        if !self.dist.is_empty() {
            self.dist[0] = 0;
        }
        self.pred.clear();
        self.pred.resize(self.vertices.len(), None);
        self.selected.clear();
        self.selected.resize(self.edges.len(), false);
    }

    /// Endpoint coordinates of an edge, in `(x1, y1, x2, y2)` order.
    pub fn edge_coords(&self, e: EdgeId) -> (u64, u64, u64, u64) {
        let edge = &self.edges[e];
        let a = &self.vertices[edge.v1];
        let b = &self.vertices[edge.v2];
        (a.x, a.y, b.x, b.y)
    }

    /// Mark an edge as the committed predecessor of a vertex at `dist`.
    pub fn select(&mut self, e: EdgeId, dist: Dist, hooks: &mut Option<&mut dyn EdgeHooks>) {
        self.selected[e] = true;
        if let Some(h) = hooks {
            let (x1, y1, x2, y2) = self.edge_coords(e);
            h.edge_selected(x1, y1, x2, y2, dist);
        }
    }

    /// Retract a previously selected predecessor edge.
    pub fn unselect(&mut self, e: EdgeId, hooks: &mut Option<&mut dyn EdgeHooks>) {
        self.selected[e] = false;
        if let Some(h) = hooks {
            let (x1, y1, x2, y2) = self.edge_coords(e);
            h.edge_unselected(x1, y1, x2, y2);
        }
    }

    /// Visit every edge with its endpoint coordinates and selection flag.
    pub fn for_all_edges(&self, mut f: impl FnMut(u64, u64, u64, u64, bool, Dist)) {
        for (id, edge) in self.edges.iter().enumerate() {
            let (x1, y1, x2, y2) = self.edge_coords(id);
            f(x1, y1, x2, y2, self.selected[id], edge.weight);
        }
    }

    /// Visit every vertex position.
    pub fn for_all_vertices(&self, mut f: impl FnMut(u64, u64)) {
        for v in &self.vertices {
            f(v.x, v.y);
        }
    }

    /// Visit the source vertex position.
    pub fn for_source(&self, mut f: impl FnMut(u64, u64)) {
        if let Some(v) = self.vertices.first() {
            f(v.x, v.y);
        }
    }
}
