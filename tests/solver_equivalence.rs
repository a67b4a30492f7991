//! The parallel solver must reproduce the reference solver's distance
//! vector for every seed and worker count, and the reference solver itself
//! is cross-checked against an independent third-party implementation.

use pathfinding::prelude::dijkstra_all;

use sssp_delta_step::{
    delta_step, dijkstra, generate, Coordinator, Dist, Graph, GraphParams, VertexId, INFINITY,
};

fn reference_distances(graph: &mut Graph) -> Vec<Dist> {
    let coordinator = Coordinator::new();
    dijkstra::solve(graph, &coordinator, None).expect("reference solve succeeds");
    graph.dist.clone()
}

fn delta_distances(graph: &mut Graph, workers: usize, degree: usize) -> Vec<Dist> {
    let coordinator = Coordinator::new();
    delta_step::solve(graph, workers, degree, &coordinator, None).expect("delta solve succeeds");
    graph.dist.clone()
}

#[test]
fn parallel_matches_reference_across_seeds_and_worker_counts() {
    for seed in 0..4 {
        let params = GraphParams { num_vertices: 120, seed, degree: 5, geom: 1.0 };
        let mut graph = generate(&params);
        let expected = reference_distances(&mut graph);
        for workers in [1, 2, 4, 8] {
            let got = delta_distances(&mut graph, workers, params.degree);
            assert_eq!(got, expected, "seed {seed}, {workers} workers");
        }
    }
}

#[test]
fn solvers_agree_on_fully_random_weights() {
    let params = GraphParams { num_vertices: 150, seed: 13, degree: 5, geom: 0.0 };
    let mut graph = generate(&params);
    let expected = reference_distances(&mut graph);
    for workers in [1, 4] {
        assert_eq!(delta_distances(&mut graph, workers, params.degree), expected);
    }
}

#[test]
fn solvers_agree_on_pure_geometric_weights() {
    let params = GraphParams { num_vertices: 150, seed: 13, degree: 5, geom: 1.0 };
    let mut graph = generate(&params);
    let expected = reference_distances(&mut graph);
    for workers in [1, 4] {
        assert_eq!(delta_distances(&mut graph, workers, params.degree), expected);
    }
}

#[test]
fn mixed_realism_run_is_stable_across_worker_counts() {
    let params = GraphParams { num_vertices: 100, seed: 42, degree: 4, geom: 0.5 };
    let mut graph = generate(&params);
    let first = delta_distances(&mut graph, 1, params.degree);
    for workers in [2, 4, 8] {
        assert_eq!(
            delta_distances(&mut graph, workers, params.degree),
            first,
            "{workers} workers diverged"
        );
    }
    assert_eq!(reference_distances(&mut graph), first);
}

#[test]
fn fifty_vertex_run_matches_between_solvers() {
    let params = GraphParams { num_vertices: 50, seed: 0, degree: 5, geom: 1.0 };
    let mut graph = generate(&params);
    let reference = reference_distances(&mut graph);
    let parallel = delta_distances(&mut graph, 4, params.degree);
    assert_eq!(reference.len(), 50);
    assert_eq!(parallel, reference);
}

#[test]
fn regenerating_from_the_seed_reproduces_the_distances() {
    let params = GraphParams { num_vertices: 90, seed: 1234, degree: 5, geom: 0.7 };

    let mut first = generate(&params);
    let from_reference = reference_distances(&mut first);

    // A fresh generator run stands in for a fresh process.
    let mut second = generate(&params);
    let from_parallel = delta_distances(&mut second, 4, params.degree);

    assert_eq!(from_parallel, from_reference);
}

#[test]
fn reference_solver_matches_independent_oracle() {
    let params = GraphParams { num_vertices: 200, seed: 77, degree: 5, geom: 0.5 };
    let mut graph = generate(&params);
    let ours = reference_distances(&mut graph);

    let oracle = dijkstra_all(&0usize, |&v: &VertexId| {
        graph.vertices[v]
            .edges
            .iter()
            .map(|&e| (graph.edges[e].other(v), graph.edges[e].weight))
            .collect::<Vec<_>>()
    });

    for v in 0..graph.num_vertices() {
        match oracle.get(&v) {
            Some(&(_, cost)) => assert_eq!(ours[v], cost, "vertex {v}"),
            None if v == 0 => assert_eq!(ours[v], 0),
            None => assert_eq!(ours[v], INFINITY, "vertex {v} should be unreachable"),
        }
    }
}
