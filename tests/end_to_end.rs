//! Literal end-to-end scenarios on hand-built graphs, boundary behaviors,
//! and liveness under pause and cancellation.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use sssp_delta_step::{
    delta_step, dijkstra, generate, Coordinator, Dist, EdgeHooks, Graph, GraphParams, SolveError,
    INFINITY,
};

fn both_solvers(graph: &mut Graph, workers: usize, degree: usize) -> (Vec<Dist>, Vec<Dist>) {
    let coordinator = Coordinator::new();
    dijkstra::solve(graph, &coordinator, None).expect("reference solve succeeds");
    let reference = graph.dist.clone();
    delta_step::solve(graph, workers, degree, &coordinator, None).expect("delta solve succeeds");
    (reference, graph.dist.clone())
}

#[test]
fn chain_of_four_vertices() {
    let mut g = Graph::with_coords(vec![(0, 0), (1, 0), (2, 0), (3, 0)]);
    g.add_edge(0, 1, 1);
    g.add_edge(1, 2, 2);
    g.add_edge(2, 3, 3);
    let (reference, parallel) = both_solvers(&mut g, 2, 5);
    assert_eq!(reference, vec![0, 1, 3, 6]);
    assert_eq!(parallel, reference);
}

#[test]
fn star_from_the_source() {
    let mut g = Graph::with_coords(vec![(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)]);
    g.add_edge(0, 1, 2);
    g.add_edge(0, 2, 5);
    g.add_edge(0, 3, 7);
    g.add_edge(0, 4, 1);
    let (reference, parallel) = both_solvers(&mut g, 3, 5);
    assert_eq!(reference, vec![0, 2, 5, 7, 1]);
    assert_eq!(parallel, reference);
}

#[test]
fn triangle_where_the_detour_wins() {
    let mut g = Graph::with_coords(vec![(0, 0), (1, 0), (2, 0)]);
    g.add_edge(0, 1, 10);
    g.add_edge(1, 2, 1);
    g.add_edge(0, 2, 3);
    let (reference, parallel) = both_solvers(&mut g, 2, 5);
    assert_eq!(reference, vec![0, 4, 3]);
    assert_eq!(parallel, reference);
}

#[test]
fn generated_single_vertex_graph() {
    let mut graph = generate(&GraphParams { num_vertices: 1, seed: 0, degree: 5, geom: 1.0 });
    let (reference, parallel) = both_solvers(&mut graph, 2, 5);
    assert_eq!(reference, vec![0]);
    assert_eq!(parallel, vec![0]);
}

#[test]
fn disconnected_component_stays_unreached() {
    let mut g = Graph::with_coords(vec![(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)]);
    g.add_edge(0, 1, 4);
    g.add_edge(1, 2, 4);
    g.add_edge(3, 4, 1); // island
    let (reference, parallel) = both_solvers(&mut g, 2, 5);
    assert_eq!(reference, vec![0, 4, 8, INFINITY, INFINITY]);
    assert_eq!(parallel, reference);
}

#[test]
fn predecessors_trace_back_to_the_source() {
    let params = GraphParams { num_vertices: 80, seed: 5, degree: 5, geom: 1.0 };
    let mut graph = generate(&params);
    let coordinator = Coordinator::new();
    delta_step::solve(&mut graph, 4, params.degree, &coordinator, None).unwrap();

    for start in 0..graph.num_vertices() {
        if graph.dist[start] == INFINITY || start == 0 {
            continue;
        }
        let mut v = start;
        let mut total = 0u64;
        while let Some(e) = graph.pred[v] {
            assert!(graph.selected[e], "predecessor edges stay selected");
            total += graph.edges[e].weight;
            v = graph.edges[e].other(v);
        }
        assert_eq!(v, 0, "predecessor chain of {start} must reach the source");
        assert_eq!(total, graph.dist[start]);
    }
}

#[test]
fn select_hooks_fire_only_with_committed_distances() {
    struct Recorder {
        selections: Vec<Dist>,
    }
    impl EdgeHooks for Recorder {
        fn edge_selected(&mut self, _: u64, _: u64, _: u64, _: u64, dist: Dist) {
            assert_ne!(dist, INFINITY);
            self.selections.push(dist);
        }
        fn edge_unselected(&mut self, _: u64, _: u64, _: u64, _: u64) {}
    }

    let params = GraphParams { num_vertices: 60, seed: 8, degree: 5, geom: 0.5 };
    let mut graph = generate(&params);
    let coordinator = Coordinator::new();
    let mut recorder = Recorder { selections: Vec::new() };
    delta_step::solve(&mut graph, 2, params.degree, &coordinator, Some(&mut recorder)).unwrap();

    let reachable = graph.dist.iter().filter(|&&d| d != INFINITY).count();
    // Every reachable non-source vertex commits at least once.
    assert!(recorder.selections.len() >= reachable.saturating_sub(1));
}

#[test]
fn cancelling_mid_solve_returns_without_deadlock() {
    let params = GraphParams { num_vertices: 5000, seed: 1, degree: 6, geom: 0.5 };
    let mut graph = generate(&params);
    let coordinator = Arc::new(Coordinator::new());

    thread::scope(|s| {
        let handle = {
            let coordinator = Arc::clone(&coordinator);
            let graph = &mut graph;
            s.spawn(move || delta_step::solve(graph, 4, 6, &coordinator, None))
        };
        thread::sleep(Duration::from_millis(5));
        // Returns only once every registered solver thread has unwound.
        coordinator.stop();
        let outcome = handle.join().expect("solver thread must not panic");
        assert!(
            matches!(outcome, Ok(()) | Err(SolveError::Killed)),
            "unexpected outcome: {outcome:?}"
        );
    });
}

#[test]
fn paused_solve_finishes_after_resume() {
    let params = GraphParams { num_vertices: 400, seed: 2, degree: 5, geom: 1.0 };
    let mut graph = generate(&params);
    let expected = {
        let mut copy = generate(&params);
        let coordinator = Coordinator::new();
        dijkstra::solve(&mut copy, &coordinator, None).unwrap();
        copy.dist.clone()
    };

    let coordinator = Arc::new(Coordinator::new());
    coordinator.toggle(); // start paused

    thread::scope(|s| {
        let handle = {
            let coordinator = Arc::clone(&coordinator);
            let graph = &mut graph;
            s.spawn(move || delta_step::solve(graph, 2, 5, &coordinator, None))
        };
        thread::sleep(Duration::from_millis(20));
        coordinator.toggle(); // resume
        handle.join().unwrap().expect("resumed solve completes");
    });

    assert_eq!(graph.dist, expected);
}
