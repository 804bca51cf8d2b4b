use ac_sssp::graph::generators::{
    chain_graph, example_graph, hierarchical_graph, random_dag, random_graph, RandomGraphConfig,
};
use ac_sssp::{
    build_decomposition, compare_algorithms, reconstruct_path, Algorithm, Decomposition,
    Dijkstra, DirectedGraph, Error, ErrorKind, GraphBuilder, RecursiveDijkstra,
    ShortestPathAlgorithm, ShortestPathResult, StepOperation,
};
use ordered_float::OrderedFloat;

type Weight = OrderedFloat<f64>;

fn graphs_for_seed(seed: u64) -> Vec<DirectedGraph<Weight>> {
    let config = RandomGraphConfig::new(16, 0.2, seed);
    vec![
        random_graph(&config),
        random_graph(&config.clone().with_connected(true)),
        random_graph(&RandomGraphConfig::new(10, 0.5, seed).with_weight_range(1, 3)),
        random_dag(&config),
        hierarchical_graph(4, 4, 0.4, seed),
    ]
}

// Checks that every reported path is a real path whose weights add up to the distance
fn assert_paths_consistent(graph: &DirectedGraph<Weight>, result: &ShortestPathResult<Weight>) {
    let source = result.source;
    for node in graph.nodes() {
        let path = reconstruct_path(result, source, node.id);
        match result.distance(node.id) {
            None => assert!(path.is_empty(), "unreachable {} has a path", node.id),
            Some(distance) => {
                assert_eq!(path.first(), Some(&source));
                assert_eq!(path.last(), Some(&node.id));

                let mut total = OrderedFloat(0.0);
                for pair in path.windows(2) {
                    let weight = graph
                        .edges()
                        .iter()
                        .filter(|e| e.source == pair[0] && e.target == pair[1])
                        .map(|e| e.weight)
                        .min()
                        .expect("consecutive path nodes must share an edge");
                    total = total + weight;
                }
                assert_eq!(total, distance, "path weight to {} differs from distance", node.id);
            }
        }
    }
}

#[test]
fn test_example_graph_distances() {
    let graph = example_graph();
    let expected = [
        (0, 0.0),
        (1, 4.0),
        (2, 7.0),
        (3, 7.0),
        (4, 2.0),
        (5, 5.0),
        (6, 6.0),
    ];

    for algorithm in [Algorithm::Baseline, Algorithm::Recursive] {
        let result = algorithm.run(&graph, 0).unwrap();
        for (node, distance) in expected {
            assert_eq!(
                result.distance(node),
                Some(OrderedFloat(distance)),
                "{} distance to {}",
                algorithm,
                node
            );
        }
        // A -> E -> F -> G -> D
        assert_eq!(reconstruct_path(&result, 0, 3), vec![0, 4, 5, 6, 3]);
        assert_eq!(result.predecessor(0), None);
        assert_eq!(result.reachable_count(), 7);
    }
}

#[test]
fn test_example_graph_operation_counts() {
    let graph = example_graph();
    let baseline = Dijkstra::new().compute_shortest_paths(&graph, 0).unwrap();
    let recursive = RecursiveDijkstra::new().compute_shortest_paths(&graph, 0).unwrap();

    // 7 extractions + 11 edges
    assert_eq!(baseline.operations.extractions, 7);
    assert_eq!(baseline.operations.edges_examined, 11);
    assert_eq!(baseline.operation_count(), 18);

    // 7 singleton components with one local extraction each, every edge crosses
    // a component boundary
    assert_eq!(recursive.operations.extractions, 7);
    assert_eq!(recursive.operations.components_entered, 7);
    assert_eq!(recursive.operations.edges_examined, 0);
    assert_eq!(recursive.operations.cross_edges, 11);
    assert_eq!(recursive.operation_count(), 25);
}

#[test]
fn test_operation_breakdown_with_cycles() {
    let graph = GraphBuilder::new()
        .with_nodes(5)
        .edge(0, 1, OrderedFloat(1.0))
        .edge(1, 2, OrderedFloat(1.0))
        .edge(2, 0, OrderedFloat(1.0))
        .edge(2, 3, OrderedFloat(5.0))
        .edge(3, 4, OrderedFloat(1.0))
        .edge(4, 3, OrderedFloat(1.0))
        .build()
        .unwrap();

    let baseline = Dijkstra::new().compute_shortest_paths(&graph, 0).unwrap();
    let recursive = RecursiveDijkstra::new().compute_shortest_paths(&graph, 0).unwrap();

    assert_eq!(baseline.distances, recursive.distances);
    assert_eq!(recursive.distance(3), Some(OrderedFloat(7.0)));
    assert_eq!(recursive.distance(4), Some(OrderedFloat(8.0)));

    // 5 extractions + 6 edges
    assert_eq!(baseline.operation_count(), 11);

    // {0, 1, 2} pops 3 entries over 3 internal edges, {3, 4} pops 2 over 2,
    // and the single edge 2 -> 3 crosses between them
    assert_eq!(recursive.operations.extractions, 5);
    assert_eq!(recursive.operations.edges_examined, 5);
    assert_eq!(recursive.operations.cross_edges, 1);
    assert_eq!(recursive.operations.components_entered, 2);
    assert_eq!(recursive.operation_count(), 13);
}

#[test]
fn test_algorithms_agree_on_random_graphs() {
    for seed in 0..30 {
        for graph in graphs_for_seed(seed) {
            for source in [0, graph.node_count() / 2, graph.node_count() - 1] {
                let baseline = Dijkstra::new().compute_shortest_paths(&graph, source).unwrap();
                let recursive = RecursiveDijkstra::new()
                    .compute_shortest_paths(&graph, source)
                    .unwrap();

                assert_eq!(
                    baseline.distances, recursive.distances,
                    "distances differ for seed {} source {}",
                    seed, source
                );
                // Both runs examine every edge leaving a reachable node exactly once
                let recursive_edges =
                    recursive.operations.edges_examined + recursive.operations.cross_edges;
                assert_eq!(recursive_edges, baseline.operations.edges_examined);
                assert!(recursive.operations.extractions >= recursive.reachable_count());
                assert!(baseline.operations.extractions >= baseline.reachable_count());
                assert!(recursive.operations.components_entered <= recursive.reachable_count());
                assert_paths_consistent(&graph, &baseline);
                assert_paths_consistent(&graph, &recursive);
            }
        }
    }
}

#[test]
fn test_runs_are_idempotent() {
    let graph = hierarchical_graph(5, 3, 0.5, 11);
    let decomposition = build_decomposition(&graph);
    let recursive = RecursiveDijkstra::new();

    let first = recursive.run(&graph, 2, &decomposition).unwrap();
    let second = recursive.run(&graph, 2, &decomposition).unwrap();
    assert_eq!(first.distances, second.distances);
    assert_eq!(first.predecessors, second.predecessors);
    assert_eq!(first.operations, second.operations);
    assert_eq!(first.steps, second.steps);

    let baseline = Dijkstra::new();
    let first = baseline.compute_shortest_paths(&graph, 2).unwrap();
    let second = baseline.compute_shortest_paths(&graph, 2).unwrap();
    assert_eq!(first.distances, second.distances);
    assert_eq!(first.steps, second.steps);
}

#[test]
fn test_chain_graph_counts_stay_close() {
    let graph = chain_graph(5, 1.0);
    let baseline = Dijkstra::new().compute_shortest_paths(&graph, 0).unwrap();
    let recursive = RecursiveDijkstra::new().compute_shortest_paths(&graph, 0).unwrap();

    assert_eq!(recursive.distance(4), Some(OrderedFloat(4.0)));
    assert_eq!(baseline.operation_count(), 9);

    // Same extractions and edges, plus one unit per component entered
    assert_eq!(recursive.operations.extractions, baseline.operations.extractions);
    assert_eq!(recursive.operations.components_entered, 5);
    assert_eq!(recursive.operation_count(), 14);
}

#[test]
fn test_unreachable_nodes() {
    let graph = example_graph();

    // Nothing leaves D
    let result = RecursiveDijkstra::new().compute_shortest_paths(&graph, 3).unwrap();
    assert_eq!(result.reachable_count(), 1);
    assert_eq!(result.distance(0), None);
    assert!(reconstruct_path(&result, 3, 0).is_empty());
    assert_eq!(reconstruct_path(&result, 3, 3), vec![3]);
}

#[test]
fn test_fallback_decomposition_still_correct() {
    let graph = example_graph();
    let decomposition = Decomposition::fallback(&graph, "forced");
    assert!(decomposition.is_degraded());
    assert_eq!(decomposition.nesting_width, 7);

    let baseline = Dijkstra::new().compute_shortest_paths(&graph, 0).unwrap();
    let recursive = RecursiveDijkstra::new().run(&graph, 0, &decomposition).unwrap();
    assert_eq!(baseline.distances, recursive.distances);
    assert_eq!(reconstruct_path(&recursive, 0, 3), vec![0, 4, 5, 6, 3]);

    for seed in 0..10 {
        for graph in graphs_for_seed(seed) {
            let decomposition = Decomposition::fallback(&graph, "forced");
            let baseline = Dijkstra::new().compute_shortest_paths(&graph, 0).unwrap();
            let recursive = RecursiveDijkstra::new().run(&graph, 0, &decomposition).unwrap();
            assert_eq!(baseline.distances, recursive.distances, "seed {}", seed);
        }
    }
}

#[test]
fn test_invalid_source() {
    let graph = example_graph();

    let err = Dijkstra::new().compute_shortest_paths(&graph, 42).unwrap_err();
    assert_eq!(err, Error::InvalidSource(42));
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let err = RecursiveDijkstra::new().compute_shortest_paths(&graph, 42).unwrap_err();
    assert_eq!(err, Error::InvalidSource(42));
}

#[test]
fn test_empty_graph_has_no_valid_source() {
    let empty: DirectedGraph<Weight> = DirectedGraph::empty();

    // The decomposition itself succeeds
    let decomposition = build_decomposition(&empty);
    assert_eq!(decomposition.component_count(), 0);
    assert_eq!(decomposition.nesting_width, 1);

    for algorithm in [Algorithm::Baseline, Algorithm::Recursive] {
        let err = algorithm.run(&empty, 0).unwrap_err();
        assert_eq!(err, Error::InvalidSource(0), "{}", algorithm);
    }
    let err = RecursiveDijkstra::new().run(&empty, 0, &decomposition).unwrap_err();
    assert_eq!(err, Error::SourceNotInDecomposition(0));
}

#[test]
fn test_source_missing_from_decomposition() {
    let graph = example_graph();
    let decomposition = build_decomposition(&graph);

    let err = RecursiveDijkstra::new().run(&graph, 99, &decomposition).unwrap_err();
    assert_eq!(err, Error::SourceNotInDecomposition(99));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_decomposition_of_another_graph_is_rejected() {
    let decomposition = build_decomposition(&example_graph());
    let other = chain_graph(3, 1.0);

    let err = RecursiveDijkstra::new().run(&other, 0, &decomposition).unwrap_err();
    assert!(matches!(err, Error::DecompositionMismatch(_)));
    assert_eq!(err.kind(), ErrorKind::DecompositionDefect);
}

#[test]
fn test_baseline_step_trace() {
    let graph = example_graph();
    let result = Dijkstra::new().compute_shortest_paths(&graph, 0).unwrap();

    // Initialization, 7 visits, 6 improving relaxations
    assert_eq!(result.steps.len(), 14);

    let first = &result.steps[0];
    assert_eq!(first.operation, StepOperation::Initialization);
    assert!(first.visited.is_empty());
    assert_eq!(first.queue, vec![0]);
    assert_eq!(first.distances[&0], Some(OrderedFloat(0.0)));
    assert_eq!(first.distances[&3], None);

    let visits: Vec<_> = result
        .steps
        .iter()
        .filter_map(|step| match step.operation {
            StepOperation::VisitNode { node } => Some(node),
            _ => None,
        })
        .collect();
    // C and D tie at 7, so only the first five are fixed
    assert_eq!(visits[..5], [0, 4, 1, 5, 6]);
    assert_eq!(visits.len(), 7);

    let last = result.steps.last().unwrap();
    assert_eq!(last.visited.len(), 7);
}

#[test]
fn test_recursive_step_trace() {
    let graph = example_graph();
    let decomposition = build_decomposition(&graph);
    let result = RecursiveDijkstra::new().run(&graph, 0, &decomposition).unwrap();

    // Initialization, then one enter and one complete per component
    assert_eq!(result.steps.len(), 15);
    assert_eq!(result.steps[0].operation, StepOperation::Initialization);

    let source_component = decomposition.component_of(0).unwrap();
    match &result.steps[1].operation {
        StepOperation::EnterComponent {
            component,
            members,
            recursion_stack,
        } => {
            assert_eq!(*component, source_component);
            assert_eq!(members, &vec![0]);
            assert_eq!(recursion_stack, &vec![source_component]);
        }
        other => panic!("expected EnterComponent, got {:?}", other),
    }

    for step in &result.steps[1..] {
        match &step.operation {
            StepOperation::EnterComponent {
                component,
                recursion_stack,
                ..
            }
            | StepOperation::CompleteComponent {
                component,
                recursion_stack,
                ..
            } => {
                assert_eq!(recursion_stack.first(), Some(&source_component));
                assert_eq!(recursion_stack.last(), Some(component));
            }
            other => panic!("unexpected step {:?}", other),
        }
    }

    match &result.steps[14].operation {
        StepOperation::CompleteComponent { members, .. } => assert_eq!(members, &vec![3]),
        other => panic!("expected CompleteComponent, got {:?}", other),
    }
    assert_eq!(result.steps[14].visited.len(), 7);
}

#[test]
fn test_step_recording_can_be_disabled() {
    let graph = example_graph();

    let baseline = Dijkstra::new().with_step_recording(false);
    let recursive = RecursiveDijkstra::new().with_step_recording(false);

    let baseline_result = baseline.compute_shortest_paths(&graph, 0).unwrap();
    let recursive_result = recursive.compute_shortest_paths(&graph, 0).unwrap();
    assert!(baseline_result.steps.is_empty());
    assert!(recursive_result.steps.is_empty());
    assert_eq!(baseline_result.distance(3), Some(OrderedFloat(7.0)));
    assert_eq!(recursive_result.operation_count(), 25);
}

#[test]
fn test_get_path_via_trait() {
    let graph = example_graph();
    let baseline = Dijkstra::new();
    let recursive = RecursiveDijkstra::new();

    let baseline_result = baseline.compute_shortest_paths(&graph, 0).unwrap();
    let recursive_result = recursive.compute_shortest_paths(&graph, 0).unwrap();
    assert_eq!(baseline.get_path(&baseline_result, 2), Some(vec![0, 1, 2]));
    assert_eq!(recursive.get_path(&recursive_result, 2), Some(vec![0, 1, 2]));

    // Nothing leads back to A
    let from_d = recursive.compute_shortest_paths(&graph, 3).unwrap();
    assert_eq!(recursive.get_path(&from_d, 0), None);
    assert_eq!(
        ShortestPathAlgorithm::<Weight>::name(&recursive),
        "Recursive Dijkstra"
    );
}

#[test]
fn test_algorithm_names_parse() {
    assert_eq!("baseline".parse::<Algorithm>().unwrap(), Algorithm::Baseline);
    assert_eq!("Dijkstra".parse::<Algorithm>().unwrap(), Algorithm::Baseline);
    assert_eq!(" recursive ".parse::<Algorithm>().unwrap(), Algorithm::Recursive);
    assert_eq!("ac-tree".parse::<Algorithm>().unwrap(), Algorithm::Recursive);

    let err = "bellman-ford".parse::<Algorithm>().unwrap_err();
    assert_eq!(err, Error::UnknownAlgorithm("bellman-ford".to_string()));
    assert_eq!(Algorithm::Recursive.to_string(), "recursive");
}

#[test]
fn test_compare_algorithms() {
    let comparison = compare_algorithms(&example_graph(), 0).unwrap();
    assert!(comparison.distances_match);
    assert_eq!(comparison.standard_operations, 18);
    assert_eq!(comparison.recursive_operations, 25);
    assert!((comparison.improvement - (18.0 - 25.0) / 18.0).abs() < 1e-12);
    assert_eq!(comparison.nesting_width, 1);
    assert_eq!(comparison.components, 7);
    assert_eq!(comparison.nontrivial_components, 0);
    assert!(!comparison.degraded);

    let comparison = compare_algorithms(&hierarchical_graph(10, 5, 0.3, 42), 0).unwrap();
    assert!(comparison.distances_match);
    assert_eq!(comparison.nesting_width, 5);
    assert!(comparison.standard_operations > 0);
    assert!(comparison.recursive_operations > 0);

    assert!(compare_algorithms(&example_graph(), 77).is_err());
}

#[test]
fn test_result_serializes_to_json() {
    let result = Algorithm::Recursive.run(&example_graph(), 0).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["source"], 0);
    assert_eq!(json["distances"]["3"], 7.0);
    assert!(json["distances"]["0"].is_number());
    assert_eq!(json["steps"][0]["operation"]["kind"], "initialization");
    assert_eq!(json["steps"][1]["operation"]["kind"], "enter_component");
    assert_eq!(json["operations"]["cross_edges"], 11);
}
