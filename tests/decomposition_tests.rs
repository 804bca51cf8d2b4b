use ac_sssp::decomposition::tarjan::strongly_connected_components;
use ac_sssp::decomposition::{
    build_decomposition_with, CondensationEdge, CondensationGraph, CondensationNode,
};
use ac_sssp::graph::generators::{
    chain_graph, example_graph, hierarchical_graph, random_dag, random_graph, RandomGraphConfig,
};
use ac_sssp::graph::{AdjacencyList, Graph};
use ac_sssp::{
    build_decomposition, Decomposition, DecompositionMode, DirectedGraph, Error, ErrorKind,
    GraphBuilder,
};
use ordered_float::OrderedFloat;
use std::collections::HashSet;

type Weight = OrderedFloat<f64>;

// Two cycles joined by one edge: {0, 1, 2} -> {3, 4}
fn two_cycle_graph() -> DirectedGraph<Weight> {
    GraphBuilder::new()
        .with_nodes(5)
        .edge(0, 1, OrderedFloat(1.0))
        .edge(1, 2, OrderedFloat(1.0))
        .edge(2, 0, OrderedFloat(1.0))
        .edge(2, 3, OrderedFloat(5.0))
        .edge(3, 4, OrderedFloat(1.0))
        .edge(4, 3, OrderedFloat(1.0))
        .build()
        .unwrap()
}

fn assert_partition(graph: &DirectedGraph<Weight>, decomposition: &Decomposition) {
    let mut seen = HashSet::new();
    for component in &decomposition.components {
        assert!(!component.is_empty());
        for &id in &component.members {
            assert!(graph.contains_node(id), "unknown member {}", id);
            assert!(seen.insert(id), "node {} appears twice", id);
        }
    }
    assert_eq!(seen.len(), graph.node_count());
}

fn assert_topological(decomposition: &Decomposition) {
    for edge in &decomposition.condensation.edges {
        let source = decomposition.topological_position(edge.source).unwrap();
        let target = decomposition.topological_position(edge.target).unwrap();
        assert!(source < target, "edge {:?} goes backwards", edge);
    }
}

/// View that reports an edge to a vertex outside the graph
#[derive(Debug)]
struct DanglingView(AdjacencyList<Weight>);

impl Graph<Weight> for DanglingView {
    fn vertex_count(&self) -> usize {
        self.0.vertex_count()
    }

    fn edge_count(&self) -> usize {
        self.0.edge_count() + 1
    }

    fn outgoing_edges(&self, vertex: usize) -> Box<dyn Iterator<Item = (usize, Weight)> + '_> {
        let extra = if vertex == 0 {
            Some((self.0.vertex_count() + 3, OrderedFloat(1.0)))
        } else {
            None
        };
        Box::new(self.0.outgoing_edges(vertex).chain(extra))
    }

    fn incoming_edges(&self, vertex: usize) -> Box<dyn Iterator<Item = (usize, Weight)> + '_> {
        self.0.incoming_edges(vertex)
    }

    fn has_vertex(&self, vertex: usize) -> bool {
        self.0.has_vertex(vertex)
    }
}

#[test]
fn test_tarjan_finds_cycles() {
    let graph = two_cycle_graph();
    let components = strongly_connected_components(&graph.adjacency()).unwrap();

    // Sinks are emitted first
    assert_eq!(components, vec![vec![4, 3], vec![2, 1, 0]]);
}

#[test]
fn test_tarjan_rejects_out_of_range_edges() {
    let graph = example_graph();
    let view = DanglingView(graph.adjacency());
    let err = strongly_connected_components(&view).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DecompositionDefect);
}

#[test]
fn test_example_graph_is_all_singletons() {
    let graph = example_graph();
    let decomposition = build_decomposition(&graph);

    assert_eq!(decomposition.mode, DecompositionMode::Exact);
    assert_eq!(decomposition.component_count(), 7);
    assert!(decomposition.components.iter().all(|c| c.is_singleton()));
    assert_eq!(decomposition.nesting_width, 1);
    assert_eq!(decomposition.levels(), 7);
    assert_partition(&graph, &decomposition);
    assert_topological(&decomposition);

    // A must come first and D last: every other node lies between them
    let first = decomposition.topological_order[0];
    let last = *decomposition.topological_order.last().unwrap();
    assert_eq!(decomposition.components[first].members, vec![0]);
    assert_eq!(decomposition.components[last].members, vec![3]);
}

#[test]
fn test_condensation_and_tree_for_cycles() {
    let graph = two_cycle_graph();
    let decomposition = build_decomposition(&graph);

    assert_eq!(decomposition.component_count(), 2);
    assert_eq!(decomposition.nontrivial_components().count(), 2);
    assert_eq!(decomposition.nesting_width, 3);
    assert_eq!(decomposition.topological_order, vec![1, 0]);

    assert_eq!(
        decomposition.condensation.edges,
        vec![CondensationEdge {
            source: 1,
            target: 0,
            weight: 1
        }]
    );
    assert_eq!(decomposition.condensation.nodes[1].size, 3);

    let tree = &decomposition.ac_tree;
    assert_eq!(tree.children(1), vec![0]);
    assert!(tree.children(0).is_empty());
    assert_eq!(tree.node_for(1).map(|n| n.level), Some(0));
    assert_eq!(tree.node_for(0).map(|n| n.level), Some(1));
    assert!(tree.edges.iter().all(|e| e.span() == 1));
    assert!(!tree.node_for(0).unwrap().is_leaf);
}

#[test]
fn test_condensation_counts_parallel_crossings() {
    let graph = GraphBuilder::new()
        .with_nodes(3)
        .edge(0, 1, OrderedFloat(1.0))
        .edge(1, 0, OrderedFloat(1.0))
        .edge(0, 2, OrderedFloat(4.0))
        .edge(1, 2, OrderedFloat(2.0))
        .edge(1, 2, OrderedFloat(3.0))
        .build()
        .unwrap();
    let decomposition = build_decomposition(&graph);

    // One condensation edge for three crossing edges
    assert_eq!(decomposition.condensation.edges.len(), 1);
    assert_eq!(decomposition.condensation.edges[0].weight, 3);
    assert_eq!(decomposition.nesting_width, 2);
}

#[test]
fn test_topological_order_rejects_cycles() {
    let node = |component: usize| CondensationNode {
        component,
        label: format!("SCC{}", component),
        size: 1,
    };
    let condensation = CondensationGraph {
        nodes: vec![node(0), node(1), node(2)],
        edges: vec![
            CondensationEdge { source: 0, target: 1, weight: 1 },
            CondensationEdge { source: 1, target: 2, weight: 1 },
            CondensationEdge { source: 2, target: 1, weight: 1 },
        ],
    };

    assert_eq!(
        condensation.topological_order().unwrap_err(),
        Error::CondensationCycle { ordered: 1, total: 3 }
    );
}

#[test]
fn test_chain_graph_has_unit_width() {
    let graph = chain_graph(6, 1.0);
    let decomposition = build_decomposition(&graph);

    assert_eq!(decomposition.component_count(), 6);
    assert_eq!(decomposition.nesting_width, 1);
    assert_eq!(decomposition.ac_tree.edges.len(), 5);
}

#[test]
fn test_empty_graph() {
    let graph: DirectedGraph<Weight> = DirectedGraph::empty();
    let decomposition = build_decomposition(&graph);

    assert!(!decomposition.is_degraded());
    assert_eq!(decomposition.component_count(), 0);
    assert_eq!(decomposition.nesting_width, 1);
}

#[test]
fn test_invariants_hold_on_random_graphs() {
    for seed in 0..25 {
        let config = RandomGraphConfig::new(14, 0.15, seed);
        let graphs = vec![
            random_graph(&config),
            random_graph(&config.clone().with_connected(true)),
            random_dag(&config),
            hierarchical_graph(4, 3, 0.5, seed),
        ];

        for graph in &graphs {
            let decomposition = build_decomposition(graph);
            assert!(!decomposition.is_degraded());
            assert_partition(graph, &decomposition);
            assert_topological(&decomposition);

            let largest = decomposition.components.iter().map(|c| c.len()).max().unwrap_or(1);
            assert_eq!(decomposition.nesting_width, largest);
        }
    }
}

#[test]
fn test_dag_components_are_singletons() {
    let graph = random_dag(&RandomGraphConfig::new(20, 0.3, 9));
    let decomposition = build_decomposition(&graph);
    assert_eq!(decomposition.component_count(), 20);
    assert_eq!(decomposition.nesting_width, 1);
}

#[test]
fn test_hierarchical_blocks_become_components() {
    let graph = hierarchical_graph(5, 3, 0.3, 7);
    let decomposition = build_decomposition(&graph);
    assert_eq!(decomposition.component_count(), 5);
    assert_eq!(decomposition.nontrivial_components().count(), 5);
    assert_eq!(decomposition.nesting_width, 3);
}

#[test]
fn test_defective_view_falls_back_to_singletons() {
    let graph = example_graph();
    let view = DanglingView(graph.adjacency());
    let decomposition = build_decomposition_with(&graph, &view);

    assert!(decomposition.is_degraded());
    assert_eq!(decomposition.component_count(), 7);
    assert_eq!(decomposition.nesting_width, 7);
    assert!(decomposition.condensation.edges.is_empty());
    assert!(decomposition.ac_tree.edges.is_empty());
    assert_eq!(decomposition.topological_order, (0..7).collect::<Vec<_>>());
    assert!(decomposition.ac_tree.nodes.iter().all(|n| n.level == 0));
    assert_partition(&graph, &decomposition);
}

#[test]
fn test_view_size_mismatch_falls_back() {
    let graph = example_graph();
    let other = chain_graph(3, 1.0);
    let decomposition = build_decomposition_with(&graph, &other.adjacency());

    match &decomposition.mode {
        DecompositionMode::Degraded { reason } => assert!(reason.contains("3 vertices")),
        DecompositionMode::Exact => panic!("mismatched view should degrade"),
    }
}

#[test]
fn test_decomposition_serializes() {
    let decomposition = build_decomposition(&two_cycle_graph());
    let json = serde_json::to_value(&decomposition).unwrap();

    assert_eq!(json["nesting_width"], 3);
    assert_eq!(json["mode"], "Exact");
    assert_eq!(json["components"].as_array().map(|c| c.len()), Some(2));
    assert_eq!(json["condensation"]["nodes"][0]["label"], "SCC0");
}
