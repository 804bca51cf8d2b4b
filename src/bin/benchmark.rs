use std::env;
use ac_sssp::algorithm::Algorithm;
use ac_sssp::graph::generators::{example_graph, hierarchical_graph};
use ac_sssp::{build_decomposition, build_source_ac_tree, compare_algorithms, reconstruct_path};

// Prints one run on the example graph as JSON
fn dump_example(algorithm: Algorithm) -> Result<(), Box<dyn std::error::Error>> {
    let graph = example_graph();
    let result = algorithm.run(&graph, 0)?;
    let decomposition = build_decomposition(&graph);
    let source_tree = build_source_ac_tree(&graph, 0)?;

    println!("{}", serde_json::to_string_pretty(&decomposition)?);
    println!("{}", serde_json::to_string_pretty(&source_tree)?);
    println!("{}", serde_json::to_string_pretty(&result)?);

    let path = reconstruct_path(&result, 0, 3);
    let labels: Vec<&str> = path
        .iter()
        .filter_map(|&id| graph.node(id).map(|node| node.label.as_str()))
        .collect();
    println!("Shortest path A -> D: {}", labels.join(" -> "));
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    // Usage: benchmark [seed] | benchmark example [baseline|recursive]
    let args: Vec<String> = env::args().collect();
    if args.get(1).map(String::as_str) == Some("example") {
        let algorithm = match args.get(2) {
            Some(name) => name.parse()?,
            None => Algorithm::Recursive,
        };
        return dump_example(algorithm);
    }

    let seed = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(42);

    // (component count, component size)
    let shapes = vec![(5, 3), (10, 5), (20, 10), (50, 10), (100, 20)];
    let connection_probability = 0.3;

    println!("=====================================================");
    println!("Benchmark: Dijkstra vs Recursive Dijkstra (A-C tree)");
    println!(
        "Hierarchical graphs, connection probability {}, seed {}",
        connection_probability, seed
    );
    println!("=====================================================");

    let mut rows = Vec::new();
    for &(components, size) in &shapes {
        let graph = hierarchical_graph(components, size, connection_probability, seed);
        println!(
            "\nGraph with {} components of {} nodes: {} vertices, {} edges",
            components,
            size,
            graph.node_count(),
            graph.edge_count()
        );

        let comparison = compare_algorithms(&graph, 0)?;
        println!(
            "  - Operations: baseline {}, recursive {} (improvement {:+.1}%)",
            comparison.standard_operations,
            comparison.recursive_operations,
            comparison.improvement * 100.0
        );
        println!(
            "  - Nesting width {} over {} levels, distances match: {}",
            comparison.nesting_width, comparison.levels, comparison.distances_match
        );
        rows.push((graph.node_count(), comparison));
    }

    // Print summary table
    println!("\n=====================================================");
    println!("Summary of Results");
    println!("=====================================================");
    println!(
        "{:<10} | {:<10} | {:<10} | {:<8} | {:<12} | {:<12} | {:<12}",
        "Vertices", "Baseline", "Recursive", "Width", "A-C (us)", "Dijkstra (us)", "Recursive (us)"
    );
    println!("-----------------------------------------------------");

    for (vertices, comparison) in &rows {
        println!(
            "{:<10} | {:<10} | {:<10} | {:<8} | {:<12} | {:<12} | {:<12}",
            vertices,
            comparison.standard_operations,
            comparison.recursive_operations,
            comparison.nesting_width,
            comparison.decomposition_time.as_micros(),
            comparison.baseline_time.as_micros(),
            comparison.recursive_time.as_micros()
        );
    }

    Ok(())
}
