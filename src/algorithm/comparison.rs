use std::fmt::Debug;
use std::time::{Duration, Instant};
use log::{debug, warn};
use num_traits::{Float, Zero};
use serde::Serialize;

use crate::algorithm::dijkstra::Dijkstra;
use crate::algorithm::recursive_dijkstra::RecursiveDijkstra;
use crate::algorithm::{ShortestPathAlgorithm, ShortestPathResult};
use crate::decomposition::{build_decomposition, Decomposition};
use crate::graph::{DirectedGraph, NodeId};
use crate::Result;

/// Side-by-side figures for one baseline run and one recursive run
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceComparison {
    pub standard_operations: usize,
    pub recursive_operations: usize,
    /// Fraction of baseline operations saved; negative when the recursive run did
    /// more work, 0 when the baseline did nothing
    pub improvement: f64,
    pub nesting_width: usize,
    pub components: usize,
    pub nontrivial_components: usize,
    pub levels: usize,
    /// True if the decomposition fell back to singletons
    pub degraded: bool,
    /// True if both runs produced the same distance for every node
    pub distances_match: bool,
    pub decomposition_time: Duration,
    pub baseline_time: Duration,
    pub recursive_time: Duration,
}

impl PerformanceComparison {
    /// Builds the comparison from finished runs; timings are left at zero
    pub fn from_results<W>(
        baseline: &ShortestPathResult<W>,
        recursive: &ShortestPathResult<W>,
        decomposition: &Decomposition,
    ) -> Self
    where
        W: Float + Zero + Debug + Copy,
    {
        let standard_operations = baseline.operation_count();
        let recursive_operations = recursive.operation_count();
        let improvement = if standard_operations > 0 {
            (standard_operations as f64 - recursive_operations as f64) / standard_operations as f64
        } else {
            0.0
        };

        PerformanceComparison {
            standard_operations,
            recursive_operations,
            improvement,
            nesting_width: decomposition.nesting_width,
            components: decomposition.component_count(),
            nontrivial_components: decomposition.nontrivial_components().count(),
            levels: decomposition.levels(),
            degraded: decomposition.is_degraded(),
            distances_match: baseline.distances == recursive.distances,
            decomposition_time: Duration::ZERO,
            baseline_time: Duration::ZERO,
            recursive_time: Duration::ZERO,
        }
    }
}

fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let value = f();
    (value, start.elapsed())
}

/// Decomposes the graph, then runs both algorithms concurrently without step recording
pub fn compare_algorithms<W>(
    graph: &DirectedGraph<W>,
    source: NodeId,
) -> Result<PerformanceComparison>
where
    W: Float + Zero + Debug + Copy + Send + Sync,
{
    let (decomposition, decomposition_time) = timed(|| build_decomposition(graph));

    let baseline = Dijkstra::new().with_step_recording(false);
    let recursive = RecursiveDijkstra::new().with_step_recording(false);

    let ((baseline_result, baseline_time), (recursive_result, recursive_time)) = rayon::join(
        || timed(|| baseline.compute_shortest_paths(graph, source)),
        || timed(|| recursive.run(graph, source, &decomposition)),
    );
    let (baseline_result, recursive_result) = (baseline_result?, recursive_result?);

    let mut comparison =
        PerformanceComparison::from_results(&baseline_result, &recursive_result, &decomposition);
    comparison.decomposition_time = decomposition_time;
    comparison.baseline_time = baseline_time;
    comparison.recursive_time = recursive_time;

    if !comparison.distances_match {
        warn!("Baseline and recursive distances differ for source {}", source);
    }
    debug!(
        "Operations from source {}: baseline {}, recursive {} (improvement {:+.1}%)",
        source,
        comparison.standard_operations,
        comparison.recursive_operations,
        comparison.improvement * 100.0
    );

    Ok(comparison)
}
