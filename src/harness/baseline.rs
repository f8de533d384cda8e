//! Brute-force optimum over set partitions
//!
//! Enumerates every partition of the vertex set as a restricted growth
//! string, optionally capped at a maximum number of parts. Exponential, but
//! exact and encoding-free, which makes it the known-optimal baseline the
//! consistency harness and tests validate the LP formulations against.

use crate::graph::SignedGraph;

/// Count the disagreements of a clustering vector against the graph:
/// similar pairs split across clusters plus dissimilar pairs sharing one.
pub fn disagreements(graph: &SignedGraph, labels: &[u32]) -> u64 {
    let n = graph.len();
    let mut count = 0;
    for i in 0..n {
        for j in 0..i {
            let together = labels[i] == labels[j];
            if graph.similar(i, j) != together {
                count += 1;
            }
        }
    }
    count
}

/// Exhaustively find an optimal partition, optionally with at most
/// `max_clusters` parts. Returns the minimal disagreement count and the
/// lexicographically first optimal clustering vector (which is already in
/// canonical first-seen label order by construction).
pub fn optimal_partition(graph: &SignedGraph, max_clusters: Option<usize>) -> (u64, Vec<u32>) {
    let n = graph.len();
    if n == 0 {
        return (0, Vec::new());
    }
    let cap = max_clusters.unwrap_or(n).max(1);

    let mut labels = vec![0u32; n];
    let mut best_cost = u64::MAX;
    let mut best_labels = vec![0u32; n];
    recurse(
        graph,
        &mut labels,
        1,
        1,
        0,
        cap,
        &mut best_cost,
        &mut best_labels,
    );
    (best_cost, best_labels)
}

/// Minimal disagreement count over all partitions (with at most
/// `max_clusters` parts if given)
pub fn optimal_disagreements(graph: &SignedGraph, max_clusters: Option<usize>) -> u64 {
    optimal_partition(graph, max_clusters).0
}

#[allow(clippy::too_many_arguments)]
fn recurse(
    graph: &SignedGraph,
    labels: &mut Vec<u32>,
    vertex: usize,
    used: u32,
    cost: u64,
    cap: usize,
    best_cost: &mut u64,
    best_labels: &mut Vec<u32>,
) {
    if cost >= *best_cost {
        return;
    }
    if vertex == labels.len() {
        *best_cost = cost;
        best_labels.copy_from_slice(labels);
        return;
    }

    // Restricted growth: a vertex may join an existing part or open the next
    // one, so each set partition is generated exactly once
    let limit = if (used as usize) < cap { used } else { used - 1 };
    for label in 0..=limit {
        labels[vertex] = label;
        let mut added = 0;
        for j in 0..vertex {
            let together = labels[j] == label;
            if graph.similar(vertex, j) != together {
                added += 1;
            }
        }
        let new_used = used.max(label + 1);
        recurse(
            graph,
            labels,
            vertex + 1,
            new_used,
            cost + added,
            cap,
            best_cost,
            best_labels,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(labels: Vec<Vec<u8>>) -> SignedGraph {
        SignedGraph::new(labels).unwrap()
    }

    #[test]
    fn counts_disagreements() {
        let g = graph(vec![vec![0, 1, 0], vec![1, 0, 0], vec![0, 0, 0]]);
        assert_eq!(disagreements(&g, &[0, 0, 1]), 0);
        assert_eq!(disagreements(&g, &[0, 0, 0]), 2);
        assert_eq!(disagreements(&g, &[0, 1, 2]), 1);
    }

    #[test]
    fn finds_zero_cost_partitions() {
        let g = graph(vec![vec![0, 1, 0], vec![1, 0, 0], vec![0, 0, 0]]);
        assert_eq!(optimal_partition(&g, None), (0, vec![0, 0, 1]));

        let singletons = graph(vec![vec![0; 3]; 3]);
        assert_eq!(optimal_partition(&singletons, None), (0, vec![0, 1, 2]));
    }

    #[test]
    fn respects_cluster_cap() {
        let singletons = graph(vec![vec![0; 3]; 3]);
        assert_eq!(optimal_disagreements(&singletons, Some(2)), 1);
        assert_eq!(optimal_disagreements(&singletons, Some(3)), 0);
    }

    #[test]
    fn intransitive_triangle_has_cost_one() {
        let g = graph(vec![vec![0, 1, 0], vec![1, 0, 1], vec![0, 1, 0]]);
        assert_eq!(optimal_disagreements(&g, None), 1);
    }

    #[test]
    fn handles_trivial_sizes() {
        assert_eq!(optimal_partition(&graph(vec![]), None), (0, vec![]));
        assert_eq!(optimal_partition(&graph(vec![vec![0]]), None), (0, vec![0]));
    }
}
