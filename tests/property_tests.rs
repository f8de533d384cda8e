use std::sync::Arc;

use proptest::prelude::*;

use min_disagree::cluster::extract;
use min_disagree::config::SolverConfig;
use min_disagree::harness::baseline;
use min_disagree::model::{DisagreementModel, ModelKind, TriangleModel};
use min_disagree::solver::ExactSolver;
use min_disagree::SignedGraph;

fn solver() -> ExactSolver {
    ExactSolver::new(SolverConfig {
        threads: 1,
        ..SolverConfig::default()
    })
}

fn graph_from_bits(n: usize, bits: u32) -> Arc<SignedGraph> {
    let mut matrix = vec![vec![0u8; n]; n];
    let mut bit = 0;
    for i in 0..n {
        for j in 0..i {
            if bits >> bit & 1 == 1 {
                matrix[i][j] = 1;
                matrix[j][i] = 1;
            }
            bit += 1;
        }
    }
    Arc::new(SignedGraph::new(matrix).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_triangle_model_matches_brute_force(n in 2usize..=5, bits: u32) {
        let graph = graph_from_bits(n, bits);
        let mut model = TriangleModel::build(graph.clone(), ModelKind::Unbounded, solver()).unwrap();
        model.optimize().unwrap();

        let expected = baseline::optimal_disagreements(&graph, None);
        prop_assert_eq!(model.objective_value().unwrap(), expected);

        // The decoded partition realizes the objective the solver reported
        let labels = model.clustering_vector().unwrap();
        prop_assert_eq!(baseline::disagreements(&graph, &labels), expected);
    }

    #[test]
    fn prop_clustering_vector_is_canonical(n in 2usize..=5, bits: u32) {
        let graph = graph_from_bits(n, bits);
        let mut model = TriangleModel::build(graph, ModelKind::Unbounded, solver()).unwrap();
        model.optimize().unwrap();

        let labels = model.clustering_vector().unwrap();
        prop_assert_eq!(labels.len(), n);
        prop_assert_eq!(extract::canonicalize(&labels), labels.clone());
        // Labels form {0, .., m-1}
        let clusters = labels.iter().copied().max().unwrap() + 1;
        for c in 0..clusters {
            prop_assert!(labels.contains(&c));
        }
    }

    #[test]
    fn prop_two_cluster_bound_holds(n in 2usize..=5, bits: u32) {
        let graph = graph_from_bits(n, bits);
        let mut model = TriangleModel::build(graph.clone(), ModelKind::BoundedK2, solver()).unwrap();
        model.optimize().unwrap();

        prop_assert_eq!(
            model.objective_value().unwrap(),
            baseline::optimal_disagreements(&graph, Some(2))
        );
        let labels = model.clustering_vector().unwrap();
        prop_assert!(labels.iter().copied().max().unwrap() <= 1);
    }
}
