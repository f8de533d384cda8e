//! Pairwise triangle formulation
//!
//! One boolean per unordered vertex pair meaning "different clusters", with
//! triangle inequalities forcing the complement relation to be transitive,
//! hence an equivalence relation, hence a valid partition. This is the
//! reference encoding the other formulations are cross-checked against.

use std::sync::Arc;

use itertools::Itertools;

use crate::cluster::extract;
use crate::error::Result;
use crate::graph::SignedGraph;
use crate::model::{rounded_objective, run_solver, DisagreementModel, ModelKind};
use crate::solver::{LinExpr, Relation, SolverAdapter, VarId};

/// Minimum-disagreement model over unordered pairwise "different" indicators.
pub struct TriangleModel<S: SolverAdapter> {
    graph: Arc<SignedGraph>,
    kind: ModelKind,
    solver: S,
    /// x[i][j] for j < i: 1 iff vertices i and j end up in different clusters
    x: Vec<Vec<VarId>>,
}

impl<S: SolverAdapter> TriangleModel<S> {
    /// Build the full formulation against a fresh adapter: variables, then
    /// objective, then constraints. The returned model is ready to solve.
    pub fn build(graph: Arc<SignedGraph>, kind: ModelKind, mut solver: S) -> Result<Self> {
        let n = graph.len();

        let x: Vec<Vec<VarId>> = (0..n)
            .map(|i| {
                (0..i)
                    .map(|j| solver.declare_bool(&format!("x_{i}_{j}")))
                    .collect()
            })
            .collect();

        // Splitting a similar pair costs x, merging a dissimilar pair 1 - x.
        let mut split_cost = LinExpr::new();
        let mut merge_cost = LinExpr::new();
        for i in 0..n {
            for j in 0..i {
                if graph.similar(i, j) {
                    split_cost.add_term(x[i][j], 1.0);
                } else {
                    merge_cost.add_constant(1.0);
                    merge_cost.add_term(x[i][j], -1.0);
                }
            }
        }
        solver.accumulate_objective(split_cost);
        solver.accumulate_objective(merge_cost);

        add_triangle_constraints(&mut solver, &x, n);
        match kind {
            ModelKind::Unbounded => {}
            ModelKind::BoundedK2 => add_two_cluster_constraints(&mut solver, &x, n),
            ModelKind::BoundedK3 => add_three_cluster_constraints(&mut solver, &x, n),
        }

        Ok(Self {
            graph,
            kind,
            solver,
            x,
        })
    }
}

/// For every triple, each pairwise indicator is at most the sum of the other
/// two: a triple can never have exactly one "different" pair.
fn add_triangle_constraints<S: SolverAdapter>(solver: &mut S, x: &[Vec<VarId>], n: usize) {
    for (i, j, k) in (0..n).tuple_combinations() {
        let pairs = [x[j][i], x[k][i], x[k][j]];
        for t in 0..3 {
            let mut expr = LinExpr::var(pairs[t]);
            expr.add_term(pairs[(t + 1) % 3], -1.0);
            expr.add_term(pairs[(t + 2) % 3], -1.0);
            solver.add_constraint(expr, Relation::Le, 0.0);
        }
    }
}

/// With only two clusters available, no triple can be mutually separated.
fn add_two_cluster_constraints<S: SolverAdapter>(solver: &mut S, x: &[Vec<VarId>], n: usize) {
    for (i, j, k) in (0..n).tuple_combinations() {
        let expr = LinExpr::sum([x[j][i], x[k][i], x[k][j]]);
        solver.add_constraint(expr, Relation::Le, 2.0);
    }
}

/// With three clusters, no quadruple can have all six pairs "different".
fn add_three_cluster_constraints<S: SolverAdapter>(solver: &mut S, x: &[Vec<VarId>], n: usize) {
    for (i, j, k, r) in (0..n).tuple_combinations() {
        let expr = LinExpr::sum([x[j][i], x[k][i], x[r][i], x[k][j], x[r][j], x[r][k]]);
        solver.add_constraint(expr, Relation::Le, 5.0);
    }
}

impl<S: SolverAdapter> DisagreementModel for TriangleModel<S> {
    fn name(&self) -> String {
        format!("pairwise-triangle{}", self.kind.suffix())
    }

    fn optimize(&mut self) -> Result<()> {
        let name = self.name();
        run_solver(&mut self.solver, &name)
    }

    fn objective_value(&self) -> Result<u64> {
        rounded_objective(&self.solver)
    }

    fn clustering_vector(&self) -> Result<Vec<u32>> {
        extract::labels_from_pairwise(self.graph.len(), |i, j| {
            Ok(self.solver.value_of(self.x[i][j])? == 0)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use crate::solver::ExactSolver;

    fn solve(labels: Vec<Vec<u8>>, kind: ModelKind) -> TriangleModel<ExactSolver> {
        let graph = Arc::new(SignedGraph::new(labels).unwrap());
        let solver = ExactSolver::new(SolverConfig {
            threads: 1,
            ..SolverConfig::default()
        });
        let mut model = TriangleModel::build(graph, kind, solver).unwrap();
        model.optimize().unwrap();
        model
    }

    #[test]
    fn objective_fails_before_optimize() {
        let graph = Arc::new(SignedGraph::new(vec![vec![0, 1], vec![1, 0]]).unwrap());
        let solver = ExactSolver::new(SolverConfig::default());
        let model = TriangleModel::build(graph, ModelKind::Unbounded, solver).unwrap();
        assert!(model.objective_value().is_err());
    }

    #[test]
    fn separates_similar_pair_from_outsider() {
        let model = solve(
            vec![vec![0, 1, 0], vec![1, 0, 0], vec![0, 0, 0]],
            ModelKind::Unbounded,
        );
        assert_eq!(model.objective_value().unwrap(), 0);
        assert_eq!(model.clustering_vector().unwrap(), vec![0, 0, 1]);
    }

    #[test]
    fn all_dissimilar_triangle_yields_singletons() {
        let model = solve(vec![vec![0; 3]; 3], ModelKind::Unbounded);
        assert_eq!(model.objective_value().unwrap(), 0);
        assert_eq!(model.clustering_vector().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn all_similar_triangle_stays_together() {
        let model = solve(
            vec![vec![0, 1, 1], vec![1, 0, 1], vec![1, 1, 0]],
            ModelKind::Unbounded,
        );
        assert_eq!(model.objective_value().unwrap(), 0);
        assert_eq!(model.clustering_vector().unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn intransitive_triangle_costs_one() {
        // 0-1 and 1-2 similar, 0-2 dissimilar: any partition disagrees once
        let model = solve(
            vec![vec![0, 1, 0], vec![1, 0, 1], vec![0, 1, 0]],
            ModelKind::Unbounded,
        );
        assert_eq!(model.objective_value().unwrap(), 1);
    }

    #[test]
    fn two_cluster_bound_merges_singletons() {
        // All dissimilar on 3 vertices: unbounded optimum is 0, but with at
        // most 2 clusters one dissimilar pair must be merged
        let model = solve(vec![vec![0; 3]; 3], ModelKind::BoundedK2);
        assert_eq!(model.objective_value().unwrap(), 1);
        let labels = model.clustering_vector().unwrap();
        let distinct = labels.iter().collect::<std::collections::HashSet<_>>();
        assert!(distinct.len() <= 2);
    }

    #[test]
    fn three_cluster_bound_on_four_singletons() {
        let model = solve(vec![vec![0; 4]; 4], ModelKind::BoundedK3);
        assert_eq!(model.objective_value().unwrap(), 1);
        let labels = model.clustering_vector().unwrap();
        let distinct = labels.iter().collect::<std::collections::HashSet<_>>();
        assert!(distinct.len() <= 3);
    }
}
