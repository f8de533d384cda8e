//! Ordered-pair triangle formulation
//!
//! Restates the pairwise triangle encoding with one boolean per *ordered*
//! pair. No constraint ties x[i][j] to x[j][i]; the redundancy is the point.
//! This model exists purely as an independent structural re-derivation used
//! to cross-check the unordered encoding, so its loops deliberately run over
//! all ordered tuples with distinctness guards instead of implicit ordering.

use std::sync::Arc;

use crate::cluster::extract;
use crate::error::Result;
use crate::graph::SignedGraph;
use crate::model::{rounded_objective, run_solver, DisagreementModel, ModelKind};
use crate::solver::{LinExpr, Relation, SolverAdapter, VarId};

/// Minimum-disagreement model over ordered pairwise "different" indicators.
pub struct OrderedTriangleModel<S: SolverAdapter> {
    graph: Arc<SignedGraph>,
    kind: ModelKind,
    solver: S,
    /// x[i][j] for i != j; the diagonal holds no variable
    x: Vec<Vec<Option<VarId>>>,
}

impl<S: SolverAdapter> OrderedTriangleModel<S> {
    /// Build the full formulation against a fresh adapter.
    pub fn build(graph: Arc<SignedGraph>, kind: ModelKind, mut solver: S) -> Result<Self> {
        let n = graph.len();

        let x: Vec<Vec<Option<VarId>>> = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| {
                        if i == j {
                            None
                        } else {
                            Some(solver.declare_bool(&format!("x_{i}_{j}")))
                        }
                    })
                    .collect()
            })
            .collect();

        // Every unordered pair appears twice, so each coefficient is halved.
        let mut split_cost = LinExpr::new();
        let mut merge_cost = LinExpr::new();
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let var = x[i][j].unwrap();
                if graph.similar(i, j) {
                    split_cost.add_term(var, 0.5);
                } else {
                    merge_cost.add_constant(0.5);
                    merge_cost.add_term(var, -0.5);
                }
            }
        }
        solver.accumulate_objective(split_cost);
        solver.accumulate_objective(merge_cost);

        // Triangle inequality over every ordered distinct triple
        for i in 0..n {
            for j in 0..n {
                for k in 0..n {
                    if i == j || i == k || j == k {
                        continue;
                    }
                    let mut expr = LinExpr::var(x[i][k].unwrap());
                    expr.add_term(x[i][j].unwrap(), -1.0);
                    expr.add_term(x[j][k].unwrap(), -1.0);
                    solver.add_constraint(expr, Relation::Le, 0.0);
                }
            }
        }

        match kind {
            ModelKind::Unbounded => {}
            ModelKind::BoundedK2 => {
                for i in 0..n {
                    for j in 0..n {
                        for k in 0..n {
                            if i == j || i == k || j == k {
                                continue;
                            }
                            let expr = LinExpr::sum([
                                x[i][j].unwrap(),
                                x[i][k].unwrap(),
                                x[j][k].unwrap(),
                            ]);
                            solver.add_constraint(expr, Relation::Le, 2.0);
                        }
                    }
                }
            }
            ModelKind::BoundedK3 => {
                for i in 0..n {
                    for j in 0..n {
                        for k in 0..n {
                            for r in 0..n {
                                if i == j || i == k || j == k || i == r || j == r || k == r {
                                    continue;
                                }
                                let expr = LinExpr::sum([
                                    x[i][j].unwrap(),
                                    x[i][k].unwrap(),
                                    x[i][r].unwrap(),
                                    x[j][k].unwrap(),
                                    x[j][r].unwrap(),
                                    x[k][r].unwrap(),
                                ]);
                                solver.add_constraint(expr, Relation::Le, 5.0);
                            }
                        }
                    }
                }
            }
        }

        Ok(Self {
            graph,
            kind,
            solver,
            x,
        })
    }
}

impl<S: SolverAdapter> DisagreementModel for OrderedTriangleModel<S> {
    fn name(&self) -> String {
        format!("ordered-triangle{}", self.kind.suffix())
    }

    fn optimize(&mut self) -> Result<()> {
        let name = self.name();
        run_solver(&mut self.solver, &name)
    }

    fn objective_value(&self) -> Result<u64> {
        rounded_objective(&self.solver)
    }

    fn clustering_vector(&self) -> Result<Vec<u32>> {
        // The lower triangle alone decides the partition; the mirror
        // variables were only ever there for the objective to average over.
        extract::labels_from_pairwise(self.graph.len(), |i, j| {
            Ok(self.solver.value_of(self.x[i][j].unwrap())? == 0)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use crate::solver::ExactSolver;

    fn solve(labels: Vec<Vec<u8>>, kind: ModelKind) -> OrderedTriangleModel<ExactSolver> {
        let graph = Arc::new(SignedGraph::new(labels).unwrap());
        let solver = ExactSolver::new(SolverConfig {
            threads: 1,
            ..SolverConfig::default()
        });
        let mut model = OrderedTriangleModel::build(graph, kind, solver).unwrap();
        model.optimize().unwrap();
        model
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
    fn intransitive_triangle_costs_one() {
        let model = solve(
            vec![vec![0, 1, 0], vec![1, 0, 1], vec![0, 1, 0]],
            ModelKind::Unbounded,
        );
        assert_eq!(model.objective_value().unwrap(), 1);
    }

    #[test]
    fn two_cluster_bound_merges_one_pair() {
        let model = solve(vec![vec![0; 3]; 3], ModelKind::BoundedK2);
        assert_eq!(model.objective_value().unwrap(), 1);
    }
}
