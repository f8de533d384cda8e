//! Big-M indicator formulation
//!
//! Replaces the direct triangle inequalities with an auxiliary indicator per
//! triple: the pairwise sum over a triple must avoid the intransitive value 1,
//! and a pair of big-M/epsilon rows forces the indicator to pick which side
//! of that threshold the sum falls on. Less direct than the plain triangle
//! rows, kept as a structurally distinct encoding for solver comparison.

use std::sync::Arc;

use itertools::Itertools;

use crate::cluster::extract;
use crate::config::BigMConfig;
use crate::error::Result;
use crate::graph::SignedGraph;
use crate::model::{rounded_objective, run_solver, DisagreementModel, ModelKind};
use crate::solver::{LinExpr, Relation, SolverAdapter, VarId};

/// Minimum-disagreement model linearizing transitivity with big-M rows.
pub struct BigMModel<S: SolverAdapter> {
    graph: Arc<SignedGraph>,
    kind: ModelKind,
    solver: S,
    /// x[i][j] for j < i: 1 iff vertices i and j land in different clusters
    x: Vec<Vec<VarId>>,
}

impl<S: SolverAdapter> BigMModel<S> {
    /// Build the full formulation. The big-M constants are validated before
    /// any row is generated; an invalid configuration never reaches the
    /// adapter.
    pub fn build(
        graph: Arc<SignedGraph>,
        kind: ModelKind,
        constants: BigMConfig,
        mut solver: S,
    ) -> Result<Self> {
        constants.validate()?;
        let n = graph.len();

        let x: Vec<Vec<VarId>> = (0..n)
            .map(|i| {
                (0..i)
                    .map(|j| solver.declare_bool(&format!("x_{i}_{j}")))
                    .collect()
            })
            .collect();

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

        let m = constants.big_m;
        let eps = constants.epsilon;
        for (i, j, k) in (0..n).tuple_combinations() {
            let pairs = [x[j][i], x[k][i], x[k][j]];
            let y = solver.declare_bool(&format!("y_{k}_{j}_{i}"));

            // s >= 1 + eps - (1 - y) * M, i.e. s - M*y >= 1 + eps - M
            let mut lower = LinExpr::sum(pairs);
            lower.add_term(y, -m);
            solver.add_constraint(lower, Relation::Ge, 1.0 + eps - m);

            // s <= 1 - eps + y * M, i.e. s - M*y <= 1 - eps
            let mut upper = LinExpr::sum(pairs);
            upper.add_term(y, -m);
            solver.add_constraint(upper, Relation::Le, 1.0 - eps);
        }

        match kind {
            ModelKind::Unbounded => {}
            ModelKind::BoundedK2 => {
                for (i, j, k) in (0..n).tuple_combinations() {
                    let expr = LinExpr::sum([x[j][i], x[k][i], x[k][j]]);
                    solver.add_constraint(expr, Relation::Le, 2.0);
                }
            }
            ModelKind::BoundedK3 => {
                for (i, j, k, r) in (0..n).tuple_combinations() {
                    let expr =
                        LinExpr::sum([x[j][i], x[k][i], x[r][i], x[k][j], x[r][j], x[r][k]]);
                    solver.add_constraint(expr, Relation::Le, 5.0);
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

impl<S: SolverAdapter> DisagreementModel for BigMModel<S> {
    fn name(&self) -> String {
        format!("big-m-indicator{}", self.kind.suffix())
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
