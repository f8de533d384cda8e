//! Direct cluster-assignment formulation
//!
//! Encodes membership explicitly instead of pairwise: for k = 2 a single
//! boolean per vertex, for k >= 3 a one-hot assignment over k cluster slots.
//! Vertex 0 is pinned to cluster/slot 0 and never gets a free variable,
//! breaking the label-permutation symmetry. Same/different-cluster predicates
//! are linearized through auxiliary pairs (u, v) acting as the positive and
//! negative parts of a signed difference clamped to {0, 1}.

use std::sync::Arc;

use crate::cluster::extract;
use crate::error::{Error, Result};
use crate::graph::SignedGraph;
use crate::model::{rounded_objective, run_solver, DisagreementModel};
use crate::solver::{LinExpr, Relation, SolverAdapter, VarId};

enum Vars {
    /// k = 2: x[i] means "vertex i in cluster 1"; u/v per pair with j >= 1
    TwoCluster {
        x: Vec<Option<VarId>>,
        u: Vec<Vec<Option<VarId>>>,
        v: Vec<Vec<Option<VarId>>>,
    },
    /// k >= 3: x[i][r] one-hot over slots; u/v per pair per slot
    MultiCluster {
        x: Vec<Vec<VarId>>,
        u: Vec<Vec<Option<Vec<VarId>>>>,
        v: Vec<Vec<Option<Vec<VarId>>>>,
    },
}

/// Minimum-disagreement model over explicit cluster-slot assignments.
pub struct AssignmentModel<S: SolverAdapter> {
    graph: Arc<SignedGraph>,
    /// Number of cluster slots actually encoded
    slots: usize,
    /// The bound the caller asked for, if any (slots = n when unbounded)
    bound: Option<usize>,
    solver: S,
    vars: Vars,
}

impl<S: SolverAdapter> AssignmentModel<S> {
    /// Build the formulation with at most `bound` clusters, or unbounded
    /// (`None`, encoded with one slot per vertex). Any bound below 2 is
    /// rejected.
    pub fn build(graph: Arc<SignedGraph>, bound: Option<usize>, mut solver: S) -> Result<Self> {
        if let Some(k) = bound {
            if k < 2 {
                return Err(Error::InvalidParameter {
                    name: "k",
                    message: format!("cluster bound must be at least 2, got {k}"),
                });
            }
        }
        let slots = bound.unwrap_or_else(|| graph.len()).max(2);

        let vars = if slots == 2 {
            build_two_cluster(&graph, &mut solver)
        } else {
            build_multi_cluster(&graph, slots, &mut solver)
        };

        Ok(Self {
            graph,
            slots,
            bound,
            solver,
            vars,
        })
    }
}

fn build_two_cluster<S: SolverAdapter>(graph: &SignedGraph, solver: &mut S) -> Vars {
    let n = graph.len();

    // Vertex 0 is pinned to cluster 0: no variable, slot holds None
    let mut x: Vec<Option<VarId>> = vec![None];
    for i in 1..n {
        x.push(Some(solver.declare_bool(&format!("x_{i}"))));
    }
    let mut u: Vec<Vec<Option<VarId>>> = Vec::with_capacity(n);
    let mut v: Vec<Vec<Option<VarId>>> = Vec::with_capacity(n);
    for i in 0..n {
        let mut row_u = Vec::with_capacity(i);
        let mut row_v = Vec::with_capacity(i);
        for j in 0..i {
            if j == 0 {
                // Pairs against vertex 0 read x[i] directly
                row_u.push(None);
                row_v.push(None);
            } else {
                row_u.push(Some(solver.declare_bool(&format!("u_{i}_{j}"))));
                row_v.push(Some(solver.declare_bool(&format!("v_{i}_{j}"))));
            }
        }
        u.push(row_u);
        v.push(row_v);
    }

    let mut split_cost = LinExpr::new();
    let mut merge_cost = LinExpr::new();
    for i in 0..n {
        for j in 0..i {
            if j == 0 {
                if graph.similar(i, j) {
                    split_cost.add_term(x[i].unwrap(), 1.0);
                } else {
                    merge_cost.add_constant(1.0);
                    merge_cost.add_term(x[i].unwrap(), -1.0);
                }
            } else {
                let cost = if graph.similar(i, j) {
                    &mut split_cost
                } else {
                    &mut merge_cost
                };
                cost.add_term(u[i][j].unwrap(), 1.0);
                cost.add_term(v[i][j].unwrap(), 1.0);
            }
        }
    }
    solver.accumulate_objective(split_cost);
    solver.accumulate_objective(merge_cost);

    // u - v tracks the signed difference of the pair's assignments, so
    // u + v in the objective is 1 exactly when the pair disagrees
    for i in 0..n {
        for j in 1..i {
            let mut expr = LinExpr::var(x[i].unwrap());
            let rhs = if graph.similar(i, j) {
                expr.add_term(x[j].unwrap(), -1.0);
                0.0
            } else {
                expr.add_term(x[j].unwrap(), 1.0);
                1.0
            };
            expr.add_term(u[i][j].unwrap(), 1.0);
            expr.add_term(v[i][j].unwrap(), -1.0);
            solver.add_constraint(expr, Relation::Eq, rhs);
        }
    }

    Vars::TwoCluster { x, u, v }
}

fn build_multi_cluster<S: SolverAdapter>(graph: &SignedGraph, slots: usize, solver: &mut S) -> Vars {
    let n = graph.len();

    // Vertex 0 is pinned to slot 0: its row stays empty
    let mut x: Vec<Vec<VarId>> = vec![Vec::new()];
    for i in 1..n {
        x.push(
            (0..slots)
                .map(|r| solver.declare_bool(&format!("x_{i}_{r}")))
                .collect(),
        );
    }
    let mut u: Vec<Vec<Option<Vec<VarId>>>> = Vec::with_capacity(n);
    let mut v: Vec<Vec<Option<Vec<VarId>>>> = Vec::with_capacity(n);
    for i in 0..n {
        let mut row_u = Vec::with_capacity(i);
        let mut row_v = Vec::with_capacity(i);
        for j in 0..i {
            if j == 0 {
                row_u.push(None);
                row_v.push(None);
            } else {
                let mut col_u = Vec::with_capacity(slots);
                let mut col_v = Vec::with_capacity(slots);
                for r in 0..slots {
                    col_u.push(solver.declare_bool(&format!("u_{i}_{j}_{r}")));
                    col_v.push(solver.declare_bool(&format!("v_{i}_{j}_{r}")));
                }
                row_u.push(Some(col_u));
                row_v.push(Some(col_v));
            }
        }
        u.push(row_u);
        v.push(row_v);
    }

    // Slot-wise differences double-count a split pair and each dissimilar
    // pair picks up a surplus over the unused slots; the half weights and
    // the -(k - 2)/2 constants correct for both.
    let mut split_cost = LinExpr::new();
    let mut merge_cost = LinExpr::new();
    for i in 0..n {
        for j in 0..i {
            if j == 0 {
                if graph.similar(i, j) {
                    split_cost.add_constant(1.0);
                    split_cost.add_term(x[i][0], -1.0);
                } else {
                    merge_cost.add_term(x[i][0], 1.0);
                }
            } else {
                let cost = if graph.similar(i, j) {
                    &mut split_cost
                } else {
                    merge_cost.add_constant(-0.5 * (slots as f64 - 2.0));
                    &mut merge_cost
                };
                let col_u = u[i][j].as_ref().unwrap();
                let col_v = v[i][j].as_ref().unwrap();
                for r in 0..slots {
                    cost.add_term(col_u[r], 0.5);
                    cost.add_term(col_v[r], 0.5);
                }
            }
        }
    }
    solver.accumulate_objective(split_cost);
    solver.accumulate_objective(merge_cost);

    for i in 1..n {
        // Exactly one slot per vertex
        solver.add_constraint(LinExpr::sum(x[i].iter().copied()), Relation::Eq, 1.0);

        for j in 1..i {
            let col_u = u[i][j].as_ref().unwrap();
            let col_v = v[i][j].as_ref().unwrap();
            for r in 0..slots {
                let mut expr = LinExpr::var(x[i][r]);
                let rhs = if graph.similar(i, j) {
                    expr.add_term(x[j][r], -1.0);
                    0.0
                } else {
                    expr.add_term(x[j][r], 1.0);
                    1.0
                };
                expr.add_term(col_u[r], 1.0);
                expr.add_term(col_v[r], -1.0);
                solver.add_constraint(expr, Relation::Eq, rhs);
            }
        }
    }

    Vars::MultiCluster { x, u, v }
}

impl<S: SolverAdapter> DisagreementModel for AssignmentModel<S> {
    fn name(&self) -> String {
        match self.bound {
            Some(k) => format!("assignment-module-k{k}"),
            None => "assignment-module".to_string(),
        }
    }

    fn optimize(&mut self) -> Result<()> {
        let name = self.name();
        run_solver(&mut self.solver, &name)
    }

    fn objective_value(&self) -> Result<u64> {
        rounded_objective(&self.solver)
    }

    fn clustering_vector(&self) -> Result<Vec<u32>> {
        let n = self.graph.len();
        match &self.vars {
            Vars::TwoCluster { x, .. } => {
                let mut labels = vec![0u32; n];
                for i in 1..n {
                    labels[i] = self.solver.value_of(x[i].unwrap())? as u32;
                }
                Ok(labels)
            }
            Vars::MultiCluster { x, .. } => {
                if n == 0 {
                    return Ok(Vec::new());
                }
                // Group by assigned slot: vertex 0's pinned slot first, the
                // rest in first-seen order scanning vertices ascending
                let mut groups: Vec<(usize, Vec<u32>)> = vec![(0, vec![0])];
                for i in 1..n {
                    for r in 0..self.slots {
                        if self.solver.value_of(x[i][r])? == 1 {
                            match groups.iter_mut().find(|(slot, _)| *slot == r) {
                                Some((_, members)) => members.push(i as u32),
                                None => groups.push((r, vec![i as u32])),
                            }
                        }
                    }
                }
                let members: Vec<Vec<u32>> = groups.into_iter().map(|(_, m)| m).collect();
                Ok(extract::labels_from_slots(n, &members))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use crate::solver::ExactSolver;

    fn solve(labels: Vec<Vec<u8>>, bound: Option<usize>) -> AssignmentModel<ExactSolver> {
        let graph = Arc::new(SignedGraph::new(labels).unwrap());
        let solver = ExactSolver::new(SolverConfig {
            threads: 1,
            ..SolverConfig::default()
        });
        let mut model = AssignmentModel::build(graph, bound, solver).unwrap();
        model.optimize().unwrap();
        model
    }

    #[test]
    fn rejects_bound_below_two() {
        let graph = Arc::new(SignedGraph::new(vec![vec![0, 1], vec![1, 0]]).unwrap());
        let solver = ExactSolver::new(SolverConfig::default());
        // The model itself is not Debug, so take the error side directly
        let err = AssignmentModel::build(graph, Some(1), solver).err().unwrap();
        assert!(matches!(err, Error::InvalidParameter { name: "k", .. }));
    }

    #[test]
    fn two_cluster_path_separates_similar_pair() {
        let model = solve(vec![vec![0, 1, 0], vec![1, 0, 0], vec![0, 0, 0]], Some(2));
        assert_eq!(model.objective_value().unwrap(), 0);
        assert_eq!(model.clustering_vector().unwrap(), vec![0, 0, 1]);
    }

    #[test]
    fn multi_cluster_path_separates_similar_pair() {
        // Unbounded on 3 vertices takes the k = 3 one-hot path
        let model = solve(vec![vec![0, 1, 0], vec![1, 0, 0], vec![0, 0, 0]], None);
        assert_eq!(model.objective_value().unwrap(), 0);
        assert_eq!(
            extract::canonicalize(&model.clustering_vector().unwrap()),
            vec![0, 0, 1]
        );
    }

    #[test]
    fn multi_cluster_all_dissimilar_yields_singletons() {
        let model = solve(vec![vec![0; 3]; 3], None);
        assert_eq!(model.objective_value().unwrap(), 0);
        assert_eq!(
            extract::canonicalize(&model.clustering_vector().unwrap()),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn multi_cluster_all_similar_stays_together() {
        let model = solve(vec![vec![0, 1, 1], vec![1, 0, 1], vec![1, 1, 0]], None);
        assert_eq!(model.objective_value().unwrap(), 0);
        assert_eq!(model.clustering_vector().unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn two_cluster_bound_pays_for_third_singleton() {
        let model = solve(vec![vec![0; 3]; 3], Some(2));
        assert_eq!(model.objective_value().unwrap(), 1);
        let labels = model.clustering_vector().unwrap();
        let distinct = labels.iter().collect::<std::collections::HashSet<_>>();
        assert!(distinct.len() <= 2);
    }

    #[test]
    fn three_cluster_bound_on_four_dissimilar_vertices() {
        let model = solve(vec![vec![0; 4]; 4], Some(3));
        assert_eq!(model.objective_value().unwrap(), 1);
        let labels = model.clustering_vector().unwrap();
        let distinct = labels.iter().collect::<std::collections::HashSet<_>>();
        assert!(distinct.len() <= 3);
    }

    #[test]
    fn single_vertex_graph_decodes_to_single_label() {
        let model = solve(vec![vec![0]], None);
        assert_eq!(model.objective_value().unwrap(), 0);
        assert_eq!(model.clustering_vector().unwrap(), vec![0]);
    }
}
