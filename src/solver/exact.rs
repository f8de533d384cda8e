//! Built-in exact 0/1 backend
//!
//! A small depth-first search over the declared booleans with
//! constraint-interval pruning and an optimistic objective bound. Intended
//! for the instance sizes the consistency harness and tests work with; the
//! models themselves are backend-agnostic and run against any
//! [`SolverAdapter`].

use std::sync::{Arc, Mutex};

use rayon::prelude::*;

use crate::config::SolverConfig;
use crate::error::{Error, Result};
use crate::solver::{LinExpr, Relation, SolveStatus, SolverAdapter, VarId};

struct StoredConstraint {
    terms: Vec<(VarId, f64)>,
    constant: f64,
    relation: Relation,
    rhs: f64,
}

struct Solution {
    values: Vec<u8>,
    objective: f64,
}

/// Exact minimizing solver over boolean variables.
///
/// Branches on variables in declaration order, value 0 before 1, and keeps
/// the first optimum found, so the returned assignment is deterministic:
/// the lexicographically smallest optimal assignment. The root of the search
/// is split into prefix subtrees solved in parallel on a rayon pool sized by
/// [`SolverConfig::threads`].
pub struct ExactSolver {
    config: SolverConfig,
    names: Vec<String>,
    constraints: Vec<StoredConstraint>,
    objective: Vec<f64>,
    objective_constant: f64,
    solution: Option<Solution>,
}

impl ExactSolver {
    /// Create a backend with the given configuration
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            names: Vec::new(),
            constraints: Vec::new(),
            objective: Vec::new(),
            objective_constant: 0.0,
            solution: None,
        }
    }

    /// Reachability check for one constraint: given that variables below
    /// `depth` are fixed, can the left-hand side still satisfy the relation?
    fn constraint_reachable(&self, constraint: &StoredConstraint, values: &[u8], depth: usize) -> bool {
        let tol = self.config.tolerance;
        let mut lo = constraint.constant;
        let mut hi = constraint.constant;
        for &(var, coefficient) in &constraint.terms {
            if var < depth {
                let fixed = coefficient * values[var] as f64;
                lo += fixed;
                hi += fixed;
            } else if coefficient > 0.0 {
                hi += coefficient;
            } else {
                lo += coefficient;
            }
        }
        match constraint.relation {
            Relation::Le => lo <= constraint.rhs + tol,
            Relation::Ge => hi >= constraint.rhs - tol,
            Relation::Eq => lo <= constraint.rhs + tol && hi >= constraint.rhs - tol,
        }
    }

    /// Optimistic completion of the partial objective: unfixed variables
    /// contribute their coefficient only when it is negative.
    fn objective_bound(&self, partial: f64, depth: usize) -> f64 {
        let mut bound = partial;
        for &coefficient in &self.objective[depth..] {
            if coefficient < 0.0 {
                bound += coefficient;
            }
        }
        bound
    }

    fn node_admissible(&self, values: &[u8], depth: usize, partial: f64, best_known: f64) -> bool {
        if self.objective_bound(partial, depth) > best_known + self.config.tolerance {
            return false;
        }
        self.constraints
            .iter()
            .all(|c| self.constraint_reachable(c, values, depth))
    }

    fn dfs(
        &self,
        values: &mut Vec<u8>,
        depth: usize,
        partial: f64,
        local_best: &mut Option<Solution>,
        shared_best: &Mutex<f64>,
    ) {
        let known = {
            let shared = *shared_best.lock().unwrap();
            match local_best {
                Some(s) => shared.min(s.objective),
                None => shared,
            }
        };
        if !self.node_admissible(values, depth, partial, known) {
            return;
        }
        if depth == values.len() {
            let improved = match local_best {
                Some(s) => partial < s.objective,
                None => true,
            };
            if improved {
                *local_best = Some(Solution {
                    values: values.clone(),
                    objective: partial,
                });
                let mut shared = shared_best.lock().unwrap();
                if partial < *shared {
                    *shared = partial;
                }
            }
            return;
        }
        for value in [0u8, 1u8] {
            values[depth] = value;
            self.dfs(
                values,
                depth + 1,
                partial + self.objective[depth] * value as f64,
                local_best,
                shared_best,
            );
        }
        values[depth] = 0;
    }

    fn solve_subtree(&self, prefix: usize, split_depth: usize, shared_best: &Mutex<f64>) -> Option<Solution> {
        let mut values = vec![0u8; self.names.len()];
        let mut partial = self.objective_constant;
        for t in 0..split_depth {
            let value = ((prefix >> (split_depth - 1 - t)) & 1) as u8;
            values[t] = value;
            partial += self.objective[t] * value as f64;
        }
        let mut local_best = None;
        self.dfs(&mut values, split_depth, partial, &mut local_best, shared_best);
        local_best
    }
}

impl SolverAdapter for ExactSolver {
    fn declare_bool(&mut self, name: &str) -> VarId {
        self.solution = None;
        self.names.push(name.to_string());
        self.objective.push(0.0);
        self.names.len() - 1
    }

    fn add_constraint(&mut self, expr: LinExpr, relation: Relation, rhs: f64) {
        self.solution = None;
        self.constraints.push(StoredConstraint {
            terms: expr.terms,
            constant: expr.constant,
            relation,
            rhs,
        });
    }

    fn accumulate_objective(&mut self, expr: LinExpr) {
        self.solution = None;
        for (var, coefficient) in expr.terms {
            self.objective[var] += coefficient;
        }
        self.objective_constant += expr.constant;
    }

    fn solve(&mut self) -> Result<SolveStatus> {
        let var_count = self.names.len();
        log::debug!(
            "solving 0/1 program: {} variables, {} constraints",
            var_count,
            self.constraints.len()
        );

        let threads = self.config.worker_threads();
        let shared_best = Arc::new(Mutex::new(f64::INFINITY));

        // Split the root into 2^d prefix subtrees so rayon has work to
        // balance; subtree index order equals lexicographic assignment order.
        let mut split_depth = 0;
        while threads > 1 && (1usize << split_depth) < threads * 4 && split_depth < var_count.min(12) {
            split_depth += 1;
        }

        let results: Vec<Option<Solution>> = if split_depth == 0 {
            vec![self.solve_subtree(0, 0, &shared_best)]
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| Error::InvalidParameter {
                    name: "threads",
                    message: e.to_string(),
                })?;
            pool.install(|| {
                (0..1usize << split_depth)
                    .into_par_iter()
                    .map(|prefix| self.solve_subtree(prefix, split_depth, &shared_best))
                    .collect()
            })
        };

        // Earliest subtree wins ties, keeping the result deterministic under
        // any thread count.
        let mut best: Option<Solution> = None;
        for candidate in results.into_iter().flatten() {
            let improved = match &best {
                Some(s) => candidate.objective < s.objective,
                None => true,
            };
            if improved {
                best = Some(candidate);
            }
        }

        match best {
            Some(solution) => {
                log::debug!("optimal objective {}", solution.objective);
                self.solution = Some(solution);
                Ok(SolveStatus::Optimal)
            }
            None => Ok(SolveStatus::Infeasible),
        }
    }

    fn value_of(&self, var: VarId) -> Result<u8> {
        let solution = self.solution.as_ref().ok_or(Error::NotComputed)?;
        Ok(solution.values[var])
    }

    fn objective_value(&self) -> Result<f64> {
        let solution = self.solution.as_ref().ok_or(Error::NotComputed)?;
        Ok(solution.objective)
    }
}
