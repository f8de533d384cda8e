//! Integer-programming encodings of minimum-disagreement clustering
//!
//! Each submodule is a structurally different 0/1-LP formulation of the same
//! problem. All of them implement [`DisagreementModel`], are built through a
//! single ordered pipeline (declare variables, state objective, state
//! constraints) against a fresh [`SolverAdapter`](crate::solver::SolverAdapter),
//! and decode their solved variables into the same canonical clustering
//! vector form, which is what lets the harness cross-check them.

pub mod assignment;
pub mod bigm;
pub mod ordered;
pub mod triangle;

pub use assignment::AssignmentModel;
pub use bigm::BigMModel;
pub use ordered::OrderedTriangleModel;
pub use triangle::TriangleModel;

use crate::error::{Error, Result};
use crate::solver::SolverAdapter;

/// Which cluster-count bound a formulation enforces.
///
/// Only k = 2 and k = 3 have known closed-form inequalities over the
/// pairwise variables; larger bounds are rejected rather than approximated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    /// No bound on the number of clusters
    Unbounded,
    /// At most two clusters
    BoundedK2,
    /// At most three clusters
    BoundedK3,
}

impl ModelKind {
    /// Kind enforcing at most k clusters, failing fast for unsupported k
    pub fn bounded(k: usize) -> Result<Self> {
        match k {
            2 => Ok(Self::BoundedK2),
            3 => Ok(Self::BoundedK3),
            _ => Err(Error::UnsupportedK { k }),
        }
    }

    /// The enforced bound, if any
    pub fn max_clusters(&self) -> Option<usize> {
        match self {
            Self::Unbounded => None,
            Self::BoundedK2 => Some(2),
            Self::BoundedK3 => Some(3),
        }
    }

    /// Short suffix used in model names and report keys
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Unbounded => "",
            Self::BoundedK2 => "-k2",
            Self::BoundedK3 => "-k3",
        }
    }
}

/// Common interface of every encoding: solve once, then read the achieved
/// disagreement count and the decoded partition.
pub trait DisagreementModel {
    /// Name identifying the formulation (and bound) in reports
    fn name(&self) -> String;

    /// Run the backend; blocks until it returns
    fn optimize(&mut self) -> Result<()>;

    /// The achieved disagreement count; fails before `optimize` completes
    fn objective_value(&self) -> Result<u64>;

    /// Decode the solved variables into a canonical clustering vector
    fn clustering_vector(&self) -> Result<Vec<u32>>;
}

/// Read the solver objective and round it to the integer disagreement count.
///
/// Formulations with fractional coefficients (the assignment encoding uses
/// halves) still have integral optima; rounding absorbs backend tolerance.
pub(crate) fn rounded_objective<S: SolverAdapter>(solver: &S) -> Result<u64> {
    let value = solver.objective_value()?;
    Ok(value.round().max(0.0) as u64)
}

/// Shared optimize step: run the adapter and treat anything but a usable
/// solution as fatal (no encoding here is ever infeasible for valid input).
pub(crate) fn run_solver<S: SolverAdapter>(solver: &mut S, name: &str) -> Result<()> {
    use crate::solver::SolveStatus;

    log::debug!("optimizing model {name}");
    match solver.solve()? {
        SolveStatus::Optimal | SolveStatus::Feasible => Ok(()),
        SolveStatus::Infeasible | SolveStatus::Unknown => Err(Error::Infeasible {
            model: name.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_kind_accepts_only_two_and_three() {
        assert_eq!(ModelKind::bounded(2).unwrap(), ModelKind::BoundedK2);
        assert_eq!(ModelKind::bounded(3).unwrap(), ModelKind::BoundedK3);
        assert!(matches!(
            ModelKind::bounded(4),
            Err(Error::UnsupportedK { k: 4 })
        ));
        assert!(matches!(
            ModelKind::bounded(1),
            Err(Error::UnsupportedK { k: 1 })
        ));
    }

    #[test]
    fn max_clusters_matches_kind() {
        assert_eq!(ModelKind::Unbounded.max_clusters(), None);
        assert_eq!(ModelKind::BoundedK2.max_clusters(), Some(2));
        assert_eq!(ModelKind::BoundedK3.max_clusters(), Some(3));
    }
}
