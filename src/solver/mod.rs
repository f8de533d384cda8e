//! Generic interface to a 0/1 linear-programming backend
//!
//! Every encoding in [`crate::model`] is built against this seam: declare
//! boolean variables, submit linear constraints, accumulate objective terms,
//! solve once, read values back. The actual search engine is a backend
//! concern; [`ExactSolver`] is the built-in one.

pub mod exact;

pub use exact::ExactSolver;

use crate::error::Result;

/// Handle for a boolean decision variable, valid only with the adapter that
/// declared it.
pub type VarId = usize;

/// Relation of a linear constraint to its right-hand side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Left-hand side must be less than or equal to the right-hand side
    Le,
    /// Left-hand side must equal the right-hand side
    Eq,
    /// Left-hand side must be greater than or equal to the right-hand side
    Ge,
}

/// Outcome of an optimization run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// A provably optimal solution was found
    Optimal,
    /// A feasible but not necessarily optimal solution was found
    Feasible,
    /// No assignment satisfies the constraints
    Infeasible,
    /// The backend could not determine feasibility
    Unknown,
}

/// A linear combination of variables plus a constant, built incrementally
/// while constructing a model and moved into the adapter on submission.
#[derive(Debug, Clone, Default)]
pub struct LinExpr {
    /// (variable, coefficient) terms; variables may repeat
    pub terms: Vec<(VarId, f64)>,
    /// Constant offset
    pub constant: f64,
}

impl LinExpr {
    /// Empty expression
    pub fn new() -> Self {
        Self::default()
    }

    /// Expression consisting of a single variable with coefficient 1
    pub fn var(var: VarId) -> Self {
        let mut expr = Self::new();
        expr.add_term(var, 1.0);
        expr
    }

    /// Sum of the given variables, each with coefficient 1
    pub fn sum(vars: impl IntoIterator<Item = VarId>) -> Self {
        let mut expr = Self::new();
        for var in vars {
            expr.add_term(var, 1.0);
        }
        expr
    }

    /// Append a `coefficient * variable` term
    pub fn add_term(&mut self, var: VarId, coefficient: f64) {
        self.terms.push((var, coefficient));
    }

    /// Add to the constant offset
    pub fn add_constant(&mut self, value: f64) {
        self.constant += value;
    }
}

/// Abstract capability of an external 0/1-LP solving engine.
///
/// The contract is deliberately narrow: models never see search internals,
/// only declaration, submission, and read-back. `value_of` and
/// `objective_value` are valid only after `solve` has returned a feasible or
/// optimal status; before that they fail with [`crate::Error::NotComputed`].
pub trait SolverAdapter {
    /// Declare a new boolean decision variable
    fn declare_bool(&mut self, name: &str) -> VarId;

    /// Submit a linear constraint `expr <relation> rhs`
    fn add_constraint(&mut self, expr: LinExpr, relation: Relation, rhs: f64);

    /// Add terms to the minimization objective
    fn accumulate_objective(&mut self, expr: LinExpr);

    /// Run the optimization, blocking until the backend returns
    fn solve(&mut self) -> Result<SolveStatus>;

    /// Read back a solved variable, rounded to {0, 1}
    fn value_of(&self, var: VarId) -> Result<u8>;

    /// Read back the achieved objective value
    fn objective_value(&self) -> Result<f64>;
}
