//! Exact correlation clustering via alternative 0/1-LP encodings.
//!
//! Given a complete signed graph (every vertex pair labeled similar or
//! dissimilar), find a partition minimizing the number of disagreements:
//! similar pairs split across clusters plus dissimilar pairs kept together.
//!
//! The crate provides several structurally different integer-programming
//! encodings of this one problem under [`model`], a decoder from solved
//! variables to a canonical clustering vector under [`cluster`], and a
//! [`harness`] that cross-checks the encodings against each other and
//! against a brute-force optimum. Models are generic over the
//! [`solver::SolverAdapter`] seam; [`solver::ExactSolver`] is the built-in
//! backend for small instances and tests.

pub mod cluster;
pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod harness;
pub mod model;
pub mod solver;
pub mod storage;

pub use config::{BigMConfig, SolverConfig};
pub use error::{Error, Result};
pub use graph::SignedGraph;
pub use model::{DisagreementModel, ModelKind};
