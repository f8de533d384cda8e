//! Cross-formulation consistency checking
//!
//! Runs several already-built models on one instance, times each solve,
//! and fails loudly when the encodings disagree with each other or with a
//! known-optimal baseline. A new formulation is only trusted once it agrees
//! with the existing ones on a battery of instances.

pub mod baseline;

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::graph::SignedGraph;
use crate::model::DisagreementModel;

/// Per-model outcome on one instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelReport {
    /// Formulation name
    pub name: String,

    /// Decoded canonical partition
    pub clustering_vector: Vec<u32>,

    /// Achieved disagreement count
    pub objective: u64,

    /// Wall-clock solve time
    pub seconds: f64,
}

/// One instance's record in a batch result file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceReport {
    /// Number of vertices
    pub size: usize,

    /// Similar-pair density the instance was generated with
    pub density: f64,

    /// The label matrix itself, so results are self-contained
    pub graph: Vec<Vec<u8>>,

    /// Per-model outcomes, in run order
    pub models: Vec<ModelReport>,
}

/// Solve every model on the given instance and cross-check the results.
///
/// Models run sequentially; each owns its own adapter, so nothing is shared
/// between them. Fails with [`Error::ObjectiveMismatch`] if any two models
/// disagree on the objective, and with [`Error::BaselineMismatch`] if a
/// supplied known-optimal value disagrees with what the models found.
pub fn check_models(
    models: &mut [Box<dyn DisagreementModel>],
    graph: &SignedGraph,
    density: f64,
    known_optimal: Option<u64>,
) -> Result<InstanceReport> {
    let mut reports = Vec::with_capacity(models.len());
    let mut objectives: Vec<(String, u64)> = Vec::with_capacity(models.len());

    for model in models.iter_mut() {
        let name = model.name();
        let start = Instant::now();
        model.optimize()?;
        let seconds = start.elapsed().as_secs_f64();

        let objective = model.objective_value()?;
        let clustering_vector = model.clustering_vector()?;
        log::info!("model {name}: objective {objective} in {seconds:.4}s");

        objectives.push((name.clone(), objective));
        reports.push(ModelReport {
            name,
            clustering_vector,
            objective,
            seconds,
        });
    }

    if let Some((_, first)) = objectives.first() {
        let first = *first;
        if objectives.iter().any(|&(_, o)| o != first) {
            return Err(Error::ObjectiveMismatch { objectives });
        }
        if let Some(expected) = known_optimal {
            if expected != first {
                return Err(Error::BaselineMismatch {
                    expected,
                    actual: first,
                });
            }
        }
    }

    Ok(InstanceReport {
        size: graph.len(),
        density,
        graph: graph.labels().to_vec(),
        models: reports,
    })
}
