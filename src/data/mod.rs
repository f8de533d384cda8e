//! Instance file loading
//!
//! Batch inputs are JSON arrays of instance records: the label matrix plus
//! the size/density it was generated with, and optionally a known-optimal
//! objective value computed externally (e.g. by a branch-and-bound run) that
//! the harness validates every encoding against.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::graph::SignedGraph;

/// One problem instance in a batch file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceRecord {
    /// Number of vertices
    pub size: usize,

    /// Similar-pair density the generator targeted
    pub density: f64,

    /// Symmetric {0,1} label matrix
    pub graph: Vec<Vec<u8>>,

    /// Externally computed optimal objective, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimal: Option<u64>,
}

impl InstanceRecord {
    /// Validate the stored matrix into a [`SignedGraph`]
    pub fn signed_graph(&self) -> crate::Result<SignedGraph> {
        SignedGraph::new(self.graph.clone())
    }
}

/// Load a batch of instances from a JSON file
pub fn load_instances(path: &Path) -> Result<Vec<InstanceRecord>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading instance file {}", path.display()))?;
    let instances: Vec<InstanceRecord> = serde_json::from_str(&contents)
        .with_context(|| format!("parsing instance file {}", path.display()))?;
    log::info!("loaded {} instances from {}", instances.len(), path.display());
    Ok(instances)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_record_with_optional_baseline() {
        let json = r#"{
            "size": 2,
            "density": 1.0,
            "graph": [[0, 1], [1, 0]],
            "optimal": 0
        }"#;
        let record: InstanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.size, 2);
        assert_eq!(record.optimal, Some(0));
        assert_eq!(record.signed_graph().unwrap().len(), 2);
    }

    #[test]
    fn baseline_field_defaults_to_none() {
        let json = r#"{"size": 1, "density": 0.0, "graph": [[0]]}"#;
        let record: InstanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.optimal, None);
    }

    #[test]
    fn invalid_matrix_is_rejected_at_graph_construction() {
        let json = r#"{"size": 2, "density": 0.0, "graph": [[0, 1], [0, 0]]}"#;
        let record: InstanceRecord = serde_json::from_str(json).unwrap();
        assert!(record.signed_graph().is_err());
    }
}
