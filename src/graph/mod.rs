//! Signed graph input representation

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A complete signed graph on n vertices.
///
/// Stored as a symmetric n x n matrix of {0, 1} labels where `1` means the
/// pair should be together (similar) and `0` means it should be apart
/// (dissimilar). The diagonal is unused. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedGraph {
    labels: Vec<Vec<u8>>,
}

impl SignedGraph {
    /// Build a graph from a label matrix, validating shape and symmetry.
    pub fn new(labels: Vec<Vec<u8>>) -> Result<Self> {
        let n = labels.len();
        for (i, row) in labels.iter().enumerate() {
            if row.len() != n {
                return Err(Error::InvalidGraph(format!(
                    "row {} has length {}, expected {}",
                    i,
                    row.len(),
                    n
                )));
            }
            for (j, &label) in row.iter().enumerate() {
                if label > 1 {
                    return Err(Error::InvalidGraph(format!(
                        "entry ({i}, {j}) is {label}, expected 0 or 1"
                    )));
                }
                if i != j && label != labels[j][i] {
                    return Err(Error::InvalidGraph(format!(
                        "asymmetric labels at ({i}, {j})"
                    )));
                }
            }
        }
        Ok(Self { labels })
    }

    /// Number of vertices
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the graph has no vertices
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Whether vertices i and j are labeled similar
    pub fn similar(&self, i: usize, j: usize) -> bool {
        self.labels[i][j] == 1
    }

    /// The raw label matrix
    pub fn labels(&self) -> &[Vec<u8>] {
        &self.labels
    }

    /// Fraction of unordered pairs labeled similar
    pub fn density(&self) -> f64 {
        let n = self.len();
        if n < 2 {
            return 0.0;
        }
        let mut similar = 0usize;
        for i in 1..n {
            for j in 0..i {
                if self.similar(i, j) {
                    similar += 1;
                }
            }
        }
        similar as f64 / (n * (n - 1) / 2) as f64
    }
}
