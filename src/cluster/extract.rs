//! Decoding solved model variables into a canonical clustering vector
//!
//! All decoders produce labels that are contiguous from 0 and assigned in
//! first-seen order over a deterministic scan, so re-running a decoder on the
//! same solved assignment always yields the identical vector.

use crate::cluster::DisjointSets;
use crate::error::Result;

/// Decode a pairwise same-cluster relation into a clustering vector.
///
/// `same(i, j)` reports whether the solved variables place vertices i and j
/// (with j < i) in the same cluster. Vertices are merged with union-find, so
/// a relation left slightly intransitive by solver tolerance still collapses
/// into consistent classes, then relabeled by ascending vertex scan.
pub fn labels_from_pairwise<F>(size: usize, mut same: F) -> Result<Vec<u32>>
where
    F: FnMut(usize, usize) -> Result<bool>,
{
    let mut sets = DisjointSets::new(size);
    for i in 1..size {
        for j in 0..i {
            if same(i, j)? {
                sets.union(i as u32, j as u32);
            }
        }
    }

    let mut labels = vec![u32::MAX; size];
    let mut root_labels = vec![u32::MAX; size];
    let mut next = 0u32;
    for vertex in 0..size {
        let root = sets.find(vertex as u32) as usize;
        if root_labels[root] == u32::MAX {
            root_labels[root] = next;
            next += 1;
        }
        labels[vertex] = root_labels[root];
    }
    Ok(labels)
}

/// Decode a one-hot slot assignment into a clustering vector.
///
/// `members[s]` holds the vertices assigned to slot s, in the order the
/// scan encountered them; slots are relabeled contiguously in that order.
/// Slot numbering differing from a pairwise decode of the same partition is
/// expected; clusters are unordered.
pub fn labels_from_slots(size: usize, members: &[Vec<u32>]) -> Vec<u32> {
    let mut labels = vec![u32::MAX; size];
    let mut next = 0u32;
    for slot in members {
        if slot.is_empty() {
            continue;
        }
        for &vertex in slot {
            labels[vertex as usize] = next;
        }
        next += 1;
    }
    labels
}

/// Relabel a clustering vector into canonical form: labels contiguous from 0
/// in first-seen order over an ascending vertex scan.
///
/// Two vectors describe the same set partition iff their canonical forms are
/// equal, which is how partitions from different encodings are compared.
pub fn canonicalize(labels: &[u32]) -> Vec<u32> {
    let mut mapping: Vec<Option<u32>> = vec![None; labels.len()];
    let mut next = 0u32;
    let mut result = Vec::with_capacity(labels.len());
    for &label in labels {
        let canonical = match mapping[label as usize] {
            Some(c) => c,
            None => {
                let c = next;
                mapping[label as usize] = Some(c);
                next += 1;
                c
            }
        };
        result.push(canonical);
    }
    result
}
