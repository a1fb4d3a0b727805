//! Social Network
//!
//! Undirected graph over Human network ids, used only for trust diffusion.

use bevy_ecs::prelude::*;
use std::collections::BTreeSet;

/// Resource: adjacency sets indexed by network id.
///
/// Sets keep neighbour iteration ordered, so diffusion draws happen in the
/// same order for the same seed.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Default)]
pub struct Topology {
    adjacency: Vec<BTreeSet<u32>>,
}

impl Topology {
    /// Graph with `node_count` isolated nodes
    pub fn empty(node_count: usize) -> Self {
        Self {
            adjacency: vec![BTreeSet::new(); node_count],
        }
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Add an undirected edge. Self-loops and duplicates are ignored.
    pub fn add_edge(&mut self, a: u32, b: u32) -> bool {
        if a == b {
            return false;
        }
        let inserted = self.adjacency[a as usize].insert(b);
        self.adjacency[b as usize].insert(a);
        inserted
    }

    pub fn remove_edge(&mut self, a: u32, b: u32) -> bool {
        let removed = self.adjacency[a as usize].remove(&b);
        self.adjacency[b as usize].remove(&a);
        removed
    }

    pub fn has_edge(&self, a: u32, b: u32) -> bool {
        self.adjacency
            .get(a as usize)
            .is_some_and(|neighbors| neighbors.contains(&b))
    }

    /// Neighbours of `id` in ascending order; empty for unknown ids
    pub fn neighbors(&self, id: u32) -> impl Iterator<Item = u32> + '_ {
        self.adjacency
            .get(id as usize)
            .into_iter()
            .flat_map(|neighbors| neighbors.iter().copied())
    }

    pub fn degree(&self, id: u32) -> usize {
        self.adjacency.get(id as usize).map_or(0, BTreeSet::len)
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Every edge once, as `(low, high)` pairs in ascending order
    pub fn edges(&self) -> Vec<(u32, u32)> {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(a, neighbors)| {
                let a = a as u32;
                neighbors.iter().copied().filter(move |&b| a < b).map(move |b| (a, b))
            })
            .collect()
    }
}
