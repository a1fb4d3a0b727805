//! Topology Generation
//!
//! Small-world networks built as a ring lattice followed by random rewiring.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::components::network::Topology;
use crate::error::ConfigError;

/// Build a small-world graph over `node_count` nodes.
///
/// Every node starts linked to its `mean_degree / 2` nearest neighbours on
/// each side of a ring. Each lattice edge `(u, v)` is then rewired with
/// probability `rewiring_probability` to `(u, w)`, where `w` is drawn
/// uniformly from the nodes not yet adjacent to `u`. The result may be
/// disconnected.
pub fn generate_small_world<R: Rng + ?Sized>(
    node_count: usize,
    mean_degree: usize,
    rewiring_probability: f64,
    rng: &mut R,
) -> Result<Topology, ConfigError> {
    if mean_degree % 2 != 0 {
        return Err(ConfigError::invalid(
            "mean_degree",
            format!("must be even, got {}", mean_degree),
        ));
    }
    if mean_degree >= node_count {
        return Err(ConfigError::invalid(
            "mean_degree",
            format!(
                "must be below node_count ({}), got {}",
                node_count, mean_degree
            ),
        ));
    }
    if !(0.0..=1.0).contains(&rewiring_probability) {
        return Err(ConfigError::invalid(
            "rewiring_probability",
            format!("must lie within [0, 1], got {}", rewiring_probability),
        ));
    }

    let n = node_count as u32;
    let half = (mean_degree / 2) as u32;
    let mut topology = ring_lattice(n, half);

    if rewiring_probability > 0.0 {
        for offset in 1..=half {
            for u in 0..n {
                let v = (u + offset) % n;
                if !topology.has_edge(u, v) || !rng.gen_bool(rewiring_probability) {
                    continue;
                }
                let candidates: Vec<u32> = (0..n)
                    .filter(|&w| w != u && !topology.has_edge(u, w))
                    .collect();
                if let Some(&w) = candidates.choose(rng) {
                    topology.remove_edge(u, v);
                    topology.add_edge(u, w);
                }
            }
        }
    }

    tracing::debug!(
        nodes = node_count,
        edges = topology.edge_count(),
        rewiring_probability,
        "Generated small-world topology"
    );
    Ok(topology)
}

/// Ring where each node links to the `half` nearest nodes on either side
fn ring_lattice(n: u32, half: u32) -> Topology {
    let mut topology = Topology::empty(n as usize);
    for offset in 1..=half {
        for u in 0..n {
            topology.add_edge(u, (u + offset) % n);
        }
    }
    topology
}
