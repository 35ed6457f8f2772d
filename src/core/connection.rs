//! Synaptic connections and projections between populations.
use std::ops::Range;

use rand::Rng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

use crate::error::SNNError;

/// The synaptic target receiving the weight of an incoming spike.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum Target {
    /// Depolarizing input, added to the excitatory conductance.
    Excitatory,
    /// Hyperpolarizing input, added to the inhibitory conductance.
    Inhibitory,
}

/// A connection between two neurons.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// The ID of the neuron producing spikes.
    pub source_id: usize,
    /// The ID of the neuron receiving spikes.
    pub target_id: usize,
    /// The weight of the synapse along which the spikes are transmitted.
    pub weight: f64,
}

impl Connection {
    pub fn new(source_id: usize, target_id: usize, weight: f64) -> Self {
        Connection {
            source_id,
            target_id,
            weight,
        }
    }
}

/// A projection from a contiguous pre-synaptic population to a contiguous post-synaptic population.
/// Outgoing connections are grouped by source neuron for fast spike delivery.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Projection {
    pre: Range<usize>,
    post: Range<usize>,
    target: Target,
    /// For each pre-synaptic neuron (relative to `pre.start`), the (target ID, weight) pairs.
    outputs: Vec<Vec<(usize, f64)>>,
}

impl Projection {
    /// Connect every pre-synaptic neuron to every post-synaptic neuron, with weights drawn uniformly in `[0, weight_max)`.
    /// A zero maximum weight yields zero weights.
    /// If `self_connections` is false, connections from a neuron to itself are skipped.
    pub fn all_to_all<R: Rng + ?Sized>(
        pre: Range<usize>,
        post: Range<usize>,
        target: Target,
        weight_max: f64,
        self_connections: bool,
        rng: &mut R,
    ) -> Result<Self, SNNError> {
        if !weight_max.is_finite() || weight_max < 0.0 {
            return Err(SNNError::InvalidParameters(format!(
                "Maximum weight must be finite and non-negative, got {}",
                weight_max
            )));
        }

        let weight_dist = if weight_max > 0.0 {
            Some(Uniform::new(0.0, weight_max).map_err(|e| {
                SNNError::InvalidParameters(format!("Invalid weight distribution: {}", e))
            })?)
        } else {
            None
        };

        let outputs: Vec<Vec<(usize, f64)>> = pre
            .clone()
            .map(|source_id| {
                post.clone()
                    .filter(|&target_id| self_connections || target_id != source_id)
                    .map(|target_id| {
                        let weight = match &weight_dist {
                            Some(dist) => dist.sample(rng),
                            None => 0.0,
                        };
                        (target_id, weight)
                    })
                    .collect()
            })
            .collect();

        Ok(Projection {
            pre,
            post,
            target,
            outputs,
        })
    }

    /// Returns the range of pre-synaptic neuron IDs.
    pub fn pre(&self) -> &Range<usize> {
        &self.pre
    }

    /// Returns the range of post-synaptic neuron IDs.
    pub fn post(&self) -> &Range<usize> {
        &self.post
    }

    pub fn target(&self) -> Target {
        self.target
    }

    /// Returns the total number of connections in the projection.
    pub fn num_connections(&self) -> usize {
        self.outputs.iter().map(|outputs| outputs.len()).sum()
    }

    /// Returns the (target ID, weight) pairs of the connections leaving the given neuron.
    /// Neurons outside the pre-synaptic population have no outputs.
    pub fn outputs(&self, source_id: usize) -> &[(usize, f64)] {
        if !self.pre.contains(&source_id) {
            return &[];
        }
        &self.outputs[source_id - self.pre.start]
    }

    /// An iterator over all connections of the projection.
    pub fn connections(&self) -> impl Iterator<Item = Connection> + '_ {
        self.pre.clone().flat_map(move |source_id| {
            self.outputs(source_id)
                .iter()
                .map(move |&(target_id, weight)| Connection::new(source_id, target_id, weight))
        })
    }
}
