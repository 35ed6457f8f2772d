//! Population parameter sets for Izhikevich neurons.
use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::neuron::IzhikevichParameters;
use crate::core::V_INIT;
use crate::error::SNNError;

/// Keys that every population parameter set must provide.
pub const REQUIRED_KEYS: [&str; 5] = ["noise", "a", "b", "c", "d"];
/// Optional key for the initial membrane potential.
pub const INITIAL_POTENTIAL_KEY: &str = "v";

/// A parameter value, either shared by the whole population or given per neuron.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Scalar(f64),
    PerNeuron(Vec<f64>),
}

impl ParameterValue {
    /// Returns the value for the neuron at the given position in the population.
    /// Scalars are broadcast; per-neuron arrays must have been checked with `check_len`.
    pub fn value(&self, index: usize) -> f64 {
        match self {
            ParameterValue::Scalar(x) => *x,
            ParameterValue::PerNeuron(xs) => xs[index],
        }
    }

    /// Check that a per-neuron array matches the population size.
    pub fn check_len(&self, name: &str, num_neurons: usize) -> Result<(), SNNError> {
        match self {
            ParameterValue::PerNeuron(xs) if xs.len() != num_neurons => {
                Err(SNNError::ParameterLengthMismatch {
                    name: name.to_string(),
                    expected: num_neurons,
                    found: xs.len(),
                })
            }
            _ => Ok(()),
        }
    }

}

impl From<f64> for ParameterValue {
    fn from(x: f64) -> Self {
        ParameterValue::Scalar(x)
    }
}

impl From<Vec<f64>> for ParameterValue {
    fn from(xs: Vec<f64>) -> Self {
        ParameterValue::PerNeuron(xs)
    }
}

/// A free-form mapping from parameter names to values, as supplied by the caller.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet(BTreeMap<String, ParameterValue>);

impl ParameterSet {
    /// Creates a new empty parameter set.
    pub fn new() -> Self {
        ParameterSet(BTreeMap::new())
    }

    /// Returns the set extended with the given key-value pair.
    pub fn with(mut self, key: &str, value: impl Into<ParameterValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<ParameterValue>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ParameterValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns a new parameter set where the noise entry is replaced by the provided value.
    /// The original set is left untouched.
    pub fn with_noise(&self, noise: impl Into<ParameterValue>) -> Self {
        self.clone().with("noise", noise)
    }

    /// Validate the set against a population of the given size.
    /// Required keys must be present and per-neuron arrays must have one value per neuron.
    /// The initial potential defaults to `V_INIT` when absent.
    pub fn resolve(&self, num_neurons: usize) -> Result<PopulationParameters, SNNError> {
        for key in self.0.keys() {
            if !REQUIRED_KEYS.contains(&key.as_str()) && key != INITIAL_POTENTIAL_KEY {
                log::warn!("Ignoring unknown population parameter: {}", key);
            }
        }

        let fetch = |key: &str| -> Result<ParameterValue, SNNError> {
            let value = self
                .get(key)
                .ok_or_else(|| SNNError::MissingParameter(key.to_string()))?;
            value.check_len(key, num_neurons)?;
            Ok(value.clone())
        };

        let v = match self.get(INITIAL_POTENTIAL_KEY) {
            Some(value) => {
                value.check_len(INITIAL_POTENTIAL_KEY, num_neurons)?;
                value.clone()
            }
            None => ParameterValue::Scalar(V_INIT),
        };

        Ok(PopulationParameters {
            num_neurons,
            noise: fetch("noise")?,
            a: fetch("a")?,
            b: fetch("b")?,
            c: fetch("c")?,
            d: fetch("d")?,
            v,
        })
    }
}

/// Validated parameters for a population of a known size.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct PopulationParameters {
    num_neurons: usize,
    noise: ParameterValue,
    a: ParameterValue,
    b: ParameterValue,
    c: ParameterValue,
    d: ParameterValue,
    v: ParameterValue,
}

impl PopulationParameters {
    /// Heterogeneous excitatory population: with `r ~ U[0, 1)` drawn per neuron,
    /// `c = -65 + 15 r^2` and `d = 8 - 6 r^2`, the rest being regular-spiking constants.
    pub fn excitatory<R: Rng + ?Sized>(num_neurons: usize, rng: &mut R) -> Self {
        let r: Vec<f64> = (0..num_neurons).map(|_| rng.random::<f64>()).collect();
        PopulationParameters {
            num_neurons,
            noise: ParameterValue::Scalar(5.0),
            a: ParameterValue::Scalar(0.02),
            b: ParameterValue::Scalar(0.2),
            c: r.iter().map(|r| -65.0 + 15.0 * r * r).collect::<Vec<f64>>().into(),
            d: r.iter().map(|r| 8.0 - 6.0 * r * r).collect::<Vec<f64>>().into(),
            v: ParameterValue::Scalar(V_INIT),
        }
    }

    /// Heterogeneous inhibitory population: with `r ~ U[0, 1)` drawn per neuron,
    /// `a = 0.02 + 0.08 r` and `b = 0.25 - 0.05 r`.
    pub fn inhibitory<R: Rng + ?Sized>(num_neurons: usize, rng: &mut R) -> Self {
        let r: Vec<f64> = (0..num_neurons).map(|_| rng.random::<f64>()).collect();
        PopulationParameters {
            num_neurons,
            noise: ParameterValue::Scalar(2.0),
            a: r.iter().map(|r| 0.02 + 0.08 * r).collect::<Vec<f64>>().into(),
            b: r.iter().map(|r| 0.25 - 0.05 * r).collect::<Vec<f64>>().into(),
            c: ParameterValue::Scalar(-65.0),
            d: ParameterValue::Scalar(2.0),
            v: ParameterValue::Scalar(V_INIT),
        }
    }

    /// Returns the number of neurons the parameters were resolved for.
    pub fn num_neurons(&self) -> usize {
        self.num_neurons
    }

    /// Returns the model parameters of the neuron at the given position in the population.
    pub fn neuron_parameters(&self, index: usize) -> IzhikevichParameters {
        IzhikevichParameters {
            a: self.a.value(index),
            b: self.b.value(index),
            c: self.c.value(index),
            d: self.d.value(index),
            noise: self.noise.value(index),
        }
    }

    /// Returns the initial membrane potential of the neuron at the given position in the population.
    pub fn initial_potential(&self, index: usize) -> f64 {
        self.v.value(index)
    }

    /// Returns the initial recovery variable of the neuron at the given position, i.e., `v * b`.
    pub fn initial_recovery(&self, index: usize) -> f64 {
        self.v.value(index) * self.b.value(index)
    }

    /// Check that every per-neuron array still has one value per neuron.
    /// Parameters built by [`ParameterSet::resolve`] always pass; deserialized ones may not.
    pub fn check_lengths(&self) -> Result<(), SNNError> {
        self.named_values()
            .into_iter()
            .try_for_each(|(name, value)| value.check_len(name, self.num_neurons))
    }

    fn named_values(&self) -> [(&'static str, &ParameterValue); 6] {
        [
            ("noise", &self.noise),
            ("a", &self.a),
            ("b", &self.b),
            ("c", &self.c),
            ("d", &self.d),
            (INITIAL_POTENTIAL_KEY, &self.v),
        ]
    }

    pub fn noise(&self) -> &ParameterValue {
        &self.noise
    }

    pub fn a(&self) -> &ParameterValue {
        &self.a
    }

    pub fn b(&self) -> &ParameterValue {
        &self.b
    }

    pub fn c(&self) -> &ParameterValue {
        &self.c
    }

    pub fn d(&self) -> &ParameterValue {
        &self.d
    }

    /// Returns the initial membrane potential of the population.
    pub fn v(&self) -> &ParameterValue {
        &self.v
    }
}
