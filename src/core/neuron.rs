//! Module implementing the Izhikevich spiking neuron.
//!
//! The membrane potential `v` and the recovery variable `u` follow
//! ```text
//! dv/dt = 0.04 v^2 + 5 v + 140 - u + I
//! du/dt = a (b v - u)
//! ```
//! with `I = g_exc - g_inh + noise * xi`, `xi ~ N(0, 1)`.
//! Whenever `v` exceeds the firing threshold, the neuron fires and `v <- c`, `u <- u + d`.
use serde::{Deserialize, Serialize};

use crate::core::connection::Target;
use crate::core::FIRING_THRESHOLD;

/// The parameters of a single Izhikevich neuron.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct IzhikevichParameters {
    /// Time scale of the recovery variable.
    pub a: f64,
    /// Sensitivity of the recovery variable to the membrane potential.
    pub b: f64,
    /// After-spike reset value of the membrane potential.
    pub c: f64,
    /// After-spike increment of the recovery variable.
    pub d: f64,
    /// Standard deviation of the noisy input current.
    pub noise: f64,
}

impl IzhikevichParameters {
    /// Returns the name of the first non-finite parameter, if any.
    pub fn first_non_finite(&self) -> Option<&'static str> {
        [
            ("a", self.a),
            ("b", self.b),
            ("c", self.c),
            ("d", self.d),
            ("noise", self.noise),
        ]
        .into_iter()
        .find(|(_, x)| !x.is_finite())
        .map(|(name, _)| name)
    }
}

impl Default for IzhikevichParameters {
    /// Regular spiking neuron without noise.
    fn default() -> Self {
        IzhikevichParameters {
            a: 0.02,
            b: 0.2,
            c: -65.0,
            d: 8.0,
            noise: 0.0,
        }
    }
}

/// An Izhikevich neuron with its synaptic accumulators.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct IzhikevichNeuron {
    id: usize,
    parameters: IzhikevichParameters,
    v: f64,
    u: f64,
    g_exc: f64,
    g_inh: f64,
}

impl IzhikevichNeuron {
    /// Create a new neuron at the given membrane potential, the recovery variable being set to `v * b`.
    pub fn new(id: usize, parameters: IzhikevichParameters, v: f64) -> Self {
        IzhikevichNeuron {
            id,
            parameters,
            v,
            u: v * parameters.b,
            g_exc: 0.0,
            g_inh: 0.0,
        }
    }

    /// Returns the neuron ID.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn parameters(&self) -> &IzhikevichParameters {
        &self.parameters
    }

    /// Returns the membrane potential.
    pub fn v(&self) -> f64 {
        self.v
    }

    /// Returns the recovery variable.
    pub fn u(&self) -> f64 {
        self.u
    }

    /// Replace the neuron parameters and state.
    pub fn reset(&mut self, parameters: IzhikevichParameters, v: f64, u: f64) {
        self.parameters = parameters;
        self.v = v;
        self.u = u;
        self.g_exc = 0.0;
        self.g_inh = 0.0;
    }

    /// Accumulate a synaptic input, consumed at the next integration step.
    pub fn receive(&mut self, weight: f64, target: Target) {
        match target {
            Target::Excitatory => self.g_exc += weight,
            Target::Inhibitory => self.g_inh += weight,
        }
    }

    /// Advance the neuron by one explicit Euler step of size `dt`, given a standard normal sample `xi`.
    /// The synaptic accumulators are cleared afterwards.
    /// Returns true if the neuron fires during the step.
    pub fn step(&mut self, dt: f64, xi: f64) -> bool {
        let IzhikevichParameters { a, b, c, d, noise } = self.parameters;
        let current = self.g_exc - self.g_inh + noise * xi;
        let (v, u) = (self.v, self.u);

        self.v = v + dt * (0.04 * v * v + 5.0 * v + 140.0 - u + current);
        self.u = u + dt * a * (b * v - u);
        self.g_exc = 0.0;
        self.g_inh = 0.0;

        if self.v > FIRING_THRESHOLD {
            self.v = c;
            self.u += d;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_neuron() {
        let neuron = IzhikevichNeuron::new(3, IzhikevichParameters::default(), -70.0);
        assert_eq!(neuron.id(), 3);
        assert_eq!(neuron.v(), -70.0);
        assert!((neuron.u() + 14.0).abs() < 1e-12);
    }

    #[test]
    fn test_step_without_input() {
        let mut neuron = IzhikevichNeuron::new(0, IzhikevichParameters::default(), -65.0);

        // dv = 0.04 * 4225 - 325 + 140 + 13 = -3 and u = b * v is already at equilibrium
        assert!(!neuron.step(1.0, 0.0));
        assert!((neuron.v() + 68.0).abs() < 1e-9);
        assert!((neuron.u() + 13.0).abs() < 1e-9);

        // the neuron settles at rest (v = -70) without firing
        for _ in 0..1000 {
            assert!(!neuron.step(1.0, 0.0));
        }
        assert!((neuron.v() + 70.0).abs() < 1e-3);
    }

    #[test]
    fn test_step_fire_and_reset() {
        let parameters = IzhikevichParameters::default();
        let mut neuron = IzhikevichNeuron::new(0, parameters, -65.0);

        neuron.receive(60.0, Target::Excitatory);
        neuron.receive(40.0, Target::Excitatory);
        assert!(neuron.step(1.0, 0.0));
        assert_eq!(neuron.v(), parameters.c);
        assert!((neuron.u() - (-13.0 + parameters.d)).abs() < 1e-9);

        // the accumulators are consumed by the step
        assert!(!neuron.step(1.0, 0.0));
    }

    #[test]
    fn test_inhibition_and_noise() {
        let parameters = IzhikevichParameters {
            noise: 2.0,
            ..IzhikevichParameters::default()
        };
        let mut neuron = IzhikevichNeuron::new(0, parameters, -65.0);
        neuron.receive(4.0, Target::Excitatory);
        neuron.receive(5.0, Target::Inhibitory);

        // I = 4 - 5 + 2 * 0.5 = 0
        assert!(!neuron.step(1.0, 0.5));
        assert!((neuron.v() + 68.0).abs() < 1e-9);
    }

    #[test]
    fn test_reset() {
        let mut neuron = IzhikevichNeuron::new(0, IzhikevichParameters::default(), -65.0);
        neuron.receive(100.0, Target::Excitatory);
        let parameters = IzhikevichParameters {
            c: -50.0,
            ..IzhikevichParameters::default()
        };
        neuron.reset(parameters, -60.0, -12.0);
        assert_eq!(neuron.parameters().c, -50.0);
        assert_eq!(neuron.v(), -60.0);
        assert_eq!(neuron.u(), -12.0);
        // the pending input was discarded
        assert!(!neuron.step(1.0, 0.0));
    }
}
