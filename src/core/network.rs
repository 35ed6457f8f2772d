//! The simulation session: a flat population of Izhikevich neurons, its projections and its monitor.
use std::ops::Range;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use rayon::prelude::*;

use crate::core::connection::Projection;
use crate::core::monitor::{Monitor, Recording};
use crate::core::neuron::{IzhikevichNeuron, IzhikevichParameters};
use crate::core::parameters::PopulationParameters;
use crate::core::{MIN_NEURONS_PAR, V_INIT};
use crate::error::SNNError;

/// A self-contained simulation session.
///
/// Each network owns its neurons, projections, monitor and random number generator,
/// so that independent networks can coexist in the same process.
/// The lifecycle is: set parameters and add projections, compile, attach a monitor, simulate.
#[derive(Debug, Clone)]
pub struct Network {
    neurons: Vec<IzhikevichNeuron>,
    projections: Vec<Projection>,
    monitor: Option<Monitor>,
    dt: f64,
    step: u64,
    compiled: bool,
    rng: ChaCha8Rng,
}

impl Network {
    /// Create a new network of regular spiking neurons (without noise) at the resting potential.
    /// The function returns an error if the network is empty or the time step is not positive.
    pub fn new(num_neurons: usize, dt: f64, seed: u64) -> Result<Self, SNNError> {
        if num_neurons == 0 {
            return Err(SNNError::InvalidParameters(
                "A network needs at least one neuron".to_string(),
            ));
        }
        if !(dt > 0.0 && dt.is_finite()) {
            return Err(SNNError::InvalidParameters(format!(
                "Time step must be positive, got {}",
                dt
            )));
        }

        let neurons = (0..num_neurons)
            .map(|id| IzhikevichNeuron::new(id, IzhikevichParameters::default(), V_INIT))
            .collect();

        Ok(Network {
            neurons,
            projections: vec![],
            monitor: None,
            dt,
            step: 0,
            compiled: false,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// Returns the number of neurons in the network.
    pub fn num_neurons(&self) -> usize {
        self.neurons.len()
    }

    /// Returns the total number of connections in the network.
    pub fn num_connections(&self) -> usize {
        self.projections.iter().map(|p| p.num_connections()).sum()
    }

    pub fn neurons(&self) -> &[IzhikevichNeuron] {
        &self.neurons
    }

    /// A reference to a specific neuron in the network.
    /// Returns `None` if the neuron is not found.
    pub fn neuron_ref(&self, neuron_id: usize) -> Option<&IzhikevichNeuron> {
        self.neurons.get(neuron_id)
    }

    pub fn projections(&self) -> &[Projection] {
        &self.projections
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Returns the current simulation time.
    pub fn time(&self) -> f64 {
        self.step as f64 * self.dt
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled
    }

    fn check_range(&self, range: &Range<usize>) -> Result<(), SNNError> {
        if range.start > range.end || range.end > self.num_neurons() {
            return Err(SNNError::OutOfBounds(format!(
                "Population {}..{} does not fit in a network of {} neurons",
                range.start,
                range.end,
                self.num_neurons()
            )));
        }
        Ok(())
    }

    /// Set the parameters and initial state of a contiguous view of the population.
    /// The function returns an error if the view does not fit in the network or does not match the parameters.
    pub fn set_parameters(
        &mut self,
        range: Range<usize>,
        parameters: &PopulationParameters,
    ) -> Result<(), SNNError> {
        self.check_range(&range)?;
        if parameters.num_neurons() != range.len() {
            return Err(SNNError::InvalidParameters(format!(
                "Parameters resolved for {} neurons cannot be set on a view of {} neurons",
                parameters.num_neurons(),
                range.len()
            )));
        }
        parameters.check_lengths()?;

        self.neurons[range]
            .iter_mut()
            .enumerate()
            .for_each(|(i, neuron)| {
                neuron.reset(
                    parameters.neuron_parameters(i),
                    parameters.initial_potential(i),
                    parameters.initial_recovery(i),
                )
            });
        Ok(())
    }

    /// Add a projection to the network.
    /// The function returns an error if the network is already compiled or if the projection does not fit in the network.
    pub fn add_projection(&mut self, projection: Projection) -> Result<(), SNNError> {
        if self.compiled {
            return Err(SNNError::CompilationError(
                "Projections cannot be added to a compiled network".to_string(),
            ));
        }
        self.check_range(projection.pre())?;
        self.check_range(projection.post())?;
        self.projections.push(projection);
        Ok(())
    }

    /// Finalize the network structure.
    /// The function returns an error if any neuron holds a non-finite parameter or state.
    pub fn compile(&mut self) -> Result<(), SNNError> {
        for neuron in self.neurons.iter() {
            let invalid = neuron.parameters().first_non_finite().or_else(|| {
                if !neuron.v().is_finite() {
                    Some("v")
                } else if !neuron.u().is_finite() {
                    Some("u")
                } else {
                    None
                }
            });
            if let Some(name) = invalid {
                return Err(SNNError::CompilationError(format!(
                    "Neuron {} has a non-finite {}",
                    neuron.id(),
                    name
                )));
            }
        }

        self.compiled = true;
        log::info!(
            "Network compiled: {} neurons, {} projections, {} connections",
            self.num_neurons(),
            self.projections.len(),
            self.num_connections()
        );
        Ok(())
    }

    /// Attach a monitor recording the spikes of all neurons and, optionally, their membrane potential.
    /// Any previously attached monitor is replaced.
    pub fn attach_monitor(&mut self, record_voltage: bool) {
        self.monitor = Some(Monitor::new(self.num_neurons(), record_voltage));
    }

    pub fn monitor(&self) -> Option<&Monitor> {
        self.monitor.as_ref()
    }

    /// Returns the data recorded since the last call and clears the monitor.
    /// Returns an empty recording if no monitor is attached.
    pub fn take_recording(&mut self) -> Recording {
        match self.monitor.as_mut() {
            Some(monitor) => monitor.take(),
            None => Recording::default(),
        }
    }

    /// Advance the simulation by the given duration, rounded to a whole number of time steps.
    pub fn simulate(&mut self, duration: f64) -> Result<(), SNNError> {
        if !self.compiled {
            return Err(SNNError::NotCompiled);
        }
        if !(duration >= 0.0 && duration.is_finite()) {
            return Err(SNNError::InvalidParameters(format!(
                "Simulation duration must be non-negative, got {}",
                duration
            )));
        }

        let num_steps = (duration / self.dt).round() as u64;
        log::info!(
            "Starting simulation of {} ms ({} steps) at t = {}...",
            duration,
            num_steps,
            self.time()
        );

        // For logging purposes
        let log_interval = (num_steps / 10).max(1);
        let mut num_spikes = 0;

        for k in 0..num_steps {
            let fired = self.step_once();
            num_spikes += fired.len();

            if (k + 1) % log_interval == 0 {
                log::debug!(
                    "Simulation progress: {:.0}% (Time: {:.2}, {} spikes so far)",
                    (k + 1) as f64 / num_steps as f64 * 100.0,
                    self.time(),
                    num_spikes
                );
            }
        }

        log::info!(
            "Simulation completed at t = {} with {} spikes",
            self.time(),
            num_spikes
        );
        Ok(())
    }

    /// Integrate all neurons over one time step, record the step and deliver the emitted spikes.
    /// Returns the IDs of the neurons that fired.
    fn step_once(&mut self) -> Vec<usize> {
        let dt = self.dt;
        let time = self.time();

        // The noise is drawn sequentially so that the outcome does not depend on the thread scheduling
        let rng = &mut self.rng;
        let xi: Vec<f64> = (0..self.neurons.len())
            .map(|_| rng.sample(StandardNormal))
            .collect();

        let fired: Vec<usize> = if self.neurons.len() > MIN_NEURONS_PAR {
            self.neurons
                .par_iter_mut()
                .zip(xi.par_iter())
                .filter_map(|(neuron, &xi)| neuron.step(dt, xi).then(|| neuron.id()))
                .collect()
        } else {
            self.neurons
                .iter_mut()
                .zip(xi.iter())
                .filter_map(|(neuron, &xi)| neuron.step(dt, xi).then(|| neuron.id()))
                .collect()
        };

        if let Some(monitor) = self.monitor.as_mut() {
            monitor.record(time, &fired, &self.neurons);
        }

        for &source_id in fired.iter() {
            for projection in self.projections.iter() {
                let target = projection.target();
                for &(target_id, weight) in projection.outputs(source_id) {
                    self.neurons[target_id].receive(weight, target);
                }
            }
        }

        self.step += 1;
        fired
    }
}
