//! Recording of spikes and membrane potentials during a simulation.
use serde::{Deserialize, Serialize};

use crate::core::neuron::IzhikevichNeuron;
use crate::core::spikes::{Raster, Spike};

/// The data recorded by a monitor.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct Recording {
    /// The recorded spikes, in order of emission.
    pub raster: Raster,
    /// For each neuron, one membrane potential sample per simulation step (empty if not recorded).
    pub voltages: Vec<Vec<f64>>,
}

/// A monitor recording the spikes of all neurons and, optionally, their membrane potential.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Monitor {
    record_voltage: bool,
    spikes: Vec<Spike>,
    voltages: Vec<Vec<f64>>,
}

impl Monitor {
    /// Create a new monitor for a network with the given number of neurons.
    pub fn new(num_neurons: usize, record_voltage: bool) -> Self {
        let voltages = match record_voltage {
            true => vec![vec![]; num_neurons],
            false => vec![],
        };
        Monitor {
            record_voltage,
            spikes: vec![],
            voltages,
        }
    }

    pub fn records_voltage(&self) -> bool {
        self.record_voltage
    }

    /// Record one simulation step: the spikes emitted at `time` and the state of every neuron.
    pub fn record(&mut self, time: f64, fired: &[usize], neurons: &[IzhikevichNeuron]) {
        self.spikes
            .extend(fired.iter().map(|&neuron_id| Spike::new(neuron_id, time)));
        if self.record_voltage {
            self.voltages
                .iter_mut()
                .zip(neurons.iter())
                .for_each(|(trace, neuron)| trace.push(neuron.v()));
        }
    }

    /// Returns the number of spikes recorded so far.
    pub fn num_spikes(&self) -> usize {
        self.spikes.len()
    }

    /// Returns a copy of the recorded data, leaving the monitor untouched.
    pub fn peek(&self) -> Recording {
        Recording {
            raster: Raster::from_spikes(&self.spikes),
            voltages: self.voltages.clone(),
        }
    }

    /// Returns the recorded data and clears the monitor, so that the next call only returns newer data.
    pub fn take(&mut self) -> Recording {
        let recording = self.peek();
        self.clear();
        recording
    }

    /// Discard all recorded data.
    pub fn clear(&mut self) {
        self.spikes.clear();
        self.voltages.iter_mut().for_each(|trace| trace.clear());
    }
}
