//! Excitatory/inhibitory network driving an observed ("custom") population, and measurement of its activity.
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::ops::Range;
use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::connection::{Projection, Target};
use crate::core::network::Network;
use crate::core::parameters::{ParameterSet, ParameterValue, PopulationParameters};
use crate::core::spikes::Raster;
use crate::core::TIME_STEP;
use crate::error::SNNError;

/// The default duration of a run (in ms).
pub const DEFAULT_RUN_TIME: f64 = 1000.0;

fn default_e_neurons() -> usize {
    800
}

fn default_i_neurons() -> usize {
    200
}

fn default_e_weight_max() -> f64 {
    0.5
}

fn default_i_weight_max() -> f64 {
    1.0
}

fn default_dt() -> f64 {
    TIME_STEP
}

fn default_true() -> bool {
    true
}

/// The configuration of a spiking network.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct SpikingNetConfig {
    /// The number of neurons in the observed population.
    pub n_neurons: usize,
    /// The parameters of the observed population; the noise is taken from `noise`.
    pub parameters: ParameterSet,
    /// The noise of the observed population.
    pub noise: ParameterValue,
    #[serde(default = "default_e_neurons")]
    pub e_neurons: usize,
    #[serde(default = "default_i_neurons")]
    pub i_neurons: usize,
    /// Excitatory weights are drawn in `[0, e_weight_max)`.
    #[serde(default = "default_e_weight_max")]
    pub e_weight_max: f64,
    /// Inhibitory weights are drawn in `[0, i_weight_max)`.
    #[serde(default = "default_i_weight_max")]
    pub i_weight_max: f64,
    /// Whether the all-to-all projections connect a neuron to itself.
    /// Enabled by default, so that every neuron of a background population also projects onto itself.
    /// ANNarchy's `connect_all_to_all` skips self-connections by default when pre and post overlap;
    /// set this to `false` to reproduce that.
    #[serde(default = "default_true")]
    pub self_connections: bool,
    /// Whether the first observed neuron (ID `total - n_neurons`) is measured.
    #[serde(default)]
    pub include_boundary_neuron: bool,
    /// Spikes at or before this time are discarded from the measurements.
    #[serde(default)]
    pub initial_transient: f64,
    #[serde(default = "default_dt")]
    pub dt: f64,
    #[serde(default = "default_true")]
    pub record_voltage: bool,
    /// Seed of the random number generator; drawn from the thread generator if absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SpikingNetConfig {
    /// Create a configuration with the default background network (800 excitatory and 200 inhibitory neurons).
    pub fn new(n_neurons: usize, parameters: ParameterSet, noise: impl Into<ParameterValue>) -> Self {
        SpikingNetConfig {
            n_neurons,
            parameters,
            noise: noise.into(),
            e_neurons: default_e_neurons(),
            i_neurons: default_i_neurons(),
            e_weight_max: default_e_weight_max(),
            i_weight_max: default_i_weight_max(),
            self_connections: true,
            include_boundary_neuron: false,
            initial_transient: 0.0,
            dt: default_dt(),
            record_voltage: true,
            seed: None,
        }
    }

    /// Returns the total number of neurons in the network.
    pub fn total_neurons(&self) -> usize {
        self.n_neurons + self.e_neurons + self.i_neurons
    }

    fn validate(&self) -> Result<(), SNNError> {
        if self.n_neurons == 0 {
            return Err(SNNError::InvalidParameters(
                "The observed population must have at least one neuron".to_string(),
            ));
        }
        if !(self.initial_transient >= 0.0 && self.initial_transient.is_finite()) {
            return Err(SNNError::InvalidParameters(format!(
                "Initial transient must be non-negative, got {}",
                self.initial_transient
            )));
        }
        Ok(())
    }

    /// Save the configuration to a file.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), SNNError> {
        let file = File::create(path).map_err(|e| SNNError::IOError(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .map_err(|e| SNNError::IOError(e.to_string()))?;
        writer.flush().map_err(|e| SNNError::IOError(e.to_string()))
    }

    /// Load a configuration from a file.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, SNNError> {
        let file = File::open(path).map_err(|e| SNNError::IOError(e.to_string()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| SNNError::IOError(e.to_string()))
    }
}

/// The measurements of a run.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct RunOutput {
    /// The spikes of the observed population emitted during the run (after the initial transient).
    pub raster: Raster,
    /// The mean firing rate (in Hz) of the observed neurons that fired at least once, `None` if none fired.
    pub mean_firing_rate: Option<f64>,
    /// The membrane potential traces of the observed neurons during the run (empty if not recorded).
    pub voltages: Vec<Vec<f64>>,
}

/// Select the spikes of the observed population and drop the initial transient.
/// The observed neurons are the last `n_neurons` of the network; unless `include_boundary_neuron` is set,
/// only IDs strictly above `total_neurons - n_neurons` are kept.
pub fn observed_spikes(
    raster: &Raster,
    total_neurons: usize,
    n_neurons: usize,
    include_boundary_neuron: bool,
    initial_transient: f64,
) -> Raster {
    raster
        .above_neuron(
            total_neurons.saturating_sub(n_neurons),
            include_boundary_neuron,
        )
        .after(initial_transient)
}

/// A network of excitatory, inhibitory and observed Izhikevich neurons.
///
/// The flat population is laid out as `[excitatory, inhibitory, observed]`.
/// Both background populations project all-to-all onto the whole network.
#[derive(Debug, Clone)]
pub struct SpikingNet {
    config: SpikingNetConfig,
    parameters: PopulationParameters,
    exc_parameters: PopulationParameters,
    inh_parameters: PopulationParameters,
    network: Network,
}

impl SpikingNet {
    /// Build, compile and monitor the network described by the configuration.
    /// The configuration is left untouched; the noise is merged into a copy of the observed parameters.
    pub fn build(config: SpikingNetConfig) -> Result<Self, SNNError> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };

        let parameters = config
            .parameters
            .with_noise(config.noise.clone())
            .resolve(config.n_neurons)?;
        let exc_parameters = PopulationParameters::excitatory(config.e_neurons, &mut rng);
        let inh_parameters = PopulationParameters::inhibitory(config.i_neurons, &mut rng);

        let network = Network::new(config.total_neurons(), config.dt, rng.random())?;

        let mut spiking_net = SpikingNet {
            config,
            parameters,
            exc_parameters,
            inh_parameters,
            network,
        };
        spiking_net.construct(&mut rng)?;
        Ok(spiking_net)
    }

    fn construct<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), SNNError> {
        let population = 0..self.total_neurons();
        let (excitatory, inhibitory, observed) = (
            self.excitatory_range(),
            self.inhibitory_range(),
            self.observed_range(),
        );

        self.network
            .set_parameters(excitatory.clone(), &self.exc_parameters)?;
        self.network
            .set_parameters(inhibitory.clone(), &self.inh_parameters)?;
        self.network.set_parameters(observed, &self.parameters)?;

        let exc_proj = Projection::all_to_all(
            excitatory,
            population.clone(),
            Target::Excitatory,
            self.config.e_weight_max,
            self.config.self_connections,
            rng,
        )?;
        self.network.add_projection(exc_proj)?;

        let inh_proj = Projection::all_to_all(
            inhibitory,
            population,
            Target::Inhibitory,
            self.config.i_weight_max,
            self.config.self_connections,
            rng,
        )?;
        self.network.add_projection(inh_proj)?;

        self.network.compile()?;
        self.network.attach_monitor(self.config.record_voltage);

        log::info!(
            "Spiking network constructed: {} excitatory, {} inhibitory, {} observed neurons",
            self.config.e_neurons,
            self.config.i_neurons,
            self.config.n_neurons
        );
        Ok(())
    }

    pub fn config(&self) -> &SpikingNetConfig {
        &self.config
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Returns the resolved parameters of the observed population.
    pub fn parameters(&self) -> &PopulationParameters {
        &self.parameters
    }

    pub fn total_neurons(&self) -> usize {
        self.config.total_neurons()
    }

    /// Returns the IDs of the excitatory neurons.
    pub fn excitatory_range(&self) -> Range<usize> {
        0..self.config.e_neurons
    }

    /// Returns the IDs of the inhibitory neurons.
    pub fn inhibitory_range(&self) -> Range<usize> {
        self.config.e_neurons..self.config.e_neurons + self.config.i_neurons
    }

    /// Returns the IDs of the observed neurons.
    pub fn observed_range(&self) -> Range<usize> {
        self.config.e_neurons + self.config.i_neurons..self.total_neurons()
    }

    /// Simulate the network for the given time (in ms) and measure the observed population.
    ///
    /// Every call only reports the activity produced during that call; spike times are on the network clock,
    /// which keeps running across calls.
    pub fn run(&mut self, time: f64) -> Result<RunOutput, SNNError> {
        self.network.simulate(time)?;

        let recording = self.network.take_recording();
        let raster = observed_spikes(
            &recording.raster,
            self.total_neurons(),
            self.config.n_neurons,
            self.config.include_boundary_neuron,
            self.config.initial_transient,
        );
        let mean_firing_rate = raster.mean_firing_rate(time);

        match mean_firing_rate {
            Some(rate) => log::info!(
                "{} spikes from the observed population, mean firing rate {:.3} Hz",
                raster.len(),
                rate
            ),
            None => log::warn!("No spike from the observed population during the run"),
        }

        let observed = self.observed_range();
        let voltages = match recording.voltages.is_empty() {
            true => vec![],
            false => recording.voltages[observed].to_vec(),
        };

        Ok(RunOutput {
            raster,
            mean_firing_rate,
            voltages,
        })
    }
}
