//! Core module implementing the simulation engine.
//!
//! It consists of the following components:
//!
//! - [`parameters`]: Population parameter sets and their validation
//! - [`neuron`]: Izhikevich neuron dynamics
//! - [`connection`]: Synaptic targets and all-to-all projections
//! - [`spikes`]: Spikes and rasters
//! - [`monitor`]: Recording of spikes and membrane potentials
//! - [`network`]: The simulation session tying everything together
//!
//! # Examples
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use spiking_isi::core::connection::{Projection, Target};
//! use spiking_isi::core::network::Network;
//! use spiking_isi::core::parameters::PopulationParameters;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//!
//! // A network of 100 excitatory neurons connected all-to-all
//! let mut network = Network::new(100, 1.0, 42).unwrap();
//! network.set_parameters(0..100, &PopulationParameters::excitatory(100, &mut rng)).unwrap();
//! let projection = Projection::all_to_all(0..100, 0..100, Target::Excitatory, 0.5, true, &mut rng).unwrap();
//! network.add_projection(projection).unwrap();
//!
//! network.compile().unwrap();
//! network.attach_monitor(false);
//! network.simulate(100.0).unwrap();
//!
//! let recording = network.take_recording();
//! assert!(recording.raster.times().iter().all(|&t| t < 100.0));
//! ```
pub mod connection;
pub mod monitor;
pub mod network;
pub mod neuron;
pub mod parameters;
pub mod spikes;

/// The membrane potential above which a neuron fires.
pub const FIRING_THRESHOLD: f64 = 30.0;
/// The default initial membrane potential.
pub const V_INIT: f64 = -65.0;
/// The default integration time step (in ms).
pub const TIME_STEP: f64 = 1.0;
/// Minimum number of neurons to parallelize the computation.
pub const MIN_NEURONS_PAR: usize = 100;
