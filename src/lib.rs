//! This crate simulates networks of Izhikevich neurons and extracts inter-spike intervals (ISIs) from their activity.
//!
//! # Simulating Networks
//!
//! An observed population is embedded in a background of excitatory and inhibitory neurons,
//! both projecting all-to-all onto the whole network.
//!
//! ```rust
//! use spiking_isi::core::parameters::ParameterSet;
//! use spiking_isi::spiking_net::{SpikingNet, SpikingNetConfig};
//!
//! // 10 regular spiking neurons with noise 5.0, embedded in 80 excitatory and 20 inhibitory neurons
//! let parameters = ParameterSet::new()
//!     .with("a", 0.02)
//!     .with("b", 0.2)
//!     .with("c", -65.0)
//!     .with("d", 8.0);
//! let mut config = SpikingNetConfig::new(10, parameters, 5.0);
//! config.e_neurons = 80;
//! config.i_neurons = 20;
//! config.seed = Some(42);
//!
//! let mut spiking_net = SpikingNet::build(config).unwrap();
//! let output = spiking_net.run(200.0).unwrap();
//!
//! // only the observed neurons are measured
//! assert!(output.raster.neuron_ids().iter().all(|&id| id > 100 && id < 110));
//! assert_eq!(output.mean_firing_rate.is_some(), !output.raster.is_empty());
//! ```
//!
//! # Extracting Inter-Spike Intervals
//!
//! ```rust
//! use spiking_isi::raster::process_raster;
//!
//! let processed = process_raster(&[0.0, 1.0, 2.0, 5.0], &[3, 3, 7, 3]).unwrap();
//!
//! // neurons are sorted by decreasing number of spikes
//! assert_eq!(processed.neuron_ids, vec![3, 7]);
//! assert_eq!(processed.isi_series, vec![vec![1.0, 4.0], vec![]]);
//! ```

pub mod core;
pub mod error;
pub mod raster;
pub mod spiking_net;
