use std::collections::HashSet;

use spiking_isi::core::parameters::ParameterSet;
use spiking_isi::spiking_net::{SpikingNet, SpikingNetConfig};

const SEED: u64 = 42;

fn regular_spiking() -> ParameterSet {
    ParameterSet::new()
        .with("a", 0.02)
        .with("b", 0.2)
        .with("c", -65.0)
        .with("d", 8.0)
}

fn small_config(noise: f64) -> SpikingNetConfig {
    let mut config = SpikingNetConfig::new(10, regular_spiking(), noise);
    config.e_neurons = 80;
    config.i_neurons = 20;
    config.seed = Some(SEED);
    config
}

#[test]
fn test_run_measures_observed_population() {
    let mut spiking_net = SpikingNet::build(small_config(50.0)).unwrap();
    let output = spiking_net.run(200.0).unwrap();

    assert!(!output.raster.is_empty());
    assert!(output
        .raster
        .neuron_ids()
        .iter()
        .all(|&id| id > 100 && id < 110));
    assert!(output.raster.times().iter().all(|&t| t > 0.0 && t < 200.0));

    // mean number of spikes per firing neuron, in Hz
    let num_firing = output
        .raster
        .neuron_ids()
        .iter()
        .collect::<HashSet<_>>()
        .len();
    let expected = output.raster.len() as f64 / num_firing as f64 / 200.0 * 1000.0;
    let rate = output.mean_firing_rate.unwrap();
    assert!((rate - expected).abs() < 1e-9);
}

#[test]
fn test_run_silent_population() {
    let mut config = small_config(0.0);
    config.e_weight_max = 0.0;
    config.i_weight_max = 0.0;
    let mut spiking_net = SpikingNet::build(config).unwrap();
    let output = spiking_net.run(200.0).unwrap();

    assert!(output.raster.is_empty());
    assert_eq!(output.mean_firing_rate, None);
}

#[test]
fn test_run_only_returns_new_activity() {
    let mut spiking_net = SpikingNet::build(small_config(50.0)).unwrap();

    let first = spiking_net.run(100.0).unwrap();
    let second = spiking_net.run(100.0).unwrap();

    assert!(first.raster.times().iter().all(|&t| t < 100.0));
    assert!(second
        .raster
        .times()
        .iter()
        .all(|&t| t >= 100.0 && t < 200.0));
    assert_eq!(spiking_net.network().time(), 200.0);

    // one voltage sample per observed neuron and per step of the call
    assert_eq!(second.voltages.len(), 10);
    assert!(second.voltages.iter().all(|trace| trace.len() == 100));
}

#[test]
fn test_run_without_voltage() {
    let mut config = small_config(50.0);
    config.record_voltage = false;
    let mut spiking_net = SpikingNet::build(config).unwrap();
    let output = spiking_net.run(50.0).unwrap();
    assert!(output.voltages.is_empty());
}

#[test]
fn test_initial_transient() {
    let mut config = small_config(50.0);
    config.initial_transient = 150.0;
    let mut spiking_net = SpikingNet::build(config).unwrap();
    let output = spiking_net.run(200.0).unwrap();
    assert!(output.raster.times().iter().all(|&t| t > 150.0));
}

#[test]
fn test_reproducibility() {
    let run = || {
        let mut spiking_net = SpikingNet::build(small_config(10.0)).unwrap();
        spiking_net.run(100.0).unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_independent_networks() {
    let mut first = SpikingNet::build(small_config(10.0)).unwrap();
    let mut second = SpikingNet::build(small_config(10.0)).unwrap();

    // advancing one network does not affect the other
    first.run(50.0).unwrap();
    assert_eq!(second.network().time(), 0.0);
    second.run(50.0).unwrap();
    assert_eq!(first.network().time(), 50.0);
}

#[test]
fn test_config_save_and_load() {
    let mut config = small_config(2.5);
    config.parameters.insert("v", vec![-70.0; 10]);
    config.self_connections = false;

    let file = tempfile::NamedTempFile::new().unwrap();
    config.save_to(file.path()).unwrap();
    let loaded = SpikingNetConfig::load_from(file.path()).unwrap();
    assert_eq!(loaded, config);

    let spiking_net = SpikingNet::build(loaded).unwrap();
    assert_eq!(spiking_net.network().neuron_ref(105).unwrap().v(), -70.0);
}
