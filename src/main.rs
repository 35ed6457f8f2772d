use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use spiking_isi::error::SNNError;
use spiking_isi::raster::save_isis;
use spiking_isi::spiking_net::{SpikingNet, SpikingNetConfig, DEFAULT_RUN_TIME};

/// Simulate an observed population of Izhikevich neurons and save its inter-spike intervals.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON configuration of the network
    config: PathBuf,

    /// Simulated time (in ms)
    #[arg(short, long, default_value_t = DEFAULT_RUN_TIME)]
    time: f64,

    /// Output file for the inter-spike intervals, one line per neuron
    #[arg(short, long, default_value = "isis.txt")]
    output: PathBuf,

    /// Override the seed of the configuration
    #[arg(long)]
    seed: Option<u64>,
}

fn run(args: Args) -> Result<(), SNNError> {
    let mut config = SpikingNetConfig::load_from(&args.config)?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let mut spiking_net = SpikingNet::build(config)?;
    let output = spiking_net.run(args.time)?;

    let processed = output.raster.process();
    save_isis(&processed.isi_series, &args.output)?;

    match output.mean_firing_rate {
        Some(rate) => println!(
            "{} neurons fired {} spikes, mean firing rate {:.3} Hz",
            processed.num_neurons(),
            output.raster.len(),
            rate
        ),
        None => println!("The observed population did not fire"),
    }
    log::info!(
        "{} inter-spike intervals saved to {}",
        processed.isis.len(),
        args.output.display()
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
