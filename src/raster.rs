//! Post-processing of rasters into spike trains and inter-spike intervals (ISIs).
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::core::spikes::Raster;
use crate::error::SNNError;

/// The spike trains and inter-spike intervals extracted from a raster.
/// All per-neuron vectors share the same order: by decreasing number of spikes.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct ProcessedRaster {
    /// The neuron IDs, one per train.
    pub neuron_ids: Vec<usize>,
    /// The spike times of each neuron, in their order of appearance in the raster.
    pub trains: Vec<Vec<f64>>,
    /// The successive differences of each train.
    pub isi_series: Vec<Vec<f64>>,
    /// All intervals, concatenated neuron after neuron.
    pub isis: Vec<f64>,
}

impl ProcessedRaster {
    /// Returns the number of neurons in the processed raster.
    pub fn num_neurons(&self) -> usize {
        self.neuron_ids.len()
    }
}

/// Returns the successive differences of a spike train.
/// A train with less than two spikes has no interval.
pub fn isi(train: &[f64]) -> Vec<f64> {
    train.iter().tuple_windows().map(|(t1, t2)| t2 - t1).collect()
}

impl Raster {
    /// Split the raster into per-neuron spike trains and compute their inter-spike intervals.
    ///
    /// Neurons are ordered by decreasing number of spikes (ties by first appearance).
    /// The times of each train are kept in their raster order: the intervals are only meaningful if the raster is chronological.
    pub fn process(&self) -> ProcessedRaster {
        let groups = self
            .iter()
            .into_group_map_by(|spike| spike.neuron_id);

        let mut processed = ProcessedRaster::default();
        for (neuron_id, _) in self.spike_counts() {
            let train: Vec<f64> = groups
                .get(&neuron_id)
                .map(|spikes| spikes.iter().map(|spike| spike.time).collect())
                .unwrap_or_default();
            let intervals = isi(&train);

            processed.isis.extend_from_slice(&intervals);
            processed.isi_series.push(intervals);
            processed.trains.push(train);
            processed.neuron_ids.push(neuron_id);
        }
        processed
    }
}

/// Split parallel sequences of spike times and neuron IDs into per-neuron spike trains and inter-spike intervals.
///
/// # Examples
///
/// ```
/// use spiking_isi::raster::process_raster;
///
/// let processed = process_raster(&[0.0, 1.0, 2.0, 5.0], &[3, 3, 7, 3]).unwrap();
/// assert_eq!(processed.neuron_ids, vec![3, 7]);
/// assert_eq!(processed.trains, vec![vec![0.0, 1.0, 5.0], vec![2.0]]);
/// assert_eq!(processed.isi_series, vec![vec![1.0, 4.0], vec![]]);
/// assert_eq!(processed.isis, vec![1.0, 4.0]);
/// ```
pub fn process_raster(times: &[f64], neuron_ids: &[usize]) -> Result<ProcessedRaster, SNNError> {
    let raster = Raster::new(times.to_vec(), neuron_ids.to_vec())?;
    Ok(raster.process())
}

/// Write inter-spike interval series to a file, one line per series with comma-separated values.
/// An existing file is overwritten.
pub fn save_isis<P: AsRef<Path>>(isi_series: &[Vec<f64>], path: P) -> Result<(), SNNError> {
    let file = File::create(path).map_err(|e| SNNError::IOError(e.to_string()))?;
    let mut writer = BufWriter::new(file);
    for series in isi_series.iter() {
        writeln!(
            writer,
            "{}",
            series.iter().map(|isi| format!("{:?}", isi)).join(", ")
        )
        .map_err(|e| SNNError::IOError(e.to_string()))?;
    }
    writer.flush().map_err(|e| SNNError::IOError(e.to_string()))
}

/// Read inter-spike interval series written by [`save_isis`].
pub fn load_isis<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<f64>>, SNNError> {
    let file = File::open(path).map_err(|e| SNNError::IOError(e.to_string()))?;
    let reader = BufReader::new(file);

    reader
        .lines()
        .map(|line| -> Result<Vec<f64>, SNNError> {
            let line = line.map_err(|e| SNNError::IOError(e.to_string()))?;
            if line.trim().is_empty() {
                return Ok(vec![]);
            }
            line.split(',')
                .map(|value| {
                    value.trim().parse::<f64>().map_err(|e| {
                        SNNError::IOError(format!("Invalid interval {:?}: {}", value, e))
                    })
                })
                .collect()
        })
        .collect()
}
