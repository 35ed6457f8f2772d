//! Spike related structures.
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::SNNError;

/// An output spike, i.e., a spike emitted by a neuron.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct Spike {
    /// The ID of the neuron producing the spike.
    pub neuron_id: usize,
    /// The time at which the spike is produced.
    pub time: f64,
}

impl Spike {
    pub fn new(neuron_id: usize, time: f64) -> Self {
        Spike { neuron_id, time }
    }
}

/// A raster, i.e., two parallel sequences of spike times and emitting neuron IDs.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct Raster {
    times: Vec<f64>,
    neuron_ids: Vec<usize>,
}

impl Raster {
    /// Create a raster from parallel sequences of spike times and neuron IDs.
    /// The function returns an error if the lengths differ or if a time is negative or not finite.
    pub fn new(times: Vec<f64>, neuron_ids: Vec<usize>) -> Result<Self, SNNError> {
        if times.len() != neuron_ids.len() {
            return Err(SNNError::IncompatibleRaster(format!(
                "{} spike times for {} neuron ids",
                times.len(),
                neuron_ids.len()
            )));
        }
        if let Some(t) = times.iter().find(|t| !t.is_finite() || **t < 0.0) {
            return Err(SNNError::IncompatibleRaster(format!(
                "Invalid spike time: {}",
                t
            )));
        }
        Ok(Raster { times, neuron_ids })
    }

    /// Create a raster from a collection of spikes, keeping their order.
    pub fn from_spikes(spikes: &[Spike]) -> Self {
        let (times, neuron_ids): (Vec<f64>, Vec<usize>) = spikes
            .iter()
            .map(|spike| (spike.time, spike.neuron_id))
            .unzip();
        Raster { times, neuron_ids }
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn neuron_ids(&self) -> &[usize] {
        &self.neuron_ids
    }

    /// Returns the number of spikes in the raster.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// An iterator over the spikes of the raster.
    pub fn iter(&self) -> impl Iterator<Item = Spike> + '_ {
        self.times
            .iter()
            .zip(self.neuron_ids.iter())
            .map(|(&time, &neuron_id)| Spike { neuron_id, time })
    }

    /// Returns a new raster with the spikes satisfying the predicate, in their original order.
    pub fn filter<P: Fn(&Spike) -> bool>(&self, predicate: P) -> Self {
        let spikes: Vec<Spike> = self.iter().filter(|spike| predicate(spike)).collect();
        Raster::from_spikes(&spikes)
    }

    /// Returns the spikes of neurons with ID above the threshold.
    /// The threshold neuron itself is only kept if `inclusive` is true.
    pub fn above_neuron(&self, threshold: usize, inclusive: bool) -> Self {
        self.filter(|spike| {
            spike.neuron_id > threshold || (inclusive && spike.neuron_id == threshold)
        })
    }

    /// Returns the spikes strictly after the given time.
    pub fn after(&self, time: f64) -> Self {
        self.filter(|spike| spike.time > time)
    }

    /// Returns the number of spikes of every neuron appearing in the raster.
    /// Neurons are sorted by decreasing number of spikes, ties being broken by order of first appearance.
    pub fn spike_counts(&self) -> Vec<(usize, usize)> {
        let mut counts: Vec<(usize, usize)> = vec![];
        let mut positions = std::collections::HashMap::new();
        for &neuron_id in self.neuron_ids.iter() {
            let position = *positions.entry(neuron_id).or_insert_with(|| {
                counts.push((neuron_id, 0));
                counts.len() - 1
            });
            counts[position].1 += 1;
        }
        counts
            .into_iter()
            .sorted_by(|(_, n1), (_, n2)| n2.cmp(n1))
            .collect()
    }

    /// Returns the population spike counts in consecutive bins of the given width, starting at `start`.
    /// Spikes outside `[start, start + duration)` are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use spiking_isi::core::spikes::Raster;
    ///
    /// let raster = Raster::new(vec![0.5, 1.0, 3.0, 9.5], vec![1, 2, 1, 2]).unwrap();
    /// assert_eq!(raster.histogram(0.0, 10.0, 2.5).unwrap(), vec![2, 1, 0, 1]);
    /// ```
    pub fn histogram(&self, start: f64, duration: f64, bin: f64) -> Result<Vec<usize>, SNNError> {
        if !(bin > 0.0 && bin.is_finite()) {
            return Err(SNNError::InvalidParameters(
                "Histogram bin width must be positive".to_string(),
            ));
        }
        if !(duration >= 0.0 && duration.is_finite()) {
            return Err(SNNError::InvalidParameters(
                "Histogram duration must be non-negative".to_string(),
            ));
        }

        let num_bins = (duration / bin).ceil() as usize;
        let mut histogram = vec![0; num_bins];
        for &t in self.times.iter() {
            if t < start || t >= start + duration {
                continue;
            }
            let index = (((t - start) / bin) as usize).min(num_bins - 1);
            histogram[index] += 1;
        }
        Ok(histogram)
    }

    /// Returns the mean firing rate (in Hz) of the neurons appearing in the raster over a duration in milliseconds.
    /// Only neurons firing at least once are accounted for.
    /// Returns `None` if the raster is empty or the duration is zero.
    pub fn mean_firing_rate(&self, duration: f64) -> Option<f64> {
        let counts = self.spike_counts();
        if counts.is_empty() || duration <= 0.0 {
            return None;
        }
        let mean_count =
            counts.iter().map(|(_, n)| *n as f64).sum::<f64>() / counts.len() as f64;
        Some(mean_count / duration * 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raster() -> Raster {
        Raster::new(
            vec![0.0, 1.0, 2.0, 2.0, 5.0, 7.5],
            vec![3, 3, 7, 9, 3, 7],
        )
        .unwrap()
    }

    #[test]
    fn test_new_raster() {
        assert!(matches!(
            Raster::new(vec![0.0, 1.0], vec![0]),
            Err(SNNError::IncompatibleRaster(_))
        ));
        assert!(matches!(
            Raster::new(vec![-1.0], vec![0]),
            Err(SNNError::IncompatibleRaster(_))
        ));
        assert!(matches!(
            Raster::new(vec![f64::NAN], vec![0]),
            Err(SNNError::IncompatibleRaster(_))
        ));
        assert!(Raster::new(vec![], vec![]).unwrap().is_empty());
    }

    #[test]
    fn test_from_spikes() {
        let raster = Raster::from_spikes(&[Spike::new(4, 1.5), Spike::new(2, 0.5)]);
        assert_eq!(raster.times(), &[1.5, 0.5]);
        assert_eq!(raster.neuron_ids(), &[4, 2]);
        assert_eq!(raster.iter().nth(1), Some(Spike::new(2, 0.5)));
    }

    #[test]
    fn test_above_neuron() {
        let raster = raster();
        let strict = raster.above_neuron(7, false);
        assert_eq!(strict.neuron_ids(), &[9]);

        let inclusive = raster.above_neuron(7, true);
        assert_eq!(inclusive.neuron_ids(), &[7, 9, 7]);
        assert_eq!(inclusive.times(), &[2.0, 2.0, 7.5]);
    }

    #[test]
    fn test_after() {
        let raster = raster().after(0.0);
        assert_eq!(raster.len(), 5);
        assert_eq!(raster.times()[0], 1.0);

        assert!(raster.after(10.0).is_empty());
    }

    #[test]
    fn test_spike_counts() {
        assert_eq!(raster().spike_counts(), vec![(3, 3), (7, 2), (9, 1)]);

        // ties are broken by order of first appearance
        let raster = Raster::new(vec![0.0, 1.0, 2.0, 3.0], vec![5, 1, 1, 5]).unwrap();
        assert_eq!(raster.spike_counts(), vec![(5, 2), (1, 2)]);

        assert!(Raster::default().spike_counts().is_empty());
    }

    #[test]
    fn test_histogram() {
        let raster = raster();
        assert_eq!(raster.histogram(0.0, 10.0, 2.5).unwrap(), vec![4, 0, 1, 1]);
        assert_eq!(raster.histogram(2.0, 4.0, 1.0).unwrap(), vec![2, 0, 0, 1]);
        assert_eq!(raster.histogram(0.0, 0.0, 1.0).unwrap(), Vec::<usize>::new());
        assert!(raster.histogram(0.0, 10.0, 0.0).is_err());
    }

    #[test]
    fn test_mean_firing_rate() {
        // (3 + 2 + 1) / 3 spikes over 100 ms
        let rate = raster().mean_firing_rate(100.0).unwrap();
        assert!((rate - 20.0).abs() < 1e-9);

        assert_eq!(Raster::default().mean_firing_rate(100.0), None);
        assert_eq!(raster().mean_firing_rate(0.0), None);
    }
}
