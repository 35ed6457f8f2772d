use std::fs;

use spiking_isi::core::spikes::Raster;
use spiking_isi::error::SNNError;
use spiking_isi::raster::{load_isis, process_raster, save_isis};

#[test]
fn test_save_isis_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("isis.txt");

    save_isis(&[vec![1.0, 2.5], vec![3.0]], &path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "1.0, 2.5\n3.0\n");

    // the file is overwritten, and empty series yield empty lines
    save_isis(&[vec![], vec![0.1, 12.0]], &path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "\n0.1, 12.0\n");
}

#[test]
fn test_load_isis() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("isis.txt");

    let series = vec![vec![1.0, 2.5, 0.30000000000000004], vec![], vec![7.0]];
    save_isis(&series, &path).unwrap();
    assert_eq!(load_isis(&path).unwrap(), series);

    fs::write(&path, "1.0, abc\n").unwrap();
    assert!(matches!(load_isis(&path), Err(SNNError::IOError(_))));
}

#[test]
fn test_save_isis_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("isis.txt");
    assert!(matches!(
        save_isis(&[vec![1.0]], &path),
        Err(SNNError::IOError(_))
    ));
}

#[test]
fn test_process_raster_properties() {
    let times = [0.0, 0.5, 1.0, 1.5, 2.0, 3.0, 4.5, 6.0, 6.5];
    let neuron_ids = [4, 2, 4, 9, 2, 4, 4, 9, 1];
    let processed = process_raster(&times, &neuron_ids).unwrap();

    assert_eq!(processed.neuron_ids, vec![4, 2, 9, 1]);
    assert_eq!(processed.trains.len(), 4);
    for (train, isis) in processed.trains.iter().zip(processed.isi_series.iter()) {
        assert_eq!(isis.len(), train.len().saturating_sub(1));
    }

    let concatenated: Vec<f64> = processed.isi_series.concat();
    assert_eq!(processed.isis, concatenated);
    assert_eq!(processed.isis, vec![1.0, 2.0, 1.5, 1.5, 4.5]);
}

#[test]
fn test_process_then_save() {
    let raster = Raster::new(vec![1.0, 2.0, 4.0, 4.5], vec![991, 995, 991, 995]).unwrap();
    let processed = raster.process();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("isis.txt");
    save_isis(&processed.isi_series, &path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "3.0\n2.5\n");
}
