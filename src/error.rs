//! Error module for the spiking_isi library.
use std::error::Error;
use std::fmt;

/// Error types for the library.
#[derive(Debug, PartialEq)]
pub enum SNNError {
    /// Error for invalid parameters, e.g., a negative weight bound or a non-positive time step.
    InvalidParameters(String),
    /// Error for a required key missing from a population parameter set.
    MissingParameter(String),
    /// Error for a per-neuron parameter array whose length does not match the population size.
    ParameterLengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    /// Error for spike times and neuron ids that cannot form a raster.
    IncompatibleRaster(String),
    /// Error for out of bounds access, e.g., a population view outside the network.
    OutOfBounds(String),
    /// Error while compiling the network.
    CompilationError(String),
    /// Simulation requested on a network that was never compiled.
    NotCompiled,
    /// Error for I/O operations.
    IOError(String),
}

impl fmt::Display for SNNError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SNNError::InvalidParameters(e) => write!(f, "Invalid parameters: {}", e),
            SNNError::MissingParameter(name) => {
                write!(f, "Missing required parameter: {}", name)
            }
            SNNError::ParameterLengthMismatch {
                name,
                expected,
                found,
            } => write!(
                f,
                "Parameter {} has {} values but the population has {} neurons",
                name, found, expected
            ),
            SNNError::IncompatibleRaster(e) => write!(f, "Incompatible raster: {}", e),
            SNNError::OutOfBounds(e) => write!(f, "Index out of bounds: {}", e),
            SNNError::CompilationError(e) => write!(f, "Compilation error: {}", e),
            SNNError::NotCompiled => write!(f, "The network must be compiled before simulation"),
            SNNError::IOError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl Error for SNNError {}
