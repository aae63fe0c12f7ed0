//! Error types for coordination analysis

use cshm_algos::ShapeError;
use thiserror::Error;

/// Errors that abort a coordination analysis run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Metal index {index} is out of bounds ({len} atoms)")]
    MetalIndexOutOfBounds { index: usize, len: usize },

    #[error("Atom index {index} is out of bounds ({len} atoms)")]
    AtomIndexOutOfBounds { index: usize, len: usize },

    #[error("No coordinating atoms given")]
    EmptyCoordination,

    #[error("Atom {0} is listed more than once as coordinating")]
    DuplicateAtom(usize),

    #[error("Metal atom {0} cannot coordinate itself")]
    MetalInCoordination(usize),

    /// Coordinating atom sits on the metal position
    #[error("Coordinating atom {atom_index} coincides with the metal center")]
    DegenerateInput { atom_index: usize },

    #[error("Invalid element symbol: {0}")]
    InvalidElement(String),

    #[error("No reference geometries for coordination number {0}")]
    UnsupportedCoordinationNumber(usize),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Shape(#[from] ShapeError),
}

impl AnalysisError {
    pub fn atom_out_of_bounds(index: usize, len: usize) -> Self {
        AnalysisError::AtomIndexOutOfBounds { index, len }
    }

    pub fn degenerate(atom_index: usize) -> Self {
        AnalysisError::DegenerateInput { atom_index }
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(e: serde_json::Error) -> Self {
        AnalysisError::Config(e.to_string())
    }
}

/// Result type for coordination analysis
pub type AnalysisResult<T> = Result<T, AnalysisError>;
