//! Coordination Shape Analysis
//!
//! Molecular front end for the continuous shape measure engine in
//! `cshm-algos`. Given the atoms of a complex, a metal center and its
//! coordinating atoms, this crate:
//!
//! - [`detect_rings`] - finds planar π-bound rings and partitions the
//!   coordinating atoms into [`LigandGroups`]
//! - [`detect_pattern`] - classifies the complex as sandwich, piano stool,
//!   macrocycle or general
//! - [`build_model`] - turns the pattern into sites (atoms or ring
//!   centroids) and the candidate reference geometries
//! - [`analyze`] - runs all of the above and ranks the candidates
//!
//! # Example
//!
//! ```rust
//! use cshm_mol::{analyze, AnalysisConfig, Atom, SearchControl};
//!
//! let atoms = vec![
//!     Atom::from_symbol("Ni", 0.0, 0.0, 0.0).unwrap(),
//!     Atom::from_symbol("C", 1.8, 0.0, 0.0).unwrap(),
//!     Atom::from_symbol("C", 0.0, 1.8, 0.0).unwrap(),
//!     Atom::from_symbol("C", -1.8, 0.0, 0.0).unwrap(),
//!     Atom::from_symbol("C", 0.0, -1.8, 0.0).unwrap(),
//! ];
//! let mut config = AnalysisConfig::default();
//! config.optimizer.seed = Some(1);
//!
//! let analysis = analyze(&atoms, 0, &[1, 2, 3, 4], &config, &SearchControl::none()).unwrap();
//! assert_eq!(analysis.best().unwrap().geometry_name, "Square planar");
//! ```

mod analysis;
mod atom;
pub mod builder;
mod config;
mod element;
mod error;
pub mod pattern;
pub mod rings;

pub use analysis::{analyze, validate_coordination, Analysis};
pub use atom::Atom;
pub use builder::{build_model, CoordinationModel, PianoStoolOptions, Site};
pub use config::AnalysisConfig;
pub use element::{hill_formula, Element};
pub use error::{AnalysisError, AnalysisResult};
pub use pattern::{detect_pattern, Pattern, PatternMatch, PatternParams, PatternScores};
pub use rings::{detect_rings, Hapticity, LigandGroup, LigandGroups, Ring, RingDetectionParams, RingSizeClass};

// Engine types callers need alongside an analysis
pub use cshm_algos::{
    CancelToken, OptimizerConfig, Progress, Ranking, ReferenceGeometry, SearchControl, SearchMode, ShapeError,
    ShapeResult, SkippedGeometry, Stage,
};
