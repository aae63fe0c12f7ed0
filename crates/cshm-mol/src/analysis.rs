//! End-to-end coordination shape analysis

use ahash::AHashSet;
use cshm_algos::{rank_geometries, rank_geometries_parallel, Ranking, ReferenceGeometry, SearchControl, ShapeResult};
use log::{info, warn};

use crate::atom::Atom;
use crate::builder::{build_model, CoordinationModel};
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, AnalysisResult};
use crate::pattern::{detect_pattern, PatternMatch};
use crate::rings::{detect_rings, LigandGroups};

/// Closer than this (Å) to the metal counts as sitting on it
const MIN_METAL_DISTANCE: f64 = 1e-8;

/// Check a metal index and its coordinating atom list against `atoms`.
///
/// The list must be non-empty, in bounds, free of duplicates and of the
/// metal itself, and no atom may coincide with the metal.
pub fn validate_coordination(atoms: &[Atom], metal_index: usize, coordinating: &[usize]) -> AnalysisResult<()> {
    let len = atoms.len();
    let metal = atoms
        .get(metal_index)
        .ok_or(AnalysisError::MetalIndexOutOfBounds { index: metal_index, len })?;
    if coordinating.is_empty() {
        return Err(AnalysisError::EmptyCoordination);
    }

    let mut seen = AHashSet::with_capacity(coordinating.len());
    for &i in coordinating {
        let atom = atoms.get(i).ok_or_else(|| AnalysisError::atom_out_of_bounds(i, len))?;
        if i == metal_index {
            return Err(AnalysisError::MetalInCoordination(i));
        }
        if !seen.insert(i) {
            return Err(AnalysisError::DuplicateAtom(i));
        }
        if metal.distance_to(atom) <= MIN_METAL_DISTANCE {
            return Err(AnalysisError::degenerate(i));
        }
    }
    if !metal.element.is_metal() {
        warn!("Center atom {} is {}, not a metal", metal_index, metal.element);
    }
    Ok(())
}

/// Outcome of [`analyze`]
#[derive(Debug, Clone)]
pub struct Analysis {
    pub groups: LigandGroups,
    pub pattern: PatternMatch,
    pub model: CoordinationModel,
    /// Ranking against the pattern's candidate geometries
    pub ranking: Ranking,
    /// Ranking against the full CN set, when requested for piano stools
    pub comparison: Option<Ranking>,
}

impl Analysis {
    pub fn best(&self) -> Option<&ShapeResult> {
        self.ranking.best()
    }

    pub fn coordination_number(&self) -> usize {
        self.model.coordination_number()
    }

    pub fn cancelled(&self) -> bool {
        self.ranking.cancelled() || self.comparison.as_ref().map_or(false, Ranking::cancelled)
    }
}

/// Analyze the coordination shape around `atoms[metal_index]`.
///
/// Detects ring ligands among `coordinating`, classifies the pattern,
/// builds the site model and ranks it against the candidate geometries.
/// Any error aborts the run without a partial ranking.
pub fn analyze(
    atoms: &[Atom],
    metal_index: usize,
    coordinating: &[usize],
    config: &AnalysisConfig,
    control: &SearchControl,
) -> AnalysisResult<Analysis> {
    let groups = detect_rings(atoms, metal_index, coordinating, &config.rings)?;
    let metal = atoms[metal_index].position;
    let pattern = detect_pattern(&groups, atoms, metal, &config.patterns);
    let model = build_model(&pattern, &groups, atoms, metal_index, &config.piano_stool)?;
    info!(
        "{} {}: {} pattern, CN {} ({} rings, {} monodentate)",
        atoms[metal_index].element,
        metal_index,
        pattern.pattern.name(),
        model.coordination_number(),
        groups.ring_count(),
        groups.monodentate_count()
    );

    let rank = |references: &[&'static ReferenceGeometry]| {
        if config.parallel {
            rank_geometries_parallel(&model.points, references, &config.optimizer, control)
        } else {
            rank_geometries(&model.points, references, &config.optimizer, control)
        }
    };
    let ranking = rank(model.candidates.as_slice())?;
    let comparison = if model.comparison.is_empty() {
        None
    } else {
        Some(rank(model.comparison.as_slice())?)
    };

    Ok(Analysis {
        groups,
        pattern,
        model,
        ranking,
        comparison,
    })
}
