//! Global rotation search for continuous shape measures
//!
//! The measure surface over SO(3) is piecewise smooth with many local
//! minima (one per correspondence). The search runs five stages in order,
//! each threading the incumbent best into the next:
//!
//! 1. Kabsch seed from the identity assignment
//! 2. 18 canonical orientations
//! 3. Coarse Euler-angle grid
//! 4. Simulated annealing with restarts
//! 5. Local refinement
//!
//! An iterated-Kabsch polish runs after stages 1, 2, 3 and 5 so the final
//! rotation is the least-squares optimum for the winning correspondence.
//! The search stops early once the incumbent drops below [`NEAR_PERFECT`].

mod config;
mod control;
pub mod stages;

pub use config::{OptimizerConfig, SearchBudget, SearchMode, EXCELLENT, NEAR_PERFECT};
pub use control::{CancelToken, Progress, ProgressFn, SearchControl, Stage};

use log::{debug, trace};

use crate::linalg::mat3::rotate_points;
use crate::measure::normalize_points;
use crate::shapes::ReferenceGeometry;
use crate::{AlgoResult, ShapeError, ShapeResult};
use stages::{Candidate, Problem, StageOutcome};

/// Best rotation found by [`optimize_rotation`]
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub best: Candidate,
    /// Number of measure evaluations performed
    pub evaluations: usize,
    pub cancelled: bool,
    /// Last stage that ran
    pub last_stage: Stage,
}

/// Search SO(3) for the rotation minimizing the shape measure.
///
/// `actual` and `reference` must already be unit-normalized and of equal
/// length. Cancellation returns the best candidate found so far.
pub fn optimize_rotation(
    actual: &[[f64; 3]],
    reference: &[[f64; 3]],
    config: &OptimizerConfig,
    control: &SearchControl,
) -> AlgoResult<SearchResult> {
    if actual.len() != reference.len() {
        return Err(ShapeError::size_mismatch(reference.len(), actual.len()));
    }
    if actual.is_empty() {
        return Err(ShapeError::EmptyPointSet);
    }

    let problem = Problem { actual, reference };
    let budget = config.effective_budget();
    let mut rng = config.rng();
    let mut evaluations = 0;

    let finish = |best: Candidate, evaluations: usize, cancelled: bool, last_stage: Stage| {
        control.report(Stage::Complete, 1.0, best.measure);
        debug!(
            "rotation search finished after {:?}: measure {:.6}, {} evaluations{}",
            last_stage,
            best.measure,
            evaluations,
            if cancelled { " (cancelled)" } else { "" }
        );
        Ok(SearchResult {
            best,
            evaluations,
            cancelled,
            last_stage,
        })
    };

    // Deterministic stages, each followed by a polish
    let (best, cancelled) = settle(&problem, stages::kabsch_seed(&problem, control), &mut evaluations);
    if cancelled || best.measure < NEAR_PERFECT {
        return finish(best, evaluations, cancelled, Stage::KabschSeed);
    }
    let out = stages::canonical_orientations(&problem, best, control);
    let (best, cancelled) = settle(&problem, out, &mut evaluations);
    if cancelled || best.measure < NEAR_PERFECT {
        return finish(best, evaluations, cancelled, Stage::CanonicalOrientations);
    }
    let out = stages::grid_search(&problem, best, &budget, control);
    let (best, cancelled) = settle(&problem, out, &mut evaluations);
    if cancelled || best.measure < NEAR_PERFECT {
        return finish(best, evaluations, cancelled, Stage::GridSearch);
    }

    // Below EXCELLENT annealing runs no restarts and refinement follows directly
    let out = stages::anneal(&problem, best, &budget, &mut rng, control);
    evaluations += out.evaluations;
    trace!("{:?}: incumbent {:.6}", Stage::Annealing, out.best.measure);
    if out.cancelled {
        return finish(out.best, evaluations, true, Stage::Annealing);
    }

    let out = stages::refine(&problem, out.best, &budget, &mut rng, control);
    evaluations += out.evaluations;
    let polished = stages::polish(&problem, out.best);
    evaluations += polished.evaluations;
    finish(polished.best, evaluations, out.cancelled, Stage::Refinement)
}

/// Polish a stage's incumbent and tally evaluations
fn settle(problem: &Problem, out: StageOutcome, evaluations: &mut usize) -> (Candidate, bool) {
    let polished = stages::polish(problem, out.best);
    *evaluations += out.evaluations + polished.evaluations;
    trace!("stage incumbent {:.6} after polish", polished.best.measure);
    (polished.best, out.cancelled)
}

/// Shape measure of `actual` against one reference geometry.
///
/// `actual` holds center-relative positions; they are normalized here.
pub fn evaluate_geometry(
    actual: &[[f64; 3]],
    reference: &ReferenceGeometry,
    mode: SearchMode,
) -> AlgoResult<ShapeResult> {
    evaluate_geometry_with(actual, reference, &OptimizerConfig::new(mode), &SearchControl::none())
}

/// [`evaluate_geometry`] with an explicit config, cancellation and progress hooks
pub fn evaluate_geometry_with(
    actual: &[[f64; 3]],
    reference: &ReferenceGeometry,
    config: &OptimizerConfig,
    control: &SearchControl,
) -> AlgoResult<ShapeResult> {
    let actual = normalize_points(actual)?;
    evaluate_normalized(&actual, reference, config, control)
}

/// Evaluate already-normalized points (size is still checked)
pub(crate) fn evaluate_normalized(
    actual: &[[f64; 3]],
    reference: &ReferenceGeometry,
    config: &OptimizerConfig,
    control: &SearchControl,
) -> AlgoResult<ShapeResult> {
    let cn = reference.coordination_number();
    if actual.len() != cn {
        return Err(ShapeError::size_mismatch(cn, actual.len()));
    }
    let vertices = reference.unit_vertices();
    let search = optimize_rotation(actual, &vertices, config, control)?;
    let best = search.best;
    Ok(ShapeResult {
        geometry_name: reference.name.to_string(),
        measure: best.measure.max(0.0),
        aligned_coordinates: rotate_points(&best.rotation, actual),
        rotation: best.rotation,
        correspondence: best.correspondence,
        cancelled: search.cancelled,
    })
}
