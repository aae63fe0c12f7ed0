//! Ranking an observed point set against many reference geometries

use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::measure::normalize_points;
use crate::optimize::{evaluate_normalized, OptimizerConfig, SearchControl};
use crate::shapes::ReferenceGeometry;
use crate::{AlgoResult, ShapeResult};

/// A reference geometry that could not be evaluated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedGeometry {
    pub geometry_name: String,
    pub reason: String,
}

/// Results for one point set, best match first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ranking {
    pub coordination_number: usize,
    /// Sorted by ascending measure
    pub results: Vec<ShapeResult>,
    pub skipped: Vec<SkippedGeometry>,
}

impl Ranking {
    pub fn best(&self) -> Option<&ShapeResult> {
        self.results.first()
    }

    pub fn get(&self, geometry_name: &str) -> Option<&ShapeResult> {
        self.results.iter().find(|r| r.geometry_name == geometry_name)
    }

    /// True when any search was cut short by cancellation
    pub fn cancelled(&self) -> bool {
        self.results.iter().any(|r| r.cancelled)
    }

    fn from_outcomes(
        coordination_number: usize,
        references: &[&ReferenceGeometry],
        outcomes: Vec<AlgoResult<ShapeResult>>,
    ) -> AlgoResult<Self> {
        let mut ranking = Ranking {
            coordination_number,
            ..Default::default()
        };
        for (reference, outcome) in references.iter().zip(outcomes) {
            match outcome {
                Ok(result) => ranking.results.push(result),
                Err(e) if e.is_per_geometry() => {
                    warn!("Skipping {}: {}", reference.name, e);
                    ranking.skipped.push(SkippedGeometry {
                        geometry_name: reference.name.to_string(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }
        ranking.results.sort_by(ShapeResult::cmp_measure);
        if let Some(best) = ranking.best() {
            info!(
                "CN {}: best match {} ({:.4}) of {} geometries",
                coordination_number,
                best.geometry_name,
                best.measure,
                ranking.results.len()
            );
        }
        Ok(ranking)
    }
}

/// Evaluate `actual` against each reference, sequentially.
///
/// Geometries whose vertex count differs from `actual` are skipped and
/// listed in [`Ranking::skipped`]; a point on the center aborts the run.
/// Seeded configs give each geometry its own derived seed.
pub fn rank_geometries(
    actual: &[[f64; 3]],
    references: &[&ReferenceGeometry],
    config: &OptimizerConfig,
    control: &SearchControl,
) -> AlgoResult<Ranking> {
    let unit = normalize_points(actual)?;
    let outcomes = references
        .iter()
        .enumerate()
        .map(|(i, reference)| evaluate_normalized(&unit, reference, &config.for_index(i), control))
        .collect();
    Ranking::from_outcomes(unit.len(), references, outcomes)
}

/// [`rank_geometries`] with the geometries evaluated in parallel.
///
/// Results are identical to the sequential version for seeded configs.
pub fn rank_geometries_parallel(
    actual: &[[f64; 3]],
    references: &[&ReferenceGeometry],
    config: &OptimizerConfig,
    control: &SearchControl,
) -> AlgoResult<Ranking> {
    let unit = normalize_points(actual)?;
    let outcomes = references
        .par_iter()
        .enumerate()
        .map(|(i, reference)| evaluate_normalized(&unit, reference, &config.for_index(i), control))
        .collect();
    Ranking::from_outcomes(unit.len(), references, outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ShapeError;
    use crate::shapes::{geometries_for_cn, OCTAHEDRAL, SQUARE_PLANAR, TETRAHEDRAL};

    #[test]
    fn test_octahedron_ranks_octahedral_first() {
        let _ = env_logger::builder().is_test(true).try_init();
        let refs = geometries_for_cn(6);
        let config = OptimizerConfig::default().with_seed(3);
        let ranking = rank_geometries(OCTAHEDRAL.vertices, &refs, &config, &SearchControl::none()).unwrap();
        assert_eq!(ranking.coordination_number, 6);
        assert_eq!(ranking.results.len(), refs.len());
        let best = ranking.best().unwrap();
        assert_eq!(best.geometry_name, "Octahedral");
        assert!(best.measure < 1e-6);
        for pair in ranking.results.windows(2) {
            assert!(pair[0].measure <= pair[1].measure);
        }
    }

    #[test]
    fn test_size_mismatch_is_skipped() {
        let refs = [&TETRAHEDRAL, &OCTAHEDRAL, &SQUARE_PLANAR];
        let config = OptimizerConfig::default().with_seed(1);
        let ranking = rank_geometries(TETRAHEDRAL.vertices, &refs, &config, &SearchControl::none()).unwrap();
        assert_eq!(ranking.results.len(), 2);
        assert_eq!(ranking.skipped.len(), 1);
        assert_eq!(ranking.skipped[0].geometry_name, "Octahedral");
        assert_eq!(ranking.best().unwrap().geometry_name, "Tetrahedral");
    }

    #[test]
    fn test_degenerate_input_aborts() {
        let points = [[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let err = rank_geometries(&points, &[&TETRAHEDRAL], &OptimizerConfig::default(), &SearchControl::none())
            .unwrap_err();
        assert_eq!(err, ShapeError::DegenerateInput { index: 1 });
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let distorted = [[1.0, 0.1, 0.0], [0.0, 1.0, 0.2], [-1.0, 0.0, 0.3], [0.1, -1.0, 0.0]];
        let refs = geometries_for_cn(4);
        let config = OptimizerConfig::default().with_seed(11);
        let seq = rank_geometries(&distorted, &refs, &config, &SearchControl::none()).unwrap();
        let par = rank_geometries_parallel(&distorted, &refs, &config, &SearchControl::none()).unwrap();
        let names = |r: &Ranking| r.results.iter().map(|x| x.geometry_name.clone()).collect::<Vec<_>>();
        assert_eq!(names(&seq), names(&par));
        for (a, b) in seq.results.iter().zip(&par.results) {
            assert_eq!(a.measure, b.measure);
        }
    }
}
