//! Rotation search stages
//!
//! Each stage takes the incumbent best candidate and returns a new one,
//! never worse. Stages are pure apart from the RNG they are handed and
//! the observer hooks in [`SearchControl`].

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use log::trace;
use rand::rngs::StdRng;
use rand::Rng;

use super::config::*;
use super::control::{SearchControl, Stage};
use crate::align::kabsch::kabsch;
use crate::linalg::mat3::{
    axis_angle_rotation, euler_rotation, mat3_mul, orthonormalize, quaternion_rotation, Mat3, IDENTITY,
};
use crate::measure::evaluate_rotation;

/// acos(1/√3): tilt that brings a body diagonal onto a coordinate axis
const MAGIC_ANGLE: f64 = 0.955_316_618_124_509_3;

/// Axis-aligned, face, edge and body-diagonal orientations as (roll, pitch, yaw)
const CANONICAL_ORIENTATIONS: [(f64, f64, f64); 18] = [
    (0.0, 0.0, 0.0),
    (FRAC_PI_2, 0.0, 0.0),
    (0.0, FRAC_PI_2, 0.0),
    (0.0, 0.0, FRAC_PI_2),
    (PI, 0.0, 0.0),
    (0.0, PI, 0.0),
    (0.0, 0.0, PI),
    (FRAC_PI_4, 0.0, 0.0),
    (0.0, FRAC_PI_4, 0.0),
    (0.0, 0.0, FRAC_PI_4),
    (FRAC_PI_4, FRAC_PI_4, 0.0),
    (FRAC_PI_4, 0.0, FRAC_PI_4),
    (0.0, FRAC_PI_4, FRAC_PI_4),
    (FRAC_PI_4, FRAC_PI_4, FRAC_PI_4),
    (MAGIC_ANGLE, 0.0, FRAC_PI_4),
    (-MAGIC_ANGLE, 0.0, FRAC_PI_4),
    (MAGIC_ANGLE, 0.0, -FRAC_PI_4),
    (FRAC_PI_2, FRAC_PI_4, FRAC_PI_2),
];

/// Unit-normalized point sets of equal length
#[derive(Debug, Clone, Copy)]
pub struct Problem<'a> {
    pub actual: &'a [[f64; 3]],
    pub reference: &'a [[f64; 3]],
}

/// A rotation with its measure and optimal correspondence
#[derive(Debug, Clone)]
pub struct Candidate {
    pub measure: f64,
    pub rotation: Mat3,
    pub correspondence: Vec<usize>,
}

impl Candidate {
    pub fn evaluate(problem: &Problem, rotation: Mat3) -> Self {
        let e = evaluate_rotation(&rotation, problem.actual, problem.reference);
        Self {
            measure: e.measure,
            rotation,
            correspondence: e.correspondence,
        }
    }

    #[inline]
    fn beats(&self, other: &Candidate) -> bool {
        self.measure < other.measure
    }
}

/// Incumbent after a stage, with bookkeeping
#[derive(Debug, Clone)]
pub struct StageOutcome {
    pub best: Candidate,
    pub evaluations: usize,
    pub cancelled: bool,
}

impl StageOutcome {
    fn new(best: Candidate, evaluations: usize, cancelled: bool) -> Self {
        Self {
            best,
            evaluations,
            cancelled,
        }
    }
}

/// Least-squares rotation for a fixed correspondence
fn fit_rotation(problem: &Problem, correspondence: &[usize]) -> Option<Mat3> {
    let target: Vec<[f64; 3]> = correspondence.iter().map(|&j| problem.reference[j]).collect();
    kabsch(problem.actual, &target).ok().map(|r| r.rotation)
}

/// Stage 1: assign at identity, fit Kabsch on the matched pairs
pub fn kabsch_seed(problem: &Problem, control: &SearchControl) -> StageOutcome {
    let mut best = Candidate::evaluate(problem, IDENTITY);
    let mut evaluations = 1;
    if let Some(rotation) = fit_rotation(problem, &best.correspondence) {
        let fitted = Candidate::evaluate(problem, rotation);
        evaluations += 1;
        if fitted.beats(&best) {
            best = fitted;
        }
    }
    control.report(Stage::KabschSeed, 1.0, best.measure);
    StageOutcome::new(best, evaluations, false)
}

/// Stage 2: fixed symmetry-motivated orientations
pub fn canonical_orientations(problem: &Problem, incumbent: Candidate, control: &SearchControl) -> StageOutcome {
    let mut best = incumbent;
    let total = CANONICAL_ORIENTATIONS.len();
    for (k, &(roll, pitch, yaw)) in CANONICAL_ORIENTATIONS.iter().enumerate() {
        let trial = Candidate::evaluate(problem, euler_rotation(roll, pitch, yaw));
        if trial.beats(&best) {
            best = trial;
        }
        control.report(Stage::CanonicalOrientations, (k + 1) as f64 / total as f64, best.measure);
    }
    StageOutcome::new(best, total, false)
}

/// Stage 3: coarse Euler-angle grid.
///
/// Every sample is polished before it is compared with the incumbent, so a
/// sample inside the right correspondence basin reaches its exact fit.
pub fn grid_search(
    problem: &Problem,
    incumbent: Candidate,
    budget: &SearchBudget,
    control: &SearchControl,
) -> StageOutcome {
    let steps = budget.grid_steps.max(1);
    let stride = budget.grid_stride.max(1);
    let samples: Vec<usize> = (0..steps).step_by(stride).collect();
    let total = samples.len().pow(3);
    let angle = |i: usize, range: f64| range * i as f64 / steps as f64;

    let mut best = incumbent;
    let mut evaluations = 0;
    let mut visited = 0;
    for &i in &samples {
        for &j in &samples {
            for &k in &samples {
                if control.is_cancelled() {
                    return StageOutcome::new(best, evaluations, true);
                }
                let rotation = euler_rotation(angle(i, TAU), angle(j, PI) - FRAC_PI_2, angle(k, TAU));
                let trial = polish(problem, Candidate::evaluate(problem, rotation));
                evaluations += 1 + trial.evaluations;
                visited += 1;
                if trial.best.beats(&best) {
                    best = trial.best;
                }
                if visited % 50 == 0 {
                    control.report(Stage::GridSearch, visited as f64 / total as f64, best.measure);
                }
            }
        }
    }
    control.report(Stage::GridSearch, 1.0, best.measure);
    StageOutcome::new(best, evaluations, false)
}

/// Uniformly distributed direction on the unit sphere
fn random_axis(rng: &mut StdRng) -> [f64; 3] {
    let z: f64 = rng.gen_range(-1.0..=1.0);
    let phi: f64 = rng.gen_range(0.0..TAU);
    let r = (1.0 - z * z).max(0.0).sqrt();
    [r * phi.cos(), r * phi.sin(), z]
}

/// Uniformly distributed rotation (random unit quaternion)
fn random_rotation(rng: &mut StdRng) -> Mat3 {
    let u1: f64 = rng.gen();
    let u2: f64 = rng.gen();
    let u3: f64 = rng.gen();
    let a = (1.0 - u1).sqrt();
    let b = u1.sqrt();
    let (x, y) = (a * (TAU * u2).sin(), a * (TAU * u2).cos());
    let (z, w) = (b * (TAU * u3).sin(), b * (TAU * u3).cos());
    quaternion_rotation(w, x, y, z)
}

/// Compose a random-axis rotation of at most `max_angle` onto `rotation`
fn perturb(rotation: &Mat3, max_angle: f64, rng: &mut StdRng) -> Mat3 {
    let axis = random_axis(rng);
    let angle = rng.gen_range(-max_angle..=max_angle);
    orthonormalize(&mat3_mul(&axis_angle_rotation(&axis, angle), rotation))
}

/// Stage 4: simulated annealing with restarts
pub fn anneal(
    problem: &Problem,
    incumbent: Candidate,
    budget: &SearchBudget,
    rng: &mut StdRng,
    control: &SearchControl,
) -> StageOutcome {
    let restarts = budget.num_restarts;
    let steps = budget.steps_per_run;
    let cooling = if steps > 1 {
        (ANNEAL_T_END / ANNEAL_T_START).powf(1.0 / (steps - 1) as f64)
    } else {
        1.0
    };

    let mut best = incumbent;
    let mut evaluations = 0;
    for restart in 0..restarts {
        if best.measure < EXCELLENT {
            trace!("annealing stopped after {} restarts at {:.6}", restart, best.measure);
            break;
        }
        let start = if restart < restarts / 2 {
            perturb(&best.rotation, RESTART_KICK, rng)
        } else {
            random_rotation(rng)
        };
        let mut current = Candidate::evaluate(problem, start);
        evaluations += 1;
        let mut run_best = current.clone();

        let mut temperature = ANNEAL_T_START;
        let mut cancelled = false;
        for _ in 0..steps {
            if control.is_cancelled() {
                cancelled = true;
                break;
            }
            let scale = (temperature / ANNEAL_T_START).sqrt();
            let max_step = ANNEAL_MIN_STEP + (ANNEAL_MAX_STEP - ANNEAL_MIN_STEP) * scale;
            let trial = Candidate::evaluate(problem, perturb(&current.rotation, max_step, rng));
            evaluations += 1;

            let delta = trial.measure - current.measure;
            if delta <= 0.0 || rng.gen::<f64>() < (-delta / temperature).exp() {
                current = trial;
                if current.beats(&run_best) {
                    run_best = current.clone();
                }
            }
            temperature *= cooling;
        }

        // Best-of-run is only settled once its correspondence is refit
        let settled = polish(problem, run_best);
        evaluations += settled.evaluations;
        trace!("annealing run {}: {:.6}", restart, settled.best.measure);
        if settled.best.beats(&best) {
            best = settled.best;
        }
        if cancelled {
            return StageOutcome::new(best, evaluations, true);
        }
        control.report(Stage::Annealing, (restart + 1) as f64 / restarts as f64, best.measure);
    }
    StageOutcome::new(best, evaluations, false)
}

/// Stage 5: hill climbing with a shrinking step
pub fn refine(
    problem: &Problem,
    incumbent: Candidate,
    budget: &SearchBudget,
    rng: &mut StdRng,
    control: &SearchControl,
) -> StageOutcome {
    let steps = budget.refinement_steps;
    let cooling = if steps > 1 {
        (REFINE_T_END / REFINE_T_START).powf(1.0 / (steps - 1) as f64)
    } else {
        1.0
    };

    let mut best = incumbent;
    let mut evaluations = 0;
    let mut temperature = REFINE_T_START;
    let mut stale = 0;
    for step in 0..steps {
        if control.is_cancelled() {
            return StageOutcome::new(best, evaluations, true);
        }
        let max_step = 0.05 * (temperature / REFINE_T_START) + 0.0005;
        let trial = Candidate::evaluate(problem, perturb(&best.rotation, max_step, rng));
        evaluations += 1;
        if trial.beats(&best) {
            best = trial;
            stale = 0;
        } else {
            stale += 1;
        }
        if best.measure < NEAR_PERFECT && stale >= REFINE_PATIENCE {
            trace!("refinement converged after {} steps", step + 1);
            break;
        }
        temperature *= cooling;
        if (step + 1) % 500 == 0 {
            control.report(Stage::Refinement, (step + 1) as f64 / steps as f64, best.measure);
        }
    }
    StageOutcome::new(best, evaluations, false)
}

/// Iterated Kabsch on the incumbent correspondence.
///
/// Each round fits the exact rotation for the current pairing and
/// re-assigns; stops when the measure no longer improves.
pub fn polish(problem: &Problem, incumbent: Candidate) -> StageOutcome {
    let mut best = incumbent;
    let mut evaluations = 0;
    for _ in 0..POLISH_ROUNDS {
        let Some(rotation) = fit_rotation(problem, &best.correspondence) else {
            break;
        };
        let trial = Candidate::evaluate(problem, rotation);
        evaluations += 1;
        if trial.measure < best.measure - 1e-12 {
            best = trial;
        } else {
            break;
        }
    }
    StageOutcome::new(best, evaluations, false)
}
