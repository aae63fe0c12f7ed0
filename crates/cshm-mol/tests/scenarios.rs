//! End-to-end analyses of small model complexes

use std::f64::consts::TAU;

use cshm_algos::shapes::{geometries_for_cn, ReferenceGeometry, OCTAHEDRAL};
use cshm_algos::{evaluate_geometry_with, rank_geometries, SearchMode};
use cshm_mol::{
    analyze, AnalysisConfig, Atom, Element, LigandGroup, OptimizerConfig, Pattern, SearchControl,
};
use lin_alg::f64::Vec3;

fn init_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .is_test(true)
        .try_init();
}

fn seeded_config(seed: u64) -> AnalysisConfig {
    AnalysisConfig {
        optimizer: OptimizerConfig::new(SearchMode::Default).with_seed(seed),
        ..Default::default()
    }
}

fn carbon_ring(atoms: &mut Vec<Atom>, n: usize, radius: f64, z: f64, phase: f64) {
    for k in 0..n {
        let a = phase + TAU * k as f64 / n as f64;
        atoms.push(Atom::new(Element::CARBON, Vec3::new(radius * a.cos(), radius * a.sin(), z)));
    }
}

fn ferrocene() -> Vec<Atom> {
    let mut atoms = vec![Atom::new(Element::IRON, Vec3::new(0.0, 0.0, 0.0))];
    carbon_ring(&mut atoms, 5, 1.2, 1.65, 0.0);
    carbon_ring(&mut atoms, 5, 1.2, -1.65, 36f64.to_radians());
    atoms
}

fn benzene_tricarbonyl() -> Vec<Atom> {
    let mut atoms = vec![Atom::from_symbol("Cr", 0.0, 0.0, 0.0).unwrap()];
    carbon_ring(&mut atoms, 6, 1.4, 1.6, 0.0);
    let theta = 125f64.to_radians();
    for k in 0..3 {
        let phi = TAU * k as f64 / 3.0;
        atoms.push(Atom::new(
            Element::CARBON,
            Vec3::new(1.9 * theta.sin() * phi.cos(), 1.9 * theta.sin() * phi.sin(), 1.9 * theta.cos()),
        ));
    }
    atoms
}

fn octahedral_chloride() -> Vec<Atom> {
    let mut atoms = vec![Atom::from_symbol("Co", 0.0, 0.0, 0.0).unwrap()];
    for v in OCTAHEDRAL.vertices {
        atoms.push(Atom::new(Element::CHLORINE, Vec3::new(2.3 * v[0], 2.3 * v[1], 2.3 * v[2])));
    }
    atoms
}

fn all_coordinating(atoms: &[Atom]) -> Vec<usize> {
    (1..atoms.len()).collect()
}

#[test]
fn ferrocene_is_a_linear_sandwich() {
    init_logger();
    let atoms = ferrocene();
    let analysis = analyze(&atoms, 0, &all_coordinating(&atoms), &seeded_config(1), &SearchControl::none()).unwrap();

    assert!(matches!(analysis.pattern.pattern, Pattern::Sandwich { ring_size: 5, .. }));
    assert_eq!(analysis.pattern.coordination_number, 2);
    assert_eq!(analysis.coordination_number(), 2);
    for ring in analysis.groups.rings() {
        assert_eq!(ring.hapticity.eta, 5);
        assert_eq!(ring.hapticity.label, "η⁵-cyclopentadienyl");
    }

    let best = analysis.best().unwrap();
    assert_eq!(best.geometry_name, "Linear");
    assert!(best.measure < 1.0, "ferrocene linear measure {}", best.measure);
}

#[test]
fn arene_tricarbonyl_is_a_piano_stool() {
    init_logger();
    let atoms = benzene_tricarbonyl();
    let mut config = seeded_config(2);
    config.piano_stool.compare_full_set = true;
    let analysis = analyze(&atoms, 0, &all_coordinating(&atoms), &config, &SearchControl::none()).unwrap();

    assert_eq!(analysis.pattern.pattern, Pattern::PianoStool { ring: 0, monodentate_count: 3 });
    assert_eq!(analysis.coordination_number(), 4);
    assert_eq!(analysis.groups.ring(0).map(|r| r.hapticity.eta), Some(6));

    assert_eq!(analysis.ranking.results.len(), 3);
    let comparison = analysis.comparison.as_ref().unwrap();
    assert_eq!(comparison.results.len(), geometries_for_cn(4).len());
    for r in &comparison.results {
        assert!(r.measure >= 0.0);
    }
}

#[test]
fn octahedral_complex_matches_exactly() {
    init_logger();
    let atoms = octahedral_chloride();
    let analysis = analyze(&atoms, 0, &all_coordinating(&atoms), &seeded_config(3), &SearchControl::none()).unwrap();

    assert_eq!(analysis.pattern.pattern, Pattern::General);
    assert!(analysis
        .groups
        .groups
        .iter()
        .all(|g| matches!(g, LigandGroup::Monodentate { .. })));
    let best = analysis.best().unwrap();
    assert_eq!(best.geometry_name, "Octahedral");
    assert!(best.measure < 1e-6, "octahedral measure {}", best.measure);
    for pair in analysis.ranking.results.windows(2) {
        assert!(pair[0].measure <= pair[1].measure);
    }
}

#[test]
fn parallel_run_matches_sequential() {
    let atoms = octahedral_chloride();
    let sequential = analyze(&atoms, 0, &all_coordinating(&atoms), &seeded_config(4), &SearchControl::none()).unwrap();
    let mut config = seeded_config(4);
    config.parallel = true;
    let parallel = analyze(&atoms, 0, &all_coordinating(&atoms), &config, &SearchControl::none()).unwrap();

    let names = |a: &cshm_mol::Analysis| a.ranking.results.iter().map(|r| r.geometry_name.clone()).collect::<Vec<_>>();
    assert_eq!(names(&sequential), names(&parallel));
    for (s, p) in sequential.ranking.results.iter().zip(&parallel.ranking.results) {
        assert!((s.measure - p.measure).abs() < 1e-12);
    }
}

static WRONG_SIZE: ReferenceGeometry = ReferenceGeometry {
    name: "Wrong size",
    symbol: "WS-3",
    vertices: &[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
};

#[test]
fn size_mismatch_is_skipped_not_fatal() {
    init_logger();
    let mut references = geometries_for_cn(6);
    references.insert(1, &WRONG_SIZE);
    let points: Vec<[f64; 3]> = OCTAHEDRAL.vertices.iter().map(|v| [2.1 * v[0], 2.1 * v[1], 2.1 * v[2]]).collect();

    let config = OptimizerConfig::default().with_seed(5);
    let ranking = rank_geometries(&points, &references, &config, &SearchControl::none()).unwrap();
    assert_eq!(ranking.results.len(), references.len() - 1);
    assert_eq!(ranking.skipped.len(), 1);
    assert_eq!(ranking.skipped[0].geometry_name, "Wrong size");
    assert_eq!(ranking.best().unwrap().geometry_name, "Octahedral");
}

#[test]
fn measure_is_invariant_to_rotation_and_labeling() {
    // Slightly distorted octahedron so the measure is not trivially zero
    let distorted: Vec<[f64; 3]> = vec![
        [2.2, 0.1, 0.0],
        [-2.3, 0.0, 0.1],
        [0.0, 2.1, -0.2],
        [0.1, -2.3, 0.0],
        [0.2, 0.0, 2.4],
        [0.0, -0.1, -2.2],
    ];
    let (a, b, c) = (0.7_f64, -1.1_f64, 2.3_f64);
    let rz = [[c.cos(), -c.sin(), 0.0], [c.sin(), c.cos(), 0.0], [0.0, 0.0, 1.0]];
    let ry = [[b.cos(), 0.0, b.sin()], [0.0, 1.0, 0.0], [-b.sin(), 0.0, b.cos()]];
    let rx = [[1.0, 0.0, 0.0], [0.0, a.cos(), -a.sin()], [0.0, a.sin(), a.cos()]];
    let apply = |m: &[[f64; 3]; 3], p: [f64; 3]| {
        [
            m[0][0] * p[0] + m[0][1] * p[1] + m[0][2] * p[2],
            m[1][0] * p[0] + m[1][1] * p[1] + m[1][2] * p[2],
            m[2][0] * p[0] + m[2][1] * p[1] + m[2][2] * p[2],
        ]
    };
    let mut rotated: Vec<[f64; 3]> = distorted.iter().map(|&p| apply(&rz, apply(&ry, apply(&rx, p)))).collect();
    rotated.reverse();
    rotated.swap(0, 3);

    let config = OptimizerConfig::default().with_seed(6);
    let control = SearchControl::none();
    let base = evaluate_geometry_with(&distorted, &OCTAHEDRAL, &config, &control).unwrap();
    let moved = evaluate_geometry_with(&rotated, &OCTAHEDRAL, &config, &control).unwrap();
    assert!(base.measure > 0.0);
    assert!(
        (base.measure - moved.measure).abs() < 1e-3,
        "measure changed under rotation/permutation: {} vs {}",
        base.measure,
        moved.measure
    );
}
