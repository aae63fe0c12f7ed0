//! Coordination pattern classification
//!
//! Decides how ring ligands are represented in the shape analysis. Three
//! independent tests score the ligand groups; the best score at or above
//! the acceptance threshold wins, anything else is treated as `General`.

use lin_alg::f64::Vec3;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::atom::Atom;
use crate::rings::LigandGroups;

/// Pattern detection thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternParams {
    /// Ring normals count as parallel when |n₁·n₂| > 1 − tolerance
    pub sandwich_normal_tolerance: f64,
    pub sandwich_min_distance: f64,
    pub sandwich_max_distance: f64,
    /// Largest ring still treated as a piano-stool seat
    pub piano_stool_max_ring: usize,
    /// Monodentates with |direction · ring normal| above this are axial
    pub axial_dot_threshold: f64,
    /// Rings deviating more than this (Å) from their plane are not macrocycles
    pub macrocycle_planarity: f64,
    pub acceptance_threshold: f64,
}

impl Default for PatternParams {
    fn default() -> Self {
        Self {
            sandwich_normal_tolerance: 0.15,
            sandwich_min_distance: 2.0,
            sandwich_max_distance: 5.0,
            piano_stool_max_ring: 7,
            axial_dot_threshold: 0.7,
            macrocycle_planarity: 0.3,
            acceptance_threshold: 0.7,
        }
    }
}

const SANDWICH_BASE: f64 = 0.95;
const SANDWICH_SIZE_PENALTY: f64 = 0.3;
const SANDWICH_GEOMETRY_PENALTY: f64 = 0.2;
const PIANO_STOOL_CONSISTENT: f64 = 0.85;
const PIANO_STOOL_LOOSE: f64 = 0.6;
const MACROCYCLE_AXIAL: f64 = 0.8;
const MACROCYCLE_LOOSE: f64 = 0.5;

/// Coordination pattern. Ring fields index into [`LigandGroups::rings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pattern {
    /// Every coordinating atom is a site
    General,
    /// Two parallel rings, each represented by its centroid
    Sandwich { ring1: usize, ring2: usize, ring_size: usize },
    /// One ring (as centroid) plus monodentate legs
    PianoStool { ring: usize, monodentate_count: usize },
    /// One large ring whose atoms are all sites, plus axial ligands
    Macrocycle { ring: usize, axial_count: usize },
}

impl Pattern {
    pub fn name(&self) -> &'static str {
        match self {
            Pattern::General => "General",
            Pattern::Sandwich { .. } => "Sandwich",
            Pattern::PianoStool { .. } => "PianoStool",
            Pattern::Macrocycle { .. } => "Macrocycle",
        }
    }
}

/// Confidence of each specific pattern test, in [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternScores {
    pub sandwich: f64,
    pub piano_stool: f64,
    pub macrocycle: f64,
}

/// Detected pattern with its confidence and derived coordination number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternMatch {
    pub pattern: Pattern,
    pub confidence: f64,
    /// Number of sites fed to the shape solver
    pub coordination_number: usize,
    pub scores: PatternScores,
}

/// Classify the ligand groups around the metal at `metal`.
pub fn detect_pattern(groups: &LigandGroups, atoms: &[Atom], metal: Vec3, params: &PatternParams) -> PatternMatch {
    let (sandwich, sandwich_pattern) = score_sandwich(groups, params);
    let (piano_stool, piano_pattern) = score_piano_stool(groups, atoms, metal, params);
    let (macrocycle, macro_pattern) = score_macrocycle(groups, atoms, metal, params);
    let scores = PatternScores {
        sandwich,
        piano_stool,
        macrocycle,
    };

    let candidates = [
        (sandwich, sandwich_pattern),
        (piano_stool, piano_pattern),
        (macrocycle, macro_pattern),
    ];
    let best = candidates
        .iter()
        .map(|(score, _)| *score)
        .fold(0.0, f64::max);
    let winners: Vec<Pattern> = candidates
        .iter()
        .filter(|(score, _)| *score == best)
        .filter_map(|(_, pattern)| *pattern)
        .collect();

    let (pattern, confidence) = match winners.as_slice() {
        [only] if best >= params.acceptance_threshold => (*only, best),
        _ => (Pattern::General, 1.0 - best),
    };
    let coordination_number = coordination_number(&pattern, groups);
    debug!(
        "Pattern {} (confidence {:.2}, CN {}), scores {:?}",
        pattern.name(),
        confidence,
        coordination_number,
        scores
    );

    PatternMatch {
        pattern,
        confidence,
        coordination_number,
        scores,
    }
}

/// Sites implied by a pattern: centroid rings count once, macrocycle rings per atom
pub fn coordination_number(pattern: &Pattern, groups: &LigandGroups) -> usize {
    match *pattern {
        Pattern::General => groups.atom_indices().len(),
        Pattern::Sandwich { .. } => 2,
        Pattern::PianoStool { monodentate_count, .. } => 1 + monodentate_count,
        Pattern::Macrocycle { ring, .. } => {
            groups.ring(ring).map_or(0, |r| r.size()) + groups.monodentate_count()
        }
    }
}

fn direction(from: Vec3, to: Vec3) -> Option<Vec3> {
    let d = to - from;
    let len = d.magnitude();
    (len > 1e-10).then(|| d / len)
}

fn score_sandwich(groups: &LigandGroups, params: &PatternParams) -> (f64, Option<Pattern>) {
    if groups.ring_count() != 2 || groups.monodentate_count() != 0 {
        return (0.0, None);
    }
    let (Some(r1), Some(r2)) = (groups.ring(0), groups.ring(1)) else {
        return (0.0, None);
    };

    let mut score = SANDWICH_BASE;
    if r1.size() != r2.size() {
        score -= SANDWICH_SIZE_PENALTY;
    }
    if r1.normal_vec().dot(r2.normal_vec()).abs() <= 1.0 - params.sandwich_normal_tolerance {
        score -= SANDWICH_GEOMETRY_PENALTY;
    }
    let separation = (r1.centroid_vec() - r2.centroid_vec()).magnitude();
    if !(params.sandwich_min_distance..=params.sandwich_max_distance).contains(&separation) {
        score -= SANDWICH_GEOMETRY_PENALTY;
    }

    let pattern = Pattern::Sandwich {
        ring1: 0,
        ring2: 1,
        ring_size: r1.size().max(r2.size()),
    };
    (score.clamp(0.0, 1.0), Some(pattern))
}

fn score_piano_stool(
    groups: &LigandGroups,
    atoms: &[Atom],
    metal: Vec3,
    params: &PatternParams,
) -> (f64, Option<Pattern>) {
    let monodentate_count = groups.monodentate_count();
    if groups.ring_count() != 1 || monodentate_count == 0 {
        return (0.0, None);
    }
    let Some(ring) = groups.ring(0) else {
        return (0.0, None);
    };

    let to_ring = ring.centroid_vec() - metal;
    let legs_opposite = groups
        .monodentates()
        .all(|i| (atoms[i].position - metal).dot(to_ring) < 0.0);
    let consistent = ring.size() <= params.piano_stool_max_ring && legs_opposite;

    let score = if consistent { PIANO_STOOL_CONSISTENT } else { PIANO_STOOL_LOOSE };
    (score, Some(Pattern::PianoStool { ring: 0, monodentate_count }))
}

fn score_macrocycle(
    groups: &LigandGroups,
    atoms: &[Atom],
    metal: Vec3,
    params: &PatternParams,
) -> (f64, Option<Pattern>) {
    if groups.ring_count() != 1 {
        return (0.0, None);
    }
    let Some(ring) = groups.ring(0) else {
        return (0.0, None);
    };
    let monodentate_count = groups.monodentate_count();
    if ring.size() < 4 || (ring.size() <= params.piano_stool_max_ring && monodentate_count > 0) {
        return (0.0, None);
    }
    if ring.max_deviation > params.macrocycle_planarity {
        return (0.0, None);
    }

    let normal = ring.normal_vec();
    let axial_count = groups
        .monodentates()
        .filter(|&i| {
            direction(metal, atoms[i].position).map_or(false, |d| d.dot(normal).abs() > params.axial_dot_threshold)
        })
        .count();

    let score = if axial_count == monodentate_count { MACROCYCLE_AXIAL } else { MACROCYCLE_LOOSE };
    (score, Some(Pattern::Macrocycle { ring: 0, axial_count }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use crate::rings::{detect_rings, RingDetectionParams};
    use std::f64::consts::TAU;

    fn ring(atoms: &mut Vec<Atom>, n: usize, radius: f64, z: f64) {
        for k in 0..n {
            let a = TAU * k as f64 / n as f64;
            atoms.push(Atom::new(Element::CARBON, Vec3::new(radius * a.cos(), radius * a.sin(), z)));
        }
    }

    fn classify(atoms: &[Atom]) -> PatternMatch {
        let coordinating: Vec<usize> = (1..atoms.len()).collect();
        let groups = detect_rings(atoms, 0, &coordinating, &RingDetectionParams::default()).unwrap();
        detect_pattern(&groups, atoms, atoms[0].position, &PatternParams::default())
    }

    fn origin_metal() -> Vec<Atom> {
        vec![Atom::new(Element::IRON, Vec3::new(0.0, 0.0, 0.0))]
    }

    #[test]
    fn test_sandwich() {
        let mut atoms = origin_metal();
        ring(&mut atoms, 5, 1.2, 1.65);
        ring(&mut atoms, 5, 1.2, -1.65);
        let m = classify(&atoms);
        assert!(matches!(m.pattern, Pattern::Sandwich { ring_size: 5, .. }));
        assert!((m.confidence - 0.95).abs() < 1e-12);
        assert_eq!(m.coordination_number, 2);
    }

    #[test]
    fn test_mixed_sandwich_penalized() {
        let mut atoms = origin_metal();
        ring(&mut atoms, 5, 1.2, 1.7);
        ring(&mut atoms, 6, 1.4, -1.6);
        let m = classify(&atoms);
        assert!((m.scores.sandwich - 0.65).abs() < 1e-12);
        assert_eq!(m.pattern, Pattern::General);
    }

    #[test]
    fn test_piano_stool() {
        let mut atoms = origin_metal();
        ring(&mut atoms, 6, 1.4, 1.6);
        for k in 0..3 {
            let phi = TAU * k as f64 / 3.0;
            let theta = 125f64.to_radians();
            atoms.push(Atom::new(
                Element::CARBON,
                Vec3::new(1.9 * theta.sin() * phi.cos(), 1.9 * theta.sin() * phi.sin(), 1.9 * theta.cos()),
            ));
        }
        let m = classify(&atoms);
        assert_eq!(m.pattern, Pattern::PianoStool { ring: 0, monodentate_count: 3 });
        assert!((m.confidence - 0.85).abs() < 1e-12);
        assert_eq!(m.coordination_number, 4);
    }

    #[test]
    fn test_piano_stool_leg_on_ring_side_is_loose() {
        let mut atoms = origin_metal();
        ring(&mut atoms, 5, 1.2, 1.7);
        atoms.push(Atom::new(Element::CHLORINE, Vec3::new(2.5, 0.0, 0.3)));
        let m = classify(&atoms);
        assert!((m.scores.piano_stool - 0.6).abs() < 1e-12);
        assert_eq!(m.pattern, Pattern::General);
        assert_eq!(m.coordination_number, 6);
    }

    #[test]
    fn test_macrocycle_with_axial_ligands() {
        let mut atoms = origin_metal();
        ring(&mut atoms, 8, 1.75, 0.0);
        atoms.push(Atom::new(Element::CHLORINE, Vec3::new(0.0, 0.0, 2.3)));
        atoms.push(Atom::new(Element::CHLORINE, Vec3::new(0.0, 0.0, -2.3)));
        let m = classify(&atoms);
        assert_eq!(m.pattern, Pattern::Macrocycle { ring: 0, axial_count: 2 });
        assert!((m.confidence - 0.8).abs() < 1e-12);
        assert_eq!(m.coordination_number, 10);
    }

    #[test]
    fn test_general_for_monodentates() {
        let mut atoms = origin_metal();
        for v in [[2.3, 0.0, 0.0], [-2.3, 0.0, 0.0], [0.0, 2.3, 0.0], [0.0, -2.3, 0.0]] {
            atoms.push(Atom::new(Element::CHLORINE, Vec3::new(v[0], v[1], v[2])));
        }
        let m = classify(&atoms);
        assert_eq!(m.pattern, Pattern::General);
        assert_eq!(m.coordination_number, 4);
        assert_eq!(m.scores, PatternScores::default());
    }
}
