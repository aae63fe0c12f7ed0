//! Coordination model construction
//!
//! Turns a detected pattern into the point set handed to the shape solver
//! and the reference geometries it is compared against.

use cshm_algos::shapes::{
    geometries_for_cn, ReferenceGeometry, CAPPED_OCTAHEDRAL, CAPPED_TRIGONAL_PRISMATIC, HEXAGON,
    HEXAGONAL_BIPYRAMIDAL, LINEAR, L_SHAPE, OCTAHEDRAL, PENTAGON, PENTAGONAL_BIPYRAMIDAL, PENTAGONAL_PYRAMIDAL,
    PYRAMID, SEESAW, SQUARE_PLANAR, SQUARE_PYRAMIDAL, TETRAHEDRAL, TRIGONAL_BIPYRAMIDAL, TRIGONAL_PLANAR,
    TRIGONAL_PRISMATIC, T_SHAPED, VACANT_OCTAHEDRON, VACANT_TRIGONAL_BIPYRAMID, V_SHAPE,
};
use lin_alg::f64::Vec3;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::atom::{to_array, Atom};
use crate::error::{AnalysisError, AnalysisResult};
use crate::pattern::{Pattern, PatternMatch};
use crate::rings::LigandGroups;

/// Options for piano-stool complexes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PianoStoolOptions {
    /// Also rank against every geometry of the same CN, not just the
    /// vacant-polyhedron subset
    pub compare_full_set: bool,
}

/// What a coordination site stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Site {
    Atom { atom_index: usize },
    /// Centroid of the `ring`-th ring of the ligand groups
    RingCentroid { ring: usize },
}

/// Point set and candidate references for one metal center
#[derive(Debug, Clone)]
pub struct CoordinationModel {
    pub sites: Vec<Site>,
    /// Site positions relative to the metal, parallel to `sites`
    pub points: Vec<[f64; 3]>,
    pub candidates: Vec<&'static ReferenceGeometry>,
    /// Extra reference set ranked separately (piano-stool full comparison)
    pub comparison: Vec<&'static ReferenceGeometry>,
}

impl CoordinationModel {
    #[inline]
    pub fn coordination_number(&self) -> usize {
        self.points.len()
    }
}

fn piano_stool_candidates(cn: usize) -> Vec<&'static ReferenceGeometry> {
    match cn {
        2 => vec![&LINEAR, &V_SHAPE, &L_SHAPE],
        3 => vec![&PYRAMID, &T_SHAPED, &TRIGONAL_PLANAR],
        4 => vec![&TETRAHEDRAL, &VACANT_TRIGONAL_BIPYRAMID, &SEESAW],
        5 => vec![&SQUARE_PYRAMIDAL, &VACANT_OCTAHEDRON, &TRIGONAL_BIPYRAMIDAL],
        6 => vec![&OCTAHEDRAL, &PENTAGONAL_PYRAMIDAL, &TRIGONAL_PRISMATIC],
        7 => vec![&CAPPED_OCTAHEDRAL, &CAPPED_TRIGONAL_PRISMATIC, &PENTAGONAL_BIPYRAMIDAL],
        _ => geometries_for_cn(cn),
    }
}

fn macrocycle_candidates(cn: usize) -> Vec<&'static ReferenceGeometry> {
    match cn {
        4 => vec![&SQUARE_PLANAR],
        5 => vec![&SQUARE_PYRAMIDAL, &VACANT_OCTAHEDRON, &PENTAGON],
        6 => vec![&OCTAHEDRAL, &HEXAGON, &PENTAGONAL_PYRAMIDAL],
        7 => vec![&PENTAGONAL_BIPYRAMIDAL],
        8 => vec![&HEXAGONAL_BIPYRAMIDAL],
        _ => geometries_for_cn(cn),
    }
}

/// Build the site list and candidate geometries for a detected pattern.
pub fn build_model(
    pattern: &PatternMatch,
    groups: &LigandGroups,
    atoms: &[Atom],
    metal_index: usize,
    options: &PianoStoolOptions,
) -> AnalysisResult<CoordinationModel> {
    let len = atoms.len();
    let metal = atoms
        .get(metal_index)
        .map(|a| a.position)
        .ok_or(AnalysisError::MetalIndexOutOfBounds { index: metal_index, len })?;

    let ring_site = |ring: usize| -> AnalysisResult<(Site, Vec3)> {
        let r = groups
            .ring(ring)
            .ok_or_else(|| AnalysisError::Config(format!("pattern refers to missing ring {}", ring)))?;
        Ok((Site::RingCentroid { ring }, r.centroid_vec()))
    };
    let atom_site = |atom_index: usize| -> AnalysisResult<(Site, Vec3)> {
        let atom = atoms
            .get(atom_index)
            .ok_or_else(|| AnalysisError::atom_out_of_bounds(atom_index, len))?;
        Ok((Site::Atom { atom_index }, atom.position))
    };

    let mut sites = Vec::new();
    let mut comparison = Vec::new();
    let candidates = match pattern.pattern {
        Pattern::Sandwich { ring1, ring2, .. } => {
            sites.push(ring_site(ring1)?);
            sites.push(ring_site(ring2)?);
            vec![&LINEAR, &V_SHAPE, &L_SHAPE]
        }
        Pattern::PianoStool { ring, .. } => {
            sites.push(ring_site(ring)?);
            for i in groups.monodentates() {
                sites.push(atom_site(i)?);
            }
            let cn = sites.len();
            if options.compare_full_set {
                comparison = geometries_for_cn(cn);
            }
            piano_stool_candidates(cn)
        }
        Pattern::Macrocycle { ring, .. } => {
            let r = groups
                .ring(ring)
                .ok_or_else(|| AnalysisError::Config(format!("pattern refers to missing ring {}", ring)))?;
            for &i in &r.atom_indices {
                sites.push(atom_site(i)?);
            }
            for i in groups.monodentates() {
                sites.push(atom_site(i)?);
            }
            macrocycle_candidates(sites.len())
        }
        Pattern::General => {
            for i in groups.atom_indices() {
                sites.push(atom_site(i)?);
            }
            geometries_for_cn(sites.len())
        }
    };

    let cn = sites.len();
    if candidates.is_empty() {
        return Err(AnalysisError::UnsupportedCoordinationNumber(cn));
    }
    debug!(
        "{} model: {} sites, {} candidate geometries",
        pattern.pattern.name(),
        cn,
        candidates.len()
    );

    let (sites, points): (Vec<Site>, Vec<[f64; 3]>) = sites
        .into_iter()
        .map(|(site, position)| (site, to_array(position - metal)))
        .unzip();
    Ok(CoordinationModel {
        sites,
        points,
        candidates,
        comparison,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use crate::pattern::{detect_pattern, PatternParams};
    use crate::rings::{detect_rings, RingDetectionParams};
    use std::f64::consts::TAU;

    fn model_for(atoms: &[Atom], options: &PianoStoolOptions) -> AnalysisResult<(PatternMatch, CoordinationModel)> {
        let coordinating: Vec<usize> = (1..atoms.len()).collect();
        let groups = detect_rings(atoms, 0, &coordinating, &RingDetectionParams::default())?;
        let pattern = detect_pattern(&groups, atoms, atoms[0].position, &PatternParams::default());
        let model = build_model(&pattern, &groups, atoms, 0, options)?;
        Ok((pattern, model))
    }

    fn push_ring(atoms: &mut Vec<Atom>, n: usize, radius: f64, center: [f64; 3]) {
        for k in 0..n {
            let a = TAU * k as f64 / n as f64;
            atoms.push(Atom::new(
                Element::CARBON,
                Vec3::new(center[0] + radius * a.cos(), center[1] + radius * a.sin(), center[2]),
            ));
        }
    }

    fn names(geometries: &[&ReferenceGeometry]) -> Vec<&'static str> {
        geometries.iter().map(|g| g.name).collect()
    }

    #[test]
    fn test_sandwich_model_is_metal_relative() {
        let mut atoms = vec![Atom::new(Element::IRON, Vec3::new(1.0, 2.0, 3.0))];
        push_ring(&mut atoms, 5, 1.2, [1.0, 2.0, 4.65]);
        push_ring(&mut atoms, 5, 1.2, [1.0, 2.0, 1.35]);
        let (_, model) = model_for(&atoms, &PianoStoolOptions::default()).unwrap();

        assert_eq!(model.coordination_number(), 2);
        assert_eq!(model.sites, vec![Site::RingCentroid { ring: 0 }, Site::RingCentroid { ring: 1 }]);
        for p in &model.points {
            assert!(p[0].abs() < 1e-9 && p[1].abs() < 1e-9);
            assert!((p[2].abs() - 1.65).abs() < 1e-9, "{:?}", p);
        }
        assert_eq!(names(&model.candidates), vec!["Linear", "V-shape", "L-shape"]);
        assert!(model.comparison.is_empty());
    }

    #[test]
    fn test_piano_stool_subset_and_comparison() {
        let mut atoms = vec![Atom::new(Element::COBALT, Vec3::new(0.0, 0.0, 0.0))];
        push_ring(&mut atoms, 5, 1.2, [0.0, 0.0, 1.7]);
        atoms.push(Atom::new(Element::CARBON, Vec3::new(1.5, 0.0, -1.1)));
        atoms.push(Atom::new(Element::CARBON, Vec3::new(-1.5, 0.0, -1.1)));

        let options = PianoStoolOptions { compare_full_set: true };
        let (pattern, model) = model_for(&atoms, &options).unwrap();
        assert!(matches!(pattern.pattern, Pattern::PianoStool { monodentate_count: 2, .. }));
        assert_eq!(model.sites[0], Site::RingCentroid { ring: 0 });
        assert_eq!(model.sites[1..], [Site::Atom { atom_index: 6 }, Site::Atom { atom_index: 7 }]);
        assert_eq!(names(&model.candidates), vec!["Pyramid", "T-shaped", "Trigonal planar"]);
        assert_eq!(model.comparison.len(), geometries_for_cn(3).len());
    }

    #[test]
    fn test_general_uses_full_cn_set() {
        let mut atoms = vec![Atom::new(Element::IRON, Vec3::new(0.0, 0.0, 0.0))];
        for v in OCTAHEDRAL.vertices {
            atoms.push(Atom::new(Element::CHLORINE, Vec3::new(2.3 * v[0], 2.3 * v[1], 2.3 * v[2])));
        }
        let (pattern, model) = model_for(&atoms, &PianoStoolOptions::default()).unwrap();
        assert_eq!(pattern.pattern, Pattern::General);
        assert_eq!(model.coordination_number(), 6);
        assert_eq!(names(&model.candidates), names(&geometries_for_cn(6)));
    }

    #[test]
    fn test_macrocycle_family() {
        assert_eq!(names(&macrocycle_candidates(4)), vec!["Square planar"]);
        assert_eq!(names(&macrocycle_candidates(10)), names(&geometries_for_cn(10)));
        assert_eq!(names(&piano_stool_candidates(9)), names(&geometries_for_cn(9)));
    }

    #[test]
    fn test_unsupported_coordination_number() {
        let atoms = vec![
            Atom::new(Element::IRON, Vec3::new(0.0, 0.0, 0.0)),
            Atom::new(Element::CHLORINE, Vec3::new(2.3, 0.0, 0.0)),
        ];
        let err = model_for(&atoms, &PianoStoolOptions::default()).unwrap_err();
        assert_eq!(err, AnalysisError::UnsupportedCoordinationNumber(1));
    }
}
