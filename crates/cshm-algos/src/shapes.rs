//! Ideal reference polyhedra
//!
//! Each geometry is a set of unit vectors from the coordination center to
//! the vertices of an idealized polyhedron. Capped and contracted shapes use
//! spherized coordinates (local minima of the Thomson potential).

use crate::linalg::mat3::normalize;

/// A named ideal coordination polyhedron
#[derive(Debug, PartialEq)]
pub struct ReferenceGeometry {
    /// Display name, e.g. "Octahedral"
    pub name: &'static str,
    /// Short label, e.g. "OC-6"
    pub symbol: &'static str,
    /// Center → vertex directions
    pub vertices: &'static [[f64; 3]],
}

impl ReferenceGeometry {
    #[inline]
    pub fn coordination_number(&self) -> usize {
        self.vertices.len()
    }

    /// Vertices re-normalized to unit length.
    ///
    /// The tabulated coordinates carry six significant digits.
    pub fn unit_vertices(&self) -> Vec<[f64; 3]> {
        self.vertices
            .iter()
            .map(|v| {
                let mut u = *v;
                normalize(&mut u);
                u
            })
            .collect()
    }
}

// ============================================================================
// CN 2
// ============================================================================

pub static LINEAR: ReferenceGeometry = ReferenceGeometry {
    name: "Linear",
    symbol: "L-2",
    vertices: &[[0.0, 0.0, 1.0], [0.0, 0.0, -1.0]],
};

/// Bent at the tetrahedral angle
pub static V_SHAPE: ReferenceGeometry = ReferenceGeometry {
    name: "V-shape",
    symbol: "vT-2",
    vertices: &[[1.0, 0.0, 0.0], [-0.333333, 0.942809, 0.0]],
};

/// Bent at 90°
pub static L_SHAPE: ReferenceGeometry = ReferenceGeometry {
    name: "L-shape",
    symbol: "vOC-2",
    vertices: &[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
};

// ============================================================================
// CN 3
// ============================================================================

pub static TRIGONAL_PLANAR: ReferenceGeometry = ReferenceGeometry {
    name: "Trigonal planar",
    symbol: "TP-3",
    vertices: &[[1.0, 0.0, 0.0], [-0.5, 0.866025, 0.0], [-0.5, -0.866025, 0.0]],
};

/// Monovacant tetrahedron
pub static PYRAMID: ReferenceGeometry = ReferenceGeometry {
    name: "Pyramid",
    symbol: "vT-3",
    vertices: &[
        [0.0, -0.366501, 0.930418],
        [0.805765, -0.366501, -0.465209],
        [-0.805765, -0.366501, -0.465209],
    ],
};

pub static T_SHAPED: ReferenceGeometry = ReferenceGeometry {
    name: "T-shaped",
    symbol: "mvOC-3",
    vertices: &[[-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]],
};

// ============================================================================
// CN 4
// ============================================================================

pub static SQUARE_PLANAR: ReferenceGeometry = ReferenceGeometry {
    name: "Square planar",
    symbol: "SP-4",
    vertices: &[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [-1.0, 0.0, 0.0], [0.0, -1.0, 0.0]],
};

pub static TETRAHEDRAL: ReferenceGeometry = ReferenceGeometry {
    name: "Tetrahedral",
    symbol: "T-4",
    vertices: &[
        [0.0, 1.0, 0.0],
        [0.0, -0.333333, 0.942809],
        [0.816497, -0.333333, -0.471405],
        [-0.816497, -0.333333, -0.471405],
    ],
};

/// Equatorially monovacant trigonal bipyramid
pub static SEESAW: ReferenceGeometry = ReferenceGeometry {
    name: "Seesaw",
    symbol: "SS-4",
    vertices: &[[0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [-0.5, 0.0, -0.866025], [0.0, -1.0, 0.0]],
};

/// Axially monovacant trigonal bipyramid
pub static VACANT_TRIGONAL_BIPYRAMID: ReferenceGeometry = ReferenceGeometry {
    name: "Vacant trigonal bipyramid",
    symbol: "vTBPY-4",
    vertices: &[[1.0, 0.0, 0.0], [-0.5, 0.866025, 0.0], [-0.5, -0.866025, 0.0], [0.0, 0.0, 1.0]],
};

// ============================================================================
// CN 5
// ============================================================================

pub static PENTAGON: ReferenceGeometry = ReferenceGeometry {
    name: "Pentagon",
    symbol: "PP-5",
    vertices: &[
        [1.0, 0.0, 0.0],
        [0.309017, 0.951057, 0.0],
        [-0.809017, 0.587785, 0.0],
        [-0.809017, -0.587785, 0.0],
        [0.309017, -0.951057, 0.0],
    ],
};

/// Octahedron missing one vertex (planar base)
pub static VACANT_OCTAHEDRON: ReferenceGeometry = ReferenceGeometry {
    name: "Vacant octahedron",
    symbol: "vOC-5",
    vertices: &[
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [-1.0, 0.0, 0.0],
        [0.0, -1.0, 0.0],
        [0.0, 0.0, 1.0],
    ],
};

pub static TRIGONAL_BIPYRAMIDAL: ReferenceGeometry = ReferenceGeometry {
    name: "Trigonal bipyramidal",
    symbol: "TBPY-5",
    vertices: &[
        [1.0, 0.0, 0.0],
        [-0.5, 0.866025, 0.0],
        [-0.5, -0.866025, 0.0],
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
    ],
};

/// Apex–base angle of 104°
pub static SQUARE_PYRAMIDAL: ReferenceGeometry = ReferenceGeometry {
    name: "Square pyramidal",
    symbol: "SPY-5",
    vertices: &[
        [0.0, 0.0, 1.0],
        [0.970296, 0.0, -0.241922],
        [0.0, 0.970296, -0.241922],
        [-0.970296, 0.0, -0.241922],
        [0.0, -0.970296, -0.241922],
    ],
};

// ============================================================================
// CN 6
// ============================================================================

pub static HEXAGON: ReferenceGeometry = ReferenceGeometry {
    name: "Hexagon",
    symbol: "HP-6",
    vertices: &[
        [1.0, 0.0, 0.0],
        [0.5, 0.866025, 0.0],
        [-0.5, 0.866025, 0.0],
        [-1.0, 0.0, 0.0],
        [-0.5, -0.866025, 0.0],
        [0.5, -0.866025, 0.0],
    ],
};

pub static PENTAGONAL_PYRAMIDAL: ReferenceGeometry = ReferenceGeometry {
    name: "Pentagonal pyramidal",
    symbol: "PPY-6",
    vertices: &[
        [1.0, 0.0, 0.0],
        [0.309017, 0.951057, 0.0],
        [-0.809017, 0.587785, 0.0],
        [-0.809017, -0.587785, 0.0],
        [0.309017, -0.951057, 0.0],
        [0.0, 0.0, 1.0],
    ],
};

pub static OCTAHEDRAL: ReferenceGeometry = ReferenceGeometry {
    name: "Octahedral",
    symbol: "OC-6",
    vertices: &[
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [-1.0, 0.0, 0.0],
        [0.0, -1.0, 0.0],
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
    ],
};

pub static TRIGONAL_PRISMATIC: ReferenceGeometry = ReferenceGeometry {
    name: "Trigonal prismatic",
    symbol: "TPR-6",
    vertices: &[
        [0.755929, 0.0, 0.654654],
        [-0.377964, 0.654654, 0.654654],
        [-0.377964, -0.654654, 0.654654],
        [0.755929, 0.0, -0.654654],
        [-0.377964, 0.654654, -0.654654],
        [-0.377964, -0.654654, -0.654654],
    ],
};

// ============================================================================
// CN 7
// ============================================================================

pub static PENTAGONAL_BIPYRAMIDAL: ReferenceGeometry = ReferenceGeometry {
    name: "Pentagonal bipyramidal",
    symbol: "PBPY-7",
    vertices: &[
        [1.0, 0.0, 0.0],
        [0.309017, 0.951057, 0.0],
        [-0.809017, 0.587785, 0.0],
        [-0.809017, -0.587785, 0.0],
        [0.309017, -0.951057, 0.0],
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
    ],
};

pub static CAPPED_OCTAHEDRAL: ReferenceGeometry = ReferenceGeometry {
    name: "Capped octahedral",
    symbol: "COC-7",
    vertices: &[
        [0.0, 0.0, 1.0],
        [0.957729, 0.0, 0.287673],
        [-0.478864, 0.829418, 0.287673],
        [-0.478864, -0.829418, 0.287673],
        [0.389831, 0.675207, -0.626200],
        [-0.779662, 0.0, -0.626200],
        [0.389831, -0.675207, -0.626200],
    ],
};

pub static CAPPED_TRIGONAL_PRISMATIC: ReferenceGeometry = ReferenceGeometry {
    name: "Capped trigonal prismatic",
    symbol: "CTPR-7",
    vertices: &[
        [0.0, 0.0, 1.0],
        [0.984798, -0.069552, 0.159173],
        [-0.069552, 0.984798, 0.159173],
        [-0.984798, 0.069552, 0.159173],
        [0.069552, -0.984798, 0.159173],
        [0.413726, 0.413726, -0.810964],
        [-0.413726, -0.413726, -0.810964],
    ],
};

// ============================================================================
// CN 8
// ============================================================================

pub static HEXAGONAL_BIPYRAMIDAL: ReferenceGeometry = ReferenceGeometry {
    name: "Hexagonal bipyramidal",
    symbol: "HBPY-8",
    vertices: &[
        [1.0, 0.0, 0.0],
        [0.5, 0.866025, 0.0],
        [-0.5, 0.866025, 0.0],
        [-1.0, 0.0, 0.0],
        [-0.5, -0.866025, 0.0],
        [0.5, -0.866025, 0.0],
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
    ],
};

pub static CUBIC: ReferenceGeometry = ReferenceGeometry {
    name: "Cubic",
    symbol: "CU-8",
    vertices: &[
        [0.577350, 0.577350, 0.577350],
        [0.577350, -0.577350, 0.577350],
        [0.577350, -0.577350, -0.577350],
        [0.577350, 0.577350, -0.577350],
        [-0.577350, 0.577350, 0.577350],
        [-0.577350, -0.577350, 0.577350],
        [-0.577350, -0.577350, -0.577350],
        [-0.577350, 0.577350, -0.577350],
    ],
};

pub static SQUARE_ANTIPRISMATIC: ReferenceGeometry = ReferenceGeometry {
    name: "Square antiprismatic",
    symbol: "SAPR-8",
    vertices: &[
        [0.607781, 0.607781, 0.511081],
        [-0.607781, 0.607781, 0.511081],
        [-0.607781, -0.607781, 0.511081],
        [0.607781, -0.607781, 0.511081],
        [0.859533, 0.0, -0.511081],
        [0.0, 0.859533, -0.511081],
        [-0.859533, 0.0, -0.511081],
        [0.0, -0.859533, -0.511081],
    ],
};

/// Snub disphenoid (D2d)
pub static TRIANGULAR_DODECAHEDRAL: ReferenceGeometry = ReferenceGeometry {
    name: "Triangular dodecahedral",
    symbol: "TDD-8",
    vertices: &[
        [0.620913, 0.0, -0.783880],
        [-0.620913, 0.0, -0.783880],
        [0.0, 0.620913, 0.783880],
        [0.0, -0.620913, 0.783880],
        [0.950273, 0.0, 0.311417],
        [-0.950273, 0.0, 0.311417],
        [0.0, 0.950273, -0.311417],
        [0.0, -0.950273, -0.311417],
    ],
};

// ============================================================================
// CN 9
// ============================================================================

pub static HEPTAGONAL_BIPYRAMIDAL: ReferenceGeometry = ReferenceGeometry {
    name: "Heptagonal bipyramidal",
    symbol: "HBPY-9",
    vertices: &[
        [1.0, 0.0, 0.0],
        [0.623490, 0.781831, 0.0],
        [-0.222521, 0.974928, 0.0],
        [-0.900969, 0.433884, 0.0],
        [-0.900969, -0.433884, 0.0],
        [-0.222521, -0.974928, 0.0],
        [0.623490, -0.781831, 0.0],
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
    ],
};

/// Square-face tricapped trigonal prism
pub static TRICAPPED_TRIGONAL_PRISMATIC: ReferenceGeometry = ReferenceGeometry {
    name: "Tricapped trigonal prismatic",
    symbol: "TCTPR-9",
    vertices: &[
        [0.914109572223, -0.182781178690, -0.361931942064],
        [0.293329304506, 0.734642489361, -0.611766566546],
        [-0.480176899428, -0.046026929940, 0.875963279468],
        [-0.705684904851, 0.704780196051, -0.072757750931],
        [0.370605109670, 0.769162968265, 0.520615194684],
        [-0.904030464226, -0.412626217894, -0.111662545460],
        [-0.162180419233, -0.247163999394, -0.955304908927],
        [0.063327560246, -0.997971078243, -0.006583851785],
        [0.610701141906, -0.322016246902, 0.723429092590],
    ],
};

pub static CAPPED_SQUARE_ANTIPRISMATIC: ReferenceGeometry = ReferenceGeometry {
    name: "Capped square antiprismatic",
    symbol: "CSAPR-9",
    vertices: &[
        [0.0, 0.932111, 0.362172],
        [0.0, -0.932111, 0.362172],
        [0.932111, 0.0, 0.362172],
        [-0.932111, 0.0, 0.362172],
        [0.559626, 0.559626, -0.611258],
        [0.559626, -0.559626, -0.611258],
        [-0.559626, 0.559626, -0.611258],
        [-0.559626, -0.559626, -0.611258],
        [0.0, 0.0, 1.0],
    ],
};

// ============================================================================
// CN 10 – 12
// ============================================================================

pub static BICAPPED_SQUARE_ANTIPRISMATIC: ReferenceGeometry = ReferenceGeometry {
    name: "Bicapped square antiprismatic",
    symbol: "BSAPR-10",
    vertices: &[
        [0.978696890330, 0.074682616274, 0.191245663177],
        [0.537258145625, 0.448413180814, -0.714338368164],
        [-0.227939324473, -0.303819959434, -0.925060590777],
        [0.274577116268, 0.833436432027, 0.479573895237],
        [-0.599426405232, 0.240685139624, 0.763386303437],
        [-0.424664555168, 0.830194107787, -0.361161679833],
        [-0.402701180119, -0.893328907767, 0.199487398294],
        [0.552788606831, -0.770301636525, -0.317899583084],
        [0.290107593166, -0.385278374104, 0.876012647646],
        [-0.978696887344, -0.074682599351, -0.191245685067],
    ],
};

pub static EDGE_CONTRACTED_ICOSAHEDRAL: ReferenceGeometry = ReferenceGeometry {
    name: "Edge-contracted icosahedral",
    symbol: "ECIC-11",
    vertices: &[
        [0.153486836562, -0.831354332797, 0.534127105044],
        [0.092812115769, 0.691598091278, -0.716294626049],
        [0.686120068086, 0.724987503180, 0.060269166267],
        [0.101393837471, 0.257848797505, 0.960850293931],
        [-0.143059218646, -0.243142754178, -0.959382958495],
        [-0.909929380017, 0.200934944687, -0.362841110384],
        [-0.405338453688, 0.872713317547, 0.272162090194],
        [0.896918545883, -0.184616420020, 0.401813264476],
        [0.731466092268, -0.415052523977, -0.541007170195],
        [-0.439821168531, -0.864743799130, -0.242436592901],
        [-0.773718984882, -0.203685975092, 0.599892453681],
    ],
};

pub static ICOSAHEDRAL: ReferenceGeometry = ReferenceGeometry {
    name: "Icosahedral",
    symbol: "IC-12",
    vertices: &[
        [0.525731, 0.0, 0.850651],
        [0.525731, 0.0, -0.850651],
        [-0.525731, 0.0, 0.850651],
        [-0.525731, 0.0, -0.850651],
        [0.850651, 0.525731, 0.0],
        [0.850651, -0.525731, 0.0],
        [-0.850651, 0.525731, 0.0],
        [-0.850651, -0.525731, 0.0],
        [0.0, 0.850651, 0.525731],
        [0.0, 0.850651, -0.525731],
        [0.0, -0.850651, 0.525731],
        [0.0, -0.850651, -0.525731],
    ],
};

pub static CUBOCTAHEDRAL: ReferenceGeometry = ReferenceGeometry {
    name: "Cuboctahedral",
    symbol: "COC-12",
    vertices: &[
        [0.707107, 0.0, 0.707107],
        [0.707107, 0.0, -0.707107],
        [-0.707107, 0.0, 0.707107],
        [-0.707107, 0.0, -0.707107],
        [0.707107, 0.707107, 0.0],
        [0.707107, -0.707107, 0.0],
        [-0.707107, 0.707107, 0.0],
        [-0.707107, -0.707107, 0.0],
        [0.0, 0.707107, 0.707107],
        [0.0, 0.707107, -0.707107],
        [0.0, -0.707107, 0.707107],
        [0.0, -0.707107, -0.707107],
    ],
};

/// Every reference geometry, ordered by coordination number
static ALL: [&ReferenceGeometry; 32] = [
    &LINEAR,
    &V_SHAPE,
    &L_SHAPE,
    &TRIGONAL_PLANAR,
    &PYRAMID,
    &T_SHAPED,
    &SQUARE_PLANAR,
    &TETRAHEDRAL,
    &SEESAW,
    &VACANT_TRIGONAL_BIPYRAMID,
    &PENTAGON,
    &VACANT_OCTAHEDRON,
    &TRIGONAL_BIPYRAMIDAL,
    &SQUARE_PYRAMIDAL,
    &HEXAGON,
    &PENTAGONAL_PYRAMIDAL,
    &OCTAHEDRAL,
    &TRIGONAL_PRISMATIC,
    &PENTAGONAL_BIPYRAMIDAL,
    &CAPPED_OCTAHEDRAL,
    &CAPPED_TRIGONAL_PRISMATIC,
    &HEXAGONAL_BIPYRAMIDAL,
    &CUBIC,
    &SQUARE_ANTIPRISMATIC,
    &TRIANGULAR_DODECAHEDRAL,
    &HEPTAGONAL_BIPYRAMIDAL,
    &TRICAPPED_TRIGONAL_PRISMATIC,
    &CAPPED_SQUARE_ANTIPRISMATIC,
    &BICAPPED_SQUARE_ANTIPRISMATIC,
    &EDGE_CONTRACTED_ICOSAHEDRAL,
    &ICOSAHEDRAL,
    &CUBOCTAHEDRAL,
];

/// All reference geometries
pub fn all_geometries() -> &'static [&'static ReferenceGeometry] {
    &ALL
}

/// Reference geometries with `cn` vertices (empty when none exist)
pub fn geometries_for_cn(cn: usize) -> Vec<&'static ReferenceGeometry> {
    all_geometries()
        .iter()
        .copied()
        .filter(|g| g.coordination_number() == cn)
        .collect()
}

/// Look up a geometry by name or symbol (case-insensitive)
pub fn find_geometry(name: &str) -> Option<&'static ReferenceGeometry> {
    all_geometries()
        .iter()
        .copied()
        .find(|g| g.name.eq_ignore_ascii_case(name) || g.symbol.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::mat3::norm;

    #[test]
    fn test_vertices_are_unit_length() {
        for g in all_geometries() {
            for v in g.vertices {
                let len = norm(v);
                assert!((len - 1.0).abs() < 1e-5, "{} has vertex of length {}", g.name, len);
            }
        }
    }

    #[test]
    fn test_tetrahedral_angles_are_ideal() {
        let v = TETRAHEDRAL.unit_vertices();
        for i in 0..4 {
            for j in i + 1..4 {
                let cos = crate::linalg::mat3::dot(&v[i], &v[j]);
                assert!((cos + 1.0 / 3.0).abs() < 1e-5, "T-4 vertices {} and {}: cos {}", i, j, cos);
            }
        }

        let third = 1.0 / 3.0;
        let ideal = [
            [0.0, 1.0, 0.0],
            [0.0, -third, (8.0f64 / 9.0).sqrt()],
            [(2.0f64 / 3.0).sqrt(), -third, -(2.0f64 / 9.0).sqrt()],
            [-(2.0f64 / 3.0).sqrt(), -third, -(2.0f64 / 9.0).sqrt()],
        ];
        let e = crate::measure::evaluate_rotation(&crate::linalg::mat3::IDENTITY, &ideal, &v);
        assert!(e.measure < 1e-8, "ideal tetrahedron scores {}", e.measure);
    }

    #[test]
    fn test_names_unique() {
        let all = all_geometries();
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.name, b.name);
                assert_ne!(a.symbol, b.symbol);
            }
        }
    }

    #[test]
    fn test_every_cn_covered() {
        for cn in 2..=12 {
            assert!(!geometries_for_cn(cn).is_empty(), "no geometry for CN {}", cn);
        }
        assert!(geometries_for_cn(1).is_empty());
        assert!(geometries_for_cn(13).is_empty());
        assert_eq!(geometries_for_cn(6).len(), 4);
    }

    #[test]
    fn test_find_geometry() {
        assert_eq!(find_geometry("octahedral").map(|g| g.symbol), Some("OC-6"));
        assert_eq!(find_geometry("SP-4").map(|g| g.name), Some("Square planar"));
        assert!(find_geometry("Dodecagon").is_none());
    }

    #[test]
    fn test_unit_vertices_renormalized() {
        for v in TETRAHEDRAL.unit_vertices() {
            assert!((norm(&v) - 1.0).abs() < 1e-12);
        }
    }
}
