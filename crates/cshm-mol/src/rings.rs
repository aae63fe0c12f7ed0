//! Ring and hapticity detection
//!
//! Finds planar rings among the coordinating atoms (π-bound ligands such as
//! cyclopentadienyl or arenes) and partitions the coordinating atoms into
//! ligand groups: each atom belongs to exactly one ring or is monodentate.

use ahash::AHashSet;
use lin_alg::f64::Vec3;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::atom::{to_array, Atom};
use crate::element::hill_formula;
use crate::error::AnalysisResult;
use crate::validate_coordination;

/// Ring detection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingDetectionParams {
    /// Maximum atom–atom distance (Å) counted as a ring bond
    pub bond_threshold: f64,
    pub min_ring_size: usize,
    pub max_ring_size: usize,
    /// Maximum distance (Å) of any ring atom from the ring plane
    pub planarity_tolerance: f64,
}

impl Default for RingDetectionParams {
    fn default() -> Self {
        Self {
            bond_threshold: 1.8,
            min_ring_size: 3,
            max_ring_size: 8,
            planarity_tolerance: 0.3,
        }
    }
}

/// Coarse ring size bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RingSizeClass {
    /// 3–4 atoms
    Small,
    /// 5–6 atoms
    Medium,
    /// 7 or more atoms
    Large,
}

impl RingSizeClass {
    fn of(size: usize) -> Self {
        match size {
            0..=4 => RingSizeClass::Small,
            5 | 6 => RingSizeClass::Medium,
            _ => RingSizeClass::Large,
        }
    }
}

/// η-number and a human-readable ligand label, e.g. "η⁵-cyclopentadienyl"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hapticity {
    pub eta: usize,
    pub label: String,
}

impl Hapticity {
    fn new(atoms: &[Atom], indices: &[usize]) -> Self {
        let eta = indices.len();
        let all_carbon = indices.iter().all(|&i| atoms[i].element.is_carbon());
        let name = match (all_carbon, eta) {
            (true, 3) => "cyclopropenyl".to_string(),
            (true, 4) => "cyclobutadiene".to_string(),
            (true, 5) => "cyclopentadienyl".to_string(),
            (true, 6) => "arene".to_string(),
            (true, 7) => "tropylium".to_string(),
            (true, 8) => "cyclooctatetraene".to_string(),
            _ => hill_formula(indices.iter().map(|&i| atoms[i].element)),
        };
        Self {
            eta,
            label: format!("η{}-{}", superscript(eta), name),
        }
    }
}

fn superscript(n: usize) -> String {
    const DIGITS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];
    n.to_string()
        .chars()
        .filter_map(|c| c.to_digit(10).map(|d| DIGITS[d as usize]))
        .collect()
}

/// A planar ring of coordinating atoms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    /// Atom indices in ring order
    pub atom_indices: Vec<usize>,
    pub centroid: [f64; 3],
    /// Unit normal, oriented from the ring toward the metal
    pub normal: [f64; 3],
    pub hapticity: Hapticity,
    pub size_class: RingSizeClass,
    /// Largest atom distance (Å) from the mean plane
    pub max_deviation: f64,
}

impl Ring {
    #[inline]
    pub fn size(&self) -> usize {
        self.atom_indices.len()
    }

    pub fn centroid_vec(&self) -> Vec3 {
        Vec3::new(self.centroid[0], self.centroid[1], self.centroid[2])
    }

    pub fn normal_vec(&self) -> Vec3 {
        Vec3::new(self.normal[0], self.normal[1], self.normal[2])
    }

    fn build(atoms: &[Atom], indices: Vec<usize>, metal: Vec3) -> Option<Self> {
        let n = indices.len() as f64;
        let positions: Vec<Vec3> = indices.iter().map(|&i| atoms[i].position).collect();
        let centroid = positions.iter().fold(Vec3::new(0.0, 0.0, 0.0), |acc, &p| acc + p) / n;

        // Newell normal: sum of edge cross products, robust for non-planar polygons
        let mut area = Vec3::new(0.0, 0.0, 0.0);
        for (k, &p) in positions.iter().enumerate() {
            let q = positions[(k + 1) % positions.len()];
            area = area + (p - centroid).cross(q - centroid);
        }
        let len = area.magnitude();
        if len < 1e-10 {
            return None;
        }
        let mut normal = area / len;
        if normal.dot(metal - centroid) < 0.0 {
            normal = normal * -1.0;
        }

        let max_deviation = positions
            .iter()
            .map(|&p| (p - centroid).dot(normal).abs())
            .fold(0.0, f64::max);

        Some(Self {
            hapticity: Hapticity::new(atoms, &indices),
            size_class: RingSizeClass::of(indices.len()),
            atom_indices: indices,
            centroid: to_array(centroid),
            normal: to_array(normal),
            max_deviation,
        })
    }
}

/// One ligand attachment: a whole ring or a single atom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LigandGroup {
    Ring(Ring),
    Monodentate { atom_index: usize },
}

/// Partition of the coordinating atoms into ligand groups
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LigandGroups {
    /// Rings first (smallest first), then monodentates in input order
    pub groups: Vec<LigandGroup>,
}

impl LigandGroups {
    pub fn rings(&self) -> impl Iterator<Item = &Ring> + '_ {
        self.groups.iter().filter_map(|g| match g {
            LigandGroup::Ring(r) => Some(r),
            LigandGroup::Monodentate { .. } => None,
        })
    }

    pub fn monodentates(&self) -> impl Iterator<Item = usize> + '_ {
        self.groups.iter().filter_map(|g| match g {
            LigandGroup::Monodentate { atom_index } => Some(*atom_index),
            LigandGroup::Ring(_) => None,
        })
    }

    pub fn ring_count(&self) -> usize {
        self.rings().count()
    }

    pub fn monodentate_count(&self) -> usize {
        self.monodentates().count()
    }

    /// `index`-th ring in group order
    pub fn ring(&self, index: usize) -> Option<&Ring> {
        self.rings().nth(index)
    }

    /// Every atom index covered by the groups, sorted
    pub fn atom_indices(&self) -> Vec<usize> {
        let mut all: Vec<usize> = self
            .groups
            .iter()
            .flat_map(|g| match g {
                LigandGroup::Ring(r) => r.atom_indices.clone(),
                LigandGroup::Monodentate { atom_index } => vec![*atom_index],
            })
            .collect();
        all.sort_unstable();
        all
    }
}

/// Detect rings among `coordinating` and partition them into ligand groups.
///
/// Rings are simple cycles of bonded (≤ `bond_threshold`) coordinating
/// atoms whose atoms all lie within `planarity_tolerance` of the plane
/// through the cycle's first three atoms. Overlapping rings are resolved
/// smallest-first; atoms in no accepted ring become monodentate.
pub fn detect_rings(
    atoms: &[Atom],
    metal_index: usize,
    coordinating: &[usize],
    params: &RingDetectionParams,
) -> AnalysisResult<LigandGroups> {
    validate_coordination(atoms, metal_index, coordinating)?;
    let metal = atoms[metal_index].position;

    let cycles = find_cycles(atoms, coordinating, params);
    let mut planar: Vec<Vec<usize>> = cycles
        .into_iter()
        .filter(|c| is_planar(atoms, c, params.planarity_tolerance))
        .collect();
    planar.sort_by(|a, b| {
        let mut sa = a.clone();
        let mut sb = b.clone();
        sa.sort_unstable();
        sb.sort_unstable();
        a.len().cmp(&b.len()).then(sa.cmp(&sb))
    });

    let mut used: AHashSet<usize> = AHashSet::new();
    let mut groups = Vec::new();
    for cycle in planar {
        if cycle.iter().any(|i| used.contains(i)) {
            continue;
        }
        if let Some(ring) = Ring::build(atoms, cycle, metal) {
            debug!("Detected {} ring: atoms {:?}", ring.hapticity.label, ring.atom_indices);
            used.extend(ring.atom_indices.iter().copied());
            groups.push(LigandGroup::Ring(ring));
        }
    }
    groups.extend(
        coordinating
            .iter()
            .filter(|&i| !used.contains(i))
            .map(|&atom_index| LigandGroup::Monodentate { atom_index }),
    );

    Ok(LigandGroups { groups })
}

/// All simple cycles of allowed length, as atom indices in ring order.
///
/// Each cycle is reported once, starting from its lowest local index.
fn find_cycles(atoms: &[Atom], coordinating: &[usize], params: &RingDetectionParams) -> Vec<Vec<usize>> {
    let n = coordinating.len();
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
    for a in 0..n {
        for b in (a + 1)..n {
            if atoms[coordinating[a]].distance_to(&atoms[coordinating[b]]) <= params.bond_threshold {
                adjacency[a].push(b);
                adjacency[b].push(a);
            }
        }
    }

    let mut seen: AHashSet<Vec<usize>> = AHashSet::new();
    let mut cycles = Vec::new();
    let mut path = Vec::with_capacity(params.max_ring_size);
    let mut on_path = vec![false; n];
    for start in 0..n {
        path.push(start);
        on_path[start] = true;
        extend_path(start, &adjacency, params, &mut path, &mut on_path, &mut |cycle: &[usize]| {
            let mut key = cycle.to_vec();
            key.sort_unstable();
            if seen.insert(key) {
                cycles.push(cycle.iter().map(|&l| coordinating[l]).collect());
            }
        });
        path.pop();
        on_path[start] = false;
    }
    cycles
}

fn extend_path(
    start: usize,
    adjacency: &[Vec<usize>],
    params: &RingDetectionParams,
    path: &mut Vec<usize>,
    on_path: &mut [bool],
    found: &mut dyn FnMut(&[usize]),
) {
    let Some(&last) = path.last() else {
        return;
    };
    for &next in &adjacency[last] {
        if next == start && path.len() >= params.min_ring_size.max(3) {
            found(path.as_slice());
        } else if next > start && !on_path[next] && path.len() < params.max_ring_size {
            path.push(next);
            on_path[next] = true;
            extend_path(start, adjacency, params, path, on_path, found);
            path.pop();
            on_path[next] = false;
        }
    }
}

/// All atoms within `tolerance` of the plane through the first three
fn is_planar(atoms: &[Atom], cycle: &[usize], tolerance: f64) -> bool {
    let p0 = atoms[cycle[0]].position;
    let p1 = atoms[cycle[1]].position;
    let p2 = atoms[cycle[2]].position;
    let normal = (p1 - p0).cross(p2 - p0);
    let len = normal.magnitude();
    if len < 1e-10 {
        return false;
    }
    let normal = normal / len;
    cycle
        .iter()
        .all(|&i| (atoms[i].position - p0).dot(normal).abs() <= tolerance)
}
