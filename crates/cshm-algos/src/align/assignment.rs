//! Point-correspondence assignment
//!
//! Solves the square linear assignment problem on a non-negative cost
//! matrix. Small problems (N ≤ 3) are enumerated exhaustively. Larger
//! problems use row/column reduction followed by a greedy zero cover;
//! when the zero cover does not produce a perfect matching the solver
//! falls back to greedy cheapest-pair matching, which is not guaranteed
//! optimal but always yields a valid bijection.

use log::trace;

/// Largest problem solved by exhaustive enumeration
pub const EXHAUSTIVE_LIMIT: usize = 3;

/// Reduced costs at or below this (relative to the largest cost) count as zero
const ZERO_EPS: f64 = 1e-9;

/// Dense N×N cost matrix, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    n: usize,
    data: Vec<f64>,
}

impl CostMatrix {
    /// All-zero N×N matrix
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    /// Build from a cost function `f(row, col)`
    pub fn from_fn(n: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                data.push(f(i, j));
            }
        }
        Self { n, data }
    }

    /// Build from nested rows. Returns `None` unless the rows form a square matrix.
    pub fn from_rows(rows: &[Vec<f64>]) -> Option<Self> {
        let n = rows.len();
        if rows.iter().any(|r| r.len() != n) {
            return None;
        }
        Some(Self {
            n,
            data: rows.iter().flatten().copied().collect(),
        })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.n + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.n + col] = value;
    }

    /// Total cost of a row → column mapping
    pub fn cost_of(&self, mapping: &[usize]) -> f64 {
        mapping
            .iter()
            .enumerate()
            .map(|(row, &col)| self.get(row, col))
            .sum()
    }

    fn max_value(&self) -> f64 {
        self.data.iter().copied().fold(0.0, f64::max)
    }
}

/// Which strategy produced an assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentMethod {
    /// All permutations enumerated (exact)
    Exhaustive,
    /// Perfect matching found on the zeros of the reduced matrix (exact)
    ReducedZeroCover,
    /// Greedy cheapest-pair matching (approximate)
    GreedyFallback,
}

/// A row → column bijection with its cost
#[derive(Debug, Clone)]
pub struct Assignment {
    /// `mapping[row] = col`
    pub mapping: Vec<usize>,
    /// Sum of the original costs along the mapping
    pub total_cost: f64,
    pub method: AssignmentMethod,
}

/// Solve the assignment problem for `cost`.
///
/// The returned mapping is always a bijection on `0..n`.
pub fn solve_assignment(cost: &CostMatrix) -> Assignment {
    let n = cost.size();
    if n <= EXHAUSTIVE_LIMIT {
        return exhaustive(cost);
    }

    let reduced = reduce(cost);
    if let Some(mapping) = zero_cover(&reduced, cost) {
        let total_cost = cost.cost_of(&mapping);
        return Assignment {
            mapping,
            total_cost,
            method: AssignmentMethod::ReducedZeroCover,
        };
    }

    trace!("zero cover incomplete for {}x{} matrix, using greedy matching", n, n);
    let mapping = greedy(cost);
    let total_cost = cost.cost_of(&mapping);
    Assignment {
        mapping,
        total_cost,
        method: AssignmentMethod::GreedyFallback,
    }
}

fn exhaustive(cost: &CostMatrix) -> Assignment {
    let n = cost.size();
    let mut perm: Vec<usize> = (0..n).collect();
    let mut best = perm.clone();
    let mut best_cost = cost.cost_of(&perm);
    permute(cost, &mut perm, 0, &mut best, &mut best_cost);
    Assignment {
        mapping: best,
        total_cost: best_cost,
        method: AssignmentMethod::Exhaustive,
    }
}

fn permute(cost: &CostMatrix, perm: &mut [usize], k: usize, best: &mut Vec<usize>, best_cost: &mut f64) {
    if k == perm.len() {
        let c = cost.cost_of(perm);
        if c < *best_cost {
            *best_cost = c;
            best.copy_from_slice(perm);
        }
        return;
    }
    for i in k..perm.len() {
        perm.swap(k, i);
        permute(cost, perm, k + 1, best, best_cost);
        perm.swap(k, i);
    }
}

/// Subtract each row's minimum, then each column's minimum
fn reduce(cost: &CostMatrix) -> CostMatrix {
    let n = cost.size();
    let mut m = cost.clone();
    for i in 0..n {
        let min = (0..n).map(|j| m.get(i, j)).fold(f64::INFINITY, f64::min);
        for j in 0..n {
            m.set(i, j, m.get(i, j) - min);
        }
    }
    for j in 0..n {
        let min = (0..n).map(|i| m.get(i, j)).fold(f64::INFINITY, f64::min);
        for i in 0..n {
            m.set(i, j, m.get(i, j) - min);
        }
    }
    m
}

/// Greedy perfect matching on reduced zeros.
///
/// Repeatedly assigns the unassigned row with the fewest still-available
/// zeros, choosing its zero with the lowest original cost. Returns `None`
/// as soon as some unassigned row has no available zero left.
fn zero_cover(reduced: &CostMatrix, cost: &CostMatrix) -> Option<Vec<usize>> {
    let n = reduced.size();
    let eps = ZERO_EPS * cost.max_value().max(1.0);
    let zeros: Vec<Vec<usize>> = (0..n)
        .map(|i| (0..n).filter(|&j| reduced.get(i, j) <= eps).collect())
        .collect();

    let mut row_done = vec![false; n];
    let mut col_taken = vec![false; n];
    let mut mapping = vec![usize::MAX; n];

    for _ in 0..n {
        let mut pick: Option<(usize, usize)> = None; // (row, available count)
        for i in (0..n).filter(|&i| !row_done[i]) {
            let available = zeros[i].iter().filter(|&&j| !col_taken[j]).count();
            if available == 0 {
                return None;
            }
            if pick.map_or(true, |(_, best)| available < best) {
                pick = Some((i, available));
            }
        }
        let (row, _) = pick?;
        let col = zeros[row]
            .iter()
            .copied()
            .filter(|&j| !col_taken[j])
            .min_by(|&a, &b| cost.get(row, a).total_cmp(&cost.get(row, b)))?;
        mapping[row] = col;
        row_done[row] = true;
        col_taken[col] = true;
    }
    Some(mapping)
}

/// Take pairs in ascending original cost while both row and column are free
fn greedy(cost: &CostMatrix) -> Vec<usize> {
    let n = cost.size();
    let mut pairs: Vec<(usize, usize)> = (0..n).flat_map(|i| (0..n).map(move |j| (i, j))).collect();
    pairs.sort_by(|&(ai, aj), &(bi, bj)| {
        cost.get(ai, aj)
            .total_cmp(&cost.get(bi, bj))
            .then(ai.cmp(&bi))
            .then(aj.cmp(&bj))
    });

    let mut mapping = vec![usize::MAX; n];
    let mut col_taken = vec![false; n];
    let mut assigned = 0;
    for (i, j) in pairs {
        if mapping[i] == usize::MAX && !col_taken[j] {
            mapping[i] = j;
            col_taken[j] = true;
            assigned += 1;
            if assigned == n {
                break;
            }
        }
    }
    mapping
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_bijection(mapping: &[usize]) -> bool {
        let mut seen = vec![false; mapping.len()];
        mapping.iter().all(|&j| j < seen.len() && !std::mem::replace(&mut seen[j], true))
    }

    #[test]
    fn test_empty() {
        let a = solve_assignment(&CostMatrix::zeros(0));
        assert!(a.mapping.is_empty());
        assert_eq!(a.total_cost, 0.0);
    }

    #[test]
    fn test_exhaustive_three() {
        let cost = CostMatrix::from_rows(&[
            vec![4.0, 1.0, 3.0],
            vec![2.0, 0.0, 5.0],
            vec![3.0, 2.0, 2.0],
        ])
        .unwrap();
        let a = solve_assignment(&cost);
        assert_eq!(a.method, AssignmentMethod::Exhaustive);
        assert_eq!(a.mapping, vec![1, 0, 2]);
        assert!((a.total_cost - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_reduced_zero_cover_is_optimal() {
        let cost = CostMatrix::from_rows(&[
            vec![0.0, 5.0, 5.0, 5.0],
            vec![0.0, 5.0, 5.0, 5.0],
            vec![5.0, 0.0, 5.0, 5.0],
            vec![5.0, 5.0, 0.0, 5.0],
        ])
        .unwrap();
        let a = solve_assignment(&cost);
        assert_eq!(a.method, AssignmentMethod::ReducedZeroCover);
        assert!(is_bijection(&a.mapping));
        assert!((a.total_cost - 5.0).abs() < 1e-12, "cost {}", a.total_cost);
    }

    #[test]
    fn test_diagonal_permutation_recovered() {
        // Squared distances between a point set and a permuted copy
        let pts: [[f64; 3]; 5] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [-1.0, 0.0, 0.0], [0.0, -1.0, 0.0], [0.0, 0.0, 1.0]];
        let perm = [3, 0, 4, 1, 2];
        let cost = CostMatrix::from_fn(5, |i, j| {
            let a = pts[i];
            let b = pts[perm[j]];
            (0..3).map(|k| (a[k] - b[k]).powi(2)).sum()
        });
        let a = solve_assignment(&cost);
        assert!(a.total_cost.abs() < 1e-12);
        for (i, &j) in a.mapping.iter().enumerate() {
            assert_eq!(perm[j], i);
        }
    }

    #[test]
    fn test_greedy_fallback_is_valid_but_approximate() {
        // c[i][j] = (i+1)(j+1): reduced zeros sit only in row 0 and column 0
        let cost = CostMatrix::from_fn(4, |i, j| ((i + 1) * (j + 1)) as f64);
        let a = solve_assignment(&cost);
        assert_eq!(a.method, AssignmentMethod::GreedyFallback);
        assert!(is_bijection(&a.mapping));
        assert_eq!(a.mapping, vec![0, 1, 2, 3]);
        assert!((a.total_cost - 30.0).abs() < 1e-12);
        // The true optimum pairs in reverse order (cost 20)
        assert!(a.total_cost >= cost.cost_of(&[3, 2, 1, 0]));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        assert!(CostMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).is_none());
    }
}
