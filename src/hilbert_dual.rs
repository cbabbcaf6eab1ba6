//! Hilbert basis enumeration via the dual algorithm (C8).
//!
//! Given a subspace described as the kernel of an integer matrix (one row
//! per defining hyperplane) and a family of "at most one nonzero" exclusion
//! constraints, this enumerates the Hilbert basis of the intersection of
//! that subspace with the non-negative orthant: the minimal set of
//! non-negative integer vectors such that every non-negative integer point
//! of the subspace satisfying the constraints is a non-negative integer
//! combination of basis vectors.
//!
//! The algorithm processes one hyperplane at a time, starting from the
//! standard unit vectors (the Hilbert basis of the whole orthant) and at
//! each step keeping only the vectors compatible with the hyperplanes seen
//! so far, regenerating new candidates as sums of positive/negative pairs
//! and discarding anything dominated by an existing, smaller vector. Each
//! candidate carries a cached dot product against the current hyperplane
//! and a bitmask of its nonzero coordinates, both used to prune dominated
//! or constraint-violating sums before the (expensive) vector comparison.

use crate::bitmask::{Bitmask, Bitmask128, Bitmask16, Bitmask256, Bitmask32, Bitmask64, Bitmask8, DynBitmask};
use crate::error::{CoreError, Result};
use crate::int::Int;
use crate::matrix::Matrix;
use std::cmp::Ordering;

/// A family of coordinate groups, each of which must have at most one
/// nonzero coordinate in any vector admitted by the enumeration.
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet(pub Vec<Vec<usize>>);

impl ConstraintSet {
    /// No constraints: every non-negative combination is admissible.
    pub fn none() -> Self {
        ConstraintSet(Vec::new())
    }
}

/// A candidate Hilbert basis vector, carrying its cached dot product
/// against the hyperplane currently being processed and a bitmask of its
/// nonzero coordinates.
///
/// `mask` is *not* recomputed from `values` after a sum: [`VecSpec::form_sum`]
/// takes it as the union of the two summands' masks, which may be a strict
/// superset of the sum's actual nonzero coordinates if a cancellation
/// occurred. This over-approximation is deliberate: it is what the
/// constraint check and domination test operate on.
#[derive(Debug, Clone)]
struct VecSpec<I: Int, B: Bitmask> {
    values: Vec<I>,
    next_hyp: I,
    mask: B,
}

impl<I: Int, B: Bitmask> VecSpec<I, B> {
    fn unit(pos: usize, dim: usize) -> Self {
        let mut values = vec![I::zero(); dim];
        values[pos] = I::one();
        let mut mask = B::with_len(dim);
        mask.set(pos);
        VecSpec { values, next_hyp: I::zero(), mask }
    }

    /// Recompute `next_hyp` as the dot product of `values` with `row` of
    /// `subspace`, skipping positions where either factor is already zero.
    fn init_next_hyp(&mut self, subspace: &Matrix<I>, row: usize) {
        let mut acc = I::zero();
        for (i, v) in self.values.iter().enumerate() {
            if v.is_zero() {
                continue;
            }
            let coeff = subspace.entry(row, i);
            if coeff.is_zero() {
                continue;
            }
            acc = acc + &(coeff.clone() * v);
        }
        self.next_hyp = acc;
    }

    fn sign(&self) -> i32 {
        match self.next_hyp.cmp(&I::zero()) {
            Ordering::Equal => 0,
            Ordering::Greater => 1,
            Ordering::Less => -1,
        }
    }

    fn form_sum(&self, other: &Self) -> Self {
        let values = self.values.iter().zip(other.values.iter()).map(|(a, b)| a.clone() + b).collect();
        let next_hyp = self.next_hyp.clone() + &other.next_hyp;
        let mut mask = self.mask.clone();
        mask.union_with(&other.mask);
        VecSpec { values, next_hyp, mask }
    }

    /// `true` iff `self` is coordinatewise `<=` `other` and `self`'s nonzero
    /// mask is a subset of `other`'s.
    fn le(&self, other: &Self) -> bool {
        self.mask.subset_of(&other.mask) && self.values.iter().zip(other.values.iter()).all(|(a, b)| a <= b)
    }
}

/// `true` iff `b` dominates `v`: `b <= v` coordinatewise and mask-wise, and
/// `b`'s hyperplane dot product sits on the correct side of `v`'s for the
/// bucket (`list_sign`) they both belong to.
fn dominated_by<I: Int, B: Bitmask>(v: &VecSpec<I, B>, b: &VecSpec<I, B>, list_sign: i32) -> bool {
    if !b.le(v) {
        return false;
    }
    match list_sign.cmp(&0) {
        Ordering::Greater => b.next_hyp <= v.next_hyp,
        Ordering::Less => v.next_hyp <= b.next_hyp,
        Ordering::Equal => b.next_hyp == v.next_hyp,
    }
}

fn reduces<I: Int, B: Bitmask>(v: &VecSpec<I, B>, against: &[VecSpec<I, B>], list_sign: i32) -> bool {
    against.iter().any(|b| dominated_by(v, b, list_sign))
}

/// Remove every vector from `list` that is dominated by a *different*
/// vector still present in `list` (duplicates dominate each other; one
/// survives).
fn reduce_basis_self<I: Int, B: Bitmask>(list: &mut Vec<VecSpec<I, B>>, list_sign: i32) {
    let n = list.len();
    let mut keep = vec![true; n];
    for i in 0..n {
        if !keep[i] {
            continue;
        }
        for j in 0..n {
            if i == j || !keep[j] {
                continue;
            }
            if dominated_by(&list[i], &list[j], list_sign) {
                keep[i] = false;
                break;
            }
        }
    }
    let mut idx = 0;
    list.retain(|_| {
        let k = keep[idx];
        idx += 1;
        k
    });
}

/// Remove every vector from `target` that is dominated by some vector in
/// `against`.
fn reduce_basis_against<I: Int, B: Bitmask>(target: &mut Vec<VecSpec<I, B>>, against: &[VecSpec<I, B>], list_sign: i32) {
    target.retain(|v| !reduces(v, against, list_sign));
}

/// Process one hyperplane row: partition `list` by the sign of its dot
/// product with `row`, then repeatedly form sums of one positive and one
/// negative vector, keeping only those compatible with `constraint_masks`
/// and not dominated by an existing (or already-formed) vector of the same
/// sign, until a full round produces nothing new. Returns the surviving
/// zero-sign vectors, which satisfy every hyperplane processed so far.
fn intersect_hyperplane<I: Int, B: Bitmask>(
    list: Vec<VecSpec<I, B>>,
    subspace: &Matrix<I>,
    row: usize,
    constraint_masks: &[B],
) -> Vec<VecSpec<I, B>> {
    let mut zero = Vec::new();
    let mut pos = Vec::new();
    let mut neg = Vec::new();
    for mut v in list {
        v.init_next_hyp(subspace, row);
        match v.sign() {
            0 => zero.push(v),
            1 => pos.push(v),
            _ => neg.push(v),
        }
    }

    let mut pos_prev_gen = 0usize;
    let mut neg_prev_gen = 0usize;

    loop {
        let mut new_zero = Vec::new();
        let mut new_pos = Vec::new();
        let mut new_neg = Vec::new();

        for (pi, p) in pos.iter().enumerate() {
            for (ni, n) in neg.iter().enumerate() {
                if pi < pos_prev_gen && ni < neg_prev_gen {
                    // Both vectors predate this round; this pair was already
                    // tried (and rejected, or it would already be present).
                    continue;
                }
                let mut comb = p.mask.clone();
                comb.union_with(&n.mask);
                if constraint_masks.iter().any(|cm| {
                    let mut t = comb.clone();
                    t.intersect_with(cm);
                    !t.at_most_one_bit()
                }) {
                    continue;
                }

                let sum = p.form_sum(n);
                match sum.sign() {
                    0 => {
                        if !reduces(&sum, &zero, 0) && !reduces(&sum, &new_zero, 0) {
                            new_zero.push(sum);
                        }
                    }
                    1 => {
                        if !reduces(&sum, &pos, 1) && !reduces(&sum, &new_pos, 1) {
                            new_pos.push(sum);
                        }
                    }
                    _ => {
                        if !reduces(&sum, &neg, -1) && !reduces(&sum, &new_neg, -1) {
                            new_neg.push(sum);
                        }
                    }
                }
            }
        }

        if new_zero.is_empty() && new_pos.is_empty() && new_neg.is_empty() {
            break;
        }

        reduce_basis_self(&mut new_zero, 0);
        reduce_basis_self(&mut new_pos, 1);
        reduce_basis_self(&mut new_neg, -1);
        reduce_basis_against(&mut zero, &new_zero, 0);
        reduce_basis_against(&mut pos, &new_pos, 1);
        reduce_basis_against(&mut neg, &new_neg, -1);

        pos_prev_gen = pos.len();
        neg_prev_gen = neg.len();
        zero.extend(new_zero);
        pos.extend(new_pos);
        neg.extend(new_neg);
    }

    zero
}

fn masks_for<B: Bitmask>(dim: usize, constraints: &ConstraintSet) -> Vec<B> {
    constraints
        .0
        .iter()
        .map(|group| {
            let mut m = B::with_len(dim);
            for &idx in group {
                m.set(idx);
            }
            m
        })
        .collect()
}

fn enumerate_with_bitmask<I: Int, B: Bitmask>(
    subspace: &Matrix<I>,
    constraint_masks: &[B],
    initial_rows: usize,
    mut should_cancel: impl FnMut() -> bool,
) -> Result<Vec<Vec<I>>> {
    let dim = subspace.cols();
    let n_eqns = subspace.rows();
    if n_eqns == 0 {
        return Ok((0..dim).map(|i| VecSpec::<I, B>::unit(i, dim).values).collect());
    }

    // The first `initial_rows` hyperplanes are processed in the caller's
    // order (typically the most discriminating ones, chosen by the caller);
    // the rest are processed in ascending order of nonzero-entry count, a
    // simple sparsity heuristic that keeps early rounds small.
    let mut order: Vec<usize> = (0..n_eqns).collect();
    order[initial_rows.min(n_eqns)..].sort_by_key(|&r| (0..dim).filter(|&c| !subspace.entry(r, c).is_zero()).count());

    let mut list: Vec<VecSpec<I, B>> = (0..dim).map(|i| VecSpec::unit(i, dim)).collect();
    for &row in &order {
        if should_cancel() {
            return Err(CoreError::Cancelled);
        }
        list = intersect_hyperplane(list, subspace, row, constraint_masks);
    }
    Ok(list.into_iter().map(|v| v.values).collect())
}

/// Enumerate the Hilbert basis of `ker(subspace) ∩ non-negative orthant`,
/// restricted to vectors satisfying every group in `constraints` (at most
/// one nonzero coordinate per group).
///
/// `initial_rows` lets the caller pin a prefix of `subspace`'s rows to be
/// processed first, in the given order, before the remaining rows are
/// processed in a sparsity-driven order; this matters for performance, not
/// correctness. `should_cancel` is polled once per hyperplane and, if it
/// returns `true`, aborts with [`CoreError::Cancelled`].
///
/// The bitmask width used internally is chosen from `subspace`'s column
/// count, falling back to an arbitrary-width [`DynBitmask`] beyond 256
/// coordinates.
pub fn enumerate_hilbert_basis<I: Int>(
    subspace: &Matrix<I>,
    constraints: &ConstraintSet,
    initial_rows: usize,
    mut should_cancel: impl FnMut() -> bool,
) -> Result<Vec<Vec<I>>> {
    let dim = subspace.cols();
    if dim <= 8 {
        let masks = masks_for::<Bitmask8>(dim, constraints);
        enumerate_with_bitmask(subspace, &masks, initial_rows, &mut should_cancel)
    } else if dim <= 16 {
        let masks = masks_for::<Bitmask16>(dim, constraints);
        enumerate_with_bitmask(subspace, &masks, initial_rows, &mut should_cancel)
    } else if dim <= 32 {
        let masks = masks_for::<Bitmask32>(dim, constraints);
        enumerate_with_bitmask(subspace, &masks, initial_rows, &mut should_cancel)
    } else if dim <= 64 {
        let masks = masks_for::<Bitmask64>(dim, constraints);
        enumerate_with_bitmask(subspace, &masks, initial_rows, &mut should_cancel)
    } else if dim <= 128 {
        let masks = masks_for::<Bitmask128>(dim, constraints);
        enumerate_with_bitmask(subspace, &masks, initial_rows, &mut should_cancel)
    } else if dim <= 256 {
        let masks = masks_for::<Bitmask256>(dim, constraints);
        enumerate_with_bitmask(subspace, &masks, initial_rows, &mut should_cancel)
    } else {
        let masks = masks_for::<DynBitmask>(dim, constraints);
        enumerate_with_bitmask(subspace, &masks, initial_rows, &mut should_cancel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::int::Integer;

    fn row(vals: &[i64]) -> Vec<Integer> {
        vals.iter().map(|&v| Integer::from_int(v)).collect()
    }

    fn subspace(rows: &[&[i64]], dim: usize) -> Matrix<Integer> {
        let mut m = Matrix::new(rows.len(), dim);
        for (i, r) in rows.iter().enumerate() {
            for (j, v) in row(r).into_iter().enumerate() {
                m.set(i, j, v);
            }
        }
        m
    }

    fn as_i64(vs: &[Vec<Integer>]) -> Vec<Vec<i64>> {
        let mut out: Vec<Vec<i64>> = vs
            .iter()
            .map(|v| v.iter().map(|x| x.as_bigint().clone().try_into().unwrap()).collect())
            .collect();
        out.sort();
        out
    }

    #[test]
    fn test_no_hyperplanes_gives_unit_vectors() {
        let sub = Matrix::new(0, 3);
        let basis = enumerate_hilbert_basis(&sub, &ConstraintSet::none(), 0, || false).unwrap();
        assert_eq!(as_i64(&basis), vec![vec![0, 0, 1], vec![0, 1, 0], vec![1, 0, 0]]);
    }

    #[test]
    fn test_single_hyperplane_x_equals_y() {
        // x - y = 0 in non-negative 2-space: Hilbert basis is {(1,1)}.
        let sub = subspace(&[&[1, -1]], 2);
        let basis = enumerate_hilbert_basis(&sub, &ConstraintSet::none(), 0, || false).unwrap();
        assert_eq!(as_i64(&basis), vec![vec![1, 1]]);
    }

    #[test]
    fn test_plane_x_plus_y_minus_z_minus_w_equals_zero() {
        // x + y = z + w in non-negative 4-space: Hilbert basis is the four
        // "cross" vectors pairing one of {x,y} with one of {z,w}.
        let sub = subspace(&[&[1, 1, -1, -1]], 4);
        let basis = enumerate_hilbert_basis(&sub, &ConstraintSet::none(), 0, || false).unwrap();
        assert_eq!(
            as_i64(&basis),
            vec![vec![0, 1, 0, 1], vec![0, 1, 1, 0], vec![1, 0, 0, 1], vec![1, 0, 1, 0]]
        );
    }

    #[test]
    fn test_constraint_excludes_simultaneous_nonzero_coordinates() {
        // Same plane as above, but x and z are mutually exclusive: any
        // basis vector with both x>0 and z>0 is disallowed.
        let sub = subspace(&[&[1, 1, -1, -1]], 4);
        let constraints = ConstraintSet(vec![vec![0, 2]]);
        let basis = enumerate_hilbert_basis(&sub, &constraints, 0, || false).unwrap();
        assert_eq!(as_i64(&basis), vec![vec![0, 1, 0, 1], vec![0, 1, 1, 0], vec![1, 0, 0, 1]]);
    }

    #[test]
    fn test_cancellation_is_reported() {
        let sub = subspace(&[&[1, -1]], 2);
        let err = enumerate_hilbert_basis(&sub, &ConstraintSet::none(), 0, || true).unwrap_err();
        assert!(matches!(err, CoreError::Cancelled));
    }
}
