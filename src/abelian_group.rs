//! Marked abelian groups (C6): the quotient ker(M)/img(N) of `Z^l` presented
//! by two matrices `M` (m×l) and `N` (l×n) with `M*N == 0`, together with
//! the basis-tracked Smith Normal Form machinery needed to move between
//! "chain" coordinates (elements of `Z^l`) and "SNF" coordinates (a free
//! part plus invariant-factor torsion summands).

use crate::error::{ensure_precondition, CoreError, Result};
use crate::int::{Int, Integer};
use crate::linalg::{preimage_of_lattice, rank};
use crate::matrix::Matrix;
use crate::snf::smith_normal_form;

/// A marked abelian group ker(M)/img(N) with `M: Z^l -> Z^m` and
/// `N: Z^n -> Z^l` satisfying `M*N = 0`.
///
/// Grounded on the original engine's `MarkedAbelianGroup`: the group is
/// computed once at construction by running Smith Normal Form twice (once
/// on `M` to find its kernel's ambient coordinates, once on the induced
/// presentation of that kernel modulo `img(N)`), and every subsequent query
/// reads off the cached basis-change matrices.
#[derive(Clone, Debug)]
pub struct MarkedAbelianGroup {
    om: Matrix<Integer>,
    on: Matrix<Integer>,
    omr: Matrix<Integer>,
    omri: Matrix<Integer>,
    rank_om: usize,
    ornc: Matrix<Integer>,
    ornci: Matrix<Integer>,
    snf_orn: Matrix<Integer>,
    inv_fac_list: Vec<Integer>,
    inv_fac_index: Vec<usize>,
    snf_rank: usize,
    snf_free_index: usize,
    if_loc: usize,
    coefficients: Integer,
}

impl MarkedAbelianGroup {
    /// Construct the marked abelian group presented by `m` and `n`, using
    /// integer coefficients (equivalent to [`Self::with_coefficients`] with
    /// `p = 0`).
    pub fn new(m: Matrix<Integer>, n: Matrix<Integer>) -> Result<Self> {
        Self::with_coefficients(m, n, Integer::zero())
    }

    /// Construct the marked abelian group presented by `m` and `n`, computing
    /// homology with coefficients in `Z_p` (`p = 0` meaning ordinary integer
    /// coefficients). Requires `m.cols() == n.rows()` and, for the
    /// presentation to be well-formed, `m.mul(n)` to be the zero matrix (not
    /// checked here; callers that cannot guarantee this should verify
    /// separately). Fails with [`CoreError::PreconditionViolation`][pv] if
    /// `p` is negative or the matrix dimensions are incompatible.
    ///
    /// [pv]: crate::error::CoreError::PreconditionViolation
    pub fn with_coefficients(m: Matrix<Integer>, n: Matrix<Integer>, p: Integer) -> Result<Self> {
        ensure_precondition(
            m.cols() == n.rows(),
            format!(
                "presentation matrices incompatible: M is {}x{}, N is {}x{}",
                m.rows(),
                m.cols(),
                n.rows(),
                n.cols()
            ),
        )?;
        ensure_precondition(p >= Integer::zero(), format!("modulus must be non-negative, got {p}"))?;

        let rank_om = rank(&m);

        let mut tm = m.clone();
        let mut omr = Matrix::identity(m.cols());
        let mut omri = Matrix::identity(m.cols());
        let mut omc = Matrix::identity(m.rows());
        let mut omci = Matrix::identity(m.rows());
        smith_normal_form(&mut tm, &mut omr, &mut omri, &mut omc, &mut omci);

        // ORN = (OMRi * N) with the first rank_om rows dropped: the rows of
        // OMRi*N dual to M's image are zero on the kernel, so only the
        // remaining l - rank_om rows describe the induced presentation.
        let prod = omri.mul(&n);
        let orn_rows = n.rows() - rank_om;
        let mut orn = Matrix::new(orn_rows, n.cols());
        for i in 0..orn_rows {
            for j in 0..n.cols() {
                orn.set(i, j, prod.entry(i + rank_om, j).clone());
            }
        }

        let mut snf_orn = orn.clone();
        let mut ornr = Matrix::identity(orn.cols());
        let mut ornri = Matrix::identity(orn.cols());
        let mut ornc = Matrix::identity(orn.rows());
        let mut ornci = Matrix::identity(orn.rows());
        smith_normal_form(&mut snf_orn, &mut ornr, &mut ornri, &mut ornc, &mut ornci);
        let _ = (ornr, ornri); // only the row-space basis (C/Ci) is needed downstream.

        let mut inv_fac_list = Vec::new();
        let mut inv_fac_index = Vec::new();
        let mut tot_o = 0usize;
        let diag_len = snf_orn.rows().min(snf_orn.cols());
        let mut i = 0usize;
        while i < diag_len {
            let d = snf_orn.entry(i, i).clone();
            if d == Integer::one() {
                tot_o += 1;
            } else if d > Integer::zero() {
                inv_fac_index.push(i);
                inv_fac_list.push(d);
            }
            i += 1;
        }
        let if_loc = tot_o;
        let snf_free_index = tot_o + inv_fac_list.len();
        let snf_rank = snf_orn.rows() - tot_o - inv_fac_list.len();

        Ok(MarkedAbelianGroup {
            om: m,
            on: n,
            omr,
            omri,
            rank_om,
            ornc,
            ornci,
            snf_orn,
            inv_fac_list,
            inv_fac_index,
            snf_rank,
            snf_free_index,
            if_loc,
            coefficients: p,
        })
    }

    /// The modulus `p` used for homology coefficients, or `0` if this group
    /// was computed with ordinary integer coefficients.
    pub fn coefficients(&self) -> &Integer {
        &self.coefficients
    }

    /// Free rank of the group.
    pub fn rank(&self) -> usize {
        self.snf_rank
    }

    /// The `index`-th invariant factor, in increasing order (`d1 | d2 | .. | dk`).
    pub fn invariant_factor(&self, index: usize) -> Result<&Integer> {
        self.inv_fac_list.get(index).ok_or_else(|| CoreError::InvalidArgument {
            reason: format!("invariant factor index {index} out of range"),
        })
    }

    /// Number of invariant factors (the torsion rank).
    pub fn num_invariant_factors(&self) -> usize {
        self.inv_fac_list.len()
    }

    /// `true` iff the group is trivial (zero free rank, no torsion).
    pub fn is_trivial(&self) -> bool {
        self.snf_rank == 0 && self.inv_fac_list.is_empty()
    }

    /// Two marked abelian groups are considered equal iff their free rank
    /// and invariant factor list match pointwise (the presentations
    /// themselves need not agree).
    pub fn equals(&self, other: &Self) -> bool {
        self.snf_rank == other.snf_rank && self.inv_fac_list == other.inv_fac_list
    }

    /// The defining matrix `M`.
    pub fn defining_matrix(&self) -> &Matrix<Integer> {
        &self.om
    }

    /// Rank of the defining matrix `M` (the low-level basis change below is
    /// expressed relative to this many trivial leading coordinates).
    pub fn rank_om(&self) -> usize {
        self.rank_om
    }

    /// The chain-to-kernel change-of-basis matrix (called `MRB` in the
    /// original engine): its columns, from `rank_om` onward, form a basis
    /// for `ker M` in chain coordinates.
    pub fn mrb(&self) -> &Matrix<Integer> {
        &self.omr
    }

    /// Inverse of [`Self::mrb`] (`MRBi`).
    pub fn mrbi(&self) -> &Matrix<Integer> {
        &self.omri
    }

    /// The row index at which the free-rank rows of the raw SNF coordinate
    /// system begin (`snffreeindex` in the original engine): rows
    /// `[tor_loc, snf_free_index)` are torsion generator rows and rows
    /// `[snf_free_index, ..)` are free generator rows.
    pub fn snf_free_index(&self) -> usize {
        self.snf_free_index
    }

    /// Row index at which the first non-trivial (non-unit-diagonal) row of
    /// the raw SNF coordinate system begins (`ifLoc`/`TorLoc` in the
    /// original engine).
    pub fn tor_loc(&self) -> usize {
        self.if_loc
    }

    /// The raw quotient change-of-basis matrix (`NCB`/`ornC` in the
    /// original engine), used directly by [`crate::homomorphism`] to build
    /// reduced matrices between two groups' non-trivial SNF coordinates.
    pub fn ncb(&self) -> &Matrix<Integer> {
        &self.ornc
    }

    /// Inverse of [`Self::ncb`] (`NCBi`/`ornCi`).
    pub fn ncbi(&self) -> &Matrix<Integer> {
        &self.ornci
    }

    /// Total number of non-trivial raw SNF coordinate rows: torsion rows
    /// plus free rows (`ornc.rows() - tor_loc`).
    pub fn num_nontrivial_rows(&self) -> usize {
        self.ornc.rows() - self.if_loc
    }

    /// The invariant factor list, in increasing divisor order.
    pub fn invariant_factors(&self) -> &[Integer] {
        &self.inv_fac_list
    }

    /// The `index`-th free generator, as a vector in chain coordinates
    /// (length `M.cols()`).
    pub fn free_rep(&self, index: usize) -> Result<Vec<Integer>> {
        if index >= self.snf_rank {
            return Err(CoreError::InvalidArgument {
                reason: format!("free generator index {index} out of range"),
            });
        }
        Ok(self.lift_snf_column(self.snf_free_index + index))
    }

    /// The `index`-th torsion generator, as a vector in chain coordinates.
    pub fn tor_rep(&self, index: usize) -> Result<Vec<Integer>> {
        let col = *self.inv_fac_index.get(index).ok_or_else(|| CoreError::InvalidArgument {
            reason: format!("torsion generator index {index} out of range"),
        })?;
        Ok(self.lift_snf_column(col))
    }

    /// Take column `col` of `ornci`, pad with `rank_om` leading zeros, and
    /// push it through `omr` back into chain coordinates (the construction
    /// shared by [`Self::free_rep`] and [`Self::tor_rep`]).
    fn lift_snf_column(&self, col: usize) -> Vec<Integer> {
        let mut padded = vec![Integer::zero(); self.ornci.rows() + self.rank_om];
        for i in 0..self.ornci.rows() {
            padded[i + self.rank_om] = self.ornci.entry(i, col).clone();
        }
        self.omr.mul_vec(&padded)
    }

    /// Reduce a chain-coordinate vector `v` (length `M.cols()`) to its SNF
    /// representative: a length `(rank + num_invariant_factors)` vector
    /// whose first `rank` entries are the free coordinates and remaining
    /// entries are torsion coordinates reduced modulo their invariant
    /// factor. Fails with [`CoreError::NotACycle`] if `v` is not in `ker M`.
    pub fn snf_rep(&self, v: &[Integer]) -> Result<Vec<Integer>> {
        if v.len() != self.om.cols() {
            return Err(CoreError::InvalidArgument {
                reason: format!("snf_rep expects a length-{} vector, got {}", self.om.cols(), v.len()),
            });
        }

        let temp = self.omri.mul_vec(v);
        if (0..self.rank_om).any(|i| !temp[i].is_zero()) {
            return Err(CoreError::NotACycle {
                reason: "vector is not in the kernel of the defining matrix M".to_string(),
            });
        }

        let tail = &temp[self.rank_om..];
        let mut retval = vec![Integer::zero(); self.snf_rank + self.inv_fac_list.len()];
        for i in 0..self.snf_rank {
            let row = self.snf_free_index + i;
            let mut acc = Integer::zero();
            for (j, t) in tail.iter().enumerate() {
                acc = acc + &(self.ornc.entry(row, j).clone() * t);
            }
            retval[i] = acc;
        }
        for i in 0..self.inv_fac_list.len() {
            let row = self.if_loc + i;
            let mut acc = Integer::zero();
            for (j, t) in tail.iter().enumerate() {
                acc = acc + &(self.ornc.entry(row, j).clone() * t);
            }
            let (_, rem) = acc.division_alg(&self.inv_fac_list[i]);
            retval[self.snf_rank + i] = rem;
        }
        Ok(retval)
    }

    /// A basis for `ker M` as the columns of an `l x l` matrix, computed
    /// via [`preimage_of_lattice`] treating the codomain of `M` as entirely
    /// free (used when building a homomorphism's kernel, C7).
    pub fn kernel_lattice_basis(&self) -> Matrix<Integer> {
        let l = vec![Integer::zero(); self.om.rows()];
        preimage_of_lattice(&self.om, &l)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(v: i64) -> Integer {
        Integer::from_int(v)
    }

    fn mat(rows: usize, cols: usize, vals: &[i64]) -> Matrix<Integer> {
        let mut m = Matrix::new(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                m.set(i, j, int(vals[i * cols + j]));
            }
        }
        m
    }

    #[test]
    fn test_trivial_presentation_is_free_z() {
        // M = [0] (1x1 zero map Z -> Z), N = [] (0 columns): ker(M)/img(N) == Z.
        let m = mat(1, 1, &[0]);
        let n = Matrix::new(1, 0);
        let g = MarkedAbelianGroup::new(m, n).unwrap();
        assert_eq!(g.rank(), 1);
        assert_eq!(g.num_invariant_factors(), 0);
        assert!(!g.is_trivial());
    }

    #[test]
    fn test_z_mod_n_presentation() {
        // M = [0] (Z -> Z), N = [4]: ker(M)/img(N) == Z/4.
        let m = mat(1, 1, &[0]);
        let n = mat(1, 1, &[4]);
        let g = MarkedAbelianGroup::new(m, n).unwrap();
        assert_eq!(g.rank(), 0);
        assert_eq!(g.num_invariant_factors(), 1);
        assert_eq!(g.invariant_factor(0).unwrap(), &int(4));
    }

    #[test]
    fn test_trivial_group_from_identity_relations() {
        // M = [0] (Z -> Z), N = [1]: img(N) == Z, so the quotient is trivial.
        let m = mat(1, 1, &[0]);
        let n = mat(1, 1, &[1]);
        let g = MarkedAbelianGroup::new(m, n).unwrap();
        assert!(g.is_trivial());
    }

    #[test]
    fn test_free_rep_and_snf_rep_roundtrip() {
        let m = mat(1, 1, &[0]);
        let n = Matrix::new(1, 0);
        let g = MarkedAbelianGroup::new(m, n).unwrap();
        let gen = g.free_rep(0).unwrap();
        let snf = g.snf_rep(&gen).unwrap();
        assert_eq!(snf, vec![int(1)]);
    }

    #[test]
    fn test_snf_rep_rejects_non_kernel_vector() {
        // M = [1] (injective Z -> Z): only 0 is in the kernel.
        let m = mat(1, 1, &[1]);
        let n = Matrix::new(1, 0);
        let g = MarkedAbelianGroup::new(m, n).unwrap();
        assert!(g.snf_rep(&[int(1)]).is_err());
        assert!(g.snf_rep(&[int(0)]).is_ok());
    }

    #[test]
    fn test_equals_compares_invariants_not_presentation() {
        let g1 = MarkedAbelianGroup::new(mat(1, 1, &[0]), mat(1, 1, &[4])).unwrap();
        let g2 = MarkedAbelianGroup::new(mat(1, 1, &[0]), mat(1, 1, &[-4])).unwrap();
        assert!(g1.equals(&g2));
    }

    #[test]
    fn test_torsion_chain_z2_plus_z4() {
        // M = 0 (Z^2 -> 0), N = diag(2, 4): ker(M)/img(N) == Z/2 + Z/4.
        let m = Matrix::new(0, 2);
        let n = mat(2, 2, &[2, 0, 0, 4]);
        let g = MarkedAbelianGroup::new(m, n).unwrap();
        assert_eq!(g.rank(), 0);
        assert_eq!(g.num_invariant_factors(), 2);
        assert_eq!(g.invariant_factor(0).unwrap(), &int(2));
        assert_eq!(g.invariant_factor(1).unwrap(), &int(4));
    }

    #[test]
    fn test_new_defaults_to_integer_coefficients() {
        let g = MarkedAbelianGroup::new(mat(1, 1, &[0]), Matrix::new(1, 0)).unwrap();
        assert_eq!(g.coefficients(), &int(0));
    }

    #[test]
    fn test_with_coefficients_rejects_negative_modulus() {
        let err = MarkedAbelianGroup::with_coefficients(mat(1, 1, &[0]), Matrix::new(1, 0), int(-1))
            .unwrap_err();
        assert!(matches!(err, CoreError::PreconditionViolation { .. }));
    }

    #[test]
    fn test_with_coefficients_rejects_dimension_mismatch() {
        let m = Matrix::new(1, 2);
        let n = Matrix::new(1, 0);
        let err = MarkedAbelianGroup::with_coefficients(m, n, int(0)).unwrap_err();
        assert!(matches!(err, CoreError::PreconditionViolation { .. }));
    }

    #[test]
    fn test_with_coefficients_stores_modulus() {
        let g = MarkedAbelianGroup::with_coefficients(mat(1, 1, &[0]), mat(1, 1, &[4]), int(5)).unwrap();
        assert_eq!(g.coefficients(), &int(5));
        assert_eq!(g.rank(), 0);
    }
}
