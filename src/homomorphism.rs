//! Homomorphisms between marked abelian groups (C7).
//!
//! Given `dom`/`ran: MarkedAbelianGroup` and a matrix `A` describing a
//! homomorphism on their underlying chain groups, [`Homomorphism`] derives
//! the **reduced matrix** (the induced map on non-trivial SNF coordinates)
//! and, from it, the kernel, cokernel and image as fresh marked abelian
//! groups. Each derived quantity is computed once and cached, mirroring the
//! original engine's `computeReducedMatrix`/`computeKernel`/etc. flags.

use crate::abelian_group::MarkedAbelianGroup;
use crate::error::{CoreError, Result};
use crate::int::{Int, Integer};
use crate::linalg::preimage_of_lattice;
use crate::matrix::Matrix;
use crate::snf::smith_normal_form;
use std::cell::RefCell;

/// A homomorphism `dom -> ran` given on chain coordinates by `matrix`
/// (shape `ran.defining_matrix().cols() x dom.defining_matrix().cols()`).
pub struct Homomorphism {
    domain: MarkedAbelianGroup,
    range: MarkedAbelianGroup,
    matrix: Matrix<Integer>,
    reduced_matrix: RefCell<Option<Matrix<Integer>>>,
    reduced_kernel_lattice: RefCell<Option<Matrix<Integer>>>,
    kernel: RefCell<Option<MarkedAbelianGroup>>,
    cokernel: RefCell<Option<MarkedAbelianGroup>>,
    image: RefCell<Option<MarkedAbelianGroup>>,
}

fn cols_from<I: Int>(m: &Matrix<I>, start: usize) -> Matrix<I> {
    let mut out = Matrix::new(m.rows(), m.cols() - start);
    for i in 0..m.rows() {
        for j in start..m.cols() {
            out.set(i, j - start, m.entry(i, j).clone());
        }
    }
    out
}

fn rows_from<I: Int>(m: &Matrix<I>, start: usize) -> Matrix<I> {
    let mut out = Matrix::new(m.rows() - start, m.cols());
    for i in start..m.rows() {
        for j in 0..m.cols() {
            out.set(i - start, j, m.entry(i, j).clone());
        }
    }
    out
}

impl Homomorphism {
    /// Construct a homomorphism `domain -> range` given by `matrix` on
    /// chain coordinates. Requires `matrix` to be
    /// `range.defining_matrix().cols() x domain.defining_matrix().cols()`.
    pub fn new(domain: MarkedAbelianGroup, range: MarkedAbelianGroup, matrix: Matrix<Integer>) -> Result<Self> {
        if matrix.rows() != range.defining_matrix().cols() || matrix.cols() != domain.defining_matrix().cols() {
            return Err(CoreError::InvalidArgument {
                reason: "homomorphism matrix dimensions do not match domain/range chain groups".to_string(),
            });
        }
        Ok(Homomorphism {
            domain,
            range,
            matrix,
            reduced_matrix: RefCell::new(None),
            reduced_kernel_lattice: RefCell::new(None),
            kernel: RefCell::new(None),
            cokernel: RefCell::new(None),
            image: RefCell::new(None),
        })
    }

    /// The domain group.
    pub fn domain(&self) -> &MarkedAbelianGroup {
        &self.domain
    }

    /// The range group.
    pub fn range(&self) -> &MarkedAbelianGroup {
        &self.range
    }

    /// The induced map between `domain` and `range`'s non-trivial raw SNF
    /// coordinates (torsion rows first, then free rows — the internal
    /// ordering [`MarkedAbelianGroup::ncb`] uses, not the public
    /// free-then-torsion ordering of [`MarkedAbelianGroup::snf_rep`]).
    /// Computed once and cached.
    pub fn reduced_matrix(&self) -> Matrix<Integer> {
        if let Some(m) = self.reduced_matrix.borrow().as_ref() {
            return m.clone();
        }

        let dcckb = self.domain.mrb();
        let rcckb = self.range.mrbi();

        let temp1_full = self.matrix.mul(dcckb);
        let temp1 = cols_from(&temp1_full, self.domain.rank_om());
        let rcckb_trimmed = rows_from(rcckb, self.range.rank_om());
        let ker_matrix = rcckb_trimmed.mul(&temp1);

        let dccqb = self.domain.ncbi();
        let rccqb = self.range.ncb();

        let temp2_full = ker_matrix.mul(dccqb);
        let temp2 = cols_from(&temp2_full, self.domain.tor_loc());
        let rccqb_trimmed = rows_from(rccqb, self.range.tor_loc());
        let red_matrix = rccqb_trimmed.mul(&temp2);

        *self.reduced_matrix.borrow_mut() = Some(red_matrix.clone());
        red_matrix
    }

    /// The kernel of the reduced matrix, represented as a lattice basis in
    /// the domain's non-trivial raw SNF coordinates (an `n x n` matrix).
    /// Computed once and cached.
    pub fn reduced_kernel_lattice(&self) -> Matrix<Integer> {
        if let Some(m) = self.reduced_kernel_lattice.borrow().as_ref() {
            return m.clone();
        }
        let red_matrix = self.reduced_matrix();

        let dc_len = self.range.num_nontrivial_rows();
        let mut dc_l = vec![Integer::zero(); dc_len];
        for (i, slot) in dc_l.iter_mut().enumerate() {
            if i < self.range.num_invariant_factors() {
                *slot = self.range.invariant_factors()[i].clone();
            }
        }

        let lattice = preimage_of_lattice(&red_matrix, &dc_l);
        *self.reduced_kernel_lattice.borrow_mut() = Some(lattice.clone());
        lattice
    }

    /// The kernel of this homomorphism, as a fresh [`MarkedAbelianGroup`].
    /// Computed once and cached.
    pub fn kernel(&self) -> Result<MarkedAbelianGroup> {
        if let Some(k) = self.kernel.borrow().as_ref() {
            return Ok(k.clone());
        }

        let mut dc_preimage = self.reduced_kernel_lattice();
        let n = dc_preimage.cols();
        let mut r = Matrix::identity(n);
        let mut ri = Matrix::identity(n);
        let mut c = Matrix::identity(dc_preimage.rows());
        let mut ci = Matrix::identity(dc_preimage.rows());
        smith_normal_form(&mut dc_preimage, &mut r, &mut ri, &mut c, &mut ci);
        let _ = ri;

        let num_domain_factors = self.domain.num_invariant_factors();
        let mut work_mat = Matrix::new(n, num_domain_factors);
        for i in 0..n {
            for j in 0..num_domain_factors {
                let mut acc = Integer::zero();
                for k in 0..r.cols() {
                    let diag = dc_preimage.entry(k, k);
                    if diag.is_zero() {
                        continue;
                    }
                    let term = self.domain.invariant_factors()[j].clone() * r.entry(i, k) * c.entry(k, j);
                    acc = acc + &term.div_exact(diag);
                }
                work_mat.set(i, j, acc);
            }
        }

        let dummy = Matrix::new(1, n);
        let kernel_group = MarkedAbelianGroup::new(dummy, work_mat)?;
        *self.kernel.borrow_mut() = Some(kernel_group.clone());
        Ok(kernel_group)
    }

    /// The cokernel of this homomorphism, as a fresh [`MarkedAbelianGroup`].
    /// Computed once and cached.
    pub fn cokernel(&self) -> Result<MarkedAbelianGroup> {
        if let Some(k) = self.cokernel.borrow().as_ref() {
            return Ok(k.clone());
        }
        let red_matrix = self.reduced_matrix();
        let num_factors = self.range.num_invariant_factors();

        let mut cc_relators = Matrix::new(red_matrix.rows(), red_matrix.cols() + num_factors);
        for i in 0..red_matrix.rows() {
            for j in 0..red_matrix.cols() {
                cc_relators.set(i, j, red_matrix.entry(i, j).clone());
            }
        }
        for i in 0..num_factors {
            cc_relators.set(i, i + red_matrix.cols(), self.range.invariant_factors()[i].clone());
        }
        let cc_generators = Matrix::new(1, red_matrix.rows());

        let cokernel_group = MarkedAbelianGroup::new(cc_generators, cc_relators)?;
        *self.cokernel.borrow_mut() = Some(cokernel_group.clone());
        Ok(cokernel_group)
    }

    /// The image of this homomorphism, as a fresh [`MarkedAbelianGroup`].
    /// Computed once and cached.
    pub fn image(&self) -> Result<MarkedAbelianGroup> {
        if let Some(k) = self.image.borrow().as_ref() {
            return Ok(k.clone());
        }
        let dc_preimage = self.reduced_kernel_lattice();
        let num_domain_factors = self.domain.num_invariant_factors();

        let img_cc_m = Matrix::new(1, dc_preimage.rows());
        let mut img_cc_n = Matrix::new(dc_preimage.rows(), dc_preimage.cols() + num_domain_factors);
        for i in 0..num_domain_factors {
            img_cc_n.set(i, i, self.domain.invariant_factors()[i].clone());
        }
        for i in 0..img_cc_n.rows() {
            for j in 0..dc_preimage.cols() {
                img_cc_n.set(i, j + num_domain_factors, dc_preimage.entry(i, j).clone());
            }
        }

        let image_group = MarkedAbelianGroup::new(img_cc_m, img_cc_n)?;
        *self.image.borrow_mut() = Some(image_group.clone());
        Ok(image_group)
    }

    /// `true` iff the cokernel is trivial (the map is surjective).
    pub fn is_epic(&self) -> Result<bool> {
        Ok(self.cokernel()?.is_trivial())
    }

    /// `true` iff the kernel is trivial (the map is injective).
    pub fn is_monic(&self) -> Result<bool> {
        Ok(self.kernel()?.is_trivial())
    }

    /// `true` iff both kernel and cokernel are trivial.
    pub fn is_iso(&self) -> Result<bool> {
        Ok(self.is_epic()? && self.is_monic()?)
    }

    /// `true` iff the image is trivial (the map is zero).
    pub fn is_zero(&self) -> Result<bool> {
        Ok(self.image()?.is_trivial())
    }
}
