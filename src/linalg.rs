//! Supporting linear-algebra primitives (C12): column echelon form with
//! designated rows, pre-image of a lattice, rank, and a small union-find
//! utility used for component bookkeeping elsewhere in the crate.

use crate::int::Int;
use crate::matrix::Matrix;
use crate::snf::smith_normal_form;

/// Reduce `x` via column operations so that, restricted to the rows named
/// by `row_list` (in the given order), `x` is in column-echelon form: each
/// non-zero pivot column has a strictly positive leading entry whose
/// `row_list` position strictly exceeds all earlier pivots, entries to the
/// left of a pivot in its pivot row are non-negative and smaller than the
/// pivot, and every other designated-row entry is zero. `r` accumulates the
/// column operations (as a right-multiplication) and `ri` its inverse; both
/// must start as identity (or a prior coordinate change to compose into).
///
/// Grounded on the original engine's `columnEchelonForm`: the designated
/// rows let the caller reduce only against a subset of the matrix (e.g. the
/// free-generator rows of a homomorphism's target) while still tracking the
/// full change of basis on all columns.
pub fn column_echelon_form<I: Int>(
    x: &mut Matrix<I>,
    r: &mut Matrix<I>,
    ri: &mut Matrix<I>,
    row_list: &[usize],
) {
    let mut cr = 0usize;
    let mut cc = 0usize;

    while cr < row_list.len() && cc < x.cols() {
        let row = row_list[cr];
        let nz: Vec<usize> = (cc..x.cols()).filter(|&j| !x.entry(row, j).is_zero()).collect();

        if nz.is_empty() {
            cr += 1;
            continue;
        }

        if nz.len() == 1 {
            let lead = nz[0];
            if lead != cc {
                x.swap_cols(cc, lead);
                r.swap_cols(cc, lead);
                ri.swap_rows(cc, lead);
                continue;
            }

            if x.entry(row, cc).clone() < I::zero() {
                x.negate_col(cc);
                r.negate_col(cc);
                ri.negate_row(cc);
            }

            for i in 0..cc {
                let (d, rem) = x.entry(row, i).division_alg(x.entry(row, cc));
                let _ = rem;
                if d.is_zero() {
                    continue;
                }
                x.add_col_multiple(i, cc, &d.clone().neg_value());
                r.add_col_multiple(i, cc, &d.clone().neg_value());
                ri.add_row_multiple(cc, i, &d);
            }

            cc += 1;
            cr += 1;
            continue;
        }

        // Two or more non-zero entries in the pivot row: reduce the first
        // pair with a gcd-based 2x2 column operation until one survives.
        let mut list = nz;
        while list.len() > 1 {
            let (c1, c2) = (list[0], list[1]);
            let (d, u, v) = x.entry(row, c1).gcd_with_coeffs(x.entry(row, c2));
            let a = x.entry(row, c1).div_exact(&d);
            let b = x.entry(row, c2).div_exact(&d);
            x.apply_col_op(c1, c2, &u, &v, &a, &b);
            r.apply_col_op(c1, c2, &u, &v, &a, &b);
            ri.apply_row_op(c1, c2, &a, &b, &u, &v);
            list.remove(1);
        }
    }
}

/// Given a homomorphism Z^n --hom--> Z^free ⊕ ⨁ Z/l[i] (codomain entries of
/// `l` are `0` for a free factor or `d > 0` for a torsion factor of that
/// order), compute a basis for its kernel as the columns of an `n x n`
/// matrix. Grounded on the original engine's `preImageOfLattice`: two passes
/// of column-echelon reduction, first against the free rows, then against
/// the torsion rows with a per-column lattice-landing multiplier.
pub fn preimage_of_lattice<I: Int>(hom: &Matrix<I>, l: &[I]) -> Matrix<I> {
    let n = hom.cols();
    let mut basis = Matrix::identity(n);
    let mut basisi = Matrix::identity(n);
    let mut hom_mod_l = hom.clone();

    let free_list: Vec<usize> = (0..l.len()).filter(|&i| l[i].is_zero()).collect();
    let tor_list: Vec<usize> = (0..l.len()).filter(|&i| !l[i].is_zero()).collect();

    column_echelon_form(&mut hom_mod_l, &mut basis, &mut basisi, &free_list);

    let tor_cols: Vec<usize> = (0..hom_mod_l.cols())
        .filter(|&j| free_list.iter().all(|&i| hom_mod_l.entry(i, j).is_zero()))
        .collect();

    let mut t_hom = Matrix::new(hom_mod_l.rows(), tor_cols.len());
    let mut t_basis = Matrix::new(basis.rows(), tor_cols.len());
    for (j, &src) in tor_cols.iter().enumerate() {
        for i in 0..t_hom.rows() {
            t_hom.set(i, j, hom_mod_l.entry(i, src).clone());
        }
        for i in 0..t_basis.rows() {
            t_basis.set(i, j, basis.entry(i, src).clone());
        }
    }
    let mut dummy = Matrix::new(tor_cols.len(), 0);

    column_echelon_form(&mut t_hom, &mut t_basis, &mut dummy, &tor_list);

    let mut cr = 0usize;
    while cr < tor_list.len() {
        let row = tor_list[cr];
        let mut nz: Vec<usize> = (0..t_hom.cols()).filter(|&j| !t_hom.entry(row, j).is_zero()).collect();

        if nz.is_empty() {
            cr += 1;
            continue;
        }

        if nz.len() == 1 {
            let col = nz[0];
            let order = &l[row];
            let g = t_hom.entry(row, col).gcd(order);
            let d = order.div_exact(&g);
            for &i in &tor_list {
                let v = t_hom.entry(i, col).clone() * &d;
                t_hom.set(i, col, v);
            }
            for i in 0..t_basis.rows() {
                let v = t_basis.entry(i, col).clone() * &d;
                t_basis.set(i, col, v);
            }
            cr += 1;
            continue;
        }

        while nz.len() > 1 {
            let (c1, c2) = (nz[0], nz[1]);
            let (d, u, v) = t_hom.entry(row, c1).gcd_with_coeffs(t_hom.entry(row, c2));
            let a = t_hom.entry(row, c1).div_exact(&d);
            let b = t_hom.entry(row, c2).div_exact(&d);

            for &i in &tor_list {
                let x1 = t_hom.entry(i, c1).clone();
                let x2 = t_hom.entry(i, c2).clone();
                let new1 = u.clone() * &x1 + &(v.clone() * &x2);
                let new2 = a.clone() * &x2 - &(b.clone() * &x1);
                t_hom.set(i, c1, new1);
                t_hom.set(i, c2, new2);
            }
            for i in 0..t_basis.rows() {
                let x1 = t_basis.entry(i, c1).clone();
                let x2 = t_basis.entry(i, c2).clone();
                let new1 = u.clone() * &x1 + &(v.clone() * &x2);
                let new2 = a.clone() * &x2 - &(b.clone() * &x1);
                t_basis.set(i, c1, new1);
                t_basis.set(i, c2, new2);
            }
            nz.remove(1);
        }
    }

    t_basis
}

/// Rank of `x` over the integers: the number of non-zero invariant factors
/// of its Smith Normal Form.
pub fn rank<I: Int>(x: &Matrix<I>) -> usize {
    let mut m = x.clone();
    let mut r = Matrix::identity(m.cols());
    let mut ri = Matrix::identity(m.cols());
    let mut c = Matrix::identity(m.rows());
    let mut ci = Matrix::identity(m.rows());
    smith_normal_form(&mut m, &mut r, &mut ri, &mut c, &mut ci);
    let k = m.rows().min(m.cols());
    (0..k).filter(|&i| !m.entry(i, i).is_zero()).count()
}

/// Small extension used only inside this module to negate by value without
/// requiring `Int` to expose a free function; mirrors the in-place
/// `negate` already on the trait.
trait NegValue: Sized {
    fn neg_value(self) -> Self;
}

impl<I: Int> NegValue for I {
    fn neg_value(mut self) -> Self {
        self.negate();
        self
    }
}

/// Disjoint-set forest over `0..n` with path compression and union by
/// rank, used to group vertices (or other point-like identifiers) into
/// equivalence classes as they are merged, e.g. when a toy triangulation's
/// simplex gluings identify vertices across facets.
#[derive(Clone, Debug)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    /// Create `n` singleton classes.
    pub fn new(n: usize) -> Self {
        UnionFind { parent: (0..n).collect(), rank: vec![0; n] }
    }

    /// The representative of `x`'s class, compressing the path to it.
    pub fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            let root = self.find(self.parent[x]);
            self.parent[x] = root;
        }
        self.parent[x]
    }

    /// Merge the classes containing `a` and `b`. Returns `true` if they
    /// were previously distinct.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }

    /// `true` iff `a` and `b` are currently in the same class.
    pub fn connected(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    /// Number of distinct classes remaining.
    pub fn class_count(&mut self) -> usize {
        let n = self.parent.len();
        let mut seen = vec![false; n];
        let mut count = 0;
        for i in 0..n {
            let root = self.find(i);
            if !seen[root] {
                seen[root] = true;
                count += 1;
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::int::Integer;

    fn mat(rows: usize, cols: usize, vals: &[i64]) -> Matrix<Integer> {
        let mut m = Matrix::new(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                m.set(i, j, Integer::from_int(vals[i * cols + j]));
            }
        }
        m
    }

    #[test]
    fn test_column_echelon_basic_shape() {
        let mut x = mat(2, 3, &[1, 2, 3, 0, 4, 6]);
        let mut r = Matrix::identity(3);
        let mut ri = Matrix::identity(3);
        column_echelon_form(&mut x, &mut r, &mut ri, &[0, 1]);

        // Original matrix * R must equal the reduced matrix, and R/Ri must
        // be mutual inverses.
        let orig = mat(2, 3, &[1, 2, 3, 0, 4, 6]);
        assert_eq!(orig.mul(&r), x);
        assert_eq!(r.mul(&ri), Matrix::identity(3));
        assert_eq!(ri.mul(&r), Matrix::identity(3));

        // Leading entries of designated rows are non-negative, and rows
        // preceding a pivot column have strictly smaller non-negative
        // entries to its left (checked directly for row 0's pivot).
        for &row in &[0usize, 1usize] {
            for j in 0..x.cols() {
                if !x.entry(row, j).is_zero() {
                    assert!(x.entry(row, j).as_bigint() > &num_bigint::BigInt::from(0));
                    break;
                }
            }
        }
    }

    #[test]
    fn test_preimage_of_lattice_pure_free() {
        // hom: Z^2 -> Z (free), matrix [1 1]. Kernel is generated by (1,-1).
        let hom = mat(1, 2, &[1, 1]);
        let l = vec![Integer::from_int(0)];
        let basis = preimage_of_lattice(&hom, &l);
        assert_eq!(basis.rows(), 2);
        assert_eq!(basis.cols(), 1);
        let v = basis.col_vec(0);
        let image = hom.mul_vec(&v);
        assert!(image[0].is_zero(), "kernel generator must map to zero: {:?}", image);
    }

    #[test]
    fn test_preimage_of_lattice_torsion() {
        // hom: Z -> Z/4, matrix [1]. Kernel (preimage of the lattice 4Z) is generated by 4.
        let hom = mat(1, 1, &[1]);
        let l = vec![Integer::from_int(4)];
        let basis = preimage_of_lattice(&hom, &l);
        assert_eq!(basis.rows(), 1);
        assert_eq!(basis.cols(), 1);
        assert_eq!(basis.entry(0, 0), &Integer::from_int(4));
    }

    #[test]
    fn test_rank_matches_nonzero_invariant_factors() {
        let x = mat(3, 3, &[2, 4, 4, -6, 6, 12, 10, -4, -16]);
        assert_eq!(rank(&x), 3);
        let singular = mat(2, 2, &[1, 2, 2, 4]);
        assert_eq!(rank(&singular), 1);
        let zero = mat(2, 2, &[0, 0, 0, 0]);
        assert_eq!(rank(&zero), 0);
    }

    #[test]
    fn test_union_find_basic() {
        let mut uf = UnionFind::new(5);
        assert_eq!(uf.class_count(), 5);
        assert!(uf.union(0, 1));
        assert!(uf.union(1, 2));
        assert!(!uf.union(0, 2));
        assert!(uf.connected(0, 2));
        assert!(!uf.connected(0, 3));
        assert_eq!(uf.class_count(), 3);
    }
}
