//! Cross-module behavioral tests for Smith Normal Form (P1, S3).

mod common;

use common::{int, mat};
use proptest::prelude::*;
use regina_core::int::{Int, Integer};
use regina_core::matrix::Matrix;
use regina_core::snf::smith_normal_form;

fn assert_is_snf_diagonal(x: &Matrix<Integer>) {
    let d = x.rows().min(x.cols());
    for i in 0..x.rows() {
        for j in 0..x.cols() {
            if i != j {
                assert!(x.entry(i, j).is_zero(), "off-diagonal entry ({i},{j}) nonzero");
            }
        }
    }
    let mut seen_zero = false;
    let mut prev = Integer::one();
    for k in 0..d {
        let v = x.entry(k, k).clone();
        assert!(v >= Integer::zero(), "diagonal entry {k} is negative");
        if v.is_zero() {
            seen_zero = true;
        } else {
            assert!(!seen_zero, "nonzero diagonal entry {k} follows a zero entry");
            if !prev.is_zero() {
                let rem = v.division_alg(&prev).1;
                assert!(rem.is_zero(), "invariant factor divisibility violated at {k}: {prev} does not divide {v}");
            }
            prev = v;
        }
    }
}

fn assert_basis_inverses(r: &Matrix<Integer>, ri: &Matrix<Integer>) {
    let n = r.rows();
    let id = Matrix::<Integer>::identity(n);
    assert_eq!(r.mul(ri), id);
    assert_eq!(ri.mul(r), id);
}

#[test]
fn test_s3_hand_computed_snf() {
    // S3: X = [[2,4,4],[-6,6,12],[10,-4,-16]], expected diagonal [2,2,12].
    let mut x = mat(3, 3, &[2, 4, 4, -6, 6, 12, 10, -4, -16]);
    let orig = x.clone();
    let mut r = Matrix::identity(3);
    let mut ri = Matrix::identity(3);
    let mut c = Matrix::identity(3);
    let mut ci = Matrix::identity(3);
    smith_normal_form(&mut x, &mut r, &mut ri, &mut c, &mut ci);

    assert_eq!(x.entry(0, 0), &int(2));
    assert_eq!(x.entry(1, 1), &int(2));
    assert_eq!(x.entry(2, 2), &int(12));
    assert_is_snf_diagonal(&x);
    assert_basis_inverses(&r, &ri);
    assert_basis_inverses(&c, &ci);
    assert_eq!(c.mul(&orig).mul(&r), x);
}

proptest! {
    #[test]
    fn test_p1_snf_correctness(
        vals in prop::collection::vec(-8i64..=8, 4 * 4),
    ) {
        let mut x = mat(4, 4, &vals);
        let orig = x.clone();
        let mut r = Matrix::identity(4);
        let mut ri = Matrix::identity(4);
        let mut c = Matrix::identity(4);
        let mut ci = Matrix::identity(4);
        smith_normal_form(&mut x, &mut r, &mut ri, &mut c, &mut ci);

        assert_is_snf_diagonal(&x);
        assert_basis_inverses(&r, &ri);
        assert_basis_inverses(&c, &ci);
        prop_assert_eq!(c.mul(&orig).mul(&r), x);
    }

    #[test]
    fn test_p1_snf_correctness_nonsquare(
        vals in prop::collection::vec(-6i64..=6, 3 * 5),
    ) {
        let mut x = mat(3, 5, &vals);
        let orig = x.clone();
        let mut r = Matrix::identity(5);
        let mut ri = Matrix::identity(5);
        let mut c = Matrix::identity(3);
        let mut ci = Matrix::identity(3);
        smith_normal_form(&mut x, &mut r, &mut ri, &mut c, &mut ci);

        assert_is_snf_diagonal(&x);
        assert_basis_inverses(&r, &ri);
        assert_basis_inverses(&c, &ci);
        prop_assert_eq!(c.mul(&orig).mul(&r), x);
    }
}
