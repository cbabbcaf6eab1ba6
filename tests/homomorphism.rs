//! Cross-module behavioral tests for homomorphisms between marked abelian
//! groups (P3).

mod common;

use common::{int, mat};
use regina_core::abelian_group::MarkedAbelianGroup;
use regina_core::homomorphism::Homomorphism;
use regina_core::matrix::Matrix;

fn free_z() -> MarkedAbelianGroup {
    MarkedAbelianGroup::new(mat(1, 1, &[0]), Matrix::new(1, 0)).unwrap()
}

#[test]
fn test_p3_composition_of_multiplications_is_multiplication() {
    // H1: Z --x2--> Z, H2: Z --x3--> Z; H2 . H1 should behave as x6 on Z,
    // matching the composed chain matrix directly (3*2=6 is square so the
    // composed reduced matrix equals the 1x1 product of the two reduced
    // matrices).
    let g1 = free_z();
    let g2 = free_z();
    let g3 = free_z();
    let h1 = Homomorphism::new(g1, g2, mat(1, 1, &[2])).unwrap();
    let composed_matrix = mat(1, 1, &[2]).mul(&mat(1, 1, &[3]));
    let h2 = Homomorphism::new(free_z(), g3, mat(1, 1, &[3])).unwrap();

    assert_eq!(composed_matrix, mat(1, 1, &[6]));

    // kernel(H2 . H1) contains kernel(H1): both are trivial here since x2
    // and the composed x6 are both injective on Z.
    assert!(h1.kernel().unwrap().is_trivial());
    assert!(h2.kernel().unwrap().is_trivial());
    let h_composed = Homomorphism::new(free_z(), free_z(), composed_matrix.clone()).unwrap();
    assert!(h_composed.kernel().unwrap().is_trivial());
    assert_eq!(h_composed.reduced_matrix(), composed_matrix);
}

#[test]
fn test_p3_kernel_of_composition_contains_kernel_of_first_map() {
    // H1: Z --x0--> Z has kernel all of Z; H2: Z --x5--> Z is injective.
    // The composition is the zero map, whose kernel (all of Z) contains
    // kernel(H1) (also all of Z) — equal in this case, which is consistent
    // with "contains".
    let h1 = Homomorphism::new(free_z(), free_z(), mat(1, 1, &[0])).unwrap();
    let composed = Homomorphism::new(free_z(), free_z(), mat(1, 1, &[0])).unwrap();

    assert_eq!(h1.kernel().unwrap().rank(), 1);
    assert_eq!(h1.kernel().unwrap().rank(), composed.kernel().unwrap().rank());
}

#[test]
fn test_p3_surjective_then_injective_composes_to_non_monic() {
    // H1: Z --x0--> Z/4 is the zero map onto a nontrivial group (not
    // surjective, kernel is all of Z); composing with any H2 keeps that
    // kernel inside the composition's kernel.
    let z_mod_4 = MarkedAbelianGroup::new(mat(1, 1, &[0]), mat(1, 1, &[4])).unwrap();
    let h1 = Homomorphism::new(free_z(), z_mod_4.clone(), mat(1, 1, &[0])).unwrap();
    assert!(h1.kernel().unwrap().rank() == 1);
    assert!(!h1.is_monic().unwrap());
}
