//! Cross-dimension consistency checks for face numbering (C11), beyond the
//! per-dimension unit tests already living beside the module.

use regina_core::face_numbering::{face_index, face_vertices, num_faces, oriented_facets};

#[test]
fn test_facet_vertices_are_a_subset_of_the_parent_face() {
    for d in 2..=5usize {
        for k in 1..=d {
            for idx in 0..num_faces(d, k) {
                let verts = face_vertices(d, k, idx).unwrap();
                for facet in oriented_facets(d, k, idx).unwrap() {
                    let facet_verts = face_vertices(d, k - 1, facet.facet_index).unwrap();
                    assert!(
                        facet_verts.iter().all(|v| verts.contains(v)),
                        "facet {:?} of face {:?} is not a sub-sequence of its parent",
                        facet_verts,
                        verts
                    );
                    assert_eq!(facet_verts.len(), verts.len() - 1);
                }
            }
        }
    }
}

#[test]
fn test_each_face_has_exactly_k_plus_one_facets_with_alternating_parity() {
    for d in 2..=5usize {
        for k in 1..=d {
            for idx in 0..num_faces(d, k) {
                let facets = oriented_facets(d, k, idx).unwrap();
                assert_eq!(facets.len(), k + 1);
                for (omit, facet) in facets.iter().enumerate() {
                    assert_eq!(facet.reversed, omit % 2 == 1);
                }
            }
        }
    }
}

#[test]
fn test_sum_of_face_counts_matches_binomial_expansion() {
    // The total number of non-empty proper subsets of {0,..,d} of size k+1,
    // summed over k = 0..=d, is 2^(d+1) - 1.
    for d in 2..=6usize {
        let total: u64 = (0..=d).map(|k| num_faces(d, k)).sum();
        assert_eq!(total, (1u64 << (d + 1)) - 1);
    }
}

#[test]
fn test_face_vertices_and_face_index_agree_across_dimensions() {
    for d in 2..=6usize {
        for k in 0..=d {
            for idx in 0..num_faces(d, k) {
                let verts = face_vertices(d, k, idx).unwrap();
                assert_eq!(face_index(d, k, &verts).unwrap(), idx);
            }
        }
    }
}
