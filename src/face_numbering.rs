//! Canonical ordering and indexing of k-faces of a d-simplex (C11).
//!
//! A k-face of a d-simplex is identified by the strictly increasing
//! sequence of its `k+1` vertex numbers drawn from `{0, .., d}`; faces are
//! indexed lexicographically among all `C(d+1, k+1)` such sequences.
//! Binomial coefficients are precomputed once per table and reused for
//! every `num_faces`/`face_vertices`/`face_index` call rather than
//! recomputed, since C9's Pachner-move legality checks call into this on
//! every candidate face.

use crate::error::{CoreError, Result};

/// Maximum simplex dimension this table supports; large enough for the
/// triangulation dimensions (2, 3, 4) this crate's search operates over.
pub const MAX_DIM: usize = 8;

/// Precomputed Pascal's-triangle table of binomial coefficients up to
/// `C(MAX_DIM + 1, MAX_DIM + 1)`, built once and reused.
pub struct BinomialTable {
    rows: usize,
    data: Vec<u64>,
}

impl BinomialTable {
    /// Build the table for `n` up to and including `max_n`.
    pub fn new(max_n: usize) -> Self {
        let rows = max_n + 1;
        let mut data = vec![0u64; rows * rows];
        for n in 0..rows {
            data[n * rows] = 1;
            for k in 1..=n {
                let above = data[(n - 1) * rows + (k - 1)];
                let left = if k <= n - 1 { data[(n - 1) * rows + k] } else { 0 };
                data[n * rows + k] = above + left;
            }
        }
        BinomialTable { rows, data }
    }

    /// `C(n, k)`, or `0` if `k > n`.
    pub fn get(&self, n: usize, k: usize) -> u64 {
        if k > n || n >= self.rows {
            return 0;
        }
        self.data[n * self.rows + k]
    }
}

/// The shared, immutable binomial table used by every face-numbering call.
/// Built lazily on first use and reused for the life of the process.
pub fn table() -> &'static BinomialTable {
    use std::sync::OnceLock;
    static TABLE: OnceLock<BinomialTable> = OnceLock::new();
    TABLE.get_or_init(|| BinomialTable::new(MAX_DIM + 2))
}

/// Number of k-faces of a d-simplex: `C(d+1, k+1)`.
pub fn num_faces(d: usize, k: usize) -> u64 {
    table().get(d + 1, k + 1)
}

/// The `index`-th k-face of a d-simplex in lexicographic order, as a
/// strictly increasing array of `k+1` vertex numbers in `{0, .., d}`.
pub fn face_vertices(d: usize, k: usize, index: u64) -> Result<Vec<u8>> {
    let total = num_faces(d, k);
    if index >= total {
        return Err(CoreError::InvalidArgument {
            reason: format!("face index {index} out of range for C({}, {})", d + 1, k + 1),
        });
    }

    let t = table();
    let mut remaining = index;
    let mut verts = Vec::with_capacity(k + 1);
    let mut lo = 0usize;
    for slot in 0..=k {
        let picks_left = k - slot;
        let mut v = lo;
        loop {
            let below = t.get(d - v, picks_left);
            if remaining < below {
                break;
            }
            remaining -= below;
            v += 1;
        }
        verts.push(v as u8);
        lo = v + 1;
    }
    Ok(verts)
}

/// The lexicographic index of the k-face with the given (must be strictly
/// increasing) vertex sequence.
pub fn face_index(d: usize, k: usize, vertices: &[u8]) -> Result<u64> {
    if vertices.len() != k + 1 {
        return Err(CoreError::InvalidArgument {
            reason: format!("expected {} vertices for a {k}-face, got {}", k + 1, vertices.len()),
        });
    }
    for w in vertices.windows(2) {
        if w[0] >= w[1] {
            return Err(CoreError::InvalidArgument {
                reason: "face vertices must be strictly increasing".to_string(),
            });
        }
    }

    let t = table();
    let mut index = 0u64;
    let mut lo = 0usize;
    for (slot, &v) in vertices.iter().enumerate() {
        let v = v as usize;
        let picks_left = k - slot;
        for candidate in lo..v {
            index += t.get(d - candidate, picks_left);
        }
        lo = v + 1;
    }
    Ok(index)
}

/// One facet of a k-face as seen from the enclosing d-simplex: which
/// `(k-1)`-face index it is, and the parity of the permutation needed to
/// sort the facet's vertex order back into the enclosing simplex's
/// canonical increasing order (used by boundary-map / orientation
/// consumers elsewhere in the wider engine).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrientedFacet {
    /// Index, among `(k-1)`-faces of the d-simplex, of this facet.
    pub facet_index: u64,
    /// `true` if dropping the vertex reverses orientation (odd parity).
    pub reversed: bool,
}

/// For the k-face at `index`, the oriented list of its `k+1` facets
/// (each obtained by omitting one vertex), in the order the omitted
/// vertex appears in the face's vertex sequence.
pub fn oriented_facets(d: usize, k: usize, index: u64) -> Result<Vec<OrientedFacet>> {
    if k == 0 {
        return Err(CoreError::InvalidArgument {
            reason: "a 0-face (vertex) has no facets".to_string(),
        });
    }
    let verts = face_vertices(d, k, index)?;
    let mut out = Vec::with_capacity(k + 1);
    for (omit, _) in verts.iter().enumerate() {
        let mut facet_verts: Vec<u8> = verts.clone();
        facet_verts.remove(omit);
        let facet_index = face_index(d, k - 1, &facet_verts)?;
        out.push(OrientedFacet { facet_index, reversed: omit % 2 == 1 });
    }
    Ok(out)
}
