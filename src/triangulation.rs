//! Abstract move surfaces consumed by the retriangulator (C9).
//!
//! This module owns no production simplicial data model: the real
//! triangulation and link-diagram types live in the wider engine, which
//! implements [`PachnerMoves`] or [`ReidemeisterMoves`] against its own
//! representation. [`ToyTriangulation3`] is a small, self-contained stand-in
//! used only to exercise [`crate::retriangulate`] in this crate's own tests.

use crate::error::Result;
use std::collections::HashMap;

/// The bistellar-move surface a d-dimensional triangulation type exposes to
/// the retriangulator. A move is keyed by a face dimension `k` and an index
/// into that dimension's faces; `with_pachner` returns the result of the
/// move at that face if (and only if) it is legal there.
pub trait PachnerMoves: Clone + Send {
    /// `true` iff the object has no top-dimensional simplices.
    fn is_empty(&self) -> bool;

    /// Number of top-dimensional simplices.
    fn size(&self) -> usize;

    /// A byte string equal for two objects iff they are combinatorially
    /// equivalent, and from which [`Self::from_signature`] can reconstruct
    /// a representative.
    fn canonical_signature(&self) -> String;

    /// Reconstruct an object from a string produced by
    /// [`Self::canonical_signature`].
    fn from_signature(sig: &str) -> Result<Self>
    where
        Self: Sized;

    /// Face dimensions this type defines Pachner moves for, in the order
    /// the retriangulator should try them.
    fn move_dimensions(&self) -> &'static [usize];

    /// Number of `k`-faces currently present.
    fn num_faces(&self, k: usize) -> usize;

    /// The result of the bistellar move at the `face`-th `k`-face, or
    /// `None` if that move is not legal there.
    fn with_pachner(&self, k: usize, face: usize) -> Option<Self>;

    /// Every legal local move whose result has size `<= max_size`
    /// (`None` meaning unbounded), in `move_dimensions()` order.
    fn local_moves(&self, max_size: Option<usize>) -> Vec<Self> {
        let mut out = Vec::new();
        for &k in self.move_dimensions() {
            for face in 0..self.num_faces(k) {
                if let Some(candidate) = self.with_pachner(k, face) {
                    if max_size.map_or(true, |m| candidate.size() <= m) {
                        out.push(candidate);
                    }
                }
            }
        }
        out
    }
}

/// The Reidemeister-move surface a link-diagram type exposes to the
/// retriangulator. Not implemented by any type in this crate; provided so
/// the wider engine's diagram type has a trait to implement against.
pub trait ReidemeisterMoves: Clone + Send {
    /// `true` iff the diagram has no crossings and no free loops.
    fn is_empty(&self) -> bool;

    /// Number of crossings.
    fn size(&self) -> usize;

    /// A byte string equal for two diagrams iff they are combinatorially
    /// equivalent.
    fn canonical_signature(&self) -> String;

    /// Reconstruct a diagram from a string produced by
    /// [`Self::canonical_signature`].
    fn from_signature(sig: &str) -> Result<Self>
    where
        Self: Sized;

    /// The result of removing a Reidemeister I twist at `crossing`, or
    /// `None` if `crossing` is not a monogon.
    fn with_r1(&self, crossing: usize) -> Option<Self>;

    /// The result of removing a Reidemeister II bigon sharing `crossing`,
    /// or `None` if `crossing` is not part of one.
    fn with_r2(&self, crossing: usize) -> Option<Self>;

    /// The result of sliding a strand across the triangle at `crossing` on
    /// the given `side`, or `None` if no such Reidemeister III move exists.
    fn with_r3(&self, crossing: usize, side: bool) -> Option<Self>;

    /// Add a Reidemeister I twist on `arc`, on the given `side`, of the
    /// given crossing `sign`.
    fn r1(&self, arc: usize, side: bool, sign: i8) -> Self;

    /// Add a Reidemeister II pair of crossings between `upper` and `lower`
    /// arcs on the given sides, walking the enclosed 2-cell as in §4.9.
    fn r2_virtual(&self, upper: usize, upper_side: bool, lower: usize, lower_side: bool) -> Self;
}

/// A face-gluing slot: `None` for boundary, or `Some((tet, face))` naming
/// the neighbouring tetrahedron and which of its four faces is glued here.
type Gluing = Option<(usize, usize)>;

/// One tetrahedron of a [`ToyTriangulation3`]: four face slots, each either
/// boundary or glued to a face of another tetrahedron.
///
/// Unlike a production triangulation, gluings here carry no vertex
/// permutation: faces are identified only up to "glued to this other face
/// slot", which is enough to drive generic Pachner-move search but not to
/// track orientation or vertex identifications.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToyTet {
    gluing: [Gluing; 4],
}

/// A minimal stand-in for a 3-dimensional triangulation: a pool of
/// [`ToyTet`]s glued along faces. Exists purely to exercise
/// [`crate::retriangulate::retriangulate`] in this crate's own test suite;
/// it is not part of the production triangulation data model (§4.7).
///
/// Only the 2&harr;3 Pachner move pair is implemented (`k = 2`: split a
/// shared triangular face into three tetrahedra around a new edge; `k = 1`:
/// the inverse, collapsing three tetrahedra glued in the cycle this move
/// produces back into two). Detecting a 3&rarr;2 move requires recognising
/// the exact slot layout this type's own 2-3 move produces (slots 0/1 carry
/// the internal triangle, slots 2/3 the external attachments); a real edge
/// data structure would be needed to detect it from an arbitrary hand-built
/// gluing, which is out of scope for a test fixture.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToyTriangulation3 {
    tets: Vec<ToyTet>,
}

impl ToyTriangulation3 {
    /// Build directly from a tetrahedron pool (gluings must be symmetric).
    pub fn new(tets: Vec<ToyTet>) -> Self {
        ToyTriangulation3 { tets }
    }

    /// Two tetrahedra glued along one face, all other faces boundary: the
    /// smallest seed a 2-3 move can fire on.
    pub fn two_glued_tetrahedra() -> Self {
        let mut a = ToyTet::default();
        let mut b = ToyTet::default();
        a.gluing[0] = Some((1, 0));
        b.gluing[0] = Some((0, 0));
        ToyTriangulation3 { tets: vec![a, b] }
    }

    fn shared_faces(&self) -> Vec<(usize, usize, usize, usize)> {
        let mut out = Vec::new();
        for a in 0..self.tets.len() {
            for fa in 0..4 {
                if let Some((b, fb)) = self.tets[a].gluing[fa] {
                    if a != b && a < b {
                        out.push((a, fa, b, fb));
                    }
                }
            }
        }
        out
    }

    /// Triples `[t0, t1, t2]` glued in the cyclic slot-0/slot-1 pattern
    /// that [`Self::do_2_3`] produces, canonicalized to start at the
    /// smallest index.
    fn edge_triangles(&self) -> Vec<[usize; 3]> {
        let mut out = Vec::new();
        let n = self.tets.len();
        for t0 in 0..n {
            let Some((t1, 1)) = self.tets[t0].gluing[0] else { continue };
            if t1 == t0 {
                continue;
            }
            let Some((t2, 1)) = self.tets[t1].gluing[0] else { continue };
            if t2 == t0 || t2 == t1 {
                continue;
            }
            if self.tets[t2].gluing[0] != Some((t0, 1)) {
                continue;
            }
            if self.tets[t1].gluing[1] != Some((t0, 0))
                || self.tets[t2].gluing[1] != Some((t1, 0))
                || self.tets[t0].gluing[1] != Some((t2, 0))
            {
                continue;
            }
            if t0 == [t0, t1, t2].iter().min().copied().unwrap() {
                out.push([t0, t1, t2]);
            }
        }
        out
    }

    /// Split the face shared by tetrahedra `a` (on face `fa`) and `b` (on
    /// face `fb`) into three tetrahedra arranged around a new edge. `a`'s
    /// other three faces and `b`'s other three faces (in ascending slot
    /// order) become the external attachments of the three new
    /// tetrahedra's slots 2 and 3 respectively.
    fn do_2_3(&self, a: usize, fa: usize, b: usize, fb: usize) -> Self {
        debug_assert_ne!(a, b, "2-3 move requires two distinct tetrahedra");
        let other_faces_a: Vec<usize> = (0..4).filter(|&f| f != fa).collect();
        let other_faces_b: Vec<usize> = (0..4).filter(|&f| f != fb).collect();
        let mut face_to_i_a = HashMap::new();
        for (i, &f) in other_faces_a.iter().enumerate() {
            face_to_i_a.insert(f, i);
        }
        let mut face_to_i_b = HashMap::new();
        for (i, &f) in other_faces_b.iter().enumerate() {
            face_to_i_b.insert(f, i);
        }

        let n = self.tets.len();
        let keep: Vec<usize> = (0..n).filter(|&i| i != a && i != b).collect();
        let mut remap = vec![usize::MAX; n];
        for (new_idx, &old_idx) in keep.iter().enumerate() {
            remap[old_idx] = new_idx;
        }
        let tri_idx = [keep.len(), keep.len() + 1, keep.len() + 2];

        let mut new_tets: Vec<ToyTet> = keep.iter().map(|&i| self.tets[i].clone()).collect();
        for t in new_tets.iter_mut() {
            for slot in t.gluing.iter_mut() {
                if let Some((other, other_face)) = *slot {
                    *slot = if other == a {
                        Some((tri_idx[face_to_i_a[&other_face]], 2))
                    } else if other == b {
                        Some((tri_idx[face_to_i_b[&other_face]], 3))
                    } else {
                        Some((remap[other], other_face))
                    };
                }
            }
        }

        let mut tri_tets = [ToyTet::default(), ToyTet::default(), ToyTet::default()];
        for i in 0..3 {
            let next = tri_idx[(i + 1) % 3];
            let prev = tri_idx[(i + 2) % 3];
            tri_tets[i].gluing[0] = Some((next, 1));
            tri_tets[i].gluing[1] = Some((prev, 0));

            let fa_i = other_faces_a[i];
            tri_tets[i].gluing[2] = match self.tets[a].gluing[fa_i] {
                None => None,
                Some((o, _)) if o == a => {
                    debug_assert!(false, "2-3 move: unsupported self-gluing on tetrahedron a");
                    None
                }
                Some((o, of)) if o == b => Some((tri_idx[face_to_i_b[&of]], 3)),
                Some((o, of)) => Some((remap[o], of)),
            };

            let fb_i = other_faces_b[i];
            tri_tets[i].gluing[3] = match self.tets[b].gluing[fb_i] {
                None => None,
                Some((o, _)) if o == b => {
                    debug_assert!(false, "2-3 move: unsupported self-gluing on tetrahedron b");
                    None
                }
                Some((o, of)) if o == a => Some((tri_idx[face_to_i_a[&of]], 2)),
                Some((o, of)) => Some((remap[o], of)),
            };
        }

        new_tets.extend(tri_tets);
        ToyTriangulation3 { tets: new_tets }
    }

    /// Inverse of [`Self::do_2_3`]: collapse the three tetrahedra of
    /// `triangle` (laid out as that move produces) into two, reattaching
    /// their slot-2 faces to a new tetrahedron `a` and their slot-3 faces
    /// to a new tetrahedron `b`, glued to each other on the vacated face.
    fn do_3_2(&self, triangle: [usize; 3]) -> Self {
        let n = self.tets.len();
        let keep: Vec<usize> = (0..n).filter(|i| !triangle.contains(i)).collect();
        let mut remap = vec![usize::MAX; n];
        for (new_idx, &old_idx) in keep.iter().enumerate() {
            remap[old_idx] = new_idx;
        }
        let a_idx = keep.len();
        let b_idx = keep.len() + 1;

        let mut new_tets: Vec<ToyTet> = keep.iter().map(|&i| self.tets[i].clone()).collect();
        for t in new_tets.iter_mut() {
            for slot in t.gluing.iter_mut() {
                if let Some((other, other_face)) = *slot {
                    if let Some(pos) = triangle.iter().position(|&x| x == other) {
                        // Slot 2 (tetrahedron `a` side) vs slot 3 (`b` side)
                        // on the collapsed tetrahedron both map to face
                        // `1+pos` on their respective new tetrahedron.
                        *slot = if other_face == 2 {
                            Some((a_idx, 1 + pos))
                        } else {
                            Some((b_idx, 1 + pos))
                        };
                    } else {
                        *slot = Some((remap[other], other_face));
                    }
                }
            }
        }

        let mut a = ToyTet::default();
        let mut b = ToyTet::default();
        a.gluing[0] = Some((b_idx, 0));
        b.gluing[0] = Some((a_idx, 0));
        for (pos, &t) in triangle.iter().enumerate() {
            a.gluing[1 + pos] = match self.tets[t].gluing[2] {
                None => None,
                Some((o, of)) => {
                    if let Some(opos) = triangle.iter().position(|&x| x == o) {
                        // The other side of this external face also belongs
                        // to the collapsing triangle: after removal this
                        // face is internal to the new pair, impossible for
                        // a triangle produced by `do_2_3` since slots 2/3
                        // are by construction external; guard defensively.
                        debug_assert!(false, "3-2 move: unexpected internal cross-link at {opos}");
                        None
                    } else {
                        Some((remap[o], of))
                    }
                }
            };
            b.gluing[1 + pos] = match self.tets[t].gluing[3] {
                None => None,
                Some((o, of)) => Some((remap[o], of)),
            };
        }

        new_tets.push(a);
        new_tets.push(b);
        ToyTriangulation3 { tets: new_tets }
    }

    fn serialize(&self) -> String {
        let mut out = format!("{}", self.tets.len());
        for t in &self.tets {
            out.push(';');
            for (i, slot) in t.gluing.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                match slot {
                    None => out.push('b'),
                    Some((o, f)) => out.push_str(&format!("{o}:{f}")),
                }
            }
        }
        out
    }

    fn deserialize(sig: &str) -> Option<Self> {
        let mut parts = sig.split(';');
        let n: usize = parts.next()?.parse().ok()?;
        let mut tets = Vec::with_capacity(n);
        for part in parts {
            let mut gluing: [Gluing; 4] = [None, None, None, None];
            for (i, slot) in part.split(',').enumerate() {
                if slot == "b" {
                    continue;
                }
                let (o, f) = slot.split_once(':')?;
                gluing[i] = Some((o.parse().ok()?, f.parse().ok()?));
            }
            tets.push(ToyTet { gluing });
        }
        if tets.len() != n {
            return None;
        }
        Some(ToyTriangulation3 { tets })
    }
}

impl PachnerMoves for ToyTriangulation3 {
    fn is_empty(&self) -> bool {
        self.tets.is_empty()
    }

    fn size(&self) -> usize {
        self.tets.len()
    }

    /// An exact serialization of the gluing table, not a true isomorphism
    /// invariant: two relabelings of the same abstract complex get
    /// different signatures. This trades the full invariant spec §4.7
    /// asks for against exact invertibility, which §4.8's failure
    /// semantics explicitly allows ("may waste work" but never be
    /// incorrect) — acceptable for a fixture whose job is to drive the
    /// retriangulator's search machinery, not to dedupe by isomorphism.
    fn canonical_signature(&self) -> String {
        self.serialize()
    }

    fn from_signature(sig: &str) -> Result<Self> {
        Self::deserialize(sig).ok_or_else(|| crate::error::CoreError::InvalidInput {
            reason: format!("malformed toy triangulation signature: {sig}"),
        })
    }

    fn move_dimensions(&self) -> &'static [usize] {
        &[1, 2]
    }

    fn num_faces(&self, k: usize) -> usize {
        match k {
            1 => self.edge_triangles().len(),
            2 => self.shared_faces().len(),
            _ => 0,
        }
    }

    fn with_pachner(&self, k: usize, face: usize) -> Option<Self> {
        match k {
            1 => self.edge_triangles().get(face).map(|&tri| self.do_3_2(tri)),
            2 => self.shared_faces().get(face).map(|&(a, fa, b, fb)| self.do_2_3(a, fa, b, fb)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_has_one_shared_face_and_no_triangle() {
        let t = ToyTriangulation3::two_glued_tetrahedra();
        assert_eq!(t.size(), 2);
        assert_eq!(t.num_faces(2), 1);
        assert_eq!(t.num_faces(1), 0);
    }

    #[test]
    fn test_2_3_move_grows_by_one_and_exposes_a_3_2_move() {
        let t = ToyTriangulation3::two_glued_tetrahedra();
        let grown = t.with_pachner(2, 0).expect("2-3 move should be legal on the seed's shared face");
        assert_eq!(grown.size(), 3);
        assert_eq!(grown.num_faces(1), 1, "the new complex should expose exactly one 3-2-eligible edge");
    }

    #[test]
    fn test_2_3_then_3_2_round_trips_to_original_size() {
        let t = ToyTriangulation3::two_glued_tetrahedra();
        let grown = t.with_pachner(2, 0).unwrap();
        let shrunk = grown.with_pachner(1, 0).expect("inverse 3-2 move should be legal");
        assert_eq!(shrunk.size(), 2);
        assert_eq!(shrunk.num_faces(2), 1);
    }

    #[test]
    fn test_signature_roundtrip() {
        let t = ToyTriangulation3::two_glued_tetrahedra();
        let sig = t.canonical_signature();
        let back = ToyTriangulation3::from_signature(&sig).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_local_moves_respects_size_bound() {
        let t = ToyTriangulation3::two_glued_tetrahedra();
        let moves = t.local_moves(Some(2));
        assert!(moves.is_empty(), "the only available move grows size to 3, which exceeds the bound");
        let moves = t.local_moves(Some(3));
        assert_eq!(moves.len(), 1);
    }
}
