//! # regina-core
//!
//! Computational kernels for low-dimensional topology: exact integer-matrix
//! Smith Normal Form with tracked basis changes, the marked abelian group
//! abstraction built on top of it, Hilbert basis enumeration of integer
//! cones under "at-most-one" combinatorial constraints, and a concurrent
//! breadth-first search over canonical signatures for retriangulating
//! triangulations and rewriting knot/link diagrams.
//!
//! This crate deliberately does not own a triangulation data model, file
//! serialization, or any display layer: [`triangulation`] defines the
//! abstract surface the search in [`retriangulate`] consumes, and the wider
//! engine is expected to implement it against its real simplicial data
//! structures.
//!
//! ## Example
//!
//! ```rust
//! use regina_core::int::{Int, Integer};
//! use regina_core::matrix::Matrix;
//! use regina_core::snf::smith_normal_form;
//!
//! let mut x = Matrix::new(2, 2);
//! x.set(0, 0, Integer::from_int(4));
//! x.set(0, 1, Integer::from_int(2));
//! x.set(1, 0, Integer::from_int(2));
//! x.set(1, 1, Integer::from_int(4));
//!
//! let mut r = Matrix::identity(2);
//! let mut ri = Matrix::identity(2);
//! let mut c = Matrix::identity(2);
//! let mut ci = Matrix::identity(2);
//! smith_normal_form(&mut x, &mut r, &mut ri, &mut c, &mut ci);
//! assert_eq!(x.entry(0, 0), &Integer::from_int(2));
//! assert_eq!(x.entry(1, 1), &Integer::from_int(6));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;

// Arithmetic and linear-algebra core (C1, C2, C12).
pub mod int;
pub mod linalg;
pub mod matrix;
pub mod snf;

// Combinatorial primitives (C3, C4, C11).
pub mod bitmask;
pub mod face_numbering;
pub mod perm;

// Algebraic layer built atop SNF (C6, C7).
pub mod abelian_group;
pub mod homomorphism;

// Cone enumeration (C8).
pub mod hilbert_dual;

// Triangulation/link search (C9, C10).
pub mod retriangulate;
pub mod triangulation;

pub use error::{CoreError, Result};
