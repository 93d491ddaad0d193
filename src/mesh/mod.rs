//! Core mesh data structures.
//!
//! The primary type is [`TriMesh`], an immutable point list plus a triangle
//! list. Vertex ids and triangle ids are plain indices into those lists.
//! [`VertexTriangles`] answers "which triangles touch this vertex" without
//! scanning the whole triangle list.
//!
//! # Construction
//!
//! ```
//! use surflap::mesh::{TriMesh, VertexTriangles};
//! use nalgebra::Point3;
//!
//! let points = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let mesh = TriMesh::new(points, vec![[0, 1, 2]]).unwrap();
//! let incidence = VertexTriangles::new(&mesh);
//! assert_eq!(incidence.of(2), &[0]);
//! ```

pub mod primitives;
mod topology;
mod trimesh;

pub use topology::VertexTriangles;
pub use trimesh::TriMesh;
