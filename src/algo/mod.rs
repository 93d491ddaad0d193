//! Discrete differential operators on triangle meshes.
//!
//! - **Partitioning**: splitting vertex ranges across workers ([`chunks`])
//! - **Edge geometry**: per-triangle edge vectors and lengths ([`edges`])
//! - **Mixed areas**: the per-vertex, per-triangle Meyer areas ([`mixed_area`])
//! - **Mass matrices**: Voronoi, barycentric and Mayer lumped masses ([`mass`])
//! - **Laplacians**: cotangent, Laplace-Beltrami and graph Laplacians ([`operators`])
//! - **Evaluation**: analytic test functions and their Laplacians
//!   ([`functions`], [`evaluate`])

pub mod chunks;
pub mod edges;
pub mod evaluate;
pub mod functions;
pub mod mass;
pub mod mixed_area;
pub mod operators;
