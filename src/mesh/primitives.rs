//! Procedural test meshes.
//!
//! These generators are used by the tests and benchmarks, and are handy for
//! sanity-checking operators on surfaces with known properties.

use std::collections::HashMap;

use nalgebra::Point3;

use super::trimesh::TriMesh;

/// A flat `n x n` grid of squares in the XY plane, each split into two
/// right triangles along the diagonal.
///
/// The grid has `(n + 1)^2` vertices, `2 n^2` triangles and area
/// `(n * spacing)^2`.
pub fn flat_grid(n: usize, spacing: f64) -> TriMesh {
    let n = n.max(1);
    let mut points = Vec::with_capacity((n + 1) * (n + 1));
    let mut triangles = Vec::with_capacity(2 * n * n);

    for j in 0..=n {
        for i in 0..=n {
            points.push(Point3::new(i as f64 * spacing, j as f64 * spacing, 0.0));
        }
    }

    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;

            triangles.push([v00, v10, v11]);
            triangles.push([v00, v11, v01]);
        }
    }

    TriMesh { points, triangles }
}

/// A unit sphere built by subdividing an icosahedron `subdivisions` times
/// and projecting the new vertices onto the sphere.
///
/// All triangles are close to equilateral, so none of them is obtuse.
pub fn icosphere(subdivisions: usize) -> TriMesh {
    let phi = (1.0 + 5.0_f64.sqrt()) / 2.0;
    let scale = 1.0 / (1.0 + phi * phi).sqrt();

    let mut points = vec![
        Point3::new(-1.0, phi, 0.0) * scale,
        Point3::new(1.0, phi, 0.0) * scale,
        Point3::new(-1.0, -phi, 0.0) * scale,
        Point3::new(1.0, -phi, 0.0) * scale,
        Point3::new(0.0, -1.0, phi) * scale,
        Point3::new(0.0, 1.0, phi) * scale,
        Point3::new(0.0, -1.0, -phi) * scale,
        Point3::new(0.0, 1.0, -phi) * scale,
        Point3::new(phi, 0.0, -1.0) * scale,
        Point3::new(phi, 0.0, 1.0) * scale,
        Point3::new(-phi, 0.0, -1.0) * scale,
        Point3::new(-phi, 0.0, 1.0) * scale,
    ];

    let mut triangles: Vec<[usize; 3]> = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    for _ in 0..subdivisions {
        let mut next = Vec::with_capacity(triangles.len() * 4);
        let mut midpoints: HashMap<(usize, usize), usize> = HashMap::new();

        for tri in &triangles {
            let mut mids = [0usize; 3];

            for i in 0..3 {
                let a = tri[i];
                let b = tri[(i + 1) % 3];
                let key = if a < b { (a, b) } else { (b, a) };

                mids[i] = *midpoints.entry(key).or_insert_with(|| {
                    let mid = (points[a].coords + points[b].coords) / 2.0;
                    points.push(Point3::from(mid.normalize()));
                    points.len() - 1
                });
            }

            next.push([tri[0], mids[0], mids[2]]);
            next.push([tri[1], mids[1], mids[0]]);
            next.push([tri[2], mids[2], mids[1]]);
            next.push([mids[0], mids[1], mids[2]]);
        }

        triangles = next;
    }

    TriMesh { points, triangles }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_flat_grid_counts() {
        let mesh = flat_grid(3, 0.5);

        assert_eq!(mesh.num_vertices(), 16);
        assert_eq!(mesh.num_triangles(), 18);
        assert_relative_eq!(mesh.surface_area(), 2.25, epsilon = 1e-12);
    }

    #[test]
    fn test_icosphere_counts() {
        // V = 10 * 4^k + 2, F = 20 * 4^k
        let mesh = icosphere(2);

        assert_eq!(mesh.num_vertices(), 162);
        assert_eq!(mesh.num_triangles(), 320);
        for p in mesh.points() {
            assert_relative_eq!(p.coords.norm(), 1.0, epsilon = 1e-12);
        }
        // Inscribed polyhedron is a little smaller than the sphere
        let area = mesh.surface_area();
        assert!(area < 4.0 * std::f64::consts::PI && area > 12.0, "area = {}", area);
    }
}
