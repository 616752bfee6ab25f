//! Tube surface generation from a sampled curve
//!
//! Rebuilding this mesh is the highest per-frame cost in the subsystem; it
//! stays well inside the fixed-step budget for the segment counts involved
//! (65 rings x 8 radial vertices).

use nalgebra::{Point3, Vector3};

/// Triangle mesh for a tube swept along a path.
#[derive(Debug, Clone, Default)]
pub struct TubeMesh {
    pub positions: Vec<Point3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub indices: Vec<[u32; 3]>,
}

impl TubeMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }
}

/// Sweep a circle of `radius` along `path` using parallel-transport frames.
pub fn build_tube(path: &[Point3<f32>], radius: f32, radial_segments: usize) -> TubeMesh {
    if path.len() < 2 {
        return TubeMesh::default();
    }

    let tangents = path_tangents(path);

    // Initial frame: any unit vector orthogonal to the first tangent.
    let mut normal = orthogonal(&tangents[0]);
    let mut mesh = TubeMesh::default();

    for (i, (center, tangent)) in path.iter().zip(tangents.iter()).enumerate() {
        if i > 0 {
            normal = transport(&normal, &tangents[i - 1], tangent);
        }
        let binormal = tangent.cross(&normal);

        for j in 0..radial_segments {
            let theta = (j as f32 / radial_segments as f32) * std::f32::consts::TAU;
            let radial = normal * theta.cos() + binormal * theta.sin();
            mesh.positions.push(center + radial * radius);
            mesh.normals.push(radial);
        }
    }

    let rings = path.len();
    let n = radial_segments as u32;
    for ring in 0..(rings - 1) as u32 {
        for j in 0..n {
            let a = ring * n + j;
            let b = ring * n + (j + 1) % n;
            let c = (ring + 1) * n + j;
            let d = (ring + 1) * n + (j + 1) % n;
            mesh.indices.push([a, c, b]);
            mesh.indices.push([b, c, d]);
        }
    }

    mesh
}

fn path_tangents(path: &[Point3<f32>]) -> Vec<Vector3<f32>> {
    let last = path.len() - 1;
    (0..path.len())
        .map(|i| {
            let prev = path[i.saturating_sub(1)];
            let next = path[(i + 1).min(last)];
            let delta = next - prev;
            let norm = delta.norm();
            if norm > 1e-6 {
                delta / norm
            } else {
                Vector3::z()
            }
        })
        .collect()
}

fn orthogonal(tangent: &Vector3<f32>) -> Vector3<f32> {
    let axis = if tangent.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    tangent.cross(&axis).normalize()
}

/// Rotate `normal` by the minimal rotation taking `from` to `to`.
fn transport(normal: &Vector3<f32>, from: &Vector3<f32>, to: &Vector3<f32>) -> Vector3<f32> {
    let axis = from.cross(to);
    let norm = axis.norm();
    if norm < 1e-6 {
        return *normal;
    }
    let axis = axis / norm;
    let angle = from.dot(to).clamp(-1.0, 1.0).acos();
    let rotation = nalgebra::UnitQuaternion::from_axis_angle(
        &nalgebra::Unit::new_unchecked(axis),
        angle,
    );
    rotation * normal
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn straight_path() -> Vec<Point3<f32>> {
        (0..5).map(|i| Point3::new(0.0, 0.0, i as f32)).collect()
    }

    #[test]
    fn test_vertex_and_triangle_counts() {
        let mesh = build_tube(&straight_path(), 0.1, 8);
        assert_eq!(mesh.vertex_count(), 5 * 8);
        assert_eq!(mesh.triangle_count(), 4 * 8 * 2);
    }

    #[test]
    fn test_vertices_lie_on_radius() {
        let mesh = build_tube(&straight_path(), 0.25, 8);
        for (position, _) in mesh.positions.iter().zip(mesh.normals.iter()) {
            // Distance from the Z axis equals the tube radius.
            let radial = (position.x * position.x + position.y * position.y).sqrt();
            assert_relative_eq!(radial, 0.25, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_normals_are_unit_length() {
        let mesh = build_tube(&straight_path(), 0.1, 6);
        for normal in &mesh.normals {
            assert_relative_eq!(normal.norm(), 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_degenerate_path_is_empty() {
        let mesh = build_tube(&[Point3::origin()], 0.1, 8);
        assert_eq!(mesh.vertex_count(), 0);
    }

    #[test]
    fn test_indices_in_range() {
        let mesh = build_tube(&straight_path(), 0.1, 8);
        let count = mesh.vertex_count() as u32;
        for tri in &mesh.indices {
            assert!(tri.iter().all(|&i| i < count));
        }
    }
}
