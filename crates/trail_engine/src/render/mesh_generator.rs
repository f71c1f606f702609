//! Camera-facing ribbon generation for a single trail
//!
//! Every quad endpoint is pushed sideways along
//! `normalize(cross(view_direction, point))` by half the ribbon width,
//! producing a left/right vertex pair. Pair `k` and pair `k + 1` form quad
//! `k` as two triangles.
//!
//! ```text
//!   0 ---- 2 ---- 4
//!   |    / |    / |
//!   |  /   |  /   |
//!   1 ---- 3 ---- 5
//! ```
//!
//! Generation only reads the trail and writes its own freshly sized buffers,
//! so the compositor can run it for many trails at once.

use crate::foundation::math::{utils, Vec3, DEGENERATE_EPSILON};
use crate::trail::{Quad, Trail};
use super::vertex::Vertex;

/// Vertices and indices of one trail's ribbon
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrailMesh {
    /// Two vertices per quad endpoint
    pub vertices: Vec<Vertex>,
    /// Six indices per quad
    pub indices: Vec<u32>,
}

impl TrailMesh {
    /// Empty mesh with exact capacity for `quad_count` quads
    pub fn with_quad_count(quad_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count_for(quad_count)),
            indices: Vec::with_capacity(index_count_for(quad_count)),
        }
    }

    /// Whether the mesh has no geometry
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Vertices produced for `quad_count` quads
pub const fn vertex_count_for(quad_count: usize) -> usize {
    if quad_count == 0 {
        0
    } else {
        quad_count * 2 + 2
    }
}

/// Indices produced for `quad_count` quads
pub const fn index_count_for(quad_count: usize) -> usize {
    quad_count * 6
}

/// Generate the ribbon for a trail
pub fn generate_trail_mesh(trail: &Trail, view_direction: Vec3) -> TrailMesh {
    generate_mesh(trail.quads(), view_direction, trail.quad_width())
}

/// Generate a camera-facing ribbon through `quads`
///
/// An empty slice yields an empty mesh without allocating.
pub fn generate_mesh(quads: &[Quad], view_direction: Vec3, quad_width: f32) -> TrailMesh {
    let Some(first) = quads.first() else {
        return TrailMesh::default();
    };

    let half_width = quad_width * 0.5;
    let mut mesh = TrailMesh::with_quad_count(quads.len());

    push_vertex_pair(&mut mesh.vertices, first.start_point, view_direction, half_width);

    for (i, quad) in quads.iter().enumerate() {
        push_vertex_pair(&mut mesh.vertices, quad.end_point, view_direction, half_width);

        // Index order is fixed; do not reorder.
        let step = (2 * i) as u32;
        mesh.indices.extend_from_slice(&[
            step + 1,
            step,
            step + 2,
            step + 2,
            step + 3,
            step + 1,
        ]);
    }

    mesh
}

/// Sideways offset for a point so the ribbon faces the viewer
///
/// When the cross product vanishes (the point is the origin or lies on the
/// view axis) any direction perpendicular to the view is used instead.
pub fn billboard_offset(point: Vec3, view_direction: Vec3, half_width: f32) -> Vec3 {
    let side = view_direction
        .cross(&point)
        .try_normalize(DEGENERATE_EPSILON)
        .unwrap_or_else(|| utils::any_perpendicular(&view_direction));

    side * half_width
}

fn push_vertex_pair(vertices: &mut Vec<Vertex>, point: Vec3, view_direction: Vec3, half_width: f32) {
    let offset = billboard_offset(point, view_direction, half_width);
    vertices.push(Vertex::new(point + offset, view_direction));
    vertices.push(Vertex::new(point - offset, view_direction));
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn straight_trail(quad_count: usize) -> Vec<Quad> {
        (0..quad_count)
            .map(|i| {
                let x = i as f32;
                Quad::new(Vec3::new(x, 1.0, 0.0), Vec3::new(x + 1.0, 1.0, 0.0))
            })
            .collect()
    }

    #[test]
    fn test_empty_quads_produce_empty_mesh() {
        let mesh = generate_mesh(&[], Vec3::z(), 1.0);
        assert!(mesh.is_empty());
        assert!(mesh.vertices.is_empty());
        assert_eq!(mesh.vertices.capacity(), 0);
    }

    #[test]
    fn test_vertex_and_index_count_law() {
        for n in 1..=12 {
            let mesh = generate_mesh(&straight_trail(n), Vec3::z(), 0.5);
            assert_eq!(mesh.vertices.len(), 2 * n + 2);
            assert_eq!(mesh.indices.len(), 6 * n);
            assert_eq!(mesh.vertices.len(), vertex_count_for(n));
            assert_eq!(mesh.indices.len(), index_count_for(n));
        }
    }

    #[test]
    fn test_winding_order() {
        let n = 5;
        let mesh = generate_mesh(&straight_trail(n), Vec3::z(), 0.5);

        for (i, triangles) in mesh.indices.chunks(6).enumerate() {
            let s = 2 * i as u32;
            assert_eq!(triangles, &[s + 1, s, s + 2, s + 2, s + 3, s + 1]);
        }

        let max_index = *mesh.indices.iter().max().unwrap();
        assert_eq!(max_index as usize, mesh.vertices.len() - 1);
    }

    #[test]
    fn test_vertices_offset_by_half_width_along_cross() {
        let view = Vec3::new(0.0, 0.0, -1.0);
        let quads = [Quad::new(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, 4.0, 0.0))];
        let mesh = generate_mesh(&quads, view, 1.0);

        // cross((0,0,-1), (0,y,0)) points along +X for positive y.
        assert_relative_eq!(mesh.vertices[0].position(), Vec3::new(0.5, 2.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(mesh.vertices[1].position(), Vec3::new(-0.5, 2.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(mesh.vertices[2].position(), Vec3::new(0.5, 4.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(mesh.vertices[3].position(), Vec3::new(-0.5, 4.0, 0.0), epsilon = 1e-6);

        for vertex in &mesh.vertices {
            assert_eq!(vertex.normal(), view);
        }
    }

    #[test]
    fn test_ribbon_width_matches_quad_width() {
        let view = Vec3::new(0.3, -0.4, 0.8).normalize();
        let quads = [
            Quad::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 1.0, 0.5)),
            Quad::new(Vec3::new(4.0, 1.0, 0.5), Vec3::new(7.0, -1.0, 2.0)),
        ];
        let mesh = generate_mesh(&quads, view, 0.8);

        for pair in mesh.vertices.chunks(2) {
            let width = (pair[0].position() - pair[1].position()).norm();
            assert_relative_eq!(width, 0.8, epsilon = 1e-5);
            // Offsets are perpendicular to the view direction.
            assert_relative_eq!((pair[0].position() - pair[1].position()).dot(&view), 0.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_joint_vertices_coincide() {
        let quads = straight_trail(3);
        let mesh = generate_mesh(&quads, Vec3::z(), 0.5);

        // Quad 1 starts where quad 0 ends; its near edge is pair 1.
        let joint = generate_mesh(&quads[1..2], Vec3::z(), 0.5);
        assert_eq!(joint.vertices[0], mesh.vertices[2]);
        assert_eq!(joint.vertices[1], mesh.vertices[3]);
    }

    #[test]
    fn test_degenerate_point_uses_fallback() {
        let view = Vec3::new(0.0, 0.0, 1.0);
        // Origin and a point on the view axis both zero the cross product.
        let quads = [Quad::new(Vec3::zeros(), Vec3::new(0.0, 0.0, 5.0))];
        let mesh = generate_mesh(&quads, view, 2.0);

        for pair in mesh.vertices.chunks(2) {
            let a = pair[0].position();
            let b = pair[1].position();
            assert!(a.iter().chain(b.iter()).all(|c| c.is_finite()));
            assert_relative_eq!((a - b).norm(), 2.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_nudged_origin_is_not_degenerate() {
        let view = Vec3::new(0.0, 0.0, 1.0);
        let offset = billboard_offset(crate::trail::ZERO_START_NUDGE, view, 0.5);
        let expected = view.cross(&crate::trail::ZERO_START_NUDGE).normalize() * 0.5;
        assert_relative_eq!(offset, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_generate_from_trail() {
        let mut trail = Trail::new(1.0, 0.25);
        trail.expand(Vec3::new(0.0, 1.0, 1.0), Vec3::new(0.0, 1.0, 0.0));
        trail.expand(Vec3::new(0.0, 1.0, 2.0), Vec3::new(0.0, 1.0, 0.0));

        let mesh = generate_trail_mesh(&trail, Vec3::x());
        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.indices.len(), 12);
        let width = (mesh.vertices[0].position() - mesh.vertices[1].position()).norm();
        assert_relative_eq!(width, 0.25, epsilon = 1e-6);
    }
}
