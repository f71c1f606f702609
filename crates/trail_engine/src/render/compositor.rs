//! Frame compositor
//!
//! Once per frame every non-empty trail is turned into a ribbon (in parallel
//! when enabled) and the ribbons are merged, in slot order, into one
//! vertex/index buffer that is handed to the render backend in a single
//! upload.
//!
//! The merged buffers live in the compositor and are reused from frame to
//! frame. A [`FrameBuffers`] guard clears them when the frame ends, whether
//! the upload succeeded or not, so no geometry outlives its frame. Their
//! allocation is kept for the next frame and only shrunk once a frame uses
//! less than a quarter of it.

use std::time::Instant;

use rayon::prelude::*;

use crate::foundation::math::Vec3;
use crate::trail::Trail;
use crate::TrailError;
use super::backend::{MeshUpload, TrailRenderBackend};
use super::mesh_generator::{generate_trail_mesh, index_count_for, TrailMesh};
use super::vertex::Vertex;

/// Summary of one drawn frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Trails that contributed geometry
    pub trail_count: usize,
    /// Quads across those trails
    pub quad_count: usize,
    /// Vertices uploaded
    pub vertex_count: usize,
    /// Indices uploaded
    pub index_count: usize,
}

impl FrameStats {
    fn for_trails(trails: &[&Trail]) -> Self {
        let quad_count: usize = trails.iter().map(|t| t.quad_count()).sum();
        Self {
            trail_count: trails.len(),
            quad_count,
            vertex_count: quad_count * 2 + trails.len() * 2,
            index_count: index_count_for(quad_count),
        }
    }
}

/// Largest vertex count 32-bit indices can address
const MAX_ADDRESSABLE_VERTICES: usize = u32::MAX as usize;

/// Capacity above this multiple of a frame's usage is given back
const SHRINK_RATIO: usize = 4;

/// Merges every visible trail into one mesh per frame
///
/// The merged buffers are cleared after every frame but their allocation is
/// retained between frames, so steady-state drawing does not allocate.
#[derive(Debug)]
pub struct FrameCompositor {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    parallel: bool,
    vertex_budget: usize,
}

impl FrameCompositor {
    /// Create a compositor, `parallel` selects rayon fan-out for generation
    pub fn new(parallel: bool) -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            parallel,
            vertex_budget: MAX_ADDRESSABLE_VERTICES,
        }
    }

    /// Drop frames that would need more than `max_vertices` vertices
    pub fn with_vertex_budget(mut self, max_vertices: usize) -> Self {
        self.vertex_budget = max_vertices.min(MAX_ADDRESSABLE_VERTICES);
        self
    }

    /// Build and upload this frame's trail mesh
    ///
    /// Trails are merged in iteration order, which callers keep stable (slot
    /// order). Returns `Ok(None)` without allocating or calling the backend
    /// when no trail has any quads.
    pub fn draw<'t, I>(
        &mut self,
        trails: I,
        view_direction: Vec3,
        backend: &mut dyn TrailRenderBackend,
    ) -> Result<Option<FrameStats>, TrailError>
    where
        I: IntoIterator<Item = &'t Trail>,
    {
        let active: Vec<&Trail> = trails.into_iter().filter(|t| !t.is_empty()).collect();
        if active.is_empty() {
            log::trace!("No trail geometry this frame, skipping draw");
            return Ok(None);
        }

        let started = Instant::now();
        let stats = FrameStats::for_trails(&active);

        let mut frame = FrameBuffers::acquire(
            &mut self.vertices,
            &mut self.indices,
            stats.vertex_count,
            stats.index_count,
            self.vertex_budget,
        )?;

        for mesh in generate_meshes(&active, view_direction, self.parallel) {
            frame.append(&mesh);
        }

        backend.upload_trail_mesh(&frame.upload())?;

        log::trace!(
            "Drew {} trails ({} quads, {} vertices, {} indices) in {:.3} ms",
            stats.trail_count,
            stats.quad_count,
            stats.vertex_count,
            stats.index_count,
            started.elapsed().as_secs_f64() * 1000.0
        );

        Ok(Some(stats))
    }
}

/// Generate one mesh per trail, in the same order as `trails`
///
/// The parallel path joins every task before returning.
pub fn generate_meshes(trails: &[&Trail], view_direction: Vec3, parallel: bool) -> Vec<TrailMesh> {
    if parallel && trails.len() > 1 {
        trails
            .par_iter()
            .map(|trail| generate_trail_mesh(trail, view_direction))
            .collect()
    } else {
        trails
            .iter()
            .map(|trail| generate_trail_mesh(trail, view_direction))
            .collect()
    }
}

/// Merged frame buffers, cleared when dropped
pub struct FrameBuffers<'a> {
    vertices: &'a mut Vec<Vertex>,
    indices: &'a mut Vec<u32>,
}

impl<'a> FrameBuffers<'a> {
    /// Take the compositor's buffers for one frame, reserving exact room
    ///
    /// Fails when `vertex_count` exceeds `max_vertices` (or what `u32`
    /// indices can address) or the reservation fails. On failure both
    /// buffers are released entirely and the frame should be skipped.
    pub fn acquire(
        vertices: &'a mut Vec<Vertex>,
        indices: &'a mut Vec<u32>,
        vertex_count: usize,
        index_count: usize,
        max_vertices: usize,
    ) -> Result<Self, TrailError> {
        vertices.clear();
        indices.clear();

        if vertex_count > max_vertices.min(MAX_ADDRESSABLE_VERTICES)
            || vertices.try_reserve_exact(vertex_count).is_err()
            || indices.try_reserve_exact(index_count).is_err()
        {
            *vertices = Vec::new();
            *indices = Vec::new();
            return Err(TrailError::Allocation {
                vertices: vertex_count,
                indices: index_count,
            });
        }

        Ok(Self { vertices, indices })
    }

    /// Append one trail's mesh, rebasing its indices onto the merged buffer
    pub fn append(&mut self, mesh: &TrailMesh) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&mesh.vertices);
        self.indices.extend(mesh.indices.iter().map(|index| index + base));
    }

    /// Upload description of the merged buffers
    pub fn upload(&self) -> MeshUpload<'_> {
        MeshUpload::new(self.vertices.as_slice(), self.indices.as_slice())
    }
}

impl Drop for FrameBuffers<'_> {
    fn drop(&mut self) {
        release(self.vertices);
        release(self.indices);
    }
}

fn release<T>(buffer: &mut Vec<T>) {
    let used = buffer.len();
    buffer.clear();
    if buffer.capacity() > used.saturating_mul(SHRINK_RATIO) {
        buffer.shrink_to(used);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backend::{BackendResult, RenderError};
    use crate::render::mesh_generator::generate_mesh;
    use crate::render::vertex::{IndexFormat, MeshTopology};

    #[derive(Default)]
    struct CapturingBackend {
        uploads: Vec<TrailMesh>,
        fail: bool,
    }

    impl TrailRenderBackend for CapturingBackend {
        fn upload_trail_mesh(&mut self, upload: &MeshUpload<'_>) -> BackendResult<()> {
            assert_eq!(upload.index_format, IndexFormat::UInt32);
            assert_eq!(upload.sub_mesh.topology, MeshTopology::Triangles);
            assert_eq!(upload.sub_mesh.index_count, upload.indices.len());
            assert_eq!(upload.sub_mesh.vertex_count, upload.vertices.len());

            if self.fail {
                return Err(RenderError::RenderingFailed("device lost".to_string()));
            }

            self.uploads.push(TrailMesh {
                vertices: upload.vertices.to_vec(),
                indices: upload.indices.to_vec(),
            });
            Ok(())
        }
    }

    fn trail_with_quads(count: usize, y: f32) -> Trail {
        let mut trail = Trail::new(1.0, 0.5);
        let start = Vec3::new(0.0, y, 0.0);
        for i in 1..=count {
            trail.expand(Vec3::new(i as f32, y, 0.0), start);
        }
        assert_eq!(trail.quad_count(), count);
        trail
    }

    fn view() -> Vec3 {
        Vec3::new(0.0, 0.0, -1.0)
    }

    #[test]
    fn test_all_empty_skips_frame() {
        let trails = vec![Trail::new(1.0, 0.5), Trail::new(1.0, 0.5)];
        let mut compositor = FrameCompositor::new(false);
        let mut backend = CapturingBackend::default();

        let stats = compositor.draw(&trails, view(), &mut backend).unwrap();

        assert!(stats.is_none());
        assert!(backend.uploads.is_empty());
        assert_eq!(compositor.vertices.capacity(), 0);
        assert_eq!(compositor.indices.capacity(), 0);
    }

    #[test]
    fn test_empty_trails_contribute_nothing() {
        let trails = vec![
            Trail::new(1.0, 0.5),
            trail_with_quads(2, 1.0),
            Trail::new(1.0, 0.5),
        ];
        let mut compositor = FrameCompositor::new(false);
        let mut backend = CapturingBackend::default();

        let stats = compositor.draw(&trails, view(), &mut backend).unwrap().unwrap();

        assert_eq!(stats.trail_count, 1);
        assert_eq!(backend.uploads[0], generate_trail_mesh(&trails[1], view()));
    }

    #[test]
    fn test_merged_buffer_sizes() {
        let trails = vec![trail_with_quads(3, 1.0), trail_with_quads(5, 2.0)];
        let mut compositor = FrameCompositor::new(false);
        let mut backend = CapturingBackend::default();

        let stats = compositor.draw(&trails, view(), &mut backend).unwrap().unwrap();
        let merged = &backend.uploads[0];

        assert_eq!(stats.quad_count, 8);
        assert_eq!(merged.vertices.len(), 2 * 8 + 2 * 2);
        assert_eq!(merged.indices.len(), 6 * 8);
        assert_eq!(stats.vertex_count, merged.vertices.len());
        assert_eq!(stats.index_count, merged.indices.len());
    }

    #[test]
    fn test_second_trail_indices_are_offset() {
        let (a, b) = (2, 3);
        let trails = vec![trail_with_quads(a, 1.0), trail_with_quads(b, 2.0)];
        let mut compositor = FrameCompositor::new(false);
        let mut backend = CapturingBackend::default();

        compositor.draw(&trails, view(), &mut backend).unwrap();
        let merged = &backend.uploads[0];

        let first = generate_mesh(trails[0].quads(), view(), 0.5);
        let second = generate_mesh(trails[1].quads(), view(), 0.5);

        assert_eq!(&merged.indices[..6 * a], first.indices.as_slice());
        let offset = (2 * a + 2) as u32;
        for (merged_index, local_index) in merged.indices[6 * a..].iter().zip(&second.indices) {
            assert_eq!(*merged_index, local_index + offset);
        }

        assert_eq!(&merged.vertices[..2 * a + 2], first.vertices.as_slice());
        assert_eq!(&merged.vertices[2 * a + 2..], second.vertices.as_slice());
    }

    #[test]
    fn test_parallel_matches_serial() {
        let trails: Vec<Trail> = (0..32).map(|i| trail_with_quads(1 + i % 7, 1.0 + i as f32)).collect();
        let camera = Vec3::new(0.2, -0.5, -0.8).normalize();

        let mut serial_backend = CapturingBackend::default();
        let mut parallel_backend = CapturingBackend::default();
        FrameCompositor::new(false).draw(&trails, camera, &mut serial_backend).unwrap();
        FrameCompositor::new(true).draw(&trails, camera, &mut parallel_backend).unwrap();

        assert_eq!(serial_backend.uploads, parallel_backend.uploads);
    }

    #[test]
    fn test_buffers_released_after_frame() {
        let trails = vec![trail_with_quads(4, 1.0)];
        let mut compositor = FrameCompositor::new(false);
        let mut backend = CapturingBackend::default();

        compositor.draw(&trails, view(), &mut backend).unwrap();

        assert!(compositor.vertices.is_empty());
        assert!(compositor.indices.is_empty());
    }

    #[test]
    fn test_backend_failure_releases_buffers() {
        let trails = vec![trail_with_quads(4, 1.0)];
        let mut compositor = FrameCompositor::new(false);
        let mut backend = CapturingBackend {
            fail: true,
            ..Default::default()
        };

        let err = compositor.draw(&trails, view(), &mut backend).unwrap_err();

        assert!(matches!(err, TrailError::Render(_)));
        assert!(compositor.vertices.is_empty());
        assert!(compositor.indices.is_empty());

        // The next frame is unaffected.
        backend.fail = false;
        assert!(compositor.draw(&trails, view(), &mut backend).unwrap().is_some());
        assert_eq!(backend.uploads.len(), 1);
    }

    #[test]
    fn test_acquire_rejects_unaddressable_vertex_count() {
        let mut vertices = vec![Vertex::default(); 8];
        let mut indices = vec![0; 8];

        let failed = matches!(
            FrameBuffers::acquire(&mut vertices, &mut indices, usize::MAX, 6, usize::MAX),
            Err(TrailError::Allocation { .. })
        );

        assert!(failed);
        assert_eq!(vertices.capacity(), 0);
        assert_eq!(indices.capacity(), 0);
    }

    #[test]
    fn test_over_budget_frame_is_dropped() {
        let trails = vec![trail_with_quads(4, 1.0)];
        let mut compositor = FrameCompositor::new(false).with_vertex_budget(9);
        let mut backend = CapturingBackend::default();

        let err = compositor.draw(&trails, view(), &mut backend).unwrap_err();

        assert!(matches!(err, TrailError::Allocation { vertices: 10, indices: 24 }));
        assert!(backend.uploads.is_empty());
        assert_eq!(compositor.vertices.capacity(), 0);

        // Exactly on budget is fine.
        let mut compositor = FrameCompositor::new(false).with_vertex_budget(10);
        assert!(compositor.draw(&trails, view(), &mut backend).unwrap().is_some());
    }

    #[test]
    fn test_capacity_shrinks_after_small_frame() {
        let mut compositor = FrameCompositor::new(false);
        let mut backend = CapturingBackend::default();

        compositor.draw(&[trail_with_quads(40, 1.0)], view(), &mut backend).unwrap();
        let peak = compositor.vertices.capacity();
        assert!(peak >= 82);

        // A similar frame keeps the allocation.
        compositor.draw(&[trail_with_quads(30, 1.0)], view(), &mut backend).unwrap();
        assert_eq!(compositor.vertices.capacity(), peak);

        compositor.draw(&[trail_with_quads(1, 1.0)], view(), &mut backend).unwrap();
        assert!(compositor.vertices.capacity() < peak);
        assert!(compositor.indices.capacity() < 6 * 40);
        assert!(compositor.vertices.is_empty());
    }

    #[test]
    fn test_generate_meshes_keeps_order() {
        let trails = [trail_with_quads(1, 1.0), trail_with_quads(2, 2.0), trail_with_quads(3, 3.0)];
        let refs: Vec<&Trail> = trails.iter().collect();

        let meshes = generate_meshes(&refs, view(), true);

        let counts: Vec<usize> = meshes.iter().map(|m| m.indices.len() / 6).collect();
        assert_eq!(counts, vec![1, 2, 3]);
    }
}
