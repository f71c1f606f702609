//! # Trail rendering
//!
//! Geometry side of the trail pipeline:
//!
//! - [`vertex`]: interleaved vertex format and layout descriptors
//! - [`camera`]: source of the billboarding view direction
//! - [`mesh_generator`]: one camera-facing ribbon per trail
//! - [`compositor`]: merges all ribbons into one upload per frame
//! - [`backend`]: the boundary the merged mesh is handed to

pub mod vertex;
pub mod camera;
pub mod backend;
pub mod mesh_generator;
pub mod compositor;

pub use vertex::{
    Vertex, VertexAttribute, VertexAttributeDescriptor, VertexFormat,
    IndexFormat, MeshTopology, SubMeshDescriptor,
};
pub use camera::Camera;
pub use backend::{BackendResult, MeshUpload, RenderError, TrailRenderBackend};
pub use mesh_generator::{generate_mesh, generate_trail_mesh, billboard_offset, TrailMesh};
pub use compositor::{FrameCompositor, FrameBuffers, FrameStats};
