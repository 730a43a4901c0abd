//! CPU-side mesh data.
//!
//! Meshes live in the render state's registry and are referenced by name for
//! per-frame drawing. The vertex type is `Pod` so a presenter can upload the
//! buffers to the GPU without copying.

use bytemuck::{Pod, Zeroable};

/// One vertex: position, normal and texture coordinates.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

/// An indexed triangle mesh.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub name: String,
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Build a mesh from a generic vertex group.
    ///
    /// Missing normals or texture coordinates default to zero; an empty index
    /// list means the vertices already form a triangle list.
    pub fn from_group(name: impl Into<String>, group: &VertexGroup) -> Self {
        let vertices = group
            .positions
            .iter()
            .enumerate()
            .map(|(i, &position)| MeshVertex {
                position,
                normal: group.normals.get(i).copied().unwrap_or([0.0; 3]),
                tex_coords: group.tex_coords.get(i).copied().unwrap_or([0.0; 2]),
            })
            .collect::<Vec<_>>();
        let indices = if group.indices.is_empty() {
            (0..vertices.len() as u32).collect()
        } else {
            group.indices.clone()
        };
        Self {
            name: name.into(),
            vertices,
            indices,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex data as raw bytes, ready for a GPU vertex buffer.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index data as raw bytes, ready for a GPU index buffer.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Generic group of vertex attributes, the intermediate form produced by
/// external geometry generators before they become a registry [`Mesh`].
#[derive(Clone, Debug, Default)]
pub struct VertexGroup {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub tex_coords: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}
