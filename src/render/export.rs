//! Mesh export accumulator and OBJ writer.
//!
//! While an export bracket is open, every mesh the scene draws is baked into
//! one accumulator mesh using the model-view matrix active at the draw, so
//! the written file holds exactly the geometry the bracketed draws would
//! have rasterized.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cgmath::{InnerSpace, Matrix4, Vector4};

use crate::data_structures::mesh::{Mesh, MeshVertex};

pub struct MeshExport {
    path: PathBuf,
    mesh: Mesh,
}

impl MeshExport {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "export".to_string());
        Self {
            path,
            mesh: Mesh::new(name),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `mesh` transformed by `matrix` to the accumulator.
    pub(crate) fn append(&mut self, mesh: &Mesh, matrix: &Matrix4<f32>) {
        let base = self.mesh.vertices.len() as u32;
        for v in &mesh.vertices {
            let p = matrix * Vector4::new(v.position[0], v.position[1], v.position[2], 1.0);
            let n = matrix * Vector4::new(v.normal[0], v.normal[1], v.normal[2], 0.0);
            let n = n.truncate();
            let n = if n.magnitude2() > 0.0 { n.normalize() } else { n };
            self.mesh.vertices.push(MeshVertex {
                position: [p.x, p.y, p.z],
                normal: n.into(),
                tex_coords: v.tex_coords,
            });
        }
        self.mesh
            .indices
            .extend(mesh.indices.iter().map(|&i| i + base));
    }

    /// Write the accumulated geometry as an OBJ file.
    pub(crate) fn write(&self) -> Result<()> {
        let mut out = String::new();
        let _ = writeln!(out, "o {}", self.mesh.name);
        for v in &self.mesh.vertices {
            let _ = writeln!(out, "v {} {} {}", v.position[0], v.position[1], v.position[2]);
        }
        for v in &self.mesh.vertices {
            let _ = writeln!(out, "vt {} {}", v.tex_coords[0], 1.0 - v.tex_coords[1]);
        }
        for v in &self.mesh.vertices {
            let _ = writeln!(out, "vn {} {} {}", v.normal[0], v.normal[1], v.normal[2]);
        }
        for tri in self.mesh.indices.chunks(3) {
            if let [a, b, c] = tri {
                let _ = writeln!(
                    out,
                    "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}",
                    a = a + 1,
                    b = b + 1,
                    c = c + 1
                );
            }
        }
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        fs::write(&self.path, out)
            .with_context(|| format!("writing mesh export {}", self.path.display()))?;
        log::info!(
            "exported {} triangles to {}",
            self.mesh.triangle_count(),
            self.path.display()
        );
        Ok(())
    }
}
