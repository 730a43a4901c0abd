//! OBJ mesh parsing.

use std::io::{BufReader, Cursor};

use anyhow::{Result, bail};

use crate::data_structures::mesh::{Mesh, MeshVertex};

/// Parse OBJ file data into a single registry mesh.
///
/// Multiple OBJ objects are merged into one index buffer. Texture
/// coordinates are flipped vertically to match the texture origin used by
/// the rest of the pipeline. Material libraries are ignored; materials come
/// from the scene, not from the asset.
pub fn parse_obj(name: &str, data: &[u8]) -> Result<Mesh> {
    let mut reader = BufReader::new(Cursor::new(data));
    let (models, _materials) = tobj::load_obj_buf(
        &mut reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |_mtl_path| Ok(Default::default()),
    )?;

    let mut mesh = Mesh::new(name);
    for m in &models {
        let base = mesh.vertices.len() as u32;
        for i in 0..m.mesh.positions.len() / 3 {
            mesh.vertices.push(MeshVertex {
                position: [
                    m.mesh.positions[i * 3],
                    m.mesh.positions[i * 3 + 1],
                    m.mesh.positions[i * 3 + 2],
                ],
                normal: [
                    m.mesh.normals.get(i * 3).map_or(0.0, |f| *f),
                    m.mesh.normals.get(i * 3 + 1).map_or(0.0, |f| *f),
                    m.mesh.normals.get(i * 3 + 2).map_or(0.0, |f| *f),
                ],
                tex_coords: [
                    m.mesh.texcoords.get(i * 2).map_or(0.0, |f| *f),
                    1.0 - m.mesh.texcoords.get(i * 2 + 1).map_or(0.0, |f| *f),
                ],
            });
        }
        mesh.indices.extend(m.mesh.indices.iter().map(|&i| i + base));
    }
    if mesh.vertices.is_empty() {
        bail!("no geometry in OBJ data for mesh {name}");
    }
    Ok(mesh)
}
