//! Loading of meshes, textures and shader sources from external files.
//!
//! Paths are taken as given; resolving them against an asset base directory
//! is the caller's concern (the build script copies `assets/` next to the
//! build output for frontends that run from there).

pub mod mesh;
pub mod shader;
pub mod texture;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

pub fn load_string(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

pub fn load_binary(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    fs::read(path).with_context(|| format!("reading {}", path.display()))
}
