//! WGSL shader compilation.
//!
//! The shader backend compiles its program with the `naga` front-end and
//! validator. Compile and link failures carry the full diagnostic text; no
//! fallback shader is ever substituted.

use std::collections::BTreeSet;

use anyhow::{Result, anyhow, bail};
use naga::valid::{Capabilities, ValidationFlags, Validator};

/// Vertex stage entry point the scene program must export.
pub const VERTEX_ENTRY: &str = "vs_main";
/// Fragment stage entry point the scene program must export.
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Reflection data for a compiled program: its entry points and the names of
/// its global shader variables (uniforms, textures, samplers).
#[derive(Clone, Debug)]
pub struct ProgramInfo {
    pub entry_points: Vec<String>,
    pub globals: BTreeSet<String>,
}

impl ProgramInfo {
    /// Whether the program declares a global of this name. The analogue of
    /// asking GL for a uniform location and getting -1 back.
    pub fn has_global(&self, name: &str) -> bool {
        self.globals.contains(name)
    }
}

/// Parse and validate WGSL source, returning program reflection data.
pub fn compile_wgsl(label: &str, source: &str) -> Result<ProgramInfo> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| anyhow!("error compiling shader {label}: {e}"))?;

    let mut validator = Validator::new(ValidationFlags::all(), Capabilities::all());
    validator
        .validate(&module)
        .map_err(|e| anyhow!("error linking shader {label}: {}", e.into_inner()))?;

    let entry_points = module
        .entry_points
        .iter()
        .map(|ep| ep.name.clone())
        .collect::<Vec<_>>();
    let globals = module
        .global_variables
        .iter()
        .filter_map(|(_, var)| var.name.clone())
        .collect();
    Ok(ProgramInfo {
        entry_points,
        globals,
    })
}

/// Compile a program and check that it exports the scene entry points.
pub fn compile_scene_program(label: &str, source: &str) -> Result<ProgramInfo> {
    let program = compile_wgsl(label, source)?;
    for entry in [VERTEX_ENTRY, FRAGMENT_ENTRY] {
        if !program.entry_points.iter().any(|ep| ep == entry) {
            bail!("shader {label} is missing the {entry} entry point");
        }
    }
    Ok(program)
}
