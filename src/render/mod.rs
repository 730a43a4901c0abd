//! The render-state abstraction.
//!
//! [`RenderState`] is the one polymorphic contract the scene draws against:
//! matrix-mode stacks, a material stack, mesh and texture registries, frame
//! lifecycle and mesh export. Two backends satisfy it with different
//! internals:
//!
//! - [`fixed::FixedFunctionState`] emits every state call straight into the
//!   outgoing command stream, the way a legacy fixed-function pipeline is
//!   driven
//! - [`shader::ShaderState`] keeps CPU-side matrix stacks and a compiled
//!   program, and only touches the command stream with uniform uploads and
//!   draws
//!
//! The command stream ([`DrawCommand`]) is the submission boundary; a
//! presenter owning the actual GPU consumes it after `end_frame`. Backends
//! are selected at startup and never mixed within a frame.

pub mod export;
pub mod fixed;
pub mod shader;

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::path::Path;

use anyhow::Result;
use cgmath::{Matrix4, Vector4};

use crate::data_structures::mesh::{Mesh, VertexGroup};
use crate::data_structures::texture::TextureImage;
use crate::material::Material;
use crate::math;
use crate::resources;
use export::MeshExport;

/// Which matrix stack subsequent matrix operations address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatrixMode {
    ModelView,
    Projection,
    Texture,
}

pub(crate) const MATRIX_MODES: usize = 3;

/// Frame lifecycle. Draws are only legal while recording.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStage {
    Idle,
    Recording,
}

/// Global pipeline toggles a frame bracket switches on and back off.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    DepthTest,
    Lighting,
    NormalRescale,
}

/// The single light source both backends feed to the pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct LightSource {
    pub position: Vector4<f32>,
    pub ambient: Vector4<f32>,
    pub diffuse: Vector4<f32>,
    pub specular: Vector4<f32>,
}

impl Default for LightSource {
    fn default() -> Self {
        Self {
            position: Vector4::new(0.0, 1.0, 1.0, 0.0),
            ambient: Vector4::new(1.0, 1.0, 1.0, 1.0),
            diffuse: Vector4::new(1.0, 1.0, 1.0, 1.0),
            specular: Vector4::new(1.0, 1.0, 1.0, 1.0),
        }
    }
}

/// One entry of the per-frame command stream handed to the presenter.
///
/// The fixed-function backend records its whole call sequence here; the
/// shader backend records only program/uniform traffic and draws.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    SetMatrixMode(MatrixMode),
    LoadIdentity,
    MultMatrix(Matrix4<f32>),
    PushMatrix,
    PopMatrix,
    ApplyMaterial(Material),
    BindTexture(String),
    UnbindTexture,
    Enable(Capability),
    Disable(Capability),
    SetLight(LightSource),
    PolygonLines(bool),
    UseProgram(bool),
    SetUniformMat4 {
        name: &'static str,
        value: Matrix4<f32>,
    },
    SetUniformVec4 {
        name: &'static str,
        value: Vector4<f32>,
    },
    SetUniformFloat {
        name: &'static str,
        value: f32,
    },
    SetUniformInt {
        name: &'static str,
        value: i32,
    },
    Viewport {
        width: u32,
        height: u32,
    },
    Clear {
        color: Vector4<f32>,
    },
    Draw {
        mesh: String,
    },
    DrawNormals {
        mesh: String,
    },
}

/// State shared by every backend: registries, debug toggles, the frame
/// stage, the export bracket and the recorded command stream.
pub struct StateCommon {
    pub(crate) meshes: HashMap<String, Mesh>,
    pub(crate) textures: HashMap<String, TextureImage>,
    pub(crate) draw_normals: bool,
    pub(crate) wireframe: bool,
    pub(crate) perspective: bool,
    pub(crate) bg_color: Vector4<f32>,
    pub(crate) light: LightSource,
    pub(crate) stage: FrameStage,
    pub(crate) export: Option<MeshExport>,
    pub(crate) commands: Vec<DrawCommand>,
}

impl Default for StateCommon {
    fn default() -> Self {
        Self {
            meshes: HashMap::new(),
            textures: HashMap::new(),
            draw_normals: false,
            wireframe: false,
            perspective: true,
            bg_color: Vector4::new(0.6, 0.6, 1.0, 1.0),
            light: LightSource::default(),
            stage: FrameStage::Idle,
            export: None,
            commands: Vec::new(),
        }
    }
}

impl StateCommon {
    pub(crate) fn emit(&mut self, cmd: DrawCommand) {
        self.commands.push(cmd);
    }

    /// Transition into a frame. Clears last frame's command stream.
    ///
    /// # Panics
    /// Panics if a frame is already being recorded.
    pub(crate) fn begin_recording(&mut self) {
        if self.stage == FrameStage::Recording {
            panic!("begin_frame called while a frame is already being recorded");
        }
        self.stage = FrameStage::Recording;
        self.commands.clear();
    }

    /// Transition out of a frame.
    ///
    /// # Panics
    /// Panics if no frame is being recorded.
    pub(crate) fn end_recording(&mut self) {
        if self.stage == FrameStage::Idle {
            panic!("end_frame called without a matching begin_frame");
        }
        self.stage = FrameStage::Idle;
    }

    pub(crate) fn assert_recording(&self, what: &str) {
        if self.stage != FrameStage::Recording {
            panic!("{what} called outside a begin_frame/end_frame bracket");
        }
    }
}

/// The backend contract: matrix stacks, material stack, registries, frame
/// lifecycle and export.
///
/// Matrix, material and frame operations follow strict stack discipline;
/// mismatched pairs indicate a caller bug and panic rather than being
/// silently tolerated. Resource loads are fallible and non-fatal: a failed
/// load leaves the registry slot empty and drawing an absent mesh is a
/// no-op, so the scene degrades instead of crashing on partial assets.
pub trait RenderState {
    fn common(&self) -> &StateCommon;
    fn common_mut(&mut self) -> &mut StateCommon;

    /// One-time backend setup. Compiles the program for the shader backend;
    /// a no-op for the fixed-function backend. A failure leaves the backend
    /// constructed but non-functional; the owner decides whether to retry
    /// or fall back.
    fn init(&mut self) -> Result<()>;

    // matrix operations

    fn set_matrix_mode(&mut self, mode: MatrixMode);
    fn load_identity(&mut self);
    fn multiply_matrix(&mut self, m: &Matrix4<f32>);
    /// Duplicate the top of the active mode's stack.
    fn push_matrix(&mut self);
    /// Discard the top of the active mode's stack.
    ///
    /// # Panics
    /// Panics on an empty stack; that is a mismatched push/pop in the caller.
    fn pop_matrix(&mut self);
    /// The top of the active mode's stack.
    fn current_matrix(&self) -> Matrix4<f32>;

    fn translate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.multiply_matrix(&math::translation(dx, dy, dz));
    }

    fn rotate(&mut self, angle_deg: f32, rx: f32, ry: f32, rz: f32) {
        self.multiply_matrix(&math::rotation(angle_deg, rx, ry, rz));
    }

    fn scale(&mut self, sx: f32, sy: f32, sz: f32) {
        self.multiply_matrix(&math::scaling(sx, sy, sz));
    }

    // frame lifecycle

    /// Open a frame: enable pipeline state, set up viewport and projection,
    /// clear, and load the identity model-view matrix.
    ///
    /// # Panics
    /// Panics if a frame is already open.
    fn begin_frame(&mut self, width: u32, height: u32);

    /// Close a frame, restoring every global toggle `begin_frame` switched
    /// on so no state leaks to whatever renders next.
    ///
    /// # Panics
    /// Panics if no frame is open.
    fn end_frame(&mut self);

    /// Derive an aspect-correct projection for the given surface size.
    ///
    /// Perspective mode uses a 45 degree vertical field of view with
    /// near/far planes at 0.1/100.0. Orthographic mode maps the smaller
    /// screen dimension to [-1, 1] and scales the larger one by the aspect
    /// ratio so nothing distorts.
    fn setup_viewport(&mut self, width: u32, height: u32) {
        let aspect = width as f32 / height as f32;
        self.set_matrix_mode(MatrixMode::Projection);
        self.load_identity();
        if self.common().perspective {
            self.multiply_matrix(&math::perspective(45.0, aspect, 0.1, 100.0));
        } else if width <= height {
            self.multiply_matrix(&math::ortho(-1.0, 1.0, -1.0 / aspect, 1.0 / aspect, -10.0, 10.0));
        } else {
            self.multiply_matrix(&math::ortho(-aspect, aspect, -1.0, 1.0, -10.0, 10.0));
        }
        self.set_matrix_mode(MatrixMode::ModelView);
    }

    // material operations

    /// Push `m` and immediately bind its color and texture state.
    fn push_material(&mut self, m: Material);

    /// Remove the top material, revert its texture binding, and re-apply
    /// the enclosing material if one remains.
    ///
    /// # Panics
    /// Panics on an empty material stack.
    fn pop_material(&mut self);

    /// The material currently applied to the pipeline, i.e. the stack top.
    fn current_material(&self) -> Option<Material>;

    // mesh operations

    /// Draw a registry mesh under the current matrix and material state.
    ///
    /// An absent name is a no-op, not an error. Inside an export bracket the
    /// geometry is baked into the export accumulator instead of drawn.
    ///
    /// # Panics
    /// Panics outside a begin_frame/end_frame bracket.
    fn draw_mesh(&mut self, name: &str);

    fn meshes(&self) -> &HashMap<String, Mesh> {
        &self.common().meshes
    }

    /// Insert an empty mesh to be filled in place, or fetch it if it
    /// already exists.
    fn create_mesh(&mut self, name: &str) -> &mut Mesh {
        self.common_mut()
            .meshes
            .entry(name.to_string())
            .or_insert_with(|| Mesh::new(name))
    }

    fn load_mesh_from_file(&mut self, name: &str, path: &str) -> Result<()> {
        let data = resources::load_binary(path)?;
        self.load_mesh_from_data(name, &data)
    }

    fn load_mesh_from_data(&mut self, name: &str, data: &[u8]) -> Result<()> {
        let mesh = resources::mesh::parse_obj(name, data)?;
        log::debug!("loaded mesh {name}: {} triangles", mesh.triangle_count());
        self.common_mut().meshes.insert(name.to_string(), mesh);
        Ok(())
    }

    fn load_mesh_from_group(&mut self, name: &str, group: &VertexGroup) -> Result<()> {
        let mesh = Mesh::from_group(name, group);
        self.common_mut().meshes.insert(name.to_string(), mesh);
        Ok(())
    }

    // texture operations

    fn texture(&self, name: &str) -> Option<&TextureImage> {
        self.common().textures.get(name)
    }

    fn load_texture_from_file(&mut self, name: &str, path: &str, flip_vertical: bool) -> Result<()> {
        let tex = resources::texture::load_texture(name, path, flip_vertical)?;
        self.common_mut().textures.insert(name.to_string(), tex);
        Ok(())
    }

    // mesh export

    /// Redirect subsequent draws into an export accumulator targeting `path`.
    ///
    /// # Panics
    /// Panics if an export bracket is already open.
    fn begin_export_mesh(&mut self, path: &Path) {
        let common = self.common_mut();
        if common.export.is_some() {
            panic!("begin_export_mesh called while an export is already in progress");
        }
        common.export = Some(MeshExport::new(path));
    }

    /// Write the accumulated geometry and restore normal drawing.
    ///
    /// # Panics
    /// Panics without a matching `begin_export_mesh`.
    fn end_export_mesh(&mut self) -> Result<()> {
        let export = self
            .common_mut()
            .export
            .take()
            .unwrap_or_else(|| panic!("end_export_mesh called without begin_export_mesh"));
        export.write()
    }

    // debug toggles

    fn draw_normals(&self) -> bool {
        self.common().draw_normals
    }

    fn toggle_normals(&mut self) {
        let common = self.common_mut();
        common.draw_normals = !common.draw_normals;
    }

    fn toggle_wireframe(&mut self) {
        let common = self.common_mut();
        common.wireframe = !common.wireframe;
    }

    fn toggle_projection(&mut self) {
        let common = self.common_mut();
        common.perspective = !common.perspective;
    }

    /// Restore the debug toggles to their startup values.
    fn reset(&mut self) {
        let common = self.common_mut();
        common.draw_normals = false;
        common.wireframe = false;
        common.perspective = true;
    }

    /// The command stream recorded for the current or most recent frame.
    fn commands(&self) -> &[DrawCommand] {
        &self.common().commands
    }
}

/// Scope guard pairing a `push_matrix` with a guaranteed `pop_matrix`,
/// including on early returns and panics. Derefs to the render state so
/// guards nest naturally.
pub struct MatrixGuard<'a> {
    state: &'a mut dyn RenderState,
}

impl<'a> MatrixGuard<'a> {
    pub fn push(state: &'a mut dyn RenderState) -> Self {
        state.push_matrix();
        Self { state }
    }
}

impl<'a> Deref for MatrixGuard<'a> {
    type Target = dyn RenderState + 'a;

    fn deref(&self) -> &Self::Target {
        self.state
    }
}

impl<'a> DerefMut for MatrixGuard<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.state
    }
}

impl Drop for MatrixGuard<'_> {
    fn drop(&mut self) {
        self.state.pop_matrix();
    }
}

/// Scope guard pairing a `push_material` with a guaranteed `pop_material`.
pub struct MaterialGuard<'a> {
    state: &'a mut dyn RenderState,
}

impl<'a> MaterialGuard<'a> {
    pub fn apply(state: &'a mut dyn RenderState, material: Material) -> Self {
        state.push_material(material);
        Self { state }
    }
}

impl<'a> Deref for MaterialGuard<'a> {
    type Target = dyn RenderState + 'a;

    fn deref(&self) -> &Self::Target {
        self.state
    }
}

impl<'a> DerefMut for MaterialGuard<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.state
    }
}

impl Drop for MaterialGuard<'_> {
    fn drop(&mut self) {
        self.state.pop_material();
    }
}
