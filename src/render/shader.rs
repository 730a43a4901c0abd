//! Shader backend.
//!
//! Matrix and material stacks live entirely on the CPU; nothing reaches the
//! command stream until state actually has to, as uniform uploads. Material
//! uniforms go out when a material is pushed or re-exposed, matrix uniforms
//! only at the moment of a draw, so redundant stack traffic between draws
//! costs nothing downstream.

use anyhow::{Context, Result};
use cgmath::{Matrix4, SquareMatrix};

use crate::material::Material;
use crate::render::{
    Capability, DrawCommand, MatrixMode, RenderState, StateCommon, MATRIX_MODES,
};
use crate::resources;
use crate::resources::shader::{self, ProgramInfo};

pub const U_MODEL_VIEW: &str = "u_modelViewMatrix";
pub const U_PROJECTION: &str = "u_projectionMatrix";
pub const U_MATERIAL_AMBIENT: &str = "u_material_ambient";
pub const U_MATERIAL_DIFFUSE: &str = "u_material_diffuse";
pub const U_MATERIAL_SPECULAR: &str = "u_material_specular";
pub const U_MATERIAL_SHINE: &str = "u_material_shine";
pub const U_HAS_TEXTURE: &str = "u_has_texture";
pub const U_LIGHT_POS: &str = "u_light_pos";
pub const U_LIGHT_AMBIENT: &str = "u_light_ambient";
pub const U_LIGHT_DIFFUSE: &str = "u_light_diffuse";
pub const U_LIGHT_SPECULAR: &str = "u_light_specular";

pub struct ShaderState {
    common: StateCommon,
    shader_path: String,
    program: Option<ProgramInfo>,
    mode: MatrixMode,
    stacks: [Vec<Matrix4<f32>>; MATRIX_MODES],
    materials: Vec<Material>,
}

impl ShaderState {
    pub fn new(shader_path: impl Into<String>) -> Self {
        Self {
            common: StateCommon::default(),
            shader_path: shader_path.into(),
            program: None,
            mode: MatrixMode::ModelView,
            stacks: std::array::from_fn(|_| vec![Matrix4::identity()]),
            materials: Vec::new(),
        }
    }

    pub fn program(&self) -> Option<&ProgramInfo> {
        self.program.as_ref()
    }

    fn top(&self, mode: MatrixMode) -> Matrix4<f32> {
        self.stacks[mode as usize]
            .last()
            .copied()
            .unwrap_or_else(|| unreachable!("matrix stack never drains below its base"))
    }

    fn upload_material(&mut self, material: &Material) {
        let Some(program) = &self.program else {
            return;
        };
        if program.has_global(U_MATERIAL_AMBIENT) {
            self.common.emit(DrawCommand::SetUniformVec4 {
                name: U_MATERIAL_AMBIENT,
                value: material.ambient,
            });
        }
        if program.has_global(U_MATERIAL_DIFFUSE) {
            self.common.emit(DrawCommand::SetUniformVec4 {
                name: U_MATERIAL_DIFFUSE,
                value: material.diffuse,
            });
        }
        if program.has_global(U_MATERIAL_SPECULAR) {
            self.common.emit(DrawCommand::SetUniformVec4 {
                name: U_MATERIAL_SPECULAR,
                value: material.specular,
            });
        }
        if program.has_global(U_MATERIAL_SHINE) {
            self.common.emit(DrawCommand::SetUniformFloat {
                name: U_MATERIAL_SHINE,
                value: material.shininess,
            });
        }
        let textured = match material.texture() {
            Some(name) if self.common.textures.contains_key(name) => {
                self.common.emit(DrawCommand::BindTexture(name.to_string()));
                true
            }
            Some(name) => {
                log::warn!("material references unknown texture {name}");
                self.common.emit(DrawCommand::UnbindTexture);
                false
            }
            None => {
                self.common.emit(DrawCommand::UnbindTexture);
                false
            }
        };
        if self
            .program
            .as_ref()
            .is_some_and(|p| p.has_global(U_HAS_TEXTURE))
        {
            self.common.emit(DrawCommand::SetUniformInt {
                name: U_HAS_TEXTURE,
                value: textured as i32,
            });
        }
    }

    fn upload_light(&mut self) {
        let Some(program) = &self.program else {
            return;
        };
        let light = self.common.light.clone();
        for (name, value) in [
            (U_LIGHT_POS, light.position),
            (U_LIGHT_AMBIENT, light.ambient),
            (U_LIGHT_DIFFUSE, light.diffuse),
            (U_LIGHT_SPECULAR, light.specular),
        ] {
            if program.has_global(name) {
                self.common
                    .emit(DrawCommand::SetUniformVec4 { name, value });
            }
        }
    }
}

impl RenderState for ShaderState {
    fn common(&self) -> &StateCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut StateCommon {
        &mut self.common
    }

    /// Compile and validate the scene program. On failure the backend stays
    /// programless and every draw becomes a logged no-op.
    fn init(&mut self) -> Result<()> {
        let source = resources::load_string(&self.shader_path)
            .with_context(|| format!("reading shader {}", self.shader_path))?;
        let program = shader::compile_scene_program(&self.shader_path, &source)?;
        log::debug!(
            "compiled {} with entry points {:?}",
            self.shader_path,
            program.entry_points
        );
        self.program = Some(program);
        Ok(())
    }

    fn set_matrix_mode(&mut self, mode: MatrixMode) {
        self.mode = mode;
    }

    fn load_identity(&mut self) {
        *self.stacks[self.mode as usize]
            .last_mut()
            .unwrap_or_else(|| unreachable!("matrix stack never drains below its base")) =
            Matrix4::identity();
    }

    fn multiply_matrix(&mut self, m: &Matrix4<f32>) {
        let top = self.stacks[self.mode as usize]
            .last_mut()
            .unwrap_or_else(|| unreachable!("matrix stack never drains below its base"));
        *top = *top * m;
    }

    fn push_matrix(&mut self) {
        let top = self.top(self.mode);
        self.stacks[self.mode as usize].push(top);
    }

    fn pop_matrix(&mut self) {
        if self.stacks[self.mode as usize].len() <= 1 {
            panic!("pop_matrix on an empty {:?} matrix stack", self.mode);
        }
        self.stacks[self.mode as usize].pop();
    }

    fn current_matrix(&self) -> Matrix4<f32> {
        self.top(self.mode)
    }

    fn begin_frame(&mut self, width: u32, height: u32) {
        self.common.begin_recording();
        self.common.emit(DrawCommand::UseProgram(true));
        self.common.emit(DrawCommand::Enable(Capability::DepthTest));
        self.common.emit(DrawCommand::Viewport { width, height });
        self.common.emit(DrawCommand::Clear {
            color: self.common.bg_color,
        });
        let wireframe = self.common.wireframe;
        self.common.emit(DrawCommand::PolygonLines(wireframe));
        self.upload_light();
        self.setup_viewport(width, height);
        self.load_identity();
    }

    fn end_frame(&mut self) {
        self.common.assert_recording("end_frame");
        self.common.emit(DrawCommand::PolygonLines(false));
        self.common.emit(DrawCommand::Disable(Capability::DepthTest));
        self.common.emit(DrawCommand::UseProgram(false));
        self.common.end_recording();
    }

    fn push_material(&mut self, m: Material) {
        self.upload_material(&m);
        self.materials.push(m);
    }

    fn pop_material(&mut self) {
        if self.materials.pop().is_none() {
            panic!("pop_material on an empty material stack");
        }
        if let Some(top) = self.materials.last().cloned() {
            self.upload_material(&top);
        } else {
            self.common.emit(DrawCommand::UnbindTexture);
        }
    }

    fn current_material(&self) -> Option<Material> {
        self.materials.last().cloned()
    }

    fn draw_mesh(&mut self, name: &str) {
        self.common.assert_recording("draw_mesh");
        let model_view = self.top(MatrixMode::ModelView);
        let projection = self.top(MatrixMode::Projection);
        if !self.common.meshes.contains_key(name) {
            log::warn!("draw of unknown mesh {name} skipped");
            return;
        }
        if self.common.export.is_some() {
            let StateCommon { meshes, export, .. } = &mut self.common;
            if let (Some(mesh), Some(export)) = (meshes.get(name), export.as_mut()) {
                export.append(mesh, &model_view);
            }
            return;
        }
        if self.program.is_none() {
            log::warn!("draw of {name} skipped, no compiled program");
            return;
        }
        let draw_normals = self.common.draw_normals;
        if self
            .program
            .as_ref()
            .is_some_and(|p| p.has_global(U_MODEL_VIEW))
        {
            self.common.emit(DrawCommand::SetUniformMat4 {
                name: U_MODEL_VIEW,
                value: model_view,
            });
        }
        if self
            .program
            .as_ref()
            .is_some_and(|p| p.has_global(U_PROJECTION))
        {
            self.common.emit(DrawCommand::SetUniformMat4 {
                name: U_PROJECTION,
                value: projection,
            });
        }
        self.common.emit(DrawCommand::Draw {
            mesh: name.to_string(),
        });
        if draw_normals {
            self.common.emit(DrawCommand::DrawNormals {
                mesh: name.to_string(),
            });
        }
    }
}
