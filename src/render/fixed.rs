//! Fixed-function backend.
//!
//! Every state call is emitted into the command stream as it happens, so the
//! recorded stream is the exact call sequence a legacy fixed-function driver
//! would receive. A CPU-side mirror of the matrix stacks backs
//! `current_matrix` and mesh export, since the pipeline itself is write-only.

use anyhow::Result;
use cgmath::{Matrix4, SquareMatrix};

use crate::material::Material;
use crate::render::{
    Capability, DrawCommand, MatrixMode, RenderState, StateCommon, MATRIX_MODES,
};

pub struct FixedFunctionState {
    common: StateCommon,
    mode: MatrixMode,
    stacks: [Vec<Matrix4<f32>>; MATRIX_MODES],
    materials: Vec<Material>,
}

impl Default for FixedFunctionState {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedFunctionState {
    pub fn new() -> Self {
        Self {
            common: StateCommon::default(),
            mode: MatrixMode::ModelView,
            stacks: std::array::from_fn(|_| vec![Matrix4::identity()]),
            materials: Vec::new(),
        }
    }

    fn stack(&self) -> &Vec<Matrix4<f32>> {
        &self.stacks[self.mode as usize]
    }

    fn stack_mut(&mut self) -> &mut Vec<Matrix4<f32>> {
        &mut self.stacks[self.mode as usize]
    }

    fn top_mut(&mut self) -> &mut Matrix4<f32> {
        self.stack_mut()
            .last_mut()
            .unwrap_or_else(|| unreachable!("matrix stack never drains below its base"))
    }

    fn apply_material(&mut self, material: &Material) {
        self.common.emit(DrawCommand::ApplyMaterial(material.clone()));
        match material.texture() {
            Some(name) if self.common.textures.contains_key(name) => {
                self.common.emit(DrawCommand::BindTexture(name.to_string()));
            }
            Some(name) => {
                log::warn!("material references unknown texture {name}");
                self.common.emit(DrawCommand::UnbindTexture);
            }
            None => self.common.emit(DrawCommand::UnbindTexture),
        }
    }
}

impl RenderState for FixedFunctionState {
    fn common(&self) -> &StateCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut StateCommon {
        &mut self.common
    }

    fn init(&mut self) -> Result<()> {
        log::debug!("fixed-function backend ready");
        Ok(())
    }

    fn set_matrix_mode(&mut self, mode: MatrixMode) {
        self.mode = mode;
        self.common.emit(DrawCommand::SetMatrixMode(mode));
    }

    fn load_identity(&mut self) {
        *self.top_mut() = Matrix4::identity();
        self.common.emit(DrawCommand::LoadIdentity);
    }

    fn multiply_matrix(&mut self, m: &Matrix4<f32>) {
        let top = self.top_mut();
        *top = *top * m;
        self.common.emit(DrawCommand::MultMatrix(*m));
    }

    fn push_matrix(&mut self) {
        let top = *self.current_matrix_ref();
        self.stack_mut().push(top);
        self.common.emit(DrawCommand::PushMatrix);
    }

    fn pop_matrix(&mut self) {
        if self.stack().len() <= 1 {
            panic!("pop_matrix on an empty {:?} matrix stack", self.mode);
        }
        self.stack_mut().pop();
        self.common.emit(DrawCommand::PopMatrix);
    }

    fn current_matrix(&self) -> Matrix4<f32> {
        *self.current_matrix_ref()
    }

    fn begin_frame(&mut self, width: u32, height: u32) {
        self.common.begin_recording();
        for cap in [
            Capability::DepthTest,
            Capability::Lighting,
            Capability::NormalRescale,
        ] {
            self.common.emit(DrawCommand::Enable(cap));
        }
        let light = self.common.light.clone();
        self.common.emit(DrawCommand::SetLight(light));
        self.common.emit(DrawCommand::Viewport { width, height });
        self.common.emit(DrawCommand::Clear {
            color: self.common.bg_color,
        });
        let wireframe = self.common.wireframe;
        self.common.emit(DrawCommand::PolygonLines(wireframe));
        self.setup_viewport(width, height);
        self.load_identity();
    }

    fn end_frame(&mut self) {
        self.common.assert_recording("end_frame");
        for cap in [
            Capability::NormalRescale,
            Capability::Lighting,
            Capability::DepthTest,
        ] {
            self.common.emit(DrawCommand::Disable(cap));
        }
        self.common.emit(DrawCommand::PolygonLines(false));
        self.common.end_recording();
    }

    fn push_material(&mut self, m: Material) {
        self.apply_material(&m);
        self.materials.push(m);
    }

    fn pop_material(&mut self) {
        if self.materials.pop().is_none() {
            panic!("pop_material on an empty material stack");
        }
        match self.materials.last().cloned() {
            Some(top) => self.apply_material(&top),
            None => self.common.emit(DrawCommand::UnbindTexture),
        }
    }

    fn current_material(&self) -> Option<Material> {
        self.materials.last().cloned()
    }

    fn draw_mesh(&mut self, name: &str) {
        self.common.assert_recording("draw_mesh");
        let model_view = self.stacks[MatrixMode::ModelView as usize]
            .last()
            .copied()
            .unwrap_or_else(|| unreachable!("matrix stack never drains below its base"));
        let StateCommon {
            meshes,
            export,
            draw_normals,
            commands,
            ..
        } = &mut self.common;
        let Some(mesh) = meshes.get(name) else {
            log::warn!("draw of unknown mesh {name} skipped");
            return;
        };
        if let Some(export) = export {
            export.append(mesh, &model_view);
            return;
        }
        commands.push(DrawCommand::Draw {
            mesh: name.to_string(),
        });
        if *draw_normals {
            commands.push(DrawCommand::DrawNormals {
                mesh: name.to_string(),
            });
        }
    }
}

impl FixedFunctionState {
    fn current_matrix_ref(&self) -> &Matrix4<f32> {
        self.stack()
            .last()
            .unwrap_or_else(|| unreachable!("matrix stack never drains below its base"))
    }
}
