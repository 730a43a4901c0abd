//! Surface materials applied as scoped pipeline state.

use cgmath::Vector4;

/// Lighting coefficients plus an optional texture, pushed onto a render
/// state's material stack for the duration of the draws it covers.
///
/// `texture` is the name of an entry in the render state's texture registry;
/// `None` renders untextured.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub ambient: Vector4<f32>,
    pub diffuse: Vector4<f32>,
    pub specular: Vector4<f32>,
    pub shininess: f32,
    texture: Option<String>,
}

impl Material {
    pub fn new(
        ambient: Vector4<f32>,
        diffuse: Vector4<f32>,
        specular: Vector4<f32>,
        shininess: f32,
    ) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            shininess,
            texture: None,
        }
    }

    pub fn texture(&self) -> Option<&str> {
        self.texture.as_deref()
    }

    pub fn set_texture(&mut self, name: impl Into<String>) {
        self.texture = Some(name.into());
    }

    pub fn clear_texture(&mut self) {
        self.texture = None;
    }
}

impl Default for Material {
    /// A neutral gray, untextured material.
    fn default() -> Self {
        Self::new(
            Vector4::new(0.2, 0.2, 0.2, 1.0),
            Vector4::new(0.8, 0.8, 0.8, 1.0),
            Vector4::new(0.0, 0.0, 0.0, 1.0),
            0.0,
        )
    }
}
