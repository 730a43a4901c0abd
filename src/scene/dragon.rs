//! The articulated dragon figure.
//!
//! A dragon is a fixed joint hierarchy posed by a flat set of angles that an
//! animation tick overwrites as a pure function of elapsed time. Drawing
//! walks the hierarchy depth-first under scope guards, so every transform
//! and material push is popped on every path back out.

use crate::material::Material;
use crate::render::{MaterialGuard, MatrixGuard, RenderState};
use crate::waveform::spaced_cos;

/// Motion style, selecting the per-kind pose overrides on top of the shared
/// base animation curves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragonKind {
    Floating,
    Flying,
    Jumping,
}

/// Joint angles in degrees plus the two flight parameters. All fields are
/// overwritten by every [`Dragon::animate`] call; none depends on another.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose {
    pub theta_jaw: f32,
    pub theta_head_y: f32,
    pub theta_head_z: f32,
    pub theta_neck: f32,
    pub theta_wing: f32,
    pub theta_wing_joint: f32,
    pub theta_front_legs: f32,
    pub theta_back_legs: f32,
    pub theta_paw: f32,
    pub theta_tail: f32,
    /// Vertical bob, or the orbit angle for the moving kinds.
    pub alpha: f32,
    /// Horizontal sway.
    pub beta: f32,
}

pub struct Dragon {
    kind: DragonKind,
    pub pose: Pose,
    detail_level: u32,
    pub scales_material: Material,
    pub tongue_material: Material,
    pub wing_material: Material,
    pub wing_membrane_material: Material,
}

impl Dragon {
    pub fn new(
        kind: DragonKind,
        scales_material: Material,
        tongue_material: Material,
        wing_material: Material,
        wing_membrane_material: Material,
    ) -> Self {
        Self {
            kind,
            pose: Pose::default(),
            detail_level: 4,
            scales_material,
            tongue_material,
            wing_material,
            wing_membrane_material,
        }
    }

    pub fn kind(&self) -> DragonKind {
        self.kind
    }

    pub fn detail_level(&self) -> u32 {
        self.detail_level
    }

    pub fn set_detail_level(&mut self, level: u32) {
        self.detail_level = level.clamp(1, 4);
    }

    pub fn alpha(&self) -> f32 {
        self.pose.alpha
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        self.pose.alpha = alpha;
    }

    pub fn beta(&self) -> f32 {
        self.pose.beta
    }

    pub fn set_beta(&mut self, beta: f32) {
        self.pose.beta = beta;
    }

    pub fn front_legs_angle(&self) -> f32 {
        self.pose.theta_front_legs
    }

    /// Recompute the pose for elapsed time `t` in seconds.
    ///
    /// The shared base curves pose the body joints; each kind then overrides
    /// the joints that give it its character. `alpha` and `beta` are left
    /// untouched, the owning scene drives them per figure.
    pub fn animate(&mut self, t: f32) {
        let pose = &mut self.pose;
        pose.theta_jaw = 10.0 * spaced_cos(t, 5.0, 2.0) + 10.0;
        pose.theta_head_y = 45.0 * spaced_cos(t, 5.0, 2.0);
        pose.theta_neck = 5.0 * (t * 3.0).cos();
        pose.theta_wing = 45.0 * (t * 3.5).cos();
        pose.theta_wing_joint = 60.0 - 30.0 * ((t * 3.5).cos() * t.cos()).abs();
        pose.theta_front_legs = 10.0 * (t * 3.0).cos() + 40.0 + 45.0;
        pose.theta_back_legs = 10.0 * (t * 3.0).cos() + 80.0 + 45.0;
        pose.theta_tail = 15.0 * (t * 0.3).powi(2).cos() * (6.0 * t * 0.3).cos();
        match self.kind {
            DragonKind::Floating => {
                pose.theta_head_z = -45.0;
                pose.theta_paw = 60.0;
            }
            DragonKind::Flying => {
                pose.theta_head_z = -30.0;
                pose.theta_neck = 30.0;
                pose.theta_paw = 60.0;
            }
            DragonKind::Jumping => {
                pose.theta_wing = 0.0;
                pose.theta_wing_joint = 20.0;
                pose.theta_neck = 30.0;
                pose.theta_paw = 60.0;
                pose.theta_head_z = 60.0 * spaced_cos(t, 1.0, 2.0) - 30.0;
                pose.theta_jaw = 10.0 * spaced_cos(t, 1.0, 2.0) + 10.0;
            }
        }
    }

    /// Draw the whole figure under its scales material.
    pub fn draw(&self, state: &mut dyn RenderState) {
        let mut state = MaterialGuard::apply(state, self.scales_material.clone());
        let mut state = MatrixGuard::push(&mut *state);
        self.draw_body(&mut *state);
        let mut state = MatrixGuard::push(&mut *state);
        state.translate(0.10, 0.12, 0.0);
        self.draw_upper(&mut *state);
    }

    /// The neck chain and head.
    pub fn draw_upper(&self, state: &mut dyn RenderState) {
        let mut state = MatrixGuard::push(state);
        for _ in 0..self.detail_level {
            state.rotate(self.pose.theta_neck, 0.0, 0.0, 1.0);
            self.draw_joint(&mut *state);
            state.translate(0.08, 0.0, 0.0);
        }
        self.draw_head(&mut *state);
    }

    pub fn draw_head(&self, state: &mut dyn RenderState) {
        let mut state = MatrixGuard::push(state);
        state.rotate(self.pose.theta_head_y, 0.0, 1.0, 0.0);
        state.rotate(self.pose.theta_head_z, 0.0, 0.0, 1.0);
        state.draw_mesh("dragon_head");
        let mut state = MatrixGuard::push(&mut *state);
        state.translate(0.08, -0.02, 0.0);
        state.rotate(-self.pose.theta_jaw, 0.0, 0.0, 1.0);
        self.draw_tongue(&mut *state);
    }

    pub fn draw_tongue(&self, state: &mut dyn RenderState) {
        let mut state = MaterialGuard::apply(state, self.tongue_material.clone());
        let mut state = MatrixGuard::push(&mut *state);
        state.scale(0.1, 0.02, 0.04);
        state.draw_mesh("joint");
    }

    /// One generic limb segment, reused for neck, legs, wings and tail.
    pub fn draw_joint(&self, state: &mut dyn RenderState) {
        let mut state = MatrixGuard::push(state);
        state.scale(0.05, 0.05, 0.05);
        state.draw_mesh("joint");
    }

    /// Chest, paws, both wings and the tail.
    pub fn draw_body(&self, state: &mut dyn RenderState) {
        let mut state = MatrixGuard::push(state);
        self.draw_chest(&mut *state);
        {
            let mut state = MatrixGuard::push(&mut *state);
            state.translate(0.02, -0.10, 0.0);
            self.draw_paws(&mut *state);
        }
        {
            let mut state = MatrixGuard::push(&mut *state);
            state.translate(-0.05, 0.06, 0.03);
            self.draw_wing(&mut *state);
        }
        {
            // the second wing is the first mirrored through the body plane
            let mut state = MatrixGuard::push(&mut *state);
            state.translate(-0.05, 0.06, -0.03);
            state.scale(1.0, 1.0, -1.0);
            self.draw_wing(&mut *state);
        }
        let mut state = MatrixGuard::push(&mut *state);
        state.translate(-0.12, 0.0, 0.0);
        self.draw_tail(&mut *state);
    }

    pub fn draw_chest(&self, state: &mut dyn RenderState) {
        state.draw_mesh("dragon_chest");
    }

    /// Both leg pairs, mirrored left and right.
    pub fn draw_paws(&self, state: &mut dyn RenderState) {
        let mut state = MatrixGuard::push(state);
        for side in [1.0f32, -1.0] {
            {
                let mut state = MatrixGuard::push(&mut *state);
                state.translate(0.08, 0.0, 0.04 * side);
                state.rotate(self.pose.theta_front_legs, 0.0, 0.0, 1.0);
                self.draw_paw(&mut *state);
            }
            let mut state = MatrixGuard::push(&mut *state);
            state.translate(-0.08, 0.0, 0.05 * side);
            state.rotate(self.pose.theta_back_legs, 0.0, 0.0, 1.0);
            self.draw_paw(&mut *state);
        }
    }

    /// Two limb segments bent at the paw joint.
    pub fn draw_paw(&self, state: &mut dyn RenderState) {
        let mut state = MatrixGuard::push(state);
        self.draw_joint(&mut *state);
        state.translate(0.07, 0.0, 0.0);
        state.rotate(self.pose.theta_paw, 0.0, 0.0, 1.0);
        self.draw_joint(&mut *state);
    }

    pub fn draw_wing(&self, state: &mut dyn RenderState) {
        let mut state = MaterialGuard::apply(state, self.wing_material.clone());
        let mut state = MatrixGuard::push(&mut *state);
        state.rotate(self.pose.theta_wing, 1.0, 0.0, 0.0);
        self.draw_wing_part(&mut *state);
        state.translate(0.0, 0.0, 0.2);
        state.rotate(self.pose.theta_wing_joint, 1.0, 0.0, 0.0);
        self.draw_wing_outer(&mut *state);
    }

    pub fn draw_wing_outer(&self, state: &mut dyn RenderState) {
        let mut state = MatrixGuard::push(state);
        self.draw_wing_part(&mut *state);
        state.translate(0.0, 0.0, 0.2);
        state.rotate(-self.pose.theta_wing_joint, 1.0, 0.0, 0.0);
        self.draw_wing_part(&mut *state);
    }

    /// A wing bone with its stretch of membrane.
    pub fn draw_wing_part(&self, state: &mut dyn RenderState) {
        let mut state = MatrixGuard::push(state);
        {
            let mut state = MatrixGuard::push(&mut *state);
            state.scale(0.05, 0.05, 0.2);
            state.draw_mesh("joint");
        }
        self.draw_wing_membrane(&mut *state);
    }

    pub fn draw_wing_membrane(&self, state: &mut dyn RenderState) {
        let mut state = MaterialGuard::apply(state, self.wing_membrane_material.clone());
        let mut state = MatrixGuard::push(&mut *state);
        state.translate(0.0, 0.0, 0.1);
        state.draw_mesh("wing_membrane");
    }

    /// A shrinking chain of segments swept by the tail angle.
    pub fn draw_tail(&self, state: &mut dyn RenderState) {
        let mut state = MatrixGuard::push(state);
        for _ in 0..self.detail_level * 2 {
            state.rotate(self.pose.theta_tail, 0.0, 1.0, 0.0);
            state.scale(0.9, 0.9, 0.9);
            self.draw_joint(&mut *state);
            state.translate(-0.10, 0.0, 0.0);
        }
        self.draw_tail_end(&mut *state);
    }

    pub fn draw_tail_end(&self, state: &mut dyn RenderState) {
        state.draw_mesh("dragon_tail_end");
    }
}
