//! Scene composition and the procedural animation driver.
//!
//! The scene owns the three animated dragons, a debug dragon for part
//! isolation, and the camera parameters. It does not own a render state;
//! every operation that draws or loads takes one as an argument, so the same
//! scene renders through either backend.

pub mod dragon;

use anyhow::Result;
use cgmath::{Vector3, Vector4};

use crate::material::Material;
use crate::render::{MaterialGuard, MatrixGuard, RenderState};
use crate::scene::dragon::{Dragon, DragonKind};

/// What the scene draws: the full composition, or one isolated part for
/// inspection. Ordered for linear next/previous navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Item {
    Scene,
    LetterP,
    LetterA,
    LetterS,
    Dragon,
    DragonUpper,
    DragonHead,
    DragonTongue,
    DragonJoint,
    DragonBody,
    DragonChest,
    DragonPaws,
    DragonPaw,
    DragonWing,
    DragonWingOuter,
    DragonWingPart,
    DragonWingMembrane,
    DragonTail,
    DragonTailEnd,
}

impl Item {
    pub const ALL: [Item; 19] = [
        Item::Scene,
        Item::LetterP,
        Item::LetterA,
        Item::LetterS,
        Item::Dragon,
        Item::DragonUpper,
        Item::DragonHead,
        Item::DragonTongue,
        Item::DragonJoint,
        Item::DragonBody,
        Item::DragonChest,
        Item::DragonPaws,
        Item::DragonPaw,
        Item::DragonWing,
        Item::DragonWingOuter,
        Item::DragonWingPart,
        Item::DragonWingMembrane,
        Item::DragonTail,
        Item::DragonTailEnd,
    ];

    pub const FIRST: Item = Item::Scene;
    pub const LAST: Item = Item::DragonTailEnd;

    fn index(self) -> usize {
        self as usize
    }

    /// The following item, clamped at the last.
    pub fn next(self) -> Item {
        Self::ALL[(self.index() + 1).min(Self::ALL.len() - 1)]
    }

    /// The preceding item, clamped at the first.
    pub fn previous(self) -> Item {
        Self::ALL[self.index().saturating_sub(1)]
    }

    /// The stable identifier used for export file names.
    pub fn label(self) -> &'static str {
        match self {
            Item::Scene => "SCENE",
            Item::LetterP => "LETTER_P",
            Item::LetterA => "LETTER_A",
            Item::LetterS => "LETTER_S",
            Item::Dragon => "DRAGON",
            Item::DragonUpper => "DRAGON_UPPER",
            Item::DragonHead => "DRAGON_HEAD",
            Item::DragonTongue => "DRAGON_TONGUE",
            Item::DragonJoint => "DRAGON_JOINT",
            Item::DragonBody => "DRAGON_BODY",
            Item::DragonChest => "DRAGON_CHEST",
            Item::DragonPaws => "DRAGON_PAWS",
            Item::DragonPaw => "DRAGON_PAW",
            Item::DragonWing => "DRAGON_WING",
            Item::DragonWingOuter => "DRAGON_WING_OUTER",
            Item::DragonWingPart => "DRAGON_WING_PART",
            Item::DragonWingMembrane => "DRAGON_WING_MEMBRANE",
            Item::DragonTail => "DRAGON_TAIL",
            Item::DragonTailEnd => "DRAGON_TAIL_END",
        }
    }
}

/// Which figure the camera yaw follows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CameraMode {
    #[default]
    Static,
    Jumping,
    Flying,
}

/// The fixed materials the scene composes with, owned by the scene so tests
/// can substitute fixtures.
#[derive(Clone, Debug)]
pub struct SceneMaterials {
    pub debug: Material,
    pub floor: Material,
    pub scales: Material,
    pub tongue: Material,
    pub wing: Material,
    pub wing_membrane: Material,
}

impl Default for SceneMaterials {
    fn default() -> Self {
        Self {
            debug: Material::new(
                Vector4::new(0.2, 0.2, 0.2, 1.0),
                Vector4::new(1.0, 4.0 / 6.0, 0.0, 1.0),
                Vector4::new(0.2, 0.2, 0.2, 1.0),
                20.0,
            ),
            floor: Material::new(
                Vector4::new(0.5, 0.5, 0.5, 1.0),
                Vector4::new(1.0, 1.0, 1.0, 1.0),
                Vector4::new(0.0, 0.0, 0.0, 1.0),
                0.0,
            ),
            scales: Material::new(
                Vector4::new(0.2, 0.2, 0.2, 1.0),
                Vector4::new(0.8, 0.8, 0.8, 1.0),
                Vector4::new(1.0, 1.0, 1.0, 1.0),
                20.0,
            ),
            tongue: Material::new(
                Vector4::new(0.1, 0.0, 0.0, 1.0),
                Vector4::new(0.6, 0.0, 0.0, 1.0),
                Vector4::new(1.0, 1.0, 1.0, 1.0),
                50.0,
            ),
            wing: Material::new(
                Vector4::new(0.2, 0.2, 0.2, 1.0),
                Vector4::new(1.0, 1.0, 1.0, 1.0),
                Vector4::new(1.0, 1.0, 1.0, 1.0),
                20.0,
            ),
            wing_membrane: Material::new(
                Vector4::new(0.1, 0.0, 0.0, 1.0),
                Vector4::new(0.6, 0.0, 0.0, 1.0),
                Vector4::new(0.2, 0.2, 0.2, 1.0),
                20.0,
            ),
        }
    }
}

pub struct Scene {
    materials: SceneMaterials,
    dragons: [Dragon; 3],
    debug_dragon: Dragon,
    selected: Item,
    delta: Vector3<f32>,
    theta: Vector3<f32>,
    theta_camera_y: f32,
    sigma: f32,
    detail_level: u32,
    camera: CameraMode,
    export_queued: bool,
    loaded: bool,
}

impl Scene {
    pub fn new(materials: SceneMaterials) -> Self {
        let dragon = |kind| {
            Dragon::new(
                kind,
                materials.scales.clone(),
                materials.tongue.clone(),
                materials.wing.clone(),
                materials.wing_membrane.clone(),
            )
        };
        let dragons = [
            dragon(DragonKind::Floating),
            dragon(DragonKind::Flying),
            dragon(DragonKind::Jumping),
        ];
        let mut debug_dragon = dragon(DragonKind::Floating);
        debug_dragon.scales_material = materials.debug.clone();
        debug_dragon.wing_material = materials.debug.clone();
        let mut scene = Self {
            materials,
            dragons,
            debug_dragon,
            selected: Item::FIRST,
            delta: Vector3::new(0.0, 0.0, 0.0),
            theta: Vector3::new(0.0, 0.0, 0.0),
            theta_camera_y: 0.0,
            sigma: 1.0,
            detail_level: 4,
            camera: CameraMode::Static,
            export_queued: false,
            loaded: false,
        };
        scene.reset();
        scene.tick(0.0);
        scene
    }

    /// Load the scene's meshes and textures into `state`.
    ///
    /// Individual load failures are logged and skipped; the affected parts
    /// simply draw nothing. The scene counts as loaded when at least one
    /// mesh made it into the registry.
    pub fn load(&mut self, state: &mut dyn RenderState) {
        let meshes = [
            ("floor", "meshes/floor.obj"),
            ("letter_p", "meshes/LETTER_P.obj"),
            ("letter_a", "meshes/LETTER_A.obj"),
            ("letter_s", "meshes/LETTER_S.obj"),
            ("wing_membrane", "meshes/dragon_wing_membrane.obj"),
            ("joint", "meshes/dragon_joint_spin.obj"),
            ("dragon_chest", "meshes/dragon_chest.obj"),
            ("dragon_head", "meshes/dragon_head.obj"),
            ("dragon_tail_end", "meshes/dragon_tail_end.obj"),
        ];
        for (name, path) in meshes {
            if let Err(e) = state.load_mesh_from_file(name, path) {
                log::warn!("skipping mesh {name}: {e:#}");
            }
        }
        let textures = [
            ("lava_green", "textures/lava_green.tiff", true),
            ("scale_gold", "textures/scale_gold.tiff", false),
            ("scale_green", "textures/scale_green.tiff", false),
            ("scale_black", "textures/scale_black.tiff", false),
            ("scale_bronze", "textures/scale_bronze.tiff", false),
        ];
        for (name, path, flip) in textures {
            if let Err(e) = state.load_texture_from_file(name, path, flip) {
                log::warn!("skipping texture {name}: {e:#}");
            }
        }
        self.loaded = !state.meshes().is_empty();
        if !self.loaded {
            log::warn!("no meshes loaded, the scene will draw nothing");
            return;
        }
        for (dragon, texture) in self
            .dragons
            .iter_mut()
            .zip(["scale_green", "scale_black", "scale_bronze"])
        {
            if state.texture(texture).is_some() {
                dragon.scales_material.set_texture(texture);
                dragon.wing_material.set_texture(texture);
            }
        }
        if state.texture("lava_green").is_some() {
            self.materials.floor.set_texture("lava_green");
        }
    }

    pub fn loaded(&self) -> bool {
        self.loaded
    }

    /// Restore the default camera, selection and detail level.
    pub fn reset(&mut self) {
        self.delta = Vector3::new(0.0, -0.5, -5.0);
        self.theta = Vector3::new(21.0, -37.0, 0.0);
        self.sigma = 0.40;
        self.selected = Item::FIRST;
        self.theta_camera_y = 0.0;
        self.detail_level = 4;
        self.camera = CameraMode::Static;
    }

    pub fn delta(&self) -> Vector3<f32> {
        self.delta
    }

    pub fn delta_mut(&mut self) -> &mut Vector3<f32> {
        &mut self.delta
    }

    pub fn theta(&self) -> Vector3<f32> {
        self.theta
    }

    pub fn theta_mut(&mut self) -> &mut Vector3<f32> {
        &mut self.theta
    }

    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    pub fn set_sigma(&mut self, sigma: f32) {
        self.sigma = sigma;
    }

    pub fn camera(&self) -> CameraMode {
        self.camera
    }

    pub fn set_camera(&mut self, camera: CameraMode) {
        self.camera = camera;
    }

    pub fn camera_yaw(&self) -> f32 {
        self.theta_camera_y
    }

    pub fn selected(&self) -> Item {
        self.selected
    }

    pub fn select_next(&mut self) {
        self.selected = self.selected.next();
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.previous();
    }

    pub fn set_detail_level(&mut self, level: u32) {
        self.detail_level = level.clamp(1, 4);
    }

    pub fn top_view(&mut self) {
        self.theta = Vector3::new(0.0, 0.0, 0.0);
    }

    pub fn side_view(&mut self) {
        self.theta = Vector3::new(-90.0, 0.0, -90.0);
    }

    pub fn front_view(&mut self) {
        self.theta = Vector3::new(-90.0, 0.0, 0.0);
    }

    pub fn dragons(&self) -> &[Dragon; 3] {
        &self.dragons
    }

    /// Advance the animation to elapsed time `t` in seconds.
    ///
    /// Pure in `t`: calling with the same value always produces the same
    /// poses and camera yaw, whatever was ticked before.
    pub fn tick(&mut self, t: f32) {
        let angle = (t * 45.0) % 360.0;

        // hovering dragon
        self.dragons[0].animate(t);
        self.dragons[0].set_alpha((t * 3.5 + std::f32::consts::PI).cos());

        // drunk dragon trying to fly clockwise
        self.dragons[1].animate(t);
        self.dragons[1].set_alpha(angle);
        self.dragons[1].set_beta((t * 3.5).cos() * t.cos() * t.cos());

        // dragon jumping anticlockwise
        self.dragons[2].animate(t);
        self.dragons[2].set_alpha(angle);
        self.dragons[2].set_beta(
            1.20 * ((5.0 * t).cos() - (6.0 * t).cos() + (7.0 * t).cos())
                .abs()
                .sqrt(),
        );

        self.debug_dragon.animate(t);

        self.theta_camera_y = match self.camera {
            CameraMode::Static => 0.0,
            CameraMode::Jumping => angle,
            CameraMode::Flying => -angle,
        };
    }

    /// Draw the selected item under the camera transform. Must be called
    /// inside a frame bracket. A queued export fires after the draw.
    pub fn draw(&mut self, state: &mut dyn RenderState) {
        let item = self.selected;
        let mut rot = self.theta;
        if item == Item::Scene {
            rot.y += self.theta_camera_y;
        }
        state.translate(self.delta.x, self.delta.y, self.delta.z);
        state.rotate(rot.x, 1.0, 0.0, 0.0);
        state.rotate(rot.y, 0.0, 1.0, 0.0);
        state.rotate(rot.z, 0.0, 0.0, 1.0);
        state.scale(self.sigma, self.sigma, self.sigma);

        self.draw_item(state, item);
        if self.export_queued {
            self.export_queued = false;
            let path = format!("meshes/{}.obj", item.label());
            if let Err(e) = self.export_item(state, item, path.as_ref()) {
                log::warn!("export of {} failed: {e:#}", item.label());
            }
        }
    }

    fn draw_item(&mut self, state: &mut dyn RenderState, item: Item) {
        if !self.loaded {
            return;
        }
        let mut state = MatrixGuard::push(state);
        if item == Item::Scene {
            self.draw_composed(&mut *state);
            return;
        }
        let mut state = MaterialGuard::apply(&mut *state, self.materials.debug.clone());
        let d = &self.debug_dragon;
        match item {
            Item::Scene => {}
            Item::LetterP => state.draw_mesh("letter_p"),
            Item::LetterA => state.draw_mesh("letter_a"),
            Item::LetterS => state.draw_mesh("letter_s"),
            Item::Dragon => d.draw(&mut *state),
            Item::DragonUpper => d.draw_upper(&mut *state),
            Item::DragonHead => d.draw_head(&mut *state),
            Item::DragonTongue => d.draw_tongue(&mut *state),
            Item::DragonJoint => d.draw_joint(&mut *state),
            Item::DragonBody => d.draw_body(&mut *state),
            Item::DragonChest => d.draw_chest(&mut *state),
            Item::DragonPaws => d.draw_paws(&mut *state),
            Item::DragonPaw => d.draw_paw(&mut *state),
            Item::DragonWing => d.draw_wing(&mut *state),
            Item::DragonWingOuter => d.draw_wing_outer(&mut *state),
            Item::DragonWingPart => d.draw_wing_part(&mut *state),
            Item::DragonWingMembrane => d.draw_wing_membrane(&mut *state),
            Item::DragonTail => d.draw_tail(&mut *state),
            Item::DragonTailEnd => d.draw_tail_end(&mut *state),
        }
    }

    /// The full composition: the floor and all three dragons posed by their
    /// current flight parameters.
    fn draw_composed(&mut self, state: &mut dyn RenderState) {
        self.draw_floor(state);

        let detail = self.detail_level;
        for dragon in &mut self.dragons {
            dragon.set_detail_level(detail);
        }

        let da = &self.dragons[0];
        {
            let mut state = MatrixGuard::push(state);
            state.translate(0.0, 2.0 + 0.6 * da.alpha(), 0.0);
            state.scale(3.0, 3.0, 3.0);
            Self::draw_dragon_holding_a(da, &mut *state);
        }

        let dp = &self.dragons[1];
        {
            let mut state = MatrixGuard::push(state);
            state.translate(-dp.beta(), dp.beta(), dp.beta());
            state.rotate(dp.alpha(), 0.0, 1.0, 0.0);
            state.translate(4.0, 0.0, 4.0);
            state.rotate(60.0, 0.0, 1.0, 0.0);
            state.scale(1.5, 1.5, 1.5);
            Self::draw_dragon_holding_p(dp, &mut *state);
        }

        let ds = &self.dragons[2];
        let mut state = MatrixGuard::push(state);
        state.translate(0.0, ds.beta(), 0.0);
        state.rotate(-ds.alpha(), 0.0, 1.0, 0.0);
        state.translate(3.0, 0.0, 3.0);
        state.rotate(-120.0, 0.0, 1.0, 0.0);
        state.scale(1.5, 1.5, 1.5);
        Self::draw_dragon_holding_s(ds, &mut *state);
    }

    fn draw_floor(&self, state: &mut dyn RenderState) {
        let mut state = MaterialGuard::apply(state, self.materials.floor.clone());
        state.draw_mesh("floor");
    }

    /// The hovering dragon, tilted on its back with the letter A between its
    /// front paws.
    fn draw_dragon_holding_a(d: &Dragon, state: &mut dyn RenderState) {
        let mut state = MatrixGuard::push(state);
        {
            let mut state = MatrixGuard::push(&mut *state);
            state.rotate(45.0, 0.0, 0.0, 1.0);
            d.draw(&mut *state);
        }
        let mut state = MatrixGuard::push(&mut *state);
        state.translate(1.0 / 3.0, 0.2 / 3.0, 0.0);
        state.rotate(15.0, 0.0, 1.0, 0.0);
        state.rotate(-d.front_legs_angle(), 0.0, 0.0, 1.0);
        state.scale(2.0 / 3.0, 2.0 / 3.0, 1.0 / 3.0);
        let mut state = MaterialGuard::apply(&mut *state, d.tongue_material.clone());
        state.draw_mesh("letter_a");
    }

    fn draw_dragon_holding_p(d: &Dragon, state: &mut dyn RenderState) {
        let mut state = MatrixGuard::push(state);
        d.draw(&mut *state);
        let mut state = MatrixGuard::push(&mut *state);
        state.translate(0.08, -0.13, 0.0);
        state.rotate(-d.front_legs_angle() + 90.0, 0.0, 0.0, 1.0);
        state.translate(0.2, -0.1, 0.0);
        state.rotate(-170.0, 0.0, 0.0, 1.0);
        state.scale(1.0, 1.0, 0.5);
        let mut state = MaterialGuard::apply(&mut *state, d.tongue_material.clone());
        state.draw_mesh("letter_p");
    }

    fn draw_dragon_holding_s(d: &Dragon, state: &mut dyn RenderState) {
        let mut state = MatrixGuard::push(state);
        d.draw(&mut *state);
        let mut state = MatrixGuard::push(&mut *state);
        state.translate(0.26, -0.25, 0.0);
        state.rotate(180.0 - d.front_legs_angle(), 0.0, 0.0, 1.0);
        // the glyph pivots around a point inside the paw, not its origin
        state.translate(-0.4, 0.1, 0.0);
        state.scale(1.0, 1.0, 0.5);
        let mut state = MaterialGuard::apply(&mut *state, d.tongue_material.clone());
        state.draw_mesh("letter_s");
    }

    /// Queue a one-shot export of the selected item; it fires on the next
    /// [`Scene::draw`].
    pub fn export_current_item(&mut self) {
        self.export_queued = true;
    }

    /// Capture a draw of `item` into an OBJ file at `path`.
    pub fn export_item(
        &mut self,
        state: &mut dyn RenderState,
        item: Item,
        path: &std::path::Path,
    ) -> Result<()> {
        state.begin_export_mesh(path);
        self.draw_item(state, item);
        state.end_export_mesh()
    }
}
