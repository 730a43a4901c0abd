use cgmath::Matrix4;
use initials::render::fixed::FixedFunctionState;
use initials::render::shader::ShaderState;
use initials::render::{DrawCommand, RenderState};

pub const SCENE_SHADER: &str = "assets/shaders/scene.wgsl";

/// A single triangle with normals and texture coordinates, enough geometry
/// to stand in for any registry mesh.
pub const TRIANGLE_OBJ: &[u8] = b"v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 0.0 1.0
vn 0.0 0.0 1.0
f 1/1/1 2/2/1 3/3/1
";

/// Names of every mesh the scene expects in the registry.
pub const SCENE_MESHES: [&str; 9] = [
    "floor",
    "letter_p",
    "letter_a",
    "letter_s",
    "wing_membrane",
    "joint",
    "dragon_chest",
    "dragon_head",
    "dragon_tail_end",
];

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn fixed_state() -> FixedFunctionState {
    init_logging();
    let mut state = FixedFunctionState::new();
    state.init().unwrap();
    state
}

pub fn shader_state() -> ShaderState {
    init_logging();
    let mut state = ShaderState::new(SCENE_SHADER);
    state.init().unwrap();
    state
}

/// Fill a render state with the triangle standing in for every scene mesh.
pub fn preload_scene_meshes(state: &mut dyn RenderState) {
    for name in SCENE_MESHES {
        state.load_mesh_from_data(name, TRIANGLE_OBJ).unwrap();
    }
}

pub fn assert_mat4_near(actual: &Matrix4<f32>, expected: &Matrix4<f32>, eps: f32) {
    for col in 0..4 {
        for row in 0..4 {
            let a = actual[col][row];
            let e = expected[col][row];
            assert!(
                (a - e).abs() <= eps,
                "matrix mismatch at [{col}][{row}]: {a} vs {e}\nactual: {actual:?}\nexpected: {expected:?}"
            );
        }
    }
}

pub fn count_draws(commands: &[DrawCommand]) -> usize {
    commands
        .iter()
        .filter(|c| matches!(c, DrawCommand::Draw { .. }))
        .count()
}
