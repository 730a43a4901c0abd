use cgmath::{Matrix4, SquareMatrix};
use initials::data_structures::mesh::VertexGroup;
use initials::material::Material;
use initials::math;
use initials::render::fixed::FixedFunctionState;
use initials::render::shader::ShaderState;
use initials::render::{DrawCommand, MaterialGuard, MatrixGuard, MatrixMode, RenderState};

use crate::common::test_utils::{
    assert_mat4_near, count_draws, fixed_state, preload_scene_meshes, shader_state, TRIANGLE_OBJ,
};

mod common;

fn both_backends() -> Vec<Box<dyn RenderState>> {
    vec![Box::new(fixed_state()), Box::new(shader_state())]
}

#[test]
fn matrix_stack_round_trip_restores_current_matrix() {
    for mut state in both_backends() {
        state.translate(1.0, 2.0, 3.0);
        state.rotate(30.0, 0.0, 1.0, 0.0);
        let before = state.current_matrix();
        state.push_matrix();
        state.multiply_matrix(&math::scaling(7.0, 7.0, 7.0));
        state.rotate(123.0, 1.0, 1.0, 0.0);
        state.pop_matrix();
        assert_mat4_near(&state.current_matrix(), &before, 0.0);
    }
}

#[test]
fn convenience_transforms_match_constructed_matrices() {
    for mut state in both_backends() {
        state.translate(1.0, -2.0, 0.5);
        assert_mat4_near(&state.current_matrix(), &math::translation(1.0, -2.0, 0.5), 0.0);
        state.load_identity();
        state.rotate(90.0, 0.0, 0.0, 1.0);
        assert_mat4_near(&state.current_matrix(), &math::rotation(90.0, 0.0, 0.0, 1.0), 0.0);
        state.load_identity();
        state.scale(2.0, 3.0, 4.0);
        assert_mat4_near(&state.current_matrix(), &math::scaling(2.0, 3.0, 4.0), 0.0);
    }
}

#[test]
fn matrix_modes_have_independent_stacks() {
    for mut state in both_backends() {
        state.set_matrix_mode(MatrixMode::ModelView);
        state.translate(5.0, 0.0, 0.0);
        state.set_matrix_mode(MatrixMode::Texture);
        assert_mat4_near(&state.current_matrix(), &Matrix4::identity(), 0.0);
        state.set_matrix_mode(MatrixMode::ModelView);
        assert_mat4_near(&state.current_matrix(), &math::translation(5.0, 0.0, 0.0), 0.0);
    }
}

#[test]
#[should_panic(expected = "pop_matrix")]
fn fixed_pop_matrix_underflow_panics() {
    let mut state = FixedFunctionState::new();
    state.pop_matrix();
}

#[test]
#[should_panic(expected = "pop_matrix")]
fn shader_pop_matrix_underflow_panics() {
    let mut state = ShaderState::new("assets/shaders/scene.wgsl");
    state.push_matrix();
    state.pop_matrix();
    state.pop_matrix();
}

#[test]
#[should_panic(expected = "pop_material")]
fn pop_material_underflow_panics() {
    let mut state = FixedFunctionState::new();
    state.push_material(Material::default());
    state.pop_material();
    state.pop_material();
}

#[test]
#[should_panic(expected = "begin_frame")]
fn nested_begin_frame_panics() {
    let mut state = fixed_state();
    state.begin_frame(640, 480);
    state.begin_frame(640, 480);
}

#[test]
#[should_panic(expected = "end_frame")]
fn end_frame_without_begin_panics() {
    let mut state = fixed_state();
    state.end_frame();
}

#[test]
#[should_panic(expected = "draw_mesh")]
fn draw_outside_frame_bracket_panics() {
    let mut state = fixed_state();
    state.load_mesh_from_data("tri", TRIANGLE_OBJ).unwrap();
    state.draw_mesh("tri");
}

#[test]
fn material_stack_reexposes_enclosing_material() {
    for mut state in both_backends() {
        let a = Material::new(
            cgmath::Vector4::new(0.1, 0.0, 0.0, 1.0),
            cgmath::Vector4::new(0.9, 0.0, 0.0, 1.0),
            cgmath::Vector4::new(0.0, 0.0, 0.0, 1.0),
            10.0,
        );
        let b = Material::default();
        state.push_material(a.clone());
        state.push_material(b);
        state.pop_material();
        assert_eq!(state.current_material(), Some(a));
        state.pop_material();
        assert_eq!(state.current_material(), None);
    }
}

#[test]
fn perspective_projection_matches_reference_formula() {
    for mut state in both_backends() {
        state.begin_frame(800, 600);
        state.set_matrix_mode(MatrixMode::Projection);
        let expected = cgmath::perspective(cgmath::Deg(45.0f32), 800.0 / 600.0, 0.1, 100.0);
        assert_mat4_near(&state.current_matrix(), &expected, 1e-6);
        state.set_matrix_mode(MatrixMode::ModelView);
        state.end_frame();
    }
}

#[test]
fn orthographic_projection_preserves_aspect() {
    for mut state in both_backends() {
        state.toggle_projection();

        // portrait: width maps to [-1, 1], height stretches
        state.setup_viewport(400, 800);
        state.set_matrix_mode(MatrixMode::Projection);
        let expected = cgmath::ortho(-1.0f32, 1.0, -2.0, 2.0, -10.0, 10.0);
        assert_mat4_near(&state.current_matrix(), &expected, 1e-6);

        // landscape: height maps to [-1, 1], width stretches
        state.set_matrix_mode(MatrixMode::ModelView);
        state.setup_viewport(800, 400);
        state.set_matrix_mode(MatrixMode::Projection);
        let expected = cgmath::ortho(-2.0f32, 2.0, -1.0, 1.0, -10.0, 10.0);
        assert_mat4_near(&state.current_matrix(), &expected, 1e-6);
    }
}

#[test]
fn absent_mesh_draw_is_a_no_op() {
    for mut state in both_backends() {
        state.begin_frame(640, 480);
        state.draw_mesh("not_loaded");
        assert_eq!(count_draws(state.commands()), 0);
        state.end_frame();
    }
}

#[test]
fn frame_lifecycle_clears_the_stream_between_frames() {
    let mut state = fixed_state();
    state.load_mesh_from_data("tri", TRIANGLE_OBJ).unwrap();
    state.begin_frame(640, 480);
    state.draw_mesh("tri");
    state.end_frame();
    assert_eq!(count_draws(state.commands()), 1);

    state.begin_frame(640, 480);
    assert_eq!(count_draws(state.commands()), 0);
    state.end_frame();
}

#[test]
fn fixed_backend_records_every_state_call() {
    let mut state = fixed_state();
    state.load_mesh_from_data("tri", TRIANGLE_OBJ).unwrap();
    state.begin_frame(640, 480);
    state.push_matrix();
    state.translate(1.0, 0.0, 0.0);
    state.draw_mesh("tri");
    state.pop_matrix();
    state.end_frame();

    let commands = state.commands();
    assert!(commands.contains(&DrawCommand::PushMatrix));
    assert!(commands.contains(&DrawCommand::PopMatrix));
    assert!(commands.contains(&DrawCommand::MultMatrix(math::translation(1.0, 0.0, 0.0))));
}

#[test]
fn shader_backend_uploads_matrices_only_at_draw() {
    let mut state = shader_state();
    state.load_mesh_from_data("tri", TRIANGLE_OBJ).unwrap();
    state.begin_frame(640, 480);
    state.push_matrix();
    state.translate(1.0, 2.0, 3.0);
    // stack traffic with no draw reaches the stream as nothing at all
    let uploads_before = state
        .commands()
        .iter()
        .filter(|c| matches!(c, DrawCommand::SetUniformMat4 { .. }))
        .count();
    assert_eq!(uploads_before, 0);
    assert!(!state.commands().contains(&DrawCommand::PushMatrix));

    state.draw_mesh("tri");
    state.pop_matrix();
    state.end_frame();

    let expected = math::translation(1.0, 2.0, 3.0);
    assert!(state.commands().iter().any(|c| matches!(
        c,
        DrawCommand::SetUniformMat4 { name, value }
            if *name == initials::render::shader::U_MODEL_VIEW && *value == expected
    )));
    assert_eq!(count_draws(state.commands()), 1);
}

#[test]
fn scope_guards_balance_on_every_path() {
    for mut state in both_backends() {
        let before = state.current_matrix();
        {
            let mut guard = MatrixGuard::push(state.as_mut());
            guard.translate(4.0, 4.0, 4.0);
            {
                let mut inner = MaterialGuard::apply(&mut *guard, Material::default());
                inner.scale(0.5, 0.5, 0.5);
            }
            assert_eq!(guard.current_material(), None);
        }
        assert_mat4_near(&state.current_matrix(), &before, 0.0);
    }
}

#[test]
fn normals_toggle_adds_normal_draws() {
    let mut state = fixed_state();
    state.load_mesh_from_data("tri", TRIANGLE_OBJ).unwrap();
    state.toggle_normals();
    assert!(state.draw_normals());
    state.begin_frame(640, 480);
    state.draw_mesh("tri");
    state.end_frame();
    assert!(state
        .commands()
        .iter()
        .any(|c| matches!(c, DrawCommand::DrawNormals { mesh } if mesh == "tri")));
}

#[test]
fn reset_restores_startup_toggles() {
    let mut state = fixed_state();
    state.toggle_normals();
    state.toggle_wireframe();
    state.toggle_projection();
    state.reset();
    assert!(!state.draw_normals());
    state.begin_frame(640, 480);
    state.set_matrix_mode(MatrixMode::Projection);
    let expected = cgmath::perspective(cgmath::Deg(45.0f32), 640.0 / 480.0, 0.1, 100.0);
    assert_mat4_near(&state.current_matrix(), &expected, 1e-6);
    state.set_matrix_mode(MatrixMode::ModelView);
    state.end_frame();
}

#[test]
fn vertex_group_without_attributes_becomes_a_triangle_list() {
    let mut state = fixed_state();
    // positions only: normals and tex coords fall back to zero, and with no
    // index list the vertices are taken as consecutive triangles
    let group = VertexGroup {
        positions: vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
        ],
        ..VertexGroup::default()
    };
    state.load_mesh_from_group("generated", &group).unwrap();

    let mesh = &state.meshes()["generated"];
    assert_eq!(mesh.indices, vec![0, 1, 2]);
    assert_eq!(mesh.triangle_count(), 1);
    for vertex in &mesh.vertices {
        assert_eq!(vertex.normal, [0.0; 3]);
        assert_eq!(vertex.tex_coords, [0.0; 2]);
    }
}

#[test]
fn vertex_group_with_indices_keeps_them() {
    let mut state = fixed_state();
    let group = VertexGroup {
        positions: vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ],
        normals: vec![[0.0, 0.0, 1.0]; 4],
        tex_coords: vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
        indices: vec![0, 1, 2, 0, 2, 3],
    };
    state.load_mesh_from_group("quad", &group).unwrap();

    let mesh = &state.meshes()["quad"];
    assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    assert_eq!(mesh.triangle_count(), 2);
    assert_eq!(mesh.vertices[1].tex_coords, [1.0, 0.0]);
}

#[test]
fn create_mesh_inserts_once_and_is_fillable_in_place() {
    let mut state = fixed_state();
    let mesh = state.create_mesh("built");
    assert!(mesh.is_empty());
    mesh.vertices.push(bytemuck::Zeroable::zeroed());
    mesh.vertices.push(bytemuck::Zeroable::zeroed());
    mesh.vertices.push(bytemuck::Zeroable::zeroed());
    mesh.indices.extend([0, 1, 2]);

    // a second call fetches the same entry instead of replacing it
    assert_eq!(state.create_mesh("built").triangle_count(), 1);
    assert_eq!(state.meshes().len(), 1);
}

#[test]
fn mesh_registry_reports_loaded_meshes() {
    let mut state = fixed_state();
    assert!(state.meshes().is_empty());
    preload_scene_meshes(&mut state);
    assert_eq!(state.meshes().len(), 9);
    let floor = &state.meshes()["floor"];
    assert_eq!(floor.triangle_count(), 1);
    assert!(!floor.is_empty());
}
