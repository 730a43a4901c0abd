use initials::scene::dragon::{Dragon, DragonKind};
use initials::scene::{CameraMode, Scene, SceneMaterials};
use initials::material::Material;

mod common;

fn dragon(kind: DragonKind) -> Dragon {
    Dragon::new(
        kind,
        Material::default(),
        Material::default(),
        Material::default(),
        Material::default(),
    )
}

#[test]
fn hovering_dragon_bobs_from_the_bottom_at_t_zero() {
    let mut scene = Scene::new(SceneMaterials::default());
    scene.tick(0.0);
    let alpha = scene.dragons()[0].alpha();
    assert!((alpha + 1.0).abs() < 1e-6, "alpha = {alpha}");
    assert_eq!(scene.dragons()[0].beta(), 0.0);
}

#[test]
fn jumping_dragon_bounce_height_at_t_zero() {
    let mut scene = Scene::new(SceneMaterials::default());
    scene.tick(0.0);
    // 1.20 * sqrt(|cos 0 - cos 0 + cos 0|)
    let beta = scene.dragons()[2].beta();
    assert!((beta - 1.20).abs() < 1e-6, "beta = {beta}");
}

#[test]
fn flying_dragon_sways_with_damped_cosine() {
    let mut scene = Scene::new(SceneMaterials::default());
    scene.tick(0.0);
    let d = &scene.dragons()[1];
    assert_eq!(d.alpha(), 0.0);
    assert!((d.beta() - 1.0).abs() < 1e-6);

    scene.tick(2.0);
    let t = 2.0f32;
    let expected = (t * 3.5).cos() * t.cos() * t.cos();
    assert!((scene.dragons()[1].beta() - expected).abs() < 1e-6);
}

#[test]
fn rotation_angle_wraps_at_a_full_turn() {
    let mut scene = Scene::new(SceneMaterials::default());
    scene.tick(8.0);
    assert!((scene.dragons()[1].alpha() - 0.0).abs() < 1e-3);
    scene.tick(9.0);
    assert!((scene.dragons()[1].alpha() - 45.0).abs() < 1e-3);
}

#[test]
fn base_pose_curves_at_t_zero() {
    let mut d = dragon(DragonKind::Floating);
    d.animate(0.0);
    let pose = &d.pose;
    // spaced_cos is flat at zero inside the quiet window
    assert!((pose.theta_jaw - 10.0).abs() < 1e-5);
    assert!(pose.theta_head_y.abs() < 1e-5);
    assert!((pose.theta_neck - 5.0).abs() < 1e-5);
    assert!((pose.theta_wing - 45.0).abs() < 1e-5);
    assert!((pose.theta_wing_joint - 30.0).abs() < 1e-5);
    assert!((pose.theta_front_legs - 95.0).abs() < 1e-5);
    assert!((pose.theta_back_legs - 135.0).abs() < 1e-5);
    assert!((pose.theta_tail - 15.0).abs() < 1e-5);
}

#[test]
fn kinds_override_their_signature_joints() {
    let mut floating = dragon(DragonKind::Floating);
    let mut flying = dragon(DragonKind::Flying);
    let mut jumping = dragon(DragonKind::Jumping);
    let t = 0.3;
    floating.animate(t);
    flying.animate(t);
    jumping.animate(t);

    assert_eq!(floating.pose.theta_head_z, -45.0);
    assert_eq!(floating.pose.theta_paw, 60.0);

    assert_eq!(flying.pose.theta_head_z, -30.0);
    assert_eq!(flying.pose.theta_neck, 30.0);

    assert_eq!(jumping.pose.theta_wing, 0.0);
    assert_eq!(jumping.pose.theta_wing_joint, 20.0);
    // the jumping head uses the energetic 1s/2s window, flat at t=0.3
    assert!((jumping.pose.theta_head_z + 30.0).abs() < 1e-5);
    assert!((jumping.pose.theta_jaw - 10.0).abs() < 1e-5);
}

#[test]
fn animation_is_a_pure_function_of_time() {
    let mut a = Scene::new(SceneMaterials::default());
    let mut b = Scene::new(SceneMaterials::default());
    for t in [0.5, 1.7, 42.0] {
        a.tick(t);
    }
    b.tick(3.3);
    b.tick(42.0);
    for (da, db) in a.dragons().iter().zip(b.dragons()) {
        assert_eq!(da.pose, db.pose);
    }
}

#[test]
fn camera_yaw_follows_the_selected_figure() {
    let mut scene = Scene::new(SceneMaterials::default());
    scene.tick(1.0);
    assert_eq!(scene.camera(), CameraMode::Static);
    assert_eq!(scene.camera_yaw(), 0.0);

    scene.set_camera(CameraMode::Jumping);
    scene.tick(1.0);
    assert!((scene.camera_yaw() - 45.0).abs() < 1e-4);

    scene.set_camera(CameraMode::Flying);
    scene.tick(1.0);
    assert!((scene.camera_yaw() + 45.0).abs() < 1e-4);

    scene.set_camera(CameraMode::Static);
    scene.tick(1.0);
    assert_eq!(scene.camera_yaw(), 0.0);
}
