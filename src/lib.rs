//! initials
//!
//! An interactive 3D viewer core that procedurally animates articulated
//! dragon figures holding letter glyphs. The crate exposes a backend
//! agnostic render-state abstraction with two implementations (a
//! fixed-function style command recorder and a shader-program backend), a
//! scene that composes the figures under strict transform and material
//! stack discipline, and a deterministic time-driven animation driver.
//!
//! High-level modules
//! - `clock`: wall-clock elapsed time source feeding the animation tick
//! - `data_structures`: CPU-side meshes, vertex layouts and decoded textures
//! - `material`: lighting materials applied as scoped pipeline state
//! - `math`: matrix construction helpers with legacy GL conventions
//! - `render`: the render-state abstraction, its two backends, the command
//!   stream and mesh export
//! - `resources`: mesh, texture and shader loading
//! - `scene`: scene composition, dragon figures and procedural animation
//! - `waveform`: periodic primitives the animation curves are built from
//!
//! Windowing, input handling and actual GPU submission live in frontends;
//! they consume the per-frame command stream a backend records.

pub mod clock;
pub mod data_structures;
pub mod material;
pub mod math;
pub mod render;
pub mod resources;
pub mod scene;
pub mod waveform;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::{Matrix4, Vector3, Vector4};
pub use material::Material;
pub use render::{DrawCommand, MaterialGuard, MatrixGuard, MatrixMode, RenderState};
pub use render::fixed::FixedFunctionState;
pub use render::shader::ShaderState;
pub use scene::{CameraMode, Item, Scene, SceneMaterials};
