//! Viewer data structures.
//!
//! - `mesh` contains the CPU-side mesh representation, its vertex layout and
//!   the generic vertex-group intermediate form
//! - `texture` contains decoded texture images keyed into the render state's
//!   texture registry

pub mod mesh;
pub mod texture;
