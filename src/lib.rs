//! verglade
//!
//! Runtime orchestration for a single-page image-tracking AR experience: ten
//! sequential 3D scenes (model + positional audio + animation) anchored to one
//! tracked image, with tap-to-cycle animation on the first scene. The heavy
//! subsystems (pose estimation, rendering, audio mixing) stay behind trait
//! seams in `engine`; this crate owns the glue that loads, wires and drives
//! them for the lifetime of the session.
//!
//! High-level modules
//! - `camera`: perspective camera, pointer-to-ray unprojection
//! - `data_structures`: transforms, the CPU scene graph, animation clips/mixer
//! - `engine`: trait seams for the external collaborators
//! - `experience`: bootstrap and the per-frame driver
//! - `pick`: ray intersection and the tap-to-cycle interaction controller
//! - `resources`: asset fetching and glTF decoding
//! - `scene`: scene descriptors, assembly and runtime slots
//!

pub mod camera;
pub mod data_structures;
pub mod engine;
pub mod experience;
pub mod pick;
pub mod resources;
pub mod scene;
#[cfg(target_arch = "wasm32")]
pub mod web;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::{Deg, Euler, Point3, Quaternion, Rad, Vector3};
pub use data_structures::transform::Transform;
