/**
 * Engine data models: transforms, the CPU-side scene graph and animation data.
 */
pub mod animation;
pub mod scene_graph;
pub mod transform;
