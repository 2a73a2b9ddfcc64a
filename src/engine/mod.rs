/**
 * Trait seams for the external collaborators: asset loading, image tracking,
 * positional audio and rendering. The orchestration layer only ever talks to
 * these traits; concrete backends live with the embedder (and in `crate::web`
 * for Web Audio).
 */
pub mod assets;
pub mod audio;
pub mod render;
pub mod tracking;
