//! Hex map terrain: a chunked hex grid whose cells carry elevation, rivers
//! and roads, triangulated into perturbed, terraced Bevy meshes.
//!
//! [`terrain`] holds the model and triangulation plus the plugin that keeps
//! chunk meshes in sync with edits. [`math`] holds small numeric helpers.

pub mod math;
pub mod terrain;
