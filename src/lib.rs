//! bonnie-sketch: radius-annotated sketch trees for organic modeling
//!
//! A sketch is a skeleton of spheres. Picking runs analytic ray/sphere tests
//! over the tree; the preview draws it with a PS1-style software rasterizer,
//! edges shown either as tapering bubble chains or as oriented cones.
//!
//! # Module Organization
//!
//! - `sketch` - Sketch trees, picking and preview rendering
//! - `tool` - Move/resize tools driven by mouse input
//! - `mesh` - Display meshes and procedural proxy shapes
//! - `rasterizer` - Software rasterizer, camera and ray casting
//! - `config` - Keyed editor configuration (RON)
//! - `axis` - World axis gizmo

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod axis;
pub mod config;
pub mod mesh;
pub mod rasterizer;
pub mod sketch;
pub mod tool;
