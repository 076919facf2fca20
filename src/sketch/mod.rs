//! Sketch meshes
//!
//! A sketch is a tree of spheres (position + radius) used as the scaffold
//! for organic surfaces. This module holds the tree itself, ray picking
//! against it, and the preview renderer that draws nodes as spheres and
//! edges as bubble chains or cones.

pub mod intersection;
pub mod mesh;
pub mod node;

pub use intersection::SketchNodeIntersection;
pub use mesh::{RenderConfig, SketchMesh, SketchScratch, MAX_BUBBLES_PER_EDGE};
pub use node::{NodeId, SketchError, SketchNode, SketchNodeData, SketchResult, SketchTree};
