//! Sketch trees
//!
//! A sketch tree is a skeleton of positioned, radius-annotated nodes. Nodes
//! live in an arena owned by the `SketchTree`; `NodeId` handles stay valid
//! for the life of the tree (nodes are never removed individually).
//!
//! Trees save to RON as a nested document:
//!
//! ```text
//! (
//!   position: (x: 0.0, y: 0.0, z: 0.0),
//!   radius: 1.0,
//!   children: [
//!     (position: (x: 0.0, y: 0.0, z: 5.0), radius: 1.0),
//!   ],
//! )
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::rasterizer::Vec3;

/// Validation limits for loaded sketch files
pub mod limits {
    /// Maximum number of nodes in a tree
    pub const MAX_NODES: usize = 4096;
    /// Maximum nesting depth (root is depth 0)
    pub const MAX_DEPTH: usize = 48;
    /// Maximum absolute coordinate value
    pub const MAX_COORD: f32 = 100_000.0;
    /// Minimum node radius
    pub const MIN_RADIUS: f32 = 0.001;
    /// Maximum node radius
    pub const MAX_RADIUS: f32 = 10_000.0;
}

/// Error type for sketch loading/saving
#[derive(Debug, Error)]
pub enum SketchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

pub type SketchResult<T> = Result<T, SketchError>;

/// Handle to a node inside a `SketchTree`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Every tree's root
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single skeleton node
#[derive(Debug, Clone, PartialEq)]
pub struct SketchNode {
    pub position: Vec3,
    pub radius: f32,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl SketchNode {
    fn new(position: Vec3, radius: f32, parent: Option<NodeId>) -> Self {
        Self { position, radius, children: Vec::new(), parent }
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// `None` only for the root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Arena-backed node tree with exactly one root
#[derive(Debug, Clone, PartialEq)]
pub struct SketchTree {
    nodes: Vec<SketchNode>,
}

impl SketchTree {
    /// Tree holding only a root node
    pub fn new(position: Vec3, radius: f32) -> Self {
        Self { nodes: vec![SketchNode::new(position, radius, None)] }
    }

    pub fn root(&self) -> &SketchNode {
        &self.nodes[0]
    }

    /// Append a child under `parent`, returning its handle
    pub fn add_child(&mut self, parent: NodeId, position: Vec3, radius: f32) -> NodeId {
        assert!(parent.index() < self.nodes.len(), "invalid parent {:?}", parent);
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SketchNode::new(position, radius, Some(parent)));
        self.nodes[parent.index()].children.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> &SketchNode {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut SketchNode {
        &mut self.nodes[id.index()]
    }

    pub fn get(&self, id: NodeId) -> Option<&SketchNode> {
        self.nodes.get(id.index())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Node count (never zero)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes in creation order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SketchNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i as u32), n))
    }

    /// Number of edges between `id` and the root
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.parent(id);
        while let Some(p) = current {
            depth += 1;
            current = self.parent(p);
        }
        depth
    }

    /// Visit every node, parents before children
    pub fn for_each_node(&mut self, mut f: impl FnMut(NodeId, &mut SketchNode)) {
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            let node = &mut self.nodes[id.index()];
            f(id, node);
            stack.extend(node.children.iter().rev());
        }
    }

    /// Read-only pre-order visit
    pub fn for_each_const_node(&self, mut f: impl FnMut(NodeId, &SketchNode)) {
        self.for_each_node_with_parent(|id, node, _| f(id, node));
    }

    /// Pre-order visit that also hands out each node's parent
    pub fn for_each_node_with_parent(
        &self,
        mut f: impl FnMut(NodeId, &SketchNode, Option<&SketchNode>),
    ) {
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            f(id, node, node.parent.map(|p| self.node(p)));
            stack.extend(node.children.iter().rev());
        }
    }

    // ---- Serialization ----

    /// Nested form used on disk
    pub fn to_data(&self) -> SketchNodeData {
        self.node_data(NodeId::ROOT)
    }

    fn node_data(&self, id: NodeId) -> SketchNodeData {
        let node = self.node(id);
        SketchNodeData {
            position: node.position,
            radius: node.radius,
            children: node.children.iter().map(|&c| self.node_data(c)).collect(),
        }
    }

    /// Build a tree from its nested form, validating it first
    pub fn from_data(data: &SketchNodeData) -> SketchResult<Self> {
        validate_sketch(data)?;

        let mut tree = Self::new(data.position, data.radius);
        let mut pending: Vec<(NodeId, &SketchNodeData)> =
            data.children.iter().rev().map(|c| (NodeId::ROOT, c)).collect();
        while let Some((parent, child)) = pending.pop() {
            let id = tree.add_child(parent, child.position, child.radius);
            pending.extend(child.children.iter().rev().map(|c| (id, c)));
        }
        Ok(tree)
    }

    pub fn to_ron_string(&self) -> SketchResult<String> {
        let config = ron::ser::PrettyConfig::new()
            .depth_limit(limits::MAX_DEPTH * 2 + 2)
            .indentor("  ".to_string());
        Ok(ron::ser::to_string_pretty(&self.to_data(), config)?)
    }

    /// Save tree to RON file
    pub fn save_to_file(&self, path: &std::path::Path) -> SketchResult<()> {
        let contents = self.to_ron_string()?;
        std::fs::write(path, contents)?;
        info!("saved sketch ({} nodes) to {}", self.len(), path.display());
        Ok(())
    }

    /// Load tree from RON file
    pub fn load_from_file(path: &std::path::Path) -> SketchResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let tree = Self::load_from_str(&contents)?;
        info!("loaded sketch ({} nodes) from {}", tree.len(), path.display());
        Ok(tree)
    }

    /// Load tree from RON string (for embedded sketches or testing)
    pub fn load_from_str(s: &str) -> SketchResult<Self> {
        let data: SketchNodeData = ron::from_str(s)?;
        let tree = Self::from_data(&data)?;
        debug!("parsed sketch with {} nodes", tree.len());
        Ok(tree)
    }
}

/// On-disk node: position, radius and nested children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SketchNodeData {
    pub position: Vec3,
    pub radius: f32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SketchNodeData>,
}

fn validate_position(v: &Vec3, context: &str) -> Result<(), String> {
    let in_range = |f: f32| f.abs() <= limits::MAX_COORD;
    if !v.is_finite() || !in_range(v.x) || !in_range(v.y) || !in_range(v.z) {
        return Err(format!("{}: invalid position ({}, {}, {})", context, v.x, v.y, v.z));
    }
    Ok(())
}

fn validate_node(data: &SketchNodeData, depth: usize, count: &mut usize) -> Result<(), String> {
    let context = format!("node {}", *count);

    if depth > limits::MAX_DEPTH {
        return Err(format!("{}: nested too deep (> {})", context, limits::MAX_DEPTH));
    }

    *count += 1;
    if *count > limits::MAX_NODES {
        return Err(format!("too many nodes (> {})", limits::MAX_NODES));
    }

    validate_position(&data.position, &context)?;
    if !data.radius.is_finite() || data.radius < limits::MIN_RADIUS || data.radius > limits::MAX_RADIUS {
        return Err(format!("{}: invalid radius {}", context, data.radius));
    }

    for child in &data.children {
        validate_node(child, depth + 1, count)?;
    }
    Ok(())
}

/// Check a nested sketch document against `limits`
pub fn validate_sketch(data: &SketchNodeData) -> SketchResult<()> {
    let mut count = 0;
    validate_node(data, 0, &mut count).map_err(SketchError::Validation)
}
