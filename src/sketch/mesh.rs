//! Sketch meshes: picking and preview rendering for a sketch tree

use tracing::debug;

use super::intersection::SketchNodeIntersection;
use super::node::SketchTree;
use crate::config::{Config, ConfigResult};
use crate::mesh::{util, DisplayMesh, ProxyMesh};
use crate::rasterizer::{
    lerp, mat4_orientation, ray_sphere_intersect, Camera, Color, Framebuffer, Ray, Sphere, Vec3,
};

/// Upper bound on bubbles drawn along a single edge
pub const MAX_BUBBLES_PER_EDGE: usize = 4096;

/// How a sketch mesh draws itself
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    /// Cones instead of bubble chains along edges
    pub render_wireframe: bool,
    pub node_color: Color,
    pub bubble_color: Color,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            render_wireframe: false,
            node_color: Color::new(200, 200, 210),
            bubble_color: Color::new(120, 160, 220),
        }
    }
}

/// Proxy meshes re-posed for every node and edge a sketch mesh draws.
///
/// One scratch can serve any number of sketch meshes, one at a time.
pub struct SketchScratch<M: ProxyMesh = DisplayMesh> {
    node_mesh: M,
    wireframe_mesh: M,
}

impl<M: ProxyMesh> SketchScratch<M> {
    /// `node_mesh` is a unit sphere; `wireframe_mesh` a unit-radius cone
    /// with its base at the origin and apex at (0, 1, 0).
    pub fn from_meshes(node_mesh: M, wireframe_mesh: M) -> Self {
        Self { node_mesh, wireframe_mesh }
    }

    pub fn node_mesh(&self) -> &M {
        &self.node_mesh
    }

    pub fn wireframe_mesh(&self) -> &M {
        &self.wireframe_mesh
    }
}

impl SketchScratch<DisplayMesh> {
    pub fn new() -> Self {
        let node_mesh = util::icosphere(3);

        // Base ring on the origin so the cone can be anchored at a parent node
        let mut wireframe_mesh = util::cone(16);
        wireframe_mesh.set_position(Vec3::new(0.0, 0.5, 0.0));
        wireframe_mesh.bake_transform();

        Self::from_meshes(node_mesh, wireframe_mesh)
    }
}

impl Default for SketchScratch<DisplayMesh> {
    fn default() -> Self {
        Self::new()
    }
}

/// A sketch tree plus how to draw it.
///
/// Two sketch meshes are equal when they share an index, whatever their
/// trees hold.
#[derive(Debug, Clone)]
pub struct SketchMesh {
    index: u32,
    root: Option<SketchTree>,
    render_config: RenderConfig,
}

impl SketchMesh {
    pub fn new(index: u32) -> Self {
        Self { index, root: None, render_config: RenderConfig::default() }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn has_root(&self) -> bool {
        self.root.is_some()
    }

    /// Panics if the mesh is empty
    pub fn root(&self) -> &SketchTree {
        match &self.root {
            Some(tree) => tree,
            None => panic!("sketch mesh {} has no root", self.index),
        }
    }

    /// Panics if the mesh is empty
    pub fn root_mut(&mut self) -> &mut SketchTree {
        match &mut self.root {
            Some(tree) => tree,
            None => panic!("sketch mesh {} has no root", self.index),
        }
    }

    /// Take a copy of `tree`. Panics if the mesh already has a root.
    pub fn from_tree(&mut self, tree: &SketchTree) {
        assert!(!self.has_root(), "sketch mesh {} already has a root", self.index);
        self.root = Some(tree.clone());
        debug!("sketch mesh {}: loaded tree with {} nodes", self.index, tree.len());
    }

    /// Drop the tree
    pub fn reset(&mut self) {
        self.root = None;
        debug!("sketch mesh {}: reset", self.index);
    }

    pub fn render_config(&self) -> &RenderConfig {
        &self.render_config
    }

    pub fn render_wireframe(&self) -> bool {
        self.render_config.render_wireframe
    }

    pub fn set_render_wireframe(&mut self, value: bool) {
        self.render_config.render_wireframe = value;
    }

    /// Pick up node and bubble colors
    pub fn run_from_config(&mut self, config: &Config) -> ConfigResult<()> {
        let node_color = config.get::<Color>("editor/sketch/node/color")?;
        let bubble_color = config.get::<Color>("editor/sketch/bubble/color")?;
        self.render_config.node_color = node_color;
        self.render_config.bubble_color = bubble_color;
        Ok(())
    }

    /// Test `ray` against every node sphere, keeping the closest hit in
    /// `intersection`. Returns whether `intersection` holds any hit.
    pub fn intersects(&self, ray: &Ray, intersection: &mut SketchNodeIntersection) -> bool {
        if let Some(tree) = &self.root {
            tree.for_each_const_node(|id, node| {
                let sphere = Sphere::new(node.position, node.radius);
                if let Some(t) = ray_sphere_intersect(ray, &sphere) {
                    let p = ray.at(t);
                    let normal = (p - node.position).normalize();
                    intersection.update(t, p, normal, self.index, id);
                }
            });
        }
        intersection.is_intersection()
    }

    /// Draw every node as a sphere and every edge as a cone or a chain of
    /// bubbles, depending on `render_wireframe`
    pub fn render<M: ProxyMesh>(
        &self,
        scratch: &mut SketchScratch<M>,
        target: &mut Framebuffer,
        camera: &Camera,
    ) {
        let Some(tree) = &self.root else {
            return;
        };
        let config = &self.render_config;

        scratch.node_mesh.reset_transform();
        scratch.wireframe_mesh.reset_transform();

        tree.for_each_node_with_parent(|_, node, parent| {
            let pos = node.position;
            let r = node.radius;

            let sphere = &mut scratch.node_mesh;
            sphere.set_color(config.node_color);
            sphere.set_position(pos);
            sphere.set_scaling(Vec3::splat(r));
            sphere.draw(target, camera);

            let Some(parent) = parent else {
                return;
            };
            let par_pos = parent.position;
            let par_r = parent.radius;
            let distance = pos.distance(par_pos);
            if distance <= 0.0 {
                return;
            }
            let direction = (par_pos - pos) / distance;

            if config.render_wireframe {
                let cone = &mut scratch.wireframe_mesh;
                cone.set_color(config.node_color);
                cone.set_position(par_pos);
                cone.set_scaling(Vec3::new(par_r, distance, par_r));
                cone.set_rotation(mat4_orientation(direction, Vec3::new(0.0, -1.0, 0.0)));
                cone.draw(target, camera);
            } else {
                // Overlapping spheres tapering from the child's radius to the parent's
                sphere.set_color(config.bubble_color);
                let mut d = r * 0.5;
                for _ in 0..MAX_BUBBLES_PER_EDGE {
                    if d >= distance {
                        break;
                    }
                    let bubble_radius = lerp(d / distance, r, par_r);
                    sphere.set_position(pos + direction * d);
                    sphere.set_scaling(Vec3::splat(bubble_radius));
                    sphere.draw(target, camera);

                    let next = d + bubble_radius * 0.5;
                    if next <= d {
                        // Step vanished below float precision
                        break;
                    }
                    d = next;
                }
            }
        });
    }
}

impl PartialEq for SketchMesh {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for SketchMesh {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigValue;
    use crate::rasterizer::{mat4_identity, mat4_transform_vector, Mat4, ShadingMode};
    use crate::sketch::NodeId;

    /// One recorded `draw` call
    #[derive(Debug, Clone, PartialEq)]
    struct Draw {
        position: Vec3,
        scaling: Vec3,
        rotation: Mat4,
        color: Color,
    }

    /// Proxy that remembers what it was asked to draw
    #[derive(Debug, Clone)]
    struct Recorder {
        current: Draw,
        draws: Vec<Draw>,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                current: Draw {
                    position: Vec3::ZERO,
                    scaling: Vec3::ONE,
                    rotation: mat4_identity(),
                    color: Color::BLACK,
                },
                draws: Vec::new(),
            }
        }
    }

    impl ProxyMesh for Recorder {
        fn set_position(&mut self, position: Vec3) {
            self.current.position = position;
        }
        fn set_scaling(&mut self, scaling: Vec3) {
            self.current.scaling = scaling;
        }
        fn set_rotation(&mut self, rotation: Mat4) {
            self.current.rotation = rotation;
        }
        fn set_color(&mut self, color: Color) {
            self.current.color = color;
        }
        fn draw(&mut self, _fb: &mut Framebuffer, _camera: &Camera) {
            self.draws.push(self.current.clone());
        }
    }

    fn recorder_scratch() -> SketchScratch<Recorder> {
        SketchScratch::from_meshes(Recorder::new(), Recorder::new())
    }

    fn two_node_tree(child: Vec3, child_radius: f32, root_radius: f32) -> SketchTree {
        let mut tree = SketchTree::new(Vec3::ZERO, root_radius);
        tree.add_child(NodeId::ROOT, child, child_radius);
        tree
    }

    fn mesh_with(tree: &SketchTree) -> SketchMesh {
        let mut mesh = SketchMesh::new(0);
        mesh.from_tree(tree);
        mesh
    }

    fn render(mesh: &SketchMesh) -> SketchScratch<Recorder> {
        let mut scratch = recorder_scratch();
        let mut fb = Framebuffer::new(8, 8);
        mesh.render(&mut scratch, &mut fb, &Camera::new());
        scratch
    }

    fn assert_vec_eq(a: Vec3, b: Vec3) {
        assert!((a - b).len() < 0.001, "expected {:?}, got {:?}", b, a);
    }

    #[test]
    fn test_root_lifecycle() {
        let mut mesh = SketchMesh::new(1);
        assert!(!mesh.has_root());
        mesh.from_tree(&SketchTree::new(Vec3::ZERO, 1.0));
        assert!(mesh.has_root());
        mesh.reset();
        assert!(!mesh.has_root());
        mesh.from_tree(&SketchTree::new(Vec3::ZERO, 2.0));
        assert_eq!(mesh.root().root().radius, 2.0);
    }

    #[test]
    #[should_panic(expected = "already has a root")]
    fn test_from_tree_twice_panics() {
        let tree = SketchTree::new(Vec3::ZERO, 1.0);
        let mut mesh = mesh_with(&tree);
        mesh.from_tree(&tree);
    }

    #[test]
    #[should_panic(expected = "has no root")]
    fn test_root_of_empty_mesh_panics() {
        SketchMesh::new(0).root();
    }

    #[test]
    fn test_from_tree_copies() {
        let mut tree = SketchTree::new(Vec3::ZERO, 1.0);
        let mesh = mesh_with(&tree);
        tree.node_mut(NodeId::ROOT).radius = 9.0;
        assert_eq!(mesh.root().root().radius, 1.0);
    }

    #[test]
    fn test_equality_by_index() {
        let a = mesh_with(&SketchTree::new(Vec3::ZERO, 1.0));
        let mut b = SketchMesh::new(0);
        b.from_tree(&SketchTree::new(Vec3::new(3.0, 3.0, 3.0), 7.0));
        assert_eq!(a, b);
        assert_ne!(a, SketchMesh::new(1));
    }

    #[test]
    fn test_hit_nearest_node() {
        let mesh = mesh_with(&two_node_tree(Vec3::new(0.0, 0.0, 5.0), 1.0, 1.0));
        let ray = Ray::towards(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);

        let mut hit = SketchNodeIntersection::new();
        assert!(mesh.intersects(&ray, &mut hit));
        assert!((hit.t() - 4.0).abs() < 0.001);
        assert_vec_eq(hit.position(), Vec3::new(0.0, 0.0, 6.0));
        assert_vec_eq(hit.normal(), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(hit.mesh(), Some(0));
        assert_eq!(hit.node(), Some(mesh.root().children(NodeId::ROOT)[0]));
    }

    #[test]
    fn test_hit_is_minimum_of_all_node_hits() {
        let mut tree = SketchTree::new(Vec3::ZERO, 2.0);
        tree.add_child(NodeId::ROOT, Vec3::new(0.0, 0.0, 3.0), 1.5);
        tree.add_child(NodeId::ROOT, Vec3::new(0.0, 0.0, -4.0), 3.0);
        let mesh = mesh_with(&tree);
        let ray = Ray::new(Vec3::new(0.2, 0.1, 20.0), Vec3::new(0.0, 0.0, -1.0));

        let mut hit = SketchNodeIntersection::new();
        assert!(mesh.intersects(&ray, &mut hit));
        for (_, node) in tree.iter() {
            if let Some(t) = ray_sphere_intersect(&ray, &Sphere::new(node.position, node.radius)) {
                assert!(hit.t() <= t);
            }
        }
        assert!((hit.normal().len() - 1.0).abs() < 0.001);
        assert_vec_eq(hit.normal(), (hit.position() - Vec3::new(0.0, 0.0, 3.0)).normalize());
    }

    #[test]
    fn test_miss_leaves_accumulator_alone() {
        let mesh = mesh_with(&two_node_tree(Vec3::new(0.0, 0.0, 5.0), 1.0, 1.0));
        let ray = Ray::new(Vec3::new(50.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));

        let mut hit = SketchNodeIntersection::new();
        assert!(!mesh.intersects(&ray, &mut hit));

        // Pre-populated from some other mesh
        hit.update(3.0, Vec3::ONE, Vec3::UP, 42, NodeId::ROOT);
        let before = hit;
        assert!(mesh.intersects(&ray, &mut hit));
        assert_eq!(hit, before);
    }

    #[test]
    fn test_accumulator_spans_meshes() {
        let far = mesh_with(&SketchTree::new(Vec3::new(0.0, 0.0, -10.0), 1.0));
        let mut near = SketchMesh::new(7);
        near.from_tree(&SketchTree::new(Vec3::new(0.0, 0.0, 2.0), 1.0));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));

        let mut hit = SketchNodeIntersection::new();
        near.intersects(&ray, &mut hit);
        far.intersects(&ray, &mut hit);
        assert_eq!(hit.mesh(), Some(7));
    }

    #[test]
    fn test_reset_then_intersect_misses() {
        let mut mesh = mesh_with(&two_node_tree(Vec3::new(0.0, 0.0, 5.0), 1.0, 1.0));
        mesh.reset();
        let ray = Ray::towards(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);

        let mut hit = SketchNodeIntersection::new();
        assert!(!mesh.intersects(&ray, &mut hit));
        assert_eq!(hit, SketchNodeIntersection::new());
    }

    #[test]
    fn test_ray_starting_inside_node() {
        let mesh = mesh_with(&SketchTree::new(Vec3::ZERO, 2.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));
        let mut hit = SketchNodeIntersection::new();
        assert!(mesh.intersects(&ray, &mut hit));
        assert!((hit.t() - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_bubble_count_equal_radii() {
        // r = 1, d = 5: offsets 0.5, 1.0, ..., 4.5
        let mesh = mesh_with(&two_node_tree(Vec3::new(0.0, 0.0, 5.0), 1.0, 1.0));
        let scratch = render(&mesh);
        let draws = &scratch.node_mesh().draws;

        let config = RenderConfig::default();
        let nodes = draws.iter().filter(|d| d.color == config.node_color).count();
        let bubbles: Vec<_> = draws.iter().filter(|d| d.color == config.bubble_color).collect();
        assert_eq!(nodes, 2);
        assert_eq!(bubbles.len(), 9);
        assert!(scratch.wireframe_mesh().draws.is_empty());

        // Walking from the child toward the root
        assert_vec_eq(bubbles[0].position, Vec3::new(0.0, 0.0, 4.5));
        assert_vec_eq(bubbles[8].position, Vec3::new(0.0, 0.0, 0.5));
        assert!(bubbles.iter().all(|b| (b.scaling.x - 1.0).abs() < 0.0001));
    }

    #[test]
    fn test_bubble_count_is_deterministic() {
        let mesh = mesh_with(&two_node_tree(Vec3::new(3.0, 0.0, 0.0), 0.5, 0.5));
        let a = render(&mesh).node_mesh().draws.clone();
        let b = render(&mesh).node_mesh().draws.clone();
        assert_eq!(a, b);
        // ceil((3.0 - 0.25) / 0.25) = 11 bubbles plus the two nodes
        assert_eq!(a.len(), 13);
    }

    #[test]
    fn test_tiny_radius_edge_is_bounded() {
        let mesh = mesh_with(&two_node_tree(Vec3::new(1.0, 0.0, 0.0), 1e-9, 1e-9));
        let scratch = render(&mesh);
        assert_eq!(scratch.node_mesh().draws.len(), 2 + MAX_BUBBLES_PER_EDGE);
    }

    #[test]
    fn test_zero_radius_edge_stops_after_one_bubble() {
        let mesh = mesh_with(&two_node_tree(Vec3::new(0.0, 0.0, 2.0), 0.0, 0.0));
        let scratch = render(&mesh);
        // d never advances past 0
        assert_eq!(scratch.node_mesh().draws.len(), 3);
    }

    #[test]
    fn test_bubbles_taper_toward_parent() {
        let mesh = mesh_with(&two_node_tree(Vec3::new(0.0, 4.0, 0.0), 0.5, 2.0));
        let scratch = render(&mesh);
        let bubble_color = RenderConfig::default().bubble_color;
        let radii: Vec<f32> = scratch.node_mesh().draws.iter()
            .filter(|d| d.color == bubble_color)
            .map(|d| d.scaling.x)
            .collect();
        assert!(!radii.is_empty());
        assert!((radii[0] - lerp(0.25 / 4.0, 0.5, 2.0)).abs() < 0.0001);
        assert!(radii.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_wireframe_draws_one_cone_per_edge() {
        let mut tree = SketchTree::new(Vec3::ZERO, 1.5);
        tree.add_child(NodeId::ROOT, Vec3::new(0.0, 0.0, 5.0), 1.0);
        tree.add_child(NodeId::ROOT, Vec3::new(0.0, 3.0, 0.0), 1.0);
        let mut mesh = mesh_with(&tree);
        mesh.set_render_wireframe(true);

        let scratch = render(&mesh);
        assert_eq!(scratch.node_mesh().draws.len(), 3);
        let cones = &scratch.wireframe_mesh().draws;
        assert_eq!(cones.len(), 2);

        let first = &cones[0];
        assert_eq!(first.position, Vec3::ZERO);
        assert_vec_eq(first.scaling, Vec3::new(1.5, 5.0, 1.5));
        assert_eq!(first.color, RenderConfig::default().node_color);

        // Local +Y (toward the apex) points from the parent back to the child
        let apex_dir = mat4_transform_vector(&first.rotation, Vec3::UP);
        assert_vec_eq(apex_dir, Vec3::new(0.0, 0.0, 1.0));
        let apex_dir = mat4_transform_vector(&cones[1].rotation, Vec3::UP);
        assert_vec_eq(apex_dir, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_zero_length_edge_draws_only_nodes() {
        let mesh = mesh_with(&two_node_tree(Vec3::ZERO, 1.0, 1.0));
        let scratch = render(&mesh);
        assert_eq!(scratch.node_mesh().draws.len(), 2);
    }

    #[test]
    fn test_empty_mesh_draws_nothing() {
        let scratch = render(&SketchMesh::new(0));
        assert!(scratch.node_mesh().draws.is_empty());
    }

    #[test]
    fn test_run_from_config() {
        let mut config = Config::with_defaults();
        config.set("editor/sketch/node/color", ConfigValue::Color(Color::RED));
        config.set("editor/sketch/bubble/color", ConfigValue::Color(Color::BLUE));

        let mut mesh = SketchMesh::new(0);
        mesh.run_from_config(&config).unwrap();
        assert_eq!(mesh.render_config().node_color, Color::RED);
        assert_eq!(mesh.render_config().bubble_color, Color::BLUE);
    }

    #[test]
    fn test_run_from_config_missing_key_keeps_colors() {
        let mut config = Config::new();
        config.set("editor/sketch/node/color", ConfigValue::Color(Color::RED));

        let mut mesh = SketchMesh::new(0);
        assert!(mesh.run_from_config(&config).is_err());
        assert_eq!(*mesh.render_config(), RenderConfig::default());
    }

    #[test]
    fn test_renders_into_framebuffer() {
        let mesh = mesh_with(&two_node_tree(Vec3::new(0.0, 0.0, 3.0), 1.0, 1.0));
        let mut scratch = SketchScratch::new();
        scratch.node_mesh.settings.shading = ShadingMode::None;

        let mut camera = Camera::new();
        camera.orbit(Vec3::ZERO, 12.0);
        let mut fb = Framebuffer::new(64, 64);
        fb.clear(Color::BLACK);
        mesh.render(&mut scratch, &mut fb, &camera);

        assert_eq!(fb.get_pixel(32, 32), Some(RenderConfig::default().node_color));
    }

    #[test]
    fn test_scratch_cone_is_anchored_at_base() {
        let scratch = SketchScratch::new();
        let ys: Vec<f32> = scratch.wireframe_mesh().vertices().iter().map(|v| v.pos.y).collect();
        let min = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        assert!(min.abs() < 0.0001);
        assert!((max - 1.0).abs() < 0.0001);
    }
}
