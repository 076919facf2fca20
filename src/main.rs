//! bonnie-sketch viewer
//!
//! Usage: `bonnie-sketch [config.ron] [sketch.ron]`
//!
//! Right drag orbits, left mouse and wheel go to the active tool.
//! Tab switches tools, W toggles cone/bubble edges, H toggles resolution,
//! R reloads the sketch, S saves it.
//!
//! Log output goes to stderr; `RUST_LOG` overrides the default filter.

use std::path::PathBuf;

use bonnie_sketch::axis::Axis;
use bonnie_sketch::config::Config;
use bonnie_sketch::rasterizer::{
    draw_floor_grid, Camera, Color, Framebuffer, Vec3, HEIGHT, HEIGHT_HI, WIDTH, WIDTH_HI,
};
use bonnie_sketch::sketch::{NodeId, SketchMesh, SketchScratch, SketchTree};
use bonnie_sketch::tool::{SketchTool, SketchToolId, ToolBehavior, ToolContext};
use bonnie_sketch::VERSION;
use macroquad::prelude::*;
use tracing::warn;

/// Where `S` saves when no sketch path was given
const DEFAULT_SKETCH_PATH: &str = "sketch.ron";

/// Radians of orbit per pixel of right drag
const ORBIT_SPEED: f32 = 0.01;

/// Log filter used when `RUST_LOG` is unset
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_LOG_FILTER: &str = "bonnie_sketch=info";

#[cfg(not(target_arch = "wasm32"))]
fn log_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn window_conf() -> Conf {
    Conf {
        window_title: format!("bonnie-sketch v{}", VERSION),
        window_width: 960,
        window_height: 720,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

/// Small creature used when no sketch file is given
fn sample_tree() -> SketchTree {
    let mut tree = SketchTree::new(Vec3::ZERO, 1.2);
    let chest = tree.add_child(NodeId::ROOT, Vec3::new(0.0, 1.8, 0.0), 1.0);
    let head = tree.add_child(chest, Vec3::new(0.0, 3.4, 0.3), 0.7);
    tree.add_child(head, Vec3::new(0.0, 3.6, 1.2), 0.3);

    for side in [-1.0, 1.0] {
        let shoulder = tree.add_child(chest, Vec3::new(side * 1.3, 2.0, 0.0), 0.45);
        let elbow = tree.add_child(shoulder, Vec3::new(side * 2.6, 1.2, 0.2), 0.35);
        tree.add_child(elbow, Vec3::new(side * 3.4, 0.2, 0.6), 0.3);

        let hip = tree.add_child(NodeId::ROOT, Vec3::new(side * 0.7, -1.0, 0.0), 0.6);
        let knee = tree.add_child(hip, Vec3::new(side * 0.9, -2.6, 0.4), 0.4);
        tree.add_child(knee, Vec3::new(side * 0.9, -4.0, -0.2), 0.35);
    }
    tree
}

/// Screen rectangle the framebuffer is scaled into (keeps aspect ratio)
fn viewport_rect(fb: &Framebuffer) -> (f32, f32, f32, f32) {
    let scale = (screen_width() / fb.width as f32).min(screen_height() / fb.height as f32);
    let w = fb.width as f32 * scale;
    let h = fb.height as f32 * scale;
    ((screen_width() - w) / 2.0, (screen_height() - h) / 2.0, w, h)
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);
    #[cfg(not(target_arch = "wasm32"))]
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().map(PathBuf::from);
    let sketch_path = args.next().map(PathBuf::from);

    let config = match &config_path {
        Some(path) => Config::load_from_file(path).unwrap_or_else(|e| {
            warn!("failed to load config {}: {}", path.display(), e);
            Config::with_defaults()
        }),
        None => Config::with_defaults(),
    };

    let load_tree = || match &sketch_path {
        Some(path) => SketchTree::load_from_file(path).unwrap_or_else(|e| {
            warn!("failed to load sketch {}: {}", path.display(), e);
            sample_tree()
        }),
        None => sample_tree(),
    };
    let save_path = sketch_path.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_SKETCH_PATH));

    let mut mesh = SketchMesh::new(0);
    mesh.from_tree(&load_tree());
    if let Err(e) = mesh.run_from_config(&config) {
        warn!("using default sketch colors: {}", e);
    }

    let mut scratch = SketchScratch::new();
    let axis = Axis::from_config(&config);
    let background: Color = config.get_or("editor/background/color", Color::new(40, 40, 48));
    let grid_color: Color = config.get_or("editor/grid/color", Color::new(70, 70, 80));
    let camera_distance: f32 = config.get_or("editor/camera/distance", 12.0);

    let mut camera = Camera::new();
    camera.rotate(0.35, 0.6);
    camera.orbit(Vec3::ZERO, camera_distance);

    let mut tool = SketchTool::new(SketchToolId::MoveNode, &config);
    let mut hi_res = false;
    let mut fb = Framebuffer::new(WIDTH, HEIGHT);
    let mut last_mouse = mouse_position();

    println!("bonnie-sketch v{}: {} nodes", VERSION, mesh.root().len());

    loop {
        // ---- Input ----
        if is_key_pressed(KeyCode::Tab) {
            let next = match tool.id() {
                SketchToolId::MoveNode => SketchToolId::ResizeNode,
                SketchToolId::ResizeNode => SketchToolId::MoveNode,
            };
            tool = SketchTool::new(next, &config);
            println!("Tool: {}", next.label());
        }
        if is_key_pressed(KeyCode::W) {
            let wireframe = !mesh.render_wireframe();
            mesh.set_render_wireframe(wireframe);
        }
        if is_key_pressed(KeyCode::H) {
            hi_res = !hi_res;
            if hi_res {
                fb.resize(WIDTH_HI, HEIGHT_HI);
            } else {
                fb.resize(WIDTH, HEIGHT);
            }
        }
        if is_key_pressed(KeyCode::R) {
            mesh.reset();
            mesh.from_tree(&load_tree());
            tool = SketchTool::new(tool.id(), &config);
        }
        if is_key_pressed(KeyCode::S) {
            if let Err(e) = mesh.root().save_to_file(&save_path) {
                warn!("failed to save sketch: {}", e);
            }
        }

        let (mx, my) = mouse_position();
        let (vx, vy, vw, vh) = viewport_rect(&fb);
        let fx = (mx - vx) / vw * fb.width as f32;
        let fy = (my - vy) / vh * fb.height as f32;

        if is_mouse_button_down(MouseButton::Right) {
            camera.rotate((my - last_mouse.1) * ORBIT_SPEED, (mx - last_mouse.0) * ORBIT_SPEED);
            camera.orbit(Vec3::ZERO, camera_distance);
        }
        last_mouse = (mx, my);

        {
            let mut ctx = ToolContext::new(&mut mesh, &camera, fb.width, fb.height);
            if is_mouse_button_pressed(MouseButton::Left) {
                tool.mouse_left_press(&mut ctx, fx, fy);
            }
            tool.mouse_move(&mut ctx, fx, fy, is_mouse_button_down(MouseButton::Left));
            if is_mouse_button_released(MouseButton::Left) {
                tool.mouse_left_release(&mut ctx, fx, fy);
            }
            let (_, wheel) = mouse_wheel();
            if wheel != 0.0 {
                tool.mouse_wheel(&mut ctx, wheel > 0.0);
            }
        }

        // ---- Render ----
        fb.clear(background);
        draw_floor_grid(&mut fb, &camera, -4.5, 1.0, 8.0, grid_color);
        mesh.render(&mut scratch, &mut fb, &camera);
        axis.render(&mut fb, &camera);
        tool.render(&mut fb, &camera);

        clear_background(BLACK);
        let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.pixels);
        texture.set_filter(FilterMode::Nearest);
        draw_texture_ex(
            &texture,
            vx,
            vy,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(vw, vh)),
                ..Default::default()
            },
        );

        let mode = if mesh.render_wireframe() { "cones" } else { "bubbles" };
        draw_text(&format!("{} | edges: {} | {}x{}", tool.id().label(), mode, fb.width, fb.height), 10.0, 20.0, 20.0, WHITE);
        for (i, (input, action)) in tool.tool_tip().iter().enumerate() {
            draw_text(&format!("{}: {}", input, action), 10.0, 42.0 + i as f32 * 20.0, 18.0, LIGHTGRAY);
        }

        next_frame().await;
    }
}
