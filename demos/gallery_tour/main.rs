//! # Gallery Tour
//!
//! Headless walk through the gallery core: a handful of frames, the avatar,
//! the jukebox, the phone and the security camera laid out as boxes, driven
//! by a scripted pointer and a manual clock.
//!
//! ## Usage:
//! ```bash
//! RUST_LOG=debug cargo run --example gallery_tour
//! ```

use anyhow::Context;
use cgmath::Vector3;
use gallery::gfx::headless::{
    HeadlessAudio, HeadlessLightRig, HeadlessMixer, HeadlessPostProcess, ManualClock,
};
use gallery::prelude::*;
use log::info;
use winit::event::ElementState;
use winit::keyboard::KeyCode;

const FRAME_MS: f64 = 1000.0 / 60.0;

struct Exhibit {
    id: &'static str,
    category: Category,
    center: (f32, f32, f32),
    half_extents: (f32, f32, f32),
    payload: Payload,
}

fn project(title: &str, description: &str) -> Payload {
    Payload::Project(ProjectInfo {
        title: title.to_string(),
        description: description.to_string(),
        url: format!("https://example.com/projects/{}", title.to_lowercase().replace(' ', "-")),
    })
}

fn exhibits() -> Vec<Exhibit> {
    vec![
        Exhibit {
            id: "frame-raytracer",
            category: Category::Frame,
            center: (-2.5, 3.0, 0.0),
            half_extents: (0.8, 0.6, 0.05),
            payload: project("Raytracer", "A path tracer written over a summer"),
        },
        Exhibit {
            id: "frame-compiler",
            category: Category::Frame,
            center: (0.0, 3.0, 0.0),
            half_extents: (0.8, 0.6, 0.05),
            payload: project("Toy Compiler", "Lexer to bytecode in one weekend"),
        },
        Exhibit {
            id: "card-resume",
            category: Category::Card,
            center: (2.5, 3.0, 0.0),
            half_extents: (0.5, 0.7, 0.05),
            payload: project("Resume", "Experience and education"),
        },
        Exhibit {
            id: "avatar",
            category: Category::Avatar,
            center: (-2.0, 1.0, 2.0),
            half_extents: (0.4, 1.0, 0.3),
            payload: Payload::None,
        },
        Exhibit {
            id: "jukebox",
            category: Category::Jukebox,
            center: (2.0, 1.0, 2.0),
            half_extents: (0.6, 0.6, 0.6),
            payload: Payload::None,
        },
        Exhibit {
            id: "phone",
            category: Category::Phone,
            center: (0.0, 1.0, 3.0),
            half_extents: (0.3, 0.5, 0.1),
            payload: Payload::None,
        },
        Exhibit {
            id: "phone-github",
            category: Category::ContactLink,
            center: (0.0, 1.2, 3.15),
            half_extents: (0.2, 0.1, 0.05),
            payload: ContactKind::from_part_name("github").map_or(Payload::None, Payload::Contact),
        },
        Exhibit {
            id: "security-camera",
            category: Category::SecurityCamera,
            center: (3.5, 4.8, 3.5),
            half_extents: (0.3, 0.2, 0.3),
            payload: Payload::None,
        },
    ]
}

/// Pointer position that lands on the middle of `exhibit` from the current camera
fn aim_at(app: &GalleryApp, exhibit: &Exhibit) -> (f32, f32) {
    let (x, y, z) = exhibit.center;
    let clip = cgmath::Matrix4::from(app.frame_uniforms().camera.view_proj)
        * cgmath::Vector4::new(x, y, z, 1.0);
    (clip.x / clip.w, clip.y / clip.w)
}

fn run_frames(app: &mut GalleryApp, clock: &ManualClock, frames: usize) {
    for _ in 0..frames {
        clock.advance(FRAME_MS);
        app.tick();
    }
}

fn main() -> anyhow::Result<()> {
    gallery::init_logging();

    let clock = ManualClock::new(0.0);
    let audio = HeadlessAudio::new();
    let post = HeadlessPostProcess::new();
    let lights = HeadlessLightRig::new();

    let exhibits = exhibits();
    let mut bounds = BoundsIntersector::new();
    for (index, exhibit) in exhibits.iter().enumerate() {
        let (cx, cy, cz) = exhibit.center;
        let (hx, hy, hz) = exhibit.half_extents;
        let proxy = ProxyHandle(index as u64);
        bounds.insert(proxy, AABB::around(Vector3::new(cx, cy, cz), Vector3::new(hx, hy, hz)));
        lights.instantiate(proxy);
    }

    let ctx = SceneContext {
        intersector: Box::new(bounds),
        clock: Box::new(clock.clone()),
        avatar_mixer: Box::new(HeadlessMixer::new().with_clip(ActionId::WAVE, 2.0)),
        jukebox_mixer: Box::new(HeadlessMixer::new()),
        audio: Box::new(audio.clone()),
        post_process: Box::new(post.clone()),
        lights: Box::new(lights),
    };

    let mut app = GalleryApp::new(GalleryConfig::default(), ctx);
    for (index, exhibit) in exhibits.iter().enumerate() {
        app.register(
            exhibit.id,
            exhibit.category,
            ProxyHandle(index as u64),
            exhibit.payload.clone(),
        )
        .with_context(|| format!("registering {}", exhibit.id))?;
    }
    app.resize(1280, 720);
    run_frames(&mut app, &clock, 1);
    info!("Registered {} exhibits", app.registry().len());

    info!("--- Browsing the frames");
    for exhibit in exhibits.iter().filter(|e| e.category == Category::Frame) {
        app.on_pointer_move(aim_at(&app, exhibit));
        run_frames(&mut app, &clock, 10);
        info!(
            "Over '{}': cursor {:?}, project {:?}",
            exhibit.id,
            app.cursor(),
            app.highlighted_project().map(|p| p.title.as_str())
        );
    }
    let outcome = app.on_click();
    info!("Clicked frame: {:?}", outcome);
    app.set_interaction_enabled(false);
    run_frames(&mut app, &clock, 30);
    app.set_interaction_enabled(true);
    app.dismiss_project();

    info!("--- Saying hello to the avatar");
    app.on_pointer_move(aim_at(&app, &exhibits[3]));
    run_frames(&mut app, &clock, 150);
    info!("Avatar is now in '{}'", app.avatar().current());

    info!("--- Playing the jukebox");
    app.on_pointer_move(aim_at(&app, &exhibits[4]));
    run_frames(&mut app, &clock, 5);
    info!("Music playing: {}", audio.is_playing());
    info!("Clicked jukebox: {:?}", app.on_click());
    info!("Jukebox pinned: {}", app.jukebox().is_pinned());
    app.on_pointer_move((0.95, -0.95));
    run_frames(&mut app, &clock, 5);
    info!("Pinned music still playing: {}", audio.is_playing());

    info!("--- Reaching for the phone");
    app.on_pointer_move(aim_at(&app, &exhibits[6]));
    info!("Armed contact: {:?}", app.armed_contact());
    info!("Clicked phone: {:?}", app.on_click());

    info!("--- Night falls");
    app.on_key(KeyCode::KeyL, ElementState::Pressed);
    run_frames(&mut app, &clock, 60);
    app.on_key(KeyCode::KeyL, ElementState::Pressed);
    run_frames(&mut app, &clock, 30);
    app.on_key(KeyCode::KeyL, ElementState::Pressed);
    run_frames(&mut app, &clock, 150);
    info!("Exposure now {:.2}", app.lighting().live().exposure);

    info!("--- Security camera");
    app.on_pointer_move(aim_at(&app, &exhibits[7]));
    info!("Clicked security camera: {:?}", app.on_click());
    run_frames(&mut app, &clock, 100);
    info!(
        "Mode {:?}, eye {:?}, effect time {:.2}s",
        app.mode(),
        app.camera().eye,
        post.effect_time()
    );
    app.on_key(KeyCode::Escape, ElementState::Pressed);
    run_frames(&mut app, &clock, 100);
    info!("Mode {:?}, eye {:?}", app.mode(), app.camera().eye);

    let metrics = app.performance();
    info!(
        "Simulated {:.1} fps ({:.2}ms per frame)",
        metrics.fps, metrics.frame_time_ms
    );
    Ok(())
}
