use approx::assert_relative_eq;

use jumper::camera::Camera;
use jumper::entities::{Background, Layer, Platform, Rect};

fn target_rect() -> Rect {
    Rect::new(0.0, 0.0, 40.0, 60.0)
}

// ── Target placement ──────────────────────────────────────────────────────────

#[test]
fn before_the_limit_the_target_moves_and_the_offset_stays() {
    let mut cam = Camera::new(600.0);
    let mut rect = target_rect();
    cam.set_position((300.0, 400.0), &mut rect);
    assert_relative_eq!(cam.offset, 0.0);
    assert_relative_eq!(rect.x, 300.0);
    assert_relative_eq!(rect.bottom(), 400.0);
}

#[test]
fn past_the_limit_the_target_pins_and_the_world_scrolls() {
    let mut cam = Camera::new(600.0);
    let mut rect = target_rect();
    cam.set_position((700.0, 380.0), &mut rect);
    assert_relative_eq!(cam.offset, -100.0);
    assert_relative_eq!(rect.x, 600.0);
    assert_relative_eq!(rect.bottom(), 380.0);

    cam.set_position((900.0, 380.0), &mut rect);
    assert_relative_eq!(cam.offset, -300.0);
    assert_relative_eq!(rect.x, 600.0);
}

#[test]
fn screen_y_always_follows_world_y() {
    // No vertical scroll: the target's bottom tracks its world y exactly.
    let mut cam = Camera::new(600.0);
    let mut rect = target_rect();
    cam.set_position((100.0, 250.0), &mut rect);
    assert_relative_eq!(rect.bottom(), 250.0);
    cam.set_position((800.0, 470.0), &mut rect);
    assert_relative_eq!(rect.bottom(), 470.0);
}

// ── Entity transform ──────────────────────────────────────────────────────────

#[test]
fn apply_holds_the_spawn_snapshot_invariant() {
    // screen.x = start_x + (offset − camera_delta) × parallax, every frame.
    let mut cam = Camera::new(600.0);
    let mut rect = target_rect();
    cam.set_position((700.0, 400.0), &mut rect); // offset = -100

    // Spawned before any scroll: delta 0.
    let mut early = Platform::new(0, 1000.0, 100.0, 200.0, 0.0);
    cam.apply(&mut early.spr, 1.0);
    assert_relative_eq!(early.spr.screen.x, 900.0);

    // Spawned mid-scroll: its snapshot keeps it put at the apply instant.
    let mut late = Platform::new(1, 1500.0, 100.0, 200.0, cam.offset);
    cam.apply(&mut late.spr, 1.0);
    assert_relative_eq!(late.spr.screen.x, 1500.0);

    // Further scroll shifts both by the same world distance.
    cam.set_position((750.0, 400.0), &mut rect);
    cam.apply(&mut early.spr, 1.0);
    cam.apply(&mut late.spr, 1.0);
    assert_relative_eq!(early.spr.screen.x, 850.0);
    assert_relative_eq!(late.spr.screen.x, 1450.0);
}

#[test]
fn parallax_scales_the_scroll() {
    let mut cam = Camera::new(600.0);
    let mut rect = target_rect();
    cam.set_position((700.0, 400.0), &mut rect); // offset = -100

    let mut sky = Background::new(Layer::Sky, 0.0, 0.0);
    cam.apply(&mut sky.spr, 0.1);
    assert_relative_eq!(sky.spr.screen.x, -10.0);

    let mut grass = Background::new(Layer::Grass, 0.0, 0.0);
    cam.apply(&mut grass.spr, 1.5);
    assert_relative_eq!(grass.spr.screen.x, -150.0);
}

// ── Glitch nudge ──────────────────────────────────────────────────────────────

#[test]
fn nudge_perturbs_relative_to_the_tracked_position() {
    let mut cam = Camera::new(600.0);
    let mut rect = target_rect();

    cam.set_position((700.0, 400.0), &mut rect);
    cam.nudge(15.0);
    assert_relative_eq!(cam.offset, -85.0); // 600 − 700 + 15

    cam.set_position((300.0, 400.0), &mut rect);
    cam.nudge(-7.0);
    assert_relative_eq!(cam.offset, -7.0);
}
