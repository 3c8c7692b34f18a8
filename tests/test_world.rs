use rand::rngs::StdRng;
use rand::SeedableRng;

use jumper::anim::{Assets, ClipId, ClipLibrary};
use jumper::audio::SoundEvent;
use jumper::entities::{Bomb, Enemy};
use jumper::game::{Input, Phase, Session};
use jumper::level::GenConfig;
use jumper::world::World;
use jumper::HEIGHT;

fn assets() -> Assets {
    Assets {
        player: ClipLibrary::new(&[(ClipId::Jump, 4), (ClipId::Landing, 3), (ClipId::Die, 6)])
            .unwrap(),
        enemy: ClipLibrary::new(&[(ClipId::Jump, 4), (ClipId::Landing, 3), (ClipId::Die, 6)])
            .unwrap(),
        bomb: ClipLibrary::new(&[(ClipId::Fire, 2), (ClipId::Boom, 2)]).unwrap(),
    }
}

/// Generator config with nothing hostile in it, for scenarios that need
/// the player to survive.
fn calm_config() -> GenConfig {
    GenConfig {
        max_enemies: 0,
        bomb_chance: 0.0,
        ..GenConfig::default()
    }
}

fn calm_world() -> World {
    World::new(assets(), calm_config()).unwrap()
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

const DT: f32 = 1.0 / 60.0;

// ── Initial layout ────────────────────────────────────────────────────────────

#[test]
fn reset_produces_the_starting_round_layout() {
    let world = calm_world();
    assert_eq!(world.platforms.len(), 1);
    assert_eq!(world.platforms[0].spr.start_pos.0, 30.0);
    assert_eq!(world.platforms[0].height, 100.0);
    assert_eq!(world.platforms[0].length, 500.0);

    let player = world.player.as_ref().unwrap();
    assert_eq!(player.pos, (50.0, 300.0));
    assert_eq!(player.jump_speed, 300.0);
    assert!(player.airborne);

    // One tile per parallax layer.
    assert_eq!(world.tiles.len(), 5);
}

// ── Push + jump scenario ──────────────────────────────────────────────────────

#[test]
fn push_leaves_the_player_airborne_and_mid_push() {
    let mut world = calm_world();
    let mut rng = rng();

    world.step(DT, true, &mut rng);
    for _ in 0..9 {
        world.step(DT, false, &mut rng);
    }

    // ~0.16s after the trigger: airborne, push still in flight.
    let player = world.player.as_ref().unwrap();
    assert!(player.airborne);
    assert!(player.jump_phase > 0.0);
    assert!(player.in_push);
    let displacement = player.pos.0 - player.move_pos.0;
    assert!(displacement > 0.0, "push never moved the player");
    assert!(displacement < 80.0, "push overshot its distance");
}

#[test]
fn push_stops_within_epsilon_of_its_distance() {
    let mut world = calm_world();
    let mut rng = rng();

    world.step(DT, true, &mut rng);
    let mut steps = 0;
    while world.player.as_ref().unwrap().in_push {
        world.step(DT, false, &mut rng);
        steps += 1;
        assert!(steps < 120, "push never terminated");
    }
    let player = world.player.as_ref().unwrap();
    let displacement = player.pos.0 - player.move_pos.0;
    assert!(
        (79.0..=80.0).contains(&displacement),
        "push stopped at {displacement}, expected within 1.0 of 80"
    );
}

#[test]
fn push_sound_is_emitted_on_trigger() {
    let mut world = calm_world();
    let mut rng = rng();
    world.step(DT, true, &mut rng);
    assert!(world.sounds.contains(&SoundEvent::Push));
}

// ── Level counting ────────────────────────────────────────────────────────────

#[test]
fn hovering_one_platform_counts_it_exactly_once() {
    let mut world = calm_world();
    let mut rng = rng();

    world.step(DT, false, &mut rng);
    assert_eq!(world.player.as_ref().unwrap().level, 1);

    // A second of bouncing in place must not re-count it.
    for _ in 0..60 {
        world.step(DT, false, &mut rng);
    }
    assert_eq!(world.player.as_ref().unwrap().level, 1);
}

#[test]
fn crossing_to_the_next_platform_increments_the_level_once() {
    let mut world = calm_world();
    let mut rng = rng();

    // Controlled terrain: a second platform just past the first (same
    // top), and a far frontier platform that parks the generator.
    world.spawn_platform(560.0, 100.0, 500.0);
    world.spawn_platform(5000.0, 100.0, 400.0);

    let mut frames = 0;
    while world.player.as_ref().map(|p| p.level) < Some(2) {
        let push = {
            let p = world.player.as_ref().expect("player died in calm terrain");
            !p.in_push && !p.dying
        };
        world.step(DT, push, &mut rng);
        frames += 1;
        assert!(frames < 4000, "player never reached the second platform");
    }

    // Crossing happened exactly once; bouncing on it adds nothing.
    for _ in 0..60 {
        world.step(DT, false, &mut rng);
    }
    assert_eq!(world.player.as_ref().unwrap().level, 2);
}

// ── Culling ───────────────────────────────────────────────────────────────────

#[test]
fn entities_behind_the_camera_are_removed_the_same_frame() {
    let mut world = calm_world();
    let mut rng = rng();

    // A platform fully left of the screen: gone after one step.
    let id = world.spawn_platform(-300.0, 50.0, 200.0);
    world.step(DT, false, &mut rng);
    assert!(world.platform(id).is_none());
}

#[test]
fn entities_fallen_below_the_screen_are_removed_the_same_frame() {
    let mut world = calm_world();
    let mut rng = rng();

    world
        .enemies
        .push(Enemy::new((400.0, HEIGHT + 150.0), 0.0, false, 0.0));
    world.bombs.push(Bomb::new((450.0, HEIGHT + 150.0), 0.0));

    world.step(DT, false, &mut rng);
    assert!(world.enemies.is_empty());
    assert!(world.bombs.is_empty());
}

#[test]
fn player_falling_out_of_the_world_dies_instead_of_vanishing() {
    let mut world = calm_world();
    let mut rng = rng();

    let player = world.player.as_mut().unwrap();
    player.pos = (50.0, HEIGHT + 200.0);
    player.move_pos = player.pos;

    world.step(DT, false, &mut rng);
    let player = world.player.as_ref().unwrap();
    assert!(player.dying, "the fall should request death");

    // Removal follows once the die clip completes.
    let mut steps = 0;
    while world.player.is_some() {
        world.step(DT, false, &mut rng);
        steps += 1;
        assert!(steps < 120, "dying player was never removed");
    }
}

// ── Stomp kills ───────────────────────────────────────────────────────────────

#[test]
fn player_landing_on_an_enemy_head_kills_it() {
    let mut world = calm_world();
    let mut rng = rng();

    // Enemy head just under the player's feet, offset so exactly two of
    // its top sample points sit inside the player rect.
    world
        .enemies
        .push(Enemy::new((45.0, 339.0), 0.0, false, 0.0));

    world.step(DT, false, &mut rng);
    assert!(world.enemies[0].dying);

    // The die clip runs its course, then the enemy is dropped.
    let mut steps = 0;
    while !world.enemies.is_empty() {
        world.step(DT, false, &mut rng);
        steps += 1;
        assert!(steps < 120, "dying enemy was never removed");
    }
}

// ── Bombs ─────────────────────────────────────────────────────────────────────

#[test]
fn bomb_telegraphs_then_blasts_then_disappears() {
    let mut world = calm_world();
    let mut rng = rng();

    // Overlapping the player's spawn rect: triggers on the first frame.
    world.bombs.push(Bomb::new((55.0, 300.0), 0.0));

    let dt = 0.05;
    // Fire clip: 2 frames × 0.3s — the dodge window. No deaths yet.
    for _ in 0..10 {
        world.step(dt, false, &mut rng);
        assert!(
            !world.player.as_ref().unwrap().dying,
            "blast fired during the telegraph window"
        );
    }

    // Let the telegraph finish and the blast resolve.
    let mut steps = 0;
    while world
        .player
        .as_ref()
        .map(|p| !p.dying)
        .unwrap_or(false)
    {
        world.step(dt, false, &mut rng);
        steps += 1;
        assert!(steps < 60, "bomb never detonated");
    }
    assert!(world.sounds.contains(&SoundEvent::Boom));

    // Boom clip finishes and the bomb is removed.
    let mut steps = 0;
    while !world.bombs.is_empty() {
        world.step(dt, false, &mut rng);
        steps += 1;
        assert!(steps < 60, "bomb was never removed after booming");
    }
}

// ── Session state machine ─────────────────────────────────────────────────────

#[test]
fn pause_freezes_the_simulation() {
    let mut session = Session::new(assets(), calm_config()).unwrap();
    let mut rng = rng();

    session.frame(DT, Input::default(), &mut rng);
    let before = session.world.player.as_ref().unwrap().jump_phase;

    session.frame(
        DT,
        Input {
            pause_toggle: true,
            ..Input::default()
        },
        &mut rng,
    );
    assert_eq!(session.phase(), Phase::Paused);

    for _ in 0..10 {
        session.frame(DT, Input::default(), &mut rng);
    }
    let after = session.world.player.as_ref().unwrap().jump_phase;
    assert_eq!(before, after, "physics advanced while paused");

    session.frame(
        DT,
        Input {
            pause_toggle: true,
            ..Input::default()
        },
        &mut rng,
    );
    assert_eq!(session.phase(), Phase::Playing);
}

#[test]
fn round_time_freezes_while_the_player_is_dying() {
    let mut session = Session::new(assets(), calm_config()).unwrap();
    let mut rng = rng();

    let dt = 0.01;
    for _ in 0..10 {
        session.frame(dt, Input::default(), &mut rng);
    }
    let alive_time = session.round_time();
    assert!(alive_time > 0.0);

    session.world.player.as_mut().unwrap().dying = true;
    for _ in 0..5 {
        session.frame(dt, Input::default(), &mut rng);
    }
    assert_eq!(session.round_time(), alive_time);
}

#[test]
fn game_over_follows_the_player_death_sequence_and_jitters() {
    let mut session = Session::new(assets(), calm_config()).unwrap();
    let mut rng = rng();

    session.world.player.as_mut().unwrap().dying = true;

    // Die clip: 6 frames × 0.05s, then removal, then the phase flips.
    let mut frames = 0;
    while session.phase() == Phase::Playing {
        session.frame(DT, Input::default(), &mut rng);
        frames += 1;
        assert!(frames < 200, "game over never arrived");
    }
    assert_eq!(session.phase(), Phase::GameOver);
    assert!(session.world.player.is_none());

    // The first game-over frame arms and fires a camera jolt.
    session.frame(DT, Input::default(), &mut rng);
    assert!(
        session.world.camera.offset != 0.0,
        "game-over glitch never moved the camera"
    );

    // The level survives the player's removal for the overlay.
    assert_eq!(session.level(), 1);
}

#[test]
fn restart_wipes_the_round_wholesale() {
    let mut session = Session::new(assets(), GenConfig::default()).unwrap();
    let mut rng = rng();

    for _ in 0..120 {
        session.frame(DT, Input { push: true, ..Input::default() }, &mut rng);
    }

    session.restart();
    assert_eq!(session.phase(), Phase::Playing);
    assert_eq!(session.level(), 0);
    assert_eq!(session.round_time(), 0.0);
    assert_eq!(session.world.platforms.len(), 1);
    assert_eq!(session.world.camera.offset, 0.0);
    let player = session.world.player.as_ref().unwrap();
    assert_eq!(player.pos, (50.0, 300.0));
    assert_eq!(player.level, 0);
}

#[test]
fn drained_sounds_do_not_repeat() {
    let mut session = Session::new(assets(), calm_config()).unwrap();
    let mut rng = rng();

    session.frame(DT, Input { push: true, ..Input::default() }, &mut rng);
    let first = session.drain_sounds();
    assert!(first.contains(&SoundEvent::Push));
    assert!(session.drain_sounds().is_empty());
}
