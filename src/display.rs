//! Rendering layer — all terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! session.  No game logic is performed; this module scales world
//! coordinates to terminal cells and composites the fixed back-to-front
//! order: sky → back → middle → fore → platforms → bombs → player →
//! enemies → grass → HUD text.
//!
//! The sprite art below is also the asset source: [`assets`] derives the
//! core's clip libraries from the frame arrays, so art and animation
//! lengths cannot drift apart.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use jumper::anim::{Assets, ClipId, ClipLibrary};
use jumper::entities::{Background, Layer, Rect};
use jumper::error::GameError;
use jumper::game::{Phase, Session};
use jumper::{HEIGHT, WIDTH};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_PLATFORM: Color = Color::DarkRed;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_BOMB: Color = Color::Yellow;
const C_SKY: Color = Color::DarkBlue;
const C_BACK: Color = Color::DarkGrey;
const C_MIDDLE: Color = Color::Grey;
const C_FORE: Color = Color::DarkYellow;
const C_GRASS: Color = Color::DarkGreen;
const C_HUD_TIME: Color = Color::Green;
const C_HUD_LEVEL: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;

// ── Sprite art ────────────────────────────────────────────────────────────────

const PLAYER_JUMP: [[&str; 2]; 4] = [
    ["\\o/", " | "],
    [" o ", "/|\\"],
    [" o ", "-|-"],
    [" o ", "/|\\"],
];
const PLAYER_LANDING: [[&str; 2]; 3] = [
    [" o ", "_|_"],
    [" o ", "/|\\"],
    [" o ", " | "],
];
const PLAYER_DIE: [[&str; 2]; 6] = [
    [" x ", "/|\\"],
    [" x ", "-|-"],
    [" x ", " | "],
    ["   ", " x "],
    ["   ", " . "],
    ["   ", "   "],
];

const ENEMY_JUMP: [&str; 4] = ["(o>", "(o>", "(0>", "(o>"];
const ENEMY_LANDING: [&str; 3] = ["(o>", "(_>", "(o>"];
const ENEMY_DIE: [&str; 6] = ["(x>", "-x-", " * ", " * ", " . ", "   "];

const BOMB_FIRE: [&str; 4] = ["*", "o", "*", "O"];
const BOMB_BOOM: [&str; 4] = ["#", "@", "*", "."];

/// Clip libraries derived from the art above.  Fails (before the
/// simulation starts) if any referenced clip has no frames.
pub fn assets() -> Result<Assets, GameError> {
    Ok(Assets {
        player: ClipLibrary::new(&[
            (ClipId::Jump, PLAYER_JUMP.len()),
            (ClipId::Landing, PLAYER_LANDING.len()),
            (ClipId::Die, PLAYER_DIE.len()),
        ])?,
        enemy: ClipLibrary::new(&[
            (ClipId::Jump, ENEMY_JUMP.len()),
            (ClipId::Landing, ENEMY_LANDING.len()),
            (ClipId::Die, ENEMY_DIE.len()),
        ])?,
        bomb: ClipLibrary::new(&[
            (ClipId::Fire, BOMB_FIRE.len()),
            (ClipId::Boom, BOMB_BOOM.len()),
        ])?,
    })
}

/// Mirror a small sprite row for horizontally flipped entities.
fn mirror(row: &str) -> String {
    row.chars()
        .rev()
        .map(|c| match c {
            '(' => ')',
            ')' => '(',
            '<' => '>',
            '>' => '<',
            '/' => '\\',
            '\\' => '/',
            other => other,
        })
        .collect()
}

// ── Coordinate scaling ────────────────────────────────────────────────────────

/// World→cell mapping for the current terminal size.  Row 0 is the HUD,
/// the last row is the hint line; the play area is everything between.
#[derive(Clone, Copy)]
struct Grid {
    w: u16,
    h: u16,
}

impl Grid {
    fn col(&self, x: f32) -> i32 {
        (x * self.w as f32 / WIDTH).floor() as i32
    }

    fn row(&self, y: f32) -> i32 {
        1 + (y * (self.h.saturating_sub(2)) as f32 / HEIGHT).floor() as i32
    }

    fn bottom_row(&self) -> i32 {
        self.h as i32 - 1
    }

    fn visible(&self, col: i32, row: i32) -> bool {
        col >= 0 && col < self.w as i32 && row >= 1 && row < self.bottom_row()
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, session: &Session, fps: f32) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (w, h) = terminal::size()?;
    let grid = Grid { w, h };
    let world = &session.world;

    for (layer, color) in [
        (Layer::Sky, C_SKY),
        (Layer::Back, C_BACK),
        (Layer::Middle, C_MIDDLE),
        (Layer::Fore, C_FORE),
    ] {
        draw_layer(out, &grid, &world.tiles, layer, color)?;
    }

    out.queue(style::SetForegroundColor(C_PLATFORM))?;
    for platform in &world.platforms {
        draw_platform(out, &grid, &platform.spr.screen)?;
    }

    out.queue(style::SetForegroundColor(C_BOMB))?;
    for bomb in &world.bombs {
        let (clip, frame) = bomb.spr.anim.shown();
        let glyph = match clip {
            ClipId::Boom => BOMB_BOOM[frame % BOMB_BOOM.len()],
            _ => BOMB_FIRE[frame % BOMB_FIRE.len()],
        };
        draw_rows(out, &grid, &bomb.spr.screen, &[glyph], false)?;
    }

    if let Some(player) = &world.player {
        let (clip, frame) = player.spr.anim.shown();
        let art: &[&str; 2] = match clip {
            ClipId::Landing => &PLAYER_LANDING[frame % PLAYER_LANDING.len()],
            ClipId::Die => &PLAYER_DIE[frame % PLAYER_DIE.len()],
            _ => &PLAYER_JUMP[frame % PLAYER_JUMP.len()],
        };
        out.queue(style::SetForegroundColor(C_PLAYER))?;
        draw_rows(out, &grid, &player.spr.screen, art, player.spr.flipped)?;
    }

    out.queue(style::SetForegroundColor(C_ENEMY))?;
    for enemy in &world.enemies {
        let (clip, frame) = enemy.spr.anim.shown();
        let row = match clip {
            ClipId::Landing => ENEMY_LANDING[frame % ENEMY_LANDING.len()],
            ClipId::Die => ENEMY_DIE[frame % ENEMY_DIE.len()],
            _ => ENEMY_JUMP[frame % ENEMY_JUMP.len()],
        };
        draw_rows(out, &grid, &enemy.spr.screen, &[row], enemy.spr.flipped)?;
    }

    draw_layer(out, &grid, &world.tiles, Layer::Grass, C_GRASS)?;
    draw_hud(out, &grid, session, fps)?;

    match session.phase() {
        Phase::GameOver => draw_game_over(out, &grid, session)?,
        Phase::Paused => draw_paused(out, &grid)?,
        Phase::Playing => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, h.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Background layers ─────────────────────────────────────────────────────────

/// Per-layer glyph pattern: a repeated character at a fixed depth band,
/// offset by the tile's scrolled position.
fn layer_pattern(layer: Layer) -> (&'static str, f32, f32) {
    // (glyph, world-space spacing, depth 0..1 of the band within the play area)
    match layer {
        Layer::Sky => ("·", 90.0, 0.08),
        Layer::Back => ("^", 70.0, 0.35),
        Layer::Middle => ("~", 50.0, 0.55),
        Layer::Fore => ("▒", 40.0, 0.78),
        Layer::Grass => ("\"", 30.0, 0.97),
    }
}

fn draw_layer<W: Write>(
    out: &mut W,
    grid: &Grid,
    tiles: &[Background],
    layer: Layer,
    color: Color,
) -> std::io::Result<()> {
    let (glyph, spacing, depth) = layer_pattern(layer);
    let row = grid.row(HEIGHT * depth);
    out.queue(style::SetForegroundColor(color))?;
    for tile in tiles.iter().filter(|t| t.layer == layer) {
        let mut x = tile.spr.screen.x;
        while x < tile.spr.screen.right() {
            let col = grid.col(x);
            if grid.visible(col, row) {
                out.queue(cursor::MoveTo(col as u16, row as u16))?;
                out.queue(Print(glyph))?;
            }
            x += spacing;
        }
    }
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_platform<W: Write>(out: &mut W, grid: &Grid, rect: &Rect) -> std::io::Result<()> {
    let top = grid.row(rect.top()).max(1);
    let left = grid.col(rect.left()).max(0);
    let right = grid.col(rect.right()).min(grid.w as i32);
    if right <= left {
        return Ok(());
    }
    let span = "█".repeat((right - left) as usize);
    for row in top..grid.bottom_row() {
        out.queue(cursor::MoveTo(left as u16, row as u16))?;
        out.queue(Print(&span))?;
    }
    Ok(())
}

/// Draw a small multi-row sprite anchored at the rect's bottom-left cell.
fn draw_rows<W: Write>(
    out: &mut W,
    grid: &Grid,
    rect: &Rect,
    rows: &[&str],
    flipped: bool,
) -> std::io::Result<()> {
    let base_col = grid.col(rect.left());
    let bottom = grid.row(rect.bottom());
    for (i, raw) in rows.iter().enumerate() {
        let row = bottom - rows.len() as i32 + i as i32;
        let text = if flipped {
            mirror(raw)
        } else {
            (*raw).to_string()
        };
        for (j, ch) in text.chars().enumerate() {
            if ch == ' ' {
                continue;
            }
            let col = base_col + j as i32;
            if grid.visible(col, row) {
                out.queue(cursor::MoveTo(col as u16, row as u16))?;
                out.queue(Print(ch))?;
            }
        }
    }
    Ok(())
}

// ── HUD ───────────────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    grid: &Grid,
    session: &Session,
    fps: f32,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_TIME))?;
    out.queue(Print(format!("Time: {:>4.0}s", session.round_time())))?;

    let level_text = format!("Level: {}", session.level());
    let rx = grid.w.saturating_sub(level_text.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
    out.queue(Print(&level_text))?;

    out.queue(cursor::MoveTo(1, grid.h.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("SPACE : Push   ESC : Pause   Q : Menu"))?;

    let fps_text = format!("{fps:>3.0} fps");
    let fx = grid.w.saturating_sub(fps_text.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(fx, grid.h.saturating_sub(1)))?;
    out.queue(Print(&fps_text))?;

    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_centered_lines<W: Write>(
    out: &mut W,
    grid: &Grid,
    lines: &[(String, Color)],
) -> std::io::Result<()> {
    let cx = grid.w / 2;
    let start_row = (grid.h / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }
    Ok(())
}

fn draw_game_over<W: Write>(out: &mut W, grid: &Grid, session: &Session) -> std::io::Result<()> {
    let lines = [
        ("╔══════════════════╗".to_string(), Color::Red),
        ("║    GAME  OVER    ║".to_string(), Color::Red),
        ("╚══════════════════╝".to_string(), Color::Red),
        (
            format!(
                "Level {}   Time {:.0}s",
                session.level(),
                session.round_time()
            ),
            Color::Yellow,
        ),
        ("SPACE - Restart   Q - Menu".to_string(), Color::White),
    ];
    draw_centered_lines(out, grid, &lines)
}

fn draw_paused<W: Write>(out: &mut W, grid: &Grid) -> std::io::Result<()> {
    let lines = [
        ("╔══════════════╗".to_string(), Color::Cyan),
        ("║    PAUSED    ║".to_string(), Color::Cyan),
        ("╚══════════════╝".to_string(), Color::Cyan),
        ("ESC - Resume   Q - Menu".to_string(), Color::White),
    ];
    draw_centered_lines(out, grid, &lines)
}
