mod display;
mod sound;

use std::fs;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal,
    ExecutableCommand, QueueableCommand,
};
use rand::thread_rng;
use serde::{Deserialize, Serialize};

use jumper::audio::Volumes;
use jumper::game::{Input, Phase, Session};
use jumper::level::GenConfig;
use sound::SoundPlayer;

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

// ── Settings & records persistence ────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
struct Records {
    best_level: u32,
    best_time: f32,
}

fn home_file(name: &str) -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(name)
}

fn settings_path() -> PathBuf {
    home_file(".jumper_settings.json")
}

fn records_path() -> PathBuf {
    home_file(".jumper_records.json")
}

fn load_settings() -> Volumes {
    fs::read_to_string(settings_path())
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

fn save_settings(volumes: &Volumes) {
    if let Ok(json) = serde_json::to_string_pretty(volumes) {
        let _ = fs::write(settings_path(), json);
    }
}

fn load_records() -> Records {
    fs::read_to_string(records_path())
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

fn save_records(records: &Records) {
    if let Ok(json) = serde_json::to_string_pretty(records) {
        let _ = fs::write(records_path(), json);
    }
}

fn update_records(records: &mut Records, session: &Session) {
    records.best_level = records.best_level.max(session.level());
    records.best_time = records.best_time.max(session.round_time());
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Play,
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    records: Records,
    volumes: &mut Volumes,
) -> std::io::Result<MenuResult> {
    loop {
        draw_menu(out, records)?;
        if let Ok(Event::Key(KeyEvent { code, kind, .. })) = rx.recv() {
            if kind != KeyEventKind::Press {
                continue;
            }
            match code {
                KeyCode::Char(' ') | KeyCode::Enter => return Ok(MenuResult::Play),
                KeyCode::Char('s') | KeyCode::Char('S') => {
                    show_settings(out, rx, volumes)?;
                    save_settings(volumes);
                }
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            }
        }
    }
}

fn draw_menu<W: Write>(out: &mut W, records: Records) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "★  J U M P E R  ★";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(6),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    if records.best_level > 0 {
        let best = format!(
            "Best: level {}  ·  {:.0}s survived",
            records.best_level, records.best_time
        );
        out.queue(cursor::MoveTo(
            cx.saturating_sub(best.chars().count() as u16 / 2),
            cy.saturating_sub(4),
        ))?;
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(Print(&best))?;
    }

    let options: &[(&str, &str)] = &[
        ("SPACE", "Play — push your way across the gaps"),
        ("S", "Settings — volumes"),
        ("Q", "Quit"),
    ];
    for (i, (key, desc)) in options.iter().enumerate() {
        out.queue(cursor::MoveTo(cx.saturating_sub(16), cy.saturating_sub(1) + i as u16))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{key}] ")))?;
        out.queue(style::SetForegroundColor(Color::White))?;
        out.queue(Print(*desc))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(16), cy + 4))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("In game: SPACE pushes forward, ESC pauses."))?;

    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

// ── Settings form ─────────────────────────────────────────────────────────────

const SETTING_NAMES: [&str; 3] = ["Master", "Music", "Effects"];

fn setting_field(volumes: &mut Volumes, index: usize) -> &mut f32 {
    match index {
        0 => &mut volumes.master,
        1 => &mut volumes.music,
        _ => &mut volumes.effects,
    }
}

fn show_settings<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    volumes: &mut Volumes,
) -> std::io::Result<()> {
    let mut selected = 0usize;
    loop {
        draw_settings(out, volumes, selected)?;
        if let Ok(Event::Key(KeyEvent { code, kind, .. })) = rx.recv() {
            if kind != KeyEventKind::Press {
                continue;
            }
            match code {
                KeyCode::Up => selected = selected.saturating_sub(1),
                KeyCode::Down => selected = (selected + 1).min(SETTING_NAMES.len() - 1),
                KeyCode::Left => {
                    let field = setting_field(volumes, selected);
                    *field = (*field - 0.1).clamp(0.0, 1.0);
                }
                KeyCode::Right => {
                    let field = setting_field(volumes, selected);
                    *field = (*field + 0.1).clamp(0.0, 1.0);
                }
                KeyCode::Esc | KeyCode::Enter => return Ok(()),
                _ => {}
            }
        }
    }
}

fn draw_settings<W: Write>(
    out: &mut W,
    volumes: &Volumes,
    selected: usize,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    out.queue(cursor::MoveTo(cx.saturating_sub(4), cy.saturating_sub(4)))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print("Settings"))?;

    let values = [volumes.master, volumes.music, volumes.effects];
    for (i, (name, value)) in SETTING_NAMES.iter().zip(values).enumerate() {
        let filled = (value * 10.0).round() as usize;
        let bar: String = "█".repeat(filled) + &"─".repeat(10 - filled.min(10));
        let marker = if i == selected { "▸" } else { " " };
        out.queue(cursor::MoveTo(cx.saturating_sub(14), cy.saturating_sub(2) + i as u16))?;
        out.queue(style::SetForegroundColor(if i == selected {
            Color::White
        } else {
            Color::DarkGrey
        }))?;
        out.queue(Print(format!("{marker} {name:<8} [{bar}] {value:.1}")))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(14), cy + 3))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("↑↓ select   ←→ adjust   ESC done"))?;

    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

enum RoundResult {
    ToMenu,
    Quit,
}

fn game_loop<W: Write>(
    out: &mut W,
    session: &mut Session,
    rx: &mpsc::Receiver<Event>,
    volumes: &Volumes,
    sound: &SoundPlayer,
    records: &mut Records,
) -> std::io::Result<RoundResult> {
    let mut rng = thread_rng();
    let mut prev = Instant::now();

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        let mut input = Input::default();
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = ev
            else {
                continue;
            };
            if kind != KeyEventKind::Press {
                continue;
            }
            match code {
                KeyCode::Char(' ') => {
                    if session.phase() == Phase::GameOver {
                        // Record the finished round before wiping it.
                        update_records(records, session);
                        session.restart();
                    } else {
                        input.push = true;
                    }
                }
                KeyCode::Esc => input.pause_toggle = true,
                KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(RoundResult::ToMenu),
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(RoundResult::Quit);
                }
                _ => {}
            }
        }

        let now = Instant::now();
        let dt = (now - prev).as_secs_f32().min(0.1);
        prev = now;

        session.frame(dt, input, &mut rng);
        for event in session.drain_sounds() {
            sound.play(event, volumes);
        }

        let fps = if dt > 0.0 { 1.0 / dt } else { 0.0 };
        display::render(out, session, fps)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> anyhow::Result<()> {
    // Assets and generator bounds are validated before the first frame;
    // anything wrong here aborts the program, not a round.
    let assets = display::assets().context("sprite art is missing animation frames")?;

    let mut volumes = load_settings();
    let mut records = load_records();
    let sound = SoundPlayer::new();

    loop {
        match show_menu(out, rx, records, &mut volumes)? {
            MenuResult::Quit => break,
            MenuResult::Play => {
                let mut session = Session::new(assets, GenConfig::default())
                    .context("generator configuration rejected")?;

                let result = game_loop(out, &mut session, rx, &volumes, &sound, &mut records)?;

                update_records(&mut records, &session);
                save_records(&records);

                if matches!(result, RoundResult::Quit) {
                    break;
                }
                // Otherwise loop back to the menu
            }
        }
    }
    Ok(())
}
