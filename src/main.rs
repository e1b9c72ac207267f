mod config;
mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::Instant;

use anyhow::Context;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use shooting_range::game_loop::{movement_intent, FrameInput, GameLoop};
use shooting_range::tuning::Tuning;

use display::View;

// ── Input constants ───────────────────────────────────────────────────────────

/// Min frames between shots while Space is held.
const SHOOT_COOLDOWN: u32 = 8;

/// A key counts as "held" if its last press/repeat event arrived within this
/// many frames.  Covers terminals that never send release events.
const HOLD_WINDOW: u64 = 4;

/// Radians per second while an arrow key is held.
const TURN_RATE: f32 = 1.8;

const PITCH_LIMIT: f32 = 1.4;

/// Frames the "+N" banner stays up after a kill.
const HIT_FLASH_FRAMES: u32 = 12;

// Scripted player cadence for headless runs
const BOT_FIRE_EVERY: u64 = 10;

fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

/// Unit vector for a yaw/pitch pair; yaw 0 looks down -Z.
fn aim_direction(yaw: f32, pitch: f32) -> Vec3 {
    Vec3::new(
        yaw.sin() * pitch.cos(),
        pitch.sin(),
        -yaw.cos() * pitch.cos(),
    )
}

// ── Logging ───────────────────────────────────────────────────────────────────

enum LogSink {
    Stderr,
    File(File),
    Off,
}

fn init_tracing(sink: LogSink) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let (writer, ansi) = match sink {
        LogSink::Stderr => (BoxMakeWriter::new(std::io::stderr), true),
        LogSink::File(file) => (BoxMakeWriter::new(Mutex::new(file)), false),
        LogSink::Off => (BoxMakeWriter::new(std::io::sink), false),
    };

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(writer)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

// ── Headless driver ───────────────────────────────────────────────────────────

/// Scripted player: aims at the first live target, fires on a fixed cadence,
/// reloads once the magazine is empty.  One JSON diff per line on stdout.
fn run_headless(tuning: Tuning, mut rng: StdRng, frames: u64) -> anyhow::Result<()> {
    let mut game = GameLoop::new(tuning, &mut rng);
    let mut out = BufWriter::new(stdout().lock());

    for n in 0..frames {
        let state = game.state();
        let aim = state
            .targets()
            .iter_alive()
            .next()
            .map(|t| t.position - state.viewpoint())
            .unwrap_or(Vec3::NEG_Z);
        let ammo = state.ammo();

        let input = FrameInput {
            aim,
            fire: n % BOT_FIRE_EVERY == 0 && ammo.current > 0,
            reload: ammo.current == 0 && !ammo.reloading,
            dt: config::HEADLESS_DT,
            ..FrameInput::default()
        };
        let diff = game
            .frame(&input, &mut rng)
            .with_context(|| format!("headless frame {}", n))?;

        serde_json::to_writer(&mut out, &diff).context("encoding frame diff")?;
        out.write_all(b"\n")?;
    }
    out.flush()?;

    info!(frames, score = game.state().score(), "headless run finished");
    Ok(())
}

// ── Interactive driver ────────────────────────────────────────────────────────

/// Input model: every key's last press/repeat frame is kept in `key_frame`;
/// each frame applies all keys that are still fresh at once, so Space, an
/// arrow and WASD can be held together.  Release events (keyboard-enhancement
/// terminals) drop a key immediately; elsewhere it expires after
/// `HOLD_WINDOW` frames of silence.
fn game_loop<W: Write>(
    out: &mut W,
    game: &mut GameLoop,
    rng: &mut StdRng,
    rx: &mpsc::Receiver<Event>,
) -> anyhow::Result<()> {
    let frame_budget = config::frame_interval();
    let move_speed = game.state().tuning().move_speed;

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut view = View::default();
    let mut shoot_cooldown: u32 = 0;
    let mut frame: u64 = 0;
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        let dt = frame_start.duration_since(last).as_secs_f32();
        last = frame_start;
        frame += 1;

        let mut reload = false;

        // ── Drain pending input (non-blocking) ───────────────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(())
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') => reload = true,
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // ── Held keys ────────────────────────────────────────────────────────
        let held = |keys: &[KeyCode]| any_held(&key_frame, keys, frame);

        if held(&[KeyCode::Left]) {
            view.yaw -= TURN_RATE * dt;
        }
        if held(&[KeyCode::Right]) {
            view.yaw += TURN_RATE * dt;
        }
        if held(&[KeyCode::Up]) {
            view.pitch = (view.pitch + TURN_RATE * dt).min(PITCH_LIMIT);
        }
        if held(&[KeyCode::Down]) {
            view.pitch = (view.pitch - TURN_RATE * dt).max(-PITCH_LIMIT);
        }

        let forward = Vec3::new(view.yaw.sin(), 0.0, -view.yaw.cos());
        let right = Vec3::new(view.yaw.cos(), 0.0, view.yaw.sin());
        let mut direction = Vec3::ZERO;
        if held(&[KeyCode::Char('w'), KeyCode::Char('W')]) {
            direction += forward;
        }
        if held(&[KeyCode::Char('s'), KeyCode::Char('S')]) {
            direction -= forward;
        }
        if held(&[KeyCode::Char('d'), KeyCode::Char('D')]) {
            direction += right;
        }
        if held(&[KeyCode::Char('a'), KeyCode::Char('A')]) {
            direction -= right;
        }

        let fire = shoot_cooldown == 0 && held(&[KeyCode::Char(' ')]);
        if fire {
            shoot_cooldown = SHOOT_COOLDOWN;
        }
        shoot_cooldown = shoot_cooldown.saturating_sub(1);

        let input = FrameInput {
            movement: movement_intent(direction, move_speed, dt),
            aim: aim_direction(view.yaw, view.pitch),
            fire,
            reload,
            dt,
        };
        let diff = game
            .frame(&input, rng)
            .with_context(|| format!("frame {}", frame))?;

        view.hit_flash = match view.hit_flash {
            _ if diff.score_delta > 0 => Some((diff.score_delta, HIT_FLASH_FRAMES)),
            Some((points, left)) if left > 1 => Some((points, left - 1)),
            _ => None,
        };

        display::render(out, game.state(), &view).context("drawing frame")?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_budget {
            thread::sleep(frame_budget - elapsed);
        }
    }
}

fn run_interactive(tuning: Tuning, mut rng: StdRng) -> anyhow::Result<()> {
    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Ask for release/repeat events; terminals without the protocol just ignore it
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads live on their own thread so the frame loop never waits on I/O
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let mut game = GameLoop::new(tuning, &mut rng);
    let result = game_loop(&mut out, &mut game, &mut rng, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!(score = game.state().score(), "session ended");
    result
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut args = std::env::args().skip(1);
    let headless = match args.next().as_deref() {
        Some("--headless") => Some(match args.next() {
            Some(n) => n
                .parse::<u64>()
                .with_context(|| format!("invalid frame count {:?}", n))?,
            None => config::DEFAULT_HEADLESS_FRAMES,
        }),
        Some(other) => anyhow::bail!("unknown argument {:?} (expected --headless [frames])", other),
        None => None,
    };

    let sink = if headless.is_some() {
        LogSink::Stderr
    } else {
        match config::log_file() {
            Some(path) => LogSink::File(
                File::create(&path).with_context(|| format!("opening log file {}", path.display()))?,
            ),
            None => LogSink::Off,
        }
    };
    init_tracing(sink);

    let tuning = config::tuning();
    let rng = match config::seed() {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    match headless {
        Some(frames) => run_headless(tuning, rng, frames),
        None => run_interactive(tuning, rng),
    }
}
