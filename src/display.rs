//! Rendering layer: all terminal I/O lives here.
//!
//! Each function receives a mutable writer and a read-only view of the
//! simulation.  No game logic is performed; this module only projects the
//! arena onto the terminal as a top-down radar.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use glam::Vec3;
use shooting_range::ammo::ReloadPhase;
use shooting_range::entities::{Body, ColorTag};
use shooting_range::state::SimulationState;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_AMMO: Color = Color::White;
const C_HUD_RELOAD: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_PROJECTILE: Color = Color::Yellow;
const C_HIT: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;

/// Presentation-only state the driver keeps between frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct View {
    pub yaw: f32,
    pub pitch: f32,
    /// Points to flash over the arena, with frames left to show them.
    pub hit_flash: Option<(u32, u32)>,
}

/// Screen rectangle the world's XZ square is projected onto.
struct Arena {
    left: u16,
    top: u16,
    cols: u16,
    rows: u16,
    half_extent: f32,
}

impl Arena {
    fn new(width: u16, height: u16, half_extent: f32) -> Self {
        Arena {
            left: 1,
            top: 2,
            cols: width.saturating_sub(2).max(1),
            rows: height.saturating_sub(4).max(1),
            half_extent,
        }
    }

    /// Map world XZ to a cell; `None` when outside the arena.
    fn project(&self, p: Vec3) -> Option<(u16, u16)> {
        let span = 2.0 * self.half_extent;
        let u = (p.x + self.half_extent) / span;
        let v = (p.z + self.half_extent) / span;
        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
            return None;
        }
        let col = self.left + (u * (self.cols - 1) as f32).round() as u16;
        let row = self.top + (v * (self.rows - 1) as f32).round() as u16;
        Some((col, row))
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, state: &SimulationState, view: &View) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let arena = Arena::new(width, height, state.tuning().world_half_extent);

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, width, height)?;
    draw_hud(out, state, view, width)?;

    // Debris first so targets and shots stay visible on top of it
    for fragment in state.fragments().iter_alive() {
        draw_body(out, &arena, fragment, "·")?;
    }
    for target in state.targets().iter_alive() {
        draw_body(out, &arena, target, "■")?;
    }
    for projectile in state.projectiles().iter_alive() {
        draw_body(out, &arena, projectile, "•")?;
    }

    draw_player(out, &arena, state.viewpoint(), view.yaw)?;

    if let Some((points, _)) = view.hit_flash {
        draw_hit_flash(out, &arena, points)?;
    }

    draw_controls_hint(out, height)?;

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1: top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2: bottom bar
    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    state: &SimulationState,
    view: &View,
    width: u16,
) -> std::io::Result<()> {
    // Score, left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {:>6}", state.score())))?;

    // Aim and frame rate, centre
    let delta = state.clock().delta();
    let fps = if delta > 0.0 { 1.0 / delta } else { 0.0 };
    let aim_str = format!(
        "yaw {:>4.0}°  pitch {:>3.0}°  {:>3.0} fps",
        view.yaw.to_degrees().rem_euclid(360.0),
        view.pitch.to_degrees(),
        fps
    );
    let ax = (width / 2).saturating_sub(aim_str.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(ax, 0))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(&aim_str))?;

    // Ammo, right
    let ammo = state.ammo();
    let reloading = state.reload_phase() == ReloadPhase::Reloading;
    let ammo_str = if reloading {
        format!("Ammo: {}/{} (reloading...)", ammo.current, ammo.max)
    } else {
        format!("Ammo: {}/{}", ammo.current, ammo.max)
    };
    let rx = width.saturating_sub(ammo_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(if reloading {
        C_HUD_RELOAD
    } else {
        C_HUD_AMMO
    }))?;
    out.queue(Print(&ammo_str))?;

    Ok(())
}

// ── Bodies ────────────────────────────────────────────────────────────────────

fn draw_body<W: Write>(out: &mut W, arena: &Arena, body: &Body, glyph: &str) -> std::io::Result<()> {
    let Some((col, row)) = arena.project(body.position) else {
        return Ok(());
    };
    let color = body.color().map(hue_color).unwrap_or(C_PROJECTILE);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

fn draw_player<W: Write>(out: &mut W, arena: &Arena, at: Vec3, yaw: f32) -> std::io::Result<()> {
    // The player can walk off the arena; nothing to draw then
    let Some((col, row)) = arena.project(at) else {
        return Ok(());
    };
    // Yaw 0 faces -Z, which is up on screen
    const ARROWS: [&str; 8] = ["↑", "↗", "→", "↘", "↓", "↙", "←", "↖"];
    let octant = (yaw / std::f32::consts::FRAC_PI_4).round().rem_euclid(8.0) as usize;
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(C_PLAYER))?;
    out.queue(Print(ARROWS[octant % 8]))?;
    Ok(())
}

fn draw_hit_flash<W: Write>(out: &mut W, arena: &Arena, points: u32) -> std::io::Result<()> {
    let text = format!("+{}", points);
    let col = (arena.left + arena.cols / 2).saturating_sub(text.len() as u16 / 2);
    let row = arena.top + arena.rows * 45 / 100;
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(C_HIT))?;
    out.queue(Print(text))?;
    Ok(())
}

/// HSL(hue, 0.8, 0.6) → terminal RGB.
fn hue_color(tag: ColorTag) -> Color {
    let (s, l) = (0.8_f32, 0.6_f32);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let h = tag.0.rem_euclid(1.0) * 6.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    let to_u8 = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Color::Rgb {
        r: to_u8(r),
        g: to_u8(g),
        b: to_u8(b),
    }
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "W A S D : Move   ← → ↑ ↓ : Aim   SPACE : Shoot   R : Reload   Q : Quit",
    ))?;
    Ok(())
}
