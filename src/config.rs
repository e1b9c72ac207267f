//! Runtime settings and environment overrides for gameplay tuning.

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use shooting_range::tuning::Tuning;
use tracing::warn;

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparseable setting");
            None
        }
    }
}

/// Like [`env_parse`] but only accepts finite values above zero.
fn env_positive(key: &str) -> Option<f32> {
    let value: f32 = env_parse(key)?;
    if value.is_finite() && value > 0.0 {
        Some(value)
    } else {
        warn!(key, value, "setting must be positive; keeping default");
        None
    }
}

/// `Tuning::default()` with any `RANGE_*` overrides applied.
pub fn tuning() -> Tuning {
    let mut t = Tuning::default();

    macro_rules! apply {
        ($target:ident; $($field:ident = $key:literal),* $(,)?) => {
            $(if let Some(v) = env_parse($key) { $target.$field = v; })*
        };
    }

    apply!(t;
        max_ammo = "RANGE_MAX_AMMO",
        reload_duration = "RANGE_RELOAD_SECONDS",
        projectile_speed = "RANGE_PROJECTILE_SPEED",
        projectile_lifetime = "RANGE_PROJECTILE_LIFETIME",
        fragment_count = "RANGE_FRAGMENT_COUNT",
        fragment_lifetime = "RANGE_FRAGMENT_LIFETIME",
        fragment_gravity = "RANGE_FRAGMENT_GRAVITY",
        hit_threshold = "RANGE_HIT_THRESHOLD",
        target_cap = "RANGE_TARGET_CAP",
        initial_targets = "RANGE_INITIAL_TARGETS",
        score_per_kill = "RANGE_SCORE_PER_KILL",
    );

    if let Some(v) = env_positive("RANGE_SPAWN_INTERVAL") {
        t.spawn_interval = v;
    }
    if let Some(v) = env_positive("RANGE_WORLD_HALF_EXTENT") {
        t.world_half_extent = v;
    }

    t
}

/// Wall-clock budget per interactive frame (`RANGE_FPS`, default 30).
pub fn frame_interval() -> Duration {
    let fps = env_parse::<u32>("RANGE_FPS").filter(|f| *f > 0).unwrap_or(30);
    Duration::from_millis(1000 / fps as u64)
}

pub fn seed() -> Option<u64> {
    env_parse("RANGE_SEED")
}

/// Where interactive mode writes its logs; logging is off when unset.
pub fn log_file() -> Option<PathBuf> {
    env::var_os("RANGE_LOG_FILE").map(PathBuf::from)
}

/// Fixed step used by headless runs.
pub const HEADLESS_DT: f32 = 1.0 / 60.0;
pub const DEFAULT_HEADLESS_FRAMES: u64 = 600;
