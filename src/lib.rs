//! Library entry point: the simulation core.
//!
//! Nothing in here touches a terminal or a clock on the wall; the binary in
//! `main.rs` is one possible frame driver and presentation layer.

pub mod ammo;
pub mod clock;
pub mod collision;
pub mod entities;
pub mod game_loop;
pub mod integrator;
pub mod pool;
pub mod protocol;
pub mod state;
pub mod tuning;
