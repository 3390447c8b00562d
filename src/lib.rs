//! Spike Run - a single-lane runner arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (world advance, physics, spawning, collisions)
//! - `balance`: Persisted point balance with settle/withdraw bookkeeping
//! - `session`: Local key-material login (opaque identity token, no verification)
//! - `store`: LocalStorage access with load-or-default per key
//! - `audio`: Procedural Web Audio sound effects (wasm only)
//! - `render`: Canvas-2d adapter consuming the per-tick snapshot (wasm only)

pub mod balance;
pub mod session;
pub mod sim;
pub mod store;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod render;

pub use balance::{BalanceLedger, WithdrawError};
pub use session::{LoginError, Session};

/// Game configuration constants
pub mod consts {
    /// Nominal view size in CSS pixels (world units map 1:1)
    pub const VIEW_WIDTH: f32 = 960.0;
    pub const VIEW_HEIGHT: f32 = 540.0;

    /// Screen y of the ground line (player feet rest here)
    pub const GROUND_Y: f32 = 460.0;
    /// Screen x the player sprite is anchored at; camera offset = world_x - this
    pub const PLAYER_ANCHOR_X: f32 = 180.0;

    /// Player sprite size
    pub const PLAYER_WIDTH: f32 = 48.0;
    pub const PLAYER_HEIGHT: f32 = 64.0;
    /// Player hitbox (smaller than the sprite, centered horizontally)
    pub const HITBOX_WIDTH: f32 = 28.0;
    pub const HITBOX_HEIGHT: f32 = 48.0;
    /// Leniency padding applied to both boxes in the overlap test
    pub const HIT_PADDING: f32 = 4.0;

    /// Vertical physics (per tick, y grows downward)
    pub const GRAVITY: f32 = 0.8;
    pub const JUMP_IMPULSE: f32 = -15.0;

    /// Scroll speed at run start and its stepped increase
    pub const GAME_SPEED_START: f32 = 6.0;
    pub const SPEED_UP_INTERVAL: u64 = 600;
    pub const SPEED_UP_STEP: f32 = 0.5;

    /// Pursuer distance model
    pub const PURSUER_MAX_DISTANCE: f32 = 320.0;
    pub const PURSUER_RECOVERY: f32 = 0.25;
    pub const CATCH_DISTANCE: f32 = 24.0;
    pub const WARNING_DISTANCE: f32 = 96.0;

    /// Obstacle spawning
    pub const SPAWN_LOOKAHEAD: f32 = 900.0;
    pub const SPAWN_GAP_MIN: f32 = 260.0;
    pub const SPAWN_GAP_MAX: f32 = 520.0;
    pub const SPAWN_CHANCE: f64 = 0.02;
    pub const OBSTACLE_WIDTH: f32 = 36.0;
    pub const OBSTACLE_HEIGHT: f32 = 44.0;
    /// FIFO cap on live obstacles (memory bound, not gameplay)
    pub const MAX_OBSTACLES: usize = 64;

    /// Death burst particle count
    pub const BURST_PARTICLES: usize = 10;
    /// Life drained from each particle per tick (life starts at 1.0)
    pub const PARTICLE_LIFE_DECAY: f32 = 0.02;

    /// Score accumulator increment per tick
    pub const SCORE_PER_TICK: f32 = 0.1;

    /// Obstacles within this margin past the view edges are still drawn
    pub const DRAW_MARGIN: f32 = 64.0;

    /// Minimum balance required for a withdrawal
    pub const MIN_WITHDRAWAL: u64 = 1000;

    /// Expected hex length of login key material (32 bytes)
    pub const KEY_MATERIAL_LEN: usize = 64;
}
