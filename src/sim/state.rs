//! World state and core simulation types
//!
//! The whole run lives in one mutable `WorldState`, owned by the engine for
//! the duration of a run and rebuilt from scratch on every restart.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Engine idle, world frozen at its initial pose
    Start,
    /// Step function runs every tick
    Playing,
    /// Run ended; world frozen for the terminal render
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndCause {
    /// Player overlapped a spike trap
    TrapHit,
    /// Pursuer closed to the catch distance
    Captured,
}

/// Notifications surfaced to the host once per frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Integer score changed (emitted only when `floor(score)` moves)
    ScoreChanged(u64),
    /// Run ended; fires exactly once per run
    RunEnded { cause: EndCause, score: u64 },
}

/// The runner
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Player {
    /// World x of the sprite's left edge; advances by `game_speed` per tick
    pub world_x: f32,
    /// Screen y of the feet (y grows downward)
    pub y: f32,
    /// Vertical velocity
    pub vy: f32,
    pub grounded: bool,
}

impl Player {
    fn at_rest() -> Self {
        Self {
            world_x: 0.0,
            y: GROUND_Y,
            vy: 0.0,
            grounded: true,
        }
    }

    /// Collision hitbox - smaller than the visual sprite, centered on it
    pub fn hitbox(&self) -> Aabb {
        Aabb {
            x: self.world_x + (PLAYER_WIDTH - HITBOX_WIDTH) / 2.0,
            y: self.y - HITBOX_HEIGHT,
            w: HITBOX_WIDTH,
            h: HITBOX_HEIGHT,
        }
    }
}

/// The chasing antagonist, tracked only as a trailing distance
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pursuer {
    /// World units behind the player; 0 means caught
    pub distance_behind: f32,
}

/// A spike trap. Immutable once spawned except for `triggered`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Obstacle {
    pub world_x: f32,
    pub top_y: f32,
    pub width: f32,
    pub height: f32,
    /// One-way flag, set on first overlap with the player
    pub triggered: bool,
}

impl Obstacle {
    pub fn spawn(world_x: f32) -> Self {
        Self {
            world_x,
            top_y: GROUND_Y - OBSTACLE_HEIGHT,
            width: OBSTACLE_WIDTH,
            height: OBSTACLE_HEIGHT,
            triggered: false,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb {
            x: self.world_x,
            y: self.top_y,
            w: self.width,
            h: self.height,
        }
    }
}

/// A visual effect particle (not gameplay-affecting)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1.0 at spawn, decreases each tick; dead at <= 0
    pub life: f32,
    pub color: u32,
}

/// Death burst color
const BURST_COLOR: u32 = 0xff5533;

/// Complete world state for one run
#[derive(Debug, Clone)]
pub struct WorldState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: RunPhase,
    pub player: Player,
    pub pursuer: Pursuer,
    /// Ascending by `world_x` (spawn order = position order), FIFO capped
    pub obstacles: Vec<Obstacle>,
    pub particles: Vec<Particle>,
    /// World units scrolled per tick; only ever increases within a run
    pub game_speed: f32,
    /// Score accumulator; observable score is `floor(score)`
    pub score: f32,
    pub frame_count: u64,
    /// Gap required before the next spawn, resampled after each spawn
    pub(crate) next_gap: f32,
    pub(crate) rng: Pcg32,
    /// Buffered notifications, drained by the host each frame
    pub events: Vec<GameEvent>,
}

impl WorldState {
    /// Create a fresh world at the initial pose, engine idle
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let next_gap = rng.random_range(SPAWN_GAP_MIN..SPAWN_GAP_MAX);
        Self {
            seed,
            phase: RunPhase::Start,
            player: Player::at_rest(),
            pursuer: Pursuer {
                distance_behind: PURSUER_MAX_DISTANCE,
            },
            obstacles: Vec::new(),
            particles: Vec::new(),
            game_speed: GAME_SPEED_START,
            score: 0.0,
            frame_count: 0,
            next_gap,
            rng,
            events: Vec::new(),
        }
    }

    /// Enter the `Playing` phase (from `Start`, or never - restarts build a new world)
    pub fn begin(&mut self) {
        if self.phase == RunPhase::Start {
            self.phase = RunPhase::Playing;
        }
    }

    pub fn running(&self) -> bool {
        self.phase == RunPhase::Playing
    }

    /// Camera offset for rendering; derived, never stored
    pub fn camera_offset(&self) -> f32 {
        self.player.world_x - PLAYER_ANCHOR_X
    }

    /// Integer score as surfaced to the HUD
    pub fn display_score(&self) -> u64 {
        self.score.floor() as u64
    }

    /// Jump input. Honored only while playing and grounded; airborne inputs
    /// are dropped, not queued. Returns whether the jump was applied.
    pub fn try_jump(&mut self) -> bool {
        if self.phase != RunPhase::Playing || !self.player.grounded {
            return false;
        }
        self.player.vy = JUMP_IMPULSE;
        // Cleared immediately so a second press before the next tick can't double-apply
        self.player.grounded = false;
        true
    }

    /// Shared terminal transition for both end causes. Idempotent: only the
    /// first call per run has any effect.
    pub(crate) fn end_run(&mut self, cause: EndCause) {
        if self.phase != RunPhase::Playing {
            return;
        }
        self.phase = RunPhase::GameOver;
        self.spawn_burst();
        self.events.push(GameEvent::RunEnded {
            cause,
            score: self.display_score(),
        });
    }

    /// Fixed-size particle burst at the player's last position
    fn spawn_burst(&mut self) {
        let center = Vec2::new(
            self.player.world_x + PLAYER_WIDTH / 2.0,
            self.player.y - PLAYER_HEIGHT / 2.0,
        );
        for _ in 0..BURST_PARTICLES {
            let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
            let speed = self.rng.random_range(2.0..6.0_f32);
            self.particles.push(Particle {
                pos: center,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                life: 1.0,
                color: BURST_COLOR,
            });
        }
    }
}
