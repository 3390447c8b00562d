//! Per-tick render snapshot
//!
//! The renderer is an external collaborator: once per frame it receives this
//! read-only view with world positions already translated to screen space,
//! and must not reach back into the simulation.

use glam::Vec2;

use super::state::{Particle, WorldState};
use crate::consts::*;

/// A screen-space rectangle ready to draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone)]
pub struct RenderSnapshot {
    /// `player.world_x - PLAYER_ANCHOR_X`; derived fresh every frame
    pub camera_offset: f32,
    /// Player sprite rectangle in screen space
    pub player: ScreenRect,
    pub player_grounded: bool,
    /// Screen x of the pursuer sprite's left edge (may be off-screen left)
    pub pursuer_x: f32,
    /// Traps within the view plus a draw margin, screen space, spawn order
    pub obstacles: Vec<ScreenRect>,
    /// Particles in screen space with remaining life for fading
    pub particles: Vec<(Vec2, f32, u32)>,
    /// Pursuer is close enough to warrant a warning treatment
    pub danger: bool,
    pub score: u64,
    pub game_over: bool,
}

impl RenderSnapshot {
    /// Build a snapshot from the live world. Read-only; the world is untouched.
    pub fn capture(state: &WorldState) -> Self {
        let camera = state.camera_offset();

        let player = ScreenRect {
            x: PLAYER_ANCHOR_X,
            y: state.player.y - PLAYER_HEIGHT,
            w: PLAYER_WIDTH,
            h: PLAYER_HEIGHT,
        };

        // Pursuer trails the player by its current distance
        let pursuer_x = PLAYER_ANCHOR_X - state.pursuer.distance_behind - PLAYER_WIDTH;

        let obstacles = state
            .obstacles
            .iter()
            .filter_map(|o| {
                let x = o.world_x - camera;
                if x + o.width < -DRAW_MARGIN || x > VIEW_WIDTH + DRAW_MARGIN {
                    return None;
                }
                Some(ScreenRect {
                    x,
                    y: o.top_y,
                    w: o.width,
                    h: o.height,
                })
            })
            .collect();

        let particles = state
            .particles
            .iter()
            .map(|p: &Particle| (Vec2::new(p.pos.x - camera, p.pos.y), p.life, p.color))
            .collect();

        Self {
            camera_offset: camera,
            player,
            player_grounded: state.player.grounded,
            pursuer_x,
            obstacles,
            particles,
            danger: state.pursuer.distance_behind < WARNING_DISTANCE,
            score: state.display_score(),
            game_over: !state.running() && state.frame_count > 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Obstacle;

    #[test]
    fn camera_offset_is_derived_from_player() {
        let mut state = WorldState::new(1);
        state.player.world_x = 500.0;
        let snap = RenderSnapshot::capture(&state);
        assert_eq!(snap.camera_offset, 500.0 - PLAYER_ANCHOR_X);
        assert_eq!(snap.player.x, PLAYER_ANCHOR_X);
    }

    #[test]
    fn far_obstacles_are_culled() {
        let mut state = WorldState::new(1);
        state.player.world_x = 5000.0;
        // One behind the view, one visible, one far ahead
        state.obstacles.push(Obstacle::spawn(3000.0));
        state.obstacles.push(Obstacle::spawn(5100.0));
        state.obstacles.push(Obstacle::spawn(9000.0));
        let snap = RenderSnapshot::capture(&state);
        assert_eq!(snap.obstacles.len(), 1);
        let camera = 5000.0 - PLAYER_ANCHOR_X;
        assert_eq!(snap.obstacles[0].x, 5100.0 - camera);
    }

    #[test]
    fn danger_flag_tracks_warning_distance() {
        let mut state = WorldState::new(1);
        assert!(!RenderSnapshot::capture(&state).danger);
        state.pursuer.distance_behind = WARNING_DISTANCE - 1.0;
        assert!(RenderSnapshot::capture(&state).danger);
    }
}
