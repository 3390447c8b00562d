//! Per-frame simulation step
//!
//! Core game loop that advances the world deterministically. Phase order is
//! fixed; later phases read values earlier phases wrote in the same tick.

use rand::Rng;

use super::collision::padded_overlap;
use super::state::{EndCause, GameEvent, Obstacle, WorldState};
use crate::consts::*;

/// Advance the world by one tick. A guaranteed no-op unless the run is live.
pub fn tick(state: &mut WorldState) {
    if !state.running() {
        return;
    }

    state.frame_count += 1;

    // 1. Difficulty: stepped, permanent speed-ups on a fixed cadence
    if state.frame_count.is_multiple_of(SPEED_UP_INTERVAL) {
        state.game_speed += SPEED_UP_STEP;
    }

    // 2. World advance. Nothing else may touch world_x this tick.
    state.player.world_x += state.game_speed;

    // 3. Vertical physics: semi-implicit Euler, then ground clamp
    state.player.vy += GRAVITY;
    state.player.y += state.player.vy;
    if state.player.y >= GROUND_Y {
        state.player.y = GROUND_Y;
        state.player.vy = 0.0;
        state.player.grounded = true;
    } else {
        state.player.grounded = false;
    }

    // 4. Pursuer recovery: drift back toward the safe maximum
    if state.pursuer.distance_behind < PURSUER_MAX_DISTANCE {
        state.pursuer.distance_behind =
            (state.pursuer.distance_behind + PURSUER_RECOVERY).min(PURSUER_MAX_DISTANCE);
    }

    // 5. Spawning: randomized minimum gap from the tail obstacle to the spawn
    //    point, then a per-tick Bernoulli roll. Produces irregular but
    //    lower-bounded spacing.
    let spawn_x = state.player.world_x + SPAWN_LOOKAHEAD;
    let tail = state
        .obstacles
        .last()
        .map(|o| o.world_x)
        .unwrap_or(state.player.world_x);
    if spawn_x - tail >= state.next_gap && state.rng.random_bool(SPAWN_CHANCE) {
        state.obstacles.push(Obstacle::spawn(spawn_x));
        state.next_gap = state.rng.random_range(SPAWN_GAP_MIN..SPAWN_GAP_MAX);
    }

    // 6. Retention: FIFO eviction once the cap is exceeded (memory bound only)
    let excess = state.obstacles.len().saturating_sub(MAX_OBSTACLES);
    if excess > 0 {
        state.obstacles.drain(..excess);
    }

    // 7. Collision: padded AABB against every untriggered trap. The run ends
    //    on the first overlap in iteration order; later overlaps are moot
    //    since the terminal transition is idempotent.
    let hitbox = state.player.hitbox();
    let mut trap_hit = false;
    for obstacle in state.obstacles.iter_mut() {
        if !obstacle.triggered && padded_overlap(&hitbox, &obstacle.aabb()) {
            obstacle.triggered = true;
            trap_hit = true;
            break;
        }
    }
    if trap_hit {
        // Instant capture on a trap hit
        state.pursuer.distance_behind = 0.0;
        state.end_run(EndCause::TrapHit);
    }

    // 8. Capture: the pursuer caught up outright. Same terminal effects as a
    //    trap hit, distinct cause.
    if state.running() && state.pursuer.distance_behind <= CATCH_DISTANCE {
        state.pursuer.distance_behind = 0.0;
        state.end_run(EndCause::Captured);
    }

    // The world freezes at the terminal tick so the death burst and final
    // score render from exactly the state the run ended in.
    if !state.running() {
        return;
    }

    // 9. Particle integration
    for particle in state.particles.iter_mut() {
        particle.pos += particle.vel;
        particle.life -= PARTICLE_LIFE_DECAY;
    }
    state.particles.retain(|p| p.life > 0.0);

    // 10. Score accrual; notify only when the integer score moves
    let before = state.display_score();
    state.score += SCORE_PER_TICK;
    let after = state.display_score();
    if after != before {
        state.events.push(GameEvent::ScoreChanged(after));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::RunPhase;
    use proptest::prelude::*;

    fn playing(seed: u64) -> WorldState {
        let mut state = WorldState::new(seed);
        state.begin();
        state
    }

    /// Jump over the next untriggered trap when it gets close
    fn autopilot(state: &mut WorldState) {
        let ahead = state.obstacles.iter().any(|o| {
            !o.triggered
                && o.world_x > state.player.world_x
                && o.world_x - state.player.world_x < 120.0
        });
        if ahead && state.player.grounded {
            state.try_jump();
        }
    }

    #[test]
    fn tick_is_noop_before_start() {
        let mut state = WorldState::new(1);
        tick(&mut state);
        assert_eq!(state.frame_count, 0);
        assert_eq!(state.player.world_x, 0.0);
        assert_eq!(state.phase, RunPhase::Start);
    }

    #[test]
    fn world_advances_by_exactly_game_speed() {
        let mut state = playing(1);
        state.game_speed = 10.0;
        tick(&mut state);
        assert_eq!(state.player.world_x, 10.0);
        // Already on the ground line: gravity is applied then clamped away
        assert!(state.player.grounded);
        assert_eq!(state.player.y, GROUND_Y);
        assert_eq!(state.player.vy, 0.0);
    }

    #[test]
    fn gravity_applies_exactly_once_per_tick_airborne() {
        let mut state = playing(1);
        assert!(state.try_jump());
        tick(&mut state);
        assert_eq!(state.player.vy, JUMP_IMPULSE + GRAVITY);
        assert_eq!(state.player.y, GROUND_Y + JUMP_IMPULSE + GRAVITY);
        assert!(!state.player.grounded);
    }

    #[test]
    fn jump_arc_returns_to_ground() {
        let mut state = playing(1);
        assert!(state.try_jump());
        for _ in 0..200 {
            tick(&mut state);
            if state.player.grounded {
                break;
            }
        }
        assert!(state.player.grounded);
        assert_eq!(state.player.y, GROUND_Y);
    }

    #[test]
    fn speed_steps_up_on_cadence() {
        let mut state = playing(2);
        for _ in 0..SPEED_UP_INTERVAL - 1 {
            autopilot(&mut state);
            tick(&mut state);
        }
        assert_eq!(state.game_speed, GAME_SPEED_START);
        autopilot(&mut state);
        tick(&mut state);
        assert!(state.running(), "autopilot should have survived");
        assert_eq!(state.game_speed, GAME_SPEED_START + SPEED_UP_STEP);
    }

    #[test]
    fn pursuer_recovers_toward_max() {
        let mut state = playing(3);
        state.pursuer.distance_behind = 100.0;
        tick(&mut state);
        assert_eq!(state.pursuer.distance_behind, 100.0 + PURSUER_RECOVERY);

        state.pursuer.distance_behind = PURSUER_MAX_DISTANCE - 0.1;
        tick(&mut state);
        assert_eq!(state.pursuer.distance_behind, PURSUER_MAX_DISTANCE);
    }

    #[test]
    fn obstacles_spawn_ahead_and_stay_sorted() {
        let mut state = playing(4);
        for _ in 0..2500 {
            autopilot(&mut state);
            tick(&mut state);
        }
        assert!(state.running(), "autopilot should have survived");
        assert!(!state.obstacles.is_empty(), "expected spawns over 2500 ticks");
        for pair in state.obstacles.windows(2) {
            assert!(pair[0].world_x < pair[1].world_x);
        }
        // Spacing lower bound holds between consecutive spawns
        for pair in state.obstacles.windows(2) {
            assert!(pair[1].world_x - pair[0].world_x >= SPAWN_GAP_MIN);
        }
    }

    #[test]
    fn retention_evicts_oldest_first() {
        let mut state = playing(5);
        // Overfill with traps far ahead of the player so none collide
        let base = state.player.world_x + SPAWN_LOOKAHEAD;
        for i in 0..MAX_OBSTACLES + 6 {
            state.obstacles.push(Obstacle::spawn(base + i as f32 * 10.0));
        }
        tick(&mut state);
        assert_eq!(state.obstacles.len(), MAX_OBSTACLES);
        // Front (lowest world_x) entries were the ones evicted
        assert_eq!(state.obstacles[0].world_x, base + 60.0);
        for pair in state.obstacles.windows(2) {
            assert!(pair[0].world_x < pair[1].world_x);
        }
    }

    #[test]
    fn trap_hit_ends_the_run() {
        let mut state = playing(6);
        // Place a trap the very next advance lands the player on
        let hit_x = state.player.world_x + state.game_speed + PLAYER_WIDTH / 2.0;
        state.obstacles.push(Obstacle::spawn(hit_x));
        tick(&mut state);

        assert_eq!(state.phase, RunPhase::GameOver);
        assert!(state.obstacles[0].triggered);
        assert_eq!(state.pursuer.distance_behind, 0.0);
        assert_eq!(state.particles.len(), BURST_PARTICLES);
        assert!(matches!(
            state.events.last(),
            Some(GameEvent::RunEnded {
                cause: EndCause::TrapHit,
                ..
            })
        ));
    }

    #[test]
    fn triggered_flag_is_one_way() {
        let mut state = playing(6);
        let hit_x = state.player.world_x + state.game_speed + PLAYER_WIDTH / 2.0;
        state.obstacles.push(Obstacle::spawn(hit_x));
        tick(&mut state);
        assert!(state.obstacles[0].triggered);
        for _ in 0..10 {
            tick(&mut state);
            assert!(state.obstacles[0].triggered);
        }
    }

    #[test]
    fn capture_at_threshold_matches_trap_effects() {
        let mut state = playing(7);
        // Recovery drifts first, so land exactly on the threshold at the check
        state.pursuer.distance_behind = CATCH_DISTANCE - PURSUER_RECOVERY;
        tick(&mut state);

        assert_eq!(state.phase, RunPhase::GameOver);
        assert_eq!(state.pursuer.distance_behind, 0.0);
        assert_eq!(state.particles.len(), BURST_PARTICLES);
        assert!(state.obstacles.iter().all(|o| !o.triggered));
        assert!(matches!(
            state.events.last(),
            Some(GameEvent::RunEnded {
                cause: EndCause::Captured,
                ..
            })
        ));
    }

    #[test]
    fn terminal_tick_freezes_the_world() {
        let mut state = playing(8);
        state.score = 41.95;
        state.pursuer.distance_behind = 0.0;
        tick(&mut state);
        assert_eq!(state.phase, RunPhase::GameOver);

        let world_x = state.player.world_x;
        let speed = state.game_speed;
        let score = state.score;
        let frames = state.frame_count;
        let obstacles = state.obstacles.len();
        let particle_pos: Vec<_> = state.particles.iter().map(|p| p.pos).collect();

        for _ in 0..50 {
            tick(&mut state);
        }
        assert_eq!(state.player.world_x, world_x);
        assert_eq!(state.game_speed, speed);
        assert_eq!(state.score, score);
        assert_eq!(state.frame_count, frames);
        assert_eq!(state.obstacles.len(), obstacles);
        let frozen: Vec<_> = state.particles.iter().map(|p| p.pos).collect();
        assert_eq!(frozen, particle_pos);
    }

    #[test]
    fn score_event_only_on_integer_change() {
        let mut state = playing(9);
        // SCORE_PER_TICK = 0.1, so one event every 10 ticks
        let mut score_events = 0;
        for _ in 0..100 {
            autopilot(&mut state);
            tick(&mut state);
            score_events += state
                .events
                .drain(..)
                .filter(|e| matches!(e, GameEvent::ScoreChanged(_)))
                .count();
        }
        assert_eq!(score_events, 10);
        assert_eq!(state.display_score(), 10);
    }

    #[test]
    fn restart_discards_progress() {
        let mut state = playing(10);
        for _ in 0..1500 {
            autopilot(&mut state);
            tick(&mut state);
        }
        let fresh = WorldState::new(11);
        assert_eq!(fresh.game_speed, GAME_SPEED_START);
        assert!(fresh.obstacles.is_empty());
        assert!(fresh.particles.is_empty());
        assert_eq!(fresh.score, 0.0);
        assert_eq!(fresh.player.world_x, 0.0);
    }

    proptest! {
        #[test]
        fn invariants_hold_over_any_run(seed in 0u64..10_000, ticks in 1usize..3000) {
            let mut state = playing(seed);
            let mut last_speed = state.game_speed;
            for _ in 0..ticks {
                autopilot(&mut state);
                let before_x = state.player.world_x;
                let live = state.running();
                tick(&mut state);

                if live {
                    // Speed-ups land before the advance, so the post-tick
                    // speed is the one the advance used
                    prop_assert_eq!(state.player.world_x, before_x + state.game_speed);
                }
                prop_assert!(state.game_speed >= last_speed);
                last_speed = state.game_speed;
                prop_assert!(state.pursuer.distance_behind >= 0.0);
                prop_assert!(state.obstacles.len() <= MAX_OBSTACLES);
                for pair in state.obstacles.windows(2) {
                    prop_assert!(pair[0].world_x < pair[1].world_x);
                }
            }
        }
    }
}
