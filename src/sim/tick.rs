//! Per-frame simulation step
//!
//! Core game loop that advances the run one tick.

use std::f32::consts::TAU;

use super::collision::{coin_reached_player, obstacle_hits_player};
use super::registry::{EntityKind, EntityView};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::SCORE_TENTHS_PER_TICK;

/// Fire timers that came due by host time `now_ms`.
///
/// Spawn triggers only enqueue requests; the next [`tick`] creates them.
pub fn advance_clock(state: &mut GameState, now_ms: f64) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if !state.is_running() {
        return events;
    }

    let (spawner, rng) = state.spawner_and_rng();
    spawner.poll(now_ms, rng);

    if state.slide_timer.poll(now_ms) {
        state.player.end_slide();
        events.push(GameEvent::SlideEnded);
    }

    events
}

/// Advance the run by one tick
pub fn tick(state: &mut GameState) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if !state.is_running() {
        return events;
    }

    state.time_ticks += 1;
    let speed = state.stats.speed;
    let hit = state.tuning.hit_distance;

    // Requests queued by the spawn timers
    for request in state.spawner.drain() {
        let view = match request.kind {
            EntityKind::Obstacle => state.registry.add_obstacle(request.lane as i32),
            EntityKind::Coin => state.registry.add_coin(request.lane as i32),
        };
        log::debug!("Spawned {:?} #{} in lane {}", view.kind, view.id, view.lane);
        events.push(GameEvent::Spawned(view));
    }

    // Vertical motion
    let player = &mut state.player;
    if player.jumping {
        player.pos.y += player.vertical_vel;
        player.vertical_vel += state.tuning.gravity;
        if player.pos.y <= 0.0 {
            player.pos.y = 0.0;
            player.vertical_vel = 0.0;
            player.jumping = false;
        }
    }
    let player_pos = state.player.pos;

    // Obstacles scroll toward the player; any overlap ends the run
    let mut crashed_into = None;
    for obstacle in state.registry.obstacles_mut() {
        obstacle.pos.z += speed;
        if crashed_into.is_none() && obstacle_hits_player(obstacle.pos, player_pos, hit) {
            crashed_into = Some(obstacle.id);
        }
    }
    if let Some(obstacle) = crashed_into {
        // Frozen at the moment of impact: no pickups or score this tick
        state.phase = GamePhase::GameOver;
        state.runs += 1;
        let score = state.stats.display_score();
        let coins = state.stats.coins;
        log::info!(
            "Crashed into obstacle #{} after {} ticks: score {}, coins {}",
            obstacle,
            state.time_ticks,
            score,
            coins
        );
        events.push(GameEvent::Crashed {
            obstacle,
            score,
            coins,
        });
        return events;
    }

    // Coins scroll and spin; pickup ignores height
    let spin = state.tuning.coin_spin;
    let mut collected = Vec::new();
    for coin in state.registry.coins_mut() {
        coin.spin = (coin.spin + spin) % TAU;
        coin.pos.z += speed;
        if coin_reached_player(coin.pos, player_pos, hit) {
            collected.push(coin.id);
        }
    }
    for id in collected {
        if let Some(coin) = state.registry.remove_coin(id) {
            state.stats.coins += 1;
            log::debug!("Collected coin #{} (total {})", id, state.stats.coins);
            events.push(GameEvent::CoinCollected {
                coin: EntityView::from(&coin),
                total: state.stats.coins,
            });
        }
    }

    // Distance score and difficulty ramp
    state.stats.score_tenths += SCORE_TENTHS_PER_TICK;
    let milestones = state.stats.display_score() / state.tuning.score_milestone;
    if milestones > state.stats.milestones {
        state.stats.milestones = milestones;
        state.stats.speed = state.tuning.speed_at(milestones);
        log::info!(
            "Score {} reached, speed now {:.2}",
            state.stats.display_score(),
            state.stats.speed
        );
        events.push(GameEvent::SpeedUp {
            speed: state.stats.speed,
        });
    }

    // Drop whatever has scrolled past the player
    let z_limit = state.tuning.player_z + state.tuning.cull_margin;
    for view in state.registry.cull_beyond(z_limit) {
        log::trace!("Culled {:?} #{}", view.kind, view.id);
        events.push(GameEvent::Despawned(view));
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::input::{Intent, apply_intent};
    use proptest::prelude::*;

    fn running() -> GameState {
        let mut state = GameState::new(12345);
        state.start(0.0);
        state
    }

    fn crash_count(events: &[GameEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::Crashed { .. }))
            .count()
    }

    #[test]
    fn test_tick_idle_is_noop() {
        let mut state = GameState::new(1);
        assert!(tick(&mut state).is_empty());
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.stats.score_tenths, 0);
    }

    #[test]
    fn test_speed_ramp_per_century() {
        let mut state = running();
        for _ in 0..999 {
            tick(&mut state);
        }
        assert_eq!(state.stats.speed, BASE_SPEED);

        let events = tick(&mut state);
        assert_eq!(state.stats.display_score(), 100);
        assert_eq!(state.stats.speed, BASE_SPEED + SPEED_STEP);
        assert!(events.contains(&GameEvent::SpeedUp {
            speed: BASE_SPEED + SPEED_STEP
        }));

        for _ in 0..1000 {
            tick(&mut state);
        }
        assert_eq!(state.stats.display_score(), 200);
        assert_eq!(state.stats.speed, BASE_SPEED + SPEED_STEP * 2.0);
    }

    #[test]
    fn test_speed_ramp_catches_up_over_several_centuries() {
        let mut state = running();
        state.stats.score_tenths = 3499;
        tick(&mut state);
        assert_eq!(state.stats.milestones, 3);
        assert_eq!(state.stats.speed, BASE_SPEED + SPEED_STEP * 3.0);
    }

    #[test]
    fn test_jump_arc_lands() {
        let mut state = running();
        apply_intent(&mut state, Intent::Jump, 0.0);

        let mut peak = 0.0f32;
        let mut ticks = 0;
        while state.player.jumping {
            tick(&mut state);
            assert!(state.player.pos.y >= 0.0);
            peak = peak.max(state.player.pos.y);
            ticks += 1;
            assert!(ticks < 100, "jump never landed");
        }
        assert_eq!(state.player.pos.y, 0.0);
        assert!(peak > 1.0);
        assert!(apply_intent(&mut state, Intent::Jump, 0.0));
    }

    #[test]
    fn test_collision_boundary_through_tick() {
        let mut state = running();
        state.stats.speed = 0.25;
        state.registry.add_obstacle(0);
        for obstacle in state.registry.obstacles_mut() {
            // Lands exactly 1.0 in front of the player
            obstacle.pos.z = PLAYER_Z - 1.25;
        }
        let events = tick(&mut state);
        assert_eq!(crash_count(&events), 0);
        assert_eq!(state.phase, GamePhase::Running);

        let events = tick(&mut state);
        assert_eq!(crash_count(&events), 1);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_obstacle_in_other_lane_passes() {
        let mut state = running();
        state.registry.add_obstacle(1);
        for _ in 0..400 {
            tick(&mut state);
        }
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_multiple_collisions_end_run_once() {
        let mut state = running();
        state.registry.add_obstacle(0);
        state.registry.add_obstacle(0);
        for obstacle in state.registry.obstacles_mut() {
            obstacle.pos.z = PLAYER_Z - SPEED_STEP;
        }
        let events = tick(&mut state);
        assert_eq!(crash_count(&events), 1);
        assert_eq!(state.runs, 1);
        assert!(tick(&mut state).is_empty());
    }

    #[test]
    fn test_crash_tick_freezes_score_and_skips_pickups() {
        let mut state = running();
        for _ in 0..10 {
            tick(&mut state);
        }
        state.registry.add_obstacle(0);
        state.registry.add_coin(0);
        for obstacle in state.registry.obstacles_mut() {
            obstacle.pos.z = PLAYER_Z;
        }
        for coin in state.registry.coins_mut() {
            coin.pos.z = PLAYER_Z;
        }
        let events = tick(&mut state);
        assert_eq!(
            events,
            vec![GameEvent::Crashed {
                obstacle: 1,
                score: 1,
                coins: 0
            }]
        );
        assert_eq!(state.stats.score_tenths, 10);
        assert_eq!(state.registry.coin_count(), 1);

        for _ in 0..5 {
            tick(&mut state);
        }
        assert_eq!(state.stats.score_tenths, 10);
    }

    #[test]
    fn test_pickup_ignores_height() {
        let mut state = running();
        apply_intent(&mut state, Intent::Jump, 0.0);
        tick(&mut state);
        tick(&mut state);
        assert!(state.player.pos.y > 0.5);

        state.registry.add_coin(0);
        for coin in state.registry.coins_mut() {
            coin.pos.z = PLAYER_Z - state.stats.speed;
        }
        let events = tick(&mut state);
        assert_eq!(state.stats.coins, 1);
        assert_eq!(state.registry.coin_count(), 0);
        assert!(matches!(
            events.as_slice(),
            [GameEvent::CoinCollected { total: 1, .. }]
        ));
    }

    #[test]
    fn test_coin_in_other_lane_not_collected() {
        let mut state = running();
        state.registry.add_coin(-1);
        for coin in state.registry.coins_mut() {
            coin.pos.z = PLAYER_Z;
        }
        tick(&mut state);
        assert_eq!(state.stats.coins, 0);
        assert_eq!(state.registry.coin_count(), 1);
    }

    #[test]
    fn test_coin_spins() {
        let mut state = running();
        state.registry.add_coin(1);
        tick(&mut state);
        tick(&mut state);
        let spin = state.registry.coins().next().map(|c| c.spin);
        assert!((spin.unwrap_or_default() - 2.0 * COIN_SPIN).abs() < 1e-6);
    }

    #[test]
    fn test_passed_entities_are_culled() {
        let mut state = running();
        let obstacle = state.registry.add_obstacle(1);
        let coin = state.registry.add_coin(-1);
        for o in state.registry.obstacles_mut() {
            o.pos.z = PLAYER_Z + CULL_MARGIN - 0.1;
        }
        for c in state.registry.coins_mut() {
            c.pos.z = PLAYER_Z + CULL_MARGIN - 0.1;
        }
        let events = tick(&mut state);
        assert!(state.registry.is_empty());
        let despawned: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Despawned(view) => Some(view.id),
                _ => None,
            })
            .collect();
        assert_eq!(despawned, vec![obstacle.id, coin.id]);
    }

    #[test]
    fn test_spawns_drained_at_tick_start() {
        let mut state = running();
        advance_clock(&mut state, OBSTACLE_PERIOD_MS);
        assert!(state.registry.is_empty());

        let events = tick(&mut state);
        let spawned: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Spawned(view) => Some(view.kind),
                _ => None,
            })
            .collect();
        // 2000 ms covers one obstacle and one coin period
        assert_eq!(spawned, vec![EntityKind::Obstacle, EntityKind::Coin]);
        let obstacle = state.registry.obstacles().next().map(|o| o.pos.z);
        assert_eq!(obstacle, Some(SPAWN_Z + BASE_SPEED));
    }

    #[test]
    fn test_clock_inert_unless_running() {
        let mut state = GameState::new(5);
        advance_clock(&mut state, 60_000.0);
        assert_eq!(state.spawner.pending(), 0);

        state.start(0.0);
        state.phase = GamePhase::GameOver;
        advance_clock(&mut state, 60_000.0);
        assert_eq!(state.spawner.pending(), 0);
    }

    #[test]
    fn test_slide_ends_on_real_time_not_ticks() {
        let mut state = running();
        apply_intent(&mut state, Intent::Slide, 100.0);

        for _ in 0..500 {
            tick(&mut state);
        }
        assert!(advance_clock(&mut state, 1099.0).is_empty());
        assert!(state.player.sliding);

        let events = advance_clock(&mut state, 1100.0);
        assert_eq!(events, vec![GameEvent::SlideEnded]);
        assert!(!state.player.sliding);
        assert_eq!(state.player.squash, 1.0);
    }

    #[test]
    fn test_restart_cancels_stale_slide_end() {
        let mut state = running();
        apply_intent(&mut state, Intent::Slide, 0.0);
        state.phase = GamePhase::GameOver;

        state.start(500.0);
        apply_intent(&mut state, Intent::Slide, 900.0);
        // The first slide would have ended at 1000 ms
        assert!(advance_clock(&mut state, 1000.0).is_empty());
        assert!(state.player.sliding);
        assert_eq!(
            advance_clock(&mut state, 1900.0),
            vec![GameEvent::SlideEnded]
        );
    }

    #[test]
    fn test_end_to_end_crash_and_restart() {
        let mut state = running();
        let spawned = state.registry.add_obstacle(0);
        assert_eq!(spawned.pos.z, SPAWN_Z);

        let mut ticks = 0u64;
        let crash = loop {
            let events = tick(&mut state);
            ticks += 1;
            assert!(ticks < 1000, "obstacle never reached the player");
            if let Some(crash) = events
                .into_iter()
                .find(|e| matches!(e, GameEvent::Crashed { .. }))
            {
                break crash;
            }
        };

        // 54 units at 0.2 per tick, give or take float rounding
        assert!((270..=272).contains(&ticks), "crashed after {ticks} ticks");
        let completed = ticks - 1;
        assert_eq!(
            crash,
            GameEvent::Crashed {
                obstacle: spawned.id,
                score: completed / 10,
                coins: 0,
            }
        );
        assert_eq!(state.phase, GamePhase::GameOver);

        state.start(9_000.0);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.stats.score_tenths, 0);
        assert_eq!(state.stats.coins, 0);
        assert_eq!(state.stats.speed, BASE_SPEED);
        assert!(state.registry.is_empty());
    }

    #[test]
    fn test_determinism() {
        // Two sessions with the same seed and inputs produce identical runs
        let mut a = GameState::new(99999);
        let mut b = GameState::new(99999);
        a.start(0.0);
        b.start(0.0);

        for frame in 1..=600u32 {
            let now = frame as f64 * FRAME_MS;
            for state in [&mut a, &mut b] {
                if frame % 45 == 0 {
                    apply_intent(state, Intent::Right, now);
                }
                if frame % 70 == 0 {
                    apply_intent(state, Intent::Left, now);
                }
                advance_clock(state, now);
                tick(state);
            }
        }

        assert_eq!(a.phase, b.phase);
        assert_eq!(a.stats, b.stats);
        assert_eq!(a.player, b.player);
        let lanes_a: Vec<_> = a.registry.obstacles().map(|o| (o.id, o.lane)).collect();
        let lanes_b: Vec<_> = b.registry.obstacles().map(|o| (o.id, o.lane)).collect();
        assert_eq!(lanes_a, lanes_b);
    }

    #[derive(Debug, Clone)]
    enum Step {
        Input(Intent),
        Tick,
        Wait(f64),
    }

    fn step_strategy() -> impl Strategy<Value = Step> {
        prop_oneof![
            prop::sample::select(Intent::ALL.to_vec()).prop_map(Step::Input),
            Just(Step::Tick),
            (1.0f64..400.0).prop_map(Step::Wait),
        ]
    }

    proptest! {
        #[test]
        fn prop_never_jumping_and_sliding(steps in prop::collection::vec(step_strategy(), 0..300)) {
            let mut state = running();
            let mut now = 0.0;
            let mut last_score = 0;
            for step in steps {
                match step {
                    Step::Input(intent) => { apply_intent(&mut state, intent, now); }
                    Step::Tick => { tick(&mut state); }
                    Step::Wait(ms) => {
                        now += ms;
                        advance_clock(&mut state, now);
                    }
                }
                prop_assert!(!(state.player.jumping && state.player.sliding));
                prop_assert!(state.player.pos.y >= 0.0);
                prop_assert!(state.stats.score_tenths >= last_score);
                last_score = state.stats.score_tenths;
            }
        }
    }
}
