//! Path: native/arena_sim/src/game_logic/systems/enemy_states.rs
//! Summary: 状態異常タイマー（間引き分の追いつき込み）と排他状態（出現・捕獲・投擲・突進）の物理

use super::scheduler::Flow;
use crate::world::{contain_in, DamageOutcome, DamageSource, EnemyId, EnemyState, FrameEvent, GameWorld};
use arena_core::physics::math::normalize;

/// 捕獲中の引き寄せ係数（距離に対する割合）
const CAPTURE_PULL: f32 = 0.2;
/// 投擲中の減速率
const THROW_DRAG: f32 = 0.95;
/// 投擲中に壁へ当たったときの反発係数
const THROW_BOUNCE: f32 = 0.5;

/// (a) 状態異常。前回 AI 実行からの経過フレーム分をまとめて進める。
pub(crate) fn tick_status(w: &mut GameWorld, key: EnemyId, elapsed: u32) -> Flow {
    let Some(e) = w.enemies.get_mut(key) else {
        return Flow::Stop;
    };
    let s = &mut e.status;
    let mut burn = 0.0;
    if s.burn_frames > 0 {
        let n = elapsed.min(s.burn_frames);
        burn = s.burn_damage * n as f32;
        s.burn_frames -= n;
        if s.burn_frames == 0 {
            s.burn_damage = 0.0;
        }
    }
    s.slow_frames = s.slow_frames.saturating_sub(elapsed);
    if s.slow_frames == 0 {
        s.slow_factor = 0.0;
    }
    s.stun_frames = s.stun_frames.saturating_sub(elapsed);
    e.attack_cooldown = e.attack_cooldown.saturating_sub(elapsed);

    if burn > 0.0 && w.damage_enemy(key, burn, false, DamageSource::Burn) == Some(DamageOutcome::Killed) {
        return Flow::Died;
    }
    Flow::Continue
}

/// (b) 排他状態。通常状態以外ならここで移動を済ませてパイプラインを打ち切る。
pub(crate) fn step_exclusive_state(w: &mut GameWorld, key: EnemyId, elapsed: u32) -> Flow {
    let (map_w, map_h) = (w.config.map_width, w.config.map_height);
    let Some(e) = w.enemies.get_mut(key) else {
        return Flow::Stop;
    };

    match e.state {
        EnemyState::Normal => Flow::Continue,

        EnemyState::Spawning { frames } => {
            e.vx = 0.0;
            e.vy = 0.0;
            let left = frames.saturating_sub(elapsed);
            e.state = if left == 0 { EnemyState::Normal } else { EnemyState::Spawning { frames: left } };
            Flow::Stop
        }

        EnemyState::Captured { anchor_x, anchor_y, frames } => {
            let (nx, ny, dist) = normalize(anchor_x - e.x, anchor_y - e.y);
            let pull = (dist * CAPTURE_PULL).min(e.speed.max(1.0) * 3.0);
            e.vx = nx * pull;
            e.vy = ny * pull;
            e.x += e.vx;
            e.y += e.vy;
            let left = frames.saturating_sub(elapsed);
            e.state = if left == 0 {
                e.vx = 0.0;
                e.vy = 0.0;
                EnemyState::Normal
            } else {
                EnemyState::Captured { anchor_x, anchor_y, frames: left }
            };
            Flow::Stop
        }

        EnemyState::Thrown { frames } => {
            e.x += e.vx;
            e.y += e.vy;
            e.vx *= THROW_DRAG;
            e.vy *= THROW_DRAG;
            let (cx, cy, hit_wall) = contain_in(e.x, e.y, e.radius, map_w, map_h);
            if hit_wall {
                if cx != e.x {
                    e.vx = -e.vx * THROW_BOUNCE;
                }
                if cy != e.y {
                    e.vy = -e.vy * THROW_BOUNCE;
                }
                e.x = cx;
                e.y = cy;
            }
            let left = frames.saturating_sub(elapsed);
            e.state = if left == 0 {
                e.vx = 0.0;
                e.vy = 0.0;
                EnemyState::Normal
            } else {
                EnemyState::Thrown { frames: left }
            };
            let (x, y) = (e.x, e.y);
            if hit_wall {
                w.events.push(FrameEvent::WallHit { x, y });
            }
            Flow::Stop
        }

        EnemyState::Dashing { frames, vx, vy } => {
            e.vx = vx;
            e.vy = vy;
            e.x += vx;
            e.y += vy;
            let (cx, cy, hit_wall) = contain_in(e.x, e.y, e.radius, map_w, map_h);
            e.x = cx;
            e.y = cy;
            let left = frames.saturating_sub(elapsed);
            e.state = if left == 0 || hit_wall {
                e.vx = 0.0;
                e.vy = 0.0;
                EnemyState::Normal
            } else {
                EnemyState::Dashing { frames: left, vx, vy }
            };
            Flow::Stop
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::StatusEffect;
    use arena_core::enemy_config::ENEMY_ID_GRUNT;
    use arena_core::{EnemyConfigTable, SimConfig};

    fn world() -> GameWorld {
        GameWorld::new(SimConfig::default(), EnemyConfigTable::default())
    }

    #[test]
    fn burn_catches_up_over_skipped_frames() {
        let mut w = world();
        let k = w.spawn_enemy(ENEMY_ID_GRUNT, 100.0, 100.0);
        w.apply_status(k, StatusEffect::Burn { damage_per_frame: 1.0, frames: 10 });
        assert_eq!(tick_status(&mut w, k, 15), Flow::Continue);
        let e = w.enemies.get(k).unwrap();
        assert!((e.hp - (e.max_hp - 10.0)).abs() < 1e-4);
        assert_eq!(e.status.burn_frames, 0);
    }

    #[test]
    fn lethal_burn_reports_death() {
        let mut w = world();
        let k = w.spawn_enemy(ENEMY_ID_GRUNT, 100.0, 100.0);
        w.apply_status(k, StatusEffect::Burn { damage_per_frame: 100.0, frames: 3 });
        assert_eq!(tick_status(&mut w, k, 1), Flow::Died);
        assert!(w.enemies.get(k).unwrap().dying);
    }

    #[test]
    fn spawn_intro_holds_still_then_returns_to_normal() {
        let mut w = world();
        let k = w.spawn_enemy_with_intro(ENEMY_ID_GRUNT, 100.0, 100.0, 2);
        assert_eq!(step_exclusive_state(&mut w, k, 1), Flow::Stop);
        assert_eq!(step_exclusive_state(&mut w, k, 1), Flow::Stop);
        assert_eq!(step_exclusive_state(&mut w, k, 1), Flow::Continue);
        assert_eq!(w.enemies.get(k).unwrap().state, EnemyState::Normal);
    }

    #[test]
    fn thrown_enemy_bounces_off_the_wall() {
        let mut w = world();
        let k = w.spawn_enemy(ENEMY_ID_GRUNT, 30.0, 500.0);
        assert!(w.throw_enemy(k, -20.0, 0.0, 10));
        step_exclusive_state(&mut w, k, 1);
        let e = w.enemies.get(k).unwrap();
        assert_eq!(e.x, e.radius);
        assert!(e.vx > 0.0);
        assert!(w.events.iter().any(|ev| matches!(ev, FrameEvent::WallHit { .. })));
    }
}
