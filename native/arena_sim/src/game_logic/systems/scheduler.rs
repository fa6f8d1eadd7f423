//! Path: native/arena_sim/src/game_logic/systems/scheduler.rs
//! Summary: LOD 付き敵更新スケジューラ（数値ガード → 分類 → 間引き → 慣性移動 / AI パイプライン）
//!
//! 生存配列を逆順に走査する。自分自身の撃破はその場で swap-pop し、
//! 他の敵の撃破は `dying` を立てて解放キューに積む（走査後に一括解放）。

use super::{enemy_states, skills};
use crate::world::{contain_in, Enemy, EnemyId, GameWorld, LodTier};
use arena_core::constants::IMPULSE_DECAY;
use arena_core::physics::math::{dist_sq, is_finite2};
use arena_core::{EnemyRank, SimConfig};

/// パイプライン段の結果
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Flow {
    Continue,
    /// このフレームの残りの段を打ち切る
    Stop,
    /// 自分自身が撃破された
    Died,
}

/// 通し番号から間引き位相を決める（同じ周期の敵が同じフレームに集中しないよう散らす）
pub(crate) fn stagger_phase(serial: u32, cadence: u32) -> u32 {
    if cadence <= 1 {
        return 0;
    }
    (serial.wrapping_mul(0x9E37_79B1) >> 16) % cadence
}

/// このフレームで AI を実行するか。Critical は毎フレーム、それ以外は周期ごとに 1 回。
pub fn should_run_ai(tier: LodTier, serial: u32, frame: u64, config: &SimConfig) -> bool {
    let cadence = match tier {
        LodTier::Critical => return true,
        LodTier::Near => config.lod_near_cadence,
        LodTier::Far => config.lod_far_cadence,
    }
    .max(1);
    let phase = u64::from(stagger_phase(serial, cadence));
    (frame + phase) % u64::from(cadence) == 0
}

/// LOD 分類。ボス・エリート・常時更新指定・特殊状態・多段スキル実行中は Critical。
pub fn classify(e: &Enemy, px: f32, py: f32, near_distance: f32) -> LodTier {
    if e.rank != EnemyRank::Normal || e.always_fresh || e.state.is_special() || e.skill.is_engaged() {
        LodTier::Critical
    } else if dist_sq(e.x, e.y, px, py) < near_distance * near_distance {
        LodTier::Near
    } else {
        LodTier::Far
    }
}

/// 速度とインパルスで位置を進め、マップ内に収める
pub(crate) fn integrate_enemy(e: &mut Enemy, map_w: f32, map_h: f32) {
    e.x += e.vx + e.impulse_x;
    e.y += e.vy + e.impulse_y;
    e.impulse_x *= IMPULSE_DECAY;
    e.impulse_y *= IMPULSE_DECAY;
    if e.impulse_x.abs() < 0.01 {
        e.impulse_x = 0.0;
    }
    if e.impulse_y.abs() < 0.01 {
        e.impulse_y = 0.0;
    }
    let (cx, cy, _) = contain_in(e.x, e.y, e.radius, map_w, map_h);
    e.x = cx;
    e.y = cy;
}

/// 全敵の 1 フレーム分の更新
pub(crate) fn update_enemies(w: &mut GameWorld) {
    let frame = w.frame;
    let (px, py) = (w.player.x, w.player.y);
    let (map_w, map_h) = (w.config.map_width, w.config.map_height);
    let near = w.config.lod_near_distance;

    let len = w.enemies.live_len();
    for i in (0..len).rev() {
        let Some(key) = w.enemies.key_at(i) else {
            continue;
        };
        let Some(e) = w.enemies.get_mut(key) else {
            continue;
        };
        if !e.active || e.dying {
            continue;
        }

        // 数値破損ガード: 安全座標へ戻してこのフレームは何もしない
        if !is_finite2(e.x, e.y) || !is_finite2(e.vx, e.vy) || !is_finite2(e.impulse_x, e.impulse_y) {
            let (sx, sy) = w.config.safe_position;
            log::warn!(
                "enemy serial={} had non-finite position/velocity; reset to ({}, {})",
                e.serial, sx, sy
            );
            e.x = sx;
            e.y = sy;
            e.vx = 0.0;
            e.vy = 0.0;
            e.impulse_x = 0.0;
            e.impulse_y = 0.0;
            e.run_collision = false;
            w.stats.nan_resets += 1;
            continue;
        }

        let tier = classify(e, px, py, near);
        let run_ai = should_run_ai(tier, e.serial, frame, &w.config);
        e.lod = tier;
        e.run_collision = run_ai;
        match tier {
            LodTier::Critical => w.stats.critical += 1,
            LodTier::Near => w.stats.near += 1,
            LodTier::Far => w.stats.far += 1,
        }

        if !run_ai {
            // 慣性移動のみ
            integrate_enemy(e, map_w, map_h);
            w.stats.inertial_updates += 1;
            continue;
        }

        let elapsed = frame.saturating_sub(e.last_ai_frame).clamp(1, u64::from(u32::MAX)) as u32;
        e.last_ai_frame = frame;
        e.ai_ticks += 1;
        w.stats.ai_updates += 1;
        run_ai_pipeline(w, key, i, elapsed);
    }
}

/// (a) 状態異常 → (b) 排他状態 → (c) スキル → (d) 移動方向 → (e) 攻撃
fn run_ai_pipeline(w: &mut GameWorld, key: EnemyId, index: usize, elapsed: u32) {
    // 後段が早期 return しても状態異常のタイマーとダメージは必ず進める
    if enemy_states::tick_status(w, key, elapsed) == Flow::Died {
        if w.enemies.key_at(index) == Some(key) {
            w.enemies.release_at(index);
        }
        return;
    }
    if enemy_states::step_exclusive_state(w, key, elapsed) != Flow::Continue {
        return;
    }
    if skills::run_skill(w, key, elapsed) != Flow::Continue {
        return;
    }
    skills::steer(w, key);
    skills::decide_attack(w, key);
}
