//! Path: native/arena_sim/src/game_logic/systems/projectiles.rs
//! Summary: 弾ドライバ（挙動の適用・爆発フェーズの進行・寿命切れの解放）

use super::behaviors::{run_behaviors, BehaviorCtx};
use crate::world::{GameWorld, ProjectilePhase};
use arena_core::physics::math::is_finite2;

/// 挙動リストが寿命を減らさない弾の打ち切り（1 分）
const MAX_PROJECTILE_AGE: u32 = 60 * 60;

pub(crate) fn update_projectiles(w: &mut GameWorld) {
    let GameWorld { projectiles, enemies, grid, player, particles, events, query_buf, config, .. } = w;
    let mut ctx = BehaviorCtx {
        enemies:    &*enemies,
        grid:       &*grid,
        player:     &*player,
        particles,
        events,
        query_buf,
        map_width:  config.map_width,
        map_height: config.map_height,
    };

    let len = projectiles.live_len();
    for i in (0..len).rev() {
        let Some(key) = projectiles.key_at(i) else {
            continue;
        };
        let Some(p) = projectiles.get_mut(key) else {
            continue;
        };
        if !is_finite2(p.x, p.y) || !is_finite2(p.vx, p.vy) {
            log::warn!("projectile had non-finite position/velocity; released");
            projectiles.release_at(i);
            continue;
        }
        let expired = match p.phase {
            ProjectilePhase::Exploding { elapsed } => {
                p.phase = ProjectilePhase::Exploding { elapsed: elapsed + 1 };
                p.life -= 1;
                p.life <= 0
            }
            ProjectilePhase::Flying => {
                run_behaviors(&mut ctx, p);
                p.age += 1;
                (p.is_flying() && p.life <= 0) || p.age > MAX_PROJECTILE_AGE
            }
        };
        if expired {
            projectiles.release_at(i);
        }
    }
}
