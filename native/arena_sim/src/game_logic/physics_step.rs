//! Path: native/arena_sim/src/game_logic/physics_step.rs
//! Summary: 1 フレーム分の物理ステップ（各システムを固定順で呼ぶ）

use super::hooks::HookRegistry;
use super::systems::collision::{resolve_enemy_contacts, resolve_projectile_hits, resolve_wall_blocks};
use super::systems::effects::{update_floating_texts, update_particles};
use super::systems::explosions::resolve_explosions;
use super::systems::player::update_player;
use super::systems::projectiles::update_projectiles;
use super::systems::scheduler::update_enemies;
use super::systems::zones::update_zones;
use crate::world::GameWorld;

/// 物理ステップの内部実装
pub(crate) fn physics_step_inner(w: &mut GameWorld, hooks: &mut HookRegistry) {
    // trace にしておき、RUST_LOG=trace のときだけ毎フレーム出力
    log::trace!("physics_step: frame_id={}", w.frame + 1);
    let t_start = std::time::Instant::now();

    w.frame += 1;
    w.stats.reset_counters();

    update_player(w);

    // ── アイテムの毎フレーム効果（スタック数は引数で渡す）──────
    hooks.run_tick(w);

    // ── 敵 AI（LOD 間引き込み）。撃破はここでまとめて解放 ─────
    update_enemies(w);
    w.flush_releases();

    // ── 衝突判定（Spatial Hash）────────────────────────────────
    // AI で動いた後の位置で再構築する
    w.rebuild_grid();
    resolve_enemy_contacts(w);
    resolve_wall_blocks(w);
    resolve_projectile_hits(w);
    resolve_explosions(w);

    update_zones(w);
    w.flush_releases();
    hooks.run_kills(w);
    w.flush_releases();

    // ── 弾の挙動（移動・追尾・寿命・爆発開始）──────────────────
    update_projectiles(w);

    // ── パーティクル / テキスト ────────────────────────────────
    update_particles(w);
    update_floating_texts(w);

    // ── フレーム時間計測 ───────────────────────────────────────
    let elapsed_ms = t_start.elapsed().as_secs_f64() * 1000.0;
    w.stats.last_tick_ms = elapsed_ms;
    if elapsed_ms > w.config.frame_budget_ms {
        log::warn!(
            "[PERF] Frame budget exceeded: {:.2}ms (enemies: {}, projectiles: {})",
            elapsed_ms,
            w.enemies.live_len(),
            w.projectiles.live_len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{
        ExplosionSpec, FrameEvent, LodTier, ProjectileSpec, GRENADE_BEHAVIORS, LINEAR_BEHAVIORS,
    };
    use arena_core::{EnemyConfig, EnemyConfigTable, SimConfig};

    /// 動かない的（speed 0・ノックバック無効）
    fn dummy_table() -> EnemyConfigTable {
        EnemyConfigTable::new(vec![EnemyConfig {
            name: "dummy",
            max_hp: 100.0,
            speed: 0.0,
            radius: 20.0,
            knockback_resist: 1.0,
            ..EnemyConfig::default()
        }])
    }

    fn step(w: &mut GameWorld, hooks: &mut HookRegistry, frames: usize) {
        for _ in 0..frames {
            physics_step_inner(w, hooks);
        }
    }

    #[test]
    fn far_enemies_run_ai_once_per_far_cadence() {
        let mut w = GameWorld::new(SimConfig::default(), EnemyConfigTable::default());
        let mut hooks = HookRegistry::new();
        w.player.x = 500.0;
        w.player.y = 500.0;
        for i in 0..100 {
            w.spawn_enemy(0, 3500.0 + (i % 10) as f32 * 40.0, 3000.0 + (i / 10) as f32 * 40.0);
        }
        let cadence = w.config.lod_far_cadence as usize;
        step(&mut w, &mut hooks, cadence);
        assert_eq!(w.enemy_count(), 100);
        for (_, e) in w.enemies.iter() {
            assert_eq!(e.lod, LodTier::Far);
            assert_eq!(e.ai_ticks, 1, "serial {}", e.serial);
        }
    }

    #[test]
    fn near_enemies_run_ai_once_per_near_cadence() {
        let mut w = GameWorld::new(SimConfig::default(), EnemyConfigTable::default());
        let mut hooks = HookRegistry::new();
        let (px, py) = (w.player.x, w.player.y);
        for i in 0..30 {
            let a = std::f32::consts::TAU * i as f32 / 30.0;
            w.spawn_enemy(0, px + a.cos() * 500.0, py + a.sin() * 500.0);
        }
        let cadence = w.config.lod_near_cadence as usize;
        step(&mut w, &mut hooks, cadence);
        for (_, e) in w.enemies.iter() {
            assert_eq!(e.lod, LodTier::Near);
            assert_eq!(e.ai_ticks, 1, "serial {}", e.serial);
        }
    }

    #[test]
    fn skipped_near_enemy_does_not_touch_the_player() {
        let mut w = GameWorld::new(SimConfig::default(), dummy_table());
        let mut hooks = HookRegistry::new();
        let (px, py) = (w.player.x, w.player.y);
        let k = w.spawn_enemy(0, px, py);
        let cadence = w.config.lod_near_cadence;
        let mut run_frames = 0;
        for _ in 0..cadence {
            let hp_before = w.player.hp;
            physics_step_inner(&mut w, &mut hooks);
            let e = w.enemies.get(k).unwrap();
            assert_eq!(e.lod, LodTier::Near);
            if e.run_collision {
                run_frames += 1;
                assert!(w.player.hp < hp_before);
            } else {
                assert_eq!(w.player.hp, hp_before);
            }
        }
        assert_eq!(run_frames, 1);
    }

    #[test]
    fn pierce_two_hits_exactly_three_stacked_targets() {
        let mut w = GameWorld::new(SimConfig::default(), dummy_table());
        let mut hooks = HookRegistry::new();
        w.player.x = 3000.0;
        w.player.y = 3000.0;
        let targets: Vec<_> = (0..4).map(|i| w.spawn_enemy(0, 1000.0 + 40.0 * i as f32, 1000.0)).collect();
        w.spawn_projectile(&ProjectileSpec {
            x: 900.0,
            y: 1000.0,
            vx: 10.0,
            radius: 5.0,
            damage: 1.0,
            pierce: 2,
            life: 100,
            behaviors: LINEAR_BEHAVIORS,
            ..ProjectileSpec::default()
        });
        step(&mut w, &mut hooks, 30);
        let hit: Vec<bool> = targets
            .iter()
            .map(|&k| w.enemies.get(k).is_some_and(|e| e.hp < e.max_hp))
            .collect();
        assert_eq!(hit, vec![true, true, true, false]);
        assert_eq!(w.projectile_count(), 0);
    }

    #[test]
    fn slow_projectile_never_double_hits() {
        let mut w = GameWorld::new(SimConfig::default(), dummy_table());
        let mut hooks = HookRegistry::new();
        w.player.x = 3000.0;
        w.player.y = 3000.0;
        w.spawn_enemy(0, 1000.0, 1000.0);
        w.spawn_projectile(&ProjectileSpec {
            x: 970.0,
            y: 1000.0,
            vx: 1.0,
            damage: 1.0,
            pierce: 5,
            life: 100,
            behaviors: LINEAR_BEHAVIORS,
            ..ProjectileSpec::default()
        });
        step(&mut w, &mut hooks, 60);
        let damaged = w
            .events
            .drain()
            .filter(|e| matches!(e, FrameEvent::EnemyDamaged { .. }))
            .count();
        assert_eq!(damaged, 1);
    }

    #[test]
    fn non_finite_enemy_is_reset_to_safe_position() {
        let mut w = GameWorld::new(SimConfig::default(), EnemyConfigTable::default());
        let mut hooks = HookRegistry::new();
        w.player.x = 500.0;
        w.player.y = 500.0;
        let k = w.spawn_enemy(0, 100.0, 100.0);
        if let Some(e) = w.enemies.get_mut(k) {
            e.x = f32::NAN;
            e.vy = f32::INFINITY;
        }
        physics_step_inner(&mut w, &mut hooks);
        let e = w.enemies.get(k).unwrap();
        assert_eq!((e.x, e.y), w.config.safe_position);
        assert_eq!((e.vx, e.vy), (0.0, 0.0));
        assert_eq!(w.stats.nan_resets, 1);
    }

    #[test]
    fn explosion_damages_only_inside_its_window() {
        let config = SimConfig::default();
        let mut w = GameWorld::new(config, dummy_table());
        let mut hooks = HookRegistry::new();
        w.player.x = 3000.0;
        w.player.y = 3000.0;
        let window = 3;
        w.spawn_projectile(&ProjectileSpec {
            x: 1000.0,
            y: 1000.0,
            life: 1,
            damage: 0.0,
            explosion: Some(ExplosionSpec { radius: 100.0, damage: 1.0, damage_window: window, fade_frames: 10 }),
            behaviors: GRENADE_BEHAVIORS,
            ..ProjectileSpec::default()
        });
        // 毎フレーム新しい的を置き、爆風が当たったフレームを数える
        let mut damage_frames = 0;
        for _ in 0..20 {
            w.spawn_enemy(0, 1000.0, 1000.0);
            physics_step_inner(&mut w, &mut hooks);
            let damaged = w.events.drain().any(|e| matches!(e, FrameEvent::EnemyDamaged { .. }));
            if damaged {
                damage_frames += 1;
            }
        }
        assert_eq!(damage_frames, window as usize);
        assert_eq!(w.projectile_count(), 0);
    }

    #[test]
    fn projectile_pool_reuse_is_clean() {
        let mut w = GameWorld::new(SimConfig::default(), dummy_table());
        let mut hooks = HookRegistry::new();
        w.spawn_projectile(&ProjectileSpec {
            x: 100.0,
            y: 100.0,
            life: 1,
            pierce: 4,
            explosion: Some(ExplosionSpec { radius: 50.0, damage: 1.0, damage_window: 1, fade_frames: 1 }),
            behaviors: GRENADE_BEHAVIORS,
            ..ProjectileSpec::default()
        });
        step(&mut w, &mut hooks, 5);
        assert_eq!(w.projectile_count(), 0);
        let key = w.spawn_projectile(&ProjectileSpec { behaviors: LINEAR_BEHAVIORS, ..ProjectileSpec::default() });
        let p = w.projectiles.get(key).unwrap();
        assert_eq!(w.projectiles.stats().reused, 1);
        assert!(p.is_flying());
        assert!(p.explosion.is_none() && p.hit_ids.is_empty() && !p.hit_player);
        assert_eq!((p.pierce, p.age, p.behaviors.len()), (0, 0, LINEAR_BEHAVIORS.len()));
    }
}
