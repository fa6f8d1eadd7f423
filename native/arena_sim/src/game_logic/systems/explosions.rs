//! Path: native/arena_sim/src/game_logic/systems/explosions.rs
//! Summary: 爆発の範囲ダメージ（ダメージ窓の間だけ、1 爆発あたり最大 N 体、同じ相手には 1 回）

use crate::world::{DamageSource, ExplosionSpec, Faction, GameWorld, ProjectileId};
use arena_core::constants::ENEMY_MAX_RADIUS;
use arena_core::physics::math::{dist_sq, is_finite2, normalize};
use std::cmp::Ordering;

/// 爆風のノックバック
const BLAST_KNOCKBACK: f32 = 8.0;

pub(crate) fn resolve_explosions(w: &mut GameWorld) {
    let cap = w.config.explosion_max_targets.max(1);
    let len = w.projectiles.live_len();
    for i in (0..len).rev() {
        let Some(key) = w.projectiles.key_at(i) else {
            continue;
        };
        let Some(p) = w.projectiles.get(key) else {
            continue;
        };
        // フェード中は見た目だけ。非有限座標の爆発は距離判定できないので当てない
        if !p.in_damage_window() || !is_finite2(p.x, p.y) {
            continue;
        }
        let Some(spec) = p.explosion else {
            continue;
        };
        let owner = p.owner;
        match owner {
            Faction::Player => blast_enemies(w, key, spec, cap),
            Faction::Enemy => blast_player(w, key, spec),
        }
    }
}

fn blast_enemies(w: &mut GameWorld, key: ProjectileId, spec: ExplosionSpec, cap: usize) {
    let Some(p) = w.projectiles.get(key) else {
        return;
    };
    let (cx, cy) = (p.x, p.y);
    let already = p.hit_ids.len();
    if already >= cap {
        return;
    }

    let mut buf = std::mem::take(&mut w.query_buf);
    let mut hits = std::mem::take(&mut w.hit_buf);
    hits.clear();
    // 中心が半径外でも体が掛かっていれば当たる
    w.grid.query_radius_into(cx, cy, spec.radius + ENEMY_MAX_RADIUS, &mut buf);
    for &ek in &buf {
        let Some(e) = w.enemies.get(ek) else {
            continue;
        };
        if !e.is_targetable() || p.hit_ids.contains(&ek) {
            continue;
        }
        let r = spec.radius + e.radius;
        let d = dist_sq(e.x, e.y, cx, cy);
        if d <= r * r {
            hits.push((d, ek));
        }
    }
    w.query_buf = buf;
    hits.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
    hits.truncate(cap - already);

    let damage = spec.damage * w.player.stats.damage_mult;
    for &(_, ek) in &hits {
        if let Some(p) = w.projectiles.get_mut(key) {
            p.hit_ids.push(ek);
        }
        if let Some(e) = w.enemies.get_mut(ek) {
            let (nx, ny, _) = normalize(e.x - cx, e.y - cy);
            e.add_impulse(nx * BLAST_KNOCKBACK, ny * BLAST_KNOCKBACK);
        }
        w.damage_enemy(ek, damage, false, DamageSource::Explosion);
        w.stats.explosion_hits += 1;
    }
    w.hit_buf = hits;
}

fn blast_player(w: &mut GameWorld, key: ProjectileId, spec: ExplosionSpec) {
    let (px, py, pr) = (w.player.x, w.player.y, w.player.radius);
    let Some(p) = w.projectiles.get_mut(key) else {
        return;
    };
    let r = spec.radius + pr;
    if p.hit_player || dist_sq(p.x, p.y, px, py) > r * r {
        return;
    }
    p.hit_player = true;
    w.damage_player(spec.damage);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_logic::systems::behaviors::start_explosion;
    use crate::world::ProjectileSpec;
    use arena_core::enemy_config::ENEMY_ID_TANK;
    use arena_core::{EnemyConfigTable, SimConfig};

    fn world() -> GameWorld {
        GameWorld::new(SimConfig::default(), EnemyConfigTable::default())
    }

    fn exploding(w: &mut GameWorld, owner: Faction, x: f32, y: f32) -> ProjectileId {
        let spec = ExplosionSpec { radius: 120.0, damage: 5.0, damage_window: 6, fade_frames: 10 };
        let key = w.spawn_projectile(&ProjectileSpec { owner, x, y, explosion: Some(spec), ..ProjectileSpec::default() });
        let GameWorld { projectiles, events, .. } = w;
        start_explosion(events, projectiles.get_mut(key).unwrap());
        key
    }

    #[test]
    fn caps_total_targets_across_the_window() {
        let mut w = world();
        for i in 0..30 {
            w.spawn_enemy(ENEMY_ID_TANK, 1000.0 + (i % 6) as f32 * 10.0, 1000.0 + (i / 6) as f32 * 10.0);
        }
        w.rebuild_grid();
        exploding(&mut w, Faction::Player, 1025.0, 1020.0);
        resolve_explosions(&mut w);
        resolve_explosions(&mut w);
        let damaged = w.enemies.iter().filter(|(_, e)| e.hp < e.max_hp).count();
        assert_eq!(damaged, 15);
        assert_eq!(w.stats.explosion_hits, 15);
    }

    #[test]
    fn same_enemy_is_damaged_once_per_explosion() {
        let mut w = world();
        let k = w.spawn_enemy(ENEMY_ID_TANK, 1000.0, 1000.0);
        w.rebuild_grid();
        exploding(&mut w, Faction::Player, 1000.0, 1000.0);
        for _ in 0..6 {
            resolve_explosions(&mut w);
        }
        let e = w.enemies.get(k).unwrap();
        assert_eq!(e.max_hp - e.hp, 5.0);
    }

    #[test]
    fn enemy_explosion_hits_player_once() {
        let mut w = world();
        let (px, py) = (w.player.x, w.player.y);
        exploding(&mut w, Faction::Enemy, px + 50.0, py);
        resolve_explosions(&mut w);
        w.player.invuln_frames = 0;
        resolve_explosions(&mut w);
        assert_eq!(w.player.hp, w.player.max_hp - 5.0);
    }

    #[test]
    fn non_finite_explosion_deals_no_damage() {
        let mut w = world();
        let py = w.player.y;
        let k = w.spawn_enemy(ENEMY_ID_TANK, 1000.0, 1000.0);
        w.rebuild_grid();
        exploding(&mut w, Faction::Enemy, f32::NAN, py);
        exploding(&mut w, Faction::Player, 1000.0, f32::NAN);
        resolve_explosions(&mut w);
        assert_eq!(w.player.hp, w.player.max_hp);
        let e = w.enemies.get(k).unwrap();
        assert_eq!(e.hp, e.max_hp);
        assert_eq!(w.stats.explosion_hits, 0);
    }
}
