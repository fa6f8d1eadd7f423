//! Path: native/arena_sim/src/game_logic/systems/collision.rs
//! Summary: 衝突解決（敵 vs プレイヤー接触、弾 vs 敵 / プレイヤー、壁ゾーンでの敵弾遮断）

use super::behaviors::start_explosion;
use crate::world::{
    DamageSource, EnemyId, Faction, GameWorld, PlayerHit, ProjectileId, StatusEffect, ZoneKind,
};
use arena_core::physics::math::{dist_sq, is_finite2, normalize};
use std::cmp::Ordering;

/// 放物線弾はこの高さ以下でのみ当たる
const ARC_HIT_HEIGHT: f32 = 16.0;

/// 敵 vs プレイヤー。今フレーム AI を実行した敵だけを対象にする。
pub(crate) fn resolve_enemy_contacts(w: &mut GameWorld) {
    if !w.player.is_alive() {
        return;
    }
    let (px, py) = (w.player.x, w.player.y);
    let player_r = w.player.radius * w.config.contact_radius_factor;
    let push = w.config.contact_push_force;

    let mut buf = std::mem::take(&mut w.query_buf);
    w.grid.query_into(px, py, &mut buf);
    for &key in &buf {
        let Some(e) = w.enemies.get_mut(key) else {
            continue;
        };
        if !e.is_targetable() || !e.run_collision {
            continue;
        }
        w.stats.contact_checks += 1;
        let hit_r = e.radius + player_r;
        let (dx, dy) = (e.x - px, e.y - py);
        if dx * dx + dy * dy >= hit_r * hit_r {
            continue;
        }
        // 重なったら双方を押し離す（完全に重なっていたら +x 方向）
        let (nx, ny, len) = normalize(dx, dy);
        let (nx, ny) = if len > 0.0 { (nx, ny) } else { (1.0, 0.0) };
        e.add_impulse(nx * push, ny * push);
        let damage = e.contact_damage;
        w.player.add_impulse(-nx * push * 0.5, -ny * push * 0.5);

        let hit = w.damage_player(damage);
        let thorns = w.player.stats.thorns;
        if hit != PlayerHit::Ignored && thorns > 0.0 {
            w.damage_enemy(key, thorns, false, DamageSource::Thorns);
        }
    }
    w.query_buf = buf;
}

/// 壁ゾーンの中に入った敵弾を消す
pub(crate) fn resolve_wall_blocks(w: &mut GameWorld) {
    if !w.zones.iter().any(|z| z.kind == ZoneKind::Wall) {
        return;
    }
    let len = w.projectiles.live_len();
    for i in (0..len).rev() {
        let Some(key) = w.projectiles.key_at(i) else {
            continue;
        };
        let Some(p) = w.projectiles.get(key) else {
            continue;
        };
        if p.owner != Faction::Enemy || !p.is_flying() {
            continue;
        }
        let (x, y, r) = (p.x, p.y, p.radius);
        let blocked = w.zones.iter().any(|z| z.kind == ZoneKind::Wall && z.contains(x, y, r));
        if blocked {
            w.emit_particles(x, y, 3, [0.8, 0.8, 1.0, 1.0]);
            w.projectiles.release_at(i);
        }
    }
}

/// 飛行中の弾 vs 敵 / プレイヤー。消えるべき弾はその場で swap-pop する。
pub(crate) fn resolve_projectile_hits(w: &mut GameWorld) {
    let len = w.projectiles.live_len();
    for i in (0..len).rev() {
        let Some(key) = w.projectiles.key_at(i) else {
            continue;
        };
        let Some(p) = w.projectiles.get(key) else {
            continue;
        };
        // 非有限座標は距離判定が NaN になるので対象外（解放は弾の更新側）
        if !p.is_flying() || !is_finite2(p.x, p.y) || p.z > ARC_HIT_HEIGHT {
            continue;
        }
        // ダメージ 0 の非爆発弾はエフェクト専用
        if p.damage <= 0.0 && p.explosion.is_none() {
            continue;
        }
        let owner = p.owner;
        let destroy = match owner {
            Faction::Player => hit_enemies(w, key),
            Faction::Enemy => hit_player(w, key),
        };
        if destroy && w.projectiles.key_at(i) == Some(key) {
            w.projectiles.release_at(i);
        }
    }
}

/// 候補を近い順に処理する。貫通が尽きたら true（弾を消す）。
fn hit_enemies(w: &mut GameWorld, pkey: ProjectileId) -> bool {
    let Some(p) = w.projectiles.get(pkey) else {
        return false;
    };
    let (bx, by, br) = (p.x, p.y, p.radius);

    let mut buf = std::mem::take(&mut w.query_buf);
    let mut hits = std::mem::take(&mut w.hit_buf);
    hits.clear();
    w.grid.query_into(bx, by, &mut buf);
    for &ek in &buf {
        let Some(e) = w.enemies.get(ek) else {
            continue;
        };
        if !e.is_targetable() || p.hit_ids.contains(&ek) {
            continue;
        }
        w.stats.projectile_checks += 1;
        let r = e.radius + br;
        let d = dist_sq(e.x, e.y, bx, by);
        if d < r * r {
            hits.push((d, ek));
        }
    }
    w.query_buf = buf;
    hits.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    let mut destroy = false;
    for &(_, ek) in &hits {
        // 直前の命中で撃破された可能性があるので再確認
        if !w.enemies.get(ek).is_some_and(|e| e.is_targetable()) {
            continue;
        }
        let Some(p) = w.projectiles.get_mut(pkey) else {
            break;
        };
        p.hit_ids.push(ek);
        let crit = w.rng.chance(p.crit_chance + w.player.stats.crit_chance);
        let mult = if crit { p.crit_mult.max(w.player.stats.crit_mult) } else { 1.0 };
        let damage = p.damage * w.player.stats.damage_mult * mult;
        let (nx, ny, _) = normalize(p.vx, p.vy);
        let (knockback, on_hit, explosive) = (p.knockback, p.on_hit, p.explosion.is_some());
        let pierce_left = p.pierce;
        p.pierce = p.pierce.saturating_sub(1);

        // 直撃ダメージ 0 の爆発弾は当たった瞬間に爆発するだけ
        if damage > 0.0 {
            apply_hit(w, ek, damage, crit, nx * knockback, ny * knockback, on_hit);
        }

        if explosive {
            if let Some(p) = w.projectiles.get_mut(pkey) {
                start_explosion(&mut w.events, p);
            }
            break;
        }
        if pierce_left == 0 {
            destroy = true;
            break;
        }
    }
    w.hit_buf = hits;
    destroy
}

fn apply_hit(
    w: &mut GameWorld,
    ek: EnemyId,
    damage: f32,
    crit: bool,
    kx: f32,
    ky: f32,
    on_hit: Option<StatusEffect>,
) {
    if let Some(e) = w.enemies.get_mut(ek) {
        e.add_impulse(kx, ky);
        if let Some(effect) = on_hit {
            e.status.apply(effect);
        }
    }
    w.damage_enemy(ek, damage, crit, DamageSource::Projectile);
}

/// 敵弾 vs プレイヤー。当たったら true（爆発弾はその場で爆発させて残す）。
fn hit_player(w: &mut GameWorld, pkey: ProjectileId) -> bool {
    if !w.player.is_alive() {
        return false;
    }
    let (px, py, pr) = (w.player.x, w.player.y, w.player.radius);
    let Some(p) = w.projectiles.get_mut(pkey) else {
        return false;
    };
    let r = p.radius + pr;
    if p.hit_player || dist_sq(p.x, p.y, px, py) >= r * r {
        return false;
    }
    if p.explosion.is_some() {
        start_explosion(&mut w.events, p);
        return false;
    }
    p.hit_player = true;
    let damage = p.damage;
    w.damage_player(damage);
    true
}
