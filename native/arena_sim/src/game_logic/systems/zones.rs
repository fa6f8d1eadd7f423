//! Path: native/arena_sim/src/game_logic/systems/zones.rs
//! Summary: ゾーン更新（リング拡大・危険地帯の周期ダメージ・遅延爆発・壁の押し出し・捕獲ビーコン）

use crate::world::{
    DamageSource, EnemyId, EnemyState, Faction, FrameEvent, GameWorld, Zone, ZoneKind,
};
use arena_core::constants::ENEMY_MAX_RADIUS;
use arena_core::physics::math::{dist_sq, normalize};

/// 遅延爆発の後に出す見た目用リングの寿命
const BLAST_RING_FRAMES: u32 = 20;

pub(crate) fn update_zones(w: &mut GameWorld) {
    for i in (0..w.zones.len()).rev() {
        let zone = w.zones[i];
        match zone.kind {
            ZoneKind::Ring { max_radius } => {
                w.zones[i].radius = max_radius * zone.progress();
            }
            ZoneKind::Hazard { damage, interval, victims } => {
                let age = zone.max_life - zone.life;
                if interval > 0 && age % interval == 0 {
                    area_damage(w, zone.x, zone.y, zone.radius, damage, victims, DamageSource::Zone);
                }
            }
            ZoneKind::DelayedBlast { .. } => {}
            ZoneKind::Wall => push_out_enemies(w, &zone),
            ZoneKind::CaptureBeacon { target } => {
                // 対象が消えた・解放されたビーコンは即座に畳む
                if !is_still_captured(w, target) {
                    w.zones[i].life = 0;
                }
            }
        }

        let z = &mut w.zones[i];
        z.life = z.life.saturating_sub(1);
        if z.life == 0 {
            let expired = w.zones.swap_remove(i);
            on_zone_expired(w, expired);
        }
    }
}

fn is_still_captured(w: &GameWorld, target: EnemyId) -> bool {
    w.enemies
        .get(target)
        .is_some_and(|e| e.active && !e.dying && matches!(e.state, EnemyState::Captured { .. }))
}

fn on_zone_expired(w: &mut GameWorld, zone: Zone) {
    match zone.kind {
        ZoneKind::DelayedBlast { damage, victims } => {
            area_damage(w, zone.x, zone.y, zone.radius, damage, victims, DamageSource::Zone);
            w.events.push(FrameEvent::BlastDetonated { x: zone.x, y: zone.y, radius: zone.radius });
            w.zones.push(Zone::new(
                zone.x,
                zone.y,
                0.0,
                BLAST_RING_FRAMES,
                ZoneKind::Ring { max_radius: zone.radius },
            ));
        }
        ZoneKind::CaptureBeacon { target } => {
            // ビーコンが先に切れたら捕獲も解く
            if let Some(e) = w.enemies.get_mut(target) {
                if matches!(e.state, EnemyState::Captured { .. }) {
                    e.state = EnemyState::Normal;
                    e.vx = 0.0;
                    e.vy = 0.0;
                }
            }
        }
        _ => {}
    }
}

/// 範囲内の `victims` 側へダメージ（敵側は爆発と同じ上限）
pub fn area_damage(
    w: &mut GameWorld,
    x: f32,
    y: f32,
    radius: f32,
    damage: f32,
    victims: Faction,
    source: DamageSource,
) {
    match victims {
        Faction::Player => {
            let r = radius + w.player.radius;
            if dist_sq(w.player.x, w.player.y, x, y) <= r * r {
                w.damage_player(damage);
            }
        }
        Faction::Enemy => {
            let cap = w.config.explosion_max_targets.max(1);
            let mut buf = std::mem::take(&mut w.query_buf);
            w.grid.query_radius_into(x, y, radius + ENEMY_MAX_RADIUS, &mut buf);
            let mut hit = 0;
            for &ek in &buf {
                if hit >= cap {
                    break;
                }
                let inside = w.enemies.get(ek).is_some_and(|e| {
                    let r = radius + e.radius;
                    e.is_targetable() && dist_sq(e.x, e.y, x, y) <= r * r
                });
                if inside {
                    w.damage_enemy(ek, damage, false, source);
                    hit += 1;
                }
            }
            w.query_buf = buf;
        }
    }
}

/// 壁の中に入った敵を縁まで押し出す
fn push_out_enemies(w: &mut GameWorld, zone: &Zone) {
    let mut buf = std::mem::take(&mut w.query_buf);
    w.grid.query_radius_into(zone.x, zone.y, zone.radius + ENEMY_MAX_RADIUS, &mut buf);
    for &ek in &buf {
        let Some(e) = w.enemies.get_mut(ek) else {
            continue;
        };
        let min = zone.radius + e.radius;
        let (nx, ny, dist) = normalize(e.x - zone.x, e.y - zone.y);
        if dist >= min {
            continue;
        }
        let (nx, ny) = if dist > 0.0 { (nx, ny) } else { (1.0, 0.0) };
        e.x = zone.x + nx * min;
        e.y = zone.y + ny * min;
    }
    w.query_buf = buf;
}
