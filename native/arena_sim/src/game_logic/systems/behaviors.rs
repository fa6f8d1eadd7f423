//! Path: native/arena_sim/src/game_logic/systems/behaviors.rs
//! Summary: 弾の合成挙動（Behavior タグ）の適用と爆発開始
//!
//! 各挙動は (コンテキスト, 弾) を受け取り弾をその場で書き換える。
//! 挙動同士は互いを知らない。

use crate::game_logic::targeting::find_nearest_enemy;
use crate::world::{
    Behavior, Enemy, EnemyId, EventQueue, Faction, FrameEvent, Particle, ParticleId, Player,
    Projectile, ProjectilePhase,
};
use arena_core::physics::math::{normalize, wrap_angle};
use arena_core::{EntityPool, SpatialHash};

/// 挙動リストを持たない（合成以前の）弾に適用する固定シーケンス
pub const LEGACY_SEQUENCE: &[Behavior] = &[
    Behavior::MoveLinear,
    Behavior::DecayLife,
    Behavior::CheckBounds,
    Behavior::ExplodeOnExpire,
];

/// 挙動が読み書きできるワールドの一部
pub(crate) struct BehaviorCtx<'a> {
    pub enemies:    &'a EntityPool<EnemyId, Enemy>,
    pub grid:       &'a SpatialHash<EnemyId>,
    pub player:     &'a Player,
    pub particles:  &'a mut EntityPool<ParticleId, Particle>,
    pub events:     &'a mut EventQueue,
    pub query_buf:  &'a mut Vec<EnemyId>,
    pub map_width:  f32,
    pub map_height: f32,
}

/// 弾の挙動リスト（空ならレガシーシーケンス）を先頭から適用する。爆発を始めたらそこで止める。
pub(crate) fn run_behaviors(ctx: &mut BehaviorCtx<'_>, p: &mut Projectile) {
    if p.behaviors.is_empty() {
        for &b in LEGACY_SEQUENCE {
            apply_behavior(b, ctx, p);
            if !p.is_flying() {
                break;
            }
        }
        return;
    }
    let behaviors = std::mem::take(&mut p.behaviors);
    for &b in &behaviors {
        apply_behavior(b, ctx, p);
        if !p.is_flying() {
            break;
        }
    }
    p.behaviors = behaviors;
}

pub(crate) fn apply_behavior(b: Behavior, ctx: &mut BehaviorCtx<'_>, p: &mut Projectile) {
    match b {
        Behavior::MoveLinear => {
            p.x += p.vx;
            p.y += p.vy;
        }
        Behavior::Homing { turn_rate, range } => homing(ctx, p, turn_rate, range),
        Behavior::SineWave { amplitude, frequency } => {
            // 前フレームのずれとの差分だけ進行方向の法線方向へ動かす
            let (nx, ny, len) = normalize(p.vx, p.vy);
            if len > 0.0 {
                let offset = amplitude * (p.age as f32 * frequency).sin();
                let delta = offset - p.sine_offset;
                p.x += -ny * delta;
                p.y += nx * delta;
                p.sine_offset = offset;
            }
        }
        Behavior::GravityArc { gravity } => {
            p.z += p.vz;
            p.vz -= gravity;
            if p.z <= 0.0 {
                p.z = 0.0;
                p.vz = 0.0;
                p.life = 0;
            }
        }
        Behavior::DecayLife => p.life -= 1,
        Behavior::Trail { interval } => {
            if interval > 0 && p.age % interval == 0 {
                let (x, y) = (p.x, p.y);
                ctx.particles.acquire_with(|t| {
                    t.x        = x;
                    t.y        = y;
                    t.life     = 12;
                    t.max_life = 12;
                    t.size     = p.radius.max(2.0);
                    t.color    = [1.0, 0.8, 0.4, 0.6];
                });
            }
        }
        Behavior::CheckBounds => check_bounds(ctx, p),
        Behavior::ExplodeOnExpire => {
            if p.life <= 0 && p.explosion.is_some() {
                start_explosion(ctx.events, p);
            }
        }
    }
}

/// 旋回上限付きの追尾。敵弾はプレイヤー、自弾は範囲内の最寄りの敵を狙う。
fn homing(ctx: &mut BehaviorCtx<'_>, p: &mut Projectile, turn_rate: f32, range: f32) {
    let target = match p.owner {
        Faction::Player => {
            let current = p
                .homing_target
                .and_then(|k| ctx.enemies.get(k))
                .filter(|e| e.is_targetable())
                .map(|e| (e.x, e.y));
            match current {
                Some(pos) => Some(pos),
                None => {
                    p.homing_target = find_nearest_enemy(ctx.grid, ctx.enemies, p.x, p.y, range, ctx.query_buf);
                    p.homing_target.and_then(|k| ctx.enemies.get(k)).map(|e| (e.x, e.y))
                }
            }
        }
        Faction::Enemy => ctx.player.is_alive().then_some((ctx.player.x, ctx.player.y)),
    };
    let Some((tx, ty)) = target else {
        return;
    };
    let speed = (p.vx * p.vx + p.vy * p.vy).sqrt();
    if speed < 1e-4 {
        return;
    }
    let current = p.vy.atan2(p.vx);
    let desired = (ty - p.y).atan2(tx - p.x);
    let turn = wrap_angle(desired - current).clamp(-turn_rate, turn_rate);
    let heading = current + turn;
    p.vx = heading.cos() * speed;
    p.vy = heading.sin() * speed;
}

/// マップ外に出たらマップ端へ戻し、爆発するか寿命 0 にする
fn check_bounds(ctx: &mut BehaviorCtx<'_>, p: &mut Projectile) {
    let (w, h) = (ctx.map_width, ctx.map_height);
    if (0.0..=w).contains(&p.x) && (0.0..=h).contains(&p.y) {
        return;
    }
    p.x = p.x.clamp(0.0, w);
    p.y = p.y.clamp(0.0, h);
    ctx.events.push(FrameEvent::WallHit { x: p.x, y: p.y });
    if p.explosion.is_some() {
        start_explosion(ctx.events, p);
    } else {
        p.life = 0;
    }
}

/// 飛行中の弾を爆発状態へ移す。爆発パラメータが無ければ寿命 0 にするだけ。
pub(crate) fn start_explosion(events: &mut EventQueue, p: &mut Projectile) {
    if !p.is_flying() {
        return;
    }
    let Some(spec) = p.explosion else {
        p.life = 0;
        return;
    };
    p.phase  = ProjectilePhase::Exploding { elapsed: 0 };
    p.radius = spec.radius;
    p.vx     = 0.0;
    p.vy     = 0.0;
    p.z      = 0.0;
    p.vz     = 0.0;
    p.life   = spec.damage_window.saturating_add(spec.fade_frames).max(1) as i32;
    // 爆風は直撃とは別のダメージとして数える
    p.hit_ids.clear();
    p.hit_player = false;
    events.push(FrameEvent::ProjectileExploded { x: p.x, y: p.y, radius: spec.radius, owner: p.owner });
    log::debug!("projectile exploded at ({:.0}, {:.0}) r={}", p.x, p.y, spec.radius);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{ExplosionSpec, GRENADE_BEHAVIORS};

    struct Fixture {
        enemies:   EntityPool<EnemyId, Enemy>,
        grid:      SpatialHash<EnemyId>,
        player:    Player,
        particles: EntityPool<ParticleId, Particle>,
        events:    EventQueue,
        buf:       Vec<EnemyId>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                enemies:   EntityPool::new(),
                grid:      SpatialHash::new(400.0),
                player:    Player::new(1000.0, 1000.0),
                particles: EntityPool::new(),
                events:    EventQueue::new(64),
                buf:       Vec::new(),
            }
        }

        fn ctx(&mut self) -> BehaviorCtx<'_> {
            BehaviorCtx {
                enemies:    &self.enemies,
                grid:       &self.grid,
                player:     &self.player,
                particles:  &mut self.particles,
                events:     &mut self.events,
                query_buf:  &mut self.buf,
                map_width:  2000.0,
                map_height: 2000.0,
            }
        }
    }

    fn grenade() -> Projectile {
        Projectile {
            x: 100.0,
            y: 100.0,
            vx: 5.0,
            life: 2,
            explosion: Some(ExplosionSpec { radius: 80.0, damage: 10.0, damage_window: 3, fade_frames: 7 }),
            ..Projectile::default()
        }
    }

    #[test]
    fn legacy_sequence_moves_and_expires() {
        let mut fx = Fixture::new();
        let mut p = Projectile { x: 10.0, vx: 2.0, life: 1, ..Projectile::default() };
        run_behaviors(&mut fx.ctx(), &mut p);
        assert_eq!((p.x, p.life), (12.0, 0));
        assert!(p.is_flying());
    }

    #[test]
    fn explode_on_expire_needs_decay_first() {
        let mut fx = Fixture::new();
        let mut p = grenade();
        p.behaviors.extend_from_slice(GRENADE_BEHAVIORS);
        run_behaviors(&mut fx.ctx(), &mut p);
        assert!(p.is_flying());
        run_behaviors(&mut fx.ctx(), &mut p);
        assert_eq!(p.phase, ProjectilePhase::Exploding { elapsed: 0 });
        assert_eq!(p.life, 10);
        assert_eq!((p.vx, p.radius), (0.0, 80.0));
        assert_eq!(p.behaviors.len(), GRENADE_BEHAVIORS.len());
        assert!(fx.events.iter().any(|e| matches!(e, FrameEvent::ProjectileExploded { .. })));
    }

    #[test]
    fn explosive_projectile_explodes_at_the_wall() {
        let mut fx = Fixture::new();
        let mut p = Projectile { x: 1998.0, vx: 10.0, ..grenade() };
        p.life = 100;
        p.behaviors.extend_from_slice(GRENADE_BEHAVIORS);
        run_behaviors(&mut fx.ctx(), &mut p);
        assert!(p.is_exploding());
        assert_eq!(p.x, 2000.0);
        assert!(fx.events.iter().any(|e| matches!(e, FrameEvent::WallHit { .. })));
    }

    #[test]
    fn plain_projectile_dies_at_the_wall() {
        let mut fx = Fixture::new();
        let mut p = Projectile { x: 5.0, vx: -10.0, life: 100, ..Projectile::default() };
        apply_behavior(Behavior::MoveLinear, &mut fx.ctx(), &mut p);
        apply_behavior(Behavior::CheckBounds, &mut fx.ctx(), &mut p);
        assert_eq!((p.x, p.life), (0.0, 0));
    }

    #[test]
    fn gravity_arc_lands_and_expires() {
        let mut fx = Fixture::new();
        let mut p = Projectile { vz: 3.0, life: 100, ..Projectile::default() };
        let mut frames = 0;
        while p.life > 0 && frames < 100 {
            apply_behavior(Behavior::GravityArc { gravity: 1.0 }, &mut fx.ctx(), &mut p);
            frames += 1;
        }
        assert_eq!(p.z, 0.0);
        assert!(frames > 2 && frames < 10);
    }

    #[test]
    fn homing_turns_at_most_turn_rate() {
        let mut fx = Fixture::new();
        let target = fx.enemies.acquire_with(|e| {
            e.x = 100.0;
            e.y = 200.0;
        });
        fx.grid.insert(target, 100.0, 200.0);
        let mut p = Projectile { x: 100.0, y: 100.0, vx: 5.0, ..Projectile::default() };
        apply_behavior(Behavior::Homing { turn_rate: 0.1, range: 500.0 }, &mut fx.ctx(), &mut p);
        assert_eq!(p.homing_target, Some(target));
        let heading = p.vy.atan2(p.vx);
        assert!((heading - 0.1).abs() < 1e-4);
        assert!(((p.vx * p.vx + p.vy * p.vy).sqrt() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn enemy_homing_tracks_player() {
        let mut fx = Fixture::new();
        let mut p = Projectile { owner: Faction::Enemy, x: 900.0, y: 1000.0, vx: 0.0, vy: -3.0, ..Projectile::default() };
        for _ in 0..40 {
            apply_behavior(Behavior::Homing { turn_rate: 0.2, range: 0.0 }, &mut fx.ctx(), &mut p);
        }
        assert!(p.vx > 2.9);
    }

    #[test]
    fn sine_wave_returns_to_the_base_line() {
        let mut fx = Fixture::new();
        let mut p = Projectile { vx: 1.0, ..Projectile::default() };
        let frequency = std::f32::consts::PI / 10.0;
        for age in 0..=20 {
            p.age = age;
            apply_behavior(Behavior::SineWave { amplitude: 30.0, frequency }, &mut fx.ctx(), &mut p);
        }
        assert!(p.y.abs() < 1e-3);
        assert_eq!(p.x, 0.0);
    }

    #[test]
    fn trail_emits_on_interval() {
        let mut fx = Fixture::new();
        let mut p = Projectile { radius: 4.0, ..Projectile::default() };
        for age in 0..9 {
            p.age = age;
            apply_behavior(Behavior::Trail { interval: 3 }, &mut fx.ctx(), &mut p);
        }
        assert_eq!(fx.particles.live_len(), 3);
    }
}
