//! Path: native/arena_sim/src/game_logic/systems/skills.rs
//! Summary: アーキタイプ別スキル（召喚・回復・旋回・スタン・突進・ボス）、移動方向決定、攻撃判断

use super::scheduler::{integrate_enemy, Flow};
use crate::world::{
    BossPhase, ChargePhase, EnemyId, EnemyState, Faction, FrameEvent, GameWorld, ProjectileSpec,
    SkillState, Zone, ZoneKind, LINEAR_BEHAVIORS,
};
use arena_core::constants::ENEMY_STEER_FACTOR;
use arena_core::physics::math::{dist_sq, normalize};
use arena_core::EnemyBehavior;
use std::f32::consts::TAU;

/// 召喚された手下の出現演出フレーム数
const SUMMON_INTRO_FRAMES: u32 = 20;
/// これ以上の生存数では召喚しない
const SUMMON_POPULATION_CAP: usize = 2000;
/// 1 回の回復で癒やす最大数
const HEAL_MAX_TARGETS: usize = 8;
/// 突進を始める距離
const CHARGE_TRIGGER_DISTANCE: f32 = 600.0;
/// ボスの Burst 後の硬直
const BOSS_RECOVER_FRAMES: u32 = 60;
/// ボス弾の既定値（攻撃設定が無い場合）
const BOSS_BURST_SPEED: f32 = 4.0;
const BOSS_BURST_DAMAGE: f32 = 10.0;
const BOSS_BURST_LIFE: i32 = 240;

/// (c) スキル。`Flow::Continue` 以外を返したら移動・攻撃は行わない。
pub(crate) fn run_skill(w: &mut GameWorld, key: EnemyId, elapsed: u32) -> Flow {
    let Some(e) = w.enemies.get(key) else {
        return Flow::Stop;
    };
    if e.status.is_stunned() {
        return Flow::Continue;
    }
    match (e.behavior, e.skill) {
        (EnemyBehavior::Summoner { minion_id, count, cooldown_frames }, SkillState::Summoner { cooldown }) => {
            summon(w, key, minion_id, count, cooldown_frames, cooldown, elapsed)
        }
        (EnemyBehavior::Healer { radius, amount, cooldown_frames }, SkillState::Healer { cooldown }) => {
            heal_allies(w, key, radius, amount, cooldown_frames, cooldown, elapsed)
        }
        (EnemyBehavior::Orbiter { orbit_radius, angular_speed }, SkillState::Orbiter { angle }) => {
            orbit(w, key, orbit_radius, angular_speed, angle, elapsed)
        }
        (EnemyBehavior::Stunner { radius, stun_frames, cooldown_frames }, SkillState::Stunner { cooldown }) => {
            stun_pulse(w, key, radius, stun_frames, cooldown_frames, cooldown, elapsed)
        }
        (
            EnemyBehavior::Charger { windup_frames, dash_frames, dash_speed, cooldown_frames },
            SkillState::Charger { phase, timer },
        ) => charge(w, key, windup_frames, dash_frames, dash_speed, cooldown_frames, phase, timer, elapsed),
        (EnemyBehavior::Boss { .. }, SkillState::Boss { .. }) => boss_cycle(w, key, elapsed),
        _ => Flow::Continue,
    }
}

fn summon(
    w: &mut GameWorld,
    key: EnemyId,
    minion_id: u8,
    count: u8,
    cooldown_frames: u32,
    cooldown: u32,
    elapsed: u32,
) -> Flow {
    let population = w.enemies.live_len();
    let Some(e) = w.enemies.get_mut(key) else {
        return Flow::Stop;
    };
    let left = cooldown.saturating_sub(elapsed);
    if left > 0 || population >= SUMMON_POPULATION_CAP {
        e.skill = SkillState::Summoner { cooldown: left };
        return Flow::Continue;
    }
    e.skill = SkillState::Summoner { cooldown: cooldown_frames };
    let (x, y, r) = (e.x, e.y, e.radius);
    let n = count.max(1);
    for i in 0..n {
        let angle = TAU * f32::from(i) / f32::from(n);
        let (sx, sy, _) = w.contain(x + angle.cos() * r * 2.0, y + angle.sin() * r * 2.0, r);
        w.spawn_enemy_with_intro(minion_id, sx, sy, SUMMON_INTRO_FRAMES);
    }
    log::debug!("summoner spawned {} minions (id={})", n, minion_id);
    Flow::Stop
}

/// 前フレームのグリッドで周囲の味方を探して回復する
fn heal_allies(
    w: &mut GameWorld,
    key: EnemyId,
    radius: f32,
    amount: f32,
    cooldown_frames: u32,
    cooldown: u32,
    elapsed: u32,
) -> Flow {
    let Some(e) = w.enemies.get_mut(key) else {
        return Flow::Stop;
    };
    let left = cooldown.saturating_sub(elapsed);
    e.skill = SkillState::Healer { cooldown: left };
    if left > 0 {
        return Flow::Continue;
    }
    let (x, y) = (e.x, e.y);

    let mut buf = std::mem::take(&mut w.query_buf);
    w.grid.query_radius_into(x, y, radius, &mut buf);
    let mut healed = 0;
    for &other in &buf {
        if other == key {
            continue;
        }
        let Some(o) = w.enemies.get_mut(other) else {
            continue;
        };
        if !o.active || o.dying || o.hp >= o.max_hp || dist_sq(o.x, o.y, x, y) > radius * radius {
            continue;
        }
        o.hp = (o.hp + amount).min(o.max_hp);
        healed += 1;
        if healed >= HEAL_MAX_TARGETS {
            break;
        }
    }
    w.query_buf = buf;

    if healed == 0 {
        return Flow::Continue;
    }
    if let Some(e) = w.enemies.get_mut(key) {
        e.skill = SkillState::Healer { cooldown: cooldown_frames };
        e.vx = 0.0;
        e.vy = 0.0;
    }
    w.emit_particles(x, y, 6, [0.3, 1.0, 0.4, 1.0]);
    Flow::Stop
}

/// プレイヤーの周囲を回る（移動は自前で行い、攻撃判断だけ後段に任せる）
fn orbit(w: &mut GameWorld, key: EnemyId, orbit_radius: f32, angular_speed: f32, angle: f32, elapsed: u32) -> Flow {
    let (px, py) = (w.player.x, w.player.y);
    let (map_w, map_h) = (w.config.map_width, w.config.map_height);
    let Some(e) = w.enemies.get_mut(key) else {
        return Flow::Stop;
    };
    let angle = (angle + angular_speed * elapsed as f32) % TAU;
    let (tx, ty) = (px + angle.cos() * orbit_radius, py + angle.sin() * orbit_radius);
    let (nx, ny, dist) = normalize(tx - e.x, ty - e.y);
    let step = dist.min(e.speed * e.status.speed_factor() * elapsed as f32);
    e.vx = nx * step;
    e.vy = ny * step;
    e.skill = SkillState::Orbiter { angle };
    integrate_enemy(e, map_w, map_h);
    Flow::Continue
}

fn stun_pulse(
    w: &mut GameWorld,
    key: EnemyId,
    radius: f32,
    stun_frames: u32,
    cooldown_frames: u32,
    cooldown: u32,
    elapsed: u32,
) -> Flow {
    let (px, py) = (w.player.x, w.player.y);
    let reachable = w.player.is_alive() && w.player.invuln_frames == 0;
    let Some(e) = w.enemies.get_mut(key) else {
        return Flow::Stop;
    };
    let left = cooldown.saturating_sub(elapsed);
    e.skill = SkillState::Stunner { cooldown: left };
    let in_range = dist_sq(e.x, e.y, px, py) <= radius * radius;
    if left > 0 || !reachable || !in_range {
        return Flow::Continue;
    }
    e.skill = SkillState::Stunner { cooldown: cooldown_frames };
    e.vx = 0.0;
    e.vy = 0.0;
    w.player.stun_frames = w.player.stun_frames.max(stun_frames);
    w.events.push(FrameEvent::PlayerStunned { frames: stun_frames });
    Flow::Stop
}

#[allow(clippy::too_many_arguments)]
fn charge(
    w: &mut GameWorld,
    key: EnemyId,
    windup_frames: u32,
    dash_frames: u32,
    dash_speed: f32,
    cooldown_frames: u32,
    phase: ChargePhase,
    timer: u32,
    elapsed: u32,
) -> Flow {
    let (px, py) = (w.player.x, w.player.y);
    let Some(e) = w.enemies.get_mut(key) else {
        return Flow::Stop;
    };
    let left = timer.saturating_sub(elapsed);
    match phase {
        ChargePhase::Ready => {
            let in_range = dist_sq(e.x, e.y, px, py) <= CHARGE_TRIGGER_DISTANCE * CHARGE_TRIGGER_DISTANCE;
            if left > 0 || !in_range {
                e.skill = SkillState::Charger { phase, timer: left };
                return Flow::Continue;
            }
            e.skill = SkillState::Charger { phase: ChargePhase::Windup, timer: windup_frames };
            e.vx = 0.0;
            e.vy = 0.0;
            Flow::Stop
        }
        ChargePhase::Windup => {
            e.vx = 0.0;
            e.vy = 0.0;
            if left > 0 {
                e.skill = SkillState::Charger { phase, timer: left };
                return Flow::Stop;
            }
            // 溜め終わりの瞬間のプレイヤー方向へ突進
            let (nx, ny, _) = normalize(px - e.x, py - e.y);
            e.state = EnemyState::Dashing { frames: dash_frames, vx: nx * dash_speed, vy: ny * dash_speed };
            e.skill = SkillState::Charger { phase: ChargePhase::Ready, timer: cooldown_frames };
            Flow::Stop
        }
    }
}

/// 予告 → 範囲爆発 → 弾幕 → 硬直 のボスサイクル。非待機フェーズが長引いたら強制的に戻す。
fn boss_cycle(w: &mut GameWorld, key: EnemyId, elapsed: u32) -> Flow {
    let failsafe = w.config.skill_failsafe_frames;
    let (px, py) = (w.player.x, w.player.y);
    let Some(e) = w.enemies.get_mut(key) else {
        return Flow::Stop;
    };
    let (EnemyBehavior::Boss { blast_radius, blast_delay, burst_count, cycle_frames }, SkillState::Boss { phase, timer, stuck, enraged }) =
        (e.behavior, e.skill)
    else {
        return Flow::Continue;
    };

    let enraged = enraged || e.hp_ratio() < 0.5;
    let speed = if enraged { 2 } else { 1 };
    let step = elapsed.saturating_mul(speed);
    let stuck = if phase == BossPhase::Stalk { 0 } else { stuck.saturating_add(elapsed) };
    let cycle = if enraged { cycle_frames / 2 } else { cycle_frames }.max(1);

    if stuck > failsafe {
        log::warn!(
            "boss serial={} stuck in {:?} for {} frames; forcing back to Stalk",
            e.serial, phase, stuck
        );
        e.skill = SkillState::Boss { phase: BossPhase::Stalk, timer: cycle, stuck: 0, enraged };
        return Flow::Continue;
    }

    let left = timer.saturating_sub(step);
    let (x, y, serial, config_id) = (e.x, e.y, e.serial, e.config_id);
    match phase {
        BossPhase::Stalk => {
            if left > 0 {
                e.skill = SkillState::Boss { phase, timer: left, stuck, enraged };
                return Flow::Continue;
            }
            e.skill = SkillState::Boss { phase: BossPhase::Telegraph, timer: blast_delay, stuck, enraged };
            e.vx = 0.0;
            e.vy = 0.0;
            // プレイヤー位置と周囲に予告円を置く
            let victims = Faction::Player;
            w.spawn_zone(Zone::new(px, py, blast_radius, blast_delay, ZoneKind::DelayedBlast { damage: 25.0, victims }));
            for k in 0..3 {
                let a = TAU * k as f32 / 3.0;
                let (bx, by, _) = w.contain(px + a.cos() * blast_radius * 1.5, py + a.sin() * blast_radius * 1.5, 0.0);
                w.spawn_zone(Zone::new(bx, by, blast_radius, blast_delay, ZoneKind::DelayedBlast { damage: 25.0, victims }));
            }
            log::debug!("boss serial={} telegraphs blasts around ({:.0}, {:.0})", serial, px, py);
            Flow::Stop
        }
        BossPhase::Telegraph => {
            e.vx = 0.0;
            e.vy = 0.0;
            let next = if left > 0 { BossPhase::Telegraph } else { BossPhase::Burst };
            e.skill = SkillState::Boss { phase: next, timer: left, stuck, enraged };
            Flow::Stop
        }
        BossPhase::Burst => {
            e.skill = SkillState::Boss { phase: BossPhase::Recover, timer: BOSS_RECOVER_FRAMES, stuck, enraged };
            let attack = w.enemy_table.get(config_id).attack;
            let (speed, damage, life, render_kind) = attack
                .map(|a| (a.projectile_speed, a.damage, a.projectile_life, a.render_kind))
                .unwrap_or((BOSS_BURST_SPEED, BOSS_BURST_DAMAGE, BOSS_BURST_LIFE, 15));
            let n = burst_count.max(1);
            for i in 0..n {
                let a = TAU * f32::from(i) / f32::from(n);
                w.spawn_projectile(&ProjectileSpec {
                    owner: Faction::Enemy,
                    x,
                    y,
                    vx: a.cos() * speed,
                    vy: a.sin() * speed,
                    radius: 10.0,
                    life,
                    damage,
                    behaviors: LINEAR_BEHAVIORS,
                    render_kind,
                    ..ProjectileSpec::default()
                });
            }
            Flow::Stop
        }
        BossPhase::Recover => {
            if left > 0 {
                e.skill = SkillState::Boss { phase, timer: left, stuck, enraged };
            } else {
                e.skill = SkillState::Boss { phase: BossPhase::Stalk, timer: cycle, stuck: 0, enraged };
            }
            Flow::Continue
        }
    }
}

/// (d) 移動方向の決定と位置更新
pub(crate) fn steer(w: &mut GameWorld, key: EnemyId) {
    let (px, py) = (w.player.x, w.player.y);
    let (map_w, map_h) = (w.config.map_width, w.config.map_height);
    let Some(e) = w.enemies.get_mut(key) else {
        return;
    };
    // 旋回型は run_skill 内で移動済み
    if matches!(e.behavior, EnemyBehavior::Orbiter { .. }) && !e.status.is_stunned() {
        return;
    }
    if e.status.is_stunned() {
        e.vx = 0.0;
        e.vy = 0.0;
    } else {
        let (nx, ny, dist) = normalize(px - e.x, py - e.y);
        let speed = e.speed * e.status.speed_factor();
        let dir = match e.behavior {
            // 近すぎたら下がり、適正距離なら止まる
            EnemyBehavior::Ranged { preferred_distance } if dist < preferred_distance * 0.8 => -1.0,
            EnemyBehavior::Ranged { preferred_distance } if dist < preferred_distance => 0.0,
            _ => 1.0,
        };
        let (tvx, tvy) = (nx * speed * dir, ny * speed * dir);
        e.vx += (tvx - e.vx) * ENEMY_STEER_FACTOR;
        e.vy += (tvy - e.vy) * ENEMY_STEER_FACTOR;
    }
    integrate_enemy(e, map_w, map_h);
}

/// (e) 攻撃判断。射程内ならプレイヤーへ狙い撃つ。
pub(crate) fn decide_attack(w: &mut GameWorld, key: EnemyId) {
    let (px, py) = (w.player.x, w.player.y);
    if !w.player.is_alive() {
        return;
    }
    let Some(e) = w.enemies.get(key) else {
        return;
    };
    if e.status.is_stunned() || e.attack_cooldown > 0 {
        return;
    }
    let Some(attack) = w.enemy_table.get(e.config_id).attack else {
        return;
    };
    let (nx, ny, dist) = normalize(px - e.x, py - e.y);
    if dist > attack.range || dist == 0.0 {
        return;
    }
    let spec = ProjectileSpec {
        owner: Faction::Enemy,
        x: e.x + nx * e.radius,
        y: e.y + ny * e.radius,
        vx: nx * attack.projectile_speed,
        vy: ny * attack.projectile_speed,
        radius: 8.0,
        life: attack.projectile_life,
        damage: attack.damage,
        behaviors: LINEAR_BEHAVIORS,
        render_kind: attack.render_kind,
        ..ProjectileSpec::default()
    };
    w.spawn_projectile(&spec);
    if let Some(e) = w.enemies.get_mut(key) {
        e.attack_cooldown = attack.cooldown_frames;
    }
}
