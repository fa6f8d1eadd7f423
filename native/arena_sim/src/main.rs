//! Path: native/arena_sim/src/main.rs
//! Summary: ヘッドレス実行（設定 JSON の読み込み・ウェーブ生成・サンプルアイテム・定期サマリ）
//!
//! 使い方: `arena_headless [config.json] [ticks]`。ログは `RUST_LOG` で制御する。

use arena_core::enemy_config::{ENEMY_ID_ARCHER, ENEMY_ID_GRUNT, ENEMY_ID_RUNNER, ENEMY_ID_WARLORD};
use arena_core::physics::math::normalize;
use arena_core::SimpleRng;
use arena_sim::world::{
    Behavior, EnemyId, ExplosionSpec, Faction, StatusEffect, GRENADE_BEHAVIORS,
};
use arena_sim::{
    area_damage, find_nearest_enemy, DamageSource, EnemyConfigTable, FrameEvent, GameWorld,
    ItemHook, KillRecord, ProjectileSpec, SimConfig, Simulation,
};

const DEFAULT_TICKS: u64 = 3600;
const WAVE_INTERVAL: u64 = 600;
const SUMMARY_INTERVAL: u64 = 300;
const FIRE_INTERVAL: u64 = 12;
const GRENADE_INTERVAL: u64 = 90;
const SPAWN_RING_RADIUS: f32 = 900.0;

const HOMING_BOLT: &[Behavior] = &[
    Behavior::MoveLinear,
    Behavior::Homing { turn_rate: 0.12, range: 500.0 },
    Behavior::DecayLife,
    Behavior::Trail { interval: 4 },
    Behavior::CheckBounds,
];

// ── サンプルアイテム ─────────────────────────────────────────────

/// 30 フレームごとにプレイヤー周囲へ焼けるオーラ
struct EmberAura;

impl ItemHook for EmberAura {
    fn name(&self) -> &str {
        "ember_aura"
    }

    fn on_tick(&mut self, world: &mut GameWorld, stacks: u32) {
        if world.frame % 30 != 0 {
            return;
        }
        let (x, y) = (world.player.x, world.player.y);
        let radius = 90.0 + 20.0 * stacks as f32;
        area_damage(world, x, y, radius, 2.0 * stacks as f32, Faction::Enemy, DamageSource::Hook);
    }
}

/// 撃破地点で小爆発（連鎖はレジストリ側で上限あり）
struct VolatileCorpses;

impl ItemHook for VolatileCorpses {
    fn name(&self) -> &str {
        "volatile_corpses"
    }

    fn on_kill(&mut self, world: &mut GameWorld, kill: &KillRecord, stacks: u32) {
        if kill.source == DamageSource::Hook {
            return;
        }
        area_damage(world, kill.x, kill.y, 60.0, 5.0 * stacks as f32, Faction::Enemy, DamageSource::Hook);
    }
}

/// ウェーブ開始時に盾を補充し、少し回復する
struct WaveShield;

impl ItemHook for WaveShield {
    fn name(&self) -> &str {
        "wave_shield"
    }

    fn on_wave_start(&mut self, world: &mut GameWorld, _wave: u32, stacks: u32) {
        world.player.shield = world.player.shield.max(stacks);
        world.player.heal(10.0 * stacks as f32);
    }
}

// ── ドライバ ─────────────────────────────────────────────────────

fn spawn_wave(sim: &mut Simulation, rng: &mut SimpleRng, wave: u32) {
    let (px, py) = (sim.world.player.x, sim.world.player.y);
    let count = 40 + wave * 60;
    for i in 0..count {
        let angle = rng.angle();
        let dist = SPAWN_RING_RADIUS + rng.range(0.0, 1500.0);
        let (x, y, _) = sim.world.contain(px + angle.cos() * dist, py + angle.sin() * dist, 32.0);
        let id = match i % 10 {
            0 | 1 => ENEMY_ID_RUNNER,
            2 => ENEMY_ID_ARCHER,
            _ => ENEMY_ID_GRUNT,
        };
        sim.world.spawn_enemy_with_intro(id, x, y, 30);
    }
    if wave % 3 == 0 {
        sim.world.spawn_enemy_with_intro(ENEMY_ID_WARLORD, px + SPAWN_RING_RADIUS, py, 60);
    }
    sim.start_wave(wave);
    log::info!("wave {}: spawned {} enemies (alive {})", wave, count, sim.world.enemy_count());
}

/// 入力層の代わりにプレイヤーを円運動させ、最寄りの敵へ撃つ
fn drive_player(w: &mut GameWorld, buf: &mut Vec<EnemyId>) {
    let t = w.frame as f32 * 0.01;
    w.player.vx = t.cos() * 2.5;
    w.player.vy = t.sin() * 2.5;

    let (px, py) = (w.player.x, w.player.y);
    let Some(target) = find_nearest_enemy(&w.grid, &w.enemies, px, py, 700.0, buf) else {
        return;
    };
    let Some((tx, ty)) = w.enemies.get(target).map(|e| (e.x, e.y)) else {
        return;
    };
    let (dx, dy, _) = normalize(tx - px, ty - py);

    if w.frame % FIRE_INTERVAL == 0 {
        w.spawn_projectile(&ProjectileSpec {
            x: px,
            y: py,
            vx: dx * 9.0,
            vy: dy * 9.0,
            // 倍率・会心率はプレイヤーのステータスが命中時に乗る
            damage: 12.0,
            pierce: 1,
            on_hit: Some(StatusEffect::Burn { damage_per_frame: 0.2, frames: 60 }),
            behaviors: HOMING_BOLT,
            ..ProjectileSpec::default()
        });
    }
    if w.frame % GRENADE_INTERVAL == 0 {
        w.spawn_projectile(&ProjectileSpec {
            x: px,
            y: py,
            vx: dx * 6.0,
            vy: dy * 6.0,
            life: 40,
            damage: 0.0,
            explosion: Some(ExplosionSpec::from_config(120.0, 30.0, &w.config)),
            behaviors: GRENADE_BEHAVIORS,
            render_kind: 7,
            ..ProjectileSpec::default()
        });
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = env_logger::Builder::from_default_env().try_init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            log::info!("loading config from {}", path);
            SimConfig::load(&path)?
        }
        None => SimConfig::default(),
    };
    let ticks = match args.next() {
        Some(n) => n.parse::<u64>()?,
        None => DEFAULT_TICKS,
    };

    let mut rng = SimpleRng::new(config.rng_seed ^ 0x5EED);
    let mut sim = Simulation::new(config, EnemyConfigTable::default())?;
    sim.register_item(Box::new(EmberAura));
    sim.register_item(Box::new(EmberAura));
    sim.register_item(Box::new(VolatileCorpses));
    sim.register_item(Box::new(WaveShield));

    let mut buf = Vec::new();
    let mut kills = 0u64;
    let mut damage_events = 0u64;
    let mut slow_ticks = 0u64;
    let mut wave = 0;

    for tick in 0..ticks {
        if tick % WAVE_INTERVAL == 0 {
            wave += 1;
            spawn_wave(&mut sim, &mut rng, wave);
        }
        drive_player(&mut sim.world, &mut buf);
        sim.tick();

        for event in sim.drain_events() {
            match event {
                FrameEvent::EnemyDied { .. } => kills += 1,
                FrameEvent::EnemyDamaged { .. } => damage_events += 1,
                FrameEvent::PlayerHurt { hp_left, .. } if hp_left <= 0.0 => {
                    log::info!("player fell at frame {}", sim.world.frame);
                }
                _ => {}
            }
        }
        let stats = sim.world.stats;
        if stats.last_tick_ms > sim.world.config.frame_budget_ms {
            slow_ticks += 1;
        }

        if (tick + 1) % SUMMARY_INTERVAL == 0 {
            log::info!(
                "frame {}: enemies {} (crit {} / near {} / far {}), ai {} inertial {}, projectiles {}, particles {}, kills {}, hp {:.0}, {:.2}ms",
                sim.world.frame,
                sim.world.enemy_count(),
                stats.critical,
                stats.near,
                stats.far,
                stats.ai_updates,
                stats.inertial_updates,
                sim.world.projectile_count(),
                sim.world.particles.live_len(),
                kills,
                sim.world.player.hp,
                stats.last_tick_ms,
            );
        }
        if sim.world.player.hp <= 0.0 {
            break;
        }
    }

    log::info!(
        "done: {} frames, {} kills, {} hits, {} slow ticks, {} events dropped",
        sim.world.frame,
        kills,
        damage_events,
        slow_ticks,
        sim.world.events.dropped()
    );
    Ok(())
}
