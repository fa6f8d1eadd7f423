//! Path: native/arena_sim/benches/tick_bench.rs
//! Summary: 敵 1,000 / 弾 / パーティクル込みの Simulation::tick ベンチマーク

use arena_sim::world::LINEAR_BEHAVIORS;
use arena_sim::{ProjectileSpec, Simulation};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

#[derive(Clone, Copy)]
struct Scenario {
    name:        &'static str,
    enemies:     usize,
    projectiles: usize,
    particles:   usize,
}

fn build_sim(s: Scenario) -> Simulation {
    let mut sim = Simulation::with_defaults().expect("default config is valid");
    let (cx, cy) = (sim.world.player.x, sim.world.player.y);
    for i in 0..s.enemies {
        let x = ((i * 13) % 3800) as f32 + 100.0;
        let y = ((i * 17) % 3800) as f32 + 100.0;
        sim.world.spawn_enemy((i % 4) as u8, x, y);
    }
    for i in 0..s.projectiles {
        let angle = i as f32 * 0.017;
        sim.world.spawn_projectile(&ProjectileSpec {
            x: cx,
            y: cy,
            vx: angle.cos() * 8.0,
            vy: angle.sin() * 8.0,
            pierce: 1,
            behaviors: LINEAR_BEHAVIORS,
            ..ProjectileSpec::default()
        });
    }
    for i in 0..s.particles / 10 {
        let t = i as f32;
        sim.world.emit_particles(cx + (t * 0.11).sin() * 300.0, cy + (t * 0.07).cos() * 200.0, 10, [1.0, 0.8, 0.2, 1.0]);
    }
    // 生成直後の Spawning 状態を抜けさせておく
    sim.tick();
    sim
}

fn bench_tick(c: &mut Criterion) {
    let scenarios = [
        Scenario { name: "tick_1k_enemies",        enemies: 1_000, projectiles: 0,   particles: 0 },
        Scenario { name: "tick_1k_enemies_loaded", enemies: 1_000, projectiles: 300, particles: 1_000 },
        Scenario { name: "tick_5k_enemies",        enemies: 5_000, projectiles: 300, particles: 1_000 },
    ];

    for s in scenarios {
        c.bench_function(s.name, |b| {
            b.iter_batched(
                || build_sim(s),
                |mut sim| {
                    sim.tick();
                    sim
                },
                BatchSize::LargeInput,
            )
        });
    }
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
