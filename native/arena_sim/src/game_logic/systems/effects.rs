//! Path: native/arena_sim/src/game_logic/systems/effects.rs
//! Summary: パーティクル・フローティングテキストの更新（数が多いときは rayon で並列）

use crate::world::{FloatingText, GameWorld, Particle};
use arena_core::constants::PARALLEL_PARTICLE_THRESHOLD;
use rayon::iter::{ParallelBridge, ParallelIterator};

fn integrate_particle(p: &mut Particle) {
    p.x  += p.vx;
    p.y  += p.vy;
    p.vy += p.gravity;
    p.vx *= 0.96;
    p.life -= 1;
}

fn integrate_text(t: &mut FloatingText) {
    t.y  += t.vy;
    t.vy *= 0.95;
    t.life -= 1;
}

pub(crate) fn update_particles(w: &mut GameWorld) {
    if w.particles.live_len() >= PARALLEL_PARTICLE_THRESHOLD {
        w.particles.records_mut().par_bridge().for_each(integrate_particle);
    } else {
        w.particles.records_mut().for_each(integrate_particle);
    }
    for i in (0..w.particles.live_len()).rev() {
        let expired = w
            .particles
            .key_at(i)
            .and_then(|k| w.particles.get(k))
            .is_some_and(|p| p.life <= 0);
        if expired {
            w.particles.release_at(i);
        }
    }
    w.particles.compact_spawn_order();
}

pub(crate) fn update_floating_texts(w: &mut GameWorld) {
    w.texts.records_mut().for_each(integrate_text);
    for i in (0..w.texts.live_len()).rev() {
        let expired = w
            .texts
            .key_at(i)
            .and_then(|k| w.texts.get(k))
            .is_some_and(|t| t.life <= 0);
        if expired {
            w.texts.release_at(i);
        }
    }
    w.texts.compact_spawn_order();
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{EnemyConfigTable, SimConfig};

    #[test]
    fn particles_fade_out_and_respect_the_cap() {
        let config = SimConfig { max_particles: 1000, ..SimConfig::default() };
        let mut w = GameWorld::new(config, EnemyConfigTable::default());
        w.emit_particles(100.0, 100.0, 1200, [1.0; 4]);
        assert_eq!(w.particles.limit(), Some(1000));
        assert_eq!(w.particles.live_len(), 1000);
        assert_eq!(w.particles.stats().evicted, 200);
        update_particles(&mut w);
        assert_eq!(w.particles.live_len(), 1000);
        for _ in 0..40 {
            update_particles(&mut w);
        }
        assert_eq!(w.particles.live_len(), 0);
    }

    #[test]
    fn texts_float_up_and_expire() {
        let mut w = GameWorld::new(SimConfig::default(), EnemyConfigTable::default());
        w.spawn_text(10.0, 100.0, 12.0, true);
        update_floating_texts(&mut w);
        let (_, t) = w.texts.iter().next().unwrap();
        assert!(t.y < 100.0);
        for _ in 0..45 {
            update_floating_texts(&mut w);
        }
        assert!(w.texts.is_empty());
    }
}
