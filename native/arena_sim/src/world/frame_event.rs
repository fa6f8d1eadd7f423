//! Path: native/arena_sim/src/world/frame_event.rs
//! Summary: フレーム内で発生したイベント（VFX / 音 / UI 向け）と上限付きキュー
//!
//! 消費側が何もしなくても安全。溢れたら古いものから捨てる。

use super::projectile::Faction;
use std::collections::VecDeque;

/// ダメージ・撃破の発生源
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageSource {
    Projectile,
    Explosion,
    Thorns,
    Burn,
    Zone,
    Hook,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameEvent {
    EnemySpawned       { serial: u32, config_id: u8, x: f32, y: f32 },
    EnemyDamaged       { serial: u32, x: f32, y: f32, amount: f32, crit: bool },
    EnemyDied          { serial: u32, config_id: u8, x: f32, y: f32, source: DamageSource },
    ProjectileExploded { x: f32, y: f32, radius: f32, owner: Faction },
    PlayerHurt         { x: f32, y: f32, amount: f32, hp_left: f32 },
    ShieldBreak        { x: f32, y: f32, shields_left: u32 },
    WallHit            { x: f32, y: f32 },
    PlayerStunned      { frames: u32 },
    BlastDetonated     { x: f32, y: f32, radius: f32 },
}

pub struct EventQueue {
    events:  VecDeque<FrameEvent>,
    cap:     usize,
    dropped: u64,
}

impl EventQueue {
    pub fn new(cap: usize) -> Self {
        Self {
            events:  VecDeque::new(),
            cap:     cap.max(1),
            dropped: 0,
        }
    }

    pub fn push(&mut self, event: FrameEvent) {
        if self.events.len() >= self.cap {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = FrameEvent> + '_ {
        self.events.drain(..)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FrameEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// 溢れて捨てた累計
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_drops_oldest() {
        let mut q = EventQueue::new(2);
        q.push(FrameEvent::PlayerStunned { frames: 1 });
        q.push(FrameEvent::PlayerStunned { frames: 2 });
        q.push(FrameEvent::PlayerStunned { frames: 3 });
        let frames: Vec<u32> = q
            .drain()
            .filter_map(|e| match e {
                FrameEvent::PlayerStunned { frames } => Some(frames),
                _ => None,
            })
            .collect();
        assert_eq!(frames, vec![2, 3]);
        assert_eq!(q.dropped(), 1);
        assert!(q.is_empty());
    }
}
