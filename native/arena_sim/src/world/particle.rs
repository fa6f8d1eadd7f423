//! Path: native/arena_sim/src/world/particle.rs
//! Summary: パーティクル・フローティングテキストのレコード（上限付きプールで管理）

use arena_core::Recycle;
use slotmap::new_key_type;

new_key_type! {
    pub struct ParticleId;
    pub struct TextId;
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct Particle {
    pub active:   bool,
    pub x:        f32,
    pub y:        f32,
    pub vx:       f32,
    pub vy:       f32,
    pub gravity:  f32,
    pub life:     i32,
    pub max_life: i32,
    pub size:     f32,
    pub color:    [f32; 4],
}

impl Recycle for Particle {
    fn recycle(&mut self) {
        *self = Self::default();
    }
    fn is_active(&self) -> bool {
        self.active
    }
    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

/// ダメージ数値などの浮き上がるテキスト
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FloatingText {
    pub active: bool,
    pub x:      f32,
    pub y:      f32,
    pub vy:     f32,
    pub life:   i32,
    pub value:  f32,
    pub crit:   bool,
}

impl Recycle for FloatingText {
    fn recycle(&mut self) {
        *self = Self::default();
    }
    fn is_active(&self) -> bool {
        self.active
    }
    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}
