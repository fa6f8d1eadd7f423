//! Path: native/arena_sim/src/world/player.rs
//! Summary: プレイヤー状態（座標・速度・HP・無敵/スタンタイマー・シールド・ステータス）

use arena_core::constants::{PLAYER_MAX_HP, PLAYER_RADIUS};

/// 外部（アイテム層）が書き換えるステータス
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerStats {
    pub damage_mult:      f32,
    pub crit_chance:      f32,
    pub crit_mult:        f32,
    /// 被ダメージ軽減率 0.0〜0.9
    pub armor:            f32,
    /// 接触した敵へ返すダメージ
    pub thorns:           f32,
    pub knockback_resist: f32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            damage_mult:      1.0,
            crit_chance:      0.05,
            crit_mult:        2.0,
            armor:            0.0,
            thorns:           0.0,
            knockback_resist: 0.0,
        }
    }
}

/// ダメージ適用の結果
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlayerHit {
    /// 無敵時間中・死亡済み
    Ignored,
    /// シールド 1 枚で防いだ
    Absorbed,
    Damaged(f32),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x:             f32,
    pub y:             f32,
    /// 入力層が毎フレーム書き込む移動速度
    pub vx:            f32,
    pub vy:            f32,
    pub impulse_x:     f32,
    pub impulse_y:     f32,
    pub radius:        f32,
    pub hp:            f32,
    pub max_hp:        f32,
    pub invuln_frames: u32,
    pub shield:        u32,
    pub stun_frames:   u32,
    pub stats:         PlayerStats,
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            vx:            0.0,
            vy:            0.0,
            impulse_x:     0.0,
            impulse_y:     0.0,
            radius:        PLAYER_RADIUS,
            hp:            PLAYER_MAX_HP,
            max_hp:        PLAYER_MAX_HP,
            invuln_frames: 0,
            shield:        0,
            stun_frames:   0,
            stats:         PlayerStats::default(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    /// 無敵時間・シールド・アーマーを考慮してダメージを適用する
    pub fn take_hit(&mut self, amount: f32, invuln_frames: u32) -> PlayerHit {
        if self.invuln_frames > 0 || !self.is_alive() || amount <= 0.0 {
            return PlayerHit::Ignored;
        }
        self.invuln_frames = invuln_frames;
        if self.shield > 0 {
            self.shield -= 1;
            return PlayerHit::Absorbed;
        }
        let dmg = amount * (1.0 - self.stats.armor.clamp(0.0, 0.9));
        self.hp = (self.hp - dmg).max(0.0);
        PlayerHit::Damaged(dmg)
    }

    pub fn heal(&mut self, amount: f32) {
        if self.is_alive() {
            self.hp = (self.hp + amount).min(self.max_hp);
        }
    }

    pub fn add_impulse(&mut self, ix: f32, iy: f32) {
        let k = 1.0 - self.stats.knockback_resist.clamp(0.0, 1.0);
        self.impulse_x += ix * k;
        self.impulse_y += iy * k;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invulnerability_blocks_second_hit() {
        let mut p = Player::new(0.0, 0.0);
        assert_eq!(p.take_hit(10.0, 30), PlayerHit::Damaged(10.0));
        assert_eq!(p.take_hit(10.0, 30), PlayerHit::Ignored);
        assert!((p.hp - 90.0).abs() < 1e-6);
    }

    #[test]
    fn heal_caps_at_max_and_skips_the_dead() {
        let mut p = Player::new(0.0, 0.0);
        p.hp = 95.0;
        p.heal(20.0);
        assert_eq!(p.hp, p.max_hp);
        p.hp = 0.0;
        p.heal(20.0);
        assert_eq!(p.hp, 0.0);
    }

    #[test]
    fn shield_absorbs_before_hp() {
        let mut p = Player::new(0.0, 0.0);
        p.shield = 1;
        assert_eq!(p.take_hit(50.0, 0), PlayerHit::Absorbed);
        assert_eq!(p.shield, 0);
        assert_eq!(p.hp, p.max_hp);
        p.stats.armor = 0.5;
        assert_eq!(p.take_hit(50.0, 0), PlayerHit::Damaged(25.0));
    }
}
