//! Path: native/arena_sim/src/world/enemy.rs
//! Summary: 敵レコード（Enemy）・状態機械・状態異常・アーキタイプ別スキル状態

use arena_core::{EnemyBehavior, EnemyConfig, EnemyRank, Recycle};
use slotmap::new_key_type;

new_key_type! {
    /// 世代付き敵ハンドル
    pub struct EnemyId;
}

/// LOD 分類
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum LodTier {
    #[default]
    Critical,
    Near,
    Far,
}

/// 通常移動を上書きする排他的な状態
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum EnemyState {
    #[default]
    Normal,
    /// 出現演出中（接触・被弾なし）
    Spawning { frames: u32 },
    /// ビーコンに捕獲されて引き寄せられている
    Captured { anchor_x: f32, anchor_y: f32, frames: u32 },
    /// 投げ飛ばされている（速度は vx / vy）
    Thrown { frames: u32 },
    Dashing { frames: u32, vx: f32, vy: f32 },
}

impl EnemyState {
    /// 接触ダメージ・弾の判定から除外される状態
    pub fn is_intangible(&self) -> bool {
        matches!(
            self,
            Self::Spawning { .. } | Self::Captured { .. } | Self::Thrown { .. }
        )
    }

    pub fn is_special(&self) -> bool {
        !matches!(self, Self::Normal)
    }
}

/// 着弾時に付与する状態異常
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum StatusEffect {
    Burn { damage_per_frame: f32, frames: u32 },
    Slow { factor: f32, frames: u32 },
    Stun { frames: u32 },
}

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct StatusBlock {
    pub burn_frames: u32,
    pub burn_damage: f32,
    pub slow_frames: u32,
    /// 移動速度に掛ける係数（slow_frames > 0 のときのみ有効）
    pub slow_factor: f32,
    pub stun_frames: u32,
}

impl StatusBlock {
    pub fn apply(&mut self, effect: StatusEffect) {
        match effect {
            StatusEffect::Burn { damage_per_frame, frames } => {
                self.burn_frames = self.burn_frames.max(frames);
                self.burn_damage = self.burn_damage.max(damage_per_frame);
            }
            StatusEffect::Slow { factor, frames } => {
                self.slow_frames = self.slow_frames.max(frames);
                self.slow_factor = if self.slow_factor > 0.0 {
                    self.slow_factor.min(factor)
                } else {
                    factor
                };
            }
            StatusEffect::Stun { frames } => {
                self.stun_frames = self.stun_frames.max(frames);
            }
        }
    }

    pub fn speed_factor(&self) -> f32 {
        if self.slow_frames > 0 {
            self.slow_factor.clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    pub fn is_stunned(&self) -> bool {
        self.stun_frames > 0
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ChargePhase {
    #[default]
    Ready,
    Windup,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum BossPhase {
    #[default]
    Stalk,
    Telegraph,
    Burst,
    Recover,
}

/// アーキタイプ別のスキル状態（スポーン時に行動種別から決まり、プール再取得で必ず None に戻る）
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum SkillState {
    #[default]
    None,
    Summoner { cooldown: u32 },
    Healer   { cooldown: u32 },
    Orbiter  { angle: f32 },
    Stunner  { cooldown: u32 },
    Charger  { phase: ChargePhase, timer: u32 },
    Boss     { phase: BossPhase, timer: u32, stuck: u32, enraged: bool },
}

impl SkillState {
    pub fn for_behavior(behavior: &EnemyBehavior) -> Self {
        match *behavior {
            EnemyBehavior::Chase | EnemyBehavior::Ranged { .. } => Self::None,
            EnemyBehavior::Summoner { cooldown_frames, .. } => Self::Summoner { cooldown: cooldown_frames },
            EnemyBehavior::Healer { cooldown_frames, .. } => Self::Healer { cooldown: cooldown_frames },
            EnemyBehavior::Orbiter { .. } => Self::Orbiter { angle: 0.0 },
            EnemyBehavior::Stunner { cooldown_frames, .. } => Self::Stunner { cooldown: cooldown_frames },
            EnemyBehavior::Charger { cooldown_frames, .. } => Self::Charger {
                phase: ChargePhase::Ready,
                timer: cooldown_frames,
            },
            EnemyBehavior::Boss { cycle_frames, .. } => Self::Boss {
                phase: BossPhase::Stalk,
                timer: cycle_frames,
                stuck: 0,
                enraged: false,
            },
        }
    }

    /// 多段スキルの実行中（溜め・ボスの非待機フェーズ）は LOD で間引かない
    pub fn is_engaged(&self) -> bool {
        matches!(
            self,
            Self::Charger { phase: ChargePhase::Windup, .. }
                | Self::Boss { phase: BossPhase::Telegraph | BossPhase::Burst, .. }
        )
    }
}

/// 敵レコード
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Enemy {
    /// スポーンごとに振られる通し番号（LOD の位相ハッシュ・イベント用）
    pub serial:           u32,
    pub config_id:        u8,
    pub active:           bool,
    /// 今フレーム撃破済みで解放待ち
    pub dying:            bool,
    pub x:                f32,
    pub y:                f32,
    pub vx:               f32,
    pub vy:               f32,
    pub radius:           f32,
    pub hp:               f32,
    pub max_hp:           f32,
    pub speed:            f32,
    pub contact_damage:   f32,
    pub knockback_resist: f32,
    pub rank:             EnemyRank,
    pub behavior:         EnemyBehavior,
    pub always_fresh:     bool,
    pub state:            EnemyState,
    pub status:           StatusBlock,
    pub skill:            SkillState,
    pub attack_cooldown:  u32,
    /// ノックバック・押し出しの残りインパルス
    pub impulse_x:        f32,
    pub impulse_y:        f32,
    pub lod:              LodTier,
    /// このフレームで AI を実行した（= 接触判定の対象）
    pub run_collision:    bool,
    pub last_ai_frame:    u64,
    pub ai_ticks:         u32,
}

impl Recycle for Enemy {
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

impl Enemy {
    /// コンテンツレコードからペイロードを埋める（リセット済みレコードに対して呼ぶ）
    pub fn init_from_config(&mut self, config_id: u8, config: &EnemyConfig, x: f32, y: f32) {
        self.config_id        = config_id;
        self.x                = x;
        self.y                = y;
        self.radius           = config.radius;
        self.hp               = config.max_hp;
        self.max_hp           = config.max_hp;
        self.speed            = config.speed;
        self.contact_damage   = config.contact_damage;
        self.knockback_resist = config.knockback_resist.clamp(0.0, 1.0);
        self.rank             = config.rank;
        self.behavior         = config.behavior;
        self.always_fresh     = config.always_fresh;
        self.skill            = SkillState::for_behavior(&config.behavior);
        self.attack_cooldown  = config.attack.map(|a| a.cooldown_frames).unwrap_or(0);
    }

    /// 弾・接触・爆発の対象になれるか
    pub fn is_targetable(&self) -> bool {
        self.active && !self.dying && !self.state.is_intangible()
    }

    pub fn add_impulse(&mut self, ix: f32, iy: f32) {
        let k = 1.0 - self.knockback_resist;
        self.impulse_x += ix * k;
        self.impulse_y += iy * k;
    }

    pub fn hp_ratio(&self) -> f32 {
        if self.max_hp > 0.0 {
            (self.hp / self.max_hp).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}
