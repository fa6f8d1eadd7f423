//! Path: native/arena_sim/src/world/projectile.rs
//! Summary: 弾レコード（Projectile）・合成可能な挙動タグ（Behavior）・生成パラメータ

use super::enemy::{EnemyId, StatusEffect};
use arena_core::{Recycle, SimConfig};
use slotmap::new_key_type;

new_key_type! {
    /// 世代付き弾ハンドル
    pub struct ProjectileId;
}

/// 弾の所属陣営
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Faction {
    #[default]
    Player,
    Enemy,
}

/// 1 フレーム分の処理単位。弾はこれを順序付きリストで持ち、ドライバが先頭から適用する。
/// `DecayLife` は寿命 0 を見る挙動（`ExplodeOnExpire` 等）より前に置くこと。
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Behavior {
    MoveLinear,
    /// 最も近い敵対エンティティへ最大 `turn_rate` ラジアン/フレームで旋回
    Homing { turn_rate: f32, range: f32 },
    /// 進行方向に垂直なサイン波のずれ
    SineWave { amplitude: f32, frequency: f32 },
    /// z 方向の放物線。地面（z <= 0）で寿命 0
    GravityArc { gravity: f32 },
    DecayLife,
    /// `interval` フレームごとに軌跡パーティクルを出す
    Trail { interval: u32 },
    CheckBounds,
    ExplodeOnExpire,
}

/// 爆発パラメータ
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ExplosionSpec {
    pub radius:        f32,
    pub damage:        f32,
    /// AOE ダメージを与えてよいフレーム数
    pub damage_window: u32,
    /// ダメージ窓の後の見た目だけのフェード
    pub fade_frames:   u32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ProjectilePhase {
    #[default]
    Flying,
    Exploding { elapsed: u32 },
}

/// 弾レコード
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Projectile {
    pub active:        bool,
    pub owner:         Faction,
    pub x:             f32,
    pub y:             f32,
    pub z:             f32,
    pub vx:            f32,
    pub vy:            f32,
    pub vz:            f32,
    pub radius:        f32,
    /// 残り寿命（フレーム）
    pub life:          i32,
    pub max_life:      i32,
    pub damage:        f32,
    pub pierce:        u32,
    pub knockback:     f32,
    pub crit_chance:   f32,
    pub crit_mult:     f32,
    pub on_hit:        Option<StatusEffect>,
    pub explosion:     Option<ExplosionSpec>,
    pub phase:         ProjectilePhase,
    /// 空なら合成以前のレガシー弾（固定シーケンスで動かす）
    pub behaviors:     Vec<Behavior>,
    /// 同じ貫通チェーン内で二重ヒットしないための記録
    pub hit_ids:       Vec<EnemyId>,
    pub hit_player:    bool,
    pub homing_target: Option<EnemyId>,
    pub age:           u32,
    pub sine_offset:   f32,
    pub render_kind:   u8,
}

impl Recycle for Projectile {
    fn recycle(&mut self) {
        let mut behaviors = std::mem::take(&mut self.behaviors);
        let mut hit_ids = std::mem::take(&mut self.hit_ids);
        behaviors.clear();
        hit_ids.clear();
        *self = Self { behaviors, hit_ids, ..Self::default() };
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

impl Projectile {
    pub fn is_flying(&self) -> bool {
        matches!(self.phase, ProjectilePhase::Flying)
    }

    pub fn is_exploding(&self) -> bool {
        matches!(self.phase, ProjectilePhase::Exploding { .. })
    }

    /// まだ AOE を与えてよいフレームか
    pub fn in_damage_window(&self) -> bool {
        match (self.phase, self.explosion) {
            (ProjectilePhase::Exploding { elapsed }, Some(spec)) => elapsed < spec.damage_window,
            _ => false,
        }
    }
}

/// 弾の生成パラメータ
#[derive(Clone, Copy, Debug)]
pub struct ProjectileSpec<'a> {
    pub owner:       Faction,
    pub x:           f32,
    pub y:           f32,
    pub vx:          f32,
    pub vy:          f32,
    pub z:           f32,
    pub vz:          f32,
    pub radius:      f32,
    pub life:        i32,
    pub damage:      f32,
    pub pierce:      u32,
    pub knockback:   f32,
    pub crit_chance: f32,
    pub crit_mult:   f32,
    pub on_hit:      Option<StatusEffect>,
    pub explosion:   Option<ExplosionSpec>,
    pub behaviors:   &'a [Behavior],
    pub render_kind: u8,
}

impl Default for ProjectileSpec<'_> {
    fn default() -> Self {
        Self {
            owner:       Faction::Player,
            x:           0.0,
            y:           0.0,
            vx:          0.0,
            vy:          0.0,
            z:           0.0,
            vz:          0.0,
            radius:      6.0,
            life:        180,
            damage:      10.0,
            pierce:      0,
            knockback:   0.0,
            crit_chance: 0.0,
            crit_mult:   2.0,
            on_hit:      None,
            explosion:   None,
            behaviors:   &[],
            render_kind: 4,
        }
    }
}

/// 標準的な直進弾
pub const LINEAR_BEHAVIORS: &[Behavior] = &[
    Behavior::MoveLinear,
    Behavior::DecayLife,
    Behavior::CheckBounds,
];

/// 寿命で爆発する直進弾
pub const GRENADE_BEHAVIORS: &[Behavior] = &[
    Behavior::MoveLinear,
    Behavior::DecayLife,
    Behavior::CheckBounds,
    Behavior::ExplodeOnExpire,
];

impl ExplosionSpec {
    /// ダメージ窓とフェードは設定の既定値を使う
    pub fn from_config(radius: f32, damage: f32, config: &SimConfig) -> Self {
        Self {
            radius,
            damage,
            damage_window: config.explosion_damage_window,
            fade_frames:   config.explosion_fade_frames,
        }
    }
}

/// 寿命 0 を見る挙動が `DecayLife` より前に来ていないか
pub fn behavior_order_ok(behaviors: &[Behavior]) -> bool {
    let decay = behaviors.iter().position(|b| matches!(b, Behavior::DecayLife));
    let expire = behaviors.iter().position(|b| matches!(b, Behavior::ExplodeOnExpire));
    match (decay, expire) {
        (Some(d), Some(e)) => d < e,
        _ => true,
    }
}
