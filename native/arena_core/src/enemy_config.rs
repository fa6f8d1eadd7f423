//! Path: native/arena_core/src/enemy_config.rs
//! Summary: 敵コンテンツレコード（EnemyConfig）と ID 参照テーブル
//!
//! 具体的な敵の中身は外部から供給される。コアは行動種別（EnemyBehavior）に応じた
//! スキルフックを呼ぶだけで、数値は持たない。`EnemyConfigTable::default()` は
//! テスト・ヘッドレス実行用のサンプル。

/// 敵の格付け。Boss / Elite は LOD で常に Critical 扱い。
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum EnemyRank {
    #[default]
    Normal,
    Elite,
    Boss,
}

/// 遠距離攻撃パラメータ
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct RangedAttack {
    pub range:            f32,
    pub cooldown_frames:  u32,
    pub projectile_speed: f32,
    pub damage:           f32,
    pub projectile_life:  i32,
    /// 描画種別（renderer に渡す kind 値）
    pub render_kind:      u8,
}

/// 行動種別（元は文字列キー。閉じた enum で静的ディスパッチする）
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum EnemyBehavior {
    /// プレイヤーへ直進
    #[default]
    Chase,
    /// 距離を保ちつつ射撃
    Ranged { preferred_distance: f32 },
    /// 一定間隔で手下を呼ぶ
    Summoner { minion_id: u8, count: u8, cooldown_frames: u32 },
    /// 周囲の味方を回復
    Healer { radius: f32, amount: f32, cooldown_frames: u32 },
    /// プレイヤーの周囲を旋回（自前で移動を管理）
    Orbiter { orbit_radius: f32, angular_speed: f32 },
    /// 射程内のプレイヤーをスタンさせる
    Stunner { radius: f32, stun_frames: u32, cooldown_frames: u32 },
    /// 溜め → 突進
    Charger { windup_frames: u32, dash_frames: u32, dash_speed: f32, cooldown_frames: u32 },
    /// 多段フェーズのボス
    Boss { blast_radius: f32, blast_delay: u32, burst_count: u8, cycle_frames: u32 },
}

/// 敵のパラメータ（ID で参照）
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct EnemyConfig {
    pub name:             &'static str,
    pub max_hp:           f32,
    /// 1 フレームあたりの移動量
    pub speed:            f32,
    pub radius:           f32,
    pub contact_damage:   f32,
    pub rank:             EnemyRank,
    pub behavior:         EnemyBehavior,
    pub attack:           Option<RangedAttack>,
    /// 0.0〜1.0。ノックバックを減衰させる
    pub knockback_resist: f32,
    /// LOD に関係なく毎フレーム更新する
    pub always_fresh:     bool,
    /// パーティクル色 [r, g, b, a]
    pub particle_color:   [f32; 4],
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            name:             "grunt",
            max_hp:           30.0,
            speed:            1.5,
            radius:           20.0,
            contact_damage:   10.0,
            rank:             EnemyRank::Normal,
            behavior:         EnemyBehavior::Chase,
            attack:           None,
            knockback_resist: 0.0,
            always_fresh:     false,
            particle_color:   [1.0, 0.5, 0.1, 1.0],
        }
    }
}

pub const ENEMY_ID_GRUNT:    u8 = 0;
pub const ENEMY_ID_RUNNER:   u8 = 1;
pub const ENEMY_ID_TANK:     u8 = 2;
pub const ENEMY_ID_ARCHER:   u8 = 3;
pub const ENEMY_ID_SHAMAN:   u8 = 4;
pub const ENEMY_ID_HIVE:     u8 = 5;
pub const ENEMY_ID_WISP:     u8 = 6;
pub const ENEMY_ID_JAILER:   u8 = 7;
pub const ENEMY_ID_RAM:      u8 = 8;
pub const ENEMY_ID_WARLORD:  u8 = 9;

/// 外部から供給される敵テーブル。未知の ID は 0 番にフォールバックする。
#[derive(Clone, Debug)]
pub struct EnemyConfigTable {
    configs: Vec<EnemyConfig>,
}

impl EnemyConfigTable {
    /// 空のテーブルは既定レコード 1 件で埋める
    pub fn new(mut configs: Vec<EnemyConfig>) -> Self {
        if configs.is_empty() {
            configs.push(EnemyConfig::default());
        }
        Self { configs }
    }

    pub fn get(&self, id: u8) -> &EnemyConfig {
        self.configs
            .get(id as usize)
            .unwrap_or(&self.configs[0])
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// 最大の接触半径（グリッドのセルサイズ検証用）
    pub fn max_radius(&self) -> f32 {
        self.configs.iter().map(|c| c.radius).fold(0.0, f32::max)
    }
}

impl Default for EnemyConfigTable {
    fn default() -> Self {
        let archer_shot = RangedAttack {
            range: 700.0, cooldown_frames: 90, projectile_speed: 6.0,
            damage: 8.0, projectile_life: 150, render_kind: 14,
        };
        let warlord_shot = RangedAttack {
            range: 900.0, cooldown_frames: 120, projectile_speed: 5.0,
            damage: 12.0, projectile_life: 200, render_kind: 15,
        };
        Self::new(vec![
            EnemyConfig::default(),
            EnemyConfig { name: "runner", max_hp: 15.0, speed: 3.0, radius: 12.0, contact_damage: 6.0,
                particle_color: [0.7, 0.2, 0.9, 1.0], ..EnemyConfig::default() },
            EnemyConfig { name: "tank", max_hp: 150.0, speed: 0.8, radius: 32.0, contact_damage: 25.0,
                knockback_resist: 0.7, particle_color: [0.6, 0.6, 0.6, 1.0], ..EnemyConfig::default() },
            EnemyConfig { name: "archer", max_hp: 25.0, speed: 1.6, radius: 18.0,
                behavior: EnemyBehavior::Ranged { preferred_distance: 450.0 },
                attack: Some(archer_shot), ..EnemyConfig::default() },
            EnemyConfig { name: "shaman", max_hp: 40.0, speed: 1.2, radius: 20.0,
                behavior: EnemyBehavior::Healer { radius: 250.0, amount: 15.0, cooldown_frames: 120 },
                ..EnemyConfig::default() },
            EnemyConfig { name: "hive", max_hp: 80.0, speed: 0.6, radius: 28.0, rank: EnemyRank::Elite,
                behavior: EnemyBehavior::Summoner { minion_id: ENEMY_ID_RUNNER, count: 3, cooldown_frames: 240 },
                ..EnemyConfig::default() },
            EnemyConfig { name: "wisp", max_hp: 20.0, speed: 2.0, radius: 14.0,
                behavior: EnemyBehavior::Orbiter { orbit_radius: 220.0, angular_speed: 0.03 },
                particle_color: [0.5, 0.5, 1.0, 0.8], ..EnemyConfig::default() },
            EnemyConfig { name: "jailer", max_hp: 60.0, speed: 1.2, radius: 22.0,
                behavior: EnemyBehavior::Stunner { radius: 160.0, stun_frames: 45, cooldown_frames: 300 },
                ..EnemyConfig::default() },
            EnemyConfig { name: "ram", max_hp: 70.0, speed: 1.0, radius: 26.0, contact_damage: 20.0,
                behavior: EnemyBehavior::Charger { windup_frames: 40, dash_frames: 25, dash_speed: 12.0, cooldown_frames: 180 },
                knockback_resist: 0.5, ..EnemyConfig::default() },
            EnemyConfig { name: "warlord", max_hp: 3000.0, speed: 1.0, radius: 64.0, contact_damage: 40.0,
                rank: EnemyRank::Boss,
                behavior: EnemyBehavior::Boss { blast_radius: 140.0, blast_delay: 60, burst_count: 12, cycle_frames: 300 },
                attack: Some(warlord_shot), knockback_resist: 0.95,
                particle_color: [1.0, 0.2, 0.2, 1.0], ..EnemyConfig::default() },
        ])
    }
}
