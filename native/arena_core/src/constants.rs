//! Path: native/arena_core/src/constants.rs
//! Summary: マップサイズ・LOD 周期・爆発・プール上限などの既定値（SimConfig の初期値）

// Map size
pub const MAP_WIDTH:  f32 = 4096.0;
pub const MAP_HEIGHT: f32 = 4096.0;

// Spatial hash cell size（最大の相互作用半径以上であること）
pub const GRID_CELL_SIZE: f32 = 400.0;

// LOD: Near 判定距離と更新周期（フレーム）
pub const LOD_NEAR_DISTANCE: f32 = 1300.0;
pub const LOD_NEAR_CADENCE:  u32 = 3;
pub const LOD_FAR_CADENCE:   u32 = 15;

// Player
pub const PLAYER_RADIUS:          f32 = 24.0;
pub const PLAYER_MAX_HP:          f32 = 100.0;
pub const PLAYER_INVULN_FRAMES:   u32 = 30;
/// 接触判定ではプレイヤー半径をこの係数で縮める（見た目より少し甘め）
pub const CONTACT_RADIUS_FACTOR:  f32 = 0.8;
pub const CONTACT_PUSH_FORCE:     f32 = 6.0;
/// 押し出しインパルスの毎フレーム減衰率
pub const IMPULSE_DECAY:          f32 = 0.8;

// Enemy
pub const ENEMY_STEER_FACTOR:     f32 = 0.25;
pub const ENEMY_MAX_RADIUS:       f32 = 96.0;

// Explosion（見た目のフェードとダメージ窓を分離）
pub const EXPLOSION_DAMAGE_WINDOW: u32 = 6;
pub const EXPLOSION_FADE_FRAMES:   u32 = 24;
pub const EXPLOSION_MAX_TARGETS:   usize = 15;

// Capacity caps（超過時は古い順に追い出す）
pub const MAX_PARTICLES:      usize = 1500;
pub const MAX_FLOATING_TEXTS: usize = 150;
pub const MAX_FRAME_EVENTS:   usize = 1024;

/// 複数フェーズのスキルが終わらない場合に強制リセットするまでのフレーム数
pub const SKILL_FAILSAFE_FRAMES: u32 = 600;

/// 境界外判定のマージン（弾丸用）
pub const BOUNDS_MARGIN: f32 = 64.0;

// Frame budget（60fps）
pub const FRAME_BUDGET_MS: f64 = 1000.0 / 60.0;

/// パーティクル用 RNG シード
pub const SIM_RNG_SEED: u64 = 67890;

/// rayon で並列積分に切り替えるパーティクル数の閾値
pub const PARALLEL_PARTICLE_THRESHOLD: usize = 512;
