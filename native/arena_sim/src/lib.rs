//! Path: native/arena_sim/src/lib.rs
//! Summary: モジュール宣言と pub use のみ（ワールド・ゲームロジック・Simulation ファサード）

mod game_logic;
mod simulation;
pub mod world;

pub use arena_core::{ConfigError, EnemyConfig, EnemyConfigTable, SimConfig};
pub use game_logic::{
    area_damage, classify, find_nearest_enemy, find_nearest_enemy_excluding, should_run_ai,
    HookRegistry, ItemHook, LEGACY_SEQUENCE,
};
pub use simulation::Simulation;
pub use world::{
    DamageSource, EnemyId, FrameEvent, FrameStats, GameWorld, KillRecord, ProjectileSpec,
};
