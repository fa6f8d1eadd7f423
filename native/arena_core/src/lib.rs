//! Path: native/arena_core/src/lib.rs
//! Summary: アリーナシミュレーション共通プリミティブ（定数・設定・敵レコード・プール・物理）

pub mod config;
pub mod constants;
pub mod enemy_config;
pub mod physics;
pub mod pool;

pub use config::{ConfigError, SimConfig};
pub use enemy_config::{EnemyBehavior, EnemyConfig, EnemyConfigTable, EnemyRank, RangedAttack};
pub use physics::rng::SimpleRng;
pub use physics::spatial_hash::SpatialHash;
pub use pool::{EntityPool, PoolStats, Recycle};
