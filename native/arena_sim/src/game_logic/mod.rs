//! Path: native/arena_sim/src/game_logic/mod.rs
//! Summary: 物理ステップ・LOD スケジューラ・弾挙動・衝突・アイテムフック

mod hooks;
mod physics_step;
mod systems;
mod targeting;

pub use hooks::{HookRegistry, ItemHook};
pub use systems::behaviors::LEGACY_SEQUENCE;
pub use systems::scheduler::{classify, should_run_ai};
pub use systems::zones::area_damage;
pub use targeting::{find_nearest_enemy, find_nearest_enemy_excluding};
pub(crate) use physics_step::physics_step_inner;
