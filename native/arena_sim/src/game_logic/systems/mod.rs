//! Path: native/arena_sim/src/game_logic/systems/mod.rs
//! Summary: フレーム内の各システム

pub(crate) mod behaviors;
pub(crate) mod collision;
pub(crate) mod effects;
pub(crate) mod enemy_states;
pub(crate) mod explosions;
pub(crate) mod player;
pub(crate) mod projectiles;
pub(crate) mod scheduler;
pub(crate) mod skills;
pub(crate) mod zones;
