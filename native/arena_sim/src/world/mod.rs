//! Path: native/arena_sim/src/world/mod.rs
//! Summary: ワールド型（Enemy, Projectile, Particle, Zone, Player, FrameEvent, GameWorld）

mod enemy;
mod frame_event;
mod game_world;
mod particle;
mod player;
mod projectile;
mod zone;

pub use enemy::{
    BossPhase, ChargePhase, Enemy, EnemyId, EnemyState, LodTier, SkillState, StatusBlock,
    StatusEffect,
};
pub use frame_event::{DamageSource, EventQueue, FrameEvent};
pub use game_world::{DamageOutcome, FrameStats, GameWorld, KillRecord};
pub(crate) use game_world::contain_in;
pub use particle::{FloatingText, Particle, ParticleId, TextId};
pub use player::{Player, PlayerHit, PlayerStats};
pub use projectile::{
    behavior_order_ok, Behavior, ExplosionSpec, Faction, Projectile, ProjectileId,
    ProjectilePhase, ProjectileSpec, GRENADE_BEHAVIORS, LINEAR_BEHAVIORS,
};
pub use zone::{Zone, ZoneKind};
