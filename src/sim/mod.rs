//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering and
//! platform concerns:
//! - One discrete tick per rendered frame
//! - Seeded RNG only
//! - Single writer; all ticks and commands in one total order

pub mod collision;
pub mod sprite;
pub mod state;
pub mod tick;

pub use collision::{Rect, overlaps};
pub use sprite::{
    BombAward, BulletAward, EnemyCraft, EnemyTier, Entity, LifeState, Pickup, PickupKind,
    PlayerCraft, Projectile, ProjectileKind, Sprite,
};
pub use state::{GameEvent, GamePhase, GameState, Viewport};
pub use tick::{level_for_score, tick, wave_for_level};
