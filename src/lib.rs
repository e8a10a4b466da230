//! Plane War - a vertical arcade shooter simulation
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (entities, collisions, game state)
//! - `controller`: Named commands, single-writer queue and published snapshots
//! - `settings`: Host configuration loaded from JSON

pub mod controller;
pub mod settings;
pub mod sim;

pub use controller::{Command, CommandQueue, GameController, Snapshot};
pub use settings::{Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Projectile spawn cadence (one attempt every N rendered frames)
    pub const FIRE_INTERVAL_FRAMES: u64 = 6;

    /// Player craft
    pub const PLAYER_SIZE: f32 = 60.0;
    pub const PLAYER_SEGMENTS: u32 = 4;
    pub const PLAYER_LIVES: u32 = 1;
    /// Invulnerability frames granted on (re)birth
    pub const PLAYER_PROTECT_FRAMES: u32 = 60;

    /// Projectiles
    pub const PROJECTILE_WIDTH: f32 = 6.0;
    pub const PROJECTILE_DOUBLE_WIDTH: f32 = 18.0;
    pub const PROJECTILE_HEIGHT: f32 = 18.0;
    pub const PROJECTILE_VELOCITY: f32 = 40.0;
    pub const PROJECTILE_DAMAGE: u32 = 1;
    pub const PROJECTILE_DOUBLE_DAMAGE: u32 = 2;

    /// Pickups
    pub const PICKUP_WIDTH: f32 = 50.0;
    pub const PICKUP_HEIGHT: f32 = 80.0;
    pub const PICKUP_VELOCITY: f32 = 20.0;
    pub const PICKUP_BULLET_AMOUNT: u32 = 100;
    pub const PICKUP_BOMB_AMOUNT: u32 = 1;

    /// Enemies and pickups are retired once they fall past this multiple of the viewport height
    pub const OFFSCREEN_FACTOR: f32 = 1.5;

    /// A pickup drops every time the score lands on a multiple of this
    pub const SCORE_PICKUP_STEP: u64 = 100;

    /// Highest difficulty level
    pub const MAX_LEVEL: u32 = 3;
}
