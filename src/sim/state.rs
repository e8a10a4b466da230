//! Game state and core simulation types
//!
//! `GameState` is the single owner of every entity collection, the score and
//! the current phase. Nothing outside `sim` mutates it directly.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::sprite::{EnemyCraft, Pickup, PlayerCraft, Projectile};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Round set up, waiting for the player to start
    #[default]
    Waiting,
    /// Active gameplay
    Running,
    /// Game is paused
    Paused,
    /// Player hit; death animation playing
    Dying,
    /// Run ended
    Over,
    /// Terminal; the host should close
    Exit,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Waiting => "Waiting",
            GamePhase::Running => "Running",
            GamePhase::Paused => "Paused",
            GamePhase::Dying => "Dying",
            GamePhase::Over => "Over",
            GamePhase::Exit => "Exit",
        }
    }
}

/// Visible play area in device-independent units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Finite, positive, and wide enough for the player craft
    pub fn is_playable(&self) -> bool {
        self.width.is_finite()
            && self.height.is_finite()
            && self.height > 0.0
            && self.width >= crate::consts::PLAYER_SIZE
    }

    /// Y beyond which falling sprites are retired
    #[inline]
    pub fn retire_y(&self) -> f32 {
        self.height * crate::consts::OFFSCREEN_FACTOR
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1080.0,
            height: 1920.0,
        }
    }
}

/// Discrete simulation events, in the order they happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    /// An enemy was destroyed; play its explosion at `origin`
    Explosion { enemy_id: u32, origin: Vec2 },
    ScoreChanged { score: u64 },
    LevelUp { level: u32 },
    WaveSpawned { small: u32, middle: u32, big: u32 },
    PickupSpawned { pickup_id: u32 },
    PickupCollected { pickup_id: u32 },
    BombUsed { destroyed: u32 },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub viewport: Viewport,
    pub player: PlayerCraft,
    /// Enemy roster, in spawn order
    pub enemies: Vec<EnemyCraft>,
    /// Projectile pool; dead slots are reused before the pool grows
    pub projectiles: Vec<Projectile>,
    /// Active pickups
    pub pickups: Vec<Pickup>,
    pub score: u64,
    /// Difficulty level (0 until the first wave spawns)
    pub level: u32,
    /// Rendered frames since the state was created
    pub frame: u64,
    /// Events not yet drained by the publisher
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, viewport: Viewport) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Waiting,
            viewport,
            player: PlayerCraft::new(0),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            score: 0,
            level: 0,
            frame: 0,
            events: Vec::new(),
            next_id: 1,
        };
        state.player.sprite.id = state.next_entity_id();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn enemy_index(&self, id: u32) -> Option<usize> {
        self.enemies.iter().position(|e| e.sprite.id == id)
    }

    pub fn projectile_index(&self, id: u32) -> Option<usize> {
        self.projectiles.iter().position(|p| p.sprite.id == id)
    }

    pub fn pickup_index(&self, id: u32) -> Option<usize> {
        self.pickups.iter().position(|p| p.sprite.id == id)
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }
}
