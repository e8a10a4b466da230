//! Entity model: player craft, enemies, projectiles and pickups
//!
//! Every entity embeds a [`Sprite`] holding the shared attributes. Kind-specific
//! behaviour for death and rebirth is provided through the [`Entity`] trait so
//! each kind can extend the base lifecycle.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;

/// Life state of a sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LifeState {
    #[default]
    Alive,
    Dead,
}

/// Attributes shared by every entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sprite {
    pub id: u32,
    /// Display variant index (which image of the kind to draw)
    pub variant: u32,
    pub pos: Vec2,
    /// Spawn origin
    pub start: Vec2,
    pub size: Vec2,
    /// Distance travelled per tick
    pub velocity: f32,
    pub life: LifeState,
    /// Set once the sprite has been placed on its first movement tick
    pub initialized: bool,
}

impl Sprite {
    pub fn new(id: u32, size: Vec2, velocity: f32) -> Self {
        Self {
            id,
            variant: 0,
            pos: Vec2::ZERO,
            start: Vec2::ZERO,
            size,
            velocity,
            life: LifeState::Alive,
            initialized: false,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life == LifeState::Alive
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.life == LifeState::Dead
    }

    /// Bounding box at the current position
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Both coordinates strictly positive (the sprite has entered the screen)
    #[inline]
    pub fn on_screen(&self) -> bool {
        self.pos.x > 0.0 && self.pos.y > 0.0
    }
}

/// Lifecycle shared by all entity kinds
pub trait Entity {
    fn sprite(&self) -> &Sprite;
    fn sprite_mut(&mut self) -> &mut Sprite;

    fn is_alive(&self) -> bool {
        self.sprite().is_alive()
    }

    fn is_dead(&self) -> bool {
        self.sprite().is_dead()
    }

    fn die(&mut self) {
        self.sprite_mut().life = LifeState::Dead;
    }

    fn rebirth(&mut self) {
        self.sprite_mut().life = LifeState::Alive;
    }
}

macro_rules! impl_sprite_access {
    () => {
        fn sprite(&self) -> &Sprite {
            &self.sprite
        }

        fn sprite_mut(&mut self) -> &mut Sprite {
            &mut self.sprite
        }
    };
}

/// Projectile variant (bullet tier)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectileKind {
    #[default]
    Single,
    Double,
}

impl ProjectileKind {
    pub fn width(self) -> f32 {
        match self {
            ProjectileKind::Single => PROJECTILE_WIDTH,
            ProjectileKind::Double => PROJECTILE_DOUBLE_WIDTH,
        }
    }

    pub fn damage(self) -> u32 {
        match self {
            ProjectileKind::Single => PROJECTILE_DAMAGE,
            ProjectileKind::Double => PROJECTILE_DOUBLE_DAMAGE,
        }
    }
}

/// Bullet upgrade held by the player: which tier to fire and how many upgraded shots remain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BulletAward {
    pub tier: ProjectileKind,
    pub stock: u32,
}

impl BulletAward {
    /// Consume one upgraded shot if available, returning the kind to fire
    pub fn take_shot(&mut self) -> ProjectileKind {
        if self.tier == ProjectileKind::Double && self.stock > 0 {
            self.stock -= 1;
            ProjectileKind::Double
        } else {
            ProjectileKind::Single
        }
    }
}

/// Screen-clearing bombs held by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BombAward {
    pub stock: u32,
}

/// The player-controlled craft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerCraft {
    pub sprite: Sprite,
    /// Remaining invulnerability frames
    pub protect_frames: u32,
    pub lives: u32,
    /// Cleared once the host moves the craft into place
    pub entering_animation: bool,
    pub segments: u32,
    pub bullet_award: BulletAward,
    pub bomb_award: BombAward,
}

impl PlayerCraft {
    pub fn new(id: u32) -> Self {
        let mut sprite = Sprite::new(id, Vec2::splat(PLAYER_SIZE), 0.0);
        sprite.pos = Vec2::splat(-100.0);
        sprite.start = Vec2::splat(-100.0);
        Self {
            sprite,
            protect_frames: PLAYER_PROTECT_FRAMES,
            lives: PLAYER_LIVES,
            entering_animation: true,
            segments: PLAYER_SEGMENTS,
            bullet_award: BulletAward {
                tier: ProjectileKind::Double,
                stock: 0,
            },
            bomb_award: BombAward::default(),
        }
    }

    pub fn reduce_protect(&mut self) {
        self.protect_frames = self.protect_frames.saturating_sub(1);
    }

    pub fn is_unprotected(&self) -> bool {
        self.protect_frames == 0
    }
}

impl Entity for PlayerCraft {
    impl_sprite_access!();

    fn rebirth(&mut self) {
        self.sprite.life = LifeState::Alive;
        self.sprite.pos = self.sprite.start;
        self.entering_animation = true;
        self.protect_frames = PLAYER_PROTECT_FRAMES;
        self.bullet_award = BulletAward::default();
        self.bomb_award = BombAward::default();
    }
}

/// A player projectile travelling up its fixed lane
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub sprite: Sprite,
    pub kind: ProjectileKind,
    pub damage: u32,
}

impl Projectile {
    /// A fresh, alive projectile of the given kind; anchored on its first movement tick
    pub fn new(id: u32, kind: ProjectileKind) -> Self {
        let mut projectile = Self {
            sprite: Sprite::new(id, Vec2::ZERO, PROJECTILE_VELOCITY),
            kind,
            damage: 0,
        };
        projectile.arm(kind);
        projectile
    }

    /// Reset this slot to a fresh projectile of `kind`, keeping its id
    pub fn arm(&mut self, kind: ProjectileKind) {
        self.kind = kind;
        self.damage = kind.damage();
        self.sprite.variant = kind as u32;
        self.sprite.size = Vec2::new(kind.width(), PROJECTILE_HEIGHT);
        self.sprite.velocity = PROJECTILE_VELOCITY;
        self.sprite.life = LifeState::Alive;
        self.sprite.initialized = false;
    }

    pub fn is_valid(&self) -> bool {
        self.sprite.pos.y >= 0.0
    }

    /// Snap to the lane and travel one step upward
    pub fn advance(&mut self) {
        self.sprite.pos.x = self.sprite.start.x;
        self.sprite.pos.y -= self.sprite.velocity;
    }
}

impl Entity for Projectile {
    impl_sprite_access!();
}

/// What a pickup grants when collected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    BulletStock,
    BombStock,
}

impl PickupKind {
    pub fn amount(self) -> u32 {
        match self {
            PickupKind::BulletStock => PICKUP_BULLET_AMOUNT,
            PickupKind::BombStock => PICKUP_BOMB_AMOUNT,
        }
    }
}

/// A falling power-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub sprite: Sprite,
    pub kind: PickupKind,
    pub amount: u32,
}

impl Pickup {
    pub fn new(id: u32, kind: PickupKind) -> Self {
        let mut sprite = Sprite::new(id, Vec2::new(PICKUP_WIDTH, PICKUP_HEIGHT), PICKUP_VELOCITY);
        sprite.variant = kind as u32;
        Self {
            sprite,
            kind,
            amount: kind.amount(),
        }
    }

    pub fn advance(&mut self) {
        self.sprite.pos.y += self.sprite.velocity;
    }
}

impl Entity for Pickup {
    impl_sprite_access!();
}

/// Enemy size class; each tier has fixed base stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyTier {
    Small,
    Middle,
    Big,
}

impl EnemyTier {
    pub fn size(self) -> f32 {
        match self {
            EnemyTier::Small => 40.0,
            EnemyTier::Middle => 60.0,
            EnemyTier::Big => 100.0,
        }
    }

    pub fn velocity(self) -> f32 {
        match self {
            EnemyTier::Small => 10.0,
            EnemyTier::Middle => 8.0,
            EnemyTier::Big => 2.0,
        }
    }

    /// Explosion sprite-sheet frame count
    pub fn segments(self) -> u32 {
        match self {
            EnemyTier::Small => 3,
            EnemyTier::Middle => 4,
            EnemyTier::Big => 6,
        }
    }

    pub fn power(self) -> u32 {
        match self {
            EnemyTier::Small => 1,
            EnemyTier::Middle => 4,
            EnemyTier::Big => 18,
        }
    }

    pub fn score_value(self) -> u64 {
        match self {
            EnemyTier::Small => 10,
            EnemyTier::Middle => 40,
            EnemyTier::Big => 90,
        }
    }

    /// Number of damage-stage images
    pub fn variants(self) -> u32 {
        match self {
            EnemyTier::Small => 1,
            EnemyTier::Middle => 2,
            EnemyTier::Big => 3,
        }
    }

    /// Spawn offset above the screen, in multiples of the enemy height
    pub fn spawn_depth(self) -> f32 {
        match self {
            EnemyTier::Small => 2.0,
            EnemyTier::Middle => 4.0,
            EnemyTier::Big => 10.0,
        }
    }
}

/// A descending enemy craft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyCraft {
    pub sprite: Sprite,
    pub tier: EnemyTier,
    pub power: u32,
    pub hit_accumulated: u32,
    pub score_value: u64,
    pub segments: u32,
    /// Where the craft was when it died, for explosion placement
    pub bomb_origin: Vec2,
}

impl EnemyCraft {
    pub fn new(id: u32, tier: EnemyTier) -> Self {
        Self {
            sprite: Sprite::new(id, Vec2::splat(tier.size()), tier.velocity()),
            tier,
            power: tier.power(),
            hit_accumulated: 0,
            score_value: tier.score_value(),
            segments: tier.segments(),
            bomb_origin: Vec2::splat(-100.0),
        }
    }

    pub fn be_hit(&mut self, damage: u32) {
        self.hit_accumulated = self.hit_accumulated.saturating_add(damage);
    }

    pub fn is_depleted(&self) -> bool {
        self.hit_accumulated >= self.power
    }

    /// Deplete instantly (screen-clearing bomb)
    pub fn bomb(&mut self) {
        self.hit_accumulated = self.power;
    }

    pub fn advance(&mut self) {
        self.sprite.pos.y += self.sprite.velocity;
    }

    /// Damage-stage image index: 0 while untouched, rising as hits accumulate
    pub fn display_variant(&self) -> u32 {
        if self.hit_accumulated == 0 {
            return 0;
        }
        let variants = self.tier.variants();
        let per_stage = (self.power / variants).max(1);
        (self.hit_accumulated / per_stage).min(variants - 1)
    }
}

impl Entity for EnemyCraft {
    impl_sprite_access!();

    fn rebirth(&mut self) {
        self.sprite.life = LifeState::Alive;
        self.hit_accumulated = 0;
        self.sprite.variant = 0;
    }

    fn die(&mut self) {
        self.sprite.life = LifeState::Dead;
        self.bomb_origin = self.sprite.pos;
    }
}
