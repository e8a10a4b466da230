//! Per-frame simulation
//!
//! Every operation here mutates a [`GameState`] in place and is a silent no-op
//! when called in a phase where it does not apply. Callers must serialize all
//! calls onto a single timeline.

use glam::Vec2;
use rand::Rng;

use super::sprite::{EnemyCraft, EnemyTier, Entity, Pickup, PickupKind, Projectile, ProjectileKind};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Wave composition `(small, middle, big)` spawned on reaching a level
pub fn wave_for_level(level: u32) -> Option<(u32, u32, u32)> {
    match level {
        1 => Some((3, 2, 1)),
        2 => Some((6, 3, 2)),
        3 => Some((10, 5, 3)),
        _ => None,
    }
}

/// Level implied by a score, if the score sits in a promotion band
pub fn level_for_score(score: u64) -> Option<u32> {
    match score {
        100..=999 => Some(2),
        1000..=1999 => Some(3),
        _ => None,
    }
}

// --- Phase transitions ---

fn set_phase(state: &mut GameState, to: GamePhase) {
    let from = state.phase;
    if from == to {
        return;
    }
    state.phase = to;
    log::info!("Game phase {} -> {}", from.as_str(), to.as_str());
    state.emit(GameEvent::PhaseChanged { from, to });
}

/// Waiting/Paused -> Running
pub fn start(state: &mut GameState) -> bool {
    match state.phase {
        GamePhase::Waiting | GamePhase::Paused => {
            set_phase(state, GamePhase::Running);
            true
        }
        _ => {
            log::trace!("start ignored in {}", state.phase.as_str());
            false
        }
    }
}

/// Running -> Paused
pub fn pause(state: &mut GameState) -> bool {
    if !state.is_running() {
        log::trace!("pause ignored in {}", state.phase.as_str());
        return false;
    }
    set_phase(state, GamePhase::Paused);
    true
}

/// Running -> Dying
pub fn die(state: &mut GameState) -> bool {
    if !state.is_running() {
        log::trace!("die ignored in {}", state.phase.as_str());
        return false;
    }
    state.player.die();
    set_phase(state, GamePhase::Dying);
    true
}

/// Dying -> Over, once the death animation has finished
pub fn over(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Dying {
        log::trace!("over ignored in {}", state.phase.as_str());
        return false;
    }
    set_phase(state, GamePhase::Over);
    log::info!("Game over with score {} at level {}", state.score, state.level);
    true
}

/// Over -> Waiting, clearing the round
///
/// Score, level and every collection are cleared and the player is reborn at
/// its spawn origin. The caller initializes the next round.
pub fn reset(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Over {
        log::trace!("reset ignored in {}", state.phase.as_str());
        return false;
    }
    state.score = 0;
    state.emit(GameEvent::ScoreChanged { score: 0 });
    state.level = 0;
    state.enemies.clear();
    state.projectiles.clear();
    state.pickups.clear();
    state.player.rebirth();
    set_phase(state, GamePhase::Waiting);
    true
}

/// Any phase -> Exit (terminal)
pub fn exit(state: &mut GameState) -> bool {
    if state.phase == GamePhase::Exit {
        return false;
    }
    set_phase(state, GamePhase::Exit);
    true
}

// --- Round setup ---

/// Place the player at its spawn origin and bring in the level-1 wave
pub fn initialize(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Waiting {
        log::trace!("initialize ignored in {}", state.phase.as_str());
        return false;
    }
    let size = state.player.sprite.size;
    state.player.sprite.start = Vec2::new(
        state.viewport.width / 2.0 - size.x / 2.0,
        state.viewport.retire_y(),
    );
    state.player.rebirth();
    log::info!(
        "Round initialized: viewport {}x{}, player spawn {:?}",
        state.viewport.width,
        state.viewport.height,
        state.player.sprite.start
    );
    set_level(state, 1);
    true
}

/// Switch difficulty level, spawning that level's wave on change
pub fn set_level(state: &mut GameState, level: u32) {
    if state.level == level {
        return;
    }
    state.level = level;
    log::info!("Level {}", level);
    state.emit(GameEvent::LevelUp { level });
    if let Some((small, middle, big)) = wave_for_level(level) {
        spawn_enemy_wave(state, small, middle, big);
    }
}

/// Append a batch of enemies; they are placed on their first movement tick
pub fn spawn_enemy_wave(state: &mut GameState, small: u32, middle: u32, big: u32) {
    let tiers = [
        (EnemyTier::Small, small),
        (EnemyTier::Middle, middle),
        (EnemyTier::Big, big),
    ];
    for (tier, count) in tiers {
        for _ in 0..count {
            let id = state.next_entity_id();
            state.enemies.push(EnemyCraft::new(id, tier));
        }
    }
    log::info!(
        "Wave spawned: {} small, {} middle, {} big ({} enemies total)",
        small,
        middle,
        big,
        state.enemies.len()
    );
    state.emit(GameEvent::WaveSpawned { small, middle, big });
}

// --- Player ---

/// Commit a new player position
pub fn move_player(state: &mut GameState, pos: Vec2) -> bool {
    if !state.is_running() {
        return false;
    }
    state.player.sprite.pos = pos;
    state.player.entering_animation = false;
    true
}

/// Apply a drag delta, keeping the craft horizontally on screen and below the top edge
pub fn drag_player(state: &mut GameState, delta: Vec2) -> bool {
    if !state.is_running() {
        return false;
    }
    let viewport = state.viewport;
    let sprite = &state.player.sprite;
    let max_x = viewport.width - sprite.size.x;

    let x = sprite.pos.x + delta.x;
    let new_x = if x <= 0.0 {
        0.0
    } else if x >= max_x {
        max_x
    } else {
        x
    };

    // No bottom clamp beyond the viewport height itself
    let y = sprite.pos.y + delta.y;
    let new_y = if y <= 0.0 {
        0.0
    } else if y >= viewport.height {
        viewport.height
    } else {
        y
    };

    move_player(state, Vec2::new(new_x, new_y))
}

// --- Projectiles ---

/// Spawn one projectile, reusing the first dead pool slot when there is one
///
/// Fires the double variant while the player holds upgraded stock. Returns the
/// id of the armed projectile.
pub fn fire_projectile(state: &mut GameState) -> Option<u32> {
    if !state.is_running() || state.player.sprite.pos.y >= state.viewport.height {
        return None;
    }
    let kind = state.player.bullet_award.take_shot();
    if kind == ProjectileKind::Double {
        log::trace!("Double shot, {} left", state.player.bullet_award.stock);
    }

    if let Some(slot) = state.projectiles.iter_mut().find(|p| p.is_dead()) {
        slot.arm(kind);
        return Some(slot.sprite.id);
    }

    let id = state.next_entity_id();
    state.projectiles.push(Projectile::new(id, kind));
    Some(id)
}

/// Advance one projectile by id
pub fn move_projectile(state: &mut GameState, id: u32) {
    if let Some(idx) = state.projectile_index(id) {
        move_projectile_at(state, idx);
    }
}

fn move_projectile_at(state: &mut GameState, idx: usize) {
    if !state.is_running() {
        return;
    }
    let player = &state.player.sprite;
    let projectile = &mut state.projectiles[idx];
    if projectile.is_dead() {
        return;
    }

    if !projectile.sprite.initialized {
        // Anchor to the centre of the player's top edge
        let size = projectile.sprite.size;
        projectile.sprite.start = Vec2::new(
            player.pos.x + player.size.x / 2.0 - size.x / 2.0,
            player.pos.y - size.y,
        );
        projectile.sprite.pos = projectile.sprite.start;
        projectile.sprite.initialized = true;
    }

    if !projectile.is_valid() {
        projectile.die();
        return;
    }
    projectile.advance();
}

// --- Enemies ---

/// Advance one enemy by id and resolve its collisions
///
/// Returns true when the enemy exploded this tick.
pub fn move_enemy(state: &mut GameState, id: u32) -> bool {
    match state.enemy_index(id) {
        Some(idx) => move_enemy_at(state, idx),
        None => false,
    }
}

fn move_enemy_at(state: &mut GameState, idx: usize) -> bool {
    if !state.is_running() {
        return false;
    }
    let viewport = state.viewport;
    let retire_y = viewport.retire_y();

    let GameState { rng, enemies, .. } = &mut *state;
    let enemy = &mut enemies[idx];

    if !enemy.sprite.initialized {
        let size = enemy.sprite.size;
        let max_x = (viewport.width - size.x).max(0.0);
        enemy.sprite.pos.x = rng.random_range(0.0..=max_x);
        let drop = rng.random_range(0.0..=viewport.height) + rng.random_range(0.0..=viewport.height);
        enemy.sprite.pos.y = -drop - size.y * enemy.tier.spawn_depth();
        enemy.sprite.initialized = true;
        enemy.rebirth();
    }

    if enemy.sprite.pos.y >= retire_y {
        enemy.sprite.initialized = false;
        enemy.die();
    }
    enemy.advance();

    resolve_enemy_combat(state, idx)
}

/// Kill, player-contact and projectile checks for one enemy
fn resolve_enemy_combat(state: &mut GameState, idx: usize) -> bool {
    let mut exploded = false;

    // Depleted by an earlier bomb
    {
        let enemy = &mut state.enemies[idx];
        if enemy.is_alive() && enemy.is_depleted() {
            enemy.die();
            let event = GameEvent::Explosion {
                enemy_id: enemy.sprite.id,
                origin: enemy.bomb_origin,
            };
            state.emit(event);
            exploded = true;
        }
    }

    // Contact with the player
    let player = &state.player;
    let enemy = &state.enemies[idx];
    let contact = enemy.is_alive()
        && player.sprite.on_screen()
        && enemy.sprite.on_screen()
        && player.sprite.rect().overlaps(&enemy.sprite.rect());
    if contact && state.is_running() && player.is_unprotected() {
        log::debug!("Player hit by enemy {}", enemy.sprite.id);
        die(state);
    }

    // Projectile hits
    let enemy = &mut state.enemies[idx];
    let mut killed = None;
    for projectile in state.projectiles.iter_mut() {
        if !(enemy.is_alive() && projectile.is_alive() && projectile.sprite.on_screen()) {
            continue;
        }
        if !projectile.sprite.rect().overlaps(&enemy.sprite.rect()) {
            continue;
        }
        projectile.die();
        enemy.be_hit(projectile.damage);
        enemy.sprite.variant = enemy.display_variant();
        if enemy.is_depleted() {
            enemy.die();
            killed = Some((enemy.sprite.id, enemy.bomb_origin, enemy.score_value));
            break;
        }
    }

    if let Some((enemy_id, origin, value)) = killed {
        log::debug!("Enemy {} destroyed (+{})", enemy_id, value);
        state.emit(GameEvent::Explosion { enemy_id, origin });
        add_score(state, value);
        exploded = true;
    }

    exploded
}

/// Deplete every live enemy in the visible band and spend one bomb
///
/// The enemies explode on their next movement tick. Returns how many were hit.
pub fn destroy_all_enemies(state: &mut GameState) -> u32 {
    if !state.is_running() {
        return 0;
    }
    let height = state.viewport.height;
    let mut gained = 0;
    let mut destroyed = 0;
    for enemy in state.enemies.iter_mut() {
        let y = enemy.sprite.pos.y;
        if enemy.is_alive() && !enemy.is_depleted() && y > 0.0 && y < height {
            gained += enemy.score_value;
            enemy.bomb();
            destroyed += 1;
        }
    }

    add_score(state, gained);

    let bombs = &mut state.player.bomb_award;
    bombs.stock = bombs.stock.saturating_sub(1);
    log::debug!("Bomb used: {} enemies, {} bombs left", destroyed, bombs.stock);
    state.emit(GameEvent::BombUsed { destroyed });
    destroyed
}

// --- Score ---

/// Add to the score, then handle level promotion and pickup drops
pub fn add_score(state: &mut GameState, delta: u64) {
    if delta == 0 {
        return;
    }
    state.score += delta;
    let score = state.score;
    state.emit(GameEvent::ScoreChanged { score });

    if let Some(level) = level_for_score(score) {
        if level > state.level {
            set_level(state, level);
        }
    }
    if score.is_multiple_of(SCORE_PICKUP_STEP) {
        spawn_pickup(state);
    }
}

// --- Pickups ---

/// Drop a random pickup; it is placed on its first movement tick
pub fn spawn_pickup(state: &mut GameState) -> Option<u32> {
    if !state.is_running() {
        return None;
    }
    let kind = if state.rng.random_bool(0.5) {
        PickupKind::BulletStock
    } else {
        PickupKind::BombStock
    };
    let id = state.next_entity_id();
    state.pickups.push(Pickup::new(id, kind));
    log::debug!("Pickup {} spawned ({:?})", id, kind);
    state.emit(GameEvent::PickupSpawned { pickup_id: id });
    Some(id)
}

/// Advance one pickup by id, collecting it on contact and dropping it once off screen
pub fn move_pickup(state: &mut GameState, id: u32) {
    if let Some(idx) = state.pickup_index(id) {
        move_pickup_at(state, idx);
    }
}

fn move_pickup_at(state: &mut GameState, idx: usize) {
    if !state.is_running() {
        return;
    }
    let viewport = state.viewport;

    let GameState { rng, pickups, .. } = &mut *state;
    let pickup = &mut pickups[idx];
    if !pickup.sprite.initialized {
        let max_x = (viewport.width - pickup.sprite.size.x).max(0.0);
        pickup.sprite.start = Vec2::new(rng.random_range(0.0..=max_x), -pickup.sprite.size.y);
        pickup.sprite.pos = pickup.sprite.start;
        pickup.sprite.initialized = true;
    }
    if pickup.is_alive() && pickup.sprite.pos.y >= viewport.retire_y() {
        pickup.die();
    }
    pickup.advance();

    let player = &state.player;
    let pickup = &state.pickups[idx];
    let touching = player.is_alive()
        && pickup.is_alive()
        && player.sprite.on_screen()
        && pickup.sprite.on_screen()
        && player.sprite.rect().overlaps(&pickup.sprite.rect());

    if touching {
        collect_pickup(state, idx);
    } else if state.pickups[idx].is_dead() {
        state.pickups.remove(idx);
    }
}

/// Apply a pickup's effect to the player and remove it
fn collect_pickup(state: &mut GameState, idx: usize) {
    let pickup = state.pickups.remove(idx);
    let player = &mut state.player;
    match pickup.kind {
        PickupKind::BulletStock => {
            player.bullet_award.tier = ProjectileKind::Double;
            player.bullet_award.stock += pickup.amount;
        }
        PickupKind::BombStock => {
            player.bomb_award.stock += pickup.amount;
        }
    }
    log::debug!("Pickup {} collected ({:?} +{})", pickup.sprite.id, pickup.kind, pickup.amount);
    state.emit(GameEvent::PickupCollected {
        pickup_id: pickup.sprite.id,
    });
}

// --- Frame driver ---

/// Count down one frame of the player's protection
pub fn reduce_protect(state: &mut GameState) -> bool {
    if !state.is_running() {
        return false;
    }
    state.player.reduce_protect();
    true
}

/// Advance one rendered frame
///
/// Fires on the cadence, moves every projectile, enemy and pickup, then counts
/// down the player's protection.
pub fn tick(state: &mut GameState) {
    state.frame += 1;
    if !state.is_running() {
        return;
    }

    if state.frame.is_multiple_of(FIRE_INTERVAL_FRAMES) {
        fire_projectile(state);
    }

    for idx in 0..state.projectiles.len() {
        move_projectile_at(state, idx);
    }

    // Level-ups during the loop append enemies; they start moving next frame
    let enemy_count = state.enemies.len();
    for idx in 0..enemy_count {
        move_enemy_at(state, idx);
    }

    let pickup_ids: Vec<u32> = state.pickups.iter().map(|p| p.sprite.id).collect();
    for id in pickup_ids {
        move_pickup(state, id);
    }

    reduce_protect(state);
}
