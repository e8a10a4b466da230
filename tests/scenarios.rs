use glam::Vec2;
use plane_war::sim::tick::{self, add_score, destroy_all_enemies, move_enemy};
use plane_war::sim::{
    EnemyCraft, EnemyTier, Entity, GameEvent, GamePhase, GameState, Projectile, ProjectileKind,
    Viewport,
};
use plane_war::{Command, GameController};

fn running_state() -> GameState {
    let mut state = GameState::new(2024, Viewport::new(480.0, 800.0));
    assert!(tick::initialize(&mut state));
    assert!(tick::start(&mut state));
    // Keep the opening wave well away from the action
    for enemy in &mut state.enemies {
        enemy.sprite.initialized = true;
        enemy.sprite.pos = Vec2::new(1.0, -50_000.0);
    }
    state
}

fn push_enemy(state: &mut GameState, tier: EnemyTier, pos: Vec2) -> u32 {
    let id = state.next_entity_id();
    let mut enemy = EnemyCraft::new(id, tier);
    enemy.sprite.initialized = true;
    enemy.sprite.pos = pos - Vec2::new(0.0, enemy.sprite.velocity);
    state.enemies.push(enemy);
    id
}

#[test]
fn collision_with_unprotected_player_starts_dying() {
    let mut state = running_state();
    state.player.sprite.pos = Vec2::new(100.0, 100.0);
    state.player.protect_frames = 0;
    let id = push_enemy(&mut state, EnemyTier::Middle, Vec2::new(100.0, 100.0));

    move_enemy(&mut state, id);
    assert_eq!(state.phase, GamePhase::Dying);

    // Nothing moves while dying
    assert!(!move_enemy(&mut state, id));
    assert!(tick::over(&mut state));
}

#[test]
fn two_double_hits_deplete_middle_enemy() {
    let mut state = running_state();
    state.player.sprite.pos = Vec2::new(400.0, 700.0);
    let id = push_enemy(&mut state, EnemyTier::Middle, Vec2::new(100.0, 200.0));

    let mut shots = Vec::new();
    for _ in 0..2 {
        let mut p = Projectile::new(state.next_entity_id(), ProjectileKind::Double);
        p.sprite.initialized = true;
        p.sprite.start = Vec2::new(110.0, 220.0);
        p.sprite.pos = p.sprite.start;
        shots.push(p);
    }
    state.projectiles.extend(shots);

    let score_before = state.score;
    assert!(move_enemy(&mut state, id));
    let enemy = state
        .enemies
        .iter()
        .find(|e| e.sprite.id == id)
        .map(|e| (e.is_depleted(), e.is_dead(), e.score_value));
    assert_eq!(enemy, Some((true, true, 40)));
    assert_eq!(state.score, score_before + 40);
}

#[test]
fn crossing_one_hundred_drops_exactly_one_pickup() {
    let mut state = running_state();
    add_score(&mut state, 60);
    add_score(&mut state, 40);
    let drops = state
        .events
        .iter()
        .filter(|e| matches!(e, GameEvent::PickupSpawned { .. }))
        .count();
    assert_eq!(drops, 1);
    assert_eq!(state.pickups.len(), 1);
}

#[test]
fn bomb_without_stock_stays_at_zero() {
    let mut state = running_state();
    push_enemy(&mut state, EnemyTier::Big, Vec2::new(50.0, 300.0));
    assert_eq!(destroy_all_enemies(&mut state), 1);
    assert_eq!(state.score, 90);
    assert_eq!(state.player.bomb_award.stock, 0);
}

#[test]
fn full_round_through_controller() {
    let mut game = GameController::new(99, Viewport::new(480.0, 800.0));
    assert_eq!(game.phase(), GamePhase::Waiting);

    let queue = game.queue();
    queue.send(Command::Start);
    queue.send(Command::MovePlayer(Vec2::new(200.0, 600.0)));
    game.pump();
    assert_eq!(game.phase(), GamePhase::Running);
    assert!(!game.state().player.entering_animation);

    for _ in 0..30 {
        game.advance_frame();
        if game.phase() != GamePhase::Running {
            break;
        }
    }
    assert!(!game.state().projectiles.is_empty());

    if game.phase() == GamePhase::Running {
        assert!(game.die());
    }
    assert_eq!(game.phase(), GamePhase::Dying);
    assert!(game.over());
    assert!(game.reset());
    assert_eq!(game.phase(), GamePhase::Waiting);
    assert_eq!(game.snapshot().score, 0);
    assert_eq!(game.state().enemies.len(), 6);

    assert!(game.dispatch(Command::Exit));
    assert!(game.should_exit());
}
