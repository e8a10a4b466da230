//! Plane War headless host
//!
//! Drives the simulation at a fixed frame count without rendering. The
//! autopilot stands in for touch input: it flies the craft on screen, shadows
//! the nearest enemy and fires the bomb when the screen fills up.

use std::sync::Arc;

use plane_war::sim::{Entity, GameEvent, GamePhase};
use plane_war::{Command, CommandQueue, GameController, Settings, Snapshot};

/// Frames the death animation lasts before the host reports `over`
const DEATH_ANIMATION_FRAMES: u32 = 30;

/// Horizontal drag per frame while shadowing a target
const AUTOPILOT_STEP: f32 = 12.0;

/// Visible enemies that make the autopilot spend a bomb
const BOMB_THRESHOLD: usize = 6;

fn main() {
    env_logger::init();
    log::info!("Plane War (headless) starting...");

    let settings = Settings::load();
    let mut game = GameController::from_settings(&settings);
    log::info!("Seed: {}", game.state().seed);

    let updates = game.subscribe();
    let input = game.queue();

    game.start();
    bring_player_in(&game, &input);

    let mut explosions = 0u32;
    let mut dying_frames = 0u32;
    for _ in 0..settings.max_frames {
        game.pump();

        match game.phase() {
            GamePhase::Running => {
                if settings.autopilot {
                    steer(&game.snapshot(), &input);
                }
                input.send(Command::AdvanceFrame);
            }
            GamePhase::Dying => {
                dying_frames += 1;
                if dying_frames >= DEATH_ANIMATION_FRAMES {
                    input.send(Command::Over);
                }
            }
            GamePhase::Over => {
                input.send(Command::Exit);
            }
            GamePhase::Exit => break,
            GamePhase::Waiting | GamePhase::Paused => {
                input.send(Command::Start);
            }
        }

        for snapshot in updates.try_iter() {
            explosions += snapshot
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::Explosion { .. }))
                .count() as u32;
        }
    }

    let snapshot = game.snapshot();
    log::info!(
        "Finished after {} frames: phase {}, score {}, level {}, {} explosions",
        snapshot.frame,
        snapshot.phase.as_str(),
        snapshot.score,
        snapshot.level,
        explosions
    );
    println!("score {} level {}", snapshot.score, snapshot.level);
}

/// Stand in for the entry animation: place the craft near the bottom centre
fn bring_player_in(game: &GameController, input: &CommandQueue) {
    let snapshot = game.snapshot();
    let viewport = snapshot.viewport;
    let size = snapshot.player.sprite.size;
    input.send(Command::MovePlayer(glam::Vec2::new(
        viewport.width / 2.0 - size.x / 2.0,
        viewport.height * 0.8,
    )));
}

fn steer(snapshot: &Arc<Snapshot>, input: &CommandQueue) {
    let player = &snapshot.player.sprite;
    let height = snapshot.viewport.height;

    let visible: Vec<_> = snapshot
        .enemies
        .iter()
        .filter(|e| e.is_alive() && e.sprite.pos.y > 0.0 && e.sprite.pos.y < height)
        .collect();

    if visible.len() >= BOMB_THRESHOLD && snapshot.player.bomb_award.stock > 0 {
        input.send(Command::DestroyAllEnemies);
    }

    // Shadow the lowest enemy still above the player
    let target = visible
        .iter()
        .filter(|e| e.sprite.pos.y < player.pos.y)
        .max_by(|a, b| a.sprite.pos.y.total_cmp(&b.sprite.pos.y));
    let Some(target) = target else {
        return;
    };
    let target_x = target.sprite.pos.x + target.sprite.size.x / 2.0;
    let player_x = player.pos.x + player.size.x / 2.0;
    let dx = (target_x - player_x).clamp(-AUTOPILOT_STEP, AUTOPILOT_STEP);
    if dx.abs() > f32::EPSILON {
        input.send(Command::DragPlayer(glam::Vec2::new(dx, 0.0)));
    }
}
