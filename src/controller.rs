//! Game-state controller
//!
//! The controller is the only writer of the simulation. It exposes one method
//! per named command, forwards it to `sim::tick`, then publishes a versioned
//! [`Snapshot`] that readers poll or subscribe to. Commands coming from other
//! threads go through a [`CommandQueue`] and are applied in arrival order by
//! [`GameController::pump`].

use std::sync::Arc;
use std::sync::mpsc;

use glam::Vec2;
use serde::Serialize;

use crate::settings::Settings;
use crate::sim::tick;
use crate::sim::{
    EnemyCraft, GameEvent, GamePhase, GameState, Pickup, PlayerCraft, Projectile, Viewport,
};

/// A named command, as sent through a [`CommandQueue`]
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Start,
    Pause,
    Reset,
    Die,
    Over,
    Exit,
    MovePlayer(Vec2),
    DragPlayer(Vec2),
    FireProjectile,
    MoveProjectile(u32),
    MoveEnemy(u32),
    MovePickup(u32),
    DestroyAllEnemies,
    SetViewport(Viewport),
    ReduceProtect,
    AdvanceFrame,
}

/// Read-only view of the simulation after one update
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// Increases by one with every publish
    pub version: u64,
    pub phase: GamePhase,
    pub score: u64,
    pub level: u32,
    pub frame: u64,
    pub viewport: Viewport,
    pub player: PlayerCraft,
    pub enemies: Vec<EnemyCraft>,
    pub projectiles: Vec<Projectile>,
    pub pickups: Vec<Pickup>,
    /// Events produced since the previous snapshot, oldest first
    pub events: Vec<GameEvent>,
}

impl Snapshot {
    fn capture(version: u64, state: &GameState, events: Vec<GameEvent>) -> Self {
        Self {
            version,
            phase: state.phase,
            score: state.score,
            level: state.level,
            frame: state.frame,
            viewport: state.viewport,
            player: state.player.clone(),
            enemies: state.enemies.clone(),
            projectiles: state.projectiles.clone(),
            pickups: state.pickups.clone(),
            events,
        }
    }
}

/// Cloneable handle for submitting commands from any thread
#[derive(Debug, Clone)]
pub struct CommandQueue {
    tx: mpsc::Sender<Command>,
}

impl CommandQueue {
    /// Queue a command; false once the controller is gone
    pub fn send(&self, command: Command) -> bool {
        self.tx.send(command).is_ok()
    }
}

/// Owns the simulation and serializes every mutation
pub struct GameController {
    state: GameState,
    latest: Arc<Snapshot>,
    version: u64,
    subscribers: Vec<mpsc::Sender<Arc<Snapshot>>>,
    queue_tx: mpsc::Sender<Command>,
    queue_rx: mpsc::Receiver<Command>,
}

impl GameController {
    /// Create a controller and set up the first round
    pub fn new(seed: u64, viewport: Viewport) -> Self {
        let mut state = GameState::new(seed, viewport);
        tick::initialize(&mut state);
        let events = state.drain_events();
        let latest = Arc::new(Snapshot::capture(0, &state, events));
        let (queue_tx, queue_rx) = mpsc::channel();
        log::info!("Game controller ready with seed {}", seed);
        Self {
            state,
            latest,
            version: 0,
            subscribers: Vec::new(),
            queue_tx,
            queue_rx,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        Self::new(seed, settings.viewport())
    }

    /// Simulation state (read-only)
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// The host should close once this is true
    pub fn should_exit(&self) -> bool {
        self.state.phase == GamePhase::Exit
    }

    /// Most recently published snapshot
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.latest)
    }

    /// Receive every snapshot published from now on, in order
    pub fn subscribe(&mut self) -> mpsc::Receiver<Arc<Snapshot>> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn queue(&self) -> CommandQueue {
        CommandQueue {
            tx: self.queue_tx.clone(),
        }
    }

    /// Apply every queued command in arrival order, returning how many ran
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(command) = self.queue_rx.try_recv() {
            self.dispatch(command);
            applied += 1;
        }
        applied
    }

    /// Run one command
    ///
    /// Returns whether it took effect; for `MoveEnemy`, whether the enemy exploded.
    pub fn dispatch(&mut self, command: Command) -> bool {
        match command {
            Command::Start => self.start(),
            Command::Pause => self.pause(),
            Command::Reset => self.reset(),
            Command::Die => self.die(),
            Command::Over => self.over(),
            Command::Exit => self.exit(),
            Command::MovePlayer(pos) => self.move_player(pos.x, pos.y),
            Command::DragPlayer(delta) => self.drag_player(delta.x, delta.y),
            Command::FireProjectile => self.fire_projectile_tick().is_some(),
            Command::MoveProjectile(id) => {
                self.move_projectile_tick(id);
                true
            }
            Command::MoveEnemy(id) => self.move_enemy_tick(id),
            Command::MovePickup(id) => {
                self.move_pickup_tick(id);
                true
            }
            Command::DestroyAllEnemies => self.destroy_all_enemies() > 0,
            Command::SetViewport(viewport) => self.set_viewport(viewport),
            Command::ReduceProtect => self.reduce_protect(),
            Command::AdvanceFrame => {
                self.advance_frame();
                true
            }
        }
    }

    pub fn start(&mut self) -> bool {
        let applied = tick::start(&mut self.state);
        self.publish();
        applied
    }

    pub fn pause(&mut self) -> bool {
        let applied = tick::pause(&mut self.state);
        self.publish();
        applied
    }

    /// Back to Waiting with a fresh round
    pub fn reset(&mut self) -> bool {
        let applied = tick::reset(&mut self.state);
        if applied {
            tick::initialize(&mut self.state);
        }
        self.publish();
        applied
    }

    pub fn die(&mut self) -> bool {
        let applied = tick::die(&mut self.state);
        self.publish();
        applied
    }

    /// Called by the host once the death animation completes
    pub fn over(&mut self) -> bool {
        let applied = tick::over(&mut self.state);
        self.publish();
        applied
    }

    pub fn exit(&mut self) -> bool {
        let applied = tick::exit(&mut self.state);
        if applied {
            log::info!("Exit requested");
        }
        self.publish();
        applied
    }

    pub fn move_player(&mut self, x: f32, y: f32) -> bool {
        let applied = tick::move_player(&mut self.state, Vec2::new(x, y));
        self.publish();
        applied
    }

    pub fn drag_player(&mut self, dx: f32, dy: f32) -> bool {
        let applied = tick::drag_player(&mut self.state, Vec2::new(dx, dy));
        self.publish();
        applied
    }

    pub fn fire_projectile_tick(&mut self) -> Option<u32> {
        let id = tick::fire_projectile(&mut self.state);
        self.publish();
        id
    }

    pub fn move_projectile_tick(&mut self, id: u32) {
        tick::move_projectile(&mut self.state, id);
        self.publish();
    }

    /// Returns true when the enemy's explosion should start playing
    pub fn move_enemy_tick(&mut self, id: u32) -> bool {
        let exploded = tick::move_enemy(&mut self.state, id);
        self.publish();
        exploded
    }

    pub fn move_pickup_tick(&mut self, id: u32) {
        tick::move_pickup(&mut self.state, id);
        self.publish();
    }

    pub fn destroy_all_enemies(&mut self) -> u32 {
        let destroyed = tick::destroy_all_enemies(&mut self.state);
        self.publish();
        destroyed
    }

    /// Host-supplied play area; takes effect from the next update
    ///
    /// A viewport that is not finite or too narrow for the craft is ignored.
    pub fn set_viewport(&mut self, viewport: Viewport) -> bool {
        if !viewport.is_playable() {
            log::trace!("viewport {}x{} ignored", viewport.width, viewport.height);
            return false;
        }
        if self.state.viewport != viewport {
            log::debug!("Viewport {}x{}", viewport.width, viewport.height);
            self.state.viewport = viewport;
        }
        self.publish();
        true
    }

    /// Count down one frame of protection, for hosts that drive the
    /// per-entity commands instead of [`advance_frame`](Self::advance_frame)
    pub fn reduce_protect(&mut self) -> bool {
        let applied = tick::reduce_protect(&mut self.state);
        self.publish();
        applied
    }

    /// Run one full rendered frame
    pub fn advance_frame(&mut self) {
        tick::tick(&mut self.state);
        self.publish();
    }

    fn publish(&mut self) {
        self.version += 1;
        let events = self.state.drain_events();
        let snapshot = Arc::new(Snapshot::capture(self.version, &self.state, events));
        self.subscribers
            .retain(|tx| tx.send(Arc::clone(&snapshot)).is_ok());
        self.latest = snapshot;
        log::trace!("Published snapshot v{}", self.version);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> GameController {
        GameController::new(7, Viewport::new(400.0, 800.0))
    }

    #[test]
    fn test_new_controller_waits_with_first_wave() {
        let c = controller();
        let snap = c.snapshot();
        assert_eq!(snap.version, 0);
        assert_eq!(snap.phase, GamePhase::Waiting);
        assert_eq!(snap.level, 1);
        assert_eq!(snap.enemies.len(), 6);
        assert!(snap
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::WaveSpawned { small: 3, middle: 2, big: 1 })));
    }

    #[test]
    fn test_versions_increase_per_command() {
        let mut c = controller();
        c.start();
        assert_eq!(c.snapshot().version, 1);
        c.pause();
        c.pause();
        assert_eq!(c.snapshot().version, 3);
        assert_eq!(c.snapshot().phase, GamePhase::Paused);
    }

    #[test]
    fn test_subscriber_sees_ordered_updates() {
        let mut c = controller();
        let rx = c.subscribe();
        c.start();
        c.pause();
        let first = rx.try_recv().ok().map(|s| (s.version, s.phase));
        let second = rx.try_recv().ok().map(|s| (s.version, s.phase));
        assert_eq!(first, Some((1, GamePhase::Running)));
        assert_eq!(second, Some((2, GamePhase::Paused)));
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let mut c = controller();
        drop(c.subscribe());
        c.start();
        assert!(c.subscribers.is_empty());
    }

    #[test]
    fn test_queue_applies_in_order() {
        let mut c = controller();
        let queue = c.queue();
        let handle = std::thread::spawn(move || {
            queue.send(Command::Start);
            queue.send(Command::MovePlayer(Vec2::new(50.0, 400.0)));
            queue.send(Command::Pause);
        });
        assert!(handle.join().is_ok());

        assert_eq!(c.pump(), 3);
        assert_eq!(c.phase(), GamePhase::Paused);
        assert_eq!(c.state().player.sprite.pos, Vec2::new(50.0, 400.0));
        assert_eq!(c.pump(), 0);
    }

    #[test]
    fn test_reset_reinitializes_round() {
        let mut c = controller();
        c.start();
        c.die();
        assert!(c.over());
        assert!(c.reset());
        let snap = c.snapshot();
        assert_eq!(snap.phase, GamePhase::Waiting);
        assert_eq!(snap.score, 0);
        assert_eq!(snap.level, 1);
        assert_eq!(snap.enemies.len(), 6);
    }

    #[test]
    fn test_invalid_commands_leave_state_untouched() {
        let mut c = controller();
        assert!(!c.over());
        assert!(!c.reset());
        assert!(!c.drag_player(10.0, 10.0));
        assert_eq!(c.fire_projectile_tick(), None);
        assert_eq!(c.phase(), GamePhase::Waiting);
        assert!(!c.should_exit());
        assert!(c.exit());
        assert!(c.should_exit());
        assert!(!c.start());
    }

    #[test]
    fn test_unplayable_viewport_is_ignored() {
        let mut c = controller();
        c.start();
        let version = c.snapshot().version;
        assert!(!c.dispatch(Command::SetViewport(Viewport::new(400.0, -10.0))));
        assert!(!c.set_viewport(Viewport::new(400.0, f32::NAN)));
        assert!(!c.set_viewport(Viewport::new(f32::INFINITY, 800.0)));
        assert_eq!(c.snapshot().version, version);
        assert_eq!(c.state().viewport, Viewport::new(400.0, 800.0));

        // Enemies still spawn against the last good viewport
        for _ in 0..3 {
            c.advance_frame();
        }
        assert_eq!(c.phase(), GamePhase::Running);
    }

    #[test]
    fn test_narrow_viewport_keeps_craft_on_screen() {
        let mut c = controller();
        c.start();
        assert!(!c.set_viewport(Viewport::new(20.0, 800.0)));
        assert!(c.move_player(5.0, 400.0));
        assert!(c.drag_player(3.0, 0.0));
        assert_eq!(c.state().player.sprite.pos.x, 8.0);

        assert!(c.dispatch(Command::SetViewport(Viewport::new(60.0, 800.0))));
        assert!(c.drag_player(3.0, 0.0));
        assert_eq!(c.state().player.sprite.pos.x, 0.0);
    }

    #[test]
    fn test_reduce_protect_counts_down_while_running() {
        let mut c = controller();
        assert!(!c.reduce_protect());
        c.start();
        assert!(c.dispatch(Command::ReduceProtect));
        assert_eq!(
            c.state().player.protect_frames,
            crate::consts::PLAYER_PROTECT_FRAMES - 1
        );
    }

    #[test]
    fn test_snapshot_serializes() {
        let c = controller();
        let json = serde_json::to_string(&*c.snapshot()).unwrap_or_default();
        assert!(json.contains("\"phase\":\"Waiting\""));
    }
}
