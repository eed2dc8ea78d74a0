//! Simulation - Main game server and frame loop
//!
//! Owns the race, both horses and the keyboard state, measures frame
//! time with a monotonic clock and provides the interface for Tauri
//! commands.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::game_server::controls::{Controls, InputState};
use crate::game_server::horse::{Horse, HorseSnapshot};
use crate::game_server::hud::{Hud, HudView};
use crate::game_server::race::{Race, RaceConfig, RaceState, Time};
use crate::game_server::scene::SceneRequest;

/// Game state of the local session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Idle,
    Ready,
    Racing,
    Results,
}

/// Server statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerStats {
    pub tick_rate: f32,
    pub avg_tick_time_ms: f32,
    pub obstacle_count: u32,
    pub game_state: GameState,
}

/// Everything the frontend needs to draw one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameUpdate {
    pub race: RaceState,
    pub hud: HudView,
    pub player: HorseSnapshot,
    pub ai: HorseSnapshot,
}

/// Main game server
pub struct GameServer {
    /// Current game state
    state: GameState,
    /// Active race (if any)
    race: Option<Race>,
    /// Scene requests recorded when the track was built
    scene: Vec<SceneRequest>,
    player: Horse,
    ai: Horse,
    input: InputState,
    hud: Hud,
    /// Session clock origin
    epoch: Instant,
    /// Last tick timestamp
    last_tick: Instant,
    /// Recent tick costs for averaging
    tick_times: Vec<f32>,
    /// Recent frame gaps for the measured tick rate
    frame_gaps: Vec<f32>,
    /// Whether frames advance the race
    running: bool,
}

impl GameServer {
    const TICK_WINDOW: usize = 60;

    /// Create a new game server
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            state: GameState::Idle,
            race: None,
            scene: Vec::new(),
            player: Horse::player(),
            ai: Horse::ai(),
            input: InputState::new(),
            hud: Hud::new(),
            epoch: now,
            last_tick: now,
            tick_times: Vec::with_capacity(Self::TICK_WINDOW),
            frame_gaps: Vec::with_capacity(Self::TICK_WINDOW),
            running: false,
        }
    }

    /// Build a new track with the given config
    pub fn init_race(&mut self, config: RaceConfig) {
        let mut rng = config.rng();
        let mut race = Race::new(config);

        self.scene.clear();
        race.init(&mut rng, &mut self.scene);

        self.race = Some(race);
        self.player = Horse::player();
        self.ai = Horse::ai();
        self.hud = Hud::new();
        self.state = GameState::Ready;
        // A fresh track waits for start_race before frames advance
        self.running = false;
    }

    /// Start (or restart) the race on the current track
    pub fn start_race(&mut self) {
        if let Some(race) = &mut self.race {
            race.start_race();
            self.player = Horse::player();
            self.ai = Horse::ai();
            // Re-arm the finish banner even if the next frame already finishes
            self.hud = Hud::new();
            self.state = GameState::Racing;
            self.running = true;
            self.last_tick = Instant::now();
        } else {
            log::warn!("start_race called before init_race");
        }
    }

    /// Advance one frame using the wall clock
    pub fn tick(&mut self) -> Option<FrameUpdate> {
        if !self.running {
            return self.frame(false);
        }

        let now = Instant::now();
        let dt = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        let session = now.duration_since(self.epoch).as_secs_f64();

        self.tick_with(Time::new(dt, session))
    }

    /// Advance one frame with an explicit clock
    pub fn tick_with(&mut self, time: Time) -> Option<FrameUpdate> {
        if !self.running {
            return self.frame(false);
        }

        let tick_start = Instant::now();

        Controls::apply(&mut self.player, &self.input, time.dt);

        let finished = match &mut self.race {
            Some(race) => {
                race.update(time, &mut self.player, &mut self.ai);
                race.state().is_finished
            }
            None => false,
        };

        // Frames keep flowing after the finish so pending penalty
        // expiries still land
        if finished && self.state == GameState::Racing {
            log::info!("Race over, showing results");
            self.state = GameState::Results;
        }

        let update = self.frame(true);

        let tick_time = tick_start.elapsed().as_secs_f32() * 1000.0;
        self.tick_times.push(tick_time);
        self.frame_gaps.push(time.dt);
        if self.tick_times.len() > Self::TICK_WINDOW {
            self.tick_times.remove(0);
            self.frame_gaps.remove(0);
        }

        update
    }

    /// Handle key down event
    pub fn key_down(&mut self, key: &str) {
        if !self.input.key_down(key) {
            log::debug!("Ignoring unmapped key {:?}", key);
        }
    }

    /// Handle key up event
    pub fn key_up(&mut self, key: &str) {
        self.input.key_up(key);
    }

    /// Current race state
    pub fn get_race_state(&self) -> Option<RaceState> {
        self.race.as_ref().map(|r| r.race_state())
    }

    /// Scene requests for the current track
    pub fn get_scene(&self) -> &[SceneRequest] {
        &self.scene
    }

    /// Measured frame rate, average update cost and obstacle count
    pub fn get_stats(&self) -> ServerStats {
        let avg_tick_time = if self.tick_times.is_empty() {
            0.0
        } else {
            self.tick_times.iter().sum::<f32>() / self.tick_times.len() as f32
        };

        let elapsed = self.frame_gaps.iter().sum::<f32>();
        let tick_rate = if elapsed > 0.0 {
            self.frame_gaps.len() as f32 / elapsed
        } else {
            0.0
        };

        ServerStats {
            tick_rate,
            avg_tick_time_ms: avg_tick_time,
            obstacle_count: self
                .race
                .as_ref()
                .map(|r| r.track().obstacle_count() as u32)
                .unwrap_or(0),
            game_state: self.state,
        }
    }

    /// Lifecycle phase of the session (idle, track ready, racing, results)
    pub fn get_state(&self) -> GameState {
        self.state
    }

    /// Drop the track and race, release all keys and return to idle
    pub fn reset(&mut self) {
        self.state = GameState::Idle;
        self.race = None;
        self.scene.clear();
        self.input.clear();
        self.running = false;
        self.tick_times.clear();
        self.frame_gaps.clear();
    }

    /// Freeze the race; pending penalty expiries land on the first
    /// frame after resume
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Continue a paused race or results screen, restarting the frame gap
    pub fn resume(&mut self) {
        if matches!(self.state, GameState::Racing | GameState::Results) {
            self.running = true;
            self.last_tick = Instant::now();
        }
    }

    /// Whether ticks currently advance the race
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Build the frame payload. Only advancing frames move the HUD's
    /// finish tracking, so the banner is raised once.
    fn frame(&mut self, advanced: bool) -> Option<FrameUpdate> {
        let race = self.race.as_ref()?;
        let state = race.race_state();
        let hud = if advanced {
            self.hud.view(&state, race.track().length)
        } else {
            self.hud.clone().view(&state, race.track().length)
        };

        Some(FrameUpdate {
            race: state,
            hud,
            player: HorseSnapshot::from(&self.player),
            ai: HorseSnapshot::from(&self.ai),
        })
    }
}

impl Default for GameServer {
    fn default() -> Self {
        Self::new()
    }
}
