//! Race - Race configuration and state management
//!
//! Handles track setup, progress, obstacle penalties and finish detection
//! for the player horse and the AI horse.

use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::game_server::horse::{Horse, Racer};
use crate::game_server::scene::SceneSink;
use crate::game_server::track::Track;

/// Race configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    /// Total race distance
    pub track_length: f32,
    /// Cross-width of the track surface
    pub track_width: f32,
    /// Number of equal segments
    pub segment_count: usize,
    /// Player speed with no penalty applied
    pub player_base_speed: f32,
    /// Constant AI speed
    pub ai_speed: f32,
    /// Planar distance at which the player hits an obstacle
    pub collision_radius: f32,
    /// Seconds until a penalised player returns to base speed
    pub penalty_duration: f32,
    /// An interior segment gets an obstacle when a draw exceeds this
    pub obstacle_chance: f32,
    /// Fixed seed for obstacle layout (random per session when unset)
    pub seed: Option<u64>,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            track_length: 100.0,
            track_width: 10.0,
            segment_count: 8,
            player_base_speed: 5.0,
            ai_speed: 4.5,
            collision_radius: 2.0,
            penalty_duration: 2.0,
            obstacle_chance: 0.5,
            seed: None,
        }
    }
}

impl RaceConfig {
    /// Parse a JSON config, filling missing fields with defaults
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a JSON config file, falling back to defaults when it is
    /// missing or invalid
    pub fn load_or_default(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                log::info!("No race config at {} ({}), using defaults", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json_str(&text) {
            Ok(config) => {
                log::info!("Loaded race config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Invalid race config {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Random source for obstacle layout
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Simulation clock for one update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Time {
    /// Seconds since the previous update
    pub dt: f32,
    /// Seconds since the session clock started
    pub now: f64,
}

impl Time {
    pub fn new(dt: f32, now: f64) -> Self {
        Self { dt, now }
    }
}

/// Mutable race state, handed out as a copy
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RaceState {
    pub is_started: bool,
    pub is_finished: bool,
    pub winner: Option<Racer>,
    pub player_progress: f32,
    pub ai_progress: f32,
    pub player_speed: f32,
    pub ai_speed: f32,
    /// Session times at which the player speed snaps back to base
    pub penalty_expiries: Vec<f64>,
}

/// Race simulation for the player and one AI horse
#[derive(Debug, Clone)]
pub struct Race {
    config: RaceConfig,
    track: Track,
    state: RaceState,
}

impl Race {
    /// Create a race on a bare track with no obstacles placed yet
    pub fn new(config: RaceConfig) -> Self {
        let track = Track::new(&config);
        Self::from_track(config, track)
    }

    /// Create a race on an already built track
    pub fn from_track(config: RaceConfig, track: Track) -> Self {
        Self {
            config,
            track,
            state: RaceState::default(),
        }
    }

    /// Build the track, lay out obstacles and describe it to the renderer
    pub fn init<R, S>(&mut self, rng: &mut R, scene: &mut S)
    where
        R: Rng + ?Sized,
        S: SceneSink + ?Sized,
    {
        self.track = Track::new(&self.config);
        self.track.place_obstacles(rng, self.config.obstacle_chance);
        self.track.emit_scene(scene);

        log::info!(
            "Track built: {} segments, {} obstacles",
            self.track.segments.len(),
            self.track.obstacle_count()
        );
    }

    /// Reset progress and speeds and start racing
    ///
    /// Obstacles and pending penalty expiries are left alone.
    pub fn start_race(&mut self) {
        self.state.is_started = true;
        self.state.is_finished = false;
        self.state.winner = None;
        self.state.player_progress = 0.0;
        self.state.ai_progress = 0.0;
        self.state.player_speed = self.config.player_base_speed;
        self.state.ai_speed = self.config.ai_speed;
        log::info!("Race started");
    }

    /// Advance the race by one frame
    pub fn update(&mut self, time: Time, player: &mut Horse, ai: &mut Horse) {
        self.expire_penalties(time.now);

        if !self.state.is_started || self.state.is_finished {
            return;
        }

        self.state.player_progress += self.state.player_speed * time.dt;
        player.position.z = self.track.world_z(self.state.player_progress);

        self.state.ai_progress += self.state.ai_speed * time.dt;
        ai.position.z = self.track.world_z(self.state.ai_progress);

        // Player is checked first and wins a simultaneous finish
        if self.state.player_progress >= self.track.length {
            self.finish(Racer::Player);
        } else if self.state.ai_progress >= self.track.length {
            self.finish(Racer::Ai);
        }

        self.check_obstacles(player, time.now);
    }

    /// Slow the player for every obstacle it touches in its current segment
    pub fn check_obstacles(&mut self, player: &Horse, now: f64) {
        let Some(index) = self.track.segment_at(self.state.player_progress) else {
            return;
        };

        for obstacle in &self.track.segments[index].obstacles {
            let distance = obstacle.distance_to(player.position);
            if distance < self.config.collision_radius {
                self.state.player_speed *= obstacle.speed_penalty;
                self.state
                    .penalty_expiries
                    .push(now + f64::from(self.config.penalty_duration));
                log::debug!(
                    "Player hit {:?} in segment {} (distance {:.2}), speed now {:.2}",
                    obstacle.kind,
                    index,
                    distance,
                    self.state.player_speed
                );
            }
        }
    }

    /// Copy of the current race state
    pub fn race_state(&self) -> RaceState {
        self.state.clone()
    }

    /// Borrow the current race state
    pub fn state(&self) -> &RaceState {
        &self.state
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn config(&self) -> &RaceConfig {
        &self.config
    }

    /// Apply every penalty expiry that has come due
    fn expire_penalties(&mut self, now: f64) {
        let before = self.state.penalty_expiries.len();
        self.state.penalty_expiries.retain(|&at| now < at);

        if self.state.penalty_expiries.len() < before {
            self.state.player_speed = self.config.player_base_speed;
            log::debug!("Penalty expired, player speed reset");
        }
    }

    fn finish(&mut self, winner: Racer) {
        self.state.is_finished = true;
        self.state.winner = Some(winner);
        log::info!("Race finished, winner: {:?}", winner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_server::scene::NullScene;

    fn started_race() -> (Race, Horse, Horse) {
        let mut race = Race::new(RaceConfig::default());
        race.start_race();
        (race, Horse::player(), Horse::ai())
    }

    #[test]
    fn test_start_race_resets_state() {
        let (race, _, _) = started_race();
        let state = race.race_state();
        assert!(state.is_started);
        assert!(!state.is_finished);
        assert_eq!(state.winner, None);
        assert_eq!(state.player_speed, 5.0);
        assert_eq!(state.ai_speed, 4.5);
    }

    #[test]
    fn test_update_before_start_is_noop() {
        let mut race = Race::new(RaceConfig::default());
        let (mut player, mut ai) = (Horse::player(), Horse::ai());
        race.update(Time::new(1.0, 1.0), &mut player, &mut ai);
        assert_eq!(race.state().player_progress, 0.0);
        assert_eq!(player.position.z, 0.0);
    }

    #[test]
    fn test_progress_moves_horses() {
        let (mut race, mut player, mut ai) = started_race();
        race.update(Time::new(2.0, 2.0), &mut player, &mut ai);

        assert_eq!(race.state().player_progress, 10.0);
        assert_eq!(race.state().ai_progress, 9.0);
        assert_eq!(player.position.z, -40.0);
        assert_eq!(ai.position.z, -41.0);
    }

    #[test]
    fn test_player_wins_in_twenty_seconds() {
        let (mut race, mut player, mut ai) = started_race();
        race.update(Time::new(20.0, 20.0), &mut player, &mut ai);

        let state = race.race_state();
        assert_eq!(state.player_progress, 100.0);
        assert!(state.is_finished);
        assert_eq!(state.winner, Some(Racer::Player));
    }

    #[test]
    fn test_ai_wins_against_slow_player() {
        let config = RaceConfig {
            player_base_speed: 4.0,
            ..Default::default()
        };
        let mut race = Race::new(config);
        race.start_race();
        let (mut player, mut ai) = (Horse::player(), Horse::ai());

        race.update(Time::new(23.0, 23.0), &mut player, &mut ai);
        assert_eq!(race.state().winner, Some(Racer::Ai));
    }

    #[test]
    fn test_init_with_seed_places_obstacles_reproducibly() {
        let config = RaceConfig {
            seed: Some(99),
            ..Default::default()
        };
        let mut a = Race::new(config.clone());
        let mut b = Race::new(config.clone());
        a.init(&mut config.rng(), &mut NullScene);
        b.init(&mut config.rng(), &mut NullScene);

        for (sa, sb) in a.track().segments.iter().zip(&b.track().segments) {
            assert_eq!(sa.obstacles, sb.obstacles);
        }
    }

    #[test]
    fn test_config_from_partial_json() {
        let config = RaceConfig::from_json_str(r#"{ "ai_speed": 4.8, "seed": 3 }"#).unwrap();
        assert_eq!(config.ai_speed, 4.8);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.track_length, 100.0);
        assert_eq!(config.segment_count, 8);
    }

    #[test]
    fn test_config_rejects_bad_json() {
        assert!(RaceConfig::from_json_str("{ track_length: }").is_err());
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let path = std::env::temp_dir().join("horse-race-missing-config.json");
        let _ = std::fs::remove_file(&path);
        assert_eq!(RaceConfig::load_or_default(&path), RaceConfig::default());
    }

    #[test]
    fn test_invalid_config_file_uses_defaults() {
        let path = std::env::temp_dir().join("horse-race-invalid-config.json");
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(RaceConfig::load_or_default(&path), RaceConfig::default());
        let _ = std::fs::remove_file(&path);
    }
}
