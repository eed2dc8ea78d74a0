//! Game Server Module
//!
//! Runs the horse race simulation in Rust.
//! Communicates with the JS frontend via Tauri commands.

pub mod controls;
pub mod horse;
pub mod hud;
pub mod race;
pub mod scene;
pub mod simulation;
pub mod track;

pub use controls::{Controls, InputState, Intent};
pub use horse::{Horse, HorseSnapshot, Racer};
pub use hud::{Banner, Hud, HudView};
pub use race::{Race, RaceConfig, RaceState, Time};
pub use scene::{NullScene, PlaneKind, SceneRequest, SceneSink};
pub use simulation::{FrameUpdate, GameServer, GameState, ServerStats};
pub use track::{Obstacle, ObstacleKind, Segment, SegmentTheme, Track};
