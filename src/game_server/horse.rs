//! Horse - World transform of each racer
//!
//! The race writes a horse's longitudinal position from its progress,
//! while keyboard controls steer the player horse laterally.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Who is riding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Racer {
    Player,
    Ai,
}

/// World transform of a horse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Horse {
    pub racer: Racer,
    /// World position (z runs along the track)
    pub position: Vec3,
    /// Yaw in radians
    pub heading: f32,
}

impl Horse {
    /// Lateral offset of the AI horse from the player's lane
    pub const AI_LANE: f32 = 3.0;

    /// Player horse at the origin facing down the track
    pub fn player() -> Self {
        Self {
            racer: Racer::Player,
            position: Vec3::ZERO,
            heading: 0.0,
        }
    }

    /// AI horse in the neighbouring lane
    pub fn ai() -> Self {
        Self {
            racer: Racer::Ai,
            position: Vec3::new(Self::AI_LANE, 0.0, 0.0),
            heading: std::f32::consts::PI,
        }
    }

    /// Unit direction the horse faces on the ground plane
    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.heading.sin(), 0.0, self.heading.cos())
    }
}

/// Compact horse state for IPC transfer
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HorseSnapshot {
    pub racer: Racer,
    pub x: f32,
    pub z: f32,
    pub heading: f32,
}

impl From<&Horse> for HorseSnapshot {
    fn from(horse: &Horse) -> Self {
        Self {
            racer: horse.racer,
            x: horse.position.x,
            z: horse.position.z,
            heading: horse.heading,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_transforms() {
        let player = Horse::player();
        assert_eq!(player.position, Vec3::ZERO);
        assert!((player.forward() - Vec3::Z).length() < 1e-6);

        let ai = Horse::ai();
        assert_eq!(ai.position.x, 3.0);
        assert!((ai.forward() + Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_racer_serializes_lowercase() {
        let json = serde_json::to_string(&Racer::Ai).unwrap();
        assert_eq!(json, "\"ai\"");
    }
}
