//! Track - Segment layout, themes and obstacle placement
//!
//! The track is split into equal segments, each with a decorative theme.
//! Interior segments may hold one obstacle that slows the player down.

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game_server::race::RaceConfig;
use crate::game_server::scene::{PlaneKind, SceneRequest, SceneSink};

/// Decorative theme of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SegmentTheme {
    pub name: &'static str,
    pub color: u32,
}

impl SegmentTheme {
    pub const GRASSLAND: Self = Self { name: "Grassland", color: 0x3a7d44 };
    pub const MUD_PATH: Self = Self { name: "Mud Path", color: 0x8b4513 };
    pub const ROCKY_TERRAIN: Self = Self { name: "Rocky Terrain", color: 0x808080 };
    pub const FOREST_TRAIL: Self = Self { name: "Forest Trail", color: 0x556b2f };

    /// Theme layout along the track, each theme used twice
    pub const PALETTE: [Self; 8] = [
        Self::GRASSLAND,
        Self::MUD_PATH,
        Self::ROCKY_TERRAIN,
        Self::FOREST_TRAIL,
        Self::MUD_PATH,
        Self::ROCKY_TERRAIN,
        Self::GRASSLAND,
        Self::FOREST_TRAIL,
    ];

    /// Theme for a segment index, wrapping for tracks longer than the palette
    pub fn for_segment(index: usize) -> Self {
        Self::PALETTE[index % Self::PALETTE.len()]
    }
}

/// Obstacle type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Rock,
    Pit,
    Mud,
}

impl ObstacleKind {
    pub const ALL: [Self; 3] = [Self::Rock, Self::Pit, Self::Mud];

    /// Footprint edge length
    pub fn size(self) -> f32 {
        match self {
            Self::Rock => 1.0,
            Self::Pit => 2.0,
            Self::Mud => 3.0,
        }
    }

    /// Speed multiplier applied on contact
    pub fn speed_penalty(self) -> f32 {
        match self {
            Self::Rock => 0.5,
            Self::Pit => 0.7,
            Self::Mud => 0.3,
        }
    }
}

/// A hazard placed on the track
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub size: f32,
    pub speed_penalty: f32,
    /// Position on the ground plane (x = lateral, y = world z)
    pub position: Vec2,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, position: Vec2) -> Self {
        Self {
            kind,
            size: kind.size(),
            speed_penalty: kind.speed_penalty(),
            position,
        }
    }

    /// Planar distance to a world position, ignoring height
    pub fn distance_to(&self, world: Vec3) -> f32 {
        self.position.distance(Vec2::new(world.x, world.z))
    }
}

/// One equal-length slice of the track
#[derive(Debug, Clone, Serialize)]
pub struct Segment {
    pub index: usize,
    pub theme: SegmentTheme,
    /// Longitudinal (world z) position of the segment
    pub z: f32,
    pub obstacles: Vec<Obstacle>,
}

/// Race track geometry
#[derive(Debug, Clone, Serialize)]
pub struct Track {
    pub length: f32,
    pub width: f32,
    pub segment_length: f32,
    pub segments: Vec<Segment>,
}

impl Track {
    /// Lateral spread obstacles are scattered across
    pub const OBSTACLE_SPREAD: f32 = 8.0;

    const SURFACE_COLOR: u32 = 0x3a7d44;
    const OBSTACLE_COLOR: u32 = 0x808080;
    const OBSTACLE_HEIGHT: f32 = 0.5;

    /// Build an empty track split into themed segments
    pub fn new(config: &RaceConfig) -> Self {
        let count = config.segment_count;
        let segment_length = config.track_length / count as f32;

        let segments = (0..count)
            .map(|index| Segment {
                index,
                theme: SegmentTheme::for_segment(index),
                z: index as f32 * segment_length - config.track_length / 2.0,
                obstacles: Vec::new(),
            })
            .collect();

        Self {
            length: config.track_length,
            width: config.track_width,
            segment_length,
            segments,
        }
    }

    /// Randomly place at most one obstacle in every interior segment
    pub fn place_obstacles<R: Rng + ?Sized>(&mut self, rng: &mut R, chance: f32) {
        let last = self.segments.len().saturating_sub(1);

        for segment in &mut self.segments {
            // First and last segments stay clear
            if segment.index == 0 || segment.index == last {
                continue;
            }

            if rng.gen::<f32>() > chance {
                let kind = ObstacleKind::ALL[rng.gen_range(0..ObstacleKind::ALL.len())];
                let x = (rng.gen::<f32>() - 0.5) * Self::OBSTACLE_SPREAD;
                let obstacle = Obstacle::new(kind, Vec2::new(x, segment.z));

                log::debug!(
                    "Placed {:?} in segment {} ({}) at x={:.2}",
                    kind,
                    segment.index,
                    segment.theme.name,
                    x
                );
                segment.obstacles.push(obstacle);
            }
        }
    }

    /// Segment index for a distance travelled, if it lies on the track
    pub fn segment_at(&self, progress: f32) -> Option<usize> {
        let index = (progress / self.segment_length).floor();
        if index >= 0.0 && (index as usize) < self.segments.len() {
            Some(index as usize)
        } else {
            None
        }
    }

    /// World z for a distance travelled from the start line
    pub fn world_z(&self, progress: f32) -> f32 {
        -self.length / 2.0 + progress
    }

    /// Total number of placed obstacles
    pub fn obstacle_count(&self) -> usize {
        self.segments.iter().map(|s| s.obstacles.len()).sum()
    }

    /// Emit visuals for the surface, segments and obstacles
    pub fn emit_scene<S: SceneSink + ?Sized>(&self, scene: &mut S) {
        scene.add(SceneRequest::Plane {
            kind: PlaneKind::Track,
            width: self.length,
            depth: self.width,
            position: Vec3::new(0.0, -0.1, 0.0),
            color: Self::SURFACE_COLOR,
        });

        for segment in &self.segments {
            scene.add(SceneRequest::Plane {
                kind: PlaneKind::Segment(segment.index),
                width: self.segment_length,
                depth: self.width,
                position: Vec3::new(0.0, -0.05, segment.z),
                color: segment.theme.color,
            });

            for obstacle in &segment.obstacles {
                scene.add(SceneRequest::Box {
                    size: obstacle.size,
                    height: Self::OBSTACLE_HEIGHT,
                    position: Vec3::new(
                        obstacle.position.x,
                        Self::OBSTACLE_HEIGHT / 2.0,
                        obstacle.position.y,
                    ),
                    color: Self::OBSTACLE_COLOR,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_segments_are_equal_and_themed() {
        let track = Track::new(&RaceConfig::default());
        assert_eq!(track.segments.len(), 8);
        assert_eq!(track.segment_length, 12.5);
        assert_eq!(track.segments[0].z, -50.0);
        assert_eq!(track.segments[7].z, 37.5);

        for theme in [
            SegmentTheme::GRASSLAND,
            SegmentTheme::MUD_PATH,
            SegmentTheme::ROCKY_TERRAIN,
            SegmentTheme::FOREST_TRAIL,
        ] {
            let uses = track.segments.iter().filter(|s| s.theme == theme).count();
            assert_eq!(uses, 2, "{} should appear twice", theme.name);
        }
    }

    #[test]
    fn test_end_segments_never_get_obstacles() {
        for seed in 0..200 {
            let mut track = Track::new(&RaceConfig::default());
            let mut rng = StdRng::seed_from_u64(seed);
            track.place_obstacles(&mut rng, 0.5);

            assert!(track.segments[0].obstacles.is_empty());
            assert!(track.segments[7].obstacles.is_empty());
            for segment in &track.segments[1..7] {
                assert!(segment.obstacles.len() <= 1);
                for obstacle in &segment.obstacles {
                    assert!(obstacle.position.x >= -4.0 && obstacle.position.x <= 4.0);
                    assert_eq!(obstacle.position.y, segment.z);
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let mut a = Track::new(&RaceConfig::default());
        let mut b = Track::new(&RaceConfig::default());
        a.place_obstacles(&mut StdRng::seed_from_u64(7), 0.5);
        b.place_obstacles(&mut StdRng::seed_from_u64(7), 0.5);

        for (sa, sb) in a.segments.iter().zip(&b.segments) {
            assert_eq!(sa.obstacles, sb.obstacles);
        }
    }

    #[test]
    fn test_obstacle_kinds() {
        let rock = Obstacle::new(ObstacleKind::Rock, Vec2::ZERO);
        assert_eq!((rock.size, rock.speed_penalty), (1.0, 0.5));
        let pit = Obstacle::new(ObstacleKind::Pit, Vec2::ZERO);
        assert_eq!((pit.size, pit.speed_penalty), (2.0, 0.7));
        let mud = Obstacle::new(ObstacleKind::Mud, Vec2::ZERO);
        assert_eq!((mud.size, mud.speed_penalty), (3.0, 0.3));
    }

    #[test]
    fn test_segment_at_bounds() {
        let track = Track::new(&RaceConfig::default());
        assert_eq!(track.segment_at(0.0), Some(0));
        assert_eq!(track.segment_at(12.49), Some(0));
        assert_eq!(track.segment_at(12.5), Some(1));
        assert_eq!(track.segment_at(99.9), Some(7));
        assert_eq!(track.segment_at(100.0), None);
        assert_eq!(track.segment_at(-0.1), None);
    }

    #[test]
    fn test_emit_scene_counts() {
        let mut track = Track::new(&RaceConfig::default());
        let z = track.segments[3].z;
        track.segments[3]
            .obstacles
            .push(Obstacle::new(ObstacleKind::Mud, Vec2::new(1.0, z)));

        let mut scene: Vec<SceneRequest> = Vec::new();
        track.emit_scene(&mut scene);

        // surface + 8 segments + 1 obstacle
        assert_eq!(scene.len(), 10);
        assert!(matches!(
            scene[0],
            SceneRequest::Plane { kind: PlaneKind::Track, .. }
        ));
        assert_eq!(
            scene.iter().filter(|r| matches!(r, SceneRequest::Box { .. })).count(),
            1
        );
    }
}
