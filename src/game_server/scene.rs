//! Scene - Visual requests handed to the renderer
//!
//! The simulation never reads anything back from the renderer. It only
//! describes what should be added to the scene when the track is built.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Which flat surface a plane request draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaneKind {
    Track,
    Segment(usize),
}

/// A single "add to scene" request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneRequest {
    /// Horizontal plane lying on the ground
    Plane {
        kind: PlaneKind,
        width: f32,
        depth: f32,
        position: Vec3,
        color: u32,
    },
    /// Square-footprint box resting on the ground
    Box {
        size: f32,
        height: f32,
        position: Vec3,
        color: u32,
    },
}

/// Receiver of scene requests
pub trait SceneSink {
    fn add(&mut self, request: SceneRequest);
}

impl SceneSink for Vec<SceneRequest> {
    fn add(&mut self, request: SceneRequest) {
        self.push(request);
    }
}

/// Sink that drops every request, for headless races
#[derive(Debug, Clone, Copy, Default)]
pub struct NullScene;

impl SceneSink for NullScene {
    fn add(&mut self, _request: SceneRequest) {}
}
