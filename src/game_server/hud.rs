//! HUD - What the overlay shows each frame
//!
//! Turns a race state into display strings and raises the win/lose
//! banner once per finished race.

use serde::{Deserialize, Serialize};

use crate::game_server::horse::Racer;
use crate::game_server::race::RaceState;

/// End-of-race banner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Banner {
    Win,
    Lose,
}

impl Banner {
    pub fn text(self) -> &'static str {
        match self {
            Self::Win => "You Win!",
            Self::Lose => "You Lose!",
        }
    }
}

/// Overlay contents for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudView {
    pub speed_text: String,
    pub progress_percent: f32,
    pub status_text: String,
    /// Set only on the frame the race finishes
    pub banner: Option<Banner>,
}

/// Tracks finish transitions between frames
#[derive(Debug, Clone, Default)]
pub struct Hud {
    was_finished: bool,
}

impl Hud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&mut self, state: &RaceState, track_length: f32) -> HudView {
        let progress_percent = state.player_progress / track_length * 100.0;

        let banner = if state.is_finished && !self.was_finished {
            Some(match state.winner {
                Some(Racer::Player) => Banner::Win,
                _ => Banner::Lose,
            })
        } else {
            None
        };
        self.was_finished = state.is_finished;

        HudView {
            speed_text: format!("Speed: {:.1} m/s", state.player_speed),
            progress_percent,
            status_text: format!("Race Progress: {}%", progress_percent.floor() as i64),
            banner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(progress: f32, finished: bool, winner: Option<Racer>) -> RaceState {
        RaceState {
            is_started: true,
            is_finished: finished,
            winner,
            player_progress: progress,
            player_speed: 2.5,
            ..Default::default()
        }
    }

    #[test]
    fn test_text_fields() {
        let mut hud = Hud::new();
        let view = hud.view(&state(37.5, false, None), 100.0);
        assert_eq!(view.speed_text, "Speed: 2.5 m/s");
        assert_eq!(view.progress_percent, 37.5);
        assert_eq!(view.status_text, "Race Progress: 37%");
        assert_eq!(view.banner, None);
    }

    #[test]
    fn test_banner_only_on_transition() {
        let mut hud = Hud::new();
        hud.view(&state(90.0, false, None), 100.0);

        let view = hud.view(&state(100.0, true, Some(Racer::Player)), 100.0);
        assert_eq!(view.banner, Some(Banner::Win));
        assert_eq!(Banner::Win.text(), "You Win!");

        let view = hud.view(&state(100.0, true, Some(Racer::Player)), 100.0);
        assert_eq!(view.banner, None);
    }

    #[test]
    fn test_restart_rearms_banner() {
        let mut hud = Hud::new();
        let lost = state(95.0, true, Some(Racer::Ai));
        assert_eq!(hud.view(&lost, 100.0).banner, Some(Banner::Lose));

        hud.view(&state(0.0, false, None), 100.0);
        assert_eq!(hud.view(&lost, 100.0).banner, Some(Banner::Lose));
    }
}
