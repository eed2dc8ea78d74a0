//! Horse Race - Tauri Backend
//!
//! Provides the race simulation and commands for frontend communication.

pub mod game_server;

#[cfg(feature = "desktop")]
pub use desktop::run;

#[cfg(feature = "desktop")]
mod desktop {
    use std::sync::Mutex;

    use tauri::{Manager, State};

    use crate::game_server::{
        FrameUpdate, GameServer, GameState, RaceConfig, RaceState, SceneRequest, ServerStats,
    };

    /// Config file looked up in the app config directory
    const CONFIG_FILE: &str = "race.json";

    /// Session defaults loaded at startup
    struct DefaultConfig(RaceConfig);

    /// Build the track and place obstacles
    #[tauri::command]
    fn init_race(
        server: State<'_, Mutex<GameServer>>,
        defaults: State<'_, DefaultConfig>,
        seed: Option<u64>,
    ) -> Result<Vec<SceneRequest>, String> {
        let mut server = server.lock().map_err(|e| e.to_string())?;

        let config = RaceConfig {
            seed: seed.or(defaults.0.seed),
            ..defaults.0.clone()
        };

        server.init_race(config);
        log::info!("Race initialized");
        Ok(server.get_scene().to_vec())
    }

    /// Start or restart the race
    #[tauri::command]
    fn start_race(server: State<'_, Mutex<GameServer>>) -> Result<(), String> {
        let mut server = server.lock().map_err(|e| e.to_string())?;
        server.start_race();
        Ok(())
    }

    /// Advance one frame and return what to draw
    #[tauri::command]
    fn tick(server: State<'_, Mutex<GameServer>>) -> Result<Option<FrameUpdate>, String> {
        let mut server = server.lock().map_err(|e| e.to_string())?;
        Ok(server.tick())
    }

    #[tauri::command]
    fn key_down(server: State<'_, Mutex<GameServer>>, key: String) -> Result<(), String> {
        let mut server = server.lock().map_err(|e| e.to_string())?;
        server.key_down(&key);
        Ok(())
    }

    #[tauri::command]
    fn key_up(server: State<'_, Mutex<GameServer>>, key: String) -> Result<(), String> {
        let mut server = server.lock().map_err(|e| e.to_string())?;
        server.key_up(&key);
        Ok(())
    }

    /// Get current race state without advancing simulation
    #[tauri::command]
    fn get_race_state(server: State<'_, Mutex<GameServer>>) -> Result<Option<RaceState>, String> {
        let server = server.lock().map_err(|e| e.to_string())?;
        Ok(server.get_race_state())
    }

    /// Scene requests of the current track
    #[tauri::command]
    fn get_scene(server: State<'_, Mutex<GameServer>>) -> Result<Vec<SceneRequest>, String> {
        let server = server.lock().map_err(|e| e.to_string())?;
        Ok(server.get_scene().to_vec())
    }

    /// Frame rate, update cost and obstacle count for the debug overlay
    #[tauri::command]
    fn get_stats(server: State<'_, Mutex<GameServer>>) -> Result<ServerStats, String> {
        let server = server.lock().map_err(|e| e.to_string())?;
        Ok(server.get_stats())
    }

    /// Lifecycle phase the frontend uses to pick its screen
    #[tauri::command]
    fn get_game_state(server: State<'_, Mutex<GameServer>>) -> Result<GameState, String> {
        let server = server.lock().map_err(|e| e.to_string())?;
        Ok(server.get_state())
    }

    /// Freeze the race; penalty expiries land on resume
    #[tauri::command]
    fn pause_race(server: State<'_, Mutex<GameServer>>) -> Result<(), String> {
        let mut server = server.lock().map_err(|e| e.to_string())?;
        server.pause();
        log::info!("Race clock paused");
        Ok(())
    }

    /// Continue a paused race
    #[tauri::command]
    fn resume_race(server: State<'_, Mutex<GameServer>>) -> Result<(), String> {
        let mut server = server.lock().map_err(|e| e.to_string())?;
        server.resume();
        log::info!("Race resumed");
        Ok(())
    }

    /// Throw away the track and go back to the title screen
    #[tauri::command]
    fn reset_race(server: State<'_, Mutex<GameServer>>) -> Result<(), String> {
        let mut server = server.lock().map_err(|e| e.to_string())?;
        server.reset();
        log::info!("Track discarded, server idle");
        Ok(())
    }

    #[cfg_attr(mobile, tauri::mobile_entry_point)]
    pub fn run() {
        tauri::Builder::default()
            .manage(Mutex::new(GameServer::new()))
            .setup(|app| {
                if cfg!(debug_assertions) {
                    app.handle().plugin(
                        tauri_plugin_log::Builder::default()
                            .level(log::LevelFilter::Info)
                            .build(),
                    )?;
                }

                let config = match app.path().app_config_dir() {
                    Ok(dir) => RaceConfig::load_or_default(&dir.join(CONFIG_FILE)),
                    Err(e) => {
                        log::warn!("No app config dir ({}), using default race config", e);
                        RaceConfig::default()
                    }
                };
                app.manage(DefaultConfig(config));

                log::info!("Horse race game server initialized");
                Ok(())
            })
            .invoke_handler(tauri::generate_handler![
                init_race,
                start_race,
                tick,
                key_down,
                key_up,
                get_race_state,
                get_scene,
                get_stats,
                get_game_state,
                pause_race,
                resume_race,
                reset_race,
            ])
            .run(tauri::generate_context!())
            .expect("error while running tauri application");
    }
}
