use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    sync::{OnceLock, RwLock},
};

use crate::paths;
use crate::{error, info, warn};

/// Bridge configuration persisted in config.yaml under the user config dir.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Override for the channel socket path.
    #[serde(default)]
    pub socket_path: Option<PathBuf>,

    /// Wallpaper backend to use. `auto` detects the session at startup.
    #[serde(default)]
    pub backend: BackendChoice,

    /// Override for the directory staged wallpaper images land in.
    #[serde(default)]
    pub wallpaper_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendChoice {
    #[default]
    Auto,
    Gnome,
    Plain,
}

impl BridgeConfig {
    /// Socket the channel is served on (and dialed by the client).
    pub fn channel_socket(&self) -> PathBuf {
        self.socket_path
            .clone()
            .unwrap_or_else(paths::default_socket_path)
    }

    /// Directory staged wallpaper images are written to.
    pub fn staging_dir(&self) -> PathBuf {
        self.wallpaper_dir.clone().unwrap_or_else(paths::state_dir)
    }
}

/* =========================
   PERSISTENT ON-DISK CONFIG
   ========================= */

static CONFIG: OnceLock<RwLock<BridgeConfig>> = OnceLock::new();

fn global_config() -> &'static RwLock<BridgeConfig> {
    CONFIG.get_or_init(|| RwLock::new(BridgeConfig::default()))
}

/// Parse config text, falling back to defaults on malformed input.
fn parse_config(text: &str) -> BridgeConfig {
    match serde_yaml::from_str::<BridgeConfig>(text) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config.yaml, using defaults: {e}");
            BridgeConfig::default()
        }
    }
}

/// Load config.yaml from disk (or create defaults). Call once at startup.
pub fn load_config() -> BridgeConfig {
    let cfg = load_config_from(&paths::config_path());

    *global_config().write().unwrap() = cfg.clone();

    cfg
}

/// Read one config file, writing defaults in its place when absent.
fn load_config_from(path: &Path) -> BridgeConfig {
    if path.exists() {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                info!("Loaded bridge config from {}", path.display());
                parse_config(&text)
            }
            Err(e) => {
                warn!("Failed to read config.yaml, using defaults: {e}");
                BridgeConfig::default()
            }
        }
    } else {
        info!("No config.yaml found, creating defaults at {}", path.display());
        let defaults = BridgeConfig::default();
        save_config_to_disk(&defaults, path);
        defaults
    }
}

/// Return a snapshot of the current in-memory config.
pub fn current_config() -> BridgeConfig {
    global_config().read().unwrap().clone()
}

fn save_config_to_disk(cfg: &BridgeConfig, path: &Path) {
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            error!("Failed to create config directory: {e}");
            return;
        }
    }
    match serde_yaml::to_string(cfg) {
        Ok(text) => {
            if let Err(e) = std::fs::write(path, text) {
                error!("Failed to write config.yaml: {e}");
            }
        }
        Err(e) => error!("Failed to serialize config: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_parses_to_defaults() {
        let cfg = parse_config("");
        assert!(cfg.socket_path.is_none());
        assert_eq!(cfg.backend, BackendChoice::Auto);
        assert!(cfg.wallpaper_dir.is_none());
    }

    #[test]
    fn partial_config_keeps_defaults_for_the_rest() {
        let cfg = parse_config("backend: gnome\n");
        assert_eq!(cfg.backend, BackendChoice::Gnome);
        assert!(cfg.socket_path.is_none());
    }

    #[test]
    fn malformed_config_falls_back_to_defaults() {
        let cfg = parse_config("backend: [not, a, choice]\n");
        assert_eq!(cfg.backend, BackendChoice::Auto);
    }

    #[test]
    fn overrides_win_over_derived_paths() {
        let cfg = parse_config("socket_path: /run/test.sock\nwallpaper_dir: /var/papers\n");
        assert_eq!(cfg.channel_socket(), PathBuf::from("/run/test.sock"));
        assert_eq!(cfg.staging_dir(), PathBuf::from("/var/papers"));
    }

    #[test]
    fn config_round_trips_through_yaml() {
        let cfg = BridgeConfig {
            socket_path: Some(PathBuf::from("/tmp/b.sock")),
            backend: BackendChoice::Plain,
            wallpaper_dir: None,
        };
        let text = serde_yaml::to_string(&cfg).unwrap();
        let back = parse_config(&text);
        assert_eq!(back.backend, BackendChoice::Plain);
        assert_eq!(back.socket_path, Some(PathBuf::from("/tmp/b.sock")));
    }

    #[test]
    fn missing_config_file_creates_defaults_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let cfg = load_config_from(&path);

        assert_eq!(cfg.backend, BackendChoice::Auto);
        assert!(cfg.socket_path.is_none());
        let written = parse_config(&std::fs::read_to_string(&path).unwrap());
        assert_eq!(written.backend, BackendChoice::Auto);
    }

    #[test]
    fn existing_config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "backend: plain\n").unwrap();

        let cfg = load_config_from(&path);
        assert_eq!(cfg.backend, BackendChoice::Plain);
    }
}
