use std::path::PathBuf;

use crate::{info, warn};

/// Directory for the channel socket. Prefers the per-user runtime dir.
pub fn runtime_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("XDG_RUNTIME_DIR") {
        if !dir.is_empty() {
            info!("XDG_RUNTIME_DIR environment variable found: {}", dir);
            return PathBuf::from(dir);
        }
    }

    warn!("XDG_RUNTIME_DIR not set, falling back to /tmp for the channel socket");
    PathBuf::from("/tmp")
}

/// Default socket path, derived from the channel name so the file is
/// recognizable in the runtime dir.
pub fn default_socket_path() -> PathBuf {
    let file = format!("{}.sock", crate::ipc::CHANNEL_NAME.replace('/', "-"));
    runtime_dir().join(file)
}

/// Directory for files the bridge writes on its own behalf: the log and
/// staged wallpaper images.
pub fn state_dir() -> PathBuf {
    match dirs_next::data_local_dir() {
        Some(dir) => dir.join("wallbridge"),
        None => {
            warn!("Could not resolve the local data directory, using the current directory");
            PathBuf::from(".").join("wallbridge")
        }
    }
}

pub fn config_path() -> PathBuf {
    match dirs_next::config_dir() {
        Some(dir) => dir.join("wallbridge").join("config.yaml"),
        None => {
            warn!("Could not resolve the config directory, keeping config next to state");
            state_dir().join("config.yaml")
        }
    }
}
