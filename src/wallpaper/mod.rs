use std::io::Read;

use crate::config::{BackendChoice, BridgeConfig};
use crate::error::BridgeError;
use crate::{info, warn};

pub mod gnome;
pub mod plain;
pub mod store;
pub mod uri;

#[cfg(test)]
pub mod testing;

/// Destination surface for a wallpaper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    LockScreen,
    HomeScreen,
    Both,
}

impl Surface {
    /// Map the `location` call argument. Absent and unrecognized values
    /// target the lock screen; only the exact strings below do otherwise.
    pub fn from_location(location: Option<&str>) -> Self {
        match location {
            None | Some("lockScreen") => Surface::LockScreen,
            Some("homeScreen") => Surface::HomeScreen,
            Some("both") => Surface::Both,
            Some(other) => {
                warn!("[Wallpaper] Unrecognized location '{}', targeting the lock screen", other);
                Surface::LockScreen
            }
        }
    }

    /// File name a staged image for this surface is kept under.
    pub fn staging_name(&self) -> &'static str {
        match self {
            Surface::LockScreen => "current-lock.img",
            Surface::HomeScreen => "current-home.img",
            Surface::Both => "current-both.img",
        }
    }
}

/// A capability tier for applying wallpapers.
///
/// Tiers that support surface targeting honor the requested [`Surface`];
/// tiers that don't set the single shared wallpaper no matter what was
/// asked for. Callers hand over an open byte stream and the backend is
/// responsible for consuming it.
pub trait WallpaperBackend: Send + Sync {
    /// Short tier name for logs.
    fn name(&self) -> &'static str;

    /// Whether lock and home surfaces can be targeted independently.
    fn supports_surface_targeting(&self) -> bool;

    /// Read the image from `stream` and apply it to `surface`.
    fn set_stream(&self, stream: &mut dyn Read, surface: Surface) -> Result<(), BridgeError>;

    /// Whether the wallpaper-set permission is currently granted. Probing
    /// must not fail; tiers report `false` when they cannot tell.
    fn has_permission(&self) -> bool;
}

/// Pick the capability tier. Runs once at startup; every call on the
/// channel is served by the tier chosen here.
pub fn select_backend(cfg: &BridgeConfig) -> Box<dyn WallpaperBackend> {
    let staging_dir = cfg.staging_dir();
    let backend: Box<dyn WallpaperBackend> = match cfg.backend {
        BackendChoice::Gnome => Box::new(gnome::GnomeBackend::new(staging_dir)),
        BackendChoice::Plain => Box::new(plain::PlainBackend::new(staging_dir)),
        BackendChoice::Auto => {
            if gnome_session_detected() {
                Box::new(gnome::GnomeBackend::new(staging_dir))
            } else {
                Box::new(plain::PlainBackend::new(staging_dir))
            }
        }
    };

    info!(
        "[Wallpaper] Selected '{}' backend (surface targeting: {})",
        backend.name(),
        backend.supports_surface_targeting()
    );
    backend
}

/// Session sniffing for backend auto-selection. gsettings only works where
/// a dconf-backed desktop is running.
fn gnome_session_detected() -> bool {
    for var in ["XDG_CURRENT_DESKTOP", "DESKTOP_SESSION"] {
        if let Ok(value) = std::env::var(var) {
            let session = value.to_lowercase();
            if ["gnome", "ubuntu", "unity", "cinnamon"]
                .iter()
                .any(|name| session.contains(name))
            {
                info!("[Wallpaper] Detected GNOME-family session via {}={}", var, value);
                return true;
            }
        }
    }
    false
}
