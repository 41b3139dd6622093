use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::{store, Surface, WallpaperBackend};
use crate::error::BridgeError;
use crate::{info, warn};

/// Staged file name for the single shared wallpaper this tier maintains.
const SHARED_NAME: &str = "current.img";

/// Setters tried in order until one succeeds.
const SETTERS: [(&str, &[&str]); 2] = [("feh", &["--bg-fill"]), ("xwallpaper", &["--zoom"])];

/// Legacy tier without surface targeting: one shared wallpaper, applied
/// with whichever plain X11 setter is installed.
pub struct PlainBackend {
    staging_dir: PathBuf,
}

impl PlainBackend {
    pub fn new(staging_dir: PathBuf) -> Self {
        info!(
            "[Wallpaper] Plain backend initialized (staging dir: {})",
            staging_dir.display()
        );
        Self { staging_dir }
    }

    fn apply(&self, image: &Path) -> Result<(), BridgeError> {
        let mut last_failure = String::from("no setter attempted");

        for (setter, flags) in SETTERS {
            let output = match Command::new(setter).args(flags).arg(image).output() {
                Ok(o) => o,
                Err(e) => {
                    last_failure = format!("{setter}: {e}");
                    continue;
                }
            };

            if output.status.success() {
                info!("[Wallpaper] Shared wallpaper applied with {setter}");
                return Ok(());
            }

            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!("[Wallpaper] {setter} exited with {}: {stderr}", output.status);
            last_failure = format!("{setter} exited with {}", output.status);
        }

        Err(BridgeError::Wallpaper {
            message: format!("no wallpaper setter succeeded (last: {last_failure})"),
            detail: None,
        })
    }
}

impl WallpaperBackend for PlainBackend {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn supports_surface_targeting(&self) -> bool {
        false
    }

    fn set_stream(&self, stream: &mut dyn Read, surface: Surface) -> Result<(), BridgeError> {
        if surface != Surface::Both {
            info!("[Wallpaper] No surface targeting on this tier, setting the shared wallpaper");
        }

        let staged = store::stage_stream(&self.staging_dir, stream, SHARED_NAME)
            .map_err(BridgeError::wallpaper)?;
        self.apply(&staged)
    }

    /// No runtime permission model on this tier.
    fn has_permission(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_tier_reports_no_targeting_and_open_permission() {
        let backend = PlainBackend::new(std::env::temp_dir());
        assert_eq!(backend.name(), "plain");
        assert!(!backend.supports_surface_targeting());
        assert!(backend.has_permission());
    }
}
