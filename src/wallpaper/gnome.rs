use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::{store, Surface, WallpaperBackend};
use crate::error::BridgeError;
use crate::{info, warn};

const BACKGROUND_SCHEMA: &str = "org.gnome.desktop.background";
const SCREENSAVER_SCHEMA: &str = "org.gnome.desktop.screensaver";
const PICTURE_KEY: &str = "picture-uri";
const PICTURE_DARK_KEY: &str = "picture-uri-dark";

/// Surface-targeting tier backed by gsettings. The lock surface maps to
/// the screensaver schema, the home surface to the desktop background.
pub struct GnomeBackend {
    staging_dir: PathBuf,
}

impl GnomeBackend {
    pub fn new(staging_dir: PathBuf) -> Self {
        info!(
            "[Wallpaper] GNOME backend initialized (staging dir: {})",
            staging_dir.display()
        );
        Self { staging_dir }
    }

    fn gsettings_set(&self, schema: &str, key: &str, value: &str) -> Result<(), BridgeError> {
        let output = Command::new("gsettings")
            .args(["set", schema, key, value])
            .output()
            .map_err(BridgeError::wallpaper)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!("[Wallpaper] gsettings set {schema} {key} failed: {stderr}");
            return Err(BridgeError::Wallpaper {
                message: format!("gsettings set {schema} {key} exited with {}", output.status),
                detail: Some(stderr),
            });
        }
        Ok(())
    }

    fn apply_home(&self, uri: &str) -> Result<(), BridgeError> {
        self.gsettings_set(BACKGROUND_SCHEMA, PICTURE_KEY, uri)?;
        // Dark variant exists on GNOME 42+ only; missing key is not fatal.
        if let Err(e) = self.gsettings_set(BACKGROUND_SCHEMA, PICTURE_DARK_KEY, uri) {
            warn!("[Wallpaper] Could not set dark-mode wallpaper: {e}");
        }
        Ok(())
    }

    fn apply_lock(&self, uri: &str) -> Result<(), BridgeError> {
        self.gsettings_set(SCREENSAVER_SCHEMA, PICTURE_KEY, uri)
    }
}

impl WallpaperBackend for GnomeBackend {
    fn name(&self) -> &'static str {
        "gnome"
    }

    fn supports_surface_targeting(&self) -> bool {
        true
    }

    fn set_stream(&self, stream: &mut dyn Read, surface: Surface) -> Result<(), BridgeError> {
        info!("[Wallpaper] Applying stream to {surface:?} via gsettings");

        let staged = store::stage_stream(&self.staging_dir, stream, surface.staging_name())
            .map_err(BridgeError::wallpaper)?;
        let uri = file_uri(&staged);

        match surface {
            Surface::HomeScreen => self.apply_home(&uri)?,
            Surface::LockScreen => self.apply_lock(&uri)?,
            Surface::Both => {
                self.apply_home(&uri)?;
                self.apply_lock(&uri)?;
            }
        }

        info!("[Wallpaper] Wallpaper set successfully ({})", staged.display());
        Ok(())
    }

    fn has_permission(&self) -> bool {
        let output = match Command::new("gsettings")
            .args(["writable", BACKGROUND_SCHEMA, PICTURE_KEY])
            .output()
        {
            Ok(o) => o,
            Err(e) => {
                warn!("[Wallpaper] Permission probe could not run gsettings: {e}");
                return false;
            }
        };

        if !output.status.success() {
            warn!(
                "[Wallpaper] Permission probe exited with {}",
                output.status
            );
            return false;
        }

        parse_writable(&String::from_utf8_lossy(&output.stdout))
    }
}

/// gsettings takes the raw URI as a single argument; reserved characters
/// in the path must be percent-encoded for GNOME to parse it back.
fn file_uri(path: &Path) -> String {
    let encoded = urlencoding::encode(&path.to_string_lossy()).replace("%2F", "/");
    format!("file://{encoded}")
}

fn parse_writable(probe_output: &str) -> bool {
    probe_output.trim() == "true"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writable_probe_output_parses_strictly() {
        assert!(parse_writable("true\n"));
        assert!(!parse_writable("false\n"));
        assert!(!parse_writable(""));
        assert!(!parse_writable("gibberish"));
    }

    #[test]
    fn file_uris_carry_the_scheme_prefix() {
        let uri = file_uri(Path::new("/home/user/wall.img"));
        assert_eq!(uri, "file:///home/user/wall.img");
    }

    #[test]
    fn file_uris_encode_reserved_characters() {
        let uri = file_uri(Path::new("/home/user/my wall#1.img"));
        assert_eq!(uri, "file:///home/user/my%20wall%231.img");
    }

    #[test]
    fn gnome_tier_targets_surfaces() {
        let backend = GnomeBackend::new(std::env::temp_dir());
        assert_eq!(backend.name(), "gnome");
        assert!(backend.supports_surface_targeting());
    }
}
