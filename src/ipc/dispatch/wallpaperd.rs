use std::fs::File;
use std::path::Path;

use serde_json::Value;

use crate::error::BridgeError;
use crate::info;
use crate::ipc::request::MethodCall;
use crate::wallpaper::{uri, Surface, WallpaperBackend};

/// Set the wallpaper from a local file path. The optional `location`
/// argument picks the surface; the file must already exist.
pub fn set_wallpaper(
    backend: &dyn WallpaperBackend,
    call: &MethodCall,
) -> Result<Value, BridgeError> {
    let path = call
        .str_arg("path")
        .ok_or_else(|| BridgeError::invalid_args("Path argument is required"))?;
    let surface = Surface::from_location(call.str_arg("location"));

    if !Path::new(path).exists() {
        return Err(BridgeError::FileNotFound(path.to_string()));
    }

    let mut stream = File::open(path).map_err(|e| BridgeError::Other {
        message: format!("Error setting wallpaper: {e}"),
        detail: Some(format!("{e:?}")),
    })?;

    backend.set_stream(&mut stream, surface)?;

    info!("[Wallpaper] Set from {path} targeting {surface:?}");
    Ok(Value::Bool(true))
}

/// Set the wallpaper from a URI. Only locators a stream provider exists
/// for can succeed; the image always targets the lock surface.
pub fn set_wallpaper_uri(
    backend: &dyn WallpaperBackend,
    call: &MethodCall,
) -> Result<Value, BridgeError> {
    let locator = call
        .str_arg("uri")
        .ok_or_else(|| BridgeError::invalid_args("URI argument is required"))?;

    let mut stream = match uri::open_stream(locator) {
        Ok(Some(stream)) => stream,
        Ok(None) => return Err(BridgeError::Stream),
        Err(e) => {
            return Err(BridgeError::Other {
                message: format!("Error setting wallpaper from URI: {e}"),
                detail: Some(format!("{e:?}")),
            })
        }
    };

    backend.set_stream(stream.as_mut(), Surface::LockScreen)?;

    info!("[Wallpaper] Set from URI targeting the lock screen");
    Ok(Value::Bool(true))
}

/// Report whether the wallpaper-set permission is granted. Never fails;
/// tiers that cannot tell report false.
pub fn has_wallpaper_permission(backend: &dyn WallpaperBackend) -> Result<Value, BridgeError> {
    let granted = backend.has_permission();
    info!(
        "[Wallpaper] Permission check on '{}' backend -> {granted}",
        backend.name()
    );
    Ok(Value::Bool(granted))
}
