use crate::ipc::request::MethodCall;
use crate::ipc::response::MethodReply;
use crate::wallpaper::WallpaperBackend;
use crate::{info, warn};

mod wallpaperd;

/// Route one call to its operation. Unknown method names report the
/// distinct not-implemented outcome instead of an error code, so callers
/// can tell "bridge too old" apart from "call failed".
pub fn dispatch(backend: &dyn WallpaperBackend, call: &MethodCall) -> MethodReply {
    info!("[IPC] Dispatch call -> method: '{}'", call.method);

    match call.method.as_str() {
        "setWallpaper" => MethodReply::from_result(wallpaperd::set_wallpaper(backend, call)),
        "setWallpaperUri" => {
            MethodReply::from_result(wallpaperd::set_wallpaper_uri(backend, call))
        }
        "hasWallpaperPermission" => {
            MethodReply::from_result(wallpaperd::has_wallpaper_permission(backend))
        }
        other => {
            warn!("[IPC] Unknown method requested: '{}'", other);
            MethodReply::not_implemented()
        }
    }
}
