//! Test doubles shared by the dispatch and server tests.

use std::io::Read;
use std::sync::Mutex;

use super::{Surface, WallpaperBackend};
use crate::error::BridgeError;

/// Backend that records what it was asked to do instead of touching the
/// desktop. The stream is always drained so consumption is observable.
pub struct MockBackend {
    pub targeting: bool,
    pub permission: bool,
    pub fail_with: Option<String>,
    pub applied: Mutex<Vec<(Surface, Vec<u8>)>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            targeting: true,
            permission: true,
            fail_with: None,
            applied: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::new()
        }
    }

    pub fn applied_surfaces(&self) -> Vec<Surface> {
        self.applied.lock().unwrap().iter().map(|(s, _)| *s).collect()
    }

    pub fn applied_bytes(&self) -> Vec<Vec<u8>> {
        self.applied.lock().unwrap().iter().map(|(_, b)| b.clone()).collect()
    }
}

impl WallpaperBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn supports_surface_targeting(&self) -> bool {
        self.targeting
    }

    fn set_stream(&self, stream: &mut dyn Read, surface: Surface) -> Result<(), BridgeError> {
        let mut bytes = Vec::new();
        stream
            .read_to_end(&mut bytes)
            .map_err(BridgeError::wallpaper)?;

        if let Some(message) = &self.fail_with {
            return Err(BridgeError::Wallpaper {
                message: message.clone(),
                detail: None,
            });
        }

        self.applied.lock().unwrap().push((surface, bytes));
        Ok(())
    }

    fn has_permission(&self) -> bool {
        self.permission
    }
}
