use std::io::{Read, Write};
use std::net::Shutdown;
use std::os::unix::net::UnixStream;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ipc::response::MethodReply;
use crate::{error, info};

/// One method invocation on the wallpaper channel.
#[derive(Debug, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub args: Option<Value>,
}

const BUFFER_SIZE: usize = 16 * 1024;

impl MethodCall {
    pub fn new(method: &str) -> Self {
        Self {
            method: method.to_string(),
            args: None,
        }
    }

    pub fn with_args(method: &str, args: Value) -> Self {
        Self {
            method: method.to_string(),
            args: Some(args),
        }
    }

    /// Fetch a string argument by name. Absent args, absent keys and
    /// non-string values all read as missing.
    pub fn str_arg(&self, name: &str) -> Option<&str> {
        self.args
            .as_ref()
            .and_then(|a| a.get(name))
            .and_then(Value::as_str)
    }
}

/// Dial the bridge socket, send one call and wait for its reply.
///
/// Framing is one call per connection: the write side is shut down after
/// sending so the server sees EOF, and the reply is read until the server
/// closes its side.
pub fn send_method_call(socket_path: &Path, call: &MethodCall) -> Result<MethodReply, String> {
    info!(
        "Channel call: method='{}', args={:?}",
        call.method, call.args
    );

    let mut stream = UnixStream::connect(socket_path).map_err(|e| {
        error!(
            "Failed to connect to bridge socket {}: {e}",
            socket_path.display()
        );
        format!("bridge connect failed ({}): {e}", socket_path.display())
    })?;
    info!("Connected to bridge socket {}", socket_path.display());

    let payload = serde_json::to_vec(call).map_err(|e| {
        error!("Failed to serialize method call: {e}");
        format!("call serialize failed: {e}")
    })?;

    stream.write_all(&payload).map_err(|e| {
        error!("Failed to send method call: {e}");
        format!("call write failed: {e}")
    })?;
    stream.shutdown(Shutdown::Write).map_err(|e| {
        error!("Failed to close the write side: {e}");
        format!("call shutdown failed: {e}")
    })?;
    info!("Sent {} bytes to the bridge", payload.len());

    let mut raw = String::new();
    (&mut stream)
        .take(BUFFER_SIZE as u64)
        .read_to_string(&mut raw)
        .map_err(|e| {
            error!("Failed to read the reply: {e}");
            format!("reply read failed: {e}")
        })?;
    info!("Received {} bytes from the bridge", raw.len());

    match serde_json::from_str::<MethodReply>(&raw) {
        Ok(reply) => {
            info!(
                "Channel reply: ok={}, not_implemented={}",
                reply.ok, reply.not_implemented
            );
            Ok(reply)
        }
        Err(e) => {
            error!("Failed to decode the reply: {e}");
            Err(format!("reply decode failed: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn str_arg_reads_only_string_values() {
        let call = MethodCall::with_args(
            "setWallpaper",
            json!({ "path": "/a.png", "location": 7 }),
        );
        assert_eq!(call.str_arg("path"), Some("/a.png"));
        assert_eq!(call.str_arg("location"), None);
        assert_eq!(call.str_arg("missing"), None);

        let bare = MethodCall::new("hasWallpaperPermission");
        assert_eq!(bare.str_arg("path"), None);
    }

    #[test]
    fn calls_decode_without_an_args_field() {
        let call: MethodCall = serde_json::from_str(r#"{"method":"hasWallpaperPermission"}"#)
            .unwrap();
        assert_eq!(call.method, "hasWallpaperPermission");
        assert!(call.args.is_none());
    }
}
