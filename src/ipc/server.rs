use std::io::{Read, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::Path;
use std::sync::Arc;
use std::{thread, time::Duration};

use crate::error::BridgeError;
use crate::ipc::{dispatch::dispatch, request::MethodCall, response::MethodReply, CHANNEL_NAME};
use crate::wallpaper::WallpaperBackend;
use crate::{error, info, warn};

const BUFFER_SIZE: usize = 16 * 1024;

/// Serve the wallpaper channel on `socket_path`. Never returns except on
/// a bind failure; every accepted connection is one method call.
pub fn start_ipc_server(
    socket_path: &Path,
    backend: Arc<dyn WallpaperBackend>,
) -> std::io::Result<()> {
    if let Some(parent) = socket_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    // A socket file left over from a previous run makes bind fail.
    if socket_path.exists() {
        let _ = std::fs::remove_file(socket_path);
    }

    let listener = UnixListener::bind(socket_path)?;
    info!(
        "Starting IPC server for channel '{CHANNEL_NAME}' on {}",
        socket_path.display()
    );

    loop {
        match listener.accept() {
            Ok((stream, _)) => {
                // Spawn a handler thread so the accept loop immediately
                // returns to accepting. A caller holding its connection
                // open must not block other clients.
                let backend = Arc::clone(&backend);
                thread::spawn(move || handle_client(stream, backend.as_ref()));
            }
            Err(e) => {
                warn!("Failed to accept IPC connection: {e}; retrying in 100ms");
                thread::sleep(Duration::from_millis(100));
            }
        }
    }
}

fn handle_client(mut stream: UnixStream, backend: &dyn WallpaperBackend) {
    let mut raw = String::new();
    if let Err(e) = (&mut stream)
        .take(BUFFER_SIZE as u64)
        .read_to_string(&mut raw)
    {
        warn!("Failed to read from IPC socket: {e}");
        return;
    }

    let call: MethodCall = match serde_json::from_str(&raw) {
        Ok(call) => call,
        Err(e) => {
            error!("Invalid channel call: {e}");
            send(
                &mut stream,
                MethodReply::err(&BridgeError::invalid_args(format!("invalid call: {e}"))),
            );
            return;
        }
    };

    let reply = dispatch(backend, &call);
    send(&mut stream, reply);
}

fn send(stream: &mut UnixStream, reply: MethodReply) {
    let bytes = match serde_json::to_vec(&reply) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Failed to serialize reply: {e}");
            return;
        }
    };

    if let Err(e) = stream.write_all(&bytes) {
        warn!("Failed to write IPC reply: {e}");
        return;
    }

    // Commit the reply before the handler thread drops this connection.
    if let Err(e) = stream.flush() {
        warn!("Failed to flush IPC reply: {e}");
    }
}
