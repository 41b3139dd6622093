use clap::{Parser, Subcommand};
use serde_json::json;

use crate::config;
use crate::info;
use crate::ipc::request::{send_method_call, MethodCall};

#[derive(Parser, Debug)]
#[command(author, version, about = "Wallpaper bridge daemon and channel client")]
pub struct Cli {
    /// Log informational messages too, and mirror problems to stderr.
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the bridge daemon serving the wallpaper channel.
    Serve,
    /// Set the wallpaper from a local file path.
    Set {
        /// Path to the image file.
        path: String,
        /// Destination surface: lockScreen, homeScreen or both.
        #[arg(short, long)]
        location: Option<String>,
    },
    /// Set the lock-screen wallpaper from a URI (file:// or data:).
    SetUri {
        /// Locator to read the image from.
        uri: String,
    },
    /// Ask the bridge whether the wallpaper-set permission is granted.
    HasPermission,
}

impl Command {
    /// Channel call a client command translates to. `Serve` is not a
    /// client command and translates to nothing.
    pub fn method_call(&self) -> Option<MethodCall> {
        match self {
            Command::Serve => None,
            Command::Set { path, location } => {
                let mut args = json!({ "path": path });
                if let Some(location) = location {
                    args["location"] = json!(location);
                }
                Some(MethodCall::with_args("setWallpaper", args))
            }
            Command::SetUri { uri } => {
                Some(MethodCall::with_args("setWallpaperUri", json!({ "uri": uri })))
            }
            Command::HasPermission => Some(MethodCall::new("hasWallpaperPermission")),
        }
    }
}

/// Send one client command to a running bridge and print the outcome.
pub fn run_client_command(command: &Command) -> Result<(), Box<dyn std::error::Error>> {
    let call = command
        .method_call()
        .ok_or("this command does not talk to the bridge")?;
    let socket = config::current_config().channel_socket();

    let reply = send_method_call(&socket, &call)?;

    if reply.not_implemented {
        return Err(format!("bridge does not implement '{}'", call.method).into());
    }

    if let Some(err) = reply.error {
        let mut message = format!("{} [{}]", err.message, err.code);
        if let Some(detail) = err.detail {
            message.push_str(&format!("\n  detail: {detail}"));
        }
        return Err(message.into());
    }

    match reply.data {
        Some(data) => println!("{data}"),
        None => println!("ok"),
    }
    info!("Client command finished");
    Ok(())
}
