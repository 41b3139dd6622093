mod cli;
mod config;
mod error;
mod ipc;
mod logging;
mod paths;
mod wallpaper;

use std::sync::Arc;

use clap::Parser;

use crate::cli::{Cli, Command};
use crate::config::BridgeConfig;
use crate::ipc::server::start_ipc_server;

pub struct BridgeDaemon {
    config: BridgeConfig,
}

impl BridgeDaemon {
    pub fn new(config: BridgeConfig) -> Self {
        info!("Initializing bridge daemon components");
        Self { config }
    }

    pub fn run(&self) -> std::io::Result<()> {
        info!("Starting bridge daemon");

        let backend = wallpaper::select_backend(&self.config);
        let socket = self.config.channel_socket();

        info!("Serving wallpaper channel on {}", socket.display());
        start_ipc_server(&socket, Arc::from(backend))
    }
}

fn main() {
    let cli = Cli::parse();

    logging::init(cli.debug);
    info!("wallbridge starting");

    let config = config::load_config();

    match &cli.command {
        Command::Serve => {
            let daemon = BridgeDaemon::new(config);
            if let Err(e) = daemon.run() {
                error!("Bridge daemon failed: {e}");
                eprintln!("wallbridge: daemon failed: {e}");
                std::process::exit(1);
            }
        }
        command => {
            if let Err(e) = cli::run_client_command(command) {
                error!("Client command failed: {e}");
                eprintln!("wallbridge: {e}");
                std::process::exit(1);
            }
        }
    }

    info!("wallbridge exiting");
}
