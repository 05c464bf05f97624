//! Scoped filesystem bridge - Entry Point
//!
//! Reads newline-delimited JSON requests on stdin and answers on stdout.
//! The optional first argument names the configuration file (default
//! `config`, i.e. `config.toml`).

use log::info;
use std::process;

use scoped_fs_bridge::error::BridgeError;
use scoped_fs_bridge::error::handlers::handle_error;
use scoped_fs_bridge::{BridgeConfig, Server};

#[tokio::main]
async fn main() {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config".to_string());

    let config = match BridgeConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            handle_error(&BridgeError::from(e));
            process::exit(1);
        }
    };

    info!("Launching scoped filesystem bridge...");

    let server = Server::new(&config);
    if let Err(e) = server.start().await {
        handle_error(&BridgeError::from(e));
        process::exit(1);
    }
}
