// ABOUTME: Server binary for the NeuroFuel advice relay
// ABOUTME: Loads configuration, initializes logging, and serves the advice API until shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # NeuroFuel Relay Server Binary

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use neurofuel_relay::{
    config::ServerConfig,
    constants::endpoints,
    logging,
    server::{self, ServerResources},
};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "neurofuel-server")]
#[command(about = "NeuroFuel relay - nutrition advice over a chat-completion provider")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override bind address
    #[arg(long)]
    host: Option<String>,

    /// Serve locally generated advice without contacting the provider
    #[arg(long)]
    mock: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }
    if args.mock {
        config.llm.force_mock = true;
    }

    logging::init_from_env()?;

    info!("{}", config.summary());
    display_available_endpoints(&config);

    let resources = Arc::new(ServerResources::new(config)?);

    if let Err(e) = server::run(resources).await {
        error!("Server error: {e:#}");
        return Err(e);
    }

    Ok(())
}

/// Display the served endpoints
fn display_available_endpoints(config: &ServerConfig) {
    let base = format!("http://{}", config.bind_address());

    info!("=== Available API Endpoints ===");
    info!("   Advice:       POST {base}{}", endpoints::ADVICE);
    info!("   Advice alias: POST {base}{}", endpoints::GENERATE_ADVICE);
    info!("   Health:       GET  {base}{}", endpoints::HEALTH);
    info!("   Readiness:    GET  {base}{}", endpoints::READY);
}
