// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

mod app;
mod config;
mod logging;
mod logic;
mod models;
mod mvu;
mod ui;
mod utils;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::logic::api::HttpInboxClient;

fn main() -> Result<()> {
    let config = config::load().context("Failed to load configuration")?;
    logging::init(&config.log_level);

    let client = HttpInboxClient::from_config(&config).context("Failed to build HTTP client")?;
    info!(
        endpoint = %client.endpoint(),
        domains = config.domains.len(),
        services = config.services.len(),
        "starting TempInbox"
    );

    app::run(config, Arc::new(client)).map_err(|err| anyhow::anyhow!("UI error: {err}"))
}
