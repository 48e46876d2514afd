//! Serve command implementation

use crate::auth::Credentials;
use crate::config::Config;
use crate::proxy::{self, AppState};
use clap::Args;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Override the configured bind address
    #[arg(short, long)]
    pub bind: Option<String>,
}

impl ServeArgs {
    pub async fn execute(&self, config: &Config, credentials: Option<Credentials>) -> anyhow::Result<()> {
        let bind_addr = self.bind.as_deref().unwrap_or(&config.server.bind_addr);

        match credentials {
            Some(ref creds) => tracing::info!(key_id = creds.key_id(), "Loaded API credentials"),
            None => tracing::info!("Running without API credentials"),
        }

        let state = AppState::from_config(config, credentials)?;
        proxy::serve(state, bind_addr).await
    }
}
