//! Sign command implementation

use crate::auth::Credentials;
use clap::Args;
use reqwest::Method;

#[derive(Args, Debug)]
pub struct SignArgs {
    /// HTTP method (GET, POST, PUT, DELETE)
    pub method: String,

    /// Upstream path, e.g. /trade-api/v2/portfolio/balance
    pub path: String,
}

impl SignArgs {
    pub fn execute(&self, credentials: Option<Credentials>) -> anyhow::Result<()> {
        let credentials = credentials.ok_or_else(|| {
            anyhow::anyhow!(
                "credentials not configured: set {} and {}",
                crate::auth::API_KEY_ID_ENV,
                crate::auth::PRIVATE_KEY_ENV
            )
        })?;

        let method: Method = self.method.to_uppercase().parse()?;
        let headers = credentials.authorize(&method, &self.path)?;

        for (name, value) in headers.to_pairs() {
            println!("{}: {}", name, value);
        }
        Ok(())
    }
}
