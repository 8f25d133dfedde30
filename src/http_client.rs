use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

static CLIENT: OnceCell<Client> = OnceCell::new();

/// Shared blocking client for the MPG endpoints. The timeout bounds
/// every call, including the per-player fetches of the refresh job.
pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build http client")
    })
}
