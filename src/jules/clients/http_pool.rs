//! Shared `reqwest::Client` instances, one per base URL.
//!
//! Reusing a client keeps its connection pool warm, so repeated calls to the same service
//! skip DNS lookups and TLS handshakes. Each pooled client keeps up to 10 idle connections
//! per host for 90 seconds, sends TCP keepalives every 60 seconds, and gives up connecting
//! after 30 seconds.

use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

lazy_static! {
    static ref HTTP_CLIENT_POOL: Mutex<HashMap<String, reqwest::Client>> =
        Mutex::new(HashMap::new());
}

/// Get or create the shared HTTP client for `base_url`.
pub fn get_http_client(base_url: &str) -> reqwest::Client {
    let mut pool = match HTTP_CLIENT_POOL.lock() {
        Ok(pool) => pool,
        Err(poisoned) => poisoned.into_inner(),
    };

    if let Some(client) = pool.get(base_url) {
        return client.clone();
    }

    let client = build_client();
    pool.insert(base_url.to_string(), client.clone());
    client
}

fn build_client() -> reqwest::Client {
    reqwest::ClientBuilder::new()
        .pool_idle_timeout(Some(Duration::from_secs(90)))
        .pool_max_idle_per_host(10)
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .connect_timeout(Duration::from_secs(30))
        .timeout(Duration::from_secs(300))
        .build()
        .unwrap_or_else(|err| {
            log::warn!("Falling back to a default HTTP client: {}", err);
            reqwest::Client::new()
        })
}

#[cfg(test)]
fn pooled_base_urls() -> Vec<String> {
    HTTP_CLIENT_POOL
        .lock()
        .map(|pool| pool.keys().cloned().collect())
        .unwrap_or_default()
}
