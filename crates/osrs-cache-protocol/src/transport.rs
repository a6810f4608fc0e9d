//! HTTP transport setup

use std::sync::Once;

use reqwest::{Client, ClientBuilder};

use crate::config::ArchiveConfig;
use crate::error::Result;

static CRYPTO_PROVIDER: Once = Once::new();

/// Install the ring provider as the process-wide rustls default
///
/// reqwest is built without a bundled provider, so this must run before the
/// first client is constructed. Later calls are no-ops, and an already
/// installed provider is left in place.
pub fn ensure_crypto_provider() {
    CRYPTO_PROVIDER.call_once(|| {
        if rustls::crypto::ring::default_provider()
            .install_default()
            .is_err()
        {
            tracing::debug!("rustls crypto provider already installed");
        }
    });
}

/// Build the HTTP client used for every archive request
pub fn build_client(config: &ArchiveConfig) -> Result<Client> {
    ensure_crypto_provider();

    ClientBuilder::new()
        .connect_timeout(config.connect_timeout)
        .pool_max_idle_per_host(4)
        .tcp_nodelay(true)
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .redirect(reqwest::redirect::Policy::limited(5))
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds_with_defaults() {
        assert!(build_client(&ArchiveConfig::default()).is_ok());
    }

    #[test]
    fn test_provider_install_is_idempotent() {
        ensure_crypto_provider();
        ensure_crypto_provider();
        assert!(rustls::crypto::CryptoProvider::get_default().is_some());
    }
}
