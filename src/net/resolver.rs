//! Endpoint resolution over mirror candidates
//!
//! Sources mirror themselves under multiple domains and regions, so a
//! hardcoded primary URL would make the whole subsystem fragile to DNS and
//! region changes. The resolver probes an ordered candidate list (primary
//! first, mirrors after) and returns the first base URL that answers a
//! lightweight reachability check, short-circuiting the rest.
//!
//! Resolution happens at most once per source per resolver lifetime: the
//! result is cached for subsequent calls, and a fresh resolution only
//! happens on the next process start. The resolver is an explicit instance
//! held by the caller, not a hidden global, so tests can construct fresh
//! ones without cross-test leakage.

use crate::config::NetworkConfig;
use crate::crawler::SourceId;
use crate::CrawlError;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, SystemTime};
use url::Url;

/// A cached resolution result for one source
#[derive(Debug, Clone)]
struct ResolvedEndpoint {
    url: Url,
    resolved_at: SystemTime,
}

/// Resolves and caches one live base URL per logical source
pub struct EndpointResolver {
    client: Client,
    resolved: Mutex<HashMap<SourceId, ResolvedEndpoint>>,
}

impl EndpointResolver {
    /// Creates a resolver with its own probe client
    ///
    /// Probes use a shorter timeout than content fetches: a mirror that
    /// takes longer than this to answer its front page is not worth using.
    pub fn new(config: &NetworkConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;

        Ok(EndpointResolver {
            client,
            resolved: Mutex::new(HashMap::new()),
        })
    }

    /// Returns a live base URL for the source, probing candidates in order
    ///
    /// The first candidate that passes the reachability check wins and the
    /// remainder are never probed. A cached result is returned without any
    /// network traffic. Fails with [`CrawlError::SourceUnavailable`] when
    /// every candidate fails its single probe; probe failures are not
    /// distinguished from blocking.
    pub async fn resolve(&self, source: SourceId, candidates: &[String]) -> Result<Url, CrawlError> {
        {
            let cache = self.resolved.lock().expect("resolver cache lock poisoned");
            if let Some(endpoint) = cache.get(&source) {
                return Ok(endpoint.url.clone());
            }
        }

        for candidate in candidates {
            let url = match Url::parse(candidate) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("Skipping malformed candidate '{}': {}", candidate, e);
                    continue;
                }
            };

            if self.probe(&url).await {
                tracing::info!("Resolved source '{}' to {}", source, url);
                self.resolved
                    .lock()
                    .expect("resolver cache lock poisoned")
                    .insert(
                        source,
                        ResolvedEndpoint {
                            url: url.clone(),
                            resolved_at: SystemTime::now(),
                        },
                    );
                return Ok(url);
            }

            tracing::debug!("Candidate {} for source '{}' is unreachable", url, source);
        }

        Err(CrawlError::SourceUnavailable { source_id: source })
    }

    /// Returns the time a source was resolved, if it has been
    pub fn resolved_at(&self, source: SourceId) -> Option<SystemTime> {
        self.resolved
            .lock()
            .expect("resolver cache lock poisoned")
            .get(&source)
            .map(|endpoint| endpoint.resolved_at)
    }

    /// One lightweight reachability check against a candidate base URL
    ///
    /// Any answered request with a non-5xx status counts as reachable; a
    /// blocked-but-alive mirror still resolves, and the block is classified
    /// per item later. Network-level failures and 5xx both disqualify.
    async fn probe(&self, url: &Url) -> bool {
        match self.client.get(url.clone()).send().await {
            Ok(response) => !response.status().is_server_error(),
            Err(e) => {
                tracing::debug!("Probe of {} failed: {}", url, e);
                false
            }
        }
    }
}
