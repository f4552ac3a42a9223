//! Crawler interface and per-source implementations
//!
//! Every source website gets one crawler type behind the shared [`Crawler`]
//! trait, so an orchestrator can hold a collection of boxed instances and
//! drive them identically, with no source-specific branching. Construction
//! resolves the source's endpoint and prepares its session exactly once;
//! after that, each `crawl_and_fill` call fetches one item page, classifies
//! transport failures, and maps the page into the canonical record.

mod extract;
mod prestige;

pub use extract::{
    clean_name, direct_text, extract_field, first_number, strip_query, FieldRule, Traversal,
};
pub use prestige::PrestigeCrawler;

use crate::config::Config;
use crate::net::EndpointResolver;
use crate::record::MetadataRecord;
use crate::Result;
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

/// Identity of a logical source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceId {
    Prestige,
}

impl SourceId {
    /// All sources known to the factory
    pub const ALL: &'static [SourceId] = &[SourceId::Prestige];

    /// Stable name used in config files and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::Prestige => "prestige",
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "prestige" => Ok(SourceId::Prestige),
            other => Err(format!(
                "unknown source '{}' (known: {})",
                other,
                SourceId::ALL
                    .iter()
                    .map(|id| id.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

/// Uniform contract every per-source crawler implements
///
/// Implementations are independently constructible and share no mutable
/// state, so instances for different sources may run concurrently. A single
/// instance is driven with at most one in-flight `crawl_and_fill` at a time;
/// the session object is owned by its crawler and never shared.
#[async_trait]
pub trait Crawler: Send + Sync {
    /// The source this crawler talks to
    fn id(&self) -> SourceId;

    /// Fetches the item page for `record.identifier`, extracts every field
    /// this source claims, and writes them into the record
    ///
    /// The write is atomic with respect to failure: on any error the record
    /// is exactly as the caller passed it in. Fields this source does not
    /// claim are left untouched.
    async fn crawl_and_fill(&self, record: &mut MetadataRecord) -> Result<()>;
}

/// Constructs a crawler for the given source
///
/// Endpoint resolution and session preparation happen here, once per
/// instance. Fails with [`crate::CrawlError::SourceUnavailable`] when no candidate
/// endpoint is reachable.
pub async fn build_crawler(
    id: SourceId,
    config: &Config,
    resolver: &EndpointResolver,
) -> Result<Box<dyn Crawler>> {
    match id {
        SourceId::Prestige => Ok(Box::new(PrestigeCrawler::create(config, resolver).await?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_id_round_trip() {
        for id in SourceId::ALL {
            let parsed: SourceId = id.as_str().parse().unwrap();
            assert_eq!(parsed, *id);
        }
    }

    #[test]
    fn test_unknown_source_lists_known_names() {
        let err = SourceId::from_str("nosuchsite").unwrap_err();
        assert!(err.contains("nosuchsite"));
        assert!(err.contains("prestige"));
    }
}
