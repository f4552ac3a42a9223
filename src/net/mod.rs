//! Network module for discmeta
//!
//! This module owns the transport-adjacent concerns the crawlers share:
//! - Endpoint resolution across mirror candidates, cached per run
//! - HTTP session construction with source-mandated cookie pre-seeding

mod client;
mod resolver;

pub use client::{build_session, SessionCookie};
pub use resolver::EndpointResolver;
