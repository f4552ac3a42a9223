use serde::Deserialize;

/// Main configuration structure for discmeta
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default, rename = "source")]
    pub sources: Vec<SourceEntry>,
    #[serde(default)]
    pub cropper: CropperConfig,
}

impl Config {
    /// Returns the configured candidate base URLs for a source, or `None`
    /// if the source has no entry (callers fall back to built-in defaults)
    pub fn candidates_for(&self, name: &str) -> Option<&[String]> {
        self.sources
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.candidates.as_slice())
    }
}

/// Network/session behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    /// User agent string sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Connect timeout in seconds
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            user_agent: default_user_agent(),
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_user_agent() -> String {
    format!("discmeta/{}", env!("CARGO_PKG_VERSION"))
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    30
}

/// Endpoint candidates for one logical source
///
/// Candidates are tried in listed order: primary first, mirrors after.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceEntry {
    /// Source name as known to the crawler factory (e.g. "prestige")
    pub name: String,

    /// Ordered candidate base URLs (primary + mirrors)
    pub candidates: Vec<String>,
}

/// Cover cropper configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CropperConfig {
    #[serde(default)]
    pub engine: CropEngine,
}

/// Cropping strategy selector
///
/// An engine the build does not support falls back to `Default` at
/// selection time rather than erroring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropEngine {
    /// Fixed-ratio passthrough crop
    #[default]
    Default,
    /// Face-detection-aware crop
    Face,
}
