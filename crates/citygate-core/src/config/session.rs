//! Session window configuration.

use serde::{Deserialize, Serialize};

/// Session management configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// TTL restored on `session:<token>` after every successful authorization.
    #[serde(default = "default_sliding_ttl")]
    pub sliding_ttl_seconds: u64,
    /// Permission domain used when a user's own domain has no cached set.
    /// `None` disables the fallback.
    #[serde(default = "default_public_domain")]
    pub public_domain: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sliding_ttl_seconds: default_sliding_ttl(),
            public_domain: default_public_domain(),
        }
    }
}

fn default_sliding_ttl() -> u64 {
    3600
}

fn default_public_domain() -> Option<String> {
    Some("generalpublic".to_string())
}
