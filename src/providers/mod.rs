//! Per-provider constructors for [`OAuthClient`](crate::OAuthClient).
//!
//! The provider set is a closed union: each file fixes one provider's
//! endpoints, identity field, default scopes and token-request shape.

mod discord;
mod github;
mod google;
mod huggingface;

use std::fmt;

/// Which provider a [`ProviderConfig`](crate::ProviderConfig) was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Google,
    GitHub,
    HuggingFace,
    Discord,
    /// Caller-supplied configuration, not one of the built-in providers.
    Custom,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Provider::Google => "google",
            Provider::GitHub => "github",
            Provider::HuggingFace => "huggingface",
            Provider::Discord => "discord",
            Provider::Custom => "custom",
        };
        f.write_str(name)
    }
}
