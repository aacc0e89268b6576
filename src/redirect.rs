use regex::Regex;

use crate::error::AuthError;

/// Hostname patterns allowed to stay on plain HTTP even when the gate
/// requires HTTPS. Local development runs without TLS.
pub const HTTP_PATTERNS: &[&str] = &[r"^(localhost|127\.0\.0\.1)(:\d+)?$"];

/// Derives the externally visible callback URL from a request's host.
#[derive(Debug, Clone)]
pub struct RedirectResolver {
    https: bool,
    patterns: Vec<Regex>,
}

impl RedirectResolver {
    /// `https` is whether non-local hosts must be reached over HTTPS.
    /// Patterns are compiled once here; a bad pattern is a configuration
    /// error, not a per-request one.
    pub fn new(https: bool, patterns: &[String]) -> Result<Self, AuthError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Regex::new(p)
                    .map_err(|e| AuthError::Config(format!("invalid http pattern '{p}': {e}")))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { https, patterns })
    }

    /// Match the hostname, port stripped, against the local patterns.
    pub fn is_local(&self, host: &str) -> bool {
        let hostname = host.split(':').next().unwrap_or(host);
        self.patterns.iter().any(|re| re.is_match(hostname))
    }

    pub fn scheme(&self, host: &str) -> &'static str {
        if self.is_local(host) || !self.https {
            "http"
        } else {
            "https"
        }
    }

    /// `scheme://host/path` concatenation. `path` must already be absolute.
    pub fn redirect_url(&self, host: &str, path: &str) -> String {
        format!("{}://{}{}", self.scheme(host), host, path)
    }
}
