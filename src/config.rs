use serde::{Deserialize, Serialize};

use crate::redirect::HTTP_PATTERNS;

/// Gate configuration. Every field has a default so the struct can be
/// deserialized from a larger application config file or built with
/// `GateConfig::default()` and adjusted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// OAuth callback route the provider redirects back to.
    #[serde(default = "default_redirect_path")]
    pub redirect_path: String,

    /// Route the callback redirects to when the provider denies the request.
    #[serde(default = "default_error_path")]
    pub error_path: String,

    #[serde(default = "default_logout_path")]
    pub logout_path: String,

    /// Route unauthenticated requests are redirected to. The login page
    /// itself is supplied by the embedding application.
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Paths exempt from the auth gate, matched as anchored regex prefixes.
    /// `None` exempts the redirect, error and login paths.
    #[serde(default)]
    pub skip: Option<Vec<String>>,

    /// Require HTTPS for non-local hosts when building redirect URLs.
    #[serde(default = "default_https")]
    pub https: bool,

    /// Hostname regexes treated as local and kept on plain HTTP.
    #[serde(default = "default_http_patterns")]
    pub http_patterns: Vec<String>,
}

fn default_redirect_path() -> String {
    "/redirect".to_string()
}

fn default_error_path() -> String {
    "/error".to_string()
}

fn default_logout_path() -> String {
    "/logout".to_string()
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_https() -> bool {
    true
}

fn default_http_patterns() -> Vec<String> {
    HTTP_PATTERNS.iter().map(|p| p.to_string()).collect()
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            redirect_path: default_redirect_path(),
            error_path: default_error_path(),
            logout_path: default_logout_path(),
            login_path: default_login_path(),
            skip: None,
            https: default_https(),
            http_patterns: default_http_patterns(),
        }
    }
}

impl GateConfig {
    /// Effective skip list: explicit entries, or the three gate-owned paths.
    pub(crate) fn skip_patterns(&self) -> Vec<String> {
        match &self.skip {
            Some(skip) => skip.clone(),
            None => vec![
                self.redirect_path.clone(),
                self.error_path.clone(),
                self.login_path.clone(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_conventional_routes() {
        let config = GateConfig::default();
        assert_eq!(config.redirect_path, "/redirect");
        assert_eq!(config.error_path, "/error");
        assert_eq!(config.logout_path, "/logout");
        assert_eq!(config.login_path, "/login");
        assert!(config.https);
        assert_eq!(config.http_patterns, default_http_patterns());
    }

    #[test]
    fn skip_defaults_to_gate_owned_paths() {
        let config = GateConfig::default();
        assert_eq!(
            config.skip_patterns(),
            vec!["/redirect", "/error", "/login"]
        );
    }

    #[test]
    fn explicit_skip_replaces_defaults() {
        let config = GateConfig {
            skip: Some(vec!["/public".to_string()]),
            ..GateConfig::default()
        };
        assert_eq!(config.skip_patterns(), vec!["/public"]);
    }

    #[test]
    fn deserializes_with_partial_fields() {
        let config: GateConfig =
            serde_json::from_str(r#"{"login_path": "/signin", "https": false}"#).unwrap();
        assert_eq!(config.login_path, "/signin");
        assert!(!config.https);
        assert_eq!(config.redirect_path, "/redirect");
    }
}
