use std::path::Path;

use crate::client::{ClientCredentials, OAuthClient, ProviderConfig, TokenStyle};
use crate::error::AuthError;
use crate::providers::Provider;

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://www.googleapis.com/oauth2/v4/token";
const INFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";
const SCOPE_PREFIX: &str = "https://www.googleapis.com/auth/userinfo";

fn config() -> ProviderConfig {
    ProviderConfig {
        provider: Provider::Google,
        auth_url: AUTH_URL.to_string(),
        token_url: TOKEN_URL.to_string(),
        info_url: INFO_URL.to_string(),
        revoke_url: None,
        id_key: "sub".to_string(),
        token_style: TokenStyle::JsonBody,
        auth_params: vec![],
    }
}

impl OAuthClient {
    /// Client for Google OAuth2. Scopes default to OpenID plus the userinfo
    /// email and profile scopes.
    pub fn google(
        credentials: ClientCredentials,
        scope: Option<Vec<String>>,
    ) -> Result<Self, AuthError> {
        let scope = scope.unwrap_or_else(|| {
            vec![
                "openid".to_string(),
                format!("{SCOPE_PREFIX}.email"),
                format!("{SCOPE_PREFIX}.profile"),
            ]
        });
        Self::new(credentials, config(), scope, None)
    }

    /// Same as [`OAuthClient::google`], reading credentials from the JSON file
    /// the Google console exports (`{"web": {"client_id", "client_secret"}}`).
    pub fn google_from_file(
        path: impl AsRef<Path>,
        scope: Option<Vec<String>>,
    ) -> Result<Self, AuthError> {
        Self::google(ClientCredentials::from_google_file(path)?, scope)
    }
}
