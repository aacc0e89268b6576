use crate::client::{ClientCredentials, OAuthClient, ProviderConfig, TokenStyle};
use crate::error::AuthError;
use crate::providers::Provider;

const AUTH_URL: &str = "https://github.com/login/oauth/authorize";
const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const INFO_URL: &str = "https://api.github.com/user";

impl OAuthClient {
    /// Client for GitHub OAuth2. GitHub grants basic profile access without
    /// any scope, so none is requested by default. Its identity field is the
    /// numeric `id`.
    pub fn github(
        credentials: ClientCredentials,
        scope: Option<Vec<String>>,
    ) -> Result<Self, AuthError> {
        let config = ProviderConfig {
            provider: Provider::GitHub,
            auth_url: AUTH_URL.to_string(),
            token_url: TOKEN_URL.to_string(),
            info_url: INFO_URL.to_string(),
            revoke_url: None,
            id_key: "id".to_string(),
            token_style: TokenStyle::JsonBody,
            auth_params: vec![],
        };
        Self::new(credentials, config, scope.unwrap_or_default(), None)
    }
}
