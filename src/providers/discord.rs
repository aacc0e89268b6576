use crate::client::{ClientCredentials, OAuthClient, ProviderConfig, TokenStyle};
use crate::error::AuthError;
use crate::providers::Provider;

const AUTH_URL: &str = "https://discord.com/oauth2/authorize";
const TOKEN_URL: &str = "https://discord.com/api/oauth2/token";
const REVOKE_URL: &str = "https://discord.com/api/oauth2/token/revoke";

const DEFAULT_SCOPE: &str =
    "applications.commands applications.commands.permissions.update identify";

impl OAuthClient {
    /// Client for Discord OAuth2. Discord takes the token request as a form
    /// body with HTTP Basic credentials, and its redirect URI is configured in
    /// the application dashboard rather than sent per request. `is_user`
    /// selects a user install over a guild install.
    pub fn discord(
        credentials: ClientCredentials,
        scope: Option<Vec<String>>,
        is_user: bool,
    ) -> Result<Self, AuthError> {
        let integration_type: u8 = if is_user { 1 } else { 0 };
        let config = ProviderConfig {
            provider: Provider::Discord,
            auth_url: AUTH_URL.to_string(),
            token_url: TOKEN_URL.to_string(),
            info_url: "https://discord.com/api/users/@me".to_string(),
            revoke_url: Some(REVOKE_URL.to_string()),
            id_key: "id".to_string(),
            token_style: TokenStyle::BasicForm,
            auth_params: vec![("integration_type".to_string(), integration_type.to_string())],
        };
        let scope = scope.unwrap_or_else(|| {
            DEFAULT_SCOPE.split_whitespace().map(str::to_string).collect()
        });
        Self::new(credentials, config, scope, None)
    }
}
