use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::RngCore;

use crate::client::{ClientCredentials, OAuthClient, ProviderConfig, TokenStyle};
use crate::error::AuthError;
use crate::providers::Provider;

const AUTH_URL: &str = "https://huggingface.co/oauth/authorize";
const TOKEN_URL: &str = "https://huggingface.co/oauth/token";
const INFO_URL: &str = "https://huggingface.co/oauth/userinfo";

impl OAuthClient {
    /// Client for HuggingFace OAuth2. Scopes default to `openid profile`, and
    /// a random `state` token is generated when none is supplied.
    pub fn huggingface(
        credentials: ClientCredentials,
        scope: Option<Vec<String>>,
        state: Option<String>,
    ) -> Result<Self, AuthError> {
        let config = ProviderConfig {
            provider: Provider::HuggingFace,
            auth_url: AUTH_URL.to_string(),
            token_url: TOKEN_URL.to_string(),
            info_url: INFO_URL.to_string(),
            revoke_url: None,
            id_key: "sub".to_string(),
            token_style: TokenStyle::JsonBody,
            auth_params: vec![],
        };
        let scope =
            scope.unwrap_or_else(|| vec!["openid".to_string(), "profile".to_string()]);
        let state = state.unwrap_or_else(random_state);
        Self::new(credentials, config, scope, Some(state))
    }
}

/// URL-safe state token with 16 bytes of entropy.
fn random_state() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_is_generated_when_absent() {
        let a = OAuthClient::huggingface(ClientCredentials::new("hf", "hfs"), None, None).unwrap();
        let b = OAuthClient::huggingface(ClientCredentials::new("hf", "hfs"), None, None).unwrap();
        let (sa, sb) = (a.state().unwrap(), b.state().unwrap());
        // 16 bytes encode to 22 url-safe characters
        assert!(sa.len() >= 22);
        assert_ne!(sa, sb);
    }

    #[test]
    fn supplied_state_is_kept() {
        let client = OAuthClient::huggingface(
            ClientCredentials::new("hf", "hfs"),
            None,
            Some("fixed".to_string()),
        )
        .unwrap();
        assert_eq!(client.state(), Some("fixed"));
        let url = client.login_link("http://localhost:8000/redirect", None, None).unwrap();
        assert!(url.query_pairs().any(|(k, v)| k == "state" && v == "fixed"));
    }
}
