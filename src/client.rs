use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::AuthError;
use crate::providers::Provider;

/// Profile endpoint response, an opaque key/value mapping. The only field the
/// crate relies on is the one named by [`ProviderConfig::id_key`].
pub type ProfileInfo = serde_json::Map<String, Value>;

/// Upper bound on every provider round-trip. The gate re-validates tokens on
/// the request hot path, so a hung provider must not stall gated requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("oauth-gate/", env!("CARGO_PKG_VERSION"));

/// OAuth2 application credentials issued by the provider.
#[derive(Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl ClientCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Load credentials from a Google-style JSON file with shape
    /// `{"web": {"client_id": ..., "client_secret": ...}}`.
    pub fn from_google_file(path: impl AsRef<Path>) -> Result<Self, AuthError> {
        #[derive(Deserialize)]
        struct Web {
            client_id: String,
            client_secret: String,
        }
        #[derive(Deserialize)]
        struct CredFile {
            web: Web,
        }
        let raw = std::fs::read_to_string(path)?;
        let cred: CredFile = serde_json::from_str(&raw)?;
        Ok(Self::new(cred.web.client_id, cred.web.client_secret))
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// How a provider expects its token-endpoint request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStyle {
    /// JSON body carrying the client id and secret (Google, GitHub,
    /// HuggingFace and most others).
    JsonBody,
    /// Form-encoded body with the client id and secret as HTTP Basic
    /// credentials and no `redirect_uri` (Discord).
    BasicForm,
}

/// Immutable per-provider endpoint configuration.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub provider: Provider,
    /// Authorization endpoint the browser is sent to.
    pub auth_url: String,
    /// Token endpoint the authorization code is exchanged at.
    pub token_url: String,
    /// Profile endpoint queried with a bearer token.
    pub info_url: String,
    /// Revocation endpoint, when the provider has one. Unused by the flow
    /// itself, carried for embedding applications that revoke on their own.
    pub revoke_url: Option<String>,
    /// Profile field holding the stable unique user identifier.
    pub id_key: String,
    pub token_style: TokenStyle,
    /// Static query parameters appended to every login link.
    pub auth_params: Vec<(String, String)>,
}

/// Access token material returned by a token exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
    pub scope: Option<String>,
}

/// One OAuth2 provider connection: endpoint configuration, credentials, and
/// the token obtained by the most recent exchange.
///
/// `exchange_code` mutates the stored token, so a client shared between
/// requests needs external synchronization; [`crate::AuthGate`] keeps its
/// client behind a read-write lock and takes the write side only for the
/// exchange.
pub struct OAuthClient {
    credentials: ClientCredentials,
    config: ProviderConfig,
    scope: Vec<String>,
    state: Option<String>,
    token: Option<TokenSet>,
    http: reqwest::Client,
}

impl OAuthClient {
    pub fn new(
        credentials: ClientCredentials,
        config: ProviderConfig,
        scope: Vec<String>,
        state: Option<String>,
    ) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            credentials,
            config,
            scope,
            state,
            token: None,
            http,
        })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn id_key(&self) -> &str {
        &self.config.id_key
    }

    /// Token from the most recent successful exchange, if any.
    pub fn token(&self) -> Option<&TokenSet> {
        self.token.as_ref()
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    /// Build the provider authorization URL. Pure URL construction, no network.
    ///
    /// `scope` and `state` default to the values fixed at construction.
    /// Providers with `TokenStyle::BasicForm` are configured through their
    /// dashboard, so their link carries no `response_type`, `redirect_uri` or
    /// `state`.
    pub fn login_link(
        &self,
        redirect_uri: &str,
        scope: Option<&[String]>,
        state: Option<&str>,
    ) -> Result<Url, AuthError> {
        let scope = scope.unwrap_or(&self.scope).join(" ");
        let mut url = Url::parse(&self.config.auth_url)?;
        {
            let mut query = url.query_pairs_mut();
            match self.config.token_style {
                TokenStyle::JsonBody => {
                    query.append_pair("response_type", "code");
                    query.append_pair("client_id", &self.credentials.client_id);
                    query.append_pair("redirect_uri", redirect_uri);
                    if !scope.is_empty() {
                        query.append_pair("scope", &scope);
                    }
                    if let Some(state) = state.or(self.state.as_deref()) {
                        query.append_pair("state", state);
                    }
                }
                TokenStyle::BasicForm => {
                    query.append_pair("client_id", &self.credentials.client_id);
                    for (key, value) in &self.config.auth_params {
                        query.append_pair(key, value);
                    }
                    if !scope.is_empty() {
                        query.append_pair("scope", &scope);
                    }
                }
            }
        }
        Ok(url)
    }

    /// Exchange an authorization code for a token and store it on the client,
    /// overwriting any previous token.
    pub async fn exchange_code(
        &mut self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenSet, AuthError> {
        let request = match self.config.token_style {
            TokenStyle::JsonBody => {
                self.http.post(&self.config.token_url).json(&serde_json::json!({
                    "code": code,
                    "redirect_uri": redirect_uri,
                    "client_id": self.credentials.client_id,
                    "client_secret": self.credentials.client_secret,
                    "grant_type": "authorization_code",
                }))
            }
            TokenStyle::BasicForm => self
                .http
                .post(&self.config.token_url)
                .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
                .form(&[("grant_type", "authorization_code"), ("code", code)]),
        };

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::warn!(
                "{} token exchange rejected with status {}",
                self.config.provider,
                status
            );
            return Err(AuthError::TokenExchange {
                status: status.as_u16(),
                body,
            });
        }

        let token = parse_token_body(&body)?;
        self.token = Some(token.clone());
        Ok(token)
    }

    /// Fetch the authenticated user's profile. `token` defaults to the stored
    /// token from the last exchange.
    pub async fn fetch_profile(&self, token: Option<&str>) -> Result<ProfileInfo, AuthError> {
        let token = match token {
            Some(token) => token,
            None => self
                .token
                .as_ref()
                .map(|t| t.access_token.as_str())
                .ok_or(AuthError::MissingToken)?,
        };

        let response = self
            .http
            .get(&self.config.info_url)
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AuthError::ProfileFetch {
                status: status.as_u16(),
                body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Exchange the code, then fetch the profile with the fresh token.
    pub async fn retrieve_profile(
        &mut self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<ProfileInfo, AuthError> {
        let token = self.exchange_code(code, redirect_uri).await?;
        self.fetch_profile(Some(&token.access_token)).await
    }

    /// [`retrieve_profile`](Self::retrieve_profile) followed by extracting the
    /// identity field. A missing field is a provider contract violation, not
    /// an authentication failure.
    pub async fn retrieve_identity(
        &mut self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<String, AuthError> {
        let profile = self.retrieve_profile(code, redirect_uri).await?;
        identity_of(&profile, &self.config.id_key)
            .ok_or_else(|| AuthError::MissingIdentityField(self.config.id_key.clone()))
    }
}

/// Extract the identity value from a profile. Providers disagree on whether it
/// is a string (Google `sub`) or an integer (GitHub `id`).
pub fn identity_of(profile: &ProfileInfo, id_key: &str) -> Option<String> {
    match profile.get(id_key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Token endpoints answer with JSON or, for GitHub without an `Accept`
/// header, form-encoding. Try JSON first and fall back.
fn parse_token_body(body: &str) -> Result<TokenSet, AuthError> {
    if let Ok(token) = serde_json::from_str::<TokenSet>(body) {
        return Ok(token);
    }

    let mut access_token = None;
    let mut token_type = None;
    let mut refresh_token = None;
    let mut expires_in = None;
    let mut scope = None;
    for (key, value) in url::form_urlencoded::parse(body.as_bytes()) {
        match key.as_ref() {
            "access_token" => access_token = Some(value.into_owned()),
            "token_type" => token_type = Some(value.into_owned()),
            "refresh_token" => refresh_token = Some(value.into_owned()),
            "expires_in" => expires_in = value.parse().ok(),
            "scope" => scope = Some(value.into_owned()),
            _ => {}
        }
    }
    match access_token {
        Some(access_token) => Ok(TokenSet {
            access_token,
            token_type: token_type.unwrap_or_default(),
            refresh_token,
            expires_in,
            scope,
        }),
        None => Err(AuthError::TokenResponse(body.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn query_map(url: &Url) -> HashMap<String, String> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    fn test_client(style: TokenStyle) -> OAuthClient {
        let config = ProviderConfig {
            provider: Provider::Custom,
            auth_url: "https://provider.test/authorize".to_string(),
            token_url: "https://provider.test/token".to_string(),
            info_url: "https://provider.test/userinfo".to_string(),
            revoke_url: None,
            id_key: "sub".to_string(),
            token_style: style,
            auth_params: vec![],
        };
        OAuthClient::new(
            ClientCredentials::new("cid", "csecret"),
            config,
            vec!["openid".to_string(), "profile".to_string()],
            None,
        )
        .unwrap()
    }

    #[test]
    fn login_link_carries_standard_query() {
        let client = test_client(TokenStyle::JsonBody);
        let url = client
            .login_link("https://app.test/redirect", None, Some("st4te"))
            .unwrap();
        let query = query_map(&url);
        assert_eq!(query["response_type"], "code");
        assert_eq!(query["client_id"], "cid");
        assert_eq!(query["redirect_uri"], "https://app.test/redirect");
        assert_eq!(query["scope"], "openid profile");
        assert_eq!(query["state"], "st4te");
    }

    #[test]
    fn login_link_scope_override_wins() {
        let client = test_client(TokenStyle::JsonBody);
        let scope = vec!["email".to_string()];
        let url = client
            .login_link("https://app.test/redirect", Some(&scope), None)
            .unwrap();
        let query = query_map(&url);
        assert_eq!(query["scope"], "email");
        assert!(!query.contains_key("state"));
    }

    #[test]
    fn basic_form_login_link_omits_redirect_and_state() {
        let client = test_client(TokenStyle::BasicForm);
        let url = client
            .login_link("https://app.test/redirect", None, Some("st4te"))
            .unwrap();
        let query = query_map(&url);
        assert_eq!(query["client_id"], "cid");
        assert!(!query.contains_key("response_type"));
        assert!(!query.contains_key("redirect_uri"));
        assert!(!query.contains_key("state"));
    }

    #[test]
    fn parse_token_body_accepts_json() {
        let token =
            parse_token_body(r#"{"access_token":"tok123","token_type":"bearer"}"#).unwrap();
        assert_eq!(token.access_token, "tok123");
        assert_eq!(token.token_type, "bearer");
        assert!(token.refresh_token.is_none());
    }

    #[test]
    fn parse_token_body_accepts_form_encoding() {
        let token =
            parse_token_body("access_token=tok456&token_type=bearer&scope=read%3Auser").unwrap();
        assert_eq!(token.access_token, "tok456");
        assert_eq!(token.scope.as_deref(), Some("read:user"));
    }

    #[test]
    fn parse_token_body_rejects_garbage() {
        assert!(matches!(
            parse_token_body("<html>not a token</html>"),
            Err(AuthError::TokenResponse(_))
        ));
    }

    #[test]
    fn identity_of_handles_strings_and_numbers() {
        let profile: ProfileInfo =
            serde_json::from_str(r#"{"sub":"user-42","id":93837}"#).unwrap();
        assert_eq!(identity_of(&profile, "sub").as_deref(), Some("user-42"));
        assert_eq!(identity_of(&profile, "id").as_deref(), Some("93837"));
        assert_eq!(identity_of(&profile, "login"), None);
    }

    #[test]
    fn credentials_load_from_google_file() {
        let path = std::env::temp_dir().join("oauth-gate-cred-test.json");
        std::fs::write(
            &path,
            r#"{"web": {"client_id": "gid", "client_secret": "gsecret"}}"#,
        )
        .unwrap();
        let cred = ClientCredentials::from_google_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(cred.client_id, "gid");
        assert_eq!(cred.client_secret, "gsecret");
    }

    #[test]
    fn credentials_debug_redacts_secret() {
        let cred = ClientCredentials::new("cid", "very-secret");
        let debug = format!("{cred:?}");
        assert!(debug.contains("cid"));
        assert!(!debug.contains("very-secret"));
    }
}
