use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{OriginalUri, Query, Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use regex::Regex;
use serde::Deserialize;
use tokio::sync::RwLock;
use tower_sessions::Session;
use url::Url;

use crate::client::{identity_of, OAuthClient, ProfileInfo};
use crate::config::GateConfig;
use crate::error::AuthError;
use crate::redirect::RedirectResolver;

/// Session key holding the provider access token. Its presence is the sole
/// session-level evidence of authentication.
pub const AUTH_KEY: &str = "auth";

/// Session key holding the provider error code from a denied callback, for
/// the error page to render.
pub const OAUTH_ERROR_KEY: &str = "oauth_error";

/// Raw access token of the authenticated principal, inserted into request
/// extensions once the gate has let a request through. Handlers needing
/// profile fields must fetch them with this token.
#[derive(Debug, Clone)]
pub struct AuthToken(pub String);

/// Behavior the embedding application supplies at gate construction.
///
/// `login` and `chk_auth` have no defaults on purpose: a gate without them is
/// a wiring error, surfaced at compile time rather than on the first request.
#[async_trait]
pub trait OAuthApp: Send + Sync {
    /// Called once after a successful callback, with the session already
    /// holding the access token. Produces the post-login response, typically
    /// after creating or looking up a local user record.
    async fn login(
        &self,
        profile: &ProfileInfo,
        state: Option<String>,
        session: &Session,
    ) -> Response;

    /// Authorization policy: is this identity allowed in. May populate the
    /// session with application-specific claims as a side effect.
    async fn chk_auth(&self, profile: &ProfileInfo, ident: &str, session: &Session) -> bool;

    /// Post-logout response. `None` falls back to a redirect to the login
    /// page.
    async fn logout(&self, _session: &Session) -> Option<Response> {
        None
    }
}

/// Session-backed authentication gate around one [`OAuthClient`].
///
/// The gate owns the callback and logout routes (see [`AuthGate::router`])
/// and the [`require_auth`] pre-route check. It holds no per-user state
/// itself; everything lives in the request's session.
pub struct AuthGate {
    /// Only `exchange_code` mutates the client; profile fetches and link
    /// building take the read side so gated requests validate concurrently.
    client: RwLock<OAuthClient>,
    app: Arc<dyn OAuthApp>,
    config: GateConfig,
    resolver: RedirectResolver,
    skip: Vec<Regex>,
    id_key: String,
}

#[derive(Deserialize)]
struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

impl AuthGate {
    pub fn new(
        client: OAuthClient,
        app: Arc<dyn OAuthApp>,
        config: GateConfig,
    ) -> Result<Arc<Self>, AuthError> {
        let resolver = RedirectResolver::new(config.https, &config.http_patterns)?;
        let skip = config
            .skip_patterns()
            .iter()
            .map(|p| {
                Regex::new(&format!("^(?:{p})"))
                    .map_err(|e| AuthError::Config(format!("invalid skip pattern '{p}': {e}")))
            })
            .collect::<Result<_, _>>()?;
        let id_key = client.id_key().to_string();
        Ok(Arc::new(Self {
            client: RwLock::new(client),
            app,
            config,
            resolver,
            skip,
            id_key,
        }))
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Routes owned by the gate: the OAuth callback and logout. Merge into
    /// the application router; the login and error pages stay with the
    /// embedding application.
    pub fn router(self: &Arc<Self>) -> Router {
        Router::new()
            .route(&self.config.redirect_path, get(callback))
            .route(&self.config.logout_path, get(logout))
            .with_state(self.clone())
    }

    /// Redirect URI the provider should send the browser back to, for the
    /// request's `Host`.
    pub fn redirect_uri(&self, host: &str) -> String {
        self.resolver.redirect_url(host, &self.config.redirect_path)
    }

    /// Full provider login URL for the request's `Host`.
    pub async fn login_link(
        &self,
        host: &str,
        scope: Option<&[String]>,
        state: Option<&str>,
    ) -> Result<Url, AuthError> {
        let redirect_uri = self.redirect_uri(host);
        self.client.read().await.login_link(&redirect_uri, scope, state)
    }

    fn skipped(&self, path: &str) -> bool {
        self.skip.iter().any(|re| re.is_match(path))
    }

    fn to_login(&self) -> Response {
        Redirect::to(&self.config.login_path).into_response()
    }

    /// Re-validate a session token against the provider and the application's
    /// authorization policy. Any failure counts as unauthenticated; the
    /// distinction between a dead token and a denied identity is deliberately
    /// not surfaced.
    async fn validate(&self, token: &str, session: &Session) -> bool {
        let profile = match self.client.read().await.fetch_profile(Some(token)).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::debug!("token re-validation failed: {}", e);
                return false;
            }
        };
        let Some(ident) = identity_of(&profile, &self.id_key) else {
            tracing::warn!("profile lacks identity field '{}'", self.id_key);
            return false;
        };
        self.app.chk_auth(&profile, &ident, session).await
    }
}

/// Pre-route authentication check, for `axum::middleware::from_fn_with_state`.
///
/// Skip-listed paths pass straight through. Every other request needs a
/// session token that still resolves to a live provider profile and passes
/// `chk_auth`; otherwise it is answered with a 303 to the login page. The
/// provider round-trip happens on every gated request; there is no local
/// validity caching.
pub async fn require_auth(
    State(gate): State<Arc<AuthGate>>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Response {
    if gate.skipped(request.uri().path()) {
        return next.run(request).await;
    }

    let token = match session.get::<String>(AUTH_KEY).await {
        Ok(Some(token)) => token,
        Ok(None) => return gate.to_login(),
        Err(e) => {
            tracing::debug!("session read failed: {}", e);
            return gate.to_login();
        }
    };

    if !gate.validate(&token, &session).await {
        return gate.to_login();
    }

    request.extensions_mut().insert(AuthToken(token));
    next.run(request).await
}

/// OAuth callback. A missing `code` means the provider denied the request or
/// the user cancelled; the provider's error code is stashed in the session
/// for the error page. Exchange and profile failures propagate as
/// [`AuthError`] responses.
async fn callback(
    State(gate): State<Arc<AuthGate>>,
    session: Session,
    headers: HeaderMap,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<CallbackParams>,
) -> Result<Response, AuthError> {
    let Some(code) = params.code else {
        let error = params.error.unwrap_or_default();
        tracing::info!("oauth callback denied: {}", error);
        session.insert(OAUTH_ERROR_KEY, error).await?;
        return Ok(Redirect::to(&gate.config.error_path).into_response());
    };

    // HTTP/2 requests may carry the authority in the URI instead of a Host
    // header. Without either the redirect URI cannot be rebuilt.
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| uri.authority().map(|a| a.as_str()))
        .ok_or_else(|| {
            AuthError::Config("callback request has no Host header or URI authority".to_string())
        })?;
    let redirect_uri = gate.redirect_uri(host);

    let (profile, access_token) = {
        let mut client = gate.client.write().await;
        let profile = client.retrieve_profile(&code, &redirect_uri).await?;
        let token = client
            .token()
            .map(|t| t.access_token.clone())
            .ok_or(AuthError::MissingToken)?;
        (profile, token)
    };

    let Some(ident) = identity_of(&profile, &gate.id_key) else {
        return Ok(gate.to_login());
    };
    if !gate.app.chk_auth(&profile, &ident, &session).await {
        tracing::info!("authorization denied for identity {}", ident);
        return Ok(gate.to_login());
    }

    session.insert(AUTH_KEY, access_token).await?;
    Ok(gate.app.login(&profile, params.state, &session).await)
}

async fn logout(
    State(gate): State<Arc<AuthGate>>,
    session: Session,
) -> Result<Response, AuthError> {
    session.remove::<String>(AUTH_KEY).await?;
    Ok(match gate.app.logout(&session).await {
        Some(response) => response,
        None => gate.to_login(),
    })
}
