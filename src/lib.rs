//! OAuth2 authorization-code login for axum applications.
//!
//! The crate issues login links to third-party identity providers (Google,
//! GitHub, HuggingFace, Discord, or anything with compatible endpoints),
//! exchanges authorization codes for access tokens, fetches the authenticated
//! user's profile, and gates protected routes behind a session-based check.
//!
//! # Features
//!
//! - One [`OAuthClient`] type covering every provider; per-provider quirks are
//!   endpoint configuration plus a token-request shape, not subclasses
//! - [`AuthGate`] wires the callback and logout routes and a pre-route
//!   middleware that re-validates the session token against the provider on
//!   every gated request
//! - Application behavior (post-login response, authorization policy) plugs
//!   in through the [`OAuthApp`] trait
//! - Local development hosts are kept on plain HTTP while production hosts
//!   require HTTPS
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use axum::response::{IntoResponse, Redirect, Response};
//! use axum::routing::get;
//! use axum::{middleware, Router};
//! use oauth_gate::{
//!     require_auth, AuthGate, ClientCredentials, GateConfig, OAuthApp, OAuthClient, ProfileInfo,
//! };
//! use tower_sessions::{MemoryStore, Session, SessionManagerLayer};
//!
//! struct App;
//!
//! #[async_trait]
//! impl OAuthApp for App {
//!     async fn login(
//!         &self,
//!         _profile: &ProfileInfo,
//!         _state: Option<String>,
//!         _session: &Session,
//!     ) -> Response {
//!         Redirect::to("/").into_response()
//!     }
//!
//!     async fn chk_auth(&self, _profile: &ProfileInfo, _ident: &str, _session: &Session) -> bool {
//!         true
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let credentials = ClientCredentials::new("client-id", "client-secret");
//!     let client = OAuthClient::github(credentials, None).unwrap();
//!     let gate = AuthGate::new(client, Arc::new(App), GateConfig::default()).unwrap();
//!
//!     let app = Router::new()
//!         .route("/", get(|| async { "hello" }))
//!         .route("/login", get(|| async { "please log in" }))
//!         .merge(gate.router())
//!         .layer(middleware::from_fn_with_state(gate.clone(), require_auth))
//!         .layer(SessionManagerLayer::new(MemoryStore::default()));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```
//!
//! The session layer must wrap the auth middleware, as above, so the gate can
//! read the session. The login and error pages stay with the embedding
//! application.

pub mod client;
pub mod config;
pub mod error;
pub mod gate;
pub mod providers;
pub mod redirect;

pub use client::{
    ClientCredentials, OAuthClient, ProfileInfo, ProviderConfig, TokenSet, TokenStyle,
};
pub use config::GateConfig;
pub use error::AuthError;
pub use gate::{require_auth, AuthGate, AuthToken, OAuthApp, AUTH_KEY, OAUTH_ERROR_KEY};
pub use providers::Provider;
pub use redirect::{RedirectResolver, HTTP_PATTERNS};
