use std::fs;
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::watch;

use crate::model::StateCell;

const DEFAULT_CLIENT_ID: &str = "492e1e45ea814fa3ac555fe1576aaf5b";
const CLIENT_ID_ENV: &str = "SPOTIFY_CLIENT_ID";
const SPOTIFY_REDIRECT_URI: &str = "http://127.0.0.1:8898/login";
pub const SCOPES: &str =
    "user-read-playback-state user-modify-playback-state user-read-currently-playing playlist-read-private playlist-read-collaborative";

const RESPONSE: &str = r#"
<!doctype html>
<html>
<head><title>Success</title></head>
<body><h1>Authentication Successful!</h1><script>window.close();</script></body>
</html>
"#;
const CACHE: &str = ".cache";
const REFRESH_TOKEN_FILE: &str = ".cache/refresh_token";

/// Access tokens are issued for an hour
const TOKEN_LIFETIME_SECS: i64 = 3600;
/// Refresh once less than this is left
const REFRESH_MARGIN_SECS: i64 = 300;

/// A bearer credential and what is needed to renew it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    fn issued_now(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_at: Utc::now() + Duration::seconds(TOKEN_LIFETIME_SECS),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Read access to the current session; the identity provider owns its
/// lifecycle and swaps it in through [`replace`](Self::replace).
#[derive(Clone, Default)]
pub struct SessionAccessor {
    cell: Arc<StateCell<Option<Session>>>,
}

impl SessionAccessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<Session> {
        self.cell.get()
    }

    /// The session, unless it is missing or expired
    pub fn usable_session(&self) -> Option<Session> {
        self.session().filter(|s| !s.is_expired())
    }

    /// The bearer token to send, or `None` when not ready
    pub fn bearer(&self) -> Option<String> {
        self.usable_session().map(|s| s.access_token)
    }

    pub fn replace(&self, session: Option<Session>) {
        self.cell.set(session);
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.cell.subscribe()
    }

    pub fn needs_refresh(&self) -> bool {
        match self.session() {
            Some(session) => {
                let remaining = session.expires_at - Utc::now();
                remaining.num_seconds() < REFRESH_MARGIN_SECS
            }
            None => false,
        }
    }

    pub async fn refresh_if_needed(&self) -> Result<bool> {
        let Some(session) = self.session() else {
            return Ok(false);
        };
        if !self.needs_refresh() {
            return Ok(false);
        }

        tracing::info!("Token expiring soon, refreshing...");
        match refresh_access_token(&session.refresh_token).await {
            Ok(renewed) => {
                self.replace(Some(renewed));
                tracing::info!("Token refreshed successfully");
                Ok(true)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to refresh token");
                Err(e)
            }
        }
    }
}

fn client_id() -> String {
    std::env::var(CLIENT_ID_ENV).unwrap_or_else(|_| DEFAULT_CLIENT_ID.to_string())
}

fn oauth_builder(client_id: &str) -> librespot_oauth::OAuthClientBuilder {
    librespot_oauth::OAuthClientBuilder::new(
        client_id,
        SPOTIFY_REDIRECT_URI,
        SCOPES.split_whitespace().collect(),
    )
}

fn store_refresh_token(refresh_token: &str) {
    if let Err(e) = fs::create_dir_all(CACHE).and_then(|_| fs::write(REFRESH_TOKEN_FILE, refresh_token)) {
        tracing::warn!(error = %e, "Could not persist refresh token");
    } else {
        tracing::debug!("Saved refresh token to disk");
    }
}

async fn perform_browser_auth() -> Result<Session> {
    tracing::info!("Starting browser-based OAuth flow");
    let client = oauth_builder(&client_id())
        .open_in_browser()
        .with_custom_message(RESPONSE)
        .build()?;

    let token = client.get_access_token_async().await?;
    store_refresh_token(&token.refresh_token);

    tracing::info!("Browser authentication completed successfully");
    Ok(Session::issued_now(token.access_token, token.refresh_token))
}

/// Exchange a refresh token for a fresh session, persisting the new refresh token
pub async fn refresh_access_token(refresh_token: &str) -> Result<Session> {
    let client = oauth_builder(&client_id()).build()?;
    let token = client.refresh_token_async(refresh_token).await?;
    store_refresh_token(&token.refresh_token);
    Ok(Session::issued_now(token.access_token, token.refresh_token))
}

/// Obtain a session, silently from the cached refresh token when possible
pub async fn perform_oauth_flow() -> Result<Session> {
    match fs::read_to_string(REFRESH_TOKEN_FILE) {
        Ok(stored) if !stored.trim().is_empty() => {
            tracing::info!("Found cached refresh token");
            match refresh_access_token(stored.trim()).await {
                Ok(session) => {
                    tracing::debug!("Token refreshed successfully");
                    Ok(session)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Cached refresh token failed, re-authenticating");
                    perform_browser_auth().await
                }
            }
        }
        _ => {
            tracing::info!("No cached credentials found, starting browser authentication");
            perform_browser_auth().await
        }
    }
}
